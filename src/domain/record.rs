// ==========================================
// Shopify 订单配送桥接系统 - 配送记录模型
// ==========================================
// 职责: 定义转换输出的扁平记录与持久化行结构
// 红线: FlatRecord 是"目标字段名 → 字符串值"的扁平映射,
//       未解析的值一律为空串,不是 None/错误
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::types::DispatchStatus;

// ==========================================
// 标准目标字段名
// ==========================================
// 说明: 与操作员看板列一一对应,映射规则的 destination_field 取值于此
// (操作员也可自定义额外列,这里只是内置集合)
pub mod fields {
    pub const DELIVERY_DATE: &str = "deliveryDate";
    pub const PROCESSING_DATE: &str = "processingDate";
    pub const JOB_RELEASE_TIME: &str = "jobReleaseTime";
    pub const DELIVERY_COMPLETION_TIME_WINDOW: &str = "deliveryCompletionTimeWindow";
    pub const DELIVERY_ORDER_NO: &str = "deliveryOrderNo";
    pub const FIRST_NAME: &str = "firstName";
    pub const LAST_NAME: &str = "lastName";
    pub const COMPANY: &str = "company";
    pub const ADDRESS: &str = "address";
    pub const POSTAL_CODE: &str = "postalCode";
    pub const PHONE_NUMBER: &str = "phoneNumber";
    pub const EMAILS_FOR_NOTIFICATIONS: &str = "emailsForNotifications";
    pub const INSTRUCTIONS: &str = "instructions";
    pub const GROUP: &str = "group";
    pub const ITEM_COUNT: &str = "itemCount";
    pub const DESCRIPTION: &str = "description";
    pub const SKU: &str = "sku";
    pub const QTY: &str = "qty";
}

// ==========================================
// FlatRecord - 扁平配送记录
// ==========================================
// 每个源订单的每个有效行项目产出一条;
// 订单级字段共享,行级字段(description/sku/qty)各自覆盖
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatRecord {
    // BTreeMap 保证字段遍历顺序稳定(看板/导出依赖)
    #[serde(flatten)]
    fields: BTreeMap<String, String>,
}

impl FlatRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fields(fields: BTreeMap<String, String>) -> Self {
        Self { fields }
    }

    /// 读取字段值;不存在时返回空串(与"未解析"一致)
    pub fn get(&self, field: &str) -> &str {
        self.fields.get(field).map(|s| s.as_str()).unwrap_or("")
    }

    pub fn set(&mut self, field: &str, value: impl Into<String>) {
        self.fields.insert(field.to_string(), value.into());
    }

    /// 字段是否"仍为空"(不存在或为空串)——两阶段解析的判断口径
    pub fn is_blank(&self, field: &str) -> bool {
        self.get(field).is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

// ==========================================
// DeliveryRecord - 持久化配送记录行
// ==========================================
// 用途: 仓储层落库结构,fields 以 JSON 文本存储
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryRecord {
    pub record_id: String,         // UUID
    pub order_id: i64,             // 源订单ID(跳过重复处理的判断键)
    pub order_name: String,        // 展示单号
    pub line_no: i64,              // 行序号(从1起;无行项目的回退记录为0)
    pub batch_id: String,          // 同一次摄入批次
    pub flat: FlatRecord,          // 扁平字段
    pub status: DispatchStatus,    // 派发状态
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_record_blank_semantics() {
        let mut rec = FlatRecord::new();
        assert!(rec.is_blank(fields::ADDRESS));
        assert_eq!(rec.get(fields::ADDRESS), "");

        rec.set(fields::ADDRESS, "");
        assert!(rec.is_blank(fields::ADDRESS));

        rec.set(fields::ADDRESS, "71 Ayer Rajah Crescent");
        assert!(!rec.is_blank(fields::ADDRESS));
    }

    #[test]
    fn test_flat_record_serde_is_flat() {
        let mut rec = FlatRecord::new();
        rec.set(fields::QTY, "2");
        rec.set(fields::SKU, "SKU-1");
        let json = serde_json::to_string(&rec).expect("序列化失败");
        // flatten: 顶层就是字段,没有包一层 "fields"
        assert_eq!(json, r#"{"qty":"2","sku":"SKU-1"}"#);
    }
}
