// ==========================================
// Shopify 订单配送桥接系统 - 订单转换器
// ==========================================
// 职责: 源订单 + 两套映射规则 → 按行项目展开的扁平记录序列
// 流程: 提取配方 → 订单级默认值 → 全局映射补空 → 行项目展开
// 红线: 两阶段解析显式编码——提取结果永不被全局映射覆盖;
//       转换器无状态、无 I/O,对同一输入幂等
// ==========================================

use serde_json::Value;
use std::collections::BTreeMap;

use crate::domain::mapping::{ExtractProcessingMapping, GlobalFieldMapping};
use crate::domain::order::SourceOrder;
use crate::domain::record::{fields, FlatRecord};
use crate::transformer::extract::ExtractEngine;
use crate::transformer::global::GlobalMappingEngine;

// ==========================================
// OrderTransformer - 订单转换器
// ==========================================
pub struct OrderTransformer;

impl OrderTransformer {
    /// 转换一个源订单
    ///
    /// # 参数
    /// - order: 源订单(调用方已解析为结构体)
    /// - global_mappings: 全局字段映射集(destination_field 唯一,由调用方保证)
    /// - extract_mappings: 提取处理映射集(同上)
    ///
    /// # 返回
    /// 每个有效行项目一条记录;订单本身无行项目时返回单条回退记录;
    /// 行项目全部被移除(current_quantity=0)时返回空序列——没有可派送的货
    pub fn transform(
        order: &SourceOrder,
        global_mappings: &[GlobalFieldMapping],
        extract_mappings: &[ExtractProcessingMapping],
    ) -> Vec<FlatRecord> {
        // 订单的 JSON 投影,路径解析的统一输入
        let order_json = serde_json::to_value(order).unwrap_or(Value::Null);

        // === 阶段 1: 提取配方 ===
        let mut resolved = ExtractEngine::resolve_all(order, &order_json, extract_mappings);

        // === 阶段 1.5: 订单级默认值(仅填补提取后仍为空的字段) ===
        Self::apply_order_defaults(order, &mut resolved);

        // === 阶段 2: 全局映射,只补空 ===
        for mapping in global_mappings {
            let blank = resolved
                .get(&mapping.destination_field)
                .map(|v| v.is_empty())
                .unwrap_or(true);
            if blank {
                let value = GlobalMappingEngine::resolve(&order_json, mapping);
                resolved.insert(mapping.destination_field.clone(), value);
            }
        }

        let base = FlatRecord::from_fields(resolved);

        // === 阶段 3: 行项目展开 ===
        // 回退路径按"过滤前"判定: 订单本来就没有行项目才走回退;
        // 行项目存在但全部被移除 → 空输出
        if order.line_items.is_empty() {
            let mut record = base;
            record.set(fields::DESCRIPTION, "");
            record.set(fields::SKU, "");
            record.set(fields::QTY, "");
            return vec![record];
        }

        order
            .line_items
            .iter()
            .filter(|li| !li.is_removed())
            .map(|li| {
                let mut record = base.clone();
                record.set(fields::DESCRIPTION, li.display_description());
                record.set(fields::SKU, li.sku.clone().unwrap_or_default());
                record.set(fields::QTY, li.quantity.to_string());
                record
            })
            .collect()
    }

    /// 订单级默认值
    ///
    /// 每项仅在目标字段仍为空时生效:
    /// - description ← 行项目 "<title> - <variant|Default>" 拼接
    /// - qty / itemCount ← 行项目条数
    /// - address ← 收货地址 line1/line2/city/province/zip/country 拼接
    /// - deliveryOrderNo ← 订单展示单号
    /// - emailsForNotifications ← 订单邮箱
    /// - instructions ← 订单备注
    fn apply_order_defaults(order: &SourceOrder, resolved: &mut BTreeMap<String, String>) {
        let set_if_blank = |map: &mut BTreeMap<String, String>, field: &str, value: String| {
            let blank = map.get(field).map(|v| v.is_empty()).unwrap_or(true);
            if blank && !value.is_empty() {
                map.insert(field.to_string(), value);
            }
        };

        let description = order
            .line_items
            .iter()
            .map(|li| {
                format!(
                    "{} - {}",
                    li.title,
                    li.variant_title.as_deref().filter(|v| !v.is_empty()).unwrap_or("Default")
                )
            })
            .collect::<Vec<_>>()
            .join(", ");
        set_if_blank(resolved, fields::DESCRIPTION, description);

        let count = order.line_items.len().to_string();
        set_if_blank(resolved, fields::QTY, count.clone());
        set_if_blank(resolved, fields::ITEM_COUNT, count);

        if let Some(addr) = &order.shipping_address {
            let joined = [
                addr.address1.as_deref(),
                addr.address2.as_deref(),
                addr.city.as_deref(),
                addr.province.as_deref(),
                addr.zip.as_deref(),
                addr.country.as_deref(),
            ]
            .into_iter()
            .flatten()
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(", ");
            set_if_blank(resolved, fields::ADDRESS, joined);
        }

        set_if_blank(resolved, fields::DELIVERY_ORDER_NO, order.name.clone());
        set_if_blank(
            resolved,
            fields::EMAILS_FOR_NOTIFICATIONS,
            order.email.clone().unwrap_or_default(),
        );
        set_if_blank(
            resolved,
            fields::INSTRUCTIONS,
            order.note.clone().unwrap_or_default(),
        );
    }
}
