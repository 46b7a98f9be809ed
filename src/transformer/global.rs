// ==========================================
// Shopify 订单配送桥接系统 - 全局字段映射引擎
// ==========================================
// 职责: 解析操作员配置的"目标字段 ← 多个源路径拼接"规则
// 红线: 只填补提取阶段后仍为空的目标字段(两阶段解析的第二阶段)
// ==========================================

use serde_json::Value;

use crate::domain::mapping::GlobalFieldMapping;
use crate::transformer::path::resolve_to_string;

// ==========================================
// GlobalMappingEngine - 全局字段映射引擎
// ==========================================
pub struct GlobalMappingEngine;

impl GlobalMappingEngine {
    /// 解析单条全局映射
    ///
    /// 规则:
    /// - no_mapping=true → 恒为空串
    /// - "line_items." 前缀的路径只取第一个行项目的字段
    /// - 逐路径取值,丢弃空值,按 join_separator 拼接
    ///   (缺失的源不产生空占位,不影响分隔符数量)
    pub fn resolve(order_json: &Value, mapping: &GlobalFieldMapping) -> String {
        if mapping.no_mapping {
            return String::new();
        }

        let parts: Vec<String> = mapping
            .source_field_paths
            .iter()
            .map(|path| match path.strip_prefix("line_items.") {
                Some(rest) => resolve_to_string(order_json, &format!("line_items.0.{}", rest)),
                None => resolve_to_string(order_json, path),
            })
            .filter(|v| !v.is_empty())
            .collect();

        parts.join(&mapping.join_separator)
    }
}
