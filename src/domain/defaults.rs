// ==========================================
// Shopify 订单配送桥接系统 - 内置映射规则
// ==========================================
// 职责: 提供出厂默认的两套映射规则,供建库时播种
// 说明: 操作员可在看板上改写/删除这些规则,此处仅是初始值
// ==========================================

use crate::domain::mapping::{ExtractProcessingMapping, ExtractRecipe, GlobalFieldMapping};
use crate::domain::record::fields;

/// 默认提取处理映射集
///
/// 覆盖所有需要解析/归一化的看板列;
/// 其余列由全局字段映射或订单级默认值补齐
pub fn default_extract_mappings() -> Vec<ExtractProcessingMapping> {
    vec![
        ExtractProcessingMapping::new(
            fields::DELIVERY_DATE,
            ExtractRecipe::Date,
            "order.tags",
            Some("delivery_date"),
        ),
        ExtractProcessingMapping::new(
            fields::PROCESSING_DATE,
            ExtractRecipe::Date,
            "order.tags",
            Some("processing_date"),
        ),
        ExtractProcessingMapping::new(
            fields::JOB_RELEASE_TIME,
            ExtractRecipe::Time,
            "order.tags",
            Some("job_release_time"),
        ),
        ExtractProcessingMapping::new(
            fields::DELIVERY_COMPLETION_TIME_WINDOW,
            ExtractRecipe::Time,
            "order.tags",
            Some("delivery_completion_time_window"),
        ),
        ExtractProcessingMapping::new(
            fields::GROUP,
            ExtractRecipe::Group,
            "order.name",
            Some("first_two_letters"),
        ),
        ExtractProcessingMapping::new(
            fields::ITEM_COUNT,
            ExtractRecipe::ItemCount,
            "line_items",
            Some("sum_quantities"),
        ),
        ExtractProcessingMapping::new(
            fields::DESCRIPTION,
            ExtractRecipe::Description,
            "line_items",
            None,
        ),
        ExtractProcessingMapping::new(
            fields::PHONE_NUMBER,
            ExtractRecipe::Phone,
            "shipping_address.phone",
            Some("normalize"),
        ),
    ]
}

/// 默认全局字段映射集
pub fn default_global_mappings() -> Vec<GlobalFieldMapping> {
    vec![
        GlobalFieldMapping::new(fields::FIRST_NAME, &["shipping_address.first_name"]),
        GlobalFieldMapping::new(fields::LAST_NAME, &["shipping_address.last_name"]),
        GlobalFieldMapping::new(fields::COMPANY, &["shipping_address.company"]),
        GlobalFieldMapping::new(fields::POSTAL_CODE, &["shipping_address.zip"]),
        GlobalFieldMapping::new(fields::DELIVERY_ORDER_NO, &["name"]),
        GlobalFieldMapping::new(fields::EMAILS_FOR_NOTIFICATIONS, &["email"]),
        GlobalFieldMapping::new(fields::INSTRUCTIONS, &["note"]),
    ]
}
