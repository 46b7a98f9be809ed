// ==========================================
// Shopify 订单配送桥接系统 - 提取配方引擎
// ==========================================
// 职责: 把单条提取处理映射解析为一个字符串值
// 红线: 任何缺失/不识别的组合降级为空串,引擎本身永不报错
// 说明: 配方由枚举显式选择,format 只在配方内部选变体
// ==========================================

use serde_json::Value;
use std::collections::BTreeMap;

use crate::domain::mapping::{ExtractProcessingMapping, ExtractRecipe};
use crate::domain::order::SourceOrder;
use crate::domain::types::DateTagKind;
use crate::transformer::path::resolve_to_string;
use crate::transformer::phone::normalize_phone;
use crate::transformer::tags::{first_plain_date, tag_date};
use crate::transformer::timewindow::{completion_time_window, job_release_time, time_window_literal};

// ==========================================
// ExtractEngine - 提取配方引擎
// ==========================================
pub struct ExtractEngine;

impl ExtractEngine {
    /// 解析单条提取映射
    ///
    /// order_json 是 order 的 JSON 投影,二者必须来自同一订单
    pub fn resolve(
        order: &SourceOrder,
        order_json: &Value,
        mapping: &ExtractProcessingMapping,
    ) -> String {
        let format = mapping.format.as_deref();

        match mapping.recipe {
            // 无条件空值(看板上标记为不参与映射的列)
            ExtractRecipe::Skip => String::new(),

            // 标签日期: 源文本默认是 order.tags,但允许指向任意文本字段
            ExtractRecipe::Date => {
                let text = resolve_to_string(order_json, &mapping.source_field);
                match format {
                    Some("delivery_date") => tag_date(&text, DateTagKind::Delivery),
                    Some("processing_date") => tag_date(&text, DateTagKind::Processing),
                    Some("dd/mm/yyyy") | None => first_plain_date(&text),
                    Some(_) => String::new(),
                }
            }

            // 标签时段
            ExtractRecipe::Time => {
                let text = resolve_to_string(order_json, &mapping.source_field);
                match format {
                    Some("job_release_time") => job_release_time(&text),
                    Some("delivery_completion_time_window") => completion_time_window(&text),
                    Some("time_window") | None => time_window_literal(&text),
                    Some(_) => String::new(),
                }
            }

            // 订单号分组: 去掉前导 '#',取前两个字符大写
            ExtractRecipe::Group => {
                let name = resolve_to_string(order_json, &mapping.source_field);
                match format {
                    Some("first_two_letters") => {
                        let trimmed = name.strip_prefix('#').unwrap_or(&name);
                        trimmed.chars().take(2).collect::<String>().to_uppercase()
                    }
                    _ => name,
                }
            }

            // 行项目数量聚合: sum_quantities → 数量求和;其余 → 行数
            ExtractRecipe::ItemCount => match format {
                Some("sum_quantities") => order
                    .line_items
                    .iter()
                    .map(|li| li.quantity)
                    .sum::<i64>()
                    .to_string(),
                _ => order.line_items.len().to_string(),
            },

            // 行项目描述拼接: "<title> - <variant|Default>",逗号分隔
            ExtractRecipe::Description => order
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
                .join(", "),

            // 电话: 点号路径取值,format=normalize 时归一化
            ExtractRecipe::Phone => {
                let value = resolve_to_string(order_json, &mapping.source_field);
                match format {
                    Some("normalize") => normalize_phone(&value),
                    _ => value,
                }
            }
        }
    }

    /// 批量解析: 目标字段 → 解析值(含空串结果,供两阶段判空使用)
    pub fn resolve_all(
        order: &SourceOrder,
        order_json: &Value,
        mappings: &[ExtractProcessingMapping],
    ) -> BTreeMap<String, String> {
        let mut resolved = BTreeMap::new();
        for mapping in mappings {
            let value = Self::resolve(order, order_json, mapping);
            resolved.insert(mapping.destination_field.clone(), value);
        }
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::LineItem;
    use crate::domain::record::fields;

    fn order_with(tags: &str, items: Vec<LineItem>) -> (SourceOrder, Value) {
        let order = SourceOrder {
            id: 1,
            name: "#SG1024".to_string(),
            tags: tags.to_string(),
            note: None,
            email: None,
            shipping_address: None,
            billing_address: None,
            customer: None,
            line_items: items,
        };
        let json = serde_json::to_value(&order).expect("订单序列化失败");
        (order, json)
    }

    fn item(title: &str, variant: Option<&str>, qty: i64) -> LineItem {
        LineItem {
            sku: None,
            title: title.to_string(),
            variant_title: variant.map(|s| s.to_string()),
            quantity: qty,
            current_quantity: None,
        }
    }

    #[test]
    fn test_date_recipe_plain_format() {
        let (order, json) = order_with("Morning, 22/07/2025", vec![]);
        let m = ExtractProcessingMapping::new(
            fields::DELIVERY_DATE,
            ExtractRecipe::Date,
            "order.tags",
            Some("dd/mm/yyyy"),
        );
        assert_eq!(ExtractEngine::resolve(&order, &json, &m), "22/07/2025");
    }

    #[test]
    fn test_date_recipe_keyword_formats() {
        let (order, json) = order_with("delivery:2024-01-20, processing:18/01/2024", vec![]);
        let delivery = ExtractProcessingMapping::new(
            fields::DELIVERY_DATE,
            ExtractRecipe::Date,
            "order.tags",
            Some("delivery_date"),
        );
        let processing = ExtractProcessingMapping::new(
            fields::PROCESSING_DATE,
            ExtractRecipe::Date,
            "order.tags",
            Some("processing_date"),
        );
        assert_eq!(ExtractEngine::resolve(&order, &json, &delivery), "20/01/2024");
        assert_eq!(ExtractEngine::resolve(&order, &json, &processing), "18/01/2024");
    }

    #[test]
    fn test_time_recipe_variants() {
        let (order, json) = order_with("16:00-20:00, Delivery", vec![]);
        let literal = ExtractProcessingMapping::new(
            "window",
            ExtractRecipe::Time,
            "order.tags",
            Some("time_window"),
        );
        let release = ExtractProcessingMapping::new(
            fields::JOB_RELEASE_TIME,
            ExtractRecipe::Time,
            "order.tags",
            Some("job_release_time"),
        );
        let completion = ExtractProcessingMapping::new(
            fields::DELIVERY_COMPLETION_TIME_WINDOW,
            ExtractRecipe::Time,
            "order.tags",
            Some("delivery_completion_time_window"),
        );
        assert_eq!(ExtractEngine::resolve(&order, &json, &literal), "16:00-20:00");
        assert_eq!(ExtractEngine::resolve(&order, &json, &release), "13:45");
        assert_eq!(ExtractEngine::resolve(&order, &json, &completion), "Afternoon");
    }

    #[test]
    fn test_group_recipe() {
        let (order, json) = order_with("", vec![]);
        let grouped = ExtractProcessingMapping::new(
            fields::GROUP,
            ExtractRecipe::Group,
            "order.name",
            Some("first_two_letters"),
        );
        // "#SG1024" → 去井号 → "SG"
        assert_eq!(ExtractEngine::resolve(&order, &json, &grouped), "SG");

        // 其他 format → 原样返回订单号
        let raw = ExtractProcessingMapping::new(fields::GROUP, ExtractRecipe::Group, "order.name", None);
        assert_eq!(ExtractEngine::resolve(&order, &json, &raw), "#SG1024");
    }

    #[test]
    fn test_item_count_sum_vs_count() {
        let (order, json) = order_with("", vec![item("A", None, 2), item("B", None, 3)]);
        let sum = ExtractProcessingMapping::new(
            fields::ITEM_COUNT,
            ExtractRecipe::ItemCount,
            "line_items",
            Some("sum_quantities"),
        );
        let count = ExtractProcessingMapping::new(
            fields::ITEM_COUNT,
            ExtractRecipe::ItemCount,
            "line_items",
            None,
        );
        assert_eq!(ExtractEngine::resolve(&order, &json, &sum), "5");
        assert_eq!(ExtractEngine::resolve(&order, &json, &count), "2");

        let (empty_order, empty_json) = order_with("", vec![]);
        assert_eq!(ExtractEngine::resolve(&empty_order, &empty_json, &count), "0");
        assert_eq!(ExtractEngine::resolve(&empty_order, &empty_json, &sum), "0");
    }

    #[test]
    fn test_description_recipe_uses_default_variant() {
        let (order, json) = order_with(
            "",
            vec![item("Bak Kwa", Some("500g"), 1), item("Pineapple Tarts", None, 2)],
        );
        let m = ExtractProcessingMapping::new(
            fields::DESCRIPTION,
            ExtractRecipe::Description,
            "line_items",
            None,
        );
        assert_eq!(
            ExtractEngine::resolve(&order, &json, &m),
            "Bak Kwa - 500g, Pineapple Tarts - Default"
        );
    }

    #[test]
    fn test_phone_recipe_normalize_and_raw() {
        let (mut order, _) = order_with("", vec![]);
        order.billing_address = Some(crate::domain::order::OrderAddress {
            phone: Some("+65 9876 5432".to_string()),
            ..Default::default()
        });
        let json = serde_json::to_value(&order).expect("订单序列化失败");

        let normalized = ExtractProcessingMapping::new(
            fields::PHONE_NUMBER,
            ExtractRecipe::Phone,
            "billing_address.phone",
            Some("normalize"),
        );
        let raw = ExtractProcessingMapping::new(
            fields::PHONE_NUMBER,
            ExtractRecipe::Phone,
            "billing_address.phone",
            None,
        );
        assert_eq!(ExtractEngine::resolve(&order, &json, &normalized), "98765432");
        assert_eq!(ExtractEngine::resolve(&order, &json, &raw), "+65 9876 5432");

        // 路径未命中 → 空串
        let missing = ExtractProcessingMapping::new(
            fields::PHONE_NUMBER,
            ExtractRecipe::Phone,
            "shipping_address.phone",
            Some("normalize"),
        );
        assert_eq!(ExtractEngine::resolve(&order, &json, &missing), "");
    }

    #[test]
    fn test_skip_recipe_always_blank() {
        let (order, json) = order_with("22/07/2025", vec![item("A", None, 1)]);
        let m = ExtractProcessingMapping::new("anything", ExtractRecipe::Skip, "order.tags", None);
        assert_eq!(ExtractEngine::resolve(&order, &json, &m), "");
    }
}
