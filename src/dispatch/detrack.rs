// ==========================================
// Shopify 订单配送桥接系统 - 配送商任务载荷构建
// ==========================================
// 职责: 同一订单的扁平记录 → 配送商(Detrack)任务载荷
// 红线: 只构建载荷,不发请求——HTTP 客户端在外层接入件
// 口径: 看板日期为 DD/MM/YYYY,配送商 API 要求 YYYY-MM-DD
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::record::{fields, DeliveryRecord};
use crate::transformer::normalize_phone;

// ==========================================
// DetrackJob - 配送任务载荷
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetrackJob {
    /// 配送单号 (D.O. No.)
    pub do_number: String,
    /// 配送日期, YYYY-MM-DD
    pub date: String,
    pub address: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub postal_code: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub deliver_to_collect_from: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub phone_number: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub notify_email: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub instructions: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub job_release_time: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub time_window: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub group_name: String,
    pub items: Vec<DetrackJobItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetrackJobItem {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub sku: String,
    pub description: String,
    pub quantity: i64,
}

/// 看板日期 DD/MM/YYYY → API 日期 YYYY-MM-DD
///
/// 无法解析时原样返回(配送商侧再校验)
pub fn reformat_date(board_date: &str) -> String {
    match NaiveDate::parse_from_str(board_date, "%d/%m/%Y") {
        Ok(date) => date.format("%Y-%m-%d").to_string(),
        Err(_) => board_date.to_string(),
    }
}

/// 把同一订单的记录组装为一个配送任务
///
/// # 参数
/// - records: 同一订单的记录(行序号有序);跨订单混入属调用方错误
///
/// # 返回
/// - None: 无记录可组装
pub fn build_job(records: &[DeliveryRecord]) -> Option<DetrackJob> {
    let head = records.first()?;

    // 行级字段逐条成 item;回退记录(全空)不产生 item
    let items: Vec<DetrackJobItem> = records
        .iter()
        .filter(|r| {
            !r.flat.get(fields::DESCRIPTION).is_empty() || !r.flat.get(fields::SKU).is_empty()
        })
        .map(|r| DetrackJobItem {
            sku: r.flat.get(fields::SKU).to_string(),
            description: r.flat.get(fields::DESCRIPTION).to_string(),
            quantity: r.flat.get(fields::QTY).parse().unwrap_or(0),
        })
        .collect();

    let deliver_to = {
        let first = head.flat.get(fields::FIRST_NAME);
        let last = head.flat.get(fields::LAST_NAME);
        [first, last]
            .iter()
            .filter(|s| !s.is_empty())
            .cloned()
            .collect::<Vec<_>>()
            .join(" ")
    };

    Some(DetrackJob {
        do_number: head.flat.get(fields::DELIVERY_ORDER_NO).to_string(),
        date: reformat_date(head.flat.get(fields::DELIVERY_DATE)),
        address: head.flat.get(fields::ADDRESS).to_string(),
        postal_code: head.flat.get(fields::POSTAL_CODE).to_string(),
        deliver_to_collect_from: deliver_to,
        phone_number: normalize_phone(head.flat.get(fields::PHONE_NUMBER)),
        notify_email: head.flat.get(fields::EMAILS_FOR_NOTIFICATIONS).to_string(),
        instructions: head.flat.get(fields::INSTRUCTIONS).to_string(),
        job_release_time: head.flat.get(fields::JOB_RELEASE_TIME).to_string(),
        time_window: head
            .flat
            .get(fields::DELIVERY_COMPLETION_TIME_WINDOW)
            .to_string(),
        group_name: head.flat.get(fields::GROUP).to_string(),
        items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::FlatRecord;
    use crate::domain::types::DispatchStatus;
    use chrono::Utc;

    fn record(order_id: i64, line_no: i64, pairs: &[(&str, &str)]) -> DeliveryRecord {
        let mut flat = FlatRecord::new();
        for (k, v) in pairs {
            flat.set(k, *v);
        }
        let now = Utc::now();
        DeliveryRecord {
            record_id: format!("r-{}-{}", order_id, line_no),
            order_id,
            order_name: "#SG1024".to_string(),
            line_no,
            batch_id: "b-1".to_string(),
            flat,
            status: DispatchStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_reformat_date() {
        assert_eq!(reformat_date("22/07/2025"), "2025-07-22");
        // 解析失败原样返回
        assert_eq!(reformat_date("soon"), "soon");
        assert_eq!(reformat_date(""), "");
    }

    #[test]
    fn test_build_job_groups_items() {
        let records = vec![
            record(
                1024,
                1,
                &[
                    (fields::DELIVERY_ORDER_NO, "#SG1024"),
                    (fields::DELIVERY_DATE, "22/07/2025"),
                    (fields::ADDRESS, "71 Ayer Rajah Crescent, Singapore"),
                    (fields::PHONE_NUMBER, "+65 9876 5432"),
                    (fields::FIRST_NAME, "Mei"),
                    (fields::LAST_NAME, "Tan"),
                    (fields::DESCRIPTION, "Bak Kwa - 500g"),
                    (fields::SKU, "BK-500"),
                    (fields::QTY, "2"),
                ],
            ),
            record(
                1024,
                2,
                &[
                    (fields::DESCRIPTION, "Pineapple Tarts"),
                    (fields::SKU, "PT-12"),
                    (fields::QTY, "1"),
                ],
            ),
        ];

        let job = build_job(&records).expect("应组装出任务");
        assert_eq!(job.do_number, "#SG1024");
        assert_eq!(job.date, "2025-07-22");
        assert_eq!(job.deliver_to_collect_from, "Mei Tan");
        assert_eq!(job.phone_number, "98765432");
        assert_eq!(job.items.len(), 2);
        assert_eq!(job.items[0].quantity, 2);
        assert_eq!(job.items[1].sku, "PT-12");
    }

    #[test]
    fn test_build_job_fallback_record_has_no_items() {
        // 无行项目订单的回退记录: description/sku/qty 全空 → items 为空
        let records = vec![record(
            2048,
            0,
            &[
                (fields::DELIVERY_ORDER_NO, "#SG2048"),
                (fields::DESCRIPTION, ""),
                (fields::SKU, ""),
                (fields::QTY, ""),
            ],
        )];
        let job = build_job(&records).expect("应组装出任务");
        assert!(job.items.is_empty());

        assert!(build_job(&[]).is_none());
    }
}
