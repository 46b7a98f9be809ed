// ==========================================
// Shopify 订单配送桥接系统 - 配送记录 API
// ==========================================
// 职责: 看板网格的查询/筛选/状态流转/CSV 导出
// 说明: 筛选在内存中对扁平字段进行,列集合是动态的
// ==========================================

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::record::{fields, DeliveryRecord};
use crate::domain::types::DispatchStatus;
use crate::repository::DeliveryRecordRepository;

/// 看板筛选条件(全部可选,同时给出的条件取交集)
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub status: Option<DispatchStatus>,
    pub group: Option<String>,
    pub delivery_date: Option<String>,
    /// 自由文本: 对单号、地址、描述做大小写不敏感子串匹配
    pub query: Option<String>,
}

// CSV 导出的固定前导列(看板既定列序);其余字段按名称追加
const EXPORT_LEADING_COLUMNS: &[&str] = &[
    fields::DELIVERY_DATE,
    fields::DELIVERY_ORDER_NO,
    fields::GROUP,
    fields::JOB_RELEASE_TIME,
    fields::DELIVERY_COMPLETION_TIME_WINDOW,
    fields::FIRST_NAME,
    fields::LAST_NAME,
    fields::ADDRESS,
    fields::POSTAL_CODE,
    fields::PHONE_NUMBER,
    fields::EMAILS_FOR_NOTIFICATIONS,
    fields::INSTRUCTIONS,
    fields::DESCRIPTION,
    fields::SKU,
    fields::QTY,
    fields::ITEM_COUNT,
];

// ==========================================
// RecordApi - 配送记录 API
// ==========================================
pub struct RecordApi {
    repo: DeliveryRecordRepository,
}

impl RecordApi {
    pub fn new(conn: Arc<Mutex<rusqlite::Connection>>) -> Self {
        Self {
            repo: DeliveryRecordRepository::new(conn),
        }
    }

    /// 按筛选条件查询记录
    pub fn list_records(&self, filter: &RecordFilter) -> ApiResult<Vec<DeliveryRecord>> {
        // 状态条件可下推到 SQL,其余条件作用在扁平字段上
        let records = match filter.status {
            Some(status) => self.repo.list_by_status(status)?,
            None => self.repo.list_all()?,
        };

        let query_lower = filter.query.as_ref().map(|q| q.to_lowercase());
        let filtered = records
            .into_iter()
            .filter(|r| {
                if let Some(group) = &filter.group {
                    if r.flat.get(fields::GROUP) != group {
                        return false;
                    }
                }
                if let Some(date) = &filter.delivery_date {
                    if r.flat.get(fields::DELIVERY_DATE) != date {
                        return false;
                    }
                }
                if let Some(q) = &query_lower {
                    let haystack = format!(
                        "{} {} {}",
                        r.order_name,
                        r.flat.get(fields::ADDRESS),
                        r.flat.get(fields::DESCRIPTION)
                    )
                    .to_lowercase();
                    if !haystack.contains(q.as_str()) {
                        return false;
                    }
                }
                true
            })
            .collect();
        Ok(filtered)
    }

    /// 按订单查询记录
    pub fn list_by_order(&self, order_id: i64) -> ApiResult<Vec<DeliveryRecord>> {
        Ok(self.repo.find_by_order_id(order_id)?)
    }

    /// 标记已派发
    pub fn mark_dispatched(&self, record_id: &str) -> ApiResult<()> {
        self.repo.update_status(record_id, DispatchStatus::Dispatched)?;
        Ok(())
    }

    /// 标记派发失败
    pub fn mark_failed(&self, record_id: &str) -> ApiResult<()> {
        self.repo.update_status(record_id, DispatchStatus::Failed)?;
        Ok(())
    }

    /// 删除订单的全部记录(操作员重新处理前清场)
    pub fn delete_order_records(&self, order_id: i64) -> ApiResult<usize> {
        let removed = self.repo.delete_by_order_id(order_id)?;
        info!(order_id, removed, "已删除订单记录");
        Ok(removed)
    }

    /// 导出 CSV
    ///
    /// 列序: 固定前导列在先,记录中出现的其余字段按名称排序追加,
    /// 最后是 orderId / status 两个系统列
    pub fn export_csv(records: &[DeliveryRecord]) -> ApiResult<String> {
        // 动态收集额外列
        let mut extra_columns: BTreeSet<String> = BTreeSet::new();
        for record in records {
            for (name, _) in record.flat.iter() {
                if !EXPORT_LEADING_COLUMNS.contains(&name.as_str()) {
                    extra_columns.insert(name.clone());
                }
            }
        }

        let mut writer = csv::Writer::from_writer(Vec::new());

        let mut header: Vec<String> = EXPORT_LEADING_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .collect();
        header.extend(extra_columns.iter().cloned());
        header.push("orderId".to_string());
        header.push("status".to_string());
        writer.write_record(&header)?;

        for record in records {
            let mut row: Vec<String> = EXPORT_LEADING_COLUMNS
                .iter()
                .map(|c| record.flat.get(c).to_string())
                .collect();
            row.extend(extra_columns.iter().map(|c| record.flat.get(c).to_string()));
            row.push(record.order_id.to_string());
            row.push(record.status.to_string());
            writer.write_record(&row)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| ApiError::CsvExportError(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| ApiError::CsvExportError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::FlatRecord;
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
            order_name: format!("#SG{}", order_id),
            line_no,
            batch_id: "b-1".to_string(),
            flat,
            status: DispatchStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_export_csv_stable_columns() {
        let records = vec![record(
            1,
            1,
            &[
                (fields::DELIVERY_DATE, "22/07/2025"),
                (fields::DELIVERY_ORDER_NO, "#SG1"),
                (fields::QTY, "2"),
                ("customColumn", "x"),
            ],
        )];
        let csv_text = RecordApi::export_csv(&records).expect("导出失败");
        let mut lines = csv_text.lines();
        let header = lines.next().expect("缺表头");
        assert!(header.starts_with("deliveryDate,deliveryOrderNo,"));
        assert!(header.contains("customColumn"));
        assert!(header.ends_with("orderId,status"));

        let row = lines.next().expect("缺数据行");
        assert!(row.starts_with("22/07/2025,#SG1,"));
        assert!(row.ends_with("1,PENDING"));
    }
}
