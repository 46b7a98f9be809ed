// ==========================================
// Shopify 订单配送桥接系统 - 配送记录仓储
// ==========================================
// 职责: 转换产出的扁平记录落库与状态流转
// 红线: "同一订单是否已处理"的判定以 order_id 为准,
//       由摄入管道在转换前调用 exists_for_order 检查
// ==========================================

use chrono::Utc;
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

use crate::domain::record::{DeliveryRecord, FlatRecord};
use crate::domain::types::DispatchStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};

// 查询行的中间元组: (record_id, order_id, order_name, line_no, batch_id,
//                    fields_json, status, created_at, updated_at)
type RowTuple = (String, i64, String, i64, String, String, String, String, String);

// ==========================================
// DeliveryRecordRepository - 配送记录仓储
// ==========================================
pub struct DeliveryRecordRepository {
    conn: Arc<Mutex<Connection>>,
}

impl DeliveryRecordRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 指定订单是否已有记录(跳过重复处理的判断)
    pub fn exists_for_order(&self, order_id: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM delivery_record WHERE order_id = ?1",
            params![order_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// 以事务批量写入一个订单的全部记录
    pub fn insert_batch(&self, records: &[DeliveryRecord]) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseQueryError(e.to_string()))?;

        for record in records {
            let fields_json = serde_json::to_string(&record.flat)?;
            tx.execute(
                r#"INSERT INTO delivery_record
                       (record_id, order_id, order_name, line_no, batch_id,
                        fields_json, status, created_at, updated_at)
                   VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"#,
                params![
                    &record.record_id,
                    record.order_id,
                    &record.order_name,
                    record.line_no,
                    &record.batch_id,
                    &fields_json,
                    record.status.to_string(),
                    record.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                    record.updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                ],
            )?;
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseQueryError(e.to_string()))?;
        Ok(())
    }

    /// 按订单查询记录,按行序号排序
    pub fn find_by_order_id(&self, order_id: i64) -> RepositoryResult<Vec<DeliveryRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"SELECT record_id, order_id, order_name, line_no, batch_id,
                      fields_json, status, created_at, updated_at
               FROM delivery_record
               WHERE order_id = ?1
               ORDER BY line_no"#,
        )?;
        let rows = stmt.query_map(params![order_id], Self::row_tuple)?;
        Self::collect_records(rows)
    }

    /// 查询全部记录,按创建时间降序、行序号升序
    pub fn list_all(&self) -> RepositoryResult<Vec<DeliveryRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"SELECT record_id, order_id, order_name, line_no, batch_id,
                      fields_json, status, created_at, updated_at
               FROM delivery_record
               ORDER BY created_at DESC, order_id DESC, line_no"#,
        )?;
        let rows = stmt.query_map([], Self::row_tuple)?;
        Self::collect_records(rows)
    }

    /// 按派发状态查询
    pub fn list_by_status(&self, status: DispatchStatus) -> RepositoryResult<Vec<DeliveryRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"SELECT record_id, order_id, order_name, line_no, batch_id,
                      fields_json, status, created_at, updated_at
               FROM delivery_record
               WHERE status = ?1
               ORDER BY created_at DESC, order_id DESC, line_no"#,
        )?;
        let rows = stmt.query_map(params![status.to_string()], Self::row_tuple)?;
        Self::collect_records(rows)
    }

    /// 更新单条记录的派发状态
    pub fn update_status(
        &self,
        record_id: &str,
        status: DispatchStatus,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE delivery_record SET status = ?1, updated_at = ?2 WHERE record_id = ?3",
            params![
                status.to_string(),
                Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
                record_id,
            ],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "delivery_record".to_string(),
                id: record_id.to_string(),
            });
        }
        Ok(())
    }

    /// 删除一个订单的全部记录(重新处理前清场)
    pub fn delete_by_order_id(&self, order_id: i64) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM delivery_record WHERE order_id = ?1",
            params![order_id],
        )?;
        Ok(affected)
    }

    // ===== 行映射辅助 =====

    fn row_tuple(row: &rusqlite::Row<'_>) -> rusqlite::Result<RowTuple> {
        Ok((
            row.get(0)?,
            row.get(1)?,
            row.get(2)?,
            row.get(3)?,
            row.get(4)?,
            row.get(5)?,
            row.get(6)?,
            row.get(7)?,
            row.get(8)?,
        ))
    }

    fn collect_records(
        rows: impl Iterator<Item = rusqlite::Result<RowTuple>>,
    ) -> RepositoryResult<Vec<DeliveryRecord>> {
        let mut records = Vec::new();
        for row in rows {
            let (record_id, order_id, order_name, line_no, batch_id, fields_json, status_text, created_at, updated_at) =
                row?;

            let flat: FlatRecord = serde_json::from_str(&fields_json)?;
            let status: DispatchStatus =
                status_text
                    .parse()
                    .map_err(|message| RepositoryError::FieldValueError {
                        field: format!("{}.status", record_id),
                        message,
                    })?;

            let created_at = chrono::NaiveDateTime::parse_from_str(&created_at, "%Y-%m-%d %H:%M:%S")
                .map_err(|e| RepositoryError::FieldValueError {
                    field: format!("{}.created_at", record_id),
                    message: e.to_string(),
                })?
                .and_utc();
            let updated_at = chrono::NaiveDateTime::parse_from_str(&updated_at, "%Y-%m-%d %H:%M:%S")
                .map_err(|e| RepositoryError::FieldValueError {
                    field: format!("{}.updated_at", record_id),
                    message: e.to_string(),
                })?
                .and_utc();

            records.push(DeliveryRecord {
                record_id,
                order_id,
                order_name,
                line_no,
                batch_id,
                flat,
                status,
                created_at,
                updated_at,
            });
        }
        Ok(records)
    }
}
