// ==========================================
// Shopify 订单配送桥接系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout,减少并发写入时的偶发 busy 错误
// - 建库语句集中在一处,供主程序与测试共用
// ==========================================

use rusqlite::Connection;
use std::time::Duration;

/// 默认 busy_timeout(毫秒)
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明:
/// - foreign_keys 需要"每个连接"单独开启
/// - busy_timeout 需要"每个连接"单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 初始化数据库表(幂等)
///
/// 表:
/// - config_kv: 键值配置(API 密钥、轮询参数等已解析明文值)
/// - global_field_mapping / extract_processing_mapping: 两套映射规则
/// - delivery_record: 转换产出的配送记录
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id   TEXT NOT NULL,
            key        TEXT NOT NULL,
            value      TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS global_field_mapping (
            destination_field  TEXT PRIMARY KEY,
            source_field_paths TEXT NOT NULL,            -- JSON 数组
            join_separator     TEXT NOT NULL DEFAULT ' ',
            no_mapping         INTEGER NOT NULL DEFAULT 0,
            updated_at         TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS extract_processing_mapping (
            destination_field TEXT PRIMARY KEY,
            recipe            TEXT NOT NULL,
            source_field      TEXT NOT NULL,
            format            TEXT,
            updated_at        TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS delivery_record (
            record_id   TEXT PRIMARY KEY,
            order_id    INTEGER NOT NULL,
            order_name  TEXT NOT NULL,
            line_no     INTEGER NOT NULL,
            batch_id    TEXT NOT NULL,
            fields_json TEXT NOT NULL,
            status      TEXT NOT NULL DEFAULT 'PENDING',
            created_at  TEXT NOT NULL,
            updated_at  TEXT NOT NULL,
            UNIQUE (order_id, line_no)
        );

        CREATE INDEX IF NOT EXISTS idx_delivery_record_order
            ON delivery_record (order_id);
        CREATE INDEX IF NOT EXISTS idx_delivery_record_status
            ON delivery_record (status);
        "#,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_schema_idempotent() {
        let conn = Connection::open_in_memory().expect("打开内存库失败");
        configure_sqlite_connection(&conn).expect("PRAGMA 配置失败");
        init_schema(&conn).expect("首次建表失败");
        init_schema(&conn).expect("重复建表应幂等");

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name IN
                 ('config_kv','global_field_mapping','extract_processing_mapping','delivery_record')",
                [],
                |row| row.get(0),
            )
            .expect("查询表失败");
        assert_eq!(count, 4);
    }
}
