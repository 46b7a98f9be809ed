// ==========================================
// Shopify 订单配送桥接系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// 红线: 这里只存"已解析的明文值",解析来源(环境变量/密钥库)
//       是部署问题,不进入代码
// ==========================================

use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

use crate::config::bridge_config_trait::BridgeConfigReader;
use crate::db::open_sqlite_connection;

// ===== 配置键 =====
pub const KEY_DETRACK_BASE_URL: &str = "detrack/base_url";
pub const KEY_DETRACK_API_KEY: &str = "detrack/api_key";
pub const KEY_SHOP_DOMAIN: &str = "shopify/shop_domain";
pub const KEY_POLL_INTERVAL_MINUTES: &str = "poll/interval_minutes";
pub const KEY_POLL_LOOKBACK_HOURS: &str = "poll/lookback_hours";

// ===== 默认值 =====
const DEFAULT_DETRACK_BASE_URL: &str = "https://app.detrack.com/api/v2";
const DEFAULT_POLL_INTERVAL_MINUTES: i64 = 10;
const DEFAULT_POLL_LOOKBACK_HOURS: i64 = 24;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 从 config_kv 表读取配置值(scope_id='global')
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 从 config_kv 表读取配置值,带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, Box<dyn Error>> {
        Ok(self
            .get_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// 写入配置值(scope_id='global',存在则覆盖)
    pub fn set_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            r#"INSERT INTO config_kv (scope_id, key, value, updated_at)
               VALUES ('global', ?1, ?2, datetime('now'))
               ON CONFLICT(scope_id, key) DO UPDATE SET
                   value = excluded.value,
                   updated_at = excluded.updated_at"#,
            params![key, value],
        )?;
        Ok(())
    }

    /// 获取所有配置的快照(JSON 格式)
    ///
    /// # 用途
    /// - 排查问题时一次性导出当前生效配置
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let mut config_map: HashMap<String, String> = HashMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string_pretty(&config_map)?)
    }
}

#[async_trait]
impl BridgeConfigReader for ConfigManager {
    async fn get_detrack_base_url(&self) -> Result<String, Box<dyn Error>> {
        self.get_config_or_default(KEY_DETRACK_BASE_URL, DEFAULT_DETRACK_BASE_URL)
    }

    async fn get_detrack_api_key(&self) -> Result<String, Box<dyn Error>> {
        self.get_config_value(KEY_DETRACK_API_KEY)?
            .ok_or_else(|| format!("配置缺失: {}", KEY_DETRACK_API_KEY).into())
    }

    async fn get_shop_domain(&self) -> Result<String, Box<dyn Error>> {
        self.get_config_value(KEY_SHOP_DOMAIN)?
            .ok_or_else(|| format!("配置缺失: {}", KEY_SHOP_DOMAIN).into())
    }

    async fn get_poll_interval_minutes(&self) -> Result<i64, Box<dyn Error>> {
        let raw = self.get_config_or_default(
            KEY_POLL_INTERVAL_MINUTES,
            &DEFAULT_POLL_INTERVAL_MINUTES.to_string(),
        )?;
        raw.parse::<i64>()
            .map_err(|_| format!("配置值格式错误 (key: {}): {}", KEY_POLL_INTERVAL_MINUTES, raw).into())
    }

    async fn get_poll_lookback_hours(&self) -> Result<i64, Box<dyn Error>> {
        let raw = self.get_config_or_default(
            KEY_POLL_LOOKBACK_HOURS,
            &DEFAULT_POLL_LOOKBACK_HOURS.to_string(),
        )?;
        raw.parse::<i64>()
            .map_err(|_| format!("配置值格式错误 (key: {}): {}", KEY_POLL_LOOKBACK_HOURS, raw).into())
    }
}
