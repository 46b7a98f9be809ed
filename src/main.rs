// ==========================================
// Shopify 订单配送桥接系统 - 管理入口
// ==========================================
// 职责: 建库、播种默认映射、导出配置快照
// 说明: webhook 接收与轮询调度由外层接入件挂载本库,
//       此入口只负责离线管理动作
// ==========================================

use std::sync::{Arc, Mutex};

use detrack_bridge::api::MappingApi;
use detrack_bridge::config::ConfigManager;
use detrack_bridge::db;
use detrack_bridge::logging;

/// 默认数据库路径: <数据目录>/detrack-bridge/bridge.db
fn default_db_path() -> String {
    let base = dirs::data_dir().unwrap_or_else(|| std::path::PathBuf::from("."));
    let dir = base.join("detrack-bridge");
    if let Err(e) = std::fs::create_dir_all(&dir) {
        tracing::warn!(error = %e, "创建数据目录失败,退回当前目录");
        return "bridge.db".to_string();
    }
    dir.join("bridge.db").to_string_lossy().to_string()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志系统
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", detrack_bridge::APP_NAME);
    tracing::info!("系统版本: {}", detrack_bridge::VERSION);
    tracing::info!("==================================================");

    // 数据库路径: 第一个位置参数,缺省用数据目录
    let db_path = std::env::args().nth(1).unwrap_or_else(default_db_path);
    tracing::info!("使用数据库: {}", db_path);

    // 建库(幂等)
    let conn = db::open_sqlite_connection(&db_path)?;
    db::init_schema(&conn)?;
    tracing::info!("数据库表已就绪");

    let conn = Arc::new(Mutex::new(conn));

    // 播种默认映射(仅空库)
    let mapping_api = MappingApi::new(conn.clone());
    if mapping_api.seed_defaults_if_empty()? {
        tracing::info!("默认映射规则播种完成");
    } else {
        tracing::info!("映射规则已存在,跳过播种");
    }

    // 打印配置快照,便于核对部署参数
    let config = ConfigManager::from_connection(conn);
    tracing::info!("当前配置快照:\n{}", config.get_config_snapshot()?);

    Ok(())
}
