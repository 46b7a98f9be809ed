// ==========================================
// Shopify 订单配送桥接系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 店面订单 → 字段映射 → 配送商派单的桥接服务
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 转换层 - 订单 → 扁平记录(纯函数核心)
pub mod transformer;

// 摄入层 - webhook / 轮询
pub mod ingest;

// 派发层 - 配送商载荷构建
pub mod dispatch;

// 数据仓储层 - 数据访问
pub mod repository;

// 配置层 - 系统配置
pub mod config;

// API 层 - 业务接口
pub mod api;

// 数据库基础设施(连接初始化/PRAGMA/建表统一)
pub mod db;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    DeliveryRecord, DispatchStatus, ExtractProcessingMapping, ExtractRecipe, FlatRecord,
    GlobalFieldMapping, LineItem, SourceOrder,
};

// 转换器
pub use transformer::{ExtractEngine, GlobalMappingEngine, OrderTransformer};

// 摄入
pub use ingest::{IngestOutcome, IngestPipeline, IngestSummary, OrderSource};

// 派发
pub use dispatch::{DetrackJob, DetrackJobItem};

// API
pub use api::{MappingApi, RecordApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "Shopify 订单配送桥接系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
