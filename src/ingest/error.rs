// ==========================================
// Shopify 订单配送桥接系统 - 摄入层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 转换器本身永不报错;这里的错误全部来自
//       载荷解析、订单源 I/O 与落库
// ==========================================

use thiserror::Error;

use crate::repository::error::RepositoryError;

/// 摄入层错误类型
#[derive(Error, Debug)]
pub enum IngestError {
    // ===== 载荷解析错误 =====
    #[error("订单载荷解析失败: {0}")]
    PayloadParseError(String),

    // ===== 订单源错误 =====
    #[error("订单源拉取失败: {0}")]
    SourceError(String),

    // ===== 配置错误 =====
    #[error("配置读取失败: {0}")]
    ConfigError(String),

    // ===== 仓储错误 =====
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

// 实现 From<serde_json::Error>
impl From<serde_json::Error> for IngestError {
    fn from(err: serde_json::Error) -> Self {
        IngestError::PayloadParseError(err.to_string())
    }
}

/// Result 类型别名
pub type IngestResult<T> = Result<T, IngestError>;
