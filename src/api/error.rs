// ==========================================
// Shopify 订单配送桥接系统 - API 层错误类型
// ==========================================
// 职责: 定义 API 层错误类型,转换 Repository 错误为用户可读消息
// ==========================================

use thiserror::Error;

use crate::repository::error::RepositoryError;

/// 校验违规项(返回给看板逐条展示)
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ValidationViolation {
    pub field: String,
    pub message: String,
}

/// API 层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ===== 业务规则错误 =====
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("映射规则校验未通过: {}项违规", .violations.len())]
    ValidationFailed { violations: Vec<ValidationViolation> },

    // ===== 导出错误 =====
    #[error("CSV 导出失败: {0}")]
    CsvExportError(String),

    // ===== 底层错误 =====
    #[error("仓储错误: {0}")]
    Repository(String),
}

// 实现 From<RepositoryError>
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{} (id={})", entity, id))
            }
            other => ApiError::Repository(other.to_string()),
        }
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ApiError {
    fn from(err: csv::Error) -> Self {
        ApiError::CsvExportError(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
