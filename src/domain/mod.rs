// ==========================================
// Shopify 订单配送桥接系统 - 领域层
// ==========================================
// 职责: 实体与类型定义,不含业务流程
// ==========================================

pub mod defaults;
pub mod mapping;
pub mod order;
pub mod record;
pub mod types;

// 重导出核心类型
pub use mapping::{ExtractProcessingMapping, ExtractRecipe, GlobalFieldMapping};
pub use order::{LineItem, OrderAddress, OrderCustomer, SourceOrder};
pub use record::{DeliveryRecord, FlatRecord};
pub use types::{DateTagKind, DispatchStatus};
