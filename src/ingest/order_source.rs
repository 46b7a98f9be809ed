// ==========================================
// Shopify 订单配送桥接系统 - 订单源接口
// ==========================================
// 职责: 轮询拉取订单的抽象,隔离 HTTP 客户端实现
// 用途: 生产实现包装 Orders API(外层接入件),测试注入内存 Mock
// ==========================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::error::Error;

use crate::domain::order::SourceOrder;

/// 订单源: 按更新时间窗口批量拉取订单
#[async_trait]
pub trait OrderSource {
    /// 拉取 updated_at >= since 的订单,按更新时间升序
    async fn fetch_orders_updated_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<SourceOrder>, Box<dyn Error>>;
}
