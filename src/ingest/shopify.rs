// ==========================================
// Shopify 订单配送桥接系统 - 店面载荷解析
// ==========================================
// 职责: webhook 推送体 / 轮询响应体 → SourceOrder
// 红线: 只做反序列化,不做鉴权(HMAC 校验属于外层接入件)
// ==========================================

use serde::Deserialize;

use crate::domain::order::SourceOrder;
use crate::ingest::error::IngestResult;

/// 轮询响应体: {"orders": [...]}
#[derive(Debug, Deserialize)]
struct OrdersEnvelope {
    #[serde(default)]
    orders: Vec<SourceOrder>,
}

/// 解析单个订单载荷(orders/create、orders/updated webhook 推送体)
pub fn parse_order_payload(body: &str) -> IngestResult<SourceOrder> {
    let order: SourceOrder = serde_json::from_str(body)?;
    Ok(order)
}

/// 解析订单列表载荷(Orders API 轮询响应体)
pub fn parse_orders_payload(body: &str) -> IngestResult<Vec<SourceOrder>> {
    let envelope: OrdersEnvelope = serde_json::from_str(body)?;
    Ok(envelope.orders)
}
