// ==========================================
// Shopify 订单配送桥接系统 - 领域类型定义
// ==========================================
// 职责: 跨层共享的小枚举
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 派发状态 (Dispatch Status)
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DispatchStatus {
    Pending,    // 已转换,待派发
    Dispatched, // 已推送至配送商
    Failed,     // 派发失败(由调用方标记)
}

impl fmt::Display for DispatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchStatus::Pending => write!(f, "PENDING"),
            DispatchStatus::Dispatched => write!(f, "DISPATCHED"),
            DispatchStatus::Failed => write!(f, "FAILED"),
        }
    }
}

impl std::str::FromStr for DispatchStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(DispatchStatus::Pending),
            "DISPATCHED" => Ok(DispatchStatus::Dispatched),
            "FAILED" => Ok(DispatchStatus::Failed),
            other => Err(format!("未知派发状态: {}", other)),
        }
    }
}

// ==========================================
// 日期标签类型 (Date Tag Kind)
// ==========================================
// 用途: 标签日期提取的关键词选择(配送日 / 备货日)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateTagKind {
    Delivery,
    Processing,
}

impl DateTagKind {
    /// 标签内做大小写不敏感子串匹配的关键词
    pub fn keyword(&self) -> &'static str {
        match self {
            DateTagKind::Delivery => "delivery",
            DateTagKind::Processing => "processing",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_status_roundtrip() {
        for s in [
            DispatchStatus::Pending,
            DispatchStatus::Dispatched,
            DispatchStatus::Failed,
        ] {
            let text = s.to_string();
            assert_eq!(text.parse::<DispatchStatus>().expect("应可解析"), s);
        }
    }
}
