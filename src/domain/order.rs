// ==========================================
// Shopify 订单配送桥接系统 - 源订单领域模型
// ==========================================
// 职责: 描述从店面平台接收的订单结构
// 用途: webhook 推送与轮询拉取共用的入口结构
// 红线: 缺失字段一律降级为 None/空,不在反序列化阶段报错
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// SourceOrder - 源订单
// ==========================================
// 说明: 字段名与 Shopify Order API 对齐,未知字段忽略
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceOrder {
    // ===== 标识 =====
    pub id: i64,                         // 平台订单ID
    #[serde(default)]
    pub name: String,                    // 展示单号（如 "#SG1024"）

    // ===== 订单级文本 =====
    #[serde(default)]
    pub tags: String,                    // 逗号分隔的标签串（配送日期/时段等写在这里）
    #[serde(default)]
    pub note: Option<String>,            // 订单备注（配送指示）
    #[serde(default)]
    pub email: Option<String>,           // 通知邮箱

    // ===== 地址 =====
    #[serde(default)]
    pub shipping_address: Option<OrderAddress>,
    #[serde(default)]
    pub billing_address: Option<OrderAddress>,

    // ===== 客户 =====
    #[serde(default)]
    pub customer: Option<OrderCustomer>,

    // ===== 行项目 =====
    #[serde(default)]
    pub line_items: Vec<LineItem>,
}

// ==========================================
// OrderAddress - 结构化地址
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderAddress {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub address1: Option<String>,
    #[serde(default)]
    pub address2: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

// ==========================================
// OrderCustomer - 客户摘要
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderCustomer {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

// ==========================================
// LineItem - 行项目
// ==========================================
// 红线: current_quantity 显式为 0 表示"编辑/退款后移除",
//       与初始 quantity 为 0 是两种不同语义
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub variant_title: Option<String>,
    #[serde(default)]
    pub quantity: i64,                   // 下单数量（≥0）
    #[serde(default)]
    pub current_quantity: Option<i64>,   // 编辑后剩余数量; Some(0) = 已移除
}

impl LineItem {
    /// 行项目是否已被移除（current_quantity 显式为 0）
    pub fn is_removed(&self) -> bool {
        self.current_quantity == Some(0)
    }

    /// 展示描述: "<title>" 或 "<title> - <variant_title>"
    pub fn display_description(&self) -> String {
        match self.variant_title.as_deref() {
            Some(v) if !v.is_empty() => format!("{} - {}", self.title, v),
            _ => self.title.clone(),
        }
    }
}

impl SourceOrder {
    /// 过滤后的有效行项目（剔除已移除项,保持原顺序）
    pub fn active_line_items(&self) -> Vec<&LineItem> {
        self.line_items.iter().filter(|li| !li.is_removed()).collect()
    }
}
