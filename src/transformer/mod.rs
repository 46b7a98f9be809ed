// ==========================================
// Shopify 订单配送桥接系统 - 订单转换层
// ==========================================
// 职责: 纯函数转换——源订单 + 映射规则 → 扁平配送记录
// 红线: 本层无 I/O、无共享状态、不读配置;
//       一切取值失败降级为空串,永不抛错
// ==========================================

// 模块声明
pub mod assembler;
pub mod extract;
pub mod global;
pub mod path;
pub mod phone;
pub mod tags;
pub mod timewindow;

// 重导出核心类型
pub use assembler::OrderTransformer;
pub use extract::ExtractEngine;
pub use global::GlobalMappingEngine;
pub use phone::normalize_phone;
pub use tags::{first_plain_date, split_tags, tag_date};
pub use timewindow::{
    bucket_named_window, bucket_release_time, completion_time_window, job_release_time,
    time_window_literal,
};
