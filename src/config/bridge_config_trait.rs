// ==========================================
// Shopify 订单配送桥接系统 - 配置读取接口
// ==========================================
// 职责: 摄入/派发流程依赖的配置项读取抽象
// 用途: 生产实现为 ConfigManager,测试注入 Mock
// 红线: 转换器本身不读配置——配置只进入摄入/派发层
// ==========================================

use async_trait::async_trait;
use std::error::Error;

/// 桥接服务配置读取器
#[async_trait]
pub trait BridgeConfigReader {
    /// 配送商 API 基础地址
    async fn get_detrack_base_url(&self) -> Result<String, Box<dyn Error>>;

    /// 配送商 API 密钥(已解析明文,由外部配置存储负责来源)
    async fn get_detrack_api_key(&self) -> Result<String, Box<dyn Error>>;

    /// 店面 API 域名(如 example.myshopify.com)
    async fn get_shop_domain(&self) -> Result<String, Box<dyn Error>>;

    /// 轮询间隔(分钟)
    async fn get_poll_interval_minutes(&self) -> Result<i64, Box<dyn Error>>;

    /// 轮询回看窗口(小时): 每次拉取 updated_at 在该窗口内的订单
    async fn get_poll_lookback_hours(&self) -> Result<i64, Box<dyn Error>>;
}
