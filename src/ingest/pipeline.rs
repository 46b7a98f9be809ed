// ==========================================
// Shopify 订单配送桥接系统 - 订单摄入管道
// ==========================================
// 职责: 订单源 → 转换器 → 配送记录落库的编排
// 流程: 查重 → 读映射 → 转换 → 批量落库
// 红线: 逐订单隔离错误——单个订单失败只记日志计数,
//       不中断整批摄入
// ==========================================

use chrono::{Duration, Utc};
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::config::BridgeConfigReader;
use crate::domain::order::SourceOrder;
use crate::domain::record::DeliveryRecord;
use crate::domain::types::DispatchStatus;
use crate::ingest::error::{IngestError, IngestResult};
use crate::ingest::order_source::OrderSource;
use crate::ingest::shopify::parse_order_payload;
use crate::repository::{DeliveryRecordRepository, MappingRepository};
use crate::transformer::OrderTransformer;

// ==========================================
// 单订单摄入结果
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// 已转换并落库 n 条记录
    Processed(usize),
    /// 该订单已处理过,跳过
    Skipped,
    /// 行项目全部被移除,无可派送记录
    NoDeliverable,
}

// ==========================================
// 批量摄入汇总
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct IngestSummary {
    pub batch_id: String,
    pub total: usize,
    pub processed_orders: usize,
    pub records_written: usize,
    pub skipped: usize,
    pub no_deliverable: usize,
    pub failed: usize,
}

// ==========================================
// IngestPipeline - 订单摄入管道
// ==========================================
pub struct IngestPipeline {
    mapping_repo: MappingRepository,
    record_repo: DeliveryRecordRepository,
}

impl IngestPipeline {
    pub fn new(conn: Arc<Mutex<rusqlite::Connection>>) -> Self {
        Self {
            mapping_repo: MappingRepository::new(conn.clone()),
            record_repo: DeliveryRecordRepository::new(conn),
        }
    }

    /// 处理单个订单
    ///
    /// # 返回
    /// - Processed(n): 本次写入 n 条配送记录
    /// - Skipped: order_id 已有记录(webhook 重发/轮询窗口重叠)
    /// - NoDeliverable: 行项目全部被移除
    #[instrument(skip(self, order, batch_id), fields(order_id = order.id, order_name = %order.name))]
    pub fn process_order(
        &self,
        order: &SourceOrder,
        batch_id: &str,
    ) -> IngestResult<IngestOutcome> {
        // === 步骤 1: 查重(调用方契约: 转换前检查) ===
        if self.record_repo.exists_for_order(order.id)? {
            debug!("订单已处理,跳过");
            return Ok(IngestOutcome::Skipped);
        }

        // === 步骤 2: 读取两套映射规则 ===
        let global_mappings = self.mapping_repo.list_global()?;
        let extract_mappings = self.mapping_repo.list_extract()?;

        // === 步骤 3: 转换 ===
        let flats = OrderTransformer::transform(order, &global_mappings, &extract_mappings);
        if flats.is_empty() {
            info!("行项目全部被移除,无可派送记录");
            return Ok(IngestOutcome::NoDeliverable);
        }

        // === 步骤 4: 落库 ===
        let now = Utc::now();
        let has_line_items = !order.line_items.is_empty();
        let records: Vec<DeliveryRecord> = flats
            .into_iter()
            .enumerate()
            .map(|(idx, flat)| DeliveryRecord {
                record_id: Uuid::new_v4().to_string(),
                order_id: order.id,
                order_name: order.name.clone(),
                // 回退记录(订单无行项目)行序号记 0
                line_no: if has_line_items { idx as i64 + 1 } else { 0 },
                batch_id: batch_id.to_string(),
                flat,
                status: DispatchStatus::Pending,
                created_at: now,
                updated_at: now,
            })
            .collect();

        let count = records.len();
        self.record_repo.insert_batch(&records)?;
        info!(records = count, "订单转换完成");
        Ok(IngestOutcome::Processed(count))
    }

    /// 处理 webhook 推送体(解析 + 单订单处理)
    pub fn process_webhook_payload(&self, body: &str) -> IngestResult<IngestOutcome> {
        let order = parse_order_payload(body)?;
        let batch_id = Uuid::new_v4().to_string();
        self.process_order(&order, &batch_id)
    }

    /// 批量处理一组订单,逐订单隔离错误
    #[instrument(skip(self, orders), fields(batch_id, total = orders.len()))]
    pub fn process_batch(&self, orders: &[SourceOrder]) -> IngestSummary {
        let batch_id = Uuid::new_v4().to_string();
        let mut summary = IngestSummary {
            batch_id: batch_id.clone(),
            total: orders.len(),
            ..Default::default()
        };

        for order in orders {
            match self.process_order(order, &batch_id) {
                Ok(IngestOutcome::Processed(n)) => {
                    summary.processed_orders += 1;
                    summary.records_written += n;
                }
                Ok(IngestOutcome::Skipped) => summary.skipped += 1,
                Ok(IngestOutcome::NoDeliverable) => summary.no_deliverable += 1,
                Err(e) => {
                    // 单订单失败不中断整批
                    warn!(order_id = order.id, error = %e, "订单摄入失败");
                    summary.failed += 1;
                }
            }
        }

        info!(
            batch_id = %batch_id,
            processed = summary.processed_orders,
            records = summary.records_written,
            skipped = summary.skipped,
            no_deliverable = summary.no_deliverable,
            failed = summary.failed,
            "批量摄入完成"
        );
        summary
    }

    /// 执行一轮轮询: 按回看窗口拉取订单并批量摄入
    pub async fn run_poll_cycle(
        &self,
        source: &dyn OrderSource,
        config: &dyn BridgeConfigReader,
    ) -> IngestResult<IngestSummary> {
        let lookback_hours = config
            .get_poll_lookback_hours()
            .await
            .map_err(|e| IngestError::ConfigError(e.to_string()))?;
        let since = Utc::now() - Duration::hours(lookback_hours);

        let orders = source
            .fetch_orders_updated_since(since)
            .await
            .map_err(|e| {
                error!(error = %e, "订单源拉取失败");
                IngestError::SourceError(e.to_string())
            })?;

        info!(fetched = orders.len(), lookback_hours, "轮询拉取完成");
        Ok(self.process_batch(&orders))
    }
}
