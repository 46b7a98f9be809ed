// ==========================================
// Shopify 订单配送桥接系统 - 摄入管道集成测试
// ==========================================
// 覆盖: webhook 单订单处理、查重跳过、批量隔离、轮询周期
// ==========================================


use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::error::Error;

use detrack_bridge::api::MappingApi;
use detrack_bridge::config::BridgeConfigReader;
use detrack_bridge::domain::order::SourceOrder;
use detrack_bridge::ingest::{IngestOutcome, IngestPipeline, OrderSource};
use detrack_bridge::repository::DeliveryRecordRepository;
use test_helpers::{line_item, open_shared_conn, sample_order};

// ==========================================
// MockOrderSource - 测试用订单源
// ==========================================
struct MockOrderSource {
    orders: Vec<SourceOrder>,
}

#[async_trait]
impl OrderSource for MockOrderSource {
    async fn fetch_orders_updated_since(
        &self,
        _since: DateTime<Utc>,
    ) -> Result<Vec<SourceOrder>, Box<dyn Error>> {
        Ok(self.orders.clone())
    }
}

// ==========================================
// MockConfigReader - 测试用配置读取器
// ==========================================
struct MockConfigReader;

#[async_trait]
impl BridgeConfigReader for MockConfigReader {
    async fn get_detrack_base_url(&self) -> Result<String, Box<dyn Error>> {
        Ok("https://app.detrack.com/api/v2".to_string())
    }

    async fn get_detrack_api_key(&self) -> Result<String, Box<dyn Error>> {
        Ok("test-key".to_string())
    }

    async fn get_shop_domain(&self) -> Result<String, Box<dyn Error>> {
        Ok("test-shop.myshopify.com".to_string())
    }

    async fn get_poll_interval_minutes(&self) -> Result<i64, Box<dyn Error>> {
        Ok(10)
    }

    async fn get_poll_lookback_hours(&self) -> Result<i64, Box<dyn Error>> {
        Ok(24)
    }
}

/// 建库 + 播种默认映射 + 构造管道
fn setup_pipeline() -> (tempfile::NamedTempFile, IngestPipeline, DeliveryRecordRepository) {
    let (temp_file, db_path) = test_helpers::create_test_db().expect("创建测试数据库失败");
    let conn = open_shared_conn(&db_path).expect("打开连接失败");

    let mapping_api = MappingApi::new(conn.clone());
    mapping_api.seed_defaults_if_empty().expect("播种默认映射失败");

    let pipeline = IngestPipeline::new(conn.clone());
    let record_repo = DeliveryRecordRepository::new(conn);
    (temp_file, pipeline, record_repo)
}

#[test]
fn test_process_order_persists_one_record_per_line_item() {
    let (_temp, pipeline, record_repo) = setup_pipeline();

    let order = sample_order(
        2001,
        "Morning, 22/07/2025",
        vec![line_item("A", "SKU-A", 2, None), line_item("B", "SKU-B", 1, None)],
    );
    let outcome = pipeline.process_order(&order, "batch-1").expect("处理失败");
    assert_eq!(outcome, IngestOutcome::Processed(2));

    let records = record_repo.find_by_order_id(2001).expect("查询失败");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].line_no, 1);
    assert_eq!(records[1].line_no, 2);
    assert_eq!(records[0].flat.get("jobReleaseTime"), "09:00");
    assert_eq!(records[0].flat.get("deliveryDate"), "");
    assert_eq!(records[0].flat.get("phoneNumber"), "98765432");
}

#[test]
fn test_duplicate_order_skipped() {
    let (_temp, pipeline, _repo) = setup_pipeline();

    let order = sample_order(2002, "", vec![line_item("A", "SKU-A", 1, None)]);
    assert_eq!(
        pipeline.process_order(&order, "batch-1").expect("处理失败"),
        IngestOutcome::Processed(1)
    );
    // webhook 重发: 同一订单再次进入 → 跳过
    assert_eq!(
        pipeline.process_order(&order, "batch-2").expect("处理失败"),
        IngestOutcome::Skipped
    );
}

#[test]
fn test_all_items_removed_is_no_deliverable() {
    let (_temp, pipeline, record_repo) = setup_pipeline();

    let order = sample_order(
        2003,
        "22/07/2025",
        vec![line_item("A", "SKU-A", 2, Some(0)), line_item("B", "SKU-B", 1, Some(0))],
    );
    assert_eq!(
        pipeline.process_order(&order, "batch-1").expect("处理失败"),
        IngestOutcome::NoDeliverable
    );
    assert!(record_repo.find_by_order_id(2003).expect("查询失败").is_empty());
}

#[test]
fn test_webhook_payload_roundtrip() {
    let (_temp, pipeline, record_repo) = setup_pipeline();

    let body = r##"{
        "id": 2004,
        "name": "#SG2004",
        "tags": "delivery:2025-08-01, 14:00-18:00",
        "line_items": [
            {"sku": "BK-500", "title": "Bak Kwa", "quantity": 2}
        ]
    }"##;
    let outcome = pipeline.process_webhook_payload(body).expect("处理失败");
    assert_eq!(outcome, IngestOutcome::Processed(1));

    let records = record_repo.find_by_order_id(2004).expect("查询失败");
    assert_eq!(records[0].flat.get("deliveryDate"), "01/08/2025");
    assert_eq!(records[0].flat.get("deliveryCompletionTimeWindow"), "Afternoon");

    // 畸形载荷是错误,不是 panic
    assert!(pipeline.process_webhook_payload("not json").is_err());
}

#[test]
fn test_batch_isolates_per_order_results() {
    let (_temp, pipeline, _repo) = setup_pipeline();

    let orders = vec![
        sample_order(2005, "", vec![line_item("A", "SKU-A", 1, None)]),
        sample_order(2005, "", vec![line_item("A", "SKU-A", 1, None)]), // 批内重复
        sample_order(2006, "", vec![line_item("B", "SKU-B", 1, Some(0))]),
    ];
    let summary = pipeline.process_batch(&orders);
    assert_eq!(summary.total, 3);
    assert_eq!(summary.processed_orders, 1);
    assert_eq!(summary.records_written, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.no_deliverable, 1);
    assert_eq!(summary.failed, 0);
}

#[tokio::test]
async fn test_run_poll_cycle_with_mock_source() {
    let (_temp, pipeline, record_repo) = setup_pipeline();

    let source = MockOrderSource {
        orders: vec![
            sample_order(2007, "Morning", vec![line_item("A", "SKU-A", 1, None)]),
            sample_order(2008, "Night", vec![line_item("B", "SKU-B", 2, None)]),
        ],
    };
    let summary = pipeline
        .run_poll_cycle(&source, &MockConfigReader)
        .await
        .expect("轮询失败");
    assert_eq!(summary.processed_orders, 2);
    assert_eq!(summary.records_written, 2);

    assert!(record_repo.exists_for_order(2007).expect("查询失败"));
    assert!(record_repo.exists_for_order(2008).expect("查询失败"));
}
