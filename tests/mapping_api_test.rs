// ==========================================
// Shopify 订单配送桥接系统 - 映射配置 API 测试
// ==========================================
// 覆盖: 播种、增删改查、校验拦截、整体替换
// ==========================================


use detrack_bridge::api::{ApiError, MappingApi};
use detrack_bridge::domain::mapping::{ExtractProcessingMapping, ExtractRecipe, GlobalFieldMapping};
use test_helpers::open_shared_conn;

fn setup_api() -> (tempfile::NamedTempFile, MappingApi) {
    let (temp_file, db_path) = test_helpers::create_test_db().expect("创建测试数据库失败");
    let conn = open_shared_conn(&db_path).expect("打开连接失败");
    (temp_file, MappingApi::new(conn))
}

#[test]
fn test_seed_defaults_only_on_empty_db() {
    let (_temp, api) = setup_api();

    assert!(api.seed_defaults_if_empty().expect("播种失败"));
    let sets = api.list_mappings().expect("查询失败");
    assert!(!sets.global.is_empty());
    assert!(!sets.extract.is_empty());

    // 第二次播种跳过
    assert!(!api.seed_defaults_if_empty().expect("播种失败"));
}

#[test]
fn test_upsert_and_delete_roundtrip() {
    let (_temp, api) = setup_api();

    api.upsert_global(GlobalFieldMapping::new("zone", &["shipping_address.city"]))
        .expect("写入失败");
    // 覆盖写
    api.upsert_global(
        GlobalFieldMapping::new("zone", &["shipping_address.province"]).with_separator(" | "),
    )
    .expect("覆盖失败");

    let sets = api.list_mappings().expect("查询失败");
    assert_eq!(sets.global.len(), 1);
    assert_eq!(sets.global[0].source_field_paths, vec!["shipping_address.province"]);
    assert_eq!(sets.global[0].join_separator, " | ");

    api.upsert_extract(ExtractProcessingMapping::new(
        "leadTime",
        ExtractRecipe::Time,
        "order.tags",
        Some("time_window"),
    ))
    .expect("写入失败");

    api.delete_global("zone").expect("删除失败");
    api.delete_extract("leadTime").expect("删除失败");
    let sets = api.list_mappings().expect("查询失败");
    assert!(sets.global.is_empty());
    assert!(sets.extract.is_empty());

    // 删除不存在的规则 → NotFound
    assert!(matches!(
        api.delete_global("zone"),
        Err(ApiError::NotFound(_))
    ));
}

#[test]
fn test_save_all_rejects_cross_set_duplicate() {
    let (_temp, api) = setup_api();

    let global = vec![GlobalFieldMapping::new("deliveryDate", &["name"])];
    let extract = vec![ExtractProcessingMapping::new(
        "deliveryDate",
        ExtractRecipe::Date,
        "order.tags",
        Some("dd/mm/yyyy"),
    )];

    match api.save_all(global, extract) {
        Err(ApiError::ValidationFailed { violations }) => {
            assert_eq!(violations.len(), 1);
            assert_eq!(violations[0].field, "deliveryDate");
        }
        other => panic!("应拦截跨集重复, 实际: {:?}", other.map(|_| ())),
    }

    // 拒绝保存后库里仍为空
    let sets = api.list_mappings().expect("查询失败");
    assert!(sets.global.is_empty());
    assert!(sets.extract.is_empty());
}

#[test]
fn test_save_all_replaces_existing_rules() {
    let (_temp, api) = setup_api();
    api.seed_defaults_if_empty().expect("播种失败");

    let global = vec![GlobalFieldMapping::new("recipientName", &[
        "shipping_address.first_name",
        "shipping_address.last_name",
    ])];
    let extract = vec![ExtractProcessingMapping::new(
        "window",
        ExtractRecipe::Time,
        "order.tags",
        Some("time_window"),
    )];
    api.save_all(global, extract).expect("保存失败");

    let sets = api.list_mappings().expect("查询失败");
    assert_eq!(sets.global.len(), 1);
    assert_eq!(sets.extract.len(), 1);
    assert_eq!(sets.global[0].destination_field, "recipientName");
    assert_eq!(sets.extract[0].recipe, ExtractRecipe::Time);
}
