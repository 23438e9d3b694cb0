// ==========================================
// 投影层端到端测试
// ==========================================
// 测试目标: load → project 全链路与通用不变量
// 覆盖范围: 汇总守恒/快照一致性/比率边界/排名完整性/
//           空输入/全零销售/告警透出/目录可序列化
// ==========================================

use material_roi_analysis::{
    logging, AnalysisContext, AnalysisError, FilterPredicate, RawTable, SchemaError,
    WarningCounters,
};

// ==========================================
// 测试辅助函数
// ==========================================

fn shipment_headers() -> Vec<&'static str> {
    vec![
        "shipment_month",
        "region",
        "province",
        "city",
        "distributor_name",
        "customer_code",
        "material_code",
        "material_name",
        "material_quantity",
        "applicant",
    ]
}

fn sales_headers() -> Vec<&'static str> {
    vec![
        "shipment_month",
        "region",
        "province",
        "city",
        "distributor_name",
        "customer_code",
        "product_code",
        "product_name",
        "quantity_cases",
        "unit_price_per_case",
        "applicant",
    ]
}

fn price_table() -> RawTable {
    let mut t = RawTable::new(vec!["material_code", "unit_price"]);
    t.push_row(vec!["M001", "3"]);
    t.push_row(vec!["M002", "10"]);
    t
}

/// 两大区、三客户、两物料的小场景
fn sample_context() -> AnalysisContext {
    let mut shipments = RawTable::new(shipment_headers());
    shipments.push_row(vec![
        "2024-01", "华东", "浙江", "杭州", "杭州糖酒", "C001", "M001", "货架贴", "100", "张三",
    ]);
    shipments.push_row(vec![
        "2024-01", "华东", "浙江", "宁波", "宁波糖酒", "C002", "M002", "堆头", "10", "张三",
    ]);
    shipments.push_row(vec![
        "2024-02", "华北", "河北", "石家庄", "石家庄糖酒", "C003", "M001", "货架贴", "50", "李四",
    ]);

    let mut sales = RawTable::new(sales_headers());
    sales.push_row(vec![
        "2024-01", "华东", "浙江", "杭州", "杭州糖酒", "C001", "P001", "水果糖", "100", "10",
        "张三",
    ]);
    sales.push_row(vec![
        "2024-01", "华东", "浙江", "宁波", "宁波糖酒", "C002", "P002", "奶糖", "20", "25", "张三",
    ]);
    sales.push_row(vec![
        "2024-02", "华北", "河北", "石家庄", "石家庄糖酒", "C003", "P001", "水果糖", "30", "10",
        "李四",
    ]);

    AnalysisContext::load(&shipments, &sales, &price_table()).unwrap()
}

// ==========================================
// 通用不变量
// ==========================================

#[test]
fn test_sum_conservation_across_dimensions() {
    logging::init_test();

    let catalogue = sample_context().project(&FilterPredicate::all());

    // 范围总量: 费用 100×3 + 10×10 + 50×3 = 550, 销售 1000 + 500 + 300 = 1800
    assert_eq!(catalogue.total_material_cost, 550.0);
    assert_eq!(catalogue.total_sales, 1800.0);

    for (name, metrics) in [
        ("region", &catalogue.region_metrics),
        ("province", &catalogue.province_metrics),
        ("time", &catalogue.time_metrics),
        ("salesperson", &catalogue.salesperson_metrics),
    ] {
        let cost: f64 = metrics.iter().map(|m| m.material_cost).sum();
        let sales: f64 = metrics.iter().map(|m| m.sales_amount).sum();
        assert!((cost - 550.0).abs() < 1e-9, "{name} 费用守恒");
        assert!((sales - 1800.0).abs() < 1e-9, "{name} 销售守恒");
    }
}

#[test]
fn test_snapshot_consistency() {
    logging::init_test();

    let catalogue = sample_context().project(&FilterPredicate::all());

    let region_sales: f64 = catalogue.region_metrics.iter().map(|m| m.sales_amount).sum();
    let customer_sales: f64 = catalogue
        .customer_metrics
        .iter()
        .map(|m| m.sales_amount)
        .sum();
    assert!((region_sales - catalogue.total_sales).abs() < 1e-9);
    assert!((customer_sales - catalogue.total_sales).abs() < 1e-9);
}

#[test]
fn test_ratio_and_score_bounds() {
    logging::init_test();

    let catalogue = sample_context().project(&FilterPredicate::all());

    for m in &catalogue.customer_metrics {
        assert!((0.0..=1000.0).contains(&m.fee_ratio));
        assert!((0.0..=100.0).contains(&m.potential_score));
    }
    for m in &catalogue.region_metrics {
        assert!((0.0..=1000.0).contains(&m.fee_ratio));
    }
}

#[test]
fn test_rank_totality() {
    logging::init_test();

    let catalogue = sample_context().project(&FilterPredicate::all());

    let mut ranks: Vec<u32> = catalogue
        .customer_metrics
        .iter()
        .map(|m| m.value_rank)
        .collect();
    ranks.sort_unstable();
    assert_eq!(ranks.first(), Some(&1));
    assert_eq!(ranks.len(), 3);
}

#[test]
fn test_projection_idempotent() {
    logging::init_test();

    let context = sample_context();
    let predicate = FilterPredicate::all().with_regions(["华东"]);

    let a = serde_json::to_value(context.project(&predicate)).unwrap();
    let b = serde_json::to_value(context.project(&predicate)).unwrap();
    assert_eq!(a, b);
}

// ==========================================
// 边界行为
// ==========================================

#[test]
fn test_empty_input_yields_empty_catalogue() {
    logging::init_test();

    let shipments = RawTable::new(shipment_headers());
    let sales = RawTable::new(sales_headers());
    let context = AnalysisContext::load(&shipments, &sales, &price_table()).unwrap();

    let catalogue = context.project(&FilterPredicate::all());
    assert!(catalogue.region_metrics.is_empty());
    assert!(catalogue.customer_metrics.is_empty());
    assert!(catalogue.material_product_association.is_empty());
    assert!(catalogue.anomaly_list.is_empty());
    assert!(catalogue.segmentation_summary.is_empty());
    assert_eq!(catalogue.regression_stats.sample_count, 0);
    assert_eq!(catalogue.total_sales, 0.0);
}

#[test]
fn test_empty_scope_is_not_an_error() {
    logging::init_test();

    let catalogue = sample_context().project(&FilterPredicate::all().with_regions(["西北"]));
    assert!(catalogue.customer_metrics.is_empty());
    assert_eq!(catalogue.global_fee_ratio, 0.0);
}

#[test]
fn test_all_zero_sales_all_zero_fee_ratios() {
    logging::init_test();

    let mut shipments = RawTable::new(shipment_headers());
    shipments.push_row(vec![
        "2024-01", "华东", "浙江", "杭州", "杭州糖酒", "C001", "M001", "货架贴", "100", "张三",
    ]);
    let mut sales = RawTable::new(sales_headers());
    sales.push_row(vec![
        "2024-01", "华东", "浙江", "杭州", "杭州糖酒", "C001", "P001", "水果糖", "0", "10", "张三",
    ]);

    let context = AnalysisContext::load(&shipments, &sales, &price_table()).unwrap();
    let catalogue = context.project(&FilterPredicate::all());

    assert_eq!(catalogue.global_fee_ratio, 0.0);
    for m in &catalogue.customer_metrics {
        assert_eq!(m.fee_ratio, 0.0);
    }
}

#[test]
fn test_missing_column_is_fatal() {
    logging::init_test();

    let shipments = RawTable::new(vec!["region", "province"]);
    let sales = RawTable::new(sales_headers());

    let err = AnalysisContext::load(&shipments, &sales, &price_table()).unwrap_err();
    assert!(matches!(
        err,
        AnalysisError::Schema(SchemaError::MissingColumns { .. })
    ));
}

// ==========================================
// 告警透出
// ==========================================

#[test]
fn test_warnings_surfaced_in_catalogue() {
    logging::init_test();

    let mut shipments = RawTable::new(shipment_headers());
    shipments.push_row(vec![
        "2024-01", "华东", "浙江", "杭州", "杭州糖酒", "C001", "M001", "货架贴", "100", "张三",
    ]);
    // 数量无法解析 → 整行丢弃
    shipments.push_row(vec![
        "2024-01", "华东", "浙江", "杭州", "杭州糖酒", "C001", "M001", "货架贴", "十个", "张三",
    ]);
    // 月份无法解析 → 行保留,计数
    shipments.push_row(vec![
        "某月", "华东", "浙江", "杭州", "杭州糖酒", "C001", "M001", "货架贴", "5", "张三",
    ]);
    // 价格表缺失编码 → 费用按 0,计数
    shipments.push_row(vec![
        "2024-01", "华东", "浙江", "杭州", "杭州糖酒", "C001", "M404", "未知物料", "5", "张三",
    ]);

    let sales = RawTable::new(sales_headers());
    let context = AnalysisContext::load(&shipments, &sales, &price_table()).unwrap();

    // 数量无法解析的行被丢弃,其余三行驻留
    assert_eq!(context.record_counts(), (3, 0));

    let expected = WarningCounters {
        coercion_dropped_rows: 1,
        coercion_bad_dates: 1,
        price_lookup_misses: 1,
    };
    assert_eq!(context.warnings(), expected);

    let catalogue = context.project(&FilterPredicate::all());
    assert_eq!(catalogue.warnings, expected);
}

#[test]
fn test_catalogue_serializable() {
    logging::init_test();

    let catalogue = sample_context().project(&FilterPredicate::all());
    let json = serde_json::to_value(&catalogue).unwrap();

    assert!(json.get("region_metrics").is_some());
    assert!(json.get("regression_stats").is_some());
    assert!(json.get("warnings").is_some());
    // 分层标签以中文序列化
    let summary = json.get("segmentation_summary").unwrap();
    let text = summary.to_string();
    assert!(text.contains("客户"), "分层标签应为中文: {text}");
}
