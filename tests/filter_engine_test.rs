// ==========================================
// 过滤引擎集成测试
// ==========================================
// 测试目标: 谓词语义的可组合性与哨兵匹配
// 覆盖范围: 幂等/组合等价/区间交换/哨兵命中空值行
// ==========================================

use chrono::NaiveDate;
use material_roi_analysis::filter::{FilterEngine, FilterPredicate};
use material_roi_analysis::{logging, ShipmentRecord, UNKNOWN_REGION};

// ==========================================
// 测试辅助函数
// ==========================================

fn shipment(region: &str, province: &str, month: Option<(i32, u32)>) -> ShipmentRecord {
    ShipmentRecord {
        shipment_month: month.and_then(|(y, m)| NaiveDate::from_ymd_opt(y, m, 1)),
        region: region.to_string(),
        province: province.to_string(),
        city: "城".to_string(),
        distributor_name: "经销商".to_string(),
        customer_code: "C001".to_string(),
        material_code: "M001".to_string(),
        material_name: "货架贴".to_string(),
        applicant: "张三".to_string(),
        material_quantity: 1.0,
        unit_price: 1.0,
        material_cost: 1.0,
    }
}

fn sample_rows() -> Vec<ShipmentRecord> {
    vec![
        shipment("华东", "浙江", Some((2024, 1))),
        shipment("华东", "江苏", Some((2024, 2))),
        shipment("华北", "河北", Some((2024, 3))),
        shipment(UNKNOWN_REGION, "浙江", Some((2024, 1))),
        shipment("华东", "浙江", None),
    ]
}

fn codes(rows: &[ShipmentRecord]) -> Vec<(String, String)> {
    rows.iter()
        .map(|r| (r.region.clone(), r.province.clone()))
        .collect()
}

// ==========================================
// 可组合性
// ==========================================

#[test]
fn test_filter_idempotent() {
    logging::init_test();

    let engine = FilterEngine::new();
    let predicate = FilterPredicate::all()
        .with_regions(["华东"])
        .with_provinces(["浙江"]);

    let once = engine.filter_shipments(&sample_rows(), &predicate);
    let twice = engine.filter_shipments(&once, &predicate);
    assert_eq!(codes(&once), codes(&twice));
}

#[test]
fn test_sequential_filters_equal_combined_predicate() {
    logging::init_test();

    let engine = FilterEngine::new();
    let rows = sample_rows();

    // 先按大区再按省份
    let step1 = engine.filter_shipments(&rows, &FilterPredicate::all().with_regions(["华东"]));
    let step2 =
        engine.filter_shipments(&step1, &FilterPredicate::all().with_provinces(["浙江"]));

    // 合并谓词一次到位
    let combined = engine.filter_shipments(
        &rows,
        &FilterPredicate::all()
            .with_regions(["华东"])
            .with_provinces(["浙江"]),
    );

    assert_eq!(codes(&step2), codes(&combined));
}

#[test]
fn test_date_then_region_equals_region_then_date() {
    logging::init_test();

    let engine = FilterEngine::new();
    let rows = sample_rows();
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2024, 2, 28).unwrap();

    let date_pred = FilterPredicate::all().with_date_range(start, end);
    let region_pred = FilterPredicate::all().with_regions(["华东"]);

    let a = engine.filter_shipments(&engine.filter_shipments(&rows, &date_pred), &region_pred);
    let b = engine.filter_shipments(&engine.filter_shipments(&rows, &region_pred), &date_pred);
    assert_eq!(codes(&a), codes(&b));
}

// ==========================================
// 谓词语义
// ==========================================

#[test]
fn test_swapped_range_equals_ordered_range() {
    logging::init_test();

    let engine = FilterEngine::new();
    let rows = sample_rows();
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2024, 2, 28).unwrap();

    let ordered = engine.filter_shipments(&rows, &FilterPredicate::all().with_date_range(start, end));
    let swapped = engine.filter_shipments(&rows, &FilterPredicate::all().with_date_range(end, start));
    assert_eq!(codes(&ordered), codes(&swapped));
    // 2024-01 两行 + 2024-02 一行; 无月份行被排除
    assert_eq!(ordered.len(), 3);
}

#[test]
fn test_sentinel_selection_hits_null_rows() {
    logging::init_test();

    let engine = FilterEngine::new();
    let filtered = engine.filter_shipments(
        &sample_rows(),
        &FilterPredicate::all().with_regions([UNKNOWN_REGION]),
    );
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].region, UNKNOWN_REGION);
}
