// ==========================================
// 营销物料投入产出分析系统 - 表结构规范化器 (C1)
// ==========================================
// 职责: 列名规范化 + 类型强制转换 + 必需列校验
//       + 价格表单价列解析
// 口径: 缺列致命(SchemaError); 数值解析失败丢行并计数,
//       但空白数值单元格按 0 处理,不丢行不计数;
//       月份解析失败记 None 并计数,行保留
// ==========================================

use crate::domain::metrics::WarningCounters;
use crate::domain::record::{PriceBook, SalesRecord, ShipmentRecord};
use crate::domain::types::{UNKNOWN_PROVINCE, UNKNOWN_REGION};
use crate::schema::error::{SchemaError, SchemaResult};
use crate::schema::raw_table::RawTable;
use chrono::{Datelike, NaiveDate};
use std::collections::HashMap;
use tracing::{debug, warn};

// ==========================================
// 规范化产物
// ==========================================
#[derive(Debug, Clone)]
pub struct NormalizedTables {
    pub shipments: Vec<ShipmentRecord>,
    pub sales: Vec<SalesRecord>,
    pub prices: PriceBook,
    pub warnings: WarningCounters,
}

// ==========================================
// SchemaNormalizer - 规范化器
// ==========================================
// 无状态,纯函数式入口
pub struct SchemaNormalizer;

/// 发货表必需列（规范名）
const SHIPMENT_REQUIRED: [&str; 10] = [
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
];

/// 销售表必需列（规范名）
const SALES_REQUIRED: [&str; 11] = [
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
];

impl SchemaNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// 规范化三张输入表
    ///
    /// # 返回
    /// 缺少必需列或价格列无法解析时返回 `SchemaError`,
    /// 行级问题累计进 `WarningCounters`
    pub fn normalize(
        &self,
        shipments_raw: &RawTable,
        sales_raw: &RawTable,
        prices_raw: &RawTable,
    ) -> SchemaResult<NormalizedTables> {
        // 各表独立计数,合并后随产物透出
        let mut shipment_warnings = WarningCounters::default();
        let shipments = self.normalize_shipments(shipments_raw, &mut shipment_warnings)?;

        let mut sales_warnings = WarningCounters::default();
        let sales = self.normalize_sales(sales_raw, &mut sales_warnings)?;

        let mut warnings = WarningCounters::default();
        let prices = self.normalize_prices(prices_raw, &mut warnings)?;
        warnings.merge(&shipment_warnings);
        warnings.merge(&sales_warnings);

        debug!(
            shipments = shipments.len(),
            sales = sales.len(),
            prices = prices.len(),
            shipment_dropped = shipment_warnings.coercion_dropped_rows,
            sales_dropped = sales_warnings.coercion_dropped_rows,
            bad_dates = warnings.coercion_bad_dates,
            "规范化完成"
        );

        Ok(NormalizedTables {
            shipments,
            sales,
            prices,
            warnings,
        })
    }

    // ==========================================
    // 发货表
    // ==========================================
    fn normalize_shipments(
        &self,
        raw: &RawTable,
        warnings: &mut WarningCounters,
    ) -> SchemaResult<Vec<ShipmentRecord>> {
        let resolved = resolve_required(raw, "物料发货表", &SHIPMENT_REQUIRED)?;

        let mut records = Vec::with_capacity(raw.row_count());
        for row in raw.rows() {
            let quantity = match parse_number(get(row, &resolved, "material_quantity")) {
                Ok(v) => v,
                Err(_) => {
                    warnings.coercion_dropped_rows += 1;
                    continue;
                }
            };

            let month = parse_month_counted(get(row, &resolved, "shipment_month"), warnings);

            records.push(ShipmentRecord {
                shipment_month: month,
                region: text_or(get(row, &resolved, "region"), UNKNOWN_REGION),
                province: text_or(get(row, &resolved, "province"), UNKNOWN_PROVINCE),
                city: clean_text(get(row, &resolved, "city")),
                distributor_name: clean_text(get(row, &resolved, "distributor_name")),
                customer_code: clean_text(get(row, &resolved, "customer_code")),
                material_code: clean_text(get(row, &resolved, "material_code")),
                material_name: clean_text(get(row, &resolved, "material_name")),
                applicant: clean_text(get(row, &resolved, "applicant")),
                material_quantity: quantity,
                unit_price: 0.0,
                material_cost: 0.0,
            });
        }
        Ok(records)
    }

    // ==========================================
    // 销售表
    // ==========================================
    fn normalize_sales(
        &self,
        raw: &RawTable,
        warnings: &mut WarningCounters,
    ) -> SchemaResult<Vec<SalesRecord>> {
        let resolved = resolve_required(raw, "产品销售表", &SALES_REQUIRED)?;

        let mut records = Vec::with_capacity(raw.row_count());
        for row in raw.rows() {
            let cases = parse_number(get(row, &resolved, "quantity_cases"));
            let unit_price = parse_number(get(row, &resolved, "unit_price_per_case"));
            let (cases, unit_price) = match (cases, unit_price) {
                (Ok(c), Ok(p)) => (c, p),
                _ => {
                    warnings.coercion_dropped_rows += 1;
                    continue;
                }
            };

            let month = parse_month_counted(get(row, &resolved, "shipment_month"), warnings);

            records.push(SalesRecord {
                shipment_month: month,
                region: text_or(get(row, &resolved, "region"), UNKNOWN_REGION),
                province: text_or(get(row, &resolved, "province"), UNKNOWN_PROVINCE),
                city: clean_text(get(row, &resolved, "city")),
                distributor_name: clean_text(get(row, &resolved, "distributor_name")),
                customer_code: clean_text(get(row, &resolved, "customer_code")),
                product_code: clean_text(get(row, &resolved, "product_code")),
                product_name: clean_text(get(row, &resolved, "product_name")),
                applicant: clean_text(get(row, &resolved, "applicant")),
                quantity_cases: cases,
                unit_price_per_case: unit_price,
                sales_amount: 0.0,
            });
        }
        Ok(records)
    }

    // ==========================================
    // 价格表
    // ==========================================
    // 单价列解析优先级（固定,先到先得）:
    // 1. 精确列名 "unit_price"
    // 2. 列名含 "price"（不区分大小写）的首列
    // 3. 第四个位置列
    fn normalize_prices(
        &self,
        raw: &RawTable,
        warnings: &mut WarningCounters,
    ) -> SchemaResult<PriceBook> {
        let resolved = resolve_required(raw, "物料价格表", &["material_code"])?;
        let price_col = resolve_price_column(raw)?;

        let mut book = PriceBook::new();
        for row in raw.rows() {
            let code = clean_text(get(row, &resolved, "material_code"));
            if code.is_empty() {
                warnings.coercion_dropped_rows += 1;
                continue;
            }
            let price = match parse_number(row.get(&price_col).map(String::as_str)) {
                Ok(v) => v,
                Err(_) => {
                    warnings.coercion_dropped_rows += 1;
                    continue;
                }
            };
            book.insert(code, price);
        }
        Ok(book)
    }
}

impl Default for SchemaNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// 列名解析
// ==========================================

/// 规范名 → 源表可能列名（别名按优先级排列）
fn aliases(canonical: &str) -> Vec<&str> {
    match canonical {
        "shipment_month" => vec!["shipment_month", "发货月份", "月份"],
        "region" => vec!["region", "大区", "区域"],
        "province" => vec!["province", "省份"],
        "city" => vec!["city", "城市"],
        "distributor_name" => vec!["distributor_name", "经销商名称", "经销商"],
        "customer_code" => vec!["customer_code", "客户编码", "客户代码"],
        "material_code" => vec!["material_code", "物料编码", "物料代码"],
        "material_name" => vec!["material_name", "物料名称"],
        "material_quantity" => vec!["material_quantity", "物料数量", "发货数量"],
        "product_code" => vec!["product_code", "产品编码", "产品代码"],
        "product_name" => vec!["product_name", "产品名称"],
        "quantity_cases" => vec!["quantity_cases", "销售数量", "销售箱数"],
        "unit_price_per_case" => vec!["unit_price_per_case", "产品单价", "单价"],
        "applicant" => vec!["applicant", "申请人", "业务员"],
        _ => vec![canonical],
    }
}

/// 解析全部必需列,返回 规范名 → 实际列名 映射
fn resolve_required(
    raw: &RawTable,
    table: &str,
    required: &[&str],
) -> SchemaResult<HashMap<String, String>> {
    let mut resolved = HashMap::with_capacity(required.len());
    let mut missing = Vec::new();

    for canonical in required {
        match aliases(canonical)
            .into_iter()
            .find(|alias| raw.has_column(alias))
        {
            Some(actual) => {
                resolved.insert(canonical.to_string(), actual.to_string());
            }
            None => missing.push(canonical.to_string()),
        }
    }

    if !missing.is_empty() {
        return Err(SchemaError::MissingColumns {
            table: table.to_string(),
            missing,
        });
    }
    Ok(resolved)
}

/// 价格表单价列解析（见 normalize_prices 的优先级说明）
fn resolve_price_column(raw: &RawTable) -> SchemaResult<String> {
    if raw.has_column("unit_price") {
        return Ok("unit_price".to_string());
    }
    if let Some(col) = raw
        .columns()
        .iter()
        .find(|c| c.to_lowercase().contains("price"))
    {
        return Ok(col.clone());
    }
    if let Some(col) = raw.column_at(3) {
        warn!(column = col, "价格表按第四列兜底解析单价");
        return Ok(col.to_string());
    }
    Err(SchemaError::PriceColumnUnresolved {
        table: "物料价格表".to_string(),
    })
}

// ==========================================
// 单元格强制转换
// ==========================================

fn get<'a>(
    row: &'a HashMap<String, String>,
    resolved: &HashMap<String, String>,
    canonical: &str,
) -> Option<&'a str> {
    resolved
        .get(canonical)
        .and_then(|actual| row.get(actual))
        .map(String::as_str)
}

/// TRIM 文本; 缺失/空白记空串
fn clean_text(value: Option<&str>) -> String {
    value.map(str::trim).unwrap_or_default().to_string()
}

/// TRIM 文本; 空值回落到哨兵（未知区域/未知省份）
fn text_or(value: Option<&str>, sentinel: &str) -> String {
    let cleaned = clean_text(value);
    if cleaned.is_empty() {
        sentinel.to_string()
    } else {
        cleaned
    }
}

/// 解析数值; 空白视为 0,非数值返回 Err（调用方丢行计数）
fn parse_number(value: Option<&str>) -> Result<f64, ()> {
    let v = value.map(str::trim).unwrap_or_default();
    if v.is_empty() {
        return Ok(0.0);
    }
    v.replace(',', "").parse::<f64>().map_err(|_| ())
}

/// 解析月份并截断到月初; 失败记告警并返回 None
fn parse_month_counted(value: Option<&str>, warnings: &mut WarningCounters) -> Option<NaiveDate> {
    let v = value.map(str::trim).unwrap_or_default();
    if v.is_empty() {
        warnings.coercion_bad_dates += 1;
        return None;
    }
    match parse_month(v) {
        Some(d) => Some(d),
        None => {
            warnings.coercion_bad_dates += 1;
            None
        }
    }
}

/// 月精度日期解析
///
/// 支持: YYYY-MM-DD / YYYY/MM/DD / YYYYMMDD 全日期（截断到月初）,
/// YYYY-MM / YYYY/MM / YYYYMM / YYYY年MM月 月份格式,
/// 以及带时间后缀的日期（取空格前部分）
pub fn parse_month(value: &str) -> Option<NaiveDate> {
    let v = value.trim();
    let v = v.split_whitespace().next().unwrap_or("");
    if v.is_empty() {
        return None;
    }

    // 全日期格式
    for fmt in ["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(v, fmt) {
            return d.with_day(1);
        }
    }

    // 月份格式: 补上月初日再解析
    let normalized = v.replace('年', "-").trim_end_matches('月').to_string();
    for (candidate, fmt) in [
        (format!("{normalized}-01"), "%Y-%m-%d"),
        (format!("{normalized}/01"), "%Y/%m/%d"),
        (format!("{normalized}01"), "%Y%m%d"),
    ] {
        if let Ok(d) = NaiveDate::parse_from_str(&candidate, fmt) {
            return d.with_day(1);
        }
    }
    None
}
