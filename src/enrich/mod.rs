// ==========================================
// 营销物料投入产出分析系统 - 富化层 (C2)
// ==========================================
// 职责: 发货明细挂接物料单价,派生行级
//       material_cost / sales_amount
// 口径: 价格缺失 → 单价 0,计数告警,不中断；
//       负值输入原样保留,不在本层钳制
// ==========================================

use crate::domain::metrics::WarningCounters;
use crate::domain::record::{PriceBook, SalesRecord, ShipmentRecord};
use std::collections::HashSet;
use tracing::warn;

pub struct Enricher;

impl Enricher {
    pub fn new() -> Self {
        Self
    }

    /// 富化发货明细: 查价并派生 material_cost
    ///
    /// # 返回
    /// 价格表缺失编码的行数累计进 `warnings.price_lookup_misses`
    pub fn enrich_shipments(
        &self,
        shipments: &mut [ShipmentRecord],
        prices: &PriceBook,
        warnings: &mut WarningCounters,
    ) {
        let mut missing_codes: HashSet<String> = HashSet::new();

        for record in shipments.iter_mut() {
            match prices.lookup(&record.material_code) {
                Some(price) => {
                    record.unit_price = price;
                }
                None => {
                    record.unit_price = 0.0;
                    warnings.price_lookup_misses += 1;
                    if missing_codes.insert(record.material_code.clone()) {
                        warn!(
                            material_code = %record.material_code,
                            "价格表缺失物料编码,费用按 0 计"
                        );
                    }
                }
            }
            record.material_cost = record.material_quantity * record.unit_price;
        }
    }

    /// 富化销售明细: 派生 sales_amount
    pub fn enrich_sales(&self, sales: &mut [SalesRecord]) {
        for record in sales.iter_mut() {
            record.sales_amount = record.quantity_cases * record.unit_price_per_case;
        }
    }
}

impl Default for Enricher {
    fn default() -> Self {
        Self::new()
    }
}
