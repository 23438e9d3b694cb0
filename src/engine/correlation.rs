// ==========================================
// 营销物料投入产出分析系统 - 关联分析引擎 (C7)
// ==========================================
// 职责: 按(月份,客户,经销商)对齐物料与销售,产出
//       物料×产品关联表和 销售额~物料数量 回归
// 口径: 共现归因 —— 同一客户-月内每个物料×产品对
//       记入该月全部销售额,不按比例拆分;
//       月份缺失的行不参与关联
// ==========================================

use crate::domain::metrics::{MaterialProductAssociation, RegressionStats};
use crate::domain::record::{SalesRecord, ShipmentRecord};
use crate::engine::ratio;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::debug;

// ==========================================
// 客户-月分组（关联与组合分析共用）
// ==========================================

/// 客户-月键: (客户编码, 经销商名称, 月份)
pub type CustomerMonthKey = (String, String, NaiveDate);

/// 单物料在客户-月内的用量
#[derive(Debug, Clone, Default)]
pub struct MaterialUse {
    pub name: String,
    pub quantity: f64,
    pub cost: f64,
}

/// 客户-月分组: 双侧明细按编码归并
#[derive(Debug, Clone, Default)]
pub struct CustomerMonthGroup {
    pub materials: BTreeMap<String, MaterialUse>, // 物料编码 → 用量
    pub products: BTreeMap<String, String>,       // 产品编码 → 名称
    pub total_sales: f64,                         // 当月销售额合计
}

impl CustomerMonthGroup {
    /// 双侧都有明细才视为关联成功
    pub fn is_joined(&self) -> bool {
        !self.materials.is_empty() && !self.products.is_empty()
    }

    /// 当月物料数量合计
    pub fn material_quantity(&self) -> f64 {
        self.materials.values().map(|m| m.quantity).sum()
    }

    /// 当月物料费用合计
    pub fn material_cost(&self) -> f64 {
        self.materials.values().map(|m| m.cost).sum()
    }
}

/// 把明细行归并为客户-月分组; 月份缺失的行跳过
pub fn group_customer_months(
    shipments: &[ShipmentRecord],
    sales: &[SalesRecord],
) -> BTreeMap<CustomerMonthKey, CustomerMonthGroup> {
    let mut groups: BTreeMap<CustomerMonthKey, CustomerMonthGroup> = BTreeMap::new();

    for r in shipments {
        let Some(month) = r.shipment_month else {
            continue;
        };
        let key = (r.customer_code.clone(), r.distributor_name.clone(), month);
        let entry = groups.entry(key).or_default();
        let material = entry.materials.entry(r.material_code.clone()).or_default();
        if material.name.is_empty() {
            material.name = r.material_name.clone();
        }
        material.quantity += r.material_quantity;
        material.cost += r.material_cost;
    }

    for r in sales {
        let Some(month) = r.shipment_month else {
            continue;
        };
        let key = (r.customer_code.clone(), r.distributor_name.clone(), month);
        let entry = groups.entry(key).or_default();
        entry
            .products
            .entry(r.product_code.clone())
            .or_insert_with(|| r.product_name.clone());
        entry.total_sales += r.sales_amount;
    }

    groups
}

// ==========================================
// CorrelationEngine - 关联分析引擎
// ==========================================
pub struct CorrelationEngine;

impl CorrelationEngine {
    pub fn new() -> Self {
        Self
    }

    /// 物料×产品关联表,键序确定 (material_code, product_code)
    pub fn associations(
        &self,
        groups: &BTreeMap<CustomerMonthKey, CustomerMonthGroup>,
    ) -> Vec<MaterialProductAssociation> {
        // (物料编码, 产品编码) → (物料名, 产品名, 数量, 费用, 归因销售额)
        let mut pairs: BTreeMap<(String, String), (String, String, f64, f64, f64)> =
            BTreeMap::new();

        for group in groups.values().filter(|g| g.is_joined()) {
            for (material_code, material) in &group.materials {
                for (product_code, product_name) in &group.products {
                    let entry = pairs
                        .entry((material_code.clone(), product_code.clone()))
                        .or_insert_with(|| {
                            (
                                material.name.clone(),
                                product_name.clone(),
                                0.0,
                                0.0,
                                0.0,
                            )
                        });
                    entry.2 += material.quantity;
                    entry.3 += material.cost;
                    // 共现归因: 记入整月销售额
                    entry.4 += group.total_sales;
                }
            }
        }

        let associations: Vec<MaterialProductAssociation> = pairs
            .into_iter()
            .map(
                |((material_code, product_code), (material_name, product_name, qty, cost, sales))| {
                    MaterialProductAssociation {
                        material_code,
                        material_name,
                        product_code,
                        product_name,
                        material_quantity: qty,
                        material_cost: cost,
                        sales_amount: sales,
                        roi: ratio::roi(sales, cost),
                        efficiency: ratio::efficiency(sales, qty),
                    }
                },
            )
            .collect();

        debug!(pairs = associations.len(), "物料×产品关联完成");
        associations
    }

    /// 销售额 ~ 物料数量 的最小二乘回归
    ///
    /// 样本为关联成功的客户-月; 不同 x 值不足 2 个时
    /// slope/intercept/r² 全为 0,样本数照常报告
    pub fn regression(
        &self,
        groups: &BTreeMap<CustomerMonthKey, CustomerMonthGroup>,
    ) -> RegressionStats {
        let points: Vec<(f64, f64)> = groups
            .values()
            .filter(|g| g.is_joined())
            .map(|g| (g.material_quantity(), g.total_sales))
            .collect();

        let n = points.len();
        let mut distinct_x: Vec<f64> = points.iter().map(|p| p.0).collect();
        distinct_x.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        distinct_x.dedup();

        if distinct_x.len() < 2 {
            return RegressionStats {
                sample_count: n as u32,
                ..RegressionStats::default()
            };
        }

        let nf = n as f64;
        let mean_x = points.iter().map(|p| p.0).sum::<f64>() / nf;
        let mean_y = points.iter().map(|p| p.1).sum::<f64>() / nf;

        let mut cov = 0.0;
        let mut var_x = 0.0;
        let mut var_y = 0.0;
        for (x, y) in &points {
            cov += (x - mean_x) * (y - mean_y);
            var_x += (x - mean_x) * (x - mean_x);
            var_y += (y - mean_y) * (y - mean_y);
        }

        let slope = cov / var_x;
        let intercept = mean_y - slope * mean_x;
        let r_squared = if var_y > 0.0 {
            (cov * cov) / (var_x * var_y)
        } else {
            0.0
        };

        RegressionStats {
            slope,
            intercept,
            r_squared,
            sample_count: n as u32,
        }
    }
}

impl Default for CorrelationEngine {
    fn default() -> Self {
        Self::new()
    }
}
