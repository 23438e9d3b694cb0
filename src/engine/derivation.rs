// ==========================================
// 营销物料投入产出分析系统 - 指标派生引擎 (C5)
// ==========================================
// 职责: 把聚合量转成带费比/ROI/效率/占比/排名的
//       指标行; 分层字段留给分层引擎回填
// 口径: 价值排名降序,"min" 并列法（并列共享组内最小名次）
// ==========================================

use crate::config::AnalysisParams;
use crate::domain::metrics::{CustomerMetric, DimensionMetric};
use crate::domain::types::CustomerSegment;
use crate::engine::aggregation::{CustomerSums, SideSums};
use crate::engine::ratio;
use std::cmp::Ordering;
use std::collections::BTreeMap;

pub struct MetricDerivationEngine {
    params: AnalysisParams,
}

impl MetricDerivationEngine {
    pub fn new(params: AnalysisParams) -> Self {
        Self { params }
    }

    /// 单维度指标表（大区/省份/月份/业务员共用）
    pub fn derive_dimension_metrics(
        &self,
        sums: &BTreeMap<String, SideSums>,
    ) -> Vec<DimensionMetric> {
        let total_sales: f64 = sums.values().map(|s| s.sales_amount).sum();

        sums.iter()
            .map(|(key, s)| DimensionMetric {
                key: key.clone(),
                material_quantity: s.material_quantity,
                material_cost: s.material_cost,
                sales_amount: s.sales_amount,
                fee_ratio: ratio::fee_ratio(
                    s.material_cost,
                    s.sales_amount,
                    self.params.fee_ratio_ceiling,
                ),
                material_efficiency: ratio::efficiency(s.sales_amount, s.material_quantity),
                roi: ratio::roi(s.sales_amount, s.material_cost),
                sales_share: ratio::share_pct(s.sales_amount, total_sales),
            })
            .collect()
    }

    /// 客户指标表; 分层相关字段先置默认,由分层引擎回填
    pub fn derive_customer_metrics(
        &self,
        sums: &BTreeMap<(String, String), CustomerSums>,
    ) -> Vec<CustomerMetric> {
        let total_sales: f64 = sums.values().map(|c| c.sums.sales_amount).sum();

        let mut metrics: Vec<CustomerMetric> = sums
            .iter()
            .map(|((code, distributor), c)| CustomerMetric {
                customer_code: code.clone(),
                distributor_name: distributor.clone(),
                region: c.region.clone(),
                province: c.province.clone(),
                material_quantity: c.sums.material_quantity,
                material_cost: c.sums.material_cost,
                sales_amount: c.sums.sales_amount,
                fee_ratio: ratio::fee_ratio(
                    c.sums.material_cost,
                    c.sums.sales_amount,
                    self.params.fee_ratio_ceiling,
                ),
                material_efficiency: ratio::efficiency(
                    c.sums.sales_amount,
                    c.sums.material_quantity,
                ),
                roi: ratio::roi(c.sums.sales_amount, c.sums.material_cost),
                customer_value: c.sums.sales_amount - c.sums.material_cost,
                sales_share: ratio::share_pct(c.sums.sales_amount, total_sales),
                value_rank: 0,
                value_score: 0,
                efficiency_score: 0,
                segment: CustomerSegment::General,
                potential_score: 0.0,
            })
            .collect();

        let values: Vec<f64> = metrics.iter().map(|m| m.customer_value).collect();
        let ranks = min_rank_desc(&values);
        for (metric, rank) in metrics.iter_mut().zip(ranks) {
            metric.value_rank = rank;
        }
        metrics
    }
}

/// 降序 "min" 并列排名: 并列值共享并列组内最小名次
///
/// 例: 值 [10, 10, 5] → 名次 [1, 1, 3]
pub fn min_rank_desc(values: &[f64]) -> Vec<u32> {
    let mut idx: Vec<usize> = (0..values.len()).collect();
    idx.sort_by(|&a, &b| {
        values[b]
            .partial_cmp(&values[a])
            .unwrap_or(Ordering::Equal)
            .then(a.cmp(&b))
    });

    let mut ranks = vec![0u32; values.len()];
    let mut pos = 0;
    while pos < idx.len() {
        let mut end = pos + 1;
        while end < idx.len() && values[idx[end]] == values[idx[pos]] {
            end += 1;
        }
        for &i in &idx[pos..end] {
            ranks[i] = (pos + 1) as u32;
        }
        pos = end;
    }
    ranks
}
