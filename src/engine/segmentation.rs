// ==========================================
// 营销物料投入产出分析系统 - 客户分层引擎 (C6)
// ==========================================
// 职责: 四分位打分 → 四象限分层 → 潜力得分
//       → 潜力客户遴选 → 分层/效率对比汇总
// 口径: 等频分桶,得分 1..4; 并列按稳定序落位,
//       靠后位置进更高桶; 单样本落第 4 桶
// ==========================================

use crate::config::AnalysisParams;
use crate::domain::metrics::{CustomerMetric, EfficiencyComparison, SegmentSummary};
use crate::domain::types::{CustomerSegment, EfficiencyGroup};
use crate::engine::ratio;
use std::cmp::Ordering;
use tracing::debug;

pub struct SegmentationEngine {
    params: AnalysisParams,
}

impl SegmentationEngine {
    pub fn new(params: AnalysisParams) -> Self {
        Self { params }
    }

    /// 回填客户的四分位得分/分层/潜力得分
    pub fn apply(&self, customers: &mut [CustomerMetric]) {
        if customers.is_empty() {
            return;
        }

        let values: Vec<f64> = customers.iter().map(|c| c.customer_value).collect();
        let efficiencies: Vec<f64> = customers
            .iter()
            .map(|c| c.material_efficiency.unwrap_or(0.0))
            .collect();

        let value_scores = quartile_scores(&values);
        let efficiency_scores = quartile_scores(&efficiencies);

        for (i, c) in customers.iter_mut().enumerate() {
            c.value_score = value_scores[i];
            c.efficiency_score = efficiency_scores[i];
            c.segment = assign_segment(c.value_score, c.efficiency_score);
        }

        self.apply_potential_scores(customers);

        debug!(
            customers = customers.len(),
            core = customers
                .iter()
                .filter(|c| c.segment == CustomerSegment::Core)
                .count(),
            "客户分层完成"
        );
    }

    /// 潜力得分: 效率 × (1 − 费比/100),范围内 min-max 归一到 [0,100]
    ///
    /// 全员原始值相同时统一记 50
    fn apply_potential_scores(&self, customers: &mut [CustomerMetric]) {
        let raws: Vec<f64> = customers
            .iter()
            .map(|c| c.material_efficiency.unwrap_or(0.0) * (1.0 - c.fee_ratio / 100.0))
            .collect();

        let min = raws.iter().copied().fold(f64::INFINITY, f64::min);
        let max = raws.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        for (c, raw) in customers.iter_mut().zip(raws) {
            c.potential_score = if max > min {
                (raw - min) / (max - min) * 100.0
            } else {
                50.0
            };
        }
    }

    /// 潜力客户遴选: 得分 > 下限 且 销售额低于范围的指定分位,
    /// 按得分降序取前 N
    pub fn potential_customers(&self, customers: &[CustomerMetric]) -> Vec<CustomerMetric> {
        if customers.is_empty() {
            return Vec::new();
        }

        let mut sales: Vec<f64> = customers.iter().map(|c| c.sales_amount).collect();
        sales.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        let sales_cap = percentile(&sales, self.params.potential_sales_percentile);

        let mut picked: Vec<CustomerMetric> = customers
            .iter()
            .filter(|c| {
                c.potential_score > self.params.potential_score_cutoff && c.sales_amount < sales_cap
            })
            .cloned()
            .collect();

        picked.sort_by(|a, b| {
            b.potential_score
                .partial_cmp(&a.potential_score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.customer_code.cmp(&b.customer_code))
        });
        picked.truncate(self.params.potential_top_n);
        picked
    }

    /// 分层汇总（固定分层顺序,空分层不出行）
    pub fn segment_summary(&self, customers: &[CustomerMetric]) -> Vec<SegmentSummary> {
        let total_sales: f64 = customers.iter().map(|c| c.sales_amount).sum();

        CustomerSegment::ORDERED
            .iter()
            .filter_map(|&segment| {
                let members: Vec<&CustomerMetric> =
                    customers.iter().filter(|c| c.segment == segment).collect();
                if members.is_empty() {
                    return None;
                }
                let sales: f64 = members.iter().map(|c| c.sales_amount).sum();
                let cost: f64 = members.iter().map(|c| c.material_cost).sum();
                let avg_fee: f64 =
                    members.iter().map(|c| c.fee_ratio).sum::<f64>() / members.len() as f64;
                Some(SegmentSummary {
                    segment,
                    customer_count: members.len() as u32,
                    sales_amount: sales,
                    material_cost: cost,
                    avg_fee_ratio: avg_fee,
                    sales_share: ratio::share_pct(sales, total_sales),
                })
            })
            .collect()
    }

    /// 高低效率对比: 效率得分第 4 分位 vs 第 1 分位
    pub fn efficiency_comparison(&self, customers: &[CustomerMetric]) -> Vec<EfficiencyComparison> {
        [
            (EfficiencyGroup::High, 4u8),
            (EfficiencyGroup::Low, 1u8),
        ]
        .into_iter()
        .filter_map(|(group, score)| {
            let members: Vec<&CustomerMetric> = customers
                .iter()
                .filter(|c| c.efficiency_score == score)
                .collect();
            if members.is_empty() {
                return None;
            }
            let n = members.len() as f64;
            let with_eff: Vec<f64> = members
                .iter()
                .filter_map(|c| c.material_efficiency)
                .collect();
            let avg_efficiency = if with_eff.is_empty() {
                0.0
            } else {
                with_eff.iter().sum::<f64>() / with_eff.len() as f64
            };
            Some(EfficiencyComparison {
                group,
                customer_count: members.len() as u32,
                sales_amount: members.iter().map(|c| c.sales_amount).sum(),
                material_cost: members.iter().map(|c| c.material_cost).sum(),
                avg_fee_ratio: members.iter().map(|c| c.fee_ratio).sum::<f64>() / n,
                avg_efficiency,
                avg_customer_value: members.iter().map(|c| c.customer_value).sum::<f64>() / n,
            })
        })
        .collect()
    }
}

/// 等频四分位得分 1..4
///
/// 升序稳定排序后按位置分桶: score = ceil(4·(pos+1)/n)。
/// 并列值沿稳定序展开,靠后位置得更高桶; n=1 时得 4
pub fn quartile_scores(values: &[f64]) -> Vec<u8> {
    let n = values.len();
    if n == 0 {
        return Vec::new();
    }

    let mut idx: Vec<usize> = (0..n).collect();
    idx.sort_by(|&a, &b| {
        values[a]
            .partial_cmp(&values[b])
            .unwrap_or(Ordering::Equal)
            .then(a.cmp(&b))
    });

    let mut scores = vec![0u8; n];
    for (pos, &i) in idx.iter().enumerate() {
        scores[i] = ((4 * (pos + 1) + n - 1) / n) as u8;
    }
    scores
}

/// 四象限分层矩阵
fn assign_segment(value_score: u8, efficiency_score: u8) -> CustomerSegment {
    match (value_score >= 3, efficiency_score >= 3) {
        (true, true) => CustomerSegment::Core,
        (true, false) => CustomerSegment::HighPotential,
        (false, true) => CustomerSegment::HighEfficiency,
        (false, false) => CustomerSegment::General,
    }
}

/// 最近秩分位数（输入须已升序）
fn percentile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let rank = (q * sorted.len() as f64).ceil() as usize;
    sorted[rank.clamp(1, sorted.len()) - 1]
}
