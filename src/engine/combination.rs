// ==========================================
// 营销物料投入产出分析系统 - 物料组合分析 (C7)
// ==========================================
// 职责: 统计客户-月共用的物料编码组合的表现
// 口径: 组合键 = 去重排序后逗号拼接的物料编码;
//       出现次数不足下限的组合不进榜;
//       按单次 ROI 均值降序取前 N
// ==========================================

use crate::config::AnalysisParams;
use crate::domain::metrics::MaterialCombinationPerformance;
use crate::engine::correlation::{CustomerMonthGroup, CustomerMonthKey};
use std::cmp::Ordering;
use std::collections::BTreeMap;

pub struct CombinationEngine {
    params: AnalysisParams,
}

/// 组合累计量
#[derive(Debug, Default)]
struct CombinationAccum {
    usage_count: u32,
    total_sales: f64,
    total_cost: f64,
    roi_sum: f64, // 单次 ROI 累计（费用 ≤ 0 的次记 0）
}

impl CombinationEngine {
    pub fn new(params: AnalysisParams) -> Self {
        Self { params }
    }

    /// 组合表现榜单
    ///
    /// 以客户-月为一次出现; 当月无销售的出现销售额记 0
    pub fn analyze(
        &self,
        groups: &BTreeMap<CustomerMonthKey, CustomerMonthGroup>,
    ) -> Vec<MaterialCombinationPerformance> {
        let mut combos: BTreeMap<String, CombinationAccum> = BTreeMap::new();

        for group in groups.values() {
            if group.materials.is_empty() {
                continue;
            }
            // BTreeMap 键本身有序,直接拼接即规范组合键
            let combination = group
                .materials
                .keys()
                .cloned()
                .collect::<Vec<String>>()
                .join(",");

            let cost = group.material_cost();
            let entry = combos.entry(combination).or_default();
            entry.usage_count += 1;
            entry.total_sales += group.total_sales;
            entry.total_cost += cost;
            entry.roi_sum += if cost > 0.0 {
                group.total_sales / cost
            } else {
                0.0
            };
        }

        let mut performances: Vec<MaterialCombinationPerformance> = combos
            .into_iter()
            .filter(|(_, acc)| acc.usage_count >= self.params.combination_min_usage)
            .map(|(combination, acc)| MaterialCombinationPerformance {
                combination,
                usage_count: acc.usage_count,
                total_sales: acc.total_sales,
                avg_sales: acc.total_sales / acc.usage_count as f64,
                total_cost: acc.total_cost,
                avg_roi: acc.roi_sum / acc.usage_count as f64,
            })
            .collect();

        performances.sort_by(|a, b| {
            b.avg_roi
                .partial_cmp(&a.avg_roi)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.combination.cmp(&b.combination))
        });
        performances.truncate(self.params.combination_top_n);
        performances
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::correlation::MaterialUse;
    use chrono::NaiveDate;

    fn key(customer: &str, month: u32) -> CustomerMonthKey {
        (
            customer.to_string(),
            "D".to_string(),
            NaiveDate::from_ymd_opt(2024, month, 1).unwrap(),
        )
    }

    fn group(codes: &[&str], cost_each: f64, sales: f64) -> CustomerMonthGroup {
        let mut g = CustomerMonthGroup::default();
        for code in codes {
            g.materials.insert(
                code.to_string(),
                MaterialUse {
                    name: format!("物料{code}"),
                    quantity: 1.0,
                    cost: cost_each,
                },
            );
        }
        g.total_sales = sales;
        g
    }

    #[test]
    fn test_canonical_key_is_sorted() {
        let mut groups = BTreeMap::new();
        // 物料以 B、A 次序录入,组合键仍应为 "A,B"
        let mut g = CustomerMonthGroup::default();
        g.materials
            .insert("B".to_string(), MaterialUse::default());
        g.materials
            .insert("A".to_string(), MaterialUse::default());
        groups.insert(key("C1", 1), g);

        let params = AnalysisParams {
            combination_min_usage: 1,
            ..AnalysisParams::default()
        };
        let result = CombinationEngine::new(params).analyze(&groups);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].combination, "A,B");
    }

    #[test]
    fn test_min_usage_threshold() {
        let mut groups = BTreeMap::new();
        // "A,B" 出现 3 次,"C" 出现 2 次
        for (i, month) in [1u32, 2, 3].iter().enumerate() {
            groups.insert(key(&format!("C{i}"), *month), group(&["A", "B"], 50.0, 300.0));
        }
        groups.insert(key("C9", 1), group(&["C"], 10.0, 100.0));
        groups.insert(key("C9", 2), group(&["C"], 10.0, 100.0));

        let result = CombinationEngine::new(AnalysisParams::default()).analyze(&groups);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].combination, "A,B");
        assert_eq!(result[0].usage_count, 3);
        assert_eq!(result[0].avg_sales, 300.0);
        // 单次 ROI = 300/100 = 3
        assert_eq!(result[0].avg_roi, 3.0);
    }

    #[test]
    fn test_zero_cost_occurrence_contributes_zero_roi() {
        let mut groups = BTreeMap::new();
        groups.insert(key("C1", 1), group(&["A"], 0.0, 100.0));
        groups.insert(key("C2", 1), group(&["A"], 50.0, 100.0));
        groups.insert(key("C3", 1), group(&["A"], 50.0, 100.0));

        let result = CombinationEngine::new(AnalysisParams::default()).analyze(&groups);
        assert_eq!(result.len(), 1);
        // (0 + 2 + 2) / 3
        assert!((result[0].avg_roi - 4.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_ranking_and_truncation() {
        let params = AnalysisParams {
            combination_min_usage: 1,
            combination_top_n: 2,
            ..AnalysisParams::default()
        };
        let mut groups = BTreeMap::new();
        groups.insert(key("C1", 1), group(&["A"], 100.0, 100.0)); // ROI 1
        groups.insert(key("C2", 1), group(&["B"], 100.0, 500.0)); // ROI 5
        groups.insert(key("C3", 1), group(&["C"], 100.0, 300.0)); // ROI 3

        let result = CombinationEngine::new(params).analyze(&groups);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].combination, "B");
        assert_eq!(result[1].combination, "C");
    }
}
