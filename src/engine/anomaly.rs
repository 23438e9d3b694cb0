// ==========================================
// 营销物料投入产出分析系统 - 费比异常检测 (C6)
// ==========================================
// 职责: 标记费比显著高于范围水位的客户
// 口径: 阈值 = max(全局费比, 客户费比均值) × 倍率;
//       严重度 = 客户费比/全局费比（全局为 0 记 0）
// ==========================================

use crate::config::AnalysisParams;
use crate::domain::metrics::{CustomerMetric, FeeRatioAnomaly};
use std::cmp::Ordering;
use tracing::debug;

pub struct AnomalyEngine {
    params: AnalysisParams,
}

impl AnomalyEngine {
    pub fn new(params: AnalysisParams) -> Self {
        Self { params }
    }

    /// 检测费比异常客户,按严重度降序返回
    ///
    /// # 参数
    /// - `customers`: 当前范围的客户指标
    /// - `global_fee_ratio`: 当前范围的全局费比（%）
    pub fn detect(
        &self,
        customers: &[CustomerMetric],
        global_fee_ratio: f64,
    ) -> Vec<FeeRatioAnomaly> {
        if customers.is_empty() {
            return Vec::new();
        }

        let mean_customer_fee: f64 =
            customers.iter().map(|c| c.fee_ratio).sum::<f64>() / customers.len() as f64;
        let threshold = global_fee_ratio.max(mean_customer_fee) * self.params.anomaly_multiplier;

        let mut anomalies: Vec<FeeRatioAnomaly> = customers
            .iter()
            .filter(|c| c.fee_ratio > threshold)
            .map(|c| FeeRatioAnomaly {
                customer_code: c.customer_code.clone(),
                distributor_name: c.distributor_name.clone(),
                fee_ratio: c.fee_ratio,
                global_fee_ratio,
                threshold,
                severity: if global_fee_ratio > 0.0 {
                    c.fee_ratio / global_fee_ratio
                } else {
                    0.0
                },
            })
            .collect();

        anomalies.sort_by(|a, b| {
            b.fee_ratio
                .partial_cmp(&a.fee_ratio)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.customer_code.cmp(&b.customer_code))
        });

        debug!(
            threshold,
            flagged = anomalies.len(),
            "费比异常检测完成"
        );
        anomalies
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::CustomerSegment;

    fn customer(code: &str, fee_ratio: f64) -> CustomerMetric {
        CustomerMetric {
            customer_code: code.to_string(),
            distributor_name: "D".to_string(),
            region: "华东".to_string(),
            province: "浙江".to_string(),
            material_quantity: 0.0,
            material_cost: 0.0,
            sales_amount: 0.0,
            fee_ratio,
            material_efficiency: None,
            roi: None,
            customer_value: 0.0,
            sales_share: 0.0,
            value_rank: 0,
            value_score: 0,
            efficiency_score: 0,
            segment: CustomerSegment::General,
            potential_score: 0.0,
        }
    }

    #[test]
    fn test_threshold_takes_larger_baseline() {
        // 场景 S5: 全局 4%,客户均值 5% → 阈值 max(6, 7.5) = 7.5
        // 构造均值为 5 的客户群: 8, 7, 0, 5, 5
        let customers = vec![
            customer("C001", 8.0),
            customer("C002", 7.0),
            customer("C003", 0.0),
            customer("C004", 5.0),
            customer("C005", 5.0),
        ];
        let anomalies = AnomalyEngine::new(AnalysisParams::default()).detect(&customers, 4.0);

        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].customer_code, "C001");
        assert_eq!(anomalies[0].threshold, 7.5);
        assert_eq!(anomalies[0].severity, 2.0);
    }

    #[test]
    fn test_boundary_not_flagged() {
        // 等于阈值不算异常（须严格大于）
        let customers = vec![customer("C001", 6.0), customer("C002", 2.0)];
        // 均值 4,全局 4 → 阈值 6
        let anomalies = AnomalyEngine::new(AnalysisParams::default()).detect(&customers, 4.0);
        assert!(anomalies.is_empty());
    }

    #[test]
    fn test_zero_global_ratio_severity_zero() {
        let customers = vec![customer("C001", 9.0), customer("C002", 1.0)];
        // 全局 0 → 阈值由客户均值 5 × 1.5 = 7.5 驱动
        let anomalies = AnomalyEngine::new(AnalysisParams::default()).detect(&customers, 0.0);
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].severity, 0.0);
    }

    #[test]
    fn test_empty_scope() {
        let anomalies = AnomalyEngine::new(AnalysisParams::default()).detect(&[], 4.0);
        assert!(anomalies.is_empty());
    }
}
