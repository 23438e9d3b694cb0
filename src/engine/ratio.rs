// ==========================================
// 营销物料投入产出分析系统 - 比率策略 (C5)
// ==========================================
// 职责: 费比/ROI/物料效率/占比的统一数值口径
// 口径: 除零、负值、NaN 一律吸收为确定结果,
//       任何数值风险不以错误形式外泄
// ==========================================

/// 费比（物料费用占销售额百分比）
///
/// 口径（固定优先级）:
/// - 任一侧非有限数 → 0（缺失视为无信号）
/// - 销售额为 0 → 0（无信号,不取无穷）
/// - 两侧均为负 → |费用|/|销售| × 100
/// - 仅一侧为负 → 0（脏数据）
/// - 其余 → 费用/销售 × 100,上限钳制到 ceiling,下限 0
pub fn fee_ratio(cost: f64, sales: f64, ceiling: f64) -> f64 {
    if !cost.is_finite() || !sales.is_finite() {
        return 0.0;
    }
    if sales == 0.0 {
        return 0.0;
    }
    let (cost, sales) = if cost < 0.0 && sales < 0.0 {
        (cost.abs(), sales.abs())
    } else if cost < 0.0 || sales < 0.0 {
        return 0.0;
    } else {
        (cost, sales)
    };
    (cost / sales * 100.0).clamp(0.0, ceiling)
}

/// ROI = 销售额/物料费用; 费用 ≤ 0 时无定义
pub fn roi(sales: f64, cost: f64) -> Option<f64> {
    if cost > 0.0 && sales.is_finite() {
        Some(sales / cost)
    } else {
        None
    }
}

/// 物料效率 = 销售额/物料数量; 数量 ≤ 0 时无定义
///
/// 异质物料按"件"混一口径,是粗粒度启发指标
pub fn efficiency(sales: f64, quantity: f64) -> Option<f64> {
    if quantity > 0.0 && sales.is_finite() {
        Some(sales / quantity)
    } else {
        None
    }
}

/// 占比（%）; 总量 ≤ 0 时记 0
pub fn share_pct(part: f64, total: f64) -> f64 {
    if total > 0.0 && part.is_finite() {
        part / total * 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CEILING: f64 = 1000.0;

    #[test]
    fn test_fee_ratio_basic() {
        // 场景 S1: 费用 300 / 销售 1000 → 30%
        assert_eq!(fee_ratio(300.0, 1000.0, CEILING), 30.0);
    }

    #[test]
    fn test_fee_ratio_clamped() {
        // 场景 S2: 原始 5,000,000% 钳制到 1000
        assert_eq!(fee_ratio(50000.0, 1.0, CEILING), 1000.0);
    }

    #[test]
    fn test_fee_ratio_zero_sales_is_zero() {
        assert_eq!(fee_ratio(500.0, 0.0, CEILING), 0.0);
    }

    #[test]
    fn test_fee_ratio_both_negative_uses_abs() {
        assert_eq!(fee_ratio(-300.0, -1000.0, CEILING), 30.0);
    }

    #[test]
    fn test_fee_ratio_single_negative_is_bad_data() {
        assert_eq!(fee_ratio(-300.0, 1000.0, CEILING), 0.0);
        assert_eq!(fee_ratio(300.0, -1000.0, CEILING), 0.0);
    }

    #[test]
    fn test_fee_ratio_nan_absorbed() {
        assert_eq!(fee_ratio(f64::NAN, 1000.0, CEILING), 0.0);
        assert_eq!(fee_ratio(300.0, f64::NAN, CEILING), 0.0);
        assert_eq!(fee_ratio(f64::INFINITY, 1000.0, CEILING), 0.0);
    }

    #[test]
    fn test_roi_undefined_on_zero_cost() {
        assert_eq!(roi(1000.0, 300.0), Some(1000.0 / 300.0));
        assert_eq!(roi(1000.0, 0.0), None);
        assert_eq!(roi(1000.0, -5.0), None);
    }

    #[test]
    fn test_efficiency_undefined_on_zero_quantity() {
        assert_eq!(efficiency(1000.0, 50.0), Some(20.0));
        assert_eq!(efficiency(1000.0, 0.0), None);
    }

    #[test]
    fn test_share_pct_zero_total() {
        assert_eq!(share_pct(10.0, 0.0), 0.0);
        assert_eq!(share_pct(25.0, 100.0), 25.0);
    }
}
