// ==========================================
// 营销物料投入产出分析系统 - 分析参数
// ==========================================
// 职责: 集中管理派生/分层/异常检测阈值
// 口径: 默认值即规格口径,展示层可整体注入覆盖
// ==========================================

use serde::{Deserialize, Serialize};

/// 分析参数（阈值/排名规模）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisParams {
    /// 费比上限（%）,超出钳制到该值
    pub fee_ratio_ceiling: f64,

    /// 潜力客户得分下限（不含）
    pub potential_score_cutoff: f64,

    /// 潜力客户销售额分位上限（0~1,低于该分位才入选）
    pub potential_sales_percentile: f64,

    /// 潜力客户榜单规模
    pub potential_top_n: usize,

    /// 费比异常倍率（阈值 = max(全局费比, 客户均值) × 倍率）
    pub anomaly_multiplier: f64,

    /// 物料组合最小出现次数（不足的组合不进榜）
    pub combination_min_usage: u32,

    /// 物料组合榜单规模
    pub combination_top_n: usize,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            fee_ratio_ceiling: 1000.0,
            potential_score_cutoff: 60.0,
            potential_sales_percentile: 0.8,
            potential_top_n: 15,
            anomaly_multiplier: 1.5,
            combination_min_usage: 3,
            combination_top_n: 15,
        }
    }
}
