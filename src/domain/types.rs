// ==========================================
// 营销物料投入产出分析系统 - 领域类型定义
// ==========================================
// 依据: 物料ROI分析核心规格 - 数据模型
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 空值哨兵 (Null Sentinel)
// ==========================================
// 规范化阶段将缺失的大区/省份映射为哨兵值,
// 过滤层选中哨兵即同时命中原始空值行
pub const UNKNOWN_REGION: &str = "未知区域";
pub const UNKNOWN_PROVINCE: &str = "未知省份";

// ==========================================
// 客户分层 (Customer Segment)
// ==========================================
// 由价值得分 × 效率得分的四象限矩阵决定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CustomerSegment {
    #[serde(rename = "核心客户")]
    Core, // 价值≥3 且 效率≥3
    #[serde(rename = "高潜力客户")]
    HighPotential, // 价值≥3 且 效率<3
    #[serde(rename = "高效率客户")]
    HighEfficiency, // 价值<3 且 效率≥3
    #[serde(rename = "一般客户")]
    General, // 其余
}

impl CustomerSegment {
    /// 固定展示顺序（汇总视图按此排序）
    pub const ORDERED: [CustomerSegment; 4] = [
        CustomerSegment::Core,
        CustomerSegment::HighPotential,
        CustomerSegment::HighEfficiency,
        CustomerSegment::General,
    ];

    /// 中文标签
    pub fn label(&self) -> &'static str {
        match self {
            CustomerSegment::Core => "核心客户",
            CustomerSegment::HighPotential => "高潜力客户",
            CustomerSegment::HighEfficiency => "高效率客户",
            CustomerSegment::General => "一般客户",
        }
    }
}

impl fmt::Display for CustomerSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ==========================================
// 效率分组 (Efficiency Group)
// ==========================================
// 高低效率对比视图的分组标签:
// 效率得分第4分位为高效率组,第1分位为低效率组
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EfficiencyGroup {
    #[serde(rename = "高效率组")]
    High,
    #[serde(rename = "低效率组")]
    Low,
}

impl EfficiencyGroup {
    pub fn label(&self) -> &'static str {
        match self {
            EfficiencyGroup::High => "高效率组",
            EfficiencyGroup::Low => "低效率组",
        }
    }
}

impl fmt::Display for EfficiencyGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
