// ==========================================
// 营销物料投入产出分析系统 - 领域模型层
// ==========================================
// 依据: 物料ROI分析核心规格 - 数据模型
// ==========================================
// 职责: 定义领域实体与类型
// 红线: 不含解析逻辑,不含引擎逻辑
// ==========================================

pub mod metrics;
pub mod record;
pub mod types;

// 重导出核心类型
pub use metrics::{
    CustomerMetric, DimensionMetric, EfficiencyComparison, FeeRatioAnomaly,
    MaterialCombinationPerformance, MaterialProductAssociation, RegressionStats, SegmentSummary,
    WarningCounters,
};
pub use record::{PriceBook, SalesRecord, ShipmentRecord};
pub use types::{CustomerSegment, EfficiencyGroup, UNKNOWN_PROVINCE, UNKNOWN_REGION};
