// ==========================================
// 营销物料投入产出分析系统 - 引擎层
// ==========================================
// 职责: 指标计算的业务规则引擎
// 红线: 引擎无状态、纯函数,参数显式注入
// ==========================================

pub mod aggregation;
pub mod anomaly;
pub mod combination;
pub mod correlation;
pub mod derivation;
pub mod ratio;
pub mod segmentation;

// 重导出核心引擎
pub use aggregation::{AggregationEngine, CustomerSums, SideSums};
pub use anomaly::AnomalyEngine;
pub use combination::CombinationEngine;
pub use correlation::{
    group_customer_months, CorrelationEngine, CustomerMonthGroup, CustomerMonthKey, MaterialUse,
};
pub use derivation::{min_rank_desc, MetricDerivationEngine};
pub use segmentation::{quartile_scores, SegmentationEngine};
