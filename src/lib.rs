// ==========================================
// 营销物料投入产出分析系统 - 分析核心库
// ==========================================
// 系统定位: 糖酒经销网络营销物料 ROI 分析
// 范围: 指标计算核心; 展示层/文件解码为外部协作方
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 规范化层 - 原始表 → 类型化明细 (C1)
pub mod schema;

// 富化层 - 单价挂接与行级派生 (C2)
pub mod enrich;

// 过滤层 - 查询谓词 (C3)
pub mod filter;

// 引擎层 - 聚合/派生/分层/关联 (C4–C7)
pub mod engine;

// 投影层 - 查询面与视图目录 (C8)
pub mod projection;

// 配置层 - 分析参数
pub mod config;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    CustomerMetric, CustomerSegment, DimensionMetric, EfficiencyComparison, EfficiencyGroup,
    FeeRatioAnomaly, MaterialCombinationPerformance, MaterialProductAssociation, PriceBook,
    RegressionStats, SalesRecord, SegmentSummary, ShipmentRecord, WarningCounters,
    UNKNOWN_PROVINCE, UNKNOWN_REGION,
};

// 输入与错误
pub use schema::{AnalysisError, AnalysisResult, RawTable, SchemaError, SchemaResult};

// 查询面
pub use filter::FilterPredicate;
pub use projection::{AnalysisContext, ViewCatalogue};

// 配置
pub use config::AnalysisParams;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "营销物料投入产出分析系统";
