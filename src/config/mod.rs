// ==========================================
// 营销物料投入产出分析系统 - 配置层
// ==========================================
// 职责: 分析阈值参数,默认值即规格口径
// ==========================================

pub mod analysis_params;

pub use analysis_params::AnalysisParams;
