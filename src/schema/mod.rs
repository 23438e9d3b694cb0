// ==========================================
// 营销物料投入产出分析系统 - 规范化层 (C1)
// ==========================================
// 职责: 把自由列名的原始表转换为类型化明细行
// 红线: 致命错误仅限结构问题,行级问题计数后继续
// ==========================================

pub mod error;
pub mod normalizer;
pub mod raw_table;

pub use error::{AnalysisError, AnalysisResult, SchemaError, SchemaResult};
pub use normalizer::{parse_month, NormalizedTables, SchemaNormalizer};
pub use raw_table::RawTable;
