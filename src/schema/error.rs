// ==========================================
// 营销物料投入产出分析系统 - 错误类型
// ==========================================
// 依据: Rust 错误处理最佳实践
// 工具: thiserror 派生宏
// ==========================================
// 口径: SchemaError 致命,行级问题只计数不中断
// ==========================================

use thiserror::Error;

/// 规范化层错误类型（致命,整次加载失败）
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("表 {table} 缺少必需列: {}", missing.join(", "))]
    MissingColumns {
        table: String,
        missing: Vec<String>,
    },

    #[error("价格表 {table} 无法定位单价列（无 unit_price 列、无含 price 的列、且不足四列）")]
    PriceColumnUnresolved { table: String },
}

/// 分析核心对外错误类型
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("输入表结构错误: {0}")]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result 类型别名
pub type SchemaResult<T> = Result<T, SchemaError>;
pub type AnalysisResult<T> = Result<T, AnalysisError>;
