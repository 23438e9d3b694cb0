// ==========================================
// 营销物料投入产出分析系统 - 日志初始化
// ==========================================
// 工具: tracing + tracing-subscriber
// 口径: 级别由 RUST_LOG 控制,默认 info;
//       测试环境固定 debug 并写入测试捕获器
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 初始化日志系统（宿主进程启动时调用一次）
///
/// # 环境变量
/// - RUST_LOG: 级别过滤器,默认 info
///   例如: RUST_LOG=debug 或 RUST_LOG=material_roi_analysis=trace
///
/// # 示例
/// ```no_run
/// use material_roi_analysis::logging;
/// logging::init();
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();
}

/// 初始化测试日志; 重复调用安全（后续调用为空操作）
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
