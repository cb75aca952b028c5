//! 日志初始化

use tracing_subscriber::EnvFilter;

/// 初始化全局日志
///
/// `RUST_LOG` 优先；未设置时按 `verbose` 选择 debug 或 info
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // 测试里可能被多次调用，忽略重复初始化
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
