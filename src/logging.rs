// ==========================================
// 停车场管理系统 - 日志初始化
// ==========================================
// 日志目标 (target):
// - parking_lot_manager::engine::manager  入场/出场/策略切换/车位状态
// - parking_lot_manager::events           LoggingObserver 事件流水
// - parking_lot_manager::config           配置加载与默认值回退告警
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 未设置 RUST_LOG 时的过滤规则
const DEFAULT_DIRECTIVE: &str = "info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// 文本格式输出, 供命令行直接查看
///
/// 只看事件流水: `RUST_LOG=parking_lot_manager::events=info`
/// 排查分配细节: `RUST_LOG=parking_lot_manager::engine=debug`
pub fn init() {
    fmt()
        .with_env_filter(env_filter())
        .with_target(true)
        .with_line_number(true)
        .init();
}

/// JSON 格式输出（`--json-log`）, 每行一个事件, 附带 park/retrieve 的 span 字段 (registration)
pub fn init_json() {
    fmt()
        .json()
        .with_env_filter(env_filter())
        .with_current_span(true)
        .init();
}

/// 测试用: debug 级别, 输出交给测试框架捕获, 可重复调用
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("parking_lot_manager=debug"))
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_test_is_repeatable() {
        init_test();
        init_test();
        tracing::debug!(target: "parking_lot_manager::events", "日志已初始化");
    }
}
