/// Worker threads are named `{prefix}-{index}`.
pub const DEFAULT_THREAD_NAME_PREFIX: &str = "worker";
/// Iterations the demo source runs when the config does not say otherwise.
pub const DEFAULT_SOURCE_ITERATIONS: u64 = 100;
/// Base value the demo source counts up from.
pub const DEFAULT_SOURCE_BASE: i32 = 220;
/// Offset the demo formatters subtract.
pub const DEFAULT_FORMATTER_OFFSET: i32 = 120;
