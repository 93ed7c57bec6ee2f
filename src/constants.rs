/// Default tolerance for approximate float comparisons.
pub const EPSILON: f64 = 1e-9;

pub const DEFAULT_CONFIG_FILE: &str = "config.json";
pub const DEFAULT_LOG_FILE: &str = "dollar_fmt.log";
