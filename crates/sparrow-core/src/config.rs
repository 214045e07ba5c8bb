use crate::logging::DEFAULT_FILTER;
use crate::profiling::ProfilingMode;

/// Process-level configuration for Sparrow.
///
/// ```
/// use sparrow_core::Config;
/// use sparrow_core::profiling::ProfilingMode;
///
/// let config = Config::default()
///     .with_log_filter("debug,sparrow_render=trace")
///     .with_profiling(ProfilingMode::On);
/// assert_eq!(config.profiling, ProfilingMode::On);
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_filter: String,
    pub profiling: ProfilingMode,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_filter: DEFAULT_FILTER.to_string(),
            profiling: ProfilingMode::Off,
        }
    }
}

impl Config {
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    pub fn with_profiling(mut self, mode: ProfilingMode) -> Self {
        self.profiling = mode;
        self
    }
}
