//! `tracing` subscriber setup.

use tracing_subscriber::EnvFilter;

/// Filter used when neither `RUST_LOG` nor an explicit filter is provided.
pub const DEFAULT_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn";

/// Install a formatting subscriber using [`DEFAULT_FILTER`].
///
/// # Panics
///
/// Panics if a global subscriber has already been installed. Use
/// [`try_init_with_filter`] when that can happen (tests, embedding).
pub fn init() {
    init_with_filter(DEFAULT_FILTER);
}

/// Install a formatting subscriber. `RUST_LOG` takes precedence over `filter`.
pub fn init_with_filter(filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(filter))
        .init();
}

/// Like [`init_with_filter`], but returns `false` instead of panicking when a
/// subscriber is already installed.
pub fn try_init_with_filter(filter: &str) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(filter))
        .try_init()
        .is_ok()
}

fn env_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_does_not_panic() {
        let _ = try_init_with_filter("debug");
        assert!(!try_init_with_filter("debug"));
    }
}
