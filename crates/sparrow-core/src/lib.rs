//! Sparrow Core
//!
//! Shared building blocks for the Sparrow renderer crates: logging and profiling
//! setup, math re-exports, and allocation-friendly collections.

pub mod alloc;
pub mod config;
pub mod logging;
pub mod math;
pub mod profiling;

pub use config::Config;

/// Initialize logging and profiling from a [`Config`].
///
/// Safe to call more than once; later calls leave the installed subscriber in place.
pub fn init(config: &Config) {
    logging::try_init_with_filter(&config.log_filter);
    profiling::init_profiling(config.profiling);
}
