//! Profiling utilities based on the `puffin` crate.

pub use puffin::{GlobalProfiler, profile_function, profile_scope};

/// How profiling scopes are collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProfilingMode {
    /// Scopes compile in but record nothing.
    #[default]
    Off,
    /// Scopes are recorded in-process.
    On,
    /// Scopes are recorded and served to `puffin_viewer` over HTTP.
    ///
    /// Requires the `profiling-server` feature; falls back to [`ProfilingMode::On`]
    /// without it.
    WithServer,
}

/// Address the puffin HTTP server binds to.
pub const SERVER_ADDR: &str = "0.0.0.0:8585";

#[cfg(feature = "profiling-server")]
static PROFILING_SERVER: std::sync::OnceLock<puffin_http::Server> = std::sync::OnceLock::new();

/// Configure puffin for the given mode.
///
/// # Example
/// ```no_run
/// use sparrow_core::profiling::{init_profiling, ProfilingMode};
///
/// init_profiling(ProfilingMode::WithServer);
/// ```
pub fn init_profiling(mode: ProfilingMode) {
    match mode {
        ProfilingMode::Off => puffin::set_scopes_on(false),
        ProfilingMode::On => puffin::set_scopes_on(true),
        ProfilingMode::WithServer => {
            puffin::set_scopes_on(true);
            start_server();
        }
    }
}

#[cfg(feature = "profiling-server")]
fn start_server() {
    if PROFILING_SERVER.get().is_some() {
        return;
    }
    match puffin_http::Server::new(SERVER_ADDR) {
        Ok(server) => {
            tracing::info!("Puffin profiler server started on http://{SERVER_ADDR}");
            let _ = PROFILING_SERVER.set(server);
        }
        Err(e) => {
            tracing::error!("Failed to start puffin server: {}", e);
        }
    }
}

#[cfg(not(feature = "profiling-server"))]
fn start_server() {
    tracing::warn!("profiling-server feature disabled, recording scopes in-process only");
}

/// Mark the start of a new frame for profiling.
///
/// Call once per frame, before traversing the scene.
#[inline]
pub fn new_frame() {
    puffin::GlobalProfiler::lock().new_frame();
}
