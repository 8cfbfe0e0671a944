//! logging — process-wide terminal logger behind the `obs_slog` feature.
//!
//! Purpose
//! -------
//! Give the adapters one shared `slog::Logger` that writes to stderr
//! without blocking the caller, so debug records (method, counts, shapes)
//! can be switched on by enabling the feature.
//!
//! Conventions
//! -----------
//! - The drain is `slog_term::FullFormat` over a `TermDecorator`, wrapped in
//!   `slog_async::Async` and fused; it is built on first use and never torn
//!   down.
//! - Callers emit records with `slog::debug!(crate::logging::logger(), ...)`
//!   inside `#[cfg(feature = "obs_slog")]` blocks.

use slog::{Drain, Logger, o};
use std::sync::OnceLock;

static LOGGER: OnceLock<Logger> = OnceLock::new();

/// Shared logger tagged with the crate name.
pub fn logger() -> &'static Logger {
    LOGGER.get_or_init(|| {
        let decorator = slog_term::TermDecorator::new().stderr().build();
        let drain = slog_term::FullFormat::new(decorator).build().fuse();
        let drain = slog_async::Async::new(drain).build().fuse();
        Logger::root(drain, o!("crate" => env!("CARGO_PKG_NAME")))
    })
}
