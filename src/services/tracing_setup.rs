//! Tracing subscriber setup
//!
//! The terminal belongs to the UI, so all logging goes to a file.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the global tracing subscriber writing to `log_file_path`.
///
/// Filtering follows `RUST_LOG` with a DEBUG default. Returns false if the
/// log file could not be created or a subscriber was already installed.
pub fn init_global(log_file_path: &Path) -> bool {
    let Ok(log_file) = File::create(log_file_path) else {
        return false;
    };

    build_subscriber(log_file).try_init().is_ok()
}

/// Build a subscriber that logs into `log_file`.
///
/// Shared between the binary and tests.
pub fn build_subscriber(log_file: File) -> impl tracing::Subscriber + Send + Sync {
    // ignore's walker is chatty at debug, so only this crate gets DEBUG
    let mut env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    if let Ok(directive) = "term_finder=debug".parse() {
        env_filter = env_filter.add_directive(directive);
    }

    let fmt_layer = fmt::layer().with_ansi(false).with_writer(Arc::new(log_file));

    tracing_subscriber::registry().with(fmt_layer).with(env_filter)
}
