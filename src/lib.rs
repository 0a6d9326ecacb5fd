pub mod app;
pub mod config;
mod error;
pub mod newsletter_client;
pub mod web;

// re-export
pub use app::{App, AppState};
pub use error::{Error, Result};
pub use newsletter_client::NewsletterClient;

use tracing_subscriber::EnvFilter;

/// Console tracing with an env-filter, meant for local development.
/// Defaults to `debug` for this crate if `RUST_LOG` is unset.
pub fn init_dbg_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("signup_relay=debug,tower_http=debug")),
        )
        .init();
}

/// Production tracing: compact, no ANSI escapes, `info` by default.
pub fn init_production_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .compact()
        .init();
}
