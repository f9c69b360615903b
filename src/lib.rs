//! statusbot: polls HTTP endpoints and posts state changes to a Slack webhook.
//!
//! ```text
//! main
//!   ├── config::Cli / WebhookSettings / load_sites
//!   ├── notifier::SlackNotifier   ("connected" message, then transitions)
//!   └── watcher::WatchLoop
//!         ├── prober::HttpProber → ProbeReport
//!         └── notifier on every state change
//! ```

pub mod config;
pub mod models;
pub mod notifier;
pub mod prober;
pub mod watcher;

use std::env;

/// Installs the global `fmt` subscriber, filtered by `RUST_LOG` (default `info`).
pub fn init_tracing() {
    let filter = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
