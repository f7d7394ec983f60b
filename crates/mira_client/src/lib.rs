//! Shared Mira chat client library (settings, backend client, chat session).
//! Used by the Tauri desktop shell and the `mira` CLI.

pub mod client;
pub mod config;
pub mod emotion;
pub mod fallback;
pub mod messages;
pub mod session;

pub use client::{ApiClient, ClientError, DEFAULT_BASE_URL};
pub use config::{default_config_path, Config, ConfigError, WindowBounds};
pub use emotion::EmotionalState;
pub use fallback::{FallbackSelector, FixedSelector, RandomSelector};
pub use session::{ChatReply, ChatSession, ConnectionMode, ReplySource};

/// Install a `tracing` subscriber writing to stderr, filtered by `RUST_LOG`
/// (falling back to `default_directive`). Safe to call more than once.
pub fn init_tracing(default_directive: &str) {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
