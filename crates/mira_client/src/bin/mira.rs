//! mira: line-oriented terminal chat.
//! Reads config, checks the backend, then sends each stdin line and prints the
//! reply to stdout. Status and notices go to stderr.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use mira_client::{config, ApiClient, ChatSession, RandomSelector};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug, Parser)]
#[command(name = "mira", version, about = "Chat with Mira from the terminal")]
struct Args {
    /// Config file (defaults to the platform config dir).
    #[arg(long, env = config::CONFIG_ENV)]
    config: Option<PathBuf>,

    /// Backend base URL; overrides `apiBaseUrl` from the config file.
    #[arg(long)]
    base_url: Option<String>,

    /// Seed for fallback reply selection.
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    mira_client::init_tracing("warn");
    let args = Args::parse();

    let cfg = match config::resolve_path(args.config.as_deref()) {
        Some(path) => match config::load(&path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error: failed to load config from {}: {}", path.display(), e);
                process::exit(1);
            }
        },
        None => config::Config::default(),
    };

    let base_url = args.base_url.unwrap_or(cfg.api_base_url);
    let selector = match args.seed {
        Some(seed) => RandomSelector::seeded(seed),
        None => RandomSelector::new(),
    };
    let session = ChatSession::with_selector(ApiClient::new(base_url), selector);

    let mode = session.initialize().await;
    eprintln!("{}", mode.notice());
    eprintln!("{}", session.current_state().status_line());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                eprintln!("Error: failed to read stdin: {}", e);
                process::exit(1);
            }
        };
        if let Some(reply) = session.send_message(&line).await {
            println!("{}", reply.reply);
            eprintln!("{}", reply.state.status_line());
        }
    }
}
