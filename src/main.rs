//! OAuth 2.0 Academy CLI binary entry point.

use oauth_academy::cli::{format_error_help, play, Cli};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse_args();

    if let Err(e) = play::run(cli).await {
        eprintln!("Error: {}", format_error_help(&e));
        std::process::exit(1);
    }
}

/// `OAUTH_ACADEMY_LOG`, then `RUST_LOG`, then narration at info level.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("OAUTH_ACADEMY_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("oauth_academy=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
