use anyhow::Context;
use clap::Parser;

use taskflow::cli::{self, Cli};
use taskflow::config::AppConfig;
use taskflow::store::FileStore;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| "taskflow=warn".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;
    let mut store = FileStore::open(&config.store_path)
        .with_context(|| format!("open store at {}", config.store_path.display()))?;

    cli::run(cli, &mut store)?;
    Ok(())
}
