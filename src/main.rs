use std::path::PathBuf;

use clap::Parser;
use tracing::info;

#[derive(Parser)]
#[command(name = "dmcfg")]
#[command(version)]
#[command(
    about = "Load a JSON device model configuration into an initialized SQLite storage",
    long_about = None
)]
struct Cli {
    /// Path to the JSON configuration file
    #[arg(long, value_name = "PATH")]
    config: PathBuf,

    /// Path to the device model database
    #[arg(long, value_name = "PATH")]
    db: PathBuf,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()).as_str())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match dmcfg::apply_config(&cli.config, &cli.db).await {
        Ok(summary) => {
            info!(
                "{} variable attributes updated, {} unmatched",
                summary.updated, summary.unmatched
            );
            println!(
                "Successfully inserted variables from {} into sqlite storage at {}",
                cli.config.display(),
                cli.db.display()
            );
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
