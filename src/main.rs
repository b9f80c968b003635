use clap::Parser;
use softskills_users::cli::{self, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args = Cli::parse();
    let settings = match cli::load_and_merge_config(&args) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {e:#}");
            std::process::exit(1);
        }
    };

    if let Err(e) = cli::init_logger_from_settings(&settings) {
        eprintln!("Logger initialization error: {e:#}");
        std::process::exit(1);
    }

    if let Err(e) = cli::execute_command(&args, settings).await {
        tracing::error!(error = %e, "Command failed");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }

    Ok(())
}
