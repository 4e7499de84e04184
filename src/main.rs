mod auth;
mod cli;
mod error;
mod models;
mod providers;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use error::JenkinsError;
use log::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    info!("Starting jenkins-lens");
    if let Err(err) = cli.execute().await {
        if err
            .downcast_ref::<JenkinsError>()
            .is_some_and(JenkinsError::is_retryable)
        {
            warn!("The failure looks transient; re-running the command may succeed");
        }
        return Err(err);
    }

    Ok(())
}
