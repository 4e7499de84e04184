use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use indexmap::IndexMap;
use log::info;
use serde::Serialize;

use crate::auth::Credentials;
use crate::providers::jenkins::{JenkinsProvider, TriggerOptions};

#[derive(Parser)]
#[command(name = "jlens")]
#[command(author, version, about = "List, inspect and trigger Jenkins jobs", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Jenkins base URL
    #[arg(short, long, env = "JENKINS_URL")]
    url: String,

    /// Jenkins username (optional, requires --token)
    #[arg(short = 'U', long, env = "JENKINS_USER")]
    user: Option<String>,

    /// Jenkins API token (optional, requires --user)
    #[arg(short, long, env = "JENKINS_API_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Output file path (defaults to stdout)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Pretty print JSON output
    #[arg(short, long, global = true, default_value_t = false)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List all jobs with their status color
    Jobs,

    /// Show the latest build of one or more jobs
    Status {
        /// Job names (use "folder/job" for jobs inside folders)
        #[arg(required = true)]
        jobs: Vec<String>,
    },

    /// Trigger a build and wait for its build number
    Trigger {
        /// Job name (use "folder/job" for jobs inside folders)
        job: String,

        /// Build parameter as KEY=VALUE (repeatable)
        #[arg(short = 'P', long = "param", value_parser = parse_key_val)]
        params: Vec<(String, String)>,

        /// Milliseconds between queue polls
        #[arg(long, default_value_t = 1000, value_parser = clap::value_parser!(u64).range(1..))]
        poll_interval_ms: u64,

        /// Give up after this many seconds in the queue (waits forever if unset)
        #[arg(long)]
        timeout: Option<u64>,
    },
}

fn parse_key_val(s: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid KEY=VALUE: no '=' found in '{s}'"))?;
    if key.trim().is_empty() {
        return Err(format!("invalid KEY=VALUE: empty key in '{s}'"));
    }
    Ok((key.trim().to_string(), value.to_string()))
}

impl Cli {
    pub async fn execute(&self) -> Result<()> {
        let credentials = Credentials::from_parts(self.user.as_deref(), self.token.as_deref())?;
        let provider = JenkinsProvider::connect(&self.url, credentials).await?;

        match &self.command {
            Commands::Jobs => {
                let jobs = provider.list_jobs().await?;
                self.write_output(&jobs)
            }
            Commands::Status { jobs } => {
                let statuses = provider.latest_builds(jobs).await?;
                self.write_output(&statuses)
            }
            Commands::Trigger {
                job,
                params,
                poll_interval_ms,
                timeout,
            } => {
                let parameters: IndexMap<String, String> = params.iter().cloned().collect();
                let options = TriggerOptions {
                    poll_interval: Duration::from_millis(*poll_interval_ms),
                    max_wait: timeout.map(Duration::from_secs),
                };

                // Dropping the trigger future on Ctrl-C abandons the poll loop.
                let triggered = tokio::select! {
                    result = provider.trigger(job, Some(&parameters), &options) => result?,
                    _ = tokio::signal::ctrl_c() => {
                        anyhow::bail!("Interrupted while waiting for {job} to leave the queue")
                    }
                };
                info!(
                    "Successfully triggered {} build #{}",
                    triggered.job, triggered.build_number
                );

                self.write_output(&triggered)
            }
        }
    }

    fn write_output<T: Serialize>(&self, value: &T) -> Result<()> {
        let json_output = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };

        if let Some(output_path) = &self.output {
            std::fs::write(output_path, json_output)?;
            info!("Output written to: {}", output_path.display());
        } else {
            println!("{json_output}");
        }

        Ok(())
    }
}
