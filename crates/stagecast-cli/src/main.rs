//! Stagecast CLI: generate, review and publish short-form content.
//!
//! Configuration is read from the environment and `.env`; see `Config`.

use anyhow::Context;
use clap::{Parser, Subcommand};
use stagecast_cli::{init_tracing, print_json, App, GenerateOptions, Review};
use stagecast_core::{check_compliance, Config};

#[derive(Parser)]
#[command(name = "stagecast", about = "Content pipeline and multi-platform publisher")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show which integrations are configured
    Status,
    /// Run the pipeline once and optionally review and publish the result
    Generate {
        /// Topic to generate for (random candidate topic when omitted)
        #[arg(long)]
        topic: Option<String>,
        /// Approve the staged record
        #[arg(long, conflicts_with = "reject")]
        approve: bool,
        /// Reject the staged record
        #[arg(long)]
        reject: bool,
        /// Publish to every target after approval
        #[arg(long, requires = "approve")]
        publish: bool,
        /// Hashtag to attach (repeatable); defaults to DEFAULT_HASHTAGS
        #[arg(long = "hashtag")]
        hashtags: Vec<String>,
    },
    /// Check text against the content compliance rules
    Compliance {
        /// Text to check
        text: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Status => {
            let config = Config::from_env().context("Failed to load configuration")?;
            print_json(&config.service_status())?;
        }
        Commands::Generate {
            topic,
            approve,
            reject,
            publish,
            hashtags,
        } => {
            let config = Config::from_env().context("Failed to load configuration")?;
            let app = App::from_config(&config)?;
            let review = if approve {
                Review::Approve
            } else if reject {
                Review::Reject
            } else {
                Review::Leave
            };

            let report = app
                .generate(GenerateOptions {
                    topic,
                    review,
                    publish,
                    hashtags,
                })
                .await?;
            print_json(&report)?;
        }
        Commands::Compliance { text } => {
            print_json(&check_compliance(&text))?;
        }
    }

    Ok(())
}
