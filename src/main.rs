use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod controller;
mod logging;
mod markup;
mod service;
mod transcript;
mod ui;

use config::Config;
use controller::ConversationController;
use service::AnsweringClient;

#[derive(Parser)]
#[command(name = "askr")]
#[command(version)]
#[command(about = "Terminal chat client for a remote answering service", long_about = None)]
struct Cli {
    /// Answering service endpoint (overrides the config file)
    #[arg(long)]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask a single question and print the answer
    Ask {
        /// The question text
        question: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(endpoint) = cli.endpoint {
        config.endpoint = endpoint;
    }

    let _logger = logging::init(&config)?;
    log::info!("askr starting against {}", config.endpoint);

    let client = AnsweringClient::from_config(&config);
    let mut controller = ConversationController::new(client);

    match cli.command {
        None => ui::run_chat(controller, config.ui),
        Some(Commands::Ask { question }) => {
            commands::ask_once(&mut controller, &question.join(" ")).await
        }
    }
}
