//! Command-line interface parsing and dispatch.

pub mod category_list;
pub mod chat;
pub mod say;

use std::error::Error;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::core::config::Config;

#[derive(Parser)]
#[command(name = "sahayak")]
#[command(about = "A terminal client for the citizen assistance chat service")]
#[command(
    long_about = "Sahayak is a terminal client for the citizen assistance chat service. \
Answers stream in as the backend produces them, and each help category keeps \
its own independent conversation history.\n\n\
Environment Variables:\n\
  SAHAYAK_BACKEND_URL   Backend base URL (overrides the config file)\n\
  RUST_LOG              Diagnostic log filter (e.g. sahayak=debug)\n\n\
Chat commands:\n\
  /category <id>        Switch to a help category\n\
  /categories           List the available categories\n\
  /log <file>           Enable transcript logging to a file\n\
  /quit                 Leave the session"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Backend base URL (overrides environment and config file)
    #[arg(short = 'u', long, global = true, value_name = "URL")]
    pub backend_url: Option<String>,

    /// Category to start in
    #[arg(short = 'c', long, global = true, value_name = "CATEGORY")]
    pub category: Option<String>,

    /// Enable transcript logging to the specified file
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the interactive chat session (default)
    Chat,
    /// Send a single question and print the streamed answer
    Say {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        prompt: Vec<String>,
    },
    /// List the available help categories
    Categories,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    tokio::runtime::Runtime::new()?.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let config = Config::load()?;
    let backend_url = config.resolve_backend_url(args.backend_url.as_deref());

    match args.command.unwrap_or(Commands::Chat) {
        Commands::Chat => chat::run_chat(backend_url, args.category, args.log).await,
        Commands::Say { prompt } => say::run_say(backend_url, args.category, prompt).await,
        Commands::Categories => {
            category_list::print_categories();
            Ok(())
        }
    }
}
