use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod bootstrap;
mod commands;

#[derive(Parser)]
#[command(name = "eximchat")]
#[command(about = "EximChat CLI - export assistant chat client", long_about = None)]
struct Cli {
    /// Path to config.toml (defaults to ~/.config/eximchat/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the API base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat session
    Chat,
    /// List stored conversations
    Sessions,
    /// Send a single message and print the reply
    Send {
        /// Message text
        text: String,
        /// Continue an existing conversation
        #[arg(long)]
        session: Option<String>,
    },
    /// List suggested prompts
    Suggestions,
    /// Delete a conversation
    Delete {
        /// Session id
        id: String,
    },
    /// Store an access token for later commands
    Login {
        #[arg(long)]
        token: String,
        #[arg(long)]
        username: Option<String>,
    },
    /// Forget the stored access token
    Logout,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let options = bootstrap::Options {
        config_path: cli.config,
        base_url: cli.base_url,
    };

    match cli.command {
        Commands::Chat => commands::chat::run(&options).await?,
        Commands::Sessions => commands::sessions::list(&options).await?,
        Commands::Send { text, session } => commands::send::run(&options, &text, session).await?,
        Commands::Suggestions => commands::sessions::suggestions(&options).await?,
        Commands::Delete { id } => commands::sessions::delete(&options, &id).await?,
        Commands::Login { token, username } => commands::auth::login(token, username).await?,
        Commands::Logout => commands::auth::logout().await?,
    }

    Ok(())
}
