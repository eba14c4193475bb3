//! Shopvoice CLI - drive the storefront voice assistant from a terminal
//!
//! Typed lines stand in for the microphone, and spoken replies, page
//! navigation and filter changes are printed instead of played or rendered.

mod capture;
mod commands;
mod config;
mod output;
mod repl;

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use storefront_client::StorefrontClient;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Shopvoice - voice commands for the storefront
#[derive(Parser)]
#[command(name = "shopvoice")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Resolve spoken storefront commands and run them against the shop")]
#[command(long_about = r#"
Shopvoice resolves what a shopper says into storefront actions: navigation,
category filters and cart or wishlist changes for a fuzzily matched product.

Examples:
  shopvoice                                   # Start an interactive session
  shopvoice classify "add yoga mat to cart"   # Print the resolved intent
  shopvoice match wireless mouse              # Show the matching product
  shopvoice say "remove mouse from my cart"   # Run one command
"#)]
struct Cli {
    /// Storefront URL (overrides server.url from the config file)
    #[arg(long, env = "STOREFRONT_URL")]
    server: Option<String>,

    /// Shopper's bearer token (overrides server.token)
    #[arg(long, env = "STOREFRONT_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the intent a transcript resolves to, as JSON
    Classify {
        #[arg(required = true, trailing_var_arg = true)]
        text: Vec<String>,
    },

    /// Show the catalog item a product name resolves to
    Match {
        #[arg(required = true, trailing_var_arg = true)]
        query: Vec<String>,
    },

    /// Run one spoken command against the storefront
    Say {
        #[arg(required = true, trailing_var_arg = true)]
        text: Vec<String>,
    },

    /// Check the storefront connection
    Status,

    /// Configuration management
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Print a single configuration value (e.g. voice.debounce_ms)
        #[arg(long)]
        get: Option<String>,

        /// Set a configuration value (key=value)
        #[arg(long)]
        set: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "shopvoice={0},voice_assistant={0},storefront_client={0},warn",
                    log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = config::Config::load()?;

    let server_url = cli.server.clone().unwrap_or_else(|| config.server.url.clone());
    debug!("Using storefront at {}", server_url);
    let mut client = StorefrontClient::new(&server_url);
    if let Some(token) = cli.token.clone().or_else(|| config.server.token.clone()) {
        client = client.with_token(token);
    }
    let client = Arc::new(client);

    match cli.command {
        Some(Commands::Classify { text }) => {
            commands::classify_text(&text.join(" "))?;
        }
        Some(Commands::Match { query }) => {
            commands::match_product(&client, &query.join(" ")).await?;
        }
        Some(Commands::Say { text }) => {
            commands::say(client, &text.join(" ")).await?;
        }
        Some(Commands::Status) => {
            commands::status(&client).await?;
        }
        Some(Commands::Config { show, get, set }) => {
            if show {
                commands::show_config(&config)?;
            } else if let Some(key) = get {
                commands::get_config(&config, &key)?;
            } else if let Some(kv) = set {
                commands::set_config(&kv)?;
            } else {
                commands::show_config(&config)?;
            }
        }
        None => {
            let mut repl = repl::ShopvoiceRepl::new(client, &config)?;
            repl.run().await?;
        }
    }

    Ok(())
}
