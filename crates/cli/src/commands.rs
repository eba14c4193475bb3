//! CLI subcommand handlers
//!
//! Handles non-interactive commands like classify, match, say and config.

use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;
use storefront_client::StorefrontClient;
use voice_assistant::{best_match, classify, ActionDispatcher};

use crate::{
    config::Config,
    output::{OutputHandler, TerminalPage, TerminalSpeech},
};

/// Wire a dispatcher to the storefront and the terminal page
pub fn dispatcher(client: &Arc<StorefrontClient>, page: &Arc<TerminalPage>) -> ActionDispatcher {
    ActionDispatcher::builder(
        client.clone(),
        client.clone(),
        client.clone(),
        page.clone(),
        Arc::new(TerminalSpeech),
    )
    .category_filter(page.clone())
    .store_listener(page.clone())
    .build()
}

/// Print the intent a transcript resolves to
pub fn classify_text(text: &str) -> Result<()> {
    let intent = classify(text);
    println!("{}", serde_json::to_string_pretty(&intent)?);
    Ok(())
}

/// Show which catalog item a spoken product name resolves to
pub async fn match_product(client: &StorefrontClient, query: &str) -> Result<()> {
    let output = OutputHandler::new();

    let items = client
        .list_items()
        .await
        .with_context(|| format!("Could not load the catalog from {}", client.base_url()))?;

    if items.is_empty() {
        output.print_warning("The catalog is empty.");
        return Ok(());
    }

    match best_match(query, &items) {
        Some(item) => {
            output.print_success(&item.name);
            println!("  {} {}", "id:".dimmed(), item.id);
            if !item.category.is_empty() {
                println!("  {} {}", "category:".dimmed(), item.category);
            }
        }
        None => output.print_error(&format!(
            "No product matches \"{}\" among {} items",
            query,
            items.len()
        )),
    }

    Ok(())
}

/// Classify and dispatch one transcript against the storefront
pub async fn say(client: Arc<StorefrontClient>, text: &str) -> Result<()> {
    let page = Arc::new(TerminalPage::new());
    let dispatcher = dispatcher(&client, &page);
    dispatcher.dispatch(&classify(text)).await;
    Ok(())
}

/// Show connection status
pub async fn status(client: &StorefrontClient) -> Result<()> {
    let output = OutputHandler::new();

    output.print_header("Shopvoice Status");

    if client.is_running().await {
        output.print_success(&format!("Storefront: Connected ({})", client.base_url()));
    } else {
        output.print_error(&format!("Storefront: Not reachable ({})", client.base_url()));
    }
    if !client.has_token() {
        output.print_warning("No token set; cart and wishlist commands will be rejected.");
    }

    println!();
    println!("  {} {}", "Version:".dimmed(), env!("CARGO_PKG_VERSION"));
    println!("  {} {}", "Config:".dimmed(), Config::config_path().display());

    Ok(())
}

/// Show current configuration
pub fn show_config(config: &Config) -> Result<()> {
    let output = OutputHandler::new();

    output.print_header("Configuration");

    println!();
    println!("  {}", "[server]".bright_cyan());
    println!("    {} = \"{}\"", "url".dimmed(), config.server.url);
    println!(
        "    {} = {}",
        "token".dimmed(),
        if config.server.token.is_some() {
            "********"
        } else {
            "not set"
        }
    );

    println!();
    println!("  {}", "[voice]".bright_cyan());
    println!("    {} = {}", "debounce_ms".dimmed(), config.voice.debounce_ms);
    println!("    {} = {}", "cooldown_ms".dimmed(), config.voice.cooldown_ms);
    println!("    {} = \"{}\"", "language".dimmed(), config.voice.language);
    println!(
        "    {} = {}",
        "interim_results".dimmed(),
        config.voice.interim_results
    );

    println!();
    println!(
        "  {} {}",
        "Config file:".dimmed(),
        Config::config_path().display()
    );

    Ok(())
}

/// Print one configuration value
pub fn get_config(config: &Config, key: &str) -> Result<()> {
    match config.get(key) {
        Some(value) => println!("{}", value),
        None => OutputHandler::new().print_error(&format!("Not set or unknown key: {}", key)),
    }
    Ok(())
}

/// Split a `key=value` argument
fn parse_assignment(kv: &str) -> Option<(&str, &str)> {
    let (key, value) = kv.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key, value.trim().trim_matches('"')))
}

/// Set a configuration value
pub fn set_config(kv: &str) -> Result<()> {
    let output = OutputHandler::new();

    let Some((key, value)) = parse_assignment(kv) else {
        output.print_error("Invalid format. Use: key=value");
        return Ok(());
    };

    let mut config = Config::load()?;
    match config.set(key, value) {
        Ok(()) => {
            config.save()?;
            output.print_success(&format!("Set {} = \"{}\"", key, value));
        }
        Err(e) => {
            output.print_error(&format!("Failed to set config: {}", e));
        }
    }

    Ok(())
}
