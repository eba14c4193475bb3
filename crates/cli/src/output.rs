//! Output formatting and terminal rendering
//!
//! Prints assistant speech, page changes and status lines with colors. The
//! terminal stands in for the browser: routes and filters are tracked here
//! and shown instead of rendered.

use std::sync::{Mutex, MutexGuard};

use colored::Colorize;
use voice_assistant::{CategoryFilter, Navigator, SessionObserver, SpeechOutput, StoreChange, StoreListener};

/// Plain status printing for commands and the REPL
pub struct OutputHandler;

impl OutputHandler {
    pub fn new() -> Self {
        Self
    }

    /// Print the welcome banner
    pub fn print_banner(&self, server: &str) {
        println!();
        println!(
            "{}",
            "╔═══════════════════════════════════════════════════════════════╗".bright_cyan()
        );
        println!(
            "{}",
            "║             Shopvoice Session                                 ║".bright_cyan()
        );
        println!(
            "{}",
            "╚═══════════════════════════════════════════════════════════════╝".bright_cyan()
        );
        println!("  {} {}", "Storefront:".dimmed(), server.bright_white());
        println!(
            "  {}",
            "Type what you would say, or use /help for commands".dimmed()
        );
        println!();
    }

    /// Print a section header
    pub fn print_header(&self, text: &str) {
        println!();
        println!("{}", format!("▶ {}", text).bright_yellow().bold());
        println!("{}", "─".repeat(60).dimmed());
    }

    pub fn print_success(&self, text: &str) {
        println!("{} {}", "✓".bright_green(), text.bright_white());
    }

    pub fn print_error(&self, text: &str) {
        println!("{} {}", "✗".bright_red(), text.bright_red());
    }

    pub fn print_warning(&self, text: &str) {
        println!("{} {}", "⚠".bright_yellow(), text.yellow());
    }

    pub fn print_info(&self, text: &str) {
        println!("{} {}", "ℹ".bright_blue(), text);
    }
}

impl Default for OutputHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Speaks by printing
pub struct TerminalSpeech;

impl SpeechOutput for TerminalSpeech {
    fn say(&self, text: &str) {
        println!("{} {}", "🔊".bright_magenta(), text.bright_white());
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PageState {
    route: String,
    category: String,
}

/// The page the shopper would be looking at
pub struct TerminalPage {
    state: Mutex<PageState>,
}

impl TerminalPage {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(PageState {
                route: "/".to_string(),
                category: String::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, PageState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn route(&self) -> String {
        self.lock().route.clone()
    }

    /// Active category filter; empty when all categories show
    pub fn category(&self) -> String {
        self.lock().category.clone()
    }
}

impl Default for TerminalPage {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator for TerminalPage {
    fn navigate(&self, route: &str) {
        let mut state = self.lock();
        if state.route != route {
            state.category.clear();
        }
        state.route = route.to_string();
        println!("{} {}", "→".bright_cyan(), route.bright_cyan());
    }

    fn reload(&self) {
        let route = self.route();
        println!("{} {}", "↻".bright_cyan(), route.bright_cyan());
    }
}

impl CategoryFilter for TerminalPage {
    fn set_category(&self, category: &str) {
        self.lock().category = category.to_string();
        let shown = if category.is_empty() { "all" } else { category };
        println!("{} {}", "Category:".dimmed(), shown.bright_cyan());
    }
}

impl StoreListener for TerminalPage {
    fn store_changed(&self, change: StoreChange) {
        let what = match change {
            StoreChange::Cart => "cart",
            StoreChange::Wishlist => "wishlist",
        };
        println!("{} {} updated", "●".bright_green(), what);
    }
}

/// Shows listening state and interim transcripts
pub struct TerminalObserver;

impl SessionObserver for TerminalObserver {
    fn listening_changed(&self, listening: bool) {
        if listening {
            println!("{}", "🎙 Listening...".bright_green());
        } else {
            println!("{}", "🎙 Stopped listening".dimmed());
        }
    }

    fn transcript_changed(&self, text: &str) {
        if !text.is_empty() {
            println!("  {}", text.italic().dimmed());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_tracks_route_and_filter() {
        let page = TerminalPage::new();
        page.set_category("Books");
        assert_eq!(page.category(), "Books");

        page.navigate("/cart");
        assert_eq!(page.route(), "/cart");
        assert_eq!(page.category(), "");
    }

    #[test]
    fn test_reload_keeps_page() {
        let page = TerminalPage::new();
        page.navigate("/wishlist");
        page.reload();
        assert_eq!(page.route(), "/wishlist");
    }
}
