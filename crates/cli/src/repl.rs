//! Interactive REPL for the shopvoice CLI
//!
//! Each typed line is heard as a finalized transcript by a live capture
//! session, so debouncing and repeat suppression behave as they would with
//! a microphone.

use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use rustyline::{error::ReadlineError, history::DefaultHistory, Editor};
use storefront_client::StorefrontClient;
use voice_assistant::{CaptureEvent, CaptureSession, SessionStatus};

use crate::{
    capture::ReplCapture,
    commands,
    config::Config,
    output::{OutputHandler, TerminalObserver, TerminalPage},
};

pub struct ShopvoiceRepl {
    server: String,
    session: CaptureSession,
    capture: Arc<ReplCapture>,
    page: Arc<TerminalPage>,
    output: OutputHandler,
    editor: Editor<(), DefaultHistory>,
}

impl ShopvoiceRepl {
    pub fn new(client: Arc<StorefrontClient>, config: &Config) -> Result<Self> {
        let page = Arc::new(TerminalPage::new());
        let capture = ReplCapture::new();
        let dispatcher = Arc::new(commands::dispatcher(&client, &page));

        let session = CaptureSession::with_observer(
            config.voice.assistant(),
            capture.clone(),
            dispatcher,
            Arc::new(TerminalObserver),
        )?;

        Ok(Self {
            server: client.base_url().to_string(),
            session,
            capture,
            page,
            output: OutputHandler::new(),
            editor: Editor::new()?,
        })
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> Result<()> {
        self.output.print_banner(&self.server);
        self.session.start();

        loop {
            let prompt = self.build_prompt();

            match self.editor.readline(&prompt) {
                Ok(line) => {
                    let input = line.trim();

                    if input.is_empty() {
                        continue;
                    }

                    let _ = self.editor.add_history_entry(input);

                    if input.starts_with('/') {
                        if self.handle_command(input) {
                            break;
                        }
                    } else if !self.capture.say(input) {
                        self.output
                            .print_warning("Not listening. Use /start to begin.");
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!();
                    self.output.print_info("Use /exit to quit.");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    break;
                }
                Err(e) => {
                    self.output.print_error(&format!("Input error: {}", e));
                    break;
                }
            }
        }

        self.session.stop();
        Ok(())
    }

    fn build_prompt(&self) -> String {
        let mic = match self.session.status() {
            SessionStatus::Listening => "●".bright_green(),
            SessionStatus::Idle => "○".dimmed(),
        };

        format!(
            "\n{} {} [{}] {} ",
            "shopvoice".bright_green().bold(),
            mic,
            self.page.route().bright_cyan(),
            ">".bright_green()
        )
    }

    /// Handle slash commands; true means exit
    fn handle_command(&mut self, input: &str) -> bool {
        let (command, rest) = input
            .split_once(char::is_whitespace)
            .map(|(command, rest)| (command, rest.trim()))
            .unwrap_or((input, ""));

        match command {
            "/exit" | "/quit" | "/q" => return true,

            "/help" | "/h" | "/?" => self.print_help(),

            "/start" => {
                self.session.start();
            }

            "/stop" => {
                if self.session.is_listening() {
                    self.session.stop();
                } else {
                    self.output.print_info("Already stopped.");
                }
            }

            "/partial" => {
                if rest.is_empty() {
                    self.output.print_error("Usage: /partial <text>");
                } else if !self.capture.is_open() {
                    self.output.print_warning("Not listening. Use /start to begin.");
                } else if !self.capture.partial(rest) {
                    self.output
                        .print_info("Interim results are off (voice.interim_results = false).");
                }
            }

            "/end" => {
                if !self.capture.emit(CaptureEvent::Ended) {
                    self.output.print_info("Already stopped.");
                }
            }

            "/error" => {
                let reason = if rest.is_empty() { "network" } else { rest };
                if !self.capture.emit(CaptureEvent::Error(reason.to_string())) {
                    self.output.print_info("Already stopped.");
                }
            }

            "/status" => self.print_status(),

            "/clear" => {
                print!("\x1B[2J\x1B[1;1H");
            }

            _ => {
                self.output.print_error(&format!(
                    "Unknown command: {}. Use /help for available commands.",
                    command
                ));
            }
        }

        false
    }

    fn print_status(&self) {
        let listening = if self.session.is_listening() {
            "listening".bright_green()
        } else {
            "idle".dimmed()
        };
        let category = self.page.category();

        println!();
        println!("  {} {}", "Microphone:".dimmed(), listening);
        if let Some(language) = self.capture.language() {
            println!("  {} {}", "Language:".dimmed(), language);
        }
        println!("  {} {}", "Page:".dimmed(), self.page.route().bright_cyan());
        println!(
            "  {} {}",
            "Category:".dimmed(),
            if category.is_empty() { "all" } else { category.as_str() }
        );
        println!(
            "  {} {}",
            "Last command:".dimmed(),
            self.session.last_command().as_deref().unwrap_or("none")
        );
        println!("  {} {}", "Storefront:".dimmed(), self.server);
    }

    fn print_help(&self) {
        println!();
        println!("{}", "Shopvoice Commands".bright_white().bold());
        println!("{}", "─".repeat(50).dimmed());
        println!();

        println!("{}", "Speaking:".bright_cyan());
        println!("  {}        Heard as a final transcript", "<text>".bright_yellow());
        println!("  {} Heard as an interim transcript", "/partial <text>".bright_yellow());
        println!();

        println!("{}", "Microphone:".bright_cyan());
        println!("  {}           Start listening", "/start".bright_yellow());
        println!("  {}            Stop listening", "/stop".bright_yellow());
        println!("  {}             Simulate the engine ending", "/end".bright_yellow());
        println!("  {}  Simulate a recognition error", "/error <reason>".bright_yellow());
        println!();

        println!("{}", "Other Commands:".bright_cyan());
        println!("  {}          Show session and page state", "/status".bright_yellow());
        println!("  {}           Clear screen", "/clear".bright_yellow());
        println!("  {}            Show this help", "/help".bright_yellow());
        println!("  {}            Exit the CLI", "/exit".bright_yellow());
        println!();

        println!("{}", "Try saying:".bright_cyan());
        for example in [
            "open cart",
            "show all books",
            "add wireless mouse to cart",
            "remove yoga mat from my wishlist",
        ] {
            println!("  {}", example.dimmed());
        }
        println!();
    }
}
