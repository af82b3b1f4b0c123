//! Interactive chat command for Courtside
//!
//! Keeps one conversation in the context registry and sends its bounded
//! history to the configured provider on every message.

use anyhow::Result;
use std::io::{self, BufRead, Write};

use crate::ai::CompletionProvider;
use crate::chat::{add_context_prefix, ChatSession, ContextRegistry, FilteredResponse};
use crate::config::Config;

// ANSI color codes from design system
pub(super) mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";

    pub const PRIMARY: &str = "\x1b[38;2;255;138;61m";       // #FF8A3D
    pub const SUCCESS: &str = "\x1b[38;2;165;214;167m";      // #A5D6A7
    pub const WARNING: &str = "\x1b[38;2;255;245;157m";      // #FFF59D
    pub const ERROR: &str = "\x1b[38;2;239;154;154m";        // #EF9A9A
    pub const AI_ACCENT: &str = "\x1b[38;2;255;202;40m";     // #FFCA28
    pub const MUTED: &str = "\x1b[38;2;84;110;122m";         // #546E7A
    pub const FG: &str = "\x1b[38;2;212;212;215m";           // #D4D4D7
}

// Unicode symbols
pub(super) mod symbols {
    pub const AI_ICON: &str = "🏀";
    pub const USER_ICON: &str = ">";
    pub const SUCCESS: &str = "✔";
    pub const WARNING: &str = "⚠";
    pub const ERROR: &str = "✖";
    pub const DIVIDER: &str = "─";
}

/// Print a horizontal divider
fn print_divider() {
    println!(
        "{}{}{}",
        colors::MUTED,
        symbols::DIVIDER.repeat(55),
        colors::RESET
    );
}

/// Print AI response bubble, with any relevance warnings under it
pub(super) fn print_ai_message(content: &str, response: &FilteredResponse) {
    println!();
    println!(
        "{}{}  {} Courtside {}{}",
        colors::AI_ACCENT, colors::BOLD, symbols::AI_ICON, colors::RESET, colors::MUTED
    );
    for line in content.lines() {
        println!("{}  │ {}{}", colors::MUTED, colors::FG, line);
    }
    println!("{}  ╰{}─{}", colors::MUTED, symbols::DIVIDER.repeat(50), colors::RESET);

    for warning in &response.warnings {
        println!(
            "{}  {} {} (confidence {:.1}){}",
            colors::WARNING, symbols::WARNING, warning, response.confidence, colors::RESET
        );
    }
}

/// Print thinking indicator
pub(super) fn print_thinking() {
    print!(
        "\r{}  {} Thinking...{}",
        colors::AI_ACCENT,
        symbols::AI_ICON,
        colors::RESET
    );
    io::stdout().flush().ok();
}

/// Clear thinking indicator
pub(super) fn clear_thinking() {
    print!("\r{}\r", " ".repeat(50));
    io::stdout().flush().ok();
}

/// Print error message
pub(super) fn print_error(message: &str) {
    println!(
        "\n{}  {} Error: {}{}",
        colors::ERROR, symbols::ERROR, message, colors::RESET
    );
}

/// Print success message
fn print_success(message: &str) {
    println!(
        "\n{}  {} {}{}",
        colors::SUCCESS, symbols::SUCCESS, message, colors::RESET
    );
}

/// Print help information
fn print_help() {
    println!();
    println!(
        "{}{}  Available Commands:{}",
        colors::PRIMARY, colors::BOLD, colors::RESET
    );
    println!("{}  /help{}     - Show this help message", colors::FG, colors::MUTED);
    println!("{}  /clear{}    - Forget the conversation", colors::FG, colors::MUTED);
    println!("{}  /summary{}  - Topics discussed so far", colors::FG, colors::MUTED);
    println!("{}  /context{}  - Size of the context sent with the next message", colors::FG, colors::MUTED);
    println!("{}  /model{}    - Show current AI model", colors::FG, colors::MUTED);
    println!("{}  /exit{}     - Exit the chat", colors::FG, colors::MUTED);
    println!();
    println!("{}  Tips:{}", colors::PRIMARY, colors::RESET);
    println!("{}  • Press Enter on an empty line to send", colors::MUTED);
    println!("{}  • Ask about players, teams, games and stats", colors::MUTED);
    println!("{}", colors::RESET);
}

/// Read multi-line input; an empty line sends, a slash command sends at once
fn read_input(input: &mut impl BufRead) -> Option<String> {
    print!("\n{}  {} {}", colors::PRIMARY, symbols::USER_ICON, colors::RESET);
    io::stdout().flush().ok();

    let mut lines = Vec::new();

    loop {
        let mut line = String::new();
        match input.read_line(&mut line) {
            Ok(0) | Err(_) => break, // EOF
            Ok(_) => {
                let trimmed = line.trim_end();

                if trimmed.is_empty() {
                    if !lines.is_empty() {
                        break;
                    }
                } else if lines.is_empty() && trimmed.starts_with('/') {
                    return Some(trimmed.to_string());
                } else {
                    lines.push(trimmed.to_string());
                    // Continue prompt
                    print!("{}  . {}", colors::MUTED, colors::RESET);
                    io::stdout().flush().ok();
                }
            }
        }
    }

    let input = lines.join("\n").trim().to_string();
    if input.is_empty() {
        None
    } else {
        Some(input)
    }
}

/// Main chat loop
pub async fn run(
    config: Config,
    initial_prompt: Option<String>,
    session_id: Option<String>,
    show_context: bool,
) -> Result<()> {
    let registry = ContextRegistry::from_config(&config.context);
    let provider = CompletionProvider::from_config_or_echo(&config.ai)?;
    let session_id = session_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let session = ChatSession::new(&registry, &provider, session_id, &config.context);

    print_banner(&provider, session.conversation_id());

    if let Some(prompt) = initial_prompt {
        send(&session, &prompt, show_context).await;
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();

    loop {
        let message = match read_input(&mut input) {
            Some(m) => m,
            None => {
                println!();
                break;
            }
        };

        if let Some(should_break) = handle_command(&message, &session, &provider) {
            if should_break {
                break;
            }
            continue;
        }

        send(&session, &message, show_context).await;
    }

    println!();
    Ok(())
}

async fn send(session: &ChatSession<'_>, message: &str, show_context: bool) {
    print_thinking();

    match session.exchange(message).await {
        Ok(response) => {
            clear_thinking();
            let content = if show_context {
                add_context_prefix(&response.filtered, &session.summary())
            } else {
                response.filtered.clone()
            };
            print_ai_message(&content, &response);
        }
        Err(e) => {
            clear_thinking();
            print_error(&format!("AI error: {:#}", e));
        }
    }
}

/// Handle slash commands; `Some(true)` ends the chat
fn handle_command(input: &str, session: &ChatSession<'_>, provider: &CompletionProvider) -> Option<bool> {
    if !input.starts_with('/') {
        return None;
    }

    match input.to_lowercase().as_str() {
        "/exit" | "/quit" | "/q" => {
            print_success("Goodbye! See you courtside.");
            Some(true)
        }
        "/help" | "/h" | "/?" => {
            print_help();
            Some(false)
        }
        "/clear" | "/c" => {
            session.reset();
            print_success("Conversation cleared");
            Some(false)
        }
        "/summary" | "/s" => {
            print_success(&session.summary());
            Some(false)
        }
        "/context" => {
            let (turns, tokens) = session.context_size();
            println!(
                "\n{}  Next request carries {} turns (~{} tokens){}",
                colors::MUTED, turns, tokens, colors::RESET
            );
            Some(false)
        }
        "/model" | "/m" => {
            println!(
                "\n{}  Current model: {} ({}){}",
                colors::MUTED,
                provider.name(),
                provider.model(),
                colors::RESET
            );
            Some(false)
        }
        _ => {
            print_error(&format!("Unknown command: {}", input));
            println!("{}  Type /help for available commands{}", colors::MUTED, colors::RESET);
            Some(false)
        }
    }
}

/// Print banner with provider info
fn print_banner(provider: &CompletionProvider, session_id: &str) {
    println!();
    println!(
        "{}{}  {} Courtside v{} - {}{}",
        colors::PRIMARY,
        colors::BOLD,
        symbols::AI_ICON,
        env!("CARGO_PKG_VERSION"),
        provider.name(),
        colors::RESET
    );
    println!("{}  Session: {}{}", colors::MUTED, session_id, colors::RESET);
    println!();
    println!(
        "{}  Commands: /help, /summary, /clear, /exit{}",
        colors::MUTED, colors::RESET
    );
    println!(
        "{}  Press Enter on an empty line to send your message{}",
        colors::MUTED, colors::RESET
    );
    print_divider();
}
