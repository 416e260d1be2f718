//! Plain-text rendering of controller state.

use colored::Colorize;
use eximchat_application::ChatState;
use eximchat_core::session::{ChatMessage, MessageRole};

pub fn message(message: &ChatMessage) {
    match message.role {
        MessageRole::User => println!("{} {}", "you>".bright_cyan().bold(), message.content),
        MessageRole::Assistant => {
            println!("{} {}", "exim>".bright_green().bold(), message.content);
            if let Some(secs) = message.response_time() {
                println!("{}", format!("      ({secs:.1}s)").dimmed());
            }
        }
    }
}

pub fn sessions(state: &ChatState) {
    if state.sessions.is_empty() {
        println!("{}", "No conversations yet.".dimmed());
        return;
    }
    for session in &state.sessions {
        let marker = if state.is_current(session) { "*" } else { " " };
        let updated = session
            .updated_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        println!(
            "{} {:>6}  {:<40} {:>4} msgs  {}",
            marker,
            session.id.to_string().yellow(),
            session.display_title(),
            session.message_count,
            updated.dimmed()
        );
    }
}

pub fn suggestions(suggestions: &[String]) {
    for (i, suggestion) in suggestions.iter().enumerate() {
        println!("{} {}", format!("{:>2}.", i + 1).dimmed(), suggestion);
    }
}

pub fn error(message: &str) {
    eprintln!("{} {}", "error:".bright_red().bold(), message);
}
