//! Interactive chat REPL.

use std::borrow::Cow::{self, Borrowed, Owned};

use anyhow::Result;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

use super::render;
use crate::bootstrap::{self, Options};
use eximchat_application::{ChatController, SendOutcome};
use eximchat_core::session::{ChatMessage, SessionId};

const COMMANDS: &[&str] = &["/new", "/sessions", "/open", "/delete", "/suggest", "/quit"];

/// A parsed line of REPL input.
#[derive(Debug, PartialEq)]
enum Input {
    Message(String),
    New,
    Sessions,
    Open(String),
    Delete(String),
    Suggest(Option<usize>),
    Quit,
    Unknown(String),
    Empty,
}

impl Input {
    fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Input::Empty;
        }
        if !line.starts_with('/') {
            return Input::Message(line.to_string());
        }

        let (command, arg) = match line.split_once(char::is_whitespace) {
            Some((command, arg)) => (command, arg.trim()),
            None => (line, ""),
        };
        match (command, arg) {
            ("/new", _) => Input::New,
            ("/sessions", _) => Input::Sessions,
            ("/quit" | "/exit", _) => Input::Quit,
            ("/open", id) if !id.is_empty() => Input::Open(id.to_string()),
            ("/delete", id) if !id.is_empty() => Input::Delete(id.to_string()),
            ("/suggest", "") => Input::Suggest(None),
            ("/suggest", n) => match n.parse::<usize>() {
                Ok(n) if n > 0 => Input::Suggest(Some(n)),
                _ => Input::Unknown(line.to_string()),
            },
            _ => Input::Unknown(line.to_string()),
        }
    }
}

/// Completion, highlighting and hints for slash commands.
struct CliHelper;

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if !line.starts_with('/') || line.contains(' ') {
            return Ok((0, vec![]));
        }

        let candidates = COMMANDS
            .iter()
            .filter(|cmd| cmd.starts_with(line))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];
        if !line.starts_with('/') || line.contains(' ') {
            return None;
        }
        COMMANDS
            .iter()
            .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
            .map(|cmd| cmd[line.len()..].to_string())
    }
}

impl Validator for CliHelper {}

pub async fn run(options: &Options) -> Result<()> {
    let controller = bootstrap::controller(options).await?;

    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper));

    println!("{}", "=== EximChat ===".bright_magenta().bold());
    println!(
        "{}",
        "Type a question, or /new, /sessions, /open <id>, /delete <id>, /suggest [n], /quit."
            .bright_black()
    );

    interruptible(controller.initialize()).await;
    show_error(&controller);
    render::suggestions(&controller.state().suggestions);
    println!();

    loop {
        let readline = tokio::task::block_in_place(|| rl.readline(">> "));
        let line = match readline {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type /quit to exit.".yellow());
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                render::error(&format!("{err}"));
                break;
            }
        };

        let input = Input::parse(&line);
        if !matches!(input, Input::Empty) {
            let _ = rl.add_history_entry(line.trim());
        }

        match input {
            Input::Empty => {}
            Input::Quit => break,
            Input::Message(text) => send(&controller, &text).await,
            Input::New => {
                controller.new_chat();
                println!("{}", "Started a new conversation.".bright_black());
            }
            Input::Sessions => {
                if interruptible(controller.refresh_sessions()).await.is_some() {
                    render::sessions(&controller.state());
                }
            }
            Input::Open(id) => {
                let id = SessionId::from(id);
                if interruptible(controller.select_session(&id)).await.is_some() {
                    let state = controller.state();
                    if state.last_error.is_none() {
                        for message in state.messages() {
                            render::message(message);
                        }
                    }
                }
            }
            Input::Delete(id) => {
                let id = SessionId::from(id);
                interruptible(controller.delete_session(&id)).await;
            }
            Input::Suggest(None) => render::suggestions(&controller.state().suggestions),
            Input::Suggest(Some(n)) => {
                let suggestion = controller.state().suggestions.get(n - 1).cloned();
                match suggestion {
                    Some(text) => {
                        render::message(&ChatMessage::user(&text));
                        send(&controller, &text).await;
                    }
                    None => render::error(&format!("No suggestion #{n}")),
                }
            }
            Input::Unknown(command) => {
                println!("{}", format!("Unknown command: {command}").bright_black());
            }
        }
        show_error(&controller);
    }

    interruptible(controller.wait_background()).await;
    println!("{}", "Goodbye!".bright_green());
    Ok(())
}

/// Runs a backend call; CTRL-C while waiting drops it and yields `None`.
///
/// The SIGINT listener stays installed once registered, so every call that
/// waits on the network goes through here.
async fn interruptible<F: Future>(action: F) -> Option<F::Output> {
    tokio::select! {
        output = action => Some(output),
        _ = tokio::signal::ctrl_c() => {
            println!("{}", "Cancelled.".yellow());
            None
        }
    }
}

async fn send(controller: &ChatController, text: &str) {
    let Some(outcome) = interruptible(controller.send_message(text)).await else {
        return;
    };

    match outcome {
        SendOutcome::Delivered => {
            if let Some(reply) = controller.state().transcript.last() {
                render::message(reply);
            }
        }
        SendOutcome::Ignored => {
            tracing::debug!("[Chat] Send ignored");
        }
        // Reported through last_error.
        SendOutcome::Failed(_) => {}
    }
}

fn show_error(controller: &ChatController) {
    if let Some(error) = controller.state().last_error {
        render::error(&error);
        controller.clear_error();
    }
}
