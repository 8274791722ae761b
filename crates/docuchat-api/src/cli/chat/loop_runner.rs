//! Main chat loop orchestration.
//!
//! Loads the initial document and API key, prints the banner, then reads
//! lines until the user exits. Plain lines are sent to the session; lines
//! starting with `/` are slash commands.

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use docuchat_core::chat::controller::{SendDispatch, SendOutcome, SessionController};
use docuchat_infra::document::load_document;

use crate::cli::credential::{apply_credential, prompt_credential};
use crate::state::AppState;

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};
use super::renderer::ChatRenderer;

const BLANK_LINE_HINT: &str = "Type a question about the document, or /help for commands.";

fn input_prompt() -> String {
    format!("  {} ", style("You >").green().bold())
}

/// Spinner shown while the backend is answering.
pub fn thinking_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("reading the document...");
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Load `path` into the session, reporting the result.
///
/// Returns the file name on success.
async fn upload(controller: &SessionController, path: &Path) -> Option<String> {
    let payload = match load_document(path).await {
        Ok(payload) => payload,
        Err(e) => {
            println!("\n  {} {e}\n", style("!").red().bold());
            return None;
        }
    };

    let name = payload
        .file_name
        .clone()
        .unwrap_or_else(|| path.display().to_string());
    let bytes = payload.len();

    match controller.ingest(payload).await {
        Ok(_) => {
            println!(
                "\n  {} Loaded {} ({} bytes). New conversation started.\n",
                style("✓").green().bold(),
                style(&name).bold(),
                bytes
            );
            Some(name)
        }
        Err(e) => {
            println!("\n  {} Could not load document: {e}\n", style("!").red().bold());
            None
        }
    }
}

/// Send one prompt and print whatever the session appended for it.
async fn send_prompt(controller: &SessionController, renderer: &ChatRenderer, text: String) {
    let handle = match controller.request_send(text) {
        SendDispatch::Started(handle) => handle,
        SendDispatch::MissingDocument => {
            if controller.config().ui.show_missing_document_notice {
                println!(
                    "\n  {} Load a document first with {}\n",
                    style("!").yellow().bold(),
                    style("/upload PATH").cyan()
                );
            }
            controller.acknowledge_missing_document();
            return;
        }
        SendDispatch::Busy => {
            println!(
                "\n  {} Still waiting for the previous answer.\n",
                style("!").yellow().bold()
            );
            return;
        }
    };

    let spinner = thinking_spinner();
    let outcome = handle.wait().await;
    spinner.finish_and_clear();

    if let Some(message) = controller.last_message() {
        renderer.print_answer(&message, matches!(outcome, SendOutcome::Failed(_)));
    }
}

/// Run the interactive chat loop.
pub async fn run_chat_loop(state: &AppState, file: Option<&Path>) -> anyhow::Result<()> {
    let controller = &state.controller;
    let renderer = ChatRenderer::new(controller.config().ui.html_answers);

    let mut document_name = None;
    if let Some(path) = file {
        document_name = upload(controller, path).await;
    }

    if !controller.credentials().is_set() {
        let value = prompt_credential().await?;
        if !value.is_empty() {
            apply_credential(controller, &value).await;
        }
    }

    let masked = controller
        .credentials()
        .is_set()
        .then(|| controller.credentials().masked());
    print_welcome_banner(
        &controller.config().model,
        document_name.as_deref(),
        masked.as_deref(),
    );

    let (mut chat_input, mut writer) = ChatInput::new(input_prompt())
        .map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    loop {
        let text = match chat_input.read_line().await {
            InputEvent::Eof => {
                println!("\n  {}", style("Chat ended.").dim());
                break;
            }
            InputEvent::Interrupted => {
                let _ = writeln!(
                    writer,
                    "\n  {}",
                    style("Press Ctrl+D to exit, or keep chatting.").dim()
                );
                continue;
            }
            InputEvent::Message(text) => text,
        };

        if text.trim().is_empty() {
            let _ = writeln!(writer, "  {}", style(BLANK_LINE_HINT).dim());
            continue;
        }

        let Some(cmd) = commands::parse(&text) else {
            send_prompt(controller, &renderer, text).await;
            continue;
        };

        match cmd {
            ChatCommand::Help => commands::print_help(),
            ChatCommand::Clear => chat_input.clear(),
            ChatCommand::Exit => {
                println!("\n  {}", style("Chat ended.").dim());
                break;
            }
            ChatCommand::Upload(path) => {
                upload(controller, &path).await;
            }
            ChatCommand::Reset => {
                controller.reset().await;
                println!(
                    "\n  {} Document and conversation cleared.\n",
                    style("✓").green().bold()
                );
            }
            ChatCommand::Key(Some(value)) => {
                println!();
                apply_credential(controller, &value).await;
                println!();
            }
            ChatCommand::Key(None) => {
                // The hidden prompt needs the terminal out of raw mode.
                drop(chat_input);
                drop(writer);
                let value = prompt_credential().await?;
                if value.is_empty() {
                    println!("  {}", style("API key unchanged.").dim());
                } else {
                    apply_credential(controller, &value).await;
                }
                (chat_input, writer) = ChatInput::new(input_prompt())
                    .map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;
            }
            ChatCommand::ClearKey => {
                controller.clear_credential().await;
                println!("\n  {} API key forgotten.\n", style("✓").green().bold());
            }
            ChatCommand::History => renderer.print_history(&controller.messages()),
            ChatCommand::Unknown(cmd_name) => {
                println!(
                    "\n  {} Unknown command: {}. Type /help for available commands.\n",
                    style("?").yellow().bold(),
                    style(cmd_name).dim()
                );
            }
        }
    }

    Ok(())
}
