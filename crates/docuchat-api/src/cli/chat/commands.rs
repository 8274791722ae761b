//! Slash command parsing and help text for the chat loop.
//!
//! Commands start with `/` and control the document, the API key, and the
//! conversation.

use std::path::PathBuf;

use console::style;

/// Available slash commands in the chat loop.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    /// Show available commands.
    Help,
    /// Clear the terminal screen.
    Clear,
    /// Exit the chat.
    Exit,
    /// Load a document, starting a new conversation.
    Upload(PathBuf),
    /// Drop the document and the conversation.
    Reset,
    /// Set the API key; prompt with hidden input when no value is given.
    Key(Option<String>),
    /// Forget the API key.
    ClearKey,
    /// Show the full conversation with timestamps.
    History,
    /// Unknown or malformed command.
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let parts: Vec<&str> = trimmed.splitn(2, ' ').collect();
    let cmd = parts[0].to_lowercase();
    let arg = parts
        .get(1)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    match cmd.as_str() {
        "/help" | "/h" | "/?" => Some(ChatCommand::Help),
        "/clear" | "/cls" => Some(ChatCommand::Clear),
        "/exit" | "/quit" | "/q" => Some(ChatCommand::Exit),
        "/upload" | "/open" => match arg {
            Some(path) => Some(ChatCommand::Upload(PathBuf::from(path))),
            None => Some(ChatCommand::Unknown("/upload requires a file path".to_string())),
        },
        "/reset" | "/new" => Some(ChatCommand::Reset),
        "/key" => Some(ChatCommand::Key(arg)),
        "/clearkey" => Some(ChatCommand::ClearKey),
        "/history" => Some(ChatCommand::History),
        other => Some(ChatCommand::Unknown(other.to_string())),
    }
}

/// Print the help text listing all available commands.
pub fn print_help() {
    println!();
    println!("  {}", style("Available commands:").bold());
    println!();
    println!("  {}          {}", style("/help").cyan(), "Show this help message");
    println!(
        "  {}   {}",
        style("/upload PATH").cyan(),
        "Load a document and start a new conversation"
    );
    println!(
        "  {}         {}",
        style("/reset").cyan(),
        "Drop the document and the conversation"
    );
    println!(
        "  {}   {}",
        style("/key [VALUE]").cyan(),
        "Set the Gemini API key (hidden prompt without VALUE)"
    );
    println!("  {}      {}", style("/clearkey").cyan(), "Forget the API key");
    println!(
        "  {}       {}",
        style("/history").cyan(),
        "Show the conversation with timestamps"
    );
    println!("  {}         {}", style("/clear").cyan(), "Clear the screen");
    println!("  {}          {}", style("/exit").cyan(), "End the chat");
    println!();
    println!("  {}", style("Ctrl+D to exit").dim());
    println!();
}
