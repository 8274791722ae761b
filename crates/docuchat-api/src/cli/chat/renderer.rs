//! Terminal rendering of answers and conversation history.
//!
//! Markdown answers go through `termimad`. When the session asks the
//! backend for HTML answers there is nothing to render, so the text is
//! printed as received.

use console::style;
use termimad::MadSkin;

use docuchat_types::chat::{Message, Sender};

/// Number of characters of each message shown by `/history`.
const HISTORY_PREVIEW_CHARS: usize = 100;

pub struct ChatRenderer {
    skin: MadSkin,
    raw: bool,
}

impl ChatRenderer {
    /// Create a renderer. `raw` disables markdown rendering.
    pub fn new(raw: bool) -> Self {
        let mut skin = MadSkin::default_dark();
        skin.bold.set_fg(termimad::crossterm::style::Color::Cyan);
        skin.headers[0].set_fg(termimad::crossterm::style::Color::Cyan);
        skin.inline_code
            .set_fg(termimad::crossterm::style::Color::Yellow);

        Self { skin, raw }
    }

    /// Render an answer for the terminal.
    pub fn render_answer(&self, text: &str) -> String {
        if self.raw {
            text.to_string()
        } else {
            self.skin.term_text(text).to_string()
        }
    }

    /// Print an AI message: rendered answer or highlighted advisory.
    pub fn print_answer(&self, message: &Message, advisory: bool) {
        println!();
        if advisory {
            println!("  {}", style(&message.text).yellow());
        } else {
            println!("  {}", style("Gemini").cyan().bold());
            println!("{}", self.render_answer(&message.text).trim_end());
        }
        println!();
    }

    /// Print the whole conversation, one line per message.
    pub fn print_history(&self, messages: &[Message]) {
        println!();
        if messages.is_empty() {
            println!("  {}", style("No messages yet.").dim());
        }
        for message in messages {
            println!("  {}", history_line(message));
        }
        println!();
    }
}

/// One `/history` line: timestamp, sender, and a preview of the text.
pub fn history_line(message: &Message) -> String {
    let label = match message.sender {
        Sender::User => style("You").green().bold(),
        Sender::Ai => style("Gemini").cyan().bold(),
    };
    let single_line = message.text.replace('\n', " ");
    let preview = if single_line.chars().count() > HISTORY_PREVIEW_CHARS {
        let cut: String = single_line.chars().take(HISTORY_PREVIEW_CHARS - 3).collect();
        format!("{cut}...")
    } else {
        single_line
    };

    format!("{} {} {}", style(&message.timestamp).dim(), label, preview)
}
