//! Welcome banner display for chat sessions.

use console::style;

/// Print the banner at the start of a chat: model, document, and key state.
pub fn print_welcome_banner(model: &str, document: Option<&str>, masked_key: Option<&str>) {
    println!();
    println!("  {} {}", "*", style("Docuchat").cyan().bold());
    println!("  {}", style("Ask questions about a document").dim());
    println!();
    println!("  {}     {}", style("Model:").bold(), style(model).dim());
    println!(
        "  {}  {}",
        style("Document:").bold(),
        match document {
            Some(name) => style(name.to_string()).dim(),
            None => style("none, load one with /upload PATH".to_string()).yellow(),
        }
    );
    println!(
        "  {}   {}",
        style("API key:").bold(),
        match masked_key {
            Some(masked) => style(masked.to_string()).dim(),
            None => style("not set, use /key".to_string()).yellow(),
        }
    );
    println!();
    println!("  {}", style("Type /help for commands, Ctrl+D to exit").dim());
    println!("  {}", style("---").dim());
    println!();
}
