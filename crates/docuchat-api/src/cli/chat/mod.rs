//! Interactive CLI chat about one document.
//!
//! This module implements the chat loop: document upload, API key entry,
//! a thinking spinner while the backend answers, markdown rendering, and
//! slash commands. Entry point: `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
pub mod renderer;
