//! Infrastructure layer for Docuchat.
//!
//! Contains implementations of the traits defined in `docuchat-core`:
//! the Gemini `generateContent` client, process-lifetime credential and
//! document stores, document file loading, and config file loading.

pub mod config;
pub mod credential;
pub mod document;
pub mod llm;
