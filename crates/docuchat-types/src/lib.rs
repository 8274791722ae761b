//! Shared domain types for Docuchat.
//!
//! This crate contains the data shapes used across the workspace: chat
//! messages, uploaded documents, backend requests, configuration, and their
//! associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod document;
pub mod error;
pub mod llm;
