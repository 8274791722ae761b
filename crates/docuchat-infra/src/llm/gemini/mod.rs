//! Google Gemini backend.
//!
//! This module provides the [`GeminiClient`] which implements the
//! [`AiClient`](docuchat_core::llm::client::AiClient) trait for the
//! `generateContent` REST endpoint, sending the document inline.

pub mod client;
pub mod types;

pub use client::GeminiClient;
