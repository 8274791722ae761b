//! Generative backend abstractions.
//!
//! - `AiClient`: RPITIT trait for concrete backend implementations
//! - `BoxAiClient`: object-safe wrapper for dynamic dispatch

pub mod box_client;
pub mod client;
