//! Document handling: the store port, ingestion into the session, and
//! on-demand base64 encoding for the backend.

pub mod encoder;
pub mod ingester;
pub mod store;
