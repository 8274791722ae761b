//! The document chat session: message log, session state, failure
//! classification, and the controller that drives the send pipeline.

pub mod controller;
pub mod failure;
pub mod log;
pub mod state;
