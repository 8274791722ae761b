//! Session logic and collaborator traits for Docuchat.
//!
//! This crate defines the "ports" (backend, credential store, document store)
//! that the infrastructure layer implements, plus the session controller
//! that drives them. It depends only on `docuchat-types` -- never on
//! `docuchat-infra` or any network/IO crate.

pub mod chat;
pub mod credential;
pub mod document;
pub mod llm;

#[cfg(test)]
pub(crate) mod test_support;
