//! Credential handling: the store port and the manager that applies the
//! persistence policy on top of it.

pub mod manager;
pub mod store;
