//! Error handling
//!
//! Defines error types and failure logging for the owner fixer.

pub mod handlers;
pub mod types;

pub use types::*;
