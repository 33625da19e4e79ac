//! Bitcoin Cash SLP token toolkit
//!
//! Decodes SLP Type-1 OP_RETURN scripts, classifies wallet UTXOs against the
//! token operations of their parent transactions and hydrates token
//! transactions, on top of a REST backend described by [`api::SlpBackend`].

pub mod api;
pub mod cli;
pub mod config;
pub mod decoder;
pub mod errors;
pub mod processor;
pub mod types;
pub mod utils;

pub use errors::{AppError, AppResult};
pub use processor::SlpToolkit;
