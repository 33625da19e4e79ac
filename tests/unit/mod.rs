//! Unit Tests
//!
//! Component tests over the in-memory backend; no network access.

pub mod hydrator;
pub mod matcher;
pub mod parser;
