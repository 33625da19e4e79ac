//! Shared helpers
//!
//! - **amount** - exact token quantity scaling and formatting
//! - **txid** - transaction id syntax checks

pub mod amount;
pub mod txid;
