//! Backend integration module
//!
//! - **Traits** - the collaborator seams the processors depend on
//! - **Client** - `reqwest` implementation against a bch-api style REST service
//! - **Cache** - shared response caches keyed by txid / token id
//! - **Retry** - exponential backoff helper

pub mod cache;
pub mod client;
pub mod retry;
pub mod traits;

pub use cache::{CacheStats, ResponseCache, TokenMetadataCache, TransactionCache};
pub use client::BchRestClient;
pub use retry::calculate_next_backoff;
pub use traits::{RawTransactionSource, SlpBackend, TokenStatsSource, UtxoSource, ValidityOracle};
