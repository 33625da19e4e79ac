//! SLP OP_RETURN decoding
//!
//! - **script** - push-aware binary cursor over output scripts
//! - **slp** - SLP Type-1 positional layout (GENESIS / MINT / SEND)
//! - **error** - typed "not SLP" reasons

pub mod error;
pub mod script;
pub mod slp;

pub use error::{ParseError, ParseResult};
pub use script::ScriptCursor;
pub use slp::{parse_token_script, parse_token_script_hex};
