//! Decoder-specific error types

/// Result type for SLP script decoding
pub type ParseResult<T> = Result<T, ParseError>;

/// Reasons a script is not a valid SLP Type-1 OP_RETURN
///
/// Every variant is deterministic for a given script, so callers probing
/// ordinary transactions can treat any of them as "not SLP".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("script does not start with OP_RETURN")]
    NotOpReturn,

    #[error("OP_RETURN does not carry the SLP lokad id")]
    NotSlpOpReturn,

    #[error("unsupported token type {0}")]
    UnknownTokenType(u16),

    #[error("unknown SLP transaction type '{0}'")]
    UnknownTransactionType(String),

    #[error("missing {0} field")]
    MissingField(&'static str),

    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("non-push opcode 0x{opcode:02x} at position {position}")]
    UnexpectedOpcode { position: usize, opcode: u8 },

    #[error("script truncated at position {position}")]
    Truncated { position: usize },

    #[error("output script is not valid hex: {0}")]
    InvalidHex(String),
}
