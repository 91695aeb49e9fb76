//! Codec error type.

use serde::{Deserialize, Serialize};

/// Failure while decoding (or structurally validating) a certificate record.
///
/// Any of these aborts the decode: partial results are never returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum FormatError {
    /// Input ended before the record did.
    #[error("truncated input: record needs {needed} more bytes")]
    Truncated {
        /// How many bytes were missing.
        needed: usize,
    },

    /// A length marker was malformed (indefinite or oversize).
    #[error("invalid length marker")]
    BadLength,

    /// A field appeared out of the mandated structural order.
    #[error("unexpected tag {found:#04x}, expected {expected:#04x}")]
    UnexpectedTag {
        /// The tag the grammar requires at this position.
        expected: u8,
        /// The tag actually read.
        found: u8,
    },

    /// A generalized-time field did not parse.
    #[error("invalid timestamp {text:?}")]
    BadTimestamp {
        /// The offending text.
        text: String,
    },

    /// An object identifier was malformed.
    #[error("invalid object identifier")]
    BadOid,

    /// A string field held invalid UTF-8.
    #[error("invalid UTF-8 in string value")]
    BadString,

    /// A boolean field was not a single byte.
    #[error("invalid boolean encoding")]
    BadBoolean,

    /// The key algorithm identifier is not one this codec supports.
    #[error("unsupported key algorithm {oid}")]
    UnsupportedAlgorithm {
        /// Dotted form of the unknown algorithm identifier.
        oid: String,
    },

    /// Bytes remained after the outer record ended.
    #[error("{count} trailing bytes after record")]
    TrailingBytes {
        /// Number of leftover bytes.
        count: usize,
    },

    /// A decoded certificate had `not_before > not_after`.
    #[error("invalid validity interval: notBefore after notAfter")]
    InvalidValidity,
}
