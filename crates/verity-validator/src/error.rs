//! Validation failure reasons.

use verity_cert::FormatError;
use verity_core::{FetchError, Name};

/// Why a validation ended on the failure path.
///
/// Every variant is delivered through the failure continuation (or the
/// `Err` arm of [`Validator::validate`](crate::Validator::validate)),
/// including failures whose root cause was a synchronous decode or store
/// error encountered mid-chain.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationFailure {
    /// A signature did not verify against the trusted key.
    #[error("signature verification failed for {name}: {reason}")]
    SignatureMismatch {
        /// Item whose signature failed.
        name: Name,
        /// What went wrong.
        reason: String,
    },

    /// A chain certificate's validity window has closed.
    #[error("certificate {name} has expired")]
    CertificateExpired {
        /// The expired certificate.
        name: Name,
    },

    /// A chain certificate's validity window has not opened yet.
    #[error("certificate {name} is not yet valid")]
    CertificateNotYetValid {
        /// The not-yet-valid certificate.
        name: Name,
    },

    /// A needed certificate could not be fetched.
    #[error("failed to fetch certificate {name}: {source}")]
    FetchFailed {
        /// The certificate that could not be fetched.
        name: Name,
        /// The collaborator's failure.
        source: FetchError,
    },

    /// A fetched certificate did not decode.
    #[error("malformed certificate {name}: {source}")]
    MalformedCertificate {
        /// The certificate that failed to decode.
        name: Name,
        /// The codec failure.
        source: FormatError,
    },

    /// The chain exceeded the configured step budget.
    #[error("validation depth exceeded (limit {limit})")]
    DepthExceeded {
        /// The configured maximum number of chain steps.
        limit: u32,
    },

    /// The policy rejected the item outright.
    #[error("rejected by policy: {reason}")]
    PolicyRejected {
        /// The policy's stated reason.
        reason: String,
    },
}
