//! Store error type.

use verity_core::Name;

/// Failure of a store operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No record exists under the requested name.
    #[error("no record for {name}")]
    NotFound {
        /// The name that missed.
        name: Name,
    },

    /// The backend does not implement this part of the contract.
    ///
    /// The in-memory reference backend returns this for every enumeration
    /// and deletion operation; callers needing those must use a fuller
    /// backend.
    #[error("operation not supported by this backend: {operation}")]
    Unsupported {
        /// Name of the unimplemented operation.
        operation: &'static str,
    },

    /// The certificate's name does not follow the certificate naming
    /// convention, so no owning key can be inferred.
    #[error("{name} is not a valid certificate name")]
    InvalidName {
        /// The offending name.
        name: Name,
    },
}
