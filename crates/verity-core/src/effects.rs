//! Collaborator effect interfaces.
//!
//! The validation engine never performs network retrieval, cryptographic
//! verification, or clock reads itself: those are effects supplied by the
//! embedding application. The engine is parameterized over these traits and
//! the reference implementations in tests are trivial.

use crate::item::{KeyType, SignedData};
use crate::name::Name;
use crate::time::Timestamp;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Error from the certificate fetch collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum FetchError {
    /// No certificate is published under the requested name.
    #[error("no certificate found for {name}")]
    NotFound {
        /// The requested certificate name.
        name: Name,
    },
    /// The fetch did not complete in time.
    #[error("certificate fetch timed out")]
    Timeout,
    /// The underlying transport failed.
    #[error("certificate fetch failed: {reason}")]
    Transport {
        /// Description of the transport failure.
        reason: String,
    },
}

/// Error from the signature verification collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum VerifyError {
    /// The key bytes could not be interpreted for the claimed key type.
    #[error("unusable public key: {reason}")]
    BadKey {
        /// Description of the key problem.
        reason: String,
    },
    /// The cryptographic backend failed.
    #[error("verification backend error: {reason}")]
    Backend {
        /// Description of the backend failure.
        reason: String,
    },
}

/// Asynchronous retrieval of a published certificate by name.
///
/// The returned [`SignedData`] is the carrier packet: its content holds the
/// certificate's canonical encoding and its own signature names the issuer,
/// which is what lets the engine walk the chain upward.
#[async_trait]
pub trait CertificateFetch: Send + Sync {
    /// Fetch the certificate published under `name`.
    async fn fetch(&self, name: &Name) -> Result<SignedData, FetchError>;
}

/// Cryptographic signature verification.
#[async_trait]
pub trait SignatureVerify: Send + Sync {
    /// Verify `signature` over `signed` using the given public key.
    ///
    /// `Ok(false)` means the key was usable but the signature does not
    /// match; errors mean verification could not be attempted at all.
    async fn verify(
        &self,
        signed: &[u8],
        signature: &[u8],
        key_type: KeyType,
        key_bits: &[u8],
    ) -> Result<bool, VerifyError>;
}

/// Wall-clock reads for validity-window checks.
pub trait Clock: Send + Sync {
    /// The current instant.
    fn now(&self) -> Timestamp;
}

/// [`Clock`] backed by the system clock.
///
/// Readings are clamped to whole seconds, the resolution certificate
/// validity windows carry on the wire.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        crate::time::truncate_to_seconds(chrono::Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_error_display() {
        let err = FetchError::NotFound {
            name: Name::from("/alice/KEY1/ID-CERT/1"),
        };
        assert_eq!(
            err.to_string(),
            "no certificate found for /alice/KEY1/ID-CERT/1"
        );
        assert_eq!(FetchError::Timeout.to_string(), "certificate fetch timed out");
    }

    #[test]
    fn system_clock_advances() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }

    #[test]
    fn system_clock_is_second_granular() {
        use chrono::Timelike;
        assert_eq!(SystemClock.now().nanosecond(), 0);
    }
}
