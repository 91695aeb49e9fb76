//! Verity Validator - Step-Bounded Trust-Chain Validation
//!
//! The [`Validator`] walks a chain of certificates to decide whether a
//! signed item should be trusted. A pluggable [`ValidationPolicy`]
//! classifies each item as accepted, rejected, or in need of further
//! certificates; the engine fetches those certificates through the
//! [`CertificateFetch`](verity_core::CertificateFetch) collaborator,
//! decodes them, checks their validity windows, and recursively validates
//! them with a decremented step budget. The budget bounds worst-case chain
//! length and guarantees termination on cyclic or adversarial chains.
//!
//! Failures are never thrown across the asynchronous boundary: they arrive
//! through the failure path as [`ValidationFailure`] values.

#![forbid(unsafe_code)]

pub mod config;
pub mod engine;
pub mod error;
pub mod policy;
pub mod request;

pub use config::ValidatorConfig;
pub use engine::Validator;
pub use error::ValidationFailure;
pub use policy::{AcceptAllPolicy, PolicyDecision, TrustAnchorPolicy, ValidationPolicy};
pub use request::{CertificateRequirement, Continuation, ValidationRequest};
