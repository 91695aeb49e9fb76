//! Verity Core - Foundational Types and Collaborator Interfaces
//!
//! This crate provides the types every other Verity crate builds on:
//!
//! - [`Name`]: hierarchical, path-like identifiers for identities, keys,
//!   certificates, and content.
//! - [`Timestamp`] and the canonical time helpers used by certificate
//!   validity windows.
//! - The signed item model ([`SignedData`], [`SignedInterest`],
//!   [`SignedItem`]): the units the trust engine makes decisions about.
//! - Effect interfaces ([`CertificateFetch`], [`SignatureVerify`],
//!   [`Clock`]): the external collaborators the validation engine is
//!   parameterized over. Implementations live outside the core.
//!
//! No policy logic and no wire formats live here.

#![forbid(unsafe_code)]

pub mod effects;
pub mod item;
pub mod name;
pub mod time;

pub use effects::{CertificateFetch, Clock, FetchError, SignatureVerify, SystemClock, VerifyError};
pub use item::{KeyType, SignatureInfo, SignedData, SignedInterest, SignedItem};
pub use name::Name;
pub use time::{timestamp_max, timestamp_min, truncate_to_seconds, Timestamp};
