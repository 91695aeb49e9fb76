//! Verity Store - Identities, Public Keys, and Certificates
//!
//! The [`SecurityStore`] trait is the storage contract the trust engine and
//! certificate issuance depend on: identities, public keys keyed by name,
//! certificates keyed by name, and per-store default pointers for each.
//!
//! [`MemoryStore`] is the in-memory reference backend. It supports the
//! add/get/exists/default subset; enumeration and deletion return
//! [`StoreError::Unsupported`] so callers must handle the gap explicitly. A
//! production backend implements the full contract, including
//! cascading deletes.

#![forbid(unsafe_code)]

pub mod error;
pub mod memory;
pub mod store;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use store::SecurityStore;
