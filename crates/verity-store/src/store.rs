//! The storage contract.

use crate::error::StoreError;
use verity_cert::{Certificate, KeyInfo};
use verity_core::{KeyType, Name};

/// Keyed repository of identities, public keys, and certificates, with
/// per-store default selection.
///
/// By convention a key name is its owning identity name with one extra
/// component, and a certificate name references the key name whose bytes it
/// certifies. Implementations must keep overwrite semantics last-writer-wins
/// and never expose a partially written record to readers.
///
/// Default pointers are references, not owners: setting a default whose
/// target is not currently present clears that default, and accessors
/// return `None` when no default is set.
pub trait SecurityStore: Send + Sync {
    /// True if the identity is present.
    fn identity_exists(&self, identity: &Name) -> bool;

    /// Add an identity. Idempotent: a no-op if already present.
    fn add_identity(&self, identity: &Name);

    /// True if a key record is present under `key_name`.
    fn public_key_exists(&self, key_name: &Name) -> bool;

    /// Add a public key, implicitly adding the owning identity (the key
    /// name's parent) if absent. Overwrites any existing record.
    fn add_public_key(&self, key_name: &Name, key_type: KeyType, key_bits: Vec<u8>);

    /// The key record stored under `key_name`.
    fn get_public_key(&self, key_name: &Name) -> Result<KeyInfo, StoreError>;

    /// True if a certificate is present under `certificate_name`.
    fn certificate_exists(&self, certificate_name: &Name) -> bool;

    /// Add a certificate, implicitly adding its owning identity and public
    /// key (inferred from the certificate's key name) before storing.
    /// Overwrites any existing record.
    fn add_certificate(&self, certificate: Certificate) -> Result<(), StoreError>;

    /// The certificate stored under `certificate_name`.
    fn get_certificate(&self, certificate_name: &Name) -> Result<Certificate, StoreError>;

    /// The default identity, if one is set.
    fn default_identity(&self) -> Option<Name>;

    /// Point the default identity at `identity`; clears the default if the
    /// identity is not present.
    fn set_default_identity(&self, identity: &Name);

    /// The default key name for `identity`, if one is set.
    fn default_key_name_for_identity(&self, identity: &Name) -> Option<Name>;

    /// Point the default key for the key's owning identity at `key_name`;
    /// clears that default if the key is not present.
    fn set_default_key_name_for_identity(&self, key_name: &Name);

    /// The default certificate name for `key_name`, if one is set.
    fn default_certificate_name_for_key(&self, key_name: &Name) -> Option<Name>;

    /// Point the default certificate for the certificate's owning key at
    /// `certificate_name`; clears that default if the certificate is not
    /// present.
    fn set_default_certificate_name_for_key(&self, certificate_name: &Name);

    /// All identity names, or only the default identity.
    fn all_identities(&self, default_only: bool) -> Result<Vec<Name>, StoreError>;

    /// All key names, or only default keys.
    fn all_key_names(&self, default_only: bool) -> Result<Vec<Name>, StoreError>;

    /// Key names owned by `identity`, or only its default key.
    fn all_key_names_of_identity(
        &self,
        identity: &Name,
        default_only: bool,
    ) -> Result<Vec<Name>, StoreError>;

    /// All certificate names, or only default certificates.
    fn all_certificate_names(&self, default_only: bool) -> Result<Vec<Name>, StoreError>;

    /// Certificate names owned by `key_name`, or only its default.
    fn all_certificate_names_of_key(
        &self,
        key_name: &Name,
        default_only: bool,
    ) -> Result<Vec<Name>, StoreError>;

    /// Delete one certificate.
    fn delete_certificate(&self, certificate_name: &Name) -> Result<(), StoreError>;

    /// Delete a public key and every certificate it owns.
    fn delete_public_key(&self, key_name: &Name) -> Result<(), StoreError>;

    /// Delete an identity, its keys, and their certificates.
    fn delete_identity(&self, identity: &Name) -> Result<(), StoreError>;
}
