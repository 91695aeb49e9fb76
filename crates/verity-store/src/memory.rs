//! In-memory reference backend.

use crate::error::StoreError;
use crate::store::SecurityStore;
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;
use verity_cert::{Certificate, KeyInfo, ID_CERT_MARKER};
use verity_core::{KeyType, Name};

#[derive(Default)]
struct Inner {
    identities: BTreeSet<Name>,
    keys: HashMap<Name, KeyInfo>,
    certificates: HashMap<Name, Certificate>,
    default_identity: Option<Name>,
    default_key_names: HashMap<Name, Name>,
    default_certificate_names: HashMap<Name, Name>,
}

/// The in-memory reference store.
///
/// Supports the add/get/exists/default subset of [`SecurityStore`];
/// enumeration and deletion return [`StoreError::Unsupported`]. All state
/// sits behind a single reader-writer lock, so readers never observe a
/// partially applied write and overwrites are last-writer-wins.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SecurityStore for MemoryStore {
    fn identity_exists(&self, identity: &Name) -> bool {
        self.inner.read().identities.contains(identity)
    }

    fn add_identity(&self, identity: &Name) {
        self.inner.write().identities.insert(identity.clone());
    }

    fn public_key_exists(&self, key_name: &Name) -> bool {
        self.inner.read().keys.contains_key(key_name)
    }

    fn add_public_key(&self, key_name: &Name, key_type: KeyType, key_bits: Vec<u8>) {
        let mut inner = self.inner.write();
        // The owning identity is the key name minus its last component.
        inner.identities.insert(key_name.parent());
        inner
            .keys
            .insert(key_name.clone(), KeyInfo::new(key_type, key_bits));
    }

    fn get_public_key(&self, key_name: &Name) -> Result<KeyInfo, StoreError> {
        self.inner
            .read()
            .keys
            .get(key_name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                name: key_name.clone(),
            })
    }

    fn certificate_exists(&self, certificate_name: &Name) -> bool {
        self.inner.read().certificates.contains_key(certificate_name)
    }

    fn add_certificate(&self, certificate: Certificate) -> Result<(), StoreError> {
        let key_name = certificate
            .public_key_name()
            .ok_or_else(|| StoreError::InvalidName {
                name: certificate.name.clone(),
            })?;
        debug!(certificate = %certificate.name, key = %key_name, "adding certificate");

        let mut inner = self.inner.write();
        inner.identities.insert(key_name.parent());
        inner.keys.insert(
            key_name,
            KeyInfo::new(certificate.key.key_type, certificate.key.key_bits.clone()),
        );
        inner
            .certificates
            .insert(certificate.name.clone(), certificate);
        Ok(())
    }

    fn get_certificate(&self, certificate_name: &Name) -> Result<Certificate, StoreError> {
        self.inner
            .read()
            .certificates
            .get(certificate_name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                name: certificate_name.clone(),
            })
    }

    fn default_identity(&self) -> Option<Name> {
        self.inner.read().default_identity.clone()
    }

    fn set_default_identity(&self, identity: &Name) {
        let mut inner = self.inner.write();
        if inner.identities.contains(identity) {
            inner.default_identity = Some(identity.clone());
        } else {
            // The identity doesn't exist, so clear the default.
            debug!(%identity, "default identity target missing, clearing");
            inner.default_identity = None;
        }
    }

    fn default_key_name_for_identity(&self, identity: &Name) -> Option<Name> {
        self.inner.read().default_key_names.get(identity).cloned()
    }

    fn set_default_key_name_for_identity(&self, key_name: &Name) {
        let identity = key_name.parent();
        let mut inner = self.inner.write();
        if inner.keys.contains_key(key_name) {
            inner.default_key_names.insert(identity, key_name.clone());
        } else {
            debug!(key = %key_name, "default key target missing, clearing");
            inner.default_key_names.remove(&identity);
        }
    }

    fn default_certificate_name_for_key(&self, key_name: &Name) -> Option<Name> {
        self.inner
            .read()
            .default_certificate_names
            .get(key_name)
            .cloned()
    }

    fn set_default_certificate_name_for_key(&self, certificate_name: &Name) {
        // The owning key comes from the name itself, so a miss still knows
        // which key's default to clear.
        let Some(index) = certificate_name.position_of(ID_CERT_MARKER) else {
            debug!(certificate = %certificate_name, "not a certificate name, ignoring");
            return;
        };
        let key_name = certificate_name.prefix(index);
        let mut inner = self.inner.write();
        if inner.certificates.contains_key(certificate_name) {
            inner
                .default_certificate_names
                .insert(key_name, certificate_name.clone());
        } else {
            debug!(certificate = %certificate_name, "default certificate target missing, clearing");
            inner.default_certificate_names.remove(&key_name);
        }
    }

    fn all_identities(&self, _default_only: bool) -> Result<Vec<Name>, StoreError> {
        Err(StoreError::Unsupported {
            operation: "all_identities",
        })
    }

    fn all_key_names(&self, _default_only: bool) -> Result<Vec<Name>, StoreError> {
        Err(StoreError::Unsupported {
            operation: "all_key_names",
        })
    }

    fn all_key_names_of_identity(
        &self,
        _identity: &Name,
        _default_only: bool,
    ) -> Result<Vec<Name>, StoreError> {
        Err(StoreError::Unsupported {
            operation: "all_key_names_of_identity",
        })
    }

    fn all_certificate_names(&self, _default_only: bool) -> Result<Vec<Name>, StoreError> {
        Err(StoreError::Unsupported {
            operation: "all_certificate_names",
        })
    }

    fn all_certificate_names_of_key(
        &self,
        _key_name: &Name,
        _default_only: bool,
    ) -> Result<Vec<Name>, StoreError> {
        Err(StoreError::Unsupported {
            operation: "all_certificate_names_of_key",
        })
    }

    fn delete_certificate(&self, _certificate_name: &Name) -> Result<(), StoreError> {
        Err(StoreError::Unsupported {
            operation: "delete_certificate",
        })
    }

    fn delete_public_key(&self, _key_name: &Name) -> Result<(), StoreError> {
        Err(StoreError::Unsupported {
            operation: "delete_public_key",
        })
    }

    fn delete_identity(&self, _identity: &Name) -> Result<(), StoreError> {
        Err(StoreError::Unsupported {
            operation: "delete_identity",
        })
    }
}
