//! The signed item model.
//!
//! The trust engine makes decisions about two kinds of items: signed content
//! ([`SignedData`]) and signed requests for content ([`SignedInterest`]).
//! Both carry a [`SignatureInfo`] whose key locator names the certificate
//! that must be trusted before the signature can be believed.

use crate::name::Name;
use serde::{Deserialize, Serialize};

/// Tag identifying the algorithm family a public key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyType {
    /// RSA public key.
    Rsa,
    /// NIST-curve ECDSA public key.
    Ec,
    /// Ed25519 public key.
    Ed25519,
}

/// Signature metadata attached to a signed item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureInfo {
    /// Name of the certificate (or key) that verifies this signature.
    pub key_locator: Name,
    /// Raw signature bytes.
    pub signature: Vec<u8>,
}

/// A named, signed piece of content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedData {
    /// Content name.
    pub name: Name,
    /// Opaque payload bytes.
    pub content: Vec<u8>,
    /// Signature over the signed portion.
    pub signature: SignatureInfo,
}

impl SignedData {
    /// The bytes covered by the signature: the name in URI form followed by
    /// the content.
    pub fn signed_portion(&self) -> Vec<u8> {
        let mut portion = self.name.to_string().into_bytes();
        portion.extend_from_slice(&self.content);
        portion
    }
}

/// A named, signed request for content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedInterest {
    /// Requested name.
    pub name: Name,
    /// Signature over the signed portion.
    pub signature: SignatureInfo,
}

impl SignedInterest {
    /// The bytes covered by the signature: the requested name in URI form.
    pub fn signed_portion(&self) -> Vec<u8> {
        self.name.to_string().into_bytes()
    }
}

/// Either kind of item the validation engine accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignedItem {
    /// Signed content.
    Data(SignedData),
    /// Signed request for content.
    Interest(SignedInterest),
}

impl SignedItem {
    /// The item's name.
    pub fn name(&self) -> &Name {
        match self {
            SignedItem::Data(data) => &data.name,
            SignedItem::Interest(interest) => &interest.name,
        }
    }

    /// The item's signature metadata.
    pub fn signature(&self) -> &SignatureInfo {
        match self {
            SignedItem::Data(data) => &data.signature,
            SignedItem::Interest(interest) => &interest.signature,
        }
    }

    /// The bytes the signature covers.
    pub fn signed_portion(&self) -> Vec<u8> {
        match self {
            SignedItem::Data(data) => data.signed_portion(),
            SignedItem::Interest(interest) => interest.signed_portion(),
        }
    }
}

impl From<SignedData> for SignedItem {
    fn from(data: SignedData) -> Self {
        SignedItem::Data(data)
    }
}

impl From<SignedInterest> for SignedItem {
    fn from(interest: SignedInterest) -> Self {
        SignedItem::Interest(interest)
    }
}
