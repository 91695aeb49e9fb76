//! Public key info and its SubjectPublicKeyInfo encoding.

use crate::der::{self, DerReader, TAG_BIT_STRING, TAG_NULL};
use crate::error::FormatError;
use crate::oid::Oid;
use serde::{Deserialize, Serialize};
use verity_core::KeyType;

const OID_RSA: [u64; 7] = [1, 2, 840, 113549, 1, 1, 1];
const OID_EC: [u64; 6] = [1, 2, 840, 10045, 2, 1];
const OID_ED25519: [u64; 4] = [1, 3, 101, 112];

/// Algorithm identifier for a key type.
pub fn algorithm_oid(key_type: KeyType) -> Oid {
    match key_type {
        KeyType::Rsa => Oid::new(&OID_RSA),
        KeyType::Ec => Oid::new(&OID_EC),
        KeyType::Ed25519 => Oid::new(&OID_ED25519),
    }
}

fn key_type_for(oid: &Oid) -> Option<KeyType> {
    if oid.0 == OID_RSA {
        Some(KeyType::Rsa)
    } else if oid.0 == OID_EC {
        Some(KeyType::Ec)
    } else if oid.0 == OID_ED25519 {
        Some(KeyType::Ed25519)
    } else {
        None
    }
}

/// A public key: algorithm tag plus opaque encoded key bytes.
///
/// This is the record the store keeps per key name and the record a
/// certificate certifies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyInfo {
    /// Algorithm family of the key.
    pub key_type: KeyType,
    /// Opaque encoded public key bytes.
    pub key_bits: Vec<u8>,
}

impl KeyInfo {
    /// Build from a type tag and key bytes.
    pub fn new(key_type: KeyType, key_bits: Vec<u8>) -> Self {
        Self { key_type, key_bits }
    }

    /// Append as one SubjectPublicKeyInfo SEQUENCE.
    pub(crate) fn write_der(&self, out: &mut Vec<u8>) -> Result<(), FormatError> {
        let mut algorithm = Vec::new();
        algorithm_oid(self.key_type).write_der(&mut algorithm)?;
        der::write_tlv(&mut algorithm, TAG_NULL, &[]);

        let mut body = Vec::new();
        der::write_tlv(&mut body, der::TAG_SEQUENCE, &algorithm);
        // BIT STRING with zero unused bits.
        let mut bits = Vec::with_capacity(self.key_bits.len() + 1);
        bits.push(0x00);
        bits.extend_from_slice(&self.key_bits);
        der::write_tlv(&mut body, TAG_BIT_STRING, &bits);

        der::write_tlv(out, der::TAG_SEQUENCE, &body);
        Ok(())
    }

    /// Read one SubjectPublicKeyInfo SEQUENCE.
    pub(crate) fn read_der(reader: &mut DerReader<'_>) -> Result<Self, FormatError> {
        let mut info = reader.enter_sequence()?;

        let mut algorithm = info.enter_sequence()?;
        let oid = Oid::read_der(&mut algorithm)?;
        algorithm.read_element(TAG_NULL)?;
        algorithm.expect_end()?;

        let key_type = key_type_for(&oid).ok_or_else(|| FormatError::UnsupportedAlgorithm {
            oid: oid.to_string(),
        })?;

        let bits = info.read_element(TAG_BIT_STRING)?;
        let [unused, key_bits @ ..] = bits else {
            return Err(FormatError::Truncated { needed: 1 });
        };
        if *unused != 0 {
            return Err(FormatError::BadLength);
        }
        info.expect_end()?;

        Ok(Self {
            key_type,
            key_bits: key_bits.to_vec(),
        })
    }
}
