//! Object identifiers in dotted-decimal form.

use crate::der::{DerReader, TAG_OID};
use crate::error::FormatError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An object identifier: a sequence of integer arcs, e.g. `2.5.4.3`.
///
/// Valid identifiers have at least two arcs with the first arc in `0..=2`;
/// the DER codec enforces this on both encode and decode.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Oid(pub Vec<u64>);

impl Oid {
    /// Build from a slice of arcs.
    pub fn new(arcs: &[u64]) -> Self {
        Self(arcs.to_vec())
    }

    /// Append this identifier as one DER OBJECT IDENTIFIER element.
    pub(crate) fn write_der(&self, out: &mut Vec<u8>) -> Result<(), FormatError> {
        let [first, second, rest @ ..] = self.0.as_slice() else {
            return Err(FormatError::BadOid);
        };
        if *first > 2 || (*first < 2 && *second > 39) {
            return Err(FormatError::BadOid);
        }
        let mut body = Vec::new();
        write_base128(&mut body, first * 40 + second);
        for arc in rest {
            write_base128(&mut body, *arc);
        }
        crate::der::write_tlv(out, TAG_OID, &body);
        Ok(())
    }

    /// Read one DER OBJECT IDENTIFIER element.
    pub(crate) fn read_der(reader: &mut DerReader<'_>) -> Result<Self, FormatError> {
        let content = reader.read_element(TAG_OID)?;
        if content.is_empty() {
            return Err(FormatError::BadOid);
        }
        let mut arcs = Vec::new();
        let mut bytes = content.iter();
        let head = read_base128(&mut bytes)?;
        if head < 80 {
            arcs.push(head / 40);
            arcs.push(head % 40);
        } else {
            arcs.push(2);
            arcs.push(head - 80);
        }
        while bytes.len() > 0 {
            arcs.push(read_base128(&mut bytes)?);
        }
        Ok(Self(arcs))
    }
}

fn write_base128(out: &mut Vec<u8>, mut value: u64) {
    let mut chunks = [0u8; 10];
    let mut count = 0;
    loop {
        chunks[count] = (value & 0x7f) as u8;
        count += 1;
        value >>= 7;
        if value == 0 {
            break;
        }
    }
    for i in (0..count).rev() {
        let continuation = if i == 0 { 0 } else { 0x80 };
        out.push(chunks[i] | continuation);
    }
}

fn read_base128(bytes: &mut std::slice::Iter<'_, u8>) -> Result<u64, FormatError> {
    let mut value: u64 = 0;
    for _ in 0..10 {
        let byte = *bytes.next().ok_or(FormatError::BadOid)?;
        value = value
            .checked_shl(7)
            .ok_or(FormatError::BadOid)?
            .checked_add((byte & 0x7f) as u64)
            .ok_or(FormatError::BadOid)?;
        if byte & 0x80 == 0 {
            return Ok(value);
        }
    }
    Err(FormatError::BadOid)
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut arcs = self.0.iter();
        if let Some(first) = arcs.next() {
            write!(f, "{first}")?;
        }
        for arc in arcs {
            write!(f, ".{arc}")?;
        }
        Ok(())
    }
}

impl FromStr for Oid {
    type Err = FormatError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let arcs: Result<Vec<u64>, _> = text.split('.').map(str::parse::<u64>).collect();
        match arcs {
            Ok(arcs) if arcs.len() >= 2 => Ok(Self(arcs)),
            _ => Err(FormatError::BadOid),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(oid: &Oid) -> Oid {
        let mut buf = Vec::new();
        oid.write_der(&mut buf).unwrap();
        let mut reader = DerReader::new(&buf);
        let back = Oid::read_der(&mut reader).unwrap();
        assert!(reader.is_empty());
        back
    }

    #[test]
    fn common_name_round_trip() {
        let oid = Oid::new(&[2, 5, 4, 3]);
        assert_eq!(round_trip(&oid), oid);
    }

    #[test]
    fn rsa_encryption_bytes() {
        // Known encoding of 1.2.840.113549.1.1.1.
        let oid: Oid = "1.2.840.113549.1.1.1".parse().unwrap();
        let mut buf = Vec::new();
        oid.write_der(&mut buf).unwrap();
        assert_eq!(
            buf,
            [0x06, 0x09, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x01]
        );
        assert_eq!(round_trip(&oid), oid);
    }

    #[test]
    fn high_second_arc_round_trip() {
        // First subidentifier exceeds one byte (2.999).
        let oid = Oid::new(&[2, 999, 3]);
        assert_eq!(round_trip(&oid), oid);
    }

    #[test]
    fn single_arc_is_rejected() {
        let oid = Oid::new(&[2]);
        let mut buf = Vec::new();
        assert_eq!(oid.write_der(&mut buf), Err(FormatError::BadOid));
        assert!("2".parse::<Oid>().is_err());
    }

    #[test]
    fn display_is_dotted() {
        assert_eq!(Oid::new(&[1, 3, 101, 112]).to_string(), "1.3.101.112");
    }

    #[test]
    fn empty_oid_content_is_rejected() {
        let buf = [0x06, 0x00];
        let mut reader = DerReader::new(&buf);
        assert_eq!(Oid::read_der(&mut reader), Err(FormatError::BadOid));
    }
}
