//! Certificate model, canonical codec, and validity semantics.

use crate::der::{self, DerReader};
use crate::error::FormatError;
use crate::key::KeyInfo;
use crate::oid::Oid;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt;
use verity_core::{timestamp_max, timestamp_min, truncate_to_seconds, Name, SignedData, Timestamp};

/// Name component marking a certificate name:
/// `<key_name>/ID-CERT/<issue>`.
pub const ID_CERT_MARKER: &str = "ID-CERT";

/// One entry of the ordered subject description: an attribute identifier
/// and its string value. Duplicates are allowed and order is preserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectDescription {
    /// Attribute type, e.g. `2.5.4.3` for a common name.
    pub oid: Oid,
    /// Attribute value.
    pub value: String,
}

impl SubjectDescription {
    /// Build from an attribute identifier and value.
    pub fn new(oid: Oid, value: impl Into<String>) -> Self {
        Self {
            oid,
            value: value.into(),
        }
    }

    fn write_der(&self, out: &mut Vec<u8>) -> Result<(), FormatError> {
        let mut body = Vec::new();
        self.oid.write_der(&mut body)?;
        der::write_tlv(&mut body, der::TAG_UTF8_STRING, self.value.as_bytes());
        der::write_tlv(out, der::TAG_SEQUENCE, &body);
        Ok(())
    }

    fn read_der(reader: &mut DerReader<'_>) -> Result<Self, FormatError> {
        let mut entry = reader.enter_sequence()?;
        let oid = Oid::read_der(&mut entry)?;
        let value = entry.read_element(der::TAG_UTF8_STRING)?;
        entry.expect_end()?;
        Ok(Self {
            oid,
            value: std::str::from_utf8(value)
                .map_err(|_| FormatError::BadString)?
                .to_owned(),
        })
    }
}

/// An extension entry: identifier, criticality, opaque value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateExtension {
    /// Extension identifier.
    pub oid: Oid,
    /// Whether a consumer that does not understand the extension must
    /// reject the certificate.
    pub critical: bool,
    /// Opaque extension value.
    pub value: Vec<u8>,
}

impl CertificateExtension {
    /// Build an extension entry.
    pub fn new(oid: Oid, critical: bool, value: Vec<u8>) -> Self {
        Self {
            oid,
            critical,
            value,
        }
    }

    fn write_der(&self, out: &mut Vec<u8>) -> Result<(), FormatError> {
        let mut body = Vec::new();
        self.oid.write_der(&mut body)?;
        der::write_tlv(
            &mut body,
            der::TAG_BOOLEAN,
            &[if self.critical { 0xff } else { 0x00 }],
        );
        der::write_tlv(&mut body, der::TAG_OCTET_STRING, &self.value);
        der::write_tlv(out, der::TAG_SEQUENCE, &body);
        Ok(())
    }

    fn read_der(reader: &mut DerReader<'_>) -> Result<Self, FormatError> {
        let mut entry = reader.enter_sequence()?;
        let oid = Oid::read_der(&mut entry)?;
        let critical = entry.read_boolean()?;
        let value = entry.read_element(der::TAG_OCTET_STRING)?.to_vec();
        entry.expect_end()?;
        Ok(Self {
            oid,
            critical,
            value,
        })
    }
}

/// A certificate: an identity name bound to a public key for a validity
/// window, with an ordered subject description and optional extensions.
///
/// A default-constructed certificate has an empty validity interval
/// (`not_before` at the latest representable instant, `not_after` at the
/// earliest), signaling "not yet set".
///
/// Validity bounds carry whole-second resolution, matching the wire
/// encoding; [`set_validity`](Self::set_validity) clamps finer timestamps
/// on the way in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    /// Certificate name, conventionally `<key_name>/ID-CERT/<issue>`.
    pub name: Name,
    /// Start of the validity window.
    pub not_before: Timestamp,
    /// End of the validity window.
    pub not_after: Timestamp,
    /// Ordered subject description entries.
    pub subject: Vec<SubjectDescription>,
    /// The public key this certificate certifies.
    pub key: KeyInfo,
    /// Ordered extension entries; may be empty.
    pub extensions: Vec<CertificateExtension>,
}

impl Default for Certificate {
    fn default() -> Self {
        Self {
            name: Name::root(),
            not_before: timestamp_max(),
            not_after: timestamp_min(),
            subject: Vec::new(),
            key: KeyInfo::new(verity_core::KeyType::Rsa, Vec::new()),
            extensions: Vec::new(),
        }
    }
}

impl Certificate {
    /// The name of the key this certificate certifies: the certificate
    /// name truncated before its `ID-CERT` component.
    ///
    /// `None` if the name does not follow the certificate naming
    /// convention.
    pub fn public_key_name(&self) -> Option<Name> {
        self.name
            .position_of(ID_CERT_MARKER)
            .map(|index| self.name.prefix(index))
    }

    /// Set the validity window, clamping both bounds to whole seconds so
    /// the stored interval is exactly what the encoding reproduces.
    pub fn set_validity(&mut self, not_before: Timestamp, not_after: Timestamp) {
        self.not_before = truncate_to_seconds(not_before);
        self.not_after = truncate_to_seconds(not_after);
    }

    /// True strictly before the validity window opens.
    pub fn is_too_early(&self, now: Timestamp) -> bool {
        now < self.not_before
    }

    /// True strictly after the validity window closes.
    pub fn is_too_late(&self, now: Timestamp) -> bool {
        now > self.not_after
    }

    /// True while `now` is inside the validity window (inclusive bounds).
    pub fn is_valid_at(&self, now: Timestamp) -> bool {
        !self.is_too_early(now) && !self.is_too_late(now)
    }

    /// Encode to the canonical binary form.
    ///
    /// Encoding is idempotent and never cached. Fails only if an object
    /// identifier in the certificate is structurally invalid.
    pub fn encode(&self) -> Result<Vec<u8>, FormatError> {
        let mut body = Vec::new();

        let mut validity = Vec::new();
        der::write_generalized_time(&mut validity, self.not_before);
        der::write_generalized_time(&mut validity, self.not_after);
        der::write_tlv(&mut body, der::TAG_SEQUENCE, &validity);

        let mut subject = Vec::new();
        for description in &self.subject {
            description.write_der(&mut subject)?;
        }
        der::write_tlv(&mut body, der::TAG_SEQUENCE, &subject);

        self.key.write_der(&mut body)?;

        // The extensions record is present only when the list is non-empty.
        if !self.extensions.is_empty() {
            let mut extensions = Vec::new();
            for extension in &self.extensions {
                extension.write_der(&mut extensions)?;
            }
            der::write_tlv(&mut body, der::TAG_SEQUENCE, &extensions);
        }

        let mut out = Vec::new();
        der::write_tlv(&mut out, der::TAG_SEQUENCE, &body);
        Ok(out)
    }

    /// Decode from the canonical binary form.
    ///
    /// The structural mirror of [`encode`](Self::encode): strict field
    /// order, all-or-nothing. The decoded name is empty; callers that
    /// fetched a named carrier use [`from_data`](Self::from_data).
    pub fn decode(input: &[u8]) -> Result<Self, FormatError> {
        let mut outer = DerReader::new(input);
        let mut record = outer.enter_sequence()?;
        outer.expect_end()?;

        let mut validity = record.enter_sequence()?;
        let not_before = validity.read_generalized_time()?;
        let not_after = validity.read_generalized_time()?;
        validity.expect_end()?;

        let mut subject = Vec::new();
        let mut subject_record = record.enter_sequence()?;
        while !subject_record.is_empty() {
            subject.push(SubjectDescription::read_der(&mut subject_record)?);
        }

        let key = KeyInfo::read_der(&mut record)?;

        // Extensions are read only if bytes remain in the outer record.
        let mut extensions = Vec::new();
        if !record.is_empty() {
            let mut extension_record = record.enter_sequence()?;
            while !extension_record.is_empty() {
                extensions.push(CertificateExtension::read_der(&mut extension_record)?);
            }
        }
        record.expect_end()?;

        if not_before > not_after {
            return Err(FormatError::InvalidValidity);
        }

        Ok(Self {
            name: Name::root(),
            not_before,
            not_after,
            subject,
            key,
            extensions,
        })
    }

    /// Decode a certificate carried in a fetched content packet, taking the
    /// certificate name from the carrier.
    pub fn from_data(carrier: &SignedData) -> Result<Self, FormatError> {
        let mut certificate = Self::decode(&carrier.content)?;
        certificate.name = carrier.name.clone();
        Ok(certificate)
    }
}

impl fmt::Display for Certificate {
    /// Diagnostic rendering; not part of the wire contract.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Certificate name:")?;
        writeln!(f, "  {}", self.name)?;
        writeln!(f, "Validity:")?;
        writeln!(f, "  NotBefore: {}", self.not_before.format("%Y%m%dT%H%M%S"))?;
        writeln!(f, "  NotAfter: {}", self.not_after.format("%Y%m%dT%H%M%S"))?;
        writeln!(f, "Subject Description:")?;
        for description in &self.subject {
            writeln!(f, "  {}: {}", description.oid, description.value)?;
        }
        writeln!(f, "Public key bits:")?;
        let encoded = base64::engine::general_purpose::STANDARD.encode(&self.key.key_bits);
        for line in encoded.as_bytes().chunks(64) {
            writeln!(f, "{}", String::from_utf8_lossy(line))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use verity_core::KeyType;

    fn sample() -> Certificate {
        Certificate {
            name: Name::from("/alice/KEY1/ID-CERT/1"),
            not_before: chrono::Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            not_after: chrono::Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            subject: vec![
                SubjectDescription::new(Oid::new(&[2, 5, 4, 3]), "Alice"),
                SubjectDescription::new(Oid::new(&[2, 5, 4, 10]), "Wonderland"),
            ],
            key: KeyInfo::new(KeyType::Ed25519, vec![0xaa; 32]),
            extensions: Vec::new(),
        }
    }

    #[test]
    fn default_certificate_has_empty_validity() {
        let certificate = Certificate::default();
        assert_eq!(certificate.not_before, timestamp_max());
        assert_eq!(certificate.not_after, timestamp_min());
        // No instant is inside an unset interval.
        assert!(!certificate.is_valid_at(chrono::Utc::now()));
    }

    #[test]
    fn round_trip_without_extensions() {
        let certificate = sample();
        let bytes = certificate.encode().unwrap();
        let decoded = Certificate::decode(&bytes).unwrap();
        assert_eq!(decoded.not_before, certificate.not_before);
        assert_eq!(decoded.not_after, certificate.not_after);
        assert_eq!(decoded.subject, certificate.subject);
        assert_eq!(decoded.key, certificate.key);
        assert!(decoded.extensions.is_empty());
    }

    #[test]
    fn round_trip_with_extensions() {
        let mut certificate = sample();
        certificate.extensions = vec![
            CertificateExtension::new(Oid::new(&[2, 5, 29, 19]), true, vec![1, 2, 3]),
            CertificateExtension::new(Oid::new(&[2, 5, 29, 15]), false, vec![]),
        ];
        let bytes = certificate.encode().unwrap();
        let decoded = Certificate::decode(&bytes).unwrap();
        assert_eq!(decoded.extensions, certificate.extensions);
    }

    #[test]
    fn sub_second_validity_round_trips_exactly() {
        let mut certificate = sample();
        certificate.set_validity(
            chrono::Utc.timestamp_opt(1_704_067_200, 123_456_789).unwrap(),
            chrono::Utc.timestamp_opt(1_767_225_600, 987_654_321).unwrap(),
        );
        let decoded = Certificate::decode(&certificate.encode().unwrap()).unwrap();
        assert_eq!(decoded.not_before, certificate.not_before);
        assert_eq!(decoded.not_after, certificate.not_after);
    }

    #[test]
    fn clock_derived_validity_round_trips_exactly() {
        let now = chrono::Utc::now();
        let mut certificate = sample();
        certificate.set_validity(now, now + chrono::Duration::days(365));
        let decoded = Certificate::decode(&certificate.encode().unwrap()).unwrap();
        assert_eq!(decoded.not_before, certificate.not_before);
        assert_eq!(decoded.not_after, certificate.not_after);
    }

    #[test]
    fn encode_is_idempotent() {
        let certificate = sample();
        assert_eq!(certificate.encode().unwrap(), certificate.encode().unwrap());
    }

    #[test]
    fn duplicate_subject_entries_preserve_order() {
        let mut certificate = sample();
        certificate.subject = vec![
            SubjectDescription::new(Oid::new(&[2, 5, 4, 3]), "first"),
            SubjectDescription::new(Oid::new(&[2, 5, 4, 3]), "second"),
        ];
        let decoded = Certificate::decode(&certificate.encode().unwrap()).unwrap();
        assert_eq!(decoded.subject[0].value, "first");
        assert_eq!(decoded.subject[1].value, "second");
    }

    #[test]
    fn validity_boundary_semantics() {
        let certificate = sample();
        let before = certificate.not_before - chrono::Duration::seconds(1);
        let after = certificate.not_after + chrono::Duration::seconds(1);

        assert!(certificate.is_too_early(before));
        assert!(!certificate.is_too_early(certificate.not_before));
        assert!(!certificate.is_too_late(certificate.not_after));
        assert!(certificate.is_too_late(after));

        assert!(certificate.is_valid_at(certificate.not_before));
        assert!(certificate.is_valid_at(certificate.not_after));
        assert!(!certificate.is_valid_at(before));
        assert!(!certificate.is_valid_at(after));
    }

    #[test]
    fn inverted_validity_is_rejected() {
        let mut certificate = sample();
        std::mem::swap(&mut certificate.not_before, &mut certificate.not_after);
        let bytes = certificate.encode().unwrap();
        assert_eq!(
            Certificate::decode(&bytes),
            Err(FormatError::InvalidValidity)
        );
    }

    #[test]
    fn truncated_record_is_rejected() {
        let bytes = sample().encode().unwrap();
        let cut = &bytes[..bytes.len() - 3];
        assert!(matches!(
            Certificate::decode(cut),
            Err(FormatError::Truncated { .. })
        ));
    }

    #[test]
    fn trailing_garbage_is_rejected() {
        let mut bytes = sample().encode().unwrap();
        bytes.push(0x00);
        assert!(matches!(
            Certificate::decode(&bytes),
            Err(FormatError::TrailingBytes { .. })
        ));
    }

    #[test]
    fn public_key_name_follows_convention() {
        let certificate = sample();
        assert_eq!(
            certificate.public_key_name(),
            Some(Name::from("/alice/KEY1"))
        );

        let mut unnamed = certificate;
        unnamed.name = Name::from("/alice/KEY1");
        assert_eq!(unnamed.public_key_name(), None);
    }

    #[test]
    fn from_data_takes_carrier_name() {
        let certificate = sample();
        let carrier = SignedData {
            name: certificate.name.clone(),
            content: certificate.encode().unwrap(),
            signature: verity_core::SignatureInfo {
                key_locator: Name::from("/root/KEY0/ID-CERT/1"),
                signature: vec![0; 64],
            },
        };
        let decoded = Certificate::from_data(&carrier).unwrap();
        assert_eq!(decoded.name, certificate.name);
        assert_eq!(decoded.key, certificate.key);
    }

    #[test]
    fn diagnostic_rendering_lists_subject() {
        let text = sample().to_string();
        assert!(text.contains("Certificate name:"));
        assert!(text.contains("2.5.4.3: Alice"));
        assert!(text.contains("NotBefore: 20240101T000000"));
    }
}
