//! Codec property and structural-order tests.

use chrono::TimeZone;
use proptest::prelude::*;
use verity_cert::{
    Certificate, CertificateExtension, FormatError, KeyInfo, KeyType, Oid, SubjectDescription,
};
use verity_core::Name;

fn arb_oid() -> impl Strategy<Value = Oid> {
    (0u64..3, 0u64..40, proptest::collection::vec(0u64..100_000, 0..4)).prop_map(
        |(first, second, rest)| {
            let mut arcs = vec![first, second];
            arcs.extend(rest);
            Oid(arcs)
        },
    )
}

fn arb_subject() -> impl Strategy<Value = Vec<SubjectDescription>> {
    proptest::collection::vec(
        (arb_oid(), "[a-zA-Z0-9 ]{0,24}")
            .prop_map(|(oid, value)| SubjectDescription::new(oid, value)),
        1..5,
    )
}

fn arb_extensions() -> impl Strategy<Value = Vec<CertificateExtension>> {
    proptest::collection::vec(
        (
            arb_oid(),
            any::<bool>(),
            proptest::collection::vec(any::<u8>(), 0..32),
        )
            .prop_map(|(oid, critical, value)| CertificateExtension::new(oid, critical, value)),
        0..4,
    )
}

fn arb_certificate() -> impl Strategy<Value = Certificate> {
    (
        arb_subject(),
        arb_extensions(),
        proptest::sample::select(vec![KeyType::Rsa, KeyType::Ec, KeyType::Ed25519]),
        proptest::collection::vec(any::<u8>(), 1..64),
        (0i64..2_000_000_000, 0u32..1_000_000_000),
        (0i64..2_000_000_000, 0u32..1_000_000_000),
    )
        .prop_map(
            |(subject, extensions, key_type, key_bits, (sa, na), (sb, nb))| {
                let mut certificate = Certificate {
                    name: Name::root(),
                    subject,
                    key: KeyInfo::new(key_type, key_bits),
                    extensions,
                    ..Certificate::default()
                };
                // Bounds may carry sub-second precision; the setter clamps
                // them to the wire resolution.
                let a = chrono::Utc.timestamp_opt(sa, na).unwrap();
                let b = chrono::Utc.timestamp_opt(sb, nb).unwrap();
                certificate.set_validity(a.min(b), a.max(b));
                certificate
            },
        )
}

proptest! {
    /// Any schema-valid certificate survives encode/decode field-for-field.
    #[test]
    fn decode_inverts_encode(certificate in arb_certificate()) {
        let bytes = certificate.encode().unwrap();
        let decoded = Certificate::decode(&bytes).unwrap();
        prop_assert_eq!(decoded, certificate);
    }

    /// Decoding never panics on arbitrary input.
    #[test]
    fn decode_is_total(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
        let _ = Certificate::decode(&bytes);
    }
}

/// A record whose subject sub-record precedes its validity sub-record must
/// be rejected: the decoder expects the two generalized-time fields first
/// and reports the misplaced tag.
#[test]
fn out_of_order_fields_are_rejected() {
    let good = Certificate {
        name: Name::root(),
        not_before: chrono::Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        not_after: chrono::Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        subject: vec![SubjectDescription::new(Oid::new(&[2, 5, 4, 3]), "Alice")],
        key: KeyInfo::new(KeyType::Ed25519, vec![7; 32]),
        extensions: Vec::new(),
    };
    let bytes = good.encode().unwrap();

    // The outer record holds three sub-records: validity, subject, key
    // info. Swap the first two and re-wrap.
    let body = &bytes[2..];
    let validity_len = 2 + body[1] as usize;
    let validity = &body[..validity_len];
    let rest = &body[validity_len..];
    let subject_len = 2 + rest[1] as usize;
    let subject = &rest[..subject_len];
    let key_info = &rest[subject_len..];

    let mut swapped_body = Vec::new();
    swapped_body.extend_from_slice(subject);
    swapped_body.extend_from_slice(validity);
    swapped_body.extend_from_slice(key_info);

    let mut swapped = vec![0x30, swapped_body.len() as u8];
    swapped.extend_from_slice(&swapped_body);

    assert!(matches!(
        Certificate::decode(&swapped),
        Err(FormatError::UnexpectedTag { .. })
    ));
}
