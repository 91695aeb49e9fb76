//! Verity Cert - Certificate Model and Canonical Binary Codec
//!
//! A certificate binds an identity name to a public key for a validity
//! window, with an ordered subject description and optional extensions. The
//! wire form is a closed, hand-rolled DER subset:
//!
//! ```text
//! idCert   ::= SEQUENCE { validity, subject, subjectPubKeyInfo, extensions OPTIONAL }
//! validity ::= SEQUENCE { notBefore GeneralizedTime, notAfter GeneralizedTime }
//! subject  ::= SEQUENCE OF SEQUENCE { oid OBJECT IDENTIFIER, value UTF8String }
//! subjectPubKeyInfo ::= SEQUENCE { algorithm SEQUENCE { oid, NULL }, keybits BIT STRING }
//! extensions ::= SEQUENCE OF SEQUENCE { oid, critical BOOLEAN, value OCTET STRING }
//! ```
//!
//! Field order is strict: decoders reject any structural deviation, and
//! decoding is all-or-nothing.

#![forbid(unsafe_code)]

pub mod certificate;
pub mod der;
pub mod error;
pub mod key;
pub mod oid;

pub use certificate::{Certificate, CertificateExtension, SubjectDescription, ID_CERT_MARKER};
pub use error::FormatError;
pub use key::KeyInfo;
pub use oid::Oid;

pub use verity_core::KeyType;
