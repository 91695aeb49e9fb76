//! Minimal DER reader/writer for the closed certificate grammar.
//!
//! Only what the certificate schema needs: definite lengths (short and long
//! form), a handful of universal tags, and generalized-time text. Indefinite
//! lengths are rejected.

use crate::error::FormatError;
use verity_core::Timestamp;

/// Universal tag: SEQUENCE (constructed).
pub const TAG_SEQUENCE: u8 = 0x30;
/// Universal tag: BOOLEAN.
pub const TAG_BOOLEAN: u8 = 0x01;
/// Universal tag: BIT STRING.
pub const TAG_BIT_STRING: u8 = 0x03;
/// Universal tag: OCTET STRING.
pub const TAG_OCTET_STRING: u8 = 0x04;
/// Universal tag: NULL.
pub const TAG_NULL: u8 = 0x05;
/// Universal tag: OBJECT IDENTIFIER.
pub const TAG_OID: u8 = 0x06;
/// Universal tag: UTF8String.
pub const TAG_UTF8_STRING: u8 = 0x0c;
/// Universal tag: GeneralizedTime.
pub const TAG_GENERALIZED_TIME: u8 = 0x18;

const GENERALIZED_TIME_FORMAT: &str = "%Y%m%d%H%M%SZ";

/// Append one tag-length-value element.
pub fn write_tlv(out: &mut Vec<u8>, tag: u8, content: &[u8]) {
    out.push(tag);
    write_len(out, content.len());
    out.extend_from_slice(content);
}

fn write_len(out: &mut Vec<u8>, len: usize) {
    if len < 0x80 {
        out.push(len as u8);
        return;
    }
    let bytes = len.to_be_bytes();
    let skip = bytes.iter().take_while(|b| **b == 0).count();
    let significant = &bytes[skip..];
    out.push(0x80 | significant.len() as u8);
    out.extend_from_slice(significant);
}

/// Append a GeneralizedTime element in the canonical `YYYYMMDDhhmmssZ` form.
pub fn write_generalized_time(out: &mut Vec<u8>, instant: Timestamp) {
    let text = instant.format(GENERALIZED_TIME_FORMAT).to_string();
    write_tlv(out, TAG_GENERALIZED_TIME, text.as_bytes());
}

/// Cursor over one level of a DER record.
///
/// Entering a nested SEQUENCE yields a child reader over exactly that
/// sub-record's content, so structural over- and under-runs are caught at
/// every level.
pub struct DerReader<'a> {
    input: &'a [u8],
}

impl<'a> DerReader<'a> {
    /// Read from `input`, which must hold exactly one level of elements.
    pub fn new(input: &'a [u8]) -> Self {
        Self { input }
    }

    /// True once every element at this level has been consumed.
    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    /// The tag of the next element, if any bytes remain.
    pub fn peek_tag(&self) -> Option<u8> {
        self.input.first().copied()
    }

    /// Consume the next element, requiring `expected` as its tag.
    ///
    /// Returns the element's content bytes. An out-of-order field surfaces
    /// here as [`FormatError::UnexpectedTag`].
    pub fn read_element(&mut self, expected: u8) -> Result<&'a [u8], FormatError> {
        let found = self.read_byte()?;
        if found != expected {
            return Err(FormatError::UnexpectedTag { expected, found });
        }
        let len = self.read_len()?;
        if self.input.len() < len {
            return Err(FormatError::Truncated {
                needed: len - self.input.len(),
            });
        }
        let (content, rest) = self.input.split_at(len);
        self.input = rest;
        Ok(content)
    }

    /// Consume a nested SEQUENCE and return a reader over its content.
    pub fn enter_sequence(&mut self) -> Result<DerReader<'a>, FormatError> {
        Ok(DerReader::new(self.read_element(TAG_SEQUENCE)?))
    }

    /// Consume a GeneralizedTime element.
    pub fn read_generalized_time(&mut self) -> Result<Timestamp, FormatError> {
        let content = self.read_element(TAG_GENERALIZED_TIME)?;
        let text = std::str::from_utf8(content).map_err(|_| FormatError::BadTimestamp {
            text: String::from_utf8_lossy(content).into_owned(),
        })?;
        chrono::NaiveDateTime::parse_from_str(text, GENERALIZED_TIME_FORMAT)
            .map(|naive| naive.and_utc())
            .map_err(|_| FormatError::BadTimestamp {
                text: text.to_owned(),
            })
    }

    /// Consume a BOOLEAN element.
    pub fn read_boolean(&mut self) -> Result<bool, FormatError> {
        let content = self.read_element(TAG_BOOLEAN)?;
        match content {
            [0x00] => Ok(false),
            [_] => Ok(true),
            _ => Err(FormatError::BadBoolean),
        }
    }

    /// Fail with [`FormatError::TrailingBytes`] unless this level is spent.
    pub fn expect_end(&self) -> Result<(), FormatError> {
        if self.input.is_empty() {
            Ok(())
        } else {
            Err(FormatError::TrailingBytes {
                count: self.input.len(),
            })
        }
    }

    fn read_byte(&mut self) -> Result<u8, FormatError> {
        let (byte, rest) = self
            .input
            .split_first()
            .ok_or(FormatError::Truncated { needed: 1 })?;
        self.input = rest;
        Ok(*byte)
    }

    fn read_len(&mut self) -> Result<usize, FormatError> {
        let first = self.read_byte()?;
        if first < 0x80 {
            return Ok(first as usize);
        }
        let count = (first & 0x7f) as usize;
        // 0x80 is the indefinite form, which DER forbids.
        if count == 0 || count > std::mem::size_of::<usize>() {
            return Err(FormatError::BadLength);
        }
        let mut len: usize = 0;
        for _ in 0..count {
            len = (len << 8) | self.read_byte()? as usize;
        }
        Ok(len)
    }
}
