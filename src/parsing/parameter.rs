//! Parameter record parser.
//!
//! Parameter blocks are runs of self-describing records. Each record has an
//! 8-byte head followed by a typed tail:
//!
//! ```text
//! 0-2  code        three ASCII letters, e.g. NPT, FXV, DXU
//! 3    0x00
//! 4    type byte   see `Value`
//! 5    0x00
//! 6    half-length tail length / 2
//! 7    0x00
//! ```
//!
//! The list ends with an `END` record that has no tail. Its type byte is
//! normally `0x00`, but at least one instrument writes `END\0....`, so
//! `0x2E` is accepted too and the remaining head bytes are not checked.

use super::io::{read_array, read_vec};
use crate::error::{OpusError, Result, Violation};
use std::fmt;
use std::io::Read;

pub const HEAD_SIZE: usize = 8;

/// Code of the list terminator.
pub const END_CODE: &str = "END";

/// Type byte of the divergent `END` encoding.
pub const END_TYPE_DOTTED: u8 = 0x2e;

/// Three-letter parameter code.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Code([u8; 3]);

impl Code {
    /// Build a code from bytes that must be ASCII.
    pub fn new(bytes: [u8; 3]) -> Result<Self> {
        if bytes.is_ascii() {
            Ok(Self(bytes))
        } else {
            Err(OpusError::Encoding {
                field: "parameter code",
                bytes: bytes.to_vec(),
            })
        }
    }

    pub fn as_str(&self) -> &str {
        // ASCII is checked on construction.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }

    pub fn is_end(&self) -> bool {
        self.0 == *b"END"
    }
}

impl fmt::Debug for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.as_str())
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialEq<str> for Code {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Code {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

/// Interpreted tail of a parameter record.
///
/// | type byte | tail | value |
/// |---|---|---|
/// | `0x00`, `0x10` | 4 | [`Value::Integer`] |
/// | `0x01` | 8 | [`Value::Real`] |
/// | `0x02`-`0x04` | any | [`Value::Text`], up to the first NUL |
/// | `END` record | 0 | [`Value::None`] |
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i32),
    Real(f64),
    Text(String),
    None,
}

impl Value {
    pub fn as_integer(&self) -> Option<i32> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_real(&self) -> Option<f64> {
        match self {
            Self::Real(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Decode a tail according to `type_byte`.
    fn interpret(type_byte: u8, tail: &[u8], head: &[u8; HEAD_SIZE]) -> Result<Self> {
        match type_byte {
            0x00 | 0x10 => {
                let bytes: [u8; 4] = fixed_tail(type_byte, tail)?;
                Ok(Self::Integer(i32::from_le_bytes(bytes)))
            }
            0x01 => {
                let bytes: [u8; 8] = fixed_tail(type_byte, tail)?;
                Ok(Self::Real(f64::from_le_bytes(bytes)))
            }
            0x02..=0x04 => {
                let text = tail
                    .iter()
                    .position(|&b| b == 0)
                    // No NUL: the whole tail is text, last byte included.
                    .map_or(tail, |nul| &tail[..nul]);
                if !text.is_ascii() {
                    return Err(OpusError::Encoding {
                        field: "text value",
                        bytes: text.to_vec(),
                    });
                }
                Ok(Self::Text(String::from_utf8_lossy(text).into_owned()))
            }
            _ => Err(OpusError::UnknownType {
                type_byte,
                head: *head,
            }),
        }
    }
}

fn fixed_tail<const N: usize>(type_byte: u8, tail: &[u8]) -> Result<[u8; N]> {
    tail.try_into().map_err(|_| {
        Violation::TailLength {
            type_byte,
            expected: N,
            actual: tail.len(),
        }
        .into()
    })
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{}", v),
            Self::Real(v) => write!(f, "{}", v),
            Self::Text(s) => f.write_str(s),
            Self::None => f.write_str("None"),
        }
    }
}

/// One decoded parameter record.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterRecord {
    code: Code,
    head: [u8; HEAD_SIZE],
    tail: Vec<u8>,
    value: Value,
}

impl ParameterRecord {
    /// Read one record (head and tail) from the current position.
    pub fn read<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        let head = read_array::<HEAD_SIZE, R>(reader)?;
        let tail_len = tail_length(&head)?;
        let tail = read_vec(reader, tail_len)?;
        Self::from_parts(head, tail)
    }

    /// Parse one record from the start of `buffer`.
    ///
    /// Returns the record and the number of bytes consumed.
    pub fn parse(buffer: &[u8]) -> Result<(Self, usize)> {
        let head: [u8; HEAD_SIZE] = *buffer.first_chunk().ok_or(OpusError::Truncated {
            needed: HEAD_SIZE,
            have: buffer.len(),
        })?;
        let tail_len = tail_length(&head)?;
        let end = HEAD_SIZE + tail_len;
        let tail = buffer.get(HEAD_SIZE..end).ok_or(OpusError::Truncated {
            needed: tail_len,
            have: buffer.len() - HEAD_SIZE,
        })?;
        Ok((Self::from_parts(head, tail.to_vec())?, end))
    }

    fn from_parts(head: [u8; HEAD_SIZE], tail: Vec<u8>) -> Result<Self> {
        let code = Code::new([head[0], head[1], head[2]])?;
        let value = if code.is_end() {
            Value::None
        } else {
            Value::interpret(head[4], &tail, &head)?
        };
        tracing::trace!(%code, type_byte = head[4], tail_len = tail.len(), "parameter");
        Ok(Self {
            code,
            head,
            tail,
            value,
        })
    }

    pub fn code(&self) -> Code {
        self.code
    }

    /// Byte 4 of the head.
    pub fn type_byte(&self) -> u8 {
        self.head[4]
    }

    pub fn head(&self) -> &[u8; HEAD_SIZE] {
        &self.head
    }

    pub fn tail(&self) -> &[u8] {
        &self.tail
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    pub fn is_end(&self) -> bool {
        self.code.is_end()
    }
}

impl fmt::Display for ParameterRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.code, self.value)
    }
}

/// Validate the head and return the tail length it declares.
fn tail_length(head: &[u8; HEAD_SIZE]) -> Result<usize> {
    let code = Code::new([head[0], head[1], head[2]])?;
    expect_zero(head, 3)?;

    if code.is_end() {
        return match head[4] {
            0x00 => Ok(0),
            END_TYPE_DOTTED => {
                tracing::debug!(head = ?head, "accepting dotted END terminator");
                Ok(0)
            }
            other => Err(Violation::EndTypeByte(other).into()),
        };
    }

    expect_zero(head, 5)?;
    expect_zero(head, 7)?;
    // Stored as half the byte length.
    Ok(usize::from(head[6]) * 2)
}

fn expect_zero(head: &[u8; HEAD_SIZE], position: usize) -> Result<()> {
    match head[position] {
        0 => Ok(()),
        value => Err(Violation::NonZeroHeadByte { position, value }.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn record(code: &[u8; 3], type_byte: u8, tail: &[u8]) -> Vec<u8> {
        assert_eq!(tail.len() % 2, 0);
        let mut out = vec![
            code[0],
            code[1],
            code[2],
            0,
            type_byte,
            0,
            (tail.len() / 2) as u8,
            0,
        ];
        out.extend_from_slice(tail);
        out
    }

    fn read(bytes: &[u8]) -> Result<ParameterRecord> {
        ParameterRecord::read(&mut Cursor::new(bytes))
    }

    #[test]
    fn test_integer() {
        let p = read(&record(b"NPT", 0x00, &42i32.to_le_bytes())).unwrap();
        assert_eq!(p.code(), "NPT");
        assert_eq!(p.value(), &Value::Integer(42));
        assert_eq!(p.tail().len(), 4);
    }

    #[test]
    fn test_integer_type_0x10() {
        let p = read(&record(b"DPF", 0x10, &(-7i32).to_le_bytes())).unwrap();
        assert_eq!(p.value().as_integer(), Some(-7));
    }

    #[test]
    fn test_real_is_bit_exact() {
        let x = 15798.0130_f64;
        let p = read(&record(b"FXV", 0x01, &x.to_le_bytes())).unwrap();
        assert_eq!(p.value().as_real().unwrap().to_bits(), x.to_bits());
    }

    #[test]
    fn test_text_stops_at_nul() {
        let p = read(&record(b"DXU", 0x02, b"WN\0\0")).unwrap();
        assert_eq!(p.value(), &Value::Text("WN".into()));
        assert_eq!(p.to_string(), "DXU=WN");
    }

    #[test]
    fn test_text_without_nul() {
        let p = read(&record(b"SNM", 0x04, b"ab")).unwrap();
        assert_eq!(p.value().as_text(), Some("ab"));
    }

    #[test]
    fn test_end_record() {
        let mut cursor = Cursor::new(b"END\0\0\0\0\0trailing".to_vec());
        let p = ParameterRecord::read(&mut cursor).unwrap();
        assert!(p.is_end());
        assert_eq!(p.value(), &Value::None);
        assert!(p.tail().is_empty());
        assert_eq!(cursor.position(), 8);
    }

    #[test]
    fn test_dotted_end_record() {
        let mut cursor = Cursor::new(b"END\0....".to_vec());
        let p = ParameterRecord::read(&mut cursor).unwrap();
        assert!(p.is_end());
        assert_eq!(p.type_byte(), 0x2e);
        assert_eq!(cursor.position(), 8);
    }

    #[test]
    fn test_end_with_other_type_byte() {
        assert!(matches!(
            read(b"END\0\x01\0\0\0"),
            Err(OpusError::StructuralViolation(Violation::EndTypeByte(1)))
        ));
    }

    #[test]
    fn test_unknown_type() {
        let err = read(&record(b"XYZ", 0x05, &[0; 4])).unwrap_err();
        match err {
            OpusError::UnknownType { type_byte, head } => {
                assert_eq!(type_byte, 5);
                assert_eq!(&head[..3], b"XYZ");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_integer_with_wrong_tail_length() {
        assert!(matches!(
            read(&record(b"NPT", 0x00, &[0; 6])),
            Err(OpusError::StructuralViolation(Violation::TailLength {
                type_byte: 0,
                expected: 4,
                actual: 6
            }))
        ));
    }

    #[test]
    fn test_non_zero_padding() {
        let mut bytes = record(b"NPT", 0x00, &[0; 4]);
        bytes[3] = 1;
        assert!(matches!(
            read(&bytes),
            Err(OpusError::StructuralViolation(Violation::NonZeroHeadByte {
                position: 3,
                value: 1
            }))
        ));

        let mut bytes = record(b"NPT", 0x00, &[0; 4]);
        bytes[7] = 9;
        assert!(matches!(
            read(&bytes),
            Err(OpusError::StructuralViolation(Violation::NonZeroHeadByte {
                position: 7,
                value: 9
            }))
        ));
    }

    #[test]
    fn test_non_zero_byte_after_type() {
        let mut bytes = record(b"FXV", 0x01, &[0; 8]);
        bytes[5] = 0x20;
        assert!(matches!(
            read(&bytes),
            Err(OpusError::StructuralViolation(Violation::NonZeroHeadByte {
                position: 5,
                value: 0x20
            }))
        ));
    }

    #[test]
    fn test_real_with_wrong_tail_length() {
        assert!(matches!(
            read(&record(b"LXV", 0x01, &[0; 4])),
            Err(OpusError::StructuralViolation(Violation::TailLength {
                type_byte: 1,
                expected: 8,
                actual: 4
            }))
        ));
    }

    #[test]
    fn test_non_ascii_code() {
        assert!(matches!(
            read(&record(&[0xc3, 0xa9, b'X'], 0x00, &[0; 4])),
            Err(OpusError::Encoding { .. })
        ));
    }

    #[test]
    fn test_non_ascii_text() {
        assert!(matches!(
            read(&record(b"SNM", 0x02, &[0xff, 0x00])),
            Err(OpusError::Encoding { .. })
        ));
    }

    #[test]
    fn test_truncated_tail() {
        let mut bytes = record(b"FXV", 0x01, &[0; 8]);
        bytes.truncate(12);
        assert!(matches!(
            read(&bytes),
            Err(OpusError::Truncated { needed: 8, have: 4 })
        ));
    }

    #[test]
    fn test_parse_truncated_tail() {
        let mut bytes = record(b"FXV", 0x01, &[0; 8]);
        bytes.truncate(HEAD_SIZE + 3);
        assert!(matches!(
            ParameterRecord::parse(&bytes),
            Err(OpusError::Truncated { needed: 8, have: 3 })
        ));
        assert!(matches!(
            ParameterRecord::parse(b"NPT\0"),
            Err(OpusError::Truncated { needed: 8, have: 4 })
        ));
    }

    #[test]
    fn test_parse_from_slice() {
        let mut bytes = record(b"NPT", 0x00, &7i32.to_le_bytes());
        bytes.extend_from_slice(b"END\0\0\0\0\0");
        let (p, used) = ParameterRecord::parse(&bytes).unwrap();
        assert_eq!(used, 12);
        assert_eq!(p.value(), &Value::Integer(7));
        let (end, used) = ParameterRecord::parse(&bytes[12..]).unwrap();
        assert!(end.is_end());
        assert_eq!(used, 8);
    }
}
