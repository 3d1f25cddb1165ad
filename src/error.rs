//! Error types for OPUS decoding.
//!
//! This module provides the [`OpusError`] type which covers every way a
//! decode can fail. All failures are terminal for the decode call that
//! produced them; nothing in the crate tries a second interpretation after
//! an error.
//!
//! ## Error Categories
//!
//! | Category | Errors | Description |
//! |----------|--------|-------------|
//! | Input | [`Truncated`], [`Io`] | Byte source ended early or failed |
//! | Format | [`MagicMismatch`], [`StructuralViolation`], [`Encoding`], [`UnknownType`] | Bytes disagree with the inferred layout |
//! | Lookup | [`NotFound`] | Requested block is not in the directory |
//! | Limits | [`LimitExceeded`] | A [`ParseOptions`] guard tripped, or `NPT` exceeds the samples of its block |
//!
//! ## Example
//!
//! ```rust,ignore
//! use opus_stream::{OpusError, OpusFile};
//!
//! match OpusFile::open("sample.0") {
//!     Ok(file) => println!("{} entries", file.header().entries.len()),
//!     Err(OpusError::MagicMismatch(diffs)) => eprintln!("not OPUS: {} bytes differ", diffs.len()),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```
//!
//! [`Truncated`]: OpusError::Truncated
//! [`Io`]: OpusError::Io
//! [`MagicMismatch`]: OpusError::MagicMismatch
//! [`StructuralViolation`]: OpusError::StructuralViolation
//! [`Encoding`]: OpusError::Encoding
//! [`UnknownType`]: OpusError::UnknownType
//! [`NotFound`]: OpusError::NotFound
//! [`LimitExceeded`]: OpusError::LimitExceeded
//! [`ParseOptions`]: crate::ParseOptions

use std::fmt;
use std::io;

/// Error type for OPUS operations.
#[derive(Debug, thiserror::Error)]
pub enum OpusError {
    /// Fewer bytes were available than a fixed-size field requires.
    #[error("Truncated input: need {needed} bytes, have {have}")]
    Truncated {
        /// Number of bytes needed.
        needed: usize,
        /// Number of bytes available.
        have: usize,
    },

    /// The 20-byte prologue disagrees with the reference pattern under the mask.
    ///
    /// Every differing offset is reported so new file variants can be
    /// characterised from the error alone.
    #[error("MAGIC does not match at {}", MagicDifferences(.0))]
    MagicMismatch(Vec<MagicDifference>),

    /// A byte-level layout assumption does not hold.
    #[error("Structural violation: {0}")]
    StructuralViolation(Violation),

    /// A parameter code or text value is not ASCII.
    #[error("Invalid ASCII in {field}: {bytes:02x?}")]
    Encoding {
        /// Which part of the record failed to decode.
        field: &'static str,
        /// The offending bytes.
        bytes: Vec<u8>,
    },

    /// The type byte of a parameter record has no known interpretation.
    #[error("Unknown parameter type 0x{type_byte:02x}: {head:02x?}")]
    UnknownType {
        /// Byte 4 of the record head.
        type_byte: u8,
        /// The full 8-byte head, for diagnostics.
        head: [u8; 8],
    },

    /// A requested directory entry or parameter does not exist.
    #[error("{0} not found")]
    NotFound(Missing),

    /// A configured limit was exceeded.
    #[error("Too many {what}: limit is {limit}")]
    LimitExceeded {
        /// What was being counted.
        what: &'static str,
        /// The configured limit.
        limit: usize,
    },

    /// An I/O error other than end-of-file.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// One prologue byte that disagrees with the reference pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MagicDifference {
    /// Byte offset within the prologue.
    pub offset: usize,
    /// Byte read from the file.
    pub found: u8,
    /// Byte of the reference pattern.
    pub expected: u8,
}

struct MagicDifferences<'a>(&'a [MagicDifference]);

impl fmt::Display for MagicDifferences<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, d) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(
                f,
                "{:2}: 0x{:02x} (expected 0x{:02x})",
                d.offset, d.found, d.expected
            )?;
        }
        Ok(())
    }
}

/// A violated byte-level layout assumption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// A head byte that is always zero in known files was not.
    NonZeroHeadByte {
        /// Position within the 8-byte head.
        position: usize,
        /// The value found there.
        value: u8,
    },
    /// The tail length does not fit the declared type.
    TailLength {
        /// Byte 4 of the head.
        type_byte: u8,
        /// Tail length that type requires.
        expected: usize,
        /// Tail length declared by the head.
        actual: usize,
    },
    /// The `END` record carried a type byte other than `0x00` or `0x2E`.
    EndTypeByte(u8),
    /// A decoded parameter has a different value kind than its consumer needs.
    ParameterType {
        /// Three-letter code of the parameter.
        code: String,
        /// Description of the value kind that was needed.
        expected: &'static str,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonZeroHeadByte { position, value } => {
                write!(f, "head byte {} must be zero, got 0x{:02x}", position, value)
            }
            Self::TailLength {
                type_byte,
                expected,
                actual,
            } => write!(
                f,
                "type 0x{:02x} needs a {}-byte tail, got {}",
                type_byte, expected, actual
            ),
            Self::EndTypeByte(b) => write!(f, "END record with type byte 0x{:02x}", b),
            Self::ParameterType { code, expected } => {
                write!(f, "parameter {} is not {}", code, expected)
            }
        }
    }
}

/// What a failed lookup was looking for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Missing {
    /// A binary block by classified name.
    Binary(String),
    /// The companion parameter list of the entry with this raw tag.
    ParameterList(u32),
    /// A parameter code inside a decoded list.
    Parameter(String),
}

impl fmt::Display for Missing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Binary(name) => write!(f, "Binary entry {:?}", name),
            Self::ParameterList(tag) => write!(f, "Parameter list for entry {:08x}", tag),
            Self::Parameter(code) => write!(f, "Parameter {}", code),
        }
    }
}

impl From<Violation> for OpusError {
    fn from(v: Violation) -> Self {
        Self::StructuralViolation(v)
    }
}

impl From<Missing> for OpusError {
    fn from(m: Missing) -> Self {
        Self::NotFound(m)
    }
}

pub type Result<T> = std::result::Result<T, OpusError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magic_mismatch_lists_every_offset() {
        let err = OpusError::MagicMismatch(vec![
            MagicDifference {
                offset: 0,
                found: 0x0b,
                expected: 0x0a,
            },
            MagicDifference {
                offset: 13,
                found: 0x01,
                expected: 0x00,
            },
        ]);
        let msg = err.to_string();
        assert!(msg.contains(" 0: 0x0b (expected 0x0a)"));
        assert!(msg.contains("13: 0x01 (expected 0x00)"));
    }

    #[test]
    fn test_not_found_display() {
        let err = OpusError::from(Missing::ParameterList(0x4000_100f));
        assert_eq!(err.to_string(), "Parameter list for entry 4000100f not found");
    }
}
