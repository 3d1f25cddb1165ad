//! Directory entry parser.
//!
//! The directory following the prologue is a run of fixed 12-byte
//! records, three little-endian `u32`s each:
//!
//! ```text
//! 0-3   tag
//! 4-7   length   byte length of the block
//! 8-11  offset   absolute file offset of the block
//! ```

use super::io::read_array;
use super::tag::{self, BlockKind};
use crate::error::{OpusError, Result};
use std::fmt;
use std::io::Read;

/// One `(tag, length, offset)` record of the header directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DirectoryEntry {
    /// Raw block tag, [`tag::UNKNOWN_BIT`] included.
    pub tag: u32,
    /// Byte length of the block.
    pub length: u32,
    /// Absolute file offset of the block.
    pub offset: u32,
}

impl DirectoryEntry {
    /// Encoded size of one entry.
    pub const SIZE: usize = 12;

    /// Parse an entry from the start of `buffer`.
    pub fn parse(buffer: &[u8]) -> Result<Self> {
        let bytes: &[u8; Self::SIZE] =
            buffer.first_chunk().ok_or(OpusError::Truncated {
                needed: Self::SIZE,
                have: buffer.len(),
            })?;
        Ok(Self::from_bytes(bytes))
    }

    /// Read the next entry from `reader`.
    pub fn read<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        let bytes = read_array::<{ Self::SIZE }, R>(reader)?;
        Ok(Self::from_bytes(&bytes))
    }

    fn from_bytes(b: &[u8; Self::SIZE]) -> Self {
        Self {
            tag: u32::from_le_bytes([b[0], b[1], b[2], b[3]]),
            length: u32::from_le_bytes([b[4], b[5], b[6], b[7]]),
            offset: u32::from_le_bytes([b[8], b[9], b[10], b[11]]),
        }
    }

    /// Tag with the always-set noise bit cleared.
    #[inline]
    pub fn effective_tag(&self) -> u32 {
        tag::effective(self.tag)
    }

    pub fn is_entry_list(&self) -> bool {
        self.tag == tag::ENTRY_LIST_TAG
    }

    pub fn is_history(&self) -> bool {
        self.tag == tag::HISTORY_TAG
    }

    pub fn is_binary(&self) -> bool {
        self.name_binary().is_some()
    }

    /// Binary block carrying the "/multiple" bits.
    pub fn is_multiple(&self) -> bool {
        self.is_binary() && self.tag & tag::MULTIPLE_BITS != 0
    }

    /// Table name of a binary block.
    pub fn name_binary(&self) -> Option<&'static str> {
        tag::binary_name(self.tag)
    }

    /// Tag of this binary block's parameter list, `None` for other entries.
    pub fn parameter_list_tag(&self) -> Option<u32> {
        self.is_binary().then_some(self.tag | tag::PARAMETER_LIST_BIT)
    }

    pub fn kind(&self) -> BlockKind {
        BlockKind::of(self.tag)
    }
}

impl fmt::Display for DirectoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Entry {:08x} {:7} {:8x}>",
            self.tag, self.length, self.offset
        )
    }
}
