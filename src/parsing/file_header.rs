//! File header parser.
//!
//! ```text
//! 0-19    MAGIC (compared under MAGIC_MASK)
//! 20-23   number of directory entries, N
//! 24-     N directory entries, 12 bytes each
//! ...     NUL padding up to offset 504
//! ```
//!
//! Nothing else in the header is interpreted. Blocks are located through
//! the absolute offsets in the directory, never through the padding size.

use super::entry::DirectoryEntry;
use super::io::{read_array, read_u32_le};
use super::magic::{self, MAGIC};
use crate::error::{Missing, OpusError, Result};
use std::io::{Read, Seek, SeekFrom};

/// Offset the header region is padded to.
pub const HEADER_REGION_SIZE: usize = 504;

/// Magic plus entry count: the bytes needed to know the directory size.
pub const PROLOGUE_SIZE: usize = MAGIC.len() + 4;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileHeader {
    pub entries: Vec<DirectoryEntry>,
}

impl FileHeader {
    /// Seek to the start of `reader` and decode the header.
    pub fn read<R: Read + Seek + ?Sized>(reader: &mut R) -> Result<Self> {
        Self::read_with(reader, None)
    }

    /// Like [`FileHeader::read`], rejecting directories that declare more
    /// than `max_entries` entries.
    pub fn read_with<R: Read + Seek + ?Sized>(
        reader: &mut R,
        max_entries: Option<usize>,
    ) -> Result<Self> {
        reader.seek(SeekFrom::Start(0))?;
        let prologue = read_array::<{ MAGIC.len() }, R>(reader)?;
        magic::check(&prologue)?;

        let count = read_u32_le(reader)? as usize;
        check_count(count, max_entries)?;
        tracing::debug!(entries = count, "directory");

        let mut entries = Vec::with_capacity(count.min(HEADER_REGION_SIZE / DirectoryEntry::SIZE));
        for _ in 0..count {
            let entry = DirectoryEntry::read(reader)?;
            tracing::trace!(%entry, kind = ?entry.kind(), "directory entry");
            entries.push(entry);
        }
        Ok(Self { entries })
    }

    /// Decode the header from an in-memory buffer starting at file offset 0.
    pub fn parse(buffer: &[u8]) -> Result<Self> {
        Self::parse_with(buffer, None)
    }

    pub fn parse_with(buffer: &[u8], max_entries: Option<usize>) -> Result<Self> {
        let count = parse_prologue(buffer, max_entries)?;
        let directory = &buffer[PROLOGUE_SIZE..];
        let needed = directory_size(count, directory.len())?;
        if directory.len() < needed {
            return Err(OpusError::Truncated {
                needed,
                have: directory.len(),
            });
        }
        let entries = directory[..needed]
            .chunks_exact(DirectoryEntry::SIZE)
            .map(DirectoryEntry::parse)
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!(entries = count, "directory");
        Ok(Self { entries })
    }

    /// Total header length, prologue and directory, declared by the
    /// first [`PROLOGUE_SIZE`] bytes of `buffer`.
    ///
    /// Checks the magic and the entry limit but no entries.
    pub fn declared_size(buffer: &[u8], max_entries: Option<usize>) -> Result<usize> {
        let count = parse_prologue(buffer, max_entries)?;
        let directory = directory_size(count, buffer.len() - PROLOGUE_SIZE)?;
        directory
            .checked_add(PROLOGUE_SIZE)
            .ok_or(OpusError::Truncated {
                needed: usize::MAX,
                have: buffer.len(),
            })
    }

    /// First binary entry whose table name is `name`, in directory order.
    pub fn find_binary(&self, name: &str) -> Result<&DirectoryEntry> {
        self.entries
            .iter()
            .find(|e| e.name_binary() == Some(name))
            .ok_or_else(|| Missing::Binary(name.to_string()).into())
    }

    /// The companion parameter list of a binary entry.
    ///
    /// Non-binary entries have no companion and always yield
    /// [`OpusError::NotFound`].
    pub fn find_parameter_list_for(&self, entry: &DirectoryEntry) -> Result<&DirectoryEntry> {
        entry
            .parameter_list_tag()
            .and_then(|tag| self.entries.iter().find(|e| e.tag == tag))
            .ok_or_else(|| Missing::ParameterList(entry.tag).into())
    }

    pub fn binaries(&self) -> impl Iterator<Item = &DirectoryEntry> {
        self.entries.iter().filter(|e| e.is_binary())
    }
}

/// Check the magic and return the declared entry count.
fn parse_prologue(buffer: &[u8], max_entries: Option<usize>) -> Result<usize> {
    let prologue: &[u8; MAGIC.len()] = buffer.first_chunk().ok_or(OpusError::Truncated {
        needed: MAGIC.len(),
        have: buffer.len(),
    })?;
    magic::check(prologue)?;

    let rest = &buffer[MAGIC.len()..];
    let count_bytes: &[u8; 4] = rest.first_chunk().ok_or(OpusError::Truncated {
        needed: 4,
        have: rest.len(),
    })?;
    let count = u32::from_le_bytes(*count_bytes) as usize;
    check_count(count, max_entries)?;
    Ok(count)
}

fn directory_size(count: usize, have: usize) -> Result<usize> {
    count
        .checked_mul(DirectoryEntry::SIZE)
        .ok_or(OpusError::Truncated {
            needed: usize::MAX,
            have,
        })
}

fn check_count(count: usize, max_entries: Option<usize>) -> Result<()> {
    match max_entries {
        Some(limit) if count > limit => Err(OpusError::LimitExceeded {
            what: "directory entries",
            limit,
        }),
        _ => Ok(()),
    }
}
