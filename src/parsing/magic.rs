//! File prologue - OPUS magic.
//!
//! Every OPUS file starts with the same 20 bytes, except for a few
//! positions that vary between files. The varying bytes are masked out
//! of the comparison. Byte 11 is the only one seen to change in practice
//! and probably selects a file sub-variant; bytes 8-10 are masked as well.

use crate::error::{MagicDifference, OpusError, Result};

/// Reference prologue.
pub const MAGIC: [u8; 20] = [
    0x0a, 0x0a, 0xfe, 0xfe, 0x00, 0x00, 0x00, 0x00, // fixed
    0xff, 0xff, 0xff, 0x41, // 8-10 don't care, 11 sub-variant
    0x18, 0x00, 0x00, 0x00, 0x28, 0x00, 0x00, 0x00,
];

/// Bits of [`MAGIC`] that take part in the comparison.
pub const MAGIC_MASK: [u8; 20] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, //
    0x00, 0x00, 0x00, 0x00, //
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
];

/// Compare `prologue` against [`MAGIC`] under [`MAGIC_MASK`].
///
/// Returns every differing byte, in offset order. An empty result means the
/// prologue matches.
pub fn differences(prologue: &[u8; MAGIC.len()]) -> Vec<MagicDifference> {
    (0..MAGIC.len())
        .filter(|&i| prologue[i] & MAGIC_MASK[i] != MAGIC[i] & MAGIC_MASK[i])
        .map(|offset| MagicDifference {
            offset,
            found: prologue[offset],
            expected: MAGIC[offset],
        })
        .collect()
}

/// Validate a prologue, failing with [`OpusError::MagicMismatch`].
pub fn check(prologue: &[u8; MAGIC.len()]) -> Result<()> {
    let diff = differences(prologue);
    if diff.is_empty() {
        Ok(())
    } else {
        Err(OpusError::MagicMismatch(diff))
    }
}
