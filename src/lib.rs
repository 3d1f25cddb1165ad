//! Reader for OPUS spectrometer files.
//!
//! OPUS files have no published specification. The layout decoded here is
//! inferred from sample files and checked strictly: every byte that has
//! always been zero must be zero, and unknown type bytes are errors rather
//! than guesses.
//!
//! A file is a fixed 20-byte prologue, a directory of `(tag, length, offset)`
//! entries, and the blocks those entries point at. Binary blocks hold raw
//! `f32` samples; each has a companion parameter block (same tag plus
//! `0x10`) of self-describing records such as `NPT`, `FXV`, `LXV`, `DXU`.
//!
//! ```rust,ignore
//! use opus_stream::OpusFile;
//!
//! let mut file = OpusFile::open("sample.0")?;
//! for entry in &file.header().entries {
//!     println!("{} {:?}", entry, entry.kind());
//! }
//! let (axis, absorbance) = file.spectrum("AB")?;
//! ```
//!
//! ## Features
//! - `async` - Async byte sources with tokio
//! - `cli` - The `opus-dump` binary

pub mod axis;
pub mod error;
mod file_media;
mod opus_file;
pub mod parsing;

pub use axis::Axis;
pub use error::{MagicDifference, Missing, OpusError, Result, Violation};
pub use file_media::{LocalFileMedia, ReadInterval};
pub use opus_file::{EntrySummary, OpusFile, ParseOptions};
pub use parsing::{
    BlockKind, Code, DirectoryEntry, FileHeader, ParameterMap, ParameterRecord, Value,
};

#[cfg(feature = "async")]
pub use file_media::FileMedia;
#[cfg(feature = "async")]
pub use opus_file::read_header;
