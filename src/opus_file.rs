//! OpusFile - a decoded header plus the byte source it came from.

use crate::axis::Axis;
use crate::error::{OpusError, Result};
use crate::file_media::LocalFileMedia;
use crate::parsing::{
    read_parameter_list_with, read_vec, DirectoryEntry, FileHeader, ParameterMap,
    ParameterRecord,
};
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

/// Limits applied while decoding.
///
/// The defaults impose no limits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum number of directory entries a header may declare.
    pub max_entries: Option<usize>,
    /// Maximum number of records read from one parameter block before `END`.
    pub max_parameters: Option<usize>,
}

/// What a directory entry holds, as shown by `opus-dump`.
#[derive(Debug)]
pub enum EntrySummary {
    Binary(&'static str),
    History,
    EntryList,
    Parameters(Vec<ParameterRecord>),
    /// The block is not a known kind and does not decode as parameters.
    Undecodable(OpusError),
}

/// An OPUS file opened for reading.
pub struct OpusFile<R> {
    reader: R,
    header: FileHeader,
    options: ParseOptions,
}

impl OpusFile<BufReader<File>> {
    /// Open and decode the header of a local file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, ParseOptions::default())
    }

    pub fn open_with(path: impl AsRef<Path>, options: ParseOptions) -> Result<Self> {
        let media = LocalFileMedia::new(path)?;
        Self::from_reader_with(media.open()?, options)
    }
}

impl<R: Read + Seek> OpusFile<R> {
    pub fn from_reader(reader: R) -> Result<Self> {
        Self::from_reader_with(reader, ParseOptions::default())
    }

    pub fn from_reader_with(mut reader: R, options: ParseOptions) -> Result<Self> {
        let header = FileHeader::read_with(&mut reader, options.max_entries)?;
        Ok(Self {
            reader,
            header,
            options,
        })
    }

    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    pub fn options(&self) -> ParseOptions {
        self.options
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Read the parameter block starting at `offset`.
    pub fn parameters_at(&mut self, offset: u64) -> Result<Vec<ParameterRecord>> {
        self.reader.seek(SeekFrom::Start(offset))?;
        read_parameter_list_with(&mut self.reader, self.options.max_parameters)
    }

    /// Read the block of `entry` as a parameter list.
    pub fn parameter_list(&mut self, entry: &DirectoryEntry) -> Result<Vec<ParameterRecord>> {
        self.parameters_at(u64::from(entry.offset))
    }

    pub fn parameter_map(&mut self, entry: &DirectoryEntry) -> Result<ParameterMap> {
        self.parameter_list(entry).map(ParameterMap::from_iter)
    }

    /// The companion parameters of a binary entry.
    pub fn parameters_for(&mut self, entry: &DirectoryEntry) -> Result<ParameterMap> {
        let list = *self.header.find_parameter_list_for(entry)?;
        self.parameter_map(&list)
    }

    /// Sample values of a data block: `length / 4` little-endian `f32`s.
    pub fn data_block(&mut self, entry: &DirectoryEntry) -> Result<Vec<f32>> {
        let count = entry.length as usize / 4;
        self.reader.seek(SeekFrom::Start(u64::from(entry.offset)))?;
        let bytes = read_vec(&mut self.reader, count * 4)?;
        Ok(bytes
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect())
    }

    /// X axis of a binary entry, from its companion parameters.
    ///
    /// `NPT` may not exceed the sample count of the block.
    pub fn axis_for(&mut self, entry: &DirectoryEntry) -> Result<Axis> {
        let params = self.parameters_for(entry)?;
        Axis::from_parameters_within(&params, entry.length as usize / 4)
    }

    /// Axis and samples of the binary block named `name`.
    pub fn spectrum(&mut self, name: &str) -> Result<(Axis, Vec<f32>)> {
        let entry = *self.header.find_binary(name)?;
        let axis = self.axis_for(&entry)?;
        let data = self.data_block(&entry)?;
        if axis.len() != data.len() {
            tracing::warn!(
                block = name,
                axis = axis.len(),
                samples = data.len(),
                "axis length differs from sample count"
            );
        }
        Ok((axis, data))
    }

    /// Describe an entry the way the dump tool prints it.
    ///
    /// Known kinds are reported without touching the block. Anything else
    /// is tried as a parameter list; a decode failure is kept as
    /// [`EntrySummary::Undecodable`] instead of being returned.
    pub fn describe(&mut self, entry: &DirectoryEntry) -> Result<EntrySummary> {
        if let Some(name) = entry.name_binary() {
            return Ok(EntrySummary::Binary(name));
        }
        if entry.is_history() {
            return Ok(EntrySummary::History);
        }
        if entry.is_entry_list() {
            return Ok(EntrySummary::EntryList);
        }
        match self.parameter_list(entry) {
            Ok(records) => Ok(EntrySummary::Parameters(records)),
            Err(OpusError::Io(e)) => Err(OpusError::Io(e)),
            Err(e) => {
                tracing::debug!(%entry, error = %e, "entry is not a parameter list");
                Ok(EntrySummary::Undecodable(e))
            }
        }
    }
}

/// Fetch and decode the header of an async byte source.
///
/// The prologue is fetched first; the second read covers exactly the
/// directory it declares, however many entries that is.
#[cfg(feature = "async")]
#[cfg_attr(docsrs, doc(cfg(feature = "async")))]
pub async fn read_header(
    media: &dyn crate::file_media::FileMedia,
    options: ParseOptions,
) -> Result<FileHeader> {
    use crate::parsing::PROLOGUE_SIZE;

    let available = media.length();
    let prologue = media
        .read_range(leading(available.min(PROLOGUE_SIZE as u64), available)?)
        .await?;
    let size = FileHeader::declared_size(&prologue, options.max_entries)?;
    let buffer = media.read_range(leading(size as u64, available)?).await?;
    FileHeader::parse_with(&buffer, options.max_entries)
}

/// The first `len` bytes of a source holding `available` bytes.
#[cfg(feature = "async")]
fn leading(len: u64, available: u64) -> Result<crate::file_media::ReadInterval> {
    let truncated = || OpusError::Truncated {
        needed: usize::try_from(len).unwrap_or(usize::MAX).max(1),
        have: usize::try_from(available).unwrap_or(usize::MAX),
    };
    if len > available {
        return Err(truncated());
    }
    crate::file_media::ReadInterval::at(0, len).ok_or_else(truncated)
}
