//! Byte sources for OPUS files.

use crate::error::{OpusError, Result};
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// Inclusive byte range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReadInterval {
    pub start: u64,
    pub end: u64,
}

impl ReadInterval {
    /// Interval covering `len` bytes from `start`.
    ///
    /// `None` when `len` is zero or the range runs past `u64::MAX`.
    pub fn at(start: u64, len: u64) -> Option<Self> {
        let end = start.checked_add(len.checked_sub(1)?)?;
        Some(Self { start, end })
    }

    pub fn byte_count(&self) -> u64 {
        self.end - self.start + 1
    }
}

/// Local file implementation.
#[derive(Debug, Clone)]
pub struct LocalFileMedia {
    path: PathBuf,
    name: String,
    length: u64,
}

impl LocalFileMedia {
    pub fn new(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path)?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        Ok(Self {
            path: path.to_path_buf(),
            name,
            length: metadata.len(),
        })
    }

    pub fn length(&self) -> u64 {
        self.length
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a buffered, seekable cursor over the whole file.
    pub fn open(&self) -> std::io::Result<BufReader<File>> {
        File::open(&self.path).map(BufReader::new)
    }

    /// Sync read
    pub fn read_range_sync(&self, interval: ReadInterval) -> Result<Vec<u8>> {
        check_range(interval, self.length)?;
        let mut file = File::open(&self.path)?;
        file.seek(SeekFrom::Start(interval.start))?;
        let mut buffer = vec![0u8; interval.byte_count() as usize];
        file.read_exact(&mut buffer)?;
        Ok(buffer)
    }
}

fn check_range(interval: ReadInterval, length: u64) -> Result<()> {
    if interval.end >= length || interval.start > interval.end {
        return Err(OpusError::Truncated {
            needed: interval.end.saturating_add(1) as usize,
            have: length as usize,
        });
    }
    Ok(())
}

// Async FileMedia trait (requires 'async' feature)
#[cfg(feature = "async")]
use std::future::Future;
#[cfg(feature = "async")]
use std::pin::Pin;

/// Abstract file source that can provide byte ranges asynchronously.
///
/// Implement this trait for custom byte sources (e.g., HTTP range requests).
/// The library provides [`LocalFileMedia`] for local files.
#[cfg(feature = "async")]
#[cfg_attr(docsrs, doc(cfg(feature = "async")))]
pub trait FileMedia: Send + Sync {
    fn length(&self) -> u64;
    fn name(&self) -> &str;
    fn read_range(
        &self,
        interval: ReadInterval,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send + '_>>;
}

#[cfg(feature = "async")]
impl FileMedia for LocalFileMedia {
    fn length(&self) -> u64 {
        self.length
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn read_range(
        &self,
        interval: ReadInterval,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send + '_>> {
        let path = self.path.clone();
        let length = self.length;
        Box::pin(async move {
            use tokio::io::{AsyncReadExt, AsyncSeekExt};
            check_range(interval, length)?;
            let mut file = tokio::fs::File::open(&path).await?;
            file.seek(std::io::SeekFrom::Start(interval.start)).await?;
            let mut buffer = vec![0u8; interval.byte_count() as usize];
            file.read_exact(&mut buffer).await?;
            Ok(buffer)
        })
    }
}
