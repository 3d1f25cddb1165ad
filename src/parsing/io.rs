//! Exact-length reads over a byte source.
//!
//! `Read::read_exact` discards how many bytes were actually available, so
//! fixed-size fields are read through [`read_array`] / [`read_vec`], which
//! report a short read as [`OpusError::Truncated`].

use crate::error::{OpusError, Result};
use std::io::{ErrorKind, Read};

/// Read exactly `buf.len()` bytes, returning how many were read before EOF.
fn fill<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}

/// Read a fixed-size array.
pub fn read_array<const N: usize, R: Read + ?Sized>(reader: &mut R) -> Result<[u8; N]> {
    let mut buf = [0u8; N];
    let have = fill(reader, &mut buf)?;
    if have < N {
        return Err(OpusError::Truncated { needed: N, have });
    }
    Ok(buf)
}

/// Read `len` bytes into a new buffer.
pub fn read_vec<R: Read + ?Sized>(reader: &mut R, len: usize) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; len];
    let have = fill(reader, &mut buf)?;
    if have < len {
        return Err(OpusError::Truncated { needed: len, have });
    }
    Ok(buf)
}

/// Read a little-endian `u32`.
#[inline]
pub fn read_u32_le<R: Read + ?Sized>(reader: &mut R) -> Result<u32> {
    read_array::<4, R>(reader).map(u32::from_le_bytes)
}
