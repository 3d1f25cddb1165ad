//! Synthetic OPUS files for tests.

use super::file_header::HEADER_REGION_SIZE;
use super::magic::MAGIC;

/// Builds a parameter block record by record.
#[derive(Default)]
pub struct ParameterBlock {
    bytes: Vec<u8>,
}

impl ParameterBlock {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(mut self, code: &str, type_byte: u8, tail: &[u8]) -> Self {
        let code = code.as_bytes();
        assert_eq!(code.len(), 3);
        assert_eq!(tail.len() % 2, 0);
        self.bytes.extend_from_slice(code);
        self.bytes
            .extend_from_slice(&[0, type_byte, 0, (tail.len() / 2) as u8, 0]);
        self.bytes.extend_from_slice(tail);
        self
    }

    pub fn integer(self, code: &str, value: i32) -> Self {
        self.record(code, 0x00, &value.to_le_bytes())
    }

    pub fn real(self, code: &str, value: f64) -> Self {
        self.record(code, 0x01, &value.to_le_bytes())
    }

    /// NUL-terminated and padded to an even length.
    pub fn text(self, code: &str, value: &str) -> Self {
        let mut tail = value.as_bytes().to_vec();
        tail.push(0);
        if tail.len() % 2 != 0 {
            tail.push(0);
        }
        self.record(code, 0x02, &tail)
    }

    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    pub fn finish(self) -> Vec<u8> {
        self.finish_with(b"END\0\0\0\0\0")
    }

    pub fn finish_with(mut self, end: &[u8]) -> Vec<u8> {
        self.bytes.extend_from_slice(end);
        self.bytes
    }
}

enum Entry {
    Raw { tag: u32, length: u32, offset: u32 },
    Block { tag: u32, data: Vec<u8> },
}

/// Builds a whole file: prologue, directory, padding and blocks.
///
/// Blocks added with [`OpusBuilder::block`] are laid out after the
/// 504-byte header region in insertion order.
pub struct OpusBuilder {
    variant: u8,
    entries: Vec<Entry>,
}

impl Default for OpusBuilder {
    fn default() -> Self {
        Self {
            variant: MAGIC[11],
            entries: Vec::new(),
        }
    }
}

impl OpusBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of the masked sub-variant byte 11.
    pub fn variant(mut self, byte: u8) -> Self {
        self.variant = byte;
        self
    }

    pub fn entry(mut self, tag: u32, length: u32, offset: u32) -> Self {
        self.entries.push(Entry::Raw {
            tag,
            length,
            offset,
        });
        self
    }

    pub fn block(mut self, tag: u32, data: Vec<u8>) -> Self {
        self.entries.push(Entry::Block { tag, data });
        self
    }

    pub fn floats(self, tag: u32, values: &[f32]) -> Self {
        let data = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.block(tag, data)
    }

    pub fn build(self) -> Vec<u8> {
        let mut out = MAGIC.to_vec();
        out[11] = self.variant;
        out.extend_from_slice(&(self.entries.len() as u32).to_le_bytes());

        let mut payload = Vec::new();
        for entry in &self.entries {
            let (tag, length, offset) = match entry {
                Entry::Raw {
                    tag,
                    length,
                    offset,
                } => (*tag, *length, *offset),
                Entry::Block { tag, data } => {
                    let offset = HEADER_REGION_SIZE + payload.len();
                    payload.extend_from_slice(data);
                    (*tag, data.len() as u32, offset as u32)
                }
            };
            out.extend_from_slice(&tag.to_le_bytes());
            out.extend_from_slice(&length.to_le_bytes());
            out.extend_from_slice(&offset.to_le_bytes());
        }

        if out.len() < HEADER_REGION_SIZE {
            out.resize(HEADER_REGION_SIZE, 0);
        }
        out.extend_from_slice(&payload);
        out
    }
}
