//! Parameter list reader.
//!
//! A parameter block has no length prefix and no record count: records are
//! read one after another until the `END` record. The reader therefore
//! never seeks; the caller positions the cursor at the block offset first.

use super::parameter::{Code, ParameterRecord, Value};
use crate::error::{OpusError, Result};
use std::io::Read;

/// Read records up to and including `END`.
pub fn read_parameter_list<R: Read + ?Sized>(reader: &mut R) -> Result<Vec<ParameterRecord>> {
    read_parameter_list_with(reader, None)
}

/// Like [`read_parameter_list`], but fail once `max_records` records have
/// been read without reaching `END`.
pub fn read_parameter_list_with<R: Read + ?Sized>(
    reader: &mut R,
    max_records: Option<usize>,
) -> Result<Vec<ParameterRecord>> {
    let mut records = Vec::new();
    loop {
        if let Some(limit) = max_records {
            if records.len() >= limit {
                return Err(OpusError::LimitExceeded {
                    what: "parameter records",
                    limit,
                });
            }
        }

        let record = ParameterRecord::read(reader)?;
        let done = record.is_end();
        records.push(record);
        if done {
            break;
        }
    }
    tracing::debug!(records = records.len(), "parameter list");
    Ok(records)
}

/// Read a parameter list straight into a [`ParameterMap`].
pub fn read_parameter_map<R: Read + ?Sized>(reader: &mut R) -> Result<ParameterMap> {
    read_parameter_list(reader).map(ParameterMap::from_iter)
}

/// Code to value mapping of a parameter list.
///
/// Iteration follows the order in which codes were first seen. A repeated
/// code keeps its first position but takes the last value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterMap {
    entries: Vec<(Code, Value)>,
}

impl ParameterMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite, returning the previous value.
    pub fn insert(&mut self, code: Code, value: Value) -> Option<Value> {
        match self.entries.iter_mut().find(|(c, _)| *c == code) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((code, value));
                None
            }
        }
    }

    pub fn get(&self, code: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(c, _)| c.as_str() == code)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter(self.entries.iter())
    }
}

/// Iterator over a [`ParameterMap`] in first-seen order.
pub struct Iter<'a>(std::slice::Iter<'a, (Code, Value)>);

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a Code, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(c, v)| (c, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl FromIterator<ParameterRecord> for ParameterMap {
    fn from_iter<I: IntoIterator<Item = ParameterRecord>>(iter: I) -> Self {
        let mut map = Self::new();
        for record in iter {
            let code = record.code();
            map.insert(code, record.into_value());
        }
        map
    }
}

impl<'a> IntoIterator for &'a ParameterMap {
    type Item = (&'a Code, &'a Value);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
