//! OPUS structure decoders.
//!
//! Leaf to root: [`parameter`] records, [`parameter_list`] runs of records,
//! [`entry`] directory records and their [`tag`] classification, and the
//! [`file_header`] that ties the directory to the [`magic`] prologue.

mod io;

pub mod entry;
pub mod file_header;
pub mod magic;
pub mod parameter;
pub mod parameter_list;
pub mod tag;

#[cfg(test)]
pub(crate) mod test_support;

pub use entry::DirectoryEntry;
pub use file_header::{FileHeader, HEADER_REGION_SIZE, PROLOGUE_SIZE};
pub use parameter::{Code, ParameterRecord, Value};
pub use parameter_list::{
    read_parameter_list, read_parameter_list_with, read_parameter_map, ParameterMap,
};
pub use tag::BlockKind;

pub(crate) use io::read_vec;
