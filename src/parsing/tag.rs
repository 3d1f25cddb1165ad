//! Directory tag classification.
//!
//! Tags are 32-bit values whose bits encode the block category, a variant
//! and a "multiple" flag. There is no enum of valid tags; classification is
//! a handful of exact comparisons plus a table of known binary block tags.

/// Set on every tag seen so far. Not a format flag; cleared before lookup.
pub const UNKNOWN_BIT: u32 = 0x4000_0000;

/// Added to a binary block's tag to get its companion parameter list tag.
pub const PARAMETER_LIST_BIT: u32 = 0x0000_0010;

/// Selects the "/multiple" variant of a binary block.
pub const MULTIPLE_BITS: u32 = 0x0050_0000;

/// Nested directory block.
pub const ENTRY_LIST_TAG: u32 = 0x0000_3400;

/// History (log) block with opaque payload.
pub const HISTORY_TAG: u32 = 0x4068_0000;

/// Known binary data blocks, keyed by tag with [`UNKNOWN_BIT`] cleared.
pub static BINARY_TAGS: phf::Map<u32, &'static str> = phf::phf_map! {
    0x0000_0405u32 => "S Sc.R",
    0x0000_0406u32 => "S Sc.I",
    0x0000_0407u32 => "S Sc",
    0x0050_0407u32 => "S Sc/multiple",
    0x0000_040bu32 => "R Sc",
    0x0000_0805u32 => "S Ifg.R",
    0x0000_0806u32 => "S Ifg.I",
    0x0000_0807u32 => "S Ifg",
    0x0050_0807u32 => "S Ifg/multiple",
    0x0000_080bu32 => "R Ifg",
    0x0000_0c07u32 => "S PH",
    0x0000_0c0bu32 => "R PH",
    0x0000_100fu32 => "AB",
    0x0050_100fu32 => "AB/multiple",
    0x0000_140fu32 => "TR",
    0x0050_140fu32 => "TR/multiple",
    0x0000_280fu32 => "RAM",
    0x0000_300fu32 => "REFL",
    0x0000_3c0fu32 => "L REFL",
    0x0050_1c00u32 => "Trace/multiple",
};

/// Tag with the noise bit cleared.
#[inline]
pub const fn effective(tag: u32) -> u32 {
    tag & !UNKNOWN_BIT
}

/// Name of the binary block for `tag`, if it is one.
#[inline]
pub fn binary_name(tag: u32) -> Option<&'static str> {
    BINARY_TAGS.get(&effective(tag)).copied()
}

/// Raw tag for a known binary block name, with [`UNKNOWN_BIT`] set as in
/// every file seen so far.
pub fn tag_for_name(name: &str) -> Option<u32> {
    BINARY_TAGS
        .entries()
        .find(|entry| *entry.1 == name)
        .map(|(&tag, _)| tag | UNKNOWN_BIT)
}

/// What a directory entry refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// Nested directory.
    EntryList,
    /// History / log block.
    History,
    /// Raw sample data with a known name.
    Binary(&'static str),
    /// Parameter list belonging to the named binary block.
    ParameterList(&'static str),
    /// Anything else: standalone parameter lists and unrecognised blocks.
    Unknown,
}

impl BlockKind {
    /// Classify a raw tag.
    pub fn of(tag: u32) -> Self {
        if tag == ENTRY_LIST_TAG {
            Self::EntryList
        } else if tag == HISTORY_TAG {
            Self::History
        } else if let Some(name) = binary_name(tag) {
            Self::Binary(name)
        } else if let Some(name) = (tag & PARAMETER_LIST_BIT != 0)
            .then(|| binary_name(tag & !PARAMETER_LIST_BIT))
            .flatten()
        {
            Self::ParameterList(name)
        } else {
            Self::Unknown
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_lookup_ignores_unknown_bit() {
        assert_eq!(binary_name(0x4000_100f), Some("AB"));
        assert_eq!(binary_name(0x0000_100f), Some("AB"));
        assert_eq!(binary_name(0x4050_100f), Some("AB/multiple"));
    }

    #[test]
    fn test_tag_for_name() {
        assert_eq!(tag_for_name("S Ifg"), Some(0x4000_0807));
        assert_eq!(tag_for_name("nope"), None);
    }

    #[test]
    fn test_block_kind() {
        assert_eq!(BlockKind::of(ENTRY_LIST_TAG), BlockKind::EntryList);
        assert_eq!(BlockKind::of(HISTORY_TAG), BlockKind::History);
        assert_eq!(BlockKind::of(0x4000_0407), BlockKind::Binary("S Sc"));
        assert_eq!(BlockKind::of(0x4000_0417), BlockKind::ParameterList("S Sc"));
        assert_eq!(BlockKind::of(0x4000_0030), BlockKind::Unknown);
    }

    #[test]
    fn test_history_is_not_binary() {
        // 0x40680000 with the noise bit cleared is not in the table either.
        assert_eq!(binary_name(HISTORY_TAG), None);
    }
}
