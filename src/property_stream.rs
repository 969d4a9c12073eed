//! Fixed-length property stream (`__properties_version1.0`)
//!
//! Every storage carries one. After a header whose size depends on the
//! storage kind, it holds 16-byte records:
//!
//! | offset | size | field |
//! |-------:|-----:|-------|
//! | 0 | 4 | tag: value type (low word), property id (high word) |
//! | 4 | 4 | flags |
//! | 8 | 8 | value, or the size of a variable-length value |
//!
//! Only fixed-width values live inline; the rest have their own property
//! stream and are skipped here.

use crate::tag::{PROPERTY_STREAM_PREFIX, PropertyTag};
use crate::value::value_type;

/// Header of the top-level message storage
pub const TOP_LEVEL_HEADER_LEN: usize = 32;

/// Header of an embedded message storage
pub const EMBEDDED_HEADER_LEN: usize = 24;

/// Header of recipient and attachment storages
pub const STORAGE_HEADER_LEN: usize = 8;

const RECORD_LEN: usize = 16;
const INLINE_VALUE_LEN: usize = 8;

/// Embedded messages are stored under a `PR_ATTACH_DATA_OBJ` storage
const EMBEDDED_MESSAGE_STORAGE: &str = "3701000D";

/// Header length for the property stream of the storage at `path`
#[must_use]
pub fn header_len(path: &[String]) -> usize {
    match path.last() {
        None => TOP_LEVEL_HEADER_LEN,
        Some(storage)
            if storage
                .strip_prefix(PROPERTY_STREAM_PREFIX)
                .is_some_and(|rest| rest.eq_ignore_ascii_case(EMBEDDED_MESSAGE_STORAGE)) =>
        {
            EMBEDDED_HEADER_LEN
        }
        Some(_) => STORAGE_HEADER_LEN,
    }
}

/// Inline fixed-width records of a property stream.
///
/// Yields each record's tag and its 8-byte value field. Records with a zero
/// property id or a variable-width type are skipped, as is a truncated
/// trailing record.
pub fn inline_properties(
    data: &[u8],
    header_len: usize,
) -> impl Iterator<Item = (PropertyTag, &[u8])> {
    data.get(header_len..)
        .unwrap_or_default()
        .chunks_exact(RECORD_LEN)
        .filter_map(|record| {
            let raw = u32::from_le_bytes([record[0], record[1], record[2], record[3]]);
            let tag = PropertyTag::from_packed(raw);
            let width = value_type::fixed_width(tag.value_type)?;
            if tag.id == 0 || width > INLINE_VALUE_LEN {
                return None;
            }
            Some((tag, &record[8..8 + INLINE_VALUE_LEN]))
        })
}
