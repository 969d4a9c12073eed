// Enforce at crate level
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! Outlook Message Decoder
//!
//! Decodes Outlook `.msg` files (OLE compound files holding MAPI properties)
//! into a structured [`Message`].
//!
//! # Features
//!
//! - Typed decoding of every fixed-width, string, binary and multi-valued
//!   MAPI value type
//! - Charset detection for single-byte strings, pluggable via [`CharsetDetector`]
//! - To/Cc/Bcc routing of recipient addresses by recipient storage
//! - Body reconciliation across the many properties producers store it in,
//!   filtering leaked directory addresses and binary noise
//! - Open-ended property map for everything without a dedicated field
//!
//! # Example
//!
//! ```rust
//! use msg_extract::{StreamEntry, decode};
//!
//! let subject: Vec<u8> = "Hello".encode_utf16().flat_map(u16::to_le_bytes).collect();
//! let entries = vec![StreamEntry::root("__substg1.0_0037001F", subject)];
//! let message = decode(entries.into_iter().map(Ok)).unwrap();
//!
//! assert_eq!(message.subject, "Hello");
//! assert_eq!(message.body_plain_text, msg_extract::NO_CONTENT);
//! ```

mod body;
mod charset;
mod container;
mod dispatch;
mod error;
mod parser;
pub mod property_stream;
mod recipient;
mod route;
mod tag;
mod types;
mod value;

pub use body::{MIN_BODY_LEN, NO_CONTENT, clean_body_candidate};
pub use charset::{ChardetDetector, CharsetDetector, Utf8Detector, decode_narrow};
pub use container::{CfbEntries, StreamEntry};
pub use error::{DecodeError, Result};
pub use parser::{
    DecodeOptions, decode, decode_bytes, decode_file, decode_verbose, decode_with_options,
};
pub use recipient::{
    MAX_EMAIL_LEN, RECIPIENT_STORAGE_PREFIX, RecipientSlot, RecipientState, is_valid_email,
    parse_recipient_ordinal, validate_email_list,
};
pub use route::{BodyKind, Route, TextField, TimeField, prop};
pub use tag::{PROPERTIES_STREAM_NAME, PROPERTY_STREAM_PREFIX, PropertyTag};
pub use types::Message;
pub use value::{
    PropertyValue, Scalar, decode_scalar, decode_utf16le, decode_value, filetime_to_datetime,
    filetime_to_unix_millis, format_guid, value_type,
};
