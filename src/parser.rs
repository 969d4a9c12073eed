//! Main message decoder implementation

use crate::body::MIN_BODY_LEN;
use crate::charset::{ChardetDetector, CharsetDetector};
use crate::container::{CfbEntries, StreamEntry};
use crate::error::Result;
use crate::property_stream;
use crate::recipient::RecipientState;
use crate::tag::{PROPERTIES_STREAM_NAME, PropertyTag};
use crate::types::Message;
use crate::value::decode_value;
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, info};

/// Decoder settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DecodeOptions {
    /// Log every decoded property at `info` level
    pub trace: bool,

    /// Minimum trimmed length of a body candidate
    pub min_body_len: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            trace: false,
            min_body_len: MIN_BODY_LEN,
        }
    }
}

/// Decode a message from container entries in traversal order.
///
/// Single-byte strings are decoded with the [`ChardetDetector`] guess.
pub fn decode<I>(entries: I) -> Result<Message>
where
    I: IntoIterator<Item = Result<StreamEntry>>,
{
    decode_with_options(entries, &DecodeOptions::default(), &ChardetDetector)
}

/// Same as [`decode`], logging every decoded property
pub fn decode_verbose<I>(entries: I) -> Result<Message>
where
    I: IntoIterator<Item = Result<StreamEntry>>,
{
    let options = DecodeOptions {
        trace: true,
        ..DecodeOptions::default()
    };
    decode_with_options(entries, &options, &ChardetDetector)
}

/// Decode a `.msg` file on disk
pub fn decode_file(path: impl AsRef<Path>) -> Result<Message> {
    decode(CfbEntries::open(path)?)
}

/// Decode an in-memory `.msg` file
pub fn decode_bytes(bytes: &[u8]) -> Result<Message> {
    decode(CfbEntries::new(Cursor::new(bytes))?)
}

/// Decode a message with explicit options and charset detection.
///
/// Entries are processed strictly in the order given: recipient routing
/// depends on it. Only errors produced by the entry source abort the decode.
pub fn decode_with_options<I>(
    entries: I,
    options: &DecodeOptions,
    detector: &dyn CharsetDetector,
) -> Result<Message>
where
    I: IntoIterator<Item = Result<StreamEntry>>,
{
    let mut message = Message::new();
    let mut recipients = RecipientState::new();

    for entry in entries {
        let entry = entry?;
        recipients.observe(&entry.path);

        if entry.name == PROPERTIES_STREAM_NAME {
            let header_len = property_stream::header_len(&entry.path);
            for (tag, raw) in property_stream::inline_properties(&entry.data, header_len) {
                apply_raw(
                    &mut message,
                    &entry.name,
                    tag,
                    raw,
                    &recipients,
                    options,
                    detector,
                );
            }
        } else if let Some(tag) = PropertyTag::parse(&entry.name) {
            apply_raw(
                &mut message,
                &entry.name,
                tag,
                &entry.data,
                &recipients,
                options,
                detector,
            );
        } else {
            debug!("Skipping entry {} ({} bytes)", entry.name, entry.size());
        }
    }

    message.finalize_body();

    debug!(
        "Decoded message: {} from {}",
        message.subject, message.from_email
    );

    Ok(message)
}

fn apply_raw(
    message: &mut Message,
    entry: &str,
    tag: PropertyTag,
    payload: &[u8],
    recipients: &RecipientState,
    options: &DecodeOptions,
    detector: &dyn CharsetDetector,
) {
    let Some(value) = decode_value(payload, tag.value_type, detector) else {
        debug!("No value for {entry} ({} bytes)", payload.len());
        return;
    };

    if options.trace {
        info!(
            "{entry}: property {:04X} type {:04X} = {value}",
            tag.id, tag.value_type
        );
    }

    message.apply_with(tag.id, value, recipients, options.min_body_len);
}
