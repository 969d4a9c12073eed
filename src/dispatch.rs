//! Merging decoded properties into a [`Message`]

use crate::body::MIN_BODY_LEN;
use crate::recipient::{RecipientSlot, RecipientState, is_valid_email};
use crate::route::{BodyKind, Route, TextField, TimeField, prop};
use crate::types::Message;
use crate::value::PropertyValue;
use tracing::{trace, warn};

/// Separator between accumulated sender addresses
const SENDER_SEPARATOR: &str = ", ";

/// Terminator appended after every routed recipient address
const RECIPIENT_TERMINATOR: &str = "; ";

impl Message {
    /// Merge one property using the default body length threshold
    pub fn apply(&mut self, id: u16, value: PropertyValue, recipients: &RecipientState) {
        self.apply_with(id, value, recipients, MIN_BODY_LEN);
    }

    /// Merge one property into the record.
    ///
    /// The policy comes from [`Route::for_property`]. Values of an unexpected
    /// variant are logged and dropped.
    pub fn apply_with(
        &mut self,
        id: u16,
        value: PropertyValue,
        recipients: &RecipientState,
        min_body_len: usize,
    ) {
        match Route::for_property(id) {
            Route::Skip => {}
            Route::FirstText(field) => self.set_first_text(id, field, &value),
            Route::FirstTime(field) => self.set_first_time(id, field, &value),
            Route::SenderEmail => self.add_sender_email(id, &value),
            Route::Address => self.add_address(id, &value, recipients),
            Route::Candidate(kind) => self.collect_candidate(id, kind, &value, min_body_len),
            Route::Bag => {
                self.properties
                    .entry(id)
                    .or_insert_with(|| normalize_bag_value(id, value));
            }
            Route::BagOverwrite => {
                self.properties.insert(id, normalize_bag_value(id, value));
            }
        }
    }

    fn set_first_text(&mut self, id: u16, field: TextField, value: &PropertyValue) {
        let Some(text) = value.as_text() else {
            unexpected(id, value);
            return;
        };
        let target = match field {
            TextField::MessageClass => &mut self.message_class,
            TextField::InternetMessageId => &mut self.message_id,
            TextField::Subject => &mut self.subject,
            TextField::FromName => &mut self.from_name,
            TextField::ToDisplay => &mut self.to_display,
            TextField::CcDisplay => &mut self.cc_display,
            TextField::BccDisplay => &mut self.bcc_display,
            TextField::TransportHeaders => &mut self.transport_message_headers,
        };
        if target.is_empty() {
            *target = text.into_owned();
        }
    }

    fn set_first_time(&mut self, id: u16, field: TimeField, value: &PropertyValue) {
        let Some(ts) = value.as_timestamp() else {
            unexpected(id, value);
            return;
        };
        let target = match field {
            TimeField::Delivery => &mut self.date,
            TimeField::ClientSubmit => &mut self.client_submit_time,
            TimeField::Creation => &mut self.creation_date,
            TimeField::LastModification => &mut self.last_modification_date,
        };
        if target.is_none() {
            *target = Some(ts);
        }
    }

    fn add_sender_email(&mut self, id: u16, value: &PropertyValue) {
        let Some(address) = value.as_text() else {
            unexpected(id, value);
            return;
        };
        let address = address.trim();
        if !is_valid_email(address) {
            trace!("Sender address rejected: {address}");
            return;
        }
        if self.from_email.is_empty() {
            self.from_email = address.to_string();
        } else if !self.from_email.contains(address) {
            self.from_email.push_str(SENDER_SEPARATOR);
            self.from_email.push_str(address);
        }
    }

    fn add_address(&mut self, id: u16, value: &PropertyValue, recipients: &RecipientState) {
        let Some(address) = value.as_text() else {
            unexpected(id, value);
            return;
        };
        let address = address.trim();
        if !is_valid_email(address) {
            trace!("Recipient address rejected: {address}");
            return;
        }

        self.addresses.push(address.to_string());

        let target = match recipients.slot() {
            Some(RecipientSlot::To) => &mut self.to,
            Some(RecipientSlot::Cc) => &mut self.cc,
            Some(RecipientSlot::Bcc) => &mut self.bcc,
            None => return,
        };
        if !target
            .split(RECIPIENT_TERMINATOR)
            .any(|existing| existing == address)
        {
            target.push_str(address);
            target.push_str(RECIPIENT_TERMINATOR);
        }
    }

    fn collect_candidate(
        &mut self,
        id: u16,
        kind: BodyKind,
        value: &PropertyValue,
        min_body_len: usize,
    ) {
        let Some(text) = value.as_text() else {
            unexpected(id, value);
            return;
        };
        self.add_body_candidate(kind, &text, min_body_len);
    }
}

/// MIME tags arrive either as a single string or as a string array
fn normalize_bag_value(id: u16, value: PropertyValue) -> PropertyValue {
    match value {
        PropertyValue::TextArray(items) if matches!(id, prop::ATTACH_MIME_TAG | 0x8005) => {
            PropertyValue::Text(items.join(", "))
        }
        other => other,
    }
}

fn unexpected(id: u16, value: &PropertyValue) {
    warn!("Unexpected type for property {id:04X}: {}", value.kind());
}
