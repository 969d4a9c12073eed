//! Property routing table
//!
//! Maps a property id to the policy used to merge it into a [`crate::Message`].
//! Ids with no entry land in the generic property map.

/// Well-known property ids
pub mod prop {
    pub const MESSAGE_CLASS: u16 = 0x001A;
    pub const SUBJECT: u16 = 0x0037;
    pub const CLIENT_SUBMIT_TIME: u16 = 0x0039;
    pub const SENT_REPRESENTING_NAME: u16 = 0x0042;
    pub const SENT_REPRESENTING_EMAIL_ADDRESS: u16 = 0x0065;
    pub const TRANSPORT_MESSAGE_HEADERS: u16 = 0x007D;
    pub const SENDER_NAME: u16 = 0x0C1A;
    pub const SENDER_EMAIL_ADDRESS: u16 = 0x0C1F;
    pub const RECIPIENT_TYPE: u16 = 0x0C15;
    pub const DISPLAY_BCC: u16 = 0x0E02;
    pub const DISPLAY_CC: u16 = 0x0E03;
    pub const DISPLAY_TO: u16 = 0x0E04;
    pub const MESSAGE_DELIVERY_TIME: u16 = 0x0E06;
    pub const NORMALIZED_SUBJECT: u16 = 0x0E1D;
    pub const BODY: u16 = 0x1000;
    pub const BODY_HTML: u16 = 0x1013;
    pub const HTML: u16 = 0x1001;
    pub const INTERNET_MESSAGE_ID: u16 = 0x1035;
    pub const EMAIL_ADDRESS: u16 = 0x3003;
    pub const CREATION_TIME: u16 = 0x3007;
    pub const LAST_MODIFICATION_TIME: u16 = 0x3008;
    pub const SMTP_ADDRESS: u16 = 0x39FE;
    pub const LAST_MODIFIER_NAME: u16 = 0x3FFA;
    pub const SENDER_SMTP_ADDRESS: u16 = 0x5D01;
    pub const SENT_REPRESENTING_SMTP_ADDRESS: u16 = 0x5D02;
    pub const ATTACH_MIME_TAG: u16 = 0x8004;
}

/// Single-valued text field filled by the first value seen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    MessageClass,
    InternetMessageId,
    Subject,
    FromName,
    ToDisplay,
    CcDisplay,
    BccDisplay,
    TransportHeaders,
}

/// Timestamp field filled by the first value seen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeField {
    Delivery,
    ClientSubmit,
    Creation,
    LastModification,
}

/// Body candidate list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Plain,
    Html,
}

/// Merge policy for one property id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Set a text field only while it is still empty
    FirstText(TextField),

    /// Set a timestamp field only while it is still unset
    FirstTime(TimeField),

    /// Append a sender address to `from_email`, skipping duplicates
    SenderEmail,

    /// Validate an address, record it and route it by recipient ordinal
    Address,

    /// Validate and collect a body candidate
    Candidate(BodyKind),

    /// Store in the property map unless the key is already present
    Bag,

    /// Store in the property map, replacing any earlier value.
    /// Used for ids whose encoding differs between producers.
    BagOverwrite,

    /// Recognised and deliberately ignored
    Skip,
}

impl Route {
    /// Routing policy for a property id
    #[must_use]
    #[allow(clippy::match_same_arms)]
    pub const fn for_property(id: u16) -> Self {
        match id {
            // Failed tag parse
            0x0000 => Self::Skip,

            prop::MESSAGE_CLASS => Self::FirstText(TextField::MessageClass),
            prop::INTERNET_MESSAGE_ID => Self::FirstText(TextField::InternetMessageId),
            prop::SUBJECT | prop::NORMALIZED_SUBJECT => Self::FirstText(TextField::Subject),
            prop::SENDER_NAME | prop::SENT_REPRESENTING_NAME | prop::LAST_MODIFIER_NAME => {
                Self::FirstText(TextField::FromName)
            }
            prop::DISPLAY_TO | 0x800D => Self::FirstText(TextField::ToDisplay),
            prop::DISPLAY_CC | 0x800E => Self::FirstText(TextField::CcDisplay),
            prop::DISPLAY_BCC | 0x800F => Self::FirstText(TextField::BccDisplay),
            prop::TRANSPORT_MESSAGE_HEADERS => Self::FirstText(TextField::TransportHeaders),

            // PidTagMessageDeliveryTime (0x0E06) and PidTagClientSubmitTime (0x0039).
            // 0x0E0F is PidTagResponsibility, a boolean, and stays in the bag.
            prop::MESSAGE_DELIVERY_TIME => Self::FirstTime(TimeField::Delivery),
            prop::CLIENT_SUBMIT_TIME => Self::FirstTime(TimeField::ClientSubmit),
            prop::CREATION_TIME => Self::FirstTime(TimeField::Creation),
            prop::LAST_MODIFICATION_TIME => Self::FirstTime(TimeField::LastModification),

            prop::SENDER_EMAIL_ADDRESS
            | prop::SENT_REPRESENTING_EMAIL_ADDRESS
            | prop::SENDER_SMTP_ADDRESS
            | prop::SENT_REPRESENTING_SMTP_ADDRESS => Self::SenderEmail,

            prop::EMAIL_ADDRESS | prop::SMTP_ADDRESS | 0xC025 => Self::Address,

            prop::BODY | 0x3FF9 | 0x65E0 | 0x65E2 | 0x0FF9 | 0x120B => {
                Self::Candidate(BodyKind::Plain)
            }
            prop::HTML | prop::BODY_HTML | 0x3FFB | 0x65E1 | 0x65E3 | 0x5FF7 | 0x0C25
            | 0x0F03 => Self::Candidate(BodyKind::Html),

            // Entry ids, search keys and conversation index
            0x003B | 0x0041 | 0x0C19 | 0x0C1D | 0x0FFF => Self::BagOverwrite,
            // Attachment names and MIME tags
            0x3701 | 0x3702 | 0x371D | prop::ATTACH_MIME_TAG | 0x8005 => Self::BagOverwrite,
            // Values stored as text by some producers and binary by others
            0x0002 | 0x0003 | 0x0004 | 0x1003 | 0x1004 | 0x4099 | 0x8002 => Self::BagOverwrite,
            0x1010 | 0x1012 | 0x101D | 0x3019 | 0x301B | 0x8021 | 0x100A => Self::BagOverwrite,
            0x8011 | 0x8025 | 0x802D => Self::BagOverwrite,

            // Body encoding and disposition metadata
            0x1005..=0x1007 | 0x100B..=0x100D | 0x100F | 0x1011 => Self::Skip,
            0x1016..=0x101C | 0x101E | 0x0043 | 0x0052 => Self::Skip,
            // Body and RTF sync checksums
            0x0E0B | 0x0E4B | 0x0E4C | 0x0E58 | 0x0E59 => Self::Skip,
            // Timestamp aliases
            0x3013 | 0x3014 => Self::Skip,
            // Named-property header aliases
            0x8000 | 0x8007 | 0x8008 | 0x800B | 0x802C | 0x802E => Self::Skip,
            // Sent-representing address type
            0x0C24 => Self::Skip,

            _ => Self::Bag,
        }
    }
}
