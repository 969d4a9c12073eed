use chrono::{TimeZone, Utc};
use msg_extract::*;
use std::io::{Cursor, Write};

const RECIP_TO: &str = "__recip_version1.0_#00000000";
const RECIP_BCC: &str = "__recip_version1.0_#00000002";
const SMTP_STREAM: &str = "__substg1.0_39FE001F";

fn utf16(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(u16::to_le_bytes).collect()
}

fn record(tag: u32, value: [u8; 8]) -> Vec<u8> {
    let mut bytes = tag.to_le_bytes().to_vec();
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&value);
    bytes
}

fn recipient(storage: &str, name: &str, data: Vec<u8>) -> StreamEntry {
    StreamEntry::new(name, vec![storage.to_string()], data)
}

fn sample_entries() -> Vec<Result<StreamEntry>> {
    let created = 133_497_954_000_000_000u64;

    let mut top_level = vec![0u8; property_stream::TOP_LEVEL_HEADER_LEN];
    top_level.extend(record(0x3007_0040, created.to_le_bytes()));
    top_level.extend(record(0x0037_001F, 64u64.to_le_bytes()));
    top_level.extend_from_slice(&[0xAA; 10]);

    let mut recip_props = vec![0u8; property_stream::STORAGE_HEADER_LEN];
    recip_props.extend(record(0x0C15_0003, 3u64.to_le_bytes()));

    vec![
        Ok(StreamEntry::root("__nameid_version1.0", vec![0u8; 4])),
        Ok(StreamEntry::root("__substg1.0_001A001F", utf16("IPM.Note"))),
        Ok(StreamEntry::root(
            "__substg1.0_0037001F",
            utf16("Weekly sync\0"),
        )),
        Ok(StreamEntry::root(
            "__substg1.0_0C1F001E",
            b"jane@example.com".to_vec(),
        )),
        Ok(StreamEntry::root("__substg1.0_0C1A001F", utf16("Jane Doe"))),
        Ok(StreamEntry::root(
            "__substg1.0_1000001F",
            utf16("Agenda for the weekly sync meeting"),
        )),
        Ok(StreamEntry::root(PROPERTIES_STREAM_NAME, top_level)),
        Ok(recipient(RECIP_TO, SMTP_STREAM, utf16("a@x.com"))),
        Ok(recipient(RECIP_BCC, SMTP_STREAM, utf16("b@y.org"))),
        Ok(recipient(RECIP_BCC, PROPERTIES_STREAM_NAME, recip_props)),
    ]
}

// --- End to end ---

#[test]
fn test_decode_sample() {
    let message = decode(sample_entries()).unwrap();

    assert_eq!(message.message_class, "IPM.Note");
    assert_eq!(message.subject, "Weekly sync");
    assert_eq!(message.from_email, "jane@example.com");
    assert_eq!(message.from_name, "Jane Doe");
    assert_eq!(message.to, "a@x.com; ");
    assert!(message.cc.is_empty());
    assert_eq!(message.bcc, "b@y.org; ");
    assert_eq!(message.addresses, vec!["a@x.com", "b@y.org"]);
    let body = "Agenda for the weekly sync meeting";
    assert_eq!(message.body_plain_text, body);
    assert_eq!(message.body_html, body);
    assert_eq!(
        message.creation_date,
        Some(Utc.with_ymd_and_hms(2024, 1, 15, 12, 30, 0).unwrap())
    );
    assert_eq!(
        message.property(prop::RECIPIENT_TYPE),
        Some(&PropertyValue::Int32(3))
    );
}

#[test]
fn test_decode_empty_container() {
    let message = decode(Vec::new()).unwrap();

    assert_eq!(message.body_plain_text, NO_CONTENT);
    assert_eq!(message.body_html, NO_CONTENT);
    assert!(message.subject.is_empty());
    assert!(message.properties.is_empty());
}

#[test]
fn test_decode_verbose_matches_decode() {
    let quiet = decode(sample_entries()).unwrap();
    let verbose = decode_verbose(sample_entries()).unwrap();

    assert_eq!(quiet, verbose);
}

#[test]
fn test_entry_error_aborts_decode() {
    let entries = vec![
        Ok(StreamEntry::root("__substg1.0_0037001F", utf16("Subject"))),
        Err(DecodeError::Container("broken sector chain".into())),
    ];

    let err = decode(entries).unwrap_err();
    assert!(matches!(err, DecodeError::Container(_)));
    assert!(err.to_string().contains("broken sector chain"));
}

#[test]
fn test_undecodable_streams_are_skipped() {
    let entries = vec![
        Ok(StreamEntry::root("__substg1.0_00370099", vec![1, 2, 3])),
        Ok(StreamEntry::root("__substg1.0_0E070003", vec![1])),
        Ok(StreamEntry::root("__substg1.0_0037001F", utf16("Kept"))),
    ];

    let message = decode(entries).unwrap();

    assert_eq!(message.subject, "Kept");
    assert!(message.property(0x0E07).is_none());
}

#[test]
fn test_custom_body_threshold() {
    let entries = || vec![Ok(StreamEntry::root("__substg1.0_1000001F", utf16("Thanks!")))];
    let options = DecodeOptions {
        min_body_len: 5,
        ..DecodeOptions::default()
    };

    let strict = decode(entries()).unwrap();
    let lenient = decode_with_options(entries(), &options, &Utf8Detector).unwrap();

    assert_eq!(strict.body_plain_text, NO_CONTENT);
    assert_eq!(lenient.body_plain_text, "Thanks!");
}

#[test]
fn test_detector_is_used_for_narrow_strings() {
    struct Greek;

    impl CharsetDetector for Greek {
        fn detect(&self, _bytes: &[u8]) -> Option<String> {
            Some("iso-8859-7".to_string())
        }
    }

    let entries = vec![Ok(StreamEntry::root(
        "__substg1.0_0037001E",
        b"\xE1\xE2\xE3".to_vec(),
    ))];
    let message = decode_with_options(entries, &DecodeOptions::default(), &Greek).unwrap();

    assert_eq!(message.subject, "αβγ");
}

#[test]
fn test_default_decoder_detects_legacy_codepage() {
    let subject = "会議のお知らせ：来週の打ち合わせについてのご案内です";
    let (bytes, _, _) = encoding_rs::SHIFT_JIS.encode(subject);
    let entries = vec![Ok(StreamEntry::root(
        "__substg1.0_0037001E",
        bytes.into_owned(),
    ))];

    let message = decode(entries).unwrap();

    assert_eq!(message.subject, subject);
}

#[test]
fn test_default_options() {
    let options = DecodeOptions::default();
    assert!(!options.trace);
    assert_eq!(options.min_body_len, MIN_BODY_LEN);

    let parsed: DecodeOptions = serde_json::from_str(r#"{"trace": true}"#).unwrap();
    assert!(parsed.trace);
    assert_eq!(parsed.min_body_len, MIN_BODY_LEN);
}

// --- Property stream ---

#[test]
fn test_property_stream_header_len() {
    let path = |parts: &[&str]| parts.iter().map(ToString::to_string).collect::<Vec<_>>();

    assert_eq!(property_stream::header_len(&[]), 32);
    assert_eq!(property_stream::header_len(&path(&[RECIP_TO])), 8);
    assert_eq!(
        property_stream::header_len(&path(&["__attach_version1.0_#00000000"])),
        8
    );
    assert_eq!(
        property_stream::header_len(&path(&[
            "__attach_version1.0_#00000000",
            "__substg1.0_3701000D"
        ])),
        24
    );
}

#[test]
fn test_inline_properties_skip_variable_and_truncated() {
    let mut data = vec![0u8; 8];
    data.extend(record(0x0E07_0003, 0x11u64.to_le_bytes()));
    data.extend(record(0x0037_001F, 12u64.to_le_bytes()));
    data.extend(record(0x0000_0003, 1u64.to_le_bytes()));
    data.extend(record(0x0E1F_000B, 1u64.to_le_bytes()));
    data.extend_from_slice(&[0; 15]);

    let inline: Vec<_> = property_stream::inline_properties(&data, 8).collect();

    assert_eq!(inline.len(), 2);
    assert_eq!(inline[0].0, PropertyTag::new(0x0E07, value_type::INT32));
    assert_eq!(inline[0].1, &0x11u64.to_le_bytes());
    assert_eq!(inline[1].0, PropertyTag::new(0x0E1F, value_type::BOOLEAN));
}

#[test]
fn test_inline_properties_short_stream() {
    assert_eq!(property_stream::inline_properties(&[0; 4], 32).count(), 0);
}

// --- Compound files ---

fn build_msg() -> Vec<u8> {
    let mut file = cfb::CompoundFile::create(Cursor::new(Vec::new())).unwrap();
    let streams: [(&str, Vec<u8>); 3] = [
        ("/__substg1.0_0037001F", utf16("Compound subject")),
        (
            "/__substg1.0_1000001F",
            utf16("Body text stored in a real compound file"),
        ),
        (
            "/__recip_version1.0_#00000002/__substg1.0_39FE001F",
            utf16("hidden@example.com"),
        ),
    ];

    file.create_storage("/__recip_version1.0_#00000002").unwrap();
    for (path, data) in streams {
        let mut stream = file.create_stream(path).unwrap();
        stream.write_all(&data).unwrap();
        stream.flush().unwrap();
    }
    file.flush().unwrap();
    file.into_inner().into_inner()
}

#[test]
fn test_decode_bytes_round_trip() {
    let message = decode_bytes(&build_msg()).unwrap();

    assert_eq!(message.subject, "Compound subject");
    assert_eq!(
        message.body_plain_text,
        "Body text stored in a real compound file"
    );
    assert_eq!(message.bcc, "hidden@example.com; ");
    assert!(message.to.is_empty());
}

#[test]
fn test_cfb_entries_report_storage_path() {
    let bytes = build_msg();
    let entries: Vec<StreamEntry> = CfbEntries::new(Cursor::new(bytes))
        .unwrap()
        .collect::<Result<_>>()
        .unwrap();

    assert_eq!(entries.len(), 3);
    let recip = entries
        .iter()
        .find(|entry| entry.name == SMTP_STREAM)
        .unwrap();
    assert_eq!(recip.path, vec!["__recip_version1.0_#00000002"]);
    assert!(
        entries
            .iter()
            .filter(|entry| entry.name != SMTP_STREAM)
            .all(|entry| entry.path.is_empty())
    );
}

#[test]
fn test_decode_bytes_rejects_garbage() {
    assert!(decode_bytes(b"definitely not a compound file").is_err());
}

#[test]
fn test_decode_file_missing() {
    let err = decode_file("/nonexistent/message.msg").unwrap_err();
    assert!(matches!(err, DecodeError::Io(_)));
}
