//! Tests for the encoding module.

use std::thread;

use super::*;
use crate::dictionary::{CodePageBuilder, CodePageDictionary, DictionaryError};
use crate::document::{Element, MAX_DEPTH};

fn activesync(xml: &str) -> EncodingResult<Vec<u8>> {
    Encoder::from_xml(xml, CodePageDictionary::activesync(), EncoderConfig::default())?.encode()
}

fn with_config(xml: &str, config: EncoderConfig) -> EncodingResult<Vec<u8>> {
    Encoder::from_xml(xml, CodePageDictionary::activesync(), config)?.encode()
}

fn test_dictionary() -> CodePageDictionary {
    CodePageDictionary::builder()
        .page(
            CodePageBuilder::new(0, "urn:test")
                .tags(&[("Root", 0x05), ("Item", 0x06)])
                .attribute("id", 0x05),
        )
        .page(
            CodePageBuilder::new(1, "urn:other")
                .tag("Thing", 0x05)
                .attribute("kind", 0x06),
        )
        .build()
        .unwrap()
}

#[test]
fn test_folder_sync_sync_key() {
    let bytes =
        activesync(r#"<FolderSync xmlns="FolderHierarchy:"><SyncKey>0</SyncKey></FolderSync>"#)
            .unwrap();
    assert_eq!(bytes, b"\x03\x01j\x00\x00\x07VR\x030\x00\x01\x01".to_vec());
}

#[test]
fn test_airsync_root_needs_no_page_switch() {
    let bytes = activesync(r#"<Sync xmlns="AirSync:"><SyncKey>0</SyncKey></Sync>"#).unwrap();
    assert_eq!(bytes, b"\x03\x01j\x00EK\x030\x00\x01\x01".to_vec());
}

#[test]
fn test_secondary_namespace_switches_once() {
    let xml = r#"<Sync xmlns="AirSync:" xmlns:A1="POOMCONTACTS:"><Collections><Collection><SyncKey>0</SyncKey><CollectionId>2e9ce20a99cc4bc39804d5ee956855311500000000000000</CollectionId><Supported><A1:JobTitle/><A1:Department/></Supported></Collection></Collections></Sync>"#;
    let expected = b"\x03\x01j\x00E\\OK\x030\x00\x01R\x032e9ce20a99cc4bc39804d5ee956855311500000000000000\x00\x01`\x00\x01(\x1a\x01\x01\x01\x01";

    let bytes = activesync(xml).unwrap();
    assert_eq!(bytes, expected.to_vec());

    let switches = bytes.windows(2).filter(|pair| pair == b"\x00\x01").count();
    assert_eq!(switches, 1);
}

#[test]
fn test_alias_and_primary_namespace_encode_identically() {
    let primary = activesync(
        r#"<Sync xmlns="AirSync:" xmlns:c="Contacts:"><Supported><c:JobTitle/></Supported></Sync>"#,
    )
    .unwrap();
    let alias = activesync(
        r#"<Sync xmlns="AirSync:" xmlns:c="POOMCONTACTS:"><Supported><c:JobTitle/></Supported></Sync>"#,
    )
    .unwrap();
    assert_eq!(primary, alias);
}

#[test]
fn test_empty_elements_and_class() {
    let xml = r#"<Sync xmlns="AirSync:"><Collections><Collection><Class>Contacts</Class><SyncKey>0</SyncKey><CollectionId>2e9ce20a99cc4bc39804d5ee956855311b00000000000000</CollectionId><DeletesAsMoves/><GetChanges/></Collection></Collections></Sync>"#;
    let expected = b"\x03\x01j\x00E\\OP\x03Contacts\x00\x01K\x030\x00\x01R\x032e9ce20a99cc4bc39804d5ee956855311b00000000000000\x00\x01\x1e\x13\x01\x01\x01";
    assert_eq!(activesync(xml).unwrap(), expected.to_vec());
}

#[test]
fn test_switching_back_emits_switch_again() {
    let xml = r#"<Sync xmlns="AirSync:" xmlns:c="Contacts:"><c:JobTitle/><SyncKey/><c:Department/></Sync>"#;
    let bytes = activesync(xml).unwrap();
    assert_eq!(
        bytes,
        vec![
            0x03, 0x01, 0x6A, 0x00, 0x45, 0x00, 0x01, 0x28, 0x00, 0x00, 0x0B, 0x00, 0x01, 0x1A,
            0x01
        ]
    );
}

#[test]
fn test_unqualified_names_use_active_page() {
    let document = Element::namespaced("FolderHierarchy:", "FolderSync")
        .with_child(Element::new("SyncKey").with_text("0"));
    let encoder =
        Encoder::new(document, CodePageDictionary::activesync(), EncoderConfig::default()).unwrap();
    assert_eq!(
        encoder.encode().unwrap(),
        b"\x03\x01j\x00\x00\x07VR\x030\x00\x01\x01".to_vec()
    );
}

#[test]
fn test_encode_is_deterministic() {
    let encoder = Encoder::from_xml(
        r#"<Sync xmlns="AirSync:" xmlns:x="urn:example"><x:Foo>1</x:Foo><Bogus/></Sync>"#,
        CodePageDictionary::activesync(),
        EncoderConfig::default(),
    )
    .unwrap();
    let first = encoder.encode().unwrap();
    let second = encoder.encode().unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_unknown_namespace_falls_back_to_literal() {
    let bytes =
        activesync(r#"<Sync xmlns="AirSync:" xmlns:x="urn:example"><x:Foo>1</x:Foo></Sync>"#)
            .unwrap();
    assert_eq!(
        bytes,
        b"\x03\x01j\x04Foo\x00\x45\x44\x00\x031\x00\x01\x01".to_vec()
    );
}

#[test]
fn test_unknown_namespace_rejected_by_policy() {
    let config = EncoderConfig {
        unknown_namespaces: UnknownNamespacePolicy::Reject,
        ..EncoderConfig::default()
    };
    let error = with_config(
        r#"<Sync xmlns="AirSync:" xmlns:x="urn:example"><x:Foo>1</x:Foo></Sync>"#,
        config,
    )
    .unwrap_err();
    assert_eq!(
        error,
        EncodingError::UnsupportedNamespace {
            namespace: "urn:example".to_string(),
            name: "Foo".to_string(),
        }
    );
}

#[test]
fn test_reject_policy_keeps_literal_for_unknown_names() {
    let config = EncoderConfig {
        unknown_namespaces: UnknownNamespacePolicy::Reject,
        ..EncoderConfig::default()
    };
    let bytes = with_config(r#"<Sync xmlns="AirSync:"><Bogus/></Sync>"#, config).unwrap();
    assert_eq!(bytes, b"\x03\x01j\x06Bogus\x00\x45\x04\x00\x01".to_vec());
}

#[test]
fn test_unknown_name_in_known_namespace() {
    let bytes = activesync(r#"<Sync xmlns="AirSync:"><Bogus/></Sync>"#).unwrap();
    assert_eq!(bytes, b"\x03\x01j\x06Bogus\x00\x45\x04\x00\x01".to_vec());
}

#[test]
fn test_unknown_name_switches_to_its_namespace_page() {
    let bytes =
        activesync(r#"<Sync xmlns="AirSync:" xmlns:c="Contacts:"><c:Bogus/></Sync>"#).unwrap();
    assert_eq!(bytes, b"\x03\x01j\x06Bogus\x00\x45\x00\x01\x04\x00\x01".to_vec());
}

#[test]
fn test_literal_keeps_page_for_following_tokens() {
    // Bogus selects Contacts, so JobTitle needs no second switch
    let bytes = activesync(
        r#"<Sync xmlns="AirSync:" xmlns:c="Contacts:"><c:Bogus/><c:JobTitle/><SyncKey/></Sync>"#,
    )
    .unwrap();
    assert_eq!(
        bytes,
        b"\x03\x01j\x06Bogus\x00\x45\x00\x01\x04\x00\x28\x00\x00\x0b\x01".to_vec()
    );
}

#[test]
fn test_literal_attribute_switches_attribute_page() {
    let dictionary = test_dictionary();
    let encoder = Encoder::from_xml(
        r#"<Root xmlns="urn:test" xmlns:o="urn:other"><Item o:bogus="x"/></Root>"#,
        &dictionary,
        EncoderConfig::default(),
    )
    .unwrap();
    assert_eq!(
        encoder.encode().unwrap(),
        b"\x03\x01j\x06bogus\x00\x45\x86\x00\x01\x04\x00\x03x\x00\x01\x01".to_vec()
    );
}

#[test]
fn test_literal_names_are_interned_once() {
    let bytes = activesync(r#"<Sync xmlns="AirSync:"><Bogus/><Other/><Bogus/></Sync>"#).unwrap();
    assert_eq!(
        bytes,
        b"\x03\x01j\x0cBogus\x00Other\x00\x45\x04\x00\x04\x06\x04\x00\x01".to_vec()
    );
}

#[test]
fn test_literal_with_content_and_attributes() {
    let bytes = activesync(r#"<Sync xmlns="AirSync:"><Bogus a="1">x</Bogus></Sync>"#).unwrap();
    // LITERAL_AC "Bogus", LITERAL "a" = "1", END, "x", END
    assert_eq!(
        bytes,
        b"\x03\x01j\x08Bogus\x00a\x00\x45\xc4\x00\x04\x06\x031\x00\x01\x03x\x00\x01\x01".to_vec()
    );
}

#[test]
fn test_attribute_tokens() {
    let dictionary = test_dictionary();
    let encoder = Encoder::from_xml(
        r#"<Root xmlns="urn:test"><Item id="7"/></Root>"#,
        &dictionary,
        EncoderConfig::default(),
    )
    .unwrap();
    assert_eq!(
        encoder.encode().unwrap(),
        vec![0x03, 0x01, 0x6A, 0x00, 0x45, 0x86, 0x05, 0x03, 0x37, 0x00, 0x01, 0x01]
    );
}

#[test]
fn test_literal_attribute() {
    let dictionary = test_dictionary();
    let encoder = Encoder::from_xml(
        r#"<Root xmlns="urn:test"><Item other="x"/></Root>"#,
        &dictionary,
        EncoderConfig::default(),
    )
    .unwrap();
    assert_eq!(
        encoder.encode().unwrap(),
        b"\x03\x01j\x06other\x00\x45\x86\x04\x00\x03x\x00\x01\x01".to_vec()
    );
}

#[test]
fn test_empty_attribute_value_writes_no_value() {
    let dictionary = test_dictionary();
    let encoder = Encoder::from_xml(
        r#"<Root xmlns="urn:test" id=""/>"#,
        &dictionary,
        EncoderConfig::default(),
    )
    .unwrap();
    assert_eq!(
        encoder.encode().unwrap(),
        vec![0x03, 0x01, 0x6A, 0x00, 0x85, 0x05, 0x01]
    );
}

#[test]
fn test_attribute_page_is_tracked_separately() {
    let dictionary = test_dictionary();
    let document = Element::namespaced("urn:test", "Root")
        .with_attribute("{urn:other}kind", "a")
        .with_child(Element::namespaced("urn:test", "Item").with_attribute("{urn:other}kind", "b"));
    let encoder = Encoder::new(document, &dictionary, EncoderConfig::default()).unwrap();

    assert_eq!(
        encoder.encode().unwrap(),
        vec![
            0x03, 0x01, 0x6A, 0x00, // header
            0xC5, 0x00, 0x01, 0x06, 0x03, b'a', 0x00, 0x01, // Root, attribute page 1
            0x86, 0x06, 0x03, b'b', 0x00, 0x01, // Item, no second switch
            0x01,
        ]
    );
}

#[test]
fn test_string_table_interning() {
    let config = EncoderConfig {
        string_table: true,
        ..EncoderConfig::default()
    };
    let bytes = with_config(
        r#"<FolderSync xmlns="FolderHierarchy:"><SyncKey>0</SyncKey></FolderSync>"#,
        config.clone(),
    )
    .unwrap();
    assert_eq!(
        bytes,
        vec![0x03, 0x01, 0x6A, 0x02, b'0', 0x00, 0x00, 0x07, 0x56, 0x52, 0x83, 0x00, 0x01, 0x01]
    );

    let repeated = with_config(
        r#"<Sync xmlns="AirSync:"><SyncKey>0</SyncKey><Status>0</Status></Sync>"#,
        config,
    )
    .unwrap();
    assert_eq!(
        repeated,
        vec![
            0x03, 0x01, 0x6A, 0x02, b'0', 0x00, 0x45, 0x4B, 0x83, 0x00, 0x01, 0x4E, 0x83, 0x00,
            0x01, 0x01
        ]
    );
}

#[test]
fn test_opaque_and_entity_nodes() {
    let document = Element::namespaced("AirSync:", "Sync")
        .with_child(Element::namespaced("AirSync:", "SyncKey").with_opaque(vec![0x01, 0x02, 0x03]))
        .with_child(Element::namespaced("AirSync:", "Status").with_entity(0xE9));
    let encoder =
        Encoder::new(document, CodePageDictionary::activesync(), EncoderConfig::default()).unwrap();
    assert_eq!(
        encoder.encode().unwrap(),
        vec![
            0x03, 0x01, 0x6A, 0x00, 0x45, 0x4B, 0xC3, 0x03, 0x01, 0x02, 0x03, 0x01, 0x4E, 0x02,
            0x81, 0x69, 0x01, 0x01
        ]
    );
}

#[test]
fn test_empty_text_is_content() {
    let document = Element::namespaced("AirSync:", "Sync").with_text("");
    let encoder =
        Encoder::new(document, CodePageDictionary::activesync(), EncoderConfig::default()).unwrap();
    assert_eq!(
        encoder.encode().unwrap(),
        vec![0x03, 0x01, 0x6A, 0x00, 0x45, 0x03, 0x00, 0x01]
    );
}

#[test]
fn test_whitespace_text_is_kept_by_default() {
    let bytes = activesync(r#"<Sync xmlns="AirSync:"><SyncKey> </SyncKey></Sync>"#).unwrap();
    assert_eq!(bytes, b"\x03\x01j\x00EK\x03 \x00\x01\x01".to_vec());
}

#[test]
fn test_ignore_whitespace_between_elements() {
    let xml = "<Sync xmlns=\"AirSync:\">\n  <SyncKey>0</SyncKey>\n</Sync>\n";
    let config = EncoderConfig {
        ignore_whitespace: true,
        ..EncoderConfig::default()
    };
    assert_eq!(
        with_config(xml, config).unwrap(),
        b"\x03\x01j\x00EK\x030\x00\x01\x01".to_vec()
    );

    let kept = activesync(xml).unwrap();
    assert_eq!(kept, b"\x03\x01j\x00E\x03\n  \x00K\x030\x00\x01\x03\n\x00\x01".to_vec());
}

#[test]
fn test_header_variants() {
    let xml = r#"<Sync xmlns="AirSync:"/>"#;

    let version = EncoderConfig {
        version: WbxmlVersion::V1_2,
        ..EncoderConfig::default()
    };
    assert_eq!(with_config(xml, version).unwrap(), vec![0x02, 0x01, 0x6A, 0x00, 0x05]);

    let known = EncoderConfig {
        public_id: PublicId::Known(0x1201),
        charset: Charset::UsAscii,
        ..EncoderConfig::default()
    };
    assert_eq!(
        with_config(xml, known).unwrap(),
        vec![0x03, 0xA4, 0x01, 0x03, 0x00, 0x05]
    );

    let literal = EncoderConfig {
        public_id: PublicId::Literal("-//AIRSYNC//DTD".to_string()),
        ..EncoderConfig::default()
    };
    let mut expected = vec![0x03, 0x00, 0x00, 0x6A, 0x10];
    expected.extend_from_slice(b"-//AIRSYNC//DTD\0");
    expected.push(0x05);
    assert_eq!(with_config(xml, literal).unwrap(), expected);
}

#[test]
fn test_public_id_zero_is_reserved() {
    let config = EncoderConfig {
        public_id: PublicId::Known(0),
        ..EncoderConfig::default()
    };
    assert_eq!(
        Encoder::new(Element::namespaced("AirSync:", "Sync"), CodePageDictionary::activesync(), config)
            .unwrap_err(),
        EncodingError::ReservedPublicId
    );
}

#[test]
fn test_us_ascii_rejects_non_ascii_text() {
    let config = EncoderConfig {
        charset: Charset::UsAscii,
        ..EncoderConfig::default()
    };
    let error = with_config(r#"<Sync xmlns="AirSync:"><Class>café</Class></Sync>"#, config)
        .unwrap_err();
    assert_eq!(
        error,
        EncodingError::MalformedInput(MalformedInputError::NonAsciiString("café".to_string()))
    );
}

#[test]
fn test_literal_public_id_rejects_nul() {
    let config = EncoderConfig {
        public_id: PublicId::Literal("a\0b".to_string()),
        ..EncoderConfig::default()
    };
    assert!(matches!(
        Encoder::new(Element::new("Sync"), CodePageDictionary::activesync(), config),
        Err(EncodingError::MalformedInput(MalformedInputError::NulInString(_)))
    ));
}

#[test]
fn test_malformed_input() {
    assert_eq!(
        activesync("").unwrap_err(),
        EncodingError::MalformedInput(MalformedInputError::EmptyDocument)
    );
    assert_eq!(
        activesync("  \n ").unwrap_err(),
        EncodingError::MalformedInput(MalformedInputError::EmptyDocument)
    );
    assert!(matches!(
        activesync("<Sync><SyncKey></Sync>"),
        Err(EncodingError::MalformedInput(MalformedInputError::Xml(_)))
    ));
}

#[test]
fn test_nesting_depth_is_limited() {
    let nested = |depth: usize| {
        (1..depth).fold(Element::namespaced("AirSync:", "Sync"), |inner, _| {
            Element::namespaced("AirSync:", "Sync").with_child(inner)
        })
    };
    let dictionary = CodePageDictionary::activesync();

    let deepest = Encoder::new(nested(MAX_DEPTH), dictionary, EncoderConfig::default()).unwrap();
    let bytes = deepest.encode().unwrap();
    // header, MAX_DEPTH tags, one END per element with content
    assert_eq!(bytes.len(), 4 + MAX_DEPTH + (MAX_DEPTH - 1));

    assert_eq!(
        Encoder::new(nested(MAX_DEPTH + 1), dictionary, EncoderConfig::default()).unwrap_err(),
        EncodingError::MalformedInput(MalformedInputError::TooDeep { limit: MAX_DEPTH })
    );
}

#[test]
fn test_dictionary_errors_convert() {
    assert!(std::ptr::eq(
        CodePageDictionary::try_activesync().unwrap(),
        CodePageDictionary::activesync()
    ));

    let error = CodePageDictionary::builder()
        .page(CodePageBuilder::new(3, "urn:empty"))
        .build()
        .map_err(EncodingError::from)
        .unwrap_err();
    assert_eq!(
        error,
        EncodingError::Dictionary(DictionaryError::EmptyCodePage { page: 3 })
    );
    assert!(error.to_string().starts_with("dictionary configuration error: "));
}

#[test]
fn test_construction_does_not_encode() {
    let encoder = Encoder::from_xml(
        r#"<Sync xmlns="AirSync:" xmlns:x="urn:example"><x:Foo/></Sync>"#,
        CodePageDictionary::activesync(),
        EncoderConfig {
            unknown_namespaces: UnknownNamespacePolicy::Reject,
            ..EncoderConfig::default()
        },
    )
    .unwrap();
    assert_eq!(encoder.document().local_name(), "Sync");
    assert!(encoder.encode().is_err());
}

#[test]
fn test_shared_dictionary_across_threads() {
    let expected = b"\x03\x01j\x00\x00\x07VR\x030\x00\x01\x01".to_vec();
    let handles: Vec<_> = (0..8)
        .map(|_| {
            thread::spawn(|| {
                activesync(r#"<FolderSync xmlns="FolderHierarchy:"><SyncKey>0</SyncKey></FolderSync>"#)
                    .unwrap()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
