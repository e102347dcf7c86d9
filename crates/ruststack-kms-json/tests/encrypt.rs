//! Wire-level checks for the `Encrypt` marshaller.

use std::collections::BTreeSet;

use ruststack_kms_json::{CONTENT_TYPE, ENCRYPT_REQUEST_MARSHALLER, Marshaller, MarshallError};
use ruststack_kms_model::EncryptRequest;

fn request_with(mask: u8) -> (EncryptRequest, BTreeSet<&'static str>) {
    let mut req = EncryptRequest::new();
    let mut expected = BTreeSet::new();
    if mask & 0b0001 != 0 {
        req = req.with_key_id("arn:aws:kms:us-east-1:000000000000:key/abc");
        expected.insert("KeyId");
    }
    if mask & 0b0010 != 0 {
        req = req.with_plaintext(&b"payload"[..]);
        expected.insert("Plaintext");
    }
    if mask & 0b0100 != 0 {
        req = req.add_encryption_context_entry("department", "finance");
        expected.insert("EncryptionContext");
    }
    if mask & 0b1000 != 0 {
        req = req.with_grant_tokens(["grant-1"]);
        expected.insert("GrantTokens");
    }
    (req, expected)
}

#[test]
fn test_should_emit_exactly_the_present_members() {
    for mask in 0..16u8 {
        let (req, expected) = request_with(mask);
        let wire = ENCRYPT_REQUEST_MARSHALLER.marshall(Some(&req)).unwrap();
        let body: serde_json::Value = serde_json::from_slice(&wire.body).unwrap();
        let keys: BTreeSet<&str> = body
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, expected, "mask {mask:#06b}");
    }
}

#[test]
fn test_should_report_byte_length_of_utf8_body() {
    let req = EncryptRequest::new()
        .with_key_id("alias/caf\u{e9}")
        .add_encryption_context_entry("r\u{e9}gion", "\u{6771}\u{4eac}");
    let wire = ENCRYPT_REQUEST_MARSHALLER.marshall(Some(&req)).unwrap();

    assert!(std::str::from_utf8(&wire.body).is_ok());
    assert_eq!(
        wire.header("content-length"),
        Some(wire.body.len().to_string().as_str())
    );
}

#[test]
fn test_should_carry_fixed_protocol_metadata() {
    let wire = ENCRYPT_REQUEST_MARSHALLER
        .marshall(Some(&EncryptRequest::new().with_key_id("k")))
        .unwrap();

    assert_eq!(wire.method, http::Method::POST);
    assert!(wire.resource_path.is_empty());
    assert_eq!(wire.header("x-amz-target"), Some("TrentService.Encrypt"));
    assert_eq!(wire.header("content-type"), Some(CONTENT_TYPE));
}

#[test]
fn test_should_round_trip_plaintext_through_base64() {
    let raw: Vec<u8> = (0u8..=255).collect();
    let req = EncryptRequest::new().with_plaintext(raw.clone());
    let wire = ENCRYPT_REQUEST_MARSHALLER.marshall(Some(&req)).unwrap();

    let reloaded: EncryptRequest = serde_json::from_slice(&wire.body).unwrap();
    assert_eq!(reloaded.plaintext.as_deref(), Some(raw.as_slice()));
}

#[test]
fn test_should_fail_fast_on_absent_request() {
    match ENCRYPT_REQUEST_MARSHALLER.marshall(None) {
        Err(MarshallError::InvalidArgument(msg)) => assert!(msg.contains("EncryptRequest")),
        other => panic!("expected InvalidArgument, got {other:?}"),
    }
}
