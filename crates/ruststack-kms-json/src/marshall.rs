//! Request marshallers.
//!
//! A marshaller writes the members of a request in declared order and leaves
//! out every member that is unset. `None` map values and `None` list elements
//! are filtered out rather than written as `null`.

use std::collections::{BTreeMap, HashMap};

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use ruststack_kms_model::{EncryptRequest, KmsOperation, TrackedList};

use crate::error::MarshallError;
use crate::wire::WireRequest;

/// Turns a typed request into a [`WireRequest`].
pub trait Marshaller<T> {
    /// Marshall `input`, failing with [`MarshallError::InvalidArgument`] when
    /// it is absent.
    fn marshall(&self, input: Option<&T>) -> Result<WireRequest, MarshallError>;
}

/// Marshaller for the KMS `Encrypt` operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct EncryptRequestMarshaller;

/// Shared stateless instance.
pub static ENCRYPT_REQUEST_MARSHALLER: EncryptRequestMarshaller = EncryptRequestMarshaller;

impl Marshaller<EncryptRequest> for EncryptRequestMarshaller {
    fn marshall(&self, input: Option<&EncryptRequest>) -> Result<WireRequest, MarshallError> {
        let request = input.ok_or_else(|| MarshallError::missing_input("EncryptRequest"))?;

        let wire = WireRequest::json(KmsOperation::Encrypt, &EncryptRequestBody(request))?;
        tracing::debug!(
            operation = %wire.operation,
            content_length = wire.content_length(),
            "marshalled KMS request"
        );
        Ok(wire)
    }
}

/// JSON body writer for [`EncryptRequest`].
struct EncryptRequestBody<'a>(&'a EncryptRequest);

impl Serialize for EncryptRequestBody<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use base64::Engine;

        let req = self.0;
        let mut map = serializer.serialize_map(None)?;

        if let Some(key_id) = &req.key_id {
            map.serialize_entry("KeyId", key_id)?;
        }
        if let Some(plaintext) = &req.plaintext {
            let encoded = base64::engine::general_purpose::STANDARD.encode(plaintext);
            map.serialize_entry("Plaintext", &encoded)?;
        }
        if let Some(context) = req.encryption_context.as_ref().filter(|c| !c.is_empty()) {
            map.serialize_entry("EncryptionContext", &PresentEntries(context))?;
        }
        if !req.grant_tokens.is_unset() {
            map.serialize_entry("GrantTokens", &PresentElements(&req.grant_tokens))?;
        }

        map.end()
    }
}

/// Writes a string map as a JSON object, skipping entries whose value is `None`.
///
/// Keys are written in sorted order so that identical requests produce
/// identical bodies.
struct PresentEntries<'a>(&'a HashMap<String, Option<String>>);

impl Serialize for PresentEntries<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let present: BTreeMap<&str, &str> = self
            .0
            .iter()
            .filter_map(|(k, v)| v.as_deref().map(|v| (k.as_str(), v)))
            .collect();

        let mut map = serializer.serialize_map(Some(present.len()))?;
        for (key, value) in present {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Writes a list as a JSON array, skipping `None` elements and keeping order.
struct PresentElements<'a>(&'a TrackedList<Option<String>>);

impl Serialize for PresentElements<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(None)?;
        for token in self.0.iter().flatten() {
            seq.serialize_element(token)?;
        }
        seq.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_json(request: &EncryptRequest) -> serde_json::Value {
        let wire = ENCRYPT_REQUEST_MARSHALLER.marshall(Some(request)).unwrap();
        serde_json::from_slice(&wire.body).unwrap()
    }

    #[test]
    fn test_should_reject_absent_request() {
        let err = ENCRYPT_REQUEST_MARSHALLER.marshall(None).unwrap_err();
        assert!(matches!(err, MarshallError::InvalidArgument(_)));
    }

    #[test]
    fn test_should_marshall_empty_request_as_empty_object() {
        let wire = ENCRYPT_REQUEST_MARSHALLER
            .marshall(Some(&EncryptRequest::default()))
            .unwrap();
        assert_eq!(&wire.body[..], b"{}");
        assert_eq!(wire.header("content-length"), Some("2"));
    }

    #[test]
    fn test_should_write_members_in_declared_order() {
        let req = EncryptRequest::new()
            .with_key_id("alias/app")
            .with_plaintext(&b"hi"[..])
            .add_encryption_context_entry("k", "v")
            .with_grant_tokens(["t"]);
        let wire = ENCRYPT_REQUEST_MARSHALLER.marshall(Some(&req)).unwrap();
        assert_eq!(
            std::str::from_utf8(&wire.body).unwrap(),
            r#"{"KeyId":"alias/app","Plaintext":"aGk=","EncryptionContext":{"k":"v"},"GrantTokens":["t"]}"#
        );
    }

    #[test]
    fn test_should_drop_context_entries_without_value() {
        let mut context = HashMap::new();
        context.insert("keep".to_owned(), Some("yes".to_owned()));
        context.insert("drop".to_owned(), None);
        let json = body_json(&EncryptRequest::new().with_encryption_context(context));

        assert_eq!(json["EncryptionContext"], serde_json::json!({"keep": "yes"}));
    }

    #[test]
    fn test_should_omit_empty_context() {
        let json = body_json(&EncryptRequest::new().with_encryption_context(HashMap::new()));
        assert_eq!(json, serde_json::json!({}));
    }

    #[test]
    fn test_should_drop_absent_grant_tokens_and_keep_order() {
        let req = EncryptRequest {
            grant_tokens: TrackedList::explicit(vec![
                Some("b".to_owned()),
                None,
                Some("a".to_owned()),
            ]),
            ..EncryptRequest::default()
        };
        let json = body_json(&req);
        assert_eq!(json["GrantTokens"], serde_json::json!(["b", "a"]));
    }

    #[test]
    fn test_should_omit_auto_constructed_grant_tokens() {
        let json = body_json(&EncryptRequest::new().with_key_id("k"));
        assert!(json.get("GrantTokens").is_none());
    }

    #[test]
    fn test_should_write_explicit_empty_grant_tokens() {
        let req = EncryptRequest::new().with_grant_tokens(Vec::<String>::new());
        let json = body_json(&req);
        assert_eq!(json["GrantTokens"], serde_json::json!([]));
    }
}
