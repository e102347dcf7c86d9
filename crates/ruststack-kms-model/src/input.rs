//! KMS input types.
//!
//! Input structs accept `PascalCase` JSON so that request documents captured
//! from the wire can be loaded back into typed values. `Plaintext` is a blob
//! and therefore base64-encoded in JSON.

use std::collections::HashMap;

use bytes::Bytes;
use serde::{Deserialize, Deserializer};

use crate::types::TrackedList;

/// Input for the `Encrypt` operation.
///
/// Every member is optional. Map values and list elements are themselves
/// optional; `None` entries are dropped when the request is marshalled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EncryptRequest {
    /// Key ARN, alias, or key id of the customer master key.
    #[serde(default)]
    pub key_id: Option<String>,

    /// Data to encrypt.
    #[serde(default, deserialize_with = "deserialize_blob")]
    pub plaintext: Option<Bytes>,

    /// Name/value pairs bound to the ciphertext as additional authenticated data.
    #[serde(default)]
    pub encryption_context: Option<HashMap<String, Option<String>>>,

    /// Grant tokens for the request.
    #[serde(default)]
    pub grant_tokens: TrackedList<Option<String>>,
}

impl EncryptRequest {
    /// Create an empty request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the key identifier.
    #[must_use]
    pub fn with_key_id(mut self, key_id: impl Into<String>) -> Self {
        self.key_id = Some(key_id.into());
        self
    }

    /// Set the plaintext.
    #[must_use]
    pub fn with_plaintext(mut self, plaintext: impl Into<Bytes>) -> Self {
        self.plaintext = Some(plaintext.into());
        self
    }

    /// Set the whole encryption context map.
    #[must_use]
    pub fn with_encryption_context(mut self, context: HashMap<String, Option<String>>) -> Self {
        self.encryption_context = Some(context);
        self
    }

    /// Add one encryption context entry, creating the map if needed.
    #[must_use]
    pub fn add_encryption_context_entry(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.encryption_context
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), Some(value.into()));
        self
    }

    /// Explicitly set the grant tokens. An empty iterator still counts as set.
    #[must_use]
    pub fn with_grant_tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.grant_tokens = tokens.into_iter().map(|t| Some(t.into())).collect();
        self
    }
}

fn deserialize_blob<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Bytes>, D::Error> {
    use base64::Engine;

    let encoded: Option<String> = Option::deserialize(deserializer)?;
    encoded
        .map(|s| {
            base64::engine::general_purpose::STANDARD
                .decode(s.as_bytes())
                .map(Bytes::from)
                .map_err(|e| serde::de::Error::custom(format!("invalid base64 blob: {e}")))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_build_request_with_builder_methods() {
        let req = EncryptRequest::new()
            .with_key_id("alias/app")
            .with_plaintext(&b"secret"[..])
            .add_encryption_context_entry("purpose", "test")
            .with_grant_tokens(["g1", "g2"]);

        assert_eq!(req.key_id.as_deref(), Some("alias/app"));
        assert_eq!(req.plaintext.as_deref(), Some(&b"secret"[..]));
        assert_eq!(
            req.encryption_context.unwrap().get("purpose"),
            Some(&Some("test".to_owned()))
        );
        assert_eq!(req.grant_tokens.len(), 2);
        assert!(!req.grant_tokens.is_auto_construct());
    }

    #[test]
    fn test_should_deserialize_request_document() {
        let json = r#"{
            "KeyId": "1234abcd",
            "Plaintext": "c2VjcmV0",
            "EncryptionContext": {"a": "1", "b": null},
            "GrantTokens": ["t1", null]
        }"#;
        let req: EncryptRequest = serde_json::from_str(json).unwrap();

        assert_eq!(req.key_id.as_deref(), Some("1234abcd"));
        assert_eq!(req.plaintext.as_deref(), Some(&b"secret"[..]));
        let ctx = req.encryption_context.unwrap();
        assert_eq!(ctx.get("b"), Some(&None));
        assert_eq!(&*req.grant_tokens, &[Some("t1".to_owned()), None]);
    }

    #[test]
    fn test_should_leave_missing_members_unset() {
        let req: EncryptRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req, EncryptRequest::default());
        assert!(req.grant_tokens.is_unset());
    }

    #[test]
    fn test_should_reject_invalid_base64_plaintext() {
        let result: Result<EncryptRequest, _> = serde_json::from_str(r#"{"Plaintext": "@@@"}"#);
        assert!(result.is_err());
    }
}
