//! The marshalled, transport-ready request.

use bytes::Bytes;
use serde::Serialize;

use ruststack_kms_model::KmsOperation;
use ruststack_kms_model::operations::SERVICE_NAME;

use crate::error::MarshallError;

/// Content type for KMS JSON requests.
pub const CONTENT_TYPE: &str = "application/x-amz-json-1.1";

/// A fully formed KMS request: method, path, headers and body.
#[derive(Debug, Clone)]
pub struct WireRequest {
    /// Service name the request is addressed to (`AWSKMS`).
    pub service_name: &'static str,
    /// The operation carried in `X-Amz-Target`.
    pub operation: KmsOperation,
    /// Always `POST` for `awsJson1_1`.
    pub method: http::Method,
    /// Resource path appended to the endpoint; empty for JSON protocols.
    pub resource_path: String,
    /// `X-Amz-Target`, `Content-Type` and `Content-Length`.
    pub headers: http::HeaderMap,
    /// Compact UTF-8 JSON body.
    pub body: Bytes,
}

impl WireRequest {
    /// Build a JSON request for `operation` whose body is `payload` serialized
    /// compactly.
    ///
    /// Nothing is returned unless every step succeeds, so a caller never sees
    /// a request with a half-written body or missing headers.
    pub fn json<T: Serialize + ?Sized>(
        operation: KmsOperation,
        payload: &T,
    ) -> Result<Self, MarshallError> {
        let body = serde_json::to_vec(payload).map_err(MarshallError::serialization)?;

        let mut headers = http::HeaderMap::new();
        headers.insert(
            "x-amz-target",
            http::HeaderValue::from_str(&operation.target())
                .map_err(MarshallError::serialization)?,
        );
        headers.insert(
            http::header::CONTENT_LENGTH,
            http::HeaderValue::from(body.len()),
        );
        headers.insert(
            http::header::CONTENT_TYPE,
            http::HeaderValue::from_static(CONTENT_TYPE),
        );

        Ok(Self {
            service_name: SERVICE_NAME,
            operation,
            method: http::Method::POST,
            resource_path: String::new(),
            headers,
            body: Bytes::from(body),
        })
    }

    /// Length of the body in bytes.
    #[must_use]
    pub fn content_length(&self) -> usize {
        self.body.len()
    }

    /// Look up a header value as a string.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Convert into an `http::Request` addressed at `endpoint`.
    pub fn into_http_request(self, endpoint: &str) -> Result<http::Request<Bytes>, http::Error> {
        let uri = format!("{}/{}", endpoint.trim_end_matches('/'), self.resource_path);
        let mut builder = http::Request::builder().method(self.method).uri(uri);
        if let Some(headers) = builder.headers_mut() {
            headers.extend(self.headers);
        }
        builder.body(self.body)
    }
}
