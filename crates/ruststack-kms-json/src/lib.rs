//! KMS request marshalling for RustStack.
//!
//! This crate implements the client side of the `awsJson1_1` protocol for KMS:
//!
//! - **Marshaller trait**: turns a typed request into a [`WireRequest`]
//! - **Body writers**: `serde` adapters that emit only the members that are set
//! - **Wire request**: method, path, headers and body ready for a transport
//!
//! All requests are `POST` to an empty resource path, with the operation
//! named in the `X-Amz-Target` header:
//!
//! ```text
//! X-Amz-Target: TrentService.Encrypt
//! Content-Type: application/x-amz-json-1.1
//! ```

pub mod error;
pub mod marshall;
pub mod wire;

pub use error::MarshallError;
pub use marshall::{ENCRYPT_REQUEST_MARSHALLER, EncryptRequestMarshaller, Marshaller};
pub use wire::{CONTENT_TYPE, WireRequest};
