//! KMS model types for RustStack.
//!
//! KMS speaks the `awsJson1_1` protocol, so request shapes are plain structs
//! whose wire form is produced by the `ruststack-kms-json` crate. Unlike the
//! DynamoDB model, serialization is not derived: absent members must be
//! omitted and auto-constructed collections must be told apart from
//! explicitly empty ones, which a derive cannot express.
#![allow(clippy::module_name_repetitions)]

pub mod input;
pub mod operations;
pub mod types;

pub use input::EncryptRequest;
pub use operations::KmsOperation;
pub use types::TrackedList;
