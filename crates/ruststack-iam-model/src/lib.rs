//! IAM model types for RustStack.
//!
//! Only the signing-certificate shapes are modelled here. IAM uses the
//! `awsQuery` protocol, so these values are read from XML responses by the
//! `ruststack-iam-xml` crate; the `serde` derives exist for re-emitting them
//! as JSON.

pub mod output;
pub mod types;

pub use output::{ListSigningCertificatesResult, UploadSigningCertificateResult};
pub use types::SigningCertificate;
