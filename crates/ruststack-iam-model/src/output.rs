//! IAM result shapes that embed signing certificates.

use serde::{Deserialize, Serialize};

use crate::types::SigningCertificate;

/// Result of `UploadSigningCertificate`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UploadSigningCertificateResult {
    /// The certificate that was uploaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate: Option<SigningCertificate>,
}

/// Result of `ListSigningCertificates`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListSigningCertificatesResult {
    /// Certificates in document order.
    #[serde(default)]
    pub certificates: Vec<SigningCertificate>,

    /// Whether more certificates are available past `marker`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_truncated: Option<bool>,

    /// Pagination marker for the next request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<String>,
}
