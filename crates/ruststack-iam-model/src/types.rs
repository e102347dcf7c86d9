//! IAM value types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An X.509 signing certificate associated with an IAM user.
///
/// Every member is optional; a member stays `None` when its element never
/// appeared in the source document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SigningCertificate {
    /// Name of the user the certificate belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,

    /// Id of the certificate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_id: Option<String>,

    /// PEM-encoded certificate body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_body: Option<String>,

    /// `Active` or `Inactive`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// When the certificate was uploaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_date: Option<DateTime<Utc>>,
}

impl SigningCertificate {
    /// Whether no member has been populated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
