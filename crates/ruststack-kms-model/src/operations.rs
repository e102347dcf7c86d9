//! KMS operation enum.

use std::fmt;

/// Service name recorded on every marshalled KMS request.
pub const SERVICE_NAME: &str = "AWSKMS";

/// Prefix of the `X-Amz-Target` header value for KMS operations.
pub const TARGET_PREFIX: &str = "TrentService.";

/// Supported KMS operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum KmsOperation {
    /// Encrypt plaintext under a customer master key.
    Encrypt,
}

impl KmsOperation {
    /// Returns the AWS operation name string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Encrypt => "Encrypt",
        }
    }

    /// Returns the full `X-Amz-Target` header value, e.g. `TrentService.Encrypt`.
    #[must_use]
    pub fn target(&self) -> String {
        format!("{TARGET_PREFIX}{}", self.as_str())
    }

    /// Parse an operation name string into a `KmsOperation`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Encrypt" => Some(Self::Encrypt),
            _ => None,
        }
    }
}

impl fmt::Display for KmsOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
