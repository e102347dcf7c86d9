//! Marshalling errors.

/// Errors raised while turning a request value into a wire request.
#[derive(Debug, thiserror::Error)]
pub enum MarshallError {
    /// The request value itself was absent.
    #[error("invalid argument passed to marshall(...): {0}")]
    InvalidArgument(String),

    /// Encoding the request failed. Carries the original cause.
    #[error("unable to marshall request to JSON: {source}")]
    SerializationFailure {
        /// The underlying encoder or writer error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl MarshallError {
    /// Missing request value.
    #[must_use]
    pub fn missing_input(shape: &str) -> Self {
        Self::InvalidArgument(format!("{shape} must not be absent"))
    }

    /// Wrap an encoder or writer error.
    #[must_use]
    pub fn serialization(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::SerializationFailure {
            source: Box::new(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn test_should_keep_original_cause() {
        let cause = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = MarshallError::serialization(cause);
        assert!(err.to_string().starts_with("unable to marshall request to JSON"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_should_name_missing_shape() {
        let err = MarshallError::missing_input("EncryptRequest");
        assert_eq!(
            err.to_string(),
            "invalid argument passed to marshall(...): EncryptRequest must not be absent"
        );
    }
}
