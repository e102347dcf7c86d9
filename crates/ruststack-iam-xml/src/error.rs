//! XML unmarshalling error types.

use std::fmt;

/// Errors that can occur while unmarshalling IAM XML.
#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    /// An error from the underlying quick-xml library.
    #[error("XML processing error: {0}")]
    QuickXml(#[from] quick_xml::Error),

    /// An error from quick-xml attribute handling.
    #[error("XML attribute error: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    /// Element names, text or attribute values that are not valid UTF-8 or
    /// contain a bad escape.
    #[error("invalid XML text: {0}")]
    InvalidText(String),

    /// An end tag that does not close the innermost open element.
    #[error("mismatched end tag: expected </{expected}>, found </{found}>")]
    MismatchedEndTag {
        /// The innermost open element.
        expected: String,
        /// The end tag actually read.
        found: String,
    },

    /// An event that cannot appear at the current position.
    #[error("unexpected XML event: {0}")]
    UnexpectedEvent(String),

    /// A required XML element was missing.
    #[error("missing required XML element: {0}")]
    MissingElement(String),

    /// An error parsing a scalar value from XML text content.
    #[error("failed to parse value: {0}")]
    ParseError(String),

    /// A single member could not be decoded. Aborts the whole value.
    #[error("failed to unmarshall {shape}.{field}: {reason}")]
    FieldUnmarshal {
        /// The shape being built.
        shape: &'static str,
        /// The field expression that matched.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

impl XmlError {
    /// An event that was not expected while doing `context`.
    pub(crate) fn unexpected(event: &impl fmt::Display, context: &str) -> Self {
        Self::UnexpectedEvent(format!("{event} while {context}"))
    }
}
