//! IAM query-protocol XML unmarshalling for `RustStack`.
//!
//! IAM responses are XML documents that are read as a stream of events.
//! Structures are decoded by a single depth-bounded loop: every unmarshaller
//! remembers the depth at which it was entered, accepts only the members one
//! level below that, and stops when the cursor climbs back above it. This
//! keeps nested structures and lists from leaking into their parents without
//! building a DOM.
//!
//! # Key components
//!
//! - [`StaxCursor`] wraps a quick-xml reader (or a prepared event list) and
//!   tracks depth, the open-element path and the current attribute
//! - [`StaxUnmarshaller`] is implemented by one stateless value per shape,
//!   e.g. [`SIGNING_CERTIFICATE`]
//! - [`from_xml`] reads a value from the document root, [`from_xml_element`]
//!   from the first element with a given name
//!
//! # Conventions
//!
//! - Timestamps: ISO 8601 (`2013-06-06T21:40:08Z`), read as UTC
//! - Booleans: lowercase `true`/`false`
//! - Unknown elements are skipped
//! - A document that ends early yields whatever was read so far

pub mod certificate;
pub mod cursor;
pub mod error;
pub mod scalar;
pub mod unmarshall;

pub use certificate::{
    LIST_SIGNING_CERTIFICATES_RESULT, ListSigningCertificatesResultUnmarshaller,
    SIGNING_CERTIFICATE, SigningCertificateUnmarshaller, UPLOAD_SIGNING_CERTIFICATE_RESULT,
    UploadSigningCertificateResultUnmarshaller,
};
pub use cursor::{StaxCursor, XmlEvent};
pub use error::XmlError;
pub use unmarshall::{
    Field, FieldDecoder, FieldTable, StaxUnmarshaller, from_xml, from_xml_element,
};
