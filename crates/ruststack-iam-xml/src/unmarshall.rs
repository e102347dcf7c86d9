//! Depth-bounded streaming unmarshalling.
//!
//! Every structure is read by the same loop, [`FieldTable::unmarshall`],
//! driven by a static table that maps field expressions to decoders. The loop
//! records the cursor depth on entry and only accepts fields that appear
//! exactly one level below it, so members of nested structures are never
//! mistaken for members of the structure being built.

use crate::cursor::{StaxCursor, XmlEvent};
use crate::error::XmlError;

/// Reads one value of `Output` from a cursor.
///
/// Implementations are stateless; one shared instance can serve any number
/// of calls, but a single cursor must only be driven by one call chain.
pub trait StaxUnmarshaller {
    /// The value produced.
    type Output;

    /// Consume the events of one value and return it.
    ///
    /// When called at the very start of a document the value is read from
    /// the root element; otherwise the cursor must be positioned just after
    /// the value's start tag, and is left just after its end tag.
    fn unmarshall(&self, cursor: &mut StaxCursor<'_>) -> Result<Self::Output, XmlError>;
}

/// Decoder for one member: reads the value at the cursor and stores it.
pub type FieldDecoder<T> = fn(&mut T, &mut StaxCursor<'_>) -> Result<(), XmlError>;

/// One entry of a [`FieldTable`].
#[derive(Debug)]
pub struct Field<T> {
    /// Path expression tested against the cursor, e.g. `UserName` or
    /// `Certificates/member`.
    pub expression: &'static str,
    /// Decoder invoked when the expression matches.
    pub decode: FieldDecoder<T>,
}

/// Static field table for one structure.
#[derive(Debug)]
pub struct FieldTable<T: 'static> {
    shape: &'static str,
    fields: &'static [Field<T>],
}

impl<T: 'static> FieldTable<T> {
    /// Build a table. Fails const evaluation if two entries share an
    /// expression.
    #[must_use]
    pub const fn new(shape: &'static str, fields: &'static [Field<T>]) -> Self {
        let mut i = 0;
        while i < fields.len() {
            let mut j = i + 1;
            while j < fields.len() {
                assert!(
                    !const_str_eq(fields[i].expression, fields[j].expression),
                    "duplicate field expression in unmarshaller table"
                );
                j += 1;
            }
            i += 1;
        }
        Self { shape, fields }
    }

    /// Name of the structure this table builds.
    #[must_use]
    pub fn shape(&self) -> &'static str {
        self.shape
    }

    /// Field expressions in table order.
    pub fn expressions(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.expression)
    }

    fn find(&self, cursor: &StaxCursor<'_>, target_depth: usize) -> Option<&Field<T>> {
        self.fields
            .iter()
            .find(|f| cursor.test_expression(f.expression, target_depth))
    }
}

impl<T: Default + 'static> FieldTable<T> {
    /// Run the depth-bounded loop and return the populated value.
    ///
    /// - end of document: return what has been read so far;
    /// - start tag or attribute matching a field at the target depth: decode it;
    /// - end tag taking the cursor above the entry depth: return;
    /// - anything else is skipped.
    ///
    /// A decoder failure aborts the whole value.
    pub fn unmarshall(&self, cursor: &mut StaxCursor<'_>) -> Result<T, XmlError> {
        let mut value = T::default();
        let original_depth = cursor.current_depth();
        let mut target_depth = original_depth + 1;
        if cursor.is_start_of_document()? {
            // Root call: skip the document level and the root element itself.
            target_depth += 2;
        }

        tracing::debug!(
            shape = self.shape,
            original_depth,
            target_depth,
            "unmarshalling structure"
        );

        loop {
            match cursor.next_event()? {
                XmlEvent::EndDocument => {
                    if cursor.open_elements() > 0 {
                        tracing::warn!(
                            shape = self.shape,
                            open_elements = cursor.open_elements(),
                            "document ended inside structure, returning partial value"
                        );
                    }
                    return Ok(value);
                }
                event @ (XmlEvent::StartElement(_) | XmlEvent::Attribute { .. }) => {
                    if let Some(field) = self.find(cursor, target_depth) {
                        (field.decode)(&mut value, cursor)
                            .map_err(|e| self.field_error(field.expression, e))?;
                    } else {
                        tracing::trace!(shape = self.shape, %event, "skipping");
                    }
                }
                XmlEvent::EndElement(_) => {
                    if cursor.current_depth() < original_depth {
                        tracing::debug!(shape = self.shape, "structure complete");
                        return Ok(value);
                    }
                }
                XmlEvent::StartDocument | XmlEvent::Characters(_) => {}
            }
        }
    }

    fn field_error(&self, field: &'static str, err: XmlError) -> XmlError {
        match err {
            XmlError::ParseError(reason) => XmlError::FieldUnmarshal {
                shape: self.shape,
                field,
                reason,
            },
            other => other,
        }
    }
}

/// Unmarshal a value whose root element is the document root.
///
/// # Errors
///
/// Returns `XmlError` if the XML is malformed or a member cannot be decoded.
pub fn from_xml<U: StaxUnmarshaller>(
    unmarshaller: &U,
    xml: &[u8],
) -> Result<U::Output, XmlError> {
    let mut cursor = StaxCursor::from_xml(xml);
    unmarshaller.unmarshall(&mut cursor)
}

/// Unmarshal the first `element` found anywhere in the document.
///
/// Used for query-protocol responses, where the value is wrapped in
/// `<XxxResponse><XxxResult>`.
///
/// # Errors
///
/// Returns `XmlError::MissingElement` if no such element exists.
pub fn from_xml_element<U: StaxUnmarshaller>(
    unmarshaller: &U,
    xml: &[u8],
    element: &str,
) -> Result<U::Output, XmlError> {
    let mut cursor = StaxCursor::from_xml(xml);
    if !cursor.advance_to_element(element)? {
        return Err(XmlError::MissingElement(element.to_owned()));
    }
    unmarshaller.unmarshall(&mut cursor)
}

const fn const_str_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}
