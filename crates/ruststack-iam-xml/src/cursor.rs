//! Forward-only XML event cursor with depth tracking.
//!
//! The cursor flattens an XML document into a stream of [`XmlEvent`]s and
//! keeps just enough context (the stack of open element names and the
//! attribute currently being visited) to answer two questions for the
//! unmarshallers: *how deep am I?* and *does the current position match this
//! path at this depth?*
//!
//! Depth model:
//!
//! - `StartDocument` opens the document level, so the root element sits at
//!   depth 2 and its children at depth 3;
//! - every start tag opens one level and every end tag closes one;
//! - attribute events are reported right after their element's start tag and
//!   do not change the depth.

use std::collections::VecDeque;
use std::fmt;

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::error::XmlError;

/// A single parse event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlEvent {
    /// Beginning of the document. Always the first event.
    StartDocument,
    /// An opening tag, carrying the element's local name.
    StartElement(String),
    /// An attribute of the element that was just opened.
    Attribute {
        /// Local name of the attribute.
        name: String,
        /// Unescaped attribute value.
        value: String,
    },
    /// Character data.
    Characters(String),
    /// A closing tag, carrying the element's local name.
    EndElement(String),
    /// End of the input. Repeats if read again.
    EndDocument,
}

impl XmlEvent {
    /// Shorthand for a start tag.
    #[must_use]
    pub fn start(name: &str) -> Self {
        Self::StartElement(name.to_owned())
    }

    /// Shorthand for an end tag.
    #[must_use]
    pub fn end(name: &str) -> Self {
        Self::EndElement(name.to_owned())
    }

    /// Shorthand for character data.
    #[must_use]
    pub fn text(text: &str) -> Self {
        Self::Characters(text.to_owned())
    }

    /// Shorthand for an attribute.
    #[must_use]
    pub fn attribute(name: &str, value: &str) -> Self {
        Self::Attribute {
            name: name.to_owned(),
            value: value.to_owned(),
        }
    }
}

impl fmt::Display for XmlEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StartDocument => f.write_str("start of document"),
            Self::StartElement(name) => write!(f, "<{name}>"),
            Self::Attribute { name, .. } => write!(f, "attribute @{name}"),
            Self::Characters(_) => f.write_str("character data"),
            Self::EndElement(name) => write!(f, "</{name}>"),
            Self::EndDocument => f.write_str("end of document"),
        }
    }
}

/// Where events come from.
enum Source<'a> {
    /// A quick-xml reader over an in-memory document.
    Xml {
        reader: Reader<&'a [u8]>,
        started: bool,
        /// Attribute events waiting to be handed out after a start tag.
        pending: VecDeque<XmlEvent>,
    },
    /// A pre-built event sequence.
    Events(std::vec::IntoIter<XmlEvent>),
}

impl fmt::Debug for Source<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Xml { .. } => f.write_str("Source::Xml"),
            Self::Events(_) => f.write_str("Source::Events"),
        }
    }
}

impl Source<'_> {
    fn next_event(&mut self) -> Result<XmlEvent, XmlError> {
        match self {
            Self::Events(events) => Ok(events.next().unwrap_or(XmlEvent::EndDocument)),
            Self::Xml {
                reader,
                started,
                pending,
            } => {
                if !*started {
                    *started = true;
                    return Ok(XmlEvent::StartDocument);
                }
                if let Some(event) = pending.pop_front() {
                    return Ok(event);
                }
                read_xml_event(reader, pending)
            }
        }
    }
}

/// Pull the next meaningful event from quick-xml.
///
/// Declarations, comments, processing instructions and doctypes are skipped.
/// Entity references are folded into character data.
fn read_xml_event(
    reader: &mut Reader<&[u8]>,
    pending: &mut VecDeque<XmlEvent>,
) -> Result<XmlEvent, XmlError> {
    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                for attr in e.attributes() {
                    let attr = attr?;
                    let key = attr.key.as_ref();
                    if key == b"xmlns" || key.starts_with(b"xmlns:") {
                        continue;
                    }
                    let name = utf8(attr.key.local_name().as_ref())?.to_owned();
                    let raw = utf8(&attr.value)?;
                    let value = quick_xml::escape::unescape(raw)
                        .map_err(|err| XmlError::InvalidText(err.to_string()))?
                        .into_owned();
                    pending.push_back(XmlEvent::Attribute { name, value });
                }
                return Ok(XmlEvent::StartElement(
                    utf8(e.local_name().as_ref())?.to_owned(),
                ));
            }
            Event::End(e) => {
                return Ok(XmlEvent::EndElement(
                    utf8(e.local_name().as_ref())?.to_owned(),
                ));
            }
            Event::Text(e) => {
                let decoded = e
                    .decode()
                    .map_err(|err| XmlError::InvalidText(err.to_string()))?;
                let unescaped = quick_xml::escape::unescape(&decoded)
                    .map_err(|err| XmlError::InvalidText(err.to_string()))?;
                return Ok(XmlEvent::Characters(unescaped.into_owned()));
            }
            Event::CData(e) => {
                return Ok(XmlEvent::Characters(utf8(&e)?.to_owned()));
            }
            Event::GeneralRef(e) => {
                let name = e
                    .decode()
                    .map_err(|err| XmlError::InvalidText(err.to_string()))?;
                let entity = format!("&{name};");
                let resolved = quick_xml::escape::unescape(&entity)
                    .map_err(|err| XmlError::InvalidText(err.to_string()))?;
                return Ok(XmlEvent::Characters(resolved.into_owned()));
            }
            Event::Eof => return Ok(XmlEvent::EndDocument),
            _ => {}
        }
    }
}

fn utf8(bytes: &[u8]) -> Result<&str, XmlError> {
    std::str::from_utf8(bytes).map_err(|e| XmlError::InvalidText(e.to_string()))
}

/// Forward-only cursor over an XML event stream.
///
/// A cursor is exclusively borrowed by one unmarshall call chain at a time;
/// nested unmarshallers receive the same `&mut` and compute their own target
/// depth from [`StaxCursor::current_depth`] on entry.
#[derive(Debug)]
pub struct StaxCursor<'a> {
    source: Source<'a>,
    /// Events read from the source but not yet handed out.
    lookahead: VecDeque<XmlEvent>,
    current: Option<XmlEvent>,
    stack: Vec<String>,
    /// `@name` of the attribute event just returned, if any.
    attribute: Option<String>,
    document_open: bool,
}

impl<'a> StaxCursor<'a> {
    /// Create a cursor over an XML document.
    #[must_use]
    pub fn from_xml(xml: &'a [u8]) -> Self {
        let mut reader = Reader::from_reader(xml);
        let config = reader.config_mut();
        config.expand_empty_elements = true;
        // Unbalanced input is reported by the cursor's own stack; a document
        // that simply stops must still surface as end-of-document.
        config.check_end_names = false;

        Self::new(Source::Xml {
            reader,
            started: false,
            pending: VecDeque::new(),
        })
    }

    fn new(source: Source<'a>) -> Self {
        Self {
            source,
            lookahead: VecDeque::new(),
            current: None,
            stack: Vec::new(),
            attribute: None,
            document_open: false,
        }
    }
}

impl StaxCursor<'static> {
    /// Create a cursor over a pre-built event sequence.
    ///
    /// Reading past the last event yields [`XmlEvent::EndDocument`].
    #[must_use]
    pub fn from_events(events: impl IntoIterator<Item = XmlEvent>) -> Self {
        Self::new(Source::Events(
            events.into_iter().collect::<Vec<_>>().into_iter(),
        ))
    }
}

impl StaxCursor<'_> {
    /// Advance and return the next event, updating the depth context.
    pub fn next_event(&mut self) -> Result<XmlEvent, XmlError> {
        let event = match self.lookahead.pop_front() {
            Some(event) => event,
            None => self.source.next_event()?,
        };
        self.update_context(&event)?;
        self.current = Some(event.clone());
        Ok(event)
    }

    /// Look at the next event without consuming it.
    pub fn peek(&mut self) -> Result<&XmlEvent, XmlError> {
        if self.lookahead.is_empty() {
            let event = self.source.next_event()?;
            self.lookahead.push_back(event);
        }
        self.lookahead
            .front()
            .ok_or_else(|| XmlError::unexpected(&XmlEvent::EndDocument, "peeking"))
    }

    /// The most recently returned event.
    #[must_use]
    pub fn current_event(&self) -> Option<&XmlEvent> {
        self.current.as_ref()
    }

    /// Current nesting depth. The document node counts as one level.
    #[must_use]
    pub fn current_depth(&self) -> usize {
        self.stack.len() + usize::from(self.document_open)
    }

    /// Number of elements opened and not yet closed.
    #[must_use]
    pub fn open_elements(&self) -> usize {
        self.stack.len()
    }

    /// Whether the next event is the start of the document.
    pub fn is_start_of_document(&mut self) -> Result<bool, XmlError> {
        Ok(matches!(self.peek()?, XmlEvent::StartDocument))
    }

    /// Test whether the current position matches `expression` at
    /// `starting_depth`.
    ///
    /// `expression` is a `/`-separated path such as `UserName`,
    /// `Certificates/member` or `Name/@id`. It matches when it is a suffix of
    /// the open-element path (plus `@attr` on attribute events) and the
    /// current depth equals `starting_depth` plus one for every element
    /// segment after the first. `"."` always matches.
    #[must_use]
    pub fn test_expression(&self, expression: &str, starting_depth: usize) -> bool {
        if expression == "." {
            return true;
        }

        let expected_depth = starting_depth
            + expression
                .split('/')
                .skip(1)
                .filter(|segment| !segment.starts_with('@'))
                .count();
        if expected_depth != self.current_depth() {
            return false;
        }

        let segments: Vec<&str> = expression.split('/').collect();
        let path: Vec<&str> = self
            .stack
            .iter()
            .map(String::as_str)
            .chain(self.attribute.as_deref())
            .collect();
        path.ends_with(&segments)
    }

    /// Read the text of the element just opened, or the value of the
    /// attribute just visited.
    ///
    /// Character data is accumulated up to the element's end tag, which is
    /// left unconsumed so that the enclosing loop sees it and the depth stays
    /// balanced. Attributes of the element are set aside and handed out after
    /// the text, before the end tag. Any other event (a nested element, end of
    /// document) is an error.
    pub fn read_text(&mut self) -> Result<String, XmlError> {
        if let Some(XmlEvent::Attribute { value, .. }) = &self.current {
            return Ok(value.clone());
        }

        let mut text = String::new();
        let mut deferred = Vec::new();
        loop {
            match self.peek()? {
                XmlEvent::EndElement(_) => break,
                XmlEvent::Characters(_) | XmlEvent::Attribute { .. } => {}
                other => return Err(XmlError::unexpected(other, "reading text content")),
            }
            match self.lookahead.pop_front() {
                Some(XmlEvent::Characters(chunk)) => text.push_str(&chunk),
                Some(attribute) => deferred.push(attribute),
                None => {}
            }
        }

        for attribute in deferred.into_iter().rev() {
            self.lookahead.push_front(attribute);
        }
        Ok(text)
    }

    /// Skip forward to the next start tag named `name`.
    ///
    /// Returns `false` if the document ends first.
    pub fn advance_to_element(&mut self, name: &str) -> Result<bool, XmlError> {
        loop {
            match self.next_event()? {
                XmlEvent::StartElement(found) if found == name => return Ok(true),
                XmlEvent::EndDocument => return Ok(false),
                _ => {}
            }
        }
    }

    fn update_context(&mut self, event: &XmlEvent) -> Result<(), XmlError> {
        self.attribute = None;
        match event {
            XmlEvent::StartDocument => self.document_open = true,
            XmlEvent::EndDocument => self.document_open = false,
            XmlEvent::StartElement(name) => self.stack.push(name.clone()),
            XmlEvent::EndElement(name) => match self.stack.pop() {
                Some(open) if open == *name => {}
                Some(open) => {
                    return Err(XmlError::MismatchedEndTag {
                        expected: open,
                        found: name.clone(),
                    });
                }
                None => return Err(XmlError::unexpected(event, "no element is open")),
            },
            XmlEvent::Attribute { name, .. } => self.attribute = Some(format!("@{name}")),
            XmlEvent::Characters(_) => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(cursor: &mut StaxCursor<'_>) -> Vec<(XmlEvent, usize)> {
        let mut out = Vec::new();
        loop {
            let event = cursor.next_event().unwrap();
            let done = event == XmlEvent::EndDocument;
            out.push((event, cursor.current_depth()));
            if done {
                return out;
            }
        }
    }

    #[test]
    fn test_should_track_depth_with_document_level() {
        let mut cursor = StaxCursor::from_xml(b"<A><B>x</B></A>");
        let events = drain(&mut cursor);
        assert_eq!(
            events,
            vec![
                (XmlEvent::StartDocument, 1),
                (XmlEvent::start("A"), 2),
                (XmlEvent::start("B"), 3),
                (XmlEvent::text("x"), 3),
                (XmlEvent::end("B"), 2),
                (XmlEvent::end("A"), 1),
                (XmlEvent::EndDocument, 0),
            ]
        );
    }

    #[test]
    fn test_should_skip_declaration_and_comments() {
        let xml = br#"<?xml version="1.0" encoding="UTF-8"?><!-- c --><A/>"#;
        let mut cursor = StaxCursor::from_xml(xml);
        let events: Vec<XmlEvent> = drain(&mut cursor).into_iter().map(|(e, _)| e).collect();
        assert_eq!(
            events,
            vec![
                XmlEvent::StartDocument,
                XmlEvent::start("A"),
                XmlEvent::end("A"),
                XmlEvent::EndDocument,
            ]
        );
    }

    #[test]
    fn test_should_emit_attributes_after_start_tag() {
        let xml = br#"<A xmlns="urn:x" id="7" note="a &amp; b"><B/></A>"#;
        let mut cursor = StaxCursor::from_xml(xml);
        cursor.next_event().unwrap();
        assert_eq!(cursor.next_event().unwrap(), XmlEvent::start("A"));
        assert_eq!(cursor.next_event().unwrap(), XmlEvent::attribute("id", "7"));
        assert_eq!(cursor.current_depth(), 2);
        assert!(cursor.test_expression("A/@id", 2));
        assert_eq!(
            cursor.next_event().unwrap(),
            XmlEvent::attribute("note", "a & b")
        );
        assert_eq!(cursor.next_event().unwrap(), XmlEvent::start("B"));
    }

    #[test]
    fn test_should_match_expression_suffix_at_depth() {
        let mut cursor = StaxCursor::from_events([
            XmlEvent::StartDocument,
            XmlEvent::start("Result"),
            XmlEvent::start("Certificates"),
            XmlEvent::start("member"),
        ]);
        for _ in 0..4 {
            cursor.next_event().unwrap();
        }
        assert_eq!(cursor.current_depth(), 4);
        assert!(cursor.test_expression("member", 4));
        assert!(cursor.test_expression("Certificates/member", 3));
        assert!(!cursor.test_expression("Certificates/member", 4));
        assert!(!cursor.test_expression("Other/member", 3));
        assert!(cursor.test_expression(".", 99));
    }

    #[test]
    fn test_should_read_text_and_leave_end_tag() {
        let mut cursor = StaxCursor::from_xml(b"<A>one &lt; two<![CDATA[ & three]]></A>");
        cursor.next_event().unwrap();
        cursor.next_event().unwrap();
        assert_eq!(cursor.read_text().unwrap(), "one < two & three");
        assert_eq!(cursor.current_depth(), 2);
        assert_eq!(cursor.next_event().unwrap(), XmlEvent::end("A"));
    }

    #[test]
    fn test_should_resolve_entity_references_in_text() {
        let mut cursor =
            StaxCursor::from_xml(b"<A>a &amp; b &quot;c&quot; &#65;&#x42;</A>");
        cursor.next_event().unwrap();
        cursor.next_event().unwrap();
        assert_eq!(cursor.read_text().unwrap(), "a & b \"c\" AB");
        assert_eq!(cursor.next_event().unwrap(), XmlEvent::end("A"));
    }

    #[test]
    fn test_should_read_empty_element_as_empty_text() {
        let mut cursor = StaxCursor::from_xml(b"<A><B/></A>");
        cursor.next_event().unwrap();
        cursor.next_event().unwrap();
        cursor.next_event().unwrap();
        assert_eq!(cursor.read_text().unwrap(), "");
    }

    #[test]
    fn test_should_reject_nested_element_in_text() {
        let mut cursor = StaxCursor::from_xml(b"<A><B/></A>");
        cursor.next_event().unwrap();
        cursor.next_event().unwrap();
        let err = cursor.read_text().unwrap_err();
        assert!(matches!(err, XmlError::UnexpectedEvent(_)));
    }

    #[test]
    fn test_should_reject_mismatched_end_tag() {
        let mut cursor = StaxCursor::from_events([
            XmlEvent::StartDocument,
            XmlEvent::start("A"),
            XmlEvent::end("B"),
        ]);
        cursor.next_event().unwrap();
        cursor.next_event().unwrap();
        let err = cursor.next_event().unwrap_err();
        assert!(matches!(err, XmlError::MismatchedEndTag { .. }));
    }

    #[test]
    fn test_should_peek_without_consuming() {
        let mut cursor = StaxCursor::from_events([XmlEvent::StartDocument]);
        assert!(cursor.is_start_of_document().unwrap());
        assert_eq!(cursor.current_depth(), 0);
        assert_eq!(cursor.next_event().unwrap(), XmlEvent::StartDocument);
        assert!(!cursor.is_start_of_document().unwrap());
        assert_eq!(cursor.next_event().unwrap(), XmlEvent::EndDocument);
    }

    #[test]
    fn test_should_advance_to_named_element() {
        let mut cursor = StaxCursor::from_xml(b"<R><S><T>1</T></S></R>");
        assert!(cursor.advance_to_element("T").unwrap());
        assert_eq!(cursor.current_depth(), 4);
        assert!(!cursor.advance_to_element("Missing").unwrap());
    }
}
