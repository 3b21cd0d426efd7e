//! Generic XML element tree
//!
//! The serializer builds an explicit [`Element`] tree value and hands it to a
//! pure emitter; the deserializer parses a document into the same tree and
//! walks it. Keeping the tree as a plain value (rather than streaming builder
//! calls) makes the pretty-printer and the emitter independently testable.
//!
//! Namespace prefixes are stripped to local names on parse; the material
//! dialect uses a single default namespace, declared as a plain attribute on
//! emission.

use crate::error::{Error, Result};
use quick_xml::Reader;
use quick_xml::events::Event;

/// A single XML element with attributes, text content and child elements
///
/// `text` is the character data directly after the start tag; `tail` is the
/// character data following the end tag, inside the parent. The pretty-printer
/// works by rewriting these two fields, mirroring how ElementTree-style
/// indenters operate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    /// Local tag name (namespace prefix stripped)
    pub name: String,
    /// Attributes in document order
    pub attributes: Vec<(String, String)>,
    /// Character data immediately inside the start tag
    pub text: Option<String>,
    /// Character data following this element's end tag
    pub tail: Option<String>,
    /// Child elements in document order
    pub children: Vec<Element>,
}

impl Element {
    /// Create an empty element
    pub fn new(name: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Create an element with text content
    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// Add an attribute, builder style
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Append a child element
    pub fn push(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Get an attribute value by name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Find the first direct child with the given local name
    pub fn find(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Iterate over all direct children with the given local name
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Text content of this element, empty if none
    pub fn text_content(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// Parse an XML document into an element tree
    ///
    /// Fails with [`Error::Xml`] on malformed input and [`Error::InvalidXml`]
    /// when the document contains no root element.
    pub fn parse(xml: &str) -> Result<Element> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => {
                    stack.push(element_from_start(e)?);
                }
                Ok(Event::Empty(ref e)) => {
                    let element = element_from_start(e)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Ok(Event::Text(ref t)) => {
                    let value = t
                        .unescape()
                        .map_err(|e| Error::InvalidXml(e.to_string()))?
                        .into_owned();
                    if let Some(current) = stack.last_mut() {
                        if current.children.is_empty() && current.text.is_none() {
                            current.text = Some(value);
                        } else if let Some(last) = current.children.last_mut() {
                            last.tail = Some(value);
                        }
                    }
                }
                Ok(Event::End(_)) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| Error::InvalidXml("unbalanced end tag".to_string()))?;
                    attach(&mut stack, &mut root, element)?;
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::Xml(e)),
                Ok(_) => {}
            }
        }

        if !stack.is_empty() {
            return Err(Error::InvalidXml("unclosed element at end of document".to_string()));
        }

        root.ok_or_else(|| Error::InvalidXml("document has no root element".to_string()))
    }

    /// Emit this tree as an XML document with declaration
    pub fn to_xml_string(&self) -> String {
        let mut out = String::new();
        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        write_element(self, &mut out);
        out
    }
}

fn element_from_start(e: &quick_xml::events::BytesStart) -> Result<Element> {
    let name = local_name(e.name().as_ref())?;
    let mut element = Element::new(name);

    for attr in e.attributes() {
        let attr = attr.map_err(|e| Error::InvalidXml(e.to_string()))?;
        let key = local_name(attr.key.as_ref())?;
        let value = attr
            .unescape_value()
            .map_err(|e| Error::InvalidXml(e.to_string()))?
            .into_owned();
        element.attributes.push((key, value));
    }

    Ok(element)
}

fn attach(stack: &mut Vec<Element>, root: &mut Option<Element>, element: Element) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => {
            if root.is_some() {
                return Err(Error::InvalidXml(
                    "multiple root elements in document".to_string(),
                ));
            }
            *root = Some(element);
        }
    }
    Ok(())
}

/// Strip any namespace prefix, keeping the local name
fn local_name(raw: &[u8]) -> Result<String> {
    let name = std::str::from_utf8(raw).map_err(|e| Error::InvalidXml(e.to_string()))?;
    Ok(name.rsplit(':').next().unwrap_or(name).to_string())
}

/// Normalize whitespace so nested elements print one per line, two-space indented
///
/// Rewrites `text` and `tail` fields in place: a parent's leading text becomes
/// a newline plus child-level indentation, each child's tail lines it up with
/// its siblings, and the last child's tail dedents back to the parent's
/// closing tag. Existing non-whitespace text is left alone. Purely cosmetic;
/// round-trip semantics do not depend on it.
pub fn indent(element: &mut Element, depth: usize) {
    let pad = format!("\n{}", "  ".repeat(depth));
    if !element.children.is_empty() {
        if is_blank(&element.text) {
            element.text = Some(format!("{}  ", pad));
        }
        if is_blank(&element.tail) {
            element.tail = Some(pad.clone());
        }
        for child in &mut element.children {
            indent(child, depth + 1);
        }
        if let Some(last) = element.children.last_mut() {
            if is_blank(&last.tail) {
                last.tail = Some(pad);
            }
        }
    } else if depth > 0 && is_blank(&element.tail) {
        element.tail = Some(pad);
    }
}

fn is_blank(value: &Option<String>) -> bool {
    match value {
        Some(s) => s.trim().is_empty(),
        None => true,
    }
}

fn write_element(element: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&element.name);
    for (name, value) in &element.attributes {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape_xml(value));
        out.push('"');
    }

    if element.children.is_empty() && element.text.is_none() {
        out.push_str("/>");
    } else {
        out.push('>');
        if let Some(ref text) = element.text {
            out.push_str(&escape_xml(text));
        }
        for child in &element.children {
            write_element(child, out);
        }
        out.push_str("</");
        out.push_str(&element.name);
        out.push('>');
    }

    if let Some(ref tail) = element.tail {
        out.push_str(tail);
    }
}

/// Escape special XML characters in text and attribute content
fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
