//! XML decoder and encoder.
//!
//! XML does not fit the key/value model: it has attributes, repeated sibling
//! tags and mixed content. The mapping used here is deliberately partial and
//! asymmetric.
//!
//! **Decoding** (`element → Value`):
//! - an element with child elements becomes `{tag: {child_tag: child_content, ...}}`
//! - an element without child elements becomes `{tag: text}`, or `{tag: null}`
//!   when it has no text
//! - same-tagged siblings collapse onto one key and the last one wins, so
//!   `<r><i>a</i><i>b</i></r>` decodes to `{r: {i: "b"}}`
//! - attributes, comments, processing instructions and the declaration are
//!   dropped
//!
//! **Encoding** (`Value → element`) requires a mapping with exactly one key
//! (the root tag). Nested mappings become child elements, scalars become
//! leaf text, `null` becomes an empty element. Sequences cannot be expressed
//! and are rejected.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::{ConvertError, Result};
use crate::format::Format;
use crate::value::{Mapping, Value};

/// An XML element as seen by the converter: a tag and its ordered children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub children: Vec<Node>,
}

/// A child of an [`Element`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Element {
            tag: tag.into(),
            children: Vec::new(),
        }
    }

    /// Child elements in document order, skipping text.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// Concatenation of this element's direct text children.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Text(t) => Some(t.as_str()),
                Node::Element(_) => None,
            })
            .collect()
    }

    fn push_text(&mut self, text: &str) {
        if let Some(Node::Text(last)) = self.children.last_mut() {
            last.push_str(text);
        } else {
            self.children.push(Node::Text(text.to_string()));
        }
    }
}

/// Parse XML text and map its root element to a [`Value`].
pub fn decode(text: &str) -> Result<Value> {
    let root = parse_element(text)?;
    Ok(element_to_value(&root))
}

/// Serialize a single-root [`Value`] as an XML document.
pub fn encode(value: &Value) -> Result<String> {
    let root = value_to_element(value)?;
    write_document(&root)
}

// ─────────────────────────────────────────────────────────────────────────────
// Parsing
// ─────────────────────────────────────────────────────────────────────────────

/// Parse XML text into its root [`Element`].
///
/// Fails on mismatched or unclosed tags, a second root element, text outside
/// the root, or a document with no element at all.
pub fn parse_element(text: &str) -> Result<Element> {
    let mut reader = Reader::from_str(text);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| parse_error(&reader, e))?;
        match event {
            Event::Start(start) => {
                stack.push(Element::new(start_tag(&reader, &start)?));
            }
            Event::Empty(start) => {
                let element = Element::new(start_tag(&reader, &start)?);
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack.pop().ok_or_else(|| {
                    ConvertError::parse(Format::Xml, "closing tag without a matching opening tag")
                })?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(t) => {
                let text = t.unescape().map_err(|e| parse_error(&reader, e))?;
                push_text(&mut stack, &text)?;
            }
            Event::CData(c) => {
                let bytes = c.into_inner();
                let text = std::str::from_utf8(&bytes)
                    .map_err(|e| ConvertError::parse(Format::Xml, e))?;
                push_text(&mut stack, text)?;
            }
            Event::Eof => break,
            // Declaration, comments, processing instructions and DOCTYPE.
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(ConvertError::parse(
            Format::Xml,
            format!("unexpected end of document: <{}> is not closed", open.tag),
        ));
    }
    root.ok_or_else(|| ConvertError::parse(Format::Xml, "document has no root element"))
}

fn parse_error(reader: &Reader<&[u8]>, err: impl std::fmt::Display) -> ConvertError {
    ConvertError::parse(
        Format::Xml,
        format!("{err} (at byte {})", reader.buffer_position()),
    )
}

fn start_tag(reader: &Reader<&[u8]>, start: &BytesStart<'_>) -> Result<String> {
    let tag = std::str::from_utf8(start.name().as_ref())
        .map_err(|e| parse_error(reader, e))?
        .to_string();
    let dropped = start.attributes().count();
    if dropped > 0 {
        tracing::warn!(tag = %tag, count = dropped, "dropping XML attributes");
    }
    Ok(tag)
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(Node::Element(element));
        return Ok(());
    }
    if root.is_some() {
        return Err(ConvertError::parse(
            Format::Xml,
            format!("multiple root elements: found a second root <{}>", element.tag),
        ));
    }
    *root = Some(element);
    Ok(())
}

fn push_text(stack: &mut [Element], text: &str) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.push_text(text),
        None if text.trim().is_empty() => {}
        None => {
            return Err(ConvertError::parse(
                Format::Xml,
                "text content outside the root element",
            ))
        }
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Element → Value
// ─────────────────────────────────────────────────────────────────────────────

/// Map an element to a single-key mapping `{tag: content}`.
pub fn element_to_value(element: &Element) -> Value {
    let mut map = Mapping::with_capacity(1);
    map.insert(element.tag.clone(), element_content(element));
    Value::Mapping(map)
}

fn element_content(element: &Element) -> Value {
    let mut children = element.child_elements().peekable();
    if children.peek().is_none() {
        let text = element.text();
        return if text.is_empty() {
            Value::Null
        } else {
            Value::string(text)
        };
    }

    let mut map = Mapping::new();
    for child in children {
        let content = element_content(child);
        // Last sibling wins; the key keeps the first sibling's position.
        if map.insert(child.tag.clone(), content).is_some() {
            tracing::warn!(
                parent = %element.tag,
                tag = %child.tag,
                "repeated sibling tag collapsed; earlier content discarded"
            );
        }
    }
    Value::Mapping(map)
}

// ─────────────────────────────────────────────────────────────────────────────
// Value → Element
// ─────────────────────────────────────────────────────────────────────────────

/// Rebuild an element tree from a mapping with exactly one top-level key.
pub fn value_to_element(value: &Value) -> Result<Element> {
    match value {
        Value::Mapping(map) if map.len() == 1 => {
            let (tag, content) = map
                .first()
                .ok_or_else(|| single_root_error(value))?;
            build_element(tag, content)
        }
        other => Err(single_root_error(other)),
    }
}

fn single_root_error(value: &Value) -> ConvertError {
    let found = match value {
        Value::Mapping(map) => format!("a mapping with {} top-level keys", map.len()),
        other => format!("a top-level {}", other.kind()),
    };
    ConvertError::Structure(format!("XML requires a single root element, found {found}"))
}

fn build_element(tag: &str, value: &Value) -> Result<Element> {
    if !is_valid_name(tag) {
        return Err(ConvertError::Structure(format!(
            "'{tag}' is not a valid XML element name"
        )));
    }
    let mut element = Element::new(tag);
    match value {
        Value::Mapping(map) => {
            for (key, sub) in map {
                element.children.push(Node::Element(build_element(key, sub)?));
            }
        }
        Value::Sequence(_) => {
            return Err(ConvertError::Structure(format!(
                "XML encoding of list-valued content is unsupported (under <{tag}>)"
            )));
        }
        Value::Scalar(scalar) => {
            let text = scalar.to_text();
            if let Some(c) = text.chars().find(|&c| !is_xml_char(c)) {
                return Err(ConvertError::encode(
                    Format::Xml,
                    format!(
                        "character U+{:04X} under <{tag}> is not allowed in XML 1.0",
                        c as u32
                    ),
                ));
            }
            if !text.is_empty() {
                element.children.push(Node::Text(text));
            }
        }
        Value::Null => {}
    }
    Ok(element)
}

/// XML 1.0 `Char` production: tab, newline, carriage return and everything
/// from U+0020 up, except U+FFFE and U+FFFF.
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r') || (c >= '\u{20}' && !matches!(c, '\u{FFFE}' | '\u{FFFF}'))
}

/// XML element names: a letter or `_`, then letters, digits, `-`, `_` or `.`.
/// Colons are refused since namespaces are not modelled.
fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

// ─────────────────────────────────────────────────────────────────────────────
// Writing
// ─────────────────────────────────────────────────────────────────────────────

fn write_document(root: &Element) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(write_error)?;
    write_element(&mut writer, root)?;
    let mut out = String::from_utf8(writer.into_inner()).map_err(write_error)?;
    out.push('\n');
    Ok(out)
}

fn write_error(err: impl std::fmt::Display) -> ConvertError {
    ConvertError::encode(Format::Xml, err)
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<()> {
    if element.children.is_empty() {
        return writer
            .write_event(Event::Empty(BytesStart::new(element.tag.as_str())))
            .map_err(write_error);
    }
    writer
        .write_event(Event::Start(BytesStart::new(element.tag.as_str())))
        .map_err(write_error)?;
    for child in &element.children {
        match child {
            Node::Element(e) => write_element(writer, e)?,
            Node::Text(t) => writer
                .write_event(Event::Text(BytesText::new(t)))
                .map_err(write_error)?,
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.tag.as_str())))
        .map_err(write_error)
}
