//! Minimal element tree over `quick_xml`'s event stream.
//!
//! Legacy templates are stored in the ISO-8859-2 codepage, so raw bytes go
//! through [`decode`] before parsing. The extractors only navigate
//! downward (child lookup, attributes, leading text), so the tree carries
//! exactly that and nothing more.

use std::collections::HashMap;

use encoding_rs::ISO_8859_2;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::ConvertError;

/// Decode raw template bytes from the fixed legacy codepage.
pub fn decode(bytes: &[u8]) -> Result<String, ConvertError> {
    let (text, _, had_errors) = ISO_8859_2.decode(bytes);
    if had_errors {
        return Err(ConvertError::Decode);
    }
    Ok(text.into_owned())
}

/// One parsed element: name, attributes, leading text, child elements.
///
/// `text` collects character data appearing before the first child
/// element, which is where the legacy format keeps lookup queries and SQL
/// bodies.
#[derive(Debug, Clone, Default)]
pub struct Element {
    pub name: String,
    pub attrs: HashMap<String, String>,
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    /// First direct child with the given element name.
    pub fn find(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All direct children with the given element name, in document order.
    pub fn find_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Like [`Element::find`], but a missing child is a structural fault.
    pub fn require(&self, name: &str) -> Result<&Element, ConvertError> {
        self.find(name).ok_or_else(|| ConvertError::MissingElement {
            element: name.to_string(),
        })
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Like [`Element::attr`], but a missing attribute is a structural
    /// fault reported against this element (by its `name` attribute when
    /// it carries one).
    pub fn require_attr(&self, name: &str) -> Result<&str, ConvertError> {
        self.attr(name).ok_or_else(|| ConvertError::MissingAttribute {
            field: self.attr("name").unwrap_or(&self.name).to_string(),
            attribute: name.to_string(),
        })
    }

    /// Leading text, or `None` when the element carries none.
    pub fn text_opt(&self) -> Option<&str> {
        if self.text.is_empty() {
            None
        } else {
            Some(self.text.as_str())
        }
    }
}

/// Parse decoded template text into an element tree.
pub fn parse(text: &str) -> Result<Element, ConvertError> {
    let mut reader = Reader::from_str(text);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                stack.push(element_from_start(&reader, &start)?);
            }
            Ok(Event::Empty(start)) => {
                let element = element_from_start(&reader, &start)?;
                attach(&mut stack, &mut root, element);
            }
            Ok(Event::End(_)) => {
                if let Some(element) = stack.pop() {
                    attach(&mut stack, &mut root, element);
                }
            }
            Ok(Event::Text(t)) => {
                let value = t.unescape().map_err(|e| parse_error(&reader, e))?;
                append_text(&mut stack, &value);
            }
            Ok(Event::CData(data)) => {
                append_text(&mut stack, &String::from_utf8_lossy(&data));
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(parse_error(&reader, e)),
        }
    }

    root.ok_or_else(|| ConvertError::MissingElement {
        element: "document root".to_string(),
    })
}

fn element_from_start(
    reader: &Reader<&[u8]>,
    start: &BytesStart,
) -> Result<Element, ConvertError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();

    let mut attrs = HashMap::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| ConvertError::Parse {
            position: reader.buffer_position() as u64,
            message: e.to_string(),
        })?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| parse_error(reader, e))?
            .into_owned();
        attrs.insert(key, value);
    }

    Ok(Element {
        name,
        attrs,
        text: String::new(),
        children: Vec::new(),
    })
}

fn attach(stack: &mut Vec<Element>, root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}

/// Only text before the first child element belongs to the element itself;
/// anything after a child is inter-element whitespace in this format.
fn append_text(stack: &mut Vec<Element>, value: &str) {
    if let Some(top) = stack.last_mut() {
        if top.children.is_empty() {
            top.text.push_str(value);
        }
    }
}

fn parse_error(reader: &Reader<&[u8]>, err: quick_xml::Error) -> ConvertError {
    ConvertError::Parse {
        position: reader.buffer_position() as u64,
        message: err.to_string(),
    }
}
