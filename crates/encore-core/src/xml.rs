//! Minimal XML element tree used by the database document.
//!
//! Reading goes through the `quick-xml` event reader and collects a small
//! owned tree that the player, song and hiscore sections are decoded from.
//! Writing goes straight to a `quick-xml` [`Writer`].

use std::str::FromStr;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::reader::Reader;

use crate::error::{Error, Result};

/// A parsed XML element with its attributes, text content and children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Parse an attribute value, failing with [`Error::TypeMismatch`] if it
    /// is present but not of type `T`.
    pub fn parse_attr<T: FromStr>(&self, key: &str) -> Result<Option<T>> {
        match self.attr(key) {
            None => Ok(None),
            Some(raw) => raw.trim().parse().map(Some).map_err(|_| {
                Error::type_mismatch(format!(
                    "attribute '{}' of <{}> has unexpected value '{}'",
                    key, self.name, raw
                ))
            }),
        }
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |c| c.name == name)
    }
}

/// Parse a complete document and return its root element.
pub fn parse_document(content: &str) -> Result<Element> {
    let mut xml = Reader::from_str(content);
    xml.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match xml.read_event()? {
            Event::Start(ref e) => {
                if root.is_some() {
                    return Err(Error::malformed("content after root element"));
                }
                stack.push(element_from_start(e)?);
            }
            Event::Empty(ref e) => {
                let element = element_from_start(e)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(ref e) => {
                let text = e.unescape()?;
                match stack.last_mut() {
                    Some(current) => current.text.push_str(&text),
                    None => {
                        return Err(Error::malformed(format!(
                            "text outside of root element: '{}'",
                            text
                        )));
                    }
                }
            }
            Event::CData(ref e) => {
                let text = String::from_utf8_lossy(e).to_string();
                match stack.last_mut() {
                    Some(current) => current.text.push_str(&text),
                    None => return Err(Error::malformed("CDATA outside of root element")),
                }
            }
            Event::End(_) => {
                // quick-xml verifies that end names match their start tags
                let element = stack
                    .pop()
                    .ok_or_else(|| Error::malformed("unexpected closing tag"))?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(Error::malformed(format!("unclosed element <{}>", open.name)));
    }
    root.ok_or_else(|| Error::malformed("document has no root element"))
}

fn element_from_start(e: &BytesStart<'_>) -> Result<Element> {
    let mut element = Element::new(String::from_utf8_lossy(e.name().as_ref()).to_string());
    for attr in e.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        let value = attr.unescape_value()?.to_string();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(Error::malformed("more than one root element")),
    }
    Ok(())
}

/// Writer used for serializing the database document.
pub type XmlWriter = Writer<Vec<u8>>;

pub fn new_writer() -> XmlWriter {
    Writer::new_with_indent(Vec::new(), b' ', 2)
}

pub fn write_declaration(xml: &mut XmlWriter) -> Result<()> {
    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    Ok(())
}

pub fn write_start(xml: &mut XmlWriter, name: &str, attributes: &[(&str, &str)]) -> Result<()> {
    let mut start = BytesStart::new(name);
    for &attr in attributes {
        start.push_attribute(attr);
    }
    xml.write_event(Event::Start(start))?;
    Ok(())
}

pub fn write_end(xml: &mut XmlWriter, name: &str) -> Result<()> {
    xml.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

pub fn write_empty(xml: &mut XmlWriter, name: &str, attributes: &[(&str, &str)]) -> Result<()> {
    let mut start = BytesStart::new(name);
    for &attr in attributes {
        start.push_attribute(attr);
    }
    xml.write_event(Event::Empty(start))?;
    Ok(())
}

/// Write `<name attrs>text</name>`.
pub fn write_text_element(
    xml: &mut XmlWriter,
    name: &str,
    attributes: &[(&str, &str)],
    text: &str,
) -> Result<()> {
    write_start(xml, name, attributes)?;
    xml.write_event(Event::Text(BytesText::new(text)))?;
    write_end(xml, name)
}
