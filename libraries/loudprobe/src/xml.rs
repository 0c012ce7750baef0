//! Minimal element tree for tool output
//!
//! Only names, attributes and nesting are kept; text content, comments and
//! processing instructions are dropped. That is all bs1770gain's report
//! needs, and keeps lookups a plain walk over owned data.

use crate::error::{ProbeError, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// One XML element with its attributes and child elements in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// First child element called `name`
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == name)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Parse a whole document and return its root element
///
/// # Errors
/// Fails with [`ProbeError::ParseLoudness`] for anything that is not a
/// single well-formed element tree.
pub(crate) fn parse_document(text: &str) -> Result<Element> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut open: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            ProbeError::ParseLoudness(format!("at byte {}: {}", reader.buffer_position(), e))
        })?;

        match event {
            Event::Start(start) => open.push(element_from(&start)?),
            Event::Empty(start) => attach(&mut open, &mut root, element_from(&start)?)?,
            Event::End(_) => {
                let element = open
                    .pop()
                    .ok_or_else(|| ProbeError::ParseLoudness("unmatched closing tag".to_string()))?;
                attach(&mut open, &mut root, element)?;
            }
            Event::Text(_) | Event::CData(_) if open.is_empty() => {
                return Err(ProbeError::ParseLoudness(
                    "text outside of the root element".to_string(),
                ));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(unclosed) = open.last() {
        return Err(ProbeError::ParseLoudness(format!(
            "unclosed element <{}>",
            unclosed.name
        )));
    }

    root.ok_or_else(|| ProbeError::ParseLoudness("document is empty".to_string()))
}

fn element_from(start: &BytesStart<'_>) -> Result<Element> {
    let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()));

    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| ProbeError::ParseLoudness(e.to_string()))?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute
            .unescape_value()
            .map_err(|e| ProbeError::ParseLoudness(e.to_string()))?
            .into_owned();
        element.attributes.push((key, value));
    }

    Ok(element)
}

fn attach(open: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
    if let Some(parent) = open.last_mut() {
        parent.children.push(element);
        return Ok(());
    }

    if root.is_some() {
        return Err(ProbeError::ParseLoudness(format!(
            "second root element <{}>",
            element.name
        )));
    }

    *root = Some(element);
    Ok(())
}
