//! XML reader and writer for element trees.
//!
//! The document shape is open (any tags, any nesting), so reading walks
//! quick-xml events with an explicit element stack instead of deriving
//! serde structures. Direct text runs are trimmed and concatenated into the
//! element's single text value; comments, processing instructions and the
//! XML declaration are skipped.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::{DocDiffError, ParseErrorKind, Result};
use crate::model::Element;

/// Parse a complete XML document into an element tree.
pub fn parse_document_str(content: &str) -> Result<Element> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            DocDiffError::parse(
                format!("at byte {}", reader.buffer_position()),
                ParseErrorKind::InvalidXml(e.to_string()),
            )
        })?;

        match event {
            Event::Start(start) => {
                if root.is_some() && stack.is_empty() {
                    return Err(DocDiffError::parse(
                        "reading document",
                        ParseErrorKind::TrailingContent,
                    ));
                }
                stack.push(element_from_start(&start)?);
            }
            Event::Empty(start) => {
                let el = element_from_start(&start)?;
                close_element(&mut stack, &mut root, el)?;
            }
            Event::End(_) => {
                let el = stack.pop().ok_or_else(|| {
                    DocDiffError::parse(
                        format!("at byte {}", reader.buffer_position()),
                        ParseErrorKind::InvalidXml("closing tag without an open element".into()),
                    )
                })?;
                close_element(&mut stack, &mut root, el)?;
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(|e| {
                    DocDiffError::parse(
                        format!("at byte {}", reader.buffer_position()),
                        ParseErrorKind::InvalidXml(e.to_string()),
                    )
                })?;
                append_text(&mut stack, &text);
            }
            Event::CData(data) => {
                let text = String::from_utf8_lossy(data.as_ref()).into_owned();
                append_text(&mut stack, &text);
            }
            Event::Eof => break,
            // Declaration, comments, doctype and processing instructions
            // carry no document state.
            _ => {}
        }
    }

    if let Some(open) = stack.pop() {
        return Err(DocDiffError::parse(
            "reading document",
            ParseErrorKind::UnexpectedEof { open: open.tag },
        ));
    }
    root.ok_or_else(|| DocDiffError::parse("reading document", ParseErrorKind::MissingRoot))
}

fn element_from_start(start: &BytesStart<'_>) -> Result<Element> {
    let tag = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut el = Element::new(tag);
    for attr in start.attributes() {
        let attr = attr.map_err(|e| {
            DocDiffError::parse(
                format!("attributes of <{}>", el.tag),
                ParseErrorKind::InvalidXml(e.to_string()),
            )
        })?;
        let name = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| {
                DocDiffError::parse(
                    format!("attribute '{name}' of <{}>", el.tag),
                    ParseErrorKind::InvalidXml(e.to_string()),
                )
            })?
            .into_owned();
        el.attrs.insert(name, value);
    }
    Ok(el)
}

/// Attach a completed element to its parent, or install it as the root.
fn close_element(stack: &mut Vec<Element>, root: &mut Option<Element>, el: Element) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(el);
            Ok(())
        }
        None => {
            if root.is_some() {
                return Err(DocDiffError::parse(
                    "reading document",
                    ParseErrorKind::TrailingContent,
                ));
            }
            *root = Some(el);
            Ok(())
        }
    }
}

fn append_text(stack: &mut [Element], text: &str) {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return;
    }
    // Text outside any element is not document state; skip it.
    if let Some(current) = stack.last_mut() {
        match &mut current.text {
            Some(existing) => existing.push_str(trimmed),
            None => current.text = Some(trimmed.to_string()),
        }
    }
}

/// Serialize a tree as a complete document with an XML declaration.
pub fn serialize_document(root: &Element, indent: Option<usize>) -> Result<String> {
    serialize(root, indent, true)
}

/// Serialize a tree without the XML declaration.
pub fn serialize_element(root: &Element, indent: Option<usize>) -> Result<String> {
    serialize(root, indent, false)
}

fn serialize(root: &Element, indent: Option<usize>, declaration: bool) -> Result<String> {
    let mut buf: Vec<u8> = Vec::new();
    {
        let mut writer = match indent {
            Some(width) => Writer::new_with_indent(&mut buf, b' ', width),
            None => Writer::new(&mut buf),
        };
        if declaration {
            writer
                .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
                .map_err(write_failure)?;
        }
        write_element(&mut writer, root)?;
    }
    let mut out = String::from_utf8(buf).map_err(|e| {
        DocDiffError::parse(
            "serialized output",
            ParseErrorKind::InvalidXml(e.to_string()),
        )
    })?;
    out.push('\n');
    Ok(out)
}

fn write_element<W: std::io::Write>(writer: &mut Writer<W>, el: &Element) -> Result<()> {
    let mut start = BytesStart::new(el.tag.as_str());
    for (name, value) in &el.attrs {
        start.push_attribute((name.as_str(), value.as_str()));
    }

    if el.children.is_empty() && el.text.is_none() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(write_failure);
    }

    writer
        .write_event(Event::Start(start))
        .map_err(write_failure)?;
    if let Some(text) = &el.text {
        writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(write_failure)?;
    }
    for child in &el.children {
        write_element(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(el.tag.as_str())))
        .map_err(write_failure)
}

fn write_failure(e: impl std::fmt::Display) -> DocDiffError {
    DocDiffError::Io {
        path: None,
        message: format!("writing XML: {e}"),
        source: std::io::Error::new(std::io::ErrorKind::Other, e.to_string()),
    }
}
