//! Event-driven construction of a [`Document`] from quick-xml events

use super::{Document, Element, Misc, Node, Position};
use crate::error::{XmlError, XmlResult};
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Byte offsets of line starts, for turning reader offsets into positions
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(source: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { starts }
    }

    fn locate(&self, offset: usize) -> Position {
        let line = self.starts.partition_point(|&start| start <= offset);
        let line_start = self.starts[line.saturating_sub(1)];
        Position::new(line.max(1), offset - line_start + 1)
    }
}

/// Where completed nodes go while the tree is being built
struct Builder {
    stack: Vec<Element>,
    root: Option<Element>,
    prolog: Vec<Misc>,
    epilog: Vec<Misc>,
}

impl Builder {
    fn misc(&mut self, misc: Misc) {
        if self.root.is_some() {
            self.epilog.push(misc);
        } else {
            self.prolog.push(misc);
        }
    }

    fn node(&mut self, node: Node) -> XmlResult<()> {
        if let Some(parent) = self.stack.last_mut() {
            parent.push(node);
            return Ok(());
        }
        match node {
            Node::Element(el) => {
                if self.root.is_some() {
                    return Err(XmlError::structure(format!(
                        "line {}: extra content at the end of the document (<{}>)",
                        el.line(),
                        el.name()
                    )));
                }
                self.root = Some(el);
            }
            Node::Text(text) => {
                if !text.trim().is_empty() {
                    return Err(XmlError::structure(
                        "text content outside the root element",
                    ));
                }
                self.misc(Misc::Whitespace(text));
            }
            Node::CData(_) => {
                return Err(XmlError::structure("CDATA section outside the root element"));
            }
            Node::Comment(body) => self.misc(Misc::Comment(body)),
            Node::ProcessingInstruction(body) => self.misc(Misc::ProcessingInstruction(body)),
        }
        Ok(())
    }
}

fn utf8(bytes: &[u8]) -> XmlResult<String> {
    Ok(std::str::from_utf8(bytes)?.to_string())
}

/// Escaped character data; only the predefined entities and character
/// references may appear
fn escaped(bytes: &[u8], position: Position) -> XmlResult<String> {
    let raw = utf8(bytes)?;
    unescape(&raw)
        .map_err(|e| XmlError::syntax_error(position.line, position.column, e.to_string()))?;
    Ok(raw)
}

fn start_element(start: &BytesStart<'_>, position: Position) -> XmlResult<Element> {
    let mut el = Element::from_source(utf8(start.name().as_ref())?, position);
    for attr in start.attributes() {
        let attr = attr.map_err(|e| {
            XmlError::syntax_error(position.line, position.column, e.to_string())
        })?;
        let name = utf8(attr.key.as_ref())?;
        if attr.value.contains(&b'<') {
            return Err(XmlError::syntax_error(
                position.line,
                position.column,
                format!("'<' not allowed in the value of attribute '{name}'"),
            ));
        }
        let value = escaped(&attr.value, position)?;
        el.insert_raw_attribute(name, value);
    }
    Ok(el)
}

/// Offset of the `<` that opened the event read from `offset`
fn tag_start(source: &str, offset: usize) -> usize {
    let bytes = source.as_bytes();
    if bytes.get(offset) == Some(&b'<') {
        offset
    } else if offset > 0 && bytes.get(offset - 1) == Some(&b'<') {
        offset - 1
    } else {
        source[offset..].find('<').map_or(offset, |i| offset + i)
    }
}

pub(super) fn parse_document(source: &str) -> XmlResult<Document> {
    let (bom, source) = match source.strip_prefix('\u{feff}') {
        Some(rest) => (true, rest),
        None => (false, source),
    };
    let lines = LineIndex::new(source);
    let mut reader = Reader::from_str(source);
    let mut declaration = None;
    let mut builder = Builder {
        stack: Vec::new(),
        root: None,
        prolog: Vec::new(),
        epilog: Vec::new(),
    };

    loop {
        let offset = reader.buffer_position();
        let event = reader.read_event().map_err(|e| {
            let position = lines.locate(reader.buffer_position());
            XmlError::syntax_error(position.line, position.column, e.to_string())
        })?;
        match event {
            Event::Start(start) => {
                let position = lines.locate(tag_start(source, offset));
                builder.stack.push(start_element(&start, position)?);
            }
            Event::Empty(start) => {
                let position = lines.locate(tag_start(source, offset));
                let mut el = start_element(&start, position)?;
                el.set_self_closing(true);
                builder.node(Node::Element(el))?;
            }
            Event::End(end) => {
                let el = builder.stack.pop().ok_or_else(|| {
                    let position = lines.locate(offset);
                    XmlError::syntax_error(
                        position.line,
                        position.column,
                        format!(
                            "unexpected end tag </{}>",
                            String::from_utf8_lossy(end.name().as_ref())
                        ),
                    )
                })?;
                builder.node(Node::Element(el))?;
            }
            Event::Text(text) => {
                let text = escaped(&text, lines.locate(offset))?;
                builder.node(Node::Text(text))?;
            }
            Event::CData(cdata) => builder.node(Node::CData(utf8(&cdata)?))?,
            Event::Comment(comment) => builder.node(Node::Comment(utf8(&comment)?))?,
            Event::PI(pi) => builder.node(Node::ProcessingInstruction(utf8(&pi)?))?,
            Event::Decl(decl) => {
                if builder.root.is_some() || !builder.stack.is_empty() {
                    let position = lines.locate(offset);
                    return Err(XmlError::syntax_error(
                        position.line,
                        position.column,
                        "XML declaration allowed only at the start of the document",
                    ));
                }
                declaration = Some(utf8(&decl)?);
            }
            Event::DocType(doctype) => builder.misc(Misc::DocType(utf8(&doctype)?)),
            Event::Eof => break,
        }
    }

    if let Some(open) = builder.stack.last() {
        return Err(XmlError::syntax_error(
            open.line(),
            open.position().column,
            format!("premature end of data: <{}> is not closed", open.name()),
        ));
    }
    let root = builder
        .root
        .ok_or_else(|| XmlError::structure("document is empty: no root element"))?;

    Ok(Document {
        bom,
        declaration,
        prolog: builder.prolog,
        root,
        epilog: builder.epilog,
    })
}
