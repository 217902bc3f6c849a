//! Mutable XML document tree
//!
//! Provides an owned tree that can be edited in place and written back:
//! - [`Document`]: declaration, prolog/epilog misc nodes and one root [`Element`]
//! - [`Element`]: qualified name, ordered attributes, child [`Node`]s and the
//!   [`Position`] of its start tag
//! - [`ElementPath`]: child-element indices used to re-address an element
//!   after it was located through a shared borrow
//!
//! Text and attribute values are kept in their escaped source form. Untouched
//! content therefore serializes exactly as it was read; accessors unescape on
//! demand and setters escape on write.
//!
//! Lookups go by local name, so `ead:did` and `did` both answer to `"did"`.

mod parse;
mod write;

use crate::error::{XmlError, XmlResult};
use indexmap::IndexMap;
use quick_xml::escape::{escape, partial_escape, unescape};
use std::borrow::Cow;
use std::fmt::{self, Display, Formatter};
use std::path::Path;
use std::str::FromStr;

/// 1-based line and column of a start tag in the source text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// Line number, starting at 1
    pub line: usize,
    /// Byte column within the line, starting at 1
    pub column: usize,
}

impl Position {
    /// Create a position
    #[inline]
    #[must_use]
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A child of an element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Nested element
    Element(Element),
    /// Character data, escaped as in the source
    Text(String),
    /// `<![CDATA[..]]>` section content
    CData(String),
    /// Comment body without the `<!--`/`-->` delimiters
    Comment(String),
    /// Processing instruction body without the `<?`/`?>` delimiters
    ProcessingInstruction(String),
}

impl Node {
    /// Text node from unescaped content
    #[must_use]
    pub fn text(content: &str) -> Self {
        Self::Text(partial_escape(content).into_owned())
    }

    /// Borrow as an element
    #[inline]
    #[must_use]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Mutably borrow as an element
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Self::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Unescaped character content for text and CDATA nodes
    #[must_use]
    pub fn character_data(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Text(raw) => Some(unescape_or_raw(raw)),
            Self::CData(content) => Some(Cow::Borrowed(content.as_str())),
            _ => None,
        }
    }
}

/// Document-level markup outside the root element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Misc {
    /// Whitespace between top-level constructs
    Whitespace(String),
    /// Comment body
    Comment(String),
    /// Processing instruction body
    ProcessingInstruction(String),
    /// Doctype declaration body, as read after the `<!DOCTYPE` keyword
    DocType(String),
}

/// Element with ordered attributes and children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: IndexMap<String, String>,
    children: Vec<Node>,
    self_closing: bool,
    position: Position,
}

impl Element {
    /// Create an empty element with the given qualified name
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
            children: Vec::new(),
            self_closing: false,
            position: Position::default(),
        }
    }

    pub(crate) fn from_source(name: String, position: Position) -> Self {
        Self {
            position,
            ..Self::new(name)
        }
    }

    /// Qualified name as written in the source
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name without namespace prefix
    #[inline]
    #[must_use]
    pub fn local_name(&self) -> &str {
        local_part(&self.name)
    }

    /// Namespace prefix, if any
    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        self.name.split_once(':').map(|(prefix, _)| prefix)
    }

    /// True when the local name equals `local`
    #[inline]
    #[must_use]
    pub fn is(&self, local: &str) -> bool {
        self.local_name() == local
    }

    /// Source position of the start tag (zero for constructed elements)
    #[inline]
    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Source line of the start tag
    #[inline]
    #[must_use]
    pub fn line(&self) -> usize {
        self.position.line
    }

    /// Whether the element was written as `<name/>` and still has no children
    #[inline]
    #[must_use]
    pub fn is_self_closing(&self) -> bool {
        self.self_closing && self.children.is_empty()
    }

    pub(crate) fn set_self_closing(&mut self, self_closing: bool) {
        self.self_closing = self_closing;
    }

    // ----- attributes -----

    /// Attribute names and unescaped values in document order
    pub fn attributes(&self) -> impl Iterator<Item = (&str, Cow<'_, str>)> {
        self.attributes
            .iter()
            .map(|(name, raw)| (name.as_str(), unescape_or_raw(raw)))
    }

    /// Unescaped value of the attribute with this exact qualified name
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<Cow<'_, str>> {
        self.attributes.get(name).map(|raw| unescape_or_raw(raw))
    }

    /// Unescaped value of the first attribute whose local name matches,
    /// preferring an unprefixed attribute. Namespace declarations never match.
    #[must_use]
    pub fn attribute_local(&self, local: &str) -> Option<Cow<'_, str>> {
        if let Some(value) = self.attribute(local) {
            return Some(value);
        }
        self.attributes
            .iter()
            .find(|(name, _)| {
                name.split_once(':')
                    .is_some_and(|(prefix, rest)| prefix != "xmlns" && rest == local)
            })
            .map(|(_, raw)| unescape_or_raw(raw))
    }

    /// Attribute value with surrounding whitespace removed, `None` when blank
    #[must_use]
    pub fn non_empty_attribute(&self, name: &str) -> Option<String> {
        self.attribute(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// True when an attribute with this exact qualified name is present
    #[inline]
    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Set an attribute, escaping the value; existing attributes keep their slot
    pub fn set_attribute(&mut self, name: impl Into<String>, value: &str) {
        self.attributes
            .insert(name.into(), escape(value).into_owned());
    }

    /// Remove an attribute, returning its unescaped value
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        self.attributes
            .shift_remove(name)
            .map(|raw| unescape_or_raw(&raw).into_owned())
    }

    pub(crate) fn raw_attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(name, raw)| (name.as_str(), raw.as_str()))
    }

    pub(crate) fn insert_raw_attribute(&mut self, name: String, raw: String) {
        self.attributes.insert(name, raw);
    }

    // ----- children -----

    /// Child nodes in document order
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Mutable child nodes
    #[inline]
    pub fn children_mut(&mut self) -> &mut Vec<Node> {
        &mut self.children
    }

    /// Append a child node
    pub fn push(&mut self, node: Node) {
        self.children.push(node);
    }

    /// Child elements in document order
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Mutable child elements in document order
    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(Node::as_element_mut)
    }

    /// First child element with this local name
    #[must_use]
    pub fn child(&self, local: &str) -> Option<&Element> {
        self.elements().find(|el| el.is(local))
    }

    /// First child element with this local name, mutably
    pub fn child_mut(&mut self, local: &str) -> Option<&mut Element> {
        self.elements_mut().find(|el| el.is(local))
    }

    /// All child elements with this local name
    pub fn children_named<'a>(&'a self, local: &'a str) -> impl Iterator<Item = &'a Element> {
        self.elements().filter(move |el| el.is(local))
    }

    /// Follow a chain of local names through first matching children
    #[must_use]
    pub fn find(&self, steps: &[&str]) -> Option<&Element> {
        steps.iter().try_fold(self, |el, step| el.child(step))
    }

    /// Mutable variant of [`Element::find`]
    pub fn find_mut(&mut self, steps: &[&str]) -> Option<&mut Element> {
        let mut current = self;
        for step in steps {
            current = current.child_mut(step)?;
        }
        Some(current)
    }

    /// Descendant elements in pre-order, excluding `self`
    #[must_use]
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: vec![self.children.iter()],
        }
    }

    // ----- text -----

    /// Concatenated unescaped text of this element and all descendants
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    /// Text with runs of whitespace collapsed to single spaces and trimmed
    #[must_use]
    pub fn normalized_text(&self) -> String {
        self.text().split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Unescaped text that appears before the first non-text child
    #[must_use]
    pub fn leading_text(&self) -> String {
        self.children
            .iter()
            .map_while(Node::character_data)
            .collect()
    }

    /// True when [`Element::leading_text`] starts with whitespace
    #[must_use]
    pub fn has_leading_whitespace(&self) -> bool {
        self.leading_text().starts_with(char::is_whitespace)
    }

    /// Strip leading whitespace from the text before the first child element.
    ///
    /// Returns `true` when anything was removed. Whitespace inside children and
    /// trailing whitespace are left alone.
    pub fn trim_leading_whitespace(&mut self) -> bool {
        let mut changed = false;
        let mut emptied = 0;
        for node in &mut self.children {
            let content = match node {
                Node::Text(raw) | Node::CData(raw) => raw,
                _ => break,
            };
            let trimmed = content.trim_start_matches(char::is_whitespace);
            if trimmed.len() != content.len() {
                changed = true;
                *content = trimmed.to_string();
            }
            if !content.is_empty() {
                break;
            }
            emptied += 1;
        }
        if emptied > 0 {
            self.children.drain(..emptied);
        }
        changed
    }

    /// Replace all children with a single text node
    pub fn set_text(&mut self, text: &str) {
        self.children.clear();
        if !text.is_empty() {
            self.children.push(Node::text(text));
        }
    }

    // ----- paths -----

    /// Element reached by following child-element indices from `self`
    #[must_use]
    pub fn at(&self, path: &ElementPath) -> Option<&Element> {
        path.0
            .iter()
            .try_fold(self, |el, &index| el.elements().nth(index))
    }

    /// Mutable variant of [`Element::at`]
    pub fn at_mut(&mut self, path: &ElementPath) -> Option<&mut Element> {
        let mut current = self;
        for &index in &path.0 {
            current = current.elements_mut().nth(index)?;
        }
        Some(current)
    }

    /// Elements from `self` down to the element at `path`, inclusive
    #[must_use]
    pub fn chain(&self, path: &ElementPath) -> Option<Vec<&Element>> {
        let mut chain = vec![self];
        let mut current = self;
        for &index in &path.0 {
            current = current.elements().nth(index)?;
            chain.push(current);
        }
        Some(chain)
    }

    /// Path from `self` to `target`, compared by identity
    #[must_use]
    pub fn path_of(&self, target: &Element) -> Option<ElementPath> {
        if std::ptr::eq(self, target) {
            return Some(ElementPath::root());
        }
        for (index, child) in self.elements().enumerate() {
            if let Some(rest) = child.path_of(target) {
                let mut indices = Vec::with_capacity(rest.len() + 1);
                indices.push(index);
                indices.extend(rest.0);
                return Some(ElementPath(indices));
            }
        }
        None
    }
}

fn collect_text(el: &Element, out: &mut String) {
    for node in &el.children {
        match node {
            Node::Element(child) => collect_text(child, out),
            other => {
                if let Some(text) = other.character_data() {
                    out.push_str(&text);
                }
            }
        }
    }
}

/// Pre-order iterator over descendant elements
#[derive(Debug)]
pub struct Descendants<'a> {
    stack: Vec<std::slice::Iter<'a, Node>>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<&'a Element> {
        while let Some(top) = self.stack.last_mut() {
            match top.next() {
                Some(Node::Element(el)) => {
                    self.stack.push(el.children.iter());
                    return Some(el);
                }
                Some(_) => {}
                None => {
                    self.stack.pop();
                }
            }
        }
        None
    }
}

/// Child-element index path from the document root
///
/// Rendered as `/2/0/3`; the empty path addresses the root itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementPath(Vec<usize>);

impl ElementPath {
    /// Path from indices
    #[inline]
    #[must_use]
    pub fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    /// The root path
    #[inline]
    #[must_use]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Path to the `index`-th child element of this path's element
    #[must_use]
    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    /// Index segments
    #[inline]
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Number of segments
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for the root path
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for ElementPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for index in &self.0 {
            write!(f, "/{index}")?;
        }
        Ok(())
    }
}

/// Error parsing an [`ElementPath`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid element path segment: '{0}'")]
pub struct ElementPathError(String);

impl FromStr for ElementPath {
    type Err = ElementPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| {
                segment
                    .parse()
                    .map_err(|_| ElementPathError(segment.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

/// Parsed XML document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    bom: bool,
    declaration: Option<String>,
    prolog: Vec<Misc>,
    root: Element,
    epilog: Vec<Misc>,
}

impl Document {
    /// Document with a root element and no declaration
    #[must_use]
    pub fn new(root: Element) -> Self {
        Self {
            bom: false,
            declaration: None,
            prolog: Vec::new(),
            root,
            epilog: Vec::new(),
        }
    }

    /// Parse a document from text
    ///
    /// # Errors
    ///
    /// Returns [`XmlError`] when the text is not a well-formed, single-rooted
    /// document.
    pub fn parse(source: &str) -> XmlResult<Self> {
        parse::parse_document(source)
    }

    /// Parse a document from UTF-8 bytes
    ///
    /// # Errors
    ///
    /// Returns [`XmlError::Encoding`] for invalid UTF-8, otherwise as
    /// [`Document::parse`].
    pub fn from_bytes(bytes: &[u8]) -> XmlResult<Self> {
        Self::parse(std::str::from_utf8(bytes)?)
    }

    /// Read and parse a document file
    ///
    /// # Errors
    ///
    /// Returns [`XmlError::Io`] when the file cannot be read, otherwise as
    /// [`Document::from_bytes`].
    pub fn from_file(path: impl AsRef<Path>) -> XmlResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| XmlError::io_error(path, e))?;
        tracing::debug!("Parsing {} ({} bytes)", path.display(), bytes.len());
        Self::from_bytes(&bytes)
    }

    /// Root element
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Mutable root element
    #[inline]
    pub fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    /// XML declaration body, e.g. `xml version="1.0" encoding="UTF-8"`
    #[must_use]
    pub fn declaration(&self) -> Option<&str> {
        self.declaration.as_deref()
    }

    /// Encoding named in the XML declaration
    #[must_use]
    pub fn encoding(&self) -> Option<&str> {
        let decl = self.declaration.as_deref()?;
        let rest = &decl[decl.find("encoding")? + "encoding".len()..];
        let rest = rest.trim_start().strip_prefix('=')?.trim_start();
        let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
        let rest = &rest[1..];
        rest.find(quote).map(|end| &rest[..end])
    }

    /// Doctype body, if the document has one
    #[must_use]
    pub fn doctype(&self) -> Option<&str> {
        self.prolog.iter().find_map(|misc| match misc {
            Misc::DocType(body) => Some(body.trim()),
            _ => None,
        })
    }

    /// Element at a path from the root
    #[must_use]
    pub fn element(&self, path: &ElementPath) -> Option<&Element> {
        self.root.at(path)
    }

    /// Mutable element at a path from the root
    pub fn element_mut(&mut self, path: &ElementPath) -> Option<&mut Element> {
        self.root.at_mut(path)
    }

    /// Serialize, keeping declaration, prolog and epilog
    #[must_use]
    pub fn to_xml_string(&self) -> String {
        let mut out = String::new();
        write::write_document(self, &mut out);
        out
    }

    /// Serialize to bytes
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_xml_string().into_bytes()
    }

    /// Serialize and write to a file
    ///
    /// # Errors
    ///
    /// Returns [`XmlError::Io`] when the file cannot be written.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> XmlResult<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_bytes()).map_err(|e| XmlError::io_error(path, e))
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_xml_string())
    }
}

impl FromStr for Document {
    type Err = XmlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Local part of a qualified name
#[inline]
#[must_use]
pub fn local_part(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, local)| local)
}

fn unescape_or_raw(raw: &str) -> Cow<'_, str> {
    unescape(raw).unwrap_or(Cow::Borrowed(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
<!DOCTYPE ead PUBLIC \"+//ISBN 1-931666-00-8//DTD ead.dtd (Encoded Archival Description (EAD) Version 2002)//EN\" \"ead.dtd\">\n\
<ead xmlns:xlink=\"http://www.w3.org/1999/xlink\">\n\
  <!-- header -->\n\
  <eadheader><eadid url=\"a&amp;b\">abc123</eadid></eadheader>\n\
  <archdesc level=\"collection\"><did><unittitle>  Papers &amp; Letters <date>1900</date> </unittitle><container/></did></archdesc>\n\
</ead>\n";

    #[test]
    fn round_trip_is_byte_identical() {
        let doc = Document::parse(SAMPLE).unwrap();
        assert_eq!(doc.to_xml_string(), SAMPLE);
    }

    #[test]
    fn declaration_and_encoding() {
        let doc = Document::parse(SAMPLE).unwrap();
        assert_eq!(doc.declaration(), Some("xml version=\"1.0\" encoding=\"UTF-8\""));
        assert_eq!(doc.encoding(), Some("UTF-8"));
        assert!(doc.doctype().unwrap().starts_with("ead PUBLIC"));
    }

    #[test]
    fn attribute_values_are_unescaped() {
        let doc = Document::parse(SAMPLE).unwrap();
        let eadid = doc.root().find(&["eadheader", "eadid"]).unwrap();
        assert_eq!(eadid.attribute("url").as_deref(), Some("a&b"));
        assert_eq!(eadid.text(), "abc123");
    }

    #[test]
    fn set_attribute_escapes_and_keeps_slot() {
        let mut doc = Document::parse("<a x=\"1\" y=\"2\"/>").unwrap();
        doc.root_mut().set_attribute("x", "<&>");
        doc.root_mut().set_attribute("z", "3");
        assert_eq!(doc.to_xml_string(), "<a x=\"&lt;&amp;&gt;\" y=\"2\" z=\"3\"/>");
    }

    #[test]
    fn single_quoted_value_with_double_quote_survives() {
        let doc = Document::parse("<a title='say \"hi\"'/>").unwrap();
        assert_eq!(doc.root().attribute("title").as_deref(), Some("say \"hi\""));
        let again = Document::parse(&doc.to_xml_string()).unwrap();
        assert_eq!(again.root().attribute("title").as_deref(), Some("say \"hi\""));
    }

    #[test]
    fn attribute_local_matches_prefixed() {
        let doc =
            Document::parse("<extref xmlns:xlink=\"x\" xlink:href=\"http://a/\">A</extref>").unwrap();
        assert_eq!(doc.root().attribute_local("href").as_deref(), Some("http://a/"));
        assert!(doc.root().attribute_local("xlink").is_none());
    }

    #[test]
    fn leading_text_and_trim() {
        let mut doc = Document::parse(SAMPLE).unwrap();
        let title = doc
            .root_mut()
            .find_mut(&["archdesc", "did", "unittitle"])
            .unwrap();
        assert_eq!(title.leading_text(), "  Papers & Letters ");
        assert!(title.has_leading_whitespace());
        assert!(title.trim_leading_whitespace());
        assert!(!title.trim_leading_whitespace());
        assert_eq!(title.text(), "Papers & Letters 1900 ");
    }

    #[test]
    fn trim_leaves_leading_element_alone() {
        let mut doc = Document::parse("<persname><emph> X</emph> y</persname>").unwrap();
        assert!(!doc.root_mut().trim_leading_whitespace());
        assert_eq!(doc.to_xml_string(), "<persname><emph> X</emph> y</persname>");
    }

    #[test]
    fn trim_whitespace_only_text_before_element() {
        let mut doc = Document::parse("<persname>\n  <emph>X</emph></persname>").unwrap();
        assert!(doc.root_mut().trim_leading_whitespace());
        assert_eq!(doc.to_xml_string(), "<persname><emph>X</emph></persname>");
    }

    #[test]
    fn positions_are_recorded() {
        let doc = Document::parse(SAMPLE).unwrap();
        assert_eq!(doc.root().line(), 3);
        let archdesc = doc.root().child("archdesc").unwrap();
        assert_eq!(archdesc.position(), Position::new(6, 3));
    }

    #[test]
    fn descendants_are_preorder() {
        let doc = Document::parse("<a><b><c/></b><d/></a>").unwrap();
        let names: Vec<_> = doc.root().descendants().map(Element::name).collect();
        assert_eq!(names, vec!["b", "c", "d"]);
    }

    #[test]
    fn element_path_lookup_and_identity() {
        let doc = Document::parse("<a><b/><c><d/><e/></c></a>").unwrap();
        let e = doc.root().descendants().find(|el| el.is("e")).unwrap();
        let path = doc.root().path_of(e).unwrap();
        assert_eq!(path.to_string(), "/1/1");
        assert_eq!(doc.element(&path).unwrap().name(), "e");
        let chain: Vec<_> = doc.root().chain(&path).unwrap().iter().map(|el| el.name()).collect();
        assert_eq!(chain, vec!["a", "c", "e"]);
        assert_eq!("/1/1".parse::<ElementPath>().unwrap(), path);
        assert!("/x".parse::<ElementPath>().is_err());
    }

    #[test]
    fn namespaced_names_match_by_local_part() {
        let doc = Document::parse("<ead:ead xmlns:ead=\"urn:isbn:1-931666-22-9\"><ead:did/></ead:ead>")
            .unwrap();
        assert!(doc.root().is("ead"));
        assert_eq!(doc.root().prefix(), Some("ead"));
        assert!(doc.root().child("did").is_some());
    }

    #[test]
    fn normalized_text_collapses_whitespace() {
        let doc = Document::parse("<t>\n  Smith,\n   John </t>").unwrap();
        assert_eq!(doc.root().normalized_text(), "Smith, John");
    }
}
