//! EAD accessors over a [`Document`]
//!
//! Provides typed views of the parts of a finding aid the publication
//! pipeline reads and edits:
//! - [`FindingAid`]: eadid, archdesc, unit title, originations, containers
//! - [`Series`]: `c`/`c01`..`c12` components with level, id, unitid, unittitle
//! - [`Index`]: `archdesc/index` blocks
//! - [`ListTitle`]: the field feeding alphabetical browse

use crate::error::XmlResult;
use crate::xml::{Document, Element, ElementPath};
use std::path::Path;

/// Separator between the eadid and the local part of generated ids
pub const ID_DELIMITER: &str = "_";

/// Deepest series nesting that is walked (series, subseries, sub-subseries)
pub const MAX_SERIES_DEPTH: usize = 3;

/// Element names that count as control-access terms
pub const CONTROLACCESS_TERMS: [&str; 10] = [
    "subject",
    "persname",
    "corpname",
    "famname",
    "geogname",
    "genreform",
    "title",
    "occupation",
    "function",
    "name",
];

/// Origination name elements that may supply the list title
pub const LIST_TITLE_NAMES: [&str; 3] = ["corpname", "famname", "persname"];

/// Levels that mark a component as a subseries of its parent
const SUBSERIES_LEVELS: [&str; 3] = ["subseries", "subsubseries", "otherlevel"];

/// True for `c` and numbered components `c01`..`c12`
#[must_use]
pub fn is_component(el: &Element) -> bool {
    match el.local_name().strip_prefix('c') {
        Some("") => true,
        Some(num) => {
            num.len() == 2
                && num.parse::<u8>().is_ok_and(|n| (1..=12).contains(&n))
        }
        None => false,
    }
}

/// Component children of an element
pub fn components(el: &Element) -> impl Iterator<Item = &Element> {
    el.elements().filter(|child| is_component(child))
}

/// Mutable component children of an element
pub fn components_mut(el: &mut Element) -> impl Iterator<Item = &mut Element> {
    el.elements_mut().filter(|child| is_component(child))
}

fn level_of(el: &Element) -> String {
    el.attribute("level")
        .map(|level| level.trim().to_string())
        .unwrap_or_default()
}

/// True when a `dsc` is organised into series
#[must_use]
pub fn dsc_has_series(dsc: &Element) -> bool {
    components(dsc)
        .next()
        .is_some_and(|first| level_of(first) == "series")
}

/// True when a component's first child component is a subseries level
#[must_use]
pub fn has_subseries(component: &Element) -> bool {
    components(component)
        .next()
        .is_some_and(|first| SUBSERIES_LEVELS.contains(&level_of(first).as_str()))
}

/// Kind of entity named by the collection's origination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OriginationKind {
    /// `persname`
    Person,
    /// `corpname` or `famname`
    Organization,
}

impl OriginationKind {
    /// Kind for a name element's local name
    #[must_use]
    pub fn from_tag(local: &str) -> Option<Self> {
        match local {
            "persname" => Some(Self::Person),
            "corpname" | "famname" => Some(Self::Organization),
            _ => None,
        }
    }
}

/// Series, subseries or sub-subseries component
#[derive(Debug, Clone, Copy)]
pub struct Series<'a> {
    element: &'a Element,
    depth: usize,
}

impl<'a> Series<'a> {
    /// View a component at a nesting depth (1 for top-level series)
    #[inline]
    #[must_use]
    pub fn new(element: &'a Element, depth: usize) -> Self {
        Self { element, depth }
    }

    /// Underlying component element
    #[inline]
    #[must_use]
    pub fn element(&self) -> &'a Element {
        self.element
    }

    /// Nesting depth, 1 for top-level series
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Component tag, e.g. `c01`
    #[inline]
    #[must_use]
    pub fn tag(&self) -> &'a str {
        self.element.local_name()
    }

    /// Non-empty `id` attribute
    #[must_use]
    pub fn id(&self) -> Option<String> {
        self.element.non_empty_attribute("id")
    }

    /// `level` attribute, empty when missing
    #[must_use]
    pub fn level(&self) -> String {
        level_of(self.element)
    }

    /// Normalized `did/unitid` text, when non-empty
    #[must_use]
    pub fn unitid(&self) -> Option<String> {
        self.element
            .find(&["did", "unitid"])
            .map(Element::normalized_text)
            .filter(|text| !text.is_empty())
    }

    /// Normalized `did/unittitle` text
    #[must_use]
    pub fn unittitle(&self) -> String {
        self.element
            .find(&["did", "unittitle"])
            .map(Element::normalized_text)
            .unwrap_or_default()
    }

    /// `"<unitid>: <unittitle>"`, or the unit title alone
    #[must_use]
    pub fn display_label(&self) -> String {
        match self.unitid() {
            Some(unitid) => format!("{unitid}: {}", self.unittitle()),
            None => self.unittitle(),
        }
    }

    /// True when this component holds subseries and the depth limit allows them
    #[must_use]
    pub fn has_subseries(&self) -> bool {
        self.depth < MAX_SERIES_DEPTH && has_subseries(self.element)
    }

    /// Child series, empty unless [`Series::has_subseries`]
    #[must_use]
    pub fn subseries(&self) -> Vec<Series<'a>> {
        if !self.has_subseries() {
            return Vec::new();
        }
        components(self.element)
            .map(|c| Series::new(c, self.depth + 1))
            .collect()
    }
}

/// `archdesc/index` block
#[derive(Debug, Clone, Copy)]
pub struct Index<'a> {
    element: &'a Element,
}

impl<'a> Index<'a> {
    /// Underlying element
    #[inline]
    #[must_use]
    pub fn element(&self) -> &'a Element {
        self.element
    }

    /// Index tag, always `index`
    #[inline]
    #[must_use]
    pub fn tag(&self) -> &'a str {
        self.element.local_name()
    }

    /// Non-empty `id` attribute
    #[must_use]
    pub fn id(&self) -> Option<String> {
        self.element.non_empty_attribute("id")
    }

    /// Normalized `head` text
    #[must_use]
    pub fn head(&self) -> String {
        self.element
            .child("head")
            .map(Element::normalized_text)
            .unwrap_or_default()
    }
}

/// Element feeding the browse list title and its field path
#[derive(Debug, Clone, Copy)]
pub struct ListTitle<'a> {
    element: &'a Element,
    field: &'static str,
}

impl<'a> ListTitle<'a> {
    /// Source element
    #[inline]
    #[must_use]
    pub fn element(&self) -> &'a Element {
        self.element
    }

    /// Field path used in messages, e.g. `origination/persname`
    #[inline]
    #[must_use]
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Full text of the field
    #[must_use]
    pub fn text(&self) -> String {
        self.element.text()
    }
}

fn list_title_field(local: &str) -> &'static str {
    match local {
        "corpname" => "origination/corpname",
        "famname" => "origination/famname",
        "persname" => "origination/persname",
        _ => "did/unittitle",
    }
}

/// Parsed finding aid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindingAid {
    doc: Document,
}

impl FindingAid {
    /// Wrap a parsed document
    #[inline]
    #[must_use]
    pub fn new(doc: Document) -> Self {
        Self { doc }
    }

    /// Parse finding aid text
    ///
    /// # Errors
    ///
    /// Returns [`crate::XmlError`] when the text is not well-formed.
    pub fn parse(source: &str) -> XmlResult<Self> {
        Document::parse(source).map(Self::new)
    }

    /// Parse finding aid bytes
    ///
    /// # Errors
    ///
    /// Returns [`crate::XmlError`] when the bytes are not well-formed UTF-8 XML.
    pub fn from_bytes(bytes: &[u8]) -> XmlResult<Self> {
        Document::from_bytes(bytes).map(Self::new)
    }

    /// Read and parse a finding aid file
    ///
    /// # Errors
    ///
    /// Returns [`crate::XmlError`] when the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> XmlResult<Self> {
        Document::from_file(path).map(Self::new)
    }

    /// Underlying document
    #[inline]
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Mutable underlying document
    #[inline]
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    /// Unwrap the document
    #[inline]
    #[must_use]
    pub fn into_document(self) -> Document {
        self.doc
    }

    /// True when the root element is `ead`
    #[must_use]
    pub fn is_ead(&self) -> bool {
        self.doc.root().is("ead")
    }

    // ----- eadid -----

    /// `eadheader/eadid` element
    #[must_use]
    pub fn eadid(&self) -> Option<&Element> {
        self.doc.root().find(&["eadheader", "eadid"])
    }

    /// Mutable `eadheader/eadid` element
    pub fn eadid_mut(&mut self) -> Option<&mut Element> {
        self.doc.root_mut().find_mut(&["eadheader", "eadid"])
    }

    /// Text of the eadid, empty when missing
    #[must_use]
    pub fn eadid_value(&self) -> String {
        self.eadid().map(Element::text).unwrap_or_default()
    }

    /// Replace the eadid text. Returns `false` when the document has no eadid.
    pub fn set_eadid_value(&mut self, value: &str) -> bool {
        match self.eadid_mut() {
            Some(eadid) => {
                if eadid.text() != value {
                    eadid.set_text(value);
                }
                true
            }
            None => false,
        }
    }

    /// `eadid/@url`
    #[must_use]
    pub fn eadid_url(&self) -> Option<String> {
        self.eadid()
            .and_then(|e| e.attribute("url").map(|v| v.into_owned()))
    }

    /// `eadid/@identifier`
    #[must_use]
    pub fn eadid_identifier(&self) -> Option<String> {
        self.eadid()
            .and_then(|e| e.attribute("identifier").map(|v| v.into_owned()))
    }

    // ----- archdesc -----

    /// `archdesc` element
    #[must_use]
    pub fn archdesc(&self) -> Option<&Element> {
        self.doc.root().child("archdesc")
    }

    /// Mutable `archdesc` element
    pub fn archdesc_mut(&mut self) -> Option<&mut Element> {
        self.doc.root_mut().child_mut("archdesc")
    }

    /// `archdesc/did/unittitle`
    #[must_use]
    pub fn unittitle(&self) -> Option<&Element> {
        self.archdesc()?.find(&["did", "unittitle"])
    }

    /// Whitespace-normalized collection title
    #[must_use]
    pub fn title(&self) -> String {
        self.unittitle()
            .map(Element::normalized_text)
            .unwrap_or_default()
    }

    /// `archdesc/did/origination` elements
    #[must_use]
    pub fn originations(&self) -> Vec<&Element> {
        self.archdesc()
            .and_then(|a| a.child("did"))
            .map(|did| did.children_named("origination").collect())
            .unwrap_or_default()
    }

    /// Kind of the first origination name
    #[must_use]
    pub fn origination_kind(&self) -> Option<OriginationKind> {
        self.originations()
            .into_iter()
            .flat_map(Element::elements)
            .find_map(|name| OriginationKind::from_tag(name.local_name()))
    }

    /// `archdesc/dsc`
    #[must_use]
    pub fn dsc(&self) -> Option<&Element> {
        self.archdesc()?.child("dsc")
    }

    /// Mutable `archdesc/dsc`
    pub fn dsc_mut(&mut self) -> Option<&mut Element> {
        self.archdesc_mut()?.child_mut("dsc")
    }

    /// Top-level series, empty when the dsc is not organised into series
    #[must_use]
    pub fn series(&self) -> Vec<Series<'_>> {
        match self.dsc() {
            Some(dsc) if dsc_has_series(dsc) => {
                components(dsc).map(|c| Series::new(c, 1)).collect()
            }
            _ => Vec::new(),
        }
    }

    /// `archdesc/index` blocks
    #[must_use]
    pub fn indexes(&self) -> Vec<Index<'_>> {
        self.archdesc()
            .map(|a| a.children_named("index").map(|element| Index { element }).collect())
            .unwrap_or_default()
    }

    /// Every term under `archdesc/controlaccess`, nested blocks included,
    /// in document order
    #[must_use]
    pub fn controlaccess_terms(&self) -> Vec<&Element> {
        fn walk<'a>(block: &'a Element, out: &mut Vec<&'a Element>) {
            for child in block.elements() {
                if child.is("controlaccess") {
                    walk(child, out);
                } else if CONTROLACCESS_TERMS.contains(&child.local_name()) {
                    out.push(child);
                }
            }
        }
        let mut terms = Vec::new();
        if let Some(archdesc) = self.archdesc() {
            for block in archdesc.children_named("controlaccess") {
                walk(block, &mut terms);
            }
        }
        terms
    }

    /// Paths of [`FindingAid::controlaccess_terms`] for in-place edits
    #[must_use]
    pub fn controlaccess_term_paths(&self) -> Vec<ElementPath> {
        let root = self.doc.root();
        self.controlaccess_terms()
            .into_iter()
            .filter_map(|term| root.path_of(term))
            .collect()
    }

    /// First origination corpname/famname/persname in document order, else the
    /// collection unit title
    #[must_use]
    pub fn list_title(&self) -> Option<ListTitle<'_>> {
        let name = self
            .originations()
            .into_iter()
            .flat_map(Element::elements)
            .find(|el| LIST_TITLE_NAMES.contains(&el.local_name()));
        let element = name.or_else(|| self.unittitle())?;
        Some(ListTitle {
            element,
            field: list_title_field(element.local_name()),
        })
    }

    /// Path of the list-title element for in-place edits
    #[must_use]
    pub fn list_title_path(&self) -> Option<ElementPath> {
        let title = self.list_title()?;
        self.doc.root().path_of(title.element())
    }

    /// First character of the whitespace-normalized list title
    #[must_use]
    pub fn first_letter(&self) -> Option<char> {
        self.list_title()?.element().normalized_text().chars().next()
    }

    /// Every `did` in the document, in document order
    #[must_use]
    pub fn dids(&self) -> Vec<&Element> {
        let root = self.doc.root();
        std::iter::once(root)
            .chain(root.descendants())
            .filter(|el| el.is("did"))
            .collect()
    }
}

impl From<Document> for FindingAid {
    fn from(doc: Document) -> Self {
        Self::new(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EAD: &str = r#"<ead>
  <eadheader><eadid url="http://pid.example/ark:/25593/abc" identifier="ark:/25593/abc">smith123</eadid><filedesc/></eadheader>
  <archdesc level="collection">
    <did>
      <unittitle>Smith papers</unittitle>
      <origination><persname>Smith, Ann</persname></origination>
      <container type="box">1</container>
    </did>
    <controlaccess>
      <controlaccess><persname> Jones</persname><subject>Fish</subject></controlaccess>
      <genreform>Letters</genreform>
    </controlaccess>
    <dsc>
      <c01 level="series" id="smith123_1">
        <did><unitid>Series 1</unitid><unittitle>Correspondence</unittitle></did>
        <c02 level="subseries"><did><unittitle>Family</unittitle></did>
          <c03 level="subsubseries"><did><unittitle>Siblings</unittitle></did></c03>
        </c02>
      </c01>
      <c01 level="series"><did><unittitle>Writings</unittitle></did></c01>
    </dsc>
    <index><head>Index of Names</head></index>
  </archdesc>
</ead>"#;

    fn fa() -> FindingAid {
        FindingAid::parse(EAD).unwrap()
    }

    #[test]
    fn component_names() {
        for name in ["c", "c01", "c09", "c12"] {
            assert!(is_component(&Element::new(name)), "{name}");
        }
        for name in ["c13", "c1", "c00", "controlaccess", "container"] {
            assert!(!is_component(&Element::new(name)), "{name}");
        }
    }

    #[test]
    fn eadid_accessors() {
        let fa = fa();
        assert!(fa.is_ead());
        assert_eq!(fa.eadid_value(), "smith123");
        assert_eq!(fa.eadid_identifier().as_deref(), Some("ark:/25593/abc"));
        assert!(fa.eadid_url().unwrap().ends_with("ark:/25593/abc"));
    }

    #[test]
    fn set_eadid_value_replaces_text() {
        let mut fa = fa();
        assert!(fa.set_eadid_value("jones9"));
        assert_eq!(fa.eadid_value(), "jones9");
    }

    #[test]
    fn series_tree() {
        let fa = fa();
        let series = fa.series();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].id().as_deref(), Some("smith123_1"));
        assert_eq!(series[0].display_label(), "Series 1: Correspondence");
        assert_eq!(series[1].display_label(), "Writings");
        let sub = series[0].subseries();
        assert_eq!(sub.len(), 1);
        assert_eq!(sub[0].level(), "subseries");
        let subsub = sub[0].subseries();
        assert_eq!(subsub.len(), 1);
        assert!(!subsub[0].has_subseries());
        assert!(series[1].subseries().is_empty());
    }

    #[test]
    fn index_and_terms() {
        let fa = fa();
        let indexes = fa.indexes();
        assert_eq!(indexes.len(), 1);
        assert_eq!(indexes[0].head(), "Index of Names");
        assert!(indexes[0].id().is_none());

        let terms: Vec<_> = fa.controlaccess_terms().iter().map(|t| t.text()).collect();
        assert_eq!(terms, vec![" Jones", "Fish", "Letters"]);
        assert_eq!(fa.controlaccess_term_paths().len(), 3);
    }

    #[test]
    fn list_title_prefers_origination() {
        let fa = fa();
        let title = fa.list_title().unwrap();
        assert_eq!(title.field(), "origination/persname");
        assert_eq!(title.text(), "Smith, Ann");
        assert_eq!(fa.first_letter(), Some('S'));
        assert_eq!(fa.origination_kind(), Some(OriginationKind::Person));
    }

    #[test]
    fn list_title_falls_back_to_unittitle() {
        let fa = FindingAid::parse(
            "<ead><archdesc><did><unittitle><title>Gone</title> papers</unittitle></did></archdesc></ead>",
        )
        .unwrap();
        let title = fa.list_title().unwrap();
        assert_eq!(title.field(), "did/unittitle");
        assert!(!title.element().has_leading_whitespace());
        assert_eq!(fa.first_letter(), Some('G'));
        assert!(fa.origination_kind().is_none());
    }

    #[test]
    fn dids_in_document_order() {
        let fa = fa();
        assert_eq!(fa.dids().len(), 5);
    }

    #[test]
    fn series_requires_series_level_first() {
        let fa = FindingAid::parse(
            "<ead><archdesc><dsc><c01 level=\"file\"/><c01 level=\"series\"/></dsc></archdesc></ead>",
        )
        .unwrap();
        assert!(fa.series().is_empty());
    }
}
