//! EAD content to HTML
//!
//! Text is escaped and copied through. Each element is replaced by its
//! [`Wrapper`]; elements without one contribute only their children.
//! Comments and processing instructions are dropped.

use crate::rdfa::{Placement, DATE_TAGS, NAME_TAGS};
use crate::wrap::{presentation, Wrapper};
use fa_ead::{Element, ElementPath, FindingAid, Node, OriginationKind};
use quick_xml::escape::partial_escape;
use tracing::debug;

/// Output flavor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Markup {
    /// Presentation markup only
    #[default]
    Html,
    /// Presentation markup plus RDFa annotations
    Rdfa,
}

/// Renders EAD-tagged content
#[derive(Debug, Clone, Copy, Default)]
pub struct Renderer {
    markup: Markup,
    origination: Option<OriginationKind>,
}

impl Renderer {
    /// Renderer for one output flavor
    #[must_use]
    pub fn new(markup: Markup) -> Self {
        Self {
            markup,
            origination: None,
        }
    }

    /// Plain HTML renderer
    #[must_use]
    pub fn html() -> Self {
        Self::new(Markup::Html)
    }

    /// RDFa renderer
    #[must_use]
    pub fn rdfa() -> Self {
        Self::new(Markup::Rdfa)
    }

    /// Renderer for content of `ead`, aware of its origination
    #[must_use]
    pub fn for_finding_aid(ead: &FindingAid, markup: Markup) -> Self {
        Self::new(markup).with_origination(ead.origination_kind())
    }

    /// Set the collection's origination kind
    #[must_use]
    pub fn with_origination(mut self, origination: Option<OriginationKind>) -> Self {
        self.origination = origination;
        self
    }

    /// Output flavor
    #[inline]
    #[must_use]
    pub fn markup(&self) -> Markup {
        self.markup
    }

    /// Render an element with no surrounding context
    #[must_use]
    pub fn render(&self, el: &Element) -> String {
        self.render_within(el, &[])
    }

    /// Render an element whose ancestors, root first, are `ancestors`
    #[must_use]
    pub fn render_within(&self, el: &Element, ancestors: &[&Element]) -> String {
        let mut out = String::new();
        let mut stack = ancestors.to_vec();
        self.walk(el, &mut stack, &mut out);
        out
    }

    /// Render the element at `path` below `root`
    #[must_use]
    pub fn render_path(&self, root: &Element, path: &ElementPath) -> Option<String> {
        let Some(chain) = root.chain(path) else {
            debug!("No element at {} to render", path);
            return None;
        };
        let (el, ancestors) = chain.split_last()?;
        Some(self.render_within(el, ancestors))
    }

    /// Wrapper for `el` below `ancestors`
    #[must_use]
    pub fn wrapper(&self, el: &Element, ancestors: &[&Element]) -> Wrapper {
        let placement = Placement::new(ancestors, self.origination);
        let rdfa = self.markup == Markup::Rdfa;
        let base = presentation(el);

        if el.is("extref") {
            return placement.extref(el, rdfa).wrap(base);
        }
        if !rdfa {
            return base;
        }
        let local = el.local_name();
        let annotation = if NAME_TAGS.contains(&local) {
            placement.name(el)
        } else if DATE_TAGS.contains(&local) {
            Some(placement.date(el))
        } else if local == "title" {
            placement.title(el)
        } else {
            None
        };
        match annotation {
            Some(annotation) => base.wrap(annotation),
            None => base,
        }
    }

    fn walk<'a>(&self, el: &'a Element, ancestors: &mut Vec<&'a Element>, out: &mut String) {
        let wrapper = self.wrapper(el, ancestors);
        out.push_str(wrapper.start());
        ancestors.push(el);
        for node in el.children() {
            match node {
                Node::Element(child) => self.walk(child, ancestors, out),
                Node::Text(_) | Node::CData(_) => {
                    if let Some(text) = node.character_data() {
                        out.push_str(&partial_escape(&text));
                    }
                }
                Node::Comment(_) | Node::ProcessingInstruction(_) => {}
            }
        }
        ancestors.pop();
        out.push_str(wrapper.end());
    }
}

/// Render a field of `ead` addressed by element names below the root,
/// e.g. `["archdesc", "did", "unittitle"]`
#[must_use]
pub fn render_field(ead: &FindingAid, steps: &[&str], markup: Markup) -> Option<String> {
    let root = ead.document().root();
    let el = root.find(steps)?;
    let path = root.path_of(el)?;
    Renderer::for_finding_aid(ead, markup).render_path(root, &path)
}
