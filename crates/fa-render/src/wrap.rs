//! Start/end markup pairs
//!
//! Every rendered element contributes exactly one [`Wrapper`]. The start half
//! is written before the element's children and the end half after them, so
//! output stays balanced however wrappers are nested.

use fa_ead::Element;
use quick_xml::escape::escape;

/// Markup written around an element's rendered children
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Wrapper {
    start: String,
    end: String,
}

impl Wrapper {
    /// Wrapper from literal start and end markup
    #[must_use]
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Wrapper that adds nothing
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// `<tag attr="value" ...>` / `</tag>` with escaped attribute values
    #[must_use]
    pub fn tag(tag: &str, attributes: &[(&str, &str)]) -> Self {
        Self::new(open_tag(tag, attributes), format!("</{tag}>"))
    }

    /// `<span ...>` / `</span>`
    #[must_use]
    pub fn span(attributes: &[(&str, &str)]) -> Self {
        Self::tag("span", attributes)
    }

    /// `<span class="...">` / `</span>`
    #[must_use]
    pub fn class(class: &str) -> Self {
        Self::span(&[("class", class)])
    }

    /// Place `inner` inside this wrapper
    #[must_use]
    pub fn wrap(mut self, inner: Wrapper) -> Self {
        self.start.push_str(&inner.start);
        self.end = inner.end + &self.end;
        self
    }

    /// Append markup just before the end half
    #[must_use]
    pub fn close_with(mut self, markup: &str) -> Self {
        self.end.insert_str(0, markup);
        self
    }

    /// Markup written before the children
    #[inline]
    #[must_use]
    pub fn start(&self) -> &str {
        &self.start
    }

    /// Markup written after the children
    #[inline]
    #[must_use]
    pub fn end(&self) -> &str {
        &self.end
    }

    /// True when both halves are empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start.is_empty() && self.end.is_empty()
    }
}

/// `<tag attr="value">` with escaped values
pub(crate) fn open_tag(tag: &str, attributes: &[(&str, &str)]) -> String {
    let mut out = format!("<{tag}");
    for (name, value) in attributes {
        out.push_str(&format!(" {name}=\"{}\"", escape(*value)));
    }
    out.push('>');
    out
}

/// Empty `<span .../>`-style carrier for a property or relation
pub(crate) fn empty_span(attributes: &[(&str, &str)]) -> String {
    open_tag("span", attributes) + "</span>"
}

/// Wrapper for a `render` attribute value
#[must_use]
pub fn hint_wrapper(render: &str) -> Option<Wrapper> {
    let wrapper = match render {
        "doublequote" => Wrapper::new("\"", "\""),
        "singlequote" => Wrapper::new("'", "'"),
        "bold" => Wrapper::class("ead-bold"),
        "italic" => Wrapper::class("ead-italic"),
        "bolditalic" => Wrapper::class("ead-bold ead-italic"),
        "underline" => Wrapper::class("ead-underline"),
        "smcaps" => Wrapper::class("ead-smcaps"),
        "super" => Wrapper::tag("sup", &[]),
        "sub" => Wrapper::tag("sub", &[]),
        _ => return None,
    };
    Some(wrapper)
}

/// Wrapper for the element's own tag, ignoring RDFa
#[must_use]
pub fn tag_wrapper(el: &Element) -> Option<Wrapper> {
    if el.name() == "exist:match" {
        return Some(Wrapper::class("exist-match"));
    }
    match el.local_name() {
        "emph" => Some(Wrapper::tag("em", &[])),
        "title" => Some(Wrapper::class("ead-title")),
        _ => None,
    }
}

/// Presentation wrapper: a render hint wins over the tag
#[must_use]
pub fn presentation(el: &Element) -> Wrapper {
    el.attribute("render")
        .and_then(|render| hint_wrapper(render.trim()))
        .or_else(|| tag_wrapper(el))
        .unwrap_or_default()
}
