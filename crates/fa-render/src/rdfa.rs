//! RDFa annotations for names, dates and titles
//!
//! Relations are inferred from where an element sits in the document:
//!
//! - names use their `role`, else the `encodinganalog` of a directly
//!   enclosing `controlaccess`, else the collection's origination when inside
//!   `bioghist`, else `schema:mentions`
//! - titles are typed from `source` and `type`; titles in a unit title that
//!   names a creator by role become an ordered `dc:title` list, and when a
//!   unit title holds several titles the first is part of the second
//!
//! Only the first two sibling titles of a unit title are related. The third
//! and later ones are rendered without RDFa.

use crate::wrap::{empty_span, Wrapper};
use fa_ead::{is_component, Element, OriginationKind};

/// Name elements that receive RDFa
pub const NAME_TAGS: [&str; 5] = ["persname", "corpname", "famname", "geogname", "name"];

/// Date elements that receive `dc:date`
pub const DATE_TAGS: [&str; 2] = ["unitdate", "date"];

/// Fallback relation for names
pub const MENTIONS: &str = "schema:mentions";

/// RDF type for a name element
#[must_use]
pub fn name_type(tag: &str) -> &'static str {
    match tag {
        "persname" => "schema:Person",
        "corpname" | "famname" => "schema:Organization",
        "geogname" => "schema:Place",
        _ => "schema:Thing",
    }
}

/// Authority URI for a name's `source` and `authfilenumber`
#[must_use]
pub fn name_uri(el: &Element) -> Option<String> {
    let source = el.non_empty_attribute("source")?.to_ascii_lowercase();
    let id = el.non_empty_attribute("authfilenumber")?;
    match source.as_str() {
        "viaf" => Some(format!("http://viaf.org/viaf/{id}")),
        "geonames" => Some(format!("http://sws.geonames.org/{id}/")),
        "dbpedia" => Some(format!("http://dbpedia.org/resource/{id}")),
        "lcnaf" => Some(format!("http://id.loc.gov/authorities/names/{id}")),
        _ => None,
    }
}

/// Identifier URI for a title's `source` and `authfilenumber`
#[must_use]
pub fn title_uri(el: &Element) -> Option<String> {
    let source = el.non_empty_attribute("source")?.to_ascii_lowercase();
    let id = el.non_empty_attribute("authfilenumber")?;
    match source.as_str() {
        "isbn" => Some(format!("urn:ISBN:{id}")),
        "issn" => Some(format!("urn:ISSN:{id}")),
        "oclc" => Some(format!("http://www.worldcat.org/oclc/{id}")),
        _ => None,
    }
}

/// Bibliographic type of a title
#[must_use]
pub fn title_type(el: &Element) -> &'static str {
    let source = el
        .non_empty_attribute("source")
        .map(|s| s.to_ascii_lowercase());
    match source.as_deref() {
        Some("isbn" | "oclc") => return "bibo:Book",
        Some("issn") => return "bibo:Periodical",
        _ => {}
    }
    match el.non_empty_attribute("type").as_deref() {
        Some("article") => "bibo:Article",
        Some(_) => "bibo:Manuscript",
        None => "bibo:Document",
    }
}

/// Relation for a `controlaccess` term's MARC `encodinganalog`
#[must_use]
pub fn controlaccess_relation(code: &str) -> Option<&'static str> {
    match code {
        "600" | "610" | "611" | "630" | "650" | "651" => Some("schema:about"),
        "700" | "710" | "711" => Some("dc:contributor"),
        _ => None,
    }
}

/// Relation from a biographical note to a name it contains
#[must_use]
pub fn bioghist_relation(origination: OriginationKind, tag: &str) -> Option<&'static str> {
    match (origination, tag) {
        (OriginationKind::Person, "persname") => Some("schema:knows"),
        (_, "persname" | "corpname" | "famname") => Some("schema:affiliation"),
        _ => None,
    }
}

/// Where an element sits: its ancestors, root first
#[derive(Debug, Clone, Copy)]
pub struct Placement<'a> {
    ancestors: &'a [&'a Element],
    origination: Option<OriginationKind>,
}

impl<'a> Placement<'a> {
    /// Placement below `ancestors` in a collection with this origination
    #[must_use]
    pub fn new(ancestors: &'a [&'a Element], origination: Option<OriginationKind>) -> Self {
        Self {
            ancestors,
            origination,
        }
    }

    /// Direct parent
    #[must_use]
    pub fn parent(&self) -> Option<&'a Element> {
        self.ancestors.last().copied()
    }

    /// True when any ancestor has this local name
    #[must_use]
    pub fn within(&self, local: &str) -> bool {
        self.ancestors.iter().any(|el| el.is(local))
    }

    /// Any of the local names
    #[must_use]
    pub fn within_any(&self, locals: &[&str]) -> bool {
        locals.iter().any(|local| self.within(local))
    }

    /// Closest ancestor with this local name
    #[must_use]
    pub fn nearest(&self, local: &str) -> Option<&'a Element> {
        self.ancestors.iter().rev().find(|el| el.is(local)).copied()
    }

    /// True when `unittitle` describes a file-level component
    fn file_level(&self, unittitle: &Element) -> bool {
        if unittitle.attribute("level").as_deref() == Some("file") {
            return true;
        }
        self.ancestors
            .iter()
            .rev()
            .find(|el| is_component(el))
            .is_some_and(|c| c.attribute("level").as_deref() == Some("file"))
    }

    /// RDFa wrapper for a name element, `None` when it stays unmarked
    #[must_use]
    pub fn name(&self, el: &Element) -> Option<Wrapper> {
        let relation = match el.non_empty_attribute("role") {
            Some(role) => role,
            None => self.inferred_relation(el)?.to_string(),
        };
        let kind = name_type(el.local_name());
        let item = match name_uri(el) {
            Some(uri) => Wrapper::span(&[("typeof", kind), ("about", uri.as_str())]),
            None => Wrapper::span(&[("typeof", kind)]),
        };
        Some(
            Wrapper::span(&[("rel", relation.as_str())])
                .wrap(item)
                .wrap(Wrapper::span(&[("property", "schema:name")])),
        )
    }

    fn inferred_relation(&self, el: &Element) -> Option<&'static str> {
        let tag = el.local_name();
        if let Some(unittitle) = self.nearest("unittitle") {
            if self.file_level(unittitle) && unittitle.child("title").is_some() {
                return None;
            }
        }
        if self.parent().is_some_and(|p| p.is("controlaccess")) {
            if let Some(relation) = el
                .non_empty_attribute("encodinganalog")
                .as_deref()
                .and_then(controlaccess_relation)
            {
                return Some(relation);
            }
        }
        if self.within("bioghist") {
            if tag == "geogname" {
                return None;
            }
            if let Some(relation) = self
                .origination
                .and_then(|kind| bioghist_relation(kind, tag))
            {
                return Some(relation);
            }
        }
        Some(MENTIONS)
    }

    /// RDFa wrapper for a date element
    #[must_use]
    pub fn date(&self, el: &Element) -> Wrapper {
        match el.non_empty_attribute("normal") {
            Some(normal) => Wrapper::span(&[("property", "dc:date"), ("content", normal.as_str())]),
            None => Wrapper::span(&[("property", "dc:date")]),
        }
    }

    /// RDFa wrapper for a title, `None` when it stays unmarked
    #[must_use]
    pub fn title(&self, el: &Element) -> Option<Wrapper> {
        if self.within("bioghist") {
            return None;
        }
        if self.within("scopecontent") && title_uri(el).is_none() {
            return None;
        }
        if let Some(unittitle) = self.parent().filter(|p| p.is("unittitle")) {
            if has_creator_role(unittitle) {
                return Some(Wrapper::span(&[
                    ("inlist", "inlist"),
                    ("property", "dc:title"),
                ]));
            }
            let titles: Vec<&Element> = unittitle.children_named("title").collect();
            if titles.len() > 1 {
                return match titles.iter().position(|t| std::ptr::eq(*t, el)) {
                    Some(0) => Some(titled_item(el, title_uri(titles[1]).as_deref())),
                    Some(1) => Some(titled_item(el, None)),
                    _ => None,
                };
            }
        }
        if el.has_attribute("source") || el.has_attribute("type") {
            return Some(titled_item(el, None));
        }
        None
    }

    /// Anchor for an `extref`
    #[must_use]
    pub fn extref(&self, el: &Element, rdfa: bool) -> Wrapper {
        let Some(href) = el
            .attribute("xlink:href")
            .or_else(|| el.attribute_local("href"))
        else {
            return Wrapper::tag("a", &[]);
        };
        if rdfa && self.within_any(&["relatedmaterial", "separatedmaterial"]) {
            Wrapper::tag("a", &[("rel", "dc:relation"), ("href", href.as_ref())])
        } else {
            Wrapper::tag("a", &[("href", href.as_ref())])
        }
    }
}

/// True when a unit title directly contains a name with a role
fn has_creator_role(unittitle: &Element) -> bool {
    unittitle
        .elements()
        .any(|el| NAME_TAGS.contains(&el.local_name()) && el.non_empty_attribute("role").is_some())
}

/// Typed bibliographic item mentioned by the surrounding description
fn titled_item(el: &Element, part_of: Option<&str>) -> Wrapper {
    let kind = title_type(el);
    let item = match title_uri(el) {
        Some(uri) => Wrapper::span(&[("typeof", kind), ("about", uri.as_str())]),
        None => Wrapper::span(&[("typeof", kind)]),
    };

    let mut trailer = String::new();
    if let Some(genre) = el
        .non_empty_attribute("type")
        .filter(|genre| genre != "article")
    {
        trailer.push_str(&empty_span(&[
            ("property", "schema:genre"),
            ("content", genre.as_str()),
        ]));
    }
    let source = el.non_empty_attribute("source").map(|s| s.to_ascii_lowercase());
    if let (Some(source @ ("isbn" | "issn")), Some(number)) =
        (source.as_deref(), el.non_empty_attribute("authfilenumber"))
    {
        let property = format!("schema:{source}");
        trailer.push_str(&empty_span(&[("property", property.as_str()), ("content", number.as_str())]));
    }
    if let Some(whole) = part_of {
        trailer.push_str(&empty_span(&[("rel", "dc:isPartOf"), ("resource", whole)]));
    }

    Wrapper::span(&[("rel", MENTIONS)])
        .wrap(item.close_with(&trailer))
        .wrap(Wrapper::span(&[("property", "dc:title")]))
}
