//! Built-in EAD 2002 element and attribute rules
//!
//! Covers what publication depends on:
//! - the root is `ead` and every element name is an EAD element
//! - attributes are allowed for their element
//! - required children and attributes of the header and archdesc are present
//! - `level` values come from the EAD level list
//!
//! Namespace declarations and prefixed attributes (`xlink:`, `xsi:`, `xml:`)
//! are always allowed. Elements carrying a prefix other than the root's are
//! foreign markup and are not checked themselves.

use crate::problem::{Check, Problem};
use fa_ead::{Document, Element};
use once_cell::sync::Lazy;
use std::collections::HashMap;

const COMMON: &[&str] = &["id", "altrender", "audience", "encodinganalog"];

const LINK: &[&str] = &[
    "linktype", "href", "role", "arcrole", "title", "show", "actuate", "target", "entityref",
    "xpointer", "label", "from", "to",
];

const NAME: &[&str] = &["source", "rules", "normal", "role", "authfilenumber"];

const DATE: &[&str] = &["type", "normal", "calendar", "era", "certainty"];

const COMPONENT: &[&str] = &["level", "otherlevel", "tpattern"];

const LEVELS: &[&str] = &[
    "class",
    "collection",
    "file",
    "fonds",
    "item",
    "otherlevel",
    "recordgrp",
    "series",
    "subfonds",
    "subgrp",
    "subseries",
];

/// Elements and the attributes they accept beyond the common ones
const ELEMENTS: &[(&str, &[&[&str]])] = &[
    ("abbr", &[&["expan"]]),
    ("abstract", &[&["label", "langcode"]]),
    ("accessrestrict", &[&["type"]]),
    ("accruals", &[]),
    ("acqinfo", &[]),
    ("address", &[]),
    ("addressline", &[]),
    ("altformavail", &[&["type"]]),
    ("appraisal", &[]),
    ("archdesc", &[&["level", "otherlevel", "type", "relatedencoding"]]),
    ("archdescgrp", &[&["level", "type"]]),
    ("archref", &[LINK]),
    ("arc", &[LINK]),
    ("arrangement", &[]),
    ("author", &[]),
    ("bibliography", &[]),
    ("bibref", &[LINK]),
    ("bibseries", &[]),
    ("bioghist", &[]),
    ("blockquote", &[]),
    ("c", &[COMPONENT]),
    ("c01", &[COMPONENT]),
    ("c02", &[COMPONENT]),
    ("c03", &[COMPONENT]),
    ("c04", &[COMPONENT]),
    ("c05", &[COMPONENT]),
    ("c06", &[COMPONENT]),
    ("c07", &[COMPONENT]),
    ("c08", &[COMPONENT]),
    ("c09", &[COMPONENT]),
    ("c10", &[COMPONENT]),
    ("c11", &[COMPONENT]),
    ("c12", &[COMPONENT]),
    ("change", &[]),
    ("chronitem", &[]),
    ("chronlist", &[]),
    ("colspec", &[&["colnum", "colname", "colwidth", "align", "char", "charoff", "colsep", "rowsep"]]),
    ("container", &[&["type", "label", "parent"]]),
    ("controlaccess", &[]),
    ("corpname", &[NAME]),
    ("creation", &[]),
    ("custodhist", &[]),
    ("dao", &[LINK]),
    ("daodesc", &[]),
    ("daogrp", &[LINK]),
    ("daoloc", &[LINK]),
    ("date", &[DATE]),
    ("defitem", &[]),
    ("descgrp", &[&["type"]]),
    ("descrules", &[]),
    ("did", &[]),
    ("dimensions", &[&["type", "label", "unit"]]),
    ("div", &[]),
    ("dsc", &[&["type", "othertype", "tpattern"]]),
    ("dscgrp", &[]),
    ("ead", &[&["relatedencoding"]]),
    ("eadgrp", &[]),
    (
        "eadheader",
        &[&[
            "langencoding",
            "scriptencoding",
            "relatedencoding",
            "repositoryencoding",
            "countryencoding",
            "dateencoding",
            "findaidstatus",
        ]],
    ),
    ("eadid", &[&["countrycode", "mainagencycode", "url", "urn", "publicid", "identifier"]]),
    ("edition", &[]),
    ("editionstmt", &[]),
    ("emph", &[&["render"]]),
    (
        "entry",
        &[&["colname", "namest", "nameend", "morerows", "align", "char", "charoff", "valign", "rowsep", "colsep"]],
    ),
    ("event", &[]),
    ("eventgrp", &[]),
    ("expan", &[&["abbr"]]),
    ("extent", &[&["type", "label", "unit"]]),
    ("extptr", &[LINK]),
    ("extptrloc", &[LINK]),
    ("extref", &[LINK]),
    ("extrefloc", &[LINK]),
    ("famname", &[NAME]),
    ("filedesc", &[]),
    ("fileplan", &[]),
    ("frontmatter", &[]),
    ("function", &[NAME]),
    ("genreform", &[NAME, &["type"]]),
    ("geogname", &[NAME]),
    ("head", &[&["althead"]]),
    ("head01", &[]),
    ("head02", &[]),
    ("imprint", &[]),
    ("index", &[]),
    ("indexentry", &[]),
    ("item", &[]),
    ("label", &[]),
    ("langmaterial", &[&["label"]]),
    ("language", &[&["langcode", "scriptcode"]]),
    ("langusage", &[]),
    ("lb", &[]),
    ("legalstatus", &[&["type"]]),
    ("linkgrp", &[&["linktype"]]),
    ("list", &[&["type", "mark", "numeration", "continuation"]]),
    ("listhead", &[]),
    ("materialspec", &[&["type", "label", "unit"]]),
    ("name", &[NAME]),
    ("namegrp", &[]),
    ("note", &[&["type", "label", "actuate", "show"]]),
    ("notestmt", &[]),
    ("num", &[&["type"]]),
    ("occupation", &[NAME]),
    ("odd", &[&["type"]]),
    ("origination", &[&["label"]]),
    ("originalsloc", &[]),
    ("otherfindaid", &[]),
    ("p", &[]),
    ("persname", &[NAME]),
    ("physdesc", &[&["label", "source", "rules"]]),
    ("physfacet", &[NAME, &["type", "label"]]),
    ("physloc", &[&["type", "label", "parent"]]),
    ("phystech", &[]),
    ("prefercite", &[]),
    ("processinfo", &[]),
    ("profiledesc", &[]),
    ("ptr", &[LINK]),
    ("ptrgrp", &[]),
    ("ptrloc", &[LINK]),
    ("publicationstmt", &[]),
    ("publisher", &[]),
    ("ref", &[LINK]),
    ("refloc", &[LINK]),
    ("relatedmaterial", &[]),
    ("repository", &[&["label"]]),
    ("resource", &[&["linktype", "label"]]),
    ("revisiondesc", &[]),
    ("row", &[&["valign", "rowsep"]]),
    ("runner", &[&["placement", "orientation"]]),
    ("scopecontent", &[]),
    ("separatedmaterial", &[]),
    ("sponsor", &[]),
    ("subarea", &[]),
    ("subject", &[NAME]),
    ("subtitle", &[&["render"]]),
    ("table", &[&["frame", "colsep", "rowsep", "pgwide"]]),
    ("tbody", &[&["valign"]]),
    ("tgroup", &[&["cols", "colsep", "rowsep", "align"]]),
    ("thead", &[&["valign"]]),
    ("title", &[LINK, &["render", "type", "normal", "authfilenumber", "source", "rules"]]),
    ("titlepage", &[]),
    ("titleproper", &[&["type", "render"]]),
    ("titlestmt", &[]),
    ("unitdate", &[DATE, &["datechar", "label"]]),
    ("unitid", &[&["countrycode", "repositorycode", "type", "label", "identifier"]]),
    ("unittitle", &[&["type", "label"]]),
    ("userestrict", &[&["type"]]),
];

/// Children an element must contain
const REQUIRED_CHILDREN: &[(&str, &[&str])] = &[
    ("ead", &["eadheader", "archdesc"]),
    ("eadheader", &["eadid", "filedesc"]),
    ("filedesc", &["titlestmt"]),
    ("titlestmt", &["titleproper"]),
    ("archdesc", &["did"]),
];

/// Attributes an element must carry
const REQUIRED_ATTRIBUTES: &[(&str, &[&str])] = &[("archdesc", &["level"])];

static ALLOWED: Lazy<HashMap<&'static str, Vec<&'static str>>> = Lazy::new(|| {
    ELEMENTS
        .iter()
        .map(|(name, groups)| {
            let attrs = COMMON
                .iter()
                .chain(groups.iter().flat_map(|group| group.iter()))
                .copied()
                .collect();
            (*name, attrs)
        })
        .collect()
});

fn lookup(
    table: &'static [(&'static str, &'static [&'static str])],
    local: &str,
) -> &'static [&'static str] {
    table
        .iter()
        .find(|(name, _)| *name == local)
        .map_or(&[], |(_, values)| *values)
}

fn is_namespace_or_prefixed(attr: &str) -> bool {
    attr == "xmlns" || attr.contains(':')
}

/// Element and attribute rule checker
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaChecker;

impl SchemaChecker {
    /// Create checker
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// True when `local` is an EAD element name
    #[must_use]
    pub fn is_known_element(local: &str) -> bool {
        ALLOWED.contains_key(local)
    }

    /// One problem per rule violation, in document order
    #[must_use]
    pub fn check(&self, doc: &Document) -> Vec<Problem> {
        let root = doc.root();
        let mut problems = Vec::new();
        if !root.is("ead") {
            problems.push(located(
                root,
                format!(
                    "Element '{}': No matching global declaration available for the validation root.",
                    root.name()
                ),
            ));
            return problems;
        }
        walk(root, root.prefix(), &mut problems);
        problems
    }
}

fn located(el: &Element, message: String) -> Problem {
    let position = el.position();
    Problem::new(
        Check::Schema,
        format!("Line {}, column {}: {message}", position.line, position.column),
    )
}

fn walk(el: &Element, ead_prefix: Option<&str>, problems: &mut Vec<Problem>) {
    if el.prefix() == ead_prefix {
        check_element(el, problems);
    }
    for child in el.elements() {
        walk(child, ead_prefix, problems);
    }
}

fn check_element(el: &Element, problems: &mut Vec<Problem>) {
    let local = el.local_name();
    let Some(allowed) = ALLOWED.get(local) else {
        problems.push(located(
            el,
            format!("Element '{}': This element is not expected.", el.name()),
        ));
        return;
    };

    for (attr, value) in el.attributes() {
        if is_namespace_or_prefixed(attr) {
            continue;
        }
        if !allowed.contains(&attr) {
            problems.push(located(
                el,
                format!(
                    "Element '{}', attribute '{attr}': The attribute '{attr}' is not allowed.",
                    el.name()
                ),
            ));
        } else if attr == "level" && !LEVELS.contains(&value.as_ref()) {
            let set = LEVELS
                .iter()
                .map(|level| format!("'{level}'"))
                .collect::<Vec<_>>()
                .join(", ");
            problems.push(located(
                el,
                format!(
                    "Element '{}', attribute 'level': [facet 'enumeration'] The value '{value}' is not an element of the set {{{set}}}.",
                    el.name()
                ),
            ));
        }
    }

    for required in lookup(REQUIRED_ATTRIBUTES, local) {
        if !el.has_attribute(required) {
            problems.push(located(
                el,
                format!(
                    "Element '{}': The attribute '{required}' is required but missing.",
                    el.name()
                ),
            ));
        }
    }

    let missing: Vec<&str> = lookup(REQUIRED_CHILDREN, local)
        .iter()
        .copied()
        .filter(|child| el.child(child).is_none())
        .collect();
    if !missing.is_empty() {
        problems.push(located(
            el,
            format!(
                "Element '{}': Missing child element(s). Expected is ( {} ).",
                el.name(),
                missing.join(", ")
            ),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MINIMAL: &str = r#"<ead xmlns:xlink="http://www.w3.org/1999/xlink">
<eadheader><eadid>a</eadid><filedesc><titlestmt><titleproper>A</titleproper></titlestmt></filedesc></eadheader>
<archdesc level="collection"><did><unittitle>A</unittitle></did>
<dsc><c01 level="series"><did><unittitle>S <extref xlink:href="http://x/">x</extref></unittitle></did></c01></dsc>
</archdesc></ead>"#;

    fn check(src: &str) -> Vec<String> {
        let doc = Document::parse(src).unwrap();
        SchemaChecker::new()
            .check(&doc)
            .into_iter()
            .map(|p| p.message)
            .collect()
    }

    #[test]
    fn minimal_document_is_valid() {
        assert!(check(MINIMAL).is_empty());
    }

    #[test]
    fn disallowed_attribute_reported_with_position() {
        let src = MINIMAL.replace("<c01 level=\"series\">", "<c01 level=\"series\" invalid=\"yes\">");
        assert_eq!(
            check(&src),
            vec!["Line 4, column 6: Element 'c01', attribute 'invalid': The attribute 'invalid' is not allowed."]
        );
    }

    #[test]
    fn unknown_element_reported() {
        let src = MINIMAL.replace("<unittitle>A</unittitle>", "<unittitle>A</unittitle><bogus/>");
        let problems = check(&src);
        assert_eq!(problems.len(), 1);
        assert!(problems[0].ends_with("Element 'bogus': This element is not expected."));
    }

    #[test]
    fn missing_required_parts() {
        let src = "<ead><eadheader><eadid>a</eadid></eadheader><archdesc><did/></archdesc></ead>";
        assert_eq!(
            check(src),
            vec![
                "Line 1, column 6: Element 'eadheader': Missing child element(s). Expected is ( filedesc ).",
                "Line 1, column 45: Element 'archdesc': The attribute 'level' is required but missing.",
            ]
        );
    }

    #[test]
    fn bad_level_value() {
        let src = MINIMAL.replace("level=\"series\"", "level=\"box\"");
        let problems = check(&src);
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("[facet 'enumeration'] The value 'box'"));
    }

    #[test]
    fn wrong_root() {
        let problems = check("<html/>");
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("validation root"));
    }

    #[test]
    fn foreign_elements_are_skipped() {
        let src = MINIMAL.replace(
            "<unittitle>A</unittitle>",
            "<unittitle>A <exist:match xmlns:exist=\"http://exist.sourceforge.net/NS/exist\">A</exist:match></unittitle>",
        );
        assert!(check(&src).is_empty());
    }

    #[test]
    fn known_elements() {
        assert!(SchemaChecker::is_known_element("c12"));
        assert!(!SchemaChecker::is_known_element("c13"));
    }
}
