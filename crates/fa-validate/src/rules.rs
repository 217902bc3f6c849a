//! Content rules for publishable finding aids
//!
//! Each rule inspects a parsed [`FindingAid`] and reports zero or more
//! [`Problem`]s. Rules never touch the store and never fail.

use crate::problem::{Check, Problem};
use fa_ead::{is_ark, Element, FindingAid, Series};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

/// Characters allowed in an eadid so it can be used in site URLs
pub const EADID_URL_PATTERN: &str = "^[-_A-Za-z0-9.]+$";

/// Browse letters the site links to
pub const TITLE_LETTERS: &str = "[a-zA-Z]";

static EADID_URL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(EADID_URL_PATTERN).expect("valid eadid pattern"));

static TITLE_LETTERS_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(TITLE_LETTERS).expect("valid browse letter pattern"));

/// A single content check
pub trait ValidationRule: Send + Sync {
    /// Problems found in `ead`, in document order
    fn check(&self, ead: &FindingAid) -> Vec<Problem>;

    /// Check this rule reports
    fn rule_id(&self) -> Check;
}

/// Every series, subseries and sub-subseries has an id
#[derive(Debug, Default, Clone, Copy)]
pub struct SeriesIdRule;

fn missing_series_ids(series: &Series<'_>, problems: &mut Vec<Problem>) {
    if series.id().is_none() {
        problems.push(Problem::new(
            Check::SeriesId,
            format!(
                "{} {} id attribute is not set for {}",
                series.level(),
                series.tag(),
                series.display_label()
            ),
        ));
    }
    for child in series.subseries() {
        missing_series_ids(&child, problems);
    }
}

impl ValidationRule for SeriesIdRule {
    fn check(&self, ead: &FindingAid) -> Vec<Problem> {
        let mut problems = Vec::new();
        for series in ead.series() {
            missing_series_ids(&series, &mut problems);
        }
        problems
    }

    fn rule_id(&self) -> Check {
        Check::SeriesId
    }
}

/// Every `archdesc/index` has an id
#[derive(Debug, Default, Clone, Copy)]
pub struct IndexIdRule;

impl ValidationRule for IndexIdRule {
    fn check(&self, ead: &FindingAid) -> Vec<Problem> {
        ead.indexes()
            .into_iter()
            .filter(|index| index.id().is_none())
            .map(|index| {
                Problem::new(
                    Check::IndexId,
                    format!("{} id attribute is not set for {}", index.tag(), index.head()),
                )
            })
            .collect()
    }

    fn rule_id(&self) -> Check {
        Check::IndexId
    }
}

/// Series, subseries and index ids are unique within the document
#[derive(Debug, Default, Clone, Copy)]
pub struct DuplicateIdRule;

fn collect_series_ids(series: &Series<'_>, counts: &mut BTreeMap<String, (usize, usize)>, order: &mut usize) {
    if let Some(id) = series.id() {
        count_id(id, counts, order);
    }
    for child in series.subseries() {
        collect_series_ids(&child, counts, order);
    }
}

fn count_id(id: String, counts: &mut BTreeMap<String, (usize, usize)>, order: &mut usize) {
    let entry = counts.entry(id).or_insert((*order, 0));
    entry.1 += 1;
    *order += 1;
}

impl ValidationRule for DuplicateIdRule {
    fn check(&self, ead: &FindingAid) -> Vec<Problem> {
        // id -> (first seen, count)
        let mut counts = BTreeMap::new();
        let mut order = 0;
        for series in ead.series() {
            collect_series_ids(&series, &mut counts, &mut order);
        }
        for index in ead.indexes() {
            if let Some(id) = index.id() {
                count_id(id, &mut counts, &mut order);
            }
        }
        let mut duplicates: Vec<_> = counts
            .into_iter()
            .filter(|(_, (_, count))| *count > 1)
            .collect();
        duplicates.sort_by_key(|(_, (first, _))| *first);
        duplicates
            .into_iter()
            .map(|(id, (_, count))| {
                Problem::new(
                    Check::DuplicateId,
                    format!("Duplicate id '{id}' is used by {count} components"),
                )
            })
            .collect()
    }

    fn rule_id(&self) -> Check {
        Check::DuplicateId
    }
}

/// eadid only uses characters allowed in site URLs
#[derive(Debug, Default, Clone, Copy)]
pub struct EadidPatternRule;

impl ValidationRule for EadidPatternRule {
    fn check(&self, ead: &FindingAid) -> Vec<Problem> {
        let eadid = ead.eadid_value();
        if EADID_URL_REGEX.is_match(&eadid) {
            return Vec::new();
        }
        vec![Problem::new(
            Check::EadidPattern,
            format!("eadid '{eadid}' does not match site URL regular expression"),
        )]
    }

    fn rule_id(&self) -> Check {
        Check::EadidPattern
    }
}

/// At most one collection-level origination
#[derive(Debug, Default, Clone, Copy)]
pub struct OriginationRule;

impl ValidationRule for OriginationRule {
    fn check(&self, ead: &FindingAid) -> Vec<Problem> {
        let count = ead.originations().len();
        if count <= 1 {
            return Vec::new();
        }
        vec![Problem::new(
            Check::Origination,
            format!("Site expects only one archdesc/did/origination; found {count}"),
        )]
    }

    fn rule_id(&self) -> Check {
        Check::Origination
    }
}

/// Every did holding containers holds exactly two
#[derive(Debug, Default, Clone, Copy)]
pub struct ContainerRule;

fn did_detail(did: &Element, containers: usize) -> String {
    let noun = if containers == 1 { "container" } else { "containers" };
    format!("Line {}: did with {containers} {noun}", did.line())
}

impl ValidationRule for ContainerRule {
    fn check(&self, ead: &FindingAid) -> Vec<Problem> {
        let mut too_many = Vec::new();
        let mut only_one = Vec::new();
        for did in ead.dids() {
            match did.children_named("container").count() {
                0 | 2 => {}
                1 => only_one.push(did_detail(did, 1)),
                n => too_many.push(did_detail(did, n)),
            }
        }

        let mut problems = Vec::new();
        if !too_many.is_empty() {
            problems.push(
                Problem::new(
                    Check::Containers,
                    format!(
                        "Site expects maximum of 2 containers per did; found {} did(s) with more than 2",
                        too_many.len()
                    ),
                )
                .with_details(too_many),
            );
        }
        if !only_one.is_empty() {
            problems.push(
                Problem::new(
                    Check::Containers,
                    format!(
                        "Site expects 2 containers per did; found {} did(s) with only 1",
                        only_one.len()
                    ),
                )
                .with_details(only_one),
            );
        }
        problems
    }

    fn rule_id(&self) -> Check {
        Check::Containers
    }
}

/// List title is present, has no leading whitespace and starts with a browse letter
#[derive(Debug, Default, Clone, Copy)]
pub struct ListTitleRule;

impl ValidationRule for ListTitleRule {
    fn check(&self, ead: &FindingAid) -> Vec<Problem> {
        let Some(title) = ead.list_title() else {
            return vec![Problem::new(Check::ListTitle, "List title seems to be empty")];
        };
        let element = title.element();
        if element.normalized_text().is_empty() {
            return vec![Problem::new(Check::ListTitle, "List title seems to be empty")];
        }
        if element.has_leading_whitespace() {
            return vec![Problem::new(
                Check::ListTitle,
                format!(
                    "Found leading whitespace in list title field ({}): '{}'",
                    title.field(),
                    element.leading_text()
                ),
            )];
        }
        match ead.first_letter() {
            Some(letter) if !TITLE_LETTERS_REGEX.is_match(&letter.to_string()) => {
                vec![Problem::new(
                    Check::FirstLetter,
                    format!(
                        "First letter ('{letter}') of list title field {} does not match browse letter URL regex '{TITLE_LETTERS}'",
                        title.field()
                    ),
                )]
            }
            _ => Vec::new(),
        }
    }

    fn rule_id(&self) -> Check {
        Check::ListTitle
    }
}

/// Control-access terms have no leading whitespace
#[derive(Debug, Default, Clone, Copy)]
pub struct ControlaccessRule;

impl ValidationRule for ControlaccessRule {
    fn check(&self, ead: &FindingAid) -> Vec<Problem> {
        ead.controlaccess_terms()
            .into_iter()
            .filter(|term| term.has_leading_whitespace())
            .map(|term| {
                Problem::new(
                    Check::Controlaccess,
                    format!(
                        "Found leading whitespace in controlaccess term '{}' ({})",
                        term.leading_text(),
                        term.local_name()
                    ),
                )
            })
            .collect()
    }

    fn rule_id(&self) -> Check {
        Check::Controlaccess
    }
}

/// `eadid/@url` and `eadid/@identifier` hold matching ARKs
#[derive(Debug, Default, Clone, Copy)]
pub struct ArkRule;

impl ValidationRule for ArkRule {
    fn check(&self, ead: &FindingAid) -> Vec<Problem> {
        let url = ead.eadid_url().filter(|url| is_ark(url));
        let identifier = ead.eadid_identifier().filter(|id| is_ark(id));

        let mut problems = Vec::new();
        if url.is_none() {
            problems.push(Problem::new(
                Check::ArkUrl,
                "eadid url is either not set or not an ARK. To correct, run the prep process again.",
            ));
        }
        if identifier.is_none() {
            problems.push(Problem::new(
                Check::ArkIdentifier,
                "eadid identifier is either not set or not an ARK. To correct, run the prep process again.",
            ));
        }
        if let (Some(url), Some(identifier)) = (url, identifier) {
            if !url.ends_with(&identifier) {
                problems.push(Problem::new(
                    Check::ArkMismatch,
                    format!(
                        "eadid url and identifier do not match: url '{url}' should end with identifier '{identifier}'"
                    ),
                ));
            }
        }
        problems
    }

    fn rule_id(&self) -> Check {
        Check::ArkMismatch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ead(body: &str) -> FindingAid {
        FindingAid::parse(body).unwrap()
    }

    fn messages(rule: &dyn ValidationRule, ead: &FindingAid) -> Vec<String> {
        rule.check(ead).into_iter().map(|p| p.message).collect()
    }

    const SERIES: &str = r#"<ead><eadheader><eadid>abc1</eadid></eadheader>
<archdesc level="collection"><did><unittitle>Papers</unittitle></did>
<dsc>
  <c01 level="series" id="abc1_series1"><did><unitid>Series 1</unitid><unittitle>Letters</unittitle></did></c01>
  <c01 level="series"><did><unittitle>Photographs</unittitle></did>
    <c02 level="subseries"><did><unitid>Subseries 2.1</unitid><unittitle>Portraits</unittitle></did>
      <c03 level="subsubseries"><did><unittitle>Studio</unittitle></did>
        <c04 level="otherlevel"><did><unittitle>Too deep</unittitle></did></c04>
      </c03>
    </c02>
  </c01>
</dsc>
<index><head>Index of Correspondents</head></index>
<index id="abc1_index2"><head>Index of Places</head></index>
</archdesc></ead>"#;

    #[test]
    fn series_rule_walks_three_levels() {
        assert_eq!(
            messages(&SeriesIdRule, &ead(SERIES)),
            vec![
                "series c01 id attribute is not set for Photographs",
                "subseries c02 id attribute is not set for Subseries 2.1: Portraits",
                "subsubseries c03 id attribute is not set for Studio",
            ]
        );
    }

    #[test]
    fn series_rule_ignores_dsc_without_series() {
        let doc = ead(r#"<ead><archdesc level="collection"><dsc><c01 level="file"><did/></c01></dsc></archdesc></ead>"#);
        assert!(SeriesIdRule.check(&doc).is_empty());
    }

    #[test]
    fn index_rule_uses_head() {
        assert_eq!(
            messages(&IndexIdRule, &ead(SERIES)),
            vec!["index id attribute is not set for Index of Correspondents"]
        );
    }

    #[test]
    fn duplicate_ids_reported_once_in_first_seen_order() {
        let doc = ead(r#"<ead><archdesc level="collection"><dsc>
<c01 level="series" id="x_b"><did/></c01>
<c01 level="series" id="x_a"><did/></c01>
<c01 level="series" id="x_b"><did/></c01>
</dsc><index id="x_a"/><index id="x_c"/></archdesc></ead>"#);
        assert_eq!(
            messages(&DuplicateIdRule, &doc),
            vec![
                "Duplicate id 'x_b' is used by 2 components",
                "Duplicate id 'x_a' is used by 2 components",
            ]
        );
    }

    #[test]
    fn eadid_pattern() {
        let good = ead("<ead><eadheader><eadid>abbey-244_a.b</eadid></eadheader></ead>");
        assert!(EadidPatternRule.check(&good).is_empty());
        let bad = ead("<ead><eadheader><eadid>foo#~@/</eadid></eadheader></ead>");
        assert_eq!(
            messages(&EadidPatternRule, &bad),
            vec!["eadid 'foo#~@/' does not match site URL regular expression"]
        );
        let missing = ead("<ead/>");
        assert_eq!(EadidPatternRule.check(&missing).len(), 1);
    }

    #[test]
    fn origination_count() {
        let doc = ead(r#"<ead><archdesc level="collection"><did>
<origination><persname>A</persname></origination>
<origination><corpname>B</corpname></origination>
</did></archdesc></ead>"#);
        assert_eq!(
            messages(&OriginationRule, &doc),
            vec!["Site expects only one archdesc/did/origination; found 2"]
        );
    }

    #[test]
    fn container_counts_with_details() {
        let doc = ead(r#"<ead><archdesc level="collection"><did/>
<dsc>
<c01><did><container>1</container><container>2</container></did></c01>
<c01><did><container>1</container><container>2</container><container>3</container></did></c01>
<c01><did><container>4</container></did></c01>
</dsc></archdesc></ead>"#);
        let problems = ContainerRule.check(&doc);
        assert_eq!(problems.len(), 2);
        assert_eq!(
            problems[0].message,
            "Site expects maximum of 2 containers per did; found 1 did(s) with more than 2"
        );
        assert_eq!(problems[0].details, vec!["Line 4: did with 3 containers"]);
        assert_eq!(
            problems[1].message,
            "Site expects 2 containers per did; found 1 did(s) with only 1"
        );
        assert_eq!(problems[1].details, vec!["Line 5: did with 1 container"]);
    }

    #[test]
    fn list_title_whitespace_skips_first_letter() {
        let doc = ead(r#"<ead><archdesc level="collection"><did><unittitle>Papers</unittitle>
<origination><persname>  Hartsfield, William Berry.</persname></origination></did></archdesc></ead>"#);
        assert_eq!(
            messages(&ListTitleRule, &doc),
            vec!["Found leading whitespace in list title field (origination/persname): '  Hartsfield, William Berry.'"]
        );
    }

    #[test]
    fn list_title_first_letter() {
        let doc = ead(r#"<ead><archdesc level="collection"><did>
<origination><persname>1234</persname></origination></did></archdesc></ead>"#);
        assert_eq!(
            messages(&ListTitleRule, &doc),
            vec!["First letter ('1') of list title field origination/persname does not match browse letter URL regex '[a-zA-Z]'"]
        );
    }

    #[test]
    fn list_title_empty() {
        let doc = ead(r#"<ead><archdesc level="collection"><did>
<origination><persname/></origination></did></archdesc></ead>"#);
        assert_eq!(messages(&ListTitleRule, &doc), vec!["List title seems to be empty"]);
        let none = ead(r#"<ead><archdesc level="collection"><did/></archdesc></ead>"#);
        assert_eq!(messages(&ListTitleRule, &none), vec!["List title seems to be empty"]);
    }

    #[test]
    fn list_title_leading_child_element_is_not_whitespace() {
        let doc = ead(r#"<ead><archdesc level="collection"><did>
<unittitle><title>Gone with the wind</title> scrapbook</unittitle></did></archdesc></ead>"#);
        assert!(ListTitleRule.check(&doc).is_empty());
    }

    #[test]
    fn controlaccess_terms_with_leading_whitespace() {
        let doc = ead("<ead><archdesc level=\"collection\"><controlaccess>\
<controlaccess><title> Gone with the wind (Motion picture)</title></controlaccess>\
<controlaccess><persname>  \t   Selznick, David O., 1902-1965.</persname><persname>Allen, Ivan.</persname></controlaccess>\
</controlaccess></archdesc></ead>");
        assert_eq!(
            messages(&ControlaccessRule, &doc),
            vec![
                "Found leading whitespace in controlaccess term ' Gone with the wind (Motion picture)' (title)",
                "Found leading whitespace in controlaccess term '  \t   Selznick, David O., 1902-1965.' (persname)",
            ]
        );
    }

    #[test]
    fn ark_attributes() {
        let missing = ead("<ead><eadheader><eadid>abc1</eadid></eadheader></ead>");
        let problems = ArkRule.check(&missing);
        assert_eq!(
            problems.iter().map(|p| p.check).collect::<Vec<_>>(),
            vec![Check::ArkUrl, Check::ArkIdentifier]
        );

        let mismatch = ead(r#"<ead><eadheader><eadid url="http://testpid.library.emory.edu/ark:/25593/1234" identifier="ark:/25593/567">abc1</eadid></eadheader></ead>"#);
        assert_eq!(
            messages(&ArkRule, &mismatch),
            vec!["eadid url and identifier do not match: url 'http://testpid.library.emory.edu/ark:/25593/1234' should end with identifier 'ark:/25593/567'"]
        );

        let matching = ead(r#"<ead><eadheader><eadid url="http://testpid.library.emory.edu/ark:/25593/1234" identifier="ark:/25593/1234">abc1</eadid></eadheader></ead>"#);
        assert!(ArkRule.check(&matching).is_empty());
    }
}
