//! Hierarchical id assignment
//!
//! Series, subseries and sub-subseries get `<eadid>_<suffix>` where the
//! suffix is the unitid lowercased with whitespace removed, or
//! `<level><position>` when there is no unitid. Indexes get
//! `<eadid>_index<position>`. Positions are 1-based among siblings.
//!
//! Assignment is deterministic and idempotent. Colliding ids are left for
//! the validator to report.

use fa_ead::{
    components_mut, dsc_has_series, has_subseries, Element, FindingAid, Series, ID_DELIMITER,
    MAX_SERIES_DEPTH,
};
use tracing::debug;

/// Id suffix for a series component at a 0-based sibling position
#[must_use]
pub fn series_suffix(component: &Element, position: usize) -> String {
    let series = Series::new(component, 1);
    match series.unitid() {
        Some(unitid) => unitid
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase(),
        None => format!("{}{}", series.level().to_lowercase(), position + 1),
    }
}

/// Set `id` when it differs; returns `true` when changed
fn set_id(el: &mut Element, id: &str) -> bool {
    if el.attribute("id").as_deref() == Some(id) {
        return false;
    }
    el.set_attribute("id", id);
    true
}

fn assign_series(component: &mut Element, eadid: &str, position: usize, depth: usize) -> usize {
    let id = format!("{eadid}{ID_DELIMITER}{}", series_suffix(component, position));
    let mut changed = usize::from(set_id(component, &id));
    if depth < MAX_SERIES_DEPTH && has_subseries(component) {
        for (index, child) in components_mut(component).enumerate() {
            changed += assign_series(child, eadid, index, depth + 1);
        }
    }
    changed
}

/// Assign ids to every series level and index of `ead`.
///
/// Returns the number of ids that changed.
pub fn assign_ids(ead: &mut FindingAid) -> usize {
    let eadid = ead.eadid_value();
    let mut changed = 0;

    if let Some(dsc) = ead.dsc_mut() {
        if dsc_has_series(dsc) {
            for (position, series) in components_mut(dsc).enumerate() {
                changed += assign_series(series, &eadid, position, 1);
            }
        }
    }

    if let Some(archdesc) = ead.archdesc_mut() {
        for (position, index) in archdesc
            .elements_mut()
            .filter(|el| el.is("index"))
            .enumerate()
        {
            let id = format!("{eadid}{ID_DELIMITER}index{}", position + 1);
            changed += usize::from(set_id(index, &id));
        }
    }

    debug!("Assigned {} id(s) in {}", changed, eadid);
    changed
}
