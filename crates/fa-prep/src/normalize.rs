//! Leading-whitespace cleanup
//!
//! The list-title field and control-access terms drive browse and search
//! listings, so their direct text must not start with whitespace. Only the
//! text before the first child element is trimmed.

use fa_ead::{ElementPath, FindingAid};
use tracing::debug;

fn trim_at(ead: &mut FindingAid, path: &ElementPath) -> bool {
    ead.document_mut()
        .element_mut(path)
        .is_some_and(|el| el.trim_leading_whitespace())
}

/// Trim the list-title field and every control-access term.
///
/// Returns the number of elements changed.
pub fn normalize_whitespace(ead: &mut FindingAid) -> usize {
    let mut paths: Vec<ElementPath> = ead.list_title_path().into_iter().collect();
    paths.extend(ead.controlaccess_term_paths());

    let changed = paths.iter().filter(|path| trim_at(ead, path)).count();
    debug!("Trimmed leading whitespace in {} element(s)", changed);
    changed
}
