//! Detail-overlay focus, derived from the route and the loaded rows

use crate::models::{CatalogItem, ResultSet};

/// What the overlay should show
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Focus<'a> {
    /// No id in the route: overlay hidden
    Hidden,
    /// Overlay shown with this record
    Found(&'a CatalogItem),
    /// Overlay shown with an empty state
    NotFound,
    /// Overlay shown while the rows that may hold the id are still loading
    Pending,
}

impl<'a> Focus<'a> {
    pub fn is_visible(&self) -> bool {
        !matches!(self, Focus::Hidden)
    }

    pub fn item(&self) -> Option<&'a CatalogItem> {
        match *self {
            Focus::Found(item) => Some(item),
            _ => None,
        }
    }
}

/// Parses a route id the way a numeric coercion would: surrounding whitespace
/// is ignored, anything else non-numeric matches nothing.
pub fn parse_focus_id(param: &str) -> Option<u64> {
    param.trim().parse().ok()
}

/// Resolve `param` against the reference set, then the remaining sets in order.
/// The first match wins.
pub fn resolve<'a, I>(param: Option<&str>, reference: Option<&'a ResultSet>, others: I) -> Focus<'a>
where
    I: IntoIterator<Item = &'a ResultSet>,
{
    let Some(param) = param else {
        return Focus::Hidden;
    };
    let Some(id) = parse_focus_id(param) else {
        return Focus::NotFound;
    };

    reference
        .into_iter()
        .chain(others)
        .find_map(|set| set.find(id))
        .map_or(Focus::NotFound, Focus::Found)
}
