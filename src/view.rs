//! Per-page state: which fetches have settled, the carousels, and the banner
//!
//! A `ViewState` lives from one mount to the next. Results carry the
//! `MountId` they were requested under, so a fetch that completes after the
//! user has navigated away is recognised and dropped.

use std::sync::Arc;

use crate::api::FetchError;
use crate::carousel::{Carousels, PagePolicy, Slide};
use crate::focus::{self, Focus};
use crate::models::{CatalogItem, Category, QueryKey, ResultSet, ViewKind};
use crate::router::Route;

/// Identifies one mount of a view
pub type MountId = u64;

#[derive(Debug, Clone)]
pub enum Slot {
    Pending,
    Loaded(Arc<ResultSet>),
    /// Blank search: settled without a request
    Skipped,
    Failed(FetchError),
}

impl Slot {
    fn is_pending(&self) -> bool {
        matches!(self, Slot::Pending)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewStatus {
    /// At least one fetch is outstanding
    Loading,
    Ready,
    /// Everything settled and these rows failed
    Failed(Vec<(Category, FetchError)>),
}

pub struct ViewState {
    kind: ViewKind,
    mount: MountId,
    keyword: Option<String>,
    slots: Vec<(Category, Slot)>,
    carousels: Carousels,
}

impl ViewState {
    /// Fresh state for `route`: every row pending except blank searches
    pub fn mount(route: &Route, mount: MountId, transition_secs: f64) -> Self {
        let kind = route.view_kind();
        let keyword = route.keyword().map(|k| k.to_string());
        let policy = match kind {
            ViewKind::Search => PagePolicy::Ceil,
            ViewKind::Movies | ViewKind::Tv => PagePolicy::Floor,
        };

        let mut view = Self {
            kind,
            mount,
            keyword,
            slots: Vec::new(),
            carousels: Carousels::new(policy, kind.categories(), transition_secs),
        };
        view.slots = kind
            .categories()
            .iter()
            .map(|category| {
                let slot = if view.key_for(*category).is_noop() {
                    Slot::Skipped
                } else {
                    Slot::Pending
                };
                (*category, slot)
            })
            .collect();
        view
    }

    pub fn kind(&self) -> ViewKind {
        self.kind
    }

    pub fn mount_id(&self) -> MountId {
        self.mount
    }

    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref()
    }

    /// Search view with nothing to search for
    pub fn is_blank_search(&self) -> bool {
        self.kind == ViewKind::Search
            && self.keyword.as_deref().map_or(true, |k| k.trim().is_empty())
    }

    pub fn key_for(&self, category: Category) -> QueryKey {
        if category.is_search() {
            QueryKey::search(category, self.keyword.as_deref())
        } else {
            QueryKey::list(category)
        }
    }

    /// Keys of every row still waiting for data
    pub fn pending_queries(&self) -> Vec<QueryKey> {
        self.slots
            .iter()
            .filter(|(_, slot)| slot.is_pending())
            .map(|(category, _)| self.key_for(*category))
            .collect()
    }

    /// Settle the row for `key`. Returns false when the result belongs to
    /// another mount or query and was ignored.
    pub fn apply(
        &mut self,
        mount: MountId,
        key: &QueryKey,
        result: Result<Arc<ResultSet>, FetchError>,
    ) -> bool {
        if mount != self.mount || *key != self.key_for(key.category) {
            return false;
        }
        let Some((_, slot)) = self.slots.iter_mut().find(|(c, _)| *c == key.category) else {
            return false;
        };
        *slot = match result {
            Ok(set) => Slot::Loaded(set),
            Err(e) => Slot::Failed(e),
        };
        true
    }

    pub fn status(&self) -> ViewStatus {
        if self.slots.iter().any(|(_, slot)| slot.is_pending()) {
            return ViewStatus::Loading;
        }
        let failed: Vec<(Category, FetchError)> = self
            .slots
            .iter()
            .filter_map(|(category, slot)| match slot {
                Slot::Failed(e) => Some((*category, e.clone())),
                _ => None,
            })
            .collect();
        if failed.is_empty() {
            ViewStatus::Ready
        } else {
            ViewStatus::Failed(failed)
        }
    }

    /// Put failed rows back to pending and return their keys for refetch
    pub fn retry_failed(&mut self) -> Vec<QueryKey> {
        let mut retried = Vec::new();
        for (category, slot) in self.slots.iter_mut() {
            if matches!(slot, Slot::Failed(_)) {
                *slot = Slot::Pending;
                retried.push(*category);
            }
        }
        retried.into_iter().map(|c| self.key_for(c)).collect()
    }

    fn loaded<'a>(slots: &'a [(Category, Slot)], category: Category) -> Option<&'a ResultSet> {
        slots.iter().find_map(|(c, slot)| match slot {
            Slot::Loaded(set) if *c == category => Some(set.as_ref()),
            _ => None,
        })
    }

    pub fn result_set(&self, category: Category) -> Option<&ResultSet> {
        Self::loaded(&self.slots, category)
    }

    pub fn items(&self, category: Category) -> Option<&[CatalogItem]> {
        self.result_set(category).map(|set| set.items.as_slice())
    }

    /// Rows in display order with their slots
    pub fn rows(&self) -> impl Iterator<Item = &(Category, Slot)> {
        self.slots.iter()
    }

    /// Banner item: first entry of the reference row
    pub fn hero(&self) -> Option<&CatalogItem> {
        self.kind
            .reference_category()
            .and_then(|category| self.result_set(category))
            .and_then(ResultSet::hero)
    }

    /// Overlay focus for a route id: reference row first, then the other rows.
    /// An id not found yet is `Pending` until every row has settled.
    pub fn focus(&self, param: Option<&str>) -> Focus<'_> {
        let reference_category = self.kind.reference_category();
        let reference = reference_category.and_then(|c| self.result_set(c));
        let others = self
            .slots
            .iter()
            .filter(|(category, _)| Some(*category) != reference_category)
            .filter_map(|(category, _)| self.result_set(*category));
        match focus::resolve(param, reference, others) {
            Focus::NotFound if self.status() == ViewStatus::Loading => Focus::Pending,
            resolved => resolved,
        }
    }

    pub fn carousels(&self) -> &Carousels {
        &self.carousels
    }

    pub fn window(&self, category: Category) -> &[CatalogItem] {
        self.items(category)
            .map(|items| self.carousels.window(category, items))
            .unwrap_or(&[])
    }

    pub fn advance(&mut self, category: Category, now: f64) -> bool {
        let items = Self::loaded(&self.slots, category).map(|set| set.items.as_slice());
        self.carousels.advance(category, items, now)
    }

    pub fn retreat(&mut self, category: Category, now: f64) -> bool {
        let items = Self::loaded(&self.slots, category).map(|set| set.items.as_slice());
        self.carousels.retreat(category, items, now)
    }

    /// Per-frame clock: releases the guard once the outgoing window has left
    pub fn tick(&mut self, now: f64) -> Option<Slide> {
        self.carousels.tick(now)
    }
}

#[cfg(test)]
#[path = "view_tests.rs"]
mod tests;
