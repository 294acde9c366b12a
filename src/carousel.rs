//! Carousel pagination and the shared page-transition guard
//!
//! Every row of a view pages through its result list independently, a fixed
//! number of items at a time, skipping the first item (it belongs to the
//! banner). A single guard per view serializes page changes: while one row is
//! sliding, every advance/retreat on that view is dropped.

use std::collections::HashMap;

use crate::models::{CatalogItem, Category};

/// Items shown per carousel page
pub const PAGE_SIZE: usize = 6;

/// How the last partial page is counted when computing the highest page index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagePolicy {
    /// `floor(n / size) - 1`: a trailing partial page is never shown (browse views)
    Floor,
    /// `ceil(n / size) - 1`: a trailing partial page gets its own page (search view)
    Ceil,
}

impl PagePolicy {
    /// Highest valid page index for a list of `total_items`, where the first
    /// item is excluded from paging. Never below zero.
    pub fn max_page_index(&self, total_items: usize, page_size: usize) -> usize {
        if page_size == 0 {
            return 0;
        }
        let pageable = total_items.saturating_sub(1);
        let pages = match self {
            PagePolicy::Floor => pageable / page_size,
            PagePolicy::Ceil => pageable.div_ceil(page_size),
        };
        pages.saturating_sub(1)
    }
}

/// Visible slice for `page_index`: `items[1..][page*size .. page*size + size]`,
/// clamped at both ends so short or empty lists give a short or empty window.
pub fn window<T>(items: &[T], page_index: usize, page_size: usize) -> &[T] {
    let pageable = items.get(1..).unwrap_or(&[]);
    let start = page_index.saturating_mul(page_size).min(pageable.len());
    let end = start.saturating_add(page_size).min(pageable.len());
    &pageable[start..end]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl Direction {
    /// Horizontal sign of travel for the outgoing window (-1 slides left)
    pub fn exit_sign(&self) -> f32 {
        match self {
            Direction::Forward => -1.0,
            Direction::Backward => 1.0,
        }
    }
}

/// Page index and last direction of one row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaginationState {
    pub page_index: usize,
    pub direction: Direction,
}

impl PaginationState {
    /// Next page, wrapping to 0 past `max_page_index`
    pub fn advanced(&self, max_page_index: usize) -> Self {
        let page_index = if self.page_index >= max_page_index {
            0
        } else {
            self.page_index + 1
        };
        Self {
            page_index,
            direction: Direction::Forward,
        }
    }

    /// Previous page, wrapping from 0 to `max_page_index`
    pub fn retreated(&self, max_page_index: usize) -> Self {
        let page_index = if self.page_index == 0 {
            max_page_index
        } else {
            (self.page_index - 1).min(max_page_index)
        };
        Self {
            page_index,
            direction: Direction::Backward,
        }
    }
}

/// One page change being animated. Times are in seconds on the UI clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slide {
    pub category: Category,
    pub direction: Direction,
    pub from_page: usize,
    pub to_page: usize,
    pub started_at: f64,
    pub duration: f64,
}

impl Slide {
    /// Fraction of the exit animation played, in `0.0..=1.0`
    pub fn progress(&self, now: f64) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((now - self.started_at) / self.duration).clamp(0.0, 1.0) as f32
    }

    pub fn is_finished(&self, now: f64) -> bool {
        self.progress(now) >= 1.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GuardState {
    #[default]
    Idle,
    Transitioning(Slide),
}

/// Two-state gate: `Idle` accepts one page change, `Transitioning` rejects
/// everything until the outgoing window's exit completes.
#[derive(Debug, Clone, Default)]
pub struct TransitionGuard {
    state: GuardState,
}

impl TransitionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &GuardState {
        &self.state
    }

    pub fn in_flight(&self) -> bool {
        matches!(self.state, GuardState::Transitioning(_))
    }

    pub fn slide(&self) -> Option<&Slide> {
        match &self.state {
            GuardState::Transitioning(slide) => Some(slide),
            GuardState::Idle => None,
        }
    }

    /// Opens the guard for `slide`. Returns false if a slide is already playing.
    pub fn try_open(&mut self, slide: Slide) -> bool {
        if self.in_flight() {
            return false;
        }
        self.state = GuardState::Transitioning(slide);
        true
    }

    /// Exit-complete event. Returns the slide that finished, if any.
    pub fn complete(&mut self) -> Option<Slide> {
        match std::mem::take(&mut self.state) {
            GuardState::Transitioning(slide) => Some(slide),
            GuardState::Idle => None,
        }
    }

    /// Fires the exit-complete event once the current slide has played out
    pub fn tick(&mut self, now: f64) -> Option<Slide> {
        match self.state {
            GuardState::Transitioning(slide) if slide.is_finished(now) => self.complete(),
            _ => None,
        }
    }
}

/// All rows of one view: an independent page per category, one shared guard
#[derive(Debug, Clone)]
pub struct Carousels {
    pages: HashMap<Category, PaginationState>,
    guard: TransitionGuard,
    policy: PagePolicy,
    page_size: usize,
    transition_secs: f64,
}

impl Carousels {
    pub fn new(policy: PagePolicy, categories: &[Category], transition_secs: f64) -> Self {
        Self {
            pages: categories
                .iter()
                .map(|category| (*category, PaginationState::default()))
                .collect(),
            guard: TransitionGuard::new(),
            policy,
            page_size: PAGE_SIZE,
            transition_secs,
        }
    }

    pub fn policy(&self) -> PagePolicy {
        self.policy
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page(&self, category: Category) -> PaginationState {
        self.pages.get(&category).copied().unwrap_or_default()
    }

    pub fn guard(&self) -> &TransitionGuard {
        &self.guard
    }

    pub fn in_flight(&self) -> bool {
        self.guard.in_flight()
    }

    pub fn max_page_index(&self, items: &[CatalogItem]) -> usize {
        self.policy.max_page_index(items.len(), self.page_size)
    }

    /// Move `category` one page forward. `None` items (row not loaded) and
    /// calls made while a slide is playing are silent no-ops.
    pub fn advance(&mut self, category: Category, items: Option<&[CatalogItem]>, now: f64) -> bool {
        self.step(category, items, now, Direction::Forward)
    }

    /// Move `category` one page back, same gating as [`Carousels::advance`]
    pub fn retreat(&mut self, category: Category, items: Option<&[CatalogItem]>, now: f64) -> bool {
        self.step(category, items, now, Direction::Backward)
    }

    fn step(
        &mut self,
        category: Category,
        items: Option<&[CatalogItem]>,
        now: f64,
        direction: Direction,
    ) -> bool {
        let Some(items) = items else {
            return false;
        };
        if self.guard.in_flight() {
            return false;
        }

        let max_page_index = self.max_page_index(items);
        let current = self.page(category);
        let next = match direction {
            Direction::Forward => current.advanced(max_page_index),
            Direction::Backward => current.retreated(max_page_index),
        };

        // The guard opens before the new page is committed
        let opened = self.guard.try_open(Slide {
            category,
            direction,
            from_page: current.page_index,
            to_page: next.page_index,
            started_at: now,
            duration: self.transition_secs,
        });
        if !opened {
            return false;
        }
        self.pages.insert(category, next);
        true
    }

    /// Items currently visible in `category`
    pub fn window<'a>(&self, category: Category, items: &'a [CatalogItem]) -> &'a [CatalogItem] {
        window(items, self.page(category).page_index, self.page_size)
    }

    /// Outgoing window of `category` while its slide is playing
    pub fn outgoing_window<'a>(
        &self,
        category: Category,
        items: &'a [CatalogItem],
    ) -> Option<&'a [CatalogItem]> {
        self.guard
            .slide()
            .filter(|slide| slide.category == category)
            .map(|slide| window(items, slide.from_page, self.page_size))
    }

    /// Closes the guard when the playing slide has finished
    pub fn tick(&mut self, now: f64) -> Option<Slide> {
        self.guard.tick(now)
    }

    pub fn complete_transition(&mut self) -> Option<Slide> {
        self.guard.complete()
    }
}

#[cfg(test)]
#[path = "carousel_tests.rs"]
mod tests;
