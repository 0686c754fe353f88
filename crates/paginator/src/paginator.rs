//! Paginated list state and command application

use std::sync::Arc;

use crate::filtering::Filtering;
use crate::list::List;
use crate::protocol::Command;
use crate::semantics::ItemSemantics;
use crate::sorting::{SortHeader, Sorting};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub active_page: usize,
    pub items_per_page: usize,
    /// Position in the visible list
    pub selected: Option<usize>,
    pub controls_visible: bool,
}

/// Result of applying a command to the in-memory state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Changed,
    Ignored,
    /// The command names an item action that has to run against a backend
    Execute { position: usize, action: String },
}

pub struct Paginator<S: ItemSemantics> {
    semantics: Arc<S>,
    list: List<S::Item>,
    sorting: Sorting,
    filtering: Filtering,
    view: ViewState,
    prefix: String,
}

impl<S: ItemSemantics> Paginator<S> {
    pub fn new(prefix: impl Into<String>, items_per_page: usize, semantics: Arc<S>) -> Self {
        Self {
            semantics,
            list: List::default(),
            sorting: Sorting::default(),
            filtering: Filtering::default(),
            view: ViewState {
                active_page: 0,
                items_per_page: items_per_page.max(1),
                selected: None,
                controls_visible: false,
            },
            prefix: prefix.into(),
        }
    }

    pub fn with_sorting(mut self, headers: Vec<SortHeader>) -> Self {
        self.sorting.setup(headers);
        self
    }

    pub fn with_filtering<I, A>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        self.filtering.setup(attributes);
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn semantics(&self) -> &Arc<S> {
        &self.semantics
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn sorting(&self) -> &Sorting {
        &self.sorting
    }

    pub fn filtering(&self) -> &Filtering {
        &self.filtering
    }

    pub fn list(&self) -> &List<S::Item> {
        &self.list
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn item_at(&self, position: usize) -> Option<&S::Item> {
        self.list.item_at(position)
    }

    pub fn item_at_mut(&mut self, position: usize) -> Option<&mut S::Item> {
        self.list.item_at_mut(position)
    }

    /// Replace every item with a fresh set from the data source
    ///
    /// Sort and filter switches survive; the page and selection are pulled
    /// back into range.
    pub fn load(&mut self, items: Vec<S::Item>) {
        self.list.alloc(items.len());
        for item in items {
            self.list.append(item);
        }
        self.classify();
        self.refilter();
        self.resort();
        self.clamp();
    }

    /// Drop the item at a visible position
    pub fn remove(&mut self, position: usize) -> Option<S::Item> {
        let semantics = &self.semantics;
        let filtering = &self.filtering;
        let removed = self
            .list
            .delete(position, |item| filtering.keep(item, |i, a| semantics.stringify(i, a)))?;

        self.classify();
        self.refilter();
        self.resort();
        self.view.selected = None;
        self.clamp();
        Some(removed)
    }

    pub fn deselect(&mut self) {
        self.view.selected = None;
    }

    /// Visible positions `[start, end)` shown on the active page
    pub fn page_bounds(&self) -> (usize, usize) {
        let start = self.view.active_page * self.view.items_per_page;
        let end = (start + self.view.items_per_page).min(self.list.len());
        (start.min(end), end)
    }

    pub fn last_page(&self) -> usize {
        self.list.len().saturating_sub(1) / self.view.items_per_page
    }

    pub fn apply(&mut self, command: Command) -> Step {
        match command {
            Command::Select(position) => {
                if position >= self.list.len() {
                    tracing::warn!("[{}] Item {} out of range ({} visible)", self.prefix, position, self.list.len());
                    return Step::Ignored;
                }
                self.view.selected = Some(position);
                self.view.controls_visible = false;
                Step::Changed
            }
            Command::NextPage => {
                if self.view.active_page >= self.last_page() {
                    return Step::Ignored;
                }
                self.view.active_page += 1;
                Step::Changed
            }
            Command::PrevPage => {
                if self.view.active_page == 0 {
                    return Step::Ignored;
                }
                self.view.active_page -= 1;
                Step::Changed
            }
            Command::ToggleControls => {
                self.view.controls_visible = !self.view.controls_visible;
                Step::Changed
            }
            Command::Stub => Step::Ignored,
            Command::OrderBy(key) => {
                if !self.sorting.toggle(&key) {
                    return Step::Ignored;
                }
                self.resort();
                self.view.selected = None;
                Step::Changed
            }
            Command::FilterBy { attribute, value } => {
                if !self.filtering.toggle(&attribute, &value) {
                    return Step::Ignored;
                }
                self.view.active_page = 0;
                self.view.selected = None;
                self.refilter();
                self.resort();
                Step::Changed
            }
            Command::Action(action) => {
                let Some(position) = self.view.selected else {
                    tracing::debug!("[{}] Action {} without a selected item", self.prefix, action);
                    return Step::Ignored;
                };
                let Some(item) = self.list.item_at(position) else {
                    return Step::Ignored;
                };
                if !self.semantics.actions(item).iter().any(|a| *a == action) {
                    tracing::warn!("[{}] Action {} not offered for item {}", self.prefix, action, position);
                    return Step::Ignored;
                }
                Step::Execute { position, action }
            }
        }
    }

    fn classify(&mut self) {
        let semantics = &self.semantics;
        self.filtering
            .classify(self.list.items(), |item, attribute| semantics.stringify(item, attribute));
    }

    fn refilter(&mut self) {
        let semantics = &self.semantics;
        let filtering = &self.filtering;
        self.list
            .refilter(|item| filtering.keep(item, |i, a| semantics.stringify(i, a)));
    }

    fn resort(&mut self) {
        let semantics = &self.semantics;
        let sorting = &self.sorting;
        self.list
            .sort_by(|a, b| sorting.compare(a, b, |x, y, key| semantics.less_than(x, y, key)));
    }

    fn clamp(&mut self) {
        let last = self.last_page();
        if self.view.active_page > last {
            self.view.active_page = last;
        }
        if matches!(self.view.selected, Some(position) if position >= self.list.len()) {
            self.view.selected = None;
        }
    }
}
