//! Backing storage with a filtered, sorted view

use std::cmp::Ordering;

/// Items plus the index of positions currently visible
///
/// Every entry of the index points into `items`. The index is rebuilt by
/// [`List::refilter`] and reordered by [`List::sort_by`]; positions handed
/// to callers are always positions in the index, never in `items`.
#[derive(Debug, Clone)]
pub struct List<T> {
    items: Vec<T>,
    index: Vec<usize>,
}

impl<T> Default for List<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: Vec::new(),
        }
    }
}

impl<T> List<T> {
    /// Drop everything and reserve room for `capacity` items
    pub fn alloc(&mut self, capacity: usize) {
        self.items = Vec::with_capacity(capacity);
        self.index = Vec::with_capacity(capacity);
    }

    /// Add an item; it stays invisible until the next refilter
    pub fn append(&mut self, item: T) {
        self.items.push(item);
    }

    /// Remove the item at a visible position and rebuild the index
    pub fn delete(&mut self, position: usize, keep: impl FnMut(&T) -> bool) -> Option<T> {
        let backing = *self.index.get(position)?;
        let removed = self.items.remove(backing);
        self.refilter(keep);
        Some(removed)
    }

    /// Rebuild the index from scratch in backing order
    pub fn refilter(&mut self, mut keep: impl FnMut(&T) -> bool) {
        self.index.clear();
        self.index.extend(
            self.items
                .iter()
                .enumerate()
                .filter(|(_, item)| keep(*item))
                .map(|(i, _)| i),
        );
    }

    /// Stable sort of the visible positions
    pub fn sort_by(&mut self, mut compare: impl FnMut(&T, &T) -> Ordering) {
        let items = &self.items;
        self.index.sort_by(|&a, &b| compare(&items[a], &items[b]));
    }

    pub fn item_at(&self, position: usize) -> Option<&T> {
        self.index.get(position).map(|&i| &self.items[i])
    }

    pub fn item_at_mut(&mut self, position: usize) -> Option<&mut T> {
        let backing = *self.index.get(position)?;
        self.items.get_mut(backing)
    }

    /// Number of visible items
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Number of stored items, visible or not
    pub fn total(&self) -> usize {
        self.items.len()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn index(&self) -> &[usize] {
        &self.index
    }

    /// Visible items in view order
    pub fn visible(&self) -> impl Iterator<Item = &T> {
        self.index.iter().map(|&i| &self.items[i])
    }
}
