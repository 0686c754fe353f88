//! Multi-key sort configuration
//!
//! Every header cycles unsorted → descending → ascending → unsorted. Active
//! headers are kept in a queue ordered by activation time; the first key in
//! the queue is the primary sort key and later keys only break ties.

use std::cmp::Ordering;

/// Sort direction of a single header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Unsorted,
    Descending,
    Ascending,
}

impl Direction {
    fn next(self) -> Self {
        match self {
            Direction::Unsorted => Direction::Descending,
            Direction::Descending => Direction::Ascending,
            Direction::Ascending => Direction::Unsorted,
        }
    }

    /// Glyph appended to the header button
    pub fn glyph(self) -> &'static str {
        match self {
            Direction::Unsorted => "",
            Direction::Descending => "⏷",
            Direction::Ascending => "⏶",
        }
    }
}

/// A toggleable sort key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortHeader {
    /// Attribute key passed to the item comparator
    pub key: String,
    /// Button caption
    pub label: String,
    pub direction: Direction,
}

impl SortHeader {
    pub fn new(key: impl Into<String>, label: impl Into<String>, direction: Direction) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            direction,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Sorting {
    headers: Vec<SortHeader>,
    /// Indexes into `headers`, in activation order
    queue: Vec<usize>,
}

impl Sorting {
    pub fn new(headers: Vec<SortHeader>) -> Self {
        let mut sorting = Self::default();
        sorting.setup(headers);
        sorting
    }

    /// Replace the headers; already-directed headers seed the queue in order
    pub fn setup(&mut self, headers: Vec<SortHeader>) {
        self.queue = headers
            .iter()
            .enumerate()
            .filter(|(_, h)| h.direction != Direction::Unsorted)
            .map(|(i, _)| i)
            .collect();
        self.headers = headers;
    }

    pub fn headers(&self) -> &[SortHeader] {
        &self.headers
    }

    /// Keys of the active headers, primary key first
    pub fn queue(&self) -> impl Iterator<Item = &str> {
        self.queue.iter().map(|&i| self.headers[i].key.as_str())
    }

    pub fn direction(&self, key: &str) -> Option<Direction> {
        self.headers.iter().find(|h| h.key == key).map(|h| h.direction)
    }

    /// Advance the direction of a header
    ///
    /// Returns `false` (and changes nothing) if no header has this key.
    pub fn toggle(&mut self, key: &str) -> bool {
        let Some(index) = self.headers.iter().position(|h| h.key == key) else {
            tracing::warn!("Sort key not configured: {}", key);
            return false;
        };

        let header = &mut self.headers[index];
        header.direction = header.direction.next();
        match header.direction {
            Direction::Descending => self.queue.push(index),
            Direction::Ascending => {}
            Direction::Unsorted => self.queue.retain(|&i| i != index),
        }
        true
    }

    /// Order two items by the active headers
    ///
    /// `less(a, b, key)` must report whether `a` is strictly less than `b`
    /// on that key. Items tied on every active key compare equal, so a
    /// stable sort keeps their original order.
    pub fn compare<T>(&self, a: &T, b: &T, mut less: impl FnMut(&T, &T, &str) -> bool) -> Ordering {
        for &index in &self.queue {
            let header = &self.headers[index];
            let ascending = header.direction == Direction::Ascending;
            if less(a, b, &header.key) {
                return if ascending { Ordering::Less } else { Ordering::Greater };
            }
            if less(b, a, &header.key) {
                return if ascending { Ordering::Greater } else { Ordering::Less };
            }
        }
        Ordering::Equal
    }
}
