//! Ordered container for position-identified list entries.
//!
//! Entries such as collection rows or gallery images have no identity of
//! their own; every operation addresses them by index.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndexedList<T> {
    entries: Vec<T>,
}

impl<T> Default for IndexedList<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> IndexedList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.entries.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.entries.get_mut(index)
    }

    pub fn first(&self) -> Option<&T> {
        self.entries.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.entries
    }

    pub fn into_vec(self) -> Vec<T> {
        self.entries
    }

    /// Append and return the new entry's index
    pub fn push(&mut self, entry: T) -> usize {
        self.entries.push(entry);
        self.entries.len() - 1
    }

    /// Remove the entry at `index`; later entries shift down by one.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        if index < self.entries.len() {
            Some(self.entries.remove(index))
        } else {
            None
        }
    }

    /// Swap the entry at `index` with its neighbour in `direction`.
    ///
    /// Returns false, leaving the list untouched, when there is no neighbour.
    pub fn swap_adjacent(&mut self, index: usize, direction: Direction) -> bool {
        let target = match direction {
            Direction::Up => index.checked_sub(1),
            Direction::Down => index.checked_add(1),
        };
        match target {
            Some(target) if index < self.entries.len() && target < self.entries.len() => {
                self.entries.swap(index, target);
                true
            }
            _ => false,
        }
    }

    pub fn truncate(&mut self, len: usize) {
        self.entries.truncate(len);
    }

    /// Pad with `fill()` until the list holds at least `len` entries
    pub fn pad_to(&mut self, len: usize, mut fill: impl FnMut() -> T) {
        while self.entries.len() < len {
            self.entries.push(fill());
        }
    }
}

impl<T> From<Vec<T>> for IndexedList<T> {
    fn from(entries: Vec<T>) -> Self {
        Self { entries }
    }
}

impl<T> FromIterator<T> for IndexedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a, T> IntoIterator for &'a IndexedList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> IndexedList<&'static str> {
        IndexedList::from(vec!["a", "b", "c"])
    }

    #[test]
    fn test_swap_up_moves_entry_towards_front() {
        let mut list = abc();
        assert!(list.swap_adjacent(1, Direction::Up));
        assert_eq!(list.as_slice(), &["b", "a", "c"]);
    }

    #[test]
    fn test_swap_at_boundaries_is_noop() {
        let mut list = abc();
        assert!(!list.swap_adjacent(0, Direction::Up));
        assert!(!list.swap_adjacent(2, Direction::Down));
        assert!(!list.swap_adjacent(7, Direction::Down));
        assert_eq!(list.as_slice(), &["a", "b", "c"]);
    }

    #[test]
    fn test_remove_reindexes_remainder() {
        let mut list = abc();
        assert_eq!(list.remove(0), Some("a"));
        assert_eq!(list.get(0), Some(&"b"));
        assert_eq!(list.get(1), Some(&"c"));
        assert_eq!(list.remove(5), None);
    }

    #[test]
    fn test_pad_to_only_grows() {
        let mut list = abc();
        list.pad_to(2, || "x");
        assert_eq!(list.len(), 3);
        list.pad_to(4, || "x");
        assert_eq!(list.as_slice(), &["a", "b", "c", "x"]);
    }
}
