//! Ordered item collection with stable identities.
//!
//! Every item carries an [`ItemKey`]. Containers, the size cache and change
//! notifications all refer to items by key, so two items that compare equal
//! by value are still distinct.

use std::fmt;
use std::ops::Range;

use super::container::ContainerId;
use super::error::{LayoutError, LayoutResult};

/// Stable identity of an item in an [`ItemCollection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemKey(pub u64);

impl ItemKey {
    #[inline]
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemsChangedAction {
    Add,
    Remove,
    Replace,
    Move,
    Reset,
}

/// Notification describing a mutation of the item collection.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemsChanged {
    pub action: ItemsChangedAction,

    /// Index of the first affected position in the collection after the
    /// change (the destination index for moves).
    pub index: usize,

    /// Number of positions affected.
    pub count: usize,

    /// Keys of items that left the collection.
    pub removed: Vec<ItemKey>,

    /// Containers that were virtualized because their item left.
    pub affected_containers: Vec<ContainerId>,
}

impl ItemsChanged {
    fn new(action: ItemsChangedAction, index: usize, count: usize, removed: Vec<ItemKey>) -> Self {
        Self {
            action,
            index,
            count,
            removed,
            affected_containers: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
struct Entry<T> {
    key: ItemKey,
    value: T,
}

/// Ordered items, each bound to an [`ItemKey`].
///
/// Keys are assigned from a counter unless supplied through
/// [`insert_keyed`](Self::insert_keyed). Supplied keys are trusted; a key
/// used twice makes arrangement fail with
/// [`LayoutError::InvariantViolation`].
#[derive(Debug, Clone)]
pub struct ItemCollection<T> {
    entries: Vec<Entry<T>>,
    next_key: u64,
}

impl<T> Default for ItemCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for ItemCollection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut collection = Self::new();
        collection.extend_entries(0, iter);
        collection
    }
}

impl<T> ItemCollection<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_key: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.entries.get(index).map(|entry| &entry.value)
    }

    pub fn key_at(&self, index: usize) -> Option<ItemKey> {
        self.entries.get(index).map(|entry| entry.key)
    }

    /// Linear search for the position of `key`.
    pub fn index_of(&self, key: ItemKey) -> Option<usize> {
        self.entries.iter().position(|entry| entry.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ItemKey, &T)> + '_ {
        self.entries.iter().map(|entry| (entry.key, &entry.value))
    }

    pub fn keys(&self) -> impl Iterator<Item = ItemKey> + '_ {
        self.entries.iter().map(|entry| entry.key)
    }

    pub fn push(&mut self, item: T) -> ItemsChanged {
        let index = self.entries.len();
        self.extend_entries(index, std::iter::once(item));
        ItemsChanged::new(ItemsChangedAction::Add, index, 1, Vec::new())
    }

    pub fn insert<I>(&mut self, index: usize, items: I) -> LayoutResult<ItemsChanged>
    where
        I: IntoIterator<Item = T>,
    {
        self.check_insert_index(index)?;
        let count = self.extend_entries(index, items);
        Ok(ItemsChanged::new(
            ItemsChangedAction::Add,
            index,
            count,
            Vec::new(),
        ))
    }

    /// Inserts items whose identity is chosen by the host.
    pub fn insert_keyed<I>(&mut self, index: usize, items: I) -> LayoutResult<ItemsChanged>
    where
        I: IntoIterator<Item = (ItemKey, T)>,
    {
        self.check_insert_index(index)?;
        let mut inserted = Vec::new();
        for (key, value) in items {
            self.next_key = self.next_key.max(key.raw().saturating_add(1));
            inserted.push(Entry { key, value });
        }
        let count = inserted.len();
        self.entries.splice(index..index, inserted);
        Ok(ItemsChanged::new(
            ItemsChangedAction::Add,
            index,
            count,
            Vec::new(),
        ))
    }

    pub fn remove(&mut self, range: Range<usize>) -> LayoutResult<ItemsChanged> {
        let len = self.entries.len();
        if range.start > range.end || range.end > len {
            return Err(LayoutError::InvalidArgument {
                index: range.end.max(range.start),
                count: len,
            });
        }
        let removed: Vec<ItemKey> = self
            .entries
            .drain(range.clone())
            .map(|entry| entry.key)
            .collect();
        Ok(ItemsChanged::new(
            ItemsChangedAction::Remove,
            range.start,
            removed.len(),
            removed,
        ))
    }

    /// Replaces the item at `index`. The new item gets a fresh key.
    pub fn replace(&mut self, index: usize, item: T) -> LayoutResult<ItemsChanged> {
        self.check_index(index)?;
        let key = self.allocate_key();
        let old = std::mem::replace(&mut self.entries[index], Entry { key, value: item });
        Ok(ItemsChanged::new(
            ItemsChangedAction::Replace,
            index,
            1,
            vec![old.key],
        ))
    }

    pub fn move_item(&mut self, from: usize, to: usize) -> LayoutResult<ItemsChanged> {
        self.check_index(from)?;
        self.check_index(to)?;
        let entry = self.entries.remove(from);
        self.entries.insert(to, entry);
        Ok(ItemsChanged::new(
            ItemsChangedAction::Move,
            to,
            1,
            Vec::new(),
        ))
    }

    /// Replaces the whole collection.
    pub fn reset<I>(&mut self, items: I) -> ItemsChanged
    where
        I: IntoIterator<Item = T>,
    {
        let removed: Vec<ItemKey> = self.entries.drain(..).map(|entry| entry.key).collect();
        let count = self.extend_entries(0, items);
        ItemsChanged::new(ItemsChangedAction::Reset, 0, count, removed)
    }

    fn allocate_key(&mut self) -> ItemKey {
        let key = ItemKey(self.next_key);
        self.next_key += 1;
        key
    }

    fn extend_entries<I>(&mut self, index: usize, items: I) -> usize
    where
        I: IntoIterator<Item = T>,
    {
        let inserted: Vec<Entry<T>> = items
            .into_iter()
            .map(|value| Entry {
                key: self.allocate_key(),
                value,
            })
            .collect();
        let count = inserted.len();
        self.entries.splice(index..index, inserted);
        count
    }

    fn check_index(&self, index: usize) -> LayoutResult<()> {
        if index < self.entries.len() {
            Ok(())
        } else {
            Err(LayoutError::InvalidArgument {
                index,
                count: self.entries.len(),
            })
        }
    }

    fn check_insert_index(&self, index: usize) -> LayoutResult<()> {
        if index <= self.entries.len() {
            Ok(())
        } else {
            Err(LayoutError::InvalidArgument {
                index,
                count: self.entries.len(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_values_get_distinct_keys() {
        let items: ItemCollection<&str> = ["a", "a", "a"].into_iter().collect();
        let keys: Vec<_> = items.keys().collect();
        assert_eq!(keys.len(), 3);
        assert_ne!(keys[0], keys[1]);
        assert_ne!(keys[1], keys[2]);
    }

    #[test]
    fn remove_reports_removed_keys() {
        let mut items: ItemCollection<u32> = (0..5).collect();
        let second = items.key_at(1).unwrap();
        let third = items.key_at(2).unwrap();

        let change = items.remove(1..3).unwrap();

        assert_eq!(change.action, ItemsChangedAction::Remove);
        assert_eq!(change.removed, vec![second, third]);
        assert_eq!(items.len(), 3);
        assert_eq!(items.get(1), Some(&3));
    }

    #[test]
    fn remove_out_of_range_is_invalid_argument() {
        let mut items: ItemCollection<u32> = (0..2).collect();
        assert_eq!(
            items.remove(1..4),
            Err(LayoutError::InvalidArgument { index: 4, count: 2 })
        );
    }

    #[test]
    fn replace_assigns_fresh_key() {
        let mut items: ItemCollection<u32> = (0..3).collect();
        let old = items.key_at(1).unwrap();

        let change = items.replace(1, 10).unwrap();

        assert_eq!(change.removed, vec![old]);
        assert_ne!(items.key_at(1), Some(old));
        assert_eq!(items.get(1), Some(&10));
    }

    #[test]
    fn move_keeps_identity() {
        let mut items: ItemCollection<u32> = (0..4).collect();
        let key = items.key_at(0).unwrap();

        items.move_item(0, 3).unwrap();

        assert_eq!(items.index_of(key), Some(3));
        assert_eq!(items.get(3), Some(&0));
    }

    #[test]
    fn keyed_insert_advances_generated_keys() {
        let mut items: ItemCollection<u32> = ItemCollection::new();
        items
            .insert_keyed(0, [(ItemKey::new(41), 1), (ItemKey::new(7), 2)])
            .unwrap();
        items.push(3);
        assert_eq!(items.key_at(2), Some(ItemKey::new(42)));
    }

    #[test]
    fn reset_reports_everything_removed() {
        let mut items: ItemCollection<u32> = (0..3).collect();
        let change = items.reset([7, 8]);
        assert_eq!(change.action, ItemsChangedAction::Reset);
        assert_eq!(change.removed.len(), 3);
        assert_eq!(change.count, 2);
        assert_eq!(items.len(), 2);
    }
}
