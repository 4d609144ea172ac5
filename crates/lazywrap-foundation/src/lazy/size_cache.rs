//! Identity-keyed cache of measured item sizes.

use lazywrap_geometry::Size;

use super::items::ItemKey;
use crate::collections::map::HashMap;

/// Last measured size per item, plus running totals for the average.
///
/// Only populated when items may differ in size. Entries leave with their
/// item; a collection reset clears everything.
#[derive(Debug, Default)]
pub struct SizeCache {
    sizes: HashMap<ItemKey, Size>,
    total_width: f64,
    total_height: f64,
}

impl SizeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    pub fn get(&self, key: ItemKey) -> Option<Size> {
        self.sizes.get(&key).copied()
    }

    pub fn contains(&self, key: ItemKey) -> bool {
        self.sizes.contains_key(&key)
    }

    /// Stores the measured size of `key`, replacing any previous value.
    pub fn insert(&mut self, key: ItemKey, size: Size) {
        if let Some(previous) = self.sizes.insert(key, size) {
            self.subtract(previous);
        }
        self.total_width += f64::from(size.width);
        self.total_height += f64::from(size.height);
    }

    pub fn remove(&mut self, key: ItemKey) -> Option<Size> {
        let removed = self.sizes.remove(&key);
        if let Some(size) = removed {
            self.subtract(size);
        }
        removed
    }

    pub fn clear(&mut self) {
        self.sizes.clear();
        self.total_width = 0.0;
        self.total_height = 0.0;
    }

    /// Average of all cached sizes, `None` when nothing is cached.
    pub fn average(&self) -> Option<Size> {
        if self.sizes.is_empty() {
            return None;
        }
        let n = self.sizes.len() as f64;
        Some(Size::new(
            (self.total_width / n) as f32,
            (self.total_height / n) as f32,
        ))
    }

    fn subtract(&mut self, size: Size) {
        self.total_width -= f64::from(size.width);
        self.total_height -= f64::from(size.height);
        if self.sizes.is_empty() {
            self.total_width = 0.0;
            self.total_height = 0.0;
        }
    }
}
