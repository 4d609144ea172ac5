//! Extent estimation for collections that are only partly measured.

use lazywrap_geometry::OrientedSize;

use super::row_walker::UniformRows;

/// Tally of the leading items whose rows have been walked with real sizes.
///
/// `items` counts a prefix `0..items` of the collection; `height` is the
/// bottom of the last row covering that prefix. Any collection change
/// invalidates the tally.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct KnownExtent {
    pub items: usize,
    pub height: f32,
    pub width: f32,
}

impl KnownExtent {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Records a walk that covered the first `items` items.
    ///
    /// Never shrinks the tally; a shorter walk says nothing new.
    pub fn record(&mut self, items: usize, covered: OrientedSize) {
        if items >= self.items {
            self.items = items;
            self.height = self.height.max(covered.height);
        }
        self.width = self.width.max(covered.width);
    }

    /// Estimated extent of `count` items.
    ///
    /// Extrapolates linearly from the known prefix and never reports less
    /// than the known height. With nothing known yet, assumes every item has
    /// the `average` size.
    pub fn estimate(&self, count: usize, average: OrientedSize, row_width: f32) -> OrientedSize {
        if count == 0 {
            return OrientedSize::ZERO;
        }
        if self.items == 0 {
            return UniformRows::new(count, average, row_width).extent();
        }
        let ratio = count as f32 / self.items as f32;
        OrientedSize::new(self.width, (ratio * self.height).max(self.height))
    }
}
