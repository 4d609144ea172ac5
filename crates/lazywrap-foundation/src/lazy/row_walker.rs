//! Row-wrap walk shared by measure, extent estimation and scroll-into-view.
//!
//! All coordinates are orientation-relative: `x`/`width` along a row,
//! `y`/`height` along the stacking axis. An item wraps to a new row when the
//! row already holds something and the item would overflow the row width.

use lazywrap_geometry::{OrientedPoint, OrientedSize};

/// Running position of a row-wrap walk.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RowCursor {
    /// Width already used in the current row.
    pub x: f32,
    /// Top of the current row.
    pub y: f32,
    /// Tallest item in the current row so far.
    pub row_height: f32,
    /// Index of the first item of the current row.
    pub row_start: usize,
    /// Widest row reached by this walk.
    pub max_width: f32,
}

impl RowCursor {
    /// Cursor positioned at the start of a row.
    pub fn at_row(y: f32, row_start: usize) -> Self {
        Self {
            y,
            row_start,
            ..Self::default()
        }
    }

    #[inline]
    pub fn wraps(&self, width: f32, row_width: f32) -> bool {
        self.x != 0.0 && self.x + width > row_width
    }

    /// Bottom edge of the current row.
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.row_height
    }

    /// Closes the current row; `index` becomes the first item of the next one.
    pub fn next_row(&mut self, index: usize) {
        self.y += self.row_height;
        self.x = 0.0;
        self.row_height = 0.0;
        self.row_start = index;
    }

    /// Places item `index` and returns its origin.
    pub fn place(&mut self, index: usize, size: OrientedSize, row_width: f32) -> OrientedPoint {
        if self.wraps(size.width, row_width) {
            self.next_row(index);
        }
        let origin = OrientedPoint::new(self.x, self.y);
        self.x += size.width;
        self.row_height = self.row_height.max(size.height);
        self.max_width = self.max_width.max(self.x);
        origin
    }
}

/// Number of items of `item_width` that fit a row, at least one.
pub fn items_per_row(row_width: f32, item_width: f32) -> usize {
    if item_width <= 0.0 || !item_width.is_finite() {
        return usize::MAX;
    }
    if !row_width.is_finite() {
        return usize::MAX;
    }
    ((row_width / item_width).floor() as usize).max(1)
}

/// Walks rows from index 0 and returns the cursor at the start of the first
/// row whose bottom reaches `start_offset`.
///
/// Falls back to the last row so at least one row is realized.
pub fn find_row_start<F>(count: usize, start_offset: f32, row_width: f32, mut size_of: F) -> RowCursor
where
    F: FnMut(usize) -> OrientedSize,
{
    let mut cursor = RowCursor::default();
    if start_offset <= 0.0 || count == 0 {
        return cursor;
    }
    let mut row_begin = cursor;
    for index in 0..count {
        let size = size_of(index);
        if cursor.wraps(size.width, row_width) {
            if cursor.bottom() >= start_offset {
                return row_begin;
            }
            cursor.next_row(index);
            row_begin = RowCursor::at_row(cursor.y, index);
        }
        cursor.place(index, size, row_width);
    }
    row_begin
}

/// Cursor state right before item `index` is placed.
pub fn cursor_before<F>(index: usize, row_width: f32, mut size_of: F) -> RowCursor
where
    F: FnMut(usize) -> OrientedSize,
{
    let mut cursor = RowCursor::default();
    for i in 0..index {
        cursor.place(i, size_of(i), row_width);
    }
    cursor
}

/// Total size covered by all `count` items.
pub fn walk_extent<F>(count: usize, row_width: f32, size_of: F) -> OrientedSize
where
    F: FnMut(usize) -> OrientedSize,
{
    let cursor = cursor_before(count, row_width, size_of);
    OrientedSize::new(cursor.max_width, cursor.bottom())
}

/// Arithmetic walk for collections where every item has the same size.
#[derive(Clone, Copy, Debug)]
pub struct UniformRows {
    pub count: usize,
    pub item: OrientedSize,
    pub per_row: usize,
}

impl UniformRows {
    pub fn new(count: usize, item: OrientedSize, row_width: f32) -> Self {
        Self {
            count,
            item,
            per_row: items_per_row(row_width, item.width),
        }
    }

    pub fn rows(&self) -> usize {
        if self.count == 0 {
            0
        } else {
            (self.count - 1) / self.per_row + 1
        }
    }

    pub fn extent(&self) -> OrientedSize {
        let columns = self.per_row.min(self.count);
        OrientedSize::new(
            columns as f32 * self.item.width,
            self.rows() as f32 * self.item.height,
        )
    }

    /// Same answer as [`find_row_start`] without walking.
    pub fn find_row_start(&self, start_offset: f32) -> RowCursor {
        if start_offset <= 0.0 || self.count == 0 || self.item.height <= 0.0 {
            return RowCursor::default();
        }
        let row = ((start_offset / self.item.height).ceil() as usize)
            .saturating_sub(1)
            .min(self.rows() - 1);
        RowCursor::at_row(row as f32 * self.item.height, row * self.per_row)
    }

    /// Same answer as [`cursor_before`] without walking.
    pub fn cursor_before(&self, index: usize) -> RowCursor {
        if index == 0 {
            return RowCursor::default();
        }
        // The walk only wraps when the next item is placed, so the cursor
        // still sits at the end of the row holding `index - 1`.
        let last = index - 1;
        let row = last / self.per_row;
        let column = last % self.per_row;
        let mut cursor = RowCursor::at_row(row as f32 * self.item.height, row * self.per_row);
        cursor.x = (column + 1) as f32 * self.item.width;
        cursor.row_height = self.item.height;
        cursor.max_width = self.per_row.min(index) as f32 * self.item.width;
        cursor
    }
}
