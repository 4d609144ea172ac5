//! Arrange-pass row packing: rebuilds rows from final sizes and spreads the
//! unused width of each row according to the spacing mode.

use lazywrap_geometry::{OrientedPoint, OrientedSize};
use smallvec::SmallVec;

use super::config::SpacingMode;
use super::container::ContainerId;
use super::row_walker::items_per_row;
use super::spacing::row_spacing;

/// One item taking part in row packing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RowEntry {
    /// `None` for items that share a row with realized items but are not
    /// realized themselves. They occupy space and are not placed.
    pub id: Option<ContainerId>,
    pub size: OrientedSize,
    /// Upper bound on the width when stretching.
    pub max_width: f32,
}

/// Final row-relative bounds of a realized container.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedItem {
    pub id: ContainerId,
    pub origin: OrientedPoint,
    pub size: OrientedSize,
}

/// Packs entries into rows and places them.
pub struct RowArranger {
    row_width: f32,
    spacing_mode: SpacingMode,
    stretch: bool,
    uniform_width: Option<f32>,
    y: f32,
    used: f32,
    row: SmallVec<[RowEntry; 16]>,
    placed: Vec<PlacedItem>,
}

impl RowArranger {
    /// `uniform_width` is set when every item shares one size; spacing is
    /// then computed from how many items of that width fit a row.
    pub fn new(
        row_width: f32,
        start_y: f32,
        spacing_mode: SpacingMode,
        stretch: bool,
        uniform_width: Option<f32>,
    ) -> Self {
        Self {
            row_width,
            spacing_mode,
            stretch,
            uniform_width,
            y: start_y,
            used: 0.0,
            row: SmallVec::new(),
            placed: Vec::new(),
        }
    }

    pub fn push(&mut self, entry: RowEntry) {
        if self.used != 0.0 && self.used + entry.size.width > self.row_width {
            self.flush_row();
        }
        self.used += entry.size.width;
        self.row.push(entry);
    }

    /// Places the last row and returns every realized item in push order.
    pub fn finish(mut self) -> Vec<PlacedItem> {
        self.flush_row();
        self.placed
    }

    fn flush_row(&mut self) {
        if self.row.is_empty() {
            return;
        }
        let mut extras: SmallVec<[f32; 16]> = SmallVec::with_capacity(self.row.len());
        let (summed, n) = match self.uniform_width {
            Some(width) => self.uniform_row(width, &mut extras),
            None => self.variable_row(&mut extras),
        };
        let spacing = row_spacing(self.spacing_mode, self.row_width, summed, n);

        let mut x = spacing.outer;
        let mut row_height: f32 = 0.0;
        for (entry, extra) in self.row.iter().zip(extras.iter().copied()) {
            let width = entry.size.width + extra;
            if let Some(id) = entry.id {
                self.placed.push(PlacedItem {
                    id,
                    origin: OrientedPoint::new(x, self.y),
                    size: OrientedSize::new(width, entry.size.height),
                });
            }
            x += width + spacing.inner;
            row_height = row_height.max(entry.size.height);
        }

        self.y += row_height;
        self.used = 0.0;
        self.row.clear();
    }

    fn uniform_row(&self, width: f32, extras: &mut SmallVec<[f32; 16]>) -> (f32, usize) {
        let per_row = match items_per_row(self.row_width, width) {
            usize::MAX => self.row.len(),
            per_row => per_row,
        };
        let mut column_width = width;
        if self.stretch && self.row_width.is_finite() {
            let max_width = self
                .row
                .iter()
                .map(|entry| entry.max_width)
                .fold(f32::INFINITY, f32::min);
            column_width = (self.row_width / per_row as f32).min(max_width).max(width);
        }
        extras.extend(self.row.iter().map(|_| column_width - width));
        (per_row as f32 * column_width, per_row)
    }

    fn variable_row(&self, extras: &mut SmallVec<[f32; 16]>) -> (f32, usize) {
        let mut summed: f32 = self.row.iter().map(|entry| entry.size.width).sum();
        if self.stretch && self.row_width.is_finite() && summed < self.row_width {
            let share = (self.row_width - summed) / self.row.len() as f32;
            for entry in &self.row {
                let extra = share.min(entry.max_width - entry.size.width).max(0.0);
                extras.push(extra);
                summed += extra;
            }
        } else {
            extras.extend(self.row.iter().map(|_| 0.0));
        }
        (summed, self.row.len())
    }
}
