//! Configuration surface of the wrap layout.

use lazywrap_geometry::{Orientation, Size};

/// Default estimated item extent for scroll calculations.
/// Used on both axes when nothing has been measured yet.
pub const DEFAULT_ITEM_SIZE_ESTIMATE: f32 = 48.0;

/// Unit in which [`CacheLength`] is expressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CacheLengthUnit {
    /// Device-independent pixels along the scrolling axis.
    Pixel,
    /// A number of items.
    Item,
    /// Multiples of the viewport length.
    #[default]
    Page,
}

/// How far outside the viewport items stay realized.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CacheLength {
    pub before: f32,
    pub after: f32,
}

impl CacheLength {
    pub const ZERO: CacheLength = CacheLength {
        before: 0.0,
        after: 0.0,
    };

    pub const fn new(before: f32, after: f32) -> Self {
        Self { before, after }
    }

    pub const fn uniform(length: f32) -> Self {
        Self {
            before: length,
            after: length,
        }
    }
}

impl Default for CacheLength {
    fn default() -> Self {
        Self::uniform(1.0)
    }
}

/// Policy for distributing unused row space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SpacingMode {
    /// Items are packed at the row start.
    None,
    /// Equal gaps before, between and after items.
    #[default]
    Uniform,
    /// Gaps only between items; the row ends touch the edges.
    BetweenItemsOnly,
    /// Items are packed together and centered in the row.
    StartAndEndOnly,
}

/// Unit used by line and wheel scroll steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ScrollUnit {
    Pixel,
    #[default]
    Item,
}

/// Line, page and wheel step configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollSteps {
    pub unit: ScrollUnit,
    pub line_delta_pixels: f32,
    pub wheel_delta_pixels: f32,
    pub line_delta_items: usize,
    pub wheel_delta_items: usize,
}

impl Default for ScrollSteps {
    fn default() -> Self {
        Self {
            unit: ScrollUnit::Item,
            line_delta_pixels: 16.0,
            wheel_delta_pixels: 48.0,
            line_delta_items: 1,
            wheel_delta_items: 3,
        }
    }
}

/// Configuration for the wrap layout.
#[derive(Clone, Debug, PartialEq)]
pub struct WrapLayoutConfig {
    /// Primary wrap axis. Rows run along it and stack along the other axis.
    pub orientation: Orientation,

    /// Fixed size applied to every item. Takes priority over measuring.
    pub item_size: Option<Size>,

    /// When false, the first measured item's size is assumed for all items.
    pub allow_different_sized_items: bool,

    /// Distribution of unused row space during arrange.
    pub spacing_mode: SpacingMode,

    /// Grow items into unused row space, bounded by their maximum size.
    pub stretch_items: bool,

    /// Realization margin outside the viewport.
    pub cache_length: CacheLength,

    pub cache_unit: CacheLengthUnit,

    pub scroll: ScrollSteps,
}

impl Default for WrapLayoutConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::Horizontal,
            item_size: None,
            allow_different_sized_items: false,
            spacing_mode: SpacingMode::Uniform,
            stretch_items: false,
            cache_length: CacheLength::default(),
            cache_unit: CacheLengthUnit::Page,
            scroll: ScrollSteps::default(),
        }
    }
}

impl WrapLayoutConfig {
    /// Pixel margin kept realized before the viewport.
    ///
    /// Zero for [`CacheLengthUnit::Item`]; that unit backs up by item count.
    pub fn cache_before_pixels(&self, viewport_length: f32) -> f32 {
        self.margin_pixels(self.cache_length.before, viewport_length)
    }

    /// Pixel margin kept realized after the viewport.
    pub fn cache_after_pixels(&self, viewport_length: f32) -> f32 {
        self.margin_pixels(self.cache_length.after, viewport_length)
    }

    /// Item-count margin before the viewport (Item unit only).
    pub fn cache_before_items(&self) -> usize {
        self.margin_items(self.cache_length.before)
    }

    /// Item-count margin after the viewport (Item unit only).
    pub fn cache_after_items(&self) -> usize {
        self.margin_items(self.cache_length.after)
    }

    fn margin_pixels(&self, length: f32, viewport_length: f32) -> f32 {
        let length = length.max(0.0);
        match self.cache_unit {
            CacheLengthUnit::Pixel => length,
            CacheLengthUnit::Page => length * viewport_length,
            CacheLengthUnit::Item => 0.0,
        }
    }

    fn margin_items(&self, length: f32) -> usize {
        match self.cache_unit {
            CacheLengthUnit::Item => length.max(0.0).round() as usize,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_unit_scales_with_viewport() {
        let config = WrapLayoutConfig {
            cache_length: CacheLength::new(1.0, 0.5),
            cache_unit: CacheLengthUnit::Page,
            ..Default::default()
        };
        assert_eq!(config.cache_before_pixels(400.0), 400.0);
        assert_eq!(config.cache_after_pixels(400.0), 200.0);
        assert_eq!(config.cache_before_items(), 0);
    }

    #[test]
    fn item_unit_has_no_pixel_margin() {
        let config = WrapLayoutConfig {
            cache_length: CacheLength::uniform(10.0),
            cache_unit: CacheLengthUnit::Item,
            ..Default::default()
        };
        assert_eq!(config.cache_before_pixels(400.0), 0.0);
        assert_eq!(config.cache_before_items(), 10);
        assert_eq!(config.cache_after_items(), 10);
    }

    #[test]
    fn negative_lengths_are_ignored() {
        let config = WrapLayoutConfig {
            cache_length: CacheLength::new(-5.0, 12.0),
            cache_unit: CacheLengthUnit::Pixel,
            ..Default::default()
        };
        assert_eq!(config.cache_before_pixels(400.0), 0.0);
        assert_eq!(config.cache_after_pixels(400.0), 12.0);
    }
}
