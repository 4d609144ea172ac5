//! Viewport handling for wrap layout measurement.
//!
//! Validates the available size handed to `measure` and replaces unbounded
//! axes with a fallback so realization stays finite.

use lazywrap_geometry::{Point, Size};

/// Handles viewport size validation and provides the effective viewport size.
///
/// Detects infinite or unbounded axes (when the layout is placed in an
/// unconstrained parent) and substitutes a reasonable estimate.
#[derive(Clone, Copy, Debug)]
pub struct ViewportHandler {
    effective_size: Size,
    is_infinite: bool,
}

/// Maximum reasonable viewport length before treating it as infinite.
const MAX_REASONABLE_VIEWPORT: f32 = 100_000.0;

/// Number of average items covered by the fallback viewport.
const INFINITE_VIEWPORT_ITEM_COUNT: f32 = 20.0;

impl ViewportHandler {
    /// Creates a handler for `available`, using `average_item_size` to size
    /// the fallback on any unbounded axis.
    pub fn new(available: Size, average_item_size: Size) -> Self {
        let (width, width_infinite) = Self::axis(available.width, average_item_size.width);
        let (height, height_infinite) = Self::axis(available.height, average_item_size.height);
        if width_infinite || height_infinite {
            log::warn!(
                "WrapLayout: detected unbounded viewport ({}x{}), using fallback {}x{}. \
                 Consider placing the layout in a constrained container.",
                available.width,
                available.height,
                width,
                height
            );
        }
        Self {
            effective_size: Size::new(width, height),
            is_infinite: width_infinite || height_infinite,
        }
    }

    fn axis(length: f32, average: f32) -> (f32, bool) {
        if length.is_infinite() || length > MAX_REASONABLE_VIEWPORT {
            let average = if average.is_finite() && average > 0.0 {
                average
            } else {
                super::config::DEFAULT_ITEM_SIZE_ESTIMATE
            };
            (average * INFINITE_VIEWPORT_ITEM_COUNT, true)
        } else if length.is_nan() {
            (0.0, false)
        } else {
            (length.max(0.0), false)
        }
    }

    /// Returns the effective viewport size to use for measurement.
    #[inline]
    pub fn effective_size(&self) -> Size {
        self.effective_size
    }

    /// Returns whether any axis was detected as infinite.
    #[inline]
    pub fn is_infinite(&self) -> bool {
        self.is_infinite
    }
}

/// Viewport, scroll offset and extent as last published by the layout.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewportState {
    pub viewport: Size,
    pub offset: Point,
    pub extent: Size,
}

impl ViewportState {
    /// Largest offset the extent allows on each axis.
    pub fn max_offset(&self) -> Point {
        Point::new(
            (self.extent.width - self.viewport.width).max(0.0),
            (self.extent.height - self.viewport.height).max(0.0),
        )
    }

    /// Clamps `offset` into `[0, extent - viewport]` per axis.
    pub fn clamp(&self, offset: Point) -> Point {
        let max = self.max_offset();
        Point::new(clamp_axis(offset.x, max.x), clamp_axis(offset.y, max.y))
    }
}

fn clamp_axis(value: f32, max: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lazy::config::DEFAULT_ITEM_SIZE_ESTIMATE;

    #[test]
    fn test_normal_viewport() {
        let handler = ViewportHandler::new(Size::new(500.0, 400.0), Size::new(50.0, 50.0));
        assert_eq!(handler.effective_size(), Size::new(500.0, 400.0));
        assert!(!handler.is_infinite());
    }

    #[test]
    fn test_infinite_height() {
        let handler = ViewportHandler::new(Size::new(500.0, f32::INFINITY), Size::new(50.0, 40.0));
        assert!(handler.is_infinite());
        // 40 * 20 = 800
        assert_eq!(handler.effective_size(), Size::new(500.0, 800.0));
    }

    #[test]
    fn test_huge_viewport_treated_as_infinite() {
        let handler = ViewportHandler::new(Size::new(200_000.0, 300.0), Size::new(50.0, 50.0));
        assert!(handler.is_infinite());
        assert!(handler.effective_size().width < 100_000.0);
    }

    #[test]
    fn test_uses_default_estimate_when_average_is_zero() {
        let handler = ViewportHandler::new(Size::INFINITE, Size::ZERO);
        assert_eq!(
            handler.effective_size(),
            Size::new(
                DEFAULT_ITEM_SIZE_ESTIMATE * 20.0,
                DEFAULT_ITEM_SIZE_ESTIMATE * 20.0
            )
        );
    }

    #[test]
    fn test_clamp_offset_into_scrollable_range() {
        let state = ViewportState {
            viewport: Size::new(500.0, 400.0),
            offset: Point::ZERO,
            extent: Size::new(500.0, 2000.0),
        };
        assert_eq!(state.clamp(Point::new(30.0, 5000.0)), Point::new(0.0, 1600.0));
        assert_eq!(state.clamp(Point::new(-3.0, -1.0)), Point::ZERO);
    }
}
