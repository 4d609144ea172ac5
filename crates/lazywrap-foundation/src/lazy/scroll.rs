//! Scrolling surface of [`WrapLayout`]: offsets, step deltas and
//! scroll-into-view.

use lazywrap_geometry::{OrientedPoint, Point};

use super::config::ScrollUnit;
use super::container::{ChildrenCollection, ContainerFactory};
use super::error::{LayoutError, LayoutResult};
use super::events::LayoutEvent;
use super::wrap_layout::WrapLayout;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

impl<F, H> WrapLayout<F, H>
where
    F: ContainerFactory,
    H: ChildrenCollection<F::Container>,
{
    /// Sets the horizontal offset, clamped to `[0, extent - viewport]`.
    ///
    /// Returns false and notifies nobody when the clamped value equals the
    /// current offset.
    pub fn set_horizontal_offset(&mut self, value: f32) -> bool {
        self.set_offset(Point::new(value, self.state.offset.y))
    }

    /// Sets the vertical offset, clamped to `[0, extent - viewport]`.
    pub fn set_vertical_offset(&mut self, value: f32) -> bool {
        self.set_offset(Point::new(self.state.offset.x, value))
    }

    /// Moves the offset by a signed delta on each axis.
    pub fn scroll_by(&mut self, dx: f32, dy: f32) -> bool {
        let offset = self.state.offset;
        self.set_offset(Point::new(offset.x + dx, offset.y + dy))
    }

    fn set_offset(&mut self, offset: Point) -> bool {
        let clamped = self.state.clamp(offset);
        if clamped == self.state.offset {
            return false;
        }
        log::trace!("offset {:?} -> {:?}", self.state.offset, clamped);
        self.state.offset = clamped;
        self.listeners.notify(&LayoutEvent::ScrollInfoInvalidated);
        self.invalidate_measure();
        true
    }

    pub fn line_up_delta(&self) -> f32 {
        -self.line_step(Axis::Vertical)
    }

    pub fn line_down_delta(&self) -> f32 {
        self.line_step(Axis::Vertical)
    }

    pub fn line_left_delta(&self) -> f32 {
        -self.line_step(Axis::Horizontal)
    }

    pub fn line_right_delta(&self) -> f32 {
        self.line_step(Axis::Horizontal)
    }

    pub fn page_up_delta(&self) -> f32 {
        -self.state.viewport.height
    }

    pub fn page_down_delta(&self) -> f32 {
        self.state.viewport.height
    }

    pub fn page_left_delta(&self) -> f32 {
        -self.state.viewport.width
    }

    pub fn page_right_delta(&self) -> f32 {
        self.state.viewport.width
    }

    pub fn mouse_wheel_up_delta(&self) -> f32 {
        -self.wheel_step(Axis::Vertical)
    }

    pub fn mouse_wheel_down_delta(&self) -> f32 {
        self.wheel_step(Axis::Vertical)
    }

    pub fn mouse_wheel_left_delta(&self) -> f32 {
        -self.wheel_step(Axis::Horizontal)
    }

    pub fn mouse_wheel_right_delta(&self) -> f32 {
        self.wheel_step(Axis::Horizontal)
    }

    fn line_step(&self, axis: Axis) -> f32 {
        let steps = self.config.scroll;
        self.step(axis, steps.line_delta_pixels, steps.line_delta_items)
    }

    fn wheel_step(&self, axis: Axis) -> f32 {
        let steps = self.config.scroll;
        self.step(axis, steps.wheel_delta_pixels, steps.wheel_delta_items)
    }

    fn step(&self, axis: Axis, pixels: f32, items: usize) -> f32 {
        match self.config.scroll.unit {
            ScrollUnit::Pixel => pixels,
            ScrollUnit::Item => {
                let average = self.resolver().average_size();
                let (item, viewport) = match axis {
                    Axis::Horizontal => (average.width, self.state.viewport.width),
                    Axis::Vertical => (average.height, self.state.viewport.height),
                };
                let step = item * items as f32;
                if viewport > 0.0 {
                    step.min(viewport)
                } else {
                    step
                }
            }
        }
    }

    /// Scrolls the minimum distance that makes item `index` fully visible.
    ///
    /// The extent grows if needed so the item's row can be reached before
    /// the next measure pass refines it.
    pub fn bring_index_into_view(&mut self, index: usize) -> LayoutResult<()> {
        let count = self.manager.items().len();
        if index >= count {
            return Err(LayoutError::InvalidArgument { index, count });
        }
        let orientation = self.config.orientation;
        let view = orientation.orient_size(self.state.viewport);
        let (mut cursor, size) = self.locate(index, view.width);
        let origin = cursor.place(index, size, view.width);

        let mut extent = orientation.orient_size(self.state.extent);
        let grown_extent = extent.height < origin.y + size.height || extent.width < origin.x + size.width;
        extent.height = extent.height.max(origin.y + size.height);
        extent.width = extent.width.max(origin.x + size.width);
        self.state.extent = orientation.screen_size(extent);

        let offset = orientation.orient_point(self.state.offset);
        let target = OrientedPoint::new(
            reveal(offset.x, view.width, origin.x, size.width),
            reveal(offset.y, view.height, origin.y, size.height),
        );
        log::debug!("bring index {index} into view at {:?}", origin);

        let moved = self.set_offset(orientation.screen_point(target));
        if !moved && grown_extent {
            self.listeners.notify(&LayoutEvent::ScrollInfoInvalidated);
        }
        Ok(())
    }
}

/// Offset on one axis that makes `[start, start + length)` visible.
fn reveal(offset: f32, viewport: f32, start: f32, length: f32) -> f32 {
    if start < offset || length > viewport {
        start
    } else if start + length > offset + viewport {
        start + length - viewport
    } else {
        offset
    }
}

#[cfg(test)]
mod tests {
    use super::reveal;

    #[test]
    fn test_reveal_keeps_visible_item() {
        assert_eq!(reveal(100.0, 400.0, 200.0, 100.0), 100.0);
    }

    #[test]
    fn test_reveal_scrolls_minimum_distance() {
        assert_eq!(reveal(0.0, 400.0, 900.0, 100.0), 600.0);
        assert_eq!(reveal(500.0, 400.0, 200.0, 100.0), 200.0);
    }

    #[test]
    fn test_reveal_aligns_oversized_item_to_start() {
        assert_eq!(reveal(0.0, 400.0, 900.0, 600.0), 900.0);
    }
}
