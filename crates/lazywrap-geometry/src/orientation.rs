use crate::geometry::{Point, Rect, Size};

/// Primary wrap axis of a wrap layout.
///
/// Items are packed along the orientation axis until a row is full, then the
/// layout wraps to a new row stacked along the other axis, which is also the
/// scrolling axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Rows run left to right and stack top to bottom (vertical scrolling).
    #[default]
    Horizontal,

    /// Rows run top to bottom and stack left to right (horizontal scrolling).
    Vertical,
}

/// A size expressed relative to an [`Orientation`].
///
/// `width` is measured along a row, `height` along the stacking (scrolling)
/// axis.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct OrientedSize {
    pub width: f32,
    pub height: f32,
}

impl OrientedSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub const ZERO: OrientedSize = OrientedSize {
        width: 0.0,
        height: 0.0,
    };
}

/// A point expressed relative to an [`Orientation`].
///
/// `x` runs along a row, `y` along the stacking axis.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct OrientedPoint {
    pub x: f32,
    pub y: f32,
}

impl OrientedPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub const ZERO: OrientedPoint = OrientedPoint { x: 0.0, y: 0.0 };
}

impl Orientation {
    /// Returns the other orientation.
    #[inline]
    pub fn flipped(self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }

    #[inline]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Orientation::Horizontal)
    }

    #[inline]
    pub fn is_vertical(self) -> bool {
        matches!(self, Orientation::Vertical)
    }

    /// Converts a screen-space size into row-relative terms.
    #[inline]
    pub fn orient_size(self, size: Size) -> OrientedSize {
        match self {
            Orientation::Horizontal => OrientedSize::new(size.width, size.height),
            Orientation::Vertical => OrientedSize::new(size.height, size.width),
        }
    }

    /// Converts a row-relative size back into screen space.
    #[inline]
    pub fn screen_size(self, size: OrientedSize) -> Size {
        match self {
            Orientation::Horizontal => Size::new(size.width, size.height),
            Orientation::Vertical => Size::new(size.height, size.width),
        }
    }

    #[inline]
    pub fn orient_point(self, point: Point) -> OrientedPoint {
        match self {
            Orientation::Horizontal => OrientedPoint::new(point.x, point.y),
            Orientation::Vertical => OrientedPoint::new(point.y, point.x),
        }
    }

    #[inline]
    pub fn screen_point(self, point: OrientedPoint) -> Point {
        match self {
            Orientation::Horizontal => Point::new(point.x, point.y),
            Orientation::Vertical => Point::new(point.y, point.x),
        }
    }

    /// Builds a screen-space rectangle from a row-relative origin and size.
    pub fn screen_rect(self, origin: OrientedPoint, size: OrientedSize) -> Rect {
        Rect::from_origin_size(self.screen_point(origin), self.screen_size(size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertical_orientation_swaps_axes() {
        let oriented = Orientation::Vertical.orient_size(Size::new(10.0, 30.0));
        assert_eq!(oriented, OrientedSize::new(30.0, 10.0));
        assert_eq!(
            Orientation::Vertical.screen_size(oriented),
            Size::new(10.0, 30.0)
        );
    }

    #[test]
    fn screen_rect_places_row_origin() {
        let rect = Orientation::Vertical
            .screen_rect(OrientedPoint::new(5.0, 50.0), OrientedSize::new(20.0, 40.0));
        assert_eq!(rect, Rect::new(50.0, 5.0, 40.0, 20.0));
    }
}
