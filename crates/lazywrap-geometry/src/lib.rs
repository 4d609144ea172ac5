//! Geometry primitives for lazywrap
//!
//! Screen-space `Point`, `Size` and `Rect`, plus the [`Orientation`] helpers
//! that translate them into row-relative coordinates for the wrap layout.

mod geometry;
mod orientation;

pub use geometry::*;
pub use orientation::*;

pub mod prelude {
    pub use crate::geometry::{Point, Rect, Size};
    pub use crate::orientation::{OrientedPoint, OrientedSize, Orientation};
}
