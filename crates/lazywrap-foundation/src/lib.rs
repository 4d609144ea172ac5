//! Foundation of lazywrap: a virtualized wrap layout engine.
//!
//! The engine decides, for a very large ordered collection, which items are
//! realized as containers, where each realized item sits, and how large the
//! scrollable extent is. Rendering, input and styling stay with the host and
//! are reached only through the traits in [`lazy`].

pub mod collections;
pub mod lazy;

pub use lazy::*;
pub use lazywrap_geometry::{OrientedPoint, OrientedSize, Orientation, Point, Rect, Size};

pub mod prelude {
    pub use crate::lazy::{
        CacheLength, CacheLengthUnit, ChildrenCollection, Container, ContainerFactory,
        ContainerId, ItemContainerManager, ItemKey, ItemSizeOracle, ItemsChanged,
        ItemsChangedAction, LayoutError, LayoutEvent, LayoutResult, LazyLayoutStats, ScrollUnit,
        SpacingMode, VirtualizationMode, WrapLayout, WrapLayoutConfig,
    };
    pub use lazywrap_geometry::prelude::*;
}
