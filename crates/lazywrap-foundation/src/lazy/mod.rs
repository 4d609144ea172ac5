//! Virtualized wrap layout.
//!
//! Items are packed into rows along the orientation axis and rows stack
//! along the scrolling axis. Only items inside the viewport plus a cache
//! margin are realized as containers; everything else is virtualized.
//!
//! # Architecture
//!
//! - [`WrapLayout`] - Layout model: measure/arrange passes, extent and
//!   scroll state
//! - [`ItemContainerManager`] - Realization, virtualization and the recycle
//!   pool, keyed by [`ItemKey`]
//! - [`ContainerFactory`], [`Container`], [`ChildrenCollection`],
//!   [`ItemSizeOracle`] - Collaborator contracts implemented by the host
//! - [`WrapLayoutConfig`] - Orientation, sizing, spacing and cache margins
//!
//! # Example
//!
//! ```rust,ignore
//! use lazywrap_foundation::prelude::*;
//!
//! let mut layout = WrapLayout::new(factory, children, items, WrapLayoutConfig::default());
//! layout.measure(Size::new(500.0, 400.0))?;
//! layout.arrange(Size::new(500.0, 400.0))?;
//! layout.set_vertical_offset(layout.offset().y + layout.mouse_wheel_down_delta());
//! if layout.needs_measure() {
//!     layout.measure(Size::new(500.0, 400.0))?;
//! }
//! ```

mod config;
mod container;
mod container_manager;
mod error;
mod events;
mod extent;
mod items;
mod row_arranger;
mod row_walker;
mod scroll;
mod size_cache;
mod size_resolver;
mod spacing;
mod viewport;
mod wrap_layout;

pub use config::*;
pub use container::*;
pub use container_manager::*;
pub use error::*;
pub use events::{LayoutEvent, ListenerId};
pub use items::*;
pub use size_cache::SizeCache;
pub use wrap_layout::WrapLayout;
