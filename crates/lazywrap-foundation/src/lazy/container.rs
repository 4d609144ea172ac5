//! Collaborator contracts: containers, their factory, the children
//! collection and the optional item size oracle.
//!
//! The layout never talks to a rendering surface directly. Hosts adapt their
//! own element types to these traits; tests use the doubles from
//! `lazywrap-testing`.

use std::fmt;

use lazywrap_geometry::{Rect, Size};

/// Handle to a container slot in the [`ItemContainerManager`] arena.
///
/// The generation changes whenever a slot's container is destroyed, so a
/// stale handle never resolves to a newer container.
///
/// [`ItemContainerManager`]: super::ItemContainerManager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerId {
    slot: u32,
    generation: u32,
}

impl ContainerId {
    #[inline]
    pub(crate) fn new(slot: u32, generation: u32) -> Self {
        Self { slot, generation }
    }

    #[inline]
    pub fn slot(self) -> usize {
        self.slot as usize
    }

    #[inline]
    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "container {}v{}", self.slot, self.generation)
    }
}

/// The realized visual representation of one item.
pub trait Container {
    /// Measures the container against `available` and returns its desired size.
    fn measure(&mut self, available: Size) -> Size;

    /// Size produced by the last [`measure`](Self::measure).
    fn desired_size(&self) -> Size;

    /// False once the bound item or its content changed since the last measure.
    fn is_measure_valid(&self) -> bool;

    /// Places the container at its final bounds.
    fn arrange(&mut self, rect: Rect);

    /// Upper bound used when stretching items into unused row space.
    fn max_size(&self) -> Size {
        Size::INFINITE
    }
}

/// Creates containers and binds them to items.
///
/// Binding a container to a different item must invalidate its measurement.
pub trait ContainerFactory {
    type Item;
    type Container: Container;

    fn create(&mut self) -> Self::Container;

    fn bind(&mut self, container: &mut Self::Container, item: &Self::Item, index: usize);

    /// Called when a container enters the recycle pool.
    fn unbind(&mut self, container: &mut Self::Container) {
        let _ = container;
    }

    /// Called when a container is dropped for good.
    fn destroy(&mut self, container: Self::Container) {
        drop(container);
    }
}

/// The set of containers currently attached to the visual surface.
pub trait ChildrenCollection<C> {
    fn add_child(&mut self, id: ContainerId, container: &C);

    fn remove_child(&mut self, id: ContainerId);
}

/// Supplies an item's size without measuring it.
///
/// When present, the oracle wins over measured and cached sizes.
pub trait ItemSizeOracle<T> {
    fn size_for_item(&self, item: &T) -> Size;
}

impl<T, F> ItemSizeOracle<T> for F
where
    F: Fn(&T) -> Size,
{
    fn size_for_item(&self, item: &T) -> Size {
        self(item)
    }
}
