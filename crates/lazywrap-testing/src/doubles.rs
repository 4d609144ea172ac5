//! Deterministic collaborators for driving a [`WrapLayout`] without a
//! rendering surface.
//!
//! [`WrapLayout`]: lazywrap_foundation::WrapLayout

use lazywrap_foundation::collections::map::HashMap;
use lazywrap_foundation::{ChildrenCollection, Container, ContainerFactory, ContainerId, ItemSizeOracle};
use lazywrap_geometry::{Rect, Size};

/// An item that knows the size its container will measure to.
#[derive(Clone, Debug, PartialEq)]
pub struct TestItem {
    pub id: u32,
    pub size: Size,
}

impl TestItem {
    pub fn sized(id: u32, width: f32, height: f32) -> Self {
        Self {
            id,
            size: Size::new(width, height),
        }
    }
}

/// Container whose desired size is its bound item's size.
#[derive(Debug, Default)]
pub struct TestContainer {
    pub item: Option<TestItem>,
    pub index: Option<usize>,
    pub measure_calls: usize,
    pub arranged: Option<Rect>,
    pub max_size: Option<Size>,
    desired: Size,
    measure_valid: bool,
}

impl TestContainer {
    /// Marks the content as changed so the next pass measures again.
    pub fn invalidate_measure(&mut self) {
        self.measure_valid = false;
    }
}

impl Container for TestContainer {
    fn measure(&mut self, available: Size) -> Size {
        self.measure_calls += 1;
        let size = self.item.as_ref().map(|item| item.size).unwrap_or(Size::ZERO);
        self.desired = size.min(available);
        self.measure_valid = true;
        self.desired
    }

    fn desired_size(&self) -> Size {
        self.desired
    }

    fn is_measure_valid(&self) -> bool {
        self.measure_valid
    }

    fn arrange(&mut self, rect: Rect) {
        self.arranged = Some(rect);
    }

    fn max_size(&self) -> Size {
        self.max_size.unwrap_or(Size::INFINITE)
    }
}

/// Factory that counts container lifecycle calls.
#[derive(Debug, Default)]
pub struct TestContainerFactory {
    pub created: usize,
    pub destroyed: usize,
    pub binds: usize,
    /// Maximum size given to every created container.
    pub max_size: Option<Size>,
}

impl ContainerFactory for TestContainerFactory {
    type Item = TestItem;
    type Container = TestContainer;

    fn create(&mut self) -> TestContainer {
        self.created += 1;
        TestContainer {
            max_size: self.max_size,
            ..TestContainer::default()
        }
    }

    fn bind(&mut self, container: &mut TestContainer, item: &TestItem, index: usize) {
        self.binds += 1;
        container.item = Some(item.clone());
        container.index = Some(index);
        container.arranged = None;
        container.measure_valid = false;
    }

    fn unbind(&mut self, container: &mut TestContainer) {
        container.item = None;
        container.index = None;
        container.arranged = None;
    }

    fn destroy(&mut self, _container: TestContainer) {
        self.destroyed += 1;
    }
}

/// Children collection that records attached containers in attach order.
#[derive(Debug, Default)]
pub struct RecordingChildren {
    attached: Vec<ContainerId>,
    pub adds: usize,
    pub removes: usize,
}

impl RecordingChildren {
    pub fn ids(&self) -> &[ContainerId] {
        &self.attached
    }

    pub fn len(&self) -> usize {
        self.attached.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attached.is_empty()
    }

    pub fn contains(&self, id: ContainerId) -> bool {
        self.attached.contains(&id)
    }
}

impl<C> ChildrenCollection<C> for RecordingChildren {
    fn add_child(&mut self, id: ContainerId, _container: &C) {
        self.adds += 1;
        self.attached.push(id);
    }

    fn remove_child(&mut self, id: ContainerId) {
        self.removes += 1;
        self.attached.retain(|child| *child != id);
    }
}

/// Size oracle backed by a table keyed by item id.
#[derive(Debug, Default)]
pub struct MapSizeOracle {
    sizes: HashMap<u32, Size>,
}

impl MapSizeOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size(mut self, id: u32, size: Size) -> Self {
        self.sizes.insert(id, size);
        self
    }

    /// Oracle that reports every item's own size.
    pub fn from_items<'a>(items: impl IntoIterator<Item = &'a TestItem>) -> Self {
        Self {
            sizes: items.into_iter().map(|item| (item.id, item.size)).collect(),
        }
    }
}

impl ItemSizeOracle<TestItem> for MapSizeOracle {
    fn size_for_item(&self, item: &TestItem) -> Size {
        self.sizes.get(&item.id).copied().unwrap_or(item.size)
    }
}
