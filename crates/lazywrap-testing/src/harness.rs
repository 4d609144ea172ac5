//! Harness wiring a [`WrapLayout`] to the test doubles.

use std::cell::RefCell;
use std::rc::Rc;

use lazywrap_foundation::{
    ItemCollection, LayoutEvent, LayoutResult, WrapLayout, WrapLayoutConfig,
};
use lazywrap_geometry::{Rect, Size};

use crate::doubles::{RecordingChildren, TestContainer, TestContainerFactory, TestItem};

pub type TestWrapLayout = WrapLayout<TestContainerFactory, RecordingChildren>;

/// Owns a layout, a fixed viewport and a log of emitted layout events.
pub struct WrapLayoutHarness {
    pub layout: TestWrapLayout,
    pub viewport: Size,
    events: Rc<RefCell<Vec<LayoutEvent>>>,
}

impl WrapLayoutHarness {
    pub fn new(items: Vec<TestItem>, config: WrapLayoutConfig, viewport: Size) -> Self {
        Self::with_factory(items, config, viewport, TestContainerFactory::default())
    }

    pub fn with_factory(
        items: Vec<TestItem>,
        config: WrapLayoutConfig,
        viewport: Size,
        factory: TestContainerFactory,
    ) -> Self {
        let items: ItemCollection<TestItem> = items.into_iter().collect();
        let mut layout = WrapLayout::new(factory, RecordingChildren::default(), items, config);
        let events = Rc::new(RefCell::new(Vec::new()));
        {
            let events = Rc::clone(&events);
            layout.add_listener(Rc::new(move |event: &LayoutEvent| {
                events.borrow_mut().push(*event)
            }));
        }
        Self {
            layout,
            viewport,
            events,
        }
    }

    /// `count` items that all measure to `size`.
    pub fn uniform(count: u32, size: Size, config: WrapLayoutConfig, viewport: Size) -> Self {
        let items = (0..count)
            .map(|id| TestItem::sized(id, size.width, size.height))
            .collect();
        Self::new(items, config, viewport)
    }

    /// Runs measure then arrange against the harness viewport.
    pub fn layout(&mut self) -> LayoutResult<()> {
        self.layout.measure(self.viewport)?;
        self.layout.arrange(self.viewport)?;
        Ok(())
    }

    /// Lays out repeatedly until no further measure is requested.
    pub fn settle(&mut self) -> LayoutResult<()> {
        self.layout()?;
        for _ in 0..4 {
            if !self.layout.needs_measure() {
                break;
            }
            self.layout()?;
        }
        Ok(())
    }

    pub fn scroll_to(&mut self, vertical_offset: f32) -> LayoutResult<()> {
        self.layout.set_vertical_offset(vertical_offset);
        self.layout()
    }

    /// Indices whose items currently have a realized container.
    pub fn realized_indices(&self) -> Vec<usize> {
        let layout = &self.layout;
        layout
            .items()
            .keys()
            .enumerate()
            .filter(|(_, key)| layout.manager().container_for_key(*key).is_some())
            .map(|(index, _)| index)
            .collect()
    }

    pub fn realized_count(&self) -> usize {
        self.layout.manager().realized_count()
    }

    pub fn container(&self, index: usize) -> Option<&TestContainer> {
        let id = self.layout.container_for_index(index)?;
        self.layout.manager().container(id)
    }

    /// Bounds last given to the container of item `index`.
    pub fn arranged_rect(&self, index: usize) -> Option<Rect> {
        self.container(index).and_then(|container| container.arranged)
    }

    pub fn children(&self) -> &RecordingChildren {
        self.layout.manager().children()
    }

    pub fn factory(&self) -> &TestContainerFactory {
        self.layout.manager().factory()
    }

    /// Drains the events recorded so far.
    pub fn take_events(&self) -> Vec<LayoutEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }
}
