//! Container lifecycle: realization, virtualization and the recycle pool.
//!
//! Containers live in an arena addressed by [`ContainerId`]. A slot is
//! either realized (bound to an item and attached to the children
//! collection), cached (detached and unbound, waiting in the recycle pool) or
//! vacant (its container was destroyed; the slot is reused with a new
//! generation).

use std::rc::Rc;

use super::container::{ChildrenCollection, ContainerFactory, ContainerId};
use super::error::{LayoutError, LayoutResult};
use super::events::{ListenerId, Listeners};
use super::items::{ItemCollection, ItemKey, ItemsChanged, ItemsChangedAction};
use crate::collections::map::HashMap;

/// Whether virtualized containers are pooled or destroyed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum VirtualizationMode {
    /// Virtualized containers are destroyed.
    Standard,
    /// Virtualized containers enter the recycle pool and are rebound later.
    #[default]
    Recycling,
}

/// Statistics about container lifecycle.
///
/// Used for testing and debugging virtualization behavior.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LazyLayoutStats {
    /// Number of containers currently realized.
    pub items_in_use: usize,

    /// Number of containers in the recycle pool.
    pub items_in_pool: usize,

    /// Total number of containers ever created.
    pub total_created: usize,

    /// Number of realizations served from the recycle pool.
    pub reuse_count: usize,
}

/// Result of [`ItemContainerManager::realize`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Realized {
    pub id: ContainerId,
    /// The item already had a container before this call.
    pub already_realized: bool,
    /// The container was created by this call rather than taken from the pool.
    pub is_new_container: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SlotState {
    Realized(ItemKey),
    Cached,
    Vacant,
}

struct Slot<C> {
    generation: u32,
    state: SlotState,
    container: Option<C>,
}

/// Turns item indices into live containers and reclaims them.
///
/// Owns the item collection so that every mutation passes through here and
/// containers of removed items are virtualized before anyone observes the
/// change.
pub struct ItemContainerManager<F: ContainerFactory, H> {
    factory: F,
    children: H,
    items: ItemCollection<F::Item>,
    mode: VirtualizationMode,
    slots: Vec<Slot<F::Container>>,
    realized: HashMap<ItemKey, ContainerId>,
    pool: Vec<ContainerId>,
    vacant: Vec<u32>,
    total_created: usize,
    reuse_count: usize,
    listeners: Listeners<ItemsChanged>,
}

impl<F, H> ItemContainerManager<F, H>
where
    F: ContainerFactory,
    H: ChildrenCollection<F::Container>,
{
    pub fn new(factory: F, children: H, items: ItemCollection<F::Item>) -> Self {
        Self {
            factory,
            children,
            items,
            mode: VirtualizationMode::default(),
            slots: Vec::new(),
            realized: HashMap::default(),
            pool: Vec::new(),
            vacant: Vec::new(),
            total_created: 0,
            reuse_count: 0,
            listeners: Listeners::default(),
        }
    }

    pub fn items(&self) -> &ItemCollection<F::Item> {
        &self.items
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn factory_mut(&mut self) -> &mut F {
        &mut self.factory
    }

    pub fn children(&self) -> &H {
        &self.children
    }

    pub fn mode(&self) -> VirtualizationMode {
        self.mode
    }

    pub fn is_recycling(&self) -> bool {
        self.mode == VirtualizationMode::Recycling
    }

    /// Switches the virtualization mode. Leaving recycling destroys the pool.
    pub fn set_mode(&mut self, mode: VirtualizationMode) {
        if self.mode == mode {
            return;
        }
        self.mode = mode;
        if mode == VirtualizationMode::Standard {
            let pooled = std::mem::take(&mut self.pool);
            log::debug!("destroying {} pooled containers", pooled.len());
            for id in pooled {
                self.destroy_slot(id);
            }
        }
    }

    /// Returns the container for the item at `index`, realizing it if needed.
    pub fn realize(&mut self, index: usize) -> LayoutResult<Realized> {
        let key = self.items.key_at(index).ok_or(LayoutError::InvalidArgument {
            index,
            count: self.items.len(),
        })?;
        if let Some(&id) = self.realized.get(&key) {
            return Ok(Realized {
                id,
                already_realized: true,
                is_new_container: false,
            });
        }

        let pooled = if self.is_recycling() {
            self.pool.pop()
        } else {
            None
        };
        let (id, is_new_container) = match pooled {
            Some(id) => {
                self.reuse_count += 1;
                (id, false)
            }
            None => (self.allocate(), true),
        };

        let slot = &mut self.slots[id.slot()];
        slot.state = SlotState::Realized(key);
        if let (Some(container), Some(item)) = (slot.container.as_mut(), self.items.get(index)) {
            self.factory.bind(container, item, index);
            self.children.add_child(id, container);
        }
        self.realized.insert(key, id);
        log::trace!("realized {key} at index {index} into {id} (new: {is_new_container})");

        Ok(Realized {
            id,
            already_realized: false,
            is_new_container,
        })
    }

    /// Virtualizes a realized container. Returns true if it was destroyed,
    /// false if it entered the recycle pool or was not realized.
    pub fn virtualize(&mut self, id: ContainerId) -> bool {
        let Some(key) = self.bound_key(id) else {
            log::warn!("virtualize called for {id}, which is not realized");
            return false;
        };
        self.realized.remove(&key);
        self.children.remove_child(id);
        log::trace!("virtualized {key} from {id}");

        if self.is_recycling() {
            let slot = &mut self.slots[id.slot()];
            slot.state = SlotState::Cached;
            if let Some(container) = slot.container.as_mut() {
                self.factory.unbind(container);
            }
            self.pool.push(id);
            false
        } else {
            self.destroy_slot(id);
            true
        }
    }

    pub fn container(&self, id: ContainerId) -> Option<&F::Container> {
        self.live_slot(id).and_then(|slot| slot.container.as_ref())
    }

    pub fn container_mut(&mut self, id: ContainerId) -> Option<&mut F::Container> {
        let slot = self.slots.get_mut(id.slot())?;
        if slot.generation != id.generation() || slot.state == SlotState::Vacant {
            return None;
        }
        slot.container.as_mut()
    }

    /// Item the container is currently bound to.
    pub fn bound_key(&self, id: ContainerId) -> Option<ItemKey> {
        match self.live_slot(id)?.state {
            SlotState::Realized(key) => Some(key),
            SlotState::Cached | SlotState::Vacant => None,
        }
    }

    pub fn container_for_key(&self, key: ItemKey) -> Option<ContainerId> {
        self.realized.get(&key).copied()
    }

    pub fn container_for_index(&self, index: usize) -> Option<ContainerId> {
        self.container_for_key(self.items.key_at(index)?)
    }

    /// Realized containers with the items they are bound to, in no
    /// particular order.
    pub fn realized_containers(&self) -> impl Iterator<Item = (ItemKey, ContainerId)> + '_ {
        self.realized.iter().map(|(key, id)| (*key, *id))
    }

    pub fn realized_count(&self) -> usize {
        self.realized.len()
    }

    /// Containers waiting in the recycle pool.
    pub fn cached_containers(&self) -> &[ContainerId] {
        &self.pool
    }

    pub fn stats(&self) -> LazyLayoutStats {
        LazyLayoutStats {
            items_in_use: self.realized.len(),
            items_in_pool: self.pool.len(),
            total_created: self.total_created,
            reuse_count: self.reuse_count,
        }
    }

    pub fn add_items_changed_listener(&mut self, callback: Rc<dyn Fn(&ItemsChanged)>) -> ListenerId {
        self.listeners.add(callback)
    }

    pub fn remove_items_changed_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    pub fn push(&mut self, item: F::Item) -> ItemsChanged {
        let change = self.items.push(item);
        self.finish_change(change)
    }

    pub fn insert<I>(&mut self, index: usize, items: I) -> LayoutResult<ItemsChanged>
    where
        I: IntoIterator<Item = F::Item>,
    {
        let change = self.items.insert(index, items)?;
        Ok(self.finish_change(change))
    }

    pub fn insert_keyed<I>(&mut self, index: usize, items: I) -> LayoutResult<ItemsChanged>
    where
        I: IntoIterator<Item = (ItemKey, F::Item)>,
    {
        let change = self.items.insert_keyed(index, items)?;
        Ok(self.finish_change(change))
    }

    pub fn remove(&mut self, range: std::ops::Range<usize>) -> LayoutResult<ItemsChanged> {
        let change = self.items.remove(range)?;
        Ok(self.finish_change(change))
    }

    pub fn replace(&mut self, index: usize, item: F::Item) -> LayoutResult<ItemsChanged> {
        let change = self.items.replace(index, item)?;
        Ok(self.finish_change(change))
    }

    pub fn move_item(&mut self, from: usize, to: usize) -> LayoutResult<ItemsChanged> {
        let change = self.items.move_item(from, to)?;
        Ok(self.finish_change(change))
    }

    pub fn reset<I>(&mut self, items: I) -> ItemsChanged
    where
        I: IntoIterator<Item = F::Item>,
    {
        let change = self.items.reset(items);
        self.finish_change(change)
    }

    /// Virtualizes containers whose items left, then notifies listeners.
    fn finish_change(&mut self, mut change: ItemsChanged) -> ItemsChanged {
        let stale: Vec<ContainerId> = if change.action == ItemsChangedAction::Reset {
            self.realized.values().copied().collect()
        } else {
            change
                .removed
                .iter()
                .filter(|key| self.items.index_of(**key).is_none())
                .filter_map(|key| self.realized.get(key).copied())
                .collect()
        };
        for id in stale {
            self.virtualize(id);
            change.affected_containers.push(id);
        }
        self.listeners.notify(&change);
        change
    }

    fn live_slot(&self, id: ContainerId) -> Option<&Slot<F::Container>> {
        self.slots
            .get(id.slot())
            .filter(|slot| slot.generation == id.generation() && slot.state != SlotState::Vacant)
    }

    fn allocate(&mut self) -> ContainerId {
        let container = self.factory.create();
        self.total_created += 1;
        match self.vacant.pop() {
            Some(slot_index) => {
                let slot = &mut self.slots[slot_index as usize];
                slot.container = Some(container);
                slot.state = SlotState::Cached;
                ContainerId::new(slot_index, slot.generation)
            }
            None => {
                let slot_index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    state: SlotState::Cached,
                    container: Some(container),
                });
                ContainerId::new(slot_index, 0)
            }
        }
    }

    fn destroy_slot(&mut self, id: ContainerId) {
        let Some(slot) = self.slots.get_mut(id.slot()) else {
            return;
        };
        slot.state = SlotState::Vacant;
        slot.generation = slot.generation.wrapping_add(1);
        if let Some(container) = slot.container.take() {
            self.factory.destroy(container);
        }
        self.vacant.push(id.slot() as u32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lazy::container::Container;
    use lazywrap_geometry::{Rect, Size};
    use std::cell::RefCell;

    #[derive(Default)]
    struct Probe {
        bound: Option<u32>,
    }

    impl Container for Probe {
        fn measure(&mut self, _available: Size) -> Size {
            Size::new(10.0, 10.0)
        }

        fn desired_size(&self) -> Size {
            Size::new(10.0, 10.0)
        }

        fn is_measure_valid(&self) -> bool {
            true
        }

        fn arrange(&mut self, _rect: Rect) {}
    }

    #[derive(Default)]
    struct ProbeFactory {
        destroyed: usize,
    }

    impl ContainerFactory for ProbeFactory {
        type Item = u32;
        type Container = Probe;

        fn create(&mut self) -> Probe {
            Probe::default()
        }

        fn bind(&mut self, container: &mut Probe, item: &u32, _index: usize) {
            container.bound = Some(*item);
        }

        fn unbind(&mut self, container: &mut Probe) {
            container.bound = None;
        }

        fn destroy(&mut self, _container: Probe) {
            self.destroyed += 1;
        }
    }

    #[derive(Default)]
    struct Attached(Vec<ContainerId>);

    impl ChildrenCollection<Probe> for Attached {
        fn add_child(&mut self, id: ContainerId, _container: &Probe) {
            self.0.push(id);
        }

        fn remove_child(&mut self, id: ContainerId) {
            self.0.retain(|child| *child != id);
        }
    }

    fn manager(count: u32) -> ItemContainerManager<ProbeFactory, Attached> {
        ItemContainerManager::new(
            ProbeFactory::default(),
            Attached::default(),
            (0..count).collect(),
        )
    }

    #[test]
    fn test_realize_twice_returns_same_container() {
        let mut manager = manager(3);
        let first = manager.realize(1).unwrap();
        let second = manager.realize(1).unwrap();

        assert!(first.is_new_container);
        assert!(!first.already_realized);
        assert_eq!(second.id, first.id);
        assert!(second.already_realized);
        assert_eq!(manager.children().0, vec![first.id]);
        assert_eq!(manager.container(first.id).unwrap().bound, Some(1));
    }

    #[test]
    fn test_realize_out_of_range_is_invalid_argument() {
        let mut manager = manager(3);
        assert_eq!(
            manager.realize(3),
            Err(LayoutError::InvalidArgument { index: 3, count: 3 })
        );
    }

    #[test]
    fn test_recycling_reuses_pooled_container() {
        let mut manager = manager(10);
        let first = manager.realize(0).unwrap();

        assert!(!manager.virtualize(first.id));
        assert_eq!(manager.cached_containers(), &[first.id]);
        assert!(manager.children().0.is_empty());
        assert_eq!(manager.container(first.id).unwrap().bound, None);

        let reused = manager.realize(7).unwrap();
        assert_eq!(reused.id, first.id);
        assert!(!reused.is_new_container);
        assert_eq!(manager.container(reused.id).unwrap().bound, Some(7));
        assert_eq!(
            manager.stats(),
            LazyLayoutStats {
                items_in_use: 1,
                items_in_pool: 0,
                total_created: 1,
                reuse_count: 1,
            }
        );
    }

    #[test]
    fn test_standard_mode_destroys_and_invalidates_handle() {
        let mut manager = manager(10);
        manager.set_mode(VirtualizationMode::Standard);
        let first = manager.realize(0).unwrap();

        assert!(manager.virtualize(first.id));
        assert_eq!(manager.factory().destroyed, 1);
        assert!(manager.container(first.id).is_none());

        let next = manager.realize(1).unwrap();
        assert!(next.is_new_container);
        assert_eq!(next.id.slot(), first.id.slot());
        assert_ne!(next.id, first.id);
    }

    #[test]
    fn test_switching_to_standard_drains_pool() {
        let mut manager = manager(10);
        for index in 0..3 {
            let realized = manager.realize(index).unwrap();
            manager.virtualize(realized.id);
        }
        assert_eq!(manager.cached_containers().len(), 1);

        manager.set_mode(VirtualizationMode::Standard);
        assert!(manager.cached_containers().is_empty());
        assert_eq!(manager.factory().destroyed, 1);
    }

    #[test]
    fn test_remove_virtualizes_removed_items() {
        let mut manager = manager(5);
        let seen = Rc::new(RefCell::new(Vec::new()));
        {
            let seen = Rc::clone(&seen);
            manager.add_items_changed_listener(Rc::new(move |change: &ItemsChanged| {
                seen.borrow_mut().push(change.affected_containers.clone())
            }));
        }
        let kept = manager.realize(0).unwrap();
        let dropped = manager.realize(2).unwrap();

        let change = manager.remove(2..3).unwrap();

        assert_eq!(change.affected_containers, vec![dropped.id]);
        assert_eq!(manager.children().0, vec![kept.id]);
        assert_eq!(*seen.borrow(), vec![vec![dropped.id]]);
    }

    #[test]
    fn test_reset_virtualizes_everything() {
        let mut manager = manager(5);
        manager.realize(0).unwrap();
        manager.realize(1).unwrap();

        let change = manager.reset(0..2);

        assert_eq!(change.affected_containers.len(), 2);
        assert_eq!(manager.realized_count(), 0);
        assert_eq!(manager.cached_containers().len(), 2);
    }
}
