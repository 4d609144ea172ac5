use lazywrap_foundation::prelude::*;
use lazywrap_testing::prelude::*;

const VIEWPORT: Size = Size::new(500.0, 398.0);

fn variable_grid(cache_length: CacheLength) -> WrapLayoutHarness {
    WrapLayoutHarness::uniform(
        100,
        Size::new(100.0, 100.0),
        WrapLayoutConfig {
            allow_different_sized_items: true,
            cache_length,
            ..Default::default()
        },
        VIEWPORT,
    )
}

#[test]
fn removing_realized_item_drops_cache_entry_and_child() {
    let mut harness = variable_grid(CacheLength::ZERO);
    harness.layout().unwrap();
    assert_eq!(harness.realized_count(), 20);

    let key = harness.layout.items().key_at(3).unwrap();
    let id = harness.layout.container_for_index(3).unwrap();
    assert!(harness.layout.size_cache().contains(key));

    let change = harness.layout.remove(3..4).unwrap();

    assert_eq!(change.removed, vec![key]);
    assert_eq!(change.affected_containers, vec![id]);
    assert!(!harness.layout.size_cache().contains(key));
    assert!(!harness.children().contains(id));
    assert_eq!(harness.children().len(), 19);
    assert!(harness.layout.needs_measure());

    harness.layout().unwrap();
    assert_eq!(harness.realized_count(), 20);
    assert_eq!(harness.children().len(), 20);
    assert!(!harness.layout.size_cache().contains(key));
    assert!(harness.layout.size_cache().len() <= harness.layout.items().len());
    for index in harness.realized_indices() {
        let key = harness.layout.items().key_at(index).unwrap();
        assert!(harness.layout.size_cache().contains(key), "index {index}");
    }
}

#[test]
fn items_changed_raises_measure_invalidated() {
    let mut harness = variable_grid(CacheLength::ZERO);
    harness.layout().unwrap();
    harness.take_events();

    harness.layout.push(TestItem::sized(500, 100.0, 100.0));

    assert_eq!(harness.take_events(), vec![LayoutEvent::MeasureInvalidated]);
    assert_eq!(harness.layout.realized_range(), None);
}

#[test]
fn insert_before_window_shifts_items() {
    let mut harness = variable_grid(CacheLength::ZERO);
    harness.layout().unwrap();
    let old_first = harness.layout.container_for_index(0).unwrap();

    harness
        .layout
        .insert(0, [TestItem::sized(1000, 100.0, 100.0)])
        .unwrap();
    harness.layout().unwrap();

    assert_eq!(harness.container(0).unwrap().item.as_ref().unwrap().id, 1000);
    assert_eq!(harness.layout.container_for_index(1), Some(old_first));
    assert_eq!(harness.realized_count(), 20);
}

#[test]
fn replace_uses_size_of_new_item() {
    let mut harness = variable_grid(CacheLength::ZERO);
    harness.layout.update_config(|config| config.spacing_mode = SpacingMode::None);
    harness.layout().unwrap();
    let old_key = harness.layout.items().key_at(2).unwrap();

    harness
        .layout
        .replace(2, TestItem::sized(900, 200.0, 150.0))
        .unwrap();
    assert!(!harness.layout.size_cache().contains(old_key));
    harness.layout().unwrap();

    assert_eq!(
        harness.arranged_rect(2),
        Some(Rect::new(200.0, 0.0, 200.0, 150.0))
    );
    // The wider item pushes the fifth item onto the next row.
    assert_eq!(
        harness.arranged_rect(4),
        Some(Rect::new(0.0, 150.0, 100.0, 100.0))
    );
}

#[test]
fn move_keeps_container_of_moved_item() {
    let mut harness = variable_grid(CacheLength::ZERO);
    harness.layout().unwrap();
    let id = harness.layout.container_for_index(0).unwrap();

    let change = harness.layout.move_item(0, 3).unwrap();
    assert!(change.affected_containers.is_empty());
    harness.layout().unwrap();

    assert_eq!(harness.layout.container_for_index(3), Some(id));
    assert_eq!(harness.container(3).unwrap().item.as_ref().unwrap().id, 0);
}

#[test]
fn reset_clears_cache_and_scrolls_variable_items_home() {
    let mut harness = variable_grid(CacheLength::new(1.0, 1.0));
    harness.layout().unwrap();
    harness.scroll_to(600.0).unwrap();
    harness.take_events();

    let change = harness
        .layout
        .reset((0..50).map(|id| TestItem::sized(id, 120.0, 80.0)));

    assert_eq!(change.action, ItemsChangedAction::Reset);
    assert!(harness.layout.size_cache().is_empty());
    assert_eq!(harness.layout.offset(), Point::ZERO);
    assert_eq!(harness.realized_count(), 0);
    assert!(harness.children().is_empty());
    let events = harness.take_events();
    assert!(events.contains(&LayoutEvent::ScrollInfoInvalidated));
    assert!(events.contains(&LayoutEvent::MeasureInvalidated));

    harness.layout().unwrap();
    assert!(harness.realized_count() > 0);
    assert_eq!(harness.arranged_rect(0).unwrap().size(), Size::new(120.0, 80.0));
}

#[test]
fn reset_keeps_offset_when_oracle_knows_sizes() {
    let items: Vec<TestItem> = (0..100).map(|id| TestItem::sized(id, 100.0, 100.0)).collect();
    let oracle = MapSizeOracle::from_items(&items);
    let mut harness = WrapLayoutHarness::new(
        items.clone(),
        WrapLayoutConfig {
            allow_different_sized_items: true,
            ..Default::default()
        },
        VIEWPORT,
    );
    harness.layout.set_size_oracle(oracle);
    harness.layout().unwrap();
    harness.scroll_to(600.0).unwrap();

    harness.layout.reset(items);

    assert_eq!(harness.layout.offset().y, 600.0);
}

#[test]
fn recycling_reuses_containers_when_scrolling_back() {
    let mut harness = WrapLayoutHarness::uniform(
        100,
        Size::new(100.0, 100.0),
        WrapLayoutConfig::default(),
        VIEWPORT,
    );
    harness.layout().unwrap();
    assert_eq!(harness.layout.stats().total_created, 40);

    harness.scroll_to(501.0).unwrap();
    assert_eq!(
        harness.layout.stats(),
        LazyLayoutStats {
            items_in_use: 60,
            items_in_pool: 5,
            total_created: 65,
            reuse_count: 0,
        }
    );

    harness.scroll_to(0.0).unwrap();
    assert_eq!(
        harness.layout.stats(),
        LazyLayoutStats {
            items_in_use: 40,
            items_in_pool: 25,
            total_created: 65,
            reuse_count: 5,
        }
    );
    assert_eq!(harness.factory().destroyed, 0);
    assert_eq!(harness.children().len(), 40);
}

#[test]
fn standard_mode_destroys_virtualized_containers() {
    let mut harness = WrapLayoutHarness::uniform(
        100,
        Size::new(100.0, 100.0),
        WrapLayoutConfig::default(),
        VIEWPORT,
    );
    harness
        .layout
        .set_virtualization_mode(VirtualizationMode::Standard);
    harness.layout().unwrap();
    harness.scroll_to(501.0).unwrap();
    harness.scroll_to(0.0).unwrap();

    let stats = harness.layout.stats();
    assert_eq!(stats.items_in_pool, 0);
    assert_eq!(stats.reuse_count, 0);
    assert_eq!(stats.total_created, 70);
    assert_eq!(harness.factory().destroyed, 30);
    assert_eq!(harness.children().len(), 40);
}

#[test]
fn leaving_recycling_mode_destroys_pool() {
    let mut harness = WrapLayoutHarness::uniform(
        100,
        Size::new(100.0, 100.0),
        WrapLayoutConfig::default(),
        VIEWPORT,
    );
    harness.layout().unwrap();
    harness.scroll_to(501.0).unwrap();
    assert_eq!(harness.layout.stats().items_in_pool, 5);

    harness
        .layout
        .set_virtualization_mode(VirtualizationMode::Standard);

    assert_eq!(harness.layout.stats().items_in_pool, 0);
    assert_eq!(harness.factory().destroyed, 5);
}

#[test]
fn duplicate_item_keys_fail_arrange() {
    let mut harness = WrapLayoutHarness::new(Vec::new(), WrapLayoutConfig::default(), VIEWPORT);
    harness
        .layout
        .insert_keyed(
            0,
            [
                (ItemKey::new(1), TestItem::sized(1, 100.0, 100.0)),
                (ItemKey::new(1), TestItem::sized(2, 100.0, 100.0)),
                (ItemKey::new(2), TestItem::sized(3, 100.0, 100.0)),
            ],
        )
        .unwrap();

    harness.layout.measure(VIEWPORT).unwrap();
    let result = harness.layout.arrange(VIEWPORT);

    assert_eq!(
        result,
        Err(LayoutError::InvariantViolation {
            key: ItemKey::new(1),
            index: 1,
        })
    );
}

#[test]
fn out_of_range_mutations_are_invalid_arguments() {
    let mut harness = variable_grid(CacheLength::ZERO);
    assert_eq!(
        harness.layout.replace(100, TestItem::sized(0, 1.0, 1.0)),
        Err(LayoutError::InvalidArgument {
            index: 100,
            count: 100,
        })
    );
    assert_eq!(
        harness.layout.move_item(0, 100),
        Err(LayoutError::InvalidArgument {
            index: 100,
            count: 100,
        })
    );
}
