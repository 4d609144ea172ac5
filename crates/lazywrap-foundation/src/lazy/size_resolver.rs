//! Item size resolution.
//!
//! Priority for an item that has no container: fixed size, size oracle,
//! uniform first-item size, cached measurement, running average.

use lazywrap_geometry::Size;

use super::config::{WrapLayoutConfig, DEFAULT_ITEM_SIZE_ESTIMATE};
use super::container::{Container, ItemSizeOracle};
use super::items::ItemKey;
use super::size_cache::SizeCache;

/// Resolves assumed and realized item sizes for one layout pass.
pub struct SizeResolver<'a, T> {
    config: &'a WrapLayoutConfig,
    oracle: Option<&'a dyn ItemSizeOracle<T>>,
    cache: &'a SizeCache,
    size_of_first_item: Option<Size>,
}

impl<'a, T> SizeResolver<'a, T> {
    pub fn new(
        config: &'a WrapLayoutConfig,
        oracle: Option<&'a dyn ItemSizeOracle<T>>,
        cache: &'a SizeCache,
        size_of_first_item: Option<Size>,
    ) -> Self {
        Self {
            config,
            oracle,
            cache,
            size_of_first_item,
        }
    }

    /// Size known before measuring: the fixed size or the oracle's answer.
    pub fn upfront_size(&self, item: &T) -> Option<Size> {
        self.config
            .item_size
            .or_else(|| self.oracle.map(|oracle| oracle.size_for_item(item)))
    }

    /// The single size shared by every item, if the layout is uniform.
    ///
    /// Uniform means a fixed item size, or different sizes are disallowed,
    /// no oracle is present, and the first item has been measured.
    pub fn uniform_size(&self) -> Option<Size> {
        if let Some(size) = self.config.item_size {
            return Some(size);
        }
        if self.config.allow_different_sized_items || self.oracle.is_some() {
            return None;
        }
        self.size_of_first_item
    }

    pub fn has_oracle(&self) -> bool {
        self.oracle.is_some()
    }

    /// Size assumed for an item that may not be realized.
    pub fn assumed_size(&self, key: ItemKey, item: &T) -> Size {
        if let Some(size) = self.upfront_size(item) {
            return size;
        }
        if let Some(size) = self.uniform_size() {
            return size;
        }
        self.cache.get(key).unwrap_or_else(|| self.average_size())
    }

    /// Layout size of a realized container.
    pub fn container_size<C: Container>(&self, item: &T, container: &C) -> Size {
        self.upfront_size(item)
            .or_else(|| self.uniform_size())
            .unwrap_or_else(|| container.desired_size())
    }

    /// Average item size used for estimates and scroll steps.
    pub fn average_size(&self) -> Size {
        self.uniform_size()
            .or_else(|| self.cache.average())
            .unwrap_or(Size::new(
                DEFAULT_ITEM_SIZE_ESTIMATE,
                DEFAULT_ITEM_SIZE_ESTIMATE,
            ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(allow_different: bool, item_size: Option<Size>) -> WrapLayoutConfig {
        WrapLayoutConfig {
            allow_different_sized_items: allow_different,
            item_size,
            ..Default::default()
        }
    }

    #[test]
    fn fixed_size_wins_over_everything() {
        let config = config(true, Some(Size::new(10.0, 20.0)));
        let mut cache = SizeCache::new();
        cache.insert(ItemKey::new(0), Size::new(99.0, 99.0));
        let oracle: &dyn ItemSizeOracle<u32> = &|_: &u32| Size::new(50.0, 50.0);
        let resolver = SizeResolver::new(&config, Some(oracle), &cache, None);

        assert_eq!(
            resolver.assumed_size(ItemKey::new(0), &0),
            Size::new(10.0, 20.0)
        );
    }

    #[test]
    fn oracle_wins_over_cache() {
        let config = config(true, None);
        let mut cache = SizeCache::new();
        cache.insert(ItemKey::new(0), Size::new(99.0, 99.0));
        let oracle: &dyn ItemSizeOracle<u32> = &|item: &u32| Size::new(*item as f32, 5.0);
        let resolver = SizeResolver::new(&config, Some(oracle), &cache, None);

        assert_eq!(
            resolver.assumed_size(ItemKey::new(0), &30),
            Size::new(30.0, 5.0)
        );
        assert_eq!(resolver.uniform_size(), None);
    }

    #[test]
    fn unmeasured_item_falls_back_to_average() {
        let config = config(true, None);
        let mut cache = SizeCache::new();
        cache.insert(ItemKey::new(0), Size::new(100.0, 40.0));
        cache.insert(ItemKey::new(1), Size::new(50.0, 60.0));
        let resolver: SizeResolver<'_, u32> = SizeResolver::new(&config, None, &cache, None);

        assert_eq!(
            resolver.assumed_size(ItemKey::new(0), &0),
            Size::new(100.0, 40.0)
        );
        assert_eq!(
            resolver.assumed_size(ItemKey::new(7), &0),
            Size::new(75.0, 50.0)
        );
    }

    #[test]
    fn uniform_mode_uses_first_item_size() {
        let config = config(false, None);
        let cache = SizeCache::new();
        let first = Some(Size::new(80.0, 30.0));
        let resolver: SizeResolver<'_, u32> = SizeResolver::new(&config, None, &cache, first);

        assert_eq!(resolver.uniform_size(), first);
        assert_eq!(
            resolver.assumed_size(ItemKey::new(12), &0),
            Size::new(80.0, 30.0)
        );
    }

    #[test]
    fn nothing_measured_uses_default_estimate() {
        let config = config(true, None);
        let cache = SizeCache::new();
        let resolver: SizeResolver<'_, u32> = SizeResolver::new(&config, None, &cache, None);
        assert_eq!(
            resolver.average_size(),
            Size::new(DEFAULT_ITEM_SIZE_ESTIMATE, DEFAULT_ITEM_SIZE_ESTIMATE)
        );
    }
}
