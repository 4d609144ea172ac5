//! Headless tiles standing in for real views.

use lazywrap_foundation::{ChildrenCollection, Container, ContainerFactory, ContainerId, ItemSizeOracle};
use lazywrap_geometry::{Rect, Size};

/// A photo-like tile with a known natural size.
#[derive(Clone, Debug)]
pub struct Tile {
    pub label: String,
    pub size: Size,
}

impl Tile {
    /// Tiles whose sizes cycle through a few aspect ratios.
    pub fn gallery(count: usize, base: f32, varied: bool) -> Vec<Tile> {
        (0..count)
            .map(|index| {
                let size = if varied {
                    let width = base * [1.0, 1.5, 0.75, 2.0][index % 4];
                    let height = base * [1.0, 0.8, 1.25][index % 3];
                    Size::new(width, height)
                } else {
                    Size::new(base, base)
                };
                Tile {
                    label: format!("tile-{index}"),
                    size,
                }
            })
            .collect()
    }
}

#[derive(Debug, Default)]
pub struct TileView {
    pub label: Option<String>,
    pub natural: Size,
    pub bounds: Option<Rect>,
    desired: Size,
    dirty: bool,
}

impl Container for TileView {
    fn measure(&mut self, available: Size) -> Size {
        self.desired = self.natural.min(available);
        self.dirty = false;
        self.desired
    }

    fn desired_size(&self) -> Size {
        self.desired
    }

    fn is_measure_valid(&self) -> bool {
        !self.dirty
    }

    fn arrange(&mut self, rect: Rect) {
        self.bounds = Some(rect);
    }
}

#[derive(Debug, Default)]
pub struct TileViewFactory {
    pub created: usize,
}

impl ContainerFactory for TileViewFactory {
    type Item = Tile;
    type Container = TileView;

    fn create(&mut self) -> TileView {
        self.created += 1;
        TileView {
            dirty: true,
            ..TileView::default()
        }
    }

    fn bind(&mut self, view: &mut TileView, tile: &Tile, _index: usize) {
        view.label = Some(tile.label.clone());
        view.natural = tile.size;
        view.bounds = None;
        view.dirty = true;
    }

    fn unbind(&mut self, view: &mut TileView) {
        view.label = None;
        view.bounds = None;
    }

    fn destroy(&mut self, view: TileView) {
        log::trace!("destroying view {:?}", view.label);
    }
}

/// Host surface; only counts attached views.
#[derive(Debug, Default)]
pub struct Surface {
    pub attached: usize,
}

impl ChildrenCollection<TileView> for Surface {
    fn add_child(&mut self, _id: ContainerId, _view: &TileView) {
        self.attached += 1;
    }

    fn remove_child(&mut self, _id: ContainerId) {
        self.attached = self.attached.saturating_sub(1);
    }
}

/// Oracle answering from the tile's natural size.
pub struct NaturalSize;

impl ItemSizeOracle<Tile> for NaturalSize {
    fn size_for_item(&self, tile: &Tile) -> Size {
        tile.size
    }
}
