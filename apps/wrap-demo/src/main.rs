mod tiles;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use lazywrap_foundation::{
    CacheLength, CacheLengthUnit, ItemCollection, SpacingMode, WrapLayout, WrapLayoutConfig,
};
use lazywrap_geometry::{Orientation, Size};

use crate::tiles::{NaturalSize, Surface, Tile, TileViewFactory};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CacheUnitArg {
    Pixel,
    Item,
    Page,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SpacingArg {
    None,
    Uniform,
    Between,
    Ends,
}

/// Scrolls a virtualized gallery and prints what gets realized.
#[derive(Debug, Parser)]
#[command(name = "wrap-demo", version)]
struct Args {
    /// Number of tiles in the gallery.
    #[arg(long, default_value_t = 10_000)]
    count: usize,

    /// Tile edge length.
    #[arg(long, default_value_t = 120.0)]
    tile: f32,

    #[arg(long, default_value_t = 800.0)]
    viewport_width: f32,

    #[arg(long, default_value_t = 600.0)]
    viewport_height: f32,

    /// Cache length before and after the viewport.
    #[arg(long, default_value_t = 1.0)]
    cache: f32,

    #[arg(long, value_enum, default_value_t = CacheUnitArg::Page)]
    cache_unit: CacheUnitArg,

    #[arg(long, value_enum, default_value_t = SpacingArg::Uniform)]
    spacing: SpacingArg,

    /// Wrap columns and scroll horizontally.
    #[arg(long)]
    vertical: bool,

    /// Give tiles different sizes.
    #[arg(long)]
    varied: bool,

    /// Let the layout ask tiles for their size instead of estimating.
    #[arg(long)]
    oracle: bool,

    #[arg(long)]
    stretch: bool,

    /// Number of page-down steps to take.
    #[arg(long, default_value_t = 5)]
    pages: usize,

    /// Bring this tile into view after paging.
    #[arg(long)]
    reveal: Option<usize>,
}

impl Args {
    fn config(&self) -> WrapLayoutConfig {
        WrapLayoutConfig {
            orientation: if self.vertical {
                Orientation::Vertical
            } else {
                Orientation::Horizontal
            },
            allow_different_sized_items: self.varied,
            spacing_mode: match self.spacing {
                SpacingArg::None => SpacingMode::None,
                SpacingArg::Uniform => SpacingMode::Uniform,
                SpacingArg::Between => SpacingMode::BetweenItemsOnly,
                SpacingArg::Ends => SpacingMode::StartAndEndOnly,
            },
            stretch_items: self.stretch,
            cache_length: CacheLength::uniform(self.cache),
            cache_unit: match self.cache_unit {
                CacheUnitArg::Pixel => CacheLengthUnit::Pixel,
                CacheUnitArg::Item => CacheLengthUnit::Item,
                CacheUnitArg::Page => CacheLengthUnit::Page,
            },
            ..Default::default()
        }
    }
}

type Gallery = WrapLayout<TileViewFactory, Surface>;

fn main() -> anyhow::Result<()> {
    #[cfg(feature = "logging")]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args = Args::parse();
    let viewport = Size::new(args.viewport_width, args.viewport_height);
    let items: ItemCollection<Tile> = Tile::gallery(args.count, args.tile, args.varied)
        .into_iter()
        .collect();

    let mut gallery: Gallery = WrapLayout::new(
        TileViewFactory::default(),
        Surface::default(),
        items,
        args.config(),
    );
    if args.oracle {
        gallery.set_size_oracle(NaturalSize);
    }

    println!("=== lazywrap gallery: {} tiles ===", args.count);
    layout(&mut gallery, viewport)?;
    report(&gallery, "initial");

    for page in 1..=args.pages {
        if args.vertical {
            gallery.scroll_by(gallery.page_right_delta(), 0.0);
        } else {
            gallery.scroll_by(0.0, gallery.page_down_delta());
        }
        layout(&mut gallery, viewport)?;
        report(&gallery, &format!("page {page}"));
    }

    if let Some(index) = args.reveal {
        gallery
            .bring_index_into_view(index)
            .with_context(|| format!("cannot reveal tile {index}"))?;
        layout(&mut gallery, viewport)?;
        report(&gallery, &format!("reveal {index}"));
        if let Some(view) = gallery
            .container_for_index(index)
            .and_then(|id| gallery.manager().container(id))
        {
            println!("  {:?} arranged at {:?}", view.label, view.bounds);
        }
    }

    Ok(())
}

/// Measures and arranges until the layout stops asking for another pass.
fn layout(gallery: &mut Gallery, viewport: Size) -> anyhow::Result<()> {
    for _ in 0..4 {
        gallery.measure(viewport)?;
        gallery.arrange(viewport)?;
        if !gallery.needs_measure() {
            break;
        }
    }
    Ok(())
}

fn report(gallery: &Gallery, label: &str) {
    let stats = gallery.stats();
    let extent = gallery.extent();
    let offset = gallery.offset();
    println!(
        "{label:>10}: offset ({:.0}, {:.0}) realized {:?} extent {:.0}x{:.0} | in use {} pooled {} created {} reused {} attached {}",
        offset.x,
        offset.y,
        gallery.realized_range(),
        extent.width,
        extent.height,
        stats.items_in_use,
        stats.items_in_pool,
        stats.total_created,
        stats.reuse_count,
        gallery.manager().children().attached,
    );
}
