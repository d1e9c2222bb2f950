//! What the tile-rendering collaborator receives: ordered headers and tiles with
//! resolved image sources. Nothing here draws.

use std::fmt;
use std::sync::Arc;

use crate::models::{Item, LayoutRect};
use crate::viewport::ScrollTier;

/// Maps an item url and a pixel height to a fetchable image url.
pub trait UrlResolver {
    fn resolve(&self, url: &str, pixel_height: u32) -> String;
}

impl<F> UrlResolver for F
where
    F: Fn(&str, u32) -> String,
{
    fn resolve(&self, url: &str, pixel_height: u32) -> String {
        self(url, pixel_height)
    }
}

/// Default resolver for Cloudinary delivery urls: inserts an `h_<px>`
/// transformation after the `/upload/` segment. Other urls pass through.
#[derive(Debug, Clone, Copy, Default)]
pub struct CloudinaryUrl;

impl UrlResolver for CloudinaryUrl {
    fn resolve(&self, url: &str, pixel_height: u32) -> String {
        const MARKER: &str = "/upload/";
        match url.find(MARKER) {
            Some(pos) => {
                let split = pos + MARKER.len();
                format!("{}h_{}/{}", &url[..split], pixel_height, &url[split..])
            }
            None => url.to_string(),
        }
    }
}

pub(crate) type SharedResolver = Arc<dyn UrlResolver + Send + Sync>;

/// Per-grid expanded tile. Lives outside the layout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    None,
    Active(String),
}

impl Selection {
    pub fn is_active(&self, id: &str) -> bool {
        matches!(self, Self::Active(active) if active == id)
    }
}

/// Image sources for one tile. Fast scrolling requests nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TileSources {
    /// Tiny blurred placeholder.
    pub thumbnail: Option<String>,
    /// Image sized for the grid row.
    pub grid: Option<String>,
    /// Large image for an expanded tile.
    pub expanded: Option<String>,
}

/// Pixel heights the sources are requested at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceHeights {
    pub thumbnail: u32,
    pub grid: u32,
    pub expanded: u32,
}

pub fn tile_sources(
    resolver: &dyn UrlResolver,
    url: &str,
    tier: ScrollTier,
    expanded: bool,
    heights: SourceHeights,
) -> TileSources {
    let (thumbnail, grid) = match tier {
        ScrollTier::Fast => (None, None),
        ScrollTier::Medium => (
            Some(resolver.resolve(url, heights.thumbnail)),
            Some(resolver.resolve(url, heights.grid)),
        ),
        ScrollTier::Idle | ScrollTier::Slow => (None, Some(resolver.resolve(url, heights.grid))),
    };
    TileSources {
        thumbnail,
        grid,
        expanded: expanded.then(|| resolver.resolve(url, heights.expanded)),
    }
}

/// Geometry of an expanded tile: the largest rect with the item's aspect ratio
/// that fits the container width and the viewport height minus a gap on each
/// side, centered in the visible part of the container.
pub fn expanded_rect(
    aspect_ratio: f64,
    container_width: f64,
    viewport_height: f64,
    scroll_offset: f64,
    container_offset_top: f64,
    grid_gap: f64,
) -> LayoutRect {
    let max_width = container_width.max(0.0);
    let max_height = (viewport_height - grid_gap * 2.0).max(0.0);

    let mut width = max_width;
    let mut height = if aspect_ratio > 0.0 { width / aspect_ratio } else { 0.0 };
    if height > max_height {
        height = max_height;
        width = height * aspect_ratio;
    }

    LayoutRect {
        width,
        height,
        translate_x: ((container_width - width) / 2.0).max(0.0),
        translate_y: (scroll_offset - container_offset_top + (viewport_height - height) / 2.0)
            .max(0.0),
    }
}

/// A group header descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupHeader<'a> {
    pub date: &'a str,
    pub description: &'a str,
    pub group_translate_y: f64,
    pub height: f64,
}

/// One tile ready for the renderer.
#[derive(Clone, PartialEq)]
pub struct RenderTile<'a> {
    pub item: &'a Item,
    pub rect: LayoutRect,
    pub sources: TileSources,
    /// Set when this tile is the active selection.
    pub expanded: Option<LayoutRect>,
}

impl fmt::Debug for RenderTile<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderTile")
            .field("id", &self.item.id)
            .field("rect", &self.rect)
            .field("sources", &self.sources)
            .field("expanded", &self.expanded)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderNode<'a> {
    Header(GroupHeader<'a>),
    Tile(RenderTile<'a>),
}
