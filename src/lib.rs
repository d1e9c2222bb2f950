//! Justified photo grid layout with viewport windowing.
//!
//! [`LayoutController`] is the entry point: feed it items, a container width and
//! scroll offsets, and read back the laid-out rects and the subset worth rendering.

pub mod config;
pub mod controller;
pub mod error;
pub mod groupify;
pub mod grouping;
pub mod layout;
pub mod models;
pub mod render;
pub mod viewport;

pub use config::GridSettings;
pub use controller::{ControllerState, LayoutController, LayoutControllerBuilder};
pub use error::{GridError, Result};
pub use layout::{GroupLayoutComposer, LayoutCache, MinAspectRatio, RowPacker};
pub use models::{GroupLayout, Item, ItemGroup, LayoutRect, LayoutResult, RowModel};
pub use render::{CloudinaryUrl, RenderNode, RenderTile, Selection, TileSources, UrlResolver};
pub use viewport::{RenderSet, ScrollDirection, ScrollSpeedEstimator, ScrollTier, ViewportState};
