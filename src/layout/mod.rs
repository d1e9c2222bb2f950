pub mod groups;
pub mod justified;
pub mod layout_cache;
pub mod policy;

pub use groups::GroupLayoutComposer;
pub use justified::{PackedRows, RowPacker};
pub use layout_cache::{CacheKey, LayoutCache};
pub use policy::{grid_image_height, group_spacing, MinAspectRatio};
