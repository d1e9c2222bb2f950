pub mod group;
pub mod media_item;
pub mod row_model;

pub use group::*;
pub use media_item::*;
pub use row_model::*;
