//! Date ordering and bucketing applied to raw records before the first layout.

pub mod by_date;
pub mod dates;
pub mod sort;

pub use by_date::{group_by_date, NO_DATE};
pub use dates::{day_label, parse_date};
pub use sort::{sort_by_birth_time, sort_by_date, ItemComparator};
