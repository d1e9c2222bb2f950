//! Scroll-driven half of the engine: which laid-out items are mounted, and how
//! fast the user is moving through them.

pub mod scroll_speed;
pub mod timers;
pub mod windower;

pub use scroll_speed::{ScrollSpeedEstimator, ScrollTier};
pub use timers::{Debouncer, FrameThrottle, IdleTimer};
pub use windower::{compute_visible, RenderSet, ScrollDirection, ViewportState, VisibleGroup};
