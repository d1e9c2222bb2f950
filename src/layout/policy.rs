//! Width-driven policies: how full a row must be, how tall grid images are
//! requested, and how much room a group header gets.

use std::fmt;
use std::sync::Arc;

/// Minimum summed aspect ratio before a row may close.
///
/// Narrow containers accept fuller-looking rows with fewer images.
#[derive(Clone, Default)]
pub enum MinAspectRatio {
    /// 2 up to 640px, 4 up to 1280px, 5 up to 1920px, 6 beyond.
    #[default]
    Tiered,
    Fixed(f64),
    Custom(Arc<dyn Fn(f64) -> f64 + Send + Sync>),
}

impl MinAspectRatio {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    pub fn for_width(&self, container_width: f64) -> f64 {
        match self {
            Self::Tiered => {
                if container_width <= 640.0 {
                    2.0
                } else if container_width <= 1280.0 {
                    4.0
                } else if container_width <= 1920.0 {
                    5.0
                } else {
                    6.0
                }
            }
            Self::Fixed(ratio) => *ratio,
            Self::Custom(f) => f(container_width),
        }
    }
}

impl fmt::Debug for MinAspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tiered => f.write_str("Tiered"),
            Self::Fixed(ratio) => f.debug_tuple("Fixed").field(ratio).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Pixel height to request for grid images at a container width.
pub fn grid_image_height(container_width: f64) -> u32 {
    if container_width <= 640.0 {
        100
    } else if container_width <= 1920.0 {
        250
    } else {
        500
    }
}

/// Header band reserved above each group. Plain threshold, no hysteresis.
pub fn group_spacing(container_width: f64, breakpoint: f64, small: f64, large: f64) -> f64 {
    if container_width < breakpoint {
        small
    } else {
        large
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiered_min_aspect_ratio() {
        let policy = MinAspectRatio::default();
        assert_eq!(policy.for_width(320.0), 2.0);
        assert_eq!(policy.for_width(640.0), 2.0);
        assert_eq!(policy.for_width(641.0), 4.0);
        assert_eq!(policy.for_width(1920.0), 5.0);
        assert_eq!(policy.for_width(2560.0), 6.0);
    }

    #[test]
    fn test_custom_min_aspect_ratio() {
        let policy = MinAspectRatio::custom(|w| w / 300.0);
        assert_eq!(policy.for_width(900.0), 3.0);
        assert_eq!(MinAspectRatio::Fixed(3.5).for_width(10.0), 3.5);
    }

    #[test]
    fn test_group_spacing_breakpoint() {
        assert_eq!(group_spacing(799.0, 800.0, 20.0, 50.0), 20.0);
        assert_eq!(group_spacing(800.0, 800.0, 20.0, 50.0), 50.0);
    }

    #[test]
    fn test_grid_image_height() {
        assert_eq!(grid_image_height(375.0), 100);
        assert_eq!(grid_image_height(1440.0), 250);
        assert_eq!(grid_image_height(2560.0), 500);
    }
}
