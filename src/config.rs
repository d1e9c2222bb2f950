use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::layout::policy::group_spacing;

/// Recognized grid options.
///
/// Deserializes from the same camelCase keys hosts pass as props, with every
/// field optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridSettings {
    /// Gap between tiles and rows in pixels (default: 8)
    pub grid_gap: f64,
    /// Pixels kept mounted in the direction of travel (default: 1500)
    pub primary_image_buffer_height: f64,
    /// Pixels kept mounted behind the direction of travel (default: 300)
    pub secondary_image_buffer_height: f64,
    /// Container width at which group spacing switches from small to large (default: 800)
    pub breakpoint: f64,
    /// Header band for narrow containers (default: 20)
    pub group_gap_sm: f64,
    /// Header band for wide containers (default: 50)
    pub group_gap_lg: f64,
    pub group_by_date: bool,
    pub sort_by_date: bool,
    /// Pixel height requested for the blurred placeholder (default: 10)
    pub thumbnail_size: u32,
    /// Pixel height requested for an expanded tile (default: 1200)
    pub expanded_size: u32,
    /// Minimum time between windowing passes while scrolling (default: 250)
    pub scroll_throttle_ms: u64,
    /// Quiet period before a resize triggers a repack (default: 80)
    pub resize_debounce_ms: u64,
    /// Idle fires after `scroll_throttle_ms * idle_decay_factor` without samples (default: 2.5)
    pub idle_decay_factor: f64,
    /// Scroll delta per sample at which the tier becomes medium (default: 200)
    pub medium_speed_threshold: f64,
    /// Scroll delta per sample at which the tier becomes fast (default: 500)
    pub fast_speed_threshold: f64,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            grid_gap: 8.0,
            primary_image_buffer_height: 1500.0,
            secondary_image_buffer_height: 300.0,
            breakpoint: 800.0,
            group_gap_sm: 20.0,
            group_gap_lg: 50.0,
            group_by_date: false,
            sort_by_date: false,
            thumbnail_size: 10,
            expanded_size: 1200,
            scroll_throttle_ms: 250,
            resize_debounce_ms: 80,
            idle_decay_factor: 2.5,
            medium_speed_threshold: 200.0,
            fast_speed_threshold: 500.0,
        }
    }
}

fn env_f64(name: &str) -> Option<f64> {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<f64>().ok())
}

fn env_u64(name: &str) -> Option<u64> {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
}

fn env_bool(name: &str) -> Option<bool> {
    std::env::var(name).ok().map(|v| {
        matches!(
            v.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

impl GridSettings {
    /// Defaults overridden by any `PIG_*` environment variables that are set.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    pub fn with_env_overrides(mut self) -> Self {
        if let Some(v) = env_f64("PIG_GRID_GAP") {
            self.grid_gap = v;
        }
        if let Some(v) = env_f64("PIG_PRIMARY_BUFFER") {
            self.primary_image_buffer_height = v;
        }
        if let Some(v) = env_f64("PIG_SECONDARY_BUFFER") {
            self.secondary_image_buffer_height = v;
        }
        if let Some(v) = env_f64("PIG_BREAKPOINT") {
            self.breakpoint = v;
        }
        if let Some(v) = env_f64("PIG_GROUP_GAP_SM") {
            self.group_gap_sm = v;
        }
        if let Some(v) = env_f64("PIG_GROUP_GAP_LG") {
            self.group_gap_lg = v;
        }
        if let Some(v) = env_bool("PIG_GROUP_BY_DATE") {
            self.group_by_date = v;
        }
        if let Some(v) = env_bool("PIG_SORT_BY_DATE") {
            self.sort_by_date = v;
        }
        if let Some(v) = env_u64("PIG_SCROLL_THROTTLE_MS") {
            self.scroll_throttle_ms = v;
        }
        if let Some(v) = env_u64("PIG_RESIZE_DEBOUNCE_MS") {
            self.resize_debounce_ms = v;
        }
        self
    }

    /// Rejects values the layout cannot work with.
    pub fn validate(&self) -> Result<()> {
        let non_negative = [
            ("gridGap", self.grid_gap),
            ("primaryImageBufferHeight", self.primary_image_buffer_height),
            ("secondaryImageBufferHeight", self.secondary_image_buffer_height),
            ("breakpoint", self.breakpoint),
            ("groupGapSm", self.group_gap_sm),
            ("groupGapLg", self.group_gap_lg),
            ("mediumSpeedThreshold", self.medium_speed_threshold),
            ("fastSpeedThreshold", self.fast_speed_threshold),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(GridError::configuration(field, value));
            }
        }
        if !self.idle_decay_factor.is_finite() || self.idle_decay_factor <= 0.0 {
            return Err(GridError::configuration(
                "idleDecayFactor",
                self.idle_decay_factor,
            ));
        }
        if self.fast_speed_threshold < self.medium_speed_threshold {
            return Err(GridError::configuration(
                "fastSpeedThreshold",
                self.fast_speed_threshold,
            ));
        }
        Ok(())
    }

    /// Header band reserved above each group at `container_width`.
    pub fn group_spacing(&self, container_width: f64) -> f64 {
        group_spacing(
            container_width,
            self.breakpoint,
            self.group_gap_sm,
            self.group_gap_lg,
        )
    }

    pub fn scroll_throttle(&self) -> Duration {
        Duration::from_millis(self.scroll_throttle_ms)
    }

    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }
}
