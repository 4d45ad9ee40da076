//! Runtime configuration loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file at all) yields
//! the reference layout and viewport constants.

use std::path::Path;

use serde::Deserialize;

use crate::error::{FlowError, Result};
use crate::text::Lang;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    /// Identifier of the node every path starts from.
    pub start_node: String,
    /// Language used when the host locale is unsupported.
    pub default_language: Lang,
    pub layout: LayoutConfig,
    pub viewport: ViewportConfig,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            start_node: "start".to_string(),
            default_language: Lang::Ru,
            layout: LayoutConfig::default(),
            viewport: ViewportConfig::default(),
        }
    }
}

/// Node placement constants.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Side length of the square canvas; the root sits at its center.
    pub canvas_size: f64,
    /// Radial distance between a step and its successor.
    pub node_distance: f64,
    /// Vertical squash factor applied to the fan offset.
    pub vertical_spread: f64,
    /// Rendered node card width, used to locate node centers.
    pub node_width: f64,
    /// Rendered node card height.
    pub node_height: f64,
    /// Horizontal control-point offset of connection curves, as a fraction
    /// of the horizontal span.
    pub link_curvature: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            canvas_size: 4200.0,
            node_distance: 420.0,
            vertical_spread: 0.85,
            node_width: 300.0,
            node_height: 180.0,
            link_curvature: 0.45,
        }
    }
}

impl LayoutConfig {
    /// Canvas coordinate of the layout origin.
    pub fn canvas_center(&self) -> f64 {
        self.canvas_size / 2.0
    }
}

/// Pan/zoom constants.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub scale_min: f64,
    pub scale_max: f64,
    /// Exponential rate converting modifier-wheel deltas to zoom factors.
    pub wheel_zoom_rate: f64,
    /// Pixels per wheel line.
    pub line_multiplier: f64,
    /// Pixels per wheel page.
    pub page_multiplier: f64,
    /// Capacity of the touch pointer arena.
    pub max_touch_points: usize,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            scale_min: 0.45,
            scale_max: 2.75,
            wheel_zoom_rate: 0.0015,
            line_multiplier: 16.0,
            page_multiplier: 120.0,
            max_touch_points: 10,
        }
    }
}

impl FlowConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml(source: &str) -> Result<Self> {
        let config: FlowConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&source)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Reject values the engines cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.start_node.is_empty() {
            return Err(FlowError::Config("start_node must not be empty".into()));
        }
        let v = &self.viewport;
        if !is_positive(v.scale_min) {
            return Err(FlowError::Config(format!(
                "scale_min must be positive, got {}",
                v.scale_min
            )));
        }
        if !is_positive(v.scale_max) {
            return Err(FlowError::Config(format!(
                "scale_max must be positive, got {}",
                v.scale_max
            )));
        }
        if v.scale_min > v.scale_max {
            return Err(FlowError::Config(format!(
                "scale_min {} exceeds scale_max {}",
                v.scale_min, v.scale_max
            )));
        }
        if !v.wheel_zoom_rate.is_finite() {
            return Err(FlowError::Config(format!(
                "wheel_zoom_rate must be finite, got {}",
                v.wheel_zoom_rate
            )));
        }
        for (name, value) in [
            ("line_multiplier", v.line_multiplier),
            ("page_multiplier", v.page_multiplier),
        ] {
            if !is_positive(value) {
                return Err(FlowError::Config(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if v.max_touch_points < 2 {
            return Err(FlowError::Config(
                "max_touch_points must allow a two-finger pinch".into(),
            ));
        }
        let l = &self.layout;
        for (name, value) in [
            ("canvas_size", l.canvas_size),
            ("node_distance", l.node_distance),
            ("vertical_spread", l.vertical_spread),
            ("node_width", l.node_width),
            ("node_height", l.node_height),
        ] {
            if !is_positive(value) {
                return Err(FlowError::Config(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        Ok(())
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
