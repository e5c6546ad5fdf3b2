use serde::{Deserialize, Serialize};

use crate::core::{Dimensions, Margin, ResponsiveDimensions, Thresholds};
use crate::error::{ChartError, ChartResult};
use crate::render::Color;
use crate::shape::Curve;

/// Shared chart setup.
///
/// This type is serializable so host pages can keep chart setup in JSON next
/// to the dataset instead of hard-coding sizes and colors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Requested outer width; `None` follows the observed container width.
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub margin: Margin,
    /// Container size used when nothing was requested or observed.
    #[serde(default = "default_fallback_size")]
    pub fallback_size: (f64, f64),
    #[serde(default = "default_primary_color")]
    pub primary_color: Color,
    #[serde(default = "default_accent_color")]
    pub accent_color: Color,
    #[serde(default = "default_text_color")]
    pub text_color: Color,
    #[serde(default)]
    pub curve: Curve,
    #[serde(default = "default_x_ticks")]
    pub x_ticks: usize,
    #[serde(default = "default_y_ticks")]
    pub y_ticks: usize,
    #[serde(default = "default_thresholds")]
    pub thresholds: Thresholds,
    #[serde(default = "default_bar_padding")]
    pub bar_padding: f64,
    #[serde(default = "default_show_tooltip")]
    pub show_tooltip: bool,
    #[serde(default)]
    pub x_label: Option<String>,
    #[serde(default)]
    pub y_label: Option<String>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            margin: Margin::default(),
            fallback_size: default_fallback_size(),
            primary_color: default_primary_color(),
            accent_color: default_accent_color(),
            text_color: default_text_color(),
            curve: Curve::default(),
            x_ticks: default_x_ticks(),
            y_ticks: default_y_ticks(),
            thresholds: default_thresholds(),
            bar_padding: default_bar_padding(),
            show_tooltip: default_show_tooltip(),
            x_label: None,
            y_label: None,
        }
    }
}

impl ChartConfig {
    /// Creates a config with a fixed outer size.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_margin(mut self, margin: Margin) -> Self {
        self.margin = margin;
        self
    }

    #[must_use]
    pub fn with_colors(mut self, primary: Color, accent: Color) -> Self {
        self.primary_color = primary;
        self.accent_color = accent;
        self
    }

    #[must_use]
    pub fn with_curve(mut self, curve: Curve) -> Self {
        self.curve = curve;
        self
    }

    #[must_use]
    pub fn with_ticks(mut self, x_ticks: usize, y_ticks: usize) -> Self {
        self.x_ticks = x_ticks;
        self.y_ticks = y_ticks;
        self
    }

    #[must_use]
    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    #[must_use]
    pub fn with_bar_padding(mut self, bar_padding: f64) -> Self {
        self.bar_padding = bar_padding;
        self
    }

    #[must_use]
    pub fn with_tooltip(mut self, show_tooltip: bool) -> Self {
        self.show_tooltip = show_tooltip;
        self
    }

    #[must_use]
    pub fn with_axis_labels(mut self, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        self.x_label = Some(x_label.into());
        self.y_label = Some(y_label.into());
        self
    }

    /// Responsive calculator seeded with the fallback container size.
    pub fn responsive(&self) -> ChartResult<ResponsiveDimensions> {
        let mut responsive = ResponsiveDimensions::new(self.width, self.height, self.margin);
        let (width, height) = self.fallback_size;
        responsive.observe(width, height)?;
        Ok(responsive)
    }

    /// Dimensions for a static render.
    pub fn dimensions(&self) -> ChartResult<Dimensions> {
        self.validate()?;
        self.responsive()?.current()
    }

    pub fn validate(&self) -> ChartResult<()> {
        for (name, value) in [
            ("margin.top", self.margin.top),
            ("margin.right", self.margin.right),
            ("margin.bottom", self.margin.bottom),
            ("margin.left", self.margin.left),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "{name} must be finite and >= 0"
                )));
            }
        }
        if !self.bar_padding.is_finite() || self.bar_padding < 0.0 {
            return Err(ChartError::InvalidData(
                "bar padding must be finite and >= 0".to_owned(),
            ));
        }
        if self.x_ticks == 0 || self.y_ticks == 0 {
            return Err(ChartError::InvalidData(
                "tick counts must be > 0".to_owned(),
            ));
        }
        Ok(())
    }

    /// Parses a config document and validates it.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse chart config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize chart config: {e}"))
        })
    }
}

fn default_fallback_size() -> (f64, f64) {
    (600.0, 400.0)
}

fn default_primary_color() -> Color {
    Color::from_rgb8(0xaf, 0x9f, 0xf4)
}

fn default_accent_color() -> Color {
    Color::from_rgb8(0x5c, 0xbd, 0xdb)
}

fn default_text_color() -> Color {
    Color::from_rgb8(0x34, 0x49, 0x5e)
}

fn default_x_ticks() -> usize {
    5
}

fn default_y_ticks() -> usize {
    4
}

fn default_thresholds() -> Thresholds {
    Thresholds::Count(12)
}

fn default_bar_padding() -> f64 {
    1.0
}

fn default_show_tooltip() -> bool {
    true
}
