use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{ChartError, ChartResult};

/// Space reserved around the bounded drawing area for axes and labels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: 40.0,
            right: 30.0,
            bottom: 40.0,
            left: 75.0,
        }
    }
}

impl Margin {
    #[must_use]
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    #[must_use]
    pub const fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    #[must_use]
    pub fn horizontal(self) -> f64 {
        self.left + self.right
    }

    #[must_use]
    pub fn vertical(self) -> f64 {
        self.top + self.bottom
    }

    fn validate(self) -> ChartResult<Self> {
        for (side, value) in [
            ("top", self.top),
            ("right", self.right),
            ("bottom", self.bottom),
            ("left", self.left),
        ] {
            if !value.is_finite() {
                return Err(ChartError::InvalidData(format!(
                    "margin `{side}` must be finite"
                )));
            }
        }
        Ok(self)
    }
}

/// Outer chart size plus the derived bounded drawing area.
///
/// `bounded_width`/`bounded_height` are the outer size minus margins and are
/// floored at zero, so oversized margins collapse the plot instead of flipping it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
    pub margin: Margin,
    pub bounded_width: f64,
    pub bounded_height: f64,
}

impl Dimensions {
    pub fn new(width: f64, height: f64, margin: Margin) -> ChartResult<Self> {
        if !width.is_finite() || !height.is_finite() || width < 0.0 || height < 0.0 {
            return Err(ChartError::InvalidDimensions { width, height });
        }
        let margin = margin.validate()?;

        Ok(Self {
            width,
            height,
            margin,
            bounded_width: (width - margin.horizontal()).max(0.0),
            bounded_height: (height - margin.vertical()).max(0.0),
        })
    }

    /// Square chart of side `width`.
    pub fn square(width: f64, margin: Margin) -> ChartResult<Self> {
        Self::new(width, width, margin)
    }

    /// Radius of the largest circle that fits in the bounded area.
    #[must_use]
    pub fn bounded_radius(&self) -> f64 {
        self.bounded_width.min(self.bounded_height) / 2.0
    }

    /// Center of the bounded area, relative to the bounds origin.
    #[must_use]
    pub fn bounded_center(&self) -> (f64, f64) {
        (self.bounded_width / 2.0, self.bounded_height / 2.0)
    }

    /// Offset applied to the bounds group inside the outer canvas.
    #[must_use]
    pub fn bounds_translate(&self) -> (f64, f64) {
        (self.margin.left, self.margin.top)
    }

    /// Returns a copy with new outer size and the same margins.
    pub fn resized(&self, width: f64, height: f64) -> ChartResult<Self> {
        Self::new(width, height, self.margin)
    }
}

/// Dimensions that follow a container's observed size.
///
/// A requested width or height locks that axis. Unset axes take the most
/// recently observed container size, mirroring a resize observer that
/// re-derives the bounds on every size change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResponsiveDimensions {
    requested_width: Option<f64>,
    requested_height: Option<f64>,
    margin: Margin,
    observed_width: f64,
    observed_height: f64,
}

impl ResponsiveDimensions {
    #[must_use]
    pub fn new(requested_width: Option<f64>, requested_height: Option<f64>, margin: Margin) -> Self {
        Self {
            requested_width: requested_width.filter(|w| *w > 0.0),
            requested_height: requested_height.filter(|h| *h > 0.0),
            margin,
            observed_width: 0.0,
            observed_height: 0.0,
        }
    }

    /// Both axes were requested, so observations never change the result.
    #[must_use]
    pub fn is_fixed(&self) -> bool {
        self.requested_width.is_some() && self.requested_height.is_some()
    }

    /// Resolves the current dimensions from requested and observed sizes.
    pub fn current(&self) -> ChartResult<Dimensions> {
        Dimensions::new(
            self.requested_width.unwrap_or(self.observed_width),
            self.requested_height.unwrap_or(self.observed_height),
            self.margin,
        )
    }

    /// Records a container size observation.
    ///
    /// Returns the re-derived dimensions when they changed, `None` otherwise.
    pub fn observe(&mut self, width: f64, height: f64) -> ChartResult<Option<Dimensions>> {
        if !width.is_finite() || !height.is_finite() || width < 0.0 || height < 0.0 {
            return Err(ChartError::InvalidDimensions { width, height });
        }

        let before = self.current()?;
        self.observed_width = width;
        self.observed_height = height;
        let after = self.current()?;

        if before == after {
            return Ok(None);
        }
        trace!(
            width = after.width,
            height = after.height,
            bounded_width = after.bounded_width,
            bounded_height = after.bounded_height,
            "re-derived chart dimensions"
        );
        Ok(Some(after))
    }
}
