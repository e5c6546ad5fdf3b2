//! Pointer interaction: hit testing and hover state.
//!
//! State types are immutable values. Every pointer event consumes the old
//! state and returns the next one, so a chart can diff or replay them.

mod nearest;
mod voronoi;

pub use nearest::{nearest_2d, nearest_2d_within, nearest_by_x};
pub use voronoi::VoronoiDiagram;

use serde::{Deserialize, Serialize};

use crate::core::Margin;

/// Datum under the pointer, snapped to its rendered position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoverSnap {
    pub index: usize,
    pub x: f64,
    pub y: f64,
}

/// Last known pointer position and what it hovers.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointerTracker {
    position: Option<(f64, f64)>,
    hover: Option<HoverSnap>,
}

impl PointerTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn position(&self) -> Option<(f64, f64)> {
        self.position
    }

    #[must_use]
    pub fn hover(&self) -> Option<HoverSnap> {
        self.hover
    }

    #[must_use]
    pub fn is_inside(&self) -> bool {
        self.position.is_some()
    }

    #[must_use]
    pub fn on_pointer_move(self, x: f64, y: f64, hover: Option<HoverSnap>) -> Self {
        if !x.is_finite() || !y.is_finite() {
            return self;
        }
        Self {
            position: Some((x, y)),
            hover,
        }
    }

    #[must_use]
    pub fn on_pointer_leave(self) -> Self {
        Self::default()
    }

    /// Whether moving from `self` to `next` changed the hovered datum.
    #[must_use]
    pub fn hover_changed(&self, next: &Self) -> bool {
        self.hover.map(|snap| snap.index) != next.hover.map(|snap| snap.index)
    }
}

/// Tooltip visibility and placement.
///
/// The anchor is in outer chart coordinates: the bounded-area pixel position
/// plus the margin offset.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TooltipState {
    visible: bool,
    anchor: (f64, f64),
    index: Option<usize>,
    lines: Vec<String>,
}

impl TooltipState {
    #[must_use]
    pub fn hidden() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[must_use]
    pub fn anchor(&self) -> (f64, f64) {
        self.anchor
    }

    #[must_use]
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Shows the tooltip for the hovered datum.
    #[must_use]
    pub fn on_pointer_move(self, snap: HoverSnap, margin: Margin, lines: Vec<String>) -> Self {
        Self {
            visible: true,
            anchor: (snap.x + margin.left, snap.y + margin.top),
            index: Some(snap.index),
            lines,
        }
    }

    #[must_use]
    pub fn on_pointer_leave(self) -> Self {
        Self {
            visible: false,
            ..self
        }
    }

    /// CSS transform that centres the tooltip horizontally above the anchor.
    #[must_use]
    pub fn css_transform(&self) -> String {
        format!(
            "translate(calc(-50% + {}px), calc(-100% + {}px))",
            crate::shape::format_number(self.anchor.0),
            crate::shape::format_number(self.anchor.1)
        )
    }
}
