use std::f64::consts::{PI, TAU};
use std::fmt::Write as _;

const EPSILON: f64 = 1e-6;
const TAU_EPSILON: f64 = TAU - EPSILON;

/// Formats a coordinate rounded to three decimals, without trailing zeros.
#[must_use]
pub fn format_number(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        return "0".to_owned();
    }
    format!("{rounded}")
}

/// Incremental SVG path-data writer.
///
/// Mirrors the canvas path API (`move_to`, `line_to`, `arc`, ...) and keeps
/// track of the current point so arcs connect to whatever came before them.
#[derive(Debug, Clone, Default)]
pub struct PathBuilder {
    data: String,
    start: Option<(f64, f64)>,
    current: Option<(f64, f64)>,
}

impl PathBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn current_point(&self) -> Option<(f64, f64)> {
        self.current
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        let _ = write!(self.data, "M{},{}", format_number(x), format_number(y));
        self.start = Some((x, y));
        self.current = Some((x, y));
    }

    pub fn line_to(&mut self, x: f64, y: f64) {
        let _ = write!(self.data, "L{},{}", format_number(x), format_number(y));
        self.current = Some((x, y));
    }

    pub fn bezier_curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) {
        let _ = write!(
            self.data,
            "C{},{},{},{},{},{}",
            format_number(x1),
            format_number(y1),
            format_number(x2),
            format_number(y2),
            format_number(x),
            format_number(y)
        );
        self.current = Some((x, y));
    }

    pub fn close_path(&mut self) {
        if self.current.is_some() {
            self.current = self.start;
            self.data.push('Z');
        }
    }

    /// Circular arc around `(cx, cy)` from `a0` to `a1` radians.
    ///
    /// Connects to the current point with a line when it differs from the arc
    /// start. A sweep of a full turn or more draws the whole circle. Negative
    /// radii are treated as zero.
    pub fn arc(&mut self, cx: f64, cy: f64, radius: f64, a0: f64, a1: f64, counter_clockwise: bool) {
        let radius = radius.max(0.0);
        let dx = radius * a0.cos();
        let dy = radius * a0.sin();
        let x0 = cx + dx;
        let y0 = cy + dy;
        let sweep = u8::from(!counter_clockwise);
        let mut delta = if counter_clockwise { a0 - a1 } else { a1 - a0 };

        match self.current {
            None => self.move_to(x0, y0),
            Some((x, y)) if (x - x0).abs() > EPSILON || (y - y0).abs() > EPSILON => {
                self.line_to(x0, y0);
            }
            Some(_) => {}
        }

        if radius == 0.0 {
            return;
        }
        if delta < 0.0 {
            delta = delta % TAU + TAU;
        }

        let r = format_number(radius);
        if delta > TAU_EPSILON {
            let _ = write!(
                self.data,
                "A{r},{r},0,1,{sweep},{},{}A{r},{r},0,1,{sweep},{},{}",
                format_number(cx - dx),
                format_number(cy - dy),
                format_number(x0),
                format_number(y0)
            );
            self.current = Some((x0, y0));
        } else if delta > EPSILON {
            let x1 = cx + radius * a1.cos();
            let y1 = cy + radius * a1.sin();
            let _ = write!(
                self.data,
                "A{r},{r},0,{},{sweep},{},{}",
                u8::from(delta >= PI),
                format_number(x1),
                format_number(y1)
            );
            self.current = Some((x1, y1));
        }
    }

    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.move_to(x, y);
        let _ = write!(
            self.data,
            "h{}v{}h{}Z",
            format_number(width),
            format_number(height),
            format_number(-width)
        );
        self.current = Some((x, y));
    }

    #[must_use]
    pub fn finish(self) -> String {
        self.data
    }
}
