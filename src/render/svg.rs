use std::fmt::Write as _;

use tracing::debug;

use crate::error::ChartResult;
use crate::render::{
    CirclePrimitive, Group, LinePrimitive, Node, Paint, PathPrimitive, RectPrimitive,
    RenderFrame, Renderer, TextPrimitive,
};
use crate::shape::format_number as num;

const DEFAULT_FONT_FAMILY: &str = "sans-serif";

/// Serializes frames into standalone SVG documents.
///
/// The most recent document is kept in memory; `into_document` hands it out.
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    font_family: String,
    document: String,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl SvgRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            font_family: DEFAULT_FONT_FAMILY.to_owned(),
            document: String::new(),
        }
    }

    #[must_use]
    pub fn with_font_family(mut self, font_family: impl Into<String>) -> Self {
        self.font_family = font_family.into();
        self
    }

    #[must_use]
    pub fn document(&self) -> &str {
        &self.document
    }

    #[must_use]
    pub fn into_document(self) -> String {
        self.document
    }

    /// Validates and serializes `frame` without keeping renderer state.
    pub fn to_svg(frame: &RenderFrame) -> ChartResult<String> {
        let mut renderer = Self::new();
        renderer.render(frame)?;
        Ok(renderer.into_document())
    }
}

impl Renderer for SvgRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;
        let mut out = String::with_capacity(4096);
        let _ = write!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="{font}">"#,
            w = num(frame.width),
            h = num(frame.height),
            font = escape(&self.font_family),
        );
        write_group_children(&mut out, &frame.root);
        out.push_str("</svg>");

        let counts = frame.counts();
        debug!(
            bytes = out.len(),
            primitives = counts.total(),
            "svg document rendered"
        );
        self.document = out;
        Ok(())
    }
}

fn write_group_children(out: &mut String, group: &Group) {
    for child in &group.children {
        match child {
            Node::Line(line) => write_line(out, line),
            Node::Rect(rect) => write_rect(out, rect),
            Node::Circle(circle) => write_circle(out, circle),
            Node::Path(path) => write_path(out, path),
            Node::Text(text) => write_text(out, text),
            Node::Group(nested) => write_group(out, nested),
        }
    }
}

fn write_group(out: &mut String, group: &Group) {
    out.push_str("<g");
    if let Some(class) = &group.class {
        let _ = write!(out, r#" class="{}""#, escape(class));
    }
    let translated = group.translate != (0.0, 0.0);
    if translated || group.rotation != 0.0 {
        out.push_str(r#" transform=""#);
        if translated {
            let _ = write!(
                out,
                "translate({}, {})",
                num(group.translate.0),
                num(group.translate.1)
            );
        }
        if group.rotation != 0.0 {
            if translated {
                out.push(' ');
            }
            let _ = write!(out, "rotate({})", num(group.rotation));
        }
        out.push('"');
    }
    out.push('>');
    write_group_children(out, group);
    out.push_str("</g>");
}

fn write_paint(out: &mut String, paint: Paint) {
    match paint.fill {
        Some(fill) => {
            let _ = write!(out, r#" fill="{}""#, fill.to_hex());
            if fill.alpha < 1.0 {
                let _ = write!(out, r#" fill-opacity="{}""#, num(fill.alpha));
            }
        }
        None => out.push_str(r#" fill="none""#),
    }
    if let Some(stroke) = paint.stroke {
        let _ = write!(
            out,
            r#" stroke="{}" stroke-width="{}""#,
            stroke.to_hex(),
            num(paint.stroke_width)
        );
        if stroke.alpha < 1.0 {
            let _ = write!(out, r#" stroke-opacity="{}""#, num(stroke.alpha));
        }
    }
}

fn write_line(out: &mut String, line: &LinePrimitive) {
    let _ = write!(
        out,
        r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}""#,
        num(line.x1),
        num(line.y1),
        num(line.x2),
        num(line.y2),
        line.color.to_hex(),
        num(line.stroke_width)
    );
    if line.color.alpha < 1.0 {
        let _ = write!(out, r#" stroke-opacity="{}""#, num(line.color.alpha));
    }
    if let Some(dash) = line.stroke_style.dash_array(line.stroke_width) {
        let _ = write!(out, r#" stroke-dasharray="{dash}""#);
    }
    out.push_str("/>");
}

fn write_rect(out: &mut String, rect: &RectPrimitive) {
    let _ = write!(
        out,
        r#"<rect x="{}" y="{}" width="{}" height="{}""#,
        num(rect.x),
        num(rect.y),
        num(rect.width),
        num(rect.height)
    );
    write_paint(out, rect.paint);
    out.push_str("/>");
}

fn write_circle(out: &mut String, circle: &CirclePrimitive) {
    let _ = write!(
        out,
        r#"<circle cx="{}" cy="{}" r="{}""#,
        num(circle.cx),
        num(circle.cy),
        num(circle.radius)
    );
    write_paint(out, circle.paint);
    out.push_str("/>");
}

fn write_path(out: &mut String, path: &PathPrimitive) {
    let _ = write!(out, r#"<path d="{}""#, escape(&path.data));
    write_paint(out, path.paint);
    out.push_str("/>");
}

fn write_text(out: &mut String, text: &TextPrimitive) {
    let _ = write!(
        out,
        r#"<text x="{}" y="{}" font-size="{}" fill="{}" text-anchor="{}""#,
        num(text.x),
        num(text.y),
        num(text.font_size_px),
        text.color.to_hex(),
        text.h_align.text_anchor()
    );
    if text.rotation != 0.0 {
        let _ = write!(
            out,
            r#" transform="rotate({}, {}, {})""#,
            num(text.rotation),
            num(text.x),
            num(text.y)
        );
    }
    let _ = write!(out, ">{}</text>", escape(&text.text));
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::escape;

    #[test]
    fn escape_replaces_markup_characters() {
        assert_eq!(escape(r#"a<b & "c">"#), "a&lt;b &amp; &quot;c&quot;&gt;");
    }
}
