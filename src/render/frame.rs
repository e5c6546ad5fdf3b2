use crate::error::{ChartError, ChartResult};
use crate::render::{
    CirclePrimitive, LinePrimitive, PathPrimitive, RectPrimitive, TextPrimitive,
};

/// One element of the scene tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Line(LinePrimitive),
    Rect(RectPrimitive),
    Circle(CirclePrimitive),
    Path(PathPrimitive),
    Text(TextPrimitive),
    Group(Group),
}

impl From<LinePrimitive> for Node {
    fn from(value: LinePrimitive) -> Self {
        Self::Line(value)
    }
}

impl From<RectPrimitive> for Node {
    fn from(value: RectPrimitive) -> Self {
        Self::Rect(value)
    }
}

impl From<CirclePrimitive> for Node {
    fn from(value: CirclePrimitive) -> Self {
        Self::Circle(value)
    }
}

impl From<PathPrimitive> for Node {
    fn from(value: PathPrimitive) -> Self {
        Self::Path(value)
    }
}

impl From<TextPrimitive> for Node {
    fn from(value: TextPrimitive) -> Self {
        Self::Text(value)
    }
}

impl From<Group> for Node {
    fn from(value: Group) -> Self {
        Self::Group(value)
    }
}

/// Translated container of nodes, the `<g>` of the output.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Group {
    pub class: Option<String>,
    pub translate: (f64, f64),
    /// Clockwise rotation in degrees, applied after the translate.
    pub rotation: f64,
    pub children: Vec<Node>,
}

impl Group {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    #[must_use]
    pub fn with_translate(mut self, x: f64, y: f64) -> Self {
        self.translate = (x, y);
        self
    }

    #[must_use]
    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }

    #[must_use]
    pub fn with(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn push(&mut self, node: impl Into<Node>) {
        self.children.push(node.into());
    }

    pub fn extend<I, N>(&mut self, nodes: I)
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
    }

    /// Depth-first search for the first group carrying `class`.
    #[must_use]
    pub fn find(&self, class: &str) -> Option<&Group> {
        if self.class.as_deref() == Some(class) {
            return Some(self);
        }
        self.children.iter().find_map(|child| match child {
            Node::Group(group) => group.find(class),
            _ => None,
        })
    }

    /// Primitive totals over this group and all nested groups.
    #[must_use]
    pub fn counts(&self) -> PrimitiveCounts {
        let mut counts = PrimitiveCounts::default();
        self.accumulate(&mut counts);
        counts
    }

    fn accumulate(&self, counts: &mut PrimitiveCounts) {
        for child in &self.children {
            match child {
                Node::Line(_) => counts.lines += 1,
                Node::Rect(_) => counts.rects += 1,
                Node::Circle(_) => counts.circles += 1,
                Node::Path(_) => counts.paths += 1,
                Node::Text(_) => counts.texts += 1,
                Node::Group(group) => group.accumulate(counts),
            }
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.translate.0.is_finite()
            || !self.translate.1.is_finite()
            || !self.rotation.is_finite()
        {
            return Err(ChartError::InvalidData(
                "group transform must be finite".to_owned(),
            ));
        }
        for child in &self.children {
            match child {
                Node::Line(line) => line.validate()?,
                Node::Rect(rect) => rect.validate()?,
                Node::Circle(circle) => circle.validate()?,
                Node::Path(path) => path.validate()?,
                Node::Text(text) => text.validate()?,
                Node::Group(group) => group.validate()?,
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PrimitiveCounts {
    pub lines: usize,
    pub rects: usize,
    pub circles: usize,
    pub paths: usize,
    pub texts: usize,
}

impl PrimitiveCounts {
    #[must_use]
    pub fn total(self) -> usize {
        self.lines + self.rects + self.circles + self.paths + self.texts
    }
}

/// Backend-agnostic scene for one chart draw pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub width: f64,
    pub height: f64,
    pub root: Group,
}

impl RenderFrame {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            root: Group::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, node: impl Into<Node>) -> Self {
        self.root.push(node);
        self
    }

    pub fn push(&mut self, node: impl Into<Node>) {
        self.root.push(node);
    }

    #[must_use]
    pub fn group(&self, class: &str) -> Option<&Group> {
        self.root.find(class)
    }

    #[must_use]
    pub fn counts(&self) -> PrimitiveCounts {
        self.root.counts()
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.width.is_finite()
            || !self.height.is_finite()
            || self.width < 0.0
            || self.height < 0.0
        {
            return Err(ChartError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        self.root.validate()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts().total() == 0
    }
}
