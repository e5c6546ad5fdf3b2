use viz_rs::ChartError;
use viz_rs::render::{
    CirclePrimitive, Color, Group, LinePrimitive, LineStrokeStyle, NullRenderer, Paint,
    PathPrimitive, RectPrimitive, RenderFrame, Renderer, SvgRenderer, TextHAlign, TextPrimitive,
};

fn label(text: &str, x: f64, y: f64) -> TextPrimitive {
    TextPrimitive::new(text, x, y, 12.0, Color::BLACK, TextHAlign::Center)
}

fn sample_frame() -> RenderFrame {
    let bounds = Group::new()
        .with_class("bounds")
        .with_translate(40.0, 20.0)
        .with(RectPrimitive::new(
            0.0,
            10.0,
            20.0,
            30.0,
            Paint::fill(Color::from_rgb8(0xaf, 0x9f, 0xf4)),
        ))
        .with(CirclePrimitive::new(5.0, 5.0, 3.5, Paint::fill(Color::WHITE)))
        .with(Group::new().with_class("axis").with(LinePrimitive::new(
            0.0, 0.0, 100.0, 0.0, 1.0, Color::BLACK,
        )));
    RenderFrame::new(200.0, 100.0)
        .with(bounds)
        .with(label("Temperature", 100.0, 95.0))
}

#[test]
fn svg_document_nests_groups_with_transforms() {
    let svg = SvgRenderer::to_svg(&sample_frame()).expect("valid frame");

    assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"200\" height=\"100\""));
    assert!(svg.ends_with("</svg>"));
    assert!(svg.contains(r#"<g class="bounds" transform="translate(40, 20)">"#));
    assert!(svg.contains(r##"<rect x="0" y="10" width="20" height="30" fill="#af9ff4"/>"##));
    assert!(svg.contains(r##"<circle cx="5" cy="5" r="3.5" fill="#ffffff"/>"##));
    assert!(svg.contains(r#"<g class="axis"><line x1="0" y1="0" x2="100" y2="0""#));
    assert!(svg.contains(">Temperature</text>"));
    assert_eq!(svg.matches("<g").count(), svg.matches("</g>").count());
}

#[test]
fn rotated_groups_and_labels_emit_rotate() {
    let frame = RenderFrame::new(100.0, 100.0)
        .with(Group::new().with_rotation(-90.0).with(label("count", 0.0, 0.0)))
        .with(Group::new().with_translate(10.0, 0.0).with_rotation(90.0))
        .with(label("side", 20.0, 30.0).with_rotation(-90.0));
    let svg = SvgRenderer::to_svg(&frame).expect("valid frame");

    assert!(svg.contains(r#"<g transform="rotate(-90)">"#));
    assert!(svg.contains(r#"transform="translate(10, 0) rotate(90)""#));
    assert!(svg.contains(r#"transform="rotate(-90, 20, 30)""#));
}

#[test]
fn labels_are_escaped() {
    let frame = RenderFrame::new(50.0, 50.0).with(label("Trinidad & Tobago <est.>", 1.0, 1.0));
    let svg = SvgRenderer::to_svg(&frame).expect("valid frame");

    assert!(svg.contains(">Trinidad &amp; Tobago &lt;est.&gt;</text>"));
}

#[test]
fn translucent_paint_writes_opacity_attributes() {
    let paint = Paint::fill(Color::from_rgb8(0x5c, 0xbd, 0xdb).with_alpha(0.5))
        .with_stroke(Color::WHITE.with_alpha(0.25), 2.0);
    let frame = RenderFrame::new(10.0, 10.0)
        .with(PathPrimitive::new("M0,0L5,5Z", paint))
        .with(PathPrimitive::new("M1,1L2,2", Paint::stroke(Color::BLACK, 1.5)));
    let svg = SvgRenderer::to_svg(&frame).expect("valid frame");

    assert!(svg.contains(r##"<path d="M0,0L5,5Z" fill="#5cbddb" fill-opacity="0.5" stroke="#ffffff" stroke-width="2" stroke-opacity="0.25"/>"##));
    assert!(svg.contains(r##"<path d="M1,1L2,2" fill="none" stroke="#000000" stroke-width="1.5"/>"##));
}

#[test]
fn dashed_lines_carry_a_dash_array() {
    let frame = RenderFrame::new(10.0, 10.0).with(
        LinePrimitive::new(0.0, 5.0, 10.0, 5.0, 1.0, Color::named("grey").expect("named"))
            .with_stroke_style(LineStrokeStyle::Dashed),
    );
    let svg = SvgRenderer::to_svg(&frame).expect("valid frame");

    assert!(svg.contains(r#"stroke-dasharray="4 3""#));
}

#[test]
fn renderer_keeps_the_last_document() {
    let mut renderer = SvgRenderer::new().with_font_family("Helvetica");
    renderer.render(&sample_frame()).expect("render");

    assert!(renderer.document().contains(r#"font-family="Helvetica""#));
    assert!(renderer.into_document().contains("Temperature"));
}

#[test]
fn non_finite_geometry_is_rejected() {
    let frame = RenderFrame::new(10.0, 10.0).with(CirclePrimitive::new(
        f64::NAN,
        0.0,
        1.0,
        Paint::fill(Color::BLACK),
    ));
    assert!(matches!(
        SvgRenderer::to_svg(&frame),
        Err(ChartError::InvalidData(_))
    ));

    let frame = RenderFrame::new(10.0, 10.0)
        .with(PathPrimitive::new("M0,NaNL1,1", Paint::fill(Color::BLACK)));
    assert!(SvgRenderer::to_svg(&frame).is_err());

    let frame = RenderFrame::new(10.0, 10.0).with(Group::new().with_translate(f64::INFINITY, 0.0));
    assert!(SvgRenderer::to_svg(&frame).is_err());

    assert!(matches!(
        SvgRenderer::to_svg(&RenderFrame::new(-1.0, 10.0)),
        Err(ChartError::InvalidDimensions { .. })
    ));
}

#[test]
fn empty_labels_and_bad_colors_are_rejected() {
    let frame = RenderFrame::new(10.0, 10.0).with(label("", 0.0, 0.0));
    assert!(SvgRenderer::to_svg(&frame).is_err());

    let frame = RenderFrame::new(10.0, 10.0).with(RectPrimitive::new(
        0.0,
        0.0,
        1.0,
        1.0,
        Paint::fill(Color::rgb(1.5, 0.0, 0.0)),
    ));
    assert!(SvgRenderer::to_svg(&frame).is_err());
}

#[test]
fn null_renderer_counts_nested_primitives() {
    let frame = sample_frame();
    let mut renderer = NullRenderer::default();
    renderer.render(&frame).expect("render");
    renderer.render(&frame).expect("render");

    assert_eq!(renderer.frames_rendered, 2);
    assert_eq!(renderer.last_counts.rects, 1);
    assert_eq!(renderer.last_counts.circles, 1);
    assert_eq!(renderer.last_counts.lines, 1);
    assert_eq!(renderer.last_counts.texts, 1);
    assert_eq!(renderer.last_counts.total(), 4);

    assert!(frame.group("axis").is_some());
    assert!(frame.group("legend").is_none());
    assert!(RenderFrame::new(1.0, 1.0).is_empty());
}

#[test]
fn colors_parse_hex_and_names() {
    assert_eq!(Color::parse("#fff").expect("short hex"), Color::WHITE);
    assert_eq!(Color::parse(" cornflowerblue ").expect("named").to_hex(), "#6495ed");
    assert_eq!(Color::parse("#00000080").expect("alpha").to_css(), "rgba(0, 0, 0, 0.502)");
    assert!(Color::parse("#12345").is_err());
    assert!(Color::parse("chartreuse-ish").is_err());

    let json = serde_json::to_string(&Color::from_rgb8(0x34, 0x49, 0x5e)).expect("serialize");
    assert_eq!(json, "\"#34495e\"");
}
