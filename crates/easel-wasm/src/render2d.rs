//! Canvas2D software renderer.
//!
//! Paints a document to an HTML `<canvas>` via `CanvasRenderingContext2d`:
//! background + grid in screen space, then layers in z-order under the
//! camera transform, then interaction overlays (selection ring + handles,
//! lasso marquee, shape preview, in-progress pen/pencil stroke).

use easel_core::model::{
    Color, Document, Layer, LayerKind, LayerProperties, LayerStyle, PathPoint, ShapeKind,
    TextAlign,
};
use easel_core::LayerId;
use easel_editor::Camera;
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

/// Theme-dependent colors for the canvas renderer.
pub struct CanvasTheme {
    pub bg: &'static str,
    pub grid: &'static str,
    pub text: &'static str,
    pub frame_border: &'static str,
    pub frame_label: &'static str,
    pub placeholder_border: &'static str,
    pub placeholder_bg: &'static str,
}

impl CanvasTheme {
    pub fn light() -> Self {
        Self {
            bg: "#FAFAFA",
            grid: "rgba(0, 0, 0, 0.04)",
            text: "#374151",
            frame_border: "#9CA3AF",
            frame_label: "#6B7280",
            placeholder_border: "#9CA3AF",
            placeholder_bg: "rgba(156, 163, 175, 0.08)",
        }
    }

    pub fn dark() -> Self {
        Self {
            bg: "#111113",
            grid: "rgba(255, 255, 255, 0.04)",
            text: "#E5E7EB",
            frame_border: "#6B7280",
            frame_label: "#9CA3AF",
            placeholder_border: "#6B7280",
            placeholder_bg: "rgba(107, 114, 128, 0.1)",
        }
    }
}

/// Selection / interaction accent.
const ACCENT: &str = "#3B82F6";
const MARQUEE_FILL: &str = "rgba(59, 130, 246, 0.08)";
const PREVIEW_FILL: &str = "rgba(59, 130, 246, 0.1)";

/// Grid spacing in canvas units.
const GRID_SPACING: f32 = 50.0;

/// Interaction overlays drawn on top of the document.
#[derive(Default)]
pub struct Overlays<'a> {
    pub selected: Option<LayerId>,
    /// Lasso rectangle, canvas-space (x, y, w, h).
    pub marquee: Option<(f32, f32, f32, f32)>,
    /// Shape/frame drag preview, canvas-space.
    pub preview: Option<(f32, f32, f32, f32)>,
    /// In-progress pen/pencil points, canvas-space.
    pub pending_path: Option<&'a [PathPoint]>,
}

/// Render the whole scene.
pub fn render_scene(
    ctx: &CanvasRenderingContext2d,
    doc: &Document,
    camera: &Camera,
    canvas_width: f64,
    canvas_height: f64,
    overlays: &Overlays<'_>,
    theme: &CanvasTheme,
) {
    // Background + grid live in screen space.
    ctx.set_fill_style_str(theme.bg);
    ctx.fill_rect(0.0, 0.0, canvas_width, canvas_height);
    draw_grid(ctx, camera, canvas_width, canvas_height, theme);

    // Everything else under the camera transform.
    ctx.save();
    let _ = ctx.translate(camera.pan_x as f64, camera.pan_y as f64);
    let _ = ctx.scale(camera.zoom() as f64, camera.zoom() as f64);

    for id in doc.top_level() {
        render_layer(ctx, doc, id, overlays.selected, camera, theme);
    }

    if let Some((x, y, w, h)) = overlays.preview {
        draw_preview_rect(ctx, x, y, w, h, camera);
    }
    if let Some(points) = overlays.pending_path {
        draw_pending_path(ctx, points, camera);
    }
    if let Some((x, y, w, h)) = overlays.marquee {
        draw_marquee_rect(ctx, x, y, w, h, camera);
    }

    ctx.restore();
}

fn render_layer(
    ctx: &CanvasRenderingContext2d,
    doc: &Document,
    id: LayerId,
    selected: Option<LayerId>,
    camera: &Camera,
    theme: &CanvasTheme,
) {
    let Some(layer) = doc.get(id) else {
        return;
    };
    if !layer.visible {
        return;
    }

    if let Some(props) = &layer.properties {
        ctx.save();
        ctx.set_global_alpha(props.style.opacity as f64);
        match layer.kind {
            LayerKind::Frame => draw_frame(ctx, layer, props, theme),
            LayerKind::Shape => draw_shape(ctx, props),
            LayerKind::Text => draw_text(ctx, props, theme),
            LayerKind::Path => draw_path(ctx, props),
            LayerKind::Comment => draw_comment_pin(ctx, layer, props),
            LayerKind::Component => draw_component_placeholder(ctx, layer, props, theme),
        }
        ctx.restore();
    }

    // Children paint after (on top of) their container.
    for child in doc.children_of(id) {
        render_layer(ctx, doc, child, selected, camera, theme);
    }

    // Selection overlay last so it is never covered by children.
    if selected == Some(id)
        && let Some(props) = &layer.properties
    {
        draw_selection(ctx, props, camera);
    }
}

// ─── Layer kinds ─────────────────────────────────────────────────────────

fn draw_frame(
    ctx: &CanvasRenderingContext2d,
    layer: &Layer,
    props: &LayerProperties,
    theme: &CanvasTheme,
) {
    let (x, y, w, h) = rect_of(props);
    let radius = props.style.corner_radius as f64;

    if let Some(fill) = &props.style.fill {
        rounded_rect_path(ctx, x, y, w, h, radius);
        ctx.set_fill_style_str(&fill.to_css());
        ctx.fill();
    } else {
        // Unfilled frames read as dashed outlines.
        set_dash(ctx, 4.0);
        ctx.set_stroke_style_str(theme.frame_border);
        ctx.set_line_width(1.0);
        rounded_rect_path(ctx, x, y, w, h, radius);
        ctx.stroke();
        clear_dash(ctx);
    }
    stroke_style(ctx, &props.style, || rounded_rect_path(ctx, x, y, w, h, radius));

    // Frame name tag above the top-left corner.
    ctx.set_font("11px Inter, system-ui, sans-serif");
    ctx.set_fill_style_str(theme.frame_label);
    ctx.set_text_align("left");
    ctx.set_text_baseline("bottom");
    let _ = ctx.fill_text(&layer.name, x, y - 4.0);
}

fn draw_shape(ctx: &CanvasRenderingContext2d, props: &LayerProperties) {
    let (x, y, w, h) = rect_of(props);
    let style = &props.style;

    match props.shape.unwrap_or(ShapeKind::Rectangle) {
        ShapeKind::Rectangle => {
            rounded_rect_path(ctx, x, y, w, h, style.corner_radius as f64);
            fill_style(ctx, style);
            stroke_style(ctx, style, || {
                rounded_rect_path(ctx, x, y, w, h, style.corner_radius as f64)
            });
        }
        ShapeKind::Circle => {
            ctx.begin_path();
            let _ = ctx.ellipse(
                x + w / 2.0,
                y + h / 2.0,
                w / 2.0,
                h / 2.0,
                0.0,
                0.0,
                std::f64::consts::TAU,
            );
            fill_style(ctx, style);
            stroke_current_path(ctx, style);
        }
        ShapeKind::Triangle => {
            polygon_path(ctx, &[(x + w / 2.0, y), (x + w, y + h), (x, y + h)]);
            fill_style(ctx, style);
            stroke_current_path(ctx, style);
        }
        ShapeKind::Polygon => {
            polygon_path(ctx, &regular_polygon(x, y, w, h, 6));
            fill_style(ctx, style);
            stroke_current_path(ctx, style);
        }
        ShapeKind::Star => {
            polygon_path(ctx, &star_points(x, y, w, h));
            fill_style(ctx, style);
            stroke_current_path(ctx, style);
        }
        ShapeKind::Line => {
            ctx.begin_path();
            ctx.move_to(x, y);
            ctx.line_to(x + w, y + h);
            stroke_line(ctx, style);
        }
        ShapeKind::Arrow => {
            ctx.begin_path();
            ctx.move_to(x, y);
            ctx.line_to(x + w, y + h);
            stroke_line(ctx, style);
            draw_arrow_head(ctx, x, y, x + w, y + h, style);
        }
    }
}

fn draw_text(ctx: &CanvasRenderingContext2d, props: &LayerProperties, theme: &CanvasTheme) {
    let (x, y, w, h) = rect_of(props);
    let style = &props.style;

    let size = style.font_size.unwrap_or(14.0);
    let weight = style.font_weight.unwrap_or(400);
    ctx.set_font(&format!("{weight} {size}px Inter, system-ui, sans-serif"));

    let color = style
        .fill
        .as_ref()
        .map(Color::to_css)
        .unwrap_or_else(|| theme.text.to_string());
    ctx.set_fill_style_str(&color);
    ctx.set_text_baseline("middle");

    let content = props.content.as_deref().unwrap_or("Text");
    let (align, tx) = match style.text_align.unwrap_or_default() {
        TextAlign::Left => ("left", x),
        TextAlign::Center => ("center", x + w / 2.0),
        TextAlign::Right => ("right", x + w),
    };
    ctx.set_text_align(align);
    let _ = ctx.fill_text(content, tx, y + h / 2.0);
}

fn draw_path(ctx: &CanvasRenderingContext2d, props: &LayerProperties) {
    let Some(path) = &props.path else {
        return;
    };
    // A path with fewer than 2 points never renders a visible stroke.
    if !path.is_drawable() {
        return;
    }
    let (dx, dy) = (props.x as f64, props.y as f64);

    ctx.begin_path();
    ctx.move_to(dx + path.points[0].x as f64, dy + path.points[0].y as f64);
    for p in &path.points[1..] {
        ctx.line_to(dx + p.x as f64, dy + p.y as f64);
    }
    if path.closed {
        ctx.close_path();
        fill_style(ctx, &props.style);
    }
    stroke_current_path(ctx, &props.style);
}

fn draw_comment_pin(ctx: &CanvasRenderingContext2d, layer: &Layer, props: &LayerProperties) {
    let (x, y, w, h) = rect_of(props);
    let (cx, cy) = (x + w / 2.0, y + h / 2.0);
    let radius = w.min(h) / 2.0;

    ctx.begin_path();
    let _ = ctx.arc(cx, cy, radius, 0.0, std::f64::consts::TAU);
    let fill = props
        .style
        .fill
        .as_ref()
        .map(Color::to_css)
        .unwrap_or_else(|| "#F59E0B".to_string());
    ctx.set_fill_style_str(&fill);
    ctx.fill();
    ctx.set_stroke_style_str("#FFFFFF");
    ctx.set_line_width(2.0);
    ctx.stroke();

    // Comment count inside the pin.
    if !layer.comments.is_empty() {
        ctx.set_font("bold 11px Inter, sans-serif");
        ctx.set_fill_style_str("#FFFFFF");
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        let _ = ctx.fill_text(&layer.comments.len().to_string(), cx, cy);
    }
}

fn draw_component_placeholder(
    ctx: &CanvasRenderingContext2d,
    layer: &Layer,
    props: &LayerProperties,
    theme: &CanvasTheme,
) {
    let (x, y, w, h) = rect_of(props);

    set_dash(ctx, 4.0);
    ctx.set_stroke_style_str(theme.placeholder_border);
    ctx.set_line_width(1.0);
    rounded_rect_path(ctx, x, y, w, h, 6.0);
    ctx.stroke();
    clear_dash(ctx);

    ctx.set_fill_style_str(theme.placeholder_bg);
    ctx.fill();

    ctx.set_font("11px Inter, system-ui, sans-serif");
    ctx.set_fill_style_str(theme.frame_label);
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    let _ = ctx.fill_text(&layer.name, x + w / 2.0, y + h / 2.0);
}

// ─── Overlays ────────────────────────────────────────────────────────────

fn draw_selection(ctx: &CanvasRenderingContext2d, props: &LayerProperties, camera: &Camera) {
    let (x, y, w, h) = rect_of(props);
    // Screen-constant line width and handle size.
    let inv = 1.0 / camera.zoom() as f64;

    ctx.save();
    ctx.set_stroke_style_str(ACCENT);
    ctx.set_line_width(2.0 * inv);
    ctx.stroke_rect(x, y, w, h);

    let size = 8.0 * inv;
    let half = size / 2.0;
    ctx.set_fill_style_str("#FFFFFF");
    ctx.set_line_width(1.5 * inv);
    for (hx, hy) in [
        (x, y),
        (x + w / 2.0, y),
        (x + w, y),
        (x + w, y + h / 2.0),
        (x + w, y + h),
        (x + w / 2.0, y + h),
        (x, y + h),
        (x, y + h / 2.0),
    ] {
        ctx.fill_rect(hx - half, hy - half, size, size);
        ctx.stroke_rect(hx - half, hy - half, size, size);
    }
    ctx.restore();
}

fn draw_marquee_rect(
    ctx: &CanvasRenderingContext2d,
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    camera: &Camera,
) {
    if w < 1.0 && h < 1.0 {
        return;
    }
    ctx.save();
    ctx.set_fill_style_str(MARQUEE_FILL);
    ctx.fill_rect(x as f64, y as f64, w as f64, h as f64);
    ctx.set_stroke_style_str(ACCENT);
    ctx.set_line_width(1.0 / camera.zoom() as f64);
    set_dash(ctx, 4.0);
    ctx.stroke_rect(x as f64, y as f64, w as f64, h as f64);
    ctx.restore();
}

fn draw_preview_rect(
    ctx: &CanvasRenderingContext2d,
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    camera: &Camera,
) {
    ctx.save();
    ctx.set_fill_style_str(PREVIEW_FILL);
    ctx.fill_rect(x as f64, y as f64, w as f64, h as f64);
    ctx.set_stroke_style_str(ACCENT);
    ctx.set_line_width(2.0 / camera.zoom() as f64);
    ctx.stroke_rect(x as f64, y as f64, w as f64, h as f64);
    ctx.restore();
}

fn draw_pending_path(ctx: &CanvasRenderingContext2d, points: &[PathPoint], camera: &Camera) {
    if points.is_empty() {
        return;
    }
    ctx.save();
    ctx.set_stroke_style_str(ACCENT);
    ctx.set_line_width(2.0 / camera.zoom() as f64);
    ctx.begin_path();
    ctx.move_to(points[0].x as f64, points[0].y as f64);
    for p in &points[1..] {
        ctx.line_to(p.x as f64, p.y as f64);
    }
    ctx.stroke();

    // Anchor dots so pen clicks are visible before the path commits.
    ctx.set_fill_style_str(ACCENT);
    for p in points {
        ctx.begin_path();
        let _ = ctx.arc(
            p.x as f64,
            p.y as f64,
            3.0 / camera.zoom() as f64,
            0.0,
            std::f64::consts::TAU,
        );
        ctx.fill();
    }
    ctx.restore();
}

fn draw_grid(
    ctx: &CanvasRenderingContext2d,
    camera: &Camera,
    width: f64,
    height: f64,
    theme: &CanvasTheme,
) {
    let step = (GRID_SPACING * camera.zoom()) as f64;
    if step < 8.0 {
        // Grid would be noise when zoomed far out.
        return;
    }
    ctx.set_fill_style_str(theme.grid);

    let mut x = (camera.pan_x as f64).rem_euclid(step);
    while x < width {
        ctx.fill_rect(x, 0.0, 1.0, height);
        x += step;
    }
    let mut y = (camera.pan_y as f64).rem_euclid(step);
    while y < height {
        ctx.fill_rect(0.0, y, width, 1.0);
        y += step;
    }
}

// ─── Primitives ──────────────────────────────────────────────────────────

fn rect_of(props: &LayerProperties) -> (f64, f64, f64, f64) {
    (
        props.x as f64,
        props.y as f64,
        props.width as f64,
        props.height as f64,
    )
}

fn fill_style(ctx: &CanvasRenderingContext2d, style: &LayerStyle) {
    if let Some(fill) = &style.fill {
        ctx.set_fill_style_str(&fill.to_css());
        ctx.fill();
    }
}

/// Stroke the current path with the layer's stroke, if any.
fn stroke_current_path(ctx: &CanvasRenderingContext2d, style: &LayerStyle) {
    if let Some(stroke) = &style.stroke {
        ctx.set_stroke_style_str(&stroke.to_css());
        ctx.set_line_width(style.stroke_width as f64);
        ctx.stroke();
    }
}

/// Rebuild + stroke for shapes whose fill consumed the path.
fn stroke_style(ctx: &CanvasRenderingContext2d, style: &LayerStyle, rebuild: impl Fn()) {
    if style.stroke.is_some() {
        rebuild();
        stroke_current_path(ctx, style);
    }
}

/// Lines always stroke — fall back to the fill color when no stroke set.
fn stroke_line(ctx: &CanvasRenderingContext2d, style: &LayerStyle) {
    let color = style
        .stroke
        .as_ref()
        .or(style.fill.as_ref())
        .map(Color::to_css)
        .unwrap_or_else(|| ACCENT.to_string());
    ctx.set_stroke_style_str(&color);
    ctx.set_line_width(style.stroke_width.max(1.0) as f64);
    ctx.stroke();
}

fn draw_arrow_head(
    ctx: &CanvasRenderingContext2d,
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    style: &LayerStyle,
) {
    let angle = (y2 - y1).atan2(x2 - x1);
    let len = 10.0_f64.max(style.stroke_width as f64 * 3.0);
    ctx.begin_path();
    ctx.move_to(x2, y2);
    ctx.line_to(
        x2 - len * (angle - 0.5).cos(),
        y2 - len * (angle - 0.5).sin(),
    );
    ctx.move_to(x2, y2);
    ctx.line_to(
        x2 - len * (angle + 0.5).cos(),
        y2 - len * (angle + 0.5).sin(),
    );
    stroke_line(ctx, style);
}

fn polygon_path(ctx: &CanvasRenderingContext2d, points: &[(f64, f64)]) {
    ctx.begin_path();
    let Some(&(x0, y0)) = points.first() else {
        return;
    };
    ctx.move_to(x0, y0);
    for &(px, py) in &points[1..] {
        ctx.line_to(px, py);
    }
    ctx.close_path();
}

/// Vertices of a regular n-gon inscribed in the bounds, flat top edge.
fn regular_polygon(x: f64, y: f64, w: f64, h: f64, sides: u32) -> Vec<(f64, f64)> {
    let (cx, cy) = (x + w / 2.0, y + h / 2.0);
    let (rx, ry) = (w / 2.0, h / 2.0);
    (0..sides)
        .map(|i| {
            let angle = std::f64::consts::TAU * (i as f64) / (sides as f64)
                - std::f64::consts::FRAC_PI_2;
            (cx + rx * angle.cos(), cy + ry * angle.sin())
        })
        .collect()
}

/// Five-pointed star inscribed in the bounds.
fn star_points(x: f64, y: f64, w: f64, h: f64) -> Vec<(f64, f64)> {
    let (cx, cy) = (x + w / 2.0, y + h / 2.0);
    let (rx, ry) = (w / 2.0, h / 2.0);
    (0..10)
        .map(|i| {
            let angle =
                std::f64::consts::TAU * (i as f64) / 10.0 - std::f64::consts::FRAC_PI_2;
            let scale = if i % 2 == 0 { 1.0 } else { 0.4 };
            (cx + rx * scale * angle.cos(), cy + ry * scale * angle.sin())
        })
        .collect()
}

fn rounded_rect_path(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, radius: f64) {
    let r = radius.min(w / 2.0).min(h / 2.0).max(0.0);
    ctx.begin_path();
    ctx.move_to(x + r, y);
    ctx.line_to(x + w - r, y);
    ctx.arc_to(x + w, y, x + w, y + r, r).unwrap_or(());
    ctx.line_to(x + w, y + h - r);
    ctx.arc_to(x + w, y + h, x + w - r, y + h, r).unwrap_or(());
    ctx.line_to(x + r, y + h);
    ctx.arc_to(x, y + h, x, y + h - r, r).unwrap_or(());
    ctx.line_to(x, y + r);
    ctx.arc_to(x, y, x + r, y, r).unwrap_or(());
    ctx.close_path();
}

fn set_dash(ctx: &CanvasRenderingContext2d, len: f64) {
    let _ = ctx.set_line_dash(&js_sys::Array::of2(
        &JsValue::from_f64(len),
        &JsValue::from_f64(len),
    ));
}

fn clear_dash(ctx: &CanvasRenderingContext2d) {
    let _ = ctx.set_line_dash(&js_sys::Array::new());
}
