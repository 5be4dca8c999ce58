//! Core data model for Easel documents.
//!
//! A document is a shallow tree of [`Layer`]s: top-level layers plus
//! optional nesting under frame-type containers. Sibling order is z-order —
//! the last sibling paints on top. Geometry is absolute canvas-space with a
//! top-left origin; a layer without [`LayerProperties`] is structural only
//! (it appears in layer lists but renders nothing and cannot be hit).

use crate::id::{LayerId, unique_name};
use petgraph::Direction;
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt;

/// Default geometry for elements placed without a drag (and for patches
/// applied to layers that never had properties).
pub const DEFAULT_WIDTH: f32 = 200.0;
pub const DEFAULT_HEIGHT: f32 = 120.0;

/// Resizing never shrinks an element below this.
pub const MIN_SIZE: f32 = 50.0;

// ─── Color ───────────────────────────────────────────────────────────────

/// RGBA color, 4 × f32 in [0.0, 1.0]. Serializes as a hex string
/// (`"#6366F1"`), matching what the properties panel exchanges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Parse a single hex digit.
fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a hex color string: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`.
    /// The leading `#` is optional.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();

        let (r, g, b, a) = match bytes.len() {
            3 | 4 => {
                let r = hex_val(bytes[0])? * 17;
                let g = hex_val(bytes[1])? * 17;
                let b = hex_val(bytes[2])? * 17;
                let a = if bytes.len() == 4 {
                    hex_val(bytes[3])? * 17
                } else {
                    255
                };
                (r, g, b, a)
            }
            6 | 8 => {
                let r = hex_val(bytes[0])? << 4 | hex_val(bytes[1])?;
                let g = hex_val(bytes[2])? << 4 | hex_val(bytes[3])?;
                let b = hex_val(bytes[4])? << 4 | hex_val(bytes[5])?;
                let a = if bytes.len() == 8 {
                    hex_val(bytes[6])? << 4 | hex_val(bytes[7])?
                } else {
                    255
                };
                (r, g, b, a)
            }
            _ => return None,
        };

        Some(Self::rgba(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        ))
    }

    /// Emit as `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
    pub fn to_hex(&self) -> String {
        let r = (self.r * 255.0).round() as u8;
        let g = (self.g * 255.0).round() as u8;
        let b = (self.b * 255.0).round() as u8;
        let a = (self.a * 255.0).round() as u8;
        if a == 255 {
            format!("#{r:02X}{g:02X}{b:02X}")
        } else {
            format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }

    /// CSS `rgba(...)` form for the Canvas2D renderer.
    pub fn to_css(&self) -> String {
        let r = (self.r * 255.0).round() as u8;
        let g = (self.g * 255.0).round() as u8;
        let b = (self.b * 255.0).round() as u8;
        format!("rgba({r}, {g}, {b}, {})", self.a)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid hex color: {s}")))
    }
}

// ─── Style ───────────────────────────────────────────────────────────────

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Visual styling shared by every layer kind. `None` fill/stroke means
/// "not painted" (the prototype's `transparent`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Color>,
    pub stroke_width: f32,
    pub corner_radius: f32,
    /// 0.0 (invisible) .. 1.0 (opaque).
    pub opacity: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    /// CSS weight, 100..900.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
}

impl Default for LayerStyle {
    fn default() -> Self {
        Self {
            fill: None,
            stroke: None,
            stroke_width: 1.0,
            corner_radius: 0.0,
            opacity: 1.0,
            font_size: None,
            font_weight: None,
            text_align: None,
        }
    }
}

// ─── Partial updates ─────────────────────────────────────────────────────

/// Three-state field update: leave alone, clear, or set.
///
/// In JSON, an absent field is `Keep`, an explicit `null` is `Clear`, and a
/// value is `Set` — so the properties panel can clear a fill by sending
/// `{"fill": null}` without disturbing the other fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Patch<T> {
    #[default]
    Keep,
    Clear,
    Set(T),
}

impl<T> Patch<T> {
    pub fn is_keep(&self) -> bool {
        matches!(self, Patch::Keep)
    }

    /// Merge into an optional slot.
    pub fn apply_to(self, slot: &mut Option<T>) {
        match self {
            Patch::Keep => {}
            Patch::Clear => *slot = None,
            Patch::Set(v) => *slot = Some(v),
        }
    }
}

impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            // `Keep` fields are skipped at the struct level via
            // `skip_serializing_if`; reaching here serializes as null.
            Patch::Keep | Patch::Clear => serializer.serialize_none(),
            Patch::Set(v) => serializer.serialize_some(v),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<T>::deserialize(deserializer)? {
            None => Patch::Clear,
            Some(v) => Patch::Set(v),
        })
    }
}

/// Partial style update. `None` / `Patch::Keep` fields are untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StylePatch {
    #[serde(skip_serializing_if = "Patch::is_keep")]
    pub fill: Patch<Color>,
    #[serde(skip_serializing_if = "Patch::is_keep")]
    pub stroke: Patch<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
}

impl StylePatch {
    pub fn apply_to(self, style: &mut LayerStyle) {
        self.fill.apply_to(&mut style.fill);
        self.stroke.apply_to(&mut style.stroke);
        if let Some(w) = self.stroke_width {
            style.stroke_width = w;
        }
        if let Some(r) = self.corner_radius {
            style.corner_radius = r;
        }
        if let Some(o) = self.opacity {
            style.opacity = o;
        }
        if let Some(s) = self.font_size {
            style.font_size = Some(s);
        }
        if let Some(w) = self.font_weight {
            style.font_weight = Some(w);
        }
        if let Some(a) = self.text_align {
            style.text_align = Some(a);
        }
    }
}

/// Partial layer update: geometry, name, text content, and a style patch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayerPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "StylePatch::is_empty")]
    pub style: StylePatch,
}

impl StylePatch {
    fn is_empty(&self) -> bool {
        self == &StylePatch::default()
    }
}

// ─── Shapes & paths ──────────────────────────────────────────────────────

/// Shape sub-type for `LayerKind::Shape` layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Triangle,
    Polygon,
    Line,
    Arrow,
    Star,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 7] = [
        ShapeKind::Rectangle,
        ShapeKind::Circle,
        ShapeKind::Triangle,
        ShapeKind::Polygon,
        ShapeKind::Line,
        ShapeKind::Arrow,
        ShapeKind::Star,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Circle => "circle",
            ShapeKind::Triangle => "triangle",
            ShapeKind::Polygon => "polygon",
            ShapeKind::Line => "line",
            ShapeKind::Arrow => "arrow",
            ShapeKind::Star => "star",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.name() == name)
    }

    /// Display label for layer naming ("Rectangle 3").
    pub fn label(&self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "Rectangle",
            ShapeKind::Circle => "Circle",
            ShapeKind::Triangle => "Triangle",
            ShapeKind::Polygon => "Polygon",
            ShapeKind::Line => "Line",
            ShapeKind::Arrow => "Arrow",
            ShapeKind::Star => "Star",
        }
    }
}

/// A single anchor or sample point of a path, relative to the owning
/// layer's origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    pub x: f32,
    pub y: f32,
}

/// An ordered polyline produced by the pen or pencil tool.
///
/// Points are stored relative to the owning layer's `(x, y)` so a path
/// moves with its layer. A path with fewer than 2 points is neither
/// renderable nor selectable.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Path {
    pub points: Vec<PathPoint>,
    pub closed: bool,
}

impl Path {
    pub fn new(points: Vec<PathPoint>, closed: bool) -> Self {
        Self { points, closed }
    }

    /// Whether the path has enough points to draw a stroke.
    pub fn is_drawable(&self) -> bool {
        self.points.len() >= 2
    }
}

// ─── Layers ──────────────────────────────────────────────────────────────

/// Layer kind discriminant. Payload (text content, shape sub-type, path
/// data) lives in [`LayerProperties`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Frame,
    Text,
    Shape,
    Component,
    Path,
    Comment,
}

impl LayerKind {
    pub fn label(&self) -> &'static str {
        match self {
            LayerKind::Frame => "Frame",
            LayerKind::Text => "Text",
            LayerKind::Shape => "Shape",
            LayerKind::Component => "Component",
            LayerKind::Path => "Path",
            LayerKind::Comment => "Comment",
        }
    }
}

/// Geometry + styling of a layer. Canvas-space, top-left origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerProperties {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub style: LayerStyle,
    /// Text body (text and comment layers).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Shape sub-type (shape layers).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<ShapeKind>,
    /// Embedded path (path layers).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<Path>,
}

impl LayerProperties {
    /// Defaults used when patching a layer that never had properties.
    pub fn defaults() -> Self {
        Self::at(0.0, 0.0, DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }

    pub fn at(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            style: LayerStyle::default(),
            content: None,
            shape: None,
            path: None,
        }
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }

    /// AABB overlap test (lasso selection).
    pub fn intersects_rect(&self, rx: f32, ry: f32, rw: f32, rh: f32) -> bool {
        self.x < rx + rw && self.x + self.width > rx && self.y < ry + rh && self.y + self.height > ry
    }
}

/// A comment in a layer's thread. `created_at_ms` is epoch milliseconds
/// supplied by the caller — the engine never reads a clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub author: String,
    pub text: String,
    pub created_at_ms: f64,
}

impl Comment {
    pub fn new(author: impl Into<String>, text: impl Into<String>, created_at_ms: f64) -> Self {
        Self {
            id: unique_name("comment"),
            author: author.into(),
            text: text.into(),
            created_at_ms,
        }
    }
}

/// A single visual element on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    pub kind: LayerKind,
    /// Absent on structural layers (layer-list only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<LayerProperties>,
    pub visible: bool,
    pub locked: bool,
    #[serde(skip_serializing_if = "SmallVec::is_empty", default)]
    pub comments: SmallVec<[Comment; 2]>,
}

impl Layer {
    pub fn new(id: LayerId, name: impl Into<String>, kind: LayerKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            properties: None,
            visible: true,
            locked: false,
            comments: SmallVec::new(),
        }
    }

    pub fn with_properties(mut self, properties: LayerProperties) -> Self {
        self.properties = Some(properties);
        self
    }

    /// Merge a partial update. Undefined fields are preserved; patching a
    /// layer without properties first materializes the defaults.
    pub fn apply(&mut self, patch: LayerPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        let props = self
            .properties
            .get_or_insert_with(LayerProperties::defaults);
        if let Some(x) = patch.x {
            props.x = x;
        }
        if let Some(y) = patch.y {
            props.y = y;
        }
        if let Some(w) = patch.width {
            props.width = w;
        }
        if let Some(h) = patch.height {
            props.height = h;
        }
        if let Some(content) = patch.content {
            props.content = Some(content);
        }
        patch.style.apply_to(&mut props.style);
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.kind.label())
    }
}

// ─── Z-order ─────────────────────────────────────────────────────────────

/// Sibling reordering operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestackOp {
    BringForward,
    SendBackward,
    BringToFront,
    SendToBack,
}

// ─── Document ────────────────────────────────────────────────────────────

/// A page's layer tree.
///
/// Layers live in a `StableDiGraph` (frame → child edges); explicit
/// sibling order per parent is kept alongside, since z-order is
/// load-bearing and must survive arbitrary restacking.
#[derive(Debug, Clone, Default)]
pub struct Document {
    graph: StableDiGraph<Layer, ()>,
    id_index: HashMap<LayerId, NodeIndex>,
    /// Top-level z-order (later = painted on top).
    top: Vec<NodeIndex>,
    /// Child z-order for container layers.
    child_order: HashMap<NodeIndex, Vec<NodeIndex>>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of layers in the document (all depths).
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn contains(&self, id: LayerId) -> bool {
        self.id_index.contains_key(&id)
    }

    pub fn get(&self, id: LayerId) -> Option<&Layer> {
        self.id_index.get(&id).map(|idx| &self.graph[*idx])
    }

    pub fn get_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.id_index
            .get(&id)
            .copied()
            .map(|idx| &mut self.graph[idx])
    }

    /// Add a layer, optionally under a container. An unknown parent falls
    /// back to the top level. Returns the layer's id.
    pub fn add_layer(&mut self, parent: Option<LayerId>, layer: Layer) -> LayerId {
        let id = layer.id;
        let idx = self.graph.add_node(layer);
        self.id_index.insert(id, idx);

        match parent.and_then(|p| self.id_index.get(&p).copied()) {
            Some(parent_idx) if parent_idx != idx => {
                self.graph.add_edge(parent_idx, idx, ());
                self.child_order.entry(parent_idx).or_default().push(idx);
            }
            _ => self.top.push(idx),
        }
        id
    }

    /// Remove a layer and its subtree, keeping the id index in sync.
    /// Returns the removed layer itself (children are dropped).
    pub fn remove_layer(&mut self, id: LayerId) -> Option<Layer> {
        let idx = self.id_index.get(&id).copied()?;

        // Children first, bottom-up.
        for child in self.children_indices(idx) {
            let child_id = self.graph[child].id;
            self.remove_layer(child_id);
        }

        // Detach from the sibling order it lives in.
        match self.parent_index(idx) {
            Some(parent_idx) => {
                if let Some(order) = self.child_order.get_mut(&parent_idx) {
                    order.retain(|&i| i != idx);
                }
            }
            None => self.top.retain(|&i| i != idx),
        }

        self.child_order.remove(&idx);
        self.id_index.remove(&id);
        self.graph.remove_node(idx)
    }

    /// Top-level layer ids in z-order (later = on top).
    pub fn top_level(&self) -> Vec<LayerId> {
        self.top.iter().map(|&idx| self.graph[idx].id).collect()
    }

    /// Children of a container in z-order. Empty for leaves.
    pub fn children_of(&self, id: LayerId) -> Vec<LayerId> {
        let Some(idx) = self.id_index.get(&id).copied() else {
            return Vec::new();
        };
        self.children_indices(idx)
            .into_iter()
            .map(|i| self.graph[i].id)
            .collect()
    }

    pub fn parent_of(&self, id: LayerId) -> Option<LayerId> {
        let idx = self.id_index.get(&id).copied()?;
        self.parent_index(idx).map(|p| self.graph[p].id)
    }

    /// Every layer id in paint order (depth-first, bottom to top).
    pub fn paint_order(&self) -> Vec<LayerId> {
        let mut out = Vec::with_capacity(self.graph.node_count());
        for &idx in &self.top {
            self.collect_paint_order(idx, &mut out);
        }
        out
    }

    fn collect_paint_order(&self, idx: NodeIndex, out: &mut Vec<LayerId>) {
        out.push(self.graph[idx].id);
        for child in self.children_indices(idx) {
            self.collect_paint_order(child, out);
        }
    }

    /// Move a layer within its siblings. Returns true if the order changed.
    pub fn restack(&mut self, id: LayerId, op: RestackOp) -> bool {
        let Some(idx) = self.id_index.get(&id).copied() else {
            return false;
        };
        let parent = self.parent_index(idx);
        let order = match parent {
            Some(p) => match self.child_order.get_mut(&p) {
                Some(o) => o,
                None => return false,
            },
            None => &mut self.top,
        };
        let Some(pos) = order.iter().position(|&i| i == idx) else {
            return false;
        };
        let last = order.len() - 1;
        let target = match op {
            RestackOp::BringForward => {
                if pos == last {
                    return false;
                }
                pos + 1
            }
            RestackOp::SendBackward => {
                if pos == 0 {
                    return false;
                }
                pos - 1
            }
            RestackOp::BringToFront => {
                if pos == last {
                    return false;
                }
                last
            }
            RestackOp::SendToBack => {
                if pos == 0 {
                    return false;
                }
                0
            }
        };
        let moved = order.remove(pos);
        order.insert(target, moved);
        true
    }

    /// Append a comment to a layer's thread.
    pub fn add_comment(&mut self, id: LayerId, comment: Comment) -> bool {
        match self.get_mut(id) {
            Some(layer) => {
                layer.comments.push(comment);
                true
            }
            None => false,
        }
    }

    /// Remove a comment by its id. Returns true if one was removed.
    pub fn remove_comment(&mut self, id: LayerId, comment_id: &str) -> bool {
        match self.get_mut(id) {
            Some(layer) => {
                let before = layer.comments.len();
                layer.comments.retain(|c| c.id != comment_id);
                layer.comments.len() != before
            }
            None => false,
        }
    }

    fn children_indices(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.child_order.get(&idx).cloned().unwrap_or_default()
    }

    fn parent_index(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.graph
            .neighbors_directed(idx, Direction::Incoming)
            .next()
    }
}
