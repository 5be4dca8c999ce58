//! Tool system for canvas interactions.
//!
//! Each tool translates input events into [`ToolEvent`]s — document
//! edits, selection changes, camera pans — that the session applies.
//! Creation tools build the whole element on pointer-up (a live preview
//! rectangle is exposed for the renderer during the drag), then commit
//! back to the select tool.

use crate::input::InputEvent;
use crate::session::Edit;
use easel_core::LayerId;
use easel_core::model::{
    Color, DEFAULT_HEIGHT, DEFAULT_WIDTH, Layer, LayerKind, LayerPatch, LayerProperties,
    MIN_SIZE, Path, PathPoint, ShapeKind, TextAlign,
};
use easel_render::hit::ResizeHandle;
use easel_render::normalize_points;

/// Drags shorter than this on both axes place a default-sized element at
/// the drag-start point instead of a drag-sized one.
pub const DRAG_THRESHOLD: f32 = 10.0;

/// Minimum spacing between pencil samples.
pub const PENCIL_SAMPLE_DIST: f32 = 3.0;

/// Default element fill (indigo).
const DEFAULT_FILL: Color = Color::rgba(99.0 / 255.0, 102.0 / 255.0, 241.0 / 255.0, 1.0);

/// Default path stroke (blue accent).
const PATH_STROKE: Color = Color::rgba(59.0 / 255.0, 130.0 / 255.0, 246.0 / 255.0, 1.0);

/// The active tool determines how pointer events are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    Select,
    Frame,
    Shape(ShapeKind),
    Pen,
    Pencil,
    Text,
    Hand,
    Comment,
}

impl ToolKind {
    /// Wire name used by the toolbar ("select", "rectangle", "pen", ...).
    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::Select => "select",
            ToolKind::Frame => "frame",
            ToolKind::Shape(kind) => kind.name(),
            ToolKind::Pen => "pen",
            ToolKind::Pencil => "pencil",
            ToolKind::Text => "text",
            ToolKind::Hand => "hand",
            ToolKind::Comment => "comment",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "select" => Some(ToolKind::Select),
            "frame" => Some(ToolKind::Frame),
            "pen" => Some(ToolKind::Pen),
            "pencil" => Some(ToolKind::Pencil),
            "text" => Some(ToolKind::Text),
            "hand" => Some(ToolKind::Hand),
            "comment" => Some(ToolKind::Comment),
            other => ShapeKind::from_name(other).map(ToolKind::Shape),
        }
    }
}

/// What a tool wants done as a result of an input event.
#[derive(Debug, Clone)]
pub enum ToolEvent {
    Edit(Edit),
    /// Replace the current selection.
    Select(Option<LayerId>),
    /// Pan the camera by a screen-space delta.
    Pan { dx: f32, dy: f32 },
    /// The gesture finished; the session switches back to Select.
    Commit,
}

/// Trait for tools that turn input into tool events.
pub trait Tool {
    fn kind(&self) -> ToolKind;

    /// Handle an input event. `hit` is the topmost layer under the
    /// pointer, resolved by the session.
    fn handle(&mut self, event: &InputEvent, hit: Option<LayerId>) -> Vec<ToolEvent>;

    /// Abandon any in-progress gesture (tool switch mid-drag).
    fn cancel(&mut self) {}
}

/// Normalize a drag rectangle from start + current positions.
fn normalize_rect(x1: f32, y1: f32, x2: f32, y2: f32) -> (f32, f32, f32, f32) {
    (x1.min(x2), y1.min(y2), (x2 - x1).abs(), (y2 - y1).abs())
}

// ─── Select Tool ─────────────────────────────────────────────────────────

struct DragState {
    id: LayerId,
    last_x: f32,
    last_y: f32,
}

struct ResizeState {
    id: LayerId,
    handle: ResizeHandle,
    start: (f32, f32, f32, f32),
}

/// Click-select, drag-move, handle-resize, and lasso marquee.
#[derive(Default)]
pub struct SelectTool {
    drag: Option<DragState>,
    resize: Option<ResizeState>,
    /// Lasso anchor, set when pointer-down hits empty canvas.
    pub marquee_start: Option<(f32, f32)>,
    /// Current lasso rectangle (normalized x, y, w, h).
    pub marquee: Option<(f32, f32, f32, f32)>,
}

impl SelectTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter resize mode. Called by the session when pointer-down lands
    /// on a resize handle of the selected layer.
    pub fn begin_resize(&mut self, id: LayerId, handle: ResizeHandle, start: (f32, f32, f32, f32)) {
        self.resize = Some(ResizeState { id, handle, start });
    }

    pub fn is_resizing(&self) -> bool {
        self.resize.is_some()
    }
}

impl Tool for SelectTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Select
    }

    fn handle(&mut self, event: &InputEvent, hit: Option<LayerId>) -> Vec<ToolEvent> {
        match event {
            InputEvent::PointerDown { x, y, .. } => {
                if self.resize.is_some() {
                    // Session already routed this press onto a handle.
                    return vec![];
                }
                self.marquee_start = None;
                self.marquee = None;

                if let Some(id) = hit {
                    self.drag = Some(DragState {
                        id,
                        last_x: *x,
                        last_y: *y,
                    });
                    vec![ToolEvent::Select(Some(id))]
                } else {
                    // Empty canvas: clear selection, start the lasso.
                    self.marquee_start = Some((*x, *y));
                    self.marquee = Some((*x, *y, 0.0, 0.0));
                    vec![ToolEvent::Select(None)]
                }
            }
            InputEvent::PointerMove { x, y, modifiers } => {
                if let Some(resize) = &self.resize {
                    let (nx, ny, nw, nh) = resize.handle.apply(resize.start, *x, *y, MIN_SIZE);
                    return vec![ToolEvent::Edit(Edit::Update {
                        id: resize.id,
                        patch: LayerPatch {
                            x: Some(nx),
                            y: Some(ny),
                            width: Some(nw),
                            height: Some(nh),
                            ..LayerPatch::default()
                        },
                    })];
                }

                if let Some((sx, sy)) = self.marquee_start {
                    self.marquee = Some(normalize_rect(sx, sy, *x, *y));
                    return vec![];
                }

                if let Some(drag) = &mut self.drag {
                    let mut dx = x - drag.last_x;
                    let mut dy = y - drag.last_y;
                    drag.last_x = *x;
                    drag.last_y = *y;

                    // Shift: constrain to the dominant axis.
                    if modifiers.shift {
                        if dx.abs() > dy.abs() {
                            dy = 0.0;
                        } else {
                            dx = 0.0;
                        }
                    }

                    return vec![ToolEvent::Edit(Edit::Move {
                        id: drag.id,
                        dx,
                        dy,
                    })];
                }
                vec![]
            }
            InputEvent::PointerUp { .. } => {
                // Lasso resolution happens in the session before this
                // event is dispatched; just clear gesture state.
                self.cancel();
                vec![]
            }
            _ => vec![],
        }
    }

    fn cancel(&mut self) {
        self.drag = None;
        self.resize = None;
        self.marquee_start = None;
        self.marquee = None;
    }
}

// ─── Shape / Frame Tool ──────────────────────────────────────────────────

/// What the drag-create tool places.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateTarget {
    Frame,
    Shape(ShapeKind),
}

/// Drag-to-create for frames and all shape sub-types.
pub struct ShapeTool {
    pub target: CreateTarget,
    drag_start: Option<(f32, f32)>,
    /// Live preview rectangle for the renderer.
    pub preview: Option<(f32, f32, f32, f32)>,
}

impl Default for ShapeTool {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapeTool {
    pub fn new() -> Self {
        Self {
            target: CreateTarget::Shape(ShapeKind::Rectangle),
            drag_start: None,
            preview: None,
        }
    }

    fn build_layer(&self, x: f32, y: f32, w: f32, h: f32) -> Layer {
        let mut props = LayerProperties::at(x, y, w, h);
        props.style.corner_radius = 8.0;
        match self.target {
            CreateTarget::Frame => {
                // Frames paint as dashed outlines until given a fill.
                let id = LayerId::generate("frame");
                Layer::new(id, "", LayerKind::Frame).with_properties(props)
            }
            CreateTarget::Shape(kind) => {
                props.shape = Some(kind);
                match kind {
                    // Strokes, not fills, for the line-like shapes.
                    ShapeKind::Line | ShapeKind::Arrow => {
                        props.style.stroke = Some(DEFAULT_FILL);
                        props.style.stroke_width = 2.0;
                    }
                    _ => props.style.fill = Some(DEFAULT_FILL),
                }
                let id = LayerId::generate(kind.name());
                Layer::new(id, "", LayerKind::Shape).with_properties(props)
            }
        }
    }
}

impl Tool for ShapeTool {
    fn kind(&self) -> ToolKind {
        match self.target {
            CreateTarget::Frame => ToolKind::Frame,
            CreateTarget::Shape(kind) => ToolKind::Shape(kind),
        }
    }

    fn handle(&mut self, event: &InputEvent, _hit: Option<LayerId>) -> Vec<ToolEvent> {
        match event {
            InputEvent::PointerDown { x, y, .. } => {
                self.drag_start = Some((*x, *y));
                self.preview = None;
                vec![]
            }
            InputEvent::PointerMove { x, y, modifiers } => {
                if let Some((sx, sy)) = self.drag_start {
                    let (mut rx, mut ry, mut rw, mut rh) = normalize_rect(sx, sy, *x, *y);
                    // Shift: constrain to a square.
                    if modifiers.shift {
                        let side = rw.max(rh);
                        if *x < sx {
                            rx = sx - side;
                        }
                        if *y < sy {
                            ry = sy - side;
                        }
                        rw = side;
                        rh = side;
                    }
                    self.preview = Some((rx, ry, rw, rh));
                }
                vec![]
            }
            InputEvent::PointerUp { .. } => {
                let Some((sx, sy)) = self.drag_start.take() else {
                    return vec![];
                };
                let preview = self.preview.take();

                let layer = match preview {
                    Some((rx, ry, rw, rh)) if rw > DRAG_THRESHOLD || rh > DRAG_THRESHOLD => {
                        self.build_layer(rx, ry, rw, rh)
                    }
                    // Below the threshold on both axes: default size at
                    // the drag-start point.
                    _ => self.build_layer(sx, sy, DEFAULT_WIDTH, DEFAULT_HEIGHT),
                };
                let id = layer.id;
                vec![
                    ToolEvent::Edit(Edit::Add {
                        parent: None,
                        layer: Box::new(layer),
                    }),
                    ToolEvent::Select(Some(id)),
                    ToolEvent::Commit,
                ]
            }
            _ => vec![],
        }
    }

    fn cancel(&mut self) {
        self.drag_start = None;
        self.preview = None;
    }
}

// ─── Pen Tool ────────────────────────────────────────────────────────────

/// Multi-click point accumulation; Enter closes the path, Escape commits
/// it open. Fewer than 2 points abandons the gesture.
#[derive(Default)]
pub struct PenTool {
    pub points: Vec<PathPoint>,
}

impl PenTool {
    pub fn new() -> Self {
        Self::default()
    }

    fn finish(&mut self, closed: bool) -> Vec<ToolEvent> {
        let mut points = std::mem::take(&mut self.points);
        let Some((ox, oy, w, h)) = normalize_points(&mut points) else {
            return vec![ToolEvent::Commit];
        };
        let layer = path_layer(points, closed, ox, oy, w, h);
        let id = layer.id;
        vec![
            ToolEvent::Edit(Edit::Add {
                parent: None,
                layer: Box::new(layer),
            }),
            ToolEvent::Select(Some(id)),
            ToolEvent::Commit,
        ]
    }
}

impl Tool for PenTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Pen
    }

    fn handle(&mut self, event: &InputEvent, _hit: Option<LayerId>) -> Vec<ToolEvent> {
        match event {
            InputEvent::PointerDown { x, y, .. } => {
                self.points.push(PathPoint { x: *x, y: *y });
                vec![]
            }
            InputEvent::KeyDown { key, .. } => match key.as_str() {
                "Enter" => self.finish(true),
                "Escape" => self.finish(false),
                _ => vec![],
            },
            _ => vec![],
        }
    }

    fn cancel(&mut self) {
        self.points.clear();
    }
}

// ─── Pencil Tool ─────────────────────────────────────────────────────────

/// Continuous freehand drawing, distance-sampled while dragging.
#[derive(Default)]
pub struct PencilTool {
    drawing: bool,
    pub points: Vec<PathPoint>,
}

impl PencilTool {
    pub fn new() -> Self {
        Self::default()
    }

    fn finish(&mut self) -> Vec<ToolEvent> {
        self.drawing = false;
        let mut points = std::mem::take(&mut self.points);
        let Some((ox, oy, w, h)) = normalize_points(&mut points) else {
            return vec![ToolEvent::Commit];
        };
        let layer = path_layer(points, false, ox, oy, w, h);
        let id = layer.id;
        vec![
            ToolEvent::Edit(Edit::Add {
                parent: None,
                layer: Box::new(layer),
            }),
            ToolEvent::Select(Some(id)),
            ToolEvent::Commit,
        ]
    }
}

impl Tool for PencilTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Pencil
    }

    fn handle(&mut self, event: &InputEvent, _hit: Option<LayerId>) -> Vec<ToolEvent> {
        match event {
            InputEvent::PointerDown { x, y, .. } => {
                self.drawing = true;
                self.points.clear();
                self.points.push(PathPoint { x: *x, y: *y });
                vec![]
            }
            InputEvent::PointerMove { x, y, .. } => {
                if self.drawing {
                    let far_enough = self
                        .points
                        .last()
                        .is_none_or(|p| (x - p.x).hypot(y - p.y) > PENCIL_SAMPLE_DIST);
                    if far_enough {
                        self.points.push(PathPoint { x: *x, y: *y });
                    }
                }
                vec![]
            }
            InputEvent::PointerUp { .. } => {
                if self.drawing {
                    self.finish()
                } else {
                    vec![]
                }
            }
            InputEvent::KeyDown { key, .. } => match key.as_str() {
                "Enter" | "Escape" if self.drawing => self.finish(),
                _ => vec![],
            },
            _ => vec![],
        }
    }

    fn cancel(&mut self) {
        self.drawing = false;
        self.points.clear();
    }
}

fn path_layer(points: Vec<PathPoint>, closed: bool, x: f32, y: f32, w: f32, h: f32) -> Layer {
    let mut props = LayerProperties::at(x, y, w, h);
    props.style.stroke = Some(PATH_STROKE);
    props.style.stroke_width = 2.0;
    props.path = Some(Path::new(points, closed));
    Layer::new(LayerId::generate("path"), "", LayerKind::Path).with_properties(props)
}

// ─── Text Tool ───────────────────────────────────────────────────────────

/// Immediate placement on click.
#[derive(Default)]
pub struct TextTool;

impl TextTool {
    pub fn new() -> Self {
        Self
    }
}

impl Tool for TextTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Text
    }

    fn handle(&mut self, event: &InputEvent, _hit: Option<LayerId>) -> Vec<ToolEvent> {
        match event {
            InputEvent::PointerDown { x, y, .. } => {
                let mut props = LayerProperties::at(*x, *y, DEFAULT_WIDTH, DEFAULT_HEIGHT);
                props.style.font_size = Some(14.0);
                props.style.font_weight = Some(500);
                props.style.text_align = Some(TextAlign::Center);
                let layer = Layer::new(LayerId::generate("text"), "", LayerKind::Text)
                    .with_properties(props);
                let id = layer.id;
                vec![
                    ToolEvent::Edit(Edit::Add {
                        parent: None,
                        layer: Box::new(layer),
                    }),
                    ToolEvent::Select(Some(id)),
                    ToolEvent::Commit,
                ]
            }
            _ => vec![],
        }
    }
}

// ─── Comment Tool ────────────────────────────────────────────────────────

/// Comment pin size on the canvas.
pub const COMMENT_PIN_SIZE: f32 = 32.0;

/// Places a comment pin at the click point.
#[derive(Default)]
pub struct CommentTool;

impl CommentTool {
    pub fn new() -> Self {
        Self
    }
}

impl Tool for CommentTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Comment
    }

    fn handle(&mut self, event: &InputEvent, _hit: Option<LayerId>) -> Vec<ToolEvent> {
        match event {
            InputEvent::PointerDown { x, y, .. } => {
                let mut props = LayerProperties::at(*x, *y, COMMENT_PIN_SIZE, COMMENT_PIN_SIZE);
                props.style.fill = Some(Color::rgba(245.0 / 255.0, 158.0 / 255.0, 11.0 / 255.0, 1.0));
                let layer = Layer::new(LayerId::generate("pin"), "", LayerKind::Comment)
                    .with_properties(props);
                let id = layer.id;
                vec![
                    ToolEvent::Edit(Edit::Add {
                        parent: None,
                        layer: Box::new(layer),
                    }),
                    ToolEvent::Select(Some(id)),
                    ToolEvent::Commit,
                ]
            }
            _ => vec![],
        }
    }
}

// ─── Hand Tool ───────────────────────────────────────────────────────────

/// Delta-based panning. Receives **screen-space** coordinates from the
/// session, unlike every other tool.
#[derive(Default)]
pub struct HandTool {
    last: Option<(f32, f32)>,
}

impl HandTool {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tool for HandTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Hand
    }

    fn handle(&mut self, event: &InputEvent, _hit: Option<LayerId>) -> Vec<ToolEvent> {
        match event {
            InputEvent::PointerDown { x, y, .. } => {
                self.last = Some((*x, *y));
                vec![]
            }
            InputEvent::PointerMove { x, y, .. } => {
                if let Some((lx, ly)) = self.last {
                    let (dx, dy) = (x - lx, y - ly);
                    self.last = Some((*x, *y));
                    return vec![ToolEvent::Pan { dx, dy }];
                }
                vec![]
            }
            InputEvent::PointerUp { .. } => {
                self.last = None;
                vec![]
            }
            _ => vec![],
        }
    }

    fn cancel(&mut self) {
        self.last = None;
    }
}
