//! The editor session: one open page being edited.
//!
//! Owns the document, the single selection, the camera, the active tool,
//! and the undo history. Every document change funnels through
//! [`EditorSession::apply_edit`] so history recording cannot be bypassed.

use crate::history::{DEFAULT_DEPTH, History};
use crate::input::{InputEvent, Modifiers};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::tools::{
    CommentTool, CreateTarget, HandTool, PenTool, PencilTool, SelectTool, ShapeTool, TextTool,
    Tool, ToolEvent, ToolKind,
};
use easel_core::LayerId;
use easel_core::model::{Comment, Document, Layer, LayerKind, LayerPatch, RestackOp};
use easel_render::hit::{hit_test, hit_test_handle, hit_test_rect};

// ─── Camera ──────────────────────────────────────────────────────────────

pub const MIN_ZOOM: f32 = 0.1;
pub const MAX_ZOOM: f32 = 5.0;

/// Zoom step for the keyboard/toolbar zoom controls.
const ZOOM_STEP: f32 = 1.25;

/// Padding around the content when zooming to fit, in screen px.
const FIT_PADDING: f32 = 40.0;

/// Viewport transform: `screen = canvas * zoom + pan`.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    zoom: f32,
    pub pan_x: f32,
    pub pan_y: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }
}

impl Camera {
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Set the zoom factor, clamped to [0.1, 5.0].
    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom * ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom / ZOOM_STEP);
    }

    pub fn reset_zoom(&mut self) {
        self.zoom = 1.0;
    }

    /// Pan by a screen-space delta. Unconstrained.
    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    pub fn screen_to_canvas(&self, sx: f32, sy: f32) -> (f32, f32) {
        ((sx - self.pan_x) / self.zoom, (sy - self.pan_y) / self.zoom)
    }

    pub fn canvas_to_screen(&self, cx: f32, cy: f32) -> (f32, f32) {
        (cx * self.zoom + self.pan_x, cy * self.zoom + self.pan_y)
    }
}

// ─── Edits ───────────────────────────────────────────────────────────────

/// A document mutation. Duplication and handle-resizing are expressed
/// through `Add` and `Update`.
#[derive(Debug, Clone)]
pub enum Edit {
    Add {
        /// Container to nest under; `None` = top level.
        parent: Option<LayerId>,
        layer: Box<Layer>,
    },
    Update {
        id: LayerId,
        patch: LayerPatch,
    },
    Move {
        id: LayerId,
        dx: f32,
        dy: f32,
    },
    Remove {
        id: LayerId,
    },
    Restack {
        id: LayerId,
        op: RestackOp,
    },
    AddComment {
        id: LayerId,
        comment: Comment,
    },
    RemoveComment {
        id: LayerId,
        comment_id: String,
    },
}

// ─── Session ─────────────────────────────────────────────────────────────

/// Everything the key handler reports back to the shell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyOutcome {
    pub action: Option<ShortcutAction>,
    /// Whether the document changed.
    pub changed: bool,
}

pub struct EditorSession {
    pub document: Document,
    selected: Option<LayerId>,
    pub camera: Camera,
    active_tool: ToolKind,
    previous_tool: ToolKind,
    /// Set while space is held; restores `previous_tool` on release.
    temporary_hand: bool,
    history: History,

    select_tool: SelectTool,
    shape_tool: ShapeTool,
    pen_tool: PenTool,
    pencil_tool: PencilTool,
    text_tool: TextTool,
    comment_tool: CommentTool,
    hand_tool: HandTool,
}

impl EditorSession {
    pub fn new(document: Document) -> Self {
        let history = History::new(document.clone(), DEFAULT_DEPTH);
        Self {
            document,
            selected: None,
            camera: Camera::default(),
            active_tool: ToolKind::Select,
            previous_tool: ToolKind::Select,
            temporary_hand: false,
            history,
            select_tool: SelectTool::new(),
            shape_tool: ShapeTool::new(),
            pen_tool: PenTool::new(),
            pencil_tool: PencilTool::new(),
            text_tool: TextTool::new(),
            comment_tool: CommentTool::new(),
            hand_tool: HandTool::new(),
        }
    }

    // ─── Selection ───────────────────────────────────────────────────

    pub fn selected(&self) -> Option<LayerId> {
        self.selected
    }

    /// Set the selection. Unknown ids clear it.
    pub fn select(&mut self, id: Option<LayerId>) {
        self.selected = id.filter(|i| self.document.contains(*i));
    }

    // ─── Tools ───────────────────────────────────────────────────────

    pub fn active_tool(&self) -> ToolKind {
        self.active_tool
    }

    /// Switch tools, remembering the previous one and abandoning any
    /// in-progress gesture.
    pub fn set_tool(&mut self, tool: ToolKind) {
        if tool == self.active_tool {
            return;
        }
        self.cancel_gestures();
        if let ToolKind::Shape(kind) = tool {
            self.shape_tool.target = CreateTarget::Shape(kind);
        }
        if tool == ToolKind::Frame {
            self.shape_tool.target = CreateTarget::Frame;
        }
        self.previous_tool = self.active_tool;
        self.active_tool = tool;
        log::debug!("tool -> {}", tool.name());
    }

    /// Toggle between the current and previous tool (Tab).
    pub fn toggle_last_tool(&mut self) {
        let prev = self.previous_tool;
        self.set_tool(prev);
    }

    /// Space pressed: temporarily switch to the hand tool.
    pub fn begin_temporary_hand(&mut self) {
        if !self.temporary_hand && self.active_tool != ToolKind::Hand {
            self.set_tool(ToolKind::Hand);
            self.temporary_hand = true;
        }
    }

    /// Space released: revert to the tool in use before the hold.
    pub fn end_temporary_hand(&mut self) {
        if self.temporary_hand {
            self.temporary_hand = false;
            self.toggle_last_tool();
        }
    }

    fn cancel_gestures(&mut self) {
        self.select_tool.cancel();
        self.shape_tool.cancel();
        self.pen_tool.cancel();
        self.pencil_tool.cancel();
        self.hand_tool.cancel();
    }

    /// Marquee rectangle for the renderer, if a lasso drag is live.
    pub fn marquee(&self) -> Option<(f32, f32, f32, f32)> {
        self.select_tool.marquee
    }

    /// Shape/frame preview rectangle for the renderer.
    pub fn preview_rect(&self) -> Option<(f32, f32, f32, f32)> {
        self.shape_tool.preview
    }

    /// In-progress pen or pencil points for the renderer.
    pub fn pending_path(&self) -> Option<&[easel_core::model::PathPoint]> {
        match self.active_tool {
            ToolKind::Pen if !self.pen_tool.points.is_empty() => Some(&self.pen_tool.points),
            ToolKind::Pencil if !self.pencil_tool.points.is_empty() => {
                Some(&self.pencil_tool.points)
            }
            _ => None,
        }
    }

    // ─── Pointer dispatch ────────────────────────────────────────────

    /// Pointer pressed at screen coordinates. Returns true if the
    /// document changed.
    pub fn pointer_down(&mut self, sx: f32, sy: f32, modifiers: Modifiers) -> bool {
        let (cx, cy) = self.camera.screen_to_canvas(sx, sy);

        match self.active_tool {
            ToolKind::Hand => {
                // The hand tool works in screen space.
                let events = self
                    .hand_tool
                    .handle(&InputEvent::pointer_down(sx, sy, modifiers), None);
                self.process(events)
            }
            ToolKind::Select => {
                // A press on a resize handle of the selected layer starts
                // a resize rather than a move or lasso.
                if let Some(id) = self.selected
                    && let Some(bounds) = self.bounds_of(id)
                    && let Some(handle) = hit_test_handle(bounds, cx, cy, self.camera.zoom())
                {
                    self.history.begin_batch();
                    self.select_tool.begin_resize(id, handle, bounds);
                    return false;
                }

                let hit = hit_test(&self.document, cx, cy);
                if hit.is_some() {
                    // Drag-move gesture: one undo step.
                    self.history.begin_batch();
                }
                let events = self
                    .select_tool
                    .handle(&InputEvent::pointer_down(cx, cy, modifiers), hit);
                self.process(events)
            }
            _ => {
                let events = self.dispatch_creation(InputEvent::pointer_down(cx, cy, modifiers));
                self.process(events)
            }
        }
    }

    pub fn pointer_move(&mut self, sx: f32, sy: f32, modifiers: Modifiers) -> bool {
        let (cx, cy) = self.camera.screen_to_canvas(sx, sy);
        match self.active_tool {
            ToolKind::Hand => {
                let events = self
                    .hand_tool
                    .handle(&InputEvent::pointer_move(sx, sy, modifiers), None);
                self.process(events)
            }
            ToolKind::Select => {
                let events = self
                    .select_tool
                    .handle(&InputEvent::pointer_move(cx, cy, modifiers), None);
                self.process(events)
            }
            _ => {
                let events = self.dispatch_creation(InputEvent::pointer_move(cx, cy, modifiers));
                self.process(events)
            }
        }
    }

    pub fn pointer_up(&mut self, sx: f32, sy: f32, modifiers: Modifiers) -> bool {
        let (cx, cy) = self.camera.screen_to_canvas(sx, sy);
        match self.active_tool {
            ToolKind::Hand => {
                let events = self
                    .hand_tool
                    .handle(&InputEvent::pointer_up(sx, sy, modifiers), None);
                self.process(events)
            }
            ToolKind::Select => {
                // Resolve the lasso before the tool clears its state:
                // topmost intersecting layer wins, empty lasso deselects.
                if let Some((rx, ry, rw, rh)) = self.select_tool.marquee
                    && (rw > 2.0 || rh > 2.0)
                {
                    let hits = hit_test_rect(&self.document, rx, ry, rw, rh);
                    self.select(hits.last().copied());
                }

                let events = self
                    .select_tool
                    .handle(&InputEvent::pointer_up(cx, cy, modifiers), None);
                let changed = self.process(events);
                self.history.end_batch(&self.document);
                changed
            }
            _ => {
                let events = self.dispatch_creation(InputEvent::pointer_up(cx, cy, modifiers));
                self.process(events)
            }
        }
    }

    fn dispatch_creation(&mut self, event: InputEvent) -> Vec<ToolEvent> {
        match self.active_tool {
            ToolKind::Frame | ToolKind::Shape(_) => self.shape_tool.handle(&event, None),
            ToolKind::Pen => self.pen_tool.handle(&event, None),
            ToolKind::Pencil => self.pencil_tool.handle(&event, None),
            ToolKind::Text => self.text_tool.handle(&event, None),
            ToolKind::Comment => self.comment_tool.handle(&event, None),
            ToolKind::Select | ToolKind::Hand => vec![],
        }
    }

    // ─── Keyboard dispatch ───────────────────────────────────────────

    /// Key pressed. Pen/pencil termination keys take precedence over the
    /// global shortcut map while those tools are active.
    pub fn handle_key(&mut self, key: &str, modifiers: Modifiers) -> KeyOutcome {
        if matches!(self.active_tool, ToolKind::Pen | ToolKind::Pencil)
            && matches!(key, "Enter" | "Escape")
        {
            let event = InputEvent::KeyDown {
                key: key.to_string(),
                modifiers,
            };
            let events = self.dispatch_creation(event);
            let changed = self.process(events);
            return KeyOutcome {
                action: None,
                changed,
            };
        }

        let Some(action) = ShortcutMap::resolve(key, modifiers) else {
            return KeyOutcome {
                action: None,
                changed: false,
            };
        };
        let changed = self.dispatch_action(action);
        KeyOutcome {
            action: Some(action),
            changed,
        }
    }

    /// Key released. Only space (temporary hand) cares.
    pub fn handle_key_up(&mut self, key: &str) {
        if key == " " {
            self.end_temporary_hand();
        }
    }

    fn dispatch_action(&mut self, action: ShortcutAction) -> bool {
        use ShortcutAction::*;
        match action {
            SwitchTool(tool) => {
                self.set_tool(tool);
                false
            }
            ToggleLastTool => {
                self.toggle_last_tool();
                false
            }
            HandHold => {
                self.begin_temporary_hand();
                false
            }
            Undo => self.undo(),
            Redo => self.redo(),
            Delete => self.delete_selected(),
            Duplicate => self.duplicate_selected().is_some(),
            Deselect => {
                self.select(None);
                false
            }
            ZoomIn => {
                self.camera.zoom_in();
                false
            }
            ZoomOut => {
                self.camera.zoom_out();
                false
            }
            ZoomReset => {
                self.camera.reset_zoom();
                false
            }
            ZoomToFit => false, // needs viewport dimensions; shell calls zoom_to_fit
            Restack(op) => self.restack_selected(op),
        }
    }

    // ─── Edits & history ─────────────────────────────────────────────

    /// Apply a document edit and record it in history. Returns true if
    /// the document changed.
    pub fn apply_edit(&mut self, edit: Edit) -> bool {
        let changed = match edit {
            Edit::Add { parent, mut layer } => {
                if layer.name.is_empty() {
                    layer.name = self.default_name(&layer);
                }
                self.document.add_layer(parent, *layer);
                true
            }
            Edit::Update { id, patch } => match self.document.get_mut(id) {
                Some(layer) => {
                    layer.apply(patch);
                    true
                }
                None => false,
            },
            Edit::Move { id, dx, dy } => match self.document.get_mut(id) {
                Some(layer) => match layer.properties.as_mut() {
                    Some(props) => {
                        props.x += dx;
                        props.y += dy;
                        true
                    }
                    None => false,
                },
                None => false,
            },
            Edit::Remove { id } => {
                let removed = self.document.remove_layer(id).is_some();
                if removed && self.selected == Some(id) {
                    // Deleting the selected layer clears the selection.
                    self.selected = None;
                }
                removed
            }
            Edit::Restack { id, op } => self.document.restack(id, op),
            Edit::AddComment { id, comment } => self.document.add_comment(id, comment),
            Edit::RemoveComment { id, comment_id } => {
                self.document.remove_comment(id, &comment_id)
            }
        };

        if changed {
            self.history.record(&self.document);
        }
        changed
    }

    fn default_name(&self, layer: &Layer) -> String {
        let label = match layer.kind {
            LayerKind::Shape => layer
                .properties
                .as_ref()
                .and_then(|p| p.shape)
                .map(|s| s.label())
                .unwrap_or("Shape"),
            kind => kind.label(),
        };
        format!("{label} {}", self.document.len() + 1)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Step history back. Stale selections are cleared.
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(doc) => {
                self.document = doc;
                self.select(self.selected);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(doc) => {
                self.document = doc;
                self.select(self.selected);
                true
            }
            None => false,
        }
    }

    // ─── Commands ────────────────────────────────────────────────────

    /// Delete the selected layer. Returns true if one was deleted.
    pub fn delete_selected(&mut self) -> bool {
        match self.selected {
            Some(id) => self.apply_edit(Edit::Remove { id }),
            None => false,
        }
    }

    /// Duplicate the selected layer: identical except for a fresh id and
    /// a (+20, +20) position offset. The copy becomes selected.
    pub fn duplicate_selected(&mut self) -> Option<LayerId> {
        let id = self.selected?;
        let mut copy = self.document.get(id)?.clone();
        copy.id = LayerId::generate("layer");
        if let Some(props) = copy.properties.as_mut() {
            props.x += 20.0;
            props.y += 20.0;
        }
        let new_id = copy.id;
        let parent = self.document.parent_of(id);
        self.apply_edit(Edit::Add {
            parent,
            layer: Box::new(copy),
        });
        self.select(Some(new_id));
        Some(new_id)
    }

    /// Restack the selected layer among its siblings.
    pub fn restack_selected(&mut self, op: RestackOp) -> bool {
        match self.selected {
            Some(id) => self.apply_edit(Edit::Restack { id, op }),
            None => false,
        }
    }

    /// Partial update of a layer (properties panel contract).
    pub fn update_layer(&mut self, id: LayerId, patch: LayerPatch) -> bool {
        self.apply_edit(Edit::Update { id, patch })
    }

    /// Append a comment to a layer's thread. Timestamp comes from the
    /// caller (epoch ms).
    pub fn add_comment(
        &mut self,
        id: LayerId,
        author: &str,
        text: &str,
        created_at_ms: f64,
    ) -> bool {
        self.apply_edit(Edit::AddComment {
            id,
            comment: Comment::new(author, text, created_at_ms),
        })
    }

    pub fn remove_comment(&mut self, id: LayerId, comment_id: &str) -> bool {
        self.apply_edit(Edit::RemoveComment {
            id,
            comment_id: comment_id.to_string(),
        })
    }

    // ─── View helpers ────────────────────────────────────────────────

    /// Bounds `(x, y, w, h)` of a layer, if it has geometry.
    pub fn bounds_of(&self, id: LayerId) -> Option<(f32, f32, f32, f32)> {
        let props = self.document.get(id)?.properties.as_ref()?;
        Some((props.x, props.y, props.width, props.height))
    }

    /// Number of layers on the canvas (all depths).
    pub fn layer_count(&self) -> usize {
        self.document.len()
    }

    /// Fit the whole content into a viewport, with padding. No-op when
    /// the canvas has no geometric layers.
    pub fn zoom_to_fit(&mut self, viewport_w: f32, viewport_h: f32) -> bool {
        let mut min_x = f32::MAX;
        let mut min_y = f32::MAX;
        let mut max_x = f32::MIN;
        let mut max_y = f32::MIN;
        for id in self.document.paint_order() {
            if let Some((x, y, w, h)) = self.bounds_of(id) {
                min_x = min_x.min(x);
                min_y = min_y.min(y);
                max_x = max_x.max(x + w);
                max_y = max_y.max(y + h);
            }
        }
        if min_x >= max_x || min_y >= max_y {
            return false;
        }

        let (bw, bh) = (max_x - min_x, max_y - min_y);
        let avail_w = (viewport_w - 2.0 * FIT_PADDING).max(1.0);
        let avail_h = (viewport_h - 2.0 * FIT_PADDING).max(1.0);
        self.camera.set_zoom((avail_w / bw).min(avail_h / bh));
        let zoom = self.camera.zoom();
        self.camera.pan_x = (viewport_w - bw * zoom) / 2.0 - min_x * zoom;
        self.camera.pan_y = (viewport_h - bh * zoom) / 2.0 - min_y * zoom;
        true
    }

    fn process(&mut self, events: Vec<ToolEvent>) -> bool {
        let mut changed = false;
        for event in events {
            match event {
                ToolEvent::Edit(edit) => changed |= self.apply_edit(edit),
                ToolEvent::Select(sel) => self.select(sel),
                ToolEvent::Pan { dx, dy } => self.camera.pan_by(dx, dy),
                ToolEvent::Commit => self.set_tool(ToolKind::Select),
            }
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_zoom_is_clamped() {
        let mut camera = Camera::default();
        camera.set_zoom(10.0);
        assert_eq!(camera.zoom(), MAX_ZOOM);
        camera.set_zoom(0.0001);
        assert_eq!(camera.zoom(), MIN_ZOOM);

        // Repeated zoom-out bottoms out at the clamp.
        for _ in 0..50 {
            camera.zoom_out();
        }
        assert_eq!(camera.zoom(), MIN_ZOOM);
    }

    #[test]
    fn camera_roundtrips_coordinates() {
        let mut camera = Camera::default();
        camera.set_zoom(2.0);
        camera.pan_by(100.0, -40.0);

        let (cx, cy) = camera.screen_to_canvas(300.0, 160.0);
        let (sx, sy) = camera.canvas_to_screen(cx, cy);
        assert!((sx - 300.0).abs() < 0.001);
        assert!((sy - 160.0).abs() < 0.001);
    }

    #[test]
    fn pan_is_unconstrained() {
        let mut camera = Camera::default();
        camera.pan_by(-1.0e6, 1.0e6);
        assert_eq!(camera.pan_x, -1.0e6);
        assert_eq!(camera.pan_y, 1.0e6);
    }
}
