//! WASM bridge — exposes the Easel engine to the browser shell.
//!
//! Compiled via `wasm-pack build --target web`. The shell owns the DOM,
//! routing, and event plumbing; everything stateful (documents, tools,
//! history, camera) lives on this side of the boundary.

pub mod render2d;
pub mod route;
pub mod storage;

use easel_core::files::{EditorFile, FileItem, Organization};
use easel_core::mock;
use easel_core::model::{LayerPatch, RestackOp};
use easel_core::LayerId;
use easel_editor::{EditorSession, Modifiers, ShortcutAction, ToolKind};
use render2d::{CanvasTheme, Overlays};
use route::Route;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use web_sys::CanvasRenderingContext2d;

fn modifiers(shift: bool, ctrl: bool, alt: bool, meta: bool) -> Modifiers {
    Modifiers {
        shift,
        ctrl,
        alt,
        meta,
    }
}

// ─── Editor canvas ───────────────────────────────────────────────────────

/// One row of the layer panel listing.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LayerRow {
    id: String,
    name: String,
    kind: &'static str,
    depth: usize,
    visible: bool,
    locked: bool,
    comment_count: usize,
}

/// The main JS-facing canvas controller.
///
/// Holds the open file, the session for the current page, and the
/// render theme. All canvas interaction goes through this struct.
#[wasm_bindgen]
pub struct EaselCanvas {
    file: EditorFile,
    page_id: String,
    session: EditorSession,
    width: f64,
    height: f64,
    dark_mode: bool,
}

#[wasm_bindgen]
impl EaselCanvas {
    /// Open the editor for a file. There is no server: every id opens
    /// the mock editor file.
    #[wasm_bindgen(constructor)]
    pub fn new(_file_id: &str, width: f64, height: f64) -> Self {
        let file = mock::mock_editor_file();
        let page_id = file.current_page_id.clone();
        let session = Self::session_for(&file, &page_id);
        Self {
            file,
            page_id,
            session,
            width,
            height,
            dark_mode: false,
        }
    }

    fn session_for(file: &EditorFile, page_id: &str) -> EditorSession {
        let document = file
            .page(page_id)
            .map(|p| p.document.clone())
            .unwrap_or_default();
        EditorSession::new(document)
    }

    pub fn title(&self) -> String {
        self.file.title.clone()
    }

    /// Pages as `[{id, name}]`.
    pub fn pages_json(&self) -> String {
        let pages: Vec<_> = self
            .file
            .pages
            .iter()
            .map(|p| serde_json::json!({ "id": p.id, "name": p.name }))
            .collect();
        serde_json::to_string(&pages).unwrap_or_else(|_| "[]".to_string())
    }

    /// Switch pages. Drops the page's undo history, like the prototype.
    pub fn set_page(&mut self, page_id: &str) -> bool {
        if self.file.page(page_id).is_none() || page_id == self.page_id {
            return false;
        }
        self.page_id = page_id.to_string();
        self.session = Self::session_for(&self.file, page_id);
        true
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn set_theme(&mut self, is_dark: bool) {
        self.dark_mode = is_dark;
    }

    // ─── Pointer & keyboard ──────────────────────────────────────────

    /// Pointer pressed. Returns true if a re-render is needed.
    pub fn handle_pointer_down(
        &mut self,
        x: f32,
        y: f32,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        let changed = self
            .session
            .pointer_down(x, y, modifiers(shift, ctrl, alt, meta));
        changed || self.has_live_overlay()
    }

    pub fn handle_pointer_move(
        &mut self,
        x: f32,
        y: f32,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        let changed = self
            .session
            .pointer_move(x, y, modifiers(shift, ctrl, alt, meta));
        changed || self.has_live_overlay() || self.session.active_tool() == ToolKind::Hand
    }

    pub fn handle_pointer_up(
        &mut self,
        x: f32,
        y: f32,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        self.session
            .pointer_up(x, y, modifiers(shift, ctrl, alt, meta));
        // Gesture end always ends an overlay or a selection change.
        true
    }

    /// Keyboard dispatch. Returns
    /// `{"changed":bool,"action":"<name>","tool":"<name>"}`.
    pub fn handle_key(
        &mut self,
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
    ) -> String {
        let outcome = self
            .session
            .handle_key(key, modifiers(shift, ctrl, alt, meta));
        // Fit needs the viewport, which only this side knows.
        if outcome.action == Some(ShortcutAction::ZoomToFit) {
            self.session
                .zoom_to_fit(self.width as f32, self.height as f32);
        }
        let action = outcome.action.map(|a| a.name()).unwrap_or("none");
        serde_json::json!({
            "changed": outcome.changed,
            "action": action,
            "tool": self.session.active_tool().name(),
        })
        .to_string()
    }

    pub fn handle_key_up(&mut self, key: &str) {
        self.session.handle_key_up(key);
    }

    fn has_live_overlay(&self) -> bool {
        self.session.marquee().is_some()
            || self.session.preview_rect().is_some()
            || self.session.pending_path().is_some()
    }

    // ─── Tools ───────────────────────────────────────────────────────

    pub fn set_tool(&mut self, name: &str) -> bool {
        match ToolKind::from_name(name) {
            Some(tool) => {
                self.session.set_tool(tool);
                true
            }
            None => false,
        }
    }

    pub fn get_tool(&self) -> String {
        self.session.active_tool().name().to_string()
    }

    // ─── Selection ───────────────────────────────────────────────────

    /// The selected layer id, or empty string.
    pub fn get_selected_id(&self) -> String {
        self.session
            .selected()
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }

    /// Select a layer from the layer panel. Empty string clears.
    pub fn select_by_id(&mut self, id: &str) -> bool {
        if id.is_empty() {
            self.session.select(None);
            return true;
        }
        let layer_id = LayerId::intern(id);
        if self.session.document.contains(layer_id) {
            self.session.select(Some(layer_id));
            true
        } else {
            false
        }
    }

    /// The selected layer serialized for the properties panel, or "null".
    pub fn selected_json(&self) -> String {
        let layer = self
            .session
            .selected()
            .and_then(|id| self.session.document.get(id));
        serde_json::to_string(&layer).unwrap_or_else(|_| "null".to_string())
    }

    /// Apply a JSON `LayerPatch` to the selected layer (properties panel
    /// contract: absent = keep, null = clear).
    pub fn update_selected(&mut self, patch_json: &str) -> bool {
        let Some(id) = self.session.selected() else {
            return false;
        };
        match serde_json::from_str::<LayerPatch>(patch_json) {
            Ok(patch) => self.session.update_layer(id, patch),
            Err(err) => {
                log::warn!("rejected layer patch: {err}");
                false
            }
        }
    }

    // ─── Commands ────────────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        self.session.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.session.redo()
    }

    pub fn can_undo(&self) -> bool {
        self.session.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.session.can_redo()
    }

    pub fn delete_selected(&mut self) -> bool {
        self.session.delete_selected()
    }

    pub fn duplicate_selected(&mut self) -> bool {
        self.session.duplicate_selected().is_some()
    }

    /// Restack the selection: "bring-forward", "send-backward",
    /// "bring-to-front", "send-to-back".
    pub fn restack_selected(&mut self, op: &str) -> bool {
        let op = match op {
            "bring-forward" => RestackOp::BringForward,
            "send-backward" => RestackOp::SendBackward,
            "bring-to-front" => RestackOp::BringToFront,
            "send-to-back" => RestackOp::SendToBack,
            _ => return false,
        };
        self.session.restack_selected(op)
    }

    pub fn layer_count(&self) -> usize {
        self.session.layer_count()
    }

    /// Flat layer listing (depth-first) for the layer panel.
    pub fn layers_json(&self) -> String {
        let mut rows = Vec::new();
        for id in self.session.document.top_level() {
            self.collect_rows(id, 0, &mut rows);
        }
        serde_json::to_string(&rows).unwrap_or_else(|_| "[]".to_string())
    }

    fn collect_rows(&self, id: LayerId, depth: usize, rows: &mut Vec<LayerRow>) {
        let Some(layer) = self.session.document.get(id) else {
            return;
        };
        rows.push(LayerRow {
            id: id.as_str().to_string(),
            name: layer.name.clone(),
            kind: layer.kind.label(),
            depth,
            visible: layer.visible,
            locked: layer.locked,
            comment_count: layer.comments.len(),
        });
        for child in self.session.document.children_of(id) {
            self.collect_rows(child, depth + 1, rows);
        }
    }

    // ─── Comments ────────────────────────────────────────────────────

    /// Comment thread of a layer as a JSON array.
    pub fn comments_json(&self, layer_id: &str) -> String {
        let comments = self
            .session
            .document
            .get(LayerId::intern(layer_id))
            .map(|l| l.comments.as_slice())
            .unwrap_or_default();
        serde_json::to_string(comments).unwrap_or_else(|_| "[]".to_string())
    }

    /// Append a comment. `created_at_ms` comes from `Date.now()`.
    pub fn add_comment(
        &mut self,
        layer_id: &str,
        author: &str,
        text: &str,
        created_at_ms: f64,
    ) -> bool {
        if text.trim().is_empty() {
            return false;
        }
        self.session
            .add_comment(LayerId::intern(layer_id), author, text, created_at_ms)
    }

    pub fn remove_comment(&mut self, layer_id: &str, comment_id: &str) -> bool {
        self.session
            .remove_comment(LayerId::intern(layer_id), comment_id)
    }

    // ─── Camera ──────────────────────────────────────────────────────

    pub fn zoom(&self) -> f32 {
        self.session.camera.zoom()
    }

    /// Zoom percentage for the bottom panel readout.
    pub fn zoom_percent(&self) -> u32 {
        (self.session.camera.zoom() * 100.0).round() as u32
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.session.camera.set_zoom(zoom);
    }

    pub fn zoom_in(&mut self) {
        self.session.camera.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.session.camera.zoom_out();
    }

    pub fn reset_zoom(&mut self) {
        self.session.camera.reset_zoom();
    }

    pub fn zoom_to_fit(&mut self) -> bool {
        self.session
            .zoom_to_fit(self.width as f32, self.height as f32)
    }

    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.session.camera.pan_by(dx, dy);
    }

    // ─── Rendering ───────────────────────────────────────────────────

    /// Paint the scene to a Canvas2D context.
    pub fn render(&self, ctx: &CanvasRenderingContext2d) {
        let theme = if self.dark_mode {
            CanvasTheme::dark()
        } else {
            CanvasTheme::light()
        };
        let overlays = Overlays {
            selected: self.session.selected(),
            marquee: self.session.marquee(),
            preview: self.session.preview_rect(),
            pending_path: self.session.pending_path(),
        };
        render2d::render_scene(
            ctx,
            &self.session.document,
            &self.session.camera,
            self.width,
            self.height,
            &overlays,
            &theme,
        );
    }
}

// ─── Recents browser ─────────────────────────────────────────────────────

/// File-browser state for the Recents page.
#[wasm_bindgen]
pub struct RecentsView {
    files: Vec<FileItem>,
    organizations: Vec<Organization>,
    org_filter: Option<String>,
    grid_view: bool,
}

#[wasm_bindgen]
impl RecentsView {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        let mut files = mock::mock_files();
        easel_core::files::sort_by_recency(&mut files);
        Self {
            files,
            organizations: mock::mock_organizations(),
            org_filter: None,
            grid_view: true,
        }
    }

    pub fn organizations_json(&self) -> String {
        serde_json::to_string(&self.organizations).unwrap_or_else(|_| "[]".to_string())
    }

    /// Filter by organization name. Empty string shows all.
    pub fn set_organization(&mut self, name: &str) {
        self.org_filter = if name.is_empty() {
            None
        } else {
            Some(name.to_string())
        };
    }

    pub fn set_grid_view(&mut self, grid: bool) {
        self.grid_view = grid;
    }

    pub fn is_grid_view(&self) -> bool {
        self.grid_view
    }

    /// The filtered listing, most recent first, with display labels.
    pub fn files_json(&self) -> String {
        let filtered =
            easel_core::files::filter_by_organization(&self.files, self.org_filter.as_deref());
        let rows: Vec<_> = filtered
            .iter()
            .map(|f| {
                let mut value = serde_json::to_value(f).unwrap_or(serde_json::Value::Null);
                if let Some(obj) = value.as_object_mut() {
                    obj.insert(
                        "editedLabel".to_string(),
                        serde_json::Value::String(f.edited_label()),
                    );
                }
                value
            })
            .collect();
        serde_json::to_string(&rows).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn file_title(&self, id: &str) -> Option<String> {
        easel_core::files::find_file(&self.files, id).map(|f| f.title.clone())
    }
}

impl Default for RecentsView {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Routing & preferences ───────────────────────────────────────────────

/// Parse a location path into `{"kind": ..., "fileId"?: ...}`.
#[wasm_bindgen]
pub fn parse_route(path: &str) -> String {
    let value = match Route::parse(path) {
        Route::Home => serde_json::json!({ "kind": "home" }),
        Route::Recents => serde_json::json!({ "kind": "recents" }),
        Route::Editor { file_id } => {
            serde_json::json!({ "kind": "editor", "fileId": file_id })
        }
        Route::NotFound => serde_json::json!({ "kind": "not-found" }),
    };
    value.to_string()
}

/// Load the saved theme, apply its document class, and return its name.
/// Called once at startup.
#[wasm_bindgen]
pub fn init_theme() -> String {
    let theme = storage::load_theme();
    storage::apply_theme(theme);
    theme.name().to_string()
}

/// Persist and apply a theme by name. Returns false for unknown names.
#[wasm_bindgen]
pub fn set_theme(name: &str) -> bool {
    match storage::Theme::from_name(name) {
        Some(theme) => {
            storage::save_theme(theme);
            true
        }
        None => false,
    }
}

/// The saved profile as `{"name": ..., "username": ...}`.
#[wasm_bindgen]
pub fn load_profile() -> String {
    serde_json::to_string(&storage::load_profile())
        .unwrap_or_else(|_| r#"{"name":"","username":""}"#.to_string())
}

#[wasm_bindgen]
pub fn save_profile(name: &str, username: &str) {
    storage::save_profile(&storage::Profile {
        name: name.to_string(),
        username: username.to_string(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn canvas_opens_mock_file() {
        let canvas = EaselCanvas::new("file1", 800.0, 600.0);
        assert_eq!(canvas.title(), "Mobile App Design");
        // The default page is the structural one.
        assert!(canvas.layer_count() > 0);
        assert_eq!(canvas.get_tool(), "select");
    }

    #[test]
    fn page_switching_swaps_documents() {
        let mut canvas = EaselCanvas::new("file1", 800.0, 600.0);
        let structural_count = canvas.layer_count();

        assert!(canvas.set_page("page2"));
        assert_ne!(canvas.layer_count(), structural_count);
        assert!(!canvas.set_page("page2"), "already current");
        assert!(!canvas.set_page("missing"));
    }

    #[test]
    fn pointer_flow_creates_and_selects() {
        let mut canvas = EaselCanvas::new("file1", 800.0, 600.0);
        canvas.set_page("page2");
        assert!(canvas.set_tool("rectangle"));

        canvas.handle_pointer_down(500.0, 400.0, false, false, false, false);
        canvas.handle_pointer_move(620.0, 480.0, false, false, false, false);
        canvas.handle_pointer_up(620.0, 480.0, false, false, false, false);

        assert!(!canvas.get_selected_id().is_empty());
        assert_eq!(canvas.get_tool(), "select");
        assert!(canvas.can_undo());
        assert!(canvas.undo());
    }

    #[test]
    fn key_dispatch_reports_action_json() {
        let mut canvas = EaselCanvas::new("file1", 800.0, 600.0);
        let json = canvas.handle_key("r", false, false, false, false);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["action"], "rectangle");
        assert_eq!(value["tool"], "rectangle");
        assert_eq!(value["changed"], false);
    }

    #[test]
    fn selected_patch_roundtrip() {
        let mut canvas = EaselCanvas::new("file1", 800.0, 600.0);
        canvas.set_page("page2");
        assert!(canvas.select_by_id("card"));

        assert!(canvas.update_selected(r##"{"x": 10, "style": {"fill": "#00FF00"}}"##));
        let layer: serde_json::Value = serde_json::from_str(&canvas.selected_json()).unwrap();
        assert_eq!(layer["properties"]["x"], 10.0);
        assert_eq!(layer["properties"]["style"]["fill"], "#00FF00");

        assert!(!canvas.update_selected("not json"));
    }

    #[test]
    fn comments_roundtrip_json() {
        let mut canvas = EaselCanvas::new("file1", 800.0, 600.0);
        canvas.set_page("page2");
        assert!(canvas.add_comment("card", "You", "Bump the radius", 1_700_000_000_000.0));
        assert!(!canvas.add_comment("card", "You", "   ", 0.0), "blank rejected");

        let comments: serde_json::Value =
            serde_json::from_str(&canvas.comments_json("card")).unwrap();
        assert_eq!(comments.as_array().unwrap().len(), 1);
        assert_eq!(comments[0]["author"], "You");

        let id = comments[0]["id"].as_str().unwrap().to_string();
        assert!(canvas.remove_comment("card", &id));
    }

    #[test]
    fn recents_filtering_and_labels() {
        let mut view = RecentsView::new();
        let all: serde_json::Value = serde_json::from_str(&view.files_json()).unwrap();
        assert_eq!(all.as_array().unwrap().len(), 6);
        assert_eq!(all[0]["editedLabel"], "Edited 1 day ago");

        view.set_organization("Design Studio");
        let filtered: serde_json::Value = serde_json::from_str(&view.files_json()).unwrap();
        assert!(filtered
            .as_array()
            .unwrap()
            .iter()
            .all(|f| f["organization"] == "Design Studio"));

        assert_eq!(view.file_title("file3").as_deref(), Some("Component Library"));
        assert_eq!(view.file_title("nope"), None);
    }

    #[test]
    fn route_json_contract() {
        let editor: serde_json::Value =
            serde_json::from_str(&parse_route("/editor/file2")).unwrap();
        assert_eq!(editor["kind"], "editor");
        assert_eq!(editor["fileId"], "file2");

        let missing: serde_json::Value = serde_json::from_str(&parse_route("/nope")).unwrap();
        assert_eq!(missing["kind"], "not-found");
    }
}
