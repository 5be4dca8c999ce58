//! Hit testing: pointer position → layer lookup.
//!
//! Walks the document front-to-back (reverse z-order, children before
//! their container) so the topmost layer under the pointer wins. Hidden
//! and locked layers are transparent to hits, as is their subtree; layers
//! without properties have no extent and cannot be hit.

use crate::geometry::distance_to_polyline;
use easel_core::model::{Document, LayerKind};
use easel_core::LayerId;

/// How close (canvas px) a pointer must be to a path's stroke to hit it.
pub const PATH_HIT_TOLERANCE: f32 = 6.0;

/// Screen-px grab radius for selection resize handles.
pub const HANDLE_GRAB_RADIUS: f32 = 6.0;

/// Find the topmost layer at `(px, py)`. `None` means background.
pub fn hit_test(doc: &Document, px: f32, py: f32) -> Option<LayerId> {
    for id in doc.top_level().iter().rev() {
        if let Some(hit) = hit_test_layer(doc, *id, px, py) {
            return Some(hit);
        }
    }
    None
}

fn hit_test_layer(doc: &Document, id: LayerId, px: f32, py: f32) -> Option<LayerId> {
    let layer = doc.get(id)?;
    if !layer.visible || layer.locked {
        return None;
    }

    // Children first: painted after their container, so they sit on top.
    for child in doc.children_of(id).iter().rev() {
        if let Some(hit) = hit_test_layer(doc, *child, px, py) {
            return Some(hit);
        }
    }

    let props = layer.properties.as_ref()?;

    if layer.kind == LayerKind::Path {
        let path = props.path.as_ref()?;
        if !path.is_drawable() {
            return None;
        }
        let dist = distance_to_polyline(&path.points, path.closed, px - props.x, py - props.y);
        if dist <= PATH_HIT_TOLERANCE.max(props.style.stroke_width) {
            return Some(id);
        }
        return None;
    }

    if props.contains(px, py) {
        log::trace!("hit {} at ({px:.1}, {py:.1})", layer.id);
        return Some(id);
    }
    None
}

/// All hit-testable layers whose bounds intersect the rectangle, in paint
/// order (bottom to top). Lasso selection takes the last entry — the
/// topmost — under the single-selection model.
pub fn hit_test_rect(doc: &Document, rx: f32, ry: f32, rw: f32, rh: f32) -> Vec<LayerId> {
    let mut out = Vec::new();
    for id in doc.top_level() {
        collect_intersecting(doc, id, rx, ry, rw, rh, &mut out);
    }
    out
}

fn collect_intersecting(
    doc: &Document,
    id: LayerId,
    rx: f32,
    ry: f32,
    rw: f32,
    rh: f32,
    out: &mut Vec<LayerId>,
) {
    let Some(layer) = doc.get(id) else {
        return;
    };
    if !layer.visible || layer.locked {
        return;
    }

    if let Some(props) = &layer.properties {
        let skip = layer.kind == LayerKind::Path
            && props.path.as_ref().is_none_or(|p| !p.is_drawable());
        if !skip && props.intersects_rect(rx, ry, rw, rh) {
            out.push(id);
        }
    }

    for child in doc.children_of(id) {
        collect_intersecting(doc, child, rx, ry, rw, rh, out);
    }
}

// ─── Resize handles ──────────────────────────────────────────────────────

/// The 8 resize handles of a selected layer's bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeHandle {
    NorthWest,
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::NorthWest,
        ResizeHandle::North,
        ResizeHandle::NorthEast,
        ResizeHandle::East,
        ResizeHandle::SouthEast,
        ResizeHandle::South,
        ResizeHandle::SouthWest,
        ResizeHandle::West,
    ];

    /// Handle center position on the bounds `(x, y, w, h)`.
    pub fn position(&self, x: f32, y: f32, w: f32, h: f32) -> (f32, f32) {
        match self {
            ResizeHandle::NorthWest => (x, y),
            ResizeHandle::North => (x + w / 2.0, y),
            ResizeHandle::NorthEast => (x + w, y),
            ResizeHandle::East => (x + w, y + h / 2.0),
            ResizeHandle::SouthEast => (x + w, y + h),
            ResizeHandle::South => (x + w / 2.0, y + h),
            ResizeHandle::SouthWest => (x, y + h),
            ResizeHandle::West => (x, y + h / 2.0),
        }
    }

    /// Resize the bounds so this handle tracks the pointer, anchored at
    /// the opposite corner/edge. Width and height are clamped to `min`.
    pub fn apply(
        &self,
        (x, y, w, h): (f32, f32, f32, f32),
        px: f32,
        py: f32,
        min: f32,
    ) -> (f32, f32, f32, f32) {
        let (right, bottom) = (x + w, y + h);
        let (mut nx, mut ny, mut nw, mut nh) = (x, y, w, h);

        let moves_west = matches!(
            self,
            ResizeHandle::NorthWest | ResizeHandle::West | ResizeHandle::SouthWest
        );
        let moves_east = matches!(
            self,
            ResizeHandle::NorthEast | ResizeHandle::East | ResizeHandle::SouthEast
        );
        let moves_north = matches!(
            self,
            ResizeHandle::NorthWest | ResizeHandle::North | ResizeHandle::NorthEast
        );
        let moves_south = matches!(
            self,
            ResizeHandle::SouthWest | ResizeHandle::South | ResizeHandle::SouthEast
        );

        if moves_west {
            nx = px.min(right - min);
            nw = right - nx;
        } else if moves_east {
            nw = (px - x).max(min);
        }
        if moves_north {
            ny = py.min(bottom - min);
            nh = bottom - ny;
        } else if moves_south {
            nh = (py - y).max(min);
        }

        (nx, ny, nw, nh)
    }
}

/// Which resize handle of the bounds, if any, is under the pointer.
/// The grab radius is screen-constant, so it is divided by `zoom`.
pub fn hit_test_handle(
    (x, y, w, h): (f32, f32, f32, f32),
    px: f32,
    py: f32,
    zoom: f32,
) -> Option<ResizeHandle> {
    let radius = HANDLE_GRAB_RADIUS / zoom.max(0.01);
    ResizeHandle::ALL.into_iter().find(|handle| {
        let (hx, hy) = handle.position(x, y, w, h);
        (px - hx).abs() <= radius && (py - hy).abs() <= radius
    })
}
