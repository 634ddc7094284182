use crate::{
    catalog::model::CatalogItem,
    enhance::normalize::NormalizedImage,
    foundation::core::{CanvasSize, Point, Vec2},
};

/// Default square side of a freshly dropped accessory, in canvas pixels.
pub const DEFAULT_PLACEMENT_SIDE: f64 = 150.0;

/// Smallest square side a resize gesture can reach.
pub const MIN_PLACEMENT_SIDE: f64 = 50.0;

/// Session-locally unique placement identity.
///
/// Distinct from the catalog id: the same catalog item may be placed several
/// times and each placement must be individually addressable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PlacementId(pub u64);

/// One accessory instance positioned on the canvas.
///
/// Always square (`side` is both width and height). After every mutation the
/// square lies fully inside the session canvas.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct PlacedAccessory {
    /// Session-local identity.
    pub id: PlacementId,
    /// Display name carried over from the catalog item.
    pub name: String,
    /// Image reference the placement is rendered from.
    pub image_ref: String,
    /// Top-left corner in canvas-local pixels.
    pub pos: Point,
    /// Square side length in canvas-local pixels.
    pub side: f64,
}

/// Complete editable state for one custom-design attempt.
///
/// Holds the ordered placements, the chosen template, and the optional
/// enhanced result. Once an enhanced result is present the placement surface
/// is locked until [`DesignSession::reset`].
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct DesignSession {
    canvas: CanvasSize,
    template_image: String,
    placements: Vec<PlacedAccessory>,
    selected: Option<PlacementId>,
    enhanced_image: Option<NormalizedImage>,
    next_id: u64,
}

impl DesignSession {
    /// Start an empty session over `canvas` with the given template image.
    pub fn new(canvas: CanvasSize, template_image: impl Into<String>) -> Self {
        Self {
            canvas,
            template_image: template_image.into(),
            placements: Vec::new(),
            selected: None,
            enhanced_image: None,
            next_id: 0,
        }
    }

    /// Canvas dimensions the placement coordinates are expressed in.
    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    /// Image reference of the selected template.
    pub fn template_image(&self) -> &str {
        &self.template_image
    }

    /// Placements in insertion (z) order.
    pub fn placements(&self) -> &[PlacedAccessory] {
        &self.placements
    }

    /// Currently selected placement, if any.
    pub fn selected(&self) -> Option<PlacementId> {
        self.selected
    }

    /// Enhanced result accepted for this session, if any.
    pub fn enhanced_image(&self) -> Option<&NormalizedImage> {
        self.enhanced_image.as_ref()
    }

    /// True once an enhanced result is present; all placement mutation is
    /// disabled until [`DesignSession::reset`].
    pub fn is_locked(&self) -> bool {
        self.enhanced_image.is_some()
    }

    /// Record the accepted enhanced result and lock the surface.
    pub fn set_enhanced(&mut self, image: NormalizedImage) {
        self.enhanced_image = Some(image);
    }

    /// Create a placement centered on `drop_point` with the default size,
    /// clamped into the canvas. Returns `None` while the session is locked.
    pub fn place(&mut self, item: &CatalogItem, drop_point: Point) -> Option<PlacementId> {
        if self.is_locked() {
            return None;
        }

        let side = DEFAULT_PLACEMENT_SIDE.min(self.canvas.width).min(self.canvas.height);
        let origin = Point::new(drop_point.x - side / 2.0, drop_point.y - side / 2.0);
        let id = PlacementId(self.next_id);
        self.next_id += 1;

        self.placements.push(PlacedAccessory {
            id,
            name: item.name.clone(),
            image_ref: item.image_ref.clone(),
            pos: self.canvas.clamp_origin(origin, side),
            side,
        });
        Some(id)
    }

    /// Move a placement to `(x, y)`, clamped to `[0, canvas - side]` on both
    /// axes. Out-of-bounds input is silently clamped, never rejected. No-op
    /// when the session is locked or the id is unknown.
    pub fn move_to(&mut self, id: PlacementId, x: f64, y: f64) {
        if self.is_locked() {
            return;
        }
        let canvas = self.canvas;
        if let Some(p) = self.placement_mut(id) {
            p.pos = canvas.clamp_origin(Point::new(x, y), p.side);
        }
    }

    /// Resize a placement by the dominant axis of `delta` (the larger
    /// magnitude of the horizontal/vertical component wins, so diagonal drags
    /// behave the same regardless of direction). Width and height stay equal,
    /// floored at [`MIN_PLACEMENT_SIDE`] (or the canvas dimension when that is
    /// smaller) and capped so the square stays inside the canvas.
    pub fn resize_by(&mut self, id: PlacementId, delta: Vec2) {
        if self.is_locked() {
            return;
        }
        let dominant = if delta.x.abs() >= delta.y.abs() {
            delta.x
        } else {
            delta.y
        };
        if let Some(p) = self.placement(id) {
            let target = p.side + dominant;
            self.resize_to(id, target);
        }
    }

    /// Set a placement's side directly, subject to the same floor and canvas
    /// cap as [`DesignSession::resize_by`].
    pub fn resize_to(&mut self, id: PlacementId, side: f64) {
        if self.is_locked() {
            return;
        }
        let canvas = self.canvas;
        if let Some(p) = self.placement_mut(id) {
            // The floor yields to the canvas when the canvas itself is
            // smaller than the minimum side.
            let floor = MIN_PLACEMENT_SIDE.min(canvas.width).min(canvas.height);
            let cap = canvas.max_side_at(p.pos).max(floor);
            p.side = side.clamp(floor, cap);
            // The cap above can exceed the canvas when the placement sits near
            // the far edge; re-clamping the origin restores the invariant.
            p.pos = canvas.clamp_origin(p.pos, p.side);
        }
    }

    /// Select a placement; at most one selection exists at a time. Unknown
    /// ids clear the selection.
    pub fn select(&mut self, id: PlacementId) {
        self.selected = self.placement(id).map(|p| p.id);
    }

    /// Clear the selection.
    pub fn deselect(&mut self) {
        self.selected = None;
    }

    /// Delete a placement, clearing the selection if it pointed at it. No-op
    /// when the session is locked.
    pub fn remove(&mut self, id: PlacementId) {
        if self.is_locked() {
            return;
        }
        self.placements.retain(|p| p.id != id);
        if self.selected == Some(id) {
            self.selected = None;
        }
    }

    /// Clear all placements, the selection, and the enhanced result,
    /// returning the session to an empty editable state.
    pub fn reset(&mut self) {
        self.placements.clear();
        self.selected = None;
        self.enhanced_image = None;
    }

    /// Placements in render order: insertion order, except the selected
    /// placement renders above all others.
    pub fn render_order(&self) -> Vec<&PlacedAccessory> {
        let mut out: Vec<&PlacedAccessory> = Vec::with_capacity(self.placements.len());
        let mut selected = None;
        for p in &self.placements {
            if Some(p.id) == self.selected {
                selected = Some(p);
            } else {
                out.push(p);
            }
        }
        if let Some(p) = selected {
            out.push(p);
        }
        out
    }

    /// Lookup a placement by id.
    pub fn placement(&self, id: PlacementId) -> Option<&PlacedAccessory> {
        self.placements.iter().find(|p| p.id == id)
    }

    fn placement_mut(&mut self, id: PlacementId) -> Option<&mut PlacedAccessory> {
        self.placements.iter_mut().find(|p| p.id == id)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/placement.rs"]
mod tests;
