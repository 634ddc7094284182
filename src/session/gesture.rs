use crate::{
    foundation::core::Point,
    session::placement::{DesignSession, PlacementId},
};

/// Active pointer gesture over the placement surface.
///
/// Drag and resize are modeled as an explicit state machine
/// (`Idle -> Dragging -> Idle`, `Idle -> Resizing -> Idle`) with the
/// gesture-start snapshot held as local state, so updates are absolute
/// transforms of the snapshot rather than accumulated increments.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Gesture {
    /// No pointer gesture in progress.
    Idle,
    /// A placement is being dragged.
    Dragging {
        /// Placement under the pointer.
        id: PlacementId,
        /// Pointer position at gesture start.
        origin: Point,
        /// Placement top-left at gesture start.
        start_pos: Point,
    },
    /// A placement is being resized.
    Resizing {
        /// Placement under the pointer.
        id: PlacementId,
        /// Pointer position at gesture start.
        origin: Point,
        /// Placement side length at gesture start.
        start_side: f64,
    },
}

/// Tracks the single in-flight gesture for one pointer-down-to-pointer-up
/// cycle. Only one gesture may be active at a time; a begin call while one is
/// active is refused.
#[derive(Debug)]
pub struct GestureTracker {
    state: Gesture,
}

impl Default for GestureTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureTracker {
    /// Start in the idle state.
    pub fn new() -> Self {
        Self { state: Gesture::Idle }
    }

    /// Current gesture state.
    pub fn state(&self) -> Gesture {
        self.state
    }

    /// True while a drag or resize is in progress.
    pub fn is_active(&self) -> bool {
        self.state != Gesture::Idle
    }

    /// Begin dragging `id` from `pointer`. Refused unless idle, the session
    /// is unlocked, and the placement exists. Beginning a gesture selects the
    /// placement.
    pub fn begin_drag(
        &mut self,
        session: &mut DesignSession,
        id: PlacementId,
        pointer: Point,
    ) -> bool {
        if self.is_active() || session.is_locked() {
            return false;
        }
        let Some(start_pos) = session.placement(id).map(|p| p.pos) else {
            return false;
        };
        session.select(id);
        self.state = Gesture::Dragging {
            id,
            origin: pointer,
            start_pos,
        };
        true
    }

    /// Begin resizing `id` from `pointer`, under the same preconditions as
    /// [`GestureTracker::begin_drag`].
    pub fn begin_resize(
        &mut self,
        session: &mut DesignSession,
        id: PlacementId,
        pointer: Point,
    ) -> bool {
        if self.is_active() || session.is_locked() {
            return false;
        }
        let Some(start_side) = session.placement(id).map(|p| p.side) else {
            return false;
        };
        session.select(id);
        self.state = Gesture::Resizing {
            id,
            origin: pointer,
            start_side,
        };
        true
    }

    /// Apply the current pointer position. Positions and sizes are computed
    /// from the gesture-start snapshot, then routed through the clamped
    /// session operations; a pointer that leaves the canvas cannot take the
    /// placement with it.
    pub fn update(&self, session: &mut DesignSession, pointer: Point) {
        match self.state {
            Gesture::Idle => {}
            Gesture::Dragging { id, origin, start_pos } => {
                let delta = pointer - origin;
                session.move_to(id, start_pos.x + delta.x, start_pos.y + delta.y);
            }
            Gesture::Resizing { id, origin, start_side } => {
                let delta = pointer - origin;
                let dominant = if delta.x.abs() >= delta.y.abs() {
                    delta.x
                } else {
                    delta.y
                };
                session.resize_to(id, start_side + dominant);
            }
        }
    }

    /// End the gesture (pointer released) and return to idle.
    pub fn finish(&mut self) {
        self.state = Gesture::Idle;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/gesture.rs"]
mod tests;
