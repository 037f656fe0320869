use serde::{Deserialize, Serialize};

/// Freeze/thaw contract shared by everything that moves.
///
/// `pause` captures the current velocity and zeroes it; `resume` restores
/// the captured value exactly. Pausing twice must not overwrite the first
/// capture, and resuming without a capture is a no-op.
pub trait Pausable {
    fn pause(&mut self);
    fn resume(&mut self);
    fn is_paused(&self) -> bool;
}

/// Velocity captured by a `pause` call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavedVelocity {
    pub vx: f32,
    pub vy: f32,
}

/// Capture `(vx, vy)` into `slot` and zero them, unless already captured.
pub fn freeze(slot: &mut Option<SavedVelocity>, vx: &mut f32, vy: &mut f32) {
    if slot.is_some() {
        return;
    }
    *slot = Some(SavedVelocity { vx: *vx, vy: *vy });
    *vx = 0.0;
    *vy = 0.0;
}

/// Restore a captured velocity, clearing the slot.
pub fn thaw(slot: &mut Option<SavedVelocity>, vx: &mut f32, vy: &mut f32) {
    if let Some(saved) = slot.take() {
        *vx = saved.vx;
        *vy = saved.vy;
    }
}
