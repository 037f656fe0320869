use serde::{Deserialize, Serialize};

use crate::collision::{Bounds, Platform, Rect};

const GOAL_SIZE: f32 = 32.0;
const CASTLE_SIZE: f32 = 96.0;
/// The goal and castle are raised this far above the anchor point.
const RAISE: f32 = 48.0;
const GOAL_FRAME_DELAY: u8 = 15;

/// Decorative structure behind the goal. Its barriers are solid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Castle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub barriers: Vec<Platform>,
}

impl Castle {
    pub fn new(x: f32, y: f32) -> Self {
        let width = CASTLE_SIZE;
        let barriers = vec![
            Rect::new(x - 32.0, y + 32.0, 32.0, 8.0),
            Rect::new(x + width, y + 32.0, 32.0, 8.0),
            Rect::new(x - 32.0, y - 16.0, 8.0, 48.0),
            Rect::new(x + width + 24.0, y - 16.0, 8.0, 48.0),
        ];
        Self {
            x,
            y,
            width,
            height: CASTLE_SIZE,
            barriers,
        }
    }
}

/// The final-level objective. Can only be reached once every enemy on the
/// level is gone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalEntity {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub is_reached: bool,
    pub can_be_reached: bool,
    pub anim_frame: u8,
    frame_count: u8,
    pub castle: Castle,
}

impl GoalEntity {
    /// Build a goal anchored at `(x, y)`. The goal itself sits `RAISE` above
    /// the anchor; the castle is centred behind it.
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y: y - RAISE,
            width: GOAL_SIZE,
            height: GOAL_SIZE,
            is_reached: false,
            can_be_reached: false,
            anim_frame: 0,
            frame_count: 0,
            castle: Castle::new(x - GOAL_SIZE, y - RAISE),
        }
    }

    pub fn advance(&mut self) {
        if self.is_reached {
            return;
        }
        self.frame_count += 1;
        if self.frame_count >= GOAL_FRAME_DELAY {
            self.anim_frame ^= 1;
            self.frame_count = 0;
        }
    }

    /// Where notification popups about the goal appear.
    pub fn popup_anchor(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y - 20.0)
    }

    /// Castle barriers, to be registered as level platforms.
    pub fn barriers(&self) -> &[Platform] {
        &self.castle.barriers
    }
}

impl Bounds for GoalEntity {
    fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}
