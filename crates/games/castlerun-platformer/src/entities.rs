use serde::{Deserialize, Serialize};

use castlerun_core::pause::{Pausable, SavedVelocity, freeze, thaw};

use crate::collision::{Bounds, Rect};

/// Ticks per enemy animation frame.
const ENEMY_FRAME_DELAY: u8 = 10;
const COIN_FRAMES: u8 = 4;
/// A coin frame advances once the timer exceeds this.
const COIN_FRAME_DELAY: u8 = 8;

/// Enemy species. The renderer picks the sprite from this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EnemyVariant {
    #[default]
    Walker,
    Shell,
    Ghost,
}

impl EnemyVariant {
    pub const ALL: [EnemyVariant; 3] = [EnemyVariant::Walker, EnemyVariant::Shell, EnemyVariant::Ghost];
}

/// A patrolling enemy. Walks horizontally and turns at the playfield edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    /// -1 or +1.
    pub direction: f32,
    pub variant: EnemyVariant,
    /// Two-frame animation toggle.
    pub anim_frame: u8,
    frame_count: u8,
    saved_velocity: Option<SavedVelocity>,
}

impl Enemy {
    pub fn new(x: f32, y: f32, width: f32, height: f32, speed: f32, variant: EnemyVariant) -> Self {
        Self {
            x,
            y,
            width,
            height,
            speed,
            direction: 1.0,
            variant,
            anim_frame: 0,
            frame_count: 0,
            saved_velocity: None,
        }
    }

    /// Current horizontal velocity.
    pub fn velocity(&self) -> f32 {
        self.speed * self.direction
    }

    pub fn advance(&mut self, bounds_width: f32) {
        if self.is_paused() {
            return;
        }

        self.x += self.speed * self.direction;
        if self.x <= 0.0 || self.x + self.width >= bounds_width {
            self.direction = -self.direction;
        }

        self.frame_count += 1;
        if self.frame_count >= ENEMY_FRAME_DELAY {
            self.anim_frame ^= 1;
            self.frame_count = 0;
        }
    }
}

impl Bounds for Enemy {
    fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

impl Pausable for Enemy {
    fn pause(&mut self) {
        // Only speed is stored; direction is untouched so a resume keeps heading.
        let mut unused = 0.0;
        freeze(&mut self.saved_velocity, &mut self.speed, &mut unused);
    }

    fn resume(&mut self) {
        let mut unused = 0.0;
        thaw(&mut self.saved_velocity, &mut self.speed, &mut unused);
    }

    fn is_paused(&self) -> bool {
        self.saved_velocity.is_some()
    }
}

/// A floating coin. Never removed from its level, only flagged collected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collectible {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub collected: bool,
    pub frame: u8,
    frame_timer: u8,
}

impl Collectible {
    pub fn new(x: f32, y: f32, size: f32) -> Self {
        Self {
            x,
            y,
            width: size,
            height: size,
            collected: false,
            frame: 0,
            frame_timer: 0,
        }
    }

    pub fn advance(&mut self) {
        if self.collected {
            return;
        }
        self.frame_timer += 1;
        if self.frame_timer > COIN_FRAME_DELAY {
            self.frame = (self.frame + 1) % COIN_FRAMES;
            self.frame_timer = 0;
        }
    }

    /// Flag as collected. Returns `true` only on the first call.
    pub fn collect(&mut self) -> bool {
        if self.collected {
            return false;
        }
        self.collected = true;
        true
    }
}

impl Bounds for Collectible {
    fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}
