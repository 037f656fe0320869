use serde::{Deserialize, Serialize};

use castlerun_core::input::{InputState, Key};
use castlerun_core::pause::{Pausable, SavedVelocity, freeze, thaw};

use crate::collision::{Bounds, Rect};
use crate::config::{PhysicsConfig, PlayerConfig};
use crate::events::GameEvent;

/// Walk cycle length in frames.
const WALK_FRAMES: u8 = 3;
/// Ticks spent on each walk frame.
const WALK_FRAME_DELAY: u8 = 5;

/// Horizontal facing, kept for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// Cosmetic character skin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CharacterVariant {
    #[default]
    Plumber,
    Frog,
}

impl CharacterVariant {
    pub fn swapped(self) -> Self {
        match self {
            CharacterVariant::Plumber => CharacterVariant::Frog,
            CharacterVariant::Frog => CharacterVariant::Plumber,
        }
    }
}

/// The player-controlled character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub vx: f32,
    pub vy: f32,
    pub is_jumping: bool,
    pub facing: Facing,
    pub walk_frame: u8,
    walk_timer: u8,
    pub health: u32,
    pub lives: u32,
    pub invulnerable: bool,
    pub invulnerable_timer: u32,
    pub character: CharacterVariant,
    /// Swap key state last tick, for edge detection.
    swap_held: bool,
    saved_velocity: Option<SavedVelocity>,
}

impl Player {
    pub fn new(config: &PlayerConfig) -> Self {
        Self {
            x: config.spawn_x,
            y: config.spawn_y,
            width: config.width,
            height: config.height,
            vx: 0.0,
            vy: 0.0,
            is_jumping: false,
            facing: Facing::Right,
            walk_frame: 0,
            walk_timer: 0,
            health: config.max_health,
            lives: config.initial_lives,
            invulnerable: false,
            invulnerable_timer: 0,
            character: CharacterVariant::default(),
            swap_held: false,
            saved_velocity: None,
        }
    }

    /// Advance one tick from the sampled input.
    ///
    /// Pushes `GameEvent::Jumped` when a jump starts.
    pub fn advance(
        &mut self,
        input: &InputState,
        physics: &PhysicsConfig,
        invulnerable_ticks: u32,
        bounds_width: f32,
        bounds_height: f32,
        events: &mut Vec<GameEvent>,
    ) {
        let dir = input.horizontal();
        if dir != 0.0 {
            self.vx = dir * physics.movement_speed;
            self.facing = if dir < 0.0 { Facing::Left } else { Facing::Right };
            self.walk_timer = self.walk_timer.saturating_add(1);
        } else {
            self.vx *= physics.friction;
            self.walk_timer = 0;
            self.walk_frame = 0;
        }

        if input.is_pressed(Key::Jump) && !self.is_jumping {
            self.vy = physics.jump_force;
            self.is_jumping = true;
            events.push(GameEvent::Jumped);
        }

        let swap = input.is_pressed(Key::SwapCharacter);
        if swap && !self.swap_held {
            self.character = self.character.swapped();
        }
        self.swap_held = swap;

        self.vy = (self.vy + physics.gravity).min(physics.max_fall_speed);

        self.x += self.vx;
        self.y += self.vy;

        self.x = self.x.clamp(0.0, (bounds_width - self.width).max(0.0));
        if self.y + self.height > bounds_height {
            self.y = bounds_height - self.height;
            self.vy = 0.0;
            self.is_jumping = false;
        }

        if self.walk_timer > WALK_FRAME_DELAY {
            self.walk_frame = (self.walk_frame + 1) % WALK_FRAMES;
            self.walk_timer = 0;
        }

        if self.invulnerable {
            self.invulnerable_timer += 1;
            if self.invulnerable_timer >= invulnerable_ticks {
                self.invulnerable = false;
                self.invulnerable_timer = 0;
            }
        }
    }

    /// Move back to a spawn point with full health. Lives and the
    /// invulnerability window are left alone.
    pub fn reset(&mut self, x: f32, y: f32, max_health: u32) {
        self.x = x;
        self.y = y;
        self.vx = 0.0;
        self.vy = 0.0;
        self.health = max_health;
        self.saved_velocity = None;
    }

    /// Whether the renderer should draw the player this frame. Blinks every
    /// 6 ticks while invulnerable.
    pub fn blink_visible(&self, frame: u64) -> bool {
        !self.invulnerable || (frame / 6) % 2 == 1
    }
}

impl Bounds for Player {
    fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

impl Pausable for Player {
    fn pause(&mut self) {
        freeze(&mut self.saved_velocity, &mut self.vx, &mut self.vy);
    }

    fn resume(&mut self) {
        thaw(&mut self.saved_velocity, &mut self.vx, &mut self.vy);
    }

    fn is_paused(&self) -> bool {
        self.saved_velocity.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: f32 = 800.0;
    const H: f32 = 480.0;

    fn step(player: &mut Player, input: &InputState) -> Vec<GameEvent> {
        let mut events = Vec::new();
        player.advance(input, &PhysicsConfig::default(), 60, W, H, &mut events);
        events
    }

    fn player() -> Player {
        Player::new(&PlayerConfig::default())
    }

    #[test]
    fn gravity_pulls_down() {
        let mut p = player();
        let y_before = p.y;
        step(&mut p, &InputState::new());
        assert!(p.y > y_before, "Gravity should pull player down");
        assert_eq!(p.vy, 0.5);
    }

    #[test]
    fn fall_speed_is_capped() {
        let mut p = player();
        p.y = -5000.0;
        for _ in 0..100 {
            step(&mut p, &InputState::new());
        }
        assert_eq!(p.vy, crate::config::MAX_FALL_SPEED);
    }

    #[test]
    fn jump_only_from_ground() {
        let mut p = player();
        let events = step(&mut p, &InputState::with_keys(&[Key::Jump]));
        assert!(p.vy < 0.0, "Jump should give upward velocity");
        assert!(p.is_jumping);
        assert_eq!(events, vec![GameEvent::Jumped]);

        let vy = p.vy;
        let events = step(&mut p, &InputState::with_keys(&[Key::Jump]));
        assert!(events.is_empty(), "No second jump while airborne");
        assert_eq!(p.vy, vy + 0.5);
    }

    #[test]
    fn friction_decays_velocity() {
        let mut p = player();
        step(&mut p, &InputState::with_keys(&[Key::Right]));
        assert_eq!(p.vx, 5.0);
        step(&mut p, &InputState::new());
        assert_eq!(p.vx, 4.0);
        for _ in 0..50 {
            step(&mut p, &InputState::new());
        }
        assert!(p.vx.abs() < 0.01);
    }

    #[test]
    fn clamped_to_horizontal_bounds() {
        let mut p = player();
        p.x = 2.0;
        step(&mut p, &InputState::with_keys(&[Key::Left]));
        assert_eq!(p.x, 0.0);
        assert_eq!(p.facing, Facing::Left);

        p.x = W - p.width - 1.0;
        step(&mut p, &InputState::with_keys(&[Key::Right]));
        assert_eq!(p.x, W - p.width);
    }

    #[test]
    fn cannot_fall_below_bounds() {
        let mut p = player();
        p.y = H - p.height;
        p.vy = 10.0;
        p.is_jumping = true;
        step(&mut p, &InputState::new());
        assert_eq!(p.y, H - p.height);
        assert_eq!(p.vy, 0.0);
        assert!(!p.is_jumping);
    }

    #[test]
    fn invulnerability_times_out() {
        let mut p = player();
        p.invulnerable = true;
        for _ in 0..59 {
            step(&mut p, &InputState::new());
        }
        assert!(p.invulnerable);
        step(&mut p, &InputState::new());
        assert!(!p.invulnerable);
        assert_eq!(p.invulnerable_timer, 0);
    }

    #[test]
    fn swap_character_on_rising_edge_only() {
        let mut p = player();
        let swap = InputState::with_keys(&[Key::SwapCharacter]);
        step(&mut p, &swap);
        assert_eq!(p.character, CharacterVariant::Frog);
        step(&mut p, &swap);
        assert_eq!(p.character, CharacterVariant::Frog, "Held key must not re-toggle");
        step(&mut p, &InputState::new());
        step(&mut p, &swap);
        assert_eq!(p.character, CharacterVariant::Plumber);
    }

    #[test]
    fn walk_frame_cycles_while_moving() {
        let mut p = player();
        let right = InputState::with_keys(&[Key::Right]);
        for _ in 0..6 {
            step(&mut p, &right);
        }
        assert_eq!(p.walk_frame, 1);
        step(&mut p, &InputState::new());
        assert_eq!(p.walk_frame, 0);
    }

    #[test]
    fn pause_resume_restores_exact_velocity() {
        let mut p = player();
        p.vx = 1.0 / 3.0;
        p.vy = -14.5;
        p.pause();
        assert!(p.is_paused());
        assert_eq!((p.vx, p.vy), (0.0, 0.0));
        p.resume();
        assert_eq!(p.vx.to_bits(), (1.0f32 / 3.0).to_bits());
        assert_eq!(p.vy, -14.5);
        assert!(!p.is_paused());
    }

    #[test]
    fn reset_restores_health_not_lives() {
        let mut p = player();
        p.health = 10;
        p.lives = 1;
        p.vx = 3.0;
        p.reset(100.0, 300.0, 100);
        assert_eq!((p.x, p.y, p.vx, p.vy), (100.0, 300.0, 0.0, 0.0));
        assert_eq!(p.health, 100);
        assert_eq!(p.lives, 1);
    }

    #[test]
    fn blink_only_while_invulnerable() {
        let mut p = player();
        assert!(p.blink_visible(0));
        p.invulnerable = true;
        assert!(!p.blink_visible(0));
        assert!(p.blink_visible(6));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn pause_round_trip_is_bit_exact(
                vx in -50.0f32..50.0,
                vy in -50.0f32..50.0,
                cycles in 1usize..5,
            ) {
                let mut p = player();
                p.vx = vx;
                p.vy = vy;
                for _ in 0..cycles {
                    p.pause();
                    prop_assert_eq!((p.vx, p.vy), (0.0, 0.0));
                    p.resume();
                }
                prop_assert_eq!(p.vx.to_bits(), vx.to_bits());
                prop_assert_eq!(p.vy.to_bits(), vy.to_bits());
            }

            #[test]
            fn player_never_leaves_bounds(
                keys in proptest::collection::vec(0u8..8, 1..200),
            ) {
                let mut p = player();
                for k in keys {
                    let mut input = InputState::new();
                    if k & 1 != 0 { input.press(Key::Left); }
                    if k & 2 != 0 { input.press(Key::Right); }
                    if k & 4 != 0 { input.press(Key::Jump); }
                    step(&mut p, &input);
                    prop_assert!(p.x >= 0.0 && p.x <= W - p.width);
                    prop_assert!(p.y <= H - p.height);
                }
            }
        }
    }
}
