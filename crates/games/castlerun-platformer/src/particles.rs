use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use castlerun_core::pause::{Pausable, SavedVelocity, freeze, thaw};

/// Upper bound on live particles. The oldest are dropped first.
pub const MAX_PARTICLES: usize = 256;
const PARTICLE_GRAVITY: f32 = 0.1;
const PARTICLE_SHRINK: f32 = 0.97;
/// Particles are fully opaque until their life drops below this.
const PARTICLE_FADE_TICKS: f32 = 30.0;
const POPUP_LIFE: u32 = 40;
const POPUP_RISE: f32 = -1.0;
/// Golden-ratio conjugate, used to spread per-particle parameters.
const SPREAD: f32 = 0.618_034;

/// 24-bit colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(0xff, 0xff, 0xff);
    pub const RED: Rgb = Rgb::new(0xff, 0x00, 0x00);
    pub const GREEN: Rgb = Rgb::new(0x00, 0xff, 0x00);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb` form.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// One explosion fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub size: f32,
    pub color: Rgb,
    /// Remaining ticks.
    pub life: u32,
    saved_velocity: Option<SavedVelocity>,
}

impl Particle {
    pub fn new(x: f32, y: f32, vx: f32, vy: f32, size: f32, color: Rgb, life: u32) -> Self {
        Self {
            x,
            y,
            vx,
            vy,
            size,
            color,
            life,
            saved_velocity: None,
        }
    }

    /// Advance one tick. Returns whether the particle is still alive.
    pub fn advance(&mut self) -> bool {
        self.x += self.vx;
        self.y += self.vy;
        self.vy += PARTICLE_GRAVITY;
        self.life = self.life.saturating_sub(1);
        self.size *= PARTICLE_SHRINK;
        self.life > 0
    }

    pub fn alpha(&self) -> f32 {
        (self.life as f32 / PARTICLE_FADE_TICKS).min(1.0)
    }
}

impl Pausable for Particle {
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

/// What a popup displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PopupText {
    Score(u32),
    Message(String),
}

impl std::fmt::Display for PopupText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PopupText::Score(n) => write!(f, "+{n}"),
            PopupText::Message(m) => f.write_str(m),
        }
    }
}

/// Floating text that drifts upward and fades.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorePopup {
    pub x: f32,
    pub y: f32,
    pub vy: f32,
    pub life: u32,
    pub text: PopupText,
    pub color: Rgb,
    saved_velocity: Option<SavedVelocity>,
}

impl ScorePopup {
    pub fn new(x: f32, y: f32, text: PopupText, color: Rgb) -> Self {
        Self {
            x,
            y,
            vy: POPUP_RISE,
            life: POPUP_LIFE,
            text,
            color,
            saved_velocity: None,
        }
    }

    pub fn advance(&mut self) -> bool {
        self.y += self.vy;
        self.life = self.life.saturating_sub(1);
        self.life > 0
    }

    pub fn alpha(&self) -> f32 {
        self.life as f32 / POPUP_LIFE as f32
    }
}

impl Pausable for ScorePopup {
    fn pause(&mut self) {
        let mut vx = 0.0;
        freeze(&mut self.saved_velocity, &mut vx, &mut self.vy);
    }

    fn resume(&mut self) {
        let mut vx = 0.0;
        thaw(&mut self.saved_velocity, &mut vx, &mut self.vy);
    }

    fn is_paused(&self) -> bool {
        self.saved_velocity.is_some()
    }
}

/// Owns every live particle and popup. Advances independently of gameplay
/// but honours the shared pause flag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticleSystem {
    particles: VecDeque<Particle>,
    popups: Vec<ScorePopup>,
    paused: bool,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Burst of `count` particles radiating from `(x, y)`.
    ///
    /// Directions are spread evenly around the circle; speed, size and life
    /// are spread per index so the burst looks irregular without consuming
    /// randomness.
    pub fn create_explosion(&mut self, x: f32, y: f32, count: usize, colors: &[Rgb]) {
        if count == 0 {
            return;
        }
        for i in 0..count {
            let angle = std::f32::consts::TAU * i as f32 / count as f32;
            let t = ((i + 1) as f32 * SPREAD).fract();
            let speed = 1.0 + 3.0 * t;
            let size = 3.0 + 3.0 * (t * 7.0).fract();
            let life = 20 + (20.0 * (t * 13.0).fract()) as u32;
            let color = colors.get(i % colors.len().max(1)).copied().unwrap_or(Rgb::WHITE);
            self.particles.push_back(Particle::new(
                x,
                y,
                angle.cos() * speed,
                angle.sin() * speed,
                size,
                color,
                life,
            ));
        }
        while self.particles.len() > MAX_PARTICLES {
            self.particles.pop_front();
        }
    }

    pub fn create_popup(&mut self, x: f32, y: f32, text: PopupText, color: Rgb) {
        self.popups.push(ScorePopup::new(x, y, text, color));
    }

    /// Advance everything one tick and drop the dead. No-op while paused.
    pub fn update(&mut self) {
        if self.paused {
            return;
        }
        self.particles.retain_mut(Particle::advance);
        self.popups.retain_mut(ScorePopup::advance);
    }

    pub fn particles(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn popups(&self) -> &[ScorePopup] {
        &self.popups
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
        self.popups.clear();
        self.paused = false;
    }
}

impl Pausable for ParticleSystem {
    fn pause(&mut self) {
        self.paused = true;
        self.particles.iter_mut().for_each(|p| p.pause());
        self.popups.iter_mut().for_each(|p| p.pause());
    }

    fn resume(&mut self) {
        self.paused = false;
        self.particles.iter_mut().for_each(|p| p.resume());
        self.popups.iter_mut().for_each(|p| p.resume());
    }

    fn is_paused(&self) -> bool {
        self.paused
    }
}
