use serde::{Deserialize, Serialize};

use crate::collision::Platform;
use crate::config::{PlatformerConfig, TimingConfig};
use crate::entities::{Collectible, Enemy};
use crate::goal::GoalEntity;
use crate::level_gen::Level;
use crate::particles::ParticleSystem;
use crate::physics::Player;

/// Lifecycle phase, derived from the state flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Loading,
    Idle,
    Running,
    Paused,
    GameOver,
    Victory,
}

/// Vertical scroll offset of the end credits.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CreditsScroll {
    pub position: f32,
    pub paused: bool,
}

impl CreditsScroll {
    pub fn reset(&mut self) {
        self.position = 0.0;
        self.paused = false;
    }

    pub fn advance(&mut self, speed: f32) {
        if !self.paused {
            self.position += speed;
        }
    }

    /// Screen y of the first credits line.
    pub fn offset(&self, timing: &TimingConfig) -> f32 {
        timing.credits_start - self.position
    }
}

/// The canonical game state. Owned by `Game`; every mutation goes through
/// its operations.
///
/// Fields marked `serde(skip)` are presentation or host bookkeeping and are
/// left out of `serialize_state`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub loaded: bool,
    pub started: bool,
    pub running: bool,
    pub paused: bool,
    pub over: bool,
    pub victory: bool,
    pub muted: bool,
    pub current_level: u32,
    pub score: u32,
    pub player: Player,
    pub platforms: Vec<Platform>,
    pub enemies: Vec<Enemy>,
    pub collectibles: Vec<Collectible>,
    pub goal: Option<GoalEntity>,
    /// Whether the current level has been generated.
    pub set_up: bool,
    #[serde(skip)]
    pub particles: ParticleSystem,
    #[serde(skip)]
    pub pause_transitioning: bool,
    /// Frame of the last honoured pause toggle.
    #[serde(skip)]
    pub last_pause_change: Option<u64>,
    #[serde(skip)]
    pub credits: CreditsScroll,
    /// Tick counter. Advances every tick, paused or not.
    #[serde(skip)]
    pub frame: u64,
}

impl GameState {
    pub fn new(config: &PlatformerConfig) -> Self {
        Self {
            loaded: false,
            started: false,
            running: false,
            paused: false,
            over: false,
            victory: false,
            muted: false,
            current_level: 1,
            score: 0,
            player: Player::new(&config.player),
            platforms: Vec::new(),
            enemies: Vec::new(),
            collectibles: Vec::new(),
            goal: None,
            set_up: false,
            particles: ParticleSystem::new(),
            pause_transitioning: false,
            last_pause_change: None,
            credits: CreditsScroll::default(),
            frame: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        if !self.loaded {
            Phase::Loading
        } else if self.victory {
            Phase::Victory
        } else if self.over {
            Phase::GameOver
        } else if !self.started {
            Phase::Idle
        } else if self.paused {
            Phase::Paused
        } else {
            Phase::Running
        }
    }

    /// Whether gameplay advances this tick.
    pub fn is_live(&self) -> bool {
        self.running && !self.paused && !self.over
    }

    pub fn all_collected(&self) -> bool {
        self.collectibles.iter().all(|c| c.collected)
    }

    pub fn all_enemies_defeated(&self) -> bool {
        self.enemies.is_empty()
    }

    /// Swap in a freshly generated level.
    pub fn install_level(&mut self, level: Level) {
        self.platforms = level.platforms;
        self.enemies = level.enemies;
        self.collectibles = level.collectibles;
        self.goal = level.goal;
        self.set_up = true;
    }
}
