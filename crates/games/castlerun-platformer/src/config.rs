use serde::{Deserialize, Serialize};

/// Downward acceleration per tick.
pub const GRAVITY: f32 = 0.5;
/// Vertical velocity applied on jump (negative is up).
pub const JUMP_FORCE: f32 = -15.0;
/// Horizontal speed while a direction is held.
pub const MOVEMENT_SPEED: f32 = 5.0;
/// Per-tick horizontal velocity multiplier when no direction is held.
pub const FRICTION: f32 = 0.8;
/// Terminal fall speed.
pub const MAX_FALL_SPEED: f32 = 15.0;
pub const MAX_HEALTH: u32 = 100;
pub const INITIAL_LIVES: u32 = 3;
pub const ENEMY_DAMAGE: u32 = 25;
pub const COIN_SCORE: u32 = 10;
pub const STOMP_SCORE: u32 = 20;
/// A contact counts as a stomp when the player's bottom edge minus this
/// tolerance is at or above the enemy's top edge.
pub const STOMP_TOLERANCE: f32 = 10.0;
/// Upward velocity after a stomp (two thirds of a jump).
pub const STOMP_BOUNCE: f32 = JUMP_FORCE / 1.5;
/// Highest point a jump from rest can reach: v^2 / 2g.
pub const MAX_JUMP_HEIGHT: f32 = 225.0;
pub const FINAL_LEVEL: u32 = 5;

/// Error raised while loading or validating a config.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "cannot read config: {e}"),
            Self::Parse(e) => write!(f, "cannot parse config: {e}"),
            Self::Invalid(m) => write!(f, "invalid config: {m}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Invalid(_) => None,
        }
    }
}

/// Player motion parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f32,
    pub jump_force: f32,
    pub movement_speed: f32,
    pub friction: f32,
    pub max_fall_speed: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            jump_force: JUMP_FORCE,
            movement_speed: MOVEMENT_SPEED,
            friction: FRICTION,
            max_fall_speed: MAX_FALL_SPEED,
        }
    }
}

/// Player body, vitality and spawn point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub width: f32,
    pub height: f32,
    pub spawn_x: f32,
    pub spawn_y: f32,
    pub max_health: u32,
    pub initial_lives: u32,
    /// Length of the post-damage invulnerability window, in ticks.
    pub invulnerable_ticks: u32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            width: 32.0,
            height: 32.0,
            spawn_x: 100.0,
            spawn_y: 300.0,
            max_health: MAX_HEALTH,
            initial_lives: INITIAL_LIVES,
            invulnerable_ticks: 60,
        }
    }
}

/// Damage and scoring rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub enemy_damage: u32,
    pub stomp_score: u32,
    pub stomp_tolerance: f32,
    pub stomp_bounce: f32,
    pub coin_score: u32,
    pub goal_score: u32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            enemy_damage: ENEMY_DAMAGE,
            stomp_score: STOMP_SCORE,
            stomp_tolerance: STOMP_TOLERANCE,
            stomp_bounce: STOMP_BOUNCE,
            coin_score: COIN_SCORE,
            goal_score: 100,
        }
    }
}

/// Playfield and procedural generation bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    pub bounds_width: f32,
    pub bounds_height: f32,
    pub final_level: u32,
    pub ground_y: f32,
    pub ground_height: f32,
    /// Extra platforms per level = base + current level.
    pub base_platform_count: u32,
    pub platform_min_width: f32,
    pub platform_width_range: f32,
    pub platform_min_y: f32,
    pub platform_y_range: f32,
    pub platform_height: f32,
    pub max_enemies: u32,
    pub enemy_width: f32,
    pub enemy_height: f32,
    pub enemy_speed: f32,
    /// Gap kept between a spawned enemy and its platform's edges.
    pub enemy_edge_margin: f32,
    pub base_collectibles: u32,
    pub collectibles_per_level: u32,
    pub collectible_size: f32,
    /// Placement attempts per collectible before the fallback spot is used.
    pub collectible_max_attempts: u32,
    pub max_jump_height: f32,
    /// Horizontal slack past a platform edge still counted as reachable.
    pub reach_slack: f32,
    /// Gap left between a nudged collectible and the platform under it.
    pub collectible_nudge: f32,
    pub goal_x: f32,
    pub goal_y: f32,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            bounds_width: 800.0,
            bounds_height: 480.0,
            final_level: FINAL_LEVEL,
            ground_y: 450.0,
            ground_height: 30.0,
            base_platform_count: 3,
            platform_min_width: 100.0,
            platform_width_range: 200.0,
            platform_min_y: 150.0,
            platform_y_range: 250.0,
            platform_height: 20.0,
            max_enemies: 5,
            enemy_width: 32.0,
            enemy_height: 32.0,
            enemy_speed: 2.0,
            enemy_edge_margin: 20.0,
            base_collectibles: 5,
            collectibles_per_level: 2,
            collectible_size: 16.0,
            collectible_max_attempts: 50,
            max_jump_height: MAX_JUMP_HEIGHT,
            reach_slack: 30.0,
            collectible_nudge: 5.0,
            goal_x: 700.0,
            goal_y: 400.0,
        }
    }
}

/// Tick-counted windows for non-gameplay timers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Minimum ticks between two honoured pause toggles.
    pub pause_debounce_ticks: u64,
    /// Ticks a pause toggle stays "in flight".
    pub pause_transition_ticks: u64,
    pub credits_start: f32,
    pub credits_speed: f32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            pause_debounce_ticks: 18,
            pause_transition_ticks: 6,
            credits_start: 300.0,
            credits_speed: 1.5,
        }
    }
}

/// Top-level engine configuration, loadable from TOML.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformerConfig {
    pub physics: PhysicsConfig,
    pub player: PlayerConfig,
    pub combat: CombatConfig,
    pub level: LevelConfig,
    pub timing: TimingConfig,
    /// Generator seed. `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl PlatformerConfig {
    /// Load config from the file named by `CASTLERUN_CONFIG`, or
    /// `config/castlerun.toml`. Falls back to defaults if the file is
    /// missing, unparseable or invalid. `CASTLERUN_SEED` overrides the seed.
    pub fn load() -> Self {
        let path = std::env::var("CASTLERUN_CONFIG")
            .unwrap_or_else(|_| "config/castlerun.toml".to_string());
        let mut config = match Self::from_file(&path) {
            Ok(cfg) => {
                tracing::info!("Loaded configuration from {path}");
                cfg
            },
            Err(ConfigError::Io(_)) => {
                tracing::info!("No {path} found, using defaults");
                PlatformerConfig::default()
            },
            Err(e) => {
                tracing::warn!("Failed to load {path}: {e}, using defaults");
                PlatformerConfig::default()
            },
        };

        // Environment variable overrides
        if let Ok(val) = std::env::var("CASTLERUN_SEED")
            && let Ok(seed) = val.parse()
        {
            config.seed = Some(seed);
        }
        config
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let cfg: PlatformerConfig = toml::from_str(content).map_err(ConfigError::Parse)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let level = &self.level;
        let player = &self.player;
        if level.bounds_width <= 0.0 || level.bounds_height <= 0.0 {
            return Err(ConfigError::Invalid("bounds must be positive".into()));
        }
        if level.final_level == 0 {
            return Err(ConfigError::Invalid("final_level must be at least 1".into()));
        }
        if level.max_enemies == 0 {
            return Err(ConfigError::Invalid("max_enemies must be at least 1".into()));
        }
        if level.collectible_max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "collectible_max_attempts must be at least 1".into(),
            ));
        }
        if player.width <= 0.0
            || player.height <= 0.0
            || player.width > level.bounds_width
            || player.height > level.bounds_height
        {
            return Err(ConfigError::Invalid(
                "player must fit inside the bounds".into(),
            ));
        }
        if player.max_health == 0 || player.initial_lives == 0 {
            return Err(ConfigError::Invalid(
                "max_health and initial_lives must be positive".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.physics.friction) {
            return Err(ConfigError::Invalid("friction must be in [0, 1]".into()));
        }
        Ok(())
    }
}
