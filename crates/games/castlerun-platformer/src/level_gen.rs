use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::collision::{Platform, Rect};
use crate::config::LevelConfig;
use crate::entities::{Collectible, Enemy, EnemyVariant};
use crate::goal::GoalEntity;

/// Everything the generator produces for one level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// Ground first, then generated platforms, then goal barriers (if any).
    pub platforms: Vec<Platform>,
    pub enemies: Vec<Enemy>,
    pub collectibles: Vec<Collectible>,
    pub goal: Option<GoalEntity>,
}

/// Generate level `level` (1-based). All randomness comes from `rng`.
pub fn generate_level<R: Rng>(level: u32, config: &LevelConfig, rng: &mut R) -> Level {
    let mut platforms = Vec::with_capacity((config.base_platform_count + level + 5) as usize);

    // Ground spans the full width
    platforms.push(Rect::new(
        0.0,
        config.ground_y,
        config.bounds_width,
        config.ground_height,
    ));

    for _ in 0..config.base_platform_count + level {
        let width = rng.random::<f32>() * config.platform_width_range + config.platform_min_width;
        let x = rng.random::<f32>() * (config.bounds_width - width).max(0.0);
        let y = rng.random::<f32>() * config.platform_y_range + config.platform_min_y;
        platforms.push(Rect::new(x, y, width, config.platform_height));
    }

    let mut goal = (level == config.final_level).then(|| {
        let goal = GoalEntity::new(config.goal_x, config.goal_y);
        platforms.extend_from_slice(goal.barriers());
        goal
    });

    let enemies = place_enemies(level, config, &platforms, rng);
    // Nothing left to stomp, so nothing can ever unlock the goal later
    if let Some(goal) = goal.as_mut() {
        goal.can_be_reached = enemies.is_empty();
    }
    let collectibles = place_collectibles(level, config, &platforms, rng);

    Level {
        platforms,
        enemies,
        collectibles,
        goal,
    }
}

fn place_enemies<R: Rng>(
    level: u32,
    config: &LevelConfig,
    platforms: &[Platform],
    rng: &mut R,
) -> Vec<Enemy> {
    let count = level.min(config.max_enemies);
    let mut enemies = Vec::with_capacity(count as usize);

    for i in 0..count {
        // First enemy always patrols the ground
        let index = if i == 0 {
            0
        } else {
            rng.random_range(0..platforms.len())
        };
        let platform = &platforms[index];
        let variant = EnemyVariant::ALL[rng.random_range(0..EnemyVariant::ALL.len())];

        let available = platform.width - config.enemy_width - config.enemy_edge_margin * 2.0;
        if available <= 0.0 {
            tracing::debug!(level, platform = index, "Platform too narrow for an enemy");
            continue;
        }

        let x = platform.x + config.enemy_edge_margin + rng.random::<f32>() * available;
        let y = platform.y - config.enemy_height;
        enemies.push(Enemy::new(
            x,
            y,
            config.enemy_width,
            config.enemy_height,
            config.enemy_speed,
            variant,
        ));
    }

    enemies
}

fn place_collectibles<R: Rng>(
    level: u32,
    config: &LevelConfig,
    platforms: &[Platform],
    rng: &mut R,
) -> Vec<Collectible> {
    let count = config.base_collectibles + level * config.collectibles_per_level;
    let size = config.collectible_size;
    let mut collectibles = Vec::with_capacity(count as usize);

    for i in 0..count {
        let mut placed = None;

        for _ in 0..config.collectible_max_attempts {
            let x = rng.random::<f32>() * (config.bounds_width - size);
            let mut y = rng.random::<f32>() * (config.bounds_height - 100.0 - size) + 50.0;

            let candidate = Rect::new(x, y, size, size);
            if let Some(host) = platforms.iter().find(|p| candidate.overlaps(p)) {
                y = host.y - size - config.collectible_nudge;
            }

            let candidate = Rect::new(x, y, size, size);
            if is_reachable(&candidate, platforms, config) {
                placed = Some((x, y));
                break;
            }
        }

        let (x, y) = placed.unwrap_or_else(|| {
            let spot = fallback_position(i as usize, config, platforms);
            tracing::debug!(level, index = i, x = spot.0, y = spot.1, "Collectible fallback");
            spot
        });
        collectibles.push(Collectible::new(x, y, size));
    }

    collectibles
}

/// Whether a collectible at `rect` lies within jump reach above some platform.
pub fn is_reachable(rect: &Rect, platforms: &[Platform], config: &LevelConfig) -> bool {
    platforms.iter().any(|p| {
        rect.right() > p.x - config.reach_slack
            && rect.x < p.right() + config.reach_slack
            && rect.y > p.y - config.max_jump_height
            && rect.y < p.y
    })
}

/// Deterministic spot used when every attempt for collectible `index` failed:
/// centred just above platform `index % len`.
pub fn fallback_position(index: usize, config: &LevelConfig, platforms: &[Platform]) -> (f32, f32) {
    let size = config.collectible_size;
    let Some(p) = platforms.get(index % platforms.len().max(1)) else {
        return (0.0, config.ground_y - size - config.collectible_nudge);
    };
    let x = (p.x + p.width / 2.0 - size / 2.0).clamp(0.0, (config.bounds_width - size).max(0.0));
    (x, p.y - size - config.collectible_nudge)
}
