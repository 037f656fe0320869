use serde::{Deserialize, Serialize};

use crate::config::PlatformerConfig;
use crate::damage::apply_damage;
use crate::events::GameEvent;
use crate::particles::{PopupText, Rgb};
use crate::physics::Player;
use crate::state::GameState;

/// Axis-aligned rectangle. `(x, y)` is the top-left corner, y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Static level geometry. Immutable once generated.
pub type Platform = Rect;

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Strict overlap: touching edges do not count.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.right() > other.x
            && self.x < other.right()
            && self.bottom() > other.y
            && self.y < other.bottom()
    }

    pub fn contains_point(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.right() && py >= self.y && py <= self.bottom()
    }

    /// Penetration depth on each axis. Either is `<= 0` when the rects are apart.
    pub fn overlap_depth(&self, other: &Rect) -> (f32, f32) {
        let ox = self.right().min(other.right()) - self.x.max(other.x);
        let oy = self.bottom().min(other.bottom()) - self.y.max(other.y);
        (ox, oy)
    }
}

/// Anything with an axis-aligned hitbox.
pub trait Bounds {
    fn bounds(&self) -> Rect;
}

impl Bounds for Rect {
    fn bounds(&self) -> Rect {
        *self
    }
}

/// Push the player out of every platform it overlaps, in order, along the
/// axis of least penetration. Ties resolve vertically.
///
/// Returns whether the player landed on top of at least one platform. If not,
/// the player is marked airborne.
pub fn resolve_platforms(player: &mut Player, platforms: &[Platform]) -> bool {
    let mut grounded = false;

    for platform in platforms {
        let (overlap_x, overlap_y) = player.bounds().overlap_depth(platform);
        if overlap_x <= 0.0 || overlap_y <= 0.0 {
            continue;
        }

        if overlap_x < overlap_y {
            if player.x < platform.x {
                player.x = platform.x - player.width;
            } else {
                player.x = platform.right();
            }
            player.vx = 0.0;
        } else if player.y < platform.y {
            player.y = platform.y - player.height;
            player.vy = 0.0;
            player.is_jumping = false;
            grounded = true;
        } else {
            player.y = platform.bottom();
            player.vy = 0.0;
        }
    }

    if !grounded {
        player.is_jumping = true;
    }
    grounded
}

/// How the player touched an enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Falling onto the enemy's top edge.
    Stomp,
    /// Any other overlap.
    Hit,
}

/// Classify an overlap between the player and an enemy hitbox, or `None`
/// if they do not touch.
pub fn classify_contact(player: &Player, enemy: &Rect, stomp_tolerance: f32) -> Option<Contact> {
    let body = player.bounds();
    if !body.overlaps(enemy) {
        return None;
    }
    if player.vy > 0.0 && body.bottom() - stomp_tolerance <= enemy.y {
        Some(Contact::Stomp)
    } else {
        Some(Contact::Hit)
    }
}

const STOMP_COLORS: [Rgb; 4] = [
    Rgb::new(0xff, 0x00, 0x00),
    Rgb::new(0xff, 0x77, 0x00),
    Rgb::new(0xff, 0xff, 0x00),
    Rgb::new(0xff, 0x00, 0xff),
];
const VICTORY_COLORS: [Rgb; 4] = [
    Rgb::new(0xff, 0x69, 0xb4),
    Rgb::new(0xff, 0x14, 0x93),
    Rgb::new(0xff, 0xb6, 0xc1),
    Rgb::new(0xff, 0xc0, 0xcb),
];
const EXPLOSION_PARTICLES: usize = 30;

pub const GOAL_LOCKED_MESSAGE: &str = "Defeat all enemies first!";
pub const GOAL_UNLOCKED_MESSAGE: &str = "Princess can now be rescued!";

/// Run one collision pass over the whole level: platforms, then enemies,
/// then the goal, then collectibles.
pub fn resolve(state: &mut GameState, config: &PlatformerConfig, events: &mut Vec<GameEvent>) {
    resolve_platforms(&mut state.player, &state.platforms);
    resolve_enemies(state, config, events);
    if state.over {
        return;
    }
    if state.current_level == config.level.final_level {
        resolve_goal(state, config, events);
    }
    resolve_collectibles(state, config, events);
}

fn resolve_enemies(state: &mut GameState, config: &PlatformerConfig, events: &mut Vec<GameEvent>) {
    let combat = &config.combat;
    let mut i = 0;
    while i < state.enemies.len() {
        let enemy = state.enemies[i].bounds();
        match classify_contact(&state.player, &enemy, combat.stomp_tolerance) {
            None => i += 1,
            Some(Contact::Stomp) => {
                let defeated = state.enemies.remove(i);
                let (cx, cy) = enemy.center();
                state
                    .particles
                    .create_explosion(cx, cy, EXPLOSION_PARTICLES, &STOMP_COLORS);
                state
                    .particles
                    .create_popup(cx, enemy.y, PopupText::Score(combat.stomp_score), Rgb::WHITE);
                state.player.vy = combat.stomp_bounce;
                state.score += combat.stomp_score;
                events.push(GameEvent::EnemyStomped {
                    variant: defeated.variant,
                    score: state.score,
                });

                if state.enemies.is_empty() {
                    if let Some(goal) = state.goal.as_mut() {
                        goal.can_be_reached = true;
                        let (gx, gy) = goal.popup_anchor();
                        state.particles.create_popup(
                            gx,
                            gy,
                            PopupText::Message(GOAL_UNLOCKED_MESSAGE.to_string()),
                            Rgb::GREEN,
                        );
                        events.push(GameEvent::GoalUnlocked);
                    }
                }
            },
            Some(Contact::Hit) => {
                if !state.player.invulnerable {
                    apply_damage(state, config, combat.enemy_damage, events);
                    if state.over {
                        return;
                    }
                }
                i += 1;
            },
        }
    }
}

fn resolve_goal(state: &mut GameState, config: &PlatformerConfig, events: &mut Vec<GameEvent>) {
    let Some(goal) = state.goal.as_mut() else {
        return;
    };
    if goal.is_reached || !state.player.bounds().overlaps(&goal.bounds()) {
        return;
    }

    let (gx, gy) = goal.popup_anchor();
    if !goal.can_be_reached || !state.enemies.is_empty() {
        state.particles.create_popup(
            gx,
            gy,
            PopupText::Message(GOAL_LOCKED_MESSAGE.to_string()),
            Rgb::RED,
        );
        events.push(GameEvent::GoalRejected);
        return;
    }

    goal.is_reached = true;
    let body = goal.bounds();
    let (cx, cy) = body.center();
    state
        .particles
        .create_explosion(cx, cy, EXPLOSION_PARTICLES, &VICTORY_COLORS);
    state.particles.create_popup(
        cx,
        body.y,
        PopupText::Score(config.combat.goal_score),
        Rgb::WHITE,
    );
    state.score += config.combat.goal_score;
    state.victory = true;
    state.over = true;
    state.running = false;
    state.credits.reset();
    events.push(GameEvent::Victory { score: state.score });
}

fn resolve_collectibles(
    state: &mut GameState,
    config: &PlatformerConfig,
    events: &mut Vec<GameEvent>,
) {
    let body = state.player.bounds();
    for coin in &mut state.collectibles {
        if coin.collected || !body.overlaps(&coin.bounds()) {
            continue;
        }
        coin.collect();
        state.score += config.combat.coin_score;
        events.push(GameEvent::CollectiblePicked { score: state.score });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlayerConfig;

    fn player_at(x: f32, y: f32) -> Player {
        let mut p = Player::new(&PlayerConfig::default());
        p.x = x;
        p.y = y;
        p
    }

    #[test]
    fn overlap_is_strict() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&Rect::new(9.0, 9.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::new(0.0, 10.0, 10.0, 10.0)));
    }

    #[test]
    fn lands_on_top_of_platform() {
        let ground = Rect::new(0.0, 450.0, 800.0, 30.0);
        let mut p = player_at(100.0, 425.0);
        p.vy = 7.0;
        p.is_jumping = true;
        assert!(resolve_platforms(&mut p, &[ground]));
        assert_eq!(p.y, 418.0);
        assert_eq!(p.vy, 0.0);
        assert!(!p.is_jumping);
    }

    #[test]
    fn head_bump_snaps_below() {
        let ledge = Rect::new(50.0, 200.0, 200.0, 20.0);
        let mut p = player_at(100.0, 215.0);
        p.vy = -12.0;
        assert!(!resolve_platforms(&mut p, &[ledge]));
        assert_eq!(p.y, 220.0);
        assert_eq!(p.vy, 0.0);
        assert!(p.is_jumping, "Not grounded after a head bump");
    }

    #[test]
    fn side_contact_pushes_to_nearest_edge() {
        let wall = Rect::new(200.0, 300.0, 20.0, 100.0);
        let mut p = player_at(172.0, 330.0);
        p.vx = 5.0;
        resolve_platforms(&mut p, &[wall]);
        assert_eq!(p.x, 168.0);
        assert_eq!(p.vx, 0.0);

        let mut p = player_at(215.0, 330.0);
        p.vx = -5.0;
        resolve_platforms(&mut p, &[wall]);
        assert_eq!(p.x, 220.0);
    }

    #[test]
    fn no_platform_means_airborne() {
        let mut p = player_at(100.0, 100.0);
        p.is_jumping = false;
        assert!(!resolve_platforms(&mut p, &[]));
        assert!(p.is_jumping);
    }

    #[test]
    fn stomp_requires_falling_onto_top() {
        let enemy = Rect::new(100.0, 418.0, 32.0, 32.0);

        let mut p = player_at(100.0, 392.0);
        p.vy = 4.0;
        assert_eq!(classify_contact(&p, &enemy, 10.0), Some(Contact::Stomp));

        p.vy = -4.0;
        assert_eq!(classify_contact(&p, &enemy, 10.0), Some(Contact::Hit));

        let mut deep = player_at(100.0, 400.0);
        deep.vy = 4.0;
        assert_eq!(classify_contact(&deep, &enemy, 10.0), Some(Contact::Hit));

        let side = player_at(70.0, 418.0);
        assert_eq!(classify_contact(&side, &enemy, 10.0), Some(Contact::Hit));

        let apart = player_at(0.0, 418.0);
        assert_eq!(classify_contact(&apart, &enemy, 10.0), None);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn platform_resolution_is_idempotent(
                px in 0.0f32..768.0,
                py in 0.0f32..448.0,
                rects in proptest::collection::vec(
                    (0.0f32..700.0, 100.0f32..460.0, 20.0f32..300.0, 8.0f32..40.0),
                    1..6,
                )
            ) {
                let platforms: Vec<Platform> = rects
                    .into_iter()
                    .map(|(x, y, w, h)| Rect::new(x, y, w, h))
                    .collect();
                let mut p = player_at(px, py);
                resolve_platforms(&mut p, &platforms);

                let resolved = platforms.iter().all(|pl| !p.bounds().overlaps(pl));
                prop_assume!(resolved);

                let (x, y) = (p.x, p.y);
                resolve_platforms(&mut p, &platforms);
                prop_assert_eq!((p.x, p.y), (x, y));
            }
        }
    }
}
