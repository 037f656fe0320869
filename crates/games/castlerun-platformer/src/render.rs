use serde::Serialize;

use crate::collision::{Bounds, Rect};
use crate::config::TimingConfig;
use crate::entities::EnemyVariant;
use crate::physics::{CharacterVariant, Facing};
use crate::state::{GameState, Phase};

/// Read-only view of one frame, everything a renderer needs to draw it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameSnapshot {
    pub frame: u64,
    pub phase: Phase,
    pub level: u32,
    pub score: u32,
    pub muted: bool,
    pub player: PlayerView,
    pub platforms: Vec<Rect>,
    pub enemies: Vec<EnemyView>,
    pub collectibles: Vec<CollectibleView>,
    pub goal: Option<GoalView>,
    pub particles: Vec<ParticleView>,
    pub popups: Vec<PopupView>,
    /// Present only after victory.
    pub credits_offset: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub rect: Rect,
    pub facing: Facing,
    pub walk_frame: u8,
    pub character: CharacterVariant,
    pub health: u32,
    pub lives: u32,
    /// False on the "off" beats of the invulnerability blink.
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnemyView {
    pub rect: Rect,
    pub variant: EnemyVariant,
    pub frame: u8,
    pub facing_left: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectibleView {
    pub rect: Rect,
    pub frame: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalView {
    pub rect: Rect,
    pub castle: Rect,
    pub frame: u8,
    pub unlocked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticleView {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub color: String,
    pub alpha: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopupView {
    pub x: f32,
    pub y: f32,
    pub text: String,
    pub color: String,
    pub alpha: f32,
}

/// Renderer collaborator. Draws a snapshot; never mutates the simulation.
pub trait Renderer {
    fn draw(&mut self, frame: &FrameSnapshot);
}

impl FrameSnapshot {
    pub fn capture(state: &GameState, timing: &TimingConfig) -> Self {
        let player = &state.player;
        Self {
            frame: state.frame,
            phase: state.phase(),
            level: state.current_level,
            score: state.score,
            muted: state.muted,
            player: PlayerView {
                rect: player.bounds(),
                facing: player.facing,
                walk_frame: player.walk_frame,
                character: player.character,
                health: player.health,
                lives: player.lives,
                visible: player.blink_visible(state.frame),
            },
            platforms: state.platforms.clone(),
            enemies: state
                .enemies
                .iter()
                .map(|e| EnemyView {
                    rect: e.bounds(),
                    variant: e.variant,
                    frame: e.anim_frame,
                    facing_left: e.direction < 0.0,
                })
                .collect(),
            collectibles: state
                .collectibles
                .iter()
                .filter(|c| !c.collected)
                .map(|c| CollectibleView {
                    rect: c.bounds(),
                    frame: c.frame,
                })
                .collect(),
            goal: state.goal.as_ref().map(|g| GoalView {
                rect: g.bounds(),
                castle: Rect::new(g.castle.x, g.castle.y, g.castle.width, g.castle.height),
                frame: g.anim_frame,
                unlocked: g.can_be_reached,
            }),
            particles: state
                .particles
                .particles()
                .map(|p| ParticleView {
                    x: p.x,
                    y: p.y,
                    size: p.size,
                    color: p.color.to_hex(),
                    alpha: p.alpha(),
                })
                .collect(),
            popups: state
                .particles
                .popups()
                .iter()
                .map(|p| PopupView {
                    x: p.x,
                    y: p.y,
                    text: p.text.to_string(),
                    color: p.color.to_hex(),
                    alpha: p.alpha(),
                })
                .collect(),
            credits_offset: state.victory.then(|| state.credits.offset(timing)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlatformerConfig;
    use crate::entities::Collectible;
    use crate::particles::{PopupText, Rgb};

    #[test]
    fn snapshot_hides_collected_items_and_blinks() {
        let config = PlatformerConfig::default();
        let mut state = GameState::new(&config);
        state.loaded = true;
        state.collectibles = vec![
            Collectible::new(10.0, 10.0, 16.0),
            Collectible::new(50.0, 10.0, 16.0),
        ];
        state.collectibles[0].collect();
        state.player.invulnerable = true;
        state.frame = 3;
        state
            .particles
            .create_popup(0.0, 0.0, PopupText::Score(10), Rgb::WHITE);

        let snap = FrameSnapshot::capture(&state, &config.timing);
        assert_eq!(snap.phase, Phase::Idle);
        assert_eq!(snap.collectibles.len(), 1);
        assert_eq!(snap.collectibles[0].rect.x, 50.0);
        assert!(!snap.player.visible);
        assert_eq!(snap.popups[0].text, "+10");
        assert_eq!(snap.popups[0].color, "#ffffff");
        assert_eq!(snap.credits_offset, None);
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let config = PlatformerConfig::default();
        let state = GameState::new(&config);
        let snap = FrameSnapshot::capture(&state, &config.timing);
        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["phase"], "Loading");
        assert_eq!(json["player"]["rect"]["x"], 100.0);
    }
}
