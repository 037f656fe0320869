use serde::{Deserialize, Serialize};

use castlerun_core::audio::SoundCue;

use crate::entities::EnemyVariant;

/// Something noteworthy that happened during a tick.
///
/// Score fields carry the running total after the event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped,
    EnemyStomped { variant: EnemyVariant, score: u32 },
    CollectiblePicked { score: u32 },
    PlayerDamaged { health: u32 },
    LifeLost { lives_left: u32 },
    GameOver,
    /// The last enemy on the final level fell; the goal is open.
    GoalUnlocked,
    /// The player touched the goal while enemies remained.
    GoalRejected,
    Victory { score: u32 },
    /// Advanced to `level`.
    LevelComplete { level: u32 },
}

impl GameEvent {
    /// Sound cues this event asks the audio collaborator to play, in order.
    pub fn sound_cues(&self) -> &'static [SoundCue] {
        match self {
            GameEvent::Jumped => &[SoundCue::Jump],
            GameEvent::EnemyStomped { .. } => &[SoundCue::Damage, SoundCue::Coin],
            GameEvent::CollectiblePicked { .. } => &[SoundCue::Coin],
            GameEvent::PlayerDamaged { .. } => &[SoundCue::Damage],
            GameEvent::GameOver => &[SoundCue::GameOver],
            GameEvent::Victory { .. } => &[SoundCue::GameComplete],
            GameEvent::LevelComplete { .. } => &[SoundCue::LevelComplete],
            GameEvent::LifeLost { .. } | GameEvent::GoalUnlocked | GameEvent::GoalRejected => &[],
        }
    }

    /// Whether this event ends the session.
    pub fn is_terminal(&self) -> bool {
        matches!(self, GameEvent::GameOver | GameEvent::Victory { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stomp_plays_damage_then_coin() {
        let ev = GameEvent::EnemyStomped {
            variant: EnemyVariant::Shell,
            score: 20,
        };
        assert_eq!(ev.sound_cues(), &[SoundCue::Damage, SoundCue::Coin]);
    }

    #[test]
    fn popups_are_silent() {
        assert!(GameEvent::GoalRejected.sound_cues().is_empty());
        assert!(GameEvent::GoalUnlocked.sound_cues().is_empty());
    }

    #[test]
    fn terminal_events() {
        assert!(GameEvent::GameOver.is_terminal());
        assert!(GameEvent::Victory { score: 0 }.is_terminal());
        assert!(!GameEvent::LevelComplete { level: 2 }.is_terminal());
    }
}
