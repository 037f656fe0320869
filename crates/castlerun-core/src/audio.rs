use serde::{Deserialize, Serialize};

/// Named sound the engine asks the audio collaborator to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    Jump,
    Coin,
    Damage,
    GameOver,
    LevelComplete,
    GameComplete,
    /// Looping background track. Paused/resumed with the session.
    BackgroundMusic,
}

impl SoundCue {
    /// Stable asset name for this cue.
    pub fn name(self) -> &'static str {
        match self {
            SoundCue::Jump => "jump",
            SoundCue::Coin => "coin",
            SoundCue::Damage => "damage",
            SoundCue::GameOver => "gameOver",
            SoundCue::LevelComplete => "levelComplete",
            SoundCue::GameComplete => "gameComplete",
            SoundCue::BackgroundMusic => "backgroundMusic",
        }
    }
}

/// Failure reported by an audio backend. Never fatal to the simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    /// Playback was rejected (e.g. autoplay policy before user interaction).
    Blocked,
    /// The backend has no such sound or could not load it.
    Unavailable(String),
}

impl std::fmt::Display for AudioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blocked => write!(f, "playback blocked by the audio backend"),
            Self::Unavailable(name) => write!(f, "sound {name} is not available"),
        }
    }
}

impl std::error::Error for AudioError {}

/// Audio collaborator consumed by the engine.
///
/// Only `play` can fail; the engine logs and swallows the error at the call
/// site so a tick always completes.
pub trait Audio {
    fn play(&mut self, cue: SoundCue) -> Result<(), AudioError>;

    /// Pause a cue in place (used for the background track).
    fn pause(&mut self, cue: SoundCue);

    /// Stop a cue and rewind it.
    fn stop(&mut self, cue: SoundCue);

    fn set_muted(&mut self, muted: bool);
}

/// Audio backend that does nothing. Useful for headless hosts.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl Audio for NullAudio {
    fn play(&mut self, _cue: SoundCue) -> Result<(), AudioError> {
        Ok(())
    }

    fn pause(&mut self, _cue: SoundCue) {}

    fn stop(&mut self, _cue: SoundCue) {}

    fn set_muted(&mut self, _muted: bool) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cue_names_are_unique() {
        let cues = [
            SoundCue::Jump,
            SoundCue::Coin,
            SoundCue::Damage,
            SoundCue::GameOver,
            SoundCue::LevelComplete,
            SoundCue::GameComplete,
            SoundCue::BackgroundMusic,
        ];
        let mut names: Vec<_> = cues.iter().map(|c| c.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), cues.len());
    }

    #[test]
    fn audio_error_display() {
        assert_eq!(
            AudioError::Unavailable("jump".to_string()).to_string(),
            "sound jump is not available"
        );
    }
}
