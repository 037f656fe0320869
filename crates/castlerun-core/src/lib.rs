pub mod audio;
pub mod collaborators;
pub mod game_trait;
pub mod input;
pub mod pause;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use std::collections::VecDeque;

    use crate::audio::{Audio, AudioError, SoundCue};
    use crate::collaborators::{AssetLoader, ConfirmPrompt, StaticAssets};
    use crate::game_trait::SimulationGame;
    use crate::input::{InputState, Key};

    /// One call made against a `RecordingAudio`.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum AudioCall {
        Play(SoundCue),
        Pause(SoundCue),
        Stop(SoundCue),
        SetMuted(bool),
    }

    /// Audio backend that records every call and always succeeds.
    #[derive(Debug, Clone, Default)]
    pub struct RecordingAudio {
        pub calls: Vec<AudioCall>,
    }

    impl RecordingAudio {
        pub fn new() -> Self {
            Self::default()
        }

        /// How many times `cue` was played.
        pub fn play_count(&self, cue: SoundCue) -> usize {
            self.calls
                .iter()
                .filter(|c| **c == AudioCall::Play(cue))
                .count()
        }

        pub fn played(&self, cue: SoundCue) -> bool {
            self.play_count(cue) > 0
        }

        pub fn last(&self) -> Option<&AudioCall> {
            self.calls.last()
        }

        pub fn clear(&mut self) {
            self.calls.clear();
        }
    }

    impl Audio for RecordingAudio {
        fn play(&mut self, cue: SoundCue) -> Result<(), AudioError> {
            self.calls.push(AudioCall::Play(cue));
            Ok(())
        }

        fn pause(&mut self, cue: SoundCue) {
            self.calls.push(AudioCall::Pause(cue));
        }

        fn stop(&mut self, cue: SoundCue) {
            self.calls.push(AudioCall::Stop(cue));
        }

        fn set_muted(&mut self, muted: bool) {
            self.calls.push(AudioCall::SetMuted(muted));
        }
    }

    /// Audio backend whose `play` always fails, as a browser does before the
    /// first user gesture.
    #[derive(Debug, Clone, Default)]
    pub struct FailingAudio {
        pub attempts: usize,
    }

    impl Audio for FailingAudio {
        fn play(&mut self, _cue: SoundCue) -> Result<(), AudioError> {
            self.attempts += 1;
            Err(AudioError::Blocked)
        }

        fn pause(&mut self, _cue: SoundCue) {}

        fn stop(&mut self, _cue: SoundCue) {}

        fn set_muted(&mut self, _muted: bool) {}
    }

    /// Prompt that replays canned answers and records the questions asked.
    /// Answers `false` once the script runs out.
    #[derive(Debug, Clone, Default)]
    pub struct ScriptedPrompt {
        pub answers: VecDeque<bool>,
        pub asked: Vec<String>,
    }

    impl ScriptedPrompt {
        pub fn answering(answers: &[bool]) -> Self {
            Self {
                answers: answers.iter().copied().collect(),
                asked: Vec::new(),
            }
        }
    }

    impl ConfirmPrompt for ScriptedPrompt {
        fn confirm(&mut self, message: &str) -> bool {
            self.asked.push(message.to_string());
            self.answers.pop_front().unwrap_or(false)
        }
    }

    /// Asset loader that reports everything loaded.
    pub fn ready_assets() -> impl AssetLoader {
        StaticAssets { loaded: true }
    }

    pub fn hold(keys: &[Key]) -> InputState {
        InputState::with_keys(keys)
    }

    /// Run N ticks with the same input, returning all accumulated events.
    pub fn run_ticks<G: SimulationGame>(
        game: &mut G,
        n: usize,
        input: &InputState,
    ) -> Vec<G::Event> {
        let mut all_events = Vec::new();
        for _ in 0..n {
            all_events.extend(game.tick(input));
        }
        all_events
    }

    /// Tick until `toggle_pause` is honoured (debounce elapsed) or give up.
    pub fn toggle_pause_when_allowed<G: SimulationGame>(game: &mut G, max_ticks: usize) -> bool {
        let idle = InputState::new();
        for _ in 0..max_ticks {
            if game.toggle_pause() {
                return true;
            }
            game.tick(&idle);
        }
        false
    }

    // ================================================================
    // Simulation Contract Tests
    // ================================================================
    // Generic checks every SimulationGame must pass. Game crates call them
    // from their own tests with a concrete game instance.

    /// Before the session starts, ticking with input must not change state.
    pub fn contract_update_noop_until_started<G: SimulationGame>(game: &mut G) {
        let before = game.serialize_state();
        run_ticks(game, 30, &hold(&[Key::Right, Key::Jump]));
        let after = game.serialize_state();
        assert_eq!(before, after, "State must not change before start");
    }

    /// Pausing must freeze gameplay state; resuming must unfreeze it.
    /// Expects a running game.
    pub fn contract_pause_stops_updates<G: SimulationGame>(game: &mut G) {
        assert!(
            toggle_pause_when_allowed(game, 120),
            "toggle_pause must eventually be honoured on a running game"
        );
        assert!(game.is_paused());
        let before = game.serialize_state();
        run_ticks(game, 30, &hold(&[Key::Right, Key::Jump]));
        let during_pause = game.serialize_state();
        assert_eq!(before, during_pause, "State must not change while paused");

        assert!(
            toggle_pause_when_allowed(game, 120),
            "resume must eventually be honoured"
        );
        assert!(!game.is_paused());
        run_ticks(game, 5, &hold(&[Key::Right]));
        let after_resume = game.serialize_state();
        assert_ne!(during_pause, after_resume, "State must change after resume");
    }

    /// Once over, further ticks must not touch gameplay state.
    pub fn contract_over_is_terminal<G: SimulationGame>(game: &mut G) {
        assert!(game.is_over(), "contract expects a finished game");
        let before = game.serialize_state();
        run_ticks(game, 30, &hold(&[Key::Left, Key::Jump]));
        assert_eq!(before, game.serialize_state(), "State must not change once over");
    }
}
