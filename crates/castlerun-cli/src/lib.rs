use std::io::Write;

use serde::Serialize;

use castlerun_core::audio::{Audio, AudioError, SoundCue};
use castlerun_core::collaborators::ConfirmPrompt;
use castlerun_core::game_trait::SimulationGame;
use castlerun_core::input::{InputState, Key};
use castlerun_platformer::render::{FrameSnapshot, Renderer};
use castlerun_platformer::state::GameState;
use castlerun_platformer::{Game, Phase};

/// Host-side knobs, read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct HostConfig {
    /// Hard cap on ticks to run.
    pub ticks: u64,
    /// Emit a frame every N ticks. 0 disables frame output.
    pub frame_every: u64,
    /// Begin on the final level.
    pub final_level: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            ticks: 3_600,
            frame_every: 60,
            final_level: false,
        }
    }
}

impl HostConfig {
    /// Defaults overridden by `CASTLERUN_TICKS`, `CASTLERUN_FRAME_EVERY` and
    /// `CASTLERUN_FINAL_LEVEL`.
    pub fn from_env() -> Self {
        let mut config = HostConfig::default();
        if let Ok(val) = std::env::var("CASTLERUN_TICKS")
            && let Ok(n) = val.parse()
        {
            config.ticks = n;
        }
        if let Ok(val) = std::env::var("CASTLERUN_FRAME_EVERY")
            && let Ok(n) = val.parse()
        {
            config.frame_every = n;
        }
        if let Ok(val) = std::env::var("CASTLERUN_FINAL_LEVEL") {
            config.final_level = matches!(val.as_str(), "1" | "true" | "yes");
        }
        config
    }
}

/// Audio backend for a terminal: every cue becomes a trace line.
#[derive(Debug, Default)]
pub struct LogAudio {
    muted: bool,
}

impl Audio for LogAudio {
    fn play(&mut self, cue: SoundCue) -> Result<(), AudioError> {
        if !self.muted {
            tracing::debug!(cue = cue.name(), "play");
        }
        Ok(())
    }

    fn pause(&mut self, cue: SoundCue) {
        tracing::debug!(cue = cue.name(), "pause");
    }

    fn stop(&mut self, cue: SoundCue) {
        tracing::debug!(cue = cue.name(), "stop");
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }
}

/// Prompt with a fixed answer.
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

impl ConfirmPrompt for FixedAnswer {
    fn confirm(&mut self, message: &str) -> bool {
        tracing::info!(answer = self.0, "{message}");
        self.0
    }
}

/// Writes each snapshot as one JSON line.
pub struct JsonLinesRenderer<W: Write> {
    out: W,
    failed: bool,
}

impl<W: Write> JsonLinesRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, failed: false }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for JsonLinesRenderer<W> {
    fn draw(&mut self, frame: &FrameSnapshot) {
        if self.failed {
            return;
        }
        let written = serde_json::to_writer(&mut self.out, frame)
            .map_err(std::io::Error::from)
            .and_then(|()| self.out.write_all(b"\n"));
        if let Err(e) = written {
            // Stop writing after the first failure (e.g. closed pipe)
            tracing::warn!("Frame output failed: {e}");
            self.failed = true;
        }
    }
}

/// Simple bot: runs toward the far wall, hops regularly, and turns around at
/// the edges.
#[derive(Debug, Clone)]
pub struct Autopilot {
    heading: Key,
    tick: u64,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            heading: Key::Right,
            tick: 0,
        }
    }
}

const HOP_EVERY: u64 = 45;
const EDGE_MARGIN: f32 = 8.0;

impl Autopilot {
    pub fn next_input(&mut self, state: &GameState, bounds_width: f32) -> InputState {
        self.tick += 1;
        let player = &state.player;
        if player.x <= EDGE_MARGIN {
            self.heading = Key::Right;
        } else if player.x + player.width >= bounds_width - EDGE_MARGIN {
            self.heading = Key::Left;
        }

        let mut input = InputState::new();
        input.press(self.heading);
        if self.tick % HOP_EVERY == 0 {
            input.press(Key::Jump);
        }
        input
    }
}

/// End-of-run report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub ticks: u64,
    pub phase: Phase,
    pub level: u32,
    pub score: u32,
    pub lives: u32,
    pub events: usize,
}

impl SessionSummary {
    pub fn phase_is_terminal(&self) -> bool {
        matches!(self.phase, Phase::GameOver | Phase::Victory)
    }
}

/// Drive a started game until it ends or the tick budget runs out.
pub fn run_session<A: Audio, R: Renderer>(
    game: &mut Game<A>,
    renderer: &mut R,
    host: &HostConfig,
) -> SessionSummary {
    let mut pilot = Autopilot::default();
    let bounds_width = game.config().level.bounds_width;
    let mut ticks = 0;
    let mut event_count = 0;

    while ticks < host.ticks && !game.is_over() {
        let input = pilot.next_input(game.state(), bounds_width);
        let events = game.tick(&input);
        ticks += 1;
        for event in &events {
            tracing::debug!(tick = ticks, ?event, "event");
        }
        event_count += events.len();

        if host.frame_every > 0 && ticks % host.frame_every == 0 {
            renderer.draw(&game.snapshot());
        }
    }
    renderer.draw(&game.snapshot());

    let state = game.state();
    SessionSummary {
        ticks,
        phase: state.phase(),
        level: state.current_level,
        score: state.score,
        lives: state.player.lives,
        events: event_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use castlerun_platformer::config::PlatformerConfig;

    fn started_game() -> Game<LogAudio> {
        let config = PlatformerConfig {
            seed: Some(5),
            ..PlatformerConfig::default()
        };
        let mut game = Game::new(config, LogAudio::default());
        game.on_assets_loaded();
        assert!(game.start());
        game
    }

    #[test]
    fn autopilot_turns_at_edges() {
        let mut state = GameState::new(&PlatformerConfig::default());
        let mut pilot = Autopilot::default();
        assert!(pilot.next_input(&state, 800.0).is_pressed(Key::Right));

        state.player.x = 800.0 - state.player.width - EDGE_MARGIN;
        assert!(pilot.next_input(&state, 800.0).is_pressed(Key::Left));

        // Keeps heading left across the middle of the field
        state.player.x = 400.0;
        assert!(pilot.next_input(&state, 800.0).is_pressed(Key::Left));

        state.player.x = EDGE_MARGIN;
        assert!(pilot.next_input(&state, 800.0).is_pressed(Key::Right));
    }

    #[test]
    fn autopilot_hops_periodically() {
        let game = started_game();
        let mut pilot = Autopilot::default();
        let hops = (0..HOP_EVERY * 3)
            .filter(|_| pilot.next_input(game.state(), 800.0).is_pressed(Key::Jump))
            .count();
        assert_eq!(hops, 3);
    }

    #[test]
    fn renderer_writes_one_line_per_frame() {
        let mut game = started_game();
        let mut renderer = JsonLinesRenderer::new(Vec::new());
        let host = HostConfig {
            ticks: 30,
            frame_every: 10,
            final_level: false,
        };
        let summary = run_session(&mut game, &mut renderer, &host);
        let out = String::from_utf8(renderer.into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), summary.ticks as usize / 10 + 1);
        for line in lines {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            assert!(value["frame"].as_u64().is_some());
        }
    }

    #[test]
    fn session_respects_tick_budget() {
        let mut game = started_game();
        let mut renderer = JsonLinesRenderer::new(std::io::sink());
        let host = HostConfig {
            ticks: 120,
            frame_every: 0,
            final_level: false,
        };
        let summary = run_session(&mut game, &mut renderer, &host);
        assert!(summary.ticks <= 120);
        assert_eq!(summary.phase_is_terminal(), game.is_over());
        assert!(summary.level >= 1);
    }

    #[test]
    fn fixed_answer_prompt() {
        let mut game = started_game();
        assert!(!game.quit(&mut FixedAnswer(false)));
        assert_eq!(game.phase(), Phase::Running);
        assert!(game.quit(&mut FixedAnswer(true)));
        assert_eq!(game.phase(), Phase::Idle);
    }

    #[test]
    fn log_audio_never_fails() {
        let mut audio = LogAudio::default();
        audio.set_muted(true);
        assert!(audio.play(SoundCue::Coin).is_ok());
    }
}
