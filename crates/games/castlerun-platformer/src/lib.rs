pub mod collision;
pub mod config;
pub mod damage;
pub mod entities;
pub mod events;
pub mod goal;
pub mod level_gen;
pub mod particles;
pub mod physics;
pub mod render;
pub mod state;

use rand::SeedableRng;
use rand::rngs::StdRng;

use castlerun_core::audio::{Audio, SoundCue};
use castlerun_core::collaborators::{AssetLoader, ConfirmPrompt};
use castlerun_core::game_trait::SimulationGame;
use castlerun_core::input::InputState;
use castlerun_core::pause::Pausable;

use config::PlatformerConfig;
use events::GameEvent;
use level_gen::generate_level;
use physics::Player;
use render::FrameSnapshot;
use state::GameState;

pub use state::Phase;

pub const QUIT_PROMPT: &str = "Are you sure you want to quit? Progress will be lost.";

/// The platformer engine: owns the game state, the generator's random
/// source and the audio collaborator.
pub struct Game<A: Audio> {
    config: PlatformerConfig,
    state: GameState,
    audio: A,
    rng: StdRng,
    /// Whether the background track is currently playing.
    music_playing: bool,
}

impl<A: Audio> Game<A> {
    pub fn new(config: PlatformerConfig, audio: A) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            state: GameState::new(&config),
            config,
            audio,
            rng,
            music_playing: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &PlatformerConfig {
        &self.config
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    // ================================================================
    // Lifecycle
    // ================================================================

    /// Check the loader and fire `on_assets_loaded` once it reports ready.
    pub fn poll_assets(&mut self, loader: &dyn AssetLoader) -> bool {
        if !self.state.loaded && loader.all_loaded() {
            self.on_assets_loaded();
        }
        self.state.loaded
    }

    /// Completion callback from the asset loader.
    pub fn on_assets_loaded(&mut self) {
        if self.state.loaded {
            return;
        }
        self.state.loaded = true;
        tracing::info!("Assets loaded");
    }

    /// Begin the session on the current level. Ignored until assets are
    /// loaded and once a session is already under way.
    pub fn start(&mut self) -> bool {
        if !self.state.loaded {
            tracing::debug!("start ignored: assets still loading");
            return false;
        }
        if self.state.started {
            tracing::debug!("start ignored: already started");
            return false;
        }
        if !self.state.set_up {
            self.setup();
        }

        let s = &mut self.state;
        s.started = true;
        s.running = true;
        s.paused = false;
        s.over = false;
        s.victory = false;
        tracing::info!(level = s.current_level, "Session started");
        self.play_music();
        true
    }

    /// Start a session directly on the final level.
    pub fn start_at_final_level(&mut self) -> bool {
        if !self.state.loaded || self.state.started {
            tracing::debug!("start_at_final_level ignored");
            return false;
        }
        self.state.current_level = self.config.level.final_level;
        self.setup();
        self.start()
    }

    /// Generate the current level with a fresh player.
    fn setup(&mut self) {
        let level = generate_level(self.state.current_level, &self.config.level, &mut self.rng);
        self.state.install_level(level);
        self.state.player = Player::new(&self.config.player);
        self.state.particles.clear();
    }

    /// Flip between running and paused. Returns whether the request was
    /// honoured; it is ignored outside a live session, while a previous
    /// toggle is still in flight, and within the debounce window.
    pub fn toggle_pause(&mut self) -> bool {
        let s = &self.state;
        if !s.started || s.over || s.pause_transitioning {
            tracing::debug!(phase = ?s.phase(), "toggle_pause ignored");
            return false;
        }
        if let Some(last) = s.last_pause_change {
            if s.frame.saturating_sub(last) < self.config.timing.pause_debounce_ticks {
                tracing::debug!("toggle_pause debounced");
                return false;
            }
        }

        self.state.pause_transitioning = true;
        self.state.last_pause_change = Some(self.state.frame);

        if self.state.paused {
            self.resume_all();
        } else {
            self.pause_all();
        }
        true
    }

    fn pause_all(&mut self) {
        let s = &mut self.state;
        s.paused = true;
        s.running = false;
        s.player.pause();
        s.enemies.iter_mut().for_each(|e| e.pause());
        s.particles.pause();
        self.pause_music();
        tracing::info!("Paused");
    }

    fn resume_all(&mut self) {
        let s = &mut self.state;
        s.paused = false;
        s.running = true;
        s.player.resume();
        s.enemies.iter_mut().for_each(|e| e.resume());
        s.particles.resume();
        self.play_music();
        tracing::info!("Resumed");
    }

    /// Ask to abandon the session. On confirmation everything returns to
    /// the idle title state; otherwise play continues exactly as before.
    pub fn quit(&mut self, prompt: &mut dyn ConfirmPrompt) -> bool {
        if !self.state.started || self.state.over {
            tracing::debug!("quit ignored: no session in progress");
            return false;
        }

        let was_paused = self.state.paused;
        let was_playing = self.music_playing;
        if !was_paused {
            self.state.paused = true;
            self.state.running = false;
        }
        if was_playing {
            self.pause_music();
        }

        if prompt.confirm(QUIT_PROMPT) {
            self.stop_music();
            self.reset_to_idle();
            tracing::info!("Session quit");
            return true;
        }

        if !was_paused {
            self.state.paused = false;
            self.state.running = true;
        }
        if was_playing {
            self.play_music();
        }
        tracing::debug!("quit cancelled");
        false
    }

    fn reset_to_idle(&mut self) {
        let s = &mut self.state;
        s.started = false;
        s.running = false;
        s.paused = false;
        s.over = false;
        s.victory = false;
        s.score = 0;
        s.current_level = 1;
        s.pause_transitioning = false;
        s.credits.reset();
        self.setup();
    }

    /// Throw the session away and begin again on level 1.
    pub fn restart(&mut self) -> bool {
        if !self.state.loaded {
            tracing::debug!("restart ignored: assets still loading");
            return false;
        }
        self.stop_music();
        self.reset_to_idle();

        let s = &mut self.state;
        s.started = true;
        s.running = true;
        tracing::info!("Session restarted");
        self.play_music();
        true
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.state.muted = !self.state.muted;
        self.audio.set_muted(self.state.muted);
        self.state.muted
    }

    /// Freeze or unfreeze the end credits. Only meaningful after victory.
    pub fn toggle_credits_pause(&mut self) -> bool {
        if !self.state.victory {
            return false;
        }
        self.state.credits.paused = !self.state.credits.paused;
        true
    }

    // ================================================================
    // Simulation
    // ================================================================

    /// Advance gameplay one step and play the cues of what happened.
    /// No-op unless the session is live.
    pub fn update(&mut self, input: &InputState) -> Vec<GameEvent> {
        let events = self.step(input);
        if events.iter().any(|e| matches!(e, GameEvent::Victory { .. })) {
            self.stop_music();
            tracing::info!(score = self.state.score, "Victory");
        }
        for event in &events {
            for &cue in event.sound_cues() {
                self.play_cue(cue);
            }
        }
        events
    }

    fn step(&mut self, input: &InputState) -> Vec<GameEvent> {
        if !self.state.is_live() {
            return Vec::new();
        }

        let mut events = Vec::new();
        let level = &self.config.level;
        let s = &mut self.state;

        s.player.advance(
            input,
            &self.config.physics,
            self.config.player.invulnerable_ticks,
            level.bounds_width,
            level.bounds_height,
            &mut events,
        );
        for enemy in &mut s.enemies {
            enemy.advance(level.bounds_width);
        }
        for coin in &mut s.collectibles {
            coin.advance();
        }
        if let Some(goal) = s.goal.as_mut() {
            goal.advance();
        }

        collision::resolve(s, &self.config, &mut events);

        if !self.state.over {
            self.check_level_complete(&mut events);
        }
        events
    }

    /// Move to the next level once every collectible is taken or every
    /// enemy is gone. Never advances past the final level.
    pub fn check_level_complete(&mut self, events: &mut Vec<GameEvent>) -> bool {
        let s = &self.state;
        let done = s.all_collected() || s.all_enemies_defeated();
        if !done || s.current_level >= self.config.level.final_level {
            return false;
        }

        self.state.current_level += 1;
        let level = generate_level(self.state.current_level, &self.config.level, &mut self.rng);
        self.state.install_level(level);
        let spawn = &self.config.player;
        self.state
            .player
            .reset(spawn.spawn_x, spawn.spawn_y, spawn.max_health);
        tracing::info!(level = self.state.current_level, score = self.state.score, "Level complete");
        events.push(GameEvent::LevelComplete {
            level: self.state.current_level,
        });
        true
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot::capture(&self.state, &self.config.timing)
    }

    // ================================================================
    // Audio
    // ================================================================

    fn play_cue(&mut self, cue: SoundCue) -> bool {
        match self.audio.play(cue) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(cue = cue.name(), "Audio playback failed: {e}");
                false
            },
        }
    }

    fn play_music(&mut self) {
        self.music_playing = self.play_cue(SoundCue::BackgroundMusic);
    }

    fn pause_music(&mut self) {
        self.audio.pause(SoundCue::BackgroundMusic);
        self.music_playing = false;
    }

    fn stop_music(&mut self) {
        self.audio.stop(SoundCue::BackgroundMusic);
        self.music_playing = false;
    }
}

impl<A: Audio> SimulationGame for Game<A> {
    type Event = GameEvent;

    fn tick(&mut self, input: &InputState) -> Vec<GameEvent> {
        let s = &mut self.state;
        s.frame += 1;
        if s.pause_transitioning {
            let since = s.last_pause_change.map_or(u64::MAX, |t| s.frame.saturating_sub(t));
            if since >= self.config.timing.pause_transition_ticks {
                s.pause_transitioning = false;
            }
        }
        s.particles.update();
        if s.victory {
            s.credits.advance(self.config.timing.credits_speed);
        }

        self.update(input)
    }

    fn serialize_state(&self) -> Vec<u8> {
        rmp_serde::to_vec(&self.state).unwrap_or_else(|e| {
            tracing::error!("Game state serialization failed: {e}");
            Vec::new()
        })
    }

    fn toggle_pause(&mut self) -> bool {
        Game::toggle_pause(self)
    }

    fn is_paused(&self) -> bool {
        self.state.paused
    }

    fn is_over(&self) -> bool {
        self.state.over
    }
}
