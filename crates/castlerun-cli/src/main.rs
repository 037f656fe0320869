use std::io::Write;

use castlerun_cli::{HostConfig, JsonLinesRenderer, LogAudio, run_session};
use castlerun_core::collaborators::StaticAssets;
use castlerun_platformer::Game;
use castlerun_platformer::config::PlatformerConfig;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = PlatformerConfig::load();
    let host = HostConfig::from_env();
    tracing::info!(
        ticks = host.ticks,
        frame_every = host.frame_every,
        seed = ?config.seed,
        "castlerun starting"
    );

    let mut game = Game::new(config, LogAudio::default());
    if !game.poll_assets(&StaticAssets { loaded: true }) {
        tracing::error!("Assets failed to load");
        std::process::exit(1);
    }

    let started = if host.final_level {
        game.start_at_final_level()
    } else {
        game.start()
    };
    if !started {
        tracing::error!("Session did not start");
        std::process::exit(1);
    }

    let stdout = std::io::stdout();
    let mut renderer = JsonLinesRenderer::new(stdout.lock());
    let summary = run_session(&mut game, &mut renderer, &host);
    drop(renderer);

    tracing::info!(
        ticks = summary.ticks,
        level = summary.level,
        score = summary.score,
        phase = ?summary.phase,
        "Session finished"
    );

    if !summary.phase_is_terminal() {
        tracing::info!("Tick budget exhausted before the session ended");
    }

    match serde_json::to_string(&summary) {
        Ok(line) => {
            let mut out = std::io::stdout().lock();
            if let Err(e) = writeln!(out, "{line}") {
                tracing::warn!("Failed to write summary: {e}");
            }
        },
        Err(e) => tracing::error!("Failed to serialize summary: {e}"),
    }
}
