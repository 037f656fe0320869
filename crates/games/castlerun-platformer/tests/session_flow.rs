use castlerun_core::audio::SoundCue;
use castlerun_core::game_trait::SimulationGame;
use castlerun_core::input::{InputState, Key};
use castlerun_core::test_helpers::{RecordingAudio, ScriptedPrompt, hold, run_ticks};

use castlerun_platformer::config::PlatformerConfig;
use castlerun_platformer::events::GameEvent;
use castlerun_platformer::{Game, Phase};

fn new_game(seed: u64) -> Game<RecordingAudio> {
    let config = PlatformerConfig {
        seed: Some(seed),
        ..PlatformerConfig::default()
    };
    let mut game = Game::new(config, RecordingAudio::new());
    game.on_assets_loaded();
    game
}

#[test]
fn full_session_lifecycle() {
    let mut game = new_game(7);
    assert_eq!(game.phase(), Phase::Idle);
    assert!(game.start());
    assert_eq!(game.phase(), Phase::Running);

    // Settle on the ground and walk a little
    run_ticks(&mut game, 60, &InputState::new());
    run_ticks(&mut game, 20, &hold(&[Key::Right]));
    assert!(game.state().frame >= 80);

    assert!(game.toggle_pause());
    assert_eq!(game.phase(), Phase::Paused);
    let frozen = game.serialize_state();
    run_ticks(&mut game, 30, &hold(&[Key::Left, Key::Jump]));
    assert_eq!(frozen, game.serialize_state());
    assert!(game.toggle_pause());

    let mut prompt = ScriptedPrompt::answering(&[false, true]);
    assert!(!game.quit(&mut prompt));
    assert_eq!(game.phase(), Phase::Running);
    assert!(game.quit(&mut prompt));
    assert_eq!(game.phase(), Phase::Idle);
    assert_eq!(prompt.asked.len(), 2);
    assert_eq!(game.state().score, 0);
}

#[test]
fn long_autopilot_run_stays_consistent() {
    let mut game = new_game(1234);
    game.start();
    let right_jump = hold(&[Key::Right, Key::Jump]);
    let left = hold(&[Key::Left]);

    let mut events = Vec::new();
    for i in 0..2_000 {
        let input = if (i / 120) % 2 == 0 { &right_jump } else { &left };
        events.extend(game.tick(input));
        let s = game.state();
        if s.running {
            assert!(s.started && !s.paused && !s.over);
        }
        assert!(s.current_level >= 1 && s.current_level <= 5);
        if s.over {
            break;
        }
    }

    let jumps = events.iter().filter(|e| **e == GameEvent::Jumped).count();
    assert!(jumps > 0);
    assert!(game.audio().play_count(SoundCue::Jump) >= jumps);
}

#[test]
fn snapshot_round_trips_through_json() {
    let mut game = new_game(3);
    game.start();
    run_ticks(&mut game, 5, &InputState::new());
    let snap = game.snapshot();
    let json = serde_json::to_string(&snap).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["level"], 1);
    assert_eq!(value["phase"], "Running");
    assert_eq!(
        value["platforms"].as_array().map(Vec::len),
        Some(game.state().platforms.len())
    );
}

#[test]
fn restart_from_final_level() {
    let mut game = new_game(99);
    assert!(game.start_at_final_level());
    assert!(game.state().goal.is_some());
    assert!(game.restart());
    let s = game.state();
    assert_eq!(s.current_level, 1);
    assert!(s.goal.is_none());
    assert!(s.running);
}
