use crate::config::PlatformerConfig;
use crate::events::GameEvent;
use crate::state::GameState;

/// Apply `amount` damage to the player. The only path that lowers health.
///
/// Health drops, the invulnerability window restarts, then the death branch
/// runs: with a spare life the player respawns at full health (still
/// invulnerable); on the last life the session ends.
pub fn apply_damage(
    state: &mut GameState,
    config: &PlatformerConfig,
    amount: u32,
    events: &mut Vec<GameEvent>,
) {
    let player = &mut state.player;
    player.health = player.health.saturating_sub(amount);
    player.invulnerable = true;
    player.invulnerable_timer = 0;
    events.push(GameEvent::PlayerDamaged {
        health: player.health,
    });

    if player.health > 0 {
        return;
    }

    if player.lives > 1 {
        player.lives -= 1;
        let spawn = &config.player;
        player.reset(spawn.spawn_x, spawn.spawn_y, spawn.max_health);
        tracing::info!(lives_left = player.lives, "Life lost");
        events.push(GameEvent::LifeLost {
            lives_left: player.lives,
        });
    } else {
        player.lives = 0;
        state.over = true;
        state.running = false;
        tracing::info!(score = state.score, level = state.current_level, "Game over");
        events.push(GameEvent::GameOver);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running_state() -> (GameState, PlatformerConfig) {
        let config = PlatformerConfig::default();
        let mut state = GameState::new(&config);
        state.loaded = true;
        state.started = true;
        state.running = true;
        (state, config)
    }

    #[test]
    fn damage_reduces_health_and_grants_invulnerability() {
        let (mut state, config) = running_state();
        state.player.invulnerable_timer = 33;
        let mut events = Vec::new();
        apply_damage(&mut state, &config, 25, &mut events);
        assert_eq!(state.player.health, 75);
        assert!(state.player.invulnerable);
        assert_eq!(state.player.invulnerable_timer, 0);
        assert_eq!(events, vec![GameEvent::PlayerDamaged { health: 75 }]);
    }

    #[test]
    fn last_life_ends_session_without_reset() {
        let (mut state, config) = running_state();
        state.player.lives = 1;
        state.player.health = 25;
        state.player.x = 400.0;
        state.player.y = 200.0;
        let mut events = Vec::new();
        apply_damage(&mut state, &config, 25, &mut events);
        assert!(state.over);
        assert!(!state.running);
        assert!(!state.victory);
        assert_eq!(state.player.lives, 0);
        assert_eq!((state.player.x, state.player.y), (400.0, 200.0));
        assert_eq!(events.last(), Some(&GameEvent::GameOver));
    }

    #[test]
    fn spare_life_respawns_at_spawn() {
        let (mut state, config) = running_state();
        state.player.lives = 2;
        state.player.health = 10;
        state.player.x = 400.0;
        state.player.y = 200.0;
        let mut events = Vec::new();
        apply_damage(&mut state, &config, 25, &mut events);
        assert!(!state.over);
        assert_eq!(state.player.lives, 1);
        assert_eq!(state.player.health, 100);
        assert_eq!((state.player.x, state.player.y), (100.0, 300.0));
        assert!(state.player.invulnerable, "Respawn keeps the invulnerability window");
        assert_eq!(events.last(), Some(&GameEvent::LifeLost { lives_left: 1 }));
    }

    #[test]
    fn overkill_saturates_at_zero() {
        let (mut state, config) = running_state();
        state.player.lives = 1;
        state.player.health = 5;
        apply_damage(&mut state, &config, 1000, &mut Vec::new());
        assert_eq!(state.player.health, 0);
        assert!(state.over);
    }
}
