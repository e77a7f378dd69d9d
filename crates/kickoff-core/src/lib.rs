pub mod events;
pub mod game_trait;
pub mod geometry;
pub mod input;
pub mod powerup;
pub mod schedule;
pub mod team;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::events::GameEvent;
    use crate::game_trait::{GameConfig, TurnBasedGame};
    use crate::geometry::Vec2;
    use crate::input::PointerEvent;

    /// Create a seeded GameConfig for an 800x600 field with the given goal target.
    pub fn default_config(goals_to_win: u32) -> GameConfig {
        GameConfig {
            goals_to_win,
            seed: Some(42),
            ..GameConfig::default()
        }
    }

    /// Run N game ticks, returning all accumulated events.
    pub fn run_game_ticks<G: TurnBasedGame>(
        game: &mut G,
        n: usize,
        dt: f32,
    ) -> Vec<GameEvent<G::PowerUp>> {
        let mut all_events = Vec::new();
        for _ in 0..n {
            all_events.extend(game.update(dt));
        }
        all_events
    }

    /// Press at `from`, drag to `to`, release there.
    pub fn drag<G: TurnBasedGame>(game: &mut G, from: Vec2, to: Vec2) -> Vec<GameEvent<G::PowerUp>> {
        let mut events = game.handle_pointer(PointerEvent::Down(from));
        events.extend(game.handle_pointer(PointerEvent::Move(to)));
        events.extend(game.handle_pointer(PointerEvent::Up(to)));
        events
    }

    /// Assert that the game's serialized state differs from `before`.
    pub fn assert_game_state_changed<G: TurnBasedGame>(game: &G, before: &[u8]) {
        let after = game.serialize_state();
        assert_ne!(
            before,
            &after[..],
            "Game state should have changed after operation"
        );
    }

    // ================================================================
    // Game Trait Contract Tests
    // ================================================================
    // Generic checks every TurnBasedGame implementation must pass. Game
    // crates call them from their own tests with a concrete game instance.

    /// After init(), serialize_state() must return non-empty bytes.
    pub fn contract_init_creates_state<G: TurnBasedGame>(game: &mut G) {
        game.init(&default_config(3));
        let state = game.serialize_state();
        assert!(
            !state.is_empty(),
            "serialize_state() must return non-empty bytes after init"
        );
    }

    /// serialize_state → apply_state must be stable after one roundtrip.
    pub fn contract_state_roundtrip_preserves<G: TurnBasedGame>(game: &mut G) {
        let state_a = game.serialize_state();
        game.apply_state(&state_a);
        let state_b = game.serialize_state();
        game.apply_state(&state_b);
        let state_c = game.serialize_state();
        assert_eq!(
            state_b, state_c,
            "State must be stable after serialize→apply→serialize roundtrip"
        );
    }

    /// Garbage bytes must leave the state untouched.
    pub fn contract_malformed_state_ignored<G: TurnBasedGame>(game: &mut G) {
        let before = game.serialize_state();
        game.apply_state(&[0xc1, 0xff, 0x00, 0x13]);
        assert_eq!(before, game.serialize_state(), "Malformed snapshot must be ignored");
    }

    /// pause() must freeze the simulation, resume() must unfreeze it.
    ///
    /// `kick` must put something in motion so that an unpaused update
    /// observably changes state.
    pub fn contract_pause_stops_updates<G: TurnBasedGame>(game: &mut G, kick: impl FnOnce(&mut G)) {
        kick(game);
        game.pause();
        assert!(game.is_paused());
        let before = game.serialize_state();
        game.update(1.0 / 60.0);
        let during_pause = game.serialize_state();
        assert_eq!(before, during_pause, "State must not change while paused");

        game.resume();
        assert!(!game.is_paused());
        game.update(1.0 / 60.0);
        let after_resume = game.serialize_state();
        assert_ne!(during_pause, after_resume, "State must change after resume");
    }

    /// restart() must bring the match back to its initial state.
    pub fn contract_restart_resets<G: TurnBasedGame>(game: &mut G, kick: impl FnOnce(&mut G)) {
        game.init(&default_config(3));
        let initial = game.serialize_state();
        kick(game);
        run_game_ticks(game, 5, 1.0 / 60.0);
        assert_game_state_changed(game, &initial);
        game.restart();
        assert!(!game.is_match_over());
        assert_eq!(
            initial,
            game.serialize_state(),
            "restart() must reproduce the initial state"
        );
    }
}
