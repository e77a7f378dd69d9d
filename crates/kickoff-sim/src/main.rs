mod bot;
mod settings;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::EnvFilter;

use kickoff_core::events::GameEvent;
use kickoff_core::game_trait::TurnBasedGame;
use kickoff_core::input::PointerEvent;
use kickoff_core::powerup::PowerUpKind;
use kickoff_futsal::{FutsalEvent, FutsalMatch};

use settings::SimSettings;

fn log_event(tick: u64, event: &FutsalEvent) {
    match event {
        GameEvent::ScoreChanged { team, score } => {
            tracing::info!(tick, %team, score, "Score changed");
        },
        GameEvent::GoalScored { team } => tracing::info!(tick, %team, "GOAL"),
        GameEvent::TurnChanged { team, turn_count } => {
            tracing::debug!(tick, %team, turn_count, "Turn");
        },
        GameEvent::PowerUpGranted { team, kind } => {
            tracing::info!(tick, %team, kind = kind.label(), "Power-up");
        },
        GameEvent::MatchOver { outcome } => tracing::info!(tick, ?outcome, "Final whistle"),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let settings = SimSettings::load();
    tracing::info!(?settings, "Kickoff sim starting");

    let mut game = FutsalMatch::new();
    let mut bot_rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
        None => StdRng::from_os_rng(),
    };
    for event in game.init(&settings.game_config()) {
        log_event(0, &event);
    }

    let dt = 1.0 / game.tick_rate();
    let mut shots = 0u32;
    for tick in 0..settings.max_ticks {
        if game.state().turn.input_enabled()
            && let Some(plan) = bot::plan_shot(game.state(), game.field(), &mut bot_rng)
        {
            game.handle_pointer(PointerEvent::Down(plan.from));
            game.handle_pointer(PointerEvent::Move(plan.to));
            game.handle_pointer(PointerEvent::Up(plan.to));
            shots += 1;
        }

        for event in game.update(dt) {
            log_event(tick, &event);
        }
        if game.is_match_over() {
            break;
        }
    }

    let score = game.state().score;
    match game.outcome() {
        Some(outcome) => tracing::info!(
            ?outcome,
            red = score.red,
            blue = score.blue,
            shots,
            turns = game.state().turn.turn_count,
            "Match finished"
        ),
        None => tracing::warn!(
            red = score.red,
            blue = score.blue,
            shots,
            "Tick budget exhausted before the match ended"
        ),
    }
}
