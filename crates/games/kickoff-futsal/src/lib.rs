pub mod body;
pub mod config;
pub mod field;
pub mod formation;
pub mod physics;
pub mod powerups;
pub mod scoring;
pub mod shot;
pub mod turn;

use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use kickoff_core::events::GameEvent;
use kickoff_core::game_trait::{GameConfig, GameMetadata, TurnBasedGame};
use kickoff_core::geometry::Vec2;
use kickoff_core::input::PointerEvent;
use kickoff_core::powerup::PowerUpKind;
use kickoff_core::schedule::Schedule;
use kickoff_core::team::{Outcome, Team};

use body::{Body, BodyId};
use config::FutsalConfig;
use field::{Field, GoalSide};
use formation::Formation;
use physics::SensorContacts;
use powerups::{PowerUp, PowerUpState};
use scoring::Score;
use shot::{DragState, ShotModifiers, ShotOutcome, pick_token};
use turn::{TurnState, TurnSwitch};

pub type FutsalEvent = GameEvent<PowerUp>;

/// Delayed transitions queued on the match schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduledEvent {
    /// Re-seed the formation after a goal.
    RoundReset,
}

/// Serializable match state, exchanged as a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FutsalState {
    /// Red tokens, blue tokens, then the ball, in insertion order.
    pub bodies: Vec<Body>,
    pub score: Score,
    pub turn: TurnState,
    pub powerups: PowerUpState,
    pub formation: Formation,
    pub contacts: SensorContacts,
    pub schedule: Schedule<ScheduledEvent>,
}

impl FutsalState {
    fn new(formation: Formation) -> Self {
        Self {
            bodies: Vec::new(),
            score: Score::default(),
            turn: TurnState::new(),
            powerups: PowerUpState::new(),
            formation,
            contacts: SensorContacts::default(),
            schedule: Schedule::new(),
        }
    }

    pub fn ball(&self) -> Option<&Body> {
        self.bodies.iter().find(|b| b.is_ball())
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id == id)
    }
}

/// A futsal match: field, bodies, turn flow, scoring and power-ups.
pub struct FutsalMatch {
    config: FutsalConfig,
    game_config: GameConfig,
    field: Field,
    state: FutsalState,
    drag: DragState,
    rng: StdRng,
    paused: bool,
}

impl FutsalMatch {
    /// Match with tuning loaded from disk (see [`FutsalConfig::load`]).
    pub fn new() -> Self {
        Self::with_config(FutsalConfig::load())
    }

    pub fn with_config(config: FutsalConfig) -> Self {
        let game_config = GameConfig::default();
        let field = Field::new(game_config.field_width, game_config.field_height, &config.field);
        let formation = config.formations.first().copied().unwrap_or(Formation::Square);
        let mut game = Self {
            config,
            game_config,
            field,
            state: FutsalState::new(formation),
            drag: DragState::Idle,
            rng: StdRng::from_os_rng(),
            paused: false,
        };
        game.reseed_bodies(formation);
        game
    }

    pub fn state(&self) -> &FutsalState {
        &self.state
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn config(&self) -> &FutsalConfig {
        &self.config
    }

    pub fn game_config(&self) -> &GameConfig {
        &self.game_config
    }

    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    /// Starting formation: the `formation` custom key if present and
    /// valid, else the first configured one.
    fn starting_formation(&self) -> Formation {
        let configured = self.config.formations.first().copied().unwrap_or(Formation::Square);
        match self.game_config.custom.get("formation") {
            Some(value) => serde_json::from_value(value.clone()).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Unknown formation in match config");
                configured
            }),
            None => configured,
        }
    }

    /// Place every body at its kickoff spot with no motion.
    fn reseed_bodies(&mut self, formation: Formation) {
        let physics = &self.config.physics;
        let pitch = &self.field.pitch;
        let mut bodies = Vec::with_capacity(formation::TEAM_SIZE * 2 + 1);
        for team in Team::ALL {
            for position in formation.positions(team, pitch) {
                let id = BodyId(bodies.len() as u16);
                bodies.push(Body::player(id, team, position, physics));
            }
        }
        let id = BodyId(bodies.len() as u16);
        bodies.push(Body::ball(id, pitch.center(), physics));
        self.state.bodies = bodies;
        self.state.formation = formation;
        self.state.contacts = SensorContacts::default();
    }

    fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.state.bodies.iter_mut().find(|b| b.id == id)
    }

    fn begin_drag(&mut self, point: Vec2) {
        if !self.state.turn.input_enabled() {
            tracing::debug!(phase = ?self.state.turn.phase, "Pointer down ignored, input disabled");
            return;
        }
        if self.drag.is_aiming() {
            tracing::debug!("Pointer down ignored, drag already active");
            return;
        }
        let team = self.state.turn.turn;
        let Some(id) = pick_token(&self.state.bodies, team, point) else {
            tracing::debug!(x = point.x, y = point.y, %team, "No token of the acting team under pointer");
            return;
        };
        self.drag.begin(id, point);

        if self.state.powerups.take_size_boost(team) {
            let (scale, density) = (self.config.powerups.giant_scale, self.config.powerups.giant_density);
            if let Some(body) = self.body_mut(id) {
                body.enlarge(scale, density);
                tracing::info!(%team, body = id.0, "Giant token");
            }
        }
    }

    fn release_drag(&mut self, point: Option<Vec2>) {
        let Some((intent, at)) = self.drag.release(point) else {
            return;
        };
        if !self.state.turn.input_enabled() {
            return;
        }
        let team = self.state.turn.turn;
        let effects = self.state.powerups.effects(team);
        let modifiers = ShotModifiers {
            speed_boost: effects.speed_boost,
            enlarged: self.state.body(intent.selected).is_some_and(|b| b.enlarged),
            slowed: effects.slowed,
        };

        match intent.resolve(at, &self.config.shot, modifiers) {
            ShotOutcome::Fired { body, impulse } => {
                let Some(target) = self.body_mut(body) else {
                    return;
                };
                target.apply_impulse(impulse);
                if modifiers.speed_boost {
                    self.state.powerups.consume_speed_boost(team);
                }
                if modifiers.slowed {
                    self.state.powerups.spend_slow(team);
                }
                self.state.turn.begin_shot();
                tracing::debug!(%team, body = body.0, ix = impulse.x, iy = impulse.y, "Shot fired");
            },
            ShotOutcome::Cancelled => {
                tracing::debug!(%team, "Drag below threshold, shot cancelled");
            },
        }
    }

    fn on_goal(&mut self, side: GoalSide, events: &mut Vec<FutsalEvent>) {
        let scorer = side.scorer();
        if !self.state.turn.on_goal(scorer) {
            tracing::debug!(?side, phase = ?self.state.turn.phase, "Ball entered goal, ignored");
            return;
        }
        // A ball drifting in after settle can land mid-drag
        self.drag.cancel();
        let score = self.state.score.increment(scorer);
        tracing::info!(
            team = %scorer,
            red = self.state.score.red,
            blue = self.state.score.blue,
            "Goal"
        );
        events.push(GameEvent::ScoreChanged { team: scorer, score });
        events.push(GameEvent::GoalScored { team: scorer });

        if let Some(winner) = self.state.score.winner(self.game_config.goals_to_win) {
            self.end_match(Outcome::Winner(winner), events);
        } else {
            self.state
                .schedule
                .schedule(self.config.goal_reset_delay, ScheduledEvent::RoundReset);
        }
    }

    fn finish_round_reset(&mut self, events: &mut Vec<FutsalEvent>) {
        let mover = self.state.turn.turn;
        self.state.powerups.end_turn(mover);
        let Some(serving) = self.state.turn.finish_reset() else {
            return;
        };
        let next = self.state.formation.next(&self.config.formations, &mut self.rng);
        self.reseed_bodies(next);
        tracing::info!(formation = next.name(), serving = %serving, "Kickoff");
        events.push(GameEvent::TurnChanged {
            team: serving,
            turn_count: self.state.turn.turn_count,
        });
    }

    fn on_settle(&mut self, events: &mut Vec<FutsalEvent>) {
        let Some(TurnSwitch {
            previous,
            next,
            turn_count,
            limit_reached,
        }) = self.state.turn.on_settle(self.game_config.turn_limit)
        else {
            return;
        };

        for body in &mut self.state.bodies {
            body.revert_size();
        }
        self.state.powerups.end_turn(previous);

        if limit_reached {
            tracing::info!(turn_count, "Turn limit reached");
            let outcome = self.state.score.decide();
            self.end_match(outcome, events);
            return;
        }

        if self.game_config.powerups_enabled {
            self.state.powerups.on_turn_switch(
                turn_count,
                &self.state.bodies,
                &self.field,
                &self.config.powerups,
                &mut self.rng,
            );
        }
        tracing::info!(team = %next, turn_count, "Turn changed");
        events.push(GameEvent::TurnChanged {
            team: next,
            turn_count,
        });
    }

    fn on_pickup(&mut self, team: Team, events: &mut Vec<FutsalEvent>) {
        if let Some(kind) = self.state.powerups.collect(team, &mut self.rng) {
            tracing::info!(%team, kind = kind.label(), "Power-up granted");
            events.push(GameEvent::PowerUpGranted { team, kind });
        }
    }

    fn end_match(&mut self, outcome: Outcome, events: &mut Vec<FutsalEvent>) {
        self.state.turn.end_match(outcome);
        self.state.schedule.clear();
        self.drag.cancel();
        tracing::info!(
            ?outcome,
            red = self.state.score.red,
            blue = self.state.score.blue,
            "Match over"
        );
        events.push(GameEvent::MatchOver { outcome });
    }
}

impl Default for FutsalMatch {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnBasedGame for FutsalMatch {
    type PowerUp = PowerUp;

    fn metadata(&self) -> GameMetadata {
        GameMetadata {
            name: "Futsal".to_string(),
            description: "Flick your players to knock the ball into the opposing goal.".to_string(),
            estimated_match_duration: Duration::from_secs(600),
        }
    }

    fn init(&mut self, config: &GameConfig) -> Vec<FutsalEvent> {
        self.game_config = config.sanitized();
        self.rng = match self.game_config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        self.field = Field::new(
            self.game_config.field_width,
            self.game_config.field_height,
            &self.config.field,
        );
        self.drag.cancel();

        let formation = self.starting_formation();
        self.state = FutsalState::new(formation);
        self.reseed_bodies(formation);
        tracing::info!(
            goals_to_win = self.game_config.goals_to_win,
            turn_limit = self.game_config.turn_limit,
            formation = formation.name(),
            "Match started"
        );

        vec![GameEvent::TurnChanged {
            team: self.state.turn.turn,
            turn_count: self.state.turn.turn_count,
        }]
    }

    fn update(&mut self, dt: f32) -> Vec<FutsalEvent> {
        if self.paused || self.state.turn.is_over() {
            return Vec::new();
        }
        let mut events = Vec::new();

        for due in self.state.schedule.advance(dt) {
            match due {
                ScheduledEvent::RoundReset => self.finish_round_reset(&mut events),
            }
        }

        let pickup = if self.game_config.powerups_enabled {
            self.state.powerups.pickup_area()
        } else {
            None
        };
        let report = physics::step(
            &mut self.state.bodies,
            &mut self.state.contacts,
            &self.field,
            pickup.as_ref(),
            &self.config.physics,
            dt,
        );

        if let Some(side) = report.goal {
            self.on_goal(side, &mut events);
            if self.state.turn.is_over() {
                return events;
            }
        }
        if let Some(team) = report.pickup_touched_by {
            self.on_pickup(team, &mut events);
        }
        if report.settled {
            self.on_settle(&mut events);
        }

        events
    }

    fn handle_pointer(&mut self, event: PointerEvent) -> Vec<FutsalEvent> {
        if self.paused || self.state.turn.is_over() {
            tracing::debug!(?event, "Pointer ignored");
            return Vec::new();
        }
        match event {
            PointerEvent::Down(p) => self.begin_drag(p),
            PointerEvent::Move(p) => self.drag.move_to(p),
            PointerEvent::Up(p) => self.release_drag(Some(p)),
            PointerEvent::Leave => self.release_drag(None),
        }
        Vec::new()
    }

    fn restart(&mut self) -> Vec<FutsalEvent> {
        let config = self.game_config.clone();
        self.init(&config)
    }

    fn resize(&mut self, width: f32, height: f32) {
        if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
            tracing::warn!(width, height, "Ignoring invalid resize");
            return;
        }
        self.game_config.field_width = width;
        self.game_config.field_height = height;
        self.field = Field::new(width, height, &self.config.field);
    }

    fn tick_rate(&self) -> f32 {
        self.config.tick_rate_hz
    }

    kickoff_core::turn_based_game_boilerplate!(state_type: FutsalState);

    fn is_match_over(&self) -> bool {
        self.state.turn.is_over()
    }

    fn outcome(&self) -> Option<Outcome> {
        self.state.turn.outcome()
    }
}
