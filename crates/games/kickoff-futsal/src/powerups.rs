use rand::Rng;
use serde::{Deserialize, Serialize};

use kickoff_core::geometry::{Rect, Vec2};
use kickoff_core::powerup::{PowerUpKind, choose_next};
use kickoff_core::team::Team;

use crate::body::Body;
use crate::config::PowerUpConfig;
use crate::field::Field;

/// Effects a mystery box can grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUp {
    /// Next fired shot of the team is much stronger.
    SpeedBoost,
    /// Next selected token becomes a giant for the rest of the turn.
    SizeBoost,
    /// The opposing team's next turn is weakened.
    SlowOpponent,
}

impl PowerUpKind for PowerUp {
    const ALL: &'static [Self] = &[PowerUp::SpeedBoost, PowerUp::SizeBoost, PowerUp::SlowOpponent];

    fn label(&self) -> &'static str {
        match self {
            PowerUp::SpeedBoost => "Speed Boost",
            PowerUp::SizeBoost => "Giant Player",
            PowerUp::SlowOpponent => "Slow Opponent",
        }
    }
}

/// The mystery box sitting on the pitch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MysteryBox {
    pub position: Vec2,
    pub half_size: f32,
    /// Turn count when it appeared.
    pub spawned_at: u32,
}

impl MysteryBox {
    pub fn area(&self) -> Rect {
        Rect::from_center(self.position, self.half_size, self.half_size)
    }
}

/// Pending effects held by one team.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamEffects {
    pub speed_boost: bool,
    pub size_boost: bool,
    pub slowed: bool,
    /// A shot of this turn already fired under the slow effect.
    pub slow_spent: bool,
}

/// Mystery box lifecycle and per-team effects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PowerUpState {
    pub mystery_box: Option<MysteryBox>,
    /// Turn count of the most recent spawn.
    pub last_spawn_turn: Option<u32>,
    pub last_granted: Option<PowerUp>,
    effects: [TeamEffects; 2],
}

impl PowerUpState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn effects(&self, team: Team) -> TeamEffects {
        self.effects[team.index()]
    }

    /// Sensor area of the box, if one is on the pitch.
    pub fn pickup_area(&self) -> Option<Rect> {
        self.mystery_box.as_ref().map(MysteryBox::area)
    }

    /// Age out an uncollected box and spawn a new one when due.
    /// Returns the spawn position when a box appears.
    pub fn on_turn_switch<R: Rng + ?Sized>(
        &mut self,
        turn_count: u32,
        bodies: &[Body],
        field: &Field,
        config: &PowerUpConfig,
        rng: &mut R,
    ) -> Option<Vec2> {
        if let Some(b) = self.mystery_box
            && turn_count >= b.spawned_at + config.lifetime_turns
        {
            tracing::debug!(turn_count, "Mystery box expired");
            self.mystery_box = None;
        }

        if self.mystery_box.is_some() {
            return None;
        }

        let due = match self.last_spawn_turn {
            None => turn_count >= config.first_spawn_turn,
            Some(last) => {
                let gap = rng.random_range(config.min_gap..=config.max_gap.max(config.min_gap));
                turn_count.saturating_sub(last) >= gap
            },
        };
        if !due {
            return None;
        }

        let position = spawn_point(bodies, field, config, rng);
        self.mystery_box = Some(MysteryBox {
            position,
            half_size: config.half_size,
            spawned_at: turn_count,
        });
        self.last_spawn_turn = Some(turn_count);
        tracing::debug!(turn_count, x = position.x, y = position.y, "Mystery box spawned");
        Some(position)
    }

    /// A token of `team` touched the box: remove it and grant a kind.
    pub fn collect<R: Rng + ?Sized>(&mut self, team: Team, rng: &mut R) -> Option<PowerUp> {
        self.mystery_box.take()?;
        let kind = choose_next(self.last_granted, rng);
        self.grant(team, kind);
        Some(kind)
    }

    /// Store the effect of `kind` for `team`.
    pub fn grant(&mut self, team: Team, kind: PowerUp) {
        match kind {
            PowerUp::SpeedBoost => self.effects[team.index()].speed_boost = true,
            PowerUp::SizeBoost => self.effects[team.index()].size_boost = true,
            PowerUp::SlowOpponent => {
                // A fresh slow always covers the victim's next shot, even one
                // granted while the victim's own shot is still rolling
                let victim = &mut self.effects[team.other().index()];
                victim.slowed = true;
                victim.slow_spent = false;
            },
        }
        self.last_granted = Some(kind);
    }

    /// Use up a stored size boost on selection.
    pub fn take_size_boost(&mut self, team: Team) -> bool {
        std::mem::take(&mut self.effects[team.index()].size_boost)
    }

    /// Use up a stored speed boost when a shot fires.
    pub fn consume_speed_boost(&mut self, team: Team) {
        self.effects[team.index()].speed_boost = false;
    }

    /// A shot fired while slowed.
    pub fn spend_slow(&mut self, team: Team) {
        self.effects[team.index()].slow_spent = true;
    }

    /// `team`'s turn is over. The slow effect goes away once a shot has
    /// been taken under it.
    pub fn end_turn(&mut self, team: Team) {
        let effects = &mut self.effects[team.index()];
        if effects.slow_spent {
            effects.slowed = false;
            effects.slow_spent = false;
        }
    }
}

/// Random point in the central window clear of every token, or the
/// viewport center when no attempt succeeds.
fn spawn_point<R: Rng + ?Sized>(
    bodies: &[Body],
    field: &Field,
    config: &PowerUpConfig,
    rng: &mut R,
) -> Vec2 {
    let (w, h) = (field.width, field.height);
    for _ in 0..config.spawn_attempts {
        let candidate = Vec2::new(
            rng.random_range(w * 0.3..=w * 0.7),
            rng.random_range(h * 0.25..=h * 0.75),
        );
        if field.is_clear(candidate, bodies, config.spawn_clearance) {
            return candidate;
        }
    }
    Vec2::new(w / 2.0, h / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::BodyId;
    use crate::config::{FieldConfig, PhysicsConfig};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn field() -> Field {
        Field::new(800.0, 600.0, &FieldConfig::default())
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn first_box_appears_on_first_spawn_turn() {
        let config = PowerUpConfig::default();
        let f = field();
        let mut rng = rng();
        let mut state = PowerUpState::new();
        for turn in 1..config.first_spawn_turn {
            assert_eq!(state.on_turn_switch(turn, &[], &f, &config, &mut rng), None);
        }
        let pos = state
            .on_turn_switch(config.first_spawn_turn, &[], &f, &config, &mut rng)
            .unwrap();
        assert!(pos.x >= 240.0 && pos.x <= 560.0);
        assert!(pos.y >= 150.0 && pos.y <= 450.0);
        assert_eq!(state.last_spawn_turn, Some(config.first_spawn_turn));
    }

    #[test]
    fn uncollected_box_expires_after_lifetime() {
        let config = PowerUpConfig::default();
        let f = field();
        let mut rng = rng();
        let mut state = PowerUpState::new();
        state.on_turn_switch(3, &[], &f, &config, &mut rng);
        state.on_turn_switch(4, &[], &f, &config, &mut rng);
        assert!(state.mystery_box.is_some());
        // The old box is gone at 5; a replacement may appear the same turn
        state.on_turn_switch(5, &[], &f, &config, &mut rng);
        assert!(state.mystery_box.is_none_or(|b| b.spawned_at == 5));
    }

    #[test]
    fn respawn_waits_for_gap() {
        let config = PowerUpConfig::default();
        let f = field();
        let mut rng = rng();
        let mut state = PowerUpState::new();
        state.on_turn_switch(3, &[], &f, &config, &mut rng);
        state.collect(Team::Red, &mut rng);
        assert_eq!(state.on_turn_switch(4, &[], &f, &config, &mut rng), None);
        let mut spawned_at = None;
        for turn in 5..=6 {
            if state.on_turn_switch(turn, &[], &f, &config, &mut rng).is_some() {
                spawned_at = Some(turn);
                break;
            }
        }
        let turn = spawned_at.expect("a box within the maximum gap");
        assert!(turn - 3 >= config.min_gap && turn - 3 <= config.max_gap);
    }

    #[test]
    fn spawn_avoids_tokens_and_falls_back_to_center() {
        let config = PowerUpConfig::default();
        let f = field();
        let physics = PhysicsConfig::default();
        // Tokens on a grid covering the whole window block every attempt
        let mut bodies = Vec::new();
        let mut id = 0;
        let mut x = 220.0;
        while x <= 580.0 {
            let mut y = 130.0;
            while y <= 470.0 {
                bodies.push(Body::player(BodyId(id), Team::Red, Vec2::new(x, y), &physics));
                id += 1;
                y += 40.0;
            }
            x += 40.0;
        }
        let mut rng = rng();
        let pos = spawn_point(&bodies, &f, &config, &mut rng);
        assert_eq!(pos, Vec2::new(400.0, 300.0));

        let lone = vec![Body::player(BodyId(0), Team::Blue, Vec2::new(400.0, 300.0), &physics)];
        for _ in 0..50 {
            let pos = spawn_point(&lone, &f, &config, &mut rng);
            if pos != Vec2::new(400.0, 300.0) {
                assert!(pos.distance(lone[0].position) >= config.spawn_clearance);
            }
        }
    }

    #[test]
    fn collect_grants_effects() {
        let mut state = PowerUpState::new();
        let mut rng = rng();
        let f = field();
        let config = PowerUpConfig::default();
        assert_eq!(state.collect(Team::Red, &mut rng), None, "nothing to collect");

        state.on_turn_switch(3, &[], &f, &config, &mut rng);
        let kind = state.collect(Team::Red, &mut rng).unwrap();
        assert!(state.mystery_box.is_none());
        let red = state.effects(Team::Red);
        let blue = state.effects(Team::Blue);
        match kind {
            PowerUp::SpeedBoost => assert!(red.speed_boost),
            PowerUp::SizeBoost => assert!(red.size_boost),
            PowerUp::SlowOpponent => assert!(blue.slowed && !red.slowed),
        }
    }

    #[test]
    fn effects_consumed_individually() {
        let mut state = PowerUpState::new();
        state.effects[Team::Blue.index()] = TeamEffects {
            speed_boost: true,
            size_boost: true,
            slowed: true,
            slow_spent: false,
        };
        assert!(state.take_size_boost(Team::Blue));
        assert!(!state.take_size_boost(Team::Blue));
        state.consume_speed_boost(Team::Blue);
        assert!(state.effects(Team::Blue).slowed);
        state.spend_slow(Team::Blue);
        state.end_turn(Team::Blue);
        assert_eq!(state.effects(Team::Blue), TeamEffects::default());
    }

    #[test]
    fn slow_survives_turn_it_was_granted_in() {
        let mut state = PowerUpState::new();
        // Blue grabs the box while red's shot is still moving
        state.grant(Team::Blue, PowerUp::SlowOpponent);
        state.end_turn(Team::Red);
        assert!(state.effects(Team::Red).slowed);

        // Red's next shot is slowed, then the effect is gone
        state.spend_slow(Team::Red);
        state.end_turn(Team::Red);
        assert!(!state.effects(Team::Red).slowed);
    }

    #[test]
    fn regranted_slow_covers_the_next_shot() {
        let mut state = PowerUpState::new();
        state.grant(Team::Red, PowerUp::SlowOpponent);
        state.spend_slow(Team::Blue);
        // Hit again during the slowed shot
        state.grant(Team::Red, PowerUp::SlowOpponent);
        state.end_turn(Team::Blue);
        assert!(state.effects(Team::Blue).slowed);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn grants_never_repeat_consecutively(seed in any::<u64>(), grants in 2usize..40) {
                let mut rng = StdRng::seed_from_u64(seed);
                let mut state = PowerUpState::new();
                let mut previous = None;
                for i in 0..grants {
                    state.mystery_box = Some(MysteryBox {
                        position: Vec2::ZERO,
                        half_size: 20.0,
                        spawned_at: i as u32,
                    });
                    let team = if i % 2 == 0 { Team::Red } else { Team::Blue };
                    let kind = state.collect(team, &mut rng).unwrap();
                    prop_assert_ne!(Some(kind), previous);
                    previous = Some(kind);
                }
            }
        }
    }
}
