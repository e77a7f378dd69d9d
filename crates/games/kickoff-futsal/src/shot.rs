use serde::{Deserialize, Serialize};

use kickoff_core::geometry::Vec2;
use kickoff_core::team::Team;

use crate::body::{Body, BodyId};
use crate::config::ShotConfig;

/// One drag gesture on a selected token.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShotIntent {
    pub selected: BodyId,
    /// Where the pointer went down.
    pub origin: Vec2,
    /// Last known pointer position.
    pub current: Vec2,
}

impl ShotIntent {
    /// Direction of the shot: from the pointer back toward the origin.
    pub fn aim_vector(&self) -> Vec2 {
        self.origin - self.current
    }

    /// Drag strength for aim feedback, in `[0, 1]`.
    pub fn power(&self, config: &ShotConfig) -> f32 {
        if config.power_calibration <= 0.0 {
            return 0.0;
        }
        (self.aim_vector().length() / config.power_calibration).clamp(0.0, 1.0)
    }

    /// Resolve the gesture released at `release`.
    pub fn resolve(&self, release: Vec2, config: &ShotConfig, modifiers: ShotModifiers) -> ShotOutcome {
        let aim = self.origin - release;
        let raw = aim.length();
        if raw <= config.min_drag_distance {
            return ShotOutcome::Cancelled;
        }
        let factor = modifiers.factor(config);
        let magnitude = (raw * config.sensitivity * factor).min(config.max_impulse * factor);
        ShotOutcome::Fired {
            body: self.selected,
            impulse: aim.normalize_or_zero() * magnitude,
        }
    }
}

/// Pointer drag progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum DragState {
    #[default]
    Idle,
    Aiming(ShotIntent),
}

impl DragState {
    /// Start aiming `selected`. Ignored (returns false) while a drag is active.
    pub fn begin(&mut self, selected: BodyId, origin: Vec2) -> bool {
        if self.is_aiming() {
            return false;
        }
        *self = DragState::Aiming(ShotIntent {
            selected,
            origin,
            current: origin,
        });
        true
    }

    pub fn move_to(&mut self, point: Vec2) {
        if let DragState::Aiming(intent) = self {
            intent.current = point;
        }
    }

    /// End the drag. `point` is the release position; `None` (pointer left
    /// the surface) releases at the last known position.
    pub fn release(&mut self, point: Option<Vec2>) -> Option<(ShotIntent, Vec2)> {
        match std::mem::take(self) {
            DragState::Aiming(intent) => Some((intent, point.unwrap_or(intent.current))),
            DragState::Idle => None,
        }
    }

    pub fn cancel(&mut self) {
        *self = DragState::Idle;
    }

    pub fn is_aiming(&self) -> bool {
        matches!(self, DragState::Aiming(_))
    }

    pub fn intent(&self) -> Option<&ShotIntent> {
        match self {
            DragState::Aiming(intent) => Some(intent),
            DragState::Idle => None,
        }
    }
}

/// Power-up effects active for the shooting team at release.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShotModifiers {
    pub speed_boost: bool,
    pub enlarged: bool,
    pub slowed: bool,
}

impl ShotModifiers {
    /// Multiplier applied to both sensitivity and the impulse cap.
    pub fn factor(&self, config: &ShotConfig) -> f32 {
        let mut factor = 1.0;
        if self.speed_boost {
            factor *= config.speed_boost_multiplier;
        }
        if self.enlarged {
            factor *= config.giant_force_factor;
        }
        if self.slowed {
            factor *= config.slow_factor;
        }
        factor
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShotOutcome {
    Fired { body: BodyId, impulse: Vec2 },
    /// Drag too short; nothing happens.
    Cancelled,
}

/// First token of `team` (in insertion order) whose live circle contains `point`.
pub fn pick_token(bodies: &[Body], team: Team, point: Vec2) -> Option<BodyId> {
    bodies
        .iter()
        .find(|b| b.team() == Some(team) && b.contains_point(point))
        .map(|b| b.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PhysicsConfig;

    fn intent(origin: Vec2, current: Vec2) -> ShotIntent {
        ShotIntent {
            selected: BodyId(3),
            origin,
            current,
        }
    }

    #[test]
    fn impulse_points_away_from_drag() {
        let config = ShotConfig::default();
        let i = intent(Vec2::new(100.0, 100.0), Vec2::new(100.0, 100.0));
        match i.resolve(Vec2::new(60.0, 100.0), &config, ShotModifiers::default()) {
            ShotOutcome::Fired { body, impulse } => {
                assert_eq!(body, BodyId(3));
                assert!(impulse.x > 0.0);
                assert!(impulse.y.abs() < 1e-4);
                assert!((impulse.x - 40.0 * config.sensitivity).abs() < 1e-2);
            },
            ShotOutcome::Cancelled => panic!("drag of 40 should fire"),
        }
    }

    #[test]
    fn impulse_capped() {
        let config = ShotConfig::default();
        let i = intent(Vec2::new(400.0, 300.0), Vec2::new(400.0, 300.0));
        let ShotOutcome::Fired { impulse, .. } =
            i.resolve(Vec2::new(400.0, 900.0), &config, ShotModifiers::default())
        else {
            panic!("expected a shot");
        };
        assert!((impulse.length() - config.max_impulse).abs() < 1e-2);
    }

    #[test]
    fn short_drag_cancelled() {
        let config = ShotConfig::default();
        let i = intent(Vec2::new(100.0, 100.0), Vec2::new(100.0, 100.0));
        assert_eq!(
            i.resolve(Vec2::new(103.0, 104.0), &config, ShotModifiers::default()),
            ShotOutcome::Cancelled
        );
        assert_eq!(
            i.resolve(Vec2::new(100.0, 100.0), &config, ShotModifiers::default()),
            ShotOutcome::Cancelled
        );
    }

    #[test]
    fn modifiers_compose_multiplicatively() {
        let config = ShotConfig::default();
        let all = ShotModifiers {
            speed_boost: true,
            enlarged: true,
            slowed: true,
        };
        let expected = config.speed_boost_multiplier * config.giant_force_factor * config.slow_factor;
        assert!((all.factor(&config) - expected).abs() < 1e-5);
        assert_eq!(ShotModifiers::default().factor(&config), 1.0);
    }

    #[test]
    fn slowed_shot_is_weaker_and_boosted_is_stronger() {
        let config = ShotConfig::default();
        let i = intent(Vec2::new(100.0, 100.0), Vec2::new(100.0, 100.0));
        let release = Vec2::new(50.0, 100.0);
        let strength = |m| match i.resolve(release, &config, m) {
            ShotOutcome::Fired { impulse, .. } => impulse.length(),
            ShotOutcome::Cancelled => 0.0,
        };
        let plain = strength(ShotModifiers::default());
        let slowed = strength(ShotModifiers {
            slowed: true,
            ..ShotModifiers::default()
        });
        let boosted = strength(ShotModifiers {
            speed_boost: true,
            ..ShotModifiers::default()
        });
        assert!((slowed / plain - config.slow_factor).abs() < 1e-4);
        assert!((boosted / plain - config.speed_boost_multiplier).abs() < 1e-4);
    }

    #[test]
    fn power_clamped_to_unit_range() {
        let config = ShotConfig::default();
        assert_eq!(intent(Vec2::ZERO, Vec2::ZERO).power(&config), 0.0);
        assert!((intent(Vec2::ZERO, Vec2::new(50.0, 0.0)).power(&config) - 0.5).abs() < 1e-5);
        assert_eq!(intent(Vec2::ZERO, Vec2::new(0.0, 500.0)).power(&config), 1.0);
    }

    #[test]
    fn second_begin_ignored() {
        let mut drag = DragState::default();
        assert!(drag.begin(BodyId(1), Vec2::new(10.0, 10.0)));
        assert!(!drag.begin(BodyId(2), Vec2::new(50.0, 50.0)));
        assert_eq!(drag.intent().map(|i| i.selected), Some(BodyId(1)));
    }

    #[test]
    fn leave_releases_at_last_point() {
        let mut drag = DragState::default();
        drag.begin(BodyId(1), Vec2::new(10.0, 10.0));
        drag.move_to(Vec2::new(40.0, 10.0));
        let (intent, at) = drag.release(None).unwrap();
        assert_eq!(intent.selected, BodyId(1));
        assert_eq!(at, Vec2::new(40.0, 10.0));
        assert!(!drag.is_aiming());
        assert!(drag.release(None).is_none());
    }

    #[test]
    fn move_while_idle_does_nothing() {
        let mut drag = DragState::default();
        drag.move_to(Vec2::new(1.0, 1.0));
        assert_eq!(drag, DragState::Idle);
    }

    #[test]
    fn pick_token_filters_team_and_uses_insertion_order() {
        let config = PhysicsConfig::default();
        let p = Vec2::new(100.0, 100.0);
        let bodies = vec![
            Body::ball(BodyId(0), p, &config),
            Body::player(BodyId(1), Team::Blue, p, &config),
            Body::player(BodyId(2), Team::Red, Vec2::new(110.0, 100.0), &config),
            Body::player(BodyId(3), Team::Red, p, &config),
        ];
        assert_eq!(pick_token(&bodies, Team::Red, p), Some(BodyId(2)));
        assert_eq!(pick_token(&bodies, Team::Blue, p), Some(BodyId(1)));
        assert_eq!(pick_token(&bodies, Team::Red, Vec2::new(500.0, 500.0)), None);
    }
}
