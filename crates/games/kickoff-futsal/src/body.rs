use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

use kickoff_core::geometry::Vec2;
use kickoff_core::team::Team;

use crate::config::PhysicsConfig;

/// Stable handle to a body, assigned in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BodyId(pub u16);

/// What a dynamic body is. Drives collision filtering and hit-testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    Player { team: Team },
    Ball,
}

/// A dynamic circular rigid body: a player token or the ball.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Body {
    pub id: BodyId,
    pub kind: BodyKind,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Radians per second.
    pub angular_velocity: f32,
    /// Live radius (enlarged while a giant).
    pub radius: f32,
    pub base_radius: f32,
    pub density: f32,
    pub base_density: f32,
    /// Area × density; kept in sync by [`Body::set_shape`].
    pub mass: f32,
    pub restitution: f32,
    pub air_friction: f32,
    pub surface_friction: f32,
    /// Scaled up by a size boost until the end of the turn.
    pub enlarged: bool,
}

impl Body {
    fn new(
        id: BodyId,
        kind: BodyKind,
        position: Vec2,
        radius: f32,
        density: f32,
        restitution: f32,
        config: &PhysicsConfig,
    ) -> Self {
        let mut body = Self {
            id,
            kind,
            position,
            velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            radius,
            base_radius: radius,
            density,
            base_density: density,
            mass: 0.0,
            restitution,
            air_friction: config.air_friction,
            surface_friction: config.surface_friction,
            enlarged: false,
        };
        body.set_shape(radius, density);
        body
    }

    pub fn player(id: BodyId, team: Team, position: Vec2, config: &PhysicsConfig) -> Self {
        Self::new(
            id,
            BodyKind::Player { team },
            position,
            config.player_radius,
            config.player_density,
            config.player_restitution,
            config,
        )
    }

    pub fn ball(id: BodyId, position: Vec2, config: &PhysicsConfig) -> Self {
        Self::new(
            id,
            BodyKind::Ball,
            position,
            config.ball_radius,
            config.ball_density,
            config.ball_restitution,
            config,
        )
    }

    pub fn is_player(&self) -> bool {
        matches!(self.kind, BodyKind::Player { .. })
    }

    pub fn is_ball(&self) -> bool {
        matches!(self.kind, BodyKind::Ball)
    }

    pub fn team(&self) -> Option<Team> {
        match self.kind {
            BodyKind::Player { team } => Some(team),
            BodyKind::Ball => None,
        }
    }

    /// Set radius and density, recomputing mass. Non-positive inputs are ignored.
    pub fn set_shape(&mut self, radius: f32, density: f32) {
        if radius > 0.0 && density > 0.0 {
            self.radius = radius;
            self.density = density;
            self.mass = PI * radius * radius * density;
        }
    }

    /// Moment of inertia of a solid disc.
    pub fn inertia(&self) -> f32 {
        0.5 * self.mass * self.radius * self.radius
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Contribution to the settle metric: speed² + angular speed².
    pub fn motion_energy(&self) -> f32 {
        self.velocity.length_squared() + self.angular_velocity * self.angular_velocity
    }

    pub fn is_at_rest(&self) -> bool {
        self.velocity == Vec2::ZERO && self.angular_velocity == 0.0
    }

    /// Point-in-circle test against the live radius.
    pub fn contains_point(&self, p: Vec2) -> bool {
        self.position.distance(p) <= self.radius
    }

    /// Instantaneous change of momentum.
    pub fn apply_impulse(&mut self, impulse: Vec2) {
        self.velocity += impulse * (1.0 / self.mass);
    }

    /// Grow to giant size: radius scaled by `scale`, density replaced.
    pub fn enlarge(&mut self, scale: f32, density: f32) {
        if self.enlarged {
            return;
        }
        self.set_shape(self.base_radius * scale, density);
        self.enlarged = true;
    }

    /// Return to the original radius and density.
    pub fn revert_size(&mut self) {
        if self.enlarged {
            self.set_shape(self.base_radius, self.base_density);
            self.enlarged = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mass_is_area_times_density() {
        let config = PhysicsConfig::default();
        let token = Body::player(BodyId(0), Team::Red, Vec2::ZERO, &config);
        let expected = PI * 28.0 * 28.0 * 0.002;
        assert!((token.mass - expected).abs() < 1e-4);
        let ball = Body::ball(BodyId(1), Vec2::ZERO, &config);
        assert!(ball.mass < token.mass);
        assert!(ball.mass > 0.0);
    }

    #[test]
    fn enlarge_and_revert() {
        let config = PhysicsConfig::default();
        let mut token = Body::player(BodyId(0), Team::Blue, Vec2::ZERO, &config);
        let mass = token.mass;
        token.enlarge(1.5, 0.01);
        assert!(token.enlarged);
        assert!((token.radius - 42.0).abs() < 1e-4);
        // 2.25x area, 5x density
        assert!((token.mass / mass - 11.25).abs() < 1e-3);

        // Enlarging twice does not compound
        token.enlarge(1.5, 0.01);
        assert!((token.radius - 42.0).abs() < 1e-4);

        token.revert_size();
        assert!(!token.enlarged);
        assert_eq!(token.radius, 28.0);
        assert!((token.mass - mass).abs() < 1e-5);
    }

    #[test]
    fn hit_test_uses_live_radius() {
        let config = PhysicsConfig::default();
        let mut token = Body::player(BodyId(0), Team::Red, Vec2::new(100.0, 100.0), &config);
        let edge = Vec2::new(135.0, 100.0);
        assert!(!token.contains_point(edge));
        token.enlarge(1.5, 0.01);
        assert!(token.contains_point(edge));
    }

    #[test]
    fn invalid_shape_ignored() {
        let config = PhysicsConfig::default();
        let mut ball = Body::ball(BodyId(0), Vec2::ZERO, &config);
        let before = ball.clone();
        ball.set_shape(0.0, 1.0);
        ball.set_shape(5.0, -1.0);
        assert_eq!(ball, before);
    }

    #[test]
    fn impulse_scales_with_inverse_mass() {
        let config = PhysicsConfig::default();
        let mut token = Body::player(BodyId(0), Team::Red, Vec2::ZERO, &config);
        let m = token.mass;
        token.apply_impulse(Vec2::new(m * 10.0, 0.0));
        assert!((token.velocity.x - 10.0).abs() < 1e-4);
        assert_eq!(token.team(), Some(Team::Red));
    }
}
