use serde::{Deserialize, Serialize};

use kickoff_core::geometry::{Rect, Vec2};
use kickoff_core::team::Team;

use crate::body::Body;
use crate::config::FieldConfig;

/// A static wall segment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Wall {
    pub a: Vec2,
    pub b: Vec2,
}

impl Wall {
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self { a, b }
    }
}

/// Which end of the pitch a goal sits at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoalSide {
    Left,
    Right,
}

impl GoalSide {
    /// The team defending this goal.
    pub fn defender(self) -> Team {
        match self {
            GoalSide::Left => Team::Red,
            GoalSide::Right => Team::Blue,
        }
    }

    /// The team credited when the ball enters this goal.
    pub fn scorer(self) -> Team {
        self.defender().other()
    }
}

/// A non-colliding region behind a goal mouth.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GoalSensor {
    pub side: GoalSide,
    pub area: Rect,
}

/// Static field geometry for one viewport size.
///
/// The pitch is the in-bounds rectangle. Its perimeter is closed by wall
/// segments except for one goal mouth centered on each short side; behind
/// each mouth a three-sided net holds a goal sensor that spans from the goal
/// line to the back of the net.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Field {
    pub width: f32,
    pub height: f32,
    pub pitch: Rect,
    pub goal_width: f32,
    pub goal_depth: f32,
    pub walls: Vec<Wall>,
    pub sensors: [GoalSensor; 2],
}

impl Field {
    pub fn new(width: f32, height: f32, config: &FieldConfig) -> Self {
        let margin_x = width * config.margin_x_ratio;
        let margin_y = height * config.margin_y_ratio;
        let goal_depth = width * config.goal_depth_ratio;
        let pitch = Rect::new(
            Vec2::new(margin_x + goal_depth, margin_y),
            Vec2::new(width - margin_x - goal_depth, height - margin_y),
        );
        let goal_width = (height * config.goal_width_ratio).min(pitch.height());

        let cy = pitch.center().y;
        let mouth_top = cy - goal_width / 2.0;
        let mouth_bottom = cy + goal_width / 2.0;
        let (left, right) = (pitch.min.x, pitch.max.x);
        let (top, bottom) = (pitch.min.y, pitch.max.y);

        let mut walls = vec![
            // Side lines
            Wall::new(Vec2::new(left, top), Vec2::new(right, top)),
            Wall::new(Vec2::new(left, bottom), Vec2::new(right, bottom)),
            // Goal lines either side of each mouth
            Wall::new(Vec2::new(left, top), Vec2::new(left, mouth_top)),
            Wall::new(Vec2::new(left, mouth_bottom), Vec2::new(left, bottom)),
            Wall::new(Vec2::new(right, top), Vec2::new(right, mouth_top)),
            Wall::new(Vec2::new(right, mouth_bottom), Vec2::new(right, bottom)),
        ];
        for (line, back) in [(left, left - goal_depth), (right, right + goal_depth)] {
            walls.push(Wall::new(Vec2::new(back, mouth_top), Vec2::new(back, mouth_bottom)));
            walls.push(Wall::new(Vec2::new(back, mouth_top), Vec2::new(line, mouth_top)));
            walls.push(Wall::new(
                Vec2::new(back, mouth_bottom),
                Vec2::new(line, mouth_bottom),
            ));
        }

        let sensors = [
            GoalSensor {
                side: GoalSide::Left,
                area: Rect::new(
                    Vec2::new(left - goal_depth, mouth_top),
                    Vec2::new(left, mouth_bottom),
                ),
            },
            GoalSensor {
                side: GoalSide::Right,
                area: Rect::new(
                    Vec2::new(right, mouth_top),
                    Vec2::new(right + goal_depth, mouth_bottom),
                ),
            },
        ];

        Self {
            width,
            height,
            pitch,
            goal_width,
            goal_depth,
            walls,
            sensors,
        }
    }

    /// Whether `p` lies on the pitch.
    pub fn contains(&self, p: Vec2) -> bool {
        self.pitch.contains(p)
    }

    /// The goal sensor containing `p`, if any.
    pub fn sensor_at(&self, p: Vec2) -> Option<GoalSide> {
        self.sensors
            .iter()
            .find(|s| s.area.contains(p))
            .map(|s| s.side)
    }

    /// Whether `p` is on the pitch and at least `clearance` away from every
    /// player token.
    pub fn is_clear(&self, p: Vec2, bodies: &[Body], clearance: f32) -> bool {
        self.contains(p)
            && bodies
                .iter()
                .filter(|b| b.is_player())
                .all(|b| b.position.distance(p) >= clearance)
    }

    /// Keep a circle inside the viewport; returns true if it was moved.
    pub fn clamp_to_world(&self, body: &mut Body) -> bool {
        let r = body.radius;
        let mut moved = false;
        if body.position.x < r {
            body.position.x = r;
            body.velocity.x = body.velocity.x.abs();
            moved = true;
        }
        if body.position.x > self.width - r {
            body.position.x = self.width - r;
            body.velocity.x = -body.velocity.x.abs();
            moved = true;
        }
        if body.position.y < r {
            body.position.y = r;
            body.velocity.y = body.velocity.y.abs();
            moved = true;
        }
        if body.position.y > self.height - r {
            body.position.y = self.height - r;
            body.velocity.y = -body.velocity.y.abs();
            moved = true;
        }
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{Body, BodyId};
    use crate::config::{FieldConfig, PhysicsConfig};

    fn field() -> Field {
        Field::new(800.0, 600.0, &FieldConfig::default())
    }

    /// Points on the pitch perimeter not covered by any wall.
    fn perimeter_gaps(field: &Field) -> Vec<Vec2> {
        let p = field.pitch;
        let mut samples = Vec::new();
        let steps = 200;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            samples.push(Vec2::new(p.min.x + t * p.width(), p.min.y));
            samples.push(Vec2::new(p.min.x + t * p.width(), p.max.y));
            samples.push(Vec2::new(p.min.x, p.min.y + t * p.height()));
            samples.push(Vec2::new(p.max.x, p.min.y + t * p.height()));
        }
        samples
            .into_iter()
            .filter(|s| {
                !field.walls.iter().any(|w| {
                    kickoff_core::geometry::closest_point_on_segment(*s, w.a, w.b).distance(*s)
                        < 1e-3
                })
            })
            .collect()
    }

    #[test]
    fn perimeter_has_two_gaps_on_short_sides() {
        let field = field();
        let gaps = perimeter_gaps(&field);
        assert!(!gaps.is_empty());
        let cy = field.pitch.center().y;
        for g in &gaps {
            assert!(
                (g.x - field.pitch.min.x).abs() < 1e-3 || (g.x - field.pitch.max.x).abs() < 1e-3,
                "gap not on a short side: {g:?}"
            );
            assert!((g.y - cy).abs() < field.goal_width / 2.0);
        }
        assert!(gaps.iter().any(|g| g.x < field.pitch.center().x));
        assert!(gaps.iter().any(|g| g.x > field.pitch.center().x));
    }

    #[test]
    fn sensors_centered_on_mouths_and_deeper_than_ball() {
        let field = field();
        let ball_r = PhysicsConfig::default().ball_radius;
        for sensor in &field.sensors {
            assert!((sensor.area.center().y - field.pitch.center().y).abs() < 1e-3);
            assert!((sensor.area.height() - field.goal_width).abs() < 1e-3);
            assert!(sensor.area.width() > ball_r);
        }
        let just_over_left = Vec2::new(field.pitch.min.x - 1.0, field.pitch.center().y);
        assert_eq!(field.sensor_at(just_over_left), Some(GoalSide::Left));
        let just_over_right = Vec2::new(field.pitch.max.x + 1.0, field.pitch.center().y);
        assert_eq!(field.sensor_at(just_over_right), Some(GoalSide::Right));
        assert_eq!(field.sensor_at(field.pitch.center()), None);
    }

    #[test]
    fn geometry_scales_with_viewport() {
        let small = Field::new(400.0, 300.0, &FieldConfig::default());
        let big = field();
        assert!((big.pitch.width() / small.pitch.width() - 2.0).abs() < 1e-4);
        assert!((big.pitch.height() / small.pitch.height() - 2.0).abs() < 1e-4);
        assert!((big.goal_width / small.goal_width - 2.0).abs() < 1e-4);
    }

    #[test]
    fn goal_sides_credit_the_attacker() {
        assert_eq!(GoalSide::Left.scorer(), Team::Blue);
        assert_eq!(GoalSide::Right.scorer(), Team::Red);
    }

    #[test]
    fn clearance_rejects_points_near_players() {
        let field = field();
        let config = PhysicsConfig::default();
        let token = Body::player(BodyId(0), Team::Red, Vec2::new(400.0, 300.0), &config);
        let ball = Body::ball(BodyId(1), Vec2::new(500.0, 300.0), &config);
        let bodies = vec![token, ball];
        assert!(!field.is_clear(Vec2::new(430.0, 300.0), &bodies, 60.0));
        assert!(field.is_clear(Vec2::new(470.0, 300.0), &bodies, 60.0));
        // The ball does not block spawns
        assert!(field.is_clear(Vec2::new(500.0, 300.0), &bodies, 60.0));
        // Off the pitch is never clear
        assert!(!field.is_clear(Vec2::new(5.0, 5.0), &bodies, 60.0));
    }
}
