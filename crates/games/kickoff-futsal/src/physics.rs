use serde::{Deserialize, Serialize};

use kickoff_core::geometry::{Rect, Vec2, closest_point_on_segment};
use kickoff_core::team::Team;

use crate::body::Body;
use crate::config::PhysicsConfig;
use crate::field::{Field, GoalSide, Wall};

/// Distances below this are treated as exact overlap.
const CONTACT_EPSILON: f32 = 1e-6;
/// Separation normal used when two centers coincide.
const FALLBACK_NORMAL: Vec2 = Vec2::new(1.0, 0.0);

/// Sensor overlap carried between ticks so goals are edge-triggered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorContacts {
    /// Goal sensor the ball center is currently inside.
    pub ball_in_goal: Option<GoalSide>,
}

/// What happened during one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    /// The ball entered this goal's sensor during the tick.
    pub goal: Option<GoalSide>,
    /// Team of the first token that touched the power-up pickup.
    pub pickup_touched_by: Option<Team>,
    /// Sum of speed² + angular speed² over all bodies after the tick.
    pub motion_energy: f32,
    /// `motion_energy` is under the settle threshold.
    pub settled: bool,
}

/// Advance every body by `dt` seconds.
///
/// Each of the `substeps` sub-iterations integrates and damps, resolves
/// body-body contacts, then wall contacts, clamps to the viewport and
/// finally samples the sensors, so goal detection always sees
/// post-collision positions. Slow bodies are snapped to rest at the end.
pub fn step(
    bodies: &mut [Body],
    contacts: &mut SensorContacts,
    field: &Field,
    pickup: Option<&Rect>,
    config: &PhysicsConfig,
    dt: f32,
) -> StepReport {
    let mut report = StepReport::default();
    let substeps = config.substeps.max(1);
    let h = dt / substeps as f32;

    for _ in 0..substeps {
        integrate(bodies, h, config.reference_rate);

        for i in 0..bodies.len() {
            let (head, tail) = bodies.split_at_mut(i + 1);
            let a = &mut head[i];
            for b in tail.iter_mut() {
                resolve_bodies(a, b);
            }
        }

        for body in bodies.iter_mut() {
            for wall in &field.walls {
                resolve_wall(body, wall);
            }
            field.clamp_to_world(body);
        }

        if let Some(side) = sample_goal_sensors(bodies, contacts, field)
            && report.goal.is_none()
        {
            report.goal = Some(side);
        }

        if report.pickup_touched_by.is_none()
            && let Some(area) = pickup
        {
            report.pickup_touched_by = bodies
                .iter()
                .find(|b| b.is_player() && area.overlaps_circle(b.position, b.radius))
                .and_then(Body::team);
        }
    }

    for body in bodies.iter_mut() {
        if body.speed() < config.rest_speed {
            body.velocity = Vec2::ZERO;
        }
        if body.angular_velocity.abs() < config.rest_angular_speed {
            body.angular_velocity = 0.0;
        }
    }

    report.motion_energy = motion_energy(bodies);
    report.settled = report.motion_energy < config.settle_threshold;
    report
}

/// Settle metric: Σ speed² + angular speed².
pub fn motion_energy(bodies: &[Body]) -> f32 {
    bodies.iter().map(Body::motion_energy).sum()
}

/// Physical kinetic energy: Σ ½mv² + ½Iω².
pub fn kinetic_energy(bodies: &[Body]) -> f32 {
    bodies
        .iter()
        .map(|b| {
            0.5 * b.mass * b.velocity.length_squared()
                + 0.5 * b.inertia() * b.angular_velocity * b.angular_velocity
        })
        .sum()
}

/// Move and damp. `air_friction` is the fraction lost per tick at
/// `reference_rate`, so the decay is rescaled for the sub-step length.
fn integrate(bodies: &mut [Body], h: f32, reference_rate: f32) {
    for body in bodies.iter_mut() {
        if body.is_at_rest() {
            continue;
        }
        body.position += body.velocity * h;
        let keep = (1.0 - body.air_friction).clamp(0.0, 1.0).powf(h * reference_rate);
        body.velocity = body.velocity * keep;
        body.angular_velocity *= keep;
    }
}

/// Resolve overlap between two circles. Returns true if they were in contact.
pub fn resolve_bodies(a: &mut Body, b: &mut Body) -> bool {
    let delta = b.position - a.position;
    let dist = delta.length();
    let min_dist = a.radius + b.radius;
    if dist >= min_dist {
        return false;
    }

    let normal = if dist > CONTACT_EPSILON {
        delta * (1.0 / dist)
    } else {
        FALLBACK_NORMAL
    };

    // Split the penetration evenly
    let push = normal * ((min_dist - dist) * 0.5);
    a.position -= push;
    b.position += push;

    let ra = normal * a.radius;
    let rb = -normal * b.radius;
    let va = a.velocity + ra.perp() * a.angular_velocity;
    let vb = b.velocity + rb.perp() * b.angular_velocity;
    let rel = vb - va;
    let vn = rel.dot(normal);
    if vn >= 0.0 {
        return true;
    }

    // Pair restitution: the bouncier body wins
    let e = a.restitution.max(b.restitution);
    let inv_ma = 1.0 / a.mass;
    let inv_mb = 1.0 / b.mass;
    let jn = -(1.0 + e) * vn / (inv_ma + inv_mb);
    a.velocity -= normal * (jn * inv_ma);
    b.velocity += normal * (jn * inv_mb);

    // Coulomb friction along the tangent spins both bodies
    let tangent = normal.perp();
    let vt = rel.dot(tangent);
    let ra_t = ra.cross(tangent);
    let rb_t = rb.cross(tangent);
    let k = inv_ma + inv_mb + ra_t * ra_t / a.inertia() + rb_t * rb_t / b.inertia();
    let mu = a.surface_friction.min(b.surface_friction);
    let jt = (-vt / k).clamp(-mu * jn, mu * jn);
    a.velocity -= tangent * (jt * inv_ma);
    a.angular_velocity -= ra_t * jt / a.inertia();
    b.velocity += tangent * (jt * inv_mb);
    b.angular_velocity += rb_t * jt / b.inertia();

    true
}

/// Resolve a circle against a static segment. Returns true on contact.
pub fn resolve_wall(body: &mut Body, wall: &Wall) -> bool {
    let closest = closest_point_on_segment(body.position, wall.a, wall.b);
    let delta = body.position - closest;
    let dist = delta.length();
    if dist >= body.radius {
        return false;
    }

    let normal = if dist > CONTACT_EPSILON {
        delta * (1.0 / dist)
    } else {
        let n = (wall.b - wall.a).perp().normalize_or_zero();
        if n == Vec2::ZERO { FALLBACK_NORMAL } else { n }
    };

    body.position = closest + normal * body.radius;

    let r = -normal * body.radius;
    let contact_velocity = body.velocity + r.perp() * body.angular_velocity;
    let vn = contact_velocity.dot(normal);
    if vn >= 0.0 {
        return true;
    }

    let inv_m = 1.0 / body.mass;
    let jn = -(1.0 + body.restitution) * vn / inv_m;
    body.velocity += normal * (jn * inv_m);

    let tangent = normal.perp();
    let vt = contact_velocity.dot(tangent);
    let r_t = r.cross(tangent);
    let k = inv_m + r_t * r_t / body.inertia();
    let mu = body.surface_friction;
    let jt = (-vt / k).clamp(-mu * jn, mu * jn);
    body.velocity += tangent * (jt * inv_m);
    body.angular_velocity += r_t * jt / body.inertia();

    true
}

/// Track the ball against the goal sensors; returns a side only on entry.
fn sample_goal_sensors(
    bodies: &[Body],
    contacts: &mut SensorContacts,
    field: &Field,
) -> Option<GoalSide> {
    let ball = bodies.iter().find(|b| b.is_ball())?;
    let now = field.sensor_at(ball.position);
    let entered = match (contacts.ball_in_goal, now) {
        (None, Some(side)) => Some(side),
        (Some(prev), Some(side)) if prev != side => Some(side),
        _ => None,
    };
    contacts.ball_in_goal = now;
    if let Some(side) = entered {
        tracing::debug!(?side, x = ball.position.x, y = ball.position.y, "Ball entered goal sensor");
    }
    entered
}
