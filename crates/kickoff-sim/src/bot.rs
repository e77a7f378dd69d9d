use rand::Rng;

use kickoff_core::geometry::Vec2;
use kickoff_core::team::Team;
use kickoff_futsal::FutsalState;
use kickoff_futsal::field::Field;

/// Shortest and longest pull-back the bot uses, in viewport units.
const MIN_PULL: f32 = 30.0;
const MAX_PULL: f32 = 120.0;

/// A drag gesture: press at `from`, release at `to`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannedDrag {
    pub from: Vec2,
    pub to: Vec2,
}

/// Center of the goal `team` attacks.
fn target_goal(team: Team, field: &Field) -> Vec2 {
    let cy = field.pitch.center().y;
    match team {
        Team::Red => Vec2::new(field.pitch.max.x, cy),
        Team::Blue => Vec2::new(field.pitch.min.x, cy),
    }
}

/// Plan a shot for the acting team.
///
/// Picks the token nearest the ball and flicks it at the spot behind the
/// ball on the ball-to-goal line, with a random amount of pull.
pub fn plan_shot<R: Rng + ?Sized>(
    state: &FutsalState,
    field: &Field,
    rng: &mut R,
) -> Option<PlannedDrag> {
    let team = state.turn.turn;
    let ball = state.ball()?;
    let token = state
        .bodies
        .iter()
        .filter(|b| b.team() == Some(team))
        .min_by(|a, b| {
            a.position
                .distance(ball.position)
                .total_cmp(&b.position.distance(ball.position))
        })?;

    let to_goal = (target_goal(team, field) - ball.position).normalize_or_zero();
    let contact = ball.position - to_goal * (ball.radius + token.radius * 0.5);
    let mut aim = (contact - token.position).normalize_or_zero();
    if aim == Vec2::ZERO {
        aim = to_goal;
    }
    let pull = rng.random_range(MIN_PULL..=MAX_PULL);

    Some(PlannedDrag {
        from: token.position,
        to: token.position - aim * pull,
    })
}
