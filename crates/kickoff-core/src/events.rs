use serde::{Deserialize, Serialize};

use crate::powerup::PowerUpKind;
use crate::team::{Outcome, Team};

/// Notifications emitted by a game for the presentation layer.
///
/// These are the only coupling points between the simulation and the UI:
/// score displays, goal celebrations, turn banners, power-up toasts and the
/// victory screen are all driven from this stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub enum GameEvent<K: PowerUpKind> {
    ScoreChanged { team: Team, score: u32 },
    GoalScored { team: Team },
    TurnChanged { team: Team, turn_count: u32 },
    MatchOver { outcome: Outcome },
    PowerUpGranted { team: Team, kind: K },
}

impl<K: PowerUpKind> GameEvent<K> {
    /// Whether this event ends the match.
    pub fn is_terminal(&self) -> bool {
        matches!(self, GameEvent::MatchOver { .. })
    }
}
