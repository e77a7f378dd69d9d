use rand::Rng;
use serde::{Deserialize, Serialize};

use kickoff_core::geometry::{Rect, Vec2};
use kickoff_core::team::Team;

/// Number of tokens per team.
pub const TEAM_SIZE: usize = 5;

/// Named kickoff layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Formation {
    /// 2-2 Square.
    Square,
    /// 1-2-1 Diamond.
    Diamond,
    /// 3-1 Defensive.
    Defensive,
}

impl Formation {
    pub const ALL: [Formation; 3] = [Formation::Square, Formation::Diamond, Formation::Defensive];

    pub fn name(self) -> &'static str {
        match self {
            Formation::Square => "2-2 Square",
            Formation::Diamond => "1-2-1 Diamond",
            Formation::Defensive => "3-1 Defensive",
        }
    }

    /// Slots for the red (left) side as `(depth, lateral)`: depth is the
    /// fraction of the pitch length measured from the own goal line, lateral
    /// the fraction of pitch height from the center line.
    fn slots(self) -> [(f32, f32); TEAM_SIZE] {
        match self {
            Formation::Square => [
                (0.08, 0.0),
                (0.20, -0.20),
                (0.20, 0.20),
                (0.36, -0.12),
                (0.36, 0.12),
            ],
            Formation::Diamond => [
                (0.08, 0.0),
                (0.22, 0.0),
                (0.32, -0.24),
                (0.32, 0.24),
                (0.40, 0.0),
            ],
            Formation::Defensive => [
                (0.08, 0.0),
                (0.18, -0.16),
                (0.18, 0.16),
                (0.25, 0.0),
                (0.40, 0.0),
            ],
        }
    }

    /// Token positions for `team` on the given pitch. Blue mirrors red
    /// about the halfway line.
    pub fn positions(self, team: Team, pitch: &Rect) -> [Vec2; TEAM_SIZE] {
        let center = pitch.center();
        self.slots().map(|(depth, lateral)| {
            let from_line = depth * pitch.width();
            let x = match team {
                Team::Red => pitch.min.x + from_line,
                Team::Blue => pitch.max.x - from_line,
            };
            Vec2::new(x, center.y + lateral * pitch.height())
        })
    }

    /// Uniform choice among `options` other than `self`; keeps `self` when
    /// it is the only option.
    pub fn next<R: Rng + ?Sized>(self, options: &[Formation], rng: &mut R) -> Formation {
        let others: Vec<Formation> = options.iter().copied().filter(|f| *f != self).collect();
        if others.is_empty() {
            return self;
        }
        others[rng.random_range(0..others.len())]
    }
}
