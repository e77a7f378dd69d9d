use serde::{Deserialize, Serialize};

use kickoff_core::team::{Outcome, Team};

/// Goals per team.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub red: u32,
    pub blue: u32,
}

impl Score {
    pub fn get(&self, team: Team) -> u32 {
        match team {
            Team::Red => self.red,
            Team::Blue => self.blue,
        }
    }

    /// Credit a goal and return the team's new tally.
    pub fn increment(&mut self, team: Team) -> u32 {
        let slot = match team {
            Team::Red => &mut self.red,
            Team::Blue => &mut self.blue,
        };
        *slot += 1;
        *slot
    }

    /// The team that has reached `goals_to_win`, if any.
    pub fn winner(&self, goals_to_win: u32) -> Option<Team> {
        Team::ALL.into_iter().find(|&t| self.get(t) >= goals_to_win)
    }

    /// Result when the match ends on the turn limit.
    pub fn decide(&self) -> Outcome {
        match self.red.cmp(&self.blue) {
            std::cmp::Ordering::Greater => Outcome::Winner(Team::Red),
            std::cmp::Ordering::Less => Outcome::Winner(Team::Blue),
            std::cmp::Ordering::Equal => Outcome::Draw,
        }
    }
}
