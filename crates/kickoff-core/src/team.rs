use serde::{Deserialize, Serialize};

/// One of the two sides in a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Red,
    Blue,
}

impl Team {
    /// Both teams, in serving order at match start.
    pub const ALL: [Team; 2] = [Team::Red, Team::Blue];

    /// The opposing team.
    pub fn other(self) -> Self {
        match self {
            Team::Red => Team::Blue,
            Team::Blue => Team::Red,
        }
    }

    /// Stable index for per-team arrays (`Red = 0`, `Blue = 1`).
    pub fn index(self) -> usize {
        match self {
            Team::Red => 0,
            Team::Blue => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Team::Red => "red",
            Team::Blue => "blue",
        }
    }
}

impl std::fmt::Display for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Final result of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Winner(Team),
    Draw,
}

impl Outcome {
    pub fn winner(self) -> Option<Team> {
        match self {
            Outcome::Winner(team) => Some(team),
            Outcome::Draw => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn other_flips() {
        assert_eq!(Team::Red.other(), Team::Blue);
        assert_eq!(Team::Blue.other(), Team::Red);
        assert_eq!(Team::Red.other().other(), Team::Red);
    }

    #[test]
    fn indices_are_distinct() {
        assert_ne!(Team::Red.index(), Team::Blue.index());
        for team in Team::ALL {
            assert!(team.index() < 2);
        }
    }

    #[test]
    fn outcome_winner() {
        assert_eq!(Outcome::Winner(Team::Blue).winner(), Some(Team::Blue));
        assert_eq!(Outcome::Draw.winner(), None);
    }
}
