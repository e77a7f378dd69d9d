use serde::{Deserialize, Serialize};

use kickoff_core::team::{Outcome, Team};

/// Where the match is between shots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPhase {
    /// The acting team may take exactly one shot.
    AwaitingInput,
    /// Bodies are moving; input is locked until they settle or a goal lands.
    ShotInFlight,
    /// A goal was scored; waiting for the scheduled kickoff reset.
    RoundReset { serving: Team },
    MatchOver(Outcome),
}

/// Result of a shot settling without a goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnSwitch {
    /// Team that just moved.
    pub previous: Team,
    pub next: Team,
    pub turn_count: u32,
    /// `turn_count` went past the turn limit; the match must end.
    pub limit_reached: bool,
}

/// Turn ownership and the phase of the current turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnState {
    pub turn: Team,
    /// Completed turns. Goals do not advance it.
    pub turn_count: u32,
    pub phase: TurnPhase,
}

impl Default for TurnState {
    fn default() -> Self {
        Self {
            turn: Team::Red,
            turn_count: 0,
            phase: TurnPhase::AwaitingInput,
        }
    }
}

impl TurnState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input_enabled(&self) -> bool {
        self.phase == TurnPhase::AwaitingInput
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, TurnPhase::MatchOver(_))
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            TurnPhase::MatchOver(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// A valid shot was fired. Returns false unless input was enabled.
    pub fn begin_shot(&mut self) -> bool {
        if !self.input_enabled() {
            return false;
        }
        self.phase = TurnPhase::ShotInFlight;
        true
    }

    /// Bodies came to rest after a shot: hand the turn to the other team.
    ///
    /// Returns `None` if no shot was in flight. The turn-limit check uses
    /// the incremented count, so a limit of 30 ends the match when the
    /// count reaches 31. The caller decides the outcome and calls
    /// [`TurnState::end_match`].
    pub fn on_settle(&mut self, turn_limit: u32) -> Option<TurnSwitch> {
        if self.phase != TurnPhase::ShotInFlight {
            return None;
        }
        let previous = self.turn;
        self.turn = previous.other();
        self.turn_count += 1;
        self.phase = TurnPhase::AwaitingInput;
        Some(TurnSwitch {
            previous,
            next: self.turn,
            turn_count: self.turn_count,
            limit_reached: self.turn_count > turn_limit,
        })
    }

    /// The ball went in. The conceding team serves after the reset.
    ///
    /// Bodies can still drift below the settle threshold once input is
    /// back, so a goal also counts while awaiting input. Nothing scores
    /// during a reset or after the final whistle.
    pub fn on_goal(&mut self, scorer: Team) -> bool {
        if !matches!(self.phase, TurnPhase::ShotInFlight | TurnPhase::AwaitingInput) {
            return false;
        }
        self.phase = TurnPhase::RoundReset {
            serving: scorer.other(),
        };
        true
    }

    /// Finish a pending round reset. Returns the serving team.
    pub fn finish_reset(&mut self) -> Option<Team> {
        match self.phase {
            TurnPhase::RoundReset { serving } => {
                self.turn = serving;
                self.phase = TurnPhase::AwaitingInput;
                Some(serving)
            },
            _ => None,
        }
    }

    pub fn end_match(&mut self, outcome: Outcome) {
        self.phase = TurnPhase::MatchOver(outcome);
    }
}
