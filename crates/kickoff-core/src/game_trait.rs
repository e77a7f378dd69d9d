use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::events::GameEvent;
use crate::input::PointerEvent;
use crate::powerup::PowerUpKind;
use crate::team::Outcome;

/// Core trait that every Kickoff game implements.
///
/// The host owns the frame loop, the pointer plumbing and the UI; the game
/// owns the simulation and reports what happened through [`GameEvent`]s.
pub trait TurnBasedGame: Send + Sync {
    /// Power-up kinds this game can grant.
    type PowerUp: PowerUpKind;

    /// Game metadata for the menu screen.
    fn metadata(&self) -> GameMetadata;

    /// Called once when a match starts.
    fn init(&mut self, config: &GameConfig) -> Vec<GameEvent<Self::PowerUp>>;

    /// Called each frame with the elapsed simulated time in seconds.
    fn update(&mut self, dt: f32) -> Vec<GameEvent<Self::PowerUp>>;

    /// Feed one pointer event from the host.
    fn handle_pointer(&mut self, event: PointerEvent) -> Vec<GameEvent<Self::PowerUp>>;

    /// Discard the current match and start over with the same configuration.
    fn restart(&mut self) -> Vec<GameEvent<Self::PowerUp>>;

    /// The play surface changed size.
    fn resize(&mut self, width: f32, height: f32);

    /// Serialize the full match state for snapshots.
    fn serialize_state(&self) -> Vec<u8>;

    /// Restore a snapshot produced by `serialize_state`.
    fn apply_state(&mut self, state: &[u8]);

    /// Simulation tick rate in Hz the host should aim for.
    fn tick_rate(&self) -> f32 {
        60.0
    }

    /// Whether the game supports pausing.
    fn supports_pause(&self) -> bool {
        true
    }

    fn pause(&mut self);

    fn resume(&mut self);

    fn is_paused(&self) -> bool;

    /// Whether the match has ended.
    fn is_match_over(&self) -> bool;

    /// Final result once the match has ended.
    fn outcome(&self) -> Option<Outcome>;
}

/// Game metadata for the menu screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMetadata {
    pub name: String,
    pub description: String,
    pub estimated_match_duration: Duration,
}

/// Match setup supplied by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Goals needed to win.
    pub goals_to_win: u32,
    /// Completed turns after which the match ends on score.
    pub turn_limit: u32,
    pub field_width: f32,
    pub field_height: f32,
    pub powerups_enabled: bool,
    /// RNG seed for formations and power-ups; `None` seeds from entropy.
    pub seed: Option<u64>,
    pub custom: HashMap<String, serde_json::Value>,
}

impl GameConfig {
    pub const DEFAULT_GOALS_TO_WIN: u32 = 3;
    pub const DEFAULT_TURN_LIMIT: u32 = 30;
    pub const DEFAULT_FIELD_WIDTH: f32 = 800.0;
    pub const DEFAULT_FIELD_HEIGHT: f32 = 600.0;

    /// Check the setup for values that would make the match unplayable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.goals_to_win == 0 {
            return Err(ConfigError::GoalsToWin(self.goals_to_win));
        }
        if self.turn_limit == 0 {
            return Err(ConfigError::TurnLimit(self.turn_limit));
        }
        if !(self.field_width.is_finite() && self.field_width > 0.0)
            || !(self.field_height.is_finite() && self.field_height > 0.0)
        {
            return Err(ConfigError::FieldSize {
                width: self.field_width,
                height: self.field_height,
            });
        }
        Ok(())
    }

    /// Copy of this config with every invalid value replaced by its default.
    pub fn sanitized(&self) -> Self {
        let mut config = self.clone();
        while let Err(e) = config.validate() {
            tracing::warn!(error = %e, "Invalid match config, using default");
            match e {
                ConfigError::GoalsToWin(_) => config.goals_to_win = Self::DEFAULT_GOALS_TO_WIN,
                ConfigError::TurnLimit(_) => config.turn_limit = Self::DEFAULT_TURN_LIMIT,
                ConfigError::FieldSize { .. } => {
                    config.field_width = Self::DEFAULT_FIELD_WIDTH;
                    config.field_height = Self::DEFAULT_FIELD_HEIGHT;
                },
            }
        }
        config
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            goals_to_win: Self::DEFAULT_GOALS_TO_WIN,
            turn_limit: Self::DEFAULT_TURN_LIMIT,
            field_width: Self::DEFAULT_FIELD_WIDTH,
            field_height: Self::DEFAULT_FIELD_HEIGHT,
            powerups_enabled: true,
            seed: None,
            custom: HashMap::new(),
        }
    }
}

/// A match setup value that cannot produce a playable match.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    GoalsToWin(u32),
    TurnLimit(u32),
    FieldSize { width: f32, height: f32 },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GoalsToWin(n) => write!(f, "goals to win must be positive, got {n}"),
            Self::TurnLimit(n) => write!(f, "turn limit must be positive, got {n}"),
            Self::FieldSize { width, height } => {
                write!(f, "field size must be positive, got {width}x{height}")
            },
        }
    }
}

impl std::error::Error for ConfigError {}

/// Generates the snapshot and pause methods shared by every game:
/// `serialize_state`, `apply_state`, `pause`, `resume`, `is_paused`.
///
/// Requires the implementing struct to have `state: $StateType` and
/// `paused: bool` fields.
#[macro_export]
macro_rules! turn_based_game_boilerplate {
    (state_type: $StateType:ty) => {
        fn serialize_state(&self) -> Vec<u8> {
            rmp_serde::to_vec(&self.state).unwrap_or_else(|e| {
                tracing::error!(error = %e, "Failed to serialize game state");
                Vec::new()
            })
        }

        fn apply_state(&mut self, state: &[u8]) {
            match rmp_serde::from_slice::<$StateType>(state) {
                Ok(s) => self.state = s,
                Err(e) => tracing::debug!(error = %e, "Dropped malformed state snapshot"),
            }
        }

        fn pause(&mut self) {
            self.paused = true;
        }

        fn resume(&mut self) {
            self.paused = false;
        }

        fn is_paused(&self) -> bool {
            self.paused
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
    }

    #[test]
    fn zero_goals_rejected_and_replaced() {
        let config = GameConfig {
            goals_to_win: 0,
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::GoalsToWin(0)));
        let fixed = config.sanitized();
        assert_eq!(fixed.goals_to_win, GameConfig::DEFAULT_GOALS_TO_WIN);
        assert_eq!(fixed.validate(), Ok(()));
    }

    #[test]
    fn every_invalid_value_replaced() {
        let config = GameConfig {
            goals_to_win: 0,
            turn_limit: 0,
            field_width: f32::NAN,
            field_height: -3.0,
            ..GameConfig::default()
        };
        let fixed = config.sanitized();
        assert_eq!(fixed.turn_limit, GameConfig::DEFAULT_TURN_LIMIT);
        assert_eq!(fixed.field_width, GameConfig::DEFAULT_FIELD_WIDTH);
        assert_eq!(fixed.field_height, GameConfig::DEFAULT_FIELD_HEIGHT);
        assert!(fixed.validate().is_ok());
    }

    #[test]
    fn valid_values_are_kept() {
        let config = GameConfig {
            goals_to_win: 7,
            turn_limit: 12,
            ..GameConfig::default()
        };
        assert_eq!(config.sanitized(), config);
    }

    #[test]
    fn error_messages_name_the_value() {
        let msg = ConfigError::TurnLimit(0).to_string();
        assert!(msg.contains("turn limit"), "{msg}");
    }

    #[test]
    fn config_parses_from_partial_json() {
        let config: GameConfig = serde_json::from_str(r#"{"goals_to_win": 5}"#).unwrap();
        assert_eq!(config.goals_to_win, 5);
        assert_eq!(config.turn_limit, GameConfig::DEFAULT_TURN_LIMIT);
    }
}
