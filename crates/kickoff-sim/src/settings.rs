use kickoff_core::game_trait::GameConfig;

/// Run settings, read from `KICKOFF_*` environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct SimSettings {
    pub seed: Option<u64>,
    pub goals_to_win: u32,
    pub turn_limit: u32,
    pub powerups_enabled: bool,
    /// Hard stop in case a match never finishes.
    pub max_ticks: u64,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            seed: None,
            goals_to_win: GameConfig::DEFAULT_GOALS_TO_WIN,
            turn_limit: GameConfig::DEFAULT_TURN_LIMIT,
            powerups_enabled: true,
            max_ticks: 200_000,
        }
    }
}

impl SimSettings {
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();
        if let Some(val) = lookup("KICKOFF_SEED")
            && let Ok(n) = val.parse::<u64>()
        {
            settings.seed = Some(n);
        }
        if let Some(val) = lookup("KICKOFF_GOALS")
            && let Ok(n) = val.parse::<u32>()
        {
            settings.goals_to_win = n;
        }
        if let Some(val) = lookup("KICKOFF_TURN_LIMIT")
            && let Ok(n) = val.parse::<u32>()
        {
            settings.turn_limit = n;
        }
        if let Some(val) = lookup("KICKOFF_POWERUPS")
            && let Ok(b) = val.parse::<bool>()
        {
            settings.powerups_enabled = b;
        }
        if let Some(val) = lookup("KICKOFF_MAX_TICKS")
            && let Ok(n) = val.parse::<u64>()
        {
            settings.max_ticks = n;
        }
        settings
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            goals_to_win: self.goals_to_win,
            turn_limit: self.turn_limit,
            powerups_enabled: self.powerups_enabled,
            seed: self.seed,
            ..GameConfig::default()
        }
    }
}
