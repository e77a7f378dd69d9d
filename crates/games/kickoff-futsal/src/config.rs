use serde::{Deserialize, Serialize};

use crate::formation::Formation;

/// Body and integration tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub player_radius: f32,
    pub ball_radius: f32,
    /// Mass per unit area of a player token.
    pub player_density: f32,
    pub ball_density: f32,
    pub player_restitution: f32,
    pub ball_restitution: f32,
    /// Fraction of velocity lost per reference-rate tick.
    pub air_friction: f32,
    /// Coulomb coefficient for tangential contact friction.
    pub surface_friction: f32,
    /// Rate (Hz) at which `air_friction` is specified.
    pub reference_rate: f32,
    /// Collision sub-iterations per tick.
    pub substeps: u32,
    /// Total kinetic energy (sum of speed² + angular speed²) below which a shot is over.
    pub settle_threshold: f32,
    /// Bodies slower than this (units/s) are snapped to rest.
    pub rest_speed: f32,
    /// Angular speeds below this (rad/s) are snapped to rest.
    pub rest_angular_speed: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            player_radius: 28.0,
            ball_radius: 20.0,
            player_density: 0.002,
            ball_density: 0.0008,
            player_restitution: 0.99,
            ball_restitution: 0.99,
            air_friction: 0.008,
            surface_friction: 0.001,
            reference_rate: 60.0,
            substeps: 4,
            settle_threshold: 36.0,
            rest_speed: 2.0,
            rest_angular_speed: 0.05,
        }
    }
}

/// Drag-to-shoot tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShotConfig {
    /// Impulse per unit of drag distance.
    pub sensitivity: f32,
    /// Upper bound on the impulse of a single shot.
    pub max_impulse: f32,
    /// Drags shorter than this are cancelled.
    pub min_drag_distance: f32,
    /// Drag distance that shows as full power.
    pub power_calibration: f32,
    /// Applied to both sensitivity and max impulse for a speed-boosted shot.
    pub speed_boost_multiplier: f32,
    /// Applied to both sensitivity and max impulse when shooting with a giant token.
    pub giant_force_factor: f32,
    /// Applied to both sensitivity and max impulse for a slowed team.
    pub slow_factor: f32,
}

impl Default for ShotConfig {
    fn default() -> Self {
        Self {
            sensitivity: 10.2,
            max_impulse: 1700.0,
            min_drag_distance: 5.0,
            power_calibration: 100.0,
            speed_boost_multiplier: 3.0,
            giant_force_factor: 5.0,
            slow_factor: 0.15,
        }
    }
}

/// Field proportions, all relative to the viewport.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Horizontal margin outside the goal nets, as a fraction of width.
    pub margin_x_ratio: f32,
    /// Vertical margin outside the side lines, as a fraction of height.
    pub margin_y_ratio: f32,
    /// Goal mouth width as a fraction of height.
    pub goal_width_ratio: f32,
    /// Net depth behind the goal line as a fraction of width.
    pub goal_depth_ratio: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            margin_x_ratio: 0.065,
            margin_y_ratio: 0.08,
            goal_width_ratio: 0.2,
            goal_depth_ratio: 0.075,
        }
    }
}

/// Mystery-box power-up tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpConfig {
    /// Turn count at which the first box always spawns.
    pub first_spawn_turn: u32,
    /// Minimum turns between spawns after the first.
    pub min_gap: u32,
    /// Maximum turns between spawns after the first.
    pub max_gap: u32,
    /// Turn switches an uncollected box survives.
    pub lifetime_turns: u32,
    /// Minimum distance between a spawn point and any player token.
    pub spawn_clearance: f32,
    pub spawn_attempts: u32,
    /// Half the side length of the box.
    pub half_size: f32,
    /// Linear scale of a giant token.
    pub giant_scale: f32,
    pub giant_density: f32,
}

impl Default for PowerUpConfig {
    fn default() -> Self {
        Self {
            first_spawn_turn: 3,
            min_gap: 2,
            max_gap: 3,
            lifetime_turns: 2,
            spawn_clearance: 60.0,
            spawn_attempts: 10,
            half_size: 20.0,
            giant_scale: 1.5,
            giant_density: 0.01,
        }
    }
}

/// Top-level futsal tuning, loadable from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FutsalConfig {
    pub physics: PhysicsConfig,
    pub shot: ShotConfig,
    pub field: FieldConfig,
    pub powerups: PowerUpConfig,
    /// Formations used at kickoff (first entry) and after goals.
    pub formations: Vec<Formation>,
    /// Simulated seconds the goal is shown before the round resets.
    pub goal_reset_delay: f32,
    pub tick_rate_hz: f32,
}

impl Default for FutsalConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            shot: ShotConfig::default(),
            field: FieldConfig::default(),
            powerups: PowerUpConfig::default(),
            formations: Formation::ALL.to_vec(),
            goal_reset_delay: 1.5,
            tick_rate_hz: 60.0,
        }
    }
}

impl FutsalConfig {
    /// Load config from the path in `KICKOFF_FUTSAL_CONFIG` or
    /// `config/futsal.toml`. Falls back to defaults if the file is missing
    /// or unparseable.
    pub fn load() -> Self {
        let path = std::env::var("KICKOFF_FUTSAL_CONFIG")
            .unwrap_or_else(|_| "config/futsal.toml".to_string());
        match std::fs::read_to_string(&path) {
            Ok(content) => Self::from_toml(&content).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse {path}: {e}, using defaults");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(content)?;
        if config.formations.is_empty() {
            tracing::warn!("No formations configured, using all");
            config.formations = Formation::ALL.to_vec();
        }
        Ok(config)
    }
}
