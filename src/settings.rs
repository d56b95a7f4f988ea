//! Game settings and difficulty presets
//!
//! Loaded from JSON; any field left out takes its default.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::Playfield;

/// Errors from loading or validating settings
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid setting: {0}")]
    Invalid(String),
}

/// Difficulty preset, scaling relative to Normal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "medium" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Ball speed factor (5, 7 and 10 units per tick against 7)
    pub fn ball_speed_factor(&self) -> f32 {
        match self {
            Difficulty::Easy => 5.0 / 7.0,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 10.0 / 7.0,
        }
    }

    pub fn paddle_size_factor(&self) -> f32 {
        match self {
            Difficulty::Easy => 1.2,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 0.8,
        }
    }

    /// Score factor (1, 1.5 and 2 against 1.5)
    pub fn score_factor(&self) -> f32 {
        match self {
            Difficulty::Easy => 1.0 / 1.5,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 2.0 / 1.5,
        }
    }

    /// Power-up drop factor (0.1, 0.05 and 0.03 against 0.05)
    pub fn power_up_factor(&self) -> f32 {
        match self {
            Difficulty::Easy => 2.0,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 0.6,
        }
    }
}

/// Resolved gameplay scales the simulation reads
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameplayTuning {
    pub ball_speed_scale: f32,
    pub paddle_size_scale: f32,
    pub power_up_frequency: f32,
    pub score_scale: f32,
    pub combo_timeout_ms: f64,
}

impl Default for GameplayTuning {
    fn default() -> Self {
        Settings::default().tuning()
    }
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub difficulty: Difficulty,
    /// Starting lives
    pub lives: u8,
    /// Last level; clearing it wins the game
    pub max_level: u32,

    // === Gameplay scales (1.0 = stock) ===
    pub ball_speed: f32,
    pub platform_size: f32,
    pub power_up_frequency: f32,

    /// Gap between hits that resets the combo
    pub combo_timeout_ms: f64,

    // === Playfield ===
    pub screen_width: f32,
    pub screen_height: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            lives: STARTING_LIVES,
            max_level: MAX_LEVEL,

            ball_speed: 1.0,
            platform_size: 1.0,
            power_up_frequency: 1.0,

            combo_timeout_ms: COMBO_TIMEOUT_MS,

            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
        }
    }
}

impl Settings {
    /// Settings with a difficulty preset and everything else default
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            ..Self::default()
        }
    }

    /// Combine the preset with the user scales
    pub fn tuning(&self) -> GameplayTuning {
        GameplayTuning {
            ball_speed_scale: self.ball_speed * self.difficulty.ball_speed_factor(),
            paddle_size_scale: self.platform_size * self.difficulty.paddle_size_factor(),
            power_up_frequency: self.power_up_frequency * self.difficulty.power_up_factor(),
            score_scale: self.difficulty.score_factor(),
            combo_timeout_ms: self.combo_timeout_ms,
        }
    }

    pub fn playfield(&self) -> Playfield {
        Playfield {
            width: self.screen_width,
            height: self.screen_height,
        }
    }

    /// Parse JSON and validate
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read a JSON settings file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json_str(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lives == 0 {
            return Err(ConfigError::Invalid("lives must be at least 1".into()));
        }
        if self.max_level == 0 {
            return Err(ConfigError::Invalid("max_level must be at least 1".into()));
        }
        for (name, value) in [
            ("ball_speed", self.ball_speed),
            ("platform_size", self.platform_size),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if !self.power_up_frequency.is_finite() || self.power_up_frequency < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "power_up_frequency must be non-negative, got {}",
                self.power_up_frequency
            )));
        }
        if !self.combo_timeout_ms.is_finite() || self.combo_timeout_ms <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "combo_timeout_ms must be positive, got {}",
                self.combo_timeout_ms
            )));
        }
        let paddle_width = PADDLE_WIDTH * self.tuning().paddle_size_scale;
        if self.screen_width < paddle_width || self.screen_width < BRICK_WIDTH + BRICK_PADDING {
            return Err(ConfigError::Invalid(format!(
                "screen_width {} is too narrow",
                self.screen_width
            )));
        }
        if self.screen_height < PADDLE_BOTTOM_OFFSET + BALL_SPAWN_OFFSET + BRICK_TOP_OFFSET {
            return Err(ConfigError::Invalid(format!(
                "screen_height {} is too short",
                self.screen_height
            )));
        }
        Ok(())
    }
}
