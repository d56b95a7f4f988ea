//! Brick Blitz - A brick-breaking arcade game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (collisions, power-ups, levels, combo)
//! - `session`: Fixed-step driver that feeds ticks and reports game over
//! - `settings`: Data-driven gameplay configuration
//! - `highscores`: Score sink contract and in-memory leaderboard

pub mod highscores;
pub mod session;
pub mod settings;
pub mod sim;

pub use highscores::{HighScores, ScoreSink};
pub use session::Session;
pub use settings::{ConfigError, Difficulty, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate (ticks per second)
    pub const TICK_RATE: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;
    /// Milliseconds of game clock per tick
    pub const TICK_MS: f64 = 1000.0 / TICK_RATE as f64;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playfield dimensions (y grows downward)
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 100.0;
    pub const PADDLE_HEIGHT: f32 = 20.0;
    /// Distance from the paddle's top edge to the bottom of the screen
    pub const PADDLE_BOTTOM_OFFSET: f32 = 40.0;
    /// Paddle speed in units per tick
    pub const PADDLE_SPEED: f32 = 8.0;
    /// Pointer-follow dead zone around the paddle center
    pub const PADDLE_FOLLOW_DEAD_ZONE: f32 = 5.0;
    /// Paddle hitbox inset (total width, total height)
    pub const PADDLE_HITBOX_INSET: (f32, f32) = (10.0, 5.0);

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 8.0;
    /// Ball spawn height above the bottom of the screen
    pub const BALL_SPAWN_OFFSET: f32 = 60.0;
    /// Base ball speed in units per tick (overridden per level)
    pub const BALL_DEFAULT_SPEED: f32 = 7.0;

    /// Laser projectile geometry and timing
    pub const LASER_WIDTH: f32 = 4.0;
    pub const LASER_HEIGHT: f32 = 10.0;
    pub const LASER_SPEED: f32 = 10.0;
    pub const LASER_COOLDOWN_MS: f64 = 500.0;

    /// Shield geometry
    pub const SHIELD_HEIGHT: f32 = 10.0;
    pub const SHIELD_BOTTOM_OFFSET: f32 = 20.0;

    /// Brick grid
    pub const BRICK_WIDTH: f32 = 60.0;
    pub const BRICK_HEIGHT: f32 = 20.0;
    pub const BRICK_PADDING: f32 = 5.0;
    pub const BRICK_TOP_OFFSET: f32 = 50.0;
    /// Moving brick oscillation
    pub const BRICK_SWAY_RANGE: f32 = 50.0;
    pub const BRICK_SWAY_SPEED: f32 = 2.0;
    /// Explosion reach, center to center
    pub const EXPLOSION_RADIUS: f32 = 100.0;

    /// Falling power-up geometry and speed (units per tick)
    pub const POWER_UP_SIZE: f32 = 30.0;
    pub const POWER_UP_FALL_SPEED: f32 = 3.0;

    /// Combo
    pub const COMBO_TIMEOUT_MS: f64 = 2000.0;
    pub const COMBO_STEP: f32 = 0.1;

    /// Mystery brick payouts
    pub const MYSTERY_BONUS_POINTS: u64 = 100;
    pub const MYSTERY_ROW_POINTS: u64 = 20;

    /// Session defaults
    pub const STARTING_LIVES: u8 = 3;
    pub const MAX_LEVEL: u32 = 3;
    /// Highest level with its own parameter row
    pub const LEVEL_TABLE_SIZE: u32 = 10;
}

/// Launch angle range (radians). Negative angles point up the screen.
pub const LAUNCH_ANGLE_MIN: f32 = -3.0 * std::f32::consts::FRAC_PI_4;
pub const LAUNCH_ANGLE_MAX: f32 = -std::f32::consts::FRAC_PI_4;

/// Velocity of magnitude `speed` pointing along `angle`
#[inline]
pub fn velocity_from_angle(angle: f32, speed: f32) -> Vec2 {
    Vec2::new(angle.cos() * speed, angle.sin() * speed)
}

/// Relative speed comparison used by the physics tests and debug asserts
#[inline]
pub fn speeds_match(a: Vec2, b: Vec2, tolerance: f32) -> bool {
    let (la, lb) = (a.length(), b.length());
    (la - lb).abs() <= tolerance * la.max(lb).max(1.0)
}
