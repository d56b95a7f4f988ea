//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - One seeded RNG stream, owned by the game state
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or storage dependencies

pub mod collision;
pub mod combo;
pub mod events;
pub mod geom;
pub mod level;
pub mod powerup;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use collision::{CollisionResolver, StepContext, StepOutcome, bounce_velocity, hit_point};
pub use combo::ComboScorer;
pub use events::{GameEvent, MysteryReward, SoundCue, sound_cues};
pub use geom::Rect;
pub use level::{LayoutStrategy, LevelGenerator, LevelLayout, is_game_complete, is_level_complete};
pub use powerup::PowerUpEngine;
pub use snapshot::Snapshot;
pub use state::{
    ActiveEffect, Ball, Brick, BrickKind, FallingPowerUp, GamePhase, GameState, HitOutcome, Laser,
    Paddle, PaddleIntent, PaddleVisual, Playfield, PowerUpKind,
};
pub use tick::{TickInput, TickReport, tick};
