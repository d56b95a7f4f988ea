//! Discrete events emitted by a tick, and the sound cues they map to

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{BrickKind, PowerUpKind};

/// What a Mystery brick rolled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MysteryReward {
    BonusPoints,
    PowerUp,
    ClearRow,
}

/// Something that happened during a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    WallHit,
    PaddleHit,
    /// Sticky paddle caught a ball
    BallCaught,
    ShieldHit,
    LaserFired,
    /// Brick struck but still standing
    BrickHit { kind: BrickKind },
    BrickDestroyed {
        kind: BrickKind,
        center: Vec2,
        drops_power_up: bool,
    },
    /// Points credited (already multiplied)
    BrickScore { points: u64 },
    Explosion { center: Vec2, destroyed: usize },
    MysteryRevealed { reward: MysteryReward },
    /// Request for a falling power-up outside of the drop flag
    PowerUpSpawnRequested { at: Vec2 },
    PowerUpSpawned { kind: PowerUpKind },
    PowerUpPickup { kind: PowerUpKind },
    EffectExpired { kind: PowerUpKind },
    BallLaunched,
    LifeLost { lives_left: u8 },
    LevelComplete { level: u32 },
    GameWon { final_score: u64 },
    GameOver { final_score: u64 },
}

/// Sound trigger names consumed by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    WallHit,
    BrickScore,
    LifeLost,
    PowerUpPickup,
    BrickBreak(BrickKind),
}

impl SoundCue {
    pub fn name(&self) -> &'static str {
        match self {
            SoundCue::WallHit => "wall-hit",
            SoundCue::BrickScore => "brick-score",
            SoundCue::LifeLost => "life-lost",
            SoundCue::PowerUpPickup => "power-up-pickup",
            SoundCue::BrickBreak(_) => "brick-break-by-type",
        }
    }
}

impl GameEvent {
    /// Sound to play for this event, if any
    pub fn sound_cue(&self) -> Option<SoundCue> {
        match self {
            GameEvent::WallHit | GameEvent::PaddleHit | GameEvent::ShieldHit => {
                Some(SoundCue::WallHit)
            }
            GameEvent::BrickScore { .. } => Some(SoundCue::BrickScore),
            GameEvent::BrickDestroyed { kind, .. } => Some(SoundCue::BrickBreak(*kind)),
            GameEvent::LifeLost { .. } => Some(SoundCue::LifeLost),
            GameEvent::PowerUpPickup { .. } => Some(SoundCue::PowerUpPickup),
            _ => None,
        }
    }
}

/// Collect the distinct sound cues for a batch of events, in first-seen order
pub fn sound_cues(events: &[GameEvent]) -> Vec<SoundCue> {
    let mut cues = Vec::new();
    for cue in events.iter().filter_map(GameEvent::sound_cue) {
        if !cues.contains(&cue) {
            cues.push(cue);
        }
    }
    cues
}
