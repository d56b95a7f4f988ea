//! Read-only view of the game for presentation
//!
//! Everything a renderer or HUD needs, flattened and serializable. Built
//! fresh from the state each frame; nothing here feeds back into the sim.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geom::Rect;
use super::state::{BrickKind, GamePhase, GameState, PaddleVisual, PowerUpKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallView {
    pub pos: Vec2,
    pub radius: f32,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaddleView {
    pub rect: Rect,
    pub visual: PaddleVisual,
    pub has_laser: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrickView {
    pub id: u32,
    pub kind: BrickKind,
    pub rect: Rect,
    /// None for indestructible bricks
    pub hits_left: Option<u32>,
    pub contains_power_up: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickupView {
    pub kind: PowerUpKind,
    pub rect: Rect,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectView {
    pub kind: PowerUpKind,
    pub remaining_ms: f64,
}

/// Renderable frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub level: u32,
    pub lives: u8,
    pub score: u64,
    pub combo: u32,
    pub combo_multiplier: f32,
    pub clock_ms: f64,
    pub paddle: PaddleView,
    pub balls: Vec<BallView>,
    pub lasers: Vec<Rect>,
    pub shield: Option<Rect>,
    pub bricks: Vec<BrickView>,
    pub pickups: Vec<PickupView>,
    pub effects: Vec<EffectView>,
}

impl Snapshot {
    pub fn capture(state: &GameState) -> Self {
        let now = state.clock_ms;
        Self {
            phase: state.phase,
            level: state.level,
            lives: state.lives,
            score: state.score,
            combo: state.combo.combo,
            combo_multiplier: state.combo.multiplier(),
            clock_ms: now,
            paddle: PaddleView {
                rect: state.paddle.rect,
                visual: state.paddle.visual(),
                has_laser: state.paddle.has_laser,
            },
            balls: state
                .balls
                .iter()
                .map(|b| BallView {
                    pos: b.pos,
                    radius: b.radius,
                    active: b.active,
                })
                .collect(),
            lasers: state.paddle.lasers.iter().map(|l| l.rect).collect(),
            shield: state.paddle.shield.filter(|_| state.paddle.has_shield),
            bricks: state
                .bricks
                .iter()
                .map(|b| BrickView {
                    id: b.id,
                    kind: b.kind,
                    rect: b.rect,
                    hits_left: b.hits_left(),
                    contains_power_up: b.contains_power_up,
                })
                .collect(),
            pickups: state
                .power_ups
                .falling
                .iter()
                .map(|p| PickupView {
                    kind: p.kind,
                    rect: p.rect,
                })
                .collect(),
            effects: state
                .power_ups
                .active_effects(now)
                .into_iter()
                .map(|(kind, remaining_ms)| EffectView { kind, remaining_ms })
                .collect(),
        }
    }
}
