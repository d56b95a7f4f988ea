//! Falling pickups and timed effects
//!
//! Pickups spawn at broken bricks, fall at a constant rate and are collected
//! on contact with the paddle rect. Each collected kind runs for a fixed
//! duration on the game clock. Collecting a kind that is already running
//! reverts it first and restarts the timer, so effects never compound.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::events::GameEvent;
use super::geom::Rect;
use super::state::{ActiveEffect, Ball, FallingPowerUp, Paddle, Playfield, PowerUpKind};
use crate::consts::*;
use crate::{LAUNCH_ANGLE_MAX, LAUNCH_ANGLE_MIN, velocity_from_angle};

/// Paddle width factor while BigPaddle runs
const BIG_PADDLE_FACTOR: f32 = 2.0;
/// Ball radius factor while SmallBall runs
const SMALL_BALL_FACTOR: f32 = 0.5;
/// Balls added by MultiBall
const MULTI_BALL_CLONES: usize = 2;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PowerUpEngine {
    /// Pickups in flight (sorted by id)
    pub falling: Vec<FallingPowerUp>,
    /// Running effects, at most one per kind, in activation order
    pub active: Vec<ActiveEffect>,
    next_id: u32,
}

impl PowerUpEngine {
    /// Drop a pickup of a uniformly random kind centered on `at`
    pub fn spawn_power_up(&mut self, at: Vec2, now_ms: f64, rng: &mut Pcg32) -> GameEvent {
        let kind = PowerUpKind::ALL[rng.random_range(0..PowerUpKind::ALL.len())];
        self.next_id += 1;
        self.falling.push(FallingPowerUp {
            id: self.next_id,
            kind,
            rect: Rect::from_center(at, POWER_UP_SIZE, POWER_UP_SIZE),
            created_ms: now_ms,
        });
        log::debug!("Spawned {:?} pickup at ({:.0}, {:.0})", kind, at.x, at.y);
        GameEvent::PowerUpSpawned { kind }
    }

    /// Spawn pickups for every drop the collision step reported
    pub fn consume_events(
        &mut self,
        events: &[GameEvent],
        now_ms: f64,
        rng: &mut Pcg32,
    ) -> Vec<GameEvent> {
        let mut spawned = Vec::new();
        for event in events {
            let at = match event {
                GameEvent::BrickDestroyed {
                    center,
                    drops_power_up: true,
                    ..
                } => *center,
                GameEvent::PowerUpSpawnRequested { at } => *at,
                _ => continue,
            };
            spawned.push(self.spawn_power_up(at, now_ms, rng));
        }
        spawned
    }

    /// One tick: move pickups, collect or discard them, expire effects
    pub fn update(
        &mut self,
        now_ms: f64,
        field: &Playfield,
        paddle: &mut Paddle,
        balls: &mut Vec<Ball>,
        rng: &mut Pcg32,
    ) -> Vec<GameEvent> {
        let mut events = Vec::new();

        let mut collected = Vec::new();
        self.falling.retain_mut(|pickup| {
            pickup.rect.y += POWER_UP_FALL_SPEED;
            if pickup.rect.intersects(&paddle.rect) {
                collected.push(pickup.kind);
                false
            } else {
                pickup.rect.top() <= field.height
            }
        });
        for kind in collected {
            self.activate(kind, now_ms, field, paddle, balls, rng);
            events.push(GameEvent::PowerUpPickup { kind });
        }

        let expired: Vec<PowerUpKind> = self
            .active
            .iter()
            .filter(|effect| now_ms > effect.end_ms)
            .map(|effect| effect.kind)
            .collect();
        for kind in expired {
            self.deactivate(kind, paddle, balls, rng);
            events.push(GameEvent::EffectExpired { kind });
        }

        events
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.active.iter().any(|effect| effect.kind == kind)
    }

    /// Running effects and their remaining time
    pub fn active_effects(&self, now_ms: f64) -> Vec<(PowerUpKind, f64)> {
        self.active
            .iter()
            .map(|effect| (effect.kind, effect.remaining_ms(now_ms)))
            .collect()
    }

    /// Start (or restart) an effect
    pub fn activate(
        &mut self,
        kind: PowerUpKind,
        now_ms: f64,
        field: &Playfield,
        paddle: &mut Paddle,
        balls: &mut Vec<Ball>,
        rng: &mut Pcg32,
    ) {
        if self.is_active(kind) {
            self.deactivate(kind, paddle, balls, rng);
        }

        match kind {
            PowerUpKind::BigPaddle => paddle.set_width(paddle.width() * BIG_PADDLE_FACTOR),
            PowerUpKind::SmallBall => {
                for ball in balls.iter_mut() {
                    ball.radius *= SMALL_BALL_FACTOR;
                }
            }
            PowerUpKind::MultiBall => spawn_clones(balls, rng),
            PowerUpKind::Laser => paddle.has_laser = true,
            PowerUpKind::Sticky => paddle.sticky = true,
            PowerUpKind::Shield => {
                paddle.has_shield = true;
                paddle.shield = Some(field.shield_rect());
            }
        }

        self.active.push(ActiveEffect {
            kind,
            start_ms: now_ms,
            end_ms: now_ms + kind.duration_ms(),
        });
        log::debug!("Activated {:?} for {} ms", kind, kind.duration_ms());
    }

    /// Undo an effect exactly and drop its timer. No-op if not running.
    pub fn deactivate(
        &mut self,
        kind: PowerUpKind,
        paddle: &mut Paddle,
        balls: &mut Vec<Ball>,
        rng: &mut Pcg32,
    ) {
        let Some(idx) = self.active.iter().position(|effect| effect.kind == kind) else {
            return;
        };
        self.active.remove(idx);

        match kind {
            PowerUpKind::BigPaddle => paddle.set_width(paddle.width() / BIG_PADDLE_FACTOR),
            PowerUpKind::SmallBall => {
                for ball in balls.iter_mut() {
                    ball.radius /= SMALL_BALL_FACTOR;
                }
            }
            PowerUpKind::MultiBall => {
                if balls.len() > 1 {
                    let keep = rng.random_range(0..balls.len());
                    let survivor = balls.swap_remove(keep);
                    balls.clear();
                    balls.push(survivor);
                }
            }
            PowerUpKind::Laser => {
                paddle.has_laser = false;
                paddle.lasers.clear();
            }
            PowerUpKind::Sticky => paddle.sticky = false,
            PowerUpKind::Shield => {
                paddle.has_shield = false;
                paddle.shield = None;
            }
        }
        log::debug!("Deactivated {:?}", kind);
    }

    /// Revert every running effect, oldest first
    pub fn revert_all(&mut self, paddle: &mut Paddle, balls: &mut Vec<Ball>, rng: &mut Pcg32) {
        while let Some(effect) = self.active.first().copied() {
            self.deactivate(effect.kind, paddle, balls, rng);
        }
    }

    /// Drop every pickup still in flight
    pub fn clear_falling(&mut self) {
        self.falling.clear();
    }
}

/// Add clones of the primary ball heading up at random launch angles
fn spawn_clones(balls: &mut Vec<Ball>, rng: &mut Pcg32) {
    let Some(primary) = balls.first().cloned() else {
        return;
    };
    let mut next_id = balls.iter().map(|b| b.id).max().unwrap_or(0);
    for _ in 0..MULTI_BALL_CLONES {
        next_id += 1;
        let angle = rng.random_range(LAUNCH_ANGLE_MIN..=LAUNCH_ANGLE_MAX);
        balls.push(Ball {
            id: next_id,
            vel: velocity_from_angle(angle, primary.speed),
            active: true,
            strong: false,
            ..primary.clone()
        });
    }
}
