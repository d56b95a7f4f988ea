//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. Every tick
//! applies input, runs the collision step, then the power-up engine, then
//! combo decay, and finally handles life loss and level transitions.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{CollisionResolver, StepContext};
use super::events::{GameEvent, SoundCue, sound_cues};
use super::level::is_game_complete;
use super::state::{GamePhase, GameState, PaddleIntent};
use crate::consts::*;
use crate::{LAUNCH_ANGLE_MAX, LAUNCH_ANGLE_MIN};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickInput {
    /// Paddle movement
    pub paddle: PaddleIntent,
    /// Launch idle balls (click/space)
    pub launch: bool,
    /// Fire lasers when armed
    pub fire: bool,
    /// Pause toggle
    pub pause: bool,
    /// Idle/demo mode - AI plays the game
    pub idle_mode: bool,
}

/// What a tick produced
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickReport {
    pub score_delta: u64,
    pub events: Vec<GameEvent>,
}

impl TickReport {
    pub fn sound_cues(&self) -> Vec<SoundCue> {
        sound_cues(&self.events)
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) -> TickReport {
    let mut report = TickReport::default();

    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing | GamePhase::Serve => {
                state.phase = GamePhase::Paused;
                return report;
            }
            GamePhase::Paused => {
                state.phase = if state.balls.iter().any(|b| b.active) {
                    GamePhase::Playing
                } else {
                    GamePhase::Serve
                };
            }
            _ => {}
        }
    }

    // Clock only runs while the game does
    if matches!(
        state.phase,
        GamePhase::Paused | GamePhase::GameOver | GamePhase::GameWon
    ) {
        return report;
    }

    let mut input = input.clone();
    if input.idle_mode {
        autopilot(state, &mut input);
    }

    state.paddle.apply_intent(input.paddle);

    if input.launch {
        for ball in state.balls.iter_mut().filter(|b| !b.active) {
            let angle = state.rng.random_range(LAUNCH_ANGLE_MIN..=LAUNCH_ANGLE_MAX);
            ball.launch(angle);
            report.events.push(GameEvent::BallLaunched);
        }
        if state.phase == GamePhase::Serve && state.balls.iter().any(|b| b.active) {
            state.phase = GamePhase::Playing;
        }
    }

    if input.fire && state.paddle.fire_laser(state.clock_ms) {
        report.events.push(GameEvent::LaserFired);
    }

    let now = state.clock_ms;
    let ctx = StepContext {
        now_ms: now,
        score_multiplier: state.layout.score_multiplier * state.tuning.score_scale,
    };
    let outcome = CollisionResolver::new(state.field).resolve_step(
        &mut state.balls,
        &mut state.paddle,
        &mut state.bricks,
        &mut state.combo,
        &mut state.rng,
        ctx,
    );
    state.score += outcome.score_delta;
    report.score_delta += outcome.score_delta;

    let spawned = state
        .power_ups
        .consume_events(&outcome.events, now, &mut state.rng);
    report.events.extend(outcome.events);
    report.events.extend(spawned);
    let effect_events = state.power_ups.update(
        now,
        &state.field,
        &mut state.paddle,
        &mut state.balls,
        &mut state.rng,
    );
    report.events.extend(effect_events);

    state.combo.update(now);

    if outcome.life_lost {
        lose_life(state, &mut report);
    } else if state.is_level_complete() {
        advance_level(state, &mut report);
    }

    state.normalize_order();
    state.time_ticks += 1;
    state.clock_ms += TICK_MS;
    report
}

fn lose_life(state: &mut GameState, report: &mut TickReport) {
    state.lives = state.lives.saturating_sub(1);
    report.events.push(GameEvent::LifeLost {
        lives_left: state.lives,
    });
    if state.lives == 0 {
        state.phase = GamePhase::GameOver;
        report.events.push(GameEvent::GameOver {
            final_score: state.score,
        });
        log::info!("Game over on level {} with {} points", state.level, state.score);
    } else {
        log::debug!("Life lost, {} left", state.lives);
        state.reset_paddle_and_ball();
        state.phase = GamePhase::Serve;
    }
}

fn advance_level(state: &mut GameState, report: &mut TickReport) {
    report.events.push(GameEvent::LevelComplete { level: state.level });
    let next = state.level + 1;
    if is_game_complete(next, state.max_level) {
        state.phase = GamePhase::GameWon;
        report.events.push(GameEvent::GameWon {
            final_score: state.score,
        });
        log::info!("Game won with {} points", state.score);
    } else {
        state.start_level(next);
    }
}

/// Fill in input for demo/headless play
fn autopilot(state: &GameState, input: &mut TickInput) {
    // Auto-launch anything resting on the paddle
    if state.balls.iter().any(|b| !b.active) {
        input.launch = true;
    }
    input.fire = state.paddle.has_laser;

    // Most dangerous ball: lowest one on its way down
    let threat = state
        .balls
        .iter()
        .filter(|b| b.active)
        .max_by(|a, b| {
            let a_key = (a.vel.y > 0.0, a.pos.y);
            let b_key = (b.vel.y > 0.0, b.pos.y);
            a_key
                .partial_cmp(&b_key)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    let Some(ball) = threat else {
        input.paddle = PaddleIntent::Hold;
        return;
    };

    // If safe, go grab the lowest pickup
    let ball_is_safe = ball.vel.y < 0.0 || ball.pos.y < state.field.height / 2.0;
    let pickup = state
        .power_ups
        .falling
        .iter()
        .max_by(|a, b| {
            a.rect
                .y
                .partial_cmp(&b.rect.y)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    if let (true, Some(pickup)) = (ball_is_safe, pickup) {
        input.paddle = PaddleIntent::Follow(pickup.rect.center().x);
        return;
    }

    // Offset the paddle so the bounce heads toward the first standing brick
    let lean = state
        .bricks
        .iter()
        .find(|b| b.counts_for_clear())
        .map(|brick| ((brick.rect.center().x - ball.pos.x) / 300.0).clamp(-1.0, 1.0) * 0.4)
        .unwrap_or(0.0);
    input.paddle = PaddleIntent::Follow(ball.pos.x + lean * state.paddle.width());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Brick, BrickKind, PowerUpKind};
    use crate::sim::geom::Rect;
    use glam::Vec2;

    fn launch() -> TickInput {
        TickInput {
            launch: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_tick_serve_to_playing() {
        let mut state = GameState::new(12345);
        assert_eq!(state.phase, GamePhase::Serve);

        // Tick without launch - should stay in Serve
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Serve);
        assert!(!state.balls[0].active);

        let report = tick(&mut state, &launch());
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.balls[0].active);
        assert!(state.balls[0].vel.y < 0.0);
        assert!(report.events.contains(&GameEvent::BallLaunched));
    }

    #[test]
    fn test_tick_pause() {
        let mut state = GameState::new(12345);
        tick(&mut state, &launch());
        assert_eq!(state.phase, GamePhase::Playing);

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause);
        assert_eq!(state.phase, GamePhase::Paused);

        // Frozen while paused
        let clock = state.clock_ms;
        let pos = state.balls[0].pos;
        for _ in 0..30 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.clock_ms, clock);
        assert_eq!(state.balls[0].pos, pos);

        // Unpause
        tick(&mut state, &pause);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.clock_ms > clock);
    }

    #[test]
    fn test_pause_freezes_effect_timers() {
        let mut state = GameState::new(12345);
        tick(&mut state, &launch());
        let now = state.clock_ms;
        state.power_ups.activate(
            PowerUpKind::Sticky,
            now,
            &state.field,
            &mut state.paddle,
            &mut state.balls,
            &mut state.rng,
        );
        let remaining = state.power_ups.active_effects(state.clock_ms);

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause);
        // Longer than the effect lasts
        for _ in 0..(TICK_RATE * 20) {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.power_ups.active_effects(state.clock_ms), remaining);

        tick(&mut state, &pause);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.power_ups.is_active(PowerUpKind::Sticky));
        assert!(state.paddle.sticky);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);

        let demo = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for _ in 0..600 {
            tick(&mut state1, &demo);
            tick(&mut state2, &demo);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.balls.len(), state2.balls.len());
        assert_eq!(state1.bricks.len(), state2.bricks.len());
        assert_eq!(state1.balls[0].pos, state2.balls[0].pos);
    }

    #[test]
    fn test_life_loss_reverts_effects() {
        let mut state = GameState::new(7);
        tick(&mut state, &launch());
        state.power_ups.activate(
            PowerUpKind::BigPaddle,
            state.clock_ms,
            &state.field,
            &mut state.paddle,
            &mut state.balls,
            &mut state.rng,
        );
        assert_eq!(state.paddle.width(), 2.0 * PADDLE_WIDTH);

        state.balls[0].pos = Vec2::new(400.0, 650.0);
        let report = tick(&mut state, &TickInput::default());
        assert_eq!(state.lives, 2);
        assert_eq!(state.phase, GamePhase::Serve);
        assert_eq!(state.paddle.width(), PADDLE_WIDTH);
        assert!(state.power_ups.active.is_empty());
        assert_eq!(state.balls.len(), 1);
        assert!(!state.balls[0].active);
        assert!(report.events.contains(&GameEvent::LifeLost { lives_left: 2 }));
        assert!(report.sound_cues().contains(&SoundCue::LifeLost));
    }

    #[test]
    fn test_last_life_ends_game() {
        let mut state = GameState::new(7);
        state.lives = 1;
        tick(&mut state, &launch());
        state.balls[0].pos = Vec2::new(400.0, 650.0);
        let report = tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(report.events.iter().any(|e| matches!(e, GameEvent::GameOver { .. })));

        // Nothing moves after game over
        let ticks = state.time_ticks;
        tick(&mut state, &launch());
        assert_eq!(state.time_ticks, ticks);
    }

    #[test]
    fn test_level_clear_advances() {
        let mut state = GameState::new(21);
        tick(&mut state, &launch());
        state.bricks = vec![Brick::new(
            999,
            BrickKind::Indestructible,
            Rect::new(0.0, 50.0, BRICK_WIDTH, BRICK_HEIGHT),
        )];
        let report = tick(&mut state, &TickInput::default());
        assert!(report.events.contains(&GameEvent::LevelComplete { level: 1 }));
        assert_eq!(state.level, 2);
        assert_eq!(state.phase, GamePhase::Serve);
        assert!(!state.is_level_complete());
        assert!((state.balls[0].speed - 6.0).abs() < 1e-6);
    }

    #[test]
    fn test_final_level_clear_wins() {
        let mut state = GameState::new(21);
        state.start_level(3);
        state.bricks.clear();
        let report = tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::GameWon);
        assert!(report.events.iter().any(|e| matches!(e, GameEvent::GameWon { .. })));
    }

    #[test]
    fn test_fire_laser() {
        let mut state = GameState::new(3);
        state.paddle.has_laser = true;
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        let report = tick(&mut state, &fire);
        assert!(report.events.contains(&GameEvent::LaserFired));
        assert_eq!(state.paddle.lasers.len(), 1);
        // Still cooling down
        let report = tick(&mut state, &fire);
        assert!(!report.events.contains(&GameEvent::LaserFired));
    }

    #[test]
    fn test_idle_ball_follows_paddle() {
        let mut state = GameState::new(3);
        let right = TickInput {
            paddle: PaddleIntent::Right,
            ..Default::default()
        };
        for _ in 0..10 {
            tick(&mut state, &right);
        }
        assert_eq!(state.balls[0].pos.x, state.paddle.center_x());
    }

    #[test]
    fn test_autopilot_plays() {
        let mut state = GameState::new(2024);
        let demo = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for _ in 0..(TICK_RATE * 120) {
            tick(&mut state, &demo);
            assert!(!state.balls.is_empty());
            if matches!(state.phase, GamePhase::GameOver | GamePhase::GameWon) {
                break;
            }
        }
        assert!(state.score > 0);
    }
}
