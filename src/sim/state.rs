//! Game state and core simulation types
//!
//! Everything needed to reproduce a run lives in `GameState`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::combo::ComboScorer;
use super::geom::Rect;
use super::level::{LevelGenerator, LevelLayout};
use super::powerup::PowerUpEngine;
use crate::consts::*;
use crate::settings::{GameplayTuning, Settings};
use crate::{LAUNCH_ANGLE_MAX, LAUNCH_ANGLE_MIN, velocity_from_angle};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ball resting on the paddle, waiting for launch input
    Serve,
    /// Active gameplay
    Playing,
    /// Game is paused (clock frozen)
    Paused,
    /// Lives exhausted
    GameOver,
    /// Final level cleared
    GameWon,
}

/// Playfield bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Default for Playfield {
    fn default() -> Self {
        Self {
            width: SCREEN_WIDTH,
            height: SCREEN_HEIGHT,
        }
    }
}

impl Playfield {
    /// Where a freshly reset ball waits
    pub fn ball_home(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height - BALL_SPAWN_OFFSET)
    }

    /// Full-width shield barrier near the bottom edge
    pub fn shield_rect(&self) -> Rect {
        Rect::new(
            0.0,
            self.height - SHIELD_BOTTOM_OFFSET,
            self.width,
            SHIELD_HEIGHT,
        )
    }
}

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Radius the ball returns to on reset
    pub base_radius: f32,
    /// Launch speed (units per tick)
    pub speed: f32,
    /// Moving (true) or resting on the paddle (false)
    pub active: bool,
    /// One-hit-kill against any destructible brick
    pub strong: bool,
}

impl Ball {
    pub fn new(id: u32, speed: f32) -> Self {
        Self {
            id,
            pos: Vec2::ZERO,
            vel: velocity_from_angle(LAUNCH_ANGLE_MAX, speed),
            radius: BALL_RADIUS,
            base_radius: BALL_RADIUS,
            speed,
            active: false,
            strong: false,
        }
    }

    /// Put the ball back at its home position, idle, with base size
    pub fn reset(&mut self, field: &Playfield) {
        self.active = false;
        self.strong = false;
        self.radius = self.base_radius;
        self.pos = field.ball_home();
        self.vel = velocity_from_angle(LAUNCH_ANGLE_MAX, self.speed);
    }

    /// Current speed magnitude
    #[inline]
    pub fn current_speed(&self) -> f32 {
        self.vel.length()
    }

    /// Bounding box for overlap tests
    pub fn bounds(&self) -> Rect {
        Rect::around_circle(self.pos, self.radius)
    }

    /// Snap the ball onto the paddle's top center and stop it
    pub fn attach_to(&mut self, paddle: &Paddle) {
        self.pos = Vec2::new(paddle.center_x(), paddle.top() - self.radius - 1.0);
        self.active = false;
    }

    /// Release an idle ball along `angle` at its base speed
    pub fn launch(&mut self, angle: f32) {
        if !self.active {
            let angle = angle.clamp(LAUNCH_ANGLE_MIN, LAUNCH_ANGLE_MAX);
            self.vel = velocity_from_angle(angle, self.speed);
            self.active = true;
        }
    }

    /// Advance by one tick of velocity
    pub fn advance(&mut self) {
        if self.active {
            self.pos += self.vel;
        }
    }
}

/// Laser projectile fired from the paddle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Laser {
    pub rect: Rect,
}

/// Paddle appearance, derived from current flags every frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaddleVisual {
    Normal,
    Wide,
    Sticky,
    StickyWide,
}

/// Paddle movement intent for one tick
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum PaddleIntent {
    #[default]
    Hold,
    Left,
    Right,
    /// Pointer x position to chase
    Follow(f32),
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub rect: Rect,
    /// Width the paddle returns to after size effects
    pub original_width: f32,
    /// Movement speed (units per tick)
    pub speed: f32,
    pub sticky: bool,
    pub has_laser: bool,
    pub has_shield: bool,
    /// Lasers in flight
    pub lasers: Vec<Laser>,
    pub shield: Option<Rect>,
    /// Game clock time of the last shot
    pub last_laser_ms: Option<f64>,
    /// Screen width for clamping
    field_width: f32,
    field_height: f32,
}

impl Paddle {
    pub fn new(field: &Playfield, width: f32) -> Self {
        let mut paddle = Self {
            rect: Rect::new(0.0, 0.0, width, PADDLE_HEIGHT),
            original_width: width,
            speed: PADDLE_SPEED,
            sticky: false,
            has_laser: false,
            has_shield: false,
            lasers: Vec::new(),
            shield: None,
            last_laser_ms: None,
            field_width: field.width,
            field_height: field.height,
        };
        paddle.reset();
        paddle
    }

    /// Back to the home position with base width and no effect flags
    pub fn reset(&mut self) {
        self.rect.w = self.original_width;
        self.rect.x = self.field_width / 2.0 - self.rect.w / 2.0;
        self.rect.y = self.field_height - PADDLE_BOTTOM_OFFSET;
        self.sticky = false;
        self.has_laser = false;
        self.has_shield = false;
        self.shield = None;
        self.lasers.clear();
        self.last_laser_ms = None;
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.rect.w
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.rect.top()
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.rect.center().x
    }

    /// Collision box, inset from the visual rect for forgiving contact
    pub fn hitbox(&self) -> Rect {
        self.rect
            .inflate(-PADDLE_HITBOX_INSET.0, -PADDLE_HITBOX_INSET.1)
    }

    /// Change width around the current center, keeping the paddle on screen
    pub fn set_width(&mut self, width: f32) {
        let center = self.center_x();
        self.rect.w = width;
        self.rect.x = center - width / 2.0;
        self.clamp_to_field();
    }

    fn clamp_to_field(&mut self) {
        let max_x = (self.field_width - self.rect.w).max(0.0);
        self.rect.x = self.rect.x.clamp(0.0, max_x);
    }

    /// Apply one tick of movement intent
    pub fn apply_intent(&mut self, intent: PaddleIntent) {
        match intent {
            PaddleIntent::Hold => {}
            PaddleIntent::Left => self.rect.x -= self.speed,
            PaddleIntent::Right => self.rect.x += self.speed,
            PaddleIntent::Follow(target_x) => {
                let delta = target_x - self.center_x();
                if delta.abs() > PADDLE_FOLLOW_DEAD_ZONE {
                    self.rect.x += delta.clamp(-self.speed, self.speed);
                }
            }
        }
        self.clamp_to_field();
    }

    /// Fire a laser if armed and off cooldown. Returns true when fired.
    pub fn fire_laser(&mut self, now_ms: f64) -> bool {
        if !self.has_laser {
            return false;
        }
        let ready = self
            .last_laser_ms
            .is_none_or(|last| now_ms - last > LASER_COOLDOWN_MS);
        if !ready {
            return false;
        }
        self.lasers.push(Laser {
            rect: Rect::new(
                self.center_x() - LASER_WIDTH / 2.0,
                self.top(),
                LASER_WIDTH,
                LASER_HEIGHT,
            ),
        });
        self.last_laser_ms = Some(now_ms);
        true
    }

    /// Move lasers upward, dropping those that left the screen
    pub fn update_lasers(&mut self) {
        for laser in &mut self.lasers {
            laser.rect.y -= LASER_SPEED;
        }
        self.lasers.retain(|laser| laser.rect.bottom() >= 0.0);
    }

    /// Appearance from current flags (never cached)
    pub fn visual(&self) -> PaddleVisual {
        let wide = self.rect.w > self.original_width;
        match (self.sticky, wide) {
            (false, false) => PaddleVisual::Normal,
            (false, true) => PaddleVisual::Wide,
            (true, false) => PaddleVisual::Sticky,
            (true, true) => PaddleVisual::StickyWide,
        }
    }
}

/// Brick types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BrickKind {
    #[default]
    Normal,
    Hard,
    Explosive,
    MultiHit,
    PowerUp,
    Mystery,
    Indestructible, // Cannot be destroyed, doesn't count for level clear
    Moving,
}

impl BrickKind {
    /// Hits needed to break (Indestructible never breaks)
    pub fn hits_required(&self) -> u32 {
        match self {
            BrickKind::Normal => 1,
            BrickKind::Hard => 2,
            BrickKind::Explosive => 1,
            BrickKind::MultiHit => 3,
            BrickKind::PowerUp => 1,
            BrickKind::Mystery => 1,
            BrickKind::Indestructible => u32::MAX,
            BrickKind::Moving => 2,
        }
    }

    /// Base score for breaking
    pub fn points(&self) -> u64 {
        match self {
            BrickKind::Normal => 10,
            BrickKind::Hard => 20,
            BrickKind::Explosive => 30,
            BrickKind::MultiHit => 50,
            BrickKind::PowerUp => 25,
            BrickKind::Mystery => 40,
            BrickKind::Indestructible => 0,
            BrickKind::Moving => 35,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BrickKind::Normal => "normal",
            BrickKind::Hard => "hard",
            BrickKind::Explosive => "explosive",
            BrickKind::MultiHit => "multi_hit",
            BrickKind::PowerUp => "power_up",
            BrickKind::Mystery => "mystery",
            BrickKind::Indestructible => "indestructible",
            BrickKind::Moving => "moving",
        }
    }
}

/// Result of striking a brick once
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Indestructible brick, nothing happens
    Blocked,
    /// Took damage but still standing
    Damaged,
    /// Broken
    Destroyed,
    /// Explosive brick reached its threshold
    Exploded,
    /// Mystery brick reached its threshold
    Mystery,
}

impl HitOutcome {
    /// True for every outcome that removes the brick
    pub fn is_destructive(&self) -> bool {
        matches!(
            self,
            HitOutcome::Destroyed | HitOutcome::Exploded | HitOutcome::Mystery
        )
    }
}

/// Horizontal oscillation state for Moving bricks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sway {
    pub origin_x: f32,
    /// +1.0 (right) or -1.0 (left)
    pub direction: f32,
}

/// A brick entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brick {
    pub id: u32,
    pub kind: BrickKind,
    pub rect: Rect,
    pub hits_required: u32,
    pub current_hits: u32,
    pub contains_power_up: bool,
    pub points: u64,
    #[serde(default)]
    pub sway: Option<Sway>,
}

impl Brick {
    pub fn new(id: u32, kind: BrickKind, rect: Rect) -> Self {
        let sway = (kind == BrickKind::Moving).then_some(Sway {
            origin_x: rect.x,
            direction: 1.0,
        });
        Self {
            id,
            kind,
            rect,
            hits_required: kind.hits_required(),
            current_hits: 0,
            contains_power_up: kind == BrickKind::PowerUp,
            points: kind.points(),
            sway,
        }
    }

    #[inline]
    pub fn is_indestructible(&self) -> bool {
        self.kind == BrickKind::Indestructible
    }

    /// Returns true if this brick must be destroyed to clear the level
    pub fn counts_for_clear(&self) -> bool {
        !self.is_indestructible()
    }

    /// Hits remaining before the brick breaks (None if unbreakable)
    pub fn hits_left(&self) -> Option<u32> {
        (!self.is_indestructible()).then(|| self.hits_required - self.current_hits)
    }

    /// Strike the brick. `one_hit_kill` comes from strong balls and lasers.
    pub fn hit(&mut self, one_hit_kill: bool) -> HitOutcome {
        if self.is_indestructible() {
            return HitOutcome::Blocked;
        }
        self.current_hits = if one_hit_kill {
            self.hits_required
        } else {
            (self.current_hits + 1).min(self.hits_required)
        };
        if self.current_hits < self.hits_required {
            return HitOutcome::Damaged;
        }
        match self.kind {
            BrickKind::Explosive => HitOutcome::Exploded,
            BrickKind::Mystery => HitOutcome::Mystery,
            _ => HitOutcome::Destroyed,
        }
    }

    /// Advance horizontal oscillation by one tick
    pub fn update_sway(&mut self) {
        if let Some(sway) = self.sway.as_mut() {
            self.rect.x += BRICK_SWAY_SPEED * sway.direction;
            let offset = self.rect.x - sway.origin_x;
            if offset.abs() >= BRICK_SWAY_RANGE {
                self.rect.x = sway.origin_x + BRICK_SWAY_RANGE * offset.signum();
                sway.direction = -sway.direction;
            }
        }
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    BigPaddle,
    SmallBall,
    MultiBall,
    Laser,
    Sticky,
    Shield,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 6] = [
        PowerUpKind::BigPaddle,
        PowerUpKind::SmallBall,
        PowerUpKind::MultiBall,
        PowerUpKind::Laser,
        PowerUpKind::Sticky,
        PowerUpKind::Shield,
    ];

    /// How long the effect stays active (ms)
    pub fn duration_ms(&self) -> f64 {
        match self {
            PowerUpKind::BigPaddle => 10_000.0,
            PowerUpKind::SmallBall => 8_000.0,
            PowerUpKind::MultiBall => 15_000.0,
            PowerUpKind::Laser => 12_000.0,
            PowerUpKind::Sticky => 10_000.0,
            PowerUpKind::Shield => 8_000.0,
        }
    }
}

/// A falling pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallingPowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub rect: Rect,
    pub created_ms: f64,
}

/// A live timed effect
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub kind: PowerUpKind,
    pub start_ms: f64,
    pub end_ms: f64,
}

impl ActiveEffect {
    pub fn remaining_ms(&self, now_ms: f64) -> f64 {
        (self.end_ms - now_ms).max(0.0)
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// The single RNG stream for layouts, rolls and power-ups
    pub rng: Pcg32,
    pub field: Playfield,
    pub tuning: GameplayTuning,
    /// Current level (1-based)
    pub level: u32,
    /// Last level before the game is won
    pub max_level: u32,
    /// Player lives
    pub lives: u8,
    /// Score
    pub score: u64,
    /// Current phase
    pub phase: GamePhase,
    /// Game clock in ms, advanced only by unpaused ticks
    pub clock_ms: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Parameters of the level in play
    pub layout: LevelLayout,
    /// Player paddle
    pub paddle: Paddle,
    /// Balls in play, never empty during a run (sorted by id)
    pub balls: Vec<Ball>,
    /// Remaining bricks (sorted by id)
    pub bricks: Vec<Brick>,
    pub power_ups: PowerUpEngine,
    pub combo: ComboScorer,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new game with default settings
    pub fn new(seed: u64) -> Self {
        Self::with_settings(seed, &Settings::default())
    }

    /// Create a new game and build level 1
    pub fn with_settings(seed: u64, settings: &Settings) -> Self {
        let field = settings.playfield();
        let tuning = settings.tuning();
        let paddle = Paddle::new(&field, PADDLE_WIDTH * tuning.paddle_size_scale);
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            field,
            tuning,
            level: 1,
            max_level: settings.max_level,
            lives: settings.lives,
            score: 0,
            phase: GamePhase::Serve,
            clock_ms: 0.0,
            time_ticks: 0,
            layout: LevelLayout::default(),
            paddle,
            balls: Vec::new(),
            bricks: Vec::new(),
            power_ups: PowerUpEngine::default(),
            combo: ComboScorer::new(tuning.combo_timeout_ms),
            next_id: 1,
        };

        let id = state.next_entity_id();
        state.balls.push(Ball::new(id, BALL_DEFAULT_SPEED));
        state.start_level(1);
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Build `level`, reset paddle/ball, clear pickups, effects and combo
    pub fn start_level(&mut self, level: u32) {
        self.level = level;
        self.power_ups.clear_falling();
        self.combo.reset();

        let generator = LevelGenerator::new(self.field.width);
        let (mut layout, mut bricks) = generator.build_level(level, &mut self.rng, &self.tuning);
        layout.ball_speed *= self.tuning.ball_speed_scale;
        for brick in &mut bricks {
            brick.id = self.next_entity_id();
        }
        self.bricks = bricks;
        for ball in &mut self.balls {
            ball.speed = layout.ball_speed;
        }
        self.layout = layout;
        self.reset_paddle_and_ball();
        self.phase = GamePhase::Serve;

        log::info!(
            "Level {} built: {:?} layout, {} bricks, ball speed {:.1}",
            level,
            self.layout.strategy,
            self.bricks.len(),
            self.layout.ball_speed
        );
    }

    /// Revert all effects, keep one ball, and put ball and paddle home
    pub fn reset_paddle_and_ball(&mut self) {
        self.power_ups
            .revert_all(&mut self.paddle, &mut self.balls, &mut self.rng);
        self.balls.truncate(1);
        self.paddle.reset();
        for ball in &mut self.balls {
            ball.reset(&self.field);
            ball.attach_to(&self.paddle);
        }
    }

    /// Level is cleared when only indestructible bricks (or none) remain
    pub fn is_level_complete(&self) -> bool {
        super::level::is_level_complete(&self.bricks)
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.balls.sort_by_key(|b| b.id);
        self.bricks.sort_by_key(|b| b.id);
    }
}
