//! Collision detection and response for the brick playfield
//!
//! One call to [`CollisionResolver::resolve_step`] per fixed tick. Within a
//! tick every ball is checked against its surfaces in a fixed priority
//! (bottom edge, walls, paddle, shield) and the first contact wins for that
//! ball. Lasers are then resolved against bricks, then balls against bricks.
//! Bricks broken earlier in the step are skipped by later checks and removed
//! together at the end of the step.

use std::f32::consts::PI;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::combo::ComboScorer;
use super::events::{GameEvent, MysteryReward};
use super::geom::Rect;
use super::state::{Ball, Brick, HitOutcome, Paddle, Playfield};
use crate::consts::*;

/// Per-step inputs that are not entity state
#[derive(Debug, Clone, Copy)]
pub struct StepContext {
    /// Game clock at this tick
    pub now_ms: f64,
    /// Level (and difficulty) score multiplier
    pub score_multiplier: f32,
}

/// Result of a collision step
#[derive(Debug, Clone, Default)]
pub struct StepOutcome {
    /// Points earned this step (already multiplied)
    pub score_delta: u64,
    pub events: Vec<GameEvent>,
    /// The last ball left through the bottom edge
    pub life_lost: bool,
}

/// Relative paddle contact position in [0, 1].
///
/// A zero-width paddle would divide by zero; the contact is then treated as
/// dead center.
pub fn hit_point(ball_x: f32, paddle: &Rect) -> f32 {
    if paddle.w <= f32::EPSILON {
        log::warn!("Paddle width is {}, using center hit point", paddle.w);
        return 0.5;
    }
    ((ball_x - paddle.x) / paddle.w).clamp(0.0, 1.0)
}

/// Outgoing velocity for a paddle bounce: 45° at the left edge to 135° at
/// the right edge, always upward, same speed.
pub fn bounce_velocity(speed: f32, hit_point: f32) -> Vec2 {
    let angle = PI * (0.25 + 0.5 * hit_point);
    Vec2::new(speed * angle.cos(), -(speed * angle.sin()).abs())
}

/// Reflect the ball off a brick along the axis of greatest normalized
/// penetration, pointing away from the brick center.
pub fn reflect_off_brick(ball: &mut Ball, brick: &Rect) {
    let center = brick.center();
    let dx = ball.pos.x - center.x;
    let dy = ball.pos.y - center.y;
    if (dx / brick.w).abs() > (dy / brick.h).abs() {
        ball.vel.x = if dx > 0.0 { ball.vel.x.abs() } else { -ball.vel.x.abs() };
    } else {
        ball.vel.y = if dy > 0.0 { ball.vel.y.abs() } else { -ball.vel.y.abs() };
    }
}

/// Bookkeeping for bricks broken during one step
struct Breakage<'a> {
    bricks: &'a mut [Brick],
    removed: Vec<bool>,
    combo: &'a mut ComboScorer,
    rng: &'a mut Pcg32,
    ctx: StepContext,
    out: StepOutcome,
}

impl Breakage<'_> {
    /// First standing brick overlapping `area`
    fn first_overlap(&self, area: &Rect) -> Option<usize> {
        self.bricks
            .iter()
            .enumerate()
            .find(|(i, brick)| !self.removed[*i] && brick.rect.intersects(area))
            .map(|(i, _)| i)
    }

    fn flat_award(&mut self, points: u64) {
        let scored = (points as f32 * self.ctx.score_multiplier).round() as u64;
        if scored > 0 {
            self.out.score_delta += scored;
            self.out.events.push(GameEvent::BrickScore { points: scored });
        }
    }

    /// Mark a brick broken and announce it
    fn remove(&mut self, idx: usize) {
        self.removed[idx] = true;
        let brick = &self.bricks[idx];
        self.out.events.push(GameEvent::BrickDestroyed {
            kind: brick.kind,
            center: brick.rect.center(),
            drops_power_up: brick.contains_power_up,
        });
    }

    /// Strike brick `idx` and apply whatever its outcome demands
    fn strike(&mut self, idx: usize, one_hit_kill: bool) {
        let outcome = self.bricks[idx].hit(one_hit_kill);
        if !outcome.is_destructive() {
            let kind = self.bricks[idx].kind;
            self.out.events.push(GameEvent::BrickHit { kind });
            return;
        }
        self.destroy_scored(idx);
        match outcome {
            HitOutcome::Exploded => self.explode(idx),
            HitOutcome::Mystery => self.reveal_mystery(idx),
            _ => {}
        }
    }

    /// Destructive hit: combo-scored removal
    fn destroy_scored(&mut self, idx: usize) {
        self.remove(idx);
        let points = self.bricks[idx].points;
        let scored = self.combo.register_hit(points, self.ctx.now_ms) * self.ctx.score_multiplier;
        let scored = scored.round() as u64;
        self.out.score_delta += scored;
        self.out.events.push(GameEvent::BrickScore { points: scored });
    }

    /// Remove every destructible brick within the blast radius in one batch
    fn explode(&mut self, origin: usize) {
        let blast = self.bricks[origin].rect;
        let victims: Vec<usize> = (0..self.bricks.len())
            .filter(|&i| {
                i != origin
                    && !self.removed[i]
                    && self.bricks[i].counts_for_clear()
                    && self.bricks[i].rect.center_distance(&blast) <= EXPLOSION_RADIUS
            })
            .collect();
        let mut points = 0;
        for &i in &victims {
            self.remove(i);
            points += self.bricks[i].points;
        }
        self.flat_award(points);
        self.out.events.push(GameEvent::Explosion {
            center: blast.center(),
            destroyed: victims.len() + 1,
        });
    }

    /// Roll one of three rewards uniformly
    fn reveal_mystery(&mut self, idx: usize) {
        let reward = match self.rng.random_range(0..3) {
            0 => MysteryReward::BonusPoints,
            1 => MysteryReward::PowerUp,
            _ => MysteryReward::ClearRow,
        };
        log::debug!("Mystery brick {} rolled {:?}", self.bricks[idx].id, reward);
        self.out.events.push(GameEvent::MysteryRevealed { reward });

        match reward {
            MysteryReward::BonusPoints => self.flat_award(MYSTERY_BONUS_POINTS),
            MysteryReward::PowerUp => {
                let at = self.bricks[idx].rect.center();
                self.out.events.push(GameEvent::PowerUpSpawnRequested { at });
            }
            MysteryReward::ClearRow => {
                let row_y = self.bricks[idx].rect.y;
                let row: Vec<usize> = (0..self.bricks.len())
                    .filter(|&i| {
                        !self.removed[i]
                            && self.bricks[i].counts_for_clear()
                            && (self.bricks[i].rect.y - row_y).abs() < 0.5
                    })
                    .collect();
                for &i in &row {
                    self.remove(i);
                }
                self.flat_award(row.len() as u64 * MYSTERY_ROW_POINTS);
            }
        }
    }
}

/// Resolves every physical interaction for one tick
#[derive(Debug, Clone)]
pub struct CollisionResolver {
    field: Playfield,
}

impl CollisionResolver {
    pub fn new(field: Playfield) -> Self {
        Self { field }
    }

    /// Advance balls, lasers and moving bricks by one tick and resolve all
    /// contacts. Balls lost through the bottom are removed unless they were
    /// the last ones in play, in which case one is kept and `life_lost` set.
    pub fn resolve_step(
        &self,
        balls: &mut Vec<Ball>,
        paddle: &mut Paddle,
        bricks: &mut Vec<Brick>,
        combo: &mut ComboScorer,
        rng: &mut Pcg32,
        ctx: StepContext,
    ) -> StepOutcome {
        for brick in bricks.iter_mut() {
            brick.update_sway();
        }
        for ball in balls.iter_mut() {
            if ball.active {
                ball.advance();
            } else {
                ball.attach_to(paddle);
            }
        }
        paddle.update_lasers();

        let life_lost = self.drop_lost_balls(balls);

        // Surfaces first; a ball that touched one skips the brick pass
        let mut touched = vec![false; balls.len()];
        let mut events = Vec::new();
        if !life_lost {
            for (ball, touched) in balls.iter_mut().zip(touched.iter_mut()) {
                if let Some(event) = self.resolve_surfaces(ball, paddle) {
                    events.push(event);
                    *touched = true;
                }
            }
        }

        let mut breakage = Breakage {
            removed: vec![false; bricks.len()],
            bricks: bricks.as_mut_slice(),
            combo,
            rng,
            ctx,
            out: StepOutcome {
                events,
                life_lost,
                ..Default::default()
            },
        };

        // Each laser breaks at most one brick and is consumed on contact
        let mut lasers = std::mem::take(&mut paddle.lasers);
        lasers.retain(|laser| match breakage.first_overlap(&laser.rect) {
            Some(idx) => {
                breakage.strike(idx, true);
                false
            }
            None => true,
        });
        paddle.lasers = lasers;

        if !life_lost {
            for (ball, _) in balls
                .iter_mut()
                .zip(touched.iter())
                .filter(|(ball, touched)| ball.active && !**touched)
            {
                if let Some(idx) = breakage.first_overlap(&ball.bounds()) {
                    reflect_off_brick(ball, &breakage.bricks[idx].rect);
                    breakage.strike(idx, ball.strong);
                }
            }
        }

        let removed = breakage.removed;
        let outcome = breakage.out;
        let mut idx = 0;
        bricks.retain(|_| {
            let keep = !removed[idx];
            idx += 1;
            keep
        });
        outcome
    }

    /// Remove balls below the bottom edge. Returns true when that would
    /// leave no balls; the lowest-id ball is then kept for the reset.
    fn drop_lost_balls(&self, balls: &mut Vec<Ball>) -> bool {
        let height = self.field.height;
        let is_lost = |ball: &Ball| ball.active && ball.pos.y + ball.radius > height;
        if balls.is_empty() || !balls.iter().any(is_lost) {
            return false;
        }
        if balls.iter().all(is_lost) {
            balls.truncate(1);
            return true;
        }
        balls.retain(|ball| !is_lost(ball));
        false
    }

    /// Walls, paddle, shield in that order. Returns the first contact.
    fn resolve_surfaces(&self, ball: &mut Ball, paddle: &Paddle) -> Option<GameEvent> {
        if !ball.active {
            return None;
        }
        if self.resolve_walls(ball) {
            return Some(GameEvent::WallHit);
        }
        if paddle.hitbox().intersects(&ball.bounds()) {
            if paddle.sticky {
                ball.attach_to(paddle);
                return Some(GameEvent::BallCaught);
            }
            let point = hit_point(ball.pos.x, &paddle.rect);
            ball.vel = bounce_velocity(ball.current_speed(), point);
            ball.pos.y = paddle.top() - ball.radius;
            return Some(GameEvent::PaddleHit);
        }
        if let (true, Some(shield)) = (paddle.has_shield, paddle.shield) {
            if ball.vel.y > 0.0 && ball.pos.y + ball.radius >= shield.top() {
                ball.vel.y = -ball.vel.y.abs();
                return Some(GameEvent::ShieldHit);
            }
        }
        None
    }

    /// Side and top walls: reflect the matching component and clamp
    fn resolve_walls(&self, ball: &mut Ball) -> bool {
        let r = ball.radius;
        let mut hit = false;
        if ball.pos.x - r < 0.0 {
            ball.pos.x = r;
            ball.vel.x = ball.vel.x.abs();
            hit = true;
        } else if ball.pos.x + r > self.field.width {
            ball.pos.x = self.field.width - r;
            ball.vel.x = -ball.vel.x.abs();
            hit = true;
        }
        if ball.pos.y - r < 0.0 {
            ball.pos.y = r;
            ball.vel.y = ball.vel.y.abs();
            hit = true;
        }
        hit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{BrickKind, Laser};
    use crate::speeds_match;
    use proptest::prelude::*;
    use rand::SeedableRng;

    struct World {
        resolver: CollisionResolver,
        balls: Vec<Ball>,
        paddle: Paddle,
        bricks: Vec<Brick>,
        combo: ComboScorer,
        rng: Pcg32,
    }

    impl World {
        fn new() -> Self {
            let field = Playfield::default();
            Self {
                resolver: CollisionResolver::new(field),
                balls: Vec::new(),
                paddle: Paddle::new(&field, PADDLE_WIDTH),
                bricks: Vec::new(),
                combo: ComboScorer::default(),
                rng: Pcg32::seed_from_u64(7),
            }
        }

        fn add_ball(&mut self, pos: Vec2, vel: Vec2) {
            let mut ball = Ball::new(self.balls.len() as u32 + 1, vel.length());
            ball.pos = pos;
            ball.vel = vel;
            ball.active = true;
            self.balls.push(ball);
        }

        fn add_brick(&mut self, kind: BrickKind, x: f32, y: f32) {
            let id = self.bricks.len() as u32 + 1;
            self.bricks
                .push(Brick::new(id, kind, Rect::new(x, y, BRICK_WIDTH, BRICK_HEIGHT)));
        }

        fn step(&mut self, now_ms: f64) -> StepOutcome {
            self.resolver.resolve_step(
                &mut self.balls,
                &mut self.paddle,
                &mut self.bricks,
                &mut self.combo,
                &mut self.rng,
                StepContext {
                    now_ms,
                    score_multiplier: 1.0,
                },
            )
        }
    }

    #[test]
    fn test_hit_point_center_bounces_straight_up() {
        let paddle = Rect::new(100.0, 500.0, 100.0, 20.0);
        let point = hit_point(150.0, &paddle);
        assert!((point - 0.5).abs() < 1e-6);
        let vel = bounce_velocity(7.0, point);
        assert!(vel.x.abs() < 1e-5);
        assert!((vel.y + 7.0).abs() < 1e-5);
    }

    #[test]
    fn test_bounce_angle_range() {
        let left = bounce_velocity(10.0, 0.0);
        let right = bounce_velocity(10.0, 1.0);
        // 45° and 135°, both upward
        assert!((left.x - 10.0 * (PI / 4.0).cos()).abs() < 1e-5);
        assert!((right.x + 10.0 * (PI / 4.0).cos()).abs() < 1e-5);
        assert!(left.y < 0.0 && right.y < 0.0);
    }

    #[test]
    fn test_zero_width_paddle_guard() {
        let paddle = Rect::new(100.0, 500.0, 0.0, 20.0);
        assert_eq!(hit_point(300.0, &paddle), 0.5);
    }

    #[test]
    fn test_left_wall_reflects_and_clamps() {
        let mut world = World::new();
        world.add_ball(Vec2::new(9.0, 300.0), Vec2::new(-3.0, -4.0));
        let out = world.step(0.0);
        let ball = &world.balls[0];
        assert_eq!(ball.pos.x, ball.radius);
        assert_eq!(ball.vel, Vec2::new(3.0, -4.0));
        assert!(out.events.contains(&GameEvent::WallHit));
    }

    #[test]
    fn test_top_wall_reflects() {
        let mut world = World::new();
        world.add_ball(Vec2::new(400.0, 10.0), Vec2::new(3.0, -4.0));
        world.step(0.0);
        let ball = &world.balls[0];
        assert_eq!(ball.pos.y, ball.radius);
        assert_eq!(ball.vel, Vec2::new(3.0, 4.0));
    }

    #[test]
    fn test_paddle_bounce_from_center() {
        let mut world = World::new();
        let cx = world.paddle.center_x();
        let top = world.paddle.top();
        world.add_ball(Vec2::new(cx, top - 5.0), Vec2::new(0.0, 5.0));
        let out = world.step(0.0);
        let ball = &world.balls[0];
        assert!(out.events.contains(&GameEvent::PaddleHit));
        assert!(ball.vel.x.abs() < 1e-5);
        assert!((ball.vel.y + 5.0).abs() < 1e-5);
        assert_eq!(ball.pos.y, top - ball.radius);
    }

    #[test]
    fn test_sticky_paddle_catches() {
        let mut world = World::new();
        world.paddle.sticky = true;
        let cx = world.paddle.center_x();
        let top = world.paddle.top();
        world.add_ball(Vec2::new(cx + 20.0, top - 5.0), Vec2::new(3.0, 4.0));
        let out = world.step(0.0);
        let ball = &world.balls[0];
        assert!(out.events.contains(&GameEvent::BallCaught));
        assert!(!ball.active);
        assert_eq!(ball.pos.x, cx);
        assert!(ball.pos.y < top);
    }

    #[test]
    fn test_shield_turns_ball_upward() {
        let mut world = World::new();
        world.paddle.has_shield = true;
        world.paddle.shield = Some(world.resolver.field.shield_rect());
        // Far from the paddle horizontally
        world.add_ball(Vec2::new(20.0, 575.0), Vec2::new(0.0, 4.0));
        let out = world.step(0.0);
        assert!(out.events.contains(&GameEvent::ShieldHit));
        assert!(world.balls[0].vel.y < 0.0);
        assert!(!out.life_lost);
    }

    #[test]
    fn test_extra_ball_lost_without_life_loss() {
        let mut world = World::new();
        world.add_ball(Vec2::new(400.0, 300.0), Vec2::new(0.0, -5.0));
        world.add_ball(Vec2::new(20.0, 598.0), Vec2::new(0.0, 5.0));
        let out = world.step(0.0);
        assert!(!out.life_lost);
        assert_eq!(world.balls.len(), 1);
        assert_eq!(world.balls[0].id, 1);
    }

    #[test]
    fn test_sole_ball_lost_signals_life_loss() {
        let mut world = World::new();
        world.add_ball(Vec2::new(20.0, 598.0), Vec2::new(0.0, 5.0));
        let out = world.step(0.0);
        assert!(out.life_lost);
        assert_eq!(world.balls.len(), 1);
    }

    #[test]
    fn test_ball_from_below_reflects_down() {
        let mut world = World::new();
        world.add_brick(BrickKind::Hard, 300.0, 100.0);
        world.add_ball(Vec2::new(330.0, 130.0), Vec2::new(1.0, -4.0));
        let out = world.step(0.0);
        assert!(world.balls[0].vel.y > 0.0);
        assert_eq!(world.bricks.len(), 1);
        assert_eq!(world.bricks[0].current_hits, 1);
        assert!(out.events.contains(&GameEvent::BrickHit { kind: BrickKind::Hard }));
    }

    #[test]
    fn test_side_contact_reflects_horizontally() {
        let mut world = World::new();
        world.add_brick(BrickKind::Normal, 300.0, 100.0);
        world.add_ball(Vec2::new(295.0, 110.0), Vec2::new(3.0, 1.0));
        world.step(0.0);
        assert!(world.balls[0].vel.x < 0.0);
        assert!(world.bricks.is_empty());
    }

    #[test]
    fn test_strong_ball_one_hit_kill() {
        let mut world = World::new();
        world.add_brick(BrickKind::MultiHit, 300.0, 100.0);
        world.add_ball(Vec2::new(330.0, 130.0), Vec2::new(0.0, -4.0));
        world.balls[0].strong = true;
        let out = world.step(0.0);
        assert!(world.bricks.is_empty());
        assert_eq!(out.score_delta, BrickKind::MultiHit.points());
    }

    #[test]
    fn test_explosion_radius() {
        let mut world = World::new();
        // Explosive at (330, 210) center; neighbours on the grid
        world.add_brick(BrickKind::Explosive, 300.0, 200.0);
        world.add_brick(BrickKind::Normal, 365.0, 200.0); // 65 away
        world.add_brick(BrickKind::Normal, 300.0, 275.0); // 75 away
        world.add_brick(BrickKind::Normal, 365.0, 275.0); // ~99.2 away
        world.add_brick(BrickKind::Normal, 430.0, 200.0); // 130 away
        world.add_brick(BrickKind::Normal, 300.0, 325.0); // 125 away
        world.add_brick(BrickKind::Indestructible, 235.0, 200.0); // 65 away
        world.add_ball(Vec2::new(330.0, 230.0), Vec2::new(0.0, -4.0));
        let out = world.step(0.0);

        let left: Vec<u32> = world.bricks.iter().map(|b| b.id).collect();
        assert_eq!(left, vec![5, 6, 7]);
        assert!(out.events.iter().any(|e| matches!(
            e,
            GameEvent::Explosion { destroyed: 4, .. }
        )));
        // 30 combo-scored + 30 flat for the three victims
        assert_eq!(out.score_delta, 60);
    }

    #[test]
    fn test_laser_breaks_one_brick_and_is_consumed() {
        let mut world = World::new();
        world.add_brick(BrickKind::Hard, 300.0, 400.0);
        world.add_brick(BrickKind::Normal, 300.0, 300.0);
        world.paddle.lasers.push(Laser {
            rect: Rect::new(320.0, 425.0, LASER_WIDTH, LASER_HEIGHT),
        });
        let out = world.step(0.0);
        assert!(world.paddle.lasers.is_empty());
        assert_eq!(world.bricks.len(), 1);
        assert_eq!(world.bricks[0].kind, BrickKind::Normal);
        assert_eq!(out.score_delta, BrickKind::Hard.points());
    }

    #[test]
    fn test_ball_skips_brick_broken_by_laser() {
        let mut world = World::new();
        world.add_brick(BrickKind::Normal, 300.0, 100.0);
        world.paddle.lasers.push(Laser {
            rect: Rect::new(320.0, 125.0, LASER_WIDTH, LASER_HEIGHT),
        });
        world.add_ball(Vec2::new(330.0, 130.0), Vec2::new(0.0, -4.0));
        let out = world.step(0.0);
        assert!(world.bricks.is_empty());
        // Ball went straight through the gap the laser left
        assert!(world.balls[0].vel.y < 0.0);
        let destroyed = out
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::BrickDestroyed { .. }))
            .count();
        assert_eq!(destroyed, 1);
    }

    #[test]
    fn test_power_up_brick_drop_flag() {
        let mut world = World::new();
        world.add_brick(BrickKind::Normal, 300.0, 100.0);
        world.bricks[0].contains_power_up = true;
        world.add_ball(Vec2::new(330.0, 130.0), Vec2::new(0.0, -4.0));
        let out = world.step(0.0);
        let drops = out
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::BrickDestroyed { drops_power_up: true, .. }))
            .count();
        assert_eq!(drops, 1);
    }

    #[test]
    fn test_mystery_brick_rewards() {
        let mystery = BrickKind::Mystery.points();
        let mut seen = Vec::new();
        for seed in 0..64 {
            let mut world = World::new();
            world.rng = Pcg32::seed_from_u64(seed);
            world.add_brick(BrickKind::Mystery, 300.0, 100.0);
            world.add_brick(BrickKind::Normal, 365.0, 100.0);
            world.add_brick(BrickKind::Indestructible, 430.0, 100.0);
            world.add_ball(Vec2::new(330.0, 130.0), Vec2::new(0.0, -4.0));
            let out = world.step(0.0);

            let left: Vec<u32> = world.bricks.iter().map(|b| b.id).collect();
            let destroyed = out
                .events
                .iter()
                .filter(|e| matches!(e, GameEvent::BrickDestroyed { .. }))
                .count();
            let reward = out.events.iter().find_map(|e| match e {
                GameEvent::MysteryRevealed { reward } => Some(*reward),
                _ => None,
            });
            match reward {
                Some(MysteryReward::BonusPoints) => {
                    assert_eq!(out.score_delta, mystery + MYSTERY_BONUS_POINTS);
                    assert_eq!(left, vec![2, 3]);
                    assert_eq!(destroyed, 1);
                }
                Some(MysteryReward::PowerUp) => {
                    assert_eq!(out.score_delta, mystery);
                    assert_eq!(left, vec![2, 3]);
                    assert!(
                        out.events
                            .iter()
                            .any(|e| matches!(e, GameEvent::PowerUpSpawnRequested { .. }))
                    );
                }
                Some(MysteryReward::ClearRow) => {
                    // Indestructible brick survives the row clear
                    assert_eq!(out.score_delta, mystery + MYSTERY_ROW_POINTS);
                    assert_eq!(left, vec![3]);
                    assert_eq!(destroyed, 2);
                }
                None => panic!("mystery brick did not reveal"),
            }
            if let Some(reward) = reward.filter(|r| !seen.contains(r)) {
                seen.push(reward);
            }
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_combo_scoring_across_steps() {
        let mut world = World::new();
        world.add_brick(BrickKind::Normal, 300.0, 100.0);
        world.add_ball(Vec2::new(330.0, 130.0), Vec2::new(0.0, -4.0));
        assert_eq!(world.step(0.0).score_delta, 10);

        world.add_brick(BrickKind::MultiHit, 300.0, 100.0);
        world.bricks[0].current_hits = 2;
        world.balls[0].pos = Vec2::new(330.0, 130.0);
        world.balls[0].vel = Vec2::new(0.0, -4.0);
        // 50 * 1.1
        assert_eq!(world.step(500.0).score_delta, 55);
    }

    #[test]
    fn test_idle_ball_rides_paddle() {
        let mut world = World::new();
        world.add_ball(Vec2::new(0.0, 0.0), Vec2::new(0.0, -4.0));
        world.balls[0].active = false;
        world.step(0.0);
        assert_eq!(world.balls[0].pos.x, world.paddle.center_x());
    }

    proptest! {
        #[test]
        fn prop_wall_reflection_keeps_speed(
            x in 0.0f32..800.0,
            y in 0.0f32..300.0,
            vx in -10.0f32..10.0,
            vy in -10.0f32..10.0,
        ) {
            let mut world = World::new();
            world.add_ball(Vec2::new(x, y), Vec2::new(vx, vy));
            let before = world.balls[0].vel;
            world.step(0.0);
            prop_assert!(speeds_match(before, world.balls[0].vel, 1e-6));
        }

        #[test]
        fn prop_brick_reflection_keeps_speed(
            dx in -35.0f32..35.0,
            dy in -15.0f32..15.0,
            vx in -10.0f32..10.0,
            vy in -10.0f32..10.0,
        ) {
            let mut ball = Ball::new(1, 7.0);
            let brick = Rect::new(300.0, 100.0, BRICK_WIDTH, BRICK_HEIGHT);
            ball.pos = brick.center() + Vec2::new(dx, dy);
            ball.vel = Vec2::new(vx, vy);
            let before = ball.vel;
            reflect_off_brick(&mut ball, &brick);
            prop_assert!(speeds_match(before, ball.vel, 1e-6));
        }

        #[test]
        fn prop_paddle_bounce_keeps_speed(speed in 1.0f32..20.0, point in 0.0f32..=1.0) {
            let vel = bounce_velocity(speed, point);
            prop_assert!((vel.length() - speed).abs() <= 1e-5 * speed);
            prop_assert!(vel.y < 0.0);
        }
    }
}
