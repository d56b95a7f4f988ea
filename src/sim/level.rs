//! Procedural level generation
//!
//! Each level picks one of five grid layouts at random and fills its cells
//! with bricks whose kinds are rolled from the level's pool. Difficulty
//! parameters grow with the level number and saturate at their caps; the
//! table covers levels 1-10 and anything beyond reuses level 10.

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geom::Rect;
use super::state::{Brick, BrickKind};
use crate::consts::*;
use crate::settings::GameplayTuning;

/// Share of grid cells filled by the Random layout
const RANDOM_FILL_CHANCE: f32 = 0.7;
/// Maximum brick rows
const MAX_ROWS: u32 = 8;

/// Grid shape used to place bricks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LayoutStrategy {
    #[default]
    Random,
    Zigzag,
    Diamond,
    Circle,
    V,
}

impl LayoutStrategy {
    pub const ALL: [LayoutStrategy; 5] = [
        LayoutStrategy::Random,
        LayoutStrategy::Zigzag,
        LayoutStrategy::Diamond,
        LayoutStrategy::Circle,
        LayoutStrategy::V,
    ];

    /// Occupied (row, col) cells in row-major order
    pub fn cells(&self, rows: u32, cols: u32, rng: &mut Pcg32) -> Vec<(u32, u32)> {
        let mut cells = Vec::new();
        match self {
            LayoutStrategy::Random => {
                for row in 0..rows {
                    for col in 0..cols {
                        if rng.random::<f32>() < RANDOM_FILL_CHANCE {
                            cells.push((row, col));
                        }
                    }
                }
            }
            LayoutStrategy::Zigzag => {
                for row in 0..rows {
                    for col in (row % 2..cols).step_by(2) {
                        cells.push((row, col));
                    }
                }
            }
            LayoutStrategy::Diamond => {
                // Narrowest at the middle row, widening toward top and bottom
                let center_col = (cols / 2) as i64;
                for row in 0..rows {
                    let span = (row as i64 - (rows / 2) as i64).abs();
                    for col in (center_col - span)..=(center_col + span) {
                        if (0..cols as i64).contains(&col) {
                            cells.push((row, col as u32));
                        }
                    }
                }
            }
            LayoutStrategy::Circle => {
                let (center_row, center_col) = ((rows / 2) as f32, (cols / 2) as f32);
                let radius = (rows.min(cols) / 2) as f32;
                for row in 0..rows {
                    for col in 0..cols {
                        let dr = row as f32 - center_row;
                        let dc = col as f32 - center_col;
                        if (dr * dr + dc * dc).sqrt() <= radius {
                            cells.push((row, col));
                        }
                    }
                }
            }
            LayoutStrategy::V => {
                for row in 0..rows {
                    for col in row..cols.saturating_sub(row) {
                        cells.push((row, col));
                    }
                }
            }
        }
        cells
    }
}

/// Per-level parameters derived from the level number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelLayout {
    pub level: u32,
    /// Nominal brick count (informational; the layout decides the real count)
    pub brick_count: u32,
    pub hard_chance: f32,
    pub special_chance: f32,
    pub power_up_chance: f32,
    /// Ball speed in units per tick
    pub ball_speed: f32,
    pub score_multiplier: f32,
    /// Kinds that may appear; the first two are always Normal and Hard
    pub pool: Vec<BrickKind>,
    pub strategy: LayoutStrategy,
}

impl Default for LevelLayout {
    fn default() -> Self {
        Self::for_level(1)
    }
}

impl LevelLayout {
    /// Parameters for level `n` (levels past the table reuse its last row)
    pub fn for_level(n: u32) -> Self {
        let level = n.max(1);
        let t = level.min(LEVEL_TABLE_SIZE) as f32;
        Self {
            level,
            brick_count: 3 + 2 * level.min(LEVEL_TABLE_SIZE),
            hard_chance: (0.1 * t).min(0.5),
            special_chance: (0.05 * t).min(0.3),
            power_up_chance: (0.2 + 0.02 * t).min(0.4),
            ball_speed: (5.0 + 0.5 * t).min(10.0),
            score_multiplier: 1.0 + 0.1 * t,
            pool: brick_pool(level),
            strategy: LayoutStrategy::default(),
        }
    }

    /// Kinds beyond Normal and Hard
    pub fn specials(&self) -> &[BrickKind] {
        self.pool.get(2..).unwrap_or(&[])
    }

    /// Roll one brick kind: hard first, then a uniform special, else normal
    pub fn roll_kind(&self, rng: &mut Pcg32) -> BrickKind {
        if rng.random::<f32>() < self.hard_chance {
            return BrickKind::Hard;
        }
        let specials = self.specials();
        if rng.random::<f32>() < self.special_chance && !specials.is_empty() {
            return specials[rng.random_range(0..specials.len())];
        }
        BrickKind::Normal
    }
}

/// Brick kinds unlocked by level `n`
pub fn brick_pool(n: u32) -> Vec<BrickKind> {
    let mut pool = vec![BrickKind::Normal, BrickKind::Hard];
    if n >= 3 {
        pool.extend([BrickKind::Explosive, BrickKind::MultiHit]);
    }
    if n >= 5 {
        pool.extend([BrickKind::PowerUp, BrickKind::Mystery]);
    }
    if n >= 7 {
        pool.extend([BrickKind::Indestructible, BrickKind::Moving]);
    }
    pool
}

/// Parameters for every level in the table
pub fn level_table() -> Vec<LevelLayout> {
    (1..=LEVEL_TABLE_SIZE).map(LevelLayout::for_level).collect()
}

/// Builds brick layouts for a playfield of a given width
#[derive(Debug, Clone, Copy)]
pub struct LevelGenerator {
    screen_width: f32,
}

impl LevelGenerator {
    pub fn new(screen_width: f32) -> Self {
        Self { screen_width }
    }

    /// Grid columns that fit across the screen
    pub fn columns(&self) -> u32 {
        (self.screen_width / (BRICK_WIDTH + BRICK_PADDING)).floor().max(0.0) as u32
    }

    /// Grid rows for level `n`
    pub fn rows(n: u32) -> u32 {
        (3 + n).min(MAX_ROWS)
    }

    /// Top-left corner of a grid cell
    pub fn cell_rect(row: u32, col: u32) -> Rect {
        Rect::new(
            col as f32 * (BRICK_WIDTH + BRICK_PADDING),
            row as f32 * (BRICK_HEIGHT + BRICK_PADDING) + BRICK_TOP_OFFSET,
            BRICK_WIDTH,
            BRICK_HEIGHT,
        )
    }

    /// Build level `n`. Bricks come back with id 0; the caller assigns ids.
    pub fn build_level(
        &self,
        n: u32,
        rng: &mut Pcg32,
        tuning: &GameplayTuning,
    ) -> (LevelLayout, Vec<Brick>) {
        let mut layout = LevelLayout::for_level(n);
        layout.power_up_chance =
            (layout.power_up_chance * tuning.power_up_frequency).clamp(0.0, 1.0);
        layout.strategy = LayoutStrategy::ALL[rng.random_range(0..LayoutStrategy::ALL.len())];

        let rows = Self::rows(layout.level.min(LEVEL_TABLE_SIZE));
        let cells = layout.strategy.cells(rows, self.columns(), rng);

        let mut bricks = Vec::with_capacity(cells.len());
        for (row, col) in cells {
            let kind = layout.roll_kind(rng);
            let mut brick = Brick::new(0, kind, Self::cell_rect(row, col));
            if brick.counts_for_clear() && rng.random::<f32>() < layout.power_up_chance {
                brick.contains_power_up = true;
            }
            bricks.push(brick);
        }

        log::info!(
            "Generated level {} ({:?}): {} bricks from {} kinds",
            n,
            layout.strategy,
            bricks.len(),
            layout.pool.len()
        );
        (layout, bricks)
    }
}

/// Cleared when nothing but indestructible bricks remain
pub fn is_level_complete(bricks: &[Brick]) -> bool {
    bricks.iter().all(|brick| !brick.counts_for_clear())
}

/// Won once the level index moves past the last level
pub fn is_game_complete(level: u32, max_level: u32) -> bool {
    level > max_level
}
