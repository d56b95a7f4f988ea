//! Consecutive-hit score multiplier
//!
//! Each destructive hit scores `points * (1 + combo * 0.1)` and bumps the
//! combo. A gap longer than the timeout since the previous hit drops the
//! combo back to zero before the new hit is scored.

use serde::{Deserialize, Serialize};

use crate::consts::{COMBO_STEP, COMBO_TIMEOUT_MS};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComboScorer {
    /// Hits in the current chain
    pub combo: u32,
    /// Game clock time of the last scoring hit
    pub last_hit_ms: Option<f64>,
    pub timeout_ms: f64,
}

impl Default for ComboScorer {
    fn default() -> Self {
        Self::new(COMBO_TIMEOUT_MS)
    }
}

impl ComboScorer {
    pub fn new(timeout_ms: f64) -> Self {
        Self {
            combo: 0,
            last_hit_ms: None,
            timeout_ms,
        }
    }

    /// Score multiplier the next hit would get if it landed now
    pub fn multiplier(&self) -> f32 {
        1.0 + self.combo as f32 * COMBO_STEP
    }

    fn timed_out(&self, now_ms: f64) -> bool {
        self.last_hit_ms
            .is_some_and(|last| now_ms - last > self.timeout_ms)
    }

    /// Score one destructive hit and extend the chain
    pub fn register_hit(&mut self, points: u64, now_ms: f64) -> f32 {
        if self.timed_out(now_ms) {
            self.combo = 0;
        }
        let scored = points as f32 * self.multiplier();
        self.combo += 1;
        self.last_hit_ms = Some(now_ms);
        scored
    }

    /// Per-tick decay: drop an idle chain so the HUD stops showing it
    pub fn update(&mut self, now_ms: f64) {
        if self.combo > 0 && self.timed_out(now_ms) {
            log::debug!("Combo of {} expired", self.combo);
            self.combo = 0;
        }
    }

    pub fn reset(&mut self) {
        self.combo = 0;
        self.last_hit_ms = None;
    }
}
