//! Fixed-step session driver
//!
//! Turns variable frame times into fixed simulation ticks, latches one-shot
//! inputs between frames, and hands the final score to a [`ScoreSink`] once
//! the game ends.

use crate::consts::*;
use crate::highscores::{HighScores, ScoreSink};
use crate::settings::Settings;
use crate::sim::{GamePhase, GameState, PaddleIntent, Snapshot, TickInput, TickReport, tick};

/// Longest frame the accumulator will absorb (seconds)
const MAX_FRAME_DT: f32 = 0.1;

/// One player's run
pub struct Session<S: ScoreSink = HighScores> {
    state: GameState,
    settings: Settings,
    user_id: String,
    sink: S,
    accumulator: f32,
    input: TickInput,
    /// Final score already handed to the sink
    reported: bool,
}

impl<S: ScoreSink> Session<S> {
    pub fn new(seed: u64, settings: Settings, user_id: impl Into<String>, sink: S) -> Self {
        Self {
            state: GameState::with_settings(seed, &settings),
            settings,
            user_id: user_id.into(),
            sink,
            accumulator: 0.0,
            input: TickInput::default(),
            reported: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.state)
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state.phase, GamePhase::GameOver | GamePhase::GameWon)
    }

    // === Input (latched until the next tick) ===

    pub fn set_paddle(&mut self, intent: PaddleIntent) {
        self.input.paddle = intent;
    }

    pub fn press_launch(&mut self) {
        self.input.launch = true;
    }

    pub fn press_fire(&mut self) {
        self.input.fire = true;
    }

    pub fn press_pause(&mut self) {
        self.input.pause = true;
    }

    pub fn set_idle_mode(&mut self, on: bool) {
        self.input.idle_mode = on;
    }

    /// Run as many fixed ticks as `dt` seconds of frame time cover
    pub fn advance(&mut self, dt: f32) -> TickReport {
        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        self.accumulator += dt;

        let mut report = TickReport::default();
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let step = self.step();
            report.score_delta += step.score_delta;
            report.events.extend(step.events);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        report
    }

    /// Run exactly one tick with the latched input
    pub fn step(&mut self) -> TickReport {
        let input = self.input.clone();
        let report = tick(&mut self.state, &input);

        // Clear one-shot inputs after processing
        self.input.launch = false;
        self.input.fire = false;
        self.input.pause = false;

        if self.is_finished() && !self.reported {
            self.sink.record_best(&self.user_id, self.state.score);
            self.reported = true;
        }
        report
    }

    /// Start over with a new seed, keeping settings, player and sink
    pub fn restart(&mut self, seed: u64) {
        self.state = GameState::with_settings(seed, &self.settings);
        self.accumulator = 0.0;
        self.input = TickInput {
            idle_mode: self.input.idle_mode,
            ..Default::default()
        };
        self.reported = false;
        log::info!("Session for {} restarted with seed {}", self.user_id, seed);
    }
}
