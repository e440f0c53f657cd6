//! Pure outcome evaluation.
//!
//! The draw is a single uniform value in `[0, 1)`; the decision is `draw <
//! win_probability` with an **exclusive** upper bound, so a draw equal to the
//! probability loses. The draw source is injectable so settlement logic can
//! be tested deterministically; production uses the thread RNG. There is no
//! commitment scheme or external verifiability — a known fidelity gap of the
//! reference design.

use flipcore_types::{FlipcoreError, Result};
use rand::Rng;

/// A source of uniformly distributed draws in `[0, 1)`.
pub trait DrawSource: Send {
    fn draw(&mut self) -> f64;
}

/// Production draw source backed by the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngDraw;

impl DrawSource for ThreadRngDraw {
    fn draw(&mut self) -> f64 {
        rand::thread_rng().r#gen::<f64>()
    }
}

/// Deterministic draw source returning one fixed value. For tests and
/// tooling.
#[derive(Debug, Clone, Copy)]
pub struct FixedDraw(pub f64);

impl DrawSource for FixedDraw {
    fn draw(&mut self) -> f64 {
        self.0
    }
}

/// Decides win/loss at a fixed probability.
#[derive(Debug, Clone, Copy)]
pub struct OutcomeEngine {
    win_probability: f64,
}

impl OutcomeEngine {
    /// # Errors
    /// Returns a configuration error if `win_probability` is outside
    /// `[0, 1]` or not a number.
    pub fn new(win_probability: f64) -> Result<Self> {
        if !win_probability.is_finite() || !(0.0..=1.0).contains(&win_probability) {
            return Err(FlipcoreError::Configuration(format!(
                "win probability {win_probability} outside [0, 1]"
            )));
        }
        Ok(Self { win_probability })
    }

    #[must_use]
    pub fn win_probability(&self) -> f64 {
        self.win_probability
    }

    /// Pure decision: win iff `draw < win_probability`.
    #[must_use]
    pub fn decide(&self, draw: f64) -> bool {
        draw < self.win_probability
    }

    /// Pull one draw from the source and decide. Returns `(draw, won)` so
    /// callers can log the roll.
    pub fn draw_and_decide(&self, source: &mut dyn DrawSource) -> (f64, bool) {
        let draw = source.draw();
        (draw, self.decide(draw))
    }
}
