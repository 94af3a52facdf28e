//! Self-correcting random range
//!
//! Draws uniformly from a range with 0.01 granularity, then shifts the range
//! for the next draw so that the running average drifts back toward the
//! middle. Long streaks of high (or low) values damp themselves out without a
//! hard cap.

use rand::Rng;

/// Uniform draw in `[start, stop)` at 0.01 granularity, rounded to 2 decimals
pub fn draw_hundredths<R: Rng + ?Sized>(rng: &mut R, start: f32, stop: f32) -> f32 {
    let int_start = (start * 100.0) as i64;
    let int_stop = (stop * 100.0) as i64;
    if int_start >= int_stop {
        log::warn!("empty random range [{start}, {stop}), using lower bound");
        return round_hundredths(int_start as f32 / 100.0);
    }
    let value = rng.random_range(int_start..int_stop) as f32 / 100.0;
    round_hundredths(value)
}

#[inline]
fn round_hundredths(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

/// Random generator whose history pulls later draws back toward the midpoint
#[derive(Debug, Clone)]
pub struct SelfCorrectingRange {
    initial_low: f32,
    initial_high: f32,
    history: Vec<f32>,
}

impl SelfCorrectingRange {
    pub fn new(low: f32, high: f32) -> Self {
        Self {
            initial_low: low,
            initial_high: high,
            history: Vec::new(),
        }
    }

    /// Build from a `(low, high)` tuning pair
    pub fn from_range((low, high): (f32, f32)) -> Self {
        Self::new(low, high)
    }

    /// Values drawn so far, oldest first
    pub fn history(&self) -> &[f32] {
        &self.history
    }

    /// Average of all previous draws
    pub fn average(&self) -> Option<f32> {
        if self.history.is_empty() {
            return None;
        }
        Some(self.history.iter().sum::<f32>() / self.history.len() as f32)
    }

    /// Range the next draw will use.
    ///
    /// `mid` is half the range's width measured from `initial_low`. A positive
    /// offset lowers `high`; a non-positive one subtracts the (negative) offset
    /// from `low`, which raises it.
    pub fn effective_range(&self) -> (f32, f32) {
        let mut low = self.initial_low;
        let mut high = self.initial_high;

        if let Some(average) = self.average() {
            let mid_point = (self.initial_high - self.initial_low) / 2.0;
            let difference = (average - self.initial_low) - mid_point;
            if difference > 0.0 {
                high -= difference;
            } else {
                low -= difference;
            }
        }

        (low, high)
    }

    /// Draw the next value and record it
    pub fn generate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> f32 {
        let (low, high) = self.effective_range();
        let value = draw_hundredths(rng, low, high);
        self.history.push(value);
        value
    }
}
