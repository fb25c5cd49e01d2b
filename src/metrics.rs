//! Live and final session metrics.
//!
//! Character counters are exact integers; rounding happens once, here, when a
//! displayable value is produced. All rounding is `f64::round`, i.e. half away
//! from zero.

use std::time::Duration;

/// Characters per "word" for WPM purposes
pub const CHARS_PER_WORD: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    pub wpm: u32,
    /// percent, 0..=100
    pub accuracy: u32,
    pub score: u32,
    /// percent of words completed, 0.0..=100.0
    pub progress: f64,
    pub elapsed: Duration,
}

impl Metrics {
    pub fn compute(
        correct_chars: usize,
        incorrect_chars: usize,
        elapsed: Duration,
        completed_words: usize,
        total_words: usize,
    ) -> Self {
        let wpm = wpm(correct_chars, elapsed);
        let accuracy = accuracy(correct_chars, incorrect_chars);

        Self {
            wpm,
            accuracy,
            score: score(wpm, accuracy),
            progress: progress(completed_words, total_words),
            elapsed,
        }
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

pub fn wpm(correct_chars: usize, elapsed: Duration) -> u32 {
    let minutes = elapsed.as_secs_f64() / 60.0;
    if minutes <= 0.0 {
        return 0;
    }
    ((correct_chars as f64 / CHARS_PER_WORD) / minutes).round() as u32
}

pub fn accuracy(correct_chars: usize, incorrect_chars: usize) -> u32 {
    let judged = correct_chars + incorrect_chars;
    if judged == 0 {
        return 100;
    }
    (100.0 * correct_chars as f64 / judged as f64).round() as u32
}

pub fn score(wpm: u32, accuracy: u32) -> u32 {
    (wpm as f64 * accuracy as f64 / 100.0).round() as u32
}

pub fn progress(completed_words: usize, total_words: usize) -> f64 {
    if total_words == 0 {
        return 0.0;
    }
    100.0 * completed_words as f64 / total_words as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wpm_is_zero_without_elapsed_time() {
        assert_eq!(wpm(50, Duration::ZERO), 0);
    }

    #[test]
    fn wpm_uses_five_chars_per_word() {
        // one 5-letter word in 30s
        assert_eq!(wpm(5, Duration::from_secs(30)), 2);
        // 300 chars in a minute
        assert_eq!(wpm(300, Duration::from_secs(60)), 60);
    }

    #[test]
    fn wpm_rounds_half_away_from_zero() {
        // 5 chars in 24s = 2.5 wpm
        assert_eq!(wpm(5, Duration::from_secs(24)), 3);
    }

    #[test]
    fn accuracy_defaults_to_100() {
        assert_eq!(accuracy(0, 0), 100);
    }

    #[test]
    fn accuracy_is_rounded_percentage() {
        assert_eq!(accuracy(3, 1), 75);
        assert_eq!(accuracy(2, 1), 67);
        assert_eq!(accuracy(0, 9), 0);
        assert_eq!(accuracy(1, 1), 50);
    }

    #[test]
    fn score_scales_wpm_by_accuracy() {
        assert_eq!(score(60, 100), 60);
        assert_eq!(score(45, 90), 41); // 40.5 rounds up
        assert_eq!(score(0, 100), 0);
    }

    #[test]
    fn progress_handles_empty_list() {
        assert_eq!(progress(0, 0), 0.0);
        assert_eq!(progress(15, 30), 50.0);
        assert_eq!(progress(30, 30), 100.0);
    }

    #[test]
    fn compute_is_idempotent() {
        let a = Metrics::compute(42, 7, Duration::from_millis(12_345), 9, 30);
        let b = Metrics::compute(42, 7, Duration::from_millis(12_345), 9, 30);
        assert_eq!(a, b);
        assert!(a.accuracy <= 100);
    }
}
