use crate::config::{Config, Difficulty, Mode};
use crate::metrics::Metrics;
use crate::word_generator;
use rand::Rng;
use std::fmt;
use std::time::{Duration, SystemTime};

/// Character that completes a word
pub const SEPARATOR: char = ' ';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordStatus {
    Pending,
    Correct,
    Incorrect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub text: String,
    pub status: WordStatus,
}

impl Word {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            status: WordStatus::Pending,
        }
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Whether `partial` could still become this word
    pub fn accepts_prefix(&self, partial: &str) -> bool {
        self.text.starts_with(partial)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Ended,
}

/// Limits captured from the config when the session is built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionLimits {
    pub time_secs: u64,
    pub word_count: usize,
}

impl From<&Config> for SessionLimits {
    fn from(config: &Config) -> Self {
        Self {
            time_secs: config.time_mode_secs,
            word_count: config.words_mode_count,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Judgment {
    pub index: usize,
    pub status: WordStatus,
}

/// What a single input change did to the session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Submission {
    pub started: bool,
    pub judged: Option<Judgment>,
    pub ended: bool,
}

/// Frozen result of a finished session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub mode: Mode,
    pub difficulty: Difficulty,
    pub wpm: u32,
    pub accuracy: u32,
    pub score: u32,
    pub elapsed_secs: f64,
    pub correct_chars: usize,
    pub incorrect_chars: usize,
    pub completed_words: usize,
    pub total_words: usize,
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} wpm | {}% acc | {}s | score {}",
            self.wpm,
            self.accuracy,
            self.elapsed_secs.round(),
            self.score
        )
    }
}

/// One typing session: the target words and everything typed against them
#[derive(Debug, Clone)]
pub struct Session {
    mode: Mode,
    difficulty: Difficulty,
    limits: SessionLimits,
    words: Vec<Word>,
    current_index: usize,
    completed_words: usize,
    correct_chars: usize,
    incorrect_chars: usize,
    input: String,
    phase: Phase,
    started_at: Option<SystemTime>,
    ended_at: Option<SystemTime>,
    time_left_secs: Option<u64>,
    final_metrics: Option<Metrics>,
}

impl Session {
    pub fn generate<R: Rng + ?Sized>(
        mode: Mode,
        difficulty: Difficulty,
        config: &Config,
        rng: &mut R,
    ) -> Self {
        let words = word_generator::generate(mode, difficulty, config, rng);
        Self::with_words(mode, difficulty, SessionLimits::from(config), words)
    }

    pub fn with_words(
        mode: Mode,
        difficulty: Difficulty,
        limits: SessionLimits,
        words: Vec<Word>,
    ) -> Self {
        Self {
            mode,
            difficulty,
            limits,
            words,
            current_index: 0,
            completed_words: 0,
            correct_chars: 0,
            incorrect_chars: 0,
            input: String::new(),
            phase: Phase::Idle,
            started_at: None,
            ended_at: None,
            time_left_secs: (mode == Mode::Time).then_some(limits.time_secs),
            final_metrics: None,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn current_word(&self) -> Option<&Word> {
        self.words.get(self.current_index)
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn completed_words(&self) -> usize {
        self.completed_words
    }

    pub fn correct_chars(&self) -> usize {
        self.correct_chars
    }

    pub fn incorrect_chars(&self) -> usize {
        self.incorrect_chars
    }

    /// The in-progress text for the current word
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn has_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn has_ended(&self) -> bool {
        self.phase == Phase::Ended
    }

    pub fn time_left_secs(&self) -> Option<u64> {
        self.time_left_secs
    }

    /// Apply the full contents of the input box.
    ///
    /// A trailing separator commits the trimmed buffer as an attempt at the
    /// current word. Input after the session has ended is ignored.
    pub fn submit_chunk(&mut self, buffer: &str, now: SystemTime) -> Submission {
        let mut submission = Submission::default();

        if self.phase == Phase::Ended || self.words.is_empty() {
            return submission;
        }

        if self.phase == Phase::Idle {
            self.start(now);
            submission.started = true;
        }

        if self.current_index >= self.words.len() {
            return submission;
        }

        if !buffer.ends_with(SEPARATOR) {
            self.input = buffer.to_string();
            return submission;
        }

        submission.judged = Some(self.judge(buffer.trim()));
        self.input.clear();

        if self.is_finished() {
            self.end(now);
            submission.ended = true;
        }

        submission
    }

    /// One second of countdown. Returns true if this tick ended the session.
    pub fn tick(&mut self, now: SystemTime) -> bool {
        if self.phase != Phase::Running {
            return false;
        }
        let Some(left) = self.time_left_secs else {
            return false;
        };

        self.time_left_secs = Some(left.saturating_sub(1));

        if self.is_finished() {
            self.end(now);
            return true;
        }
        false
    }

    pub fn is_finished(&self) -> bool {
        self.current_index >= self.words.len()
            || (self.mode == Mode::Words && self.completed_words >= self.limits.word_count)
            || (self.mode == Mode::Time && self.time_left_secs == Some(0))
    }

    /// Metrics as of `now`; frozen once the session has ended.
    pub fn metrics(&self, now: SystemTime) -> Metrics {
        if let Some(frozen) = self.final_metrics {
            return frozen;
        }

        Metrics::compute(
            self.correct_chars,
            self.incorrect_chars,
            self.elapsed(now),
            self.completed_words,
            self.words.len(),
        )
    }

    pub fn summary(&self) -> Option<SessionSummary> {
        let metrics = self.final_metrics?;
        Some(SessionSummary {
            mode: self.mode,
            difficulty: self.difficulty,
            wpm: metrics.wpm,
            accuracy: metrics.accuracy,
            score: metrics.score,
            elapsed_secs: metrics.elapsed_secs(),
            correct_chars: self.correct_chars,
            incorrect_chars: self.incorrect_chars,
            completed_words: self.completed_words,
            total_words: self.words.len(),
        })
    }

    fn elapsed(&self, now: SystemTime) -> Duration {
        let Some(started_at) = self.started_at else {
            return Duration::ZERO;
        };
        let until = self.ended_at.unwrap_or(now);
        until.duration_since(started_at).unwrap_or_default()
    }

    fn start(&mut self, now: SystemTime) {
        self.phase = Phase::Running;
        self.started_at = Some(now);
        self.correct_chars = 0;
        self.incorrect_chars = 0;
        self.completed_words = 0;
        self.time_left_secs = (self.mode == Mode::Time).then_some(self.limits.time_secs);
    }

    fn judge(&mut self, typed: &str) -> Judgment {
        let index = self.current_index;
        let word = &mut self.words[index];

        word.status = if typed == word.text {
            self.correct_chars += word.char_len();
            WordStatus::Correct
        } else {
            self.incorrect_chars += typed.chars().count().max(word.char_len());
            WordStatus::Incorrect
        };

        self.current_index += 1;
        self.completed_words += 1;

        Judgment {
            index,
            status: word.status,
        }
    }

    fn end(&mut self, now: SystemTime) {
        self.final_metrics = Some(self.metrics(now));
        self.ended_at = Some(now);
        self.phase = Phase::Ended;
    }
}
