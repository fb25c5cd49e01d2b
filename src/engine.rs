//! Command interface over a [`Session`].
//!
//! Every command runs to completion and returns the notifications it produced,
//! in order, for the presentation layer and collaborators to react to. The
//! engine owns exactly one session at a time and replaces it wholesale on
//! restart or on a mode/difficulty change.

use crate::clock::{Clock, SystemClock};
use crate::config::{Config, Difficulty, Mode};
use crate::error::Result;
use crate::metrics::Metrics;
use crate::session::{Judgment, Session, SessionSummary};

/// Identifies one armed countdown; ticks carrying any other id are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    SessionStarted,
    /// start delivering one-second ticks for this id
    TimerArmed(TimerId),
    WordJudged(Judgment),
    /// stop the countdown with this id
    TimerCancelled(TimerId),
    SessionEnded(SessionSummary),
}

pub struct Engine<C: Clock = SystemClock> {
    config: Config,
    clock: C,
    session: Session,
    timer: Option<TimerId>,
    next_timer: u64,
}

impl Engine<SystemClock> {
    pub fn with_system_clock(config: Config, mode: Mode, difficulty: Difficulty) -> Result<Self> {
        Self::new(config, mode, difficulty, SystemClock)
    }
}

impl<C: Clock> Engine<C> {
    pub fn new(config: Config, mode: Mode, difficulty: Difficulty, clock: C) -> Result<Self> {
        config.validate()?;
        let session = Session::generate(mode, difficulty, &config, &mut rand::thread_rng());

        Ok(Self {
            config,
            clock,
            session,
            timer: None,
            next_timer: 0,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn armed_timer(&self) -> Option<TimerId> {
        self.timer
    }

    pub fn live_metrics(&self) -> Metrics {
        self.session.metrics(self.clock.now())
    }

    pub fn on_input_change(&mut self, buffer: &str) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        let now = self.clock.now();
        let submission = self.session.submit_chunk(buffer, now);

        if submission.started {
            tracing::debug!(
                mode = %self.session.mode(),
                difficulty = %self.session.difficulty(),
                words = self.session.words().len(),
                "session started"
            );
            events.push(EngineEvent::SessionStarted);
            if self.session.time_left_secs().is_some() {
                events.push(EngineEvent::TimerArmed(self.arm_timer()));
            }
        }

        if let Some(judgment) = submission.judged {
            events.push(EngineEvent::WordJudged(judgment));
        }

        if submission.ended {
            self.finish(&mut events);
        }

        events
    }

    pub fn on_tick(&mut self, timer: TimerId) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        if self.timer != Some(timer) {
            tracing::trace!(?timer, "ignoring stale tick");
            return events;
        }

        if self.session.tick(self.clock.now()) {
            self.finish(&mut events);
        }
        events
    }

    pub fn on_restart(&mut self) -> Vec<EngineEvent> {
        self.replace(self.session.mode(), self.session.difficulty())
    }

    pub fn on_mode_change(&mut self, mode: Mode) -> Vec<EngineEvent> {
        self.replace(mode, self.session.difficulty())
    }

    pub fn on_difficulty_change(&mut self, difficulty: Difficulty) -> Vec<EngineEvent> {
        self.replace(self.session.mode(), difficulty)
    }

    fn replace(&mut self, mode: Mode, difficulty: Difficulty) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        self.disarm_timer(&mut events);
        self.session = Session::generate(mode, difficulty, &self.config, &mut rand::thread_rng());
        events
    }

    fn finish(&mut self, events: &mut Vec<EngineEvent>) {
        self.disarm_timer(events);
        if let Some(summary) = self.session.summary() {
            tracing::debug!(
                wpm = summary.wpm,
                accuracy = summary.accuracy,
                elapsed_secs = summary.elapsed_secs,
                "session ended"
            );
            events.push(EngineEvent::SessionEnded(summary));
        }
    }

    fn arm_timer(&mut self) -> TimerId {
        self.next_timer += 1;
        let id = TimerId(self.next_timer);
        self.timer = Some(id);
        id
    }

    fn disarm_timer(&mut self, events: &mut Vec<EngineEvent>) {
        if let Some(id) = self.timer.take() {
            events.push(EngineEvent::TimerCancelled(id));
        }
    }
}
