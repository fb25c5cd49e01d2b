use crate::clock::{Clock, SystemClock};
use crate::collaborators::{self, Collaborators};
use crate::engine::{Engine, EngineEvent, TimerId};
use crate::runtime::{Countdown, TypingEvent};
use crate::session::SessionSummary;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::sync::mpsc::Sender;
use std::time::Duration;

pub const COUNTDOWN_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Typing,
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Terminal front end state around the engine
pub struct App<C: Clock = SystemClock> {
    pub engine: Engine<C>,
    pub collaborators: Collaborators,
    pub state: AppState,
    pub last_summary: Option<SessionSummary>,
    countdown: Option<Countdown>,
    ticks: Option<Sender<TypingEvent>>,
}

impl<C: Clock> App<C> {
    /// `ticks` receives countdown ticks; `None` leaves ticking to the caller.
    pub fn new(
        engine: Engine<C>,
        collaborators: Collaborators,
        ticks: Option<Sender<TypingEvent>>,
    ) -> Self {
        Self {
            engine,
            collaborators,
            state: AppState::Typing,
            last_summary: None,
            countdown: None,
            ticks,
        }
    }

    pub fn countdown(&self) -> Option<&Countdown> {
        self.countdown.as_ref()
    }

    pub fn handle_event(&mut self, event: TypingEvent) -> Flow {
        match event {
            TypingEvent::Key(key) => self.handle_key(key),
            TypingEvent::Tick(id) => {
                self.on_tick(id);
                Flow::Continue
            }
            TypingEvent::Resize | TypingEvent::Redraw => Flow::Continue,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Flow {
        if key.kind == KeyEventKind::Release {
            return Flow::Continue;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Esc => return Flow::Quit,
            KeyCode::Char('c') if ctrl => return Flow::Quit,
            KeyCode::Char('r') if ctrl => self.restart(),
            KeyCode::Char(_) if ctrl || key.modifiers.contains(KeyModifiers::ALT) => {}
            KeyCode::Tab => {
                let mode = self.engine.session().mode().next();
                let events = self.engine.on_mode_change(mode);
                self.apply(events);
                self.state = AppState::Typing;
            }
            KeyCode::BackTab => {
                let difficulty = self.engine.session().difficulty().next();
                let events = self.engine.on_difficulty_change(difficulty);
                self.apply(events);
                self.state = AppState::Typing;
            }
            code => match self.state {
                AppState::Typing => self.type_key(code),
                AppState::Results => self.results_key(code),
            },
        }
        Flow::Continue
    }

    pub fn on_tick(&mut self, id: TimerId) {
        let events = self.engine.on_tick(id);
        self.apply(events);
    }

    pub fn restart(&mut self) {
        let events = self.engine.on_restart();
        self.apply(events);
        self.state = AppState::Typing;
    }

    fn type_key(&mut self, code: KeyCode) {
        let mut buffer = self.engine.session().input().to_string();
        match code {
            KeyCode::Char(c) => buffer.push(c),
            KeyCode::Backspace => {
                if buffer.pop().is_none() {
                    return;
                }
            }
            _ => return,
        }
        let events = self.engine.on_input_change(&buffer);
        self.apply(events);
    }

    fn results_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('r') | KeyCode::Char('n') | KeyCode::Enter => self.restart(),
            KeyCode::Char('t') => {
                if let Some(summary) = &self.last_summary {
                    if let Err(err) = collaborators::share(summary) {
                        tracing::warn!(error = %err, "share failed");
                    }
                }
            }
            _ => {}
        }
    }

    fn apply(&mut self, events: Vec<EngineEvent>) {
        for event in &events {
            match event {
                EngineEvent::TimerArmed(id) => {
                    // replacing the handle cancels any previous countdown
                    self.countdown = self
                        .ticks
                        .as_ref()
                        .map(|tx| Countdown::start(*id, tx.clone(), COUNTDOWN_INTERVAL));
                }
                EngineEvent::TimerCancelled(id) => {
                    if self.countdown.as_ref().is_some_and(|c| c.id() == *id) {
                        self.countdown = None;
                    }
                }
                EngineEvent::SessionEnded(summary) => {
                    self.last_summary = Some(summary.clone());
                    self.state = AppState::Results;
                }
                EngineEvent::SessionStarted | EngineEvent::WordJudged(_) => {}
            }
        }
        self.collaborators.dispatch(&events);
    }
}
