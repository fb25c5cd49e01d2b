use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent};

use crate::engine::TimerId;

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum TypingEvent {
    Key(KeyEvent),
    Resize,
    /// one second of countdown for the given timer
    Tick(TimerId),
    /// nothing happened within the refresh interval
    Redraw,
}

/// Source of terminal events (keyboard, resize, countdown ticks)
pub trait TypingEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<TypingEvent, RecvTimeoutError>;

    /// Sender that countdown threads feed ticks into
    fn sender(&self) -> Sender<TypingEvent>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    tx: Sender<TypingEvent>,
    rx: Receiver<TypingEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        let key_tx = tx.clone();

        thread::spawn(move || loop {
            match event::read() {
                Ok(CtEvent::Key(key)) => {
                    if key_tx.send(TypingEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(CtEvent::Resize(_, _)) => {
                    if key_tx.send(TypingEvent::Resize).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(err) => {
                    tracing::error!(error = %err, "terminal event stream closed");
                    break;
                }
            }
        });

        Self { tx, rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TypingEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<TypingEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    fn sender(&self) -> Sender<TypingEvent> {
        self.tx.clone()
    }
}

/// Test event source fed through a channel
pub struct TestEventSource {
    tx: Sender<TypingEvent>,
    rx: Receiver<TypingEvent>,
}

impl TestEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }
}

impl Default for TestEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TypingEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<TypingEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    fn sender(&self) -> Sender<TypingEvent> {
        self.tx.clone()
    }
}

/// Runner that advances the application one event at a time
pub struct Runner<E: TypingEventSource> {
    event_source: E,
    refresh: Duration,
}

impl<E: TypingEventSource> Runner<E> {
    pub fn new(event_source: E, refresh: Duration) -> Self {
        Self {
            event_source,
            refresh,
        }
    }

    /// Blocks up to the refresh interval and returns the next event, or Redraw on timeout
    pub fn step(&self) -> TypingEvent {
        match self.event_source.recv_timeout(self.refresh) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                TypingEvent::Redraw
            }
        }
    }

    pub fn sender(&self) -> Sender<TypingEvent> {
        self.event_source.sender()
    }
}

/// A background thread sending `Tick(id)` every `interval` until cancelled.
///
/// Dropping the handle cancels it.
#[derive(Debug)]
pub struct Countdown {
    id: TimerId,
    cancelled: Arc<AtomicBool>,
}

impl Countdown {
    pub fn start(id: TimerId, tx: Sender<TypingEvent>, interval: Duration) -> Self {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);

        thread::spawn(move || loop {
            thread::sleep(interval);
            if flag.load(Ordering::SeqCst) || tx.send(TypingEvent::Tick(id)).is_err() {
                break;
            }
        });

        Self { id, cancelled }
    }

    pub fn id(&self) -> TimerId {
        self.id
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::{Config, Difficulty, Mode};
    use crate::engine::{Engine, EngineEvent};

    fn armed_timer() -> TimerId {
        let clock = ManualClock::new();
        let mut engine =
            Engine::new(Config::default(), Mode::Time, Difficulty::Easy, &clock).unwrap();
        engine
            .on_input_change("a")
            .into_iter()
            .find_map(|e| match e {
                EngineEvent::TimerArmed(id) => Some(id),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn step_returns_redraw_on_timeout() {
        let runner = Runner::new(TestEventSource::new(), Duration::from_millis(1));
        assert!(matches!(runner.step(), TypingEvent::Redraw));
    }

    #[test]
    fn step_passes_through_events() {
        let runner = Runner::new(TestEventSource::new(), Duration::from_millis(10));
        runner.sender().send(TypingEvent::Resize).unwrap();
        assert!(matches!(runner.step(), TypingEvent::Resize));
    }

    #[test]
    fn countdown_delivers_ticks() {
        let id = armed_timer();
        let runner = Runner::new(TestEventSource::new(), Duration::from_millis(500));
        let countdown = Countdown::start(id, runner.sender(), Duration::from_millis(5));

        match runner.step() {
            TypingEvent::Tick(got) => assert_eq!(got, countdown.id()),
            other => panic!("expected Tick, got {other:?}"),
        }
    }

    #[test]
    fn cancelled_countdown_goes_quiet() {
        let id = armed_timer();
        let runner = Runner::new(TestEventSource::new(), Duration::from_millis(50));
        let countdown = Countdown::start(id, runner.sender(), Duration::from_millis(20));
        countdown.cancel();

        // at most one tick can slip out between sleep and the flag check
        thread::sleep(Duration::from_millis(60));
        while let TypingEvent::Tick(_) = runner.step() {}
        assert!(matches!(runner.step(), TypingEvent::Redraw));
    }

    #[test]
    fn dropping_countdown_cancels_it() {
        let id = armed_timer();
        let (tx, _rx) = mpsc::channel();
        let countdown = Countdown::start(id, tx, Duration::from_millis(5));
        let flag = Arc::clone(&countdown.cancelled);
        drop(countdown);
        assert!(flag.load(Ordering::SeqCst));
    }
}
