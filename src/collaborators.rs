//! Side effects hung off engine events: sound cues, stored records, sharing.
//!
//! Nothing here can fail the engine. Every error is logged and dropped at
//! this boundary.

use crate::engine::EngineEvent;
use crate::error::{Error, Result};
use crate::records::{RecordStore, Records};
use crate::session::SessionSummary;
use std::io::Write;
use webbrowser::Browser;

pub trait SoundCue {
    /// a word was submitted
    fn key(&mut self) -> Result<()>;
    /// the session ended
    fn complete(&mut self) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct Silent;

impl SoundCue for Silent {
    fn key(&mut self) -> Result<()> {
        Ok(())
    }

    fn complete(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Rings the terminal bell: once per word, twice at the end
#[derive(Debug)]
pub struct TerminalBell<W: Write> {
    out: W,
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn ring(&mut self, times: usize) -> Result<()> {
        for _ in 0..times {
            self.out.write_all(b"\x07")?;
        }
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> SoundCue for TerminalBell<W> {
    fn key(&mut self) -> Result<()> {
        self.ring(1)
    }

    fn complete(&mut self) -> Result<()> {
        self.ring(2)
    }
}

pub fn share_text(wpm: u32, accuracy: u32) -> String {
    format!("I just typed at {wpm} WPM with {accuracy}% accuracy on TypeMaster Pro! 🚀")
}

pub fn share_url(text: &str) -> String {
    format!(
        "https://twitter.com/intent/tweet?text={}",
        urlencoding::encode(text)
    )
}

/// Open the share intent for `summary` in the default browser.
pub fn share(summary: &SessionSummary) -> Result<()> {
    let url = share_url(&share_text(summary.wpm, summary.accuracy));
    if !Browser::is_available() {
        return Err(Error::Browser(url));
    }
    webbrowser::open(&url).map_err(|_| Error::Browser(url))
}

/// Fans engine events out to the record store and sound cues
pub struct Collaborators {
    store: Option<Box<dyn RecordStore>>,
    sound: Box<dyn SoundCue>,
    records: Records,
}

impl Collaborators {
    pub fn new(store: Option<Box<dyn RecordStore>>, sound: Box<dyn SoundCue>) -> Self {
        let records = match store.as_ref().map(|s| s.load()) {
            Some(Ok(records)) => records,
            Some(Err(err)) => {
                tracing::warn!(error = %err, "could not load records");
                Records::default()
            }
            None => Records::default(),
        };

        Self {
            store,
            sound,
            records,
        }
    }

    /// Records as of the last successful store, for display
    pub fn records(&self) -> Records {
        self.records
    }

    pub fn dispatch(&mut self, events: &[EngineEvent]) {
        for event in events {
            match event {
                EngineEvent::WordJudged(_) => {
                    if let Err(err) = self.sound.key() {
                        tracing::warn!(error = %err, "key sound failed");
                    }
                }
                EngineEvent::SessionEnded(summary) => {
                    if let Err(err) = self.sound.complete() {
                        tracing::warn!(error = %err, "completion sound failed");
                    }
                    self.store_summary(summary);
                }
                EngineEvent::SessionStarted
                | EngineEvent::TimerArmed(_)
                | EngineEvent::TimerCancelled(_) => {}
            }
        }
    }

    fn store_summary(&mut self, summary: &SessionSummary) {
        let Some(store) = self.store.as_mut() else {
            self.records = self.records.apply(summary.wpm, summary.accuracy);
            return;
        };

        match store.record(summary) {
            Ok(records) => self.records = records,
            Err(err) => tracing::warn!(error = %err, "could not store session"),
        }
    }
}
