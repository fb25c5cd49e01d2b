// Library surface for the binary and for headless/integration tests.
pub mod app;
pub mod app_dirs;
pub mod clock;
pub mod collaborators;
pub mod config;
pub mod engine;
pub mod error;
pub mod lang;
pub mod logging;
pub mod metrics;
pub mod records;
pub mod runtime;
pub mod session;
pub mod ui;
pub mod word_generator;

pub use config::{Config, Difficulty, Mode};
pub use engine::{Engine, EngineEvent};
pub use error::{Error, Result};
pub use session::{Session, SessionSummary, Word, WordStatus};
