use crate::app_dirs::AppDirs;
use crate::error::{Error, Result};
use crate::lang::WordList;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// How a session is bounded and where its words come from
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Mode {
    /// random words against the clock
    #[default]
    Time,
    /// a fixed number of random words
    Words,
    /// a single quote
    Quotes,
    /// programming keywords from a fixed pool
    Code,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::Time, Mode::Words, Mode::Quotes, Mode::Code];

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|m| *m == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Expert,
    ];

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|d| *d == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn default_range(self) -> LengthRange {
        match self {
            Difficulty::Easy => LengthRange::new(3, 5, 8),
            Difficulty::Medium => LengthRange::new(4, 7, 10),
            Difficulty::Hard => LengthRange::new(5, 9, 12),
            Difficulty::Expert => LengthRange::new(6, 12, 14),
        }
    }
}

/// Inclusive bounds on generated word length for one difficulty
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LengthRange {
    pub min_length: usize,
    pub max_length: usize,
    /// layout hint for the word list, not used by the engine
    pub words_per_line: usize,
}

impl LengthRange {
    pub fn new(min_length: usize, max_length: usize, words_per_line: usize) -> Self {
        Self {
            min_length,
            max_length,
            words_per_line,
        }
    }

    pub fn contains(&self, len: usize) -> bool {
        (self.min_length..=self.max_length).contains(&len)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WordLists {
    pub common: Vec<String>,
    pub programming: Vec<String>,
    pub quotes: Vec<String>,
}

impl WordLists {
    pub fn bundled() -> Result<Self> {
        Ok(Self {
            common: WordList::bundled("common")?.words,
            programming: WordList::bundled("programming")?.words,
            quotes: WordList::bundled("quotes")?.words,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub time_mode_secs: u64,
    pub words_mode_count: usize,
    /// number of words drawn for time and code mode
    pub pool_size: usize,
    pub difficulties: BTreeMap<Difficulty, LengthRange>,
    pub word_lists: WordLists,
}

impl Default for Config {
    fn default() -> Self {
        let word_lists = WordLists::bundled().unwrap_or_else(|err| {
            tracing::error!(error = %err, "bundled word lists unavailable");
            WordLists::default()
        });

        Self {
            time_mode_secs: 60,
            words_mode_count: 30,
            pool_size: 100,
            difficulties: Difficulty::ALL
                .iter()
                .map(|d| (*d, d.default_range()))
                .collect(),
            word_lists,
        }
    }
}

impl Config {
    /// Length bounds for `difficulty`, falling back to the built-in range.
    pub fn difficulty(&self, difficulty: Difficulty) -> LengthRange {
        self.difficulties
            .get(&difficulty)
            .copied()
            .unwrap_or_else(|| difficulty.default_range())
    }

    pub fn validate(&self) -> Result<()> {
        if self.time_mode_secs == 0 {
            return Err(Error::InvalidConfig("time_mode_secs must be positive".into()));
        }
        if self.words_mode_count == 0 {
            return Err(Error::InvalidConfig(
                "words_mode_count must be positive".into(),
            ));
        }
        if self.pool_size == 0 {
            return Err(Error::InvalidConfig("pool_size must be positive".into()));
        }
        for (difficulty, range) in &self.difficulties {
            if range.min_length == 0 || range.min_length > range.max_length {
                return Err(Error::InvalidConfig(format!(
                    "{difficulty}: length range {}..={} is empty",
                    range.min_length, range.max_length
                )));
            }
        }

        let lists = [
            ("common", &self.word_lists.common),
            ("programming", &self.word_lists.programming),
            ("quotes", &self.word_lists.quotes),
        ];
        for (name, words) in lists {
            if words.iter().all(|w| w.trim().is_empty()) {
                return Err(Error::InvalidConfig(format!("word list `{name}` is empty")));
            }
        }

        Ok(())
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path().unwrap_or_else(|| PathBuf::from("typemaster_config.json")),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let Ok(bytes) = fs::read(&self.path) else {
            return Config::default();
        };

        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => match cfg.validate() {
                Ok(()) => cfg,
                Err(err) => {
                    tracing::warn!(path = %self.path.display(), error = %err, "ignoring config");
                    Config::default()
                }
            },
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "unreadable config");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}
