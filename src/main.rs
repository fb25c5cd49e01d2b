use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};
use typemaster::{
    app::{App, Flow},
    clock::Clock,
    collaborators::{Collaborators, Silent, SoundCue, TerminalBell},
    config::{Config, ConfigStore, Difficulty, FileConfigStore, Mode},
    engine::Engine,
    logging,
    records::{RecordStore, SqliteRecordStore},
    runtime::{CrosstermEventSource, Runner, TypingEventSource},
};

const REFRESH_RATE_MS: u64 = 100;

/// typing speed trainer for the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A typing speed trainer with timed, word count, quote and code modes. \
                  Reports words per minute, accuracy and score, and keeps your personal bests."
)]
pub struct Cli {
    /// session mode
    #[clap(short = 'm', long, value_enum, default_value_t = Mode::Time)]
    mode: Mode,

    /// word length difficulty for generated words
    #[clap(short = 'd', long, value_enum, default_value_t = Difficulty::Easy)]
    difficulty: Difficulty,

    /// number of seconds for time mode
    #[clap(short = 's', long)]
    time: Option<u64>,

    /// number of words for words mode
    #[clap(short = 'w', long)]
    words: Option<usize>,

    /// path to a JSON config file
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// ring the terminal bell on each word and at the end
    #[clap(long)]
    sound: bool,

    /// print personal bests and recent sessions, then exit
    #[clap(long)]
    records: bool,

    /// delete personal bests and session history, then exit
    #[clap(long, conflicts_with = "records")]
    reset_records: bool,
}

impl Cli {
    fn load_config(&self) -> Config {
        let store = match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        };
        self.apply_overrides(store.load())
    }

    fn apply_overrides(&self, mut config: Config) -> Config {
        if let Some(secs) = self.time {
            config.time_mode_secs = secs;
        }
        if let Some(words) = self.words {
            config.words_mode_count = words;
        }
        config
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Err(err) = logging::init() {
        eprintln!("typemaster: logging disabled: {err}");
    }

    if cli.records {
        return print_records();
    }
    if cli.reset_records {
        SqliteRecordStore::open_default()?.clear()?;
        println!("records cleared");
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let config = cli.load_config();
    let engine = match Engine::with_system_clock(config, cli.mode, cli.difficulty) {
        Ok(engine) => engine,
        Err(err) => {
            let mut cmd = Cli::command();
            cmd.error(ErrorKind::InvalidValue, err.to_string()).exit();
        }
    };

    let store: Option<Box<dyn RecordStore>> = match SqliteRecordStore::open_default() {
        Ok(store) => Some(Box::new(store)),
        Err(err) => {
            tracing::warn!(error = %err, "records disabled");
            None
        }
    };
    let sound: Box<dyn SoundCue> = if cli.sound {
        Box::new(TerminalBell::new(io::stdout()))
    } else {
        Box::new(Silent)
    };

    let runner = Runner::new(
        CrosstermEventSource::new(),
        Duration::from_millis(REFRESH_RATE_MS),
    );
    let mut app = App::new(
        engine,
        Collaborators::new(store, sound),
        Some(runner.sender()),
    );

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result?;
    Ok(())
}

fn start_tui<B: Backend, C: Clock, E: TypingEventSource>(
    terminal: &mut Terminal<B>,
    app: &mut App<C>,
    runner: &Runner<E>,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        if app.handle_event(runner.step()) == Flow::Quit {
            break;
        }
    }
    Ok(())
}

fn print_records() -> Result<(), Box<dyn Error>> {
    let store = SqliteRecordStore::open_default()?;
    let records = store.load()?;

    println!("best wpm:      {}", records.best_wpm);
    println!("best accuracy: {}%", records.best_accuracy);
    println!("streak:        {}", records.streak);

    let recent = store.recent(10)?;
    if !recent.is_empty() {
        println!();
        for r in recent {
            println!(
                "{}  {:<6} {:<6} {:>3} wpm {:>3}% acc {:>5.1}s  score {}",
                r.timestamp.format("%Y-%m-%d %H:%M"),
                r.mode,
                r.difficulty,
                r.wpm,
                r.accuracy,
                r.elapsed_secs,
                r.score
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn cli_default_values() {
        let cli = Cli::parse_from(["typemaster"]);
        assert_eq!(cli.mode, Mode::Time);
        assert_eq!(cli.difficulty, Difficulty::Easy);
        assert_eq!(cli.time, None);
        assert_eq!(cli.words, None);
        assert!(!cli.sound);
        assert!(!cli.records);
        assert!(!cli.reset_records);
    }

    #[test]
    fn cli_records_flags_conflict() {
        assert!(Cli::try_parse_from(["typemaster", "--records", "--reset-records"]).is_err());
        assert!(Cli::parse_from(["typemaster", "--reset-records"]).reset_records);
    }

    #[test]
    fn cli_mode_and_difficulty() {
        let cli = Cli::parse_from(["typemaster", "-m", "quotes", "-d", "expert"]);
        assert_eq!(cli.mode, Mode::Quotes);
        assert_eq!(cli.difficulty, Difficulty::Expert);

        let cli = Cli::parse_from(["typemaster", "--mode", "code", "--difficulty", "hard"]);
        assert_eq!(cli.mode, Mode::Code);
        assert_eq!(cli.difficulty, Difficulty::Hard);
    }

    #[test]
    fn cli_rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["typemaster", "--mode", "marathon"]).is_err());
    }

    #[test]
    fn cli_overrides_config() {
        let cli = Cli::parse_from(["typemaster", "-s", "15", "-w", "10"]);
        let config = cli.apply_overrides(Config::default());
        assert_eq!(config.time_mode_secs, 15);
        assert_eq!(config.words_mode_count, 10);
    }

    #[test]
    fn cli_without_overrides_keeps_config() {
        let cli = Cli::parse_from(["typemaster"]);
        assert_eq!(cli.apply_overrides(Config::default()), Config::default());
    }
}
