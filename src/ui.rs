use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;
use webbrowser::Browser;

use crate::app::{App, AppState};
use crate::clock::Clock;
use crate::config::Mode;
use crate::session::{Session, Word, WordStatus};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;
const VISIBLE_WORD_LINES: usize = 3;

const SHARE_HINT: &str = "(t)weet";
const RESULTS_LEGEND: [&str; 5] = [
    "(r)etry",
    SHARE_HINT,
    "(tab) mode",
    "(shift+tab) difficulty",
    "(esc)ape",
];

impl<C: Clock> Widget for &App<C> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let session = self.engine.session();
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1),                         // header
                Constraint::Length(1),                         // padding
                Constraint::Length(1),                         // live stats
                Constraint::Length(1),                         // progress
                Constraint::Length(1),                         // padding
                Constraint::Min(VISIBLE_WORD_LINES as u16 + 2), // words or results
                Constraint::Length(1),                         // input
                Constraint::Length(1),                         // legend
            ])
            .split(area);

        let records = self.collaborators.records();
        let header = Line::from(vec![
            Span::styled("typemaster", bold_style.fg(Color::Magenta)),
            Span::raw("   "),
            Span::styled(format!("mode: {}", session.mode()), bold_style),
            Span::raw("   "),
            Span::styled(format!("difficulty: {}", session.difficulty()), bold_style),
            Span::raw("   "),
            Span::styled(
                format!(
                    "best {} wpm · {}% · streak {}",
                    records.best_wpm, records.best_accuracy, records.streak
                ),
                dim_style,
            ),
        ]);
        Paragraph::new(header)
            .alignment(Alignment::Center)
            .render(chunks[0], buf);

        let metrics = self.engine.live_metrics();
        let mut stats = Vec::new();
        if let Some(left) = session.time_left_secs() {
            stats.push(Span::styled(format!("{left}s"), bold_style.fg(Color::Yellow)));
            stats.push(Span::raw("   "));
        }
        stats.push(Span::styled(format!("{} wpm", metrics.wpm), bold_style));
        stats.push(Span::raw("   "));
        stats.push(Span::styled(format!("{}% acc", metrics.accuracy), bold_style));
        Paragraph::new(Line::from(stats))
            .alignment(Alignment::Center)
            .render(chunks[2], buf);

        Gauge::default()
            .gauge_style(Style::default().fg(Color::Magenta))
            .ratio((metrics.progress / 100.0).clamp(0.0, 1.0))
            .label(format!(
                "{}/{}",
                session.completed_words(),
                session.words().len()
            ))
            .render(chunks[3], buf);

        match self.state {
            AppState::Typing => {
                let per_line = self
                    .engine
                    .config()
                    .difficulty(session.difficulty())
                    .words_per_line;
                let lines = word_lines(session, chunks[5].width.saturating_sub(2), per_line);
                Paragraph::new(lines)
                    .block(Block::default().borders(Borders::ALL))
                    .alignment(Alignment::Left)
                    .render(chunks[5], buf);

                let input_style = match session.current_word() {
                    Some(word) if !word.accepts_prefix(session.input()) => {
                        bold_style.fg(Color::Red)
                    }
                    _ => bold_style,
                };
                let prompt = if session.has_started() {
                    session.input().to_string()
                } else {
                    format!("start typing: {}", mode_hint(session.mode()))
                };
                Paragraph::new(Line::from(vec![
                    Span::styled("> ", dim_style),
                    Span::styled(prompt, input_style),
                ]))
                .render(chunks[6], buf);

                Paragraph::new(Span::styled(
                    "(tab) mode / (shift+tab) difficulty / (ctrl+r) restart / (esc)ape",
                    italic_style,
                ))
                .render(chunks[7], buf);
            }
            AppState::Results => {
                if let Some(summary) = &self.last_summary {
                    let lines = vec![
                        Line::from(Span::styled(
                            format!("{} wpm", summary.wpm),
                            bold_style.fg(Color::Green),
                        )),
                        Line::from(Span::styled(
                            format!("{}% accuracy", summary.accuracy),
                            bold_style,
                        )),
                        Line::from(Span::raw(format!(
                            "{}s   score {}",
                            summary.elapsed_secs.round(),
                            summary.score
                        ))),
                        Line::from(Span::styled(
                            format!(
                                "{} words · {} correct chars · {} missed",
                                summary.completed_words,
                                summary.correct_chars,
                                summary.incorrect_chars
                            ),
                            dim_style,
                        )),
                    ];
                    Paragraph::new(lines)
                        .block(Block::default().borders(Borders::ALL).title("results"))
                        .alignment(Alignment::Center)
                        .wrap(Wrap { trim: true })
                        .render(chunks[5], buf);
                }

                let can_share = Browser::is_available();
                let legend = RESULTS_LEGEND
                    .iter()
                    .filter(|hint| can_share || **hint != SHARE_HINT)
                    .join(" / ");
                Paragraph::new(Span::styled(legend, italic_style)).render(chunks[7], buf);
            }
        }
    }
}

fn word_style(word: &Word, is_current: bool) -> Style {
    let base = Style::default().add_modifier(Modifier::BOLD);
    if is_current {
        return base.add_modifier(Modifier::UNDERLINED);
    }
    match word.status {
        WordStatus::Correct => base.fg(Color::Green),
        WordStatus::Incorrect => base.fg(Color::Red).add_modifier(Modifier::CROSSED_OUT),
        WordStatus::Pending => base.add_modifier(Modifier::DIM),
    }
}

/// Break the word list into lines no wider than `width` and no longer than
/// `per_line` words, then keep a window around the current word.
fn word_lines(session: &Session, width: u16, per_line: usize) -> Vec<Line<'_>> {
    let width = usize::from(width.max(1));
    let per_line = per_line.max(1);

    let mut rows: Vec<Vec<usize>> = vec![Vec::new()];
    let mut row_width = 0;
    for (idx, word) in session.words().iter().enumerate() {
        let w = word.text.width();
        let row = rows.last_mut().map(|r| r.len()).unwrap_or(0);
        if row > 0 && (row >= per_line || row_width + 1 + w > width) {
            rows.push(Vec::new());
            row_width = 0;
        }
        if let Some(row) = rows.last_mut() {
            row_width += if row.is_empty() { w } else { w + 1 };
            row.push(idx);
        }
    }

    let current_row = rows
        .iter()
        .position(|r| r.contains(&session.current_index()))
        .unwrap_or(rows.len().saturating_sub(1));
    let first = current_row.saturating_sub(1);

    rows.iter()
        .skip(first)
        .take(VISIBLE_WORD_LINES)
        .map(move |row| {
            let spans = row
                .iter()
                .flat_map(move |&idx| {
                    let word = &session.words()[idx];
                    let is_current = idx == session.current_index() && !session.has_ended();
                    [
                        Span::styled(word.text.as_str(), word_style(word, is_current)),
                        Span::raw(" "),
                    ]
                })
                .collect::<Vec<_>>();
            Line::from(spans)
        })
        .collect()
}

pub fn mode_hint(mode: Mode) -> &'static str {
    match mode {
        Mode::Time => "type until the clock runs out",
        Mode::Words => "type every word",
        Mode::Quotes => "type the quote",
        Mode::Code => "type the keywords",
    }
}
