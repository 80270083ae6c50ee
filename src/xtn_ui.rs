// Terminal rendering, input prompts, and the top-level game loop
// A Render implementation is chosen once at startup and passed explicitly;
// all input is line-oriented over a BufRead source

use crossterm::cursor::MoveTo;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use crossterm::execute;
use std::io::{self, BufRead, Write};
use unicode_width::UnicodeWidthStr;

use crate::xtn_color::{self, WTMatch};
use crate::xtn_game::{Config, Difficulty, Outcome, Round};
use crate::xtn_scores::{self, HighScores};

/// Semantic style tags for renderer messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Info,    // neutral narration
    Success, // wins, new records
    Warning, // too-high / too-low feedback
    Error,   // invalid input, failed persistence
    Hint,    // distance hints
    Accent,  // prompts and highlighted values
}

/// Console output operations shared by the styled and plain renderers
pub trait Render {
    /// Titled panel around a few body lines
    fn panel(&self, title: &str, lines: &[&str]);

    /// Table with a header row; title may be empty
    fn table(&self, title: &str, columns: &[&str], rows: &[Vec<String>]);

    /// One-line tagged message
    fn message(&self, text: &str, tag: Tag);

    /// Inline prompt prefix, no trailing newline
    fn prompt(&self, text: &str);

    /// Clear the terminal and home the cursor
    fn clear(&self);
}

/// Pick the process-wide renderer once at startup
/// Styled output requires at least basic color support; the config can force
/// plain output on capable terminals
pub fn select_render(cfg: &Config) -> Box<dyn Render> {
    if !cfg.plain_output && xtn_color::has_color() {
        Box::new(StyledRender::new())
    } else {
        Box::new(PlainRender)
    }
}

fn clear_terminal() {
    let _ = execute!(io::stdout(), Clear(ClearType::All), MoveTo(0, 0));
}

/// Pad a cell to a display width (not a byte length)
fn pad_cell(s: &str, width: usize) -> String {
    format!("{}{}", s, " ".repeat(width.saturating_sub(s.width())))
}

/// Styled renderer backed by crossterm
/// The palette is resolved against the terminal's capability once, up front
pub struct StyledRender {
    info_fg: Color,
    success_fg: Color,
    warning_fg: Color,
    error_fg: Color,
    hint_fg: Color,
    accent_fg: Color,
    border_fg: Color,
    header_fg: Color,
}

impl StyledRender {
    pub fn new() -> Self {
        StyledRender {
            info_fg: Color::Grey.wtmatch(),
            success_fg: Color::Green.wtmatch(),
            warning_fg: Color::Yellow.wtmatch(),
            error_fg: Color::Red.wtmatch(),
            hint_fg: Color::Blue.wtmatch(),
            accent_fg: Color::Cyan.wtmatch(),
            border_fg: Color::DarkCyan.wtmatch(),
            header_fg: Color::DarkMagenta.wtmatch(),
        }
    }

    fn tag_color(&self, tag: Tag) -> Color {
        match tag {
            Tag::Info => self.info_fg,
            Tag::Success => self.success_fg,
            Tag::Warning => self.warning_fg,
            Tag::Error => self.error_fg,
            Tag::Hint => self.hint_fg,
            Tag::Accent => self.accent_fg,
        }
    }

    fn border_line(&self, widths: &[usize], left: &str, mid: &str, right: &str) -> String {
        let segs: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
        format!("{}{}{}", left, segs.join(mid), right)
    }

    fn table_row(&self, widths: &[usize], cells: &[&str], fg: Color, bold: bool) {
        let mut out = io::stdout();
        let _ = execute!(out, SetForegroundColor(self.border_fg), Print("│"));
        for (i, w) in widths.iter().enumerate() {
            let cell = cells.get(i).copied().unwrap_or("");
            let padded = format!(" {} ", pad_cell(cell, *w));
            if bold {
                let _ = execute!(
                    out,
                    SetForegroundColor(fg),
                    SetAttribute(Attribute::Bold),
                    Print(&padded),
                    SetAttribute(Attribute::Reset),
                );
            } else {
                let _ = execute!(out, SetForegroundColor(fg), Print(&padded));
            }
            let _ = execute!(out, SetForegroundColor(self.border_fg), Print("│"));
        }
        let _ = execute!(out, Print("\n"), ResetColor);
    }
}

impl Render for StyledRender {
    fn panel(&self, title: &str, lines: &[&str]) {
        let mut inner = lines.iter().map(|l| l.width()).max().unwrap_or(0);
        if !title.is_empty() {
            inner = inner.max(title.width() + 2);
        }
        let top = if title.is_empty() {
            format!("┌{}┐", "─".repeat(inner + 2))
        } else {
            format!(
                "┌─ {} {}┐",
                title,
                "─".repeat(inner.saturating_sub(title.width() + 1))
            )
        };
        let bottom = format!("└{}┘", "─".repeat(inner + 2));

        let mut out = io::stdout();
        let _ = execute!(out, SetForegroundColor(self.border_fg), Print(&top), Print("\n"));
        for line in lines {
            let _ = execute!(
                out,
                SetForegroundColor(self.border_fg),
                Print("│ "),
                SetForegroundColor(self.accent_fg),
                SetAttribute(Attribute::Bold),
                Print(*line),
                SetAttribute(Attribute::Reset),
                Print(&" ".repeat(inner.saturating_sub(line.width()))),
                SetForegroundColor(self.border_fg),
                Print(" │\n"),
            );
        }
        let _ = execute!(
            out,
            SetForegroundColor(self.border_fg),
            Print(&bottom),
            Print("\n"),
            ResetColor
        );
    }

    fn table(&self, title: &str, columns: &[&str], rows: &[Vec<String>]) {
        let mut widths: Vec<usize> = columns.iter().map(|c| c.width()).collect();
        for row in rows {
            for (i, cell) in row.iter().enumerate() {
                if let Some(w) = widths.get_mut(i) {
                    *w = (*w).max(cell.as_str().width());
                }
            }
        }

        if !title.is_empty() {
            self.message(title, Tag::Accent);
        }
        let mut out = io::stdout();
        let top = self.border_line(&widths, "┌", "┬", "┐");
        let sep = self.border_line(&widths, "├", "┼", "┤");
        let bottom = self.border_line(&widths, "└", "┴", "┘");

        let _ = execute!(out, SetForegroundColor(self.border_fg), Print(&top), Print("\n"), ResetColor);
        self.table_row(&widths, columns, self.header_fg, true);
        let _ = execute!(out, SetForegroundColor(self.border_fg), Print(&sep), Print("\n"), ResetColor);
        for row in rows {
            let cells: Vec<&str> = row.iter().map(|c| c.as_str()).collect();
            self.table_row(&widths, &cells, self.accent_fg, false);
        }
        let _ = execute!(out, SetForegroundColor(self.border_fg), Print(&bottom), Print("\n"), ResetColor);
    }

    fn message(&self, text: &str, tag: Tag) {
        let _ = execute!(
            io::stdout(),
            SetForegroundColor(self.tag_color(tag)),
            SetAttribute(Attribute::Bold),
            Print(text),
            SetAttribute(Attribute::Reset),
            ResetColor,
            Print("\n"),
        );
    }

    fn prompt(&self, text: &str) {
        // execute! flushes, so the prompt is visible before the read blocks
        let _ = execute!(
            io::stdout(),
            SetForegroundColor(self.accent_fg),
            Print(text),
            ResetColor,
        );
    }

    fn clear(&self) {
        clear_terminal();
    }
}

/// Fallback renderer for terminals without color support
pub struct PlainRender;

impl Render for PlainRender {
    fn panel(&self, title: &str, lines: &[&str]) {
        if !title.is_empty() {
            println!("{}", title);
        }
        for line in lines {
            println!("{}", line);
        }
    }

    fn table(&self, title: &str, columns: &[&str], rows: &[Vec<String>]) {
        if !title.is_empty() {
            println!("{}", title);
        }
        println!("{}", columns.join(" | "));
        for row in rows {
            println!("{}", row.join(" | "));
        }
    }

    fn message(&self, text: &str, _tag: Tag) {
        println!("{}", text);
    }

    fn prompt(&self, text: &str) {
        print!("{}", text);
        let _ = io::stdout().flush();
    }

    fn clear(&self) {
        clear_terminal();
    }
}

/// Outcome of the name prompt
#[derive(Debug, PartialEq, Eq)]
pub enum NameOrCheck {
    Name(String),
    Check,
}

/// Read one trimmed line from the input source, prompting first
/// EOF surfaces as UnexpectedEof and unwinds out of the game loop
fn read_line(input: &mut dyn BufRead, render: &dyn Render, prompt: &str) -> io::Result<String> {
    render.prompt(prompt);
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
    }
    Ok(line.trim().to_string())
}

/// Acknowledgment pause; any line (including empty) continues
fn pause(input: &mut dyn BufRead, render: &dyn Render, message: &str) -> io::Result<()> {
    read_line(input, render, message)?;
    Ok(())
}

/// Ask for the player name, or the "check" sentinel to view scores
/// Loops until a non-empty line is entered
pub fn ask_name_or_check(
    input: &mut dyn BufRead,
    render: &dyn Render,
) -> io::Result<NameOrCheck> {
    loop {
        let entry = read_line(
            input,
            render,
            "Enter your name, or type 'check' to view scores: ",
        )?;
        if entry.is_empty() {
            render.message("Please enter a valid name or type 'check'.", Tag::Error);
            continue;
        }
        if entry.eq_ignore_ascii_case("check") {
            return Ok(NameOrCheck::Check);
        }
        return Ok(NameOrCheck::Name(entry));
    }
}

/// Ask for the difficulty tier
/// The menu is redrawn each round of prompting; an invalid choice gets an
/// acknowledgment pause before the menu comes back
pub fn ask_difficulty(
    input: &mut dyn BufRead,
    render: &dyn Render,
    name: &str,
) -> io::Result<Difficulty> {
    loop {
        render.clear();
        let title = format!("Choose Difficulty Level for {}", name);
        render.panel(&title, &[]);
        let rows = vec![
            vec![
                format!("1. {}", Difficulty::Easy.name()),
                format!("1-{}", Difficulty::Easy.max_number()),
            ],
            vec![
                format!("2. {}", Difficulty::Hard.name()),
                format!("1-{}", Difficulty::Hard.max_number()),
            ],
        ];
        render.table("", &["Option", "Range"], &rows);

        let choice = read_line(input, render, "Enter your choice, default is 1: ")?;
        match Difficulty::from_choice(&choice) {
            Some(difficulty) => return Ok(difficulty),
            None => {
                render.message("Invalid choice. Please select a valid option.", Tag::Error);
                pause(input, render, "Press Enter to try again...")?;
            }
        }
    }
}

/// Ask for a numeric guess
/// Non-numeric input is reported and re-prompted without costing an attempt
pub fn ask_guess(input: &mut dyn BufRead, render: &dyn Render) -> io::Result<i64> {
    loop {
        let raw = read_line(input, render, "Your guess: ")?;
        match raw.parse::<i64>() {
            Ok(value) => return Ok(value),
            Err(_) => render.message("Invalid input. Please enter a valid number.", Tag::Error),
        }
    }
}

/// Ask whether to save the score; loops until a clear yes or no
pub fn ask_save_score(input: &mut dyn BufRead, render: &dyn Render) -> io::Result<bool> {
    loop {
        let answer = read_line(input, render, "Do you want to save your score? (yes/no): ")?;
        match answer.to_lowercase().as_str() {
            "yes" => return Ok(true),
            "no" => return Ok(false),
            _ => render.message("Please enter 'yes' or 'no'.", Tag::Error),
        }
    }
}

/// Drive one round to completion; returns the final score
pub fn play_round(
    round: &mut Round,
    input: &mut dyn BufRead,
    render: &dyn Render,
) -> io::Result<u32> {
    render.message(
        &format!(
            "I'm thinking of a number between 1 and {}.",
            round.difficulty.max_number()
        ),
        Tag::Info,
    );
    loop {
        let guess = ask_guess(input, render)?;
        match round.guess(guess) {
            Outcome::TooLow => render.message("Too low! Try again.", Tag::Warning),
            Outcome::TooHigh => render.message("Too high! Try again.", Tag::Warning),
            Outcome::Won => {
                render.message(
                    &format!(
                        "Congratulations! You guessed the number {} in {} attempts!",
                        round.secret, round.attempts
                    ),
                    Tag::Success,
                );
                let score = round.score();
                render.message(&format!("Your score: {}", score), Tag::Accent);
                return Ok(score);
            }
        }
        // Hints fire on every fifth attempt that did not win, classifying
        // the most recent guess
        if round.hint_due() {
            if let Some(hint) = round.hint() {
                render.message(&format!("Hint: {}", hint.text()), Tag::Hint);
            }
        }
    }
}

/// Render the high score table, or a notice when nothing is stored yet
pub fn show_high_scores(scores: &HighScores, render: &dyn Render) {
    if scores.is_empty() {
        render.message("No high scores recorded yet.", Tag::Info);
        return;
    }
    let rows: Vec<Vec<String>> = scores
        .iter()
        .map(|(name, entry)| vec![name.clone(), entry.score.to_string(), entry.timestamp.clone()])
        .collect();
    render.table("High Scores", &["Name", "Score", "Date & Time"], &rows);
}

/// Prompt to persist a finished round's score
/// The stored entry only changes when the new score beats it; the file is
/// rewritten on any "yes" answer
fn save_flow(
    name: &str,
    score: u32,
    scores: &mut HighScores,
    cfg: &Config,
    input: &mut dyn BufRead,
    render: &dyn Render,
) -> io::Result<()> {
    if !ask_save_score(input, render)? {
        return Ok(());
    }
    let had_entry = scores.get(name).is_some();
    if scores.submit(name, score, xtn_scores::timestamp_now()) && had_entry {
        render.message("New high score!", Tag::Success);
    }
    let path = cfg.scores_path();
    if let Err(e) = scores.save(&path) {
        log::error!("error saving high scores to {}: {}", path.display(), e);
        render.message(&format!("Error saving high scores: {}", e), Tag::Error);
    }
    Ok(())
}

/// Top-level prompt loop
/// Each iteration is one visit to the name prompt; finished rounds and score
/// checks both come back here, so restarting never recurses
pub fn run(
    cfg: &Config,
    scores: &mut HighScores,
    render: &dyn Render,
    input: &mut dyn BufRead,
) -> io::Result<()> {
    loop {
        render.clear();
        let version = format!(
            "v{} by {}",
            env!("CARGO_PKG_VERSION"),
            env!("CARGO_PKG_AUTHORS")
        );
        render.panel(
            "Game Start",
            &["Welcome to the Number Guessing Game!", version.as_str()],
        );

        let name = match ask_name_or_check(input, render)? {
            NameOrCheck::Check => {
                render.clear();
                show_high_scores(scores, render);
                pause(
                    input,
                    render,
                    "The program will pause now. Press Enter to continue...",
                )?;
                continue;
            }
            NameOrCheck::Name(name) => name,
        };

        let difficulty = ask_difficulty(input, render, &name)?;

        render.clear();
        let player_line = format!("Player Name: {}", name);
        let difficulty_line = format!(
            "Difficulty Level: {} ({})",
            difficulty.max_number(),
            difficulty.name()
        );
        render.panel("Game Info", &[player_line.as_str(), difficulty_line.as_str()]);

        let mut round = Round::new(difficulty);
        let score = play_round(&mut round, input, render)?;
        save_flow(&name, score, scores, cfg, input, render)?;
        pause(
            input,
            render,
            "The program will pause now. Press Enter to continue...",
        )?;
    }
}
