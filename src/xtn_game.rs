// Core game logic and configuration management
// Handles difficulty tiers, round state, scoring, hints, and configuration persistence

use directories::ProjectDirs;
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Attempts between hint offers
const HINT_TRIGGER: u32 = 5;

/// Difficulty tiers bounding the secret number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy, // 1-100
    Hard, // 1-1000
}

impl Difficulty {
    /// Upper bound of the guessing range for this tier
    pub fn max_number(&self) -> i64 {
        match self {
            Difficulty::Easy => 100,
            Difficulty::Hard => 1000,
        }
    }

    /// Display name for menus
    pub fn name(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Hard => "Hard",
        }
    }

    /// Parse the difficulty menu choice; empty input selects Easy
    pub fn from_choice(choice: &str) -> Option<Difficulty> {
        match choice.trim() {
            "1" | "" => Some(Difficulty::Easy),
            "2" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// Result of evaluating a single guess
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    TooLow,
    TooHigh,
    Won,
}

/// Hint categories by distance between guess and secret
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hint {
    VeryClose, // within 10
    Close,     // within 20
    FarOff,
}

impl Hint {
    /// Classify the absolute distance between a guess and the secret
    /// Boundary distances (exactly 10, exactly 20) map to the closer category
    pub fn classify(secret: i64, guess: i64) -> Hint {
        let distance = (secret - guess).abs();
        if distance <= 10 {
            Hint::VeryClose
        } else if distance <= 20 {
            Hint::Close
        } else {
            Hint::FarOff
        }
    }

    /// Message shown to the player
    pub fn text(&self) -> &'static str {
        match self {
            Hint::VeryClose => "You're very close!",
            Hint::Close => "You're close.",
            Hint::FarOff => "Far off.",
        }
    }
}

/// Score for a won round: 100 minus 2 per attempt, floor 1
pub fn score_for_attempts(attempts: u32) -> u32 {
    100u32.saturating_sub(attempts.saturating_mul(2)).max(1)
}

/// State of a single playthrough
pub struct Round {
    pub difficulty: Difficulty,
    pub secret: i64,             // Secret number in [1, max]
    pub attempts: u32,           // Numeric guesses submitted so far
    pub last_guess: Option<i64>, // Most recent guess, drives hints
}

impl Round {
    /// Start a round with a uniformly drawn secret
    pub fn new(difficulty: Difficulty) -> Self {
        let mut rng = thread_rng();
        let secret = rng.gen_range(1..=difficulty.max_number());
        Round::with_secret(difficulty, secret)
    }

    /// Start a round with a fixed secret (scripted rounds and tests)
    pub fn with_secret(difficulty: Difficulty, secret: i64) -> Self {
        Round {
            difficulty,
            secret,
            attempts: 0,
            last_guess: None,
        }
    }

    /// Evaluate one guess; every numeric guess counts as an attempt,
    /// in range or not
    pub fn guess(&mut self, value: i64) -> Outcome {
        self.attempts += 1;
        self.last_guess = Some(value);
        if value < self.secret {
            Outcome::TooLow
        } else if value > self.secret {
            Outcome::TooHigh
        } else {
            Outcome::Won
        }
    }

    /// Whether a hint is due after a non-winning guess
    pub fn hint_due(&self) -> bool {
        self.attempts > 0 && self.attempts % HINT_TRIGGER == 0
    }

    /// Hint for the most recent guess
    pub fn hint(&self) -> Option<Hint> {
        self.last_guess.map(|g| Hint::classify(self.secret, g))
    }

    /// Score the round at its current attempt count
    pub fn score(&self) -> u32 {
        score_for_attempts(self.attempts)
    }
}

/// User configuration
/// Persisted to disk as TOML; gameplay itself is not configurable
#[derive(Serialize, Deserialize, Debug)]
#[serde(default)]
pub struct Config {
    // High score file path; relative paths resolve against the working directory
    pub scores_file: String,

    // Force the plain renderer even when the terminal supports color
    pub plain_output: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            scores_file: "high_scores.txt".to_string(),
            plain_output: false,
        }
    }
}

impl Config {
    /// Resolved path of the high score file
    pub fn scores_path(&self) -> PathBuf {
        PathBuf::from(&self.scores_file)
    }
}

/// Get the configuration file path
/// Uses the platform config directory (e.g. ~/.config/xtnumg/xtnumg.toml on Linux)
/// and falls back to the current directory if ProjectDirs is unavailable
pub fn config_path() -> Option<PathBuf> {
    let exe = env::current_exe().ok()?;
    let name = exe.file_stem().and_then(|s| s.to_str())?.to_string();
    if let Some(proj) = ProjectDirs::from("com", "xhbl", name.as_str()) {
        let mut path = proj.config_dir().to_path_buf();
        path.push(format!("{}.toml", name));
        Some(path)
    } else {
        let mut path = env::current_dir().ok()?;
        path.push(format!("{}.toml", name));
        Some(path)
    }
}

/// Load configuration from disk, or create the default if not found
/// An unreadable config is reported and replaced by defaults for this run
pub fn load_or_create_config() -> Config {
    if let Some(path) = config_path() {
        if path.exists() {
            if let Ok(s) = fs::read_to_string(&path) {
                match toml::from_str::<Config>(&s) {
                    Ok(cfg) => return cfg,
                    Err(e) => log::warn!("ignoring unreadable config {}: {}", path.display(), e),
                }
            }
        }
        let cfg = Config::default();
        if let Ok(s) = toml::to_string(&cfg) {
            if let Some(parent) = path.parent() {
                let _ = fs::create_dir_all(parent);
            }
            if let Err(e) = fs::write(&path, s) {
                log::warn!("could not write default config {}: {}", path.display(), e);
            }
        }
        return cfg;
    }
    Config::default()
}
