// Entry point for the number guessing game
// Initializes logging, configuration, persisted scores, and launches the game loop

use std::error::Error;
use std::io;

// Module declarations
mod xtn_color;  // Terminal color capability matching utilities
mod xtn_game;   // Core game logic and configuration
mod xtn_scores; // High score persistence
mod xtn_ui;     // Terminal rendering and input prompts

use xtn_game::load_or_create_config;
use xtn_scores::HighScores;
use xtn_ui::{run, select_render};

fn main() -> Result<(), Box<dyn Error>> {
    // Diagnostic logging, controlled by RUST_LOG
    env_logger::init();

    // Load or create user configuration (score file path, output preferences)
    let cfg = load_or_create_config();

    // Load persisted high scores once at startup
    let mut scores = HighScores::load(&cfg.scores_path());
    log::debug!("loaded {} high score entries", scores.len());

    // Pick the renderer once based on terminal capability and configuration
    let render = select_render(&cfg);

    // Run the main prompt loop over stdin until interrupted
    let stdin = io::stdin();
    run(&cfg, &mut scores, render.as_ref(), &mut stdin.lock())?;
    Ok(())
}
