//! Headless demo session (default binary).
//!
//! Plays one seeded round by always taking the first possible move, then
//! prints a JSON summary with the final board. Board and scoring come from the
//! `MATCH3_*` variables (see `EngineConfig::from_env`), the move budget from
//! `MATCH3_MOVES`. Set `RUST_LOG=debug` to trace every cascade transition.

use anyhow::{Context, Result};
use serde_json::json;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tile_cascade::core::SimpleRng;
use tile_cascade::engine::{
    CascadeEngine, CascadeEvent, EngineConfig, GameSession, InstantAnimations,
};

/// Simulated frame length
const FRAME_MS: u32 = 16;

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tile_cascade=info,tile_cascade_engine=info,tile_cascade_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = EngineConfig::from_env();
    config
        .validate()
        .context("invalid MATCH3_* configuration")?;
    let move_budget: u32 = std::env::var("MATCH3_MOVES")
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(20);

    let engine = CascadeEngine::new(
        config.clone(),
        SimpleRng::new(config.seed),
        InstantAnimations::new(),
    )
    .context("failed to build the starting board")?;
    let mut session = GameSession::new(engine);
    info!(
        width = config.width,
        height = config.height,
        palette = config.palette_size,
        seed = config.seed,
        "session started"
    );

    let mut moves = 0u32;
    let mut passes = 0u32;
    let mut best_combo = 0u32;
    let mut reshuffles = 0u32;

    while moves < move_budget && !session.is_game_over() {
        match session.engine().hint() {
            Some((a, b)) => {
                session.request_swap(a, b)?;
                moves += 1;
            }
            // Dead board and no timer armed (e.g. zero wait already elapsed).
            None if session.deadlock_remaining_ms().is_none() => {
                session.engine_mut().reshuffle()?;
            }
            None => {}
        }
        session.tick(FRAME_MS)?;

        for event in session.take_events() {
            match event {
                CascadeEvent::Matched { combo, .. } => {
                    passes += 1;
                    best_combo = best_combo.max(combo);
                }
                CascadeEvent::Reshuffled => reshuffles += 1,
                _ => {}
            }
        }
    }

    let board = session.engine().snapshot();
    let summary = json!({
        "seed": config.seed,
        "moves": moves,
        "match_passes": passes,
        "best_combo": best_combo,
        "reshuffles": reshuffles,
        "score": session.score(),
        "high_score": session.high_score(),
        "game_over": session.is_game_over(),
        "board": board,
        "board_text": board.to_text(),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
