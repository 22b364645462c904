//! Minimax chess engine driver.
//!
//! Analyses a position (the start position, a FEN, optionally followed by
//! UCI moves) or lets the engine play itself, and prints the result as text
//! or JSON.

mod config;
mod game;
mod report;

use anyhow::Context;
use chess_position::{parse_legal_move, Position};
use chess_search::SearchEngine;
use clap::Parser;
use config::Settings;
use report::AnalysisReport;
use std::path::PathBuf;
use tracing::Level;

/// Minimax chess engine with alpha-beta pruning.
#[derive(Parser, Debug)]
#[command(name = "chess-minimax")]
#[command(about = "Searches chess positions with minimax and alpha-beta pruning")]
struct Args {
    /// Search depth in plies (at least 1)
    #[arg(short, long)]
    depth: Option<u32>,

    /// Reward attacking enemy pieces
    #[arg(long)]
    threat: bool,

    /// Reward defended pieces
    #[arg(long)]
    defense: bool,

    /// Starting position in FEN (default: standard start)
    #[arg(long)]
    fen: Option<String>,

    /// UCI moves applied before searching
    #[arg(long, num_args = 1.., value_name = "UCI")]
    moves: Vec<String>,

    /// Let the engine play both sides
    #[arg(long)]
    play: bool,

    /// Self-play ply limit (overrides the settings file)
    #[arg(long)]
    max_plies: Option<u32>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Disable the transposition cache
    #[arg(long)]
    no_cache: bool,

    /// Settings file (default: chess-minimax.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log search internals
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// Applies command-line overrides on top of the settings file.
    fn merge_into(&self, mut settings: Settings) -> Settings {
        if let Some(depth) = self.depth {
            settings.depth = Some(depth);
        }
        if let Some(max_plies) = self.max_plies {
            settings.max_plies = max_plies;
        }
        settings.evaluation.threat |= self.threat;
        settings.evaluation.defense |= self.defense;
        settings.search.use_cache &= !self.no_cache;
        settings
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if args.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        })
        .init();

    let settings = args.merge_into(Settings::load(args.config.as_deref())?);
    let depth = settings.search_depth()?;
    tracing::info!(
        depth,
        threat = settings.evaluation.threat,
        defense = settings.evaluation.defense,
        fraction_divisor = settings.evaluation.fraction_divisor,
        pruning = settings.search.pruning,
        cache = settings.search.use_cache,
        "Starting chess-minimax"
    );

    let engine = SearchEngine::with_options(settings.evaluation, settings.search)?;

    let mut position = match &args.fen {
        Some(fen) => Position::from_fen(fen).with_context(|| format!("bad --fen '{}'", fen))?,
        None => Position::startpos(),
    };
    for text in &args.moves {
        let m = parse_legal_move(&position, text)
            .with_context(|| format!("cannot play '{}' in {}", text, position.to_fen()))?;
        position = chess_position::make_move(&position, m);
    }

    if args.play {
        let game = game::self_play(&engine, &position, depth, settings.max_plies)?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&game)?);
        } else {
            println!("{}", report::game_to_text(&game));
        }
    } else {
        let result = engine.search(&position, depth)?;
        let report = AnalysisReport::new(&position, &result);
        if args.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!("{}", report.to_text());
        }
    }

    Ok(())
}
