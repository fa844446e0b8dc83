use std::{
    path::PathBuf,
    thread,
    time::{Duration, Instant},
};

use chrono::Utc;
use oxid2048_ai::{AutoPlayer, Searcher};
use oxid2048_engine::{GameMode, GameSession, TileSeed, WINNING_TILE};
use oxid2048_evaluator::HeuristicEvaluator;
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;

use crate::{
    command::search_arg::SearchArg,
    schema::report::{AutoPlayReport, GameRecord, ReportSummary},
    util,
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct AutoPlayArg {
    /// Game variant: classic, expanded, reverse or gravity
    #[arg(long, default_value_t = GameMode::Classic)]
    mode: GameMode,
    /// Number of games to play
    #[arg(long, default_value_t = 1)]
    games: usize,
    #[clap(flatten)]
    search: SearchArg,
    /// Base seed (32 hex digits); per-game seeds are derived from it
    #[arg(long)]
    seed: Option<TileSeed>,
    /// Stop each game after this many moves
    #[arg(long)]
    move_limit: Option<usize>,
    /// Pause between moves, for watching with --verbose
    #[arg(long, default_value_t = 0)]
    delay_ms: u64,
    /// Print every move and the final grid of each game
    #[arg(long)]
    verbose: bool,
    /// Output file path for the JSON report (stdout when omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &AutoPlayArg) -> anyhow::Result<()> {
    let AutoPlayArg {
        mode,
        games,
        search,
        seed,
        move_limit,
        delay_ms,
        verbose,
        output,
    } = arg;

    let weights = search.load_weights()?;
    let config = search.config();
    let base_seed = seed.unwrap_or_else(rand::random);
    let mut seed_rng = Pcg32::from_seed(base_seed.to_bytes());

    eprintln!(
        "Playing {games} {mode} game(s): depth {}, {} sampled cells, base seed {base_seed}",
        config.depth, config.sample_cells
    );

    let mut records = Vec::with_capacity(*games);
    for index in 0..*games {
        let game_seed: TileSeed = seed_rng.random();
        let search_seed: TileSeed = seed_rng.random();

        let searcher = Searcher::with_seed(
            Box::new(HeuristicEvaluator::new(weights)),
            config,
            search_seed,
        );
        let mut player = AutoPlayer::new(searcher);
        let mut session = GameSession::with_seed(*mode, game_seed);

        let started = Instant::now();
        let result = player.play_session(&mut session, *move_limit, |session, outcome| {
            if *verbose {
                eprintln!(
                    "  move {:>5}: {:<5} +{:<6} score {}",
                    session.stats().moves(),
                    outcome.physical,
                    outcome.score_gain,
                    session.score()
                );
            }
            if outcome.reached_win {
                eprintln!("  reached {WINNING_TILE}");
            }
            if *delay_ms > 0 {
                thread::sleep(Duration::from_millis(*delay_ms));
            }
            false
        });
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let record = GameRecord {
            index,
            seed: game_seed,
            search_seed,
            score: result.stats.score(),
            max_tile: result.stats.max_tile(),
            moves: result.stats.moves(),
            merges: result.stats.merges(),
            won: result.won,
            stop_reason: result.stop_reason,
            search_nodes: result.search.nodes,
            elapsed_ms,
        };
        eprintln!(
            "Game {}/{games}: score {}, max tile {}, {} moves, {} ({} ms)",
            index + 1,
            record.score,
            record.max_tile,
            record.moves,
            record.stop_reason,
            record.elapsed_ms
        );
        if *verbose {
            eprintln!("{}", session.grid());
        }
        records.push(record);
    }

    let summary = ReportSummary::from_games(&records);
    eprintln!();
    eprintln!("Summary:");
    eprintln!("  Wins:       {}/{}", summary.wins, summary.games);
    eprintln!("  Best score: {}", summary.best_score);
    if let Some(score) = &summary.score {
        eprintln!("  Mean score: {:.1}", score.mean);
    }
    for (tile, count) in summary.max_tiles.iter() {
        eprintln!("  Max tile {tile:>6}: {count}");
    }

    let report = AutoPlayReport {
        generated_at: Utc::now(),
        mode: *mode,
        search: config,
        weights,
        base_seed,
        games: records,
        summary,
    };
    util::save_json(&report, output.as_deref())?;

    if let Some(path) = output {
        eprintln!("Report saved to {}", path.display());
    }
    Ok(())
}
