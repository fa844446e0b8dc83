use chrono::{DateTime, Utc};
use oxid2048_ai::{SearchConfig, StopReason};
use oxid2048_engine::{GameMode, TileSeed};
use oxid2048_evaluator::HeuristicWeights;
use oxid2048_stats::{descriptive::DescriptiveStats, percentiles::Percentiles, tally::Tally};
use serde::Serialize;

/// Result of an `auto-play` run
#[derive(Debug, Clone, Serialize)]
pub struct AutoPlayReport {
    /// Timestamp when the report was created (ISO 8601 format)
    pub generated_at: DateTime<Utc>,
    pub mode: GameMode,
    pub search: SearchConfig,
    pub weights: HeuristicWeights,
    /// Seed every per-game seed was derived from
    pub base_seed: TileSeed,
    pub games: Vec<GameRecord>,
    pub summary: ReportSummary,
}

/// Outcome of a single automated game
#[derive(Debug, Clone, Serialize)]
pub struct GameRecord {
    pub index: usize,
    /// Seed of the tile spawner; replaying it with the same moves reproduces the game
    pub seed: TileSeed,
    /// Seed of the search's chance-node sampling
    pub search_seed: TileSeed,
    pub score: u64,
    pub max_tile: u32,
    pub moves: usize,
    pub merges: usize,
    pub won: bool,
    pub stop_reason: StopReason,
    pub search_nodes: u64,
    pub elapsed_ms: u64,
}

/// Aggregate statistics over all games of a run
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub games: usize,
    pub wins: usize,
    pub best_score: u64,
    pub score: Option<DescriptiveStats>,
    pub score_percentiles: Percentiles,
    pub moves: Option<DescriptiveStats>,
    /// Number of games per largest tile reached
    pub max_tiles: Tally<u32>,
}

const SCORE_PERCENTILES: [f64; 5] = [10.0, 25.0, 50.0, 75.0, 90.0];

impl ReportSummary {
    #[expect(clippy::cast_precision_loss)]
    pub fn from_games(games: &[GameRecord]) -> Self {
        let scores = games.iter().map(|g| g.score as f64).collect::<Vec<_>>();
        Self {
            games: games.len(),
            wins: games.iter().filter(|g| g.won).count(),
            best_score: games.iter().map(|g| g.score).max().unwrap_or(0),
            score: DescriptiveStats::new(scores.iter().copied()),
            score_percentiles: Percentiles::new(&scores, &SCORE_PERCENTILES),
            moves: DescriptiveStats::new(games.iter().map(|g| g.moves as f64)),
            max_tiles: games.iter().map(|g| g.max_tile).collect(),
        }
    }
}
