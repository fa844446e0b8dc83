use oxid2048_engine::{GameSession, GameStats, TurnOutcome};
use serde::{Deserialize, Serialize};

use crate::search::{SearchStats, Searcher};

/// Why an automated game stopped.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// No slide can change the grid.
    #[display("game over")]
    GameOver,
    /// The searcher found no moving direction.
    #[display("no move")]
    NoMove,
    #[display("move limit")]
    MoveLimit,
    /// The caller asked to stop between moves.
    #[display("cancelled")]
    Cancelled,
}

/// Summary of one automated game.
#[derive(Debug, Clone, Serialize)]
pub struct AutoPlayResult {
    pub stop_reason: StopReason,
    pub won: bool,
    pub stats: GameStats,
    /// Search counters accumulated during this game only.
    pub search: SearchStats,
}

/// Drives a [`GameSession`] with a [`Searcher`].
///
/// The searcher reasons about physical slides; the player translates each choice back into the
/// input the session's mode expects, so inverted controls need no special handling in the search.
#[derive(Debug)]
pub struct AutoPlayer<'a> {
    searcher: Searcher<'a>,
}

impl<'a> AutoPlayer<'a> {
    #[must_use]
    pub fn new(searcher: Searcher<'a>) -> Self {
        Self { searcher }
    }

    #[must_use]
    pub fn searcher(&self) -> &Searcher<'a> {
        &self.searcher
    }

    /// Plays until the game ends, the searcher has no move, `move_limit` inputs were applied, or
    /// `should_stop` returns `true`.
    ///
    /// `should_stop` runs after every applied input and receives the session and what the input
    /// did; it is the hook for progress output and pacing.
    ///
    /// # Example
    ///
    /// ```
    /// use oxid2048_ai::{AutoPlayer, SearchConfig, Searcher, StopReason};
    /// use oxid2048_engine::{GameMode, GameSession, TileSeed};
    /// use oxid2048_evaluator::HeuristicEvaluator;
    ///
    /// let seed = TileSeed::from_bytes([7; 16]);
    /// let searcher = Searcher::with_seed(
    ///     Box::new(HeuristicEvaluator::default()),
    ///     SearchConfig { depth: 2, sample_cells: 2 },
    ///     seed,
    /// );
    /// let mut player = AutoPlayer::new(searcher);
    /// let mut session = GameSession::with_seed(GameMode::Classic, seed);
    /// let result = player.play_session(&mut session, Some(20), |_, _| false);
    /// assert!(result.stats.moves() <= 20);
    /// assert!(matches!(result.stop_reason, StopReason::MoveLimit | StopReason::GameOver));
    /// ```
    pub fn play_session<F>(
        &mut self,
        session: &mut GameSession,
        move_limit: Option<usize>,
        mut should_stop: F,
    ) -> AutoPlayResult
    where
        F: FnMut(&GameSession, &TurnOutcome) -> bool,
    {
        let search_before = *self.searcher.stats();
        let mut inputs = 0;

        let stop_reason = loop {
            if session.session_state().is_game_over() {
                break StopReason::GameOver;
            }
            if move_limit.is_some_and(|limit| inputs >= limit) {
                break StopReason::MoveLimit;
            }
            let Some(physical) = self.searcher.choose_direction(session.grid()) else {
                break StopReason::NoMove;
            };
            let outcome = session.play(session.mode().input_for(physical));
            inputs += 1;
            if should_stop(session, &outcome) {
                break StopReason::Cancelled;
            }
        };

        let search_after = *self.searcher.stats();
        AutoPlayResult {
            stop_reason,
            won: session.won(),
            stats: session.stats().clone(),
            search: SearchStats {
                searches: search_after.searches - search_before.searches,
                nodes: search_after.nodes - search_before.nodes,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use oxid2048_engine::{Direction, GameMode, Grid, TileSeed};
    use oxid2048_evaluator::HeuristicEvaluator;

    use super::*;
    use crate::search::SearchConfig;

    fn player(seed: u8) -> AutoPlayer<'static> {
        AutoPlayer::new(Searcher::with_seed(
            Box::new(HeuristicEvaluator::default()),
            SearchConfig {
                depth: 2,
                sample_cells: 2,
            },
            TileSeed::from_bytes([seed; 16]),
        ))
    }

    #[test]
    fn test_plays_until_game_over() {
        let mut session = GameSession::with_seed(GameMode::Classic, TileSeed::from_bytes([1; 16]));
        let result = player(1).play_session(&mut session, None, |_, _| false);
        assert_eq!(result.stop_reason, StopReason::GameOver);
        assert!(session.session_state().is_game_over());
        assert!(result.stats.moves() > 0);
        assert!(result.search.nodes > result.search.searches);
    }

    #[test]
    fn test_move_limit_stops_early() {
        let mut session = GameSession::with_seed(GameMode::Classic, TileSeed::from_bytes([2; 16]));
        let result = player(2).play_session(&mut session, Some(5), |_, _| false);
        assert_eq!(result.stop_reason, StopReason::MoveLimit);
        assert_eq!(result.stats.moves(), 5);
        assert_eq!(result.search.searches, 5);
    }

    #[test]
    fn test_cancellation_is_checked_between_moves() {
        let mut session = GameSession::with_seed(GameMode::Classic, TileSeed::from_bytes([3; 16]));
        let mut seen = 0;
        let result = player(3).play_session(&mut session, None, |_, outcome| {
            assert!(outcome.moved);
            seen += 1;
            seen == 3
        });
        assert_eq!(result.stop_reason, StopReason::Cancelled);
        assert_eq!(seen, 3);
        assert_eq!(result.stats.moves(), 3);
    }

    #[test]
    fn test_reverse_mode_feeds_inverted_input() {
        // Only a physical slide to the left moves this grid.
        let grid: Grid = "0,2,4,8/0,4,8,16/0,8,16,32/0,16,32,64".parse().unwrap();
        let mut session =
            GameSession::from_grid(GameMode::Reverse, grid, TileSeed::from_bytes([4; 16]))
                .unwrap();
        let result = player(4).play_session(&mut session, Some(1), |_, outcome| {
            assert_eq!(outcome.physical, Direction::Left);
            assert!(outcome.moved);
            false
        });
        assert_eq!(result.stats.moves(), 1);
    }

    #[test]
    fn test_finished_game_is_reported_without_searching() {
        let grid: Grid = "2,4,2,4/4,2,4,2/2,4,2,4/4,2,4,2".parse().unwrap();
        let mut session =
            GameSession::from_grid(GameMode::Classic, grid, TileSeed::from_bytes([5; 16]))
                .unwrap();
        let result = player(5).play_session(&mut session, None, |_, _| false);
        assert_eq!(result.stop_reason, StopReason::GameOver);
        assert_eq!(result.search.searches, 0);
    }
}
