// Welcome to
// __________         __    __  .__                               __
// \______   \_____ _/  |__/  |_|  |   ____   ______ ____ _____  |  | __ ____
//  |    |  _/\__  \\   __\   __\  | _/ __ \ /  ___//    \\__  \ |  |/ // __ \
//  |    |   \ / __ \|  |  |  | |  |_\  ___/ \___ \|   |  \/ __ \|    <\  ___/
//  |________/(______/__|  |__| |____/\_____>______>___|__(______/__|__\\_____>
//
// The bot ties the pieces together for each request: validate the snapshot,
// get a baseline answer from the decision pipeline, then let the look-ahead
// search improve on it for as long as the time budget allows.

use log::{debug, info, warn};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::board::{Board, Snapshot};
use crate::config::Config;
use crate::debug_logger::{DebugLogger, TurnLogEntry};
use crate::decision::{decide, Decision};
use crate::error::SnapshotError;
use crate::search::{iterative_deepening, SearchReport};
use crate::types::{self, Direction, GameState, MoveResponse};

/// Best answer known for the turn in progress
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestMove {
    pub direction: Direction,
    /// Search score; `None` while only the baseline decision is known
    pub score: Option<f64>,
    /// Deepest completed search depth, 0 for the baseline
    pub depth: u8,
}

/// State shared between the request poller and the blocking search task
#[derive(Debug)]
pub(crate) struct SharedSearchState {
    best: Mutex<BestMove>,
    search_complete: AtomicBool,
}

impl SharedSearchState {
    pub(crate) fn new(baseline: Direction) -> Self {
        SharedSearchState {
            best: Mutex::new(BestMove {
                direction: baseline,
                score: None,
                depth: 0,
            }),
            search_complete: AtomicBool::new(false),
        }
    }

    /// Completed depths always supersede what came before
    pub(crate) fn record(&self, report: &SearchReport) {
        *self.best.lock() = BestMove {
            direction: report.direction,
            score: Some(report.score),
            depth: report.depth,
        };
    }

    pub(crate) fn best(&self) -> BestMove {
        *self.best.lock()
    }

    pub(crate) fn mark_complete(&self) {
        self.search_complete.store(true, Ordering::Release);
    }

    pub(crate) fn is_complete(&self) -> bool {
        self.search_complete.load(Ordering::Acquire)
    }
}

/// Everything known about one computed turn
#[derive(Debug, Clone)]
pub struct TurnReport {
    pub direction: Direction,
    pub decision: Decision,
    pub search: Option<SearchReport>,
    pub elapsed: Duration,
}

/// Battlesnake bot; one instance serves every game
pub struct Bot {
    config: Config,
    debug_logger: DebugLogger,
}

impl Bot {
    pub fn new(config: Config) -> Self {
        Bot {
            config,
            debug_logger: DebugLogger::disabled(),
        }
    }

    pub fn with_debug_logger(mut self, debug_logger: DebugLogger) -> Self {
        self.debug_logger = debug_logger;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Metadata and appearance for GET /
    pub fn info(&self) -> Value {
        info!("INFO");

        json!({
            "apiversion": "1",
            "author": "viper-snake",
            "color": "#3E7C17",
            "head": "tongue",
            "tail": "sharp",
        })
    }

    pub fn start(&self, state: &GameState) {
        info!(
            "GAME START {}: {}x{} board, {} snakes",
            state.game.id,
            state.board.width,
            state.board.height,
            state.board.snakes.len()
        );
    }

    pub fn end(&self, state: &GameState) {
        let survived = state.board.snakes.iter().any(|s| s.id == state.you.id);
        info!(
            "GAME OVER {} at turn {} ({})",
            state.game.id,
            state.turn,
            if survived { "still on the board" } else { "eliminated" }
        );
    }

    /// Per-turn random source: reproducible when a seed is configured
    fn rng(&self, turn: i32) -> StdRng {
        match self.config.decision.seed {
            Some(seed) => StdRng::seed_from_u64(seed ^ turn as u64),
            None => StdRng::from_os_rng(),
        }
    }

    fn deadline(&self, start_time: Instant) -> Instant {
        start_time + Duration::from_millis(self.config.timing.effective_budget_ms())
    }

    /// Runs the search to completion or deadline, publishing each depth
    fn search_internal(
        board: &Board,
        you: &str,
        config: &Config,
        baseline: Direction,
        deadline: Instant,
        shared: &SharedSearchState,
    ) -> Option<SearchReport> {
        let report = iterative_deepening(board, you, config, baseline, deadline, |report| {
            shared.record(report)
        });
        shared.mark_complete();
        report
    }

    /// Computes the move for POST /move.
    ///
    /// The decision pipeline answers first; the search then runs on a
    /// blocking task and the poller takes whatever it has published when the
    /// budget runs out. A snapshot that fails validation is returned as an
    /// error for the handler to reject.
    pub async fn get_move(&self, state: &GameState) -> Result<MoveResponse, SnapshotError> {
        let start_time = Instant::now();
        let snapshot = Snapshot::from_game_state(state)?;

        let decision = decide(&snapshot, &mut self.rng(state.turn));
        let shared = Arc::new(SharedSearchState::new(decision.direction));

        if self.config.search.enabled {
            let shared_clone = shared.clone();
            let board = snapshot.board().clone();
            let you = snapshot.you_id().to_string();
            let config = self.config.clone();
            let baseline = decision.direction;
            let deadline = self.deadline(start_time);

            tokio::task::spawn_blocking(move || {
                Bot::search_internal(&board, &you, &config, baseline, deadline, &shared_clone)
            });

            let polling_interval = Duration::from_millis(self.config.timing.polling_interval_ms);
            loop {
                tokio::time::sleep(polling_interval).await;

                if Instant::now() >= deadline || shared.is_complete() {
                    break;
                }
            }

            if !shared.is_complete() {
                debug!("Turn {}: budget spent before search finished", state.turn);
            }
        }

        let best = shared.best();
        info!(
            "Game {} turn {}: chose {} (reason: {}, score: {:?}, depth: {}, time: {}ms)",
            state.game.id,
            state.turn,
            best.direction,
            decision.reason.as_str(),
            best.score,
            best.depth,
            start_time.elapsed().as_millis()
        );

        self.debug_logger.log_turn(TurnLogEntry::new(
            &state.game.id,
            state.turn,
            &state.you.id,
            best.direction,
            decision.reason.as_str(),
            best.depth,
            state.board.clone(),
        ));

        Ok(MoveResponse {
            direction: best.direction,
            shout: None,
        })
    }

    /// Synchronous counterpart of `get_move` for offline tools. Searches on
    /// the calling thread within the same time budget.
    pub fn compute_move(
        &self,
        board: &types::Board,
        you: &str,
        turn: i32,
    ) -> Result<TurnReport, SnapshotError> {
        let start_time = Instant::now();
        let snapshot = Snapshot::from_wire(board, you)?;
        let decision = decide(&snapshot, &mut self.rng(turn));

        let search = if self.config.search.enabled {
            let shared = SharedSearchState::new(decision.direction);
            Bot::search_internal(
                snapshot.board(),
                snapshot.you_id(),
                &self.config,
                decision.direction,
                self.deadline(start_time),
                &shared,
            )
        } else {
            None
        };

        if search.is_none() && self.config.search.enabled {
            warn!("Turn {}: no search depth completed, using the baseline", turn);
        }

        Ok(TurnReport {
            direction: search.as_ref().map_or(decision.direction, |r| r.direction),
            decision,
            search,
            elapsed: start_time.elapsed(),
        })
    }
}
