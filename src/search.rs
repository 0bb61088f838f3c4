// Look-ahead search over simulated futures
//
// Paranoid minimax with alpha-beta: on our ply we pick a direction, on the
// reply ply every live opponent picks jointly to hurt us, then the round is
// resolved with the simultaneous simulation. Depth counts plies.
//
// The search is anytime: `iterative_deepening` reports each completed depth
// and throws away a depth that the deadline cut short.

use log::{debug, info};
use rayon::prelude::*;
use std::collections::VecDeque;
use std::f64::{INFINITY, NEG_INFINITY};
use std::time::{Duration, Instant};

use crate::board::{Board, Snake};
use crate::config::{Config, EvaluationWeights};
use crate::filters::{safe_moves, MoveSet};
use crate::simulation::{is_alive, resolve_turn, Move, Rules};
use crate::types::{Coord, Direction};

/// Result of one completed search depth
#[derive(Debug, Clone, PartialEq)]
pub struct SearchReport {
    pub direction: Direction,
    pub score: f64,
    pub depth: u8,
    pub nodes: u64,
    pub elapsed: Duration,
}

/// Number of free cells reachable from `from`, stopping at `cap`.
/// Every body segment on the board counts as a wall.
pub fn reachable_cells(board: &Board, from: Coord, cap: usize) -> usize {
    if !board.in_bounds(&from) {
        return 0;
    }

    let width = board.width() as usize;
    let index = |c: &Coord| c.y as usize * width + c.x as usize;

    let mut visited = vec![false; width * board.height() as usize];
    for snake in board.snakes() {
        for segment in snake.body().iter().filter(|s| board.in_bounds(s)) {
            visited[index(segment)] = true;
        }
    }
    visited[index(&from)] = true;

    let mut queue = VecDeque::new();
    queue.push_back(from);
    let mut count = 0;

    while let Some(cell) = queue.pop_front() {
        for (_, next) in cell.neighbors().iter() {
            if count >= cap {
                return cap;
            }
            if board.in_bounds(next) && !visited[index(next)] {
                visited[index(next)] = true;
                count += 1;
                queue.push_back(*next);
            }
        }
    }

    count
}

/// Heuristic value of `board` for the snake `id`.
///
/// `-inf` when the snake is missing or eliminated; otherwise a finite score
/// combining survival, health, length and reachable space.
pub fn evaluate(board: &Board, id: &str, weights: &EvaluationWeights, rules: &Rules) -> f64 {
    let snake = match board.snake(id) {
        Some(s) => s,
        None => return NEG_INFINITY,
    };
    if !is_alive(board, id).unwrap_or(false) {
        return NEG_INFINITY;
    }

    let health = f64::from(snake.health()) / f64::from(rules.max_health.max(1));
    let space = reachable_cells(board, snake.head(), weights.space_cap);

    weights.survival_bonus
        + weights.weight_health * health
        + weights.weight_length * snake.length() as f64
        + weights.weight_space * space as f64
}

/// Directions considered for a snake: the filter chain's output, or all four
/// when nothing is safe
fn candidates(board: &Board, snake: &Snake) -> MoveSet {
    let safe = safe_moves(board, snake);
    if safe.is_empty() {
        MoveSet::all()
    } else {
        safe
    }
}

/// Depth-limited adversarial search for one snake
pub struct Searcher<'a> {
    id: &'a str,
    rules: Rules,
    weights: &'a EvaluationWeights,
    /// Whether the game had opponents at the root; only then is outliving
    /// them a win
    contested: bool,
    deadline: Option<Instant>,
    nodes: u64,
}

impl<'a> Searcher<'a> {
    pub fn new(id: &'a str, rules: Rules, weights: &'a EvaluationWeights, contested: bool) -> Self {
        Searcher {
            id,
            rules,
            weights,
            contested,
            deadline: None,
            nodes: 0,
        }
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    fn expired(&self) -> bool {
        self.deadline.map_or(false, |d| Instant::now() >= d)
    }

    /// Scores `board` looking `depth` plies ahead. With `maximizing` false the
    /// opponents move first and the round resolves without a move of ours.
    /// Returns `None` if the deadline passes before the search finishes.
    pub fn search(&mut self, board: &Board, depth: u8, maximizing: bool) -> Option<f64> {
        if maximizing {
            self.max_ply(board, depth, NEG_INFINITY, INFINITY)
        } else {
            self.min_ply(board, None, depth, NEG_INFINITY, INFINITY)
        }
    }

    fn terminal(&self, board: &Board, depth: u8) -> Option<f64> {
        if board.snake(self.id).is_none() {
            return Some(NEG_INFINITY);
        }
        if self.contested && board.opponents(self.id).next().is_none() {
            return Some(INFINITY);
        }
        if depth == 0 {
            return Some(evaluate(board, self.id, self.weights, &self.rules));
        }
        None
    }

    fn max_ply(&mut self, board: &Board, depth: u8, mut alpha: f64, beta: f64) -> Option<f64> {
        if self.expired() {
            return None;
        }
        self.nodes += 1;

        if let Some(score) = self.terminal(board, depth) {
            return Some(score);
        }

        let me = board.snake(self.id)?;
        let mut best = NEG_INFINITY;
        for direction in candidates(board, me).iter() {
            let own = Move::new(self.id, direction);
            let score = self.min_ply(board, Some(&own), depth - 1, alpha, beta)?;
            best = best.max(score);
            alpha = alpha.max(best);
            if alpha >= beta {
                break;
            }
        }

        Some(best)
    }

    /// Every joint reply of the live opponents, in board order
    fn replies(&self, board: &Board) -> Vec<Vec<Move>> {
        let mut joints: Vec<Vec<Move>> = vec![Vec::new()];

        for opponent in board.opponents(self.id) {
            let options = candidates(board, opponent);
            let mut expanded = Vec::with_capacity(joints.len() * options.len());
            for joint in &joints {
                for direction in options.iter() {
                    let mut next = joint.clone();
                    next.push(Move::new(opponent.id(), direction));
                    expanded.push(next);
                }
            }
            joints = expanded;
        }

        joints
    }

    fn min_ply(
        &mut self,
        board: &Board,
        own: Option<&Move>,
        depth: u8,
        alpha: f64,
        mut beta: f64,
    ) -> Option<f64> {
        if self.expired() {
            return None;
        }
        self.nodes += 1;

        let mut best = INFINITY;
        for joint in self.replies(board) {
            let moves: Vec<Move> = own.cloned().into_iter().chain(joint).collect();
            // Ids all come from `board`, so resolution cannot fail here
            let outcome = resolve_turn(board, &moves, &self.rules).ok()?;
            let score = self.max_ply(&outcome.board, depth.saturating_sub(1), alpha, beta)?;
            best = best.min(score);
            beta = beta.min(best);
            if alpha >= beta {
                break;
            }
        }

        Some(best)
    }
}

/// Highest score wins; ties go to `preferred`, then to the first direction
fn pick_best(scored: &[(Direction, f64)], preferred: Direction) -> Option<(Direction, f64)> {
    let top = scored
        .iter()
        .map(|&(_, s)| s)
        .fold(NEG_INFINITY, f64::max);

    scored
        .iter()
        .find(|&&(d, s)| d == preferred && s == top)
        .or_else(|| scored.iter().find(|&&(_, s)| s == top))
        .copied()
}

/// Deepens two plies at a time until `max_depth`, the deadline, or a decided
/// outcome. `on_depth` sees every completed depth. Returns the deepest
/// completed report, or `None` if not even the first depth finished.
pub fn iterative_deepening<F>(
    board: &Board,
    id: &str,
    config: &Config,
    preferred: Direction,
    deadline: Instant,
    mut on_depth: F,
) -> Option<SearchReport>
where
    F: FnMut(&SearchReport),
{
    let me = board.snake(id)?;
    let roots = candidates(board, me).to_vec();
    let contested = board.opponents(id).next().is_some();
    let rules = config.game_rules.rules();
    let weights = &config.evaluation;
    let min_remaining = Duration::from_millis(config.timing.min_time_remaining_ms);

    let mut best: Option<SearchReport> = None;
    let mut depth = config.search.initial_depth.max(1);

    while depth <= config.search.max_depth {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining < min_remaining {
            info!(
                "Stopping search: insufficient time remaining ({}ms)",
                remaining.as_millis()
            );
            break;
        }

        let started = Instant::now();
        let scored: Option<Vec<(Direction, f64, u64)>> = roots
            .par_iter()
            .map(|&direction| {
                let mut searcher = Searcher::new(id, rules, weights, contested).with_deadline(deadline);
                let own = Move::new(id, direction);
                let score = searcher.min_ply(board, Some(&own), depth - 1, NEG_INFINITY, INFINITY)?;
                Some((direction, score, searcher.nodes()))
            })
            .collect::<Vec<_>>()
            .into_iter()
            .collect();

        let scored = match scored {
            Some(scored) => scored,
            None => {
                debug!("Depth {} truncated by deadline, keeping depth {:?}", depth, best.as_ref().map(|r| r.depth));
                break;
            }
        };

        let nodes = scored.iter().map(|&(_, _, n)| n).sum();
        let pairs: Vec<(Direction, f64)> = scored.iter().map(|&(d, s, _)| (d, s)).collect();
        let (direction, score) = match pick_best(&pairs, preferred) {
            Some(found) => found,
            None => break,
        };

        let report = SearchReport {
            direction,
            score,
            depth,
            nodes,
            elapsed: started.elapsed(),
        };
        debug!("Depth {} complete: {:?}", depth, report);
        on_depth(&report);
        best = Some(report);

        if score.is_infinite() {
            info!("Search decided at depth {} (score {})", depth, score);
            break;
        }

        depth = match depth.checked_add(2) {
            Some(next) => next,
            None => break,
        };
    }

    best
}
