// Per-turn decision pipeline: filter chain, then food targeting, then a
// random pick among whatever is left.
//
// The random source is injected so a seeded rng reproduces a game exactly.

use log::debug;
use rand::seq::IndexedRandom;
use rand::Rng;

use crate::board::Snapshot;
use crate::filters::{safe_moves, MoveSet};
use crate::targeting::{closest_food, directions_toward, moves_toward};
use crate::types::{Coord, Direction};

/// Why the pipeline settled on the set it picked from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionReason {
    /// Picked among safe moves that close in on the nearest food
    TowardFood,
    /// No food, or no safe move gets closer; picked among all safe moves
    Wander,
    /// Every direction was filtered out; picked among all four
    NoSafeMove,
}

impl DecisionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionReason::TowardFood => "toward_food",
            DecisionReason::Wander => "wander",
            DecisionReason::NoSafeMove => "no_safe_move",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub direction: Direction,
    /// Directions that survived the filter chain
    pub safe: MoveSet,
    /// The set `direction` was drawn from
    pub pool: MoveSet,
    pub target: Option<Coord>,
    pub reason: DecisionReason,
}

/// Picks uniformly from a non-empty set
fn pick<R: Rng + ?Sized>(set: MoveSet, rng: &mut R) -> Direction {
    set.to_vec()
        .choose(rng)
        .copied()
        .unwrap_or(Direction::Up)
}

/// Runs the pipeline for the snapshot's controlled snake. Always yields a
/// direction; an empty filter result falls back to all four.
pub fn decide<R: Rng + ?Sized>(snapshot: &Snapshot, rng: &mut R) -> Decision {
    let board = snapshot.board();
    let you = snapshot.you();
    let head = you.head();

    let safe = safe_moves(board, you);

    if safe.is_empty() {
        let direction = pick(MoveSet::all(), rng);
        debug!("{}: no safe move, forced pick {}", you.id(), direction);
        return Decision {
            direction,
            safe,
            pool: MoveSet::all(),
            target: None,
            reason: DecisionReason::NoSafeMove,
        };
    }

    let target = closest_food(head, board.food());
    let pool = moves_toward(head, target, safe);
    let closing = target
        .map(|t| !directions_toward(head, t).intersection(safe).is_empty())
        .unwrap_or(false);
    let reason = if closing {
        DecisionReason::TowardFood
    } else {
        DecisionReason::Wander
    };

    let direction = pick(pool, rng);
    debug!(
        "{}: safe {:?}, target {:?}, pool {:?}, picked {}",
        you.id(),
        safe,
        target,
        pool,
        direction
    );

    Decision {
        direction,
        safe,
        pool,
        target,
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, Snake};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn c(x: i32, y: i32) -> Coord {
        Coord::new(x, y)
    }

    fn snapshot(food: Vec<Coord>, snakes: Vec<Snake>, you: &str) -> Snapshot {
        Snapshot::new(Board::new(11, 11, food, snakes).unwrap(), you).unwrap()
    }

    #[test]
    fn test_heads_for_food_when_reachable() {
        let me = Snake::new("me", 50, vec![c(5, 5), c(4, 5), c(3, 5)]).unwrap();
        let snap = snapshot(vec![c(8, 5)], vec![me], "me");

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let decision = decide(&snap, &mut rng);
            assert_eq!(decision.direction, Direction::Right);
            assert_eq!(decision.reason, DecisionReason::TowardFood);
            assert_eq!(decision.target, Some(c(8, 5)));
        }
    }

    #[test]
    fn test_wanders_without_food() {
        let me = Snake::new("me", 50, vec![c(5, 5), c(4, 5), c(3, 5)]).unwrap();
        let snap = snapshot(vec![], vec![me], "me");

        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..20 {
            let decision = decide(&snap, &mut rng);
            assert_eq!(decision.reason, DecisionReason::Wander);
            assert_ne!(decision.direction, Direction::Left);
            assert_eq!(decision.pool, decision.safe);
        }
    }

    #[test]
    fn test_wanders_when_food_is_behind_the_neck() {
        // Food straight behind: the only closing move is the neck
        let me = Snake::new("me", 50, vec![c(5, 5), c(4, 5), c(3, 5)]).unwrap();
        let snap = snapshot(vec![c(1, 5)], vec![me], "me");

        let decision = decide(&snap, &mut StdRng::seed_from_u64(3));
        assert_eq!(decision.reason, DecisionReason::Wander);
        assert_eq!(
            decision.pool.to_vec(),
            vec![Direction::Up, Direction::Right, Direction::Down]
        );
    }

    #[test]
    fn test_forced_loss_still_returns_a_direction() {
        // Boxed in at the corner by its own body and another snake
        let me = Snake::new("me", 50, vec![c(0, 0), c(1, 0), c(1, 1)]).unwrap();
        let other = Snake::new("other", 50, vec![c(0, 1), c(0, 2)]).unwrap();
        let snap = snapshot(vec![c(5, 5)], vec![me, other], "me");

        let decision = decide(&snap, &mut StdRng::seed_from_u64(11));
        assert!(decision.safe.is_empty());
        assert_eq!(decision.reason, DecisionReason::NoSafeMove);
        assert_eq!(decision.pool, MoveSet::all());
    }

    #[test]
    fn test_same_seed_same_choice() {
        let me = Snake::new("me", 50, vec![c(5, 5), c(5, 5), c(5, 5)]).unwrap();
        let snap = snapshot(vec![], vec![me], "me");

        let first: Vec<Direction> = {
            let mut rng = StdRng::seed_from_u64(99);
            (0..10).map(|_| decide(&snap, &mut rng).direction).collect()
        };
        let second: Vec<Direction> = {
            let mut rng = StdRng::seed_from_u64(99);
            (0..10).map(|_| decide(&snap, &mut rng).direction).collect()
        };
        assert_eq!(first, second);
    }
}
