// Board simulation following the standard Battlesnake turn resolution:
// https://docs.battlesnake.com/references/rules
//
// Every function here is pure: the input board is never mutated and a new
// board is returned instead, so search can branch freely off any snapshot.

use std::collections::HashSet;

use crate::board::{Board, Snake};
use crate::error::SnapshotError;
use crate::types::{Coord, Direction};

pub const DEFAULT_MAX_HEALTH: i32 = 100;

/// Ruleset parameters the simulation depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rules {
    /// Health a snake is restored to after eating
    pub max_health: i32,
}

impl Default for Rules {
    fn default() -> Self {
        Rules {
            max_health: DEFAULT_MAX_HEALTH,
        }
    }
}

/// One intended move for one snake
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Move {
    pub id: String,
    pub direction: Direction,
}

impl Move {
    pub fn new(id: impl Into<String>, direction: Direction) -> Self {
        Move {
            id: id.into(),
            direction,
        }
    }
}

/// Result of resolving a full simultaneous turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    /// Post-move board with eliminated snakes removed
    pub board: Board,
    /// Ids of the snakes eliminated this turn, in board order
    pub eliminated: Vec<String>,
}

/// New head one step along `direction`, tail dropped, one health spent
fn advance(snake: &Snake, direction: Direction) -> Snake {
    let mut body = Vec::with_capacity(snake.body.len() + 1);
    body.push(direction.apply(&snake.head()));
    body.extend_from_slice(&snake.body[..snake.body.len() - 1]);

    Snake {
        id: snake.id.clone(),
        health: snake.health - 1,
        body,
    }
}

/// Restores health and stacks a new segment on the tail
fn feed(snake: &mut Snake, rules: &Rules) {
    snake.health = rules.max_health;
    let tail = snake.body[snake.body.len() - 1];
    snake.body.push(tail);
}

/// Applies a single snake's move. Other snakes are untouched; the moved snake
/// eats any food its new head lands on.
pub fn apply_move(board: &Board, mv: &Move, rules: &Rules) -> Result<Board, SnapshotError> {
    let index = board.snake_index(&mv.id)?;

    let mut next = board.clone();
    next.snakes[index] = advance(&board.snakes[index], mv.direction);

    let head = next.snakes[index].head();
    if let Some(food_index) = next.food.iter().position(|f| *f == head) {
        next.food.remove(food_index);
        feed(&mut next.snakes[index], rules);
    }

    Ok(next)
}

/// Applies every move against the same prior snapshot. Snakes never see each
/// other's post-move positions; food reached by several heads feeds all of them.
pub fn apply_moves(board: &Board, moves: &[Move], rules: &Rules) -> Result<Board, SnapshotError> {
    let mut seen = HashSet::with_capacity(moves.len());
    let mut indices = Vec::with_capacity(moves.len());
    for mv in moves {
        if !seen.insert(mv.id.as_str()) {
            return Err(SnapshotError::DuplicateMove(mv.id.clone()));
        }
        indices.push((board.snake_index(&mv.id)?, mv.direction));
    }

    let mut next = board.clone();
    for &(index, direction) in &indices {
        next.snakes[index] = advance(&board.snakes[index], direction);
    }

    let mut eaten: HashSet<Coord> = HashSet::new();
    for &(index, _) in &indices {
        let head = next.snakes[index].head();
        if board.food.contains(&head) {
            feed(&mut next.snakes[index], rules);
            eaten.insert(head);
        }
    }
    next.food.retain(|f| !eaten.contains(f));

    Ok(next)
}

fn alive_at(board: &Board, index: usize) -> bool {
    let snake = &board.snakes[index];
    let head = snake.head();

    // Starved
    if snake.health <= 0 {
        return false;
    }

    // Moved out of bounds
    if !board.in_bounds(&head) {
        return false;
    }

    // Collided with itself
    if snake.body.iter().filter(|&&segment| segment == head).count() > 1 {
        return false;
    }

    for (other_index, other) in board.snakes.iter().enumerate() {
        if other_index == index {
            continue;
        }

        if other.head() == head {
            // Head-to-head: only the strictly longer snake survives
            if snake.length() <= other.length() {
                return false;
            }
        } else if other.body[1..].contains(&head) {
            return false;
        }
    }

    true
}

/// Whether the snake with `id` survives on this (post-move) snapshot
pub fn is_alive(board: &Board, id: &str) -> Result<bool, SnapshotError> {
    let index = board.snake_index(id)?;
    Ok(alive_at(board, index))
}

/// Every snake judged against the same snapshot, so the result does not
/// depend on the order snakes are checked in
pub fn eliminated(board: &Board) -> Vec<String> {
    (0..board.snakes.len())
        .filter(|&index| !alive_at(board, index))
        .map(|index| board.snakes[index].id.clone())
        .collect()
}

/// Moves every listed snake simultaneously, then removes the ones that died.
/// Snakes without a move in `moves` keep their position.
pub fn resolve_turn(board: &Board, moves: &[Move], rules: &Rules) -> Result<TurnOutcome, SnapshotError> {
    let mut next = apply_moves(board, moves, rules)?;
    let dead = eliminated(&next);
    next.snakes.retain(|s| !dead.contains(&s.id));

    Ok(TurnOutcome {
        board: next,
        eliminated: dead,
    })
}
