// Candidate move filters
//
// Each filter takes the current candidate set by value and returns a subset.
// Filters look only at fixed board facts, never at each other's output, so
// they can run in any order. An empty result is valid and means no safe move
// exists; callers decide what to do about it.

use std::fmt;
use std::iter::FromIterator;

use crate::board::{Board, Snake};
use crate::types::{Coord, Direction};

/// Immutable set of directions, iterated in `Direction::all()` order
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MoveSet(u8);

impl MoveSet {
    pub const fn empty() -> Self {
        MoveSet(0)
    }

    pub const fn all() -> Self {
        MoveSet(0b1111)
    }

    fn bit(direction: Direction) -> u8 {
        1 << direction.index()
    }

    pub fn contains(&self, direction: Direction) -> bool {
        self.0 & Self::bit(direction) != 0
    }

    #[must_use]
    pub fn with(self, direction: Direction) -> Self {
        MoveSet(self.0 | Self::bit(direction))
    }

    #[must_use]
    pub fn without(self, direction: Direction) -> Self {
        MoveSet(self.0 & !Self::bit(direction))
    }

    #[must_use]
    pub fn intersection(self, other: MoveSet) -> Self {
        MoveSet(self.0 & other.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(self) -> impl Iterator<Item = Direction> {
        Direction::all()
            .to_vec()
            .into_iter()
            .filter(move |d| self.contains(*d))
    }

    pub fn to_vec(self) -> Vec<Direction> {
        self.iter().collect()
    }
}

impl FromIterator<Direction> for MoveSet {
    fn from_iter<I: IntoIterator<Item = Direction>>(iter: I) -> Self {
        iter.into_iter().fold(MoveSet::empty(), MoveSet::with)
    }
}

impl fmt::Debug for MoveSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(|d| d.as_str())).finish()
    }
}

/// Direction of the single axis on which `to` differs from `from`, if exactly one does
fn direction_towards(from: Coord, to: Coord) -> Option<Direction> {
    match (to.x - from.x, to.y - from.y) {
        (dx, 0) if dx < 0 => Some(Direction::Left),
        (dx, 0) if dx > 0 => Some(Direction::Right),
        (0, dy) if dy < 0 => Some(Direction::Down),
        (0, dy) if dy > 0 => Some(Direction::Up),
        _ => None,
    }
}

/// Removes the direction pointing back at the neck. A stacked neck
/// (start of game) removes nothing.
pub fn avoid_neck(head: Coord, body: &[Coord], moves: MoveSet) -> MoveSet {
    match body.get(1).and_then(|&neck| direction_towards(head, neck)) {
        Some(back) => moves.without(back),
        None => moves,
    }
}

/// Removes every direction whose neighbour cell is occupied by `body`.
/// The whole body counts, tail included, even though the tail usually
/// moves away on the same turn.
pub fn avoid_body(head: Coord, body: &[Coord], moves: MoveSet) -> MoveSet {
    head.neighbors()
        .iter()
        .filter(|(_, cell)| body.contains(cell))
        .fold(moves, |acc, (dir, _)| acc.without(*dir))
}

/// `avoid_body` against every snake on the board, the mover included
pub fn avoid_bodies(head: Coord, snakes: &[Snake], moves: MoveSet) -> MoveSet {
    snakes
        .iter()
        .fold(moves, |acc, snake| avoid_body(head, snake.body(), acc))
}

/// Removes directions that step off the board. The x and y checks are
/// independent, so a corner loses one direction per axis.
pub fn avoid_edges(head: Coord, width: i32, height: i32, moves: MoveSet) -> MoveSet {
    let mut moves = moves;

    if head.x == 0 {
        moves = moves.without(Direction::Left);
    } else if head.x == width - 1 {
        moves = moves.without(Direction::Right);
    }

    if head.y == 0 {
        moves = moves.without(Direction::Down);
    } else if head.y == height - 1 {
        moves = moves.without(Direction::Up);
    }

    moves
}

/// The full chain for `snake`, starting from all four directions
pub fn safe_moves(board: &Board, snake: &Snake) -> MoveSet {
    let head = snake.head();
    let moves = avoid_neck(head, snake.body(), MoveSet::all());
    let moves = avoid_bodies(head, board.snakes(), moves);
    avoid_edges(head, board.width(), board.height(), moves)
}
