// Validated board snapshots
//
// The wire types in `crate::types` accept whatever the engine sends. Everything
// downstream (filters, simulation, search) works on these types instead, which
// can only be built through constructors that enforce the board invariants.

use std::collections::HashSet;
use std::convert::TryFrom;

use crate::error::SnapshotError;
use crate::types::{self, Coord, GameState};

/// A single competing snake. The body is ordered head first and is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    pub(crate) id: String,
    pub(crate) health: i32,
    pub(crate) body: Vec<Coord>,
}

impl Snake {
    /// Creates a snake from its id, health and head-first body
    pub fn new(id: impl Into<String>, health: i32, body: Vec<Coord>) -> Result<Self, SnapshotError> {
        let id = id.into();
        if body.is_empty() {
            return Err(SnapshotError::EmptyBody { id });
        }
        Ok(Snake { id, health, body })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn body(&self) -> &[Coord] {
        &self.body
    }

    pub fn head(&self) -> Coord {
        self.body[0]
    }

    /// The segment directly behind the head, if the snake has one
    pub fn neck(&self) -> Option<Coord> {
        self.body.get(1).copied()
    }

    pub fn length(&self) -> usize {
        self.body.len()
    }
}

impl TryFrom<&types::Battlesnake> for Snake {
    type Error = SnapshotError;

    fn try_from(wire: &types::Battlesnake) -> Result<Self, Self::Error> {
        let first = *wire.body.first().ok_or_else(|| SnapshotError::EmptyBody {
            id: wire.id.clone(),
        })?;

        if wire.length < 0 || wire.length as usize != wire.body.len() {
            return Err(SnapshotError::LengthMismatch {
                id: wire.id.clone(),
                length: wire.length,
                body: wire.body.len(),
            });
        }

        if wire.head != first {
            return Err(SnapshotError::HeadMismatch {
                id: wire.id.clone(),
                head: wire.head,
                first,
            });
        }

        Snake::new(wire.id.clone(), wire.health, wire.body.clone())
    }
}

/// Immutable board snapshot. Transitions in `crate::simulation` produce new boards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub(crate) width: i32,
    pub(crate) height: i32,
    pub(crate) food: Vec<Coord>,
    pub(crate) snakes: Vec<Snake>,
}

impl Board {
    /// Builds a board, checking dimensions, id uniqueness, food uniqueness and
    /// that every living snake and every food lies on the board.
    pub fn new(
        width: i32,
        height: i32,
        food: Vec<Coord>,
        snakes: Vec<Snake>,
    ) -> Result<Self, SnapshotError> {
        if width <= 0 || height <= 0 {
            return Err(SnapshotError::InvalidDimensions { width, height });
        }

        let board = Board {
            width,
            height,
            food,
            snakes,
        };

        let mut seen_food = HashSet::with_capacity(board.food.len());
        for &coord in &board.food {
            if !seen_food.insert(coord) {
                return Err(SnapshotError::DuplicateFood(coord));
            }
            board.check_bounds("food".to_string(), coord)?;
        }

        let mut seen_ids = HashSet::with_capacity(board.snakes.len());
        for snake in &board.snakes {
            if !seen_ids.insert(snake.id.as_str()) {
                return Err(SnapshotError::DuplicateSnake(snake.id.clone()));
            }
            if snake.health > 0 {
                for &segment in &snake.body {
                    board.check_bounds(format!("snake {}", snake.id), segment)?;
                }
            }
        }

        Ok(board)
    }

    fn check_bounds(&self, what: String, coord: Coord) -> Result<(), SnapshotError> {
        if self.in_bounds(&coord) {
            Ok(())
        } else {
            Err(SnapshotError::OutOfBounds {
                what,
                coord,
                width: self.width,
                height: self.height,
            })
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn food(&self) -> &[Coord] {
        &self.food
    }

    pub fn snakes(&self) -> &[Snake] {
        &self.snakes
    }

    pub fn in_bounds(&self, coord: &Coord) -> bool {
        coord.x >= 0 && coord.y >= 0 && coord.x < self.width && coord.y < self.height
    }

    pub fn snake(&self, id: &str) -> Option<&Snake> {
        self.snakes.iter().find(|s| s.id == id)
    }

    pub(crate) fn snake_index(&self, id: &str) -> Result<usize, SnapshotError> {
        self.snakes
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| SnapshotError::UnknownSnake(id.to_string()))
    }

    /// Every snake except `id`, in board order
    pub fn opponents<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Snake> + 'a {
        self.snakes.iter().filter(move |s| s.id != id)
    }
}

impl TryFrom<&types::Board> for Board {
    type Error = SnapshotError;

    fn try_from(wire: &types::Board) -> Result<Self, Self::Error> {
        let snakes = wire
            .snakes
            .iter()
            .map(Snake::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Board::new(wire.width, wire.height, wire.food.clone(), snakes)
    }
}

/// A validated board together with the snake being controlled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    board: Board,
    you: usize,
}

impl Snapshot {
    pub fn new(board: Board, you: &str) -> Result<Self, SnapshotError> {
        let you = board.snake_index(you)?;
        Ok(Snapshot { board, you })
    }

    /// Validates a request body from the engine
    pub fn from_game_state(state: &GameState) -> Result<Self, SnapshotError> {
        Self::from_wire(&state.board, &state.you.id)
    }

    pub fn from_wire(board: &types::Board, you: &str) -> Result<Self, SnapshotError> {
        Snapshot::new(Board::try_from(board)?, you)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn you(&self) -> &Snake {
        &self.board.snakes[self.you]
    }

    pub fn you_id(&self) -> &str {
        &self.you().id
    }
}
