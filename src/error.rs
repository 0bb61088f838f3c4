// Validation errors for board snapshots.
//
// A snapshot that fails these checks cannot be decided on; callers surface
// the error to whoever sent it instead of guessing.

use thiserror::Error;

use crate::types::Coord;

/// Errors raised when a snapshot or a move list breaks the board invariants.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("board dimensions {width}x{height} must be positive")]
    InvalidDimensions { width: i32, height: i32 },
    #[error("snake {id} has an empty body")]
    EmptyBody { id: String },
    #[error("snake {id} reports length {length} but has {body} body segments")]
    LengthMismatch { id: String, length: i32, body: usize },
    #[error("snake {id} head {head} does not match first body segment {first}")]
    HeadMismatch { id: String, head: Coord, first: Coord },
    #[error("snake id {0} appears more than once")]
    DuplicateSnake(String),
    #[error("food at {0} appears more than once")]
    DuplicateFood(Coord),
    #[error("{what} at {coord} lies outside the {width}x{height} board")]
    OutOfBounds {
        what: String,
        coord: Coord,
        width: i32,
        height: i32,
    },
    #[error("no snake with id {0} on the board")]
    UnknownSnake(String),
    #[error("snake {0} was given more than one move this turn")]
    DuplicateMove(String),
}
