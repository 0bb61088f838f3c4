// Food targeting

use crate::filters::MoveSet;
use crate::types::{Coord, Direction};

/// Food closest to `head` by squared euclidean distance.
///
/// Ties go to the lowest x, then the lowest y, so the answer does not depend
/// on the order the engine happened to list the food in.
pub fn closest_food(head: Coord, food: &[Coord]) -> Option<Coord> {
    food.iter()
        .min_by_key(|f| (head.distance_squared(f), f.x, f.y))
        .copied()
}

/// Directions that reduce the distance to `target` on their own axis.
/// Not restricted to any candidate set.
pub fn directions_toward(head: Coord, target: Coord) -> MoveSet {
    let mut toward = MoveSet::empty();

    if head.x > target.x {
        toward = toward.with(Direction::Left);
    } else if head.x < target.x {
        toward = toward.with(Direction::Right);
    }

    if head.y > target.y {
        toward = toward.with(Direction::Down);
    } else if head.y < target.y {
        toward = toward.with(Direction::Up);
    }

    toward
}

/// Candidates that close in on `target`. When there is no target, or none of
/// the candidates gets closer, the candidates come back unchanged.
pub fn moves_toward(head: Coord, target: Option<Coord>, candidates: MoveSet) -> MoveSet {
    let target = match target {
        Some(t) => t,
        None => return candidates,
    };

    let toward = directions_toward(head, target).intersection(candidates);
    if toward.is_empty() {
        candidates
    } else {
        toward
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: i32, y: i32) -> Coord {
        Coord::new(x, y)
    }

    #[test]
    fn test_closest_food_picks_minimum_distance() {
        let food = [c(9, 9), c(2, 3), c(5, 5)];
        assert_eq!(closest_food(c(1, 1), &food), Some(c(2, 3)));
    }

    #[test]
    fn test_closest_food_none_when_board_empty() {
        assert_eq!(closest_food(c(1, 1), &[]), None);
    }

    #[test]
    fn test_closest_food_tie_break_is_order_independent() {
        let a = [c(6, 5), c(4, 5), c(5, 6)];
        let b = [c(5, 6), c(6, 5), c(4, 5)];
        assert_eq!(closest_food(c(5, 5), &a), Some(c(4, 5)));
        assert_eq!(closest_food(c(5, 5), &b), Some(c(4, 5)));
    }

    #[test]
    fn test_moves_toward_diagonal_target() {
        let moves = moves_toward(c(5, 5), Some(c(8, 2)), MoveSet::all());
        assert_eq!(moves.to_vec(), vec![Direction::Right, Direction::Down]);
    }

    #[test]
    fn test_moves_toward_respects_candidates() {
        let candidates = MoveSet::all().without(Direction::Right);
        let moves = moves_toward(c(5, 5), Some(c(8, 2)), candidates);
        assert_eq!(moves.to_vec(), vec![Direction::Down]);
    }

    #[test]
    fn test_moves_toward_falls_back_when_blocked() {
        let candidates = MoveSet::empty().with(Direction::Up).with(Direction::Left);
        let moves = moves_toward(c(5, 5), Some(c(8, 5)), candidates);
        assert_eq!(moves, candidates);
    }

    #[test]
    fn test_moves_toward_without_target() {
        let candidates = MoveSet::empty().with(Direction::Down);
        assert_eq!(moves_toward(c(0, 0), None, candidates), candidates);
    }
}
