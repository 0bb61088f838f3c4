// Integration tests for the per-turn decision pipeline
//
// Boards come in as wire JSON, go through snapshot validation, and then
// through the filter chain, targeting and the seeded random pick.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;

use viper_snake::board::Snapshot;
use viper_snake::decision::{decide, DecisionReason};
use viper_snake::filters::{avoid_body, avoid_edges, avoid_neck, MoveSet};
use viper_snake::types::{Coord, Direction, GameState};

fn game_state(board: serde_json::Value, you: serde_json::Value) -> GameState {
    serde_json::from_value(json!({
        "game": { "id": "pipeline-test", "timeout": 500 },
        "turn": 3,
        "board": board,
        "you": you,
    }))
    .expect("valid game state json")
}

fn snake_json(id: &str, health: i32, body: &[(i32, i32)]) -> serde_json::Value {
    let body: Vec<_> = body.iter().map(|&(x, y)| json!({ "x": x, "y": y })).collect();
    json!({
        "id": id,
        "name": id,
        "health": health,
        "body": body,
        "head": body[0],
        "length": body.len(),
    })
}

#[test]
fn test_start_position_keeps_every_direction() {
    let head = Coord::new(5, 5);
    let body = [head, head, head];

    assert_eq!(avoid_neck(head, &body, MoveSet::all()), MoveSet::all());
    assert_eq!(avoid_body(head, &body, MoveSet::all()), MoveSet::all());
}

#[test]
fn test_neck_to_the_left_removes_left() {
    let head = Coord::new(5, 5);
    let body = [head, Coord::new(4, 5), Coord::new(3, 5)];

    assert_eq!(
        avoid_neck(head, &body, MoveSet::all()).to_vec(),
        vec![Direction::Up, Direction::Right, Direction::Down]
    );
}

#[test]
fn test_corner_removes_left_and_down() {
    for &(w, h) in [(1, 1), (2, 2), (11, 11), (19, 7)].iter() {
        let moves = avoid_edges(Coord::new(0, 0), w, h, MoveSet::all());
        assert!(!moves.contains(Direction::Left));
        assert!(!moves.contains(Direction::Down));
    }
    assert_eq!(
        avoid_edges(Coord::new(0, 0), 11, 11, MoveSet::all()).to_vec(),
        vec![Direction::Up, Direction::Right]
    );
}

#[test]
fn test_pipeline_heads_for_food_past_an_opponent() {
    let me = snake_json("me", 40, &[(2, 2), (2, 1), (2, 0)]);
    let other = snake_json("other", 90, &[(3, 2), (4, 2), (5, 2)]);
    let state = game_state(
        json!({
            "width": 11,
            "height": 11,
            "food": [{ "x": 6, "y": 6 }],
            "snakes": [me.clone(), other],
        }),
        me,
    );

    let snapshot = Snapshot::from_game_state(&state).unwrap();
    let mut rng = StdRng::seed_from_u64(5);
    let decision = decide(&snapshot, &mut rng);

    // Right is blocked by the other snake, Down by the neck
    assert_eq!(decision.safe.to_vec(), vec![Direction::Up, Direction::Left]);
    assert_eq!(decision.direction, Direction::Up);
    assert_eq!(decision.reason, DecisionReason::TowardFood);
    assert_eq!(decision.target, Some(Coord::new(6, 6)));
}

#[test]
fn test_pipeline_boxed_in_falls_back_to_all_four() {
    let me = snake_json("me", 40, &[(0, 10), (0, 9), (1, 9), (1, 10)]);
    let state = game_state(
        json!({
            "width": 11,
            "height": 11,
            "food": [],
            "snakes": [me.clone()],
        }),
        me,
    );

    let snapshot = Snapshot::from_game_state(&state).unwrap();
    let decision = decide(&snapshot, &mut StdRng::seed_from_u64(0));

    assert!(decision.safe.is_empty());
    assert_eq!(decision.reason, DecisionReason::NoSafeMove);
    assert!(Direction::all().contains(&decision.direction));
}

#[test]
fn test_seeded_games_repeat_exactly() {
    let me = snake_json("me", 40, &[(5, 5), (5, 5), (5, 5)]);
    let state = game_state(
        json!({ "width": 11, "height": 11, "food": [], "snakes": [me.clone()] }),
        me,
    );
    let snapshot = Snapshot::from_game_state(&state).unwrap();

    let run = |seed: u64| -> Vec<Direction> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..25).map(|_| decide(&snapshot, &mut rng).direction).collect()
    };

    assert_eq!(run(2024), run(2024));
}

#[test]
fn test_unknown_you_is_rejected() {
    let me = snake_json("me", 40, &[(5, 5), (5, 4)]);
    let ghost = snake_json("ghost", 40, &[(1, 1), (1, 0)]);
    let state = game_state(
        json!({ "width": 11, "height": 11, "food": [], "snakes": [me] }),
        ghost,
    );

    assert!(Snapshot::from_game_state(&state).is_err());
}
