// HTTP handler bindings for Battlesnake API endpoints
//
// Thin wrappers that bind Rocket routes to the Bot. Handlers deserialize the
// request, pull the Bot out of managed state, delegate, and serialize the
// answer. A snapshot the Bot rejects becomes a 400 with the reason.

use rocket::http::Status;
use rocket::response::status::BadRequest;
use rocket::serde::json::Json;
use serde_json::Value;

use viper_snake::bot::Bot;
use viper_snake::types::{GameState, MoveResponse};

/// GET /
#[get("/")]
pub fn index(bot: &rocket::State<Bot>) -> Json<Value> {
    Json(bot.info())
}

/// POST /start
#[post("/start", format = "json", data = "<start_req>")]
pub fn start(bot: &rocket::State<Bot>, start_req: Json<GameState>) -> Status {
    bot.start(&start_req);

    Status::Ok
}

/// POST /move
#[post("/move", format = "json", data = "<move_req>")]
pub async fn get_move(
    bot: &rocket::State<Bot>,
    move_req: Json<GameState>,
) -> Result<Json<MoveResponse>, BadRequest<String>> {
    bot.get_move(&move_req).await.map(Json).map_err(|e| {
        log::warn!("Rejected turn {} of game {}: {}", move_req.turn, move_req.game.id, e);
        BadRequest(e.to_string())
    })
}

/// POST /end
#[post("/end", format = "json", data = "<end_req>")]
pub fn end(bot: &rocket::State<Bot>, end_req: Json<GameState>) -> Status {
    bot.end(&end_req);

    Status::Ok
}
