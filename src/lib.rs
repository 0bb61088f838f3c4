// Library exports for the Battlesnake bot
// The server binary, the replay tool and the integration tests all use these

pub mod board;
pub mod bot;
pub mod config;
pub mod debug_logger;
pub mod decision;
pub mod error;
pub mod filters;
pub mod replay;
pub mod search;
pub mod simulation;
pub mod targeting;
pub mod types;
