// Per-turn JSONL log of decisions
//
// Writes happen on spawned tokio tasks so the move response never waits on
// disk. Each line is one `TurnLogEntry`; the replay tool reads them back.

use log::error;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::types::{Board, Direction};

/// One line of the debug log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnLogEntry {
    #[serde(default)]
    pub game_id: String,
    pub turn: i32,
    pub you_id: String,
    pub chosen_move: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub search_depth: u8,
    pub board: Board,
    pub timestamp: String,
}

impl TurnLogEntry {
    pub fn new(
        game_id: &str,
        turn: i32,
        you_id: &str,
        chosen_move: Direction,
        reason: &str,
        search_depth: u8,
        board: Board,
    ) -> Self {
        TurnLogEntry {
            game_id: game_id.to_string(),
            turn,
            you_id: you_id.to_string(),
            chosen_move: chosen_move.as_str().to_string(),
            reason: reason.to_string(),
            search_depth,
            board,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Shared handle to the log file; cloning shares the file
#[derive(Clone)]
pub struct DebugLogger {
    file: Arc<Mutex<Option<File>>>,
    enabled: bool,
}

impl DebugLogger {
    /// Opens (and truncates) the log file when `enabled`. A file that cannot
    /// be created leaves the logger disabled.
    pub async fn new(enabled: bool, log_file_path: &str) -> Self {
        if !enabled {
            return Self::disabled();
        }

        match OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_file_path)
            .await
        {
            Ok(file) => {
                log::info!("Debug logging enabled: {}", log_file_path);
                DebugLogger {
                    file: Arc::new(Mutex::new(Some(file))),
                    enabled: true,
                }
            }
            Err(e) => {
                error!("Failed to create debug log file '{}': {}", log_file_path, e);
                Self::disabled()
            }
        }
    }

    pub fn disabled() -> Self {
        DebugLogger {
            file: Arc::new(Mutex::new(None)),
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Queues `entry` for writing and returns immediately.
    /// Must be called from within a tokio runtime.
    pub fn log_turn(&self, entry: TurnLogEntry) {
        if !self.enabled {
            return;
        }

        let file_handle = self.file.clone();
        tokio::spawn(async move {
            Self::write_entry(file_handle, entry).await;
        });
    }

    async fn write_entry(file_handle: Arc<Mutex<Option<File>>>, entry: TurnLogEntry) {
        let mut file_guard = file_handle.lock().await;

        let file = match file_guard.as_mut() {
            Some(file) => file,
            None => return,
        };

        let line = match serde_json::to_string(&entry) {
            Ok(json) => format!("{}\n", json),
            Err(e) => {
                error!("Failed to serialize debug log entry: {}", e);
                return;
            }
        };

        if let Err(e) = file.write_all(line.as_bytes()).await {
            error!("Failed to write debug log entry: {}", e);
        } else if let Err(e) = file.flush().await {
            error!("Failed to flush debug log: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Battlesnake, Coord};
    use std::time::Duration;

    fn board() -> Board {
        Board {
            height: 7,
            width: 7,
            food: vec![Coord::new(3, 3)],
            snakes: vec![Battlesnake {
                id: "me".to_string(),
                name: "me".to_string(),
                health: 90,
                body: vec![Coord::new(1, 1), Coord::new(1, 0)],
                head: Coord::new(1, 1),
                length: 2,
                latency: String::new(),
                shout: None,
            }],
            hazards: vec![],
        }
    }

    #[test]
    fn test_entry_round_trips_through_json() {
        let entry = TurnLogEntry::new("g1", 4, "me", Direction::Left, "wander", 6, board());
        let line = serde_json::to_string(&entry).unwrap();
        assert!(line.contains("\"chosen_move\":\"left\""));

        let parsed: TurnLogEntry = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed.turn, 4);
        assert_eq!(parsed.you_id, "me");
        assert_eq!(parsed.search_depth, 6);
        assert_eq!(parsed.board, board());
    }

    #[tokio::test]
    async fn test_writes_one_line_per_turn() {
        let path = std::env::temp_dir().join(format!("viper_debug_{}.jsonl", std::process::id()));
        let path_str = path.to_string_lossy().to_string();

        let logger = DebugLogger::new(true, &path_str).await;
        assert!(logger.is_enabled());

        logger.log_turn(TurnLogEntry::new("g1", 0, "me", Direction::Up, "wander", 0, board()));
        logger.log_turn(TurnLogEntry::new("g1", 1, "me", Direction::Up, "wander", 0, board()));

        // Writes are fire-and-forget
        let mut lines = 0;
        for _ in 0..50 {
            tokio::time::sleep(Duration::from_millis(20)).await;
            lines = tokio::fs::read_to_string(&path)
                .await
                .map(|s| s.lines().count())
                .unwrap_or(0);
            if lines == 2 {
                break;
            }
        }
        assert_eq!(lines, 2);

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_disabled_logger_writes_nothing() {
        let logger = DebugLogger::new(false, "never_created.jsonl").await;
        assert!(!logger.is_enabled());
        logger.log_turn(TurnLogEntry::new("g1", 0, "me", Direction::Up, "wander", 0, board()));
        assert!(!std::path::Path::new("never_created.jsonl").exists());
    }
}
