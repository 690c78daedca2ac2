//! Lobby report schema
//!
//! When a match ends the server sends one framed request to the lobby:
//! `{"action": "report_game_result", "data": {...}}` and reads back one
//! framed `{"status": ..., "message": ...}` reply.

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;
use crate::protocol::Role;

/// Per-player line of a match report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleResult {
    pub role: Role,
    pub user_id: u64,
    pub score: u32,
    pub lines: u32,
    pub max_combo: u32,
}

/// Aggregated result of one match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResultReport {
    pub room_id: u64,
    /// Winning seat, or null for a draw
    pub winner: Option<Role>,
    pub results: Vec<RoleResult>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "data", rename_all = "snake_case")]
pub enum LobbyRequest {
    ReportGameResult(GameResultReport),
}

impl LobbyRequest {
    pub fn encode(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn decode(json: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LobbyResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl LobbyResponse {
    pub fn decode(json: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}
