//! Protocol module - JSON message envelope for match connections
//!
//! Every message is a JSON object with a `type` discriminator:
//! HELLO (client -> server), WELCOME, SNAPSHOT and GAME_OVER (server -> client)
//! and INPUT (player -> server). Field names are camelCase on the wire.

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;
use crate::types::{GameAction, PieceKind};

/// Protocol version sent in HELLO
pub const PROTOCOL_VERSION: u32 = 1;

/// The only bag rule the server implements
pub const BAG_RULE_7BAG: &str = "7bag";

/// Seat assigned by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    P1,
    P2,
    #[serde(rename = "SPECTATOR")]
    Spectator,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::P1 => "P1",
            Role::P2 => "P2",
            Role::Spectator => "SPECTATOR",
        }
    }

    /// Player seat index (P1 = 0, P2 = 1)
    pub fn seat(&self) -> Option<usize> {
        match self {
            Role::P1 => Some(0),
            Role::P2 => Some(1),
            Role::Spectator => None,
        }
    }

    pub fn from_seat(seat: usize) -> Option<Self> {
        match seat {
            0 => Some(Role::P1),
            1 => Some(Role::P2),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Piece kind as sent on the wire ("I", "O", ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeName {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl From<PieceKind> for ShapeName {
    fn from(value: PieceKind) -> Self {
        match value {
            PieceKind::I => ShapeName::I,
            PieceKind::O => ShapeName::O,
            PieceKind::T => ShapeName::T,
            PieceKind::S => ShapeName::S,
            PieceKind::Z => ShapeName::Z,
            PieceKind::J => ShapeName::J,
            PieceKind::L => ShapeName::L,
        }
    }
}

impl From<ShapeName> for PieceKind {
    fn from(value: ShapeName) -> Self {
        match value {
            ShapeName::I => PieceKind::I,
            ShapeName::O => PieceKind::O,
            ShapeName::T => PieceKind::T,
            ShapeName::S => PieceKind::S,
            ShapeName::Z => PieceKind::Z,
            ShapeName::J => PieceKind::J,
            ShapeName::L => PieceKind::L,
        }
    }
}

/// Action as sent in INPUT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionName {
    Left,
    Right,
    Down,
    Cw,
    Ccw,
    HardDrop,
    Hold,
}

impl From<ActionName> for GameAction {
    fn from(value: ActionName) -> Self {
        match value {
            ActionName::Left => GameAction::MoveLeft,
            ActionName::Right => GameAction::MoveRight,
            ActionName::Down => GameAction::SoftDrop,
            ActionName::Cw => GameAction::RotateCw,
            ActionName::Ccw => GameAction::RotateCcw,
            ActionName::HardDrop => GameAction::HardDrop,
            ActionName::Hold => GameAction::Hold,
        }
    }
}

impl From<GameAction> for ActionName {
    fn from(value: GameAction) -> Self {
        match value {
            GameAction::MoveLeft => ActionName::Left,
            GameAction::MoveRight => ActionName::Right,
            GameAction::SoftDrop => ActionName::Down,
            GameAction::RotateCw => ActionName::Cw,
            GameAction::RotateCcw => ActionName::Ccw,
            GameAction::HardDrop => ActionName::HardDrop,
            GameAction::Hold => ActionName::Hold,
        }
    }
}

// ============== Client -> Server Messages ==============

/// First message on every connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelloMessage {
    #[serde(default = "default_version")]
    pub version: u32,
    pub room_id: u64,
    pub user_id: u64,
    #[serde(default)]
    pub spectator: bool,
}

fn default_version() -> u32 {
    PROTOCOL_VERSION
}

/// One player action, sequenced by the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputMessage {
    pub user_id: u64,
    pub seq: u64,
    #[serde(default)]
    pub ts: u64,
    pub action: ActionName,
}

// ============== Server -> Client Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GravityMode {
    Fixed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GravityPlan {
    pub mode: GravityMode,
    pub drop_ms: u64,
}

/// Handshake reply carrying the assigned role and match parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WelcomeMessage {
    pub role: Role,
    pub seed: u32,
    pub bag_rule: String,
    pub gravity_plan: GravityPlan,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePiece {
    /// Null once the board has topped out
    pub shape: Option<ShapeName>,
    pub x: i32,
    pub y: i32,
    pub rot: u8,
}

/// Periodic state of one player's board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMessage {
    pub tick: u64,
    pub user_id: u64,
    pub role: Role,
    #[serde(rename = "boardRLE")]
    pub board_rle: String,
    pub active: ActivePiece,
    pub hold: Option<ShapeName>,
    pub next: Vec<ShapeName>,
    pub score: u32,
    pub lines: u32,
    pub level: u32,
    pub game_over: bool,
    pub at: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerResult {
    pub user_id: u64,
    pub score: u32,
    pub lines: u32,
    pub max_combo: u32,
}

/// Final message of a match; `winner` is a user id, or null for a draw
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOverMessage {
    pub winner: Option<u64>,
    pub results: Vec<PlayerResult>,
}

/// Message envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Message {
    #[serde(rename = "HELLO")]
    Hello(HelloMessage),
    #[serde(rename = "WELCOME")]
    Welcome(WelcomeMessage),
    #[serde(rename = "INPUT")]
    Input(InputMessage),
    #[serde(rename = "SNAPSHOT")]
    Snapshot(SnapshotMessage),
    #[serde(rename = "GAME_OVER")]
    GameOver(GameOverMessage),
}

impl Message {
    /// Parse one JSON payload
    pub fn decode(json: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to a JSON payload
    pub fn encode(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Wire name of the message type
    pub fn kind(&self) -> &'static str {
        match self {
            Message::Hello(_) => "HELLO",
            Message::Welcome(_) => "WELCOME",
            Message::Input(_) => "INPUT",
            Message::Snapshot(_) => "SNAPSHOT",
            Message::GameOver(_) => "GAME_OVER",
        }
    }
}

// ============== Builders ==============

pub fn create_hello(room_id: u64, user_id: u64) -> Message {
    Message::Hello(HelloMessage {
        version: PROTOCOL_VERSION,
        room_id,
        user_id,
        spectator: false,
    })
}

pub fn create_spectator_hello(room_id: u64, user_id: u64) -> Message {
    Message::Hello(HelloMessage {
        version: PROTOCOL_VERSION,
        room_id,
        user_id,
        spectator: true,
    })
}

pub fn create_welcome(role: Role, seed: u32, drop_ms: u64) -> Message {
    Message::Welcome(WelcomeMessage {
        role,
        seed,
        bag_rule: BAG_RULE_7BAG.to_string(),
        gravity_plan: GravityPlan {
            mode: GravityMode::Fixed,
            drop_ms,
        },
    })
}

pub fn create_input(user_id: u64, seq: u64, action: GameAction) -> Message {
    Message::Input(InputMessage {
        user_id,
        seq,
        ts: current_timestamp_ms(),
        action: action.into(),
    })
}

pub fn create_game_over(winner: Option<u64>, results: Vec<PlayerResult>) -> Message {
    Message::GameOver(GameOverMessage { winner, results })
}

/// Milliseconds since the Unix epoch
pub fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hello() {
        let json = r#"{"type":"HELLO","version":1,"roomId":42,"userId":7}"#;
        let msg = Message::decode(json).unwrap();
        assert_eq!(
            msg,
            Message::Hello(HelloMessage {
                version: 1,
                room_id: 42,
                user_id: 7,
                spectator: false,
            })
        );
    }

    #[test]
    fn test_parse_spectator_hello_without_version() {
        let json = r#"{"type":"HELLO","roomId":42,"userId":9,"spectator":true}"#;
        match Message::decode(json).unwrap() {
            Message::Hello(hello) => {
                assert!(hello.spectator);
                assert_eq!(hello.version, PROTOCOL_VERSION);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_input_actions() {
        for (name, action) in [
            ("LEFT", GameAction::MoveLeft),
            ("RIGHT", GameAction::MoveRight),
            ("DOWN", GameAction::SoftDrop),
            ("CW", GameAction::RotateCw),
            ("CCW", GameAction::RotateCcw),
            ("HARD_DROP", GameAction::HardDrop),
            ("HOLD", GameAction::Hold),
        ] {
            let json = format!(
                r#"{{"type":"INPUT","userId":1,"seq":3,"ts":10,"action":"{}"}}"#,
                name
            );
            match Message::decode(&json).unwrap() {
                Message::Input(input) => {
                    assert_eq!(input.seq, 3);
                    assert_eq!(GameAction::from(input.action), action);
                }
                other => panic!("unexpected {:?}", other),
            }
        }
    }

    #[test]
    fn test_unknown_type_and_action_are_errors() {
        assert!(matches!(
            Message::decode(r#"{"type":"PING"}"#),
            Err(ProtocolError::Json(_))
        ));
        assert!(matches!(
            Message::decode(r#"{"type":"INPUT","userId":1,"seq":1,"action":"JUMP"}"#),
            Err(ProtocolError::Json(_))
        ));
        assert!(matches!(Message::decode("not json"), Err(ProtocolError::Json(_))));
    }

    #[test]
    fn test_create_welcome_wire_shape() {
        let text = create_welcome(Role::P2, 1234, 500).encode().unwrap();
        let v: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(v["type"], "WELCOME");
        assert_eq!(v["role"], "P2");
        assert_eq!(v["seed"], 1234);
        assert_eq!(v["bagRule"], "7bag");
        assert_eq!(v["gravityPlan"]["mode"], "fixed");
        assert_eq!(v["gravityPlan"]["dropMs"], 500);
    }

    #[test]
    fn test_snapshot_wire_shape() {
        let msg = Message::Snapshot(SnapshotMessage {
            tick: 3,
            user_id: 7,
            role: Role::P1,
            board_rle: "0x200".to_string(),
            active: ActivePiece {
                shape: Some(ShapeName::T),
                x: 4,
                y: 0,
                rot: 0,
            },
            hold: None,
            next: vec![ShapeName::I, ShapeName::O, ShapeName::L],
            score: 0,
            lines: 0,
            level: 1,
            game_over: false,
            at: 1,
        });
        let v: serde_json::Value = serde_json::from_str(&msg.encode().unwrap()).unwrap();
        assert_eq!(v["type"], "SNAPSHOT");
        assert_eq!(v["userId"], 7);
        assert_eq!(v["boardRLE"], "0x200");
        assert_eq!(v["active"]["shape"], "T");
        assert_eq!(v["hold"], serde_json::Value::Null);
        assert_eq!(v["next"], serde_json::json!(["I", "O", "L"]));
        assert_eq!(v["gameOver"], false);
    }

    #[test]
    fn test_game_over_wire_shape() {
        let msg = create_game_over(
            None,
            vec![PlayerResult {
                user_id: 1,
                score: 100,
                lines: 1,
                max_combo: 1,
            }],
        );
        let v: serde_json::Value = serde_json::from_str(&msg.encode().unwrap()).unwrap();
        assert_eq!(v["type"], "GAME_OVER");
        assert_eq!(v["winner"], serde_json::Value::Null);
        assert_eq!(v["results"][0]["maxCombo"], 1);
    }
}
