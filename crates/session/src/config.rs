use std::net::SocketAddr;
use std::time::Duration;

use crate::error::MatchError;
use crate::types::{
    DEFAULT_DROP_MS, GAME_OVER_GRACE_MS, HANDSHAKE_TIMEOUT_MS, INPUT_POLL_MS, JOIN_TIMEOUT_MS,
    SNAPSHOT_INTERVAL_MS, TERMINATION_POLL_MS,
};

/// Parameters of one match, fixed for the life of the process
#[derive(Debug, Clone)]
pub struct MatchConfig {
    pub host: String,
    pub port: u16,
    pub room_id: u64,
    /// User ids in seat order: `players[0]` plays as P1
    pub players: [u64; 2],
    pub seed: u32,
    pub drop_interval: Duration,
    pub snapshot_interval: Duration,
    pub termination_poll: Duration,
    pub input_poll: Duration,
    pub handshake_timeout: Duration,
    pub join_timeout: Duration,
    pub grace_period: Duration,
    /// `host:port` of the lobby to report results to
    pub lobby_addr: Option<String>,
    pub lobby_timeout: Duration,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 0,
            room_id: 0,
            players: [1, 2],
            seed: 1,
            drop_interval: Duration::from_millis(DEFAULT_DROP_MS),
            snapshot_interval: Duration::from_millis(SNAPSHOT_INTERVAL_MS),
            termination_poll: Duration::from_millis(TERMINATION_POLL_MS),
            input_poll: Duration::from_millis(INPUT_POLL_MS),
            handshake_timeout: Duration::from_millis(HANDSHAKE_TIMEOUT_MS),
            join_timeout: Duration::from_millis(JOIN_TIMEOUT_MS),
            grace_period: Duration::from_millis(GAME_OVER_GRACE_MS),
            lobby_addr: None,
            lobby_timeout: Duration::from_secs(5),
        }
    }
}

impl MatchConfig {
    pub fn new(room_id: u64, players: [u64; 2], seed: u32) -> Self {
        Self {
            room_id,
            players,
            seed,
            ..Self::default()
        }
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, MatchError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| {
                MatchError::InvalidConfig(format!("bad listen address {}:{}", self.host, self.port))
            })
    }

    /// Reject configurations the match loop cannot run with
    pub fn validate(&self) -> Result<(), MatchError> {
        if self.players[0] == self.players[1] {
            return Err(MatchError::InvalidConfig(format!(
                "both seats assigned to user {}",
                self.players[0]
            )));
        }
        if self.drop_interval.is_zero() || self.snapshot_interval.is_zero() {
            return Err(MatchError::InvalidConfig(
                "drop and snapshot intervals must be positive".to_string(),
            ));
        }
        self.socket_addr().map(|_| ())
    }

    pub fn drop_ms(&self) -> u64 {
        self.drop_interval.as_millis() as u64
    }
}
