use std::io;

use thiserror::Error;

/// Errors that end a match
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("invalid match configuration: {0}")]
    InvalidConfig(String),
    #[error("failed to bind listener: {0}")]
    Bind(#[source] io::Error),
    #[error("only {joined} of 2 players joined within {waited_ms}ms")]
    PlayersMissing { joined: usize, waited_ms: u64 },
    #[error("session actor stopped unexpectedly")]
    ActorGone,
}
