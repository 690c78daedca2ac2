use std::io;
use std::string::FromUtf8Error;

use thiserror::Error;

/// Errors raised while reading or writing framed messages
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("peer closed the connection")]
    PeerClosed,
    #[error("frame length {0} outside (0, {max}]", max = crate::frame::MAX_FRAME_LEN)]
    InvalidLength(usize),
    #[error("payload of {0} bytes exceeds the frame limit")]
    FrameTooLarge(usize),
    #[error("frame is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] FromUtf8Error),
    #[error("malformed message: {0}")]
    Json(#[from] serde_json::Error),
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

impl ProtocolError {
    /// True when the peer went away rather than misbehaving
    pub fn is_disconnect(&self) -> bool {
        match self {
            ProtocolError::PeerClosed => true,
            ProtocolError::Io(err) => matches!(
                err.kind(),
                io::ErrorKind::ConnectionReset
                    | io::ErrorKind::ConnectionAborted
                    | io::ErrorKind::BrokenPipe
                    | io::ErrorKind::UnexpectedEof
            ),
            _ => false,
        }
    }
}
