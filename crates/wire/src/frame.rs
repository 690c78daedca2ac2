//! Length-prefixed framing
//!
//! Every frame is a 4-byte big-endian payload length followed by that many
//! bytes of UTF-8 text. Valid lengths are `1..=MAX_FRAME_LEN`.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::ProtocolError;
use crate::protocol::Message;

/// Largest payload accepted in one frame
pub const MAX_FRAME_LEN: usize = 65536;

const HEADER_LEN: usize = 4;

const READ_CHUNK: usize = 4096;

/// Write one frame, retrying partial writes until every byte is out
pub async fn write_frame<W>(writer: &mut W, payload: &[u8]) -> Result<(), ProtocolError>
where
    W: AsyncWrite + Unpin,
{
    if payload.len() > MAX_FRAME_LEN {
        return Err(ProtocolError::FrameTooLarge(payload.len()));
    }

    let mut frame = Vec::with_capacity(HEADER_LEN + payload.len());
    frame.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    frame.extend_from_slice(payload);

    let mut remaining = frame.as_slice();
    while !remaining.is_empty() {
        let n = writer.write(remaining).await?;
        if n == 0 {
            return Err(ProtocolError::PeerClosed);
        }
        remaining = &remaining[n..];
    }
    writer.flush().await?;
    Ok(())
}

/// Encode `message` as JSON and write it as one frame
pub async fn send_message<W>(writer: &mut W, message: &Message) -> Result<(), ProtocolError>
where
    W: AsyncWrite + Unpin,
{
    let text = message.encode()?;
    write_frame(writer, text.as_bytes()).await
}

/// Reads frames from a byte stream.
///
/// Bytes of a partially received frame are kept between calls, so a
/// `read_frame` future that is dropped (for example by a timeout) loses
/// nothing and the next call picks up where it left off. The reader never
/// consumes bytes beyond the frame it is currently assembling.
#[derive(Debug)]
pub struct FrameReader<R> {
    inner: R,
    buf: Vec<u8>,
}

impl<R> FrameReader<R>
where
    R: AsyncRead + Unpin,
{
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: Vec::with_capacity(HEADER_LEN + READ_CHUNK),
        }
    }

    /// Payload length from the buffered header, validated
    fn frame_len(&self) -> Result<Option<usize>, ProtocolError> {
        if self.buf.len() < HEADER_LEN {
            return Ok(None);
        }
        let header = [self.buf[0], self.buf[1], self.buf[2], self.buf[3]];
        let len = u32::from_be_bytes(header) as usize;
        if len == 0 || len > MAX_FRAME_LEN {
            return Err(ProtocolError::InvalidLength(len));
        }
        Ok(Some(len))
    }

    /// Read the next complete frame and decode it as UTF-8
    pub async fn read_frame(&mut self) -> Result<String, ProtocolError> {
        loop {
            let wanted = match self.frame_len()? {
                Some(len) if self.buf.len() == HEADER_LEN + len => {
                    let payload = self.buf.split_off(HEADER_LEN);
                    self.buf.clear();
                    return Ok(String::from_utf8(payload)?);
                }
                Some(len) => HEADER_LEN + len,
                None => HEADER_LEN,
            };

            let missing = (wanted - self.buf.len()).min(READ_CHUNK);
            let mut chunk = [0u8; READ_CHUNK];
            let n = self.inner.read(&mut chunk[..missing]).await?;
            if n == 0 {
                return Err(ProtocolError::PeerClosed);
            }
            self.buf.extend_from_slice(&chunk[..n]);
        }
    }

    /// Read the next frame and decode it as a message envelope
    pub async fn read_message(&mut self) -> Result<Message, ProtocolError> {
        let text = self.read_frame().await?;
        Message::decode(&text)
    }
}
