//! Result report to the lobby
//!
//! One short-lived connection per match: connect, send a framed
//! `report_game_result` request, read one framed reply. Failure is logged
//! and never affects the match outcome.

use std::time::Duration;

use log::{info, warn};
use tokio::net::TcpStream;

use crate::wire::{
    write_frame, FrameReader, GameResultReport, LobbyRequest, LobbyResponse, ProtocolError,
};

/// Send `report` to the lobby at `addr` and return its reply
pub async fn report_result(
    addr: &str,
    report: &GameResultReport,
) -> Result<LobbyResponse, ProtocolError> {
    let stream = TcpStream::connect(addr).await?;
    let (read_half, mut write_half) = stream.into_split();

    let request = LobbyRequest::ReportGameResult(report.clone()).encode()?;
    write_frame(&mut write_half, request.as_bytes()).await?;

    let mut reader = FrameReader::new(read_half);
    let reply = reader.read_frame().await?;
    LobbyResponse::decode(&reply)
}

/// Report with a deadline; true only when the lobby acknowledged success
pub async fn report_to_lobby(addr: &str, report: &GameResultReport, limit: Duration) -> bool {
    match tokio::time::timeout(limit, report_result(addr, report)).await {
        Ok(Ok(response)) if response.is_success() => {
            info!("reported room {} result to lobby {}", report.room_id, addr);
            true
        }
        Ok(Ok(response)) => {
            warn!(
                "lobby {} refused room {} result: {} {}",
                addr,
                report.room_id,
                response.status,
                response.message.as_deref().unwrap_or("")
            );
            false
        }
        Ok(Err(e)) => {
            warn!("failed to report room {} result to {}: {}", report.room_id, addr, e);
            false
        }
        Err(_) => {
            warn!("lobby {} did not answer within {:?}", addr, limit);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::{Role, RoleResult};
    use tokio::net::TcpListener;

    fn report() -> GameResultReport {
        GameResultReport {
            room_id: 3,
            winner: Some(Role::P1),
            results: vec![RoleResult {
                role: Role::P1,
                user_id: 11,
                score: 400,
                lines: 4,
                max_combo: 1,
            }],
        }
    }

    async fn fake_lobby(reply: &'static str) -> (String, tokio::task::JoinHandle<LobbyRequest>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let task = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let (read_half, mut write_half) = stream.into_split();
            let mut reader = FrameReader::new(read_half);
            let request = LobbyRequest::decode(&reader.read_frame().await.unwrap()).unwrap();
            write_frame(&mut write_half, reply.as_bytes()).await.unwrap();
            request
        });
        (addr, task)
    }

    #[tokio::test]
    async fn lobby_receives_report_and_acknowledges() {
        let (addr, lobby) = fake_lobby(r#"{"status":"success"}"#).await;
        assert!(report_to_lobby(&addr, &report(), Duration::from_secs(2)).await);

        let LobbyRequest::ReportGameResult(received) = lobby.await.unwrap();
        assert_eq!(received, report());
    }

    #[tokio::test]
    async fn lobby_error_status_is_not_success() {
        let (addr, _lobby) = fake_lobby(r#"{"status":"error","message":"unknown room"}"#).await;
        let response = report_result(&addr, &report()).await.unwrap();
        assert!(!response.is_success());
        assert_eq!(response.message.as_deref(), Some("unknown room"));
    }

    #[tokio::test]
    async fn unreachable_lobby_is_reported_as_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        drop(listener);
        assert!(!report_to_lobby(&addr, &report(), Duration::from_secs(2)).await);
    }
}
