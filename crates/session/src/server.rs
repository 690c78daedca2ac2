//! TCP match server
//!
//! Accepts connections for one room, waits for both players, then runs the
//! gravity, snapshot and termination loops until a verdict is reached.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, info, warn};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::time::{interval_at, timeout, Instant, MissedTickBehavior};

use crate::config::MatchConfig;
use crate::coordinator::{MatchState, SessionHandle, Verdict};
use crate::error::MatchError;
use crate::peer::{encode_frame, PeerHandle, PeerId};
use crate::report::report_to_lobby;
use crate::wire::{FrameReader, Message, Role, RoleResult};

/// Result of a completed match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome {
    pub verdict: Verdict,
    pub results: Vec<RoleResult>,
    /// Whether the lobby acknowledged the report
    pub reported: bool,
}

#[derive(Debug, Clone, Copy)]
struct ConnectionTimers {
    handshake: Duration,
    input_poll: Duration,
}

/// Run one match to completion.
///
/// `ready_tx` receives the bound address once the listener is up, which
/// lets callers bind to port 0.
pub async fn run_match(
    config: MatchConfig,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> Result<MatchOutcome, MatchError> {
    config.validate()?;

    let listener = TcpListener::bind(config.socket_addr()?)
        .await
        .map_err(MatchError::Bind)?;
    let local_addr = listener.local_addr().map_err(MatchError::Bind)?;
    info!(
        "room {} listening on {} (P1={}, P2={}, seed={}, drop={}ms)",
        config.room_id,
        local_addr,
        config.players[0],
        config.players[1],
        config.seed,
        config.drop_ms()
    );
    if let Some(tx) = ready_tx {
        let _ = tx.send(local_addr);
    }

    let running = Arc::new(AtomicBool::new(true));
    let (session, mut joined) = SessionHandle::spawn(MatchState::new(&config));
    let timers = ConnectionTimers {
        handshake: config.handshake_timeout,
        input_poll: config.input_poll,
    };
    let accept_task = tokio::spawn(accept_loop(
        listener,
        session.clone(),
        timers,
        Arc::clone(&running),
    ));

    let all_joined = matches!(
        timeout(config.join_timeout, joined.wait_for(|n| *n >= 2)).await,
        Ok(Ok(_))
    );
    if !all_joined {
        let count = *joined.borrow();
        running.store(false, Ordering::SeqCst);
        accept_task.abort();
        error!(
            "room {}: only {} of 2 players joined, giving up",
            config.room_id, count
        );
        return Err(MatchError::PlayersMissing {
            joined: count,
            waited_ms: config.join_timeout.as_millis() as u64,
        });
    }

    if !session.start().await? {
        running.store(false, Ordering::SeqCst);
        accept_task.abort();
        return Err(MatchError::ActorGone);
    }
    info!("room {}: both players joined, match started", config.room_id);

    let gravity_task = tokio::spawn(gravity_loop(session.clone(), config.drop_interval));
    let snapshot_task = tokio::spawn(snapshot_loop(session.clone(), config.snapshot_interval));

    let mut poll = tokio::time::interval(config.termination_poll);
    let finished = loop {
        poll.tick().await;
        if let Some(batch) = session.conclude().await? {
            break batch;
        }
    };
    gravity_task.abort();
    snapshot_task.abort();
    // A snapshot batch already in flight must land before GAME_OVER
    let _ = gravity_task.await;
    let _ = snapshot_task.await;

    match finished.verdict {
        Verdict::Winner(role) => info!("room {}: {} wins", config.room_id, role),
        Verdict::Draw => info!("room {}: draw", config.room_id),
    }
    broadcast(
        &session,
        &finished.recipients,
        std::slice::from_ref(&finished.game_over),
    )
    .await;

    let reported = match config.lobby_addr.as_deref() {
        Some(addr) => report_to_lobby(addr, &finished.report, config.lobby_timeout).await,
        None => false,
    };

    // Let clients drain GAME_OVER before connections are torn down
    tokio::time::sleep(config.grace_period).await;
    running.store(false, Ordering::SeqCst);
    accept_task.abort();

    Ok(MatchOutcome {
        verdict: finished.verdict,
        results: finished.report.results,
        reported,
    })
}

async fn accept_loop(
    listener: TcpListener,
    session: SessionHandle,
    timers: ConnectionTimers,
    running: Arc<AtomicBool>,
) {
    let mut next_id: PeerId = 1;
    while running.load(Ordering::SeqCst) {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let id = next_id;
                next_id += 1;
                debug!("connection {} from {}", id, addr);
                let _ = stream.set_nodelay(true);
                tokio::spawn(serve_connection(
                    id,
                    stream,
                    session.clone(),
                    timers,
                    Arc::clone(&running),
                ));
            }
            Err(e) => {
                warn!("accept failed: {}", e);
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
        }
    }
}

async fn serve_connection(
    id: PeerId,
    stream: TcpStream,
    session: SessionHandle,
    timers: ConnectionTimers,
    running: Arc<AtomicBool>,
) {
    let (read_half, write_half) = stream.into_split();
    let mut reader = FrameReader::new(read_half);

    let hello = match timeout(timers.handshake, reader.read_message()).await {
        Ok(Ok(Message::Hello(hello))) => hello,
        Ok(Ok(other)) => {
            warn!("connection {} sent {} before HELLO", id, other.kind());
            return;
        }
        Ok(Err(e)) => {
            debug!("connection {} failed during handshake: {}", id, e);
            return;
        }
        Err(_) => {
            warn!("connection {} did not send HELLO in time", id);
            return;
        }
    };

    let peer = PeerHandle::spawn(id, write_half);
    let role = match session.join(hello, peer).await {
        Ok(role) => role,
        // The actor dropped the handle, so the writer closes the socket
        Err(_) => return,
    };

    while running.load(Ordering::SeqCst) {
        let message = match timeout(timers.input_poll, reader.read_message()).await {
            Err(_) => continue,
            Ok(Ok(message)) => message,
            Ok(Err(e)) if e.is_disconnect() => {
                info!("{} connection {} closed", role, id);
                break;
            }
            Ok(Err(e)) => {
                warn!("{} connection {} dropped: {}", role, id, e);
                break;
            }
        };

        match message {
            Message::Input(input) if role != Role::Spectator => session.input(role, input).await,
            other => debug!("{} connection {} sent unexpected {}", role, id, other.kind()),
        }
    }

    session.detach(id).await;
}

async fn gravity_loop(session: SessionHandle, period: Duration) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        ticker.tick().await;
        session.gravity().await;
    }
}

async fn snapshot_loop(session: SessionHandle, period: Duration) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        ticker.tick().await;
        match session.snapshot().await {
            Some(batch) => broadcast(&session, &batch.recipients, &batch.messages).await,
            None => break,
        }
    }
}

/// Queue `messages` for every recipient; peers that refuse are detached
async fn broadcast(session: &SessionHandle, recipients: &[PeerHandle], messages: &[Message]) {
    let mut dead: Vec<PeerId> = Vec::new();
    for message in messages {
        let Some(frame) = encode_frame(message) else {
            continue;
        };
        for peer in recipients {
            if !peer.send(Arc::clone(&frame)) && !dead.contains(&peer.id()) {
                dead.push(peer.id());
            }
        }
    }
    for id in dead {
        session.detach(id).await;
    }
}
