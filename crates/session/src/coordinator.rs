//! Session actor
//!
//! A single task owns [`MatchState`]: both boards, the player seats and the
//! spectator registry. Connection tasks, gravity, snapshots and the
//! termination watcher talk to it through [`SessionHandle`], so every board
//! mutation is applied one event at a time in arrival order.
//!
//! The actor never touches a socket. Snapshot and game-over messages are
//! handed back together with the recipient list and sent by the caller.

use std::collections::BTreeMap;

use arrayvec::ArrayVec;
use log::{debug, info, warn};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};

use crate::config::MatchConfig;
use crate::core::{BoardSnapshot, GameState};
use crate::error::MatchError;
use crate::peer::{encode_frame, PeerHandle, PeerId};
use crate::wire::{
    create_game_over, create_welcome, current_timestamp_ms, ActivePiece, GameResultReport,
    HelloMessage, InputMessage, Message, PlayerResult, Role, RoleResult, ShapeName,
    SnapshotMessage,
};

const EVENT_QUEUE: usize = 256;

/// Why a HELLO was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum JoinRejection {
    #[error("room {got} does not match this match's room {expected}")]
    WrongRoom { expected: u64, got: u64 },
    #[error("user {0} is not a player in this match")]
    UnknownPlayer(u64),
    #[error("user {0} is already connected")]
    AlreadyConnected(u64),
    #[error("the match is already over")]
    MatchOver,
    #[error("connection closed during the handshake")]
    PeerGone,
}

/// Result of offering one INPUT to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// Sequence accepted; carries whether the board operation succeeded
    Applied(bool),
    /// Sequence not newer than the last accepted one
    Stale,
    /// Match not running, sender not a player, or user id mismatch
    Ignored,
}

/// How a match ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Winner(Role),
    Draw,
}

impl Verdict {
    pub fn winner(&self) -> Option<Role> {
        match self {
            Verdict::Winner(role) => Some(*role),
            Verdict::Draw => None,
        }
    }
}

/// Per-player SNAPSHOT messages and who should receive them
#[derive(Debug)]
pub struct SnapshotBatch {
    pub messages: ArrayVec<Message, 2>,
    pub recipients: Vec<PeerHandle>,
}

/// Everything needed to close a match
#[derive(Debug)]
pub struct FinalBatch {
    pub verdict: Verdict,
    pub game_over: Message,
    pub report: GameResultReport,
    pub recipients: Vec<PeerHandle>,
}

#[derive(Debug)]
struct PlayerSeat {
    user_id: u64,
    role: Role,
    /// Created on a successful HELLO; its presence marks the seat as taken
    game: Option<GameState>,
    /// Cleared when the connection stops accepting frames
    peer: Option<PeerHandle>,
    last_seq: u64,
}

/// Authoritative state of one match
#[derive(Debug)]
pub struct MatchState {
    room_id: u64,
    seed: u32,
    drop_ms: u64,
    seats: [PlayerSeat; 2],
    spectators: BTreeMap<PeerId, PeerHandle>,
    started: bool,
    verdict: Option<Verdict>,
    tick: u64,
}

impl MatchState {
    pub fn new(config: &MatchConfig) -> Self {
        let seat = |index: usize, role: Role| PlayerSeat {
            user_id: config.players[index],
            role,
            game: None,
            peer: None,
            last_seq: 0,
        };

        Self {
            room_id: config.room_id,
            seed: config.seed,
            drop_ms: config.drop_ms(),
            seats: [seat(0, Role::P1), seat(1, Role::P2)],
            spectators: BTreeMap::new(),
            started: false,
            verdict: None,
            tick: 0,
        }
    }

    pub fn joined_players(&self) -> usize {
        self.seats.iter().filter(|s| s.game.is_some()).count()
    }

    pub fn spectator_count(&self) -> usize {
        self.spectators.len()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_over(&self) -> bool {
        self.verdict.is_some()
    }

    /// Board of a player seat, if that player has joined
    pub fn game(&self, role: Role) -> Option<&GameState> {
        role.seat().and_then(|i| self.seats[i].game.as_ref())
    }

    /// Number of joined boards that have not topped out
    pub fn alive_players(&self) -> usize {
        self.seats
            .iter()
            .filter(|s| s.game.as_ref().map_or(false, |g| !g.game_over()))
            .count()
    }

    /// Validate a HELLO, send WELCOME and register the connection
    pub fn join(&mut self, hello: &HelloMessage, peer: PeerHandle) -> Result<Role, JoinRejection> {
        if hello.room_id != self.room_id {
            return Err(JoinRejection::WrongRoom {
                expected: self.room_id,
                got: hello.room_id,
            });
        }
        if self.is_over() {
            return Err(JoinRejection::MatchOver);
        }

        let seat_index = if hello.spectator {
            None
        } else {
            let index = self
                .seats
                .iter()
                .position(|s| s.user_id == hello.user_id)
                .ok_or(JoinRejection::UnknownPlayer(hello.user_id))?;
            if self.seats[index].game.is_some() {
                return Err(JoinRejection::AlreadyConnected(hello.user_id));
            }
            Some(index)
        };
        let role = seat_index.map_or(Role::Spectator, |i| self.seats[i].role);

        // WELCOME is queued before registration so it precedes any snapshot
        let welcome = encode_frame(&create_welcome(role, self.seed, self.drop_ms))
            .ok_or(JoinRejection::PeerGone)?;
        if !peer.send(welcome) {
            return Err(JoinRejection::PeerGone);
        }

        match seat_index {
            Some(index) => {
                let seat = &mut self.seats[index];
                seat.game = Some(GameState::with_seed(self.seed));
                seat.peer = Some(peer);
                seat.last_seq = 0;
            }
            None => {
                self.spectators.insert(peer.id(), peer);
            }
        }

        Ok(role)
    }

    /// Mark the match as running once both players have joined
    pub fn start(&mut self) -> bool {
        if self.joined_players() == 2 && !self.is_over() {
            self.started = true;
        }
        self.started
    }

    /// Apply one INPUT if its sequence number is newer than the last accepted one
    pub fn apply_input(&mut self, role: Role, input: &InputMessage) -> InputOutcome {
        if !self.started || self.is_over() {
            return InputOutcome::Ignored;
        }
        let Some(index) = role.seat() else {
            return InputOutcome::Ignored;
        };

        let seat = &mut self.seats[index];
        if input.user_id != seat.user_id {
            return InputOutcome::Ignored;
        }
        let Some(game) = seat.game.as_mut() else {
            return InputOutcome::Ignored;
        };
        if input.seq <= seat.last_seq {
            return InputOutcome::Stale;
        }

        seat.last_seq = input.seq;
        InputOutcome::Applied(game.apply_action(input.action.into()))
    }

    /// One gravity step on every live board; returns how many boards were stepped
    pub fn apply_gravity(&mut self) -> usize {
        if !self.started || self.is_over() {
            return 0;
        }

        let mut stepped = 0;
        for game in self.seats.iter_mut().filter_map(|s| s.game.as_mut()) {
            if !game.game_over() {
                game.move_down();
                stepped += 1;
            }
        }
        stepped
    }

    /// Build this tick's SNAPSHOT for each player; None once the match is over
    pub fn snapshot(&mut self) -> Option<SnapshotBatch> {
        if !self.started || self.is_over() {
            return None;
        }

        self.tick += 1;
        let at = current_timestamp_ms();
        let messages = self
            .seats
            .iter()
            .filter_map(|seat| {
                let game = seat.game.as_ref()?;
                Some(snapshot_message(
                    seat.user_id,
                    seat.role,
                    &game.snapshot(),
                    self.tick,
                    at,
                ))
            })
            .collect();

        Some(SnapshotBatch {
            messages,
            recipients: self.recipients(),
        })
    }

    /// Decide the match if at most one board is still alive
    pub fn conclude(&mut self) -> Option<FinalBatch> {
        if !self.started || self.is_over() {
            return None;
        }

        let verdict = match self.alive_players() {
            0 => Verdict::Draw,
            1 => {
                let alive = self
                    .seats
                    .iter()
                    .find(|s| s.game.as_ref().map_or(false, |g| !g.game_over()))?;
                Verdict::Winner(alive.role)
            }
            _ => return None,
        };

        Some(self.finish(verdict))
    }

    fn finish(&mut self, verdict: Verdict) -> FinalBatch {
        self.verdict = Some(verdict);

        let mut results = Vec::with_capacity(2);
        let mut report_results = Vec::with_capacity(2);
        for seat in &self.seats {
            let (score, lines, max_combo) = seat
                .game
                .as_ref()
                .map_or((0, 0, 0), |g| (g.score(), g.lines(), g.max_combo()));
            results.push(PlayerResult {
                user_id: seat.user_id,
                score,
                lines,
                max_combo,
            });
            report_results.push(RoleResult {
                role: seat.role,
                user_id: seat.user_id,
                score,
                lines,
                max_combo,
            });
        }

        let winner = verdict
            .winner()
            .and_then(|role| role.seat())
            .map(|i| self.seats[i].user_id);

        FinalBatch {
            verdict,
            game_over: create_game_over(winner, results),
            report: GameResultReport {
                room_id: self.room_id,
                winner: verdict.winner(),
                results: report_results,
            },
            recipients: self.recipients(),
        }
    }

    /// Stop sending to a connection; a player's seat and board stay in place
    pub fn detach(&mut self, peer: PeerId) {
        if self.spectators.remove(&peer).is_some() {
            debug!("spectator connection {} removed", peer);
            return;
        }
        for seat in &mut self.seats {
            if seat.peer.as_ref().map(|p| p.id()) == Some(peer) {
                seat.peer = None;
                debug!("{} connection {} detached", seat.role, peer);
            }
        }
    }

    fn recipients(&self) -> Vec<PeerHandle> {
        self.seats
            .iter()
            .filter_map(|s| s.peer.clone())
            .chain(self.spectators.values().cloned())
            .collect()
    }
}

fn snapshot_message(
    user_id: u64,
    role: Role,
    snapshot: &BoardSnapshot,
    tick: u64,
    at: u64,
) -> Message {
    let shape = if snapshot.game_over {
        None
    } else {
        Some(ShapeName::from(snapshot.active.kind))
    };

    Message::Snapshot(SnapshotMessage {
        tick,
        user_id,
        role,
        board_rle: snapshot.board_rle(),
        active: ActivePiece {
            shape,
            x: snapshot.active.x as i32,
            y: snapshot.active.y as i32,
            rot: snapshot.active.rotation,
        },
        hold: snapshot.hold.map(ShapeName::from),
        next: snapshot.next.iter().copied().map(ShapeName::from).collect(),
        score: snapshot.score,
        lines: snapshot.lines,
        level: snapshot.level,
        game_over: snapshot.game_over,
        at,
    })
}

/// Requests handled by the session actor
#[derive(Debug)]
pub enum SessionEvent {
    Join {
        hello: HelloMessage,
        peer: PeerHandle,
        reply: oneshot::Sender<Result<Role, JoinRejection>>,
    },
    Start {
        reply: oneshot::Sender<bool>,
    },
    Input {
        role: Role,
        input: InputMessage,
    },
    Gravity,
    Snapshot {
        reply: oneshot::Sender<Option<SnapshotBatch>>,
    },
    Conclude {
        reply: oneshot::Sender<Option<FinalBatch>>,
    },
    Detach {
        peer: PeerId,
    },
}

/// Cloneable sender side of the session actor
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<SessionEvent>,
}

impl SessionHandle {
    /// Spawn the actor owning `state`.
    ///
    /// The returned watch channel carries the number of joined players. The
    /// actor stops once every handle has been dropped.
    pub fn spawn(state: MatchState) -> (Self, watch::Receiver<usize>) {
        let (tx, rx) = mpsc::channel(EVENT_QUEUE);
        let (joined_tx, joined_rx) = watch::channel(state.joined_players());
        tokio::spawn(run_actor(state, rx, joined_tx));
        (Self { tx }, joined_rx)
    }

    pub async fn join(&self, hello: HelloMessage, peer: PeerHandle) -> Result<Role, JoinRejection> {
        let (reply, rx) = oneshot::channel();
        if self
            .tx
            .send(SessionEvent::Join { hello, peer, reply })
            .await
            .is_err()
        {
            return Err(JoinRejection::MatchOver);
        }
        rx.await.unwrap_or(Err(JoinRejection::MatchOver))
    }

    pub async fn start(&self) -> Result<bool, MatchError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(SessionEvent::Start { reply })
            .await
            .map_err(|_| MatchError::ActorGone)?;
        rx.await.map_err(|_| MatchError::ActorGone)
    }

    pub async fn input(&self, role: Role, input: InputMessage) {
        let _ = self.tx.send(SessionEvent::Input { role, input }).await;
    }

    pub async fn gravity(&self) {
        let _ = self.tx.send(SessionEvent::Gravity).await;
    }

    pub async fn snapshot(&self) -> Option<SnapshotBatch> {
        let (reply, rx) = oneshot::channel();
        self.tx.send(SessionEvent::Snapshot { reply }).await.ok()?;
        rx.await.ok().flatten()
    }

    pub async fn conclude(&self) -> Result<Option<FinalBatch>, MatchError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(SessionEvent::Conclude { reply })
            .await
            .map_err(|_| MatchError::ActorGone)?;
        rx.await.map_err(|_| MatchError::ActorGone)
    }

    pub async fn detach(&self, peer: PeerId) {
        let _ = self.tx.send(SessionEvent::Detach { peer }).await;
    }
}

async fn run_actor(
    mut state: MatchState,
    mut rx: mpsc::Receiver<SessionEvent>,
    joined_tx: watch::Sender<usize>,
) {
    while let Some(event) = rx.recv().await {
        match event {
            SessionEvent::Join { hello, peer, reply } => {
                let result = state.join(&hello, peer);
                match &result {
                    Ok(role) => info!(
                        "user {} joined room {} as {}",
                        hello.user_id, hello.room_id, role
                    ),
                    Err(rejection) => {
                        warn!("rejected HELLO from user {}: {}", hello.user_id, rejection)
                    }
                }
                let _ = joined_tx.send(state.joined_players());
                let _ = reply.send(result);
            }
            SessionEvent::Start { reply } => {
                let _ = reply.send(state.start());
            }
            SessionEvent::Input { role, input } => {
                let seq = input.seq;
                match state.apply_input(role, &input) {
                    InputOutcome::Applied(_) => {}
                    InputOutcome::Stale => debug!("{} dropped stale input seq {}", role, seq),
                    InputOutcome::Ignored => debug!("{} input seq {} ignored", role, seq),
                }
            }
            SessionEvent::Gravity => {
                state.apply_gravity();
            }
            SessionEvent::Snapshot { reply } => {
                let _ = reply.send(state.snapshot());
            }
            SessionEvent::Conclude { reply } => {
                let _ = reply.send(state.conclude());
            }
            SessionEvent::Detach { peer } => state.detach(peer),
        }
    }
    debug!("session actor for room {} stopped", state.room_id);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::{ActionName, PROTOCOL_VERSION};

    const ROOM: u64 = 77;
    const P1: u64 = 1001;
    const P2: u64 = 1002;

    fn state() -> MatchState {
        MatchState::new(&MatchConfig::new(ROOM, [P1, P2], 4242))
    }

    fn hello(room_id: u64, user_id: u64, spectator: bool) -> HelloMessage {
        HelloMessage {
            version: PROTOCOL_VERSION,
            room_id,
            user_id,
            spectator,
        }
    }

    fn input(user_id: u64, seq: u64, action: ActionName) -> InputMessage {
        InputMessage {
            user_id,
            seq,
            ts: 0,
            action,
        }
    }

    fn started() -> MatchState {
        let mut state = state();
        let (p1, _rx1) = PeerHandle::channel(1);
        let (p2, _rx2) = PeerHandle::channel(2);
        state.join(&hello(ROOM, P1, false), p1).unwrap();
        state.join(&hello(ROOM, P2, false), p2).unwrap();
        assert!(state.start());
        state
    }

    fn top_out(state: &mut MatchState, role: Role, user_id: u64, first_seq: u64) -> u64 {
        let mut seq = first_seq;
        while !state.game(role).unwrap().game_over() {
            state.apply_input(role, &input(user_id, seq, ActionName::HardDrop));
            seq += 1;
            assert!(seq < first_seq + 200, "board never topped out");
        }
        seq
    }

    #[test]
    fn wrong_room_creates_no_board() {
        let mut state = state();
        let (peer, mut rx) = PeerHandle::channel(1);
        let result = state.join(&hello(ROOM + 1, P1, false), peer);
        assert_eq!(
            result,
            Err(JoinRejection::WrongRoom {
                expected: ROOM,
                got: ROOM + 1
            })
        );
        assert_eq!(state.joined_players(), 0);
        assert!(state.game(Role::P1).is_none());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn roles_follow_configured_order() {
        let mut state = state();
        let (p2, _rx2) = PeerHandle::channel(1);
        let (p1, _rx1) = PeerHandle::channel(2);
        assert_eq!(state.join(&hello(ROOM, P2, false), p2), Ok(Role::P2));
        assert_eq!(state.join(&hello(ROOM, P1, false), p1), Ok(Role::P1));
    }

    #[test]
    fn welcome_is_queued_on_join() {
        let mut state = state();
        let (peer, mut rx) = PeerHandle::channel(1);
        state.join(&hello(ROOM, P1, false), peer).unwrap();
        let frame = rx.try_recv().unwrap();
        match Message::decode(&frame).unwrap() {
            Message::Welcome(w) => {
                assert_eq!(w.role, Role::P1);
                assert_eq!(w.seed, 4242);
                assert_eq!(w.gravity_plan.drop_ms, 500);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn unknown_and_duplicate_players_are_rejected() {
        let mut state = state();
        let (a, _ra) = PeerHandle::channel(1);
        let (b, _rb) = PeerHandle::channel(2);
        let (c, _rc) = PeerHandle::channel(3);
        assert_eq!(
            state.join(&hello(ROOM, 5, false), a),
            Err(JoinRejection::UnknownPlayer(5))
        );
        assert!(state.join(&hello(ROOM, P1, false), b).is_ok());
        assert_eq!(
            state.join(&hello(ROOM, P1, false), c),
            Err(JoinRejection::AlreadyConnected(P1))
        );
        assert_eq!(state.joined_players(), 1);
        assert!(!state.start());
    }

    #[test]
    fn spectators_are_uncapped() {
        let mut state = started();
        let mut receivers = Vec::new();
        for id in 10..20 {
            let (peer, rx) = PeerHandle::channel(id);
            receivers.push(rx);
            assert_eq!(state.join(&hello(ROOM, 5000 + id, true), peer), Ok(Role::Spectator));
        }
        assert_eq!(state.spectator_count(), 10);
        assert_eq!(state.snapshot().unwrap().recipients.len(), 12);
    }

    #[test]
    fn stale_input_is_a_no_op() {
        let mut state = started();
        let before = state.game(Role::P1).unwrap().active();

        assert_eq!(
            state.apply_input(Role::P1, &input(P1, 5, ActionName::Right)),
            InputOutcome::Applied(true)
        );
        let after_right = state.game(Role::P1).unwrap().active();
        assert_eq!(after_right.x, before.x + 1);

        assert_eq!(
            state.apply_input(Role::P1, &input(P1, 3, ActionName::Left)),
            InputOutcome::Stale
        );
        assert_eq!(
            state.apply_input(Role::P1, &input(P1, 5, ActionName::Left)),
            InputOutcome::Stale
        );
        assert_eq!(state.game(Role::P1).unwrap().active(), after_right);
    }

    #[test]
    fn input_for_another_user_is_ignored() {
        let mut state = started();
        assert_eq!(
            state.apply_input(Role::P1, &input(P2, 1, ActionName::Left)),
            InputOutcome::Ignored
        );
        assert_eq!(
            state.apply_input(Role::Spectator, &input(P1, 1, ActionName::Left)),
            InputOutcome::Ignored
        );
    }

    #[test]
    fn input_before_start_is_ignored() {
        let mut state = state();
        let (p1, _rx) = PeerHandle::channel(1);
        state.join(&hello(ROOM, P1, false), p1).unwrap();
        assert_eq!(
            state.apply_input(Role::P1, &input(P1, 1, ActionName::Left)),
            InputOutcome::Ignored
        );
    }

    #[test]
    fn gravity_steps_live_boards() {
        let mut state = started();
        assert_eq!(state.apply_gravity(), 2);
        assert_eq!(state.game(Role::P1).unwrap().active().y, 1);
        assert_eq!(state.game(Role::P2).unwrap().active().y, 1);
    }

    #[test]
    fn snapshots_count_ticks_and_describe_each_player() {
        let mut state = started();
        let first = state.snapshot().unwrap();
        let second = state.snapshot().unwrap();
        assert_eq!(first.messages.len(), 2);
        match (&first.messages[0], &second.messages[1]) {
            (Message::Snapshot(a), Message::Snapshot(b)) => {
                assert_eq!(a.tick, 1);
                assert_eq!(a.user_id, P1);
                assert_eq!(a.role, Role::P1);
                assert_eq!(a.level, 1);
                assert_eq!(a.next.len(), 3);
                assert!(a.active.shape.is_some());
                assert_eq!(b.tick, 2);
                assert_eq!(b.role, Role::P2);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn survivor_wins_and_snapshots_stop() {
        let mut state = started();
        assert!(state.conclude().is_none());

        top_out(&mut state, Role::P1, P1, 1);
        assert_eq!(state.alive_players(), 1);

        let last = state.snapshot().unwrap();
        match &last.messages[0] {
            Message::Snapshot(s) => {
                assert!(s.game_over);
                assert!(s.active.shape.is_none());
            }
            other => panic!("unexpected {:?}", other),
        }

        let done = state.conclude().unwrap();
        assert_eq!(done.verdict, Verdict::Winner(Role::P2));
        assert_eq!(done.report.winner, Some(Role::P2));
        assert_eq!(done.report.room_id, ROOM);
        match &done.game_over {
            Message::GameOver(g) => {
                assert_eq!(g.winner, Some(P2));
                assert_eq!(g.results.len(), 2);
                assert_eq!(g.results[0].user_id, P1);
            }
            other => panic!("unexpected {:?}", other),
        }

        assert!(state.is_over());
        assert!(state.snapshot().is_none());
        assert!(state.conclude().is_none());
        assert_eq!(state.apply_gravity(), 0);
        let (late, _rx) = PeerHandle::channel(99);
        assert_eq!(
            state.join(&hello(ROOM, 7, true), late),
            Err(JoinRejection::MatchOver)
        );
    }

    #[test]
    fn both_topped_out_is_a_draw() {
        let mut state = started();
        top_out(&mut state, Role::P1, P1, 1);
        top_out(&mut state, Role::P2, P2, 1);

        let done = state.conclude().unwrap();
        assert_eq!(done.verdict, Verdict::Draw);
        match &done.game_over {
            Message::GameOver(g) => assert_eq!(g.winner, None),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn detach_keeps_seat_but_stops_delivery() {
        let mut state = started();
        let (spectator, _rx) = PeerHandle::channel(50);
        state.join(&hello(ROOM, 9000, true), spectator).unwrap();

        state.detach(1);
        state.detach(50);
        assert_eq!(state.spectator_count(), 0);
        assert_eq!(state.joined_players(), 2);

        let batch = state.snapshot().unwrap();
        let ids: Vec<PeerId> = batch.recipients.iter().map(|p| p.id()).collect();
        assert_eq!(ids, vec![2]);

        let (again, _rx) = PeerHandle::channel(3);
        assert_eq!(
            state.join(&hello(ROOM, P1, false), again),
            Err(JoinRejection::AlreadyConnected(P1))
        );
    }

    #[tokio::test]
    async fn actor_reports_joined_players() {
        let (session, mut joined) = SessionHandle::spawn(state());
        let (p1, _rx1) = PeerHandle::channel(1);
        let (p2, _rx2) = PeerHandle::channel(2);

        assert_eq!(session.join(hello(ROOM, P1, false), p1).await, Ok(Role::P1));
        assert!(!session.start().await.unwrap());
        assert_eq!(session.join(hello(ROOM, P2, false), p2).await, Ok(Role::P2));

        joined.wait_for(|n| *n == 2).await.unwrap();
        assert!(session.start().await.unwrap());
        assert!(session.snapshot().await.is_some());
        assert!(session.conclude().await.unwrap().is_none());
    }
}
