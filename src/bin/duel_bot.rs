//! Headless match client.
//!
//! Joins a match as a player or spectator, plays a fixed action pattern and
//! logs every snapshot. Useful for poking a running `tetris-match` by hand.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{info, warn};
use tokio::net::TcpStream;
use tokio::time::{interval, MissedTickBehavior};

use tetris_duel::core::rle;
use tetris_duel::types::{GameAction, BOARD_HEIGHT, BOARD_WIDTH, CELL_LOCKED};
use tetris_duel::wire::{
    create_hello, create_input, create_spectator_hello, send_message, FrameReader, Message,
    SnapshotMessage,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Match server address
    #[arg(short = 's', long, default_value = "127.0.0.1:9000")]
    server: String,

    /// Room to join
    #[arg(long)]
    room_id: u64,

    /// User id to announce in HELLO
    #[arg(long)]
    user_id: u64,

    /// Watch instead of playing
    #[arg(long)]
    spectator: bool,

    /// Milliseconds between inputs
    #[arg(long, default_value = "250")]
    rate: u64,

    /// Comma-separated actions to repeat (LEFT, RIGHT, DOWN, CW, CCW, HARD_DROP, HOLD)
    #[arg(long, default_value = "LEFT,CW,HARD_DROP,RIGHT,RIGHT,HARD_DROP")]
    pattern: String,
}

fn parse_pattern(text: &str) -> Result<Vec<GameAction>> {
    let actions = text
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| GameAction::from_str(s).with_context(|| format!("unknown action {:?}", s)))
        .collect::<Result<Vec<_>>>()?;
    if actions.is_empty() {
        bail!("action pattern is empty");
    }
    Ok(actions)
}

/// Rows from the first occupied row down to the floor
fn stack_height(board_rle: &str) -> Result<usize> {
    let rows = rle::decode(board_rle, BOARD_WIDTH as usize, BOARD_HEIGHT as usize)?;
    Ok(rows
        .iter()
        .position(|row| row.contains(&CELL_LOCKED))
        .map_or(0, |top| rows.len() - top))
}

fn log_snapshot(snapshot: &SnapshotMessage) {
    let height = match stack_height(&snapshot.board_rle) {
        Ok(h) => h.to_string(),
        Err(e) => format!("? ({})", e),
    };
    info!(
        "tick {} {} user {}: score {} lines {} level {} stack {}{}",
        snapshot.tick,
        snapshot.role,
        snapshot.user_id,
        snapshot.score,
        snapshot.lines,
        snapshot.level,
        height,
        if snapshot.game_over { " [topped out]" } else { "" }
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let pattern = parse_pattern(&args.pattern)?;

    let stream = TcpStream::connect(&args.server)
        .await
        .with_context(|| format!("failed to connect to {}", args.server))?;
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = FrameReader::new(read_half);

    let hello = if args.spectator {
        create_spectator_hello(args.room_id, args.user_id)
    } else {
        create_hello(args.room_id, args.user_id)
    };
    send_message(&mut write_half, &hello).await?;

    match reader.read_message().await.context("no WELCOME from server")? {
        Message::Welcome(welcome) => info!(
            "joined as {} (seed {}, bag {}, drop {}ms)",
            welcome.role, welcome.seed, welcome.bag_rule, welcome.gravity_plan.drop_ms
        ),
        other => bail!("expected WELCOME, got {}", other.kind()),
    }

    let mut ticker = interval(Duration::from_millis(args.rate.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut seq: u64 = 0;
    let mut actions = pattern.iter().cycle();

    loop {
        tokio::select! {
            _ = ticker.tick(), if !args.spectator => {
                let Some(&action) = actions.next() else { continue };
                seq += 1;
                if let Err(e) = send_message(&mut write_half, &create_input(args.user_id, seq, action)).await {
                    warn!("failed to send input {}: {}", seq, e);
                    break;
                }
            }
            message = reader.read_message() => match message {
                Ok(Message::Snapshot(snapshot)) => log_snapshot(&snapshot),
                Ok(Message::GameOver(over)) => {
                    match over.winner {
                        Some(user_id) => info!("game over, user {} wins", user_id),
                        None => info!("game over, draw"),
                    }
                    for result in &over.results {
                        info!(
                            "  user {}: score {}, lines {}, max combo {}",
                            result.user_id, result.score, result.lines, result.max_combo
                        );
                    }
                    break;
                }
                Ok(other) => info!("ignoring {}", other.kind()),
                Err(e) => {
                    warn!("connection ended: {}", e);
                    break;
                }
            },
        }
    }

    Ok(())
}
