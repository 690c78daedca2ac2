//! Match server (default binary).
//!
//! One process runs one match: it binds, waits for the two configured
//! players, plays until a verdict and reports the result to the lobby.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use rand::Rng;

use tetris_duel::session::{run_match, MatchConfig, Verdict};
use tetris_duel::types::{DEFAULT_DROP_MS, SNAPSHOT_INTERVAL_MS};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to bind to
    #[arg(long, env = "TETRIS_MATCH_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(short, long, env = "TETRIS_MATCH_PORT")]
    port: u16,

    /// Room this match serves
    #[arg(long, env = "TETRIS_MATCH_ROOM_ID")]
    room_id: u64,

    /// User id seated as P1
    #[arg(long, env = "TETRIS_MATCH_PLAYER1")]
    player1: u64,

    /// User id seated as P2
    #[arg(long, env = "TETRIS_MATCH_PLAYER2")]
    player2: u64,

    /// Gravity interval in milliseconds
    #[arg(long, env = "TETRIS_MATCH_DROP_INTERVAL", default_value_t = DEFAULT_DROP_MS)]
    drop_interval: u64,

    /// Snapshot interval in milliseconds
    #[arg(long, env = "TETRIS_MATCH_SNAPSHOT_INTERVAL", default_value_t = SNAPSHOT_INTERVAL_MS)]
    snapshot_interval: u64,

    /// Piece seed shared by both players (random when omitted)
    #[arg(long, env = "TETRIS_MATCH_SEED")]
    seed: Option<u32>,

    /// Lobby `host:port` that receives the result
    #[arg(long, env = "TETRIS_MATCH_LOBBY")]
    lobby: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let seed = args
        .seed
        .unwrap_or_else(|| rand::thread_rng().gen_range(1..=i32::MAX as u32));

    let config = MatchConfig {
        host: args.host,
        port: args.port,
        drop_interval: Duration::from_millis(args.drop_interval),
        snapshot_interval: Duration::from_millis(args.snapshot_interval),
        lobby_addr: args.lobby,
        ..MatchConfig::new(args.room_id, [args.player1, args.player2], seed)
    };
    let room_id = config.room_id;

    tokio::select! {
        result = run_match(config, None) => {
            let outcome = result.with_context(|| format!("match for room {} failed", room_id))?;
            match outcome.verdict {
                Verdict::Winner(role) => info!("room {} finished, {} won", room_id, role),
                Verdict::Draw => info!("room {} finished in a draw", room_id),
            }
            for result in &outcome.results {
                info!(
                    "  {} user {}: score {}, lines {}, max combo {}",
                    result.role, result.user_id, result.score, result.lines, result.max_combo
                );
            }
        }
        _ = tokio::signal::ctrl_c() => {
            warn!("interrupted, stopping room {}", room_id);
        }
    }

    Ok(())
}
