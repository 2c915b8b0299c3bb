//! Game loop thread: runs the simulation engine at 60Hz and publishes
//! snapshots.
//!
//! The engine is built on the calling thread so configuration errors
//! surface before anything is spawned, then moved into the loop thread.
//! Commands arrive via `mpsc` channel. Snapshots are stored in shared
//! state for polling.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use marksman_core::commands::PlayerCommand;
use marksman_core::constants::TICK_RATE;
use marksman_core::events::GameEvent;
use marksman_core::state::GameStateSnapshot;
use marksman_sim::{SimConfig, SimulationEngine};

use crate::error::AppError;
use crate::state::GameLoopCommand;

/// Nominal duration of one tick.
const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Spawns the game loop in a new thread.
///
/// Returns the command sender and the thread handle.
pub fn spawn_game_loop(
    config: SimConfig,
    latest_snapshot: Arc<Mutex<Option<GameStateSnapshot>>>,
) -> Result<(mpsc::Sender<GameLoopCommand>, JoinHandle<()>), AppError> {
    let engine = SimulationEngine::new(config)?;
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    let thread = std::thread::Builder::new()
        .name("marksman-game-loop".into())
        .spawn(move || {
            run_game_loop(engine, cmd_rx, &latest_snapshot);
        })
        .map_err(AppError::Spawn)?;

    Ok((cmd_tx, thread))
}

/// The game loop. Runs until Shutdown command or channel disconnect.
fn run_game_loop(
    mut engine: SimulationEngine,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<GameStateSnapshot>>,
) {
    let mut next_tick_time = Instant::now();
    log::debug!("game loop started");

    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::PlayerCommand(cmd)) => {
                    engine.queue_command(cmd);
                }
                Ok(GameLoopCommand::Shutdown) | Err(mpsc::TryRecvError::Disconnected) => {
                    log::debug!("game loop stopped at tick {}", engine.time().tick);
                    return;
                }
                Err(mpsc::TryRecvError::Empty) => break,
            }
        }

        // 2. Advance one tick
        let snapshot = engine.tick();
        log_events(&snapshot.events);

        // 3. Store latest snapshot for polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        // 4. Sleep until next tick. Bullet time slows targets, not the loop.
        next_tick_time += TICK_DURATION;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > TICK_DURATION * 2 {
            // Too far behind: reset to avoid catch-up spiral
            next_tick_time = now;
        }
    }
}

/// Run `ticks` ticks back to back on the calling thread.
///
/// `driver` sees every snapshot and returns the commands for the next tick.
/// Returns the final snapshot.
pub fn run_headless(
    engine: &mut SimulationEngine,
    ticks: u64,
    mut driver: impl FnMut(&GameStateSnapshot) -> Vec<PlayerCommand>,
) -> GameStateSnapshot {
    let mut snapshot = engine.tick();
    log_events(&snapshot.events);
    for _ in 1..ticks {
        engine.queue_commands(driver(&snapshot));
        snapshot = engine.tick();
        log_events(&snapshot.events);
    }
    snapshot
}

/// Log the notable events of one tick.
pub fn log_events(events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::TargetDestroyed {
                id,
                reward,
                combo,
                multiplier,
            } => log::debug!("target {} down: +{} (combo {}, x{})", id.0, reward, combo, multiplier),
            GameEvent::WeaponPurchased { weapon_id, cost } => {
                log::info!("bought {} for {}", weapon_id, cost)
            }
            GameEvent::WeaponUpgraded {
                weapon_id,
                level,
                cost,
            } => log::info!("upgraded {} to level {} for {}", weapon_id, level, cost),
            GameEvent::WeaponSwitched { weapon_id } => log::debug!("switched to {}", weapon_id),
            GameEvent::BulletTimeStarted => log::debug!("bullet time started"),
            GameEvent::BulletTimeEnded => log::debug!("bullet time ended"),
            _ => {}
        }
    }
}
