//! Application state shared between the host and the game loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use marksman_core::commands::PlayerCommand;
use marksman_core::state::GameStateSnapshot;
use marksman_sim::SimConfig;

use crate::error::AppError;
use crate::game_loop;

/// Commands sent from the host to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A player command to forward to the simulation engine.
    PlayerCommand(PlayerCommand),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// Handle to a running game loop.
struct LoopHandle {
    command_tx: mpsc::Sender<GameLoopCommand>,
    thread: JoinHandle<()>,
}

/// Shared application state.
///
/// The engine itself lives on the game loop thread; the host only holds
/// the command channel and the most recent snapshot.
pub struct AppState {
    /// `None` until `start` is called.
    handle: Mutex<Option<LoopHandle>>,
    /// Latest snapshot, updated by the game loop thread after each tick.
    pub latest_snapshot: Arc<Mutex<Option<GameStateSnapshot>>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            handle: Mutex::new(None),
            latest_snapshot: Arc::new(Mutex::new(None)),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the engine from `config` and start ticking it.
    pub fn start(&self, config: SimConfig) -> Result<(), AppError> {
        let mut handle = self.handle.lock().map_err(|_| AppError::LoopPanicked)?;
        if handle.is_some() {
            return Err(AppError::AlreadyRunning);
        }
        let (command_tx, thread) =
            game_loop::spawn_game_loop(config, Arc::clone(&self.latest_snapshot))?;
        *handle = Some(LoopHandle { command_tx, thread });
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.handle.lock().map(|h| h.is_some()).unwrap_or(false)
    }

    /// Forward a player command to the engine.
    pub fn send(&self, command: PlayerCommand) -> Result<(), AppError> {
        let handle = self.handle.lock().map_err(|_| AppError::LoopPanicked)?;
        let handle = handle.as_ref().ok_or(AppError::NotRunning)?;
        handle
            .command_tx
            .send(GameLoopCommand::PlayerCommand(command))
            .map_err(|_| AppError::NotRunning)
    }

    /// Most recent snapshot, if the loop has ticked at least once.
    pub fn snapshot(&self) -> Option<GameStateSnapshot> {
        self.latest_snapshot.lock().ok().and_then(|s| s.clone())
    }

    /// Stop the loop and wait for its thread to exit.
    pub fn shutdown(&self) -> Result<(), AppError> {
        let handle = self
            .handle
            .lock()
            .map_err(|_| AppError::LoopPanicked)?
            .take()
            .ok_or(AppError::NotRunning)?;
        // The loop also exits on disconnect, so a failed send is fine.
        let _ = handle.command_tx.send(GameLoopCommand::Shutdown);
        handle.thread.join().map_err(|_| AppError::LoopPanicked)
    }
}
