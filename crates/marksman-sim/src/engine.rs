//! Simulation engine: the core of the game.
//!
//! `SimulationEngine` owns the hecs world of live targets and the
//! session's `GameState`, processes player commands, runs deferred
//! actions and systems, and produces `GameStateSnapshot`s. Headless.

use std::collections::VecDeque;

use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use marksman_core::commands::PlayerCommand;
use marksman_core::constants::{DEFAULT_ENVIRONMENT_ID, STARTING_WEAPON_ID};
use marksman_core::enums::GamePhase;
use marksman_core::environments::{self, EnvironmentConfig};
use marksman_core::error::CatalogError;
use marksman_core::events::GameEvent;
use marksman_core::state::{GameState, GameStateSnapshot};
use marksman_core::types::{Aim, SimTime};
use marksman_core::weapons::{WeaponCatalog, WeaponStats};

use crate::hit_test::{RayHitTest, SphereHitTest};
use crate::rejection::Rejection;
use crate::scheduler::{DeferredKind, Scheduler};
use crate::systems;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Arena id from the environment catalog.
    pub environment: String,
    /// Weapon every session starts with.
    pub starting_weapon: String,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            environment: DEFAULT_ENVIRONMENT_ID.to_string(),
            starting_weapon: STARTING_WEAPON_ID.to_string(),
        }
    }
}

/// Startup failures. Gameplay never produces these.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    Config(#[from] CatalogError),
}

/// The simulation engine. Owns the target world and all session state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    phase: GamePhase,
    state: GameState,
    rng: ChaCha8Rng,
    catalog: WeaponCatalog,
    starting_weapon: WeaponStats,
    environment: EnvironmentConfig,
    hit_test: Box<dyn RayHitTest>,
    scheduler: Scheduler,
    next_target_id: u32,
    command_queue: VecDeque<PlayerCommand>,
    events: Vec<GameEvent>,
}

impl SimulationEngine {
    /// Create an engine that resolves shots with the bounding-sphere hit test.
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        Self::with_hit_test(config, Box::new(SphereHitTest::default()))
    }

    /// Create an engine with a presentation-provided hit test.
    ///
    /// Fails if the configured weapon or environment ids are unknown.
    pub fn with_hit_test(
        config: SimConfig,
        hit_test: Box<dyn RayHitTest>,
    ) -> Result<Self, SimError> {
        let catalog = WeaponCatalog::standard();
        let starting_weapon = catalog.get(&config.starting_weapon)?.clone();
        let environment = environments::environment(&config.environment)?;

        log::info!(
            "simulation configured: seed {}, arena '{}', starting weapon '{}'",
            config.seed,
            environment.id,
            starting_weapon.id
        );

        Ok(Self {
            world: World::new(),
            time: SimTime::default(),
            phase: GamePhase::default(),
            state: GameState::new(starting_weapon.clone()),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            catalog,
            starting_weapon,
            environment,
            hit_test,
            scheduler: Scheduler::new(),
            next_target_id: 0,
            command_queue: VecDeque::new(),
            events: Vec::new(),
        })
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    ///
    /// The armory menu only blocks firing; targets, the combo window and
    /// deferred actions keep running while it is open.
    pub fn tick(&mut self) -> GameStateSnapshot {
        self.process_commands();

        if self.phase == GamePhase::Active {
            self.time.advance();
            self.run_deferred();
            self.run_systems();
        }

        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            self.phase,
            &self.state,
            &self.environment,
            events,
        )
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Get the session state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Get a read-only reference to the target world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn environment(&self) -> &EnvironmentConfig {
        &self.environment
    }

    /// Mutable session state (for tests that stage a scenario).
    #[cfg(test)]
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// Replace the playfield with hand-placed targets (for tests).
    #[cfg(test)]
    pub fn replace_targets(&mut self, targets: &[(marksman_core::enums::MovementPattern, glam::Vec3)]) {
        self.world.clear();
        for &(pattern, position) in targets {
            let id = marksman_core::components::TargetId(self.next_target_id);
            self.next_target_id += 1;
            let spec = crate::world_setup::make_target(&mut self.rng, id, position, pattern);
            crate::world_setup::spawn_target(&mut self.world, &spec);
        }
        self.state.targets_remaining = targets.len() as u32;
    }

    /// Whether a live deferred action of `kind` is waiting (for tests).
    #[cfg(test)]
    pub fn is_pending(&self, kind: DeferredKind) -> bool {
        self.scheduler.is_pending(kind)
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            if let Err(rejection) = self.handle_command(&command) {
                match rejection {
                    Rejection::UnknownWeapon(_) => {
                        log::warn!("{:?} ignored: {}", command, rejection)
                    }
                    _ => log::debug!("{:?} ignored: {}", command, rejection),
                }
            }
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: &PlayerCommand) -> Result<(), Rejection> {
        match command {
            PlayerCommand::StartGame => {
                self.start_session();
                Ok(())
            }
            _ if self.phase != GamePhase::Active => Err(Rejection::NotActive),
            PlayerCommand::Fire => systems::combat::fire(
                &mut self.world,
                &mut self.state,
                &mut self.rng,
                self.hit_test.as_ref(),
                &mut self.scheduler,
                &self.time,
                &mut self.events,
            )
            .map(|_| ()),
            PlayerCommand::Reload => systems::progression::reload(
                &mut self.state,
                &mut self.scheduler,
                &self.time,
                &mut self.events,
            ),
            PlayerCommand::Aim { yaw, pitch } => {
                self.state.aim = Aim::new(*yaw, *pitch);
                Ok(())
            }
            PlayerCommand::AimDelta { dx, dy } => {
                systems::progression::aim_delta(&mut self.state, *dx, *dy);
                Ok(())
            }
            PlayerCommand::CycleWeapon => {
                systems::progression::cycle_weapon(&mut self.state, &mut self.events);
                Ok(())
            }
            PlayerCommand::PurchaseWeapon { weapon_id } => {
                systems::progression::purchase_weapon(
                    &mut self.state,
                    &self.catalog,
                    weapon_id,
                    &mut self.events,
                )
            }
            PlayerCommand::UpgradeWeapon => {
                systems::progression::upgrade_current_weapon(&mut self.state, &mut self.events)
            }
            PlayerCommand::SetSensitivity { value } => {
                systems::progression::set_sensitivity(&mut self.state, *value)
            }
            PlayerCommand::OpenMenu => {
                self.state.menu_open = true;
                Ok(())
            }
            PlayerCommand::CloseMenu => {
                self.state.menu_open = false;
                Ok(())
            }
        }
    }

    /// Begin a fresh session. Pending deferred actions from any previous
    /// session are invalidated.
    fn start_session(&mut self) {
        let sensitivity = self.state.sensitivity;

        self.scheduler.invalidate_all();
        self.state = GameState::new(self.starting_weapon.clone());
        self.state.sensitivity = sensitivity;
        self.time = SimTime::default();
        self.next_target_id = 0;
        self.phase = GamePhase::Active;

        for (_entity, target) in self.world.query::<&marksman_core::components::Target>().iter() {
            self.events.push(GameEvent::TargetRemoved { id: target.id });
        }
        systems::wave_spawner::populate(
            &mut self.world,
            &mut self.rng,
            &mut self.state,
            &mut self.next_target_id,
            &mut self.events,
        );
        log::info!("session started");
    }

    /// Fire every deferred action that has come due.
    fn run_deferred(&mut self) {
        for kind in self.scheduler.take_due(self.time.tick) {
            match kind {
                DeferredKind::ReloadComplete => {
                    systems::progression::finish_reload(&mut self.state, &mut self.events);
                }
                DeferredKind::BulletTimeEnd => {
                    systems::progression::end_bullet_time(&mut self.state, &mut self.events);
                    log::info!("bullet time over");
                }
                DeferredKind::WaveAdvance => {
                    systems::wave_spawner::advance_wave(
                        &mut self.world,
                        &mut self.rng,
                        &mut self.state,
                        &mut self.next_target_id,
                        &mut self.events,
                    );
                }
            }
        }
    }

    /// Run all per-tick systems in order.
    fn run_systems(&mut self) {
        let dt = self.time.dt();

        // 1. Target motion (dilated by bullet time)
        let scaled_dt = (dt * self.state.time_scale()) as f32;
        systems::movement::run(&mut self.world, &mut self.rng, scaled_dt, self.time.elapsed_secs);
        // 2. Combo window (undilated)
        systems::progression::decay_combo(&mut self.state, dt);
    }
}
