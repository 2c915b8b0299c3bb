//! Tests for the simulation engine, combat resolver, progression and
//! wave pipeline.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use glam::Vec3;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use marksman_core::commands::PlayerCommand;
use marksman_core::components::{Target, TargetId};
use marksman_core::constants::*;
use marksman_core::enums::*;
use marksman_core::events::GameEvent;
use marksman_core::state::{GameState, GameStateSnapshot};
use marksman_core::types::{Position, Velocity};
use marksman_core::weapons::WeaponCatalog;

use crate::engine::{SimConfig, SimError, SimulationEngine};
use crate::hit_test::{HitCandidate, RayHit, RayHitTest, SphereHitTest};
use crate::rejection::Rejection;
use crate::scheduler::{delay_ticks, DeferredKind, Scheduler};
use crate::systems::{combat, movement, progression, wave_spawner};
use crate::world_setup;

// ---- Helpers ----

/// Hit test that always strikes the lowest-id live target (or never
/// hits), and counts how often it was asked.
struct ScriptedHitTest {
    hit: bool,
    calls: Arc<AtomicUsize>,
}

impl RayHitTest for ScriptedHitTest {
    fn query(&self, origin: Vec3, _direction: Vec3, candidates: &[HitCandidate]) -> Option<RayHit> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.hit {
            return None;
        }
        candidates.first().map(|c| RayHit {
            target: c.id,
            impact_point: c.position,
            distance: origin.distance(c.position),
        })
    }
}

fn scripted_engine(hit: bool) -> (SimulationEngine, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let hit_test = ScriptedHitTest {
        hit,
        calls: calls.clone(),
    };
    let mut engine =
        SimulationEngine::with_hit_test(SimConfig::default(), Box::new(hit_test)).unwrap();
    engine.queue_command(PlayerCommand::StartGame);
    engine.tick();
    (engine, calls)
}

fn tick_n(engine: &mut SimulationEngine, n: usize) -> Vec<GameStateSnapshot> {
    (0..n).map(|_| engine.tick()).collect()
}

fn fire(engine: &mut SimulationEngine) -> GameStateSnapshot {
    engine.queue_command(PlayerCommand::Fire);
    engine.tick()
}

/// Ticks covering the pistol's 300 ms fire rate.
const PISTOL_COOLDOWN_TICKS: usize = 18;

fn static_target_ahead() -> (MovementPattern, Vec3) {
    (MovementPattern::Static, Vec3::new(0.0, CAMERA_HEIGHT, -10.0))
}

fn fresh_state() -> GameState {
    GameState::new(WeaponCatalog::standard().get(STARTING_WEAPON_ID).unwrap().clone())
}

fn time_at(tick: u64) -> marksman_core::types::SimTime {
    let mut time = marksman_core::types::SimTime::default();
    for _ in 0..tick {
        time.advance();
    }
    time
}

// ---- Configuration ----

#[test]
fn test_unknown_starting_weapon_is_config_error() {
    let result = SimulationEngine::new(SimConfig {
        starting_weapon: "blaster".into(),
        ..Default::default()
    });
    assert!(matches!(result, Err(SimError::Config(_))));
}

#[test]
fn test_unknown_environment_is_config_error() {
    let result = SimulationEngine::new(SimConfig {
        environment: "volcano".into(),
        ..Default::default()
    });
    assert!(matches!(result, Err(SimError::Config(_))));
}

#[test]
fn test_sim_config_from_partial_json() {
    let config: SimConfig = serde_json::from_str(r#"{"seed": 7, "environment": "desert"}"#).unwrap();
    assert_eq!(config.seed, 7);
    assert_eq!(config.starting_weapon, STARTING_WEAPON_ID);
    let engine = SimulationEngine::new(config).unwrap();
    assert_eq!(engine.environment().name, "Desert Range");
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let mut engine_a = SimulationEngine::new(SimConfig {
        seed: 12345,
        ..Default::default()
    })
    .unwrap();
    let mut engine_b = SimulationEngine::new(SimConfig {
        seed: 12345,
        ..Default::default()
    })
    .unwrap();

    engine_a.queue_command(PlayerCommand::StartGame);
    engine_b.queue_command(PlayerCommand::StartGame);

    for i in 0..600 {
        if i % 10 == 0 {
            let aim = PlayerCommand::AimDelta {
                dx: (i % 70) as f32,
                dy: 0.0,
            };
            engine_a.queue_commands([aim.clone(), PlayerCommand::Fire]);
            engine_b.queue_commands([aim, PlayerCommand::Fire]);
        }
        let json_a = serde_json::to_string(&engine_a.tick()).unwrap();
        let json_b = serde_json::to_string(&engine_b.tick()).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

#[test]
fn test_determinism_different_seeds() {
    let mut engine_a = SimulationEngine::new(SimConfig {
        seed: 111,
        ..Default::default()
    })
    .unwrap();
    let mut engine_b = SimulationEngine::new(SimConfig {
        seed: 222,
        ..Default::default()
    })
    .unwrap();

    engine_a.queue_command(PlayerCommand::StartGame);
    engine_b.queue_command(PlayerCommand::StartGame);

    let snap_a = engine_a.tick();
    let snap_b = engine_b.tick();
    assert_ne!(
        serde_json::to_string(&snap_a.targets).unwrap(),
        serde_json::to_string(&snap_b.targets).unwrap(),
        "Different seeds should place targets differently"
    );
}

// ---- Session lifecycle ----

#[test]
fn test_commands_ignored_before_start() {
    let calls = Arc::new(AtomicUsize::new(0));
    let hit_test = ScriptedHitTest {
        hit: true,
        calls: calls.clone(),
    };
    let mut engine =
        SimulationEngine::with_hit_test(SimConfig::default(), Box::new(hit_test)).unwrap();

    let snap = fire(&mut engine);
    assert_eq!(snap.phase, GamePhase::MainMenu);
    assert_eq!(snap.hud.ammo, 12);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(snap.time.tick, 0, "Clock should not run in the main menu");
}

#[test]
fn test_start_game_spawns_first_wave() {
    let mut engine = SimulationEngine::new(SimConfig::default()).unwrap();
    engine.queue_command(PlayerCommand::StartGame);
    let snap = engine.tick();

    assert_eq!(snap.phase, GamePhase::Active);
    assert_eq!(snap.hud.wave, 1);
    assert_eq!(snap.hud.targets_remaining, 7);
    assert_eq!(snap.targets.len(), 7);
    assert_eq!(snap.hud.currency, 0, "No clear bonus for the first wave");

    let spawned = snap
        .events
        .iter()
        .filter(|e| matches!(e, GameEvent::TargetSpawned { .. }))
        .count();
    assert_eq!(spawned, 7);
    assert!(snap.events.contains(&GameEvent::WaveStarted {
        wave: 1,
        target_count: 7
    }));

    let weapon = snap.weapon.unwrap();
    assert_eq!(weapon.stats.id, STARTING_WEAPON_ID);
    assert_eq!(weapon.upgrade_cost, 250);
}

#[test]
fn test_restart_invalidates_pending_reload() {
    let (mut engine, _) = scripted_engine(false);

    engine.queue_command(PlayerCommand::Reload);
    engine.tick();
    assert!(engine.state().reloading);
    assert!(engine.is_pending(DeferredKind::ReloadComplete));

    engine.queue_command(PlayerCommand::StartGame);
    engine.tick();
    assert!(!engine.state().reloading);
    assert!(!engine.is_pending(DeferredKind::ReloadComplete));

    // Spend a round in the new session; the old reload must not refill it.
    fire(&mut engine);
    assert_eq!(engine.state().ammo, 11);
    tick_n(&mut engine, 200);
    assert_eq!(engine.state().ammo, 11);
}

#[test]
fn test_restart_keeps_sensitivity_and_resets_progress() {
    let (mut engine, _) = scripted_engine(true);
    engine.state_mut().score = 900;
    engine.state_mut().currency = 900;
    engine.queue_command(PlayerCommand::SetSensitivity { value: 1.5 });
    engine.tick();

    engine.queue_command(PlayerCommand::StartGame);
    let snap = engine.tick();
    assert_eq!(snap.hud.score, 0);
    assert_eq!(snap.hud.currency, 0);
    assert_eq!(snap.hud.sensitivity, 1.5);
    assert!(snap
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::TargetRemoved { .. })));
}

// ---- Combat ----

#[test]
fn test_pistol_kills_static_target_in_two_hits() {
    let (mut engine, calls) = scripted_engine(true);
    engine.replace_targets(&[static_target_ahead()]);

    let snap = fire(&mut engine);
    assert_eq!(snap.targets.len(), 1);
    assert_eq!(snap.targets[0].health, 25);
    assert_eq!(snap.hud.ammo, 11);
    assert!(snap
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::TargetHit { .. })));
    assert!(snap
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::ShotFired { .. })));

    tick_n(&mut engine, PISTOL_COOLDOWN_TICKS);
    let snap = fire(&mut engine);

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert!(snap.targets.is_empty());
    assert_eq!(snap.hud.targets_remaining, 0);
    assert_eq!(snap.hud.combo, 1);
    assert_eq!(snap.hud.combo_multiplier, 1);
    assert_eq!(snap.hud.score, 50);
    assert_eq!(snap.hud.currency, 5);
    assert_eq!(snap.hud.bullet_time_charge, 5.0);
    assert!(snap
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::TargetRemoved { id } if *id == TargetId(7))));
}

#[test]
fn test_sixth_kill_uses_multiplier_two() {
    let (mut engine, _) = scripted_engine(true);
    engine.replace_targets(&[static_target_ahead(); 6]);
    engine.state_mut().unlocked_weapons[0].damage = 100;

    let mut multipliers = Vec::new();
    for _ in 0..6 {
        let snap = fire(&mut engine);
        for event in &snap.events {
            if let GameEvent::TargetDestroyed { multiplier, .. } = event {
                multipliers.push(*multiplier);
            }
        }
        tick_n(&mut engine, PISTOL_COOLDOWN_TICKS);
    }

    assert_eq!(multipliers, vec![1, 1, 1, 1, 2, 2]);
    assert_eq!(engine.state().combo, 6);
    assert_eq!(engine.state().score, 50 * 4 + 100 * 2);
    assert_eq!(engine.state().currency, 5 * 4 + 10 * 2);
}

#[test]
fn test_fire_with_empty_magazine_is_noop() {
    let (mut engine, calls) = scripted_engine(true);
    engine.state_mut().ammo = 0;

    let snap = fire(&mut engine);
    assert_eq!(snap.hud.ammo, 0);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(!snap
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::ShotFired { .. })));
}

#[test]
fn test_fire_while_reloading_is_noop() {
    let (mut engine, calls) = scripted_engine(true);
    engine.queue_commands([PlayerCommand::Reload, PlayerCommand::Fire]);
    let snap = engine.tick();

    assert!(snap.hud.reloading);
    assert_eq!(snap.hud.ammo, 12);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_fire_rate_cooldown() {
    let (mut engine, calls) = scripted_engine(false);

    engine.queue_commands([PlayerCommand::Fire, PlayerCommand::Fire]);
    engine.tick();
    assert_eq!(engine.state().ammo, 11, "Second shot in the same instant is rejected");

    tick_n(&mut engine, PISTOL_COOLDOWN_TICKS - 2);
    fire(&mut engine);
    assert_eq!(engine.state().ammo, 11, "283 ms is inside the 300 ms window");

    fire(&mut engine);
    assert_eq!(engine.state().ammo, 10, "300 ms later the pistol fires again");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_fire_rejected_while_menu_open() {
    let (mut engine, calls) = scripted_engine(true);
    engine.queue_commands([PlayerCommand::OpenMenu, PlayerCommand::Fire]);
    let snap = engine.tick();
    assert!(snap.hud.menu_open);
    assert_eq!(snap.hud.ammo, 12);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_check_rejections_directly() {
    let mut world = hecs::World::new();
    let mut state = fresh_state();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let mut scheduler = Scheduler::new();
    let mut events = Vec::new();
    let hit_test = SphereHitTest::default();
    let time = time_at(10);

    state.reloading = true;
    let result = combat::fire(
        &mut world,
        &mut state,
        &mut rng,
        &hit_test,
        &mut scheduler,
        &time,
        &mut events,
    );
    assert_eq!(result, Err(Rejection::Reloading));

    state.reloading = false;
    let first = combat::fire(
        &mut world,
        &mut state,
        &mut rng,
        &hit_test,
        &mut scheduler,
        &time,
        &mut events,
    );
    assert_eq!(first, Ok(combat::ShotOutcome::Miss));
    let second = combat::fire(
        &mut world,
        &mut state,
        &mut rng,
        &hit_test,
        &mut scheduler,
        &time,
        &mut events,
    );
    assert!(matches!(second, Err(Rejection::Cooldown { .. })));
}

#[test]
fn test_sphere_hit_test_through_engine() {
    let mut engine = SimulationEngine::new(SimConfig::default()).unwrap();
    engine.queue_command(PlayerCommand::StartGame);
    engine.tick();
    engine.replace_targets(&[static_target_ahead()]);

    let snap = fire(&mut engine);
    assert_eq!(snap.targets[0].health, 25, "Pistol spread is far below the hit radius");
}

#[test]
fn test_shot_direction_spread_bounds() {
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    let forward = Vec3::NEG_Z;
    for _ in 0..1000 {
        let dir = combat::shot_direction(forward, 0.03, &mut rng);
        assert!((dir.length() - 1.0).abs() < 1e-5);
        assert!(dir.x.abs() <= 0.015 + 1e-6);
        assert!(dir.y.abs() <= 0.015 + 1e-6);
    }
    let exact = combat::shot_direction(forward, 0.0, &mut rng);
    assert_eq!(exact, forward);
}

#[test]
fn test_register_kill_caps_multiplier() {
    let mut state = fresh_state();
    state.combo = 40;
    let reward = combat::register_kill(&mut state, 150);
    assert_eq!(reward.multiplier, 5);
    assert_eq!(reward.points, 750);
    assert_eq!(reward.currency, 75);
    assert_eq!(state.combo_timer, COMBO_WINDOW_SECS);
}

// ---- Bullet time ----

#[test]
fn test_bullet_time_activates_once_and_expires() {
    let (mut engine, _) = scripted_engine(true);
    engine.replace_targets(&[static_target_ahead(); 3]);
    engine.state_mut().unlocked_weapons[0].damage = 100;
    engine.state_mut().bullet_time_charge = 95.0;

    let snap = fire(&mut engine);
    assert!(snap.hud.bullet_time_active);
    assert_eq!(snap.hud.bullet_time_charge, 100.0);
    assert!(snap.events.contains(&GameEvent::BulletTimeStarted));

    tick_n(&mut engine, PISTOL_COOLDOWN_TICKS);
    let snap = fire(&mut engine);
    assert!(snap.hud.bullet_time_active);
    assert_eq!(snap.hud.bullet_time_charge, 100.0, "Charge never exceeds 100");
    assert!(!snap.events.contains(&GameEvent::BulletTimeStarted));

    // Activation was 1 + 18 + 1 ticks ago.
    let ticks_left = delay_ticks(BULLET_TIME_DURATION_SECS) as usize - PISTOL_COOLDOWN_TICKS - 3;
    tick_n(&mut engine, ticks_left);
    assert!(engine.state().bullet_time_active);
    let snap = engine.tick();
    assert!(!snap.hud.bullet_time_active);
    assert_eq!(snap.hud.bullet_time_charge, 0.0);
    assert!(snap.events.contains(&GameEvent::BulletTimeEnded));
}

#[test]
fn test_bullet_time_expires_while_menu_open() {
    let (mut engine, _) = scripted_engine(true);
    engine.replace_targets(&[static_target_ahead(); 2]);
    engine.state_mut().unlocked_weapons[0].damage = 100;
    engine.state_mut().bullet_time_charge = 95.0;

    fire(&mut engine);
    engine.queue_command(PlayerCommand::OpenMenu);
    tick_n(&mut engine, delay_ticks(BULLET_TIME_DURATION_SECS) as usize);

    assert!(engine.state().menu_open);
    assert!(!engine.state().bullet_time_active);
}

#[test]
fn test_bullet_time_slows_linear_targets_only() {
    let target = Target {
        id: TargetId(0),
        points: 100,
        pattern: MovementPattern::Linear,
        phase_offset: 0.0,
    };
    let mut rng = ChaCha8Rng::seed_from_u64(3);

    let mut pos_normal = Position::new(0.0, 2.0, 0.0);
    let mut vel_normal = Velocity::new(3.0, 0.0, 0.0);
    movement::update_target(&target, &mut pos_normal, &mut vel_normal, 1.0, 0.0, &mut rng);

    let mut pos_slow = Position::new(0.0, 2.0, 0.0);
    let mut vel_slow = Velocity::new(3.0, 0.0, 0.0);
    movement::update_target(
        &target,
        &mut pos_slow,
        &mut vel_slow,
        BULLET_TIME_SCALE as f32,
        0.0,
        &mut rng,
    );

    assert!((pos_normal.0.x - 3.0).abs() < 1e-6);
    assert!((pos_slow.0.x - 0.9).abs() < 1e-6);

    // Circular movers only read the clock, so dt has no effect.
    let circular = Target {
        pattern: MovementPattern::Circular,
        phase_offset: 0.5,
        ..target
    };
    let mut a = Position::new(20.0, 3.0, 0.0);
    let mut b = a;
    let mut va = Velocity::default();
    let mut vb = Velocity::default();
    movement::update_target(&circular, &mut a, &mut va, 1.0, 12.0, &mut rng);
    movement::update_target(&circular, &mut b, &mut vb, 0.3, 12.0, &mut rng);
    assert_eq!(a, b);
    assert!((a.ring_radius() - CIRCULAR_RADIUS).abs() < 1e-3);
    assert_eq!(a.height(), 3.0);
}

// ---- Movement ----

#[test]
fn test_static_target_never_moves() {
    let target = Target {
        id: TargetId(0),
        points: 50,
        pattern: MovementPattern::Static,
        phase_offset: 1.0,
    };
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let mut pos = Position::new(5.0, 2.0, 5.0);
    let mut vel = Velocity::default();
    for i in 0..100 {
        movement::update_target(&target, &mut pos, &mut vel, 0.1, i as f64, &mut rng);
    }
    assert_eq!(pos, Position::new(5.0, 2.0, 5.0));
}

#[test]
fn test_linear_target_bounces_at_bounds() {
    let target = Target {
        id: TargetId(0),
        points: 100,
        pattern: MovementPattern::Linear,
        phase_offset: 0.0,
    };
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let mut pos = Position::new(29.5, 2.0, -29.5);
    let mut vel = Velocity::new(1.0, 0.0, -1.0);

    movement::update_target(&target, &mut pos, &mut vel, 1.0, 0.0, &mut rng);
    assert_eq!(vel, Velocity::new(-1.0, 0.0, 1.0));
}

#[test]
fn test_erratic_target_stays_in_bounds() {
    let target = Target {
        id: TargetId(0),
        points: 150,
        pattern: MovementPattern::Erratic,
        phase_offset: 0.0,
    };
    let mut rng = ChaCha8Rng::seed_from_u64(77);
    let mut pos = Position::new(0.0, 3.0, 25.0);
    let mut vel = Velocity::new(40.0, 40.0, 40.0);

    for _ in 0..5_000 {
        movement::update_target(&target, &mut pos, &mut vel, DT as f32, 0.0, &mut rng);
        assert!(pos.ring_radius() <= ARENA_BOUND + 1e-3);
        assert!(pos.height() >= ERRATIC_HEIGHT_MIN && pos.height() <= ERRATIC_HEIGHT_MAX);
    }
}

#[test]
fn test_world_keeps_running_while_menu_open() {
    let (mut engine, _) = scripted_engine(false);
    engine.replace_targets(&[
        (MovementPattern::Linear, Vec3::new(0.0, 2.0, -15.0)),
        (MovementPattern::Circular, Vec3::new(20.0, 3.0, 0.0)),
    ]);
    engine.state_mut().combo = 4;
    engine.state_mut().combo_multiplier = 1;
    engine.state_mut().combo_timer = 0.5;

    engine.queue_command(PlayerCommand::OpenMenu);
    let opened = engine.tick();
    assert!(opened.hud.menu_open);

    let later = tick_n(&mut engine, 60).pop().unwrap();
    assert!(later.hud.menu_open);
    assert_eq!(later.hud.combo, 0, "Combo window expires behind the menu");
    assert_eq!(later.hud.combo_multiplier, 1);
    assert_eq!(later.hud.combo_timer, 0.0);
    for (before, after) in opened.targets.iter().zip(&later.targets) {
        assert_ne!(before.position, after.position, "Target {:?} froze", before.id);
    }
}

// ---- Waves ----

proptest! {
    #[test]
    fn prop_spawn_wave_size_and_ring(wave in 1u32..200, seed in any::<u64>()) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut next_id = 0;
        let specs = wave_spawner::spawn_wave(&mut rng, wave, &mut next_id);

        prop_assert_eq!(specs.len() as u32, (5 + 2 * wave).min(20));
        prop_assert_eq!(next_id as usize, specs.len());
        for spec in &specs {
            let radius = spec.position.ring_radius();
            prop_assert!((SPAWN_RADIUS_MIN - 1e-3..=SPAWN_RADIUS_MAX + 1e-3).contains(&radius));
            let height = spec.position.height();
            prop_assert!((SPAWN_HEIGHT_MIN..=SPAWN_HEIGHT_MAX).contains(&height));
            prop_assert_eq!(spec.target.points, spec.target.pattern.base_points());
            prop_assert_eq!(spec.health.current, spec.health.max);
        }
    }
}

#[test]
fn test_wave_size_caps_at_twenty() {
    assert_eq!(wave_spawner::wave_size(1), 7);
    assert_eq!(wave_spawner::wave_size(7), 19);
    assert_eq!(wave_spawner::wave_size(8), 20);
    assert_eq!(wave_spawner::wave_size(u32::MAX), 20);
}

#[test]
fn test_pattern_weights() {
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let draws = 20_000;
    let mut counts = [0usize; 4];
    for _ in 0..draws {
        let idx = match world_setup::roll_pattern(&mut rng) {
            MovementPattern::Static => 0,
            MovementPattern::Linear => 1,
            MovementPattern::Circular => 2,
            MovementPattern::Erratic => 3,
        };
        counts[idx] += 1;
    }
    let expected = [0.30, 0.40, 0.15, 0.15];
    for (count, share) in counts.iter().zip(expected) {
        let observed = *count as f64 / draws as f64;
        assert!(
            (observed - share).abs() < 0.02,
            "observed {observed}, expected {share}"
        );
    }
}

#[test]
fn test_target_points_and_health_by_pattern() {
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let cases = [
        (MovementPattern::Static, 50, 50),
        (MovementPattern::Linear, 100, 100),
        (MovementPattern::Circular, 150, 100),
        (MovementPattern::Erratic, 150, 100),
    ];
    for (pattern, points, health) in cases {
        let spec = world_setup::make_target(&mut rng, TargetId(1), Vec3::ZERO, pattern);
        assert_eq!(spec.target.points, points);
        assert_eq!(spec.health.max, health);
        assert!(TARGET_PALETTE.contains(&spec.visual.color));
        match pattern {
            MovementPattern::Static | MovementPattern::Circular => {
                assert_eq!(spec.velocity.speed(), 0.0)
            }
            MovementPattern::Linear => assert_eq!(spec.velocity.0.y, 0.0),
            MovementPattern::Erratic => {}
        }
    }
}

#[test]
fn test_cleared_wave_advances_after_two_seconds() {
    let (mut engine, _) = scripted_engine(true);
    engine.replace_targets(&[static_target_ahead()]);
    engine.state_mut().unlocked_weapons[0].damage = 100;

    let snap = fire(&mut engine);
    assert_eq!(snap.hud.targets_remaining, 0);
    assert!(snap.events.contains(&GameEvent::WaveCleared { wave: 1 }));
    let currency_after_kill = snap.hud.currency;

    let wait = delay_ticks(WAVE_ADVANCE_DELAY_SECS) as usize;
    let snaps = tick_n(&mut engine, wait - 2);
    assert_eq!(snaps.last().unwrap().hud.wave, 1);

    let snap = engine.tick();
    assert_eq!(snap.hud.wave, 2);
    assert_eq!(snap.hud.targets_remaining, 9);
    assert_eq!(snap.targets.len(), 9);
    assert_eq!(snap.hud.currency, currency_after_kill + WAVE_CLEAR_BONUS);
    assert!(snap.events.contains(&GameEvent::WaveStarted {
        wave: 2,
        target_count: 9
    }));
}

// ---- Reload / weapons ----

#[test]
fn test_empty_magazine_auto_reloads() {
    let (mut engine, _) = scripted_engine(false);
    engine.state_mut().ammo = 1;

    let snap = fire(&mut engine);
    assert_eq!(snap.hud.ammo, 0);
    assert!(snap.hud.reloading);
    assert!(snap
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::ReloadStarted { duration_secs } if *duration_secs == 1.5)));

    let reload_ticks = delay_ticks(1.5) as usize;
    tick_n(&mut engine, reload_ticks - 2);
    assert!(engine.state().reloading);
    assert_eq!(engine.state().ammo, 0);

    let snap = engine.tick();
    assert!(!snap.hud.reloading);
    assert_eq!(snap.hud.ammo, 12);
    assert!(snap.events.contains(&GameEvent::ReloadFinished));
}

#[test]
fn test_reload_while_reloading_is_noop() {
    let mut state = fresh_state();
    let mut scheduler = Scheduler::new();
    let mut events = Vec::new();
    let time = time_at(0);

    assert!(progression::reload(&mut state, &mut scheduler, &time, &mut events).is_ok());
    assert_eq!(
        progression::reload(&mut state, &mut scheduler, &time, &mut events),
        Err(Rejection::AlreadyReloading)
    );
    assert_eq!(scheduler.pending_count(), 1);
}

#[test]
fn test_cycle_weapon_wraps_and_refills() {
    let (mut engine, _) = scripted_engine(false);
    engine.state_mut().currency = 600;
    engine.queue_command(PlayerCommand::PurchaseWeapon {
        weapon_id: "smg_basic".into(),
    });
    let snap = engine.tick();
    assert_eq!(snap.hud.currency, 100);
    assert_eq!(snap.unlocked_weapons.len(), 2);
    assert_eq!(snap.weapon.unwrap().stats.id, "pistol_basic", "Purchase does not equip");

    engine.state_mut().ammo = 3;
    engine.queue_command(PlayerCommand::CycleWeapon);
    let snap = engine.tick();
    assert_eq!(snap.weapon.unwrap().stats.id, "smg_basic");
    assert_eq!(snap.hud.ammo, 30);

    engine.queue_command(PlayerCommand::CycleWeapon);
    let snap = engine.tick();
    assert_eq!(snap.weapon.unwrap().stats.id, "pistol_basic");
    assert_eq!(snap.hud.ammo, 12);
}

#[test]
fn test_cycle_single_weapon_refills_magazine() {
    let mut state = fresh_state();
    let mut events = Vec::new();
    state.ammo = 2;
    state.reloading = true;
    progression::cycle_weapon(&mut state, &mut events);
    assert_eq!(state.current_weapon, 0);
    assert_eq!(state.ammo, 12);
    assert!(state.reloading, "Switching leaves the reload flag alone");
}

#[test]
fn test_purchase_rejections_leave_state_unchanged() {
    let catalog = WeaponCatalog::standard();
    let mut state = fresh_state();
    let mut events = Vec::new();
    state.currency = 400;

    assert_eq!(
        progression::purchase_weapon(&mut state, &catalog, "smg_basic", &mut events),
        Err(Rejection::InsufficientFunds {
            needed: 500,
            available: 400
        })
    );
    assert_eq!(
        progression::purchase_weapon(&mut state, &catalog, "pistol_basic", &mut events),
        Err(Rejection::AlreadyOwned("pistol_basic".into()))
    );
    assert_eq!(
        progression::purchase_weapon(&mut state, &catalog, "laser", &mut events),
        Err(Rejection::UnknownWeapon("laser".into()))
    );
    assert_eq!(state.currency, 400);
    assert_eq!(state.unlocked_weapons.len(), 1);
    assert!(events.is_empty());
}

#[test]
fn test_purchased_weapon_is_base_level_and_unique() {
    let catalog = WeaponCatalog::standard();
    let mut state = fresh_state();
    let mut events = Vec::new();
    state.currency = 5_000;

    progression::purchase_weapon(&mut state, &catalog, "rifle_basic", &mut events).unwrap();
    assert!(progression::purchase_weapon(&mut state, &catalog, "rifle_basic", &mut events).is_err());
    assert_eq!(state.currency, 4_000);
    let rifle = state.unlocked_weapons.last().unwrap();
    assert_eq!(rifle.level, 1);
    assert_eq!(rifle, catalog.get("rifle_basic").unwrap());
}

#[test]
fn test_upgrade_current_weapon() {
    let (mut engine, _) = scripted_engine(false);
    engine.state_mut().currency = 600;

    engine.queue_command(PlayerCommand::UpgradeWeapon);
    let snap = engine.tick();
    assert_eq!(snap.hud.currency, 350);
    let weapon = snap.weapon.unwrap();
    assert_eq!(weapon.stats.level, 2);
    assert_eq!(weapon.stats.damage, 30);
    assert_eq!(weapon.upgrade_cost, 500);
    assert_eq!(snap.unlocked_weapons[0].level, 2);

    // 350 < 500: rejected, nothing changes.
    engine.queue_command(PlayerCommand::UpgradeWeapon);
    let snap = engine.tick();
    assert_eq!(snap.hud.currency, 350);
    assert_eq!(snap.weapon.unwrap().stats.level, 2);
}

#[test]
fn test_upgrade_survives_weapon_cycling() {
    let catalog = WeaponCatalog::standard();
    let mut state = fresh_state();
    let mut events = Vec::new();
    state.currency = 2_000;

    progression::purchase_weapon(&mut state, &catalog, "smg_basic", &mut events).unwrap();
    progression::upgrade_current_weapon(&mut state, &mut events).unwrap();
    progression::cycle_weapon(&mut state, &mut events);
    progression::cycle_weapon(&mut state, &mut events);

    assert_eq!(state.weapon().id, "pistol_basic");
    assert_eq!(state.weapon().level, 2);
    assert_eq!(state.unlocked_weapons[1].level, 1);
}

// ---- Combo ----

#[test]
fn test_combo_resets_after_window() {
    let (mut engine, _) = scripted_engine(true);
    engine.replace_targets(&[static_target_ahead(); 2]);
    engine.state_mut().unlocked_weapons[0].damage = 100;

    fire(&mut engine);
    assert_eq!(engine.state().combo, 1);

    tick_n(&mut engine, 170);
    assert_eq!(engine.state().combo, 1);
    assert!(engine.state().combo_timer > 0.0);

    tick_n(&mut engine, 15);
    assert_eq!(engine.state().combo, 0);
    assert_eq!(engine.state().combo_multiplier, 1);
    assert_eq!(engine.state().combo_timer, 0.0);
}

#[test]
fn test_decay_combo_ignores_idle_timer() {
    let mut state = fresh_state();
    state.combo = 3;
    state.combo_timer = 0.0;
    progression::decay_combo(&mut state, 1.0);
    assert_eq!(state.combo, 3, "Only a running timer can expire");
}

// ---- Settings / aim ----

#[test]
fn test_sensitivity_scales_aim_and_clamps() {
    let (mut engine, _) = scripted_engine(false);
    engine.queue_commands([
        PlayerCommand::SetSensitivity { value: 2.0 },
        PlayerCommand::AimDelta { dx: 100.0, dy: 0.0 },
    ]);
    let snap = engine.tick();
    assert!((snap.hud.aim.yaw + 0.4).abs() < 1e-6);

    engine.queue_command(PlayerCommand::SetSensitivity { value: 9.0 });
    let snap = engine.tick();
    assert_eq!(snap.hud.sensitivity, SENSITIVITY_MAX);

    engine.queue_command(PlayerCommand::SetSensitivity { value: f32::NAN });
    let snap = engine.tick();
    assert_eq!(snap.hud.sensitivity, SENSITIVITY_MAX);
}

#[test]
fn test_aim_command_clamps_pitch() {
    let (mut engine, _) = scripted_engine(false);
    engine.queue_command(PlayerCommand::Aim {
        yaw: 1.0,
        pitch: 3.0,
    });
    let snap = engine.tick();
    assert_eq!(snap.hud.aim.yaw, 1.0);
    assert_eq!(snap.hud.aim.pitch, AIM_PITCH_LIMIT);
}

// ---- Scheduler ----

#[test]
fn test_scheduler_supersedes_same_kind() {
    let mut scheduler = Scheduler::new();
    scheduler.schedule(DeferredKind::BulletTimeEnd, 0, 1.0);
    scheduler.schedule(DeferredKind::BulletTimeEnd, 30, 1.0);

    assert!(scheduler.take_due(60).is_empty(), "First timer was superseded");
    assert_eq!(scheduler.take_due(90), vec![DeferredKind::BulletTimeEnd]);
    assert_eq!(scheduler.pending_count(), 0);
}

#[test]
fn test_scheduler_orders_due_actions() {
    let mut scheduler = Scheduler::new();
    scheduler.schedule(DeferredKind::WaveAdvance, 0, 2.0);
    scheduler.schedule(DeferredKind::ReloadComplete, 0, 1.5);
    assert_eq!(
        scheduler.take_due(500),
        vec![DeferredKind::ReloadComplete, DeferredKind::WaveAdvance]
    );
}

#[test]
fn test_scheduler_invalidate_all() {
    let mut scheduler = Scheduler::new();
    scheduler.schedule(DeferredKind::ReloadComplete, 0, 1.0);
    scheduler.schedule(DeferredKind::WaveAdvance, 0, 1.0);
    scheduler.invalidate_all();
    assert!(!scheduler.is_pending(DeferredKind::ReloadComplete));
    assert!(scheduler.take_due(1_000).is_empty());
}

#[test]
fn test_delay_ticks() {
    assert_eq!(delay_ticks(1.5), 90);
    assert_eq!(delay_ticks(2.0), 120);
    assert_eq!(delay_ticks(5.0), 300);
    assert_eq!(delay_ticks(0.0), 1);
}

// ---- Hit test ----

#[test]
fn test_sphere_hit_test_returns_nearest() {
    let hit_test = SphereHitTest::default();
    let origin = Vec3::ZERO;
    let candidates = [
        HitCandidate {
            id: TargetId(1),
            position: Vec3::new(0.0, 0.0, -20.0),
        },
        HitCandidate {
            id: TargetId(2),
            position: Vec3::new(0.0, 0.0, -10.0),
        },
        HitCandidate {
            id: TargetId(3),
            position: Vec3::new(5.0, 0.0, -5.0),
        },
    ];
    let hit = hit_test.query(origin, Vec3::NEG_Z, &candidates).unwrap();
    assert_eq!(hit.target, TargetId(2));
    assert!((hit.distance - (10.0 - TARGET_HIT_RADIUS)).abs() < 1e-4);
    assert!((hit.impact_point.z + 10.0 - TARGET_HIT_RADIUS).abs() < 1e-4);
}

#[test]
fn test_sphere_hit_test_misses_behind_and_beside() {
    let hit_test = SphereHitTest::default();
    let candidates = [
        HitCandidate {
            id: TargetId(1),
            position: Vec3::new(0.0, 0.0, 10.0),
        },
        HitCandidate {
            id: TargetId(2),
            position: Vec3::new(3.0, 0.0, -10.0),
        },
    ];
    assert!(hit_test.query(Vec3::ZERO, Vec3::NEG_Z, &candidates).is_none());
    assert!(hit_test.query(Vec3::ZERO, Vec3::ZERO, &candidates).is_none());
}
