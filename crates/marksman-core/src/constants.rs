//! Simulation constants and tuning parameters.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- Camera ---

/// Camera eye position (meters). The player stands at the origin.
pub const CAMERA_HEIGHT: f32 = 1.6;

/// Pitch clamp for the aim (radians).
pub const AIM_PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2;

/// Radians of rotation per pixel of pointer drag at sensitivity 1.0.
pub const AIM_RADIANS_PER_PIXEL: f32 = 0.002;

/// Sensitivity bounds (player preference).
pub const SENSITIVITY_MIN: f32 = 0.5;
pub const SENSITIVITY_MAX: f32 = 2.0;
pub const SENSITIVITY_DEFAULT: f32 = 1.0;

// --- Shooting ---

/// Spread scale: spread = (1 - accuracy) * this.
pub const SPREAD_FACTOR: f32 = 0.1;

/// Distance in front of the camera where the shot visually originates.
pub const MUZZLE_OFFSET: f32 = 0.5;

/// Bounding-sphere radius used by the default hit test (meters).
/// Targets are 1m tall cones with 0.5m base radius.
pub const TARGET_HIT_RADIUS: f32 = 0.6;

// --- Scoring ---

/// Seconds a combo survives without another kill.
pub const COMBO_WINDOW_SECS: f64 = 3.0;

/// Kills per multiplier step.
pub const COMBO_KILLS_PER_STEP: u32 = 5;

/// Highest combo multiplier.
pub const COMBO_MULTIPLIER_MAX: u32 = 5;

/// Fraction of each kill reward paid out as currency.
pub const CURRENCY_REWARD_FRACTION: f64 = 0.1;

/// Flat currency bonus for clearing a wave.
pub const WAVE_CLEAR_BONUS: u64 = 50;

// --- Bullet time ---

/// Charge gained per kill.
pub const BULLET_TIME_CHARGE_PER_KILL: f64 = 5.0;

/// Charge ceiling; reaching it activates bullet time.
pub const BULLET_TIME_CHARGE_MAX: f64 = 100.0;

/// Real-time duration of bullet time (seconds).
pub const BULLET_TIME_DURATION_SECS: f64 = 5.0;

/// Time dilation applied to target motion while bullet time is active.
pub const BULLET_TIME_SCALE: f64 = 0.3;

// --- Waves ---

/// Delay between clearing a wave and the next one spawning (seconds).
pub const WAVE_ADVANCE_DELAY_SECS: f64 = 2.0;

/// Wave size = min(base + per_wave * wave, max).
pub const WAVE_BASE_TARGETS: u32 = 5;
pub const WAVE_TARGETS_PER_WAVE: u32 = 2;
pub const WAVE_MAX_TARGETS: u32 = 20;

/// Spawn ring radius range (meters).
pub const SPAWN_RADIUS_MIN: f32 = 15.0;
pub const SPAWN_RADIUS_MAX: f32 = 25.0;

/// Spawn height range (meters).
pub const SPAWN_HEIGHT_MIN: f32 = 1.0;
pub const SPAWN_HEIGHT_MAX: f32 = 4.0;

/// Cumulative movement pattern weights: static, linear, circular, erratic.
pub const PATTERN_WEIGHT_STATIC: f64 = 0.30;
pub const PATTERN_WEIGHT_LINEAR: f64 = 0.40;
pub const PATTERN_WEIGHT_CIRCULAR: f64 = 0.15;

/// Color hints handed to the presentation layer.
pub const TARGET_PALETTE: [u32; 6] = [0xff4444, 0x44ff44, 0x4444ff, 0xffff44, 0xff44ff, 0x44ffff];

// --- Target motion ---

/// Linear movers bounce when |x| or |z| exceeds this.
pub const ARENA_BOUND: f32 = 30.0;

/// Radius of the circular track (meters).
pub const CIRCULAR_RADIUS: f32 = 20.0;

/// Initial linear speed range per horizontal axis (m/s, ±half).
pub const LINEAR_SPEED_SPREAD: f32 = 5.0;

/// Initial erratic velocity spread per axis (m/s, ±half).
pub const ERRATIC_SPEED_SPREAD_XZ: f32 = 8.0;
pub const ERRATIC_SPEED_SPREAD_Y: f32 = 3.0;

/// Erratic jitter acceleration spread per axis (m/s², ±half).
pub const ERRATIC_JITTER_XZ: f32 = 10.0;
pub const ERRATIC_JITTER_Y: f32 = 5.0;

/// Per-tick velocity decay for erratic movers.
pub const ERRATIC_DAMPING: f32 = 0.95;

/// Erratic height band (meters).
pub const ERRATIC_HEIGHT_MIN: f32 = 1.0;
pub const ERRATIC_HEIGHT_MAX: f32 = 8.0;

// --- Weapons ---

/// Upgrade price per current level.
pub const UPGRADE_COST_PER_LEVEL: u64 = 250;

/// Upgrade multipliers and floors/ceilings.
pub const UPGRADE_DAMAGE_FACTOR: f64 = 1.2;
pub const UPGRADE_FIRE_RATE_FACTOR: f64 = 0.95;
pub const UPGRADE_RELOAD_FACTOR: f64 = 0.9;
pub const UPGRADE_ACCURACY_STEP: f64 = 0.02;
pub const UPGRADE_COST_FACTOR: f64 = 1.5;
pub const MIN_FIRE_RATE_MS: f64 = 50.0;
pub const MIN_RELOAD_SECS: f64 = 0.8;
pub const MAX_ACCURACY: f64 = 0.99;

/// Weapon every session starts with.
pub const STARTING_WEAPON_ID: &str = "pistol_basic";

/// Arena used when no environment is configured.
pub const DEFAULT_ENVIRONMENT_ID: &str = "rooftop";
