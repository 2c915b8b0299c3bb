//! marksman: runs a target-range session driven by the autopilot and
//! prints the final HUD as JSON.
//!
//! Usage:
//!   marksman --seconds 90 --seed 7
//!   marksman --config range.json --realtime

use std::path::PathBuf;
use std::process;
use std::time::Duration;

use marksman_app::autopilot::Autopilot;
use marksman_app::config::load_config;
use marksman_app::error::AppError;
use marksman_app::game_loop::run_headless;
use marksman_app::state::AppState;
use marksman_core::constants::TICK_RATE;
use marksman_core::state::GameStateSnapshot;
use marksman_sim::{SimConfig, SimulationEngine};

/// How often the realtime autopilot re-plans.
const REALTIME_PLAN_INTERVAL: Duration = Duration::from_millis(20);

#[derive(Debug)]
struct Options {
    config: Option<PathBuf>,
    seed: Option<u64>,
    seconds: f64,
    realtime: bool,
    shop: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "help" || a == "--help" || a == "-h") {
        print_usage();
        return;
    }

    let options = match parse_options(&args) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{message}");
            print_usage();
            process::exit(1);
        }
    };

    match run(&options) {
        Ok(snapshot) => match serde_json::to_string_pretty(&snapshot.hud) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                log::error!("failed to serialize HUD: {e}");
                process::exit(1);
            }
        },
        Err(e) => {
            log::error!("{e}");
            process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!(
        "marksman: headless target-range session\n\
         \n\
           --config <path>    JSON SimConfig (seed, environment, starting_weapon)\n\
           --seed <N>         Override the RNG seed\n\
           --seconds <S>      Session length in seconds (default: 60)\n\
           --realtime         Run on the 60Hz game loop thread instead of as fast as possible\n\
           --no-shop          Never buy or upgrade weapons\n\
         \n\
         Set RUST_LOG=debug to see every kill and rejected command.\n"
    );
}

fn parse_options(args: &[String]) -> Result<Options, String> {
    let mut options = Options {
        config: None,
        seed: None,
        seconds: 60.0,
        realtime: false,
        shop: true,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                options.config = Some(PathBuf::from(value(args, i, "--config")?));
                i += 1;
            }
            "--seed" => {
                let raw = value(args, i, "--seed")?;
                options.seed = Some(raw.parse().map_err(|_| format!("Invalid seed: {raw}"))?);
                i += 1;
            }
            "--seconds" => {
                let raw = value(args, i, "--seconds")?;
                let seconds: f64 = raw
                    .parse()
                    .map_err(|_| format!("Invalid duration: {raw}"))?;
                if !seconds.is_finite() || seconds <= 0.0 {
                    return Err(format!("Invalid duration: {raw}"));
                }
                options.seconds = seconds;
                i += 1;
            }
            "--realtime" => options.realtime = true,
            "--no-shop" => options.shop = false,
            other => return Err(format!("Unknown argument: {other}")),
        }
        i += 1;
    }
    Ok(options)
}

fn value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str, String> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| format!("{flag} needs a value"))
}

fn run(options: &Options) -> Result<GameStateSnapshot, AppError> {
    let mut config = match &options.config {
        Some(path) => load_config(path)?,
        None => SimConfig::default(),
    };
    if let Some(seed) = options.seed {
        config.seed = seed;
    }

    let autopilot = Autopilot::new().with_shop(options.shop);

    if options.realtime {
        run_realtime(config, &autopilot, options.seconds)
    } else {
        let ticks = (options.seconds * TICK_RATE as f64).round().max(1.0) as u64;
        let mut engine = SimulationEngine::new(config)?;
        log::info!("running {} ticks headless", ticks);
        Ok(run_headless(&mut engine, ticks, |s| autopilot.plan(s)))
    }
}

fn run_realtime(
    config: SimConfig,
    autopilot: &Autopilot,
    seconds: f64,
) -> Result<GameStateSnapshot, AppError> {
    let app = AppState::new();
    app.start(config)?;
    log::info!("running {:.1}s on the game loop thread", seconds);

    let deadline = std::time::Instant::now() + Duration::from_secs_f64(seconds);
    while std::time::Instant::now() < deadline {
        std::thread::sleep(REALTIME_PLAN_INTERVAL);
        if let Some(snapshot) = app.snapshot() {
            for command in autopilot.plan(&snapshot) {
                app.send(command)?;
            }
        }
    }

    let snapshot = app.snapshot();
    app.shutdown()?;
    snapshot.ok_or(AppError::NotRunning)
}
