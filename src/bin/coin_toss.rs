//! Coin Toss - console host for the coin oracle
//!
//! Runs the toss simulation headless and prints each reading.
//!
//! Run with: `cargo run --bin coin_toss -- --tosses 3`
//!
//! Options:
//! - `--config PATH`: JSON configuration (also `COIN_TOSS_CONFIG`)
//! - `--seed N`: fixed RNG seed (also `COIN_TOSS_SEED`)
//! - `--engine contact|fallback`: physics engine
//! - `--settle fixed|velocity`: settle mode
//! - `--tosses N`: number of tosses in batch mode (default 1)
//! - `--interactive`: toss on every Enter, `q` quits
//! - `--realtime`: pace frames at wall-clock speed
//!
//! Logging follows `RUST_LOG` (default `info`); `LOG_FORMAT=json` switches
//! to JSON lines. Logs go to stderr, readings to stdout.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use coin_oracle_engine::game::{
    ConsoleDisplay, DisplaySink, OracleConfig, OracleError, SettleMode, Simulation,
};
use coin_oracle_engine::physics::EngineKind;

const USAGE: &str = "usage: coin_toss [--config PATH] [--seed N] [--engine contact|fallback] \
[--settle fixed|velocity] [--tosses N] [--interactive] [--realtime]";

#[derive(Debug, Default, PartialEq)]
struct Args {
    config: Option<PathBuf>,
    seed: Option<u64>,
    engine: Option<EngineKind>,
    settle: Option<SettleMode>,
    tosses: Option<u32>,
    interactive: bool,
    realtime: bool,
    help: bool,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Args, OracleError> {
    let mut parsed = Args::default();
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        let mut value = |name: &str| {
            iter.next()
                .ok_or_else(|| OracleError::InvalidArgument(format!("{name} needs a value")))
        };
        match arg.as_str() {
            "--config" => parsed.config = Some(PathBuf::from(value("--config")?)),
            "--seed" => parsed.seed = Some(parse_seed(&value("--seed")?)?),
            "--engine" => parsed.engine = Some(value("--engine")?.parse()?),
            "--settle" => parsed.settle = Some(value("--settle")?.parse()?),
            "--tosses" => {
                let raw = value("--tosses")?;
                let n = raw.parse().map_err(|_| {
                    OracleError::InvalidArgument(format!("--tosses expects a count, got '{raw}'"))
                })?;
                parsed.tosses = Some(n);
            }
            "--interactive" => parsed.interactive = true,
            "--realtime" => parsed.realtime = true,
            "-h" | "--help" => parsed.help = true,
            other => {
                return Err(OracleError::InvalidArgument(format!(
                    "unknown argument '{other}'"
                )));
            }
        }
    }
    Ok(parsed)
}

fn parse_seed(raw: &str) -> Result<u64, OracleError> {
    raw.trim()
        .parse()
        .map_err(|_| OracleError::InvalidArgument(format!("seed must be an unsigned integer, got '{raw}'")))
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

/// Command line wins over the environment, which wins over the file.
fn build_config(args: &Args) -> Result<OracleConfig, OracleError> {
    let path = args
        .config
        .clone()
        .or_else(|| std::env::var_os("COIN_TOSS_CONFIG").map(PathBuf::from));
    let mut config = match path {
        Some(path) => OracleConfig::load(&path)?,
        None => OracleConfig::default(),
    };

    if let Ok(raw) = std::env::var("COIN_TOSS_SEED") {
        config.seed = Some(parse_seed(&raw)?);
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(engine) = args.engine {
        config.physics.engine = engine;
    }
    if let Some(mode) = args.settle {
        config.settle.mode = mode;
    }
    config.validate()?;
    Ok(config)
}

/// Wall-clock pause between realtime frames; unrepresentable steps pace at 60 Hz.
fn frame_interval(step: f32) -> Duration {
    Duration::try_from_secs_f32(step).unwrap_or_else(|e| {
        tracing::warn!(step, error = %e, "time step not usable as a frame interval");
        Duration::from_micros(16_667)
    })
}

/// Toss once and run frames until the reading appears.
fn toss_and_wait(sim: &mut Simulation, display: &mut dyn DisplaySink, realtime: bool) {
    if !sim.request_toss(display) {
        return;
    }
    let step = sim.config().physics.time_step;
    let interval = frame_interval(step);
    let mut last = Instant::now();
    loop {
        let elapsed = if realtime {
            std::thread::sleep(interval);
            let now = Instant::now();
            let dt = now.duration_since(last).as_secs_f32();
            last = now;
            dt
        } else {
            step
        };
        if sim.frame(elapsed, display).is_some() {
            return;
        }
    }
}

fn run_interactive(
    sim: &mut Simulation,
    display: &mut dyn DisplaySink,
    realtime: bool,
) -> Result<(), OracleError> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        if matches!(line.trim(), "q" | "quit" | "exit") {
            break;
        }
        toss_and_wait(sim, display, realtime);
    }
    Ok(())
}

fn run() -> Result<(), OracleError> {
    let args = parse_args(std::env::args().skip(1))?;
    if args.help {
        println!("{USAGE}");
        return Ok(());
    }

    let config = build_config(&args)?;
    let mut sim = Simulation::new(config)?;
    let mut display = ConsoleDisplay::new(io::stdout());
    display.show_trigger(&sim.trigger_state());

    if args.interactive {
        run_interactive(&mut sim, &mut display, args.realtime)?;
    } else {
        for _ in 0..args.tosses.unwrap_or(1) {
            toss_and_wait(&mut sim, &mut display, args.realtime);
        }
    }

    io::stdout().flush()?;
    tracing::info!(tosses = sim.tosses(), "done");
    Ok(())
}

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    init_tracing();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(OracleError::InvalidArgument(msg)) => {
            tracing::error!(%msg, "invalid argument");
            eprintln!("{USAGE}");
            ExitCode::from(2)
        }
        Err(e) => {
            tracing::error!(error = %e, "coin_toss failed");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args, OracleError> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_all_flags() {
        let parsed = args(&[
            "--config", "oracle.json", "--seed", "42", "--engine", "fallback",
            "--settle", "velocity", "--tosses", "3", "--interactive", "--realtime",
        ])
        .unwrap();
        assert_eq!(parsed.config, Some(PathBuf::from("oracle.json")));
        assert_eq!(parsed.seed, Some(42));
        assert_eq!(parsed.engine, Some(EngineKind::Fallback));
        assert_eq!(parsed.settle, Some(SettleMode::VelocityThreshold));
        assert_eq!(parsed.tosses, Some(3));
        assert!(parsed.interactive && parsed.realtime);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(args(&["--seed"]), Err(OracleError::InvalidArgument(_))));
        assert!(matches!(args(&["--seed", "-1"]), Err(OracleError::InvalidArgument(_))));
        assert!(matches!(args(&["--tosses", "many"]), Err(OracleError::InvalidArgument(_))));
        assert!(matches!(args(&["--bogus"]), Err(OracleError::InvalidArgument(_))));
        assert!(matches!(args(&["--engine", "bullet"]), Err(OracleError::Physics(_))));
    }

    #[test]
    fn test_frame_interval_never_panics() {
        assert_eq!(frame_interval(0.5), Duration::from_millis(500));
        for bad in [1e30, f32::INFINITY, f32::NAN, -1.0] {
            assert_eq!(frame_interval(bad), Duration::from_micros(16_667));
        }
    }

    #[test]
    fn test_oversized_time_step_in_config_file_rejected() {
        let path = std::env::temp_dir().join(format!("coin_toss_step_{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "physics": { "time_step": 1e30 } }"#).unwrap();
        let parsed = Args {
            config: Some(path.clone()),
            ..Args::default()
        };
        let result = build_config(&parsed);
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(OracleError::Physics(_))), "{result:?}");
    }

    #[test]
    fn test_batch_tosses_print_readings() {
        let mut config = OracleConfig::default();
        config.seed = Some(5);
        config.physics.engine = EngineKind::Fallback;
        let mut sim = Simulation::new(config).unwrap();
        let mut display = ConsoleDisplay::new(Vec::new());
        toss_and_wait(&mut sim, &mut display, false);
        toss_and_wait(&mut sim, &mut display, false);

        let text = String::from_utf8(display.into_inner()).unwrap();
        assert_eq!(text.matches("[再次抛掷]").count(), 2);
        assert_eq!(text.matches("铜钱翻转中...").count(), 2);
        assert_eq!(sim.tosses(), 2);
    }
}
