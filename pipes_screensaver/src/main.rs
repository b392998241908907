// CLI entry point for the pipes screensaver.
//
// Builds a `GrowthSession` from a config file (or the built-in defaults)
// plus command-line overrides, then drives it with `pipes_sim::driver`:
// - continuous policy: tick until `--ticks` is reached, or forever.
// - single-shot policy: grow one pipe per line read from stdin, stop at EOF.
//
// Usage:
//   pipes [OPTIONS]
//     --config <PATH>    JSON config file
//     --seed <N>         PRNG seed
//     --size <N>         Cube grid of N cells per side
//     --single-shot      Grow one pipe per stdin line
//     --ticks <N>        Stop a continuous run after N ticks
//     --no-delay         Don't wait between segments
//     --json             Emit events as JSON lines

use std::io::BufRead;
use std::sync::atomic::AtomicBool;
use std::time::{SystemTime, UNIX_EPOCH};

use pipes_screensaver::cli::{CliArgs, parse_args, print_usage};
use pipes_screensaver::sink::{JsonLinesSink, TextSink};
use pipes_sim::config::{GrowthPolicy, PipesConfig};
use pipes_sim::driver::{self, NoPacing, Pacer, RenderSink, SleepPacer};
use pipes_sim::error::ConfigError;
use pipes_sim::session::GrowthSession;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args(std::env::args().skip(1)).unwrap_or_else(|e| {
        eprintln!("{e}");
        print_usage();
        std::process::exit(1);
    });
    if args.help {
        print_usage();
        return;
    }

    let session = build_session(&args).unwrap_or_else(|e| {
        eprintln!("Failed to start: {e}");
        std::process::exit(1);
    });

    let stdout = std::io::stdout().lock();
    match (args.json, args.no_delay) {
        (true, true) => drive(session, &args, JsonLinesSink::new(stdout), NoPacing),
        (true, false) => drive(session, &args, JsonLinesSink::new(stdout), SleepPacer),
        (false, true) => drive(session, &args, TextSink::new(stdout), NoPacing),
        (false, false) => drive(session, &args, TextSink::new(stdout), SleepPacer),
    }
}

fn build_session(args: &CliArgs) -> Result<GrowthSession, ConfigError> {
    let mut config = match &args.config_path {
        Some(path) => PipesConfig::load(path)?,
        None => PipesConfig::default(),
    };
    args.apply(&mut config);
    let seed = config.seed.unwrap_or_else(clock_seed);
    let (x, y, z) = config.grid_size.dims();
    log::info!("pipes: {x}x{y}x{z} grid, {:?}, seed {seed}", config.policy);
    GrowthSession::new(config, seed)
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn drive<S: RenderSink, P: Pacer>(
    mut session: GrowthSession,
    args: &CliArgs,
    mut sink: S,
    mut pacer: P,
) {
    // Nothing raises this yet; the process exits on SIGINT by default.
    let stop = AtomicBool::new(false);

    let summary = match session.config.policy {
        GrowthPolicy::Continuous { .. } => {
            driver::run(&mut session, &mut sink, &mut pacer, &stop, args.ticks)
        }
        GrowthPolicy::SingleShot { .. } => {
            let mut total = driver::RunSummary::default();
            for line in std::io::stdin().lock().lines() {
                if let Err(e) = line {
                    log::error!("stdin: {e}");
                    break;
                }
                let run = driver::run_triggered(&mut session, &mut sink, &mut pacer, &stop);
                total.ticks += run.ticks;
                total.placements += run.placements;
            }
            total
        }
    };

    log::info!(
        "done after {} ticks: {} segments, {} paths, {} resets",
        summary.ticks,
        summary.placements,
        session.paths_finished(),
        session.resets()
    );
}
