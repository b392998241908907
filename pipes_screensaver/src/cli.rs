// Command-line arguments for the `pipes` binary.
//
// Parsing is plain `std::env::args()` matching, no clap dependency. Flags
// override whatever the config file (or the default config) says, and the
// seed falls back to the clock only when neither names one.

use pipes_sim::config::{GridSize, GrowthPolicy, PipesConfig};
use std::path::PathBuf;

/// Max path length used when `--single-shot` switches a config that had no
/// bound of its own.
pub const DEFAULT_SINGLE_SHOT_LENGTH: u32 = 10;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CliArgs {
    pub config_path: Option<PathBuf>,
    pub seed: Option<u64>,
    pub size: Option<u32>,
    pub single_shot: bool,
    /// Stop a continuous run after this many ticks.
    pub ticks: Option<u64>,
    pub no_delay: bool,
    pub json: bool,
    pub help: bool,
}

/// Parse arguments, not including the program name.
pub fn parse_args<I>(args: I) -> Result<CliArgs, String>
where
    I: IntoIterator<Item = String>,
{
    let mut parsed = CliArgs::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next().ok_or("--config requires a path")?;
                parsed.config_path = Some(PathBuf::from(path));
            }
            "--seed" => parsed.seed = Some(number(&mut args, "--seed")?),
            "--size" => {
                let size: u32 = number(&mut args, "--size")?;
                if size == 0 {
                    return Err("--size must be positive".into());
                }
                parsed.size = Some(size);
            }
            "--ticks" => parsed.ticks = Some(number(&mut args, "--ticks")?),
            "--single-shot" => parsed.single_shot = true,
            "--no-delay" => parsed.no_delay = true,
            "--json" => parsed.json = true,
            "--help" | "-h" => parsed.help = true,
            other => return Err(format!("Unknown argument: {other}")),
        }
    }

    Ok(parsed)
}

fn number<T: std::str::FromStr>(
    args: &mut impl Iterator<Item = String>,
    flag: &str,
) -> Result<T, String> {
    args.next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| format!("{flag} requires a valid number"))
}

impl CliArgs {
    /// Apply flag overrides to `config`.
    pub fn apply(&self, config: &mut PipesConfig) {
        if let Some(size) = self.size {
            config.grid_size = GridSize::Cube(size);
        }
        if self.single_shot {
            if let GrowthPolicy::Continuous { max_path_length } = config.policy {
                config.policy = GrowthPolicy::SingleShot {
                    max_path_length: max_path_length.unwrap_or(DEFAULT_SINGLE_SHOT_LENGTH),
                };
            }
        }
        if self.no_delay {
            config.step_delay_ms = 0;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
    }
}

pub fn print_usage() {
    println!("Usage: pipes [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --config <PATH>    JSON config file (default: built-in config)");
    println!("  --seed <N>         PRNG seed (default: config seed, else the clock)");
    println!("  --size <N>         Cube grid of N cells per side");
    println!("  --single-shot      Grow one pipe per line read from stdin");
    println!("  --ticks <N>        Stop a continuous run after N ticks");
    println!("  --no-delay         Don't wait between segments");
    println!("  --json             Emit events as JSON lines");
    println!("  --help, -h         Show this help");
}
