//! Launch arguments: `--seed <u64>` and `--config <path>`, each at most once,
//! in either `--flag value` or `--flag=value` form.

use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeedChoice {
    Cli(u64),
    Generated(u64),
}

impl SeedChoice {
    pub fn value(self) -> u64 {
        match self {
            Self::Cli(seed) | Self::Generated(seed) => seed,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LaunchOptions {
    pub seed: SeedChoice,
    pub config_path: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LaunchError {
    #[error("missing value for {0}")]
    MissingValue(&'static str),

    #[error("{0} provided more than once")]
    Repeated(&'static str),

    #[error("seed value '{0}' must be a number")]
    InvalidSeed(String),
}

static GENERATED_SEED_COUNTER: AtomicU64 = AtomicU64::new(0);

pub fn generate_runtime_seed() -> u64 {
    let now_nanos =
        SystemTime::now().duration_since(UNIX_EPOCH).map_or(0_u128, |duration| duration.as_nanos());
    let pid = u64::from(process::id());
    let counter = GENERATED_SEED_COUNTER.fetch_add(1, Ordering::Relaxed);

    let entropy = (now_nanos as u64)
        ^ ((now_nanos >> 64) as u64)
        ^ pid.rotate_left(17)
        ^ counter.rotate_left(7);

    mix_seed(entropy)
}

/// Reads launch flags from `args` (program name first). Unknown arguments are ignored.
pub fn resolve_launch_options(
    args: &[String],
    generated_seed: u64,
) -> Result<LaunchOptions, LaunchError> {
    let mut seed = None;
    let mut config_path = None;
    let mut rest = args.iter().skip(1);

    while let Some(argument) = rest.next() {
        let (flag, inline) = match argument.split_once('=') {
            Some((flag, value)) => (flag, Some(value.to_owned())),
            None => (argument.as_str(), None),
        };
        let name = match flag {
            "--seed" => "--seed",
            "--config" => "--config",
            _ => continue,
        };
        let value = match inline {
            Some(value) => value,
            None => rest.next().cloned().ok_or(LaunchError::MissingValue(name))?,
        };
        if name == "--seed" {
            if seed.is_some() {
                return Err(LaunchError::Repeated(name));
            }
            seed = Some(value.parse::<u64>().map_err(|_| LaunchError::InvalidSeed(value))?);
        } else {
            if config_path.is_some() {
                return Err(LaunchError::Repeated(name));
            }
            config_path = Some(PathBuf::from(value));
        }
    }

    Ok(LaunchOptions {
        seed: seed.map_or(SeedChoice::Generated(generated_seed), SeedChoice::Cli),
        config_path,
    })
}

fn mix_seed(mut value: u64) -> u64 {
    value ^= value >> 30;
    value = value.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    value ^= value >> 27;
    value = value.wrapping_mul(0x94D0_49BB_1331_11EB);
    value ^ (value >> 31)
}
