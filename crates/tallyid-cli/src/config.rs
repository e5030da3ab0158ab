use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;
use tallyid::{Alphabet, BASE36, DEFAULT_LENGTH, DEFAULT_STORE_PATH, GeneratorConfig, MAX_LENGTH};

/// Runtime configuration for the `tallyid` binary.
///
/// All values are parsed from CLI arguments or environment variables (a
/// `.env` file in the working directory is loaded first).
#[derive(Parser, Debug, Clone)]
#[command(
    name = "tallyid",
    version,
    about = "Print short, sortable, never-repeating identifiers"
)]
pub struct CliArgs {
    /// Digit symbols in ascending sort order. The first symbol pads short
    /// identifiers.
    ///
    /// Environment variable: `TALLYID_ALPHABET`
    #[arg(long, env = "TALLYID_ALPHABET", default_value_t = String::from(BASE36))]
    pub alphabet: String,

    /// Width of every identifier, in symbols.
    ///
    /// Environment variable: `TALLYID_LENGTH`
    #[arg(long, env = "TALLYID_LENGTH", default_value_t = DEFAULT_LENGTH)]
    pub length: usize,

    /// Path of the counter record. Created on first use.
    ///
    /// Environment variable: `TALLYID_STORE`
    #[arg(long, env = "TALLYID_STORE", default_value = DEFAULT_STORE_PATH)]
    pub store: PathBuf,

    /// Coordinate with other processes using the same record through an
    /// advisory lock file.
    ///
    /// Environment variable: `TALLYID_SHARED`
    #[arg(long, env = "TALLYID_SHARED", default_value_t = false)]
    pub shared: bool,

    /// Number of identifiers to print; 0 runs until interrupted.
    ///
    /// Environment variable: `TALLYID_COUNT`
    #[arg(short, long, env = "TALLYID_COUNT", default_value_t = 0)]
    pub count: u64,

    /// Identifiers reserved per round trip to the counter. Larger batches
    /// mean fewer durable writes.
    ///
    /// Environment variable: `TALLYID_BATCH`
    #[arg(short, long, env = "TALLYID_BATCH", default_value_t = 1)]
    pub batch: usize,
}

#[derive(Debug, Clone)]
pub struct CliConfig {
    pub generator: GeneratorConfig,
    pub shared: bool,
    /// `None` runs forever.
    pub count: Option<u64>,
    pub batch: usize,
}

impl TryFrom<CliArgs> for CliConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.length == 0 {
            bail!("TALLYID_LENGTH must be greater than 0");
        }
        if args.length > MAX_LENGTH {
            bail!("TALLYID_LENGTH must be at most {MAX_LENGTH}");
        }
        if args.batch == 0 {
            bail!("TALLYID_BATCH must be greater than 0");
        }

        let alphabet = Alphabet::new(&args.alphabet)
            .with_context(|| format!("TALLYID_ALPHABET {:?} is unusable", args.alphabet))?;

        Ok(Self {
            generator: GeneratorConfig::new(alphabet, args.length, args.store),
            shared: args.shared,
            count: (args.count > 0).then_some(args.count),
            batch: args.batch,
        })
    }
}
