#![doc = include_str!("../README.md")]

mod config;
mod telemetry;

use std::io::{self, BufWriter, Write};

use clap::Parser;
use config::{CliArgs, CliConfig};
use tallyid::{IdAllocator, IdGenerator};
use telemetry::init_telemetry;

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = CliConfig::try_from(args)?;

    init_telemetry()?;
    log_startup_info(&config);

    let mut out = BufWriter::new(io::stdout().lock());
    if config.shared {
        run(&IdGenerator::open_shared(&config.generator)?, &config, &mut out)?;
    } else {
        run(&IdGenerator::open(&config.generator)?, &config, &mut out)?;
    }
    Ok(())
}

/// Prints identifiers to `out` until `config.count` is reached or the reader
/// goes away, returning how many were reserved.
fn run<A, W>(generator: &IdGenerator<A>, config: &CliConfig, out: &mut W) -> anyhow::Result<u64>
where
    A: IdAllocator,
    W: Write,
{
    let batch = config.batch as u64;
    let mut issued = 0_u64;

    loop {
        let want = match config.count {
            Some(total) if issued >= total => break,
            Some(total) => batch.min(total - issued),
            None => batch,
        };
        let ids = if want == 1 {
            vec![generator.generate_one()?]
        } else {
            // `want <= batch`, which came from a usize
            generator.generate_many(want as usize)?
        };

        // Identifiers are persisted before they are printed, so a flush per
        // batch is all a killed process can lose.
        match print_batch(&mut *out, &ids) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::BrokenPipe => {
                tracing::debug!("stdout closed, stopping");
                issued += ids.len() as u64;
                break;
            }
            Err(err) => return Err(err.into()),
        }
        issued += ids.len() as u64;
    }

    tracing::info!(
        issued,
        last = generator.allocator().init()?,
        "finished issuing identifiers"
    );
    Ok(issued)
}

fn print_batch(out: &mut impl Write, ids: &[String]) -> io::Result<()> {
    for id in ids {
        writeln!(out, "{id}")?;
    }
    out.flush()
}

fn log_startup_info(config: &CliConfig) {
    if cfg!(debug_assertions) {
        tracing::info!("Starting tallyid with full config: {:#?}", config);
    } else {
        tracing::info!(
            store = %config.generator.store_path.display(),
            length = config.generator.length,
            shared = config.shared,
            "Starting tallyid"
        );
    }
}
