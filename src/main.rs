use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::time::Instant;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use noisylife::cli::Args;
use noisylife::config::SimConfig;
use noisylife::life::sweep;
use noisylife::report;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut config = SimConfig::load_or_default(&args.config);
    if let Some(rule) = args.rule {
        config.rule = rule;
    }
    if let Some(seed) = args.seed {
        config.run.base_seed = seed;
    }
    if let Some(patterns) = args.patterns {
        config.patterns = Some(patterns);
    }

    let started = Instant::now();
    let rows = sweep::run(&config)?;
    let failed = rows.iter().filter(|r| r.outcome.is_err()).count();

    let file = File::create(&args.out)?;
    let written = report::write_csv(BufWriter::new(file), &rows)?;

    info!(
        written,
        failed,
        elapsed_sec = started.elapsed().as_secs_f64(),
        out = %args.out,
        "sweep complete"
    );
    if failed > 0 {
        warn!(failed, "some groups were discarded; see earlier errors for trial context");
    }
    Ok(())
}
