use std::fs;
use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use testindex::cache;
use testindex::cli::{self, OutputFormat};
use testindex::diagnostics::TracingDiagnostics;
use testindex::engine::{CacheSource, Engine};
use testindex::extract::JavaExtractor;
use testindex::logging::{self, Verbosity};

fn main() -> Result<()> {
    let args = cli::Args::parse();
    logging::init(Verbosity::from_flags(args.verbose, args.quiet));

    let root = args.root()?;
    let engine = Engine::new(root, JavaExtractor::new(args.extractor_config()))
        .with_config(args.engine_config()?);

    let source = args.cache_source();
    let cycle = engine
        .run(&source, &mut TracingDiagnostics)
        .with_context(|| format!("Error parsing tests in {}", root.display()))?;

    if args.write {
        if let CacheSource::File(path) = &source {
            cache::write(path, &cycle.state)
                .with_context(|| format!("Failed to update cache {}", path.display()))?;
        }
    }

    let output = match args.format {
        OutputFormat::Json if args.pretty => cache::save_pretty(&cycle.state)?,
        OutputFormat::Json => cache::save(&cycle.state)?,
        OutputFormat::List => cycle
            .state
            .tests
            .items()
            .iter()
            .map(|item| item.runtime_argument())
            .collect::<Vec<_>>()
            .join("\n"),
    };

    match &args.output_file {
        Some(path) => fs::write(path, format!("{output}\n"))
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{output}").context("Failed to write to stdout")?;
        }
    }

    Ok(())
}
