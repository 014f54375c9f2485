// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::env;

use anyhow::{bail, Context, Result};
use the_pipeworks::backends::local::{ConsoleSink, OffsetFormatter, SequenceSource};
use the_pipeworks::config::consts::{
    DEFAULT_FORMATTER_OFFSET, DEFAULT_SOURCE_BASE, DEFAULT_SOURCE_ITERATIONS,
};
use the_pipeworks::config::{load_and_validate_config, PipelineConfig};
use the_pipeworks::engine::{
    connect_consumer_to_producers, connect_output_to_consumers, Pipeline, PipelineReport,
};
use the_pipeworks::observability::DiagnosticSink;
use the_pipeworks::worker::Worker;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

struct Args {
    config: Option<String>,
    json: bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        config: None,
        json: false,
    };
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--json" => args.json = true,
            "-h" | "--help" => {
                println!("Usage: the-pipeworks [CONFIG.yaml|CONFIG.toml] [--json]");
                std::process::exit(0);
            }
            flag if flag.starts_with('-') => bail!("unknown flag '{}'", flag),
            path if args.config.is_none() => args.config = Some(path.to_string()),
            extra => bail!("unexpected argument '{}'", extra),
        }
    }
    Ok(args)
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = parse_args()?;
    let config = match &args.config {
        Some(path) => load_and_validate_config(path)
            .with_context(|| format!("loading pipeline config '{}'", path))?,
        None => PipelineConfig::default(),
    };

    let report = run_demo(config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report.summaries())?);
    } else {
        print_summary(&report);
    }

    report.into_result()?;
    Ok(())
}

/// Source → two formatters (fan-out) → one console sink (fan-in).
fn run_demo(config: PipelineConfig) -> Result<PipelineReport> {
    let source_iterations = config.iterations(0).unwrap_or(DEFAULT_SOURCE_ITERATIONS);

    let mut w0 = Worker::input(0, SequenceSource::new(DEFAULT_SOURCE_BASE));
    let mut w1 = Worker::in_out(1, OffsetFormatter::new(DEFAULT_FORMATTER_OFFSET));
    let mut w2 = Worker::in_out(2, OffsetFormatter::new(DEFAULT_FORMATTER_OFFSET));
    let mut w3 = Worker::output(3, ConsoleSink::new(DiagnosticSink::stdout()));

    connect_output_to_consumers(&mut w0, &mut [&mut w1, &mut w2])?;
    connect_consumer_to_producers(&mut w3, &mut [&mut w1, &mut w2])?;

    let mut pipeline = Pipeline::from_config(config);
    pipeline
        .add(w0, Some(source_iterations))
        .add(w1, None)
        .add(w2, None)
        .add(w3, None);

    Ok(pipeline.run()?)
}

fn print_summary(report: &PipelineReport) {
    println!();
    println!("Pipeline finished in {:?}", report.duration());
    for summary in report.summaries() {
        match (&summary.error, summary.iterations, summary.stop_reason) {
            (Some(error), _, _) => {
                println!("  worker {} ({}): FAILED: {}", summary.index, summary.processor, error)
            }
            (None, Some(iterations), Some(reason)) => println!(
                "  worker {} ({}): {} iterations, {}",
                summary.index, summary.processor, iterations, reason
            ),
            _ => println!("  worker {} ({})", summary.index, summary.processor),
        }
    }
}
