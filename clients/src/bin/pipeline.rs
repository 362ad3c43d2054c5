//! `widealu-pipeline` runs a request stream through the latency pipeline.
//!
//! Reads a JSON array of requests (`{"a", "b", "opcode", "mode", "shift"}`,
//! operands as hex strings), prints one JSON line per retirement, then the
//! conformance report for the trace.
//!
//! **Usage:**
//! ```
//! widealu-pipeline [--width 512|2048] [--config <unit.toml>] <requests.json>
//! ```
//!
//! Exits non-zero if the trace is not conformant.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::fs;
use std::path::PathBuf;
use std::process;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;
use widealu::{validate_trace, Alu, AluConfig, Pipeline, Request};

/// Drive the wide-ALU latency pipeline.
#[derive(Parser)]
#[command(
    name = "widealu-pipeline",
    about = "Run requests through the fixed-latency pipeline and check the trace"
)]
struct Args {
    /// Unit width in bits: 512 or 2048. Ignored when --config is given.
    #[arg(long, default_value_t = 2048)]
    width: u32,

    /// Unit configuration (TOML).
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON file holding an array of requests.
    requests: PathBuf,
}

/// Run the pipeline, print the trace and return whether it conforms.
fn run<const L: usize>(config: AluConfig, text: &str) -> Result<bool> {
    let requests: Vec<Request<L>> =
        serde_json::from_str(text).context("parsing request array")?;
    let alu = Alu::<L>::with_config(config)?;
    let mut pipe = Pipeline::new(alu);
    let latency = pipe.latency();
    info!("{} requests, latency {latency}", requests.len());

    let trace = pipe.run(requests);
    for retired in &trace {
        println!("{}", serde_json::to_string(retired)?);
    }

    let report = validate_trace(latency, &trace);
    eprintln!("{report}");
    Ok(report.is_conformant())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => AluConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AluConfig::for_width(args.width)?,
    };
    let text = fs::read_to_string(&args.requests)
        .with_context(|| format!("reading {}", args.requests.display()))?;

    let conformant = match config.width {
        512 => run::<8>(config, &text)?,
        2048 => run::<32>(config, &text)?,
        other => bail!("unsupported width {other} (expected 512 or 2048)"),
    };
    if !conformant {
        process::exit(1);
    }
    Ok(())
}
