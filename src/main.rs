use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use slidegen::{ChatOracle, RebalanceConfig, Rebalancer, Secrets};

/// Rebalance a Markdown document into a target number of slides.
#[derive(Parser, Debug)]
#[command(name = "slidegen", version, about)]
struct Args {
    /// Path to the input Markdown document
    input: PathBuf,

    /// Desired number of slides
    #[arg(short = 'n', long)]
    target: usize,

    /// TOML file holding the API key and oracle settings
    #[arg(long, default_value = "secrets.toml")]
    secrets: PathBuf,

    /// Path to write the rendered slides to
    #[arg(short, long, default_value = "output.txt")]
    output: PathBuf,

    /// Retry budget for malformed oracle responses per iteration
    #[arg(long, default_value_t = 0)]
    retries: u32,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let start_time = Instant::now();

    println!("Step 1: Reading {}...", args.input.display());
    let text = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read input file {}", args.input.display()))?;

    println!("Step 2: Loading secrets from {}...", args.secrets.display());
    let secrets = Secrets::load(&args.secrets)?;

    println!("Step 3: Rebalancing toward {} slides...\n", args.target);
    let oracle = ChatOracle::new(&secrets.openai_key, &secrets.model, &secrets.endpoint);
    let config = RebalanceConfig::new(args.target).with_protocol_retries(args.retries);
    let slides = Rebalancer::new(oracle, config)
        .run(&text)
        .context("rebalancing run failed")?;

    println!(
        "\nStep 4: Writing {} slides to {}...",
        slides.len(),
        args.output.display()
    );
    fs::write(&args.output, render_slides(&slides))
        .with_context(|| format!("failed to write output file {}", args.output.display()))?;

    println!("Done [{:.2}s]", start_time.elapsed().as_secs_f64());
    Ok(())
}

fn render_slides(slides: &[String]) -> String {
    slides
        .iter()
        .enumerate()
        .map(|(i, slide)| format!("Slide {}:\n{}", i + 1, slide))
        .collect::<Vec<_>>()
        .join("\n")
}
