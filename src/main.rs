//! opchain CLI - operator chains over images
//!
//! Loads an image, runs it through a pipeline of registered operators and
//! writes the result.

use anyhow::{bail, Context, Result};
use opchain::prelude::*;
use std::path::Path;
use std::time::Instant;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("opchain");

    if args.len() < 2 {
        print_usage(program);
        return Ok(());
    }

    match args[1].as_str() {
        "list" => list_operators(),
        "process" => {
            if args.len() < 4 {
                eprintln!("Error: Please specify input and output paths");
                eprintln!(
                    "Usage: {} process <input> <output> [--pipeline <file>] [--step <step>]...",
                    program
                );
                std::process::exit(2);
            }
            process_image(&args[2], &args[3], &args[4..])?;
        }
        "help" | "--help" | "-h" => print_usage(program),
        other => {
            eprintln!("Unknown command: {}", other);
            print_usage(program);
            std::process::exit(2);
        }
    }
    Ok(())
}

fn print_usage(program: &str) {
    println!("opchain v{}", opchain::VERSION);
    println!();
    println!("Usage: {} <command> [options]", program);
    println!();
    println!("Commands:");
    println!("  list                          List all available operators");
    println!("  process <in> <out> [options]  Process an image");
    println!("  help                          Show this help message");
    println!();
    println!("Process options:");
    println!("  --pipeline <file>   Load steps from a .toml or .json pipeline");
    println!("  --step <step>       Append a step, e.g. threshold:level=90,model=parallel");
    println!();
    println!("Steps run in the order given, pipeline file first.");
}

fn list_operators() {
    let registry = OperatorRegistry::with_builtins();

    println!("Available operators ({} total):", registry.len());
    println!();
    for metadata in registry.metadata() {
        println!("  • {} - {}", metadata.id, metadata.description);
        for (name, description) in &metadata.parameters {
            println!("      {:<8} {}", name, description);
        }
    }
}

fn process_image(input: &str, output: &str, options: &[String]) -> Result<()> {
    let config = parse_options(options)?;

    let registry = OperatorRegistry::with_builtins();
    let mut expression = registry.build(&config).context("failed to build pipeline")?;

    let image = image::open(Path::new(input)).with_context(|| format!("failed to open {}", input))?;
    let matrix = Matrix::from_image(&image);
    log::info!(
        "Loaded {} as {}x{}x{}",
        input,
        matrix.rows(),
        matrix.cols(),
        matrix.channels()
    );

    println!(
        "⚙️  Processing {} -> {} ({})",
        input,
        output,
        expression.operator_names().join(" -> ")
    );
    let started = Instant::now();
    let result = expression
        .apply_owned(matrix)
        .context("pipeline execution failed")?;
    println!("✅ Complete in {}ms", started.elapsed().as_millis());

    result
        .to_image()
        .context("result cannot be encoded as an image")?
        .save(output)
        .with_context(|| format!("failed to write {}", output))?;
    println!("🎉 Image saved to: {}", output);
    Ok(())
}

/// Collect pipeline steps from `--pipeline` and `--step` options, in order.
fn parse_options(options: &[String]) -> Result<PipelineConfig> {
    let mut config = PipelineConfig::new();

    let mut i = 0;
    while i < options.len() {
        let option = options[i].as_str();
        match option {
            "--pipeline" | "--step" => {
                let Some(value) = options.get(i + 1) else {
                    bail!("missing value for {}", option);
                };
                if option == "--pipeline" {
                    let loaded = PipelineConfig::from_path(value)
                        .with_context(|| format!("failed to load pipeline {}", value))?;
                    if config.name.is_none() {
                        config.name = loaded.name;
                    }
                    config.steps.extend(loaded.steps);
                } else {
                    let step = StepConfig::parse(value)
                        .with_context(|| format!("bad --step '{}'", value))?;
                    config.steps.push(step);
                }
                i += 2;
            }
            other => bail!("Unknown option: {}", other),
        }
    }
    Ok(config)
}
