use clap::Parser;
use kumitate::prelude::*;
use rand::Rng;
use rand::rngs::ThreadRng;
use std::fs;

/// A CLI tool to generate random nested integrations for exercising the editor
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated JSON file to
    #[arg(short, long, default_value = "generated_integration.json")]
    output: String,

    /// Number of top-level steps
    #[arg(long, default_value_t = 6)]
    steps: usize,

    /// Deepest branch nesting to generate
    #[arg(long, default_value_t = 3)]
    depth: usize,

    /// Maximum number of branches on a branching step
    #[arg(long, default_value_t = 3)]
    max_branches: usize,
}

const NAMES: &[&str] = &[
    "filter", "log", "transform", "split", "aggregate", "enrich", "delay", "marshal",
];

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut rng = rand::rng();

    if cli.max_branches == 0 {
        eprintln!("Error: --max-branches must be at least 1");
        std::process::exit(1);
    }

    println!(
        "Generating integration ({} top-level steps, nesting up to {})...",
        cli.steps, cli.depth
    );

    let mut steps = vec![Step::source("timer")];
    steps.extend((0..cli.steps.saturating_sub(2)).map(|_| random_step(&mut rng, &cli, cli.depth)));
    steps.push(Step::sink("log"));

    let mut editor = Editor::default();
    editor.bulk_replace(IntegrationPatch::with_steps(steps))?;
    let integration = editor.integration();

    fs::write(&cli.output, integration.to_json()?)?;

    println!(
        "Successfully generated {} steps ({} nested) and saved them to '{}'",
        integration.step_count(),
        editor.nested_steps().len(),
        cli.output
    );
    Ok(())
}

/// A transform, or with some probability a branching step whose branches recurse.
fn random_step(rng: &mut ThreadRng, cli: &Cli, depth: usize) -> Step {
    let name = NAMES[rng.random_range(0..NAMES.len())];
    if depth == 0 || !rng.random_bool(0.3) {
        return Step::transform(name);
    }

    let branch_count = rng.random_range(1..=cli.max_branches);
    let branches = (0..branch_count)
        .map(|_| {
            let len = rng.random_range(0..=3);
            Branch::new((0..len).map(|_| random_step(rng, cli, depth - 1)).collect())
        })
        .collect();

    // Constraints fit by construction; fall back to a plain step if they ever don't.
    Step::transform("choice")
        .with_branches(BranchConstraints::new(1, Some(cli.max_branches)), branches)
        .unwrap_or_else(|_| Step::transform(name))
}
