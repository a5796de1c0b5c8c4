use clap::{Parser, ValueEnum};
use kumitate::graph::LayoutRequest;
use kumitate::prelude::*;
use std::fs;
use std::io::{self, BufRead, Write};
use std::time::Instant;

/// Define a CLI-specific enum for clap to parse.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum LayoutCli {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Load an integration, apply edits to it, and inspect its index and graph
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the integration JSON file. Starts empty when omitted
    integration_path: Option<String>,

    /// Path to a file with one edit command per line
    #[arg(short, long)]
    script: Option<String>,

    /// Direction used when laying out the graph
    #[arg(short, long, value_enum, default_value = "horizontal")]
    layout: LayoutCli,

    /// How to print the final state
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Write the edited integration back out to this path
    #[arg(short, long)]
    output: Option<String>,

    /// Read edit commands from stdin, one at a time
    #[arg(short = 'i', long, help = "Run in interactive 'human' mode")]
    human: bool,
}

/// One line of an edit script.
#[derive(Debug)]
enum Command {
    Append(Step),
    Insert(usize, Step),
    Delete(usize),
    Replace(Option<usize>, Step),
    Remove(String),
    Branch(String),
    Select(String),
    Undo,
    Redo,
    Clear,
    Show,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mode = match cli.layout {
        LayoutCli::Horizontal => LayoutMode::Horizontal,
        LayoutCli::Vertical => LayoutMode::Vertical,
    };

    let load_start = Instant::now();
    let mut editor = Editor::builder()
        .with_layout_mode(mode)
        .build()
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to start editor: {}", e)));
    if let Some(path) = &cli.integration_path {
        let payload = fs::read_to_string(path).unwrap_or_else(|e| {
            exit_with_error(&format!("Failed to read integration file '{}': {}", path, e))
        });
        editor
            .import(payload.as_str())
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to import '{}': {}", path, e)));
        // Loading is not an edit the user should be able to undo.
        editor = Editor::builder()
            .with_integration(editor.integration())
            .with_layout_mode(mode)
            .build()
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load '{}': {}", path, e)));
    }
    let load_duration = load_start.elapsed();

    let edit_start = Instant::now();
    if let Some(script_path) = &cli.script {
        let script = fs::read_to_string(script_path).unwrap_or_else(|e| {
            exit_with_error(&format!("Failed to read script '{}': {}", script_path, e))
        });
        for (number, line) in script.lines().enumerate() {
            match parse_command(line) {
                Ok(Some(command)) => {
                    if let Err(e) = execute(&mut editor, command) {
                        exit_with_error(&format!("Line {}: {}", number + 1, e));
                    }
                }
                Ok(None) => {}
                Err(e) => exit_with_error(&format!("Line {}: {}", number + 1, e)),
            }
        }
    }
    if cli.human {
        run_interactive(&mut editor);
    }
    let edit_duration = edit_start.elapsed();

    match cli.format {
        OutputFormat::Text => print_summary(&editor),
        OutputFormat::Json => print_json(&editor),
    }

    if let Some(output) = &cli.output {
        let json = editor
            .integration()
            .to_json()
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize: {}", e)));
        fs::write(output, json)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to write '{}': {}", output, e)));
        println!("Saved integration to '{}'", output);
    }

    if matches!(cli.format, OutputFormat::Text) {
        println!("\n--- Performance Summary ---");
        println!("Loading:  {:?}", load_duration);
        println!("Editing:  {:?}", edit_duration);
    }
}

/// Runs a read-eval-print loop over stdin until EOF or `quit`.
fn run_interactive(editor: &mut Editor) {
    println!("--- Kumitate Interactive Mode ---");
    println!("Commands: append|insert <i>|replace [i] <kind> <name>, delete <i>, remove <id>,");
    println!("          branch <id>, select <id>, undo, redo, clear, show, quit");

    let stdin = io::stdin();
    loop {
        print!("> ");
        if io::stdout().flush().is_err() {
            return;
        }
        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => return,
            Ok(_) => {}
        }
        if line.trim() == "quit" {
            return;
        }
        match parse_command(&line) {
            Ok(Some(command)) => match execute(editor, command) {
                Ok(()) => {}
                Err(e) => println!("Error: {}", e),
            },
            Ok(None) => {}
            Err(e) => println!("Error: {}", e),
        }
    }
}

fn parse_command(line: &str) -> std::result::Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let words: Vec<&str> = line.split_whitespace().collect();
    let command = match words.as_slice() {
        ["append", kind, name] => Command::Append(parse_step(kind, name)?),
        ["insert", index, kind, name] => Command::Insert(parse_index(index)?, parse_step(kind, name)?),
        ["delete", index] => Command::Delete(parse_index(index)?),
        ["replace", kind, name] => Command::Replace(None, parse_step(kind, name)?),
        ["replace", index, kind, name] => {
            Command::Replace(Some(parse_index(index)?), parse_step(kind, name)?)
        }
        ["remove", identifier] => Command::Remove(identifier.to_string()),
        ["branch", identifier] => Command::Branch(identifier.to_string()),
        ["select", identifier] => Command::Select(identifier.to_string()),
        ["undo"] => Command::Undo,
        ["redo"] => Command::Redo,
        ["clear"] => Command::Clear,
        ["show"] => Command::Show,
        _ => return Err(format!("Unrecognized command '{}'", line)),
    };
    Ok(Some(command))
}

fn parse_step(kind: &str, name: &str) -> std::result::Result<Step, String> {
    match kind {
        "source" => Ok(Step::source(name)),
        "transform" => Ok(Step::transform(name)),
        "sink" => Ok(Step::sink(name)),
        // A branching transform that accepts any number of branches, starting with one open slot.
        "choice" => Step::transform(name)
            .with_branches(BranchConstraints::new(1, None), vec![Branch::empty()])
            .map_err(|e| e.to_string()),
        other => Err(format!("Unknown step kind '{}'", other)),
    }
}

fn parse_index(raw: &str) -> std::result::Result<usize, String> {
    raw.parse()
        .map_err(|_| format!("'{}' is not a valid step index", raw))
}

fn execute(editor: &mut Editor, command: Command) -> std::result::Result<(), EditError> {
    match command {
        Command::Append(step) => editor.append(step)?,
        Command::Insert(index, step) => editor.insert_at(step, index)?,
        Command::Delete(index) => editor.delete_at(index)?,
        Command::Replace(index, step) => editor.replace_at(step, index)?,
        Command::Remove(identifier) => editor.remove_step(&identifier)?,
        Command::Branch(identifier) => editor.add_branch(&identifier)?,
        Command::Select(identifier) => match editor.select(&identifier) {
            Some(selected) => println!("Selected {} at {}", selected.identifier, selected.path),
            None => println!("Nothing selected"),
        },
        Command::Undo => {
            if !editor.undo() {
                println!("Nothing to undo");
            }
        }
        Command::Redo => {
            if !editor.redo() {
                println!("Nothing to redo");
            }
        }
        Command::Clear => editor.delete_all(),
        Command::Show => print_summary(editor),
    }
    Ok(())
}

fn print_summary(editor: &Editor) {
    let state = editor.state();
    let integration = state.integration();
    println!(
        "\n--- Integration '{}' ({}) ---",
        integration.metadata.name, integration.dsl
    );
    for step in state.steps() {
        print_step(step, 1);
    }

    println!("\n--- Nested Steps ---");
    if state.nested_steps().is_empty() {
        println!("  (none)");
    }
    for entry in state.nested_steps().iter() {
        println!(
            "  {} <- {} at {}",
            entry.step_identifier, entry.origin_step_identifier, entry.path_to_step
        );
    }

    let projected = editor.graph();
    let graph = LayeredLayout::default().arrange(LayoutRequest {
        nodes: projected.nodes,
        edges: projected.edges,
        mode: editor.layout_mode(),
    });
    println!("\n--- Graph ---");
    for node in &graph.nodes {
        let position = node.position.unwrap_or_default();
        println!(
            "  node {:<32} ({:>6.0}, {:>6.0}){}",
            node.id,
            position.x,
            position.y,
            if node.is_placeholder() { " [open slot]" } else { "" }
        );
    }
    for edge in &graph.edges {
        println!("  edge {} -> {} [{:?}]", edge.source, edge.target, edge.kind);
    }
    println!(
        "\nHistory: {} snapshots (undo: {}, redo: {})",
        editor.history_len(),
        editor.can_undo(),
        editor.can_redo()
    );
}

fn print_step(step: &Step, indent: usize) {
    println!(
        "{}{} [{}] '{}'",
        "  ".repeat(indent),
        step.identifier(),
        step.kind(),
        step.name()
    );
    for branch in step.branches() {
        println!("{}{}:", "  ".repeat(indent + 1), branch.identifier());
        for nested in branch.steps() {
            print_step(nested, indent + 2);
        }
    }
}

fn print_json(editor: &Editor) {
    let state = editor.state();
    let output = serde_json::json!({
        "integration": state.integration(),
        "nestedSteps": state.nested_steps().entries(),
        "graph": editor.graph(),
    });
    match serde_json::to_string_pretty(&output) {
        Ok(json) => println!("{}", json),
        Err(e) => exit_with_error(&format!("Failed to serialize output: {}", e)),
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
