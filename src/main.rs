//! Prism CLI - run image-processing scripts or type commands interactively.

use anyhow::{Context, Result};
use prism::prelude::*;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

/// What the invocation asked for.
#[derive(Debug, PartialEq, Eq)]
enum Mode {
    File(PathBuf),
    Text,
    List,
    Info(String),
}

#[derive(Debug, PartialEq, Eq)]
struct Invocation {
    mode: Mode,
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("prism");

    let Some(invocation) = parse_args(args.get(1..).unwrap_or_default()) else {
        print_usage(program);
        return ExitCode::from(1);
    };

    match run(invocation) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

/// Parse `-file <path>`, `-text`, `-list` or `-info <op>`, each optionally
/// preceded or followed by `-config <path>`.
fn parse_args(args: &[String]) -> Option<Invocation> {
    let mut mode = None;
    let mut config = None;

    let mut i = 0;
    while i < args.len() {
        let next = args.get(i + 1);
        let (parsed, width) = match (args[i].to_lowercase().as_str(), next) {
            ("-file", Some(path)) => (Some(Mode::File(PathBuf::from(path))), 2),
            ("-text", _) => (Some(Mode::Text), 1),
            ("-list", _) => (Some(Mode::List), 1),
            ("-info", Some(op)) => (Some(Mode::Info(op.clone())), 2),
            ("-config", Some(path)) if config.is_none() => {
                config = Some(PathBuf::from(path));
                (None, 2)
            }
            _ => return None,
        };
        if let Some(parsed) = parsed {
            if mode.replace(parsed).is_some() {
                return None;
            }
        }
        i += width;
    }

    mode.map(|mode| Invocation { mode, config })
}

fn print_usage(program: &str) {
    println!("Prism v{}", prism::VERSION);
    println!();
    println!("Usage:");
    println!("  {} -file <script>   Run the commands in a script file", program);
    println!("  {} -text            Read commands from standard input until 'quit'", program);
    println!("  {} -list            List all available operations", program);
    println!("  {} -info <op>       Show detailed info about an operation", program);
    println!();
    println!("Options:");
    println!("  -config <path>      TOML configuration (default: ${})", prism::config::CONFIG_ENV_VAR);
    println!();
    println!("The graphical editor is not included in this build.");
}

fn run(invocation: Invocation) -> Result<ExitCode> {
    match invocation.mode {
        Mode::List => {
            list_operations();
            Ok(ExitCode::SUCCESS)
        }
        Mode::Info(op) => Ok(operation_info(&op)),
        Mode::File(path) => {
            let (_, report) =
                Dispatcher::run_configured(&path, invocation.config.as_deref(), print_event)
                    .with_context(|| format!("Failed to run script {}", path.display()))?;
            print_summary(&report);
            Ok(if report.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(2)
            })
        }
        Mode::Text => {
            let mut dispatcher = dispatcher(invocation.config)?;
            println!("Enter image processing commands (type 'quit' to quit):");
            let stdin = io::stdin();
            let report = dispatcher
                .run_script_with(stdin.lock(), print_event)
                .context("Failed to read commands from standard input")?;
            print_summary(&report);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn dispatcher(config: Option<PathBuf>) -> Result<Dispatcher> {
    let config = EngineConfig::discover(config.as_deref()).context("Failed to load configuration")?;
    Ok(Dispatcher::with_config(config))
}

fn print_event(event: ScriptEvent<'_>) {
    match event {
        ScriptEvent::Succeeded { command, executed, .. } => {
            if executed.outputs.is_empty() {
                println!("{}: done", command);
            } else {
                println!("{}: stored {}", executed.operation, executed.outputs.join(", "));
            }
        }
        ScriptEvent::Failed { line, command, error, hint } => {
            eprintln!("Line {}: {}", line, command);
            eprintln!("  Error: {}", error);
            if let Some(hint) = hint {
                eprintln!("  Hint: {}", hint);
            }
        }
    }
}

fn print_summary(report: &ScriptReport) {
    println!(
        "{} command(s) succeeded, {} failed{}",
        report.executed,
        report.failures.len(),
        if report.aborted { " (stopped at first failure)" } else { "" }
    );
}

fn list_operations() {
    let registry = OperationRegistry::with_builtins();
    let grouped = registry.grouped_by_category();

    println!("Available operations ({} total):", registry.len());
    println!();

    for (category, operations) in grouped {
        println!("  {}", category);
        for metadata in operations {
            println!("      {:<20} {}", metadata.id, metadata.description);
        }
        println!();
    }
}

fn operation_info(name: &str) -> ExitCode {
    let registry = OperationRegistry::with_builtins();

    let Some(metadata) = registry.get_metadata(name) else {
        eprintln!("Operation not found: {}", name);
        let close = registry.suggestions(name);
        if !close.is_empty() {
            eprintln!("Did you mean: {}?", close.join(", "));
        }
        eprintln!("Use -list to see available operations.");
        return ExitCode::from(1);
    };

    println!("Operation: {}", metadata.name);
    println!("Command: {}", metadata.id);
    println!("Category: {}", metadata.category);
    if !metadata.aliases.is_empty() {
        println!("Aliases: {}", metadata.aliases.join(", "));
    }
    println!();
    println!("Description:");
    println!("  {}", metadata.description);
    println!();

    println!("Usage:");
    for usage in metadata.usages() {
        println!("  {}", usage);
    }

    let mut seen = Vec::new();
    for signature in &metadata.signatures {
        for slot in &signature.slots {
            let (placeholder, description, constraints) = match slot {
                Slot::Parameter(p) => (
                    &p.display_name,
                    &p.description,
                    p.constraints.iter().map(Constraint::description).collect::<Vec<_>>(),
                ),
                Slot::Image(p) => (&p.display_name, &p.description, Vec::new()),
                Slot::Keyword { .. } => continue,
            };
            if seen.contains(placeholder) {
                continue;
            }
            seen.push(placeholder.clone());

            if seen.len() == 1 {
                println!();
                println!("Arguments:");
            }
            println!("  {:<12} {}", placeholder, description);
            for constraint in constraints {
                println!("  {:<12} ({})", "", constraint);
            }
        }
    }

    ExitCode::SUCCESS
}
