//! datacontainer CLI - convert, validate and compare key/value payloads
//!
//! # Commands
//!
//! ```bash
//! datacontainer convert data.ini --to json        # Convert between formats
//! datacontainer validate data.json -O rules.json  # Check values against rules
//! datacontainer diff old.json new.json            # Show changed/new/removed keys
//! datacontainer operations                        # Show available preparation operations
//! ```
//!
//! The input format is taken from `--from`, or guessed from the file
//! extension. Options default to the file named by `DATACONTAINER_OPTIONS`
//! (a `.env` file is read first).

use clap::{Parser, Subcommand};
use datacontainer::formats::csv::detect_delimiter;
use datacontainer::{read_file, Container, ContainerOptions, Format, LOG_BROADCASTER};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "datacontainer")]
#[command(about = "Convert, validate and compare key/value payloads", long_about = None)]
struct Cli {
    /// Echo container log entries to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a payload from one format to another
    Convert {
        /// Input file
        input: PathBuf,

        /// Input format (guessed from the extension if not specified)
        #[arg(short, long)]
        from: Option<Format>,

        /// Output format
        #[arg(short, long)]
        to: Format,

        /// Options file (JSON)
        #[arg(short = 'O', long)]
        options: Option<PathBuf>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Load a payload through the validation rules and report rejections
    Validate {
        /// Input file
        input: PathBuf,

        /// Input format (guessed from the extension if not specified)
        #[arg(short, long)]
        from: Option<Format>,

        /// Options file (JSON) holding the rules
        #[arg(short = 'O', long)]
        options: Option<PathBuf>,
    },

    /// Compare two payloads key by key
    Diff {
        /// Original payload
        original: PathBuf,

        /// Modified payload
        modified: PathBuf,

        /// Format of both files (guessed from the extension if not specified)
        #[arg(short, long)]
        from: Option<Format>,
    },

    /// Show available preparation operations
    Operations,
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    LOG_BROADCASTER.set_echo(cli.verbose);

    let result = match cli.command {
        Commands::Convert {
            input,
            from,
            to,
            options,
            output,
        } => cmd_convert(&input, from, to, options.as_deref(), output.as_deref()),

        Commands::Validate {
            input,
            from,
            options,
        } => cmd_validate(&input, from, options.as_deref()),

        Commands::Diff {
            original,
            modified,
            from,
        } => cmd_diff(&original, &modified, from),

        Commands::Operations => cmd_operations(),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Explicit format, else one guessed from the extension, else JSON.
fn input_format(path: &Path, explicit: Option<Format>) -> Format {
    if let Some(format) = explicit {
        return format;
    }
    match path.extension().and_then(|e| e.to_str()) {
        Some("xml") => Format::Xml,
        Some("csv") | Some("tsv") => Format::Csv,
        Some("ini") | Some("cfg") | Some("conf") => Format::Ini,
        Some("ser") | Some("php") => Format::Serialized,
        _ => Format::Json,
    }
}

/// Options from `--options`, else from the environment; `None` when neither is set.
fn load_options(path: Option<&Path>) -> CliResult<Option<ContainerOptions>> {
    if let Some(path) = path {
        eprintln!("   Options: {}", path.display());
        return Ok(Some(ContainerOptions::from_file(path)?));
    }
    let options = ContainerOptions::from_env()?;
    if options.is_some() {
        eprintln!("   Options: ${}", datacontainer::OPTIONS_ENV);
    }
    Ok(options)
}

/// Build a container from a payload file in construction mode.
///
/// Without options, the CSV delimiter is detected from the content.
fn load_container(
    path: &Path,
    format: Format,
    options: Option<ContainerOptions>,
) -> CliResult<Container> {
    let content = read_file(path)?;

    let options = match options {
        Some(options) => options,
        None => {
            let mut options = ContainerOptions::default();
            if format == Format::Csv {
                options.formats.csv_delimiter = detect_delimiter(&content);
                eprintln!("   Delimiter: '{}'", format_delimiter(options.formats.csv_delimiter));
            }
            options
        }
    };

    Ok(Container::with_options(options.with_data(format, content))?)
}

fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}

fn cmd_convert(
    input: &Path,
    from: Option<Format>,
    to: Format,
    options_path: Option<&Path>,
    output: Option<&Path>,
) -> CliResult<()> {
    let from = input_format(input, from);
    eprintln!("📄 Converting: {} ({} → {})", input.display(), from, to);

    let options = load_options(options_path)?;
    let container = load_container(input, from, options)?;
    eprintln!("   Keys: {}", container.len());

    if container.has_errors() {
        eprintln!("   ⚠️  {} key(s) rejected by validation", container.errors().len());
    }

    let content = container.export(to)?;
    write_output(&content, output)?;

    Ok(())
}

fn cmd_validate(input: &Path, from: Option<Format>, options_path: Option<&Path>) -> CliResult<()> {
    let from = input_format(input, from);
    eprintln!("✔️  Validating: {} ({})", input.display(), from);

    let options = load_options(options_path)?;
    let container = load_container(input, from, options)?;

    let rejected = container.errors().len();
    let accepted = container.len();

    for (key, messages) in container.errors().iter().take(10) {
        eprintln!("\n❌ Key '{}' rejected:", key);
        for message in messages.iter().take(3) {
            eprintln!("   - {}", message);
        }
    }

    eprintln!("\n📊 Results: {} accepted, {} rejected", accepted, rejected);

    if rejected > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn cmd_diff(original: &Path, modified: &Path, from: Option<Format>) -> CliResult<()> {
    let format = input_format(original, from);
    eprintln!("🔍 Comparing: {} → {}", original.display(), modified.display());

    let mut container = Container::from_format(format, &read_file(original)?)?;
    let target = Container::from_format(format, &read_file(modified)?)?;

    let removed: Vec<String> = container
        .keys()
        .filter(|k| !target.has_data(k))
        .map(str::to_string)
        .collect();
    for key in &removed {
        container.unset_data(key);
    }
    container.merge(&target);

    let changed = container.changed_keys();
    if changed.is_empty() {
        eprintln!("✅ No differences");
        return Ok(());
    }

    for key in &changed {
        let before = container.get_original_data(key);
        let after = container.get_data(key);
        match (before, after) {
            (None, Some(after)) => println!("+ {}: {}", key, render(&after)),
            (Some(before), None) => println!("- {}: {}", key, render(&before)),
            (Some(before), Some(after)) => {
                println!("~ {}: {} → {}", key, render(&before), render(&after))
            }
            (None, None) => {}
        }
    }

    eprintln!("\n📊 {} key(s) differ", changed.len());
    Ok(())
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => format!("{:?}", s),
        other => other.to_string(),
    }
}

fn cmd_operations() -> CliResult<()> {
    println!("{}", datacontainer::operations_description());
    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> CliResult<()> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            print!("{}", content);
            if !content.ends_with('\n') {
                println!();
            }
        }
    }
    Ok(())
}
