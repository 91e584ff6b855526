//! trql CLI
//!
//! Parses TRQL source with a chosen entry point and prints the syntax tree,
//! or dumps the token stream.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use trql_core::{
    parse_with_options, EntryPoint, Lexer, ParseError, ParserOptions, DEFAULT_MAX_DEPTH,
};

/// Parser and pretty-printer for TRQL.
#[derive(Parser)]
#[command(name = "trql")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Maximum nesting depth before parsing fails.
    #[arg(long, global = true, env = "TRQL_MAX_DEPTH", default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse input and print the syntax tree.
    Parse {
        /// Grammar entry point: program, expr, select, full_template,
        /// string_template, identifier or column_type.
        #[arg(short, long, default_value_t = EntryPoint::Program)]
        entry: EntryPoint,

        /// Output format.
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Input file (stdin if not specified or `-`).
        file: Option<PathBuf>,
    },

    /// Print the code tokens of the input, one per line.
    Tokens {
        /// Input file (stdin if not specified or `-`).
        file: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// The tree as JSON.
    Json,
    /// The tree in Rust debug notation.
    Debug,
    /// Normalized TRQL source.
    Text,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Parse {
            entry,
            format,
            file,
        } => {
            let input = read_input(file.as_ref())?;
            let options = ParserOptions {
                max_depth: cli.max_depth,
            };
            let parsed = match parse_with_options(entry, &input, options) {
                Ok(parsed) => parsed,
                Err(err) => {
                    if format == Format::Json {
                        println!("{}", serde_json::to_string_pretty(&err)?);
                    }
                    bail!("{}", render_error(&input, &err));
                }
            };
            match format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&parsed)?),
                Format::Debug => println!("{parsed:#?}"),
                Format::Text => println!("{parsed}"),
            }
        }

        Commands::Tokens { file } => {
            let input = read_input(file.as_ref())?;
            for token in Lexer::new(&input).tokenize() {
                let text = input.get(token.span.start..token.span.end).unwrap_or_default();
                println!(
                    "{}:{}\t{}\t{text}",
                    token.span.line, token.span.column, token.kind
                );
            }
        }
    }

    Ok(())
}

fn read_input(file: Option<&PathBuf>) -> anyhow::Result<String> {
    match file {
        Some(path) if path.as_os_str() != "-" => {
            debug!(path = %path.display(), "reading input");
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
        }
        _ => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("failed to read stdin")?;
            Ok(input)
        }
    }
}

/// Formats an error with the offending source line and a caret under the
/// error column.
fn render_error(input: &str, err: &ParseError) -> String {
    let line_number = usize::try_from(err.span.line).unwrap_or(1).max(1);
    let column = usize::try_from(err.span.column).unwrap_or(1).max(1);
    let Some(line) = input.lines().nth(line_number - 1) else {
        return err.to_string();
    };
    format!(
        "{err}\n{line_number:>4} | {line}\n     | {}^",
        " ".repeat(column - 1)
    )
}
