//! `dto2json` CLI: convert object dumps to JSON from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Parse a Java toString() dump (stdin → stdout)
//! echo 'Person(name="Alice", age=30)' | dto2json parse --language JAVA
//!
//! # Parse a C# initializer from a file, compact output to a file
//! dto2json parse -l CSHARP -i order.cs.txt -o order.json --compact
//!
//! # Which dialects accept this input?
//! echo 'listOf(1, 2)' | dto2json detect
//!
//! # Handle a {"language": ..., "inputTxt": ...} request document
//! dto2json request -i request.json
//!
//! # List supported language tags
//! dto2json languages
//! ```
//!
//! Parse failures print an `{"kind": ..., "message": ...}` body on stderr and exit
//! with status 1. Set `RUST_LOG=debug` to see dispatch decisions on stderr.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use dto2json_core::{
    BracketMode, ErrorBody, Language, ParseOptions, ParseRequest, Registry, DEFAULT_MAX_DEPTH,
};
use std::io::{self, Read};
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "dto2json",
    version,
    about = "Convert Java, Kotlin and C# object dumps to JSON"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ParserArgs {
    /// Maximum nesting depth before the input is rejected
    #[arg(long, env = "DTO2JSON_MAX_DEPTH", default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,
    /// Reject closing brackets that do not match their opener
    #[arg(long)]
    strict_brackets: bool,
}

impl ParserArgs {
    fn options(&self) -> ParseOptions {
        let mode = if self.strict_brackets {
            BracketMode::Strict
        } else {
            BracketMode::Lenient
        };
        ParseOptions::default()
            .with_max_depth(self.max_depth)
            .with_bracket_mode(mode)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Parse an object dump written in the given language
    Parse {
        /// Language tag: JAVA, KOTLIN or CSHARP
        #[arg(short, long)]
        language: String,
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Print compact JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
        #[command(flatten)]
        parser: ParserArgs,
    },
    /// List the languages whose syntax check accepts the input
    Detect {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Handle a {"language": ..., "inputTxt": ...} request document
    Request {
        /// Request JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Print compact JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
        #[command(flatten)]
        parser: ParserArgs,
    },
    /// Print the supported language tags
    Languages,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Parse {
            language,
            input,
            output,
            compact,
            parser,
        } => {
            let text = read_input(input.as_deref())?;
            let registry = Registry::new(parser.options());
            match registry.dispatch(&language, &text) {
                Ok(value) => write_json(output.as_deref(), &value.to_json(), compact)?,
                Err(err) => fail(&ErrorBody::from(err)),
            }
        }
        Commands::Detect { input } => {
            let text = read_input(input.as_deref())?;
            let languages = dto2json_core::detect(&text);
            if languages.is_empty() {
                eprintln!("No supported language accepts this input");
                process::exit(1);
            }
            for language in languages {
                println!("{language}");
            }
        }
        Commands::Request {
            input,
            output,
            compact,
            parser,
        } => {
            let raw = read_input(input.as_deref())?;
            let request: ParseRequest =
                serde_json::from_str(&raw).context("Failed to parse request JSON")?;
            let registry = Registry::new(parser.options());
            match dto2json_core::handle(&registry, &request) {
                Ok(json) => write_json(output.as_deref(), &json, compact)?,
                Err(body) => fail(&body),
            }
        }
        Commands::Languages => {
            for language in Language::ALL {
                println!("{language}");
            }
        }
    }

    Ok(())
}

/// Log to stderr so stdout carries only JSON. `RUST_LOG` overrides the default level.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

/// Print the error body on stderr and exit with status 1.
fn fail(body: &ErrorBody) -> ! {
    match serde_json::to_string(body) {
        Ok(json) => eprintln!("{json}"),
        Err(_) => eprintln!("{}", body.message),
    }
    process::exit(1);
}

fn write_json(path: Option<&str>, json: &serde_json::Value, compact: bool) -> Result<()> {
    let mut rendered = if compact {
        serde_json::to_string(json)?
    } else {
        serde_json::to_string_pretty(json)?
    };
    rendered.push('\n');
    write_output(path, &rendered)
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read file: {}", path))?;
            debug!(path, bytes = content.len(), "read input file");
            Ok(content)
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
