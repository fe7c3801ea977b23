//! Command-line surface: argument parsing and one-shot command dispatch.
//!
//! Arguments are parsed before anything else happens, so usage errors never
//! load a model. `batch` input is parsed before the model is loaded too.

mod error;


pub use error::CliError;

use std::io::Read;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use tracing::{debug, error};

use crate::config::Config;
use crate::payload::{BatchRequest, CommandOutput, ErrorResponse};
use crate::service::EmbeddingService;

#[derive(Debug, Parser)]
#[command(
    name = "sentence-embed",
    version,
    about = "Print sentence embeddings as JSON"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Encode one string
    Single {
        /// Text to encode, as a single argument (quote multi-word text)
        #[arg(allow_hyphen_values = true)]
        text: String,
    },
    /// Encode every string of {"texts": [...]} read from stdin
    Batch,
    /// Encode a built-in sentence and report the model's dimension
    Test,
    /// Load the model once and serve embeddings over HTTP
    Serve,
}

/// What `main` should do after parsing.
#[derive(Debug)]
pub enum Parsed {
    Run(Cli),
    /// `--help` / `--version`: print the text and exit successfully.
    Display(String),
    Failed(ErrorResponse),
}

/// Parses `args` (including the program name) without exiting the process.
pub fn parse<I, T>(args: I) -> Parsed
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => Parsed::Run(cli),
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            Parsed::Display(e.to_string())
        }
        Err(e) => Parsed::Failed(ErrorResponse::new(usage_message(&e))),
    }
}

/// First paragraph of a clap error, flattened to one line.
fn usage_message(err: &clap::Error) -> String {
    match err.kind() {
        ErrorKind::MissingSubcommand | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            "missing command (expected one of: single, batch, test, serve)".to_string()
        }
        _ => {
            let rendered = err.to_string();
            let paragraph: Vec<&str> = rendered
                .lines()
                .map(str::trim)
                .take_while(|line| !line.is_empty())
                .collect();
            paragraph
                .join(" ")
                .trim_start_matches("error:")
                .trim()
                .to_string()
        }
    }
}

/// Runs a one-shot command with configuration from the environment.
///
/// Never fails: errors come back as [`CommandOutput::Error`].
pub fn run<R: Read>(command: &Command, input: R) -> CommandOutput {
    let result = Config::from_env()
        .map_err(CliError::from)
        .and_then(|config| execute(command, &config, input));

    match result {
        Ok(output) => output,
        Err(e) => {
            error!(error = %e, "Command failed");
            CommandOutput::Error(ErrorResponse::new(e.to_string()))
        }
    }
}

/// Executes a one-shot command against an explicit configuration.
pub fn execute<R: Read>(
    command: &Command,
    config: &Config,
    input: R,
) -> Result<CommandOutput, CliError> {
    match command {
        Command::Single { text } => {
            let service = load_service(config)?;
            Ok(CommandOutput::Single(service.embed_single(text)?))
        }
        Command::Batch => {
            let request = read_batch_request(input)?;
            debug!(count = request.texts.len(), "Batch request parsed");
            let service = load_service(config)?;
            Ok(CommandOutput::Batch(service.embed_batch(&request.texts)?))
        }
        Command::Test => {
            let service = load_service(config)?;
            Ok(CommandOutput::Test(service.self_test()?))
        }
        Command::Serve => Err(CliError::NotOneShot),
    }
}

/// Reads and parses `{"texts": [...]}`.
pub fn read_batch_request<R: Read>(mut input: R) -> Result<BatchRequest, CliError> {
    let mut raw = String::new();
    input.read_to_string(&mut raw)?;
    if raw.trim().is_empty() {
        return Err(CliError::Usage(
            r#"batch expects a JSON object {"texts": [...]} on standard input"#.to_string(),
        ));
    }
    Ok(serde_json::from_str(&raw)?)
}

fn load_service(config: &Config) -> Result<EmbeddingService, CliError> {
    config.validate()?;
    Ok(EmbeddingService::load(config.sentence_config())?)
}
