//! `sentence-embed` entrypoint.
//!
//! Stdout carries exactly one JSON record per one-shot invocation; logs go to stderr.

use std::io;
use std::process::ExitCode;

use mimalloc::MiMalloc;
use tracing_subscriber::EnvFilter;

use sentence_embed::cli::{self, Command, Parsed};
use sentence_embed::config::{Config, ServeConfig};
use sentence_embed::gateway::{self, HandlerState};
use sentence_embed::payload::{CommandOutput, ErrorResponse};
use sentence_embed::service::EmbeddingService;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> ExitCode {
    let cli = match cli::parse(std::env::args_os()) {
        Parsed::Run(cli) => cli,
        Parsed::Display(text) => {
            print!("{text}");
            return ExitCode::SUCCESS;
        }
        Parsed::Failed(err) => return emit(&CommandOutput::Error(err)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();

    if cli.command == Command::Serve {
        return match run_server() {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                tracing::error!(error = %e, "Server failed");
                emit(&CommandOutput::Error(ErrorResponse::new(format!("{e:#}"))))
            }
        };
    }

    let output = cli::run(&cli.command, io::stdin().lock());
    emit(&output)
}

fn emit(output: &CommandOutput) -> ExitCode {
    println!("{}", output.to_json());
    if output.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

fn run_server() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    config.validate()?;
    let serve = ServeConfig::from_env()?;
    let addr = serve.socket_addr();

    tracing::info!(
        model = %config.model_id,
        bind_addr = %serve.bind_addr,
        port = serve.port,
        "sentence-embed starting in serve mode"
    );

    let service = EmbeddingService::load(config.sentence_config())?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(gateway::serve(addr, HandlerState::new(service)))?;

    Ok(())
}
