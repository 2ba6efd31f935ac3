use clap::{error::ErrorKind, Parser};
use std::{io::Write, path::PathBuf, process::ExitCode};
use tracing::{error, info_span};
use uuid::Uuid;

mod config;
mod encoding;
mod engine;
mod error;
mod model;
mod predictor;
mod report;
mod schema;
mod types;

use config::Config;
use error::PredictError;
use report::Reporter;

/// Recommend a field of study from questionnaire answers.
#[derive(Parser, Debug)]
#[command(name = "jurusan-predict", version)]
struct Cli {
    /// Questionnaire answers as a single JSON object
    input: Option<String>,

    /// Classifier artifact (default: ../model/ beside the binary).
    /// Settings are also read from jurusan.toml beside the binary and JURUSAN_* variables
    #[arg(long, value_name = "PATH")]
    model: Option<PathBuf>,

    /// Number of ranked classes to report
    #[arg(long, value_name = "N")]
    top_k: Option<usize>,
}

fn main() -> ExitCode {
    let mut reporter = Reporter::stdout();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            init_tracing(config::DEFAULT_LOG_FILTER);
            let message = e.to_string();
            let first = message.lines().next().unwrap_or_default();
            return fail(&mut reporter, PredictError::Decode(first.trim_start_matches("error: ").to_string()));
        }
    };

    match predict(cli, &mut reporter) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => fail(&mut reporter, err),
    }
}

fn predict<W: Write>(cli: Cli, reporter: &mut Reporter<W>) -> Result<(), PredictError> {
    let config = match Config::load().and_then(|c| c.with_overrides(cli.model, cli.top_k)) {
        Ok(config) => config,
        Err(err) => {
            // the configured filter is unknown, fall back so the failure is still logged
            init_tracing(config::DEFAULT_LOG_FILTER);
            return Err(err);
        }
    };
    init_tracing(&config.log_filter);

    let run_id = Uuid::new_v4();
    let span = info_span!("predict", %run_id);
    let _guard = span.enter();

    let result = engine::run(cli.input.as_deref(), &config, reporter)?;
    reporter.result(&result)
}

fn init_tracing(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn fail<W: Write>(reporter: &mut Reporter<W>, err: PredictError) -> ExitCode {
    error!(error = %err, "Prediction failed");
    if let Err(io_err) = reporter.error(&err) {
        eprintln!("{} {} ({})", report::ERROR_MARKER, err, io_err);
    }
    ExitCode::FAILURE
}
