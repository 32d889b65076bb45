mod cli;
mod error_fmt;
mod run;

use std::path::Path;

use clap::Parser;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::cli::{Cli, Commands, JSON_MODE};
use crate::error_fmt::{exit_code_for_error, format_error_json, humanize};

fn main() {
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);
    let _ = color_eyre::install();

    let code = match real_main(cli) {
        Ok(code) => code,
        Err(e) => {
            if JSON_MODE.get().copied().unwrap_or(false) {
                eprintln!("{}", format_error_json(&e));
            } else {
                eprintln!("{}", humanize(&e));
            }
            exit_code_for_error(&e)
        }
    };
    std::process::exit(code);
}

fn real_main(cli: Cli) -> eyre::Result<i32> {
    // Config errors must still be reported, so logging comes up after a successful load.
    let cfg = run::load_config(cli.config.as_deref())?;
    // Dropped when this returns, which flushes the log file before exit.
    let _file_guard = init_tracing(&cli, &cfg.logging)?;

    match &cli.cmd {
        Commands::Run {
            samples,
            overrides,
            steps,
        } => run::run_cmd(&cfg, samples, overrides, *steps, cli.json),
        Commands::Explain { samples, overrides } => {
            run::explain_cmd(&cfg, samples, overrides, cli.json)
        }
        Commands::Check => run::check_cmd(&cfg, cli.json),
    }
}

/// Console logs go to stderr (JSON with --json); `[logging] file` adds a JSON-lines file.
///
/// Level precedence: RUST_LOG, then --log-level, then `[logging] level`, then "info".
fn init_tracing(
    cli: &Cli,
    logging: &chute_config::Logging,
) -> eyre::Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let level = cli
        .log_level
        .clone()
        .or_else(|| logging.level.clone())
        .unwrap_or_else(|| "info".to_string());
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&level))
        .map_err(|e| eyre::eyre!("invalid log level {level:?}: {e}"))?;

    let console = if cli.json {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .boxed()
    };

    let mut guard = None;
    let file_layer = match logging.file.as_deref() {
        Some(path) => {
            let path = Path::new(path);
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .ok_or_else(|| eyre::eyre!("logging.file {path:?} has no file name"))?;
            std::fs::create_dir_all(dir)
                .map_err(|e| eyre::eyre!("create log directory {dir:?}: {e}"))?;
            let appender = match logging.rotation.as_deref() {
                Some("daily") => tracing_appender::rolling::daily(dir, name),
                Some("hourly") => tracing_appender::rolling::hourly(dir, name),
                _ => tracing_appender::rolling::never(dir, name),
            };
            let (writer, file_guard) = tracing_appender::non_blocking(appender);
            guard = Some(file_guard);
            Some(fmt::layer().json().with_writer(writer).boxed())
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file_layer)
        .with(filter)
        .try_init()
        .map_err(|e| eyre::eyre!("init tracing: {e}"))?;
    Ok(guard)
}
