//! CLI entrypoint for chorus
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use chorus_application::{AnswerQueryUseCase, NoProgress, ProgressNotifier};
use chorus_domain::{OutputFormat, Query, ResponseMixer, Router, TopicClassifier};
use chorus_infrastructure::{
    ConfigError, ConfigLoader, FileConfig, build_registry, execution_params,
};
use chorus_presentation::{
    ChatRepl, Cli, ProgressReporter, SimpleProgress, answer_until_interrupted, formatter_for,
};
use clap::Parser;
use std::io::IsTerminal;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_guard = init_logging(&cli)?;

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    info!("Starting chorus");

    // === Configuration ===
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).map_err(ConfigError::from)?
    };

    let issues = config.validate();
    for issue in issues.iter().filter(|i| !i.is_error()) {
        warn!("{}", issue.message);
    }
    ConfigError::check(&issues)?;

    // === Dependency Injection ===
    let use_case = Arc::new(build_use_case(&config, &cli)?);

    let format: OutputFormat = cli
        .output
        .map(Into::into)
        .or(config.output.format)
        .unwrap_or_default();
    let color = config.output.color && std::io::stdout().is_terminal();

    // Chat mode
    if cli.chat {
        let repl = ChatRepl::new(use_case)
            .with_progress(!cli.quiet && config.repl.show_progress)
            .with_history_file(config.repl.history_file.as_ref().map(Into::into))
            .with_output(format, color);

        repl.run().await?;
        return Ok(());
    }

    // Single question mode - question is required
    let Some(question) = cli.question.as_deref() else {
        bail!("Question is required. Use --chat for interactive mode.");
    };
    let query = Query::new(question)?;

    let reporter = ProgressReporter::new();
    let progress: &dyn ProgressNotifier = if cli.quiet {
        &NoProgress
    } else if std::io::stderr().is_terminal() {
        &reporter
    } else {
        &SimpleProgress
    };

    let result = answer_until_interrupted(&use_case, &query, progress).await;
    reporter.clear();

    match result {
        Ok(response) => {
            println!("{}", formatter_for(format, color).format(&response));
            Ok(())
        }
        Err(e) if e.is_cancelled() => {
            eprintln!("Cancelled.");
            drop(log_guard);
            std::process::exit(130);
        }
        Err(e) => Err(e.into()),
    }
}

/// Wire registry, router, mixer and coordinator from configuration
fn build_use_case(config: &FileConfig, cli: &Cli) -> Result<AnswerQueryUseCase> {
    let registry = build_registry(config)?;
    info!(
        "Registered backends: {}",
        registry.names().collect::<Vec<_>>().join(", ")
    );

    let classifier = TopicClassifier::new(&config.router.vocabulary())
        .context("Invalid [router.topics] vocabulary")?;
    let mut policy = config.router.to_routing_policy();
    if cli.single {
        policy = policy.with_multi_model(false);
    }

    let mut mixer_config = config
        .mixer
        .to_mixer_config(config.router.priority_order())?;
    if let Some(strategy) = cli.strategy {
        mixer_config = mixer_config.with_strategy(strategy);
    }

    let use_case = AnswerQueryUseCase::new(
        Arc::new(registry),
        Router::new(classifier, policy),
        ResponseMixer::new(mixer_config)?,
        execution_params(config),
    )?;
    Ok(use_case)
}

/// Initialize logging based on verbosity level or RUST_LOG
///
/// Logs go to stderr; `--log-file` adds a non-blocking file writer. The
/// returned guard flushes the file on drop.
fn init_logging(cli: &Cli) -> Result<Option<WorkerGuard>> {
    let filter = if cli.verbose == 0 {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    } else {
        EnvFilter::new(match cli.verbose {
            1 => "info",
            2 => "debug",
            _ => "trace", // -vvv or more
        })
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match &cli.log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            builder
                .with_ansi(false)
                .with_writer(std::io::stderr.and(writer))
                .init();
            Ok(Some(guard))
        }
        None => {
            builder.with_writer(std::io::stderr).init();
            Ok(None)
        }
    }
}
