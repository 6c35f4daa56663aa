//! CLI entrypoint for magi
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use magi_application::{
    CancelReason, ConversationLogger, NoConversationLogger, NoPhaseProgress,
    PhaseOrchestrator, PhaseProgressNotifier, SessionDriver, SessionOutcome, SnapshotStore,
};
use magi_infrastructure::{
    ConfigLoader, FileConfig, JsonSnapshotStore, JsonlConversationLogger, ToolRegistry, Workspace,
    build_agents,
};
use magi_presentation::{Cli, ConsoleFormatter, ConsoleProgress};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let _log_guard = init_tracing(&cli)?;

    if cli.show_config {
        print!("{}", ConfigLoader::describe_sources(cli.config.as_deref()));
        let config = load_config(&cli)?;
        println!();
        println!("{}", toml::to_string_pretty(&config)?);
        return Ok(ExitCode::SUCCESS);
    }

    let config = load_config(&cli)?;
    info!("Starting magi");

    // === Dependency Injection ===
    let root = match cli.workspace.clone().or_else(|| config.tools.workspace_root.clone()) {
        Some(root) => root,
        None => std::env::current_dir().context("Cannot determine the working directory")?,
    };
    let workspace = Workspace::new(&root)
        .with_context(|| format!("Invalid workspace root {}", root.display()))?;
    info!(root = %workspace.root().display(), "Workspace opened");

    let registry = ToolRegistry::builtin(workspace, &config.tools.to_settings())?;
    let agents = build_agents(&config)?;

    let progress: Arc<dyn PhaseProgressNotifier> = if cli.quiet {
        Arc::new(NoPhaseProgress)
    } else if cli.verbose > 0 {
        Arc::new(ConsoleProgress::verbose())
    } else {
        Arc::new(ConsoleProgress::new())
    };

    let logger: Arc<dyn ConversationLogger> = match &config.logging.conversation_log {
        Some(path) => match JsonlConversationLogger::open(path) {
            Ok(logger) => {
                info!(path = %logger.path().display(), "Conversation log enabled");
                Arc::new(logger)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not open conversation log");
                Arc::new(NoConversationLogger)
            }
        },
        None => Arc::new(NoConversationLogger),
    };

    let orchestrator = PhaseOrchestrator::new(agents, Arc::new(registry))
        .with_progress(progress)
        .with_conversation_logger(logger);
    let driver = Arc::new(SessionDriver::new(
        Arc::new(orchestrator),
        config.session.to_session_params(),
    ));

    let snapshot_path = cli
        .snapshot
        .clone()
        .unwrap_or_else(|| config.session.snapshot_path.clone());
    let store = JsonSnapshotStore::new(&snapshot_path);

    spawn_interrupt_handler(Arc::clone(&driver));

    let handle = if cli.resume {
        let Some(snapshot) = store
            .load()
            .await
            .with_context(|| format!("Cannot read snapshot {}", snapshot_path.display()))?
        else {
            bail!("No saved session at {}", snapshot_path.display());
        };
        if !cli.quiet {
            println!("Resuming: {}", snapshot.request);
        }
        driver.resume(snapshot).await?
    } else {
        let Some(request) = cli.request.clone() else {
            bail!("A request is required unless --resume is given");
        };
        if !cli.quiet {
            println!("Request: {}", request);
        }
        driver.start(request).await?
    };

    let outcome = handle.join().await?;

    let (saved, code) = match &outcome {
        SessionOutcome::Completed { .. } => {
            store.clear().await?;
            (None, ExitCode::SUCCESS)
        }
        SessionOutcome::Cancelled { snapshot, reason } => {
            store
                .save(snapshot)
                .await
                .with_context(|| format!("Cannot write snapshot {}", snapshot_path.display()))?;
            let code = match reason {
                CancelReason::Requested => ExitCode::from(130),
                CancelReason::Fatal(_) => ExitCode::FAILURE,
            };
            (Some(store.path()), code)
        }
    };

    print!("{}", ConsoleFormatter::format(&outcome, cli.output, saved));
    Ok(code)
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref()).context("Failed to load configuration")?
    };
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Verbosity from `-v` count; `--log-file` sends logs through a
/// non-blocking file writer whose guard must outlive `main`.
fn init_tracing(cli: &Cli) -> Result<Option<WorkerGuard>> {
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let Some(path) = &cli.log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let Some(file_name) = path.file_name() else {
        bail!("--log-file must name a file: {}", path.display());
    };
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Cannot create log directory {}", dir.display()))?;

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(&dir, file_name));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer)
        .init();
    Ok(Some(guard))
}

/// First Ctrl-C cancels cooperatively; a second one exits immediately.
fn spawn_interrupt_handler(driver: Arc<SessionDriver>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        eprintln!("\nCancelling after the current step... (Ctrl-C again to quit)");
        driver.cancel();

        if tokio::signal::ctrl_c().await.is_ok() {
            std::process::exit(130);
        }
    });
}
