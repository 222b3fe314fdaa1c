//! CLI entrypoint for Agents Council
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use council_application::{DeliberationRepository, DeliberationStateMachine, RoundCheckpointer};
use council_domain::{Deliberation, OutputFormat};
use council_infrastructure::{
    ConfigLoader, FileConfig, JsonDeliberationStore, JsonlEventLogger, build_registry,
};
use council_presentation::{
    Cli, ConsoleFormatter, OutputFormatter, ProgressReporter, SimpleProgress,
};
use std::io::IsTerminal;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level; RUST_LOG wins when set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    info!("Starting Agents Council");

    // === Configuration ===
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())?
    };
    apply_cli_overrides(&mut config, &cli);
    check_config(&config)?;

    if !config.output.color {
        ConsoleFormatter::set_color(false);
    }
    let format: OutputFormat = cli
        .output
        .map(Into::into)
        .or(config.output.format)
        .unwrap_or_default();

    let topic = match cli.topic.as_deref().map(str::trim) {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => bail!("A topic is required, e.g. agents-council \"Should we adopt Rust?\""),
    };

    // === Dependency Injection ===
    let panel = config
        .council
        .to_panel()
        .context("Invalid council definition")?;
    let registry = Arc::new(build_registry(&config).context("Failed to set up providers")?);
    if registry.is_empty() {
        bail!("No provider is enabled. Enable [providers.ollama] in the configuration.");
    }

    let store = match config.storage.path.clone() {
        Some(path) => {
            let store = JsonDeliberationStore::open(&path)
                .await
                .with_context(|| format!("Failed to open store {}", path.display()))?;
            info!("Persisting deliberations to {}", store.path().display());
            Some(Arc::new(store))
        }
        None => None,
    };

    let pending = Deliberation::new(panel.id, topic.as_str())?;
    if let Some(store) = &store {
        store.save(&pending).await?;
    }

    let mut machine =
        DeliberationStateMachine::from_deliberation(panel.clone(), pending, registry)?
            .with_params(config.deliberation.to_params());

    if !cli.quiet {
        if std::io::stderr().is_terminal() {
            machine.subscribe(Arc::new(ProgressReporter::new()));
        } else {
            machine.subscribe(Arc::new(SimpleProgress));
        }
    }
    if let Some(path) = &config.logging.events_path {
        match JsonlEventLogger::new(path) {
            Some(logger) => machine.subscribe(Arc::new(logger)),
            None => warn!("Event log disabled: could not open {}", path.display()),
        }
    }

    if let Some(store) = &store {
        store.save(machine.deliberation()).await?;
        // Each completed round is saved as it happens
        let checkpointer = RoundCheckpointer::new(
            Arc::clone(store) as Arc<dyn DeliberationRepository>,
            panel,
            machine.deliberation().clone(),
        );
        machine.subscribe(Arc::new(checkpointer));
    }

    // Ctrl-C requests a graceful stop
    let token = machine.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling deliberation");
            token.cancel();
        }
    });

    if !cli.quiet {
        eprintln!("\nTopic: {}\n", topic);
    }

    let result = machine.run().await;

    if let Some(store) = &store
        && let Err(e) = store.save(machine.deliberation()).await
    {
        error!("Failed to persist deliberation: {}", e);
    }

    let deliberation = result?;
    println!("{}", ConsoleFormatter.render(&deliberation, format));

    Ok(())
}

/// Command-line flags take precedence over every configuration source
fn apply_cli_overrides(config: &mut FileConfig, cli: &Cli) {
    if let Some(rounds) = cli.rounds {
        config.council.max_rounds = rounds;
    }
    if let Some(threshold) = cli.threshold {
        config.council.consensus_threshold = threshold;
    }
    if let Some(path) = &cli.store {
        config.storage.path = Some(path.clone());
    }
    if let Some(path) = &cli.events {
        config.logging.events_path = Some(path.clone());
    }
}

fn check_config(config: &FileConfig) -> Result<()> {
    let issues = config.validate();
    for issue in issues.iter().filter(|i| !i.is_error()) {
        warn!("{}", issue);
    }

    let errors: Vec<_> = issues.iter().filter(|i| i.is_error()).collect();
    if errors.is_empty() {
        return Ok(());
    }
    for issue in &errors {
        eprintln!("config error: {}", issue);
    }
    bail!("Invalid configuration ({} error(s))", errors.len())
}
