use anyhow::Context;
use clap::{Parser, Subcommand};
use recipez_server::config::Config;
use recipez_server::migrations::MigrationChain;
use recipez_server::telemetry::init_telemetry;
use recipez_server::{api, app, db, AppState};
use std::future::Future;

#[derive(Debug, Parser)]
#[command(name = "recipez-server", version, about = "Recipez recipe server")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Inspect or move the database schema version
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },
    /// Print the OpenAPI document and exit
    Openapi,
}

#[derive(Debug, Subcommand)]
enum MigrateAction {
    /// Apply pending migrations, by default all of them
    Upgrade {
        /// Stop once this revision is applied
        #[arg(long)]
        to: Option<String>,
    },
    /// Revert the current migration, or down to a given revision
    Downgrade {
        /// Stop once this revision is the head
        #[arg(long, conflicts_with = "base")]
        to: Option<String>,
        /// Revert everything
        #[arg(long)]
        base: bool,
    },
    /// Print the applied revision
    Current,
    /// List every known revision, oldest first
    History,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Openapi => {
            println!("{}", api::openapi().to_pretty_json()?);
            Ok(())
        }
        Command::Migrate { action } => {
            let config = Config::from_env()?;
            run(config.workers, async move { migrate(&config, action) })
        }
        Command::Serve => {
            let config = Config::from_env()?;
            run(config.workers, serve(config))
        }
    }
}

/// Drive `task` on a runtime with `workers` threads, with telemetry set up
/// inside it and flushed afterwards.
fn run<F>(workers: usize, task: F) -> anyhow::Result<()>
where
    F: Future<Output = anyhow::Result<()>>,
{
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(workers)
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;

    runtime.block_on(async {
        let telemetry = init_telemetry();
        let result = task.await;
        if let Err(e) = &result {
            tracing::error!(error = %e, "exiting with error");
        }
        telemetry.shutdown();
        result
    })
}

fn migrate(config: &Config, action: MigrateAction) -> anyhow::Result<()> {
    let chain = MigrationChain::recipez()?;
    let pool = db::create_pool(config)?;
    let mut conn = pool.get()?;

    match action {
        MigrateAction::Upgrade { to } => {
            let applied = match to.as_deref() {
                Some(target) => chain.upgrade_to(&mut conn, target)?,
                None => chain.upgrade_to_head(&mut conn)?,
            };
            println!("applied {} migration(s)", applied.len());
            for revision in applied {
                println!("  {revision}");
            }
        }
        MigrateAction::Downgrade { to, base } => {
            let reverted = if base {
                chain.downgrade_to(&mut conn, None)?
            } else if let Some(target) = to.as_deref() {
                chain.downgrade_to(&mut conn, Some(target))?
            } else {
                vec![chain.downgrade_one(&mut conn)?]
            };
            println!("reverted {} migration(s)", reverted.len());
            for revision in reverted {
                println!("  {revision}");
            }
        }
        MigrateAction::Current => match chain.current(&mut conn)? {
            Some(revision) if Some(revision.as_str()) == chain.head() => {
                println!("{revision} (head)")
            }
            Some(revision) => println!("{revision}"),
            None => println!("<base>"),
        },
        MigrateAction::History => {
            for migration in chain.history() {
                println!(
                    "{} -> {}  {}",
                    migration.down_revision().unwrap_or("<base>"),
                    migration.revision(),
                    migration.description()
                );
            }
        }
    }
    Ok(())
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let pool = db::create_pool(&config).context("failed to create database pool")?;

    if config.run_migrations {
        let mut conn = pool.get()?;
        let applied = MigrationChain::recipez()?.upgrade_to_head(&mut conn)?;
        if !applied.is_empty() {
            tracing::info!(count = applied.len(), "applied pending migrations on startup");
        }
    }

    let bind = config.bind;
    tracing::info!(
        environment = ?config.environment,
        domain = %config.domain,
        workers = config.workers,
        "starting recipez-server"
    );

    let app = app(AppState::new(pool, config));
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;

    let local = listener.local_addr()?;
    tracing::info!("Server listening on {}", local);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", local);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received, draining connections");
}
