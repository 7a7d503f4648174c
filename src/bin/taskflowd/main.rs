//! Runs the recurring-task scheduler as a long-lived process.
//!
//! Usage:
//!
//! ```text
//! taskflowd [--config <path>] [--log-level <filter>] [--database-url <url>] [--pool-size <n>]
//! ```
//!
//! On start the daemon stores the `[[periodic_tasks]]` seeds from the config
//! file, arms a trigger for every active template and waits for Ctrl-C.
//! Materialized tasks go to `PostgreSQL` when a database URL is configured
//! and to an in-memory store otherwise. A representative config file is:
//!
//! ```toml
//! log_level = "taskflow=debug,info"
//! database_url = "postgres://taskflow@localhost/taskflow"
//! pool_size = 4
//!
//! [[periodic_tasks]]
//! title = "Weekly backup check"
//! cron_expression = "0 9 * * 1"
//! default_effort = 2
//! default_priority = "medium"
//! created_by = "6f1c2a4e-8f43-4b0e-9a55-0d2f3c1b7e90"
//! ```

mod config;


use clap::Parser;
use config::{ConfigError, DaemonArgs, DaemonConfig, TemplateSeed};
use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use mockable::{Clock, DefaultClock};
use std::sync::Arc;
use taskflow::periodic::{
    adapters::{memory::InMemoryPeriodicTaskRepository, runtime::TokioJobScheduler},
    domain::{PeriodicDomainError, PeriodicTask},
    ports::{PeriodicRepositoryError, PeriodicTaskRepository},
    services::{PeriodicServiceError, PeriodicTaskMaterializer, PeriodicTaskService},
};
use taskflow::task::{
    adapters::{memory::InMemoryTaskRepository, postgres::PostgresTaskRepository},
    ports::TaskRepository,
};
use thiserror::Error;
use tokio::runtime::{Builder, Handle};
use tracing_subscriber::EnvFilter;

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that stop the daemon.
#[derive(Debug, Error)]
enum DaemonError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("logging init failed: {0}")]
    Logging(#[source] BoxError),
    #[error("runtime init failed: {0}")]
    RuntimeInit(#[source] std::io::Error),
    #[error("database pool init failed: {0}")]
    Pool(#[source] PoolError),
    #[error("invalid seed template '{title}': {source}")]
    Seed {
        title: String,
        #[source]
        source: PeriodicDomainError,
    },
    #[error("failed to store seed template: {0}")]
    SeedStore(#[source] PeriodicRepositoryError),
    #[error(transparent)]
    Scheduler(#[from] PeriodicServiceError),
    #[error("failed to listen for shutdown signal: {0}")]
    Signal(#[source] std::io::Error),
}

fn main() -> Result<(), BoxError> {
    let args = DaemonArgs::parse();
    run_daemon(&args).map_err(Into::into)
}

fn run_daemon(args: &DaemonArgs) -> Result<(), DaemonError> {
    let config = DaemonConfig::load(args)?;
    init_logging(&config.log_level)?;
    let runtime = Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(DaemonError::RuntimeInit)?;
    runtime.block_on(serve(&config))
}

fn init_logging(log_level: &str) -> Result<(), DaemonError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(DaemonError::Logging)
}

async fn serve(config: &DaemonConfig) -> Result<(), DaemonError> {
    match config.database_url.as_deref() {
        Some(url) => {
            let pool = Pool::builder()
                .max_size(config.pool_size)
                .build(ConnectionManager::<PgConnection>::new(url))
                .map_err(DaemonError::Pool)?;
            tracing::info!(pool_size = config.pool_size, "tasks stored in postgres");
            run(Arc::new(PostgresTaskRepository::new(pool)), config).await
        }
        None => {
            tracing::info!("tasks stored in memory");
            run(Arc::new(InMemoryTaskRepository::new()), config).await
        }
    }
}

async fn run<T>(tasks: Arc<T>, config: &DaemonConfig) -> Result<(), DaemonError>
where
    T: TaskRepository + 'static,
{
    let clock = Arc::new(DefaultClock);
    let templates = Arc::new(InMemoryPeriodicTaskRepository::new());
    seed_templates(templates.as_ref(), &config.periodic_tasks, clock.as_ref()).await?;

    let materializer = Arc::new(PeriodicTaskMaterializer::new(
        Arc::clone(&templates),
        tasks,
        Arc::clone(&clock),
    ));
    let scheduler = Arc::new(TokioJobScheduler::new(
        materializer,
        Arc::clone(&clock),
        Handle::current(),
    ));
    let service = PeriodicTaskService::new(templates, Arc::clone(&scheduler), clock);

    let armed = service.bootstrap().await?;
    tracing::info!(jobs = armed, "taskflowd running");

    let signal = tokio::signal::ctrl_c().await.map_err(DaemonError::Signal);
    scheduler.shutdown();
    signal
}

async fn seed_templates<P>(
    repository: &P,
    seeds: &[TemplateSeed],
    clock: &impl Clock,
) -> Result<(), DaemonError>
where
    P: PeriodicTaskRepository,
{
    for seed in seeds {
        let template = PeriodicTask::new(seed.draft.clone(), seed.active, seed.created_by, clock)
            .map_err(|source| DaemonError::Seed {
                title: seed.draft.title.clone(),
                source,
            })?;
        repository
            .store(&template)
            .await
            .map_err(DaemonError::SeedStore)?;
        tracing::debug!(
            template_id = %template.id(),
            title = template.title(),
            "seed template stored"
        );
    }
    Ok(())
}
