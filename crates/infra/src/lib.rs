mod config;
mod notifier;
mod repos;
mod system;

pub use config::Config;
pub use notifier::{INotifier, LogNotifier, ReminderDueEvent, WebhookNotifier};
pub use repos::{DeleteResult, IDoseRepo, IReminderRepo, Repos};
use sqlx::migrate::MigrateError;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
pub use system::ISys;
use system::RealSys;
use tracing::info;

#[derive(Clone)]
pub struct CircleCareContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub notifier: Arc<dyn INotifier>,
}

struct ContextParams {
    pub postgres_connection_string: String,
}

impl CircleCareContext {
    pub fn create_inmemory() -> Self {
        Self {
            repos: Repos::create_inmemory(),
            config: Config::new(),
            sys: Arc::new(RealSys {}),
            notifier: Arc::new(LogNotifier {}),
        }
    }

    async fn create(params: ContextParams) -> Self {
        let repos = Repos::create_postgres(&params.postgres_connection_string)
            .await
            .expect("Postgres credentials must be set and valid");
        let config = Config::new();
        let notifier: Arc<dyn INotifier> = match &config.reminder_webhook_url {
            Some(url) => Arc::new(WebhookNotifier::new(
                url.clone(),
                config.reminder_webhook_key.clone(),
            )),
            None => Arc::new(LogNotifier {}),
        };
        Self {
            repos,
            config,
            sys: Arc::new(RealSys {}),
            notifier,
        }
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> CircleCareContext {
    let args: Vec<_> = std::env::args().collect();
    // cargo run inmemory
    if args.len() > 1 && args[1].eq("inmemory") {
        info!("Inmemory argument provided. Going to use inmemory infra.");
        return CircleCareContext::create_inmemory();
    }

    CircleCareContext::create(ContextParams {
        postgres_connection_string: get_psql_connection_string(),
    })
    .await
}

fn get_psql_connection_string() -> String {
    const PSQL_CONNECTION_STRING: &str = "DATABASE_URL";

    std::env::var(PSQL_CONNECTION_STRING)
        .unwrap_or_else(|_| panic!("{} env var to be present.", PSQL_CONNECTION_STRING))
}

pub async fn run_migration() -> Result<(), MigrateError> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&get_psql_connection_string())
        .await
        .expect("TO CONNECT TO POSTGRES");

    sqlx::migrate!().run(&pool).await
}
