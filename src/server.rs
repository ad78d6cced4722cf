//! Engine bootstrap: database, migrations, services, background tasks

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::application::services::{
    start_payment_expiry_task, PaymentService, ReservationService, SlotCatalog,
};
use crate::config::AppConfig;
use crate::domain::RepositoryProvider;
use crate::infrastructure::database::migrator::Migrator;
use crate::infrastructure::{init_database, SeaOrmRepositoryProvider};
use crate::shared::shutdown::{listen_for_shutdown_signals, ShutdownSignal};

// ── Options ────────────────────────────────────────────────────────

/// Options for starting the booking engine.
pub struct ServerOptions {
    /// Application configuration.
    pub config: AppConfig,
    /// Run database migrations on startup (default: true).
    pub auto_migrate: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
        }
    }
}

// ── ServerHandle ───────────────────────────────────────────────────

/// Handle to a running booking engine.
///
/// Owns the connection pool and the services built on it. A request layer
/// embeds the engine by calling the services exposed here.
///
/// ```rust,no_run
/// use court_booking::server::{ServerHandle, ServerOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServerHandle::start(ServerOptions::default()).await?;
///     // ... wait for shutdown signal ...
///     handle.shutdown().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    pub repos: Arc<dyn RepositoryProvider>,
    pub catalog: Arc<SlotCatalog>,
    pub reservations: Arc<ReservationService>,
    pub payments: Arc<PaymentService>,
    /// The configuration the engine was started with.
    pub config: AppConfig,

    db: DatabaseConnection,
    shutdown: ShutdownSignal,
    expiry_task: Option<JoinHandle<()>>,
}

impl ServerHandle {
    /// Start the engine with the given options.
    ///
    /// This will:
    /// 1. Connect to the database and run migrations (if enabled)
    /// 2. Build the repository provider and services
    /// 3. Start the pending payment expiry task when a TTL is configured
    pub async fn start(opts: ServerOptions) -> Result<Self, Box<dyn std::error::Error>> {
        let app_cfg = opts.config;

        info!("Starting court booking engine...");

        // ── Database ───────────────────────────────────────────
        let db = init_database(&app_cfg.database).await?;

        if opts.auto_migrate {
            info!("Running database migrations...");
            Migrator::up(&db, None).await?;
            info!("Migrations completed");
        }

        // ── Repositories & Services ────────────────────────────
        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
        let policy = app_cfg.booking_policy();
        let catalog = Arc::new(SlotCatalog::new(
            repos.clone(),
            app_cfg.pricing_engine(),
            policy,
        ));
        let reservations = Arc::new(ReservationService::new(
            repos.clone(),
            policy,
            app_cfg.booking.recurring_weeks,
        ));
        let payments = Arc::new(PaymentService::new(repos.clone()));

        info!(
            horizon_days = app_cfg.booking.horizon_days,
            default_cutoff_hour = app_cfg.pricing.default_cutoff_hour,
            "Services initialized"
        );

        // ── Background tasks ───────────────────────────────────
        let shutdown = ShutdownSignal::new();
        let expiry_task = match app_cfg.pending_ttl() {
            Some(ttl) => Some(start_payment_expiry_task(
                payments.clone(),
                shutdown.clone(),
                ttl,
                app_cfg.payments.expiry_check_interval_secs,
            )),
            None => {
                info!("Pending payment expiry disabled");
                None
            }
        };

        Ok(Self {
            repos,
            catalog,
            reservations,
            payments,
            config: app_cfg,
            db,
            shutdown,
            expiry_task,
        })
    }

    /// Get a cloneable shutdown signal.
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.clone()
    }

    /// Install OS signal listeners (SIGTERM, SIGINT) that trigger shutdown.
    pub fn install_signal_handler(&self) {
        let shutdown = self.shutdown.clone();
        tokio::spawn(async move {
            if let Err(e) = listen_for_shutdown_signals(shutdown).await {
                error!("Failed to install signal handlers: {}", e);
            }
        });
    }

    /// Trigger graceful shutdown (non-blocking).
    pub fn trigger_shutdown(&self) {
        self.shutdown.trigger();
    }

    /// Wait until shutdown is triggered, then stop background tasks and
    /// close the pool.
    pub async fn wait(self) {
        self.shutdown.wait().await;
        info!("Waiting for background tasks to complete...");

        if let Some(task) = self.expiry_task {
            if let Err(e) = task.await {
                error!("Payment expiry task panicked: {}", e);
            }
        }

        if let Err(e) = self.db.close().await {
            warn!("Error closing database connection: {}", e);
        } else {
            info!("Database connection closed");
        }

        info!("Court booking engine shutdown complete");
    }

    /// Trigger shutdown and wait for completion.
    pub async fn shutdown(self) {
        info!("Shutting down court booking engine...");
        self.trigger_shutdown();
        self.wait().await;
    }
}

// ── Helpers ────────────────────────────────────────────────────────

/// Initialize tracing (logging) from the application config.
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    match config.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}
