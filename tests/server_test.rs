use court_booking::server::{ServerHandle, ServerOptions};
use court_booking::{AppConfig, DatabaseConfig};

fn in_memory_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.database = DatabaseConfig::in_memory();
    config.payments.pending_ttl_hours = Some(24);
    config
}

#[tokio::test]
async fn engine_starts_migrated_and_shuts_down() {
    let handle = ServerHandle::start(ServerOptions {
        config: in_memory_config(),
        auto_migrate: true,
    })
    .await
    .unwrap();

    // Migrated schema answers queries through the exposed services.
    assert!(handle.reservations.list_for_user("nobody").await.unwrap().is_empty());

    let signal = handle.shutdown_signal();
    assert!(!signal.is_triggered());

    handle.shutdown().await;
    assert!(signal.is_triggered());
}
