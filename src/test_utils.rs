#[cfg(test)]
pub mod test_utils {
    use crate::router::create_router;
    use crate::schemas::AppState;
    use axum::Router;
    use migration::{Migrator, MigratorTrait};
    use model::{ExtraFields, UserManager};
    use sea_orm::{Database, DatabaseConnection};
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    /// Create an in-memory SQLite database for testing
    pub async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");

        // Run migrations
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        db
    }

    /// Create AppState for testing, seeded with one regular and one elevated account
    pub async fn setup_test_app_state() -> AppState {
        let db = setup_test_db().await;

        let manager = UserManager::new(&db);
        manager
            .create_user(
                "member@example.com",
                Some("member-password"),
                ExtraFields {
                    username: Some("member".to_string()),
                    first_name: Some("Mem".to_string()),
                    last_name: Some("Ber".to_string()),
                    ..Default::default()
                },
            )
            .await
            .expect("Failed to create test user");
        manager
            .create_superuser("admin@example.com", Some("admin-password"), ExtraFields::default())
            .await
            .expect("Failed to create test superuser");

        AppState { db }
    }

    /// Initialize tracing for tests with output to STDERR.
    ///
    /// The log level is determined by the RUST_LOG environment variable,
    /// defaulting to WARN if not set. The subscriber is installed globally
    /// once so it stays active while requests are handled; later calls are
    /// no-ops. Returns whether a subscriber is in place.
    pub fn init_test_tracing() -> bool {
        let log_level = std::env::var("RUST_LOG")
            .ok()
            .and_then(|level| match level.to_uppercase().as_str() {
                "ERROR" => Some(Level::ERROR),
                "WARN" => Some(Level::WARN),
                "INFO" => Some(Level::INFO),
                "DEBUG" => Some(Level::DEBUG),
                "TRACE" => Some(Level::TRACE),
                _ => None,
            })
            .unwrap_or(Level::WARN);

        let subscriber = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_writer(std::io::stderr) // Output to stderr, which is captured by tests
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
        tracing::dispatcher::has_been_set()
    }

    /// Create axum app for testing
    pub async fn setup_test_app() -> Router {
        init_test_tracing();

        let state = setup_test_app_state().await;
        create_router(state)
    }
}
