//! Embedded PostgreSQL provisioning for the Diesel adapter suites.
//!
//! One shared cluster serves the whole test binary. Each test gets a fresh
//! database cloned from a template that has the Diesel migrations applied,
//! so schemas never drift from `backend/migrations`.

use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use pg_embedded_setup_unpriv::test_support::hash_directory;
use pg_embedded_setup_unpriv::{BootstrapResult, ClusterHandle, TemporaryDatabase};
use realestatehub::domain::ports::ListingPersistenceError;
use uuid::Uuid;

/// Embedded migrations from the backend/migrations directory.
const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

static TEMPLATE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const TEMPLATE_NAME_PREFIX: &str = "realestatehub_template";
const PROVISION_RETRIES: usize = 5;
const RETRY_DELAY: Duration = Duration::from_millis(500);

fn migrations_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("migrations")
}

/// Template names carry a hash of the migrations so schema edits get a
/// fresh template.
fn template_database_name() -> Result<String, ListingPersistenceError> {
    let hash = hash_directory(migrations_dir())
        .map_err(|err| ListingPersistenceError::query(format!("hash migrations: {err}")))?;
    let short_hash = hash.get(..8).unwrap_or(&hash);
    Ok(format!("{TEMPLATE_NAME_PREFIX}_{short_hash}"))
}

/// Returns the process-wide cluster, retrying transient bootstrap failures.
pub fn shared_cluster_handle() -> BootstrapResult<&'static ClusterHandle> {
    ensure_stable_password();
    let mut attempt = 1;
    loop {
        match pg_embedded_setup_unpriv::test_support::shared_cluster_handle() {
            Ok(handle) => return Ok(handle),
            Err(error) if attempt >= PROVISION_RETRIES => return Err(error),
            Err(_) => {
                std::thread::sleep(RETRY_DELAY);
                attempt += 1;
            }
        }
    }
}

/// Pins `PG_PASSWORD` so a reused data directory keeps accepting logins.
fn ensure_stable_password() {
    if std::env::var_os("PG_PASSWORD").is_none() {
        // SAFETY: runs before the cluster spawns threads; the shared handle
        // serialises bootstrap behind its own lock.
        unsafe {
            std::env::set_var("PG_PASSWORD", "realestatehub_embedded_test");
        }
    }
}

/// Creates the migrated template database unless it already exists.
fn ensure_template_database(cluster: &ClusterHandle) -> Result<String, ListingPersistenceError> {
    let template_name = template_database_name()?;
    let _lock = TEMPLATE_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner());

    let exists = cluster
        .database_exists(template_name.as_str())
        .map_err(|err| ListingPersistenceError::query(format!("template check: {err:?}")))?;
    if !exists {
        cluster
            .create_database(template_name.as_str())
            .map_err(|err| ListingPersistenceError::query(format!("create template: {err:?}")))?;
        let url = cluster.connection().database_url(&template_name);
        migrate_schema(&url)?;
    }
    Ok(template_name)
}

/// Provisions a temporary database cloned from the migration template.
pub fn provision_template_database(
    cluster: &ClusterHandle,
) -> Result<TemporaryDatabase, ListingPersistenceError> {
    let mut last_error = None;
    for attempt in 1..=PROVISION_RETRIES {
        let cloned = ensure_template_database(cluster).and_then(|template| {
            let db_name = format!("test_{}", Uuid::new_v4());
            cluster
                .temporary_database_from_template(db_name.as_str(), template.as_str())
                .map_err(|err| {
                    ListingPersistenceError::query(format!(
                        "clone template: attempt {attempt}/{PROVISION_RETRIES}: {err:?}"
                    ))
                })
        });
        match cloned {
            Ok(database) => return Ok(database),
            Err(error) => last_error = Some(error),
        }
        if attempt < PROVISION_RETRIES {
            std::thread::sleep(RETRY_DELAY);
        }
    }
    Err(last_error
        .unwrap_or_else(|| ListingPersistenceError::query("clone template: exhausted retries")))
}

/// Runs all pending Diesel migrations against `url`.
pub fn migrate_schema(url: &str) -> Result<(), ListingPersistenceError> {
    let mut conn = PgConnection::establish(url)
        .map_err(|err| ListingPersistenceError::connection(format!("{err:?}")))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|err| ListingPersistenceError::query(format!("migration: {err:?}")))?;
    Ok(())
}
