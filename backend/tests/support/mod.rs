//! Shared helpers for backend integration tests.
//!
//! Integration tests compile as separate crates under `backend/tests/`, so
//! small helpers live here instead of being copied between suites.

pub mod cluster_skip;
pub mod embedded_postgres;

pub use cluster_skip::handle_cluster_setup_failure;
pub use embedded_postgres::{provision_template_database, shared_cluster_handle};

/// Render a `postgres` error with its SQLSTATE and message.
///
/// `postgres::Error`'s `Display` often collapses to `db error`, which hides
/// the detail CI logs need.
pub fn format_postgres_error(error: &postgres::Error) -> String {
    let Some(db_error) = error.as_db_error() else {
        return error.to_string();
    };

    let mut summary = format!(
        "postgres error {:?}: {}",
        db_error.code(),
        db_error.message()
    );
    if let Some(detail) = db_error.detail() {
        summary.push_str("; detail: ");
        summary.push_str(detail);
    }
    if let Some(hint) = db_error.hint() {
        summary.push_str("; hint: ");
        summary.push_str(hint);
    }
    summary
}
