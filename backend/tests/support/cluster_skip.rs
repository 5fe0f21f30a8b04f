//! Skip policy for suites that need the embedded PostgreSQL cluster.
//!
//! The cluster downloads PostgreSQL binaries on first use, which is not
//! possible everywhere the unit suites run. Setup failures therefore skip
//! the suite unless `REQUIRE_TEST_CLUSTER` is truthy, which CI sets so that
//! a broken cluster fails loudly.

/// Whether `name` holds "1", "true" or "yes", ignoring case.
fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Returns true when cluster setup failures must fail the test run.
pub fn cluster_required() -> bool {
    env_flag("REQUIRE_TEST_CLUSTER") && !env_flag("SKIP_TEST_CLUSTER")
}

/// Handles embedded cluster setup failures consistently across suites.
///
/// Prints a skip marker and returns `None`, or panics when
/// [`cluster_required`] holds.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if cluster_required() {
        panic!("Test cluster setup failed: {reason}. Unset REQUIRE_TEST_CLUSTER to skip.");
    }
    eprintln!("SKIP-TEST-CLUSTER: {reason}");
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skip_wins_over_require() {
        let _guard = env_lock::lock_env([
            ("REQUIRE_TEST_CLUSTER", Some("1")),
            ("SKIP_TEST_CLUSTER", Some("yes")),
        ]);
        assert!(!cluster_required());
    }

    #[test]
    fn setup_failures_skip_by_default() {
        let _guard = env_lock::lock_env([
            ("REQUIRE_TEST_CLUSTER", None::<&str>),
            ("SKIP_TEST_CLUSTER", None::<&str>),
        ]);
        assert_eq!(handle_cluster_setup_failure::<()>("no binaries"), None);
    }
}
