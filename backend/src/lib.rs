//! RealEstateHub backend library.
//!
//! Hexagonal layout: [`domain`] holds aggregates, the search pipeline and the
//! services behind the driving ports; [`inbound`] adapts HTTP onto those
//! ports; [`outbound`] implements the driven ports over PostgreSQL, memory
//! and the filesystem.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(test)]
pub(crate) mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
