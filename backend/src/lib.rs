//! Community issue tracker: report, triage and resolve local infrastructure
//! complaints.
//!
//! The crate follows a hexagonal layout: [`domain`] holds the issue entity,
//! authorisation rules and ports; [`inbound`] adapts HTTP requests onto the
//! driving ports; [`outbound`] implements the driven ports over PostgreSQL
//! or memory.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
