//! # Specimen Forms - Non-conformance lookup for biospecimen registries
//!
//! Reads non-conformance and storage details recorded against specimens in
//! a caTissue-style registry, where each form's fields live in a
//! dynamically named table selected by the form's container id.
//!
//! ## Architecture Layers
//!
//! - **Domain**: Value objects, the form schema mapping and result records
//! - **Application**: Lookup and schema verification use cases, ports
//! - **Infrastructure**: PostgreSQL adapters and the field-details CSV source
//!
//! ## Key Features
//!
//! - One parameterized query per lookup; identifiers validated and quoted
//! - Schema-versioned form layouts loaded from configuration
//! - Up-front detection of schema drift between deployments
//! - Explicit policy for labelled lookups that match nothing
//!
//! ## Example Usage
//!
//! ```no_run
//! use specimen_forms::{application::builder::ApplicationBuilder, dto::LookupRequest, Config};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let app = ApplicationBuilder::new(Config::from_env())
//!     .with_field_details_csv()?
//!     .with_database()
//!     .await?
//!     .build()?;
//!
//! let response = app
//!     .lookup_use_case
//!     .execute(LookupRequest {
//!         label: Some("0043490387".to_string()),
//!         schema_version: "v1".to_string(),
//!         empty_result_policy: Default::default(),
//!     })
//!     .await?;
//! println!("{} record(s)", response.total);
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod telemetry;

// Re-export key types explicitly to avoid ambiguity
pub use application::{dto, ports, use_cases};
pub use config::Config;
pub use domain::errors as domain_errors;
pub use domain::{entities, value_objects};
