mod activity_status;
mod container_id;
mod schema_version;
mod specimen_label;
mod sql_identifier;

pub use activity_status::ActivityStatus;
pub use container_id::ContainerId;
pub use schema_version::SchemaVersion;
pub use specimen_label::SpecimenLabel;
pub use sql_identifier::SqlIdentifier;
