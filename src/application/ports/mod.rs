mod form_schema_source;
mod schema_inspector;
mod specimen_form_repository;

pub use form_schema_source::{FormSchemaSource, SchemaSourceError};
pub use schema_inspector::SchemaInspector;
pub use specimen_form_repository::{RepositoryError, SpecimenFormRepository};

#[cfg(test)]
pub use form_schema_source::MockFormSchemaSource;
#[cfg(test)]
pub use schema_inspector::MockSchemaInspector;
#[cfg(test)]
pub use specimen_form_repository::MockSpecimenFormRepository;
