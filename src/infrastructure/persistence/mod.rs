mod postgres_schema_inspector;
mod postgres_specimen_form_repository;
mod query_builder;

pub use postgres_schema_inspector::PostgresSchemaInspector;
pub use postgres_specimen_form_repository::PostgresSpecimenFormRepository;
pub use query_builder::QueryBuilder;
