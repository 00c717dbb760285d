pub mod persistence;
pub mod schema;
