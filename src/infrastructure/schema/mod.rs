mod field_details_csv;
mod static_source;

pub use field_details_csv::CsvFormSchemaSource;
pub use static_source::StaticFormSchemaSource;
