mod form_schema;
mod specimen_form_record;

pub use form_schema::{
    CustomFieldMapping, FormSchema, PrimaryFormMapping, RegistryTables, SchemaObject,
    SubLookupMapping,
};
pub use specimen_form_record::{CustomFieldValues, PrimaryFormValues, SpecimenFormRecord};

#[cfg(test)]
pub(crate) use form_schema::test_support;
