mod lookup_specimen_forms;
mod verify_form_schema;

pub use lookup_specimen_forms::LookupSpecimenFormsUseCase;
pub use verify_form_schema::VerifyFormSchemaUseCase;
