use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::application::dto::{
    EmptyResultPolicy, LookupRequest, LookupResponse, SpecimenFilter, SpecimenFormRecordDto,
};
use crate::application::errors::LookupError;
use crate::application::ports::{FormSchemaSource, SpecimenFormRepository};
use crate::application::use_cases::VerifyFormSchemaUseCase;
use crate::application::validation::{validate_label, validate_schema_version};
use crate::domain::entities::{FormSchema, SpecimenFormRecord};

/// Use case: Look up non-conformance form data for specimens
pub struct LookupSpecimenFormsUseCase {
    form_repo: Arc<dyn SpecimenFormRepository>,
    schema_source: Arc<dyn FormSchemaSource>,
    verifier: Option<Arc<VerifyFormSchemaUseCase>>,
    timeout: Option<Duration>,
}

impl LookupSpecimenFormsUseCase {
    pub fn new(
        form_repo: Arc<dyn SpecimenFormRepository>,
        schema_source: Arc<dyn FormSchemaSource>,
    ) -> Self {
        Self {
            form_repo,
            schema_source,
            verifier: None,
            timeout: None,
        }
    }

    /// Verify the form schema against the database before each lookup
    pub fn with_verifier(mut self, verifier: Arc<VerifyFormSchemaUseCase>) -> Self {
        self.verifier = Some(verifier);
        self
    }

    /// Deadline covering verification and the query
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Execute lookup
    pub async fn execute(&self, request: LookupRequest) -> Result<LookupResponse, LookupError> {
        let request_id = Uuid::new_v4();

        // 1. Validate request
        let label = validate_label(request.label.as_deref())?;
        let version = validate_schema_version(&request.schema_version)?;

        // 2. Resolve schema version to its form layout
        let schema = self.schema_source.load(&version)?;

        info!(
            %request_id,
            schema_version = %version,
            label = label.as_ref().map(|l| l.as_str()).unwrap_or("*"),
            "Looking up specimen forms"
        );

        let filter = match label {
            Some(label) => SpecimenFilter::by_label(label),
            None => SpecimenFilter::all(),
        };

        // 3. Verify and query under the caller's deadline
        let records = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.fetch(&schema, &filter))
                .await
                .map_err(|_| {
                    warn!(%request_id, "Lookup exceeded {:?}", limit);
                    LookupError::Timeout(limit)
                })??,
            None => self.fetch(&schema, &filter).await?,
        };

        // 4. Enforce one row per specimen
        ensure_one_row_per_specimen(&records)?;

        // 5. Apply empty-result policy
        if records.is_empty() {
            if let (Some(label), EmptyResultPolicy::ErrorOnLabelMiss) =
                (&filter.label, request.empty_result_policy)
            {
                debug!(%request_id, "No eligible specimen labelled {}", label);
                return Err(LookupError::NotFound(format!(
                    "no eligible specimen with label {} under schema {}",
                    label, version
                )));
            }
        }

        info!(%request_id, "Lookup returned {} record(s)", records.len());

        let dtos: Vec<SpecimenFormRecordDto> = records
            .into_iter()
            .map(SpecimenFormRecordDto::from)
            .collect();
        let total = dtos.len();

        Ok(LookupResponse {
            schema_version: version.to_string(),
            label: filter.label.map(String::from),
            records: dtos,
            total,
            generated_at: Utc::now().to_rfc3339(),
        })
    }

    async fn fetch(
        &self,
        schema: &FormSchema,
        filter: &SpecimenFilter,
    ) -> Result<Vec<SpecimenFormRecord>, LookupError> {
        if let Some(verifier) = &self.verifier {
            verifier.execute(schema).await?;
        }

        Ok(self.form_repo.find_records(schema, filter).await?)
    }
}

fn ensure_one_row_per_specimen(records: &[SpecimenFormRecord]) -> Result<(), LookupError> {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        if !seen.insert(record.specimen_id) {
            tracing::error!(
                specimen_id = record.specimen_id,
                "Specimen {} has more than one form record under the configured containers",
                record.specimen_label
            );
            return Err(LookupError::Integrity(format!(
                "specimen {} (id {}) matched more than one form record; \
                 run validate_registry to list the duplicate entries",
                record.specimen_label, record.specimen_id
            )));
        }
    }
    Ok(())
}
