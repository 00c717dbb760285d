use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::application::{
    ports::{FormSchemaSource, SchemaInspector, SpecimenFormRepository},
    use_cases::{LookupSpecimenFormsUseCase, VerifyFormSchemaUseCase},
};
use crate::config::Config;
use crate::infrastructure::{
    persistence::{PostgresSchemaInspector, PostgresSpecimenFormRepository},
    schema::CsvFormSchemaSource,
};

/// Wired application ready to serve lookups
pub struct LookupApp {
    pub schema_source: Arc<dyn FormSchemaSource>,
    pub lookup_use_case: Arc<LookupSpecimenFormsUseCase>,
    pub verify_use_case: Arc<VerifyFormSchemaUseCase>,
}

/// Application builder for clean dependency injection and setup
pub struct ApplicationBuilder {
    config: Config,
    pool: Option<sqlx::PgPool>,
    schema_source: Option<Arc<dyn FormSchemaSource>>,
    connect_retries: u32,
}

impl ApplicationBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            pool: None,
            schema_source: None,
            connect_retries: 3,
        }
    }

    /// Connection attempts after the first failure
    pub fn with_connect_retries(mut self, retries: u32) -> Self {
        self.connect_retries = retries;
        self
    }

    /// Turn schema verification before each lookup on or off
    pub fn with_verify_schema(mut self, verify: bool) -> Self {
        self.config.verify_schema = verify;
        self
    }

    /// Use an existing pool instead of connecting
    pub fn with_pool(mut self, pool: sqlx::PgPool) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Use a schema source other than the configured field-details CSV
    pub fn with_schema_source(mut self, source: Arc<dyn FormSchemaSource>) -> Self {
        self.schema_source = Some(source);
        self
    }

    /// Load form schemas from the configured field-details CSV
    pub fn with_field_details_csv(mut self) -> Result<Self, Box<dyn std::error::Error>> {
        info!(
            "Loading field details from {}",
            self.config.field_details_csv.display()
        );
        let source = CsvFormSchemaSource::from_path(
            &self.config.field_details_csv,
            self.config.registry.clone(),
        )?;
        self.schema_source = Some(Arc::new(source));
        Ok(self)
    }

    /// Initialize database connection pool with retry logic
    pub async fn with_database(mut self) -> Result<Self, Box<dyn std::error::Error>> {
        info!("Connecting to database: {}", self.config.database);
        let options = self.config.pg_connect_options()?;

        // Retry connection with exponential backoff
        let mut retries = self.connect_retries;
        let mut delay = Duration::from_secs(1);
        let pool = loop {
            match PgPoolOptions::new()
                .max_connections(self.config.db_max_connections)
                .min_connections(self.config.db_min_connections)
                .acquire_timeout(Duration::from_secs(self.config.db_acquire_timeout_secs))
                .connect_with(options.clone())
                .await
            {
                Ok(pool) => break pool,
                Err(e) if retries > 0 => {
                    retries -= 1;
                    tracing::warn!(
                        "Database connection failed, retrying in {:?} ({} retries left): {}",
                        delay,
                        retries,
                        e
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2; // Exponential backoff
                }
                Err(e) => {
                    tracing::error!("Failed to connect to database after retries: {}", e);
                    return Err(Box::new(e));
                }
            }
        };

        info!(
            "Database pool configured: max={}, min={}, acquire_timeout={}s",
            self.config.db_max_connections,
            self.config.db_min_connections,
            self.config.db_acquire_timeout_secs
        );

        self.pool = Some(pool);
        Ok(self)
    }

    /// Build the lookup and verification use cases
    pub fn build(self) -> Result<LookupApp, Box<dyn std::error::Error>> {
        let pool = self.pool.ok_or("Database pool not initialized")?;
        let schema_source = self.schema_source.ok_or("Schema source not initialized")?;

        let form_repo: Arc<dyn SpecimenFormRepository> =
            Arc::new(PostgresSpecimenFormRepository::new(pool.clone()));
        let inspector: Arc<dyn SchemaInspector> =
            Arc::new(PostgresSchemaInspector::new(pool));

        let verify_use_case = Arc::new(VerifyFormSchemaUseCase::new(inspector));

        let mut lookup = LookupSpecimenFormsUseCase::new(form_repo, Arc::clone(&schema_source))
            .with_timeout(self.config.lookup_timeout());
        if self.config.verify_schema {
            lookup = lookup.with_verifier(Arc::clone(&verify_use_case));
        }

        info!(
            "Application layer initialized (verify_schema={}, timeout={}s)",
            self.config.verify_schema, self.config.lookup_timeout_secs
        );

        Ok(LookupApp {
            schema_source,
            lookup_use_case: Arc::new(lookup),
            verify_use_case,
        })
    }
}
