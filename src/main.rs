use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::{presets::UTF8_FULL, Table};
use tracing::info;

use specimen_forms::{
    application::builder::{ApplicationBuilder, LookupApp},
    dto::{EmptyResultPolicy, LookupRequest, LookupResponse},
    infrastructure::schema::CsvFormSchemaSource,
    ports::FormSchemaSource,
    telemetry::init_tracing,
    value_objects::SchemaVersion,
    Config,
};

#[derive(Parser)]
#[command(
    name = "specimen-forms",
    version,
    about = "Look up specimen non-conformance forms in a biospecimen registry"
)]
struct Cli {
    /// JSON or TOML config file; environment variables are used when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit console logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch form data for one specimen label, or for all specimens
    Lookup {
        #[arg(long)]
        label: Option<String>,

        /// Overrides the configured schema version
        #[arg(long)]
        schema_version: Option<String>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Return an empty result instead of failing when the label matches nothing
        #[arg(long)]
        allow_empty: bool,

        /// Skip the catalog check before querying
        #[arg(long)]
        skip_verify: bool,
    },
    /// Check that every table, column and container of a schema version exists
    VerifySchema {
        #[arg(long)]
        schema_version: Option<String>,
    },
    /// List schema versions defined in the field-details file
    ListVersions,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Table,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env(),
    };
    config.validate()?;

    let log_file = init_tracing(&config.log_dir, "specimen_forms", cli.log_json)?;
    info!("Logging to {}", log_file.display());
    info!("Configuration loaded and validated");

    match cli.command {
        // Listing versions never touches the database
        Command::ListVersions => {
            let source =
                CsvFormSchemaSource::from_path(&config.field_details_csv, config.registry.clone())?;
            for version in source.versions() {
                println!("{}", version);
            }
        }
        Command::VerifySchema { schema_version } => {
            let app = connect(builder(&config)?).await?;
            let version =
                SchemaVersion::new(schema_version.unwrap_or_else(|| config.schema_version.clone()))?;
            let schema = app.schema_source.load(&version)?;
            let report = app.verify_use_case.execute(&schema).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Lookup {
            label,
            schema_version,
            format,
            allow_empty,
            skip_verify,
        } => {
            let app = connect(
                builder(&config)?.with_verify_schema(config.verify_schema && !skip_verify),
            )
            .await?;
            let request = LookupRequest {
                label,
                schema_version: schema_version.unwrap_or_else(|| config.schema_version.clone()),
                empty_result_policy: if allow_empty {
                    EmptyResultPolicy::AllowEmpty
                } else {
                    EmptyResultPolicy::ErrorOnLabelMiss
                },
            };

            let response = app.lookup_use_case.execute(request).await.map_err(|e| {
                tracing::error!(transient = e.is_transient(), "Lookup failed: {}", e);
                e
            })?;
            info!("Lookup returned {} record(s)", response.total);

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&response)?),
                OutputFormat::Table => println!("{}", render_table(&response)),
            }
        }
    }

    Ok(())
}

fn builder(config: &Config) -> anyhow::Result<ApplicationBuilder> {
    ApplicationBuilder::new(config.clone())
        .with_field_details_csv()
        .map_err(|e| anyhow::anyhow!("{}", e))
}

async fn connect(builder: ApplicationBuilder) -> anyhow::Result<LookupApp> {
    builder
        .with_database()
        .await
        .and_then(|b| b.build())
        .map_err(|e| anyhow::anyhow!("{}", e))
}

fn render_table(response: &LookupResponse) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Label",
        "Specimen",
        "NC details",
        "NC reason",
        "SOP",
        "Storage container",
        "Technician",
        "Custom NC details",
        "Reason",
        "Custom SOP",
        "Storage tube",
        "Request",
    ]);

    let cell = |v: &Option<String>| v.clone().unwrap_or_default();
    for r in &response.records {
        table.add_row(vec![
            r.specimen_label.clone(),
            r.specimen_id.to_string(),
            cell(&r.nc_details),
            cell(&r.nc_reason),
            cell(&r.sop),
            cell(&r.storage_container),
            cell(&r.technician),
            cell(&r.custom_nc_details),
            cell(&r.reason),
            cell(&r.custom_sop),
            cell(&r.storage_tube),
            cell(&r.request_id),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_list_versions_parses_with_global_options() {
        let cli = Cli::try_parse_from([
            "specimen-forms",
            "list-versions",
            "--config",
            "config/specimen_forms.example.json",
        ])
        .unwrap();

        assert!(matches!(cli.command, Command::ListVersions));
        assert_eq!(
            cli.config,
            Some(PathBuf::from("config/specimen_forms.example.json"))
        );
    }

    #[test]
    fn test_lookup_flags() {
        let cli = Cli::try_parse_from([
            "specimen-forms",
            "lookup",
            "--label",
            "0043490387",
            "--format",
            "table",
            "--allow-empty",
        ])
        .unwrap();

        match cli.command {
            Command::Lookup {
                label,
                format,
                allow_empty,
                skip_verify,
                ..
            } => {
                assert_eq!(label.as_deref(), Some("0043490387"));
                assert!(matches!(format, OutputFormat::Table));
                assert!(allow_empty);
                assert!(!skip_verify);
            }
            _ => panic!("expected lookup command"),
        }
    }
}
