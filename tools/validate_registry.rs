use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use sqlx::Row;

use specimen_forms::{
    infrastructure::schema::CsvFormSchemaSource, ports::FormSchemaSource,
    value_objects::{ActivityStatus, SchemaVersion},
    Config,
};

/// Report registry rows that break the one-record-per-form assumption
#[derive(Parser)]
struct Cli {
    #[arg(long)]
    database_url: Option<String>,

    /// JSON or TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    schema_version: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env(),
    };
    if let Some(url) = cli.database_url {
        config.database = specimen_forms::config::DatabaseTarget::Url(url);
    }
    config.validate()?;

    let version = SchemaVersion::new(
        cli.schema_version
            .unwrap_or_else(|| config.schema_version.clone()),
    )?;
    let source = CsvFormSchemaSource::from_path(&config.field_details_csv, config.registry.clone())?;
    let schema = source.load(&version)?;
    let r = &schema.registry;

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect_with(config.pg_connect_options()?)
        .await?;

    // Status distribution; anything that does not parse is reported
    let statuses = sqlx::query(&format!(
        "SELECT {status}::text AS status, count(*) AS specimens FROM {table} \
         GROUP BY 1 ORDER BY 1",
        status = r.specimen_status_column.quoted(),
        table = r.specimen_table.quoted(),
    ))
    .fetch_all(&pool)
    .await?;

    let mut unknown = 0i64;
    for row in statuses.iter() {
        let status: Option<String> = row.get("status");
        let specimens: i64 = row.get("specimens");
        match status.as_deref().map(ActivityStatus::from_str) {
            Some(Ok(known)) if known.is_eligible() => {
                println!("activity_status: {}, specimens: {}", known, specimens);
            }
            Some(Ok(known)) => {
                println!(
                    "activity_status: {}, specimens: {} (excluded from lookups)",
                    known, specimens
                );
            }
            Some(Err(e)) => {
                unknown += specimens;
                println!("{}, specimens: {}", e, specimens);
            }
            None => {
                unknown += specimens;
                println!("activity_status: NULL, specimens: {} (excluded from lookups)", specimens);
            }
        }
    }
    println!("Specimens with unknown activity status: {}", unknown);

    // More than one live record entry for the same specimen and form
    let duplicate_sql = format!(
        "SELECT e.{object}::bigint AS specimen_id, c.{container}::bigint AS container_id, \
                count(*) AS entries \
         FROM {entry} e \
         JOIN {context} c ON c.{ctx_id} = e.{ctx} \
         WHERE c.{container} = ANY($1) AND e.{status} IS DISTINCT FROM $2 \
         GROUP BY 1, 2 \
         HAVING count(*) > 1 \
         ORDER BY 1, 2",
        object = r.record_entry_object_column.quoted(),
        container = r.form_context_container_column.quoted(),
        entry = r.record_entry_table.quoted(),
        context = r.form_context_table.quoted(),
        ctx_id = r.form_context_id_column.quoted(),
        ctx = r.record_entry_context_column.quoted(),
        status = r.record_entry_status_column.quoted(),
    );
    let containers: Vec<i64> = schema.container_ids().iter().map(|c| c.as_i64()).collect();
    let duplicates = sqlx::query(&duplicate_sql)
        .bind(&containers)
        .bind(ActivityStatus::DISABLED)
        .fetch_all(&pool)
        .await?;

    println!("Specimens with duplicate form entries: {}", duplicates.len());
    for row in duplicates.iter() {
        let specimen_id: i64 = row.get("specimen_id");
        let container_id: i64 = row.get("container_id");
        let entries: i64 = row.get("entries");
        println!(
            "specimen: {}, container: {}, entries: {}",
            specimen_id, container_id, entries
        );
    }

    Ok(())
}
