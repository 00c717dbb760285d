use crate::domain::entities::{FormSchema, RegistryTables};

/// SQL text generation for the form lookup and catalog checks
///
/// Identifiers come from validated [`SqlIdentifier`](crate::domain::value_objects::SqlIdentifier)s
/// and are always quoted; every value is a bind parameter.
pub struct QueryBuilder;

impl QueryBuilder {
    /// Bind position of the primary form container id
    pub const PRIMARY_CONTAINER_PARAM: usize = 1;
    /// Bind position of the custom-field container id
    pub const CUSTOM_CONTAINER_PARAM: usize = 2;
    /// Bind position of the excluded activity status
    pub const DISABLED_STATUS_PARAM: usize = 3;
    /// Bind position of the label filter, when present
    pub const LABEL_PARAM: usize = 4;

    /// Column names of a table in the current schema
    pub const TABLE_COLUMNS: &'static str = r#"
        SELECT column_name::text AS column_name
        FROM information_schema.columns
        WHERE table_schema = current_schema()
          AND table_name = $1
        ORDER BY ordinal_position
    "#;

    /// Build the specimen/form join for `schema`
    ///
    /// A specimen with no activity status is not eligible. A record entry
    /// with no activity status is treated as live; only `Disabled` entries
    /// are skipped.
    pub fn specimen_forms(schema: &FormSchema, with_label: bool) -> String {
        let r = &schema.registry;
        let p = &schema.primary;
        let c = &schema.custom_field;

        let collection_protocol = match &r.collection_protocol_column {
            Some(column) => format!("s.{}::bigint", column.quoted()),
            None => "NULL::bigint".to_string(),
        };

        let label_filter = if with_label {
            format!(
                "\n              AND s.{} = ${}",
                r.specimen_label_column.quoted(),
                Self::LABEL_PARAM
            )
        } else {
            String::new()
        };

        format!(
            r#"
            SELECT s.{label}::text AS specimen_label,
                   s.{sid}::bigint AS specimen_id,
                   {cp} AS collection_protocol_id,
                   p.{p_details}::text AS nc_details,
                   p.{p_reason}::text AS nc_reason,
                   p.{p_sop}::text AS sop,
                   p.{p_container}::text AS storage_container,
                   p.{p_technician}::text AS technician,
                   c.{c_id}::bigint AS custom_record_id,
                   ce.{re_ctx}::bigint AS custom_form_context_id,
                   c.{c_details}::text AS custom_nc_details,
                   reason.value AS reason,
                   sop.value AS custom_sop,
                   c.{c_tube}::text AS storage_tube,
                   c.{c_request}::text AS request_id
            FROM {specimen} s
            JOIN {entry} pe
              ON pe.{re_object} = s.{sid}
             AND pe.{re_status} IS DISTINCT FROM ${disabled}
            JOIN {context} pfc
              ON pfc.{ctx_id} = pe.{re_ctx}
             AND pfc.{ctx_container} = ${primary_container}
            JOIN {p_table} p
              ON p.{p_id} = pe.{re_record}
            LEFT JOIN ({entry} ce
                  JOIN {context} cfc
                    ON cfc.{ctx_id} = ce.{re_ctx}
                   AND cfc.{ctx_container} = ${custom_container}
                  JOIN {c_table} c
                    ON c.{c_id} = ce.{re_record})
              ON ce.{re_object} = s.{sid}
             AND ce.{re_status} IS DISTINCT FROM ${disabled}
            LEFT JOIN LATERAL (
                SELECT r.{reason_value}::text AS value
                FROM {reason_table} r
                WHERE r.{reason_ref} = c.{c_id}
                ORDER BY 1
                LIMIT 1
            ) reason ON TRUE
            LEFT JOIN LATERAL (
                SELECT o.{sop_value}::text AS value
                FROM {sop_table} o
                WHERE o.{sop_ref} = c.{c_id}
                ORDER BY 1
                LIMIT 1
            ) sop ON TRUE
            WHERE s.{status} <> ${disabled}{label_filter}
            ORDER BY s.{label}, s.{sid}
            "#,
            label = r.specimen_label_column.quoted(),
            sid = r.specimen_id_column.quoted(),
            status = r.specimen_status_column.quoted(),
            cp = collection_protocol,
            specimen = r.specimen_table.quoted(),
            entry = r.record_entry_table.quoted(),
            re_object = r.record_entry_object_column.quoted(),
            re_record = r.record_entry_record_column.quoted(),
            re_ctx = r.record_entry_context_column.quoted(),
            re_status = r.record_entry_status_column.quoted(),
            context = r.form_context_table.quoted(),
            ctx_id = r.form_context_id_column.quoted(),
            ctx_container = r.form_context_container_column.quoted(),
            p_table = p.table.quoted(),
            p_id = p.record_id_column.quoted(),
            p_details = p.nc_details_column.quoted(),
            p_reason = p.nc_reason_column.quoted(),
            p_sop = p.sop_column.quoted(),
            p_container = p.storage_container_column.quoted(),
            p_technician = p.technician_column.quoted(),
            c_table = c.table.quoted(),
            c_id = c.record_id_column.quoted(),
            c_details = c.nc_details_column.quoted(),
            c_tube = c.storage_tube_column.quoted(),
            c_request = c.request_id_column.quoted(),
            reason_table = c.reason.table.quoted(),
            reason_ref = c.reason.record_ref_column.quoted(),
            reason_value = c.reason.value_column.quoted(),
            sop_table = c.sop.table.quoted(),
            sop_ref = c.sop.record_ref_column.quoted(),
            sop_value = c.sop.value_column.quoted(),
            disabled = Self::DISABLED_STATUS_PARAM,
            primary_container = Self::PRIMARY_CONTAINER_PARAM,
            custom_container = Self::CUSTOM_CONTAINER_PARAM,
            label_filter = label_filter,
        )
    }

    /// Existence check for a container id in the form context table
    pub fn container_exists(r: &RegistryTables) -> String {
        format!(
            "SELECT EXISTS (SELECT 1 FROM {} WHERE {} = $1)",
            r.form_context_table.quoted(),
            r.form_context_container_column.quoted()
        )
    }
}
