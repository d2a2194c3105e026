//! Row decoding for the organization table.

use chrono::{DateTime, NaiveDate, Utc};
use orgsearch_storage::{Organization, OrganizationId, StoreError};
use serde::de::DeserializeOwned;
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::Row;

fn column<'r, T>(row: &'r PgRow, name: &str) -> Result<T, StoreError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(name)
        .map_err(|e| StoreError::Corrupt(format!("organization.{name}: {e}")))
}

pub(crate) fn organization_from_row(row: &PgRow) -> Result<Organization, StoreError> {
    let id: String = column(row, "openregisters_id")?;

    let nested = |name: &str| -> Result<Option<Value>, StoreError> {
        let raw: Option<Value> = column(row, name)?;
        Ok(raw.and_then(|value| unwrap_json_string(&id, name, value)))
    };

    Ok(Organization {
        name: column(row, "name")?,
        short_name: column(row, "short_name")?,
        alias: column(row, "alias")?,
        jurisdiction: column(row, "jurisdiction")?,
        register_type: column(row, "register_type")?,
        register_court: column(row, "register_court")?,
        register_number: column(row, "register_number")?,
        euid: column(row, "euid")?,
        legal_form: column(row, "legal_form")?,
        description: column(row, "description")?,
        status: column(row, "status")?,
        seat: decode_nested(&id, "seat", nested("seat")?),
        addresses: decode_nested(&id, "addresses", nested("addresses")?),
        phone_infos: decode_nested(&id, "phone_infos", nested("phone_infos")?),
        bank_info: decode_nested(&id, "bank_info", nested("bank_info")?),
        date_founded: column::<Option<NaiveDate>>(row, "date_founded")?,
        timestamp_of_si: column::<DateTime<Utc>>(row, "timestamp_of_si")?,
        capital: decode_nested(&id, "capital", nested("capital")?),
        participations: decode_nested(&id, "participations", nested("participations")?),
        inferences: nested("inferences")?,
        data_path: column(row, "data_path")?,
        openregisters_id: OrganizationId(id),
    })
}

/// Some ingestion paths stored documents as JSON-encoded strings; parse those.
fn unwrap_json_string(id: &str, column: &str, value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::String(raw) => match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Null) => None,
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::warn!(organization = %id, column, error = %e, "Ignoring unparseable nested document");
                None
            }
        },
        other => Some(other),
    }
}

pub(crate) fn decode_nested<T: DeserializeOwned>(
    id: &str,
    column: &str,
    value: Option<Value>,
) -> Option<T> {
    let value = value?;
    match serde_json::from_value(value) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            tracing::warn!(organization = %id, column, error = %e, "Ignoring undecodable nested document");
            None
        }
    }
}
