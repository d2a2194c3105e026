//! Organization types.
//!
//! Nested documents come from heterogeneous registry sources. Every sub-record
//! tolerates missing fields (`#[serde(default)]`) and ignores fields it does
//! not know about.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::OrganizationId;

/// Organization record as served to API clients.
#[derive(Clone, Debug, Serialize)]
pub struct Organization {
    pub openregisters_id: OrganizationId,
    pub name: String,
    pub short_name: Option<String>,
    pub alias: Option<String>,
    pub jurisdiction: Option<String>,
    pub register_type: Option<String>,
    pub register_court: Option<String>,
    pub register_number: Option<String>,
    pub euid: Option<String>,
    pub legal_form: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub seat: Option<Seat>,
    pub addresses: Option<Vec<Address>>,
    pub phone_infos: Option<Vec<PhoneInfo>>,
    pub bank_info: Option<BankInfo>,
    pub date_founded: Option<NaiveDate>,
    pub timestamp_of_si: DateTime<Utc>,
    pub capital: Option<Capital>,
    pub participations: Option<Vec<Participation>>,
    pub inferences: Option<serde_json::Value>, // free-form enrichment output
    pub data_path: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Seat {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub house_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhoneInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BankInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iban: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bic: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Capital {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

/// Link between an organization and one participant.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Participation {
    pub participant: Participant,
    pub roles: Vec<Role>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Participant {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<ParticipantName>,
    /// Free-form date string; the first four characters are the year when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

/// Participant name: registries deliver either a plain string or split parts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParticipantName {
    Plain(String),
    Structured {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        first_name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        last_name: Option<String>,
    },
}

impl ParticipantName {
    /// Display form ("First Last" for structured names).
    pub fn full_name(&self) -> String {
        match self {
            ParticipantName::Plain(name) => name.clone(),
            ParticipantName::Structured {
                first_name,
                last_name,
            } => [first_name.as_deref(), last_name.as_deref()]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Role {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}
