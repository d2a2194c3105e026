//! Aggregate statistics types.

use serde::Serialize;

/// Groups returned per dimension.
pub const MAX_GROUPS: i64 = 10;

/// Column an aggregate is grouped by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StatDimension {
    Status,
    Jurisdiction,
    LegalForm,
}

impl StatDimension {
    pub const ALL: [StatDimension; 3] = [
        StatDimension::Status,
        StatDimension::Jurisdiction,
        StatDimension::LegalForm,
    ];

    /// Column name in the organization table.
    pub fn column(self) -> &'static str {
        match self {
            StatDimension::Status => "status",
            StatDimension::Jurisdiction => "jurisdiction",
            StatDimension::LegalForm => "legal_form",
        }
    }
}

/// Count of organizations sharing one value of a dimension.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GroupCount {
    pub value: String,
    pub count: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    #[serde(rename = "total_organizations")]
    pub total: i64,
    #[serde(rename = "status_distribution")]
    pub by_status: Vec<GroupCount>,
    pub top_jurisdictions: Vec<GroupCount>,
    pub top_legal_forms: Vec<GroupCount>,
}
