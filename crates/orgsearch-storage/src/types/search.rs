//! Search criteria and results.

use chrono::{Datelike, Utc};
use thiserror::Error;

use super::Organization;

pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;
pub const MAX_FILTER_LEN: usize = 255;
pub const MIN_BIRTH_YEAR: i32 = 1800;
pub const MAX_BIRTH_YEAR_RANGE: u32 = 10;

/// Caller-supplied criteria that violate a precondition.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CriteriaError {
    #[error("At least one search parameter must be provided")]
    NoFilters,
    #[error("limit must be between 1 and {MAX_LIMIT}, got {0}")]
    LimitOutOfRange(i64),
    #[error("offset must not be negative, got {0}")]
    NegativeOffset(i64),
    #[error("{field} must be at most {MAX_FILTER_LEN} characters")]
    FilterTooLong { field: &'static str },
    #[error("participant_birth_year must be between {MIN_BIRTH_YEAR} and {max}, got {year}")]
    BirthYearOutOfRange { year: i32, max: i32 },
    #[error("birth_year_range must be at most {MAX_BIRTH_YEAR_RANGE}, got {0}")]
    BirthYearRangeTooWide(u32),
}

/// Raw optional filters, as received from a caller.
#[derive(Clone, Debug, Default)]
pub struct SearchFilters {
    pub name: Option<String>,
    pub description: Option<String>,
    pub jurisdiction: Option<String>,
    pub legal_form: Option<String>,
    pub status: Option<String>,
    pub participant_name: Option<String>,
    pub participant_birth_year: Option<i32>,
    pub birth_year_range: u32,
}

/// Validated, immutable search criteria.
///
/// Text filters are trimmed; whitespace-only values count as absent. At least
/// one filter is always active.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchCriteria {
    name: Option<String>,
    description: Option<String>,
    jurisdiction: Option<String>,
    legal_form: Option<String>,
    status: Option<String>,
    participant_name: Option<String>,
    participant_birth_year: Option<i32>,
    birth_year_range: u32,
    limit: i64,
    offset: i64,
}

impl SearchCriteria {
    pub fn new(filters: SearchFilters, limit: i64, offset: i64) -> Result<Self, CriteriaError> {
        let name = clean("name", filters.name)?;
        let description = clean("description", filters.description)?;
        let jurisdiction = clean("jurisdiction", filters.jurisdiction)?;
        let legal_form = clean("legal_form", filters.legal_form)?;
        let status = clean("status", filters.status)?;
        let participant_name = clean("participant_name", filters.participant_name)?;

        if let Some(year) = filters.participant_birth_year {
            let max = Utc::now().year();
            if !(MIN_BIRTH_YEAR..=max).contains(&year) {
                return Err(CriteriaError::BirthYearOutOfRange { year, max });
            }
        }
        if filters.birth_year_range > MAX_BIRTH_YEAR_RANGE {
            return Err(CriteriaError::BirthYearRangeTooWide(filters.birth_year_range));
        }
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(CriteriaError::LimitOutOfRange(limit));
        }
        if offset < 0 {
            return Err(CriteriaError::NegativeOffset(offset));
        }

        let criteria = Self {
            name,
            description,
            jurisdiction,
            legal_form,
            status,
            participant_name,
            participant_birth_year: filters.participant_birth_year,
            birth_year_range: filters.birth_year_range,
            limit,
            offset,
        };

        if !criteria.has_filters() {
            return Err(CriteriaError::NoFilters);
        }
        Ok(criteria)
    }

    fn has_filters(&self) -> bool {
        self.text_query().is_some()
            || self.jurisdiction.is_some()
            || self.legal_form.is_some()
            || self.status.is_some()
            || self.participant_birth_year.is_some()
    }

    /// Name, description and participant name joined into one full-text query.
    pub fn text_query(&self) -> Option<String> {
        let terms: Vec<&str> = [
            self.name.as_deref(),
            self.description.as_deref(),
            self.participant_name.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect();

        if terms.is_empty() {
            None
        } else {
            Some(terms.join(" "))
        }
    }

    /// Inclusive `(low, high)` year window for the participant birth-year filter.
    pub fn birth_year_bounds(&self) -> Option<(i32, i32)> {
        let range = self.birth_year_range as i32;
        self.participant_birth_year
            .map(|year| (year - range, year + range))
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn jurisdiction(&self) -> Option<&str> {
        self.jurisdiction.as_deref()
    }

    pub fn legal_form(&self) -> Option<&str> {
        self.legal_form.as_deref()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }
}

fn clean(field: &'static str, value: Option<String>) -> Result<Option<String>, CriteriaError> {
    match value {
        None => Ok(None),
        Some(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                Ok(None)
            } else if trimmed.chars().count() > MAX_FILTER_LEN {
                Err(CriteriaError::FilterTooLong { field })
            } else {
                Ok(Some(trimmed.to_string()))
            }
        }
    }
}

/// One page of search results plus the total number of matches.
#[derive(Clone, Debug)]
pub struct SearchPage {
    pub organizations: Vec<Organization>,
    pub total: i64,
}
