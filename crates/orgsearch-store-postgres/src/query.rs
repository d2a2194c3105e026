//! Dynamic search query construction.
//!
//! Filters are accumulated as SQL fragments and bound values. Placeholders are
//! numbered only when the statement is rendered, so fragments can reference a
//! value more than once (the rank expression reuses the full-text parameter)
//! and the count query can share the filter clause with the page query.

use std::fmt::Write;

use orgsearch_storage::{SearchCriteria, MAX_LIMIT};
use sqlx::postgres::PgArguments;
use sqlx::query::Query;
use sqlx::Postgres;

pub(crate) const ORGANIZATION_COLUMNS: &str = "openregisters_id, name, short_name, alias, \
     jurisdiction, register_type, register_court, register_number, euid, legal_form, \
     description, status, seat, addresses, phone_infos, bank_info, date_founded, \
     timestamp_of_si, capital, participations, inferences, data_path";

/// A value bound to a positional placeholder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SqlValue {
    Text(String),
    Int(i32),
    BigInt(i64),
}

/// Rendered statement plus its positional parameters (`$1` is `params[0]`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuiltQuery {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

impl BuiltQuery {
    /// Prepare the statement with every parameter bound in order.
    pub fn to_query(&self) -> Query<'_, Postgres, PgArguments> {
        self.params
            .iter()
            .fold(sqlx::query(&self.sql), |query, value| match value {
                SqlValue::Text(s) => query.bind(s.as_str()),
                SqlValue::Int(i) => query.bind(*i),
                SqlValue::BigInt(i) => query.bind(*i),
            })
    }
}

/// Page query and the matching count query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchQuery {
    pub page: BuiltQuery,
    pub count: BuiltQuery,
}

#[derive(Clone, Debug)]
enum Fragment {
    Sql(String),
    Param(usize),
}

/// Accumulates filter predicates and ordering for the organization table.
#[derive(Debug, Default)]
pub struct SearchQueryBuilder {
    filter: Vec<Fragment>,
    order: Vec<Fragment>,
    values: Vec<SqlValue>,
    predicates: usize,
}

impl SearchQueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn bind(&mut self, value: SqlValue) -> usize {
        self.values.push(value);
        self.values.len() - 1
    }

    fn sql(&mut self, sql: &str) {
        self.filter.push(Fragment::Sql(sql.to_string()));
    }

    fn param(&mut self, index: usize) {
        self.filter.push(Fragment::Param(index));
    }

    fn begin_predicate(&mut self) {
        if self.predicates > 0 {
            self.sql(" AND ");
        }
        self.predicates += 1;
    }

    /// Full-text match against the weighted search vector. Returns the
    /// parameter index so ranking can reuse it.
    pub fn text_search(&mut self, text: &str) -> usize {
        self.begin_predicate();
        let index = self.bind(SqlValue::Text(text.to_string()));
        self.sql("textsearch @@ plainto_tsquery('english', ");
        self.param(index);
        self.sql(")");
        index
    }

    /// Case-insensitive substring match; LIKE wildcards in `needle` match literally.
    pub fn contains_ignore_case(&mut self, column: &'static str, needle: &str) {
        self.begin_predicate();
        let index = self.bind(SqlValue::Text(format!("%{}%", escape_like(needle))));
        self.sql(&format!("{column} ILIKE "));
        self.param(index);
    }

    pub fn equals(&mut self, column: &'static str, value: &str) {
        self.begin_predicate();
        let index = self.bind(SqlValue::Text(value.to_string()));
        self.sql(&format!("{column} = "));
        self.param(index);
    }

    /// Some participation has a participant whose birth date starts with a
    /// year in `low..=high`. Participations stored as a JSON-encoded string
    /// are parsed first, as on the read path; rows without an array never match.
    pub fn birth_year_between(&mut self, low: i32, high: i32) {
        self.begin_predicate();
        let low = self.bind(SqlValue::Int(low));
        let high = self.bind(SqlValue::Int(high));
        self.sql(
            "EXISTS (SELECT 1 FROM jsonb_array_elements(participation_list(participations)) AS p \
             WHERE CASE WHEN substring(p -> 'participant' ->> 'birth_date' from 1 for 4) ~ '^[0-9]{4}$' \
             THEN substring(p -> 'participant' ->> 'birth_date' from 1 for 4)::int END BETWEEN ",
        );
        self.param(low);
        self.sql(" AND ");
        self.param(high);
        self.sql(")");
    }

    /// Order by full-text rank using the parameter returned from [`Self::text_search`].
    pub fn order_by_rank(&mut self, text_param: usize) {
        self.order = vec![
            Fragment::Sql("ts_rank(textsearch, plainto_tsquery('english', ".to_string()),
            Fragment::Param(text_param),
            Fragment::Sql(")) DESC, openregisters_id ASC".to_string()),
        ];
    }

    pub fn order_by_name(&mut self) {
        self.order = vec![Fragment::Sql("name ASC, openregisters_id ASC".to_string())];
    }

    /// Render the page and count statements. `limit` is clamped to
    /// `1..=MAX_LIMIT` and `offset` floored at zero.
    pub fn build(self, limit: i64, offset: i64) -> SearchQuery {
        let limit = limit.clamp(1, MAX_LIMIT);
        let offset = offset.max(0);

        let where_clause = if self.predicates > 0 {
            format!(" WHERE {}", render(&self.filter))
        } else {
            String::new()
        };

        let count = BuiltQuery {
            sql: format!("SELECT COUNT(*) FROM organization{where_clause}"),
            params: self.values.clone(),
        };

        let order = if self.order.is_empty() {
            "openregisters_id ASC".to_string()
        } else {
            render(&self.order)
        };

        let mut params = self.values;
        params.push(SqlValue::BigInt(limit));
        params.push(SqlValue::BigInt(offset));
        let limit_pos = params.len() - 1;
        let offset_pos = params.len();

        let page = BuiltQuery {
            sql: format!(
                "SELECT {ORGANIZATION_COLUMNS} FROM organization{where_clause} \
                 ORDER BY {order} LIMIT ${limit_pos} OFFSET ${offset_pos}"
            ),
            params,
        };

        SearchQuery { page, count }
    }
}

/// Build page and count queries for validated criteria.
pub fn build_search(criteria: &SearchCriteria) -> SearchQuery {
    let mut builder = SearchQueryBuilder::new();

    let text_param = criteria
        .text_query()
        .map(|text| builder.text_search(&text));

    if let Some(jurisdiction) = criteria.jurisdiction() {
        builder.contains_ignore_case("jurisdiction", jurisdiction);
    }
    if let Some(legal_form) = criteria.legal_form() {
        builder.contains_ignore_case("legal_form", legal_form);
    }
    if let Some(status) = criteria.status() {
        builder.equals("status", status);
    }
    if let Some((low, high)) = criteria.birth_year_bounds() {
        builder.birth_year_between(low, high);
    }

    match text_param {
        Some(index) => builder.order_by_rank(index),
        None => builder.order_by_name(),
    }

    builder.build(criteria.limit(), criteria.offset())
}

fn render(fragments: &[Fragment]) -> String {
    let mut out = String::new();
    for fragment in fragments {
        match fragment {
            Fragment::Sql(sql) => out.push_str(sql),
            Fragment::Param(index) => {
                let _ = write!(out, "${}", index + 1);
            }
        }
    }
    out
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
