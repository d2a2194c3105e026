//! Dashboard statistics.

use orgsearch_storage::{
    GroupCount, OrganizationStore, StatDimension, Stats, StoreError, MAX_GROUPS,
};

/// Total count plus the grouped distributions, queried concurrently.
///
/// A failed grouping degrades to an empty list; a failed total fails the call.
pub async fn aggregate(store: &dyn OrganizationStore) -> Result<Stats, StoreError> {
    let (total, by_status, top_jurisdictions, top_legal_forms) = tokio::join!(
        store.count_organizations(),
        store.count_by(StatDimension::Status, MAX_GROUPS),
        store.count_by(StatDimension::Jurisdiction, MAX_GROUPS),
        store.count_by(StatDimension::LegalForm, MAX_GROUPS),
    );

    Ok(Stats {
        total: total?,
        by_status: or_empty(StatDimension::Status, by_status),
        top_jurisdictions: or_empty(StatDimension::Jurisdiction, top_jurisdictions),
        top_legal_forms: or_empty(StatDimension::LegalForm, top_legal_forms),
    })
}

fn or_empty(
    dimension: StatDimension,
    result: Result<Vec<GroupCount>, StoreError>,
) -> Vec<GroupCount> {
    result.unwrap_or_else(|e| {
        tracing::warn!(dimension = dimension.column(), error = %e, "Statistics dimension unavailable");
        Vec::new()
    })
}
