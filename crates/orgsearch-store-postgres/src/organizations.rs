use orgsearch_storage::{
    GroupCount, Organization, OrganizationId, OrganizationStore, SearchCriteria, SearchPage,
    StatDimension, StoreError,
};
use sqlx::Row;

use crate::query::{build_search, ORGANIZATION_COLUMNS};
use crate::row::organization_from_row;
use crate::PostgresStore;

#[async_trait::async_trait]
impl OrganizationStore for PostgresStore {
    async fn search_organizations(
        &self,
        criteria: &SearchCriteria,
    ) -> Result<SearchPage, StoreError> {
        let query = build_search(criteria);

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        // Page and count must observe the same snapshot.
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        let rows = query
            .page
            .to_query()
            .fetch_all(&mut *tx)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        let total: i64 = query
            .count
            .to_query()
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .try_get(0)
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        let organizations = rows
            .iter()
            .map(organization_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            returned = organizations.len(),
            total,
            limit = criteria.limit(),
            offset = criteria.offset(),
            "Search executed"
        );

        Ok(SearchPage {
            organizations,
            total,
        })
    }

    async fn get_organization(&self, id: &OrganizationId) -> Result<Organization, StoreError> {
        let sql =
            format!("SELECT {ORGANIZATION_COLUMNS} FROM organization WHERE openregisters_id = $1");
        let row = sqlx::query(&sql)
            .bind(&id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .ok_or(StoreError::NotFound)?;

        organization_from_row(&row)
    }

    async fn count_organizations(&self) -> Result<i64, StoreError> {
        sqlx::query("SELECT COUNT(*) FROM organization")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .try_get(0)
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    async fn count_by(
        &self,
        dimension: StatDimension,
        limit: i64,
    ) -> Result<Vec<GroupCount>, StoreError> {
        let column = dimension.column();
        let sql = format!(
            "SELECT {column} AS value, COUNT(*) AS count FROM organization \
             WHERE {column} IS NOT NULL \
             GROUP BY {column} \
             ORDER BY count DESC, {column} ASC \
             LIMIT $1"
        );

        let rows = sqlx::query(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        rows.iter()
            .map(|row| {
                Ok(GroupCount {
                    value: row
                        .try_get("value")
                        .map_err(|e| StoreError::Backend(e.to_string()))?,
                    count: row
                        .try_get("count")
                        .map_err(|e| StoreError::Backend(e.to_string()))?,
                })
            })
            .collect()
    }
}
