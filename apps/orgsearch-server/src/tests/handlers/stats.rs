//! Statistics handler tests.

use super::super::common::*;
use axum::extract::State;
use orgsearch_storage::{GroupCount, MockOrganizationStore, StatDimension, StoreError};

use crate::handlers::stats::get_stats;
use crate::handlers::ApiError;

fn group(value: &str, count: i64) -> GroupCount {
    GroupCount {
        value: value.to_string(),
        count,
    }
}

#[tokio::test]
async fn handler_stats_returns_all_dimensions() {
    let mut store = MockOrganizationStore::new();
    store.expect_count_organizations().returning(|| Ok(1200));
    store.expect_count_by().returning(|dimension, _| {
        Ok(match dimension {
            StatDimension::Status => vec![group("active", 1000), group("liquidation", 200)],
            StatDimension::Jurisdiction => vec![group("DE", 900), group("AT", 300)],
            StatDimension::LegalForm => vec![group("GmbH", 700)],
        })
    });
    let app = create_test_app(store);
    let user = app.authenticated(&test_user("ada@example.com"));

    let stats = get_stats(user, State(app.state.clone())).await.unwrap();

    assert_eq!(stats.total, 1200);
    assert_eq!(stats.by_status[0], group("active", 1000));
    assert_eq!(stats.top_jurisdictions.len(), 2);
    assert_eq!(stats.top_legal_forms, vec![group("GmbH", 700)]);
}

#[tokio::test]
async fn handler_stats_total_failure_is_internal() {
    let mut store = MockOrganizationStore::new();
    store
        .expect_count_organizations()
        .returning(|| Err(StoreError::Backend("statement timeout".to_string())));
    store.expect_count_by().returning(|_, _| Ok(vec![]));
    let app = create_test_app(store);
    let user = app.authenticated(&test_user("ada@example.com"));

    let err = get_stats(user, State(app.state.clone())).await.unwrap_err();
    assert!(matches!(err, ApiError::Internal));
}
