//! Organization detail handler tests.

use super::super::common::*;
use axum::extract::{Path, State};
use orgsearch_storage::{MockOrganizationStore, OrganizationId, StoreError};

use crate::handlers::organizations::get_organization;
use crate::handlers::ApiError;

#[tokio::test]
async fn handler_get_organization_found() {
    let mut store = MockOrganizationStore::new();
    store
        .expect_get_organization()
        .withf(|id| id == &OrganizationId("de-hrb-1234".to_string()))
        .returning(|id| Ok(sample_organization(&id.0, "Acme GmbH")));
    let app = create_test_app(store);
    let user = app.authenticated(&test_user("ada@example.com"));

    let org = get_organization(user, State(app.state.clone()), Path(" de-hrb-1234 ".to_string()))
        .await
        .unwrap();

    assert_eq!(org.name, "Acme GmbH");
    assert_eq!(org.openregisters_id.0, "de-hrb-1234");
}

#[tokio::test]
async fn handler_get_organization_missing_is_404() {
    let mut store = MockOrganizationStore::new();
    store
        .expect_get_organization()
        .returning(|_| Err(StoreError::NotFound));
    let app = create_test_app(store);
    let user = app.authenticated(&test_user("ada@example.com"));

    let err = get_organization(user, State(app.state.clone()), Path("nope".to_string()))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::NotFound("Organization")));
    assert_eq!(err.code(), "not_found");
}

#[tokio::test]
async fn handler_get_organization_validates_id() {
    // No expectations: the store must not be reached
    let app = create_test_app(MockOrganizationStore::new());

    for id in ["   ".to_string(), "x".repeat(256)] {
        let user = app.authenticated(&test_user("ada@example.com"));
        let err = get_organization(user, State(app.state.clone()), Path(id))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}

#[tokio::test]
async fn handler_get_organization_store_failure_is_internal() {
    let mut store = MockOrganizationStore::new();
    store
        .expect_get_organization()
        .returning(|_| Err(StoreError::Corrupt("bad row".to_string())));
    let app = create_test_app(store);
    let user = app.authenticated(&test_user("ada@example.com"));

    let err = get_organization(user, State(app.state.clone()), Path("org-1".to_string()))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Internal));
}
