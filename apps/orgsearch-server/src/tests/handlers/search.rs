//! Search handler tests.

use super::super::common::*;
use axum::extract::{Query, State};
use orgsearch_storage::{MockOrganizationStore, SearchPage, StoreError};

use crate::handlers::search::{search, SearchParams};
use crate::handlers::ApiError;

fn by_name(name: &str) -> SearchParams {
    SearchParams {
        name: Some(name.to_string()),
        ..Default::default()
    }
}

fn page_of(total: i64, count: usize) -> SearchPage {
    SearchPage {
        organizations: (0..count)
            .map(|i| sample_organization(&format!("org-{i}"), &format!("Acme {i}")))
            .collect(),
        total,
    }
}

#[tokio::test]
async fn handler_search_returns_results_and_pagination() {
    let mut store = MockOrganizationStore::new();
    store
        .expect_search_organizations()
        .times(1)
        .returning(|criteria| {
            assert_eq!(criteria.name(), Some("acme"));
            assert_eq!(criteria.limit(), 10);
            assert_eq!(criteria.offset(), 0);
            Ok(page_of(25, 10))
        });
    let app = create_test_app(store);

    let response = search(State(app.state.clone()), Ok(Query(by_name("  acme  "))))
        .await
        .unwrap();

    assert_eq!(response.results.len(), 10);
    assert_eq!(response.pagination.total, 25);
    assert_eq!(response.pagination.limit, 10);
    assert_eq!(response.pagination.offset, 0);
    assert!(response.pagination.has_more);
}

#[tokio::test]
async fn handler_search_last_page_has_no_more() {
    let mut store = MockOrganizationStore::new();
    store
        .expect_search_organizations()
        .returning(|_| Ok(page_of(25, 5)));
    let app = create_test_app(store);

    let params = SearchParams {
        limit: Some(10),
        offset: Some(20),
        ..by_name("acme")
    };
    let response = search(State(app.state.clone()), Ok(Query(params)))
        .await
        .unwrap();

    assert_eq!(response.results.len(), 5);
    assert!(!response.pagination.has_more);
}

#[tokio::test]
async fn handler_search_offset_past_end_is_empty() {
    let mut store = MockOrganizationStore::new();
    store
        .expect_search_organizations()
        .returning(|_| Ok(page_of(3, 0)));
    let app = create_test_app(store);

    let params = SearchParams {
        offset: Some(50),
        ..by_name("acme")
    };
    let response = search(State(app.state.clone()), Ok(Query(params)))
        .await
        .unwrap();

    assert!(response.results.is_empty());
    assert_eq!(response.pagination.total, 3);
    assert!(!response.pagination.has_more);
}

#[tokio::test]
async fn handler_search_max_offset_does_not_overflow() {
    let mut store = MockOrganizationStore::new();
    store
        .expect_search_organizations()
        .returning(|_| Ok(page_of(3, 0)));
    let app = create_test_app(store);

    let params = SearchParams {
        offset: Some(i64::MAX),
        ..by_name("acme")
    };
    let response = search(State(app.state.clone()), Ok(Query(params)))
        .await
        .unwrap();

    assert!(response.results.is_empty());
    assert_eq!(response.pagination.offset, i64::MAX);
    assert!(!response.pagination.has_more);
}

#[tokio::test]
async fn handler_search_without_filters_is_rejected() {
    let store = MockOrganizationStore::new();
    let app = create_test_app(store);

    let err = search(State(app.state.clone()), Ok(Query(SearchParams::default())))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));

    // Whitespace-only filters count as absent
    let err = search(State(app.state.clone()), Ok(Query(by_name("   "))))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[tokio::test]
async fn handler_search_rejects_out_of_range_paging() {
    let app = create_test_app(MockOrganizationStore::new());

    for (limit, offset) in [(0, 0), (101, 0), (10, -1)] {
        let params = SearchParams {
            limit: Some(limit),
            offset: Some(offset),
            ..by_name("acme")
        };
        let err = search(State(app.state.clone()), Ok(Query(params)))
            .await
            .unwrap_err();
        assert!(
            matches!(err, ApiError::Validation(_)),
            "limit={limit} offset={offset}"
        );
    }
}

#[tokio::test]
async fn handler_search_rejects_bad_birth_year() {
    let app = create_test_app(MockOrganizationStore::new());

    let too_early = SearchParams {
        participant_birth_year: Some(1799),
        ..Default::default()
    };
    let err = search(State(app.state.clone()), Ok(Query(too_early)))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));

    let too_wide = SearchParams {
        participant_birth_year: Some(1960),
        birth_year_range: 11,
        ..Default::default()
    };
    let err = search(State(app.state.clone()), Ok(Query(too_wide)))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[tokio::test]
async fn handler_search_birth_year_alone_is_a_filter() {
    let mut store = MockOrganizationStore::new();
    store.expect_search_organizations().returning(|criteria| {
        assert_eq!(criteria.birth_year_bounds(), Some((1958, 1962)));
        Ok(page_of(1, 1))
    });
    let app = create_test_app(store);

    let params = SearchParams {
        participant_birth_year: Some(1960),
        birth_year_range: 2,
        ..Default::default()
    };
    let response = search(State(app.state.clone()), Ok(Query(params)))
        .await
        .unwrap();
    assert_eq!(response.pagination.total, 1);
}

#[tokio::test]
async fn handler_search_rejects_long_filter() {
    let app = create_test_app(MockOrganizationStore::new());

    let err = search(State(app.state.clone()), Ok(Query(by_name(&"a".repeat(256)))))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[tokio::test]
async fn handler_search_store_failure_is_internal() {
    let mut store = MockOrganizationStore::new();
    store
        .expect_search_organizations()
        .returning(|_| Err(StoreError::Backend("connection reset".to_string())));
    let app = create_test_app(store);

    let err = search(State(app.state.clone()), Ok(Query(by_name("acme"))))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Internal));
}
