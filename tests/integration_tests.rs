//! Integration tests against a live GitHub-compatible API.
//!
//! To run these tests:
//! ```bash
//! CONTRIBUTORS_INTEGRATION_TESTS=1 GITHUB_BASE_URL=https://api.github.com \
//!     cargo test --test integration_tests -- --ignored
//! ```
//!
//! Unauthenticated requests are heavily rate limited, so the tests use a
//! small organization.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use contributors::testing::RecordingSink;
use contributors::{
    load_contributors, CancellationToken, ContributorsService, GitHubService, RequestData,
    ServiceError, Variant,
};

/// Check if integration tests should run.
fn should_run_integration_tests() -> bool {
    env::var("CONTRIBUTORS_INTEGRATION_TESTS").map_or(false, |v| v == "1")
}

/// Get the base URL for the remote API.
fn get_base_url() -> String {
    env::var("GITHUB_BASE_URL").unwrap_or_else(|_| "https://api.github.com".to_string())
}

fn get_org() -> String {
    env::var("CONTRIBUTORS_ORG").unwrap_or_else(|_| "rust-lang-nursery".to_string())
}

fn create_service() -> GitHubService {
    GitHubService::new(&get_base_url(), Duration::from_secs(30))
        .expect("Service creation should succeed")
}

#[tokio::test]
#[ignore = "Integration test requires CONTRIBUTORS_INTEGRATION_TESTS=1 and network access"]
async fn test_list_org_repos() {
    if !should_run_integration_tests() {
        return;
    }

    let repos = create_service()
        .get_org_repos(&get_org())
        .await
        .expect("Listing repositories should succeed");

    assert!(!repos.is_empty());
    assert!(repos.iter().all(|r| !r.name.is_empty()));
}

#[tokio::test]
#[ignore = "Integration test requires CONTRIBUTORS_INTEGRATION_TESTS=1 and network access"]
async fn test_unknown_org_is_not_found() {
    if !should_run_integration_tests() {
        return;
    }

    let err = create_service()
        .get_org_repos("this-org-should-not-exist-0f9e8d7c")
        .await
        .expect_err("Unknown organization should fail");

    match err {
        ServiceError::NotFound { status, .. } => assert_eq!(status, 404),
        // Anonymous quota may already be spent.
        ServiceError::RateLimited { .. } => {}
        other => panic!("Unexpected error: {other}"),
    }
}

#[tokio::test]
#[ignore = "Integration test requires CONTRIBUTORS_INTEGRATION_TESTS=1 and network access"]
async fn test_concurrent_and_streaming_agree() {
    if !should_run_integration_tests() {
        return;
    }

    let service = Arc::new(create_service());
    let req = RequestData::new(get_org());

    let concurrent = RecordingSink::new();
    load_contributors(
        Variant::Concurrent,
        service.clone(),
        req.clone(),
        &concurrent,
        &CancellationToken::new(),
    )
    .await
    .expect("Concurrent load should succeed");

    let streaming = RecordingSink::new();
    load_contributors(
        Variant::Channels,
        service,
        req,
        &streaming,
        &CancellationToken::new(),
    )
    .await
    .expect("Streaming load should succeed");

    assert_eq!(concurrent.last(), streaming.last());
    assert!(streaming.deliveries().last().is_some_and(|d| d.completed));
}
