//! Tests for the Octocrab reference gateway.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::OctocrabRefGateway;
use crate::github::error::{RefError, RemoteFailure};
use crate::github::gateway::RefGateway;
use crate::github::locator::{PersonalAccessToken, RepoCoordinate, RepositoryLocator};
use crate::github::temporary::TemporaryRefManager;
use crate::github::test_support::SequenceTokenSource;

const REFS_PATH: &str = "/api/v3/repos/acme/widgets/git/refs";

struct GatewayFixture {
    server: MockServer,
    repository: RepoCoordinate,
    gateway: OctocrabRefGateway,
}

async fn gateway_fixture() -> GatewayFixture {
    let server = MockServer::start().await;
    let repository = RepoCoordinate::new("acme", "widgets").expect("coordinate should be valid");
    let locator =
        RepositoryLocator::with_api_base(&format!("{}/api/v3", server.uri()), repository.clone())
            .expect("locator should be valid");
    let token = PersonalAccessToken::new("valid-token").expect("token should be valid");
    let gateway = OctocrabRefGateway::for_token(&token, &locator).expect("should create gateway");
    GatewayFixture {
        server,
        repository,
        gateway,
    }
}

fn ref_body(reference: &str, sha: &str) -> serde_json::Value {
    json!({
        "ref": format!("refs/heads/{reference}"),
        "node_id": "REF_kwDO",
        "url": format!("https://api.github.com/repos/acme/widgets/git/refs/heads/{reference}"),
        "object": {
            "type": "commit",
            "sha": sha,
            "url": format!("https://api.github.com/repos/acme/widgets/git/commits/{sha}")
        }
    })
}

#[tokio::test]
async fn fetch_target_sha_reads_head_path() {
    let fixture = gateway_fixture().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/repos/acme/widgets/git/ref/heads/main"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ref_body("main", "abc123")))
        .expect(1)
        .mount(&fixture.server)
        .await;

    let sha = fixture
        .gateway
        .fetch_target_sha(&fixture.repository, "main")
        .await
        .expect("read should succeed");

    assert_eq!(sha, "abc123");
}

#[tokio::test]
async fn fetch_target_sha_maps_missing_ref_to_read_failure() {
    let fixture = gateway_fixture().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/repos/acme/widgets/git/ref/heads/ghost"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Not Found",
            "documentation_url": "https://docs.github.com/rest/git/refs#get-a-reference"
        })))
        .mount(&fixture.server)
        .await;

    let error = fixture
        .gateway
        .fetch_target_sha(&fixture.repository, "ghost")
        .await
        .expect_err("read should fail");

    match error {
        RefError::RefRead {
            repository,
            reference,
            cause,
        } => {
            assert_eq!(repository, fixture.repository);
            assert_eq!(reference, "ghost");
            assert_eq!(cause.status(), Some(404), "unexpected cause: {cause:?}");
        }
        other => panic!("expected RefRead, got {other:?}"),
    }
}

#[tokio::test]
async fn fetch_target_sha_maps_auth_errors() {
    let fixture = gateway_fixture().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/repos/acme/widgets/git/ref/heads/main"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Bad credentials" })),
        )
        .mount(&fixture.server)
        .await;

    let error = fixture
        .gateway
        .fetch_target_sha(&fixture.repository, "main")
        .await
        .expect_err("read should fail");

    assert!(
        matches!(
            error.cause(),
            RemoteFailure::Authentication { status: 401, message } if message.contains("Bad credentials")
        ),
        "unexpected error: {error:?}"
    );
}

#[tokio::test]
async fn create_reference_posts_fully_qualified_path() {
    let fixture = gateway_fixture().await;

    Mock::given(method("POST"))
        .and(path(REFS_PATH))
        .and(body_json(json!({ "ref": "refs/heads/main-tmp", "sha": "abc123" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(ref_body("main-tmp", "abc123")))
        .expect(1)
        .mount(&fixture.server)
        .await;

    fixture
        .gateway
        .create_reference(&fixture.repository, "main-tmp", "abc123")
        .await
        .expect("create should succeed");
}

#[tokio::test]
async fn create_reference_maps_existing_name_to_create_failure() {
    let fixture = gateway_fixture().await;

    Mock::given(method("POST"))
        .and(path(REFS_PATH))
        .respond_with(
            ResponseTemplate::new(422)
                .set_body_json(json!({ "message": "Reference already exists" })),
        )
        .expect(1)
        .mount(&fixture.server)
        .await;

    let error = fixture
        .gateway
        .create_reference(&fixture.repository, "main", "abc123")
        .await
        .expect_err("create should fail");

    assert_eq!(error.operation(), "create ref");
    assert_eq!(error.reference(), Some("main"));
    assert_eq!(
        error.cause(),
        &RemoteFailure::Api {
            status: 422,
            message: "Reference already exists".to_owned(),
        }
    );
}

#[tokio::test]
async fn update_reference_requires_force_for_non_fast_forward() {
    let fixture = gateway_fixture().await;
    let ref_path = format!("{REFS_PATH}/heads/main");

    Mock::given(method("PATCH"))
        .and(path(ref_path.as_str()))
        .and(body_partial_json(json!({ "sha": "rewritten", "force": false })))
        .respond_with(
            ResponseTemplate::new(422)
                .set_body_json(json!({ "message": "Update is not a fast forward" })),
        )
        .expect(1)
        .mount(&fixture.server)
        .await;

    Mock::given(method("PATCH"))
        .and(path(ref_path.as_str()))
        .and(body_partial_json(json!({ "sha": "rewritten", "force": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ref_body("main", "rewritten")))
        .expect(1)
        .mount(&fixture.server)
        .await;

    let error = fixture
        .gateway
        .update_reference(&fixture.repository, "main", "rewritten", false)
        .await
        .expect_err("non-forced update should fail");

    match error {
        RefError::RefUpdate { force, cause, .. } => {
            assert!(!force);
            assert_eq!(cause.status(), Some(422));
        }
        other => panic!("expected RefUpdate, got {other:?}"),
    }

    fixture
        .gateway
        .update_reference(&fixture.repository, "main", "rewritten", true)
        .await
        .expect("forced update should succeed");
}

#[tokio::test]
async fn delete_reference_uses_head_path() {
    let fixture = gateway_fixture().await;

    Mock::given(method("DELETE"))
        .and(path(format!("{REFS_PATH}/heads/main-tmp").as_str()))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&fixture.server)
        .await;

    fixture
        .gateway
        .delete_reference(&fixture.repository, "main-tmp")
        .await
        .expect("delete should succeed");
}

#[tokio::test]
async fn delete_reference_maps_missing_ref_to_delete_failure() {
    let fixture = gateway_fixture().await;

    Mock::given(method("DELETE"))
        .and(path(format!("{REFS_PATH}/heads/ghost").as_str()))
        .respond_with(
            ResponseTemplate::new(422)
                .set_body_json(json!({ "message": "Reference does not exist" })),
        )
        .expect(1)
        .mount(&fixture.server)
        .await;

    let error = fixture
        .gateway
        .delete_reference(&fixture.repository, "ghost")
        .await
        .expect_err("delete should fail");

    assert_eq!(
        error,
        RefError::RefDelete {
            repository: fixture.repository.clone(),
            reference: "ghost".to_owned(),
            cause: RemoteFailure::Api {
                status: 422,
                message: "Reference does not exist".to_owned(),
            },
        }
    );
}

#[tokio::test]
async fn reads_and_deletes_address_the_encoded_branch_name() {
    let fixture = gateway_fixture().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/repos/acme/widgets/git/ref/heads/fix%2342"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ref_body("fix#42", "abc123")))
        .expect(1)
        .mount(&fixture.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("{REFS_PATH}/heads/fix%2542").as_str()))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&fixture.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v3/repos/acme/widgets/git/ref/heads/fix"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ref_body("fix", "wrong")))
        .expect(0)
        .mount(&fixture.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("{REFS_PATH}/heads/fix").as_str()))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&fixture.server)
        .await;

    let sha = fixture
        .gateway
        .fetch_target_sha(&fixture.repository, "fix#42")
        .await
        .expect("read should succeed");
    assert_eq!(sha, "abc123");

    fixture
        .gateway
        .delete_reference(&fixture.repository, "fix%42")
        .await
        .expect("delete should succeed");
}

#[tokio::test]
async fn update_addresses_the_encoded_branch_name() {
    let fixture = gateway_fixture().await;

    Mock::given(method("PATCH"))
        .and(path(format!("{REFS_PATH}/heads/release/v1%232").as_str()))
        .and(body_json(json!({ "sha": "f00d", "force": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ref_body("release/v1#2", "f00d")))
        .expect(1)
        .mount(&fixture.server)
        .await;

    fixture
        .gateway
        .update_reference(&fixture.repository, "release/v1#2", "f00d", true)
        .await
        .expect("update should succeed");
}

#[tokio::test]
async fn temporary_branch_with_fragment_marker_is_cleaned_up_by_name() {
    let fixture = gateway_fixture().await;

    Mock::given(method("POST"))
        .and(path(REFS_PATH))
        .and(body_json(json!({ "ref": "refs/heads/fix#42-1", "sha": "abc123" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(ref_body("fix#42-1", "abc123")))
        .expect(1)
        .mount(&fixture.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("{REFS_PATH}/heads/fix%2342-1").as_str()))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&fixture.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("{REFS_PATH}/heads/fix").as_str()))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&fixture.server)
        .await;

    let manager = TemporaryRefManager::with_token_source(
        Arc::new(fixture.gateway.clone()),
        SequenceTokenSource::default(),
    );
    let name = manager
        .with_temporary(&fixture.repository, "fix#42", "abc123", |name| async move {
            Ok::<_, RefError>(name)
        })
        .await
        .expect("lifecycle should succeed");

    assert_eq!(name, "fix#42-1");
    fixture.server.verify().await;
}
