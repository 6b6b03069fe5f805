use httpmock::prelude::*;
use posts_client::{
    auth::StaticToken,
    controller::PostsManager,
    gateway::{Fetch, FetchFailure, Gateway, PostsApi},
    model::Post,
};
use serde_json::json;
use url::Url;

fn gateway(server: &MockServer, token: &str) -> Gateway<StaticToken> {
    let base = Url::parse(&server.base_url()).unwrap();
    Gateway::new(base, StaticToken::new(token))
}

#[tokio::test]
async fn list_sends_json_headers_and_bearer_token() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/post")
                .header("authorization", "Bearer t0k")
                .header("accept", "application/json")
                .header("content-type", "application/json");
            then.status(200).json_body(json!([
                { "id": 1, "title": "a", "body": "x", "createdAt": "2024-05-01T00:00:00Z", "updatedAt": null },
                { "id": 2, "title": "b", "body": "y", "createdAt": "2024-05-01T00:00:00Z", "updatedAt": "2024-05-02T00:00:00Z" }
            ]));
        })
        .await;

    let posts = gateway(&server, "t0k").list_posts().await.ok().unwrap();

    mock.assert_async().await;
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].updated_at, None);
    assert!(posts[1].updated_at.is_some());
}

#[tokio::test]
async fn create_posts_the_draft_without_id() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/post")
                .json_body(json!({ "title": "T", "body": "B" }));
            then.status(201).json_body(json!({
                "id": 9, "title": "T", "body": "B",
                "createdAt": "2024-05-01T00:00:00Z", "updatedAt": null
            }));
        })
        .await;

    let created = gateway(&server, "t").create_post(&Post::draft("T", "B")).await;

    mock.assert_async().await;
    let Fetch::Success(post) = created else {
        panic!("expected success, got {created:?}");
    };
    assert_eq!(post.id, Some(9));
}

#[tokio::test]
async fn empty_delete_reply_is_success() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(DELETE).path("/post/3");
            then.status(204);
        })
        .await;

    let outcome = gateway(&server, "t").delete_post(3).await;

    mock.assert_async().await;
    assert_eq!(outcome, Fetch::Success(()));
}

#[tokio::test]
async fn error_envelope_is_a_failure_not_a_post() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(PUT).path("/post/404");
            then.status(404).json_body(json!({
                "error": { "code": "NOT_FOUND", "message": "post not found." }
            }));
        })
        .await;

    let outcome = gateway(&server, "t")
        .update_post(404, &Post::draft("T", "B"))
        .await;

    assert!(
        matches!(outcome, Fetch::Failure(FetchFailure::Decode { status: 404, .. })),
        "{outcome:?}"
    );
}

#[tokio::test]
async fn unreachable_server_is_a_transport_failure() {
    let gateway = Gateway::new(Url::parse("http://127.0.0.1:1").unwrap(), StaticToken::new("t"));

    let outcome = gateway.list_posts().await;

    assert!(
        matches!(outcome, Fetch::Failure(FetchFailure::Transport(_))),
        "{outcome:?}"
    );
}

#[tokio::test]
async fn missing_token_fails_before_any_request() {
    // an unreachable base would surface as Transport if a request were attempted
    let gateway = Gateway::new(Url::parse("http://127.0.0.1:1").unwrap(), StaticToken::new(""));

    let outcome = gateway.list_posts().await;

    assert!(
        matches!(outcome, Fetch::Failure(FetchFailure::Token(_))),
        "{outcome:?}"
    );
}

#[tokio::test]
async fn controller_degrades_server_errors_to_an_empty_list() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/post");
            then.status(500).json_body(json!({
                "error": { "code": "INTERNAL_SERVER_ERROR", "message": "internal server error." }
            }));
        })
        .await;

    let mut manager = PostsManager::new(gateway(&server, "t"));
    manager.load().await;

    assert!(!manager.loading());
    assert!(manager.posts().is_empty());
    assert!(manager.last_failure().is_some());
}
