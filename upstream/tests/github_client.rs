//! GithubClient behavior against a mock GitHub API

use serde_json::json;
use upstream::{GithubClient, GithubConfig, HistoryClient, UpstreamError};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn history(entries: &[(&str, &str)]) -> serde_json::Value {
    let items: Vec<_> = entries
        .iter()
        .map(|(sha, message)| {
            json!({
                "sha": sha,
                "commit": {
                    "message": message,
                    "committer": { "name": "Dev", "date": "2024-05-01T10:00:00Z" }
                }
            })
        })
        .collect();
    json!(items)
}

fn client_for(server: &MockServer, token: Option<&str>) -> GithubClient {
    let config = GithubConfig::default()
        .with_api_base(server.uri())
        .with_token(token.map(str::to_string));
    GithubClient::new(config).unwrap()
}

#[tokio::test]
async fn test_fetches_range_newest_first() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/foo/commits"))
        .and(query_param("sha", "bbb222"))
        .respond_with(ResponseTemplate::new(200).set_body_json(history(&[
            ("bbb222", "Second change\n\nbody"),
            ("abc999", "First change"),
            ("aaa111", "Previous release"),
            ("000000", "Ancient"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    let commits = client.fetch_commits("acme/foo", "aaa111", "bbb222").await.unwrap();

    let shas: Vec<_> = commits.iter().map(|c| c.sha.as_str()).collect();
    assert_eq!(shas, vec!["bbb222", "abc999"]);
    assert_eq!(commits[0].message_summary, "Second change");
    assert_eq!(commits[0].url, "https://github.com/acme/foo/commit/bbb222");
}

#[tokio::test]
async fn test_filters_merges_and_version_bumps() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/foo/commits"))
        .respond_with(ResponseTemplate::new(200).set_body_json(history(&[
            ("c5", "3.1.0"),
            ("c4", "Merge pull request #12 from acme/fix\n\nFix crash"),
            ("c3", "Fix crash"),
            ("c2", "3.0.0"),
            ("c1", "Old"),
        ])))
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    let commits = client.fetch_commits("acme/foo", "c1", "c5").await.unwrap();

    let shas: Vec<_> = commits.iter().map(|c| c.sha.as_str()).collect();
    assert_eq!(shas, vec!["c3"]);
}

#[tokio::test]
async fn test_missing_start_returns_first_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/foo/commits"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(history(&[("c3", "Three"), ("c2", "Two")])),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    let commits = client.fetch_commits("acme/foo", "not-on-page", "c3").await.unwrap();
    assert_eq!(commits.len(), 2);
}

#[tokio::test]
async fn test_sends_bearer_token_and_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/foo/commits"))
        .and(header("authorization", "Bearer s3cret"))
        .and(header("user-agent", "changelog"))
        .respond_with(ResponseTemplate::new(200).set_body_json(history(&[])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Some("s3cret"));
    let commits = client.fetch_commits("acme/foo", "a", "b").await.unwrap();
    assert!(commits.is_empty());
}

#[tokio::test]
async fn test_no_authorization_without_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/foo/commits"))
        .respond_with(|request: &Request| {
            if request.headers.contains_key("authorization") {
                ResponseTemplate::new(400)
            } else {
                ResponseTemplate::new(200).set_body_json(history(&[]))
            }
        })
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    assert!(client.fetch_commits("acme/foo", "a", "b").await.is_ok());
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/private/commits"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    let error = client
        .fetch_commits("acme/private", "a", "b")
        .await
        .unwrap_err();

    assert!(matches!(error, UpstreamError::UnexpectedStatus { status: 404, .. }));
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/foo/commits"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"message\":\"oops\"}"))
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    let error = client.fetch_commits("acme/foo", "a", "b").await.unwrap_err();
    assert!(matches!(error, UpstreamError::Decode { .. }));
}
