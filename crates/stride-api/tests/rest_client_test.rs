#![allow(clippy::unwrap_used)]
// Integration tests for `RestClient` using wiremock.

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use stride_api::{Error, PageQuery, RestClient, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
struct Member {
    id: Option<i64>,
    login: String,
}

async fn setup() -> (MockServer, RestClient) {
    let server = MockServer::start().await;
    let client = RestClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client)
}

// ── List tests ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_list_reads_total_count_header() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/user-infos"))
        .and(query_param("page", "2"))
        .and(query_param("size", "10"))
        .and(query_param("sort", "id,desc"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-total-count", "123")
                .set_body_json(json!([
                    { "id": 1, "login": "ada" },
                    { "id": 2, "login": "grace" }
                ])),
        )
        .mount(&server)
        .await;

    let query = PageQuery::new(2, 10).sorted("id,desc");
    let page = client
        .get_list::<Member>("user-infos", &query)
        .await
        .unwrap();

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total_items, 123);
    assert_eq!(page.items[0].login, "ada");
}

#[tokio::test]
async fn test_get_list_missing_header_falls_back_to_page_length() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/user-infos"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "id": 1, "login": "ada" }])),
        )
        .mount(&server)
        .await;

    let page = client
        .get_list::<Member>("user-infos", &PageQuery::default())
        .await
        .unwrap();

    assert_eq!(page.total_items, 1);
}

// ── Single-record tests ─────────────────────────────────────────────

#[tokio::test]
async fn test_get_one_hits_entity_path() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/user-infos/7"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": 7, "login": "ada" })),
        )
        .mount(&server)
        .await;

    let member = client.get_one::<Member>("user-infos", 7).await.unwrap();
    assert_eq!(member.id, Some(7));
}

#[tokio::test]
async fn test_create_posts_body_and_returns_server_copy() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/user-infos"))
        .and(body_json(json!({ "id": null, "login": "ada" })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({ "id": 9, "login": "ada" })),
        )
        .mount(&server)
        .await;

    let draft = Member {
        id: None,
        login: "ada".into(),
    };
    let created = client
        .create::<Member, _>("user-infos", &draft)
        .await
        .unwrap();

    assert_eq!(created.id, Some(9));
}

#[tokio::test]
async fn test_update_puts_to_entity_path() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/user-infos/9"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": 9, "login": "ada2" })),
        )
        .mount(&server)
        .await;

    let record = Member {
        id: Some(9),
        login: "ada2".into(),
    };
    let updated = client
        .update::<Member, _>("user-infos", 9, &record)
        .await
        .unwrap();

    assert_eq!(updated.login, "ada2");
}

#[tokio::test]
async fn test_remove_deletes_and_discards_body() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/user-infos/9"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    client.remove("user-infos", 9).await.unwrap();
}

// ── Error mapping tests ─────────────────────────────────────────────

#[tokio::test]
async fn test_unauthorized_maps_to_invalid_token() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/user-infos/1"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client.get_one::<Member>("user-infos", 1).await;
    assert!(
        matches!(result, Err(Error::InvalidToken)),
        "expected InvalidToken, got: {result:?}"
    );
}

#[tokio::test]
async fn test_problem_body_detail_becomes_message() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/user-infos/404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "title": "Not Found",
            "detail": "UserInfo 404 does not exist",
            "status": 404
        })))
        .mount(&server)
        .await;

    let err = client
        .get_one::<Member>("user-infos", 404)
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "UserInfo 404 does not exist");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_plain_text_error_body_is_kept_verbatim() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/user-infos/1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database is on fire"))
        .mount(&server)
        .await;

    let err = client.remove("user-infos", 1).await.unwrap_err();
    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "database is on fire");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_wrong_shape_maps_to_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/user-infos/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "unexpected": true })))
        .mount(&server)
        .await;

    let result = client.get_one::<Member>("user-infos", 1).await;
    assert!(
        matches!(result, Err(Error::Deserialization { .. })),
        "expected Deserialization error, got: {result:?}"
    );
}

// ── Auth header tests ───────────────────────────────────────────────

#[tokio::test]
async fn test_bearer_token_sent_as_default_header() {
    let server = MockServer::start().await;
    let token: secrecy::SecretString = "s3cr3t".to_string().into();
    let client = RestClient::new(&server.uri(), Some(&token), &TransportConfig::default()).unwrap();

    Mock::given(method("GET"))
        .and(path("/api/user-infos/1"))
        .and(header("authorization", "Bearer s3cr3t"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": 1, "login": "ada" })),
        )
        .mount(&server)
        .await;

    client.get_one::<Member>("user-infos", 1).await.unwrap();
}
