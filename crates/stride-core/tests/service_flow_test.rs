// Integration tests for the entity services against a mock server.
//
// These exercise the full path: service call -> REST client -> reducer
// -> store, asserting both the final state and the order of dispatched
// actions on the journal.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use serde_json::json;
use tokio::sync::broadcast;
use wiremock::matchers::{body_json_string, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use stride_core::{
    AdminStore, ClientConfig, Console, CoreError, Dispatch, PageQuery, UserInfo, UserStatus,
};

async fn setup() -> (MockServer, Console) {
    let server = MockServer::start().await;
    let config = ClientConfig {
        url: server.uri().parse().unwrap(),
        token: None,
        timeout: Duration::from_secs(5),
        ..ClientConfig::default()
    };
    let console = Console::new(config).unwrap();
    (server, console)
}

fn drain(journal: &mut broadcast::Receiver<Dispatch>) -> Vec<String> {
    let mut tags = Vec::new();
    while let Ok(record) = journal.try_recv() {
        tags.push(record.type_tag());
    }
    tags
}

fn member_json(id: i64, login: &str) -> serde_json::Value {
    json!({
        "id": id,
        "login": login,
        "nickname": login,
        "email": format!("{login}@club.test"),
        "status": "ACTIVE",
        "groupId": null,
        "joinedDate": "2026-03-01T08:00:00Z"
    })
}

#[tokio::test]
async fn fetch_list_fills_the_slice_from_header_and_body() {
    let (server, console) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/user-infos"))
        .and(query_param("page", "0"))
        .and(query_param("size", "20"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-total-count", "57")
                .set_body_json(json!([member_json(1, "ada"), member_json(2, "grace")])),
        )
        .mount(&server)
        .await;

    console
        .members()
        .fetch_list(&console.default_query())
        .await
        .unwrap();

    let state = console.store().members_state();
    assert!(!state.loading);
    assert_eq!(state.entities.len(), 2);
    assert_eq!(state.total_items, 57);
    assert_eq!(state.entities[0].login, "ada");
}

#[tokio::test]
async fn create_dispatches_write_then_refresh_in_order() {
    let (server, console) = setup().await;
    let mut journal = console.store().subscribe_dispatches();

    Mock::given(method("POST"))
        .and(path("/api/user-infos"))
        .respond_with(ResponseTemplate::new(201).set_body_json(member_json(7, "marathon_mo")))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/user-infos"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-total-count", "1")
                .set_body_json(json!([member_json(7, "marathon_mo")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let draft = UserInfo {
        login: "marathon_mo".into(),
        ..UserInfo::default()
    };
    console.members().create(draft).await.unwrap();

    assert_eq!(
        drain(&mut journal),
        vec![
            "userInfo/CREATE_REQUEST",
            "userInfo/CREATE_SUCCESS",
            "userInfo/FETCH_LIST_REQUEST",
            "userInfo/FETCH_LIST_SUCCESS",
        ]
    );

    // The journal order above is what proves the write settled before the
    // refresh; the refresh's FETCH_LIST_REQUEST then clears the write flag
    // again, so the final snapshot reports a finished, flag-free slice.
    let state = console.store().members_state();
    assert!(!state.update_success);
    assert!(!state.updating);
    assert!(!state.loading);
    assert_eq!(state.entity.unwrap().id, Some(7));
    assert_eq!(state.entities.len(), 1);
}

#[tokio::test]
async fn write_refresh_reuses_the_last_list_query() {
    let (server, console) = setup().await;

    // Once for the explicit fetch, once for the post-create refresh.
    Mock::given(method("GET"))
        .and(path("/api/user-infos"))
        .and(query_param("page", "2"))
        .and(query_param("size", "5"))
        .and(query_param("sort", "login,desc"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-total-count", "11")
                .set_body_json(json!([member_json(9, "zonal_zoe")])),
        )
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/user-infos"))
        .respond_with(ResponseTemplate::new(201).set_body_json(member_json(12, "new_nia")))
        .mount(&server)
        .await;

    let query = PageQuery::new(2, 5).sorted("login,desc");
    console.members().fetch_list(&query).await.unwrap();

    let draft = UserInfo {
        login: "new_nia".into(),
        ..UserInfo::default()
    };
    console.members().create(draft).await.unwrap();

    // Mock expectations verify the refresh hit page=2&size=5 again.
    let state = console.store().members_state();
    assert_eq!(state.total_items, 11);
}

#[tokio::test]
async fn delete_discards_payload_and_refreshes() {
    let (server, console) = setup().await;
    let mut journal = console.store().subscribe_dispatches();

    Mock::given(method("DELETE"))
        .and(path("/api/user-infos/3"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/user-infos"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-total-count", "0")
                .set_body_json(json!([])),
        )
        .expect(1)
        .mount(&server)
        .await;

    console.members().remove(3).await.unwrap();

    assert_eq!(
        drain(&mut journal),
        vec![
            "userInfo/DELETE_REQUEST",
            "userInfo/DELETE_SUCCESS",
            "userInfo/FETCH_LIST_REQUEST",
            "userInfo/FETCH_LIST_SUCCESS",
        ]
    );

    // FETCH_LIST_REQUEST from the chained refresh resets update_success.
    let state = console.store().members_state();
    assert!(!state.update_success);
    assert!(!state.updating);
    assert!(state.entities.is_empty());
}

#[tokio::test]
async fn failed_create_reports_and_skips_the_refresh() {
    let (server, console) = setup().await;
    let mut journal = console.store().subscribe_dispatches();

    Mock::given(method("POST"))
        .and(path("/api/user-infos"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "type": "https://www.jhipster.tech/problem/problem-with-message",
            "title": "Bad Request",
            "detail": "login already in use"
        })))
        .mount(&server)
        .await;

    let draft = UserInfo {
        login: "dup".into(),
        ..UserInfo::default()
    };
    let err = console.members().create(draft).await.unwrap_err();
    assert!(matches!(err, CoreError::Api { .. }));

    assert_eq!(
        drain(&mut journal),
        vec!["userInfo/CREATE_REQUEST", "userInfo/CREATE_FAILURE"]
    );

    let state = console.store().members_state();
    assert!(!state.updating);
    assert!(!state.update_success);
    assert!(
        state
            .error_message
            .unwrap()
            .contains("login already in use")
    );
}

#[tokio::test]
async fn fetch_one_missing_record_maps_to_not_found() {
    let (server, console) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/user-infos/42"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "title": "Not Found",
            "detail": "UserInfo 42 does not exist"
        })))
        .mount(&server)
        .await;

    let err = console.members().fetch_one(42).await.unwrap_err();
    assert!(matches!(err, CoreError::NotFound { .. }));

    let state = console.store().members_state();
    assert!(!state.loading);
    assert!(state.error_message.is_some());
}

#[tokio::test]
async fn update_without_id_never_reaches_the_wire() {
    let (server, console) = setup().await;
    let mut journal = console.store().subscribe_dispatches();

    let draft = UserInfo {
        login: "no_id".into(),
        ..UserInfo::default()
    };
    let err = console.members().update(draft).await.unwrap_err();

    assert!(matches!(err, CoreError::ValidationFailed { .. }));
    assert!(drain(&mut journal).is_empty());
    assert_eq!(server.received_requests().await.unwrap().len(), 0);
}

#[tokio::test]
async fn slower_stale_list_response_loses_to_the_newer_one() {
    let (server, console) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/user-infos"))
        .and(query_param("page", "0"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-total-count", "1")
                .set_body_json(json!([member_json(1, "stale_page")]))
                .set_delay(Duration::from_millis(250)),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/user-infos"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-total-count", "1")
                .set_body_json(json!([member_json(2, "fresh_page")])),
        )
        .mount(&server)
        .await;

    let slow = PageQuery::new(0, 20);
    let fast = PageQuery::new(1, 20);
    let (slow_res, fast_res) = tokio::join!(
        console.members().fetch_list(&slow),
        console.members().fetch_list(&fast),
    );
    slow_res.unwrap();
    fast_res.unwrap();

    // The page-0 response arrived last but was requested first; the
    // slice must keep the page-1 data.
    let state = console.store().members_state();
    assert!(!state.loading);
    assert_eq!(state.entities[0].login, "fresh_page");
}

#[tokio::test]
async fn account_save_reloads_the_profile() {
    let (server, console) = setup().await;
    let mut journal = console.store().subscribe_dispatches();

    let updated = json!({
        "login": "ada",
        "firstName": "Ada",
        "lastName": "Lovelace",
        "email": "ada@club.test",
        "langKey": "en",
        "activated": true,
        "authorities": ["ROLE_USER", "ROLE_ADMIN"]
    });

    Mock::given(method("POST"))
        .and(path("/api/account"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/account"))
        .respond_with(ResponseTemplate::new(200).set_body_json(updated))
        .expect(1)
        .mount(&server)
        .await;

    let account = console.store().account_state().account.unwrap_or_default();
    console.account().save(&account).await.unwrap();

    assert_eq!(
        drain(&mut journal),
        vec![
            "account/SAVE_REQUEST",
            "account/SAVE_SUCCESS",
            "account/LOAD_REQUEST",
            "account/LOAD_SUCCESS",
        ]
    );

    // The chained LOAD_REQUEST resets update_success after the save.
    let state = console.store().account_state();
    assert!(!state.update_success);
    assert!(!state.updating);
    assert!(state.account.unwrap().is_admin());
}

#[tokio::test]
async fn bearer_token_rejection_surfaces_as_auth_failure() {
    let server = MockServer::start().await;
    let config = ClientConfig {
        url: server.uri().parse().unwrap(),
        token: Some("expired-token".into()),
        timeout: Duration::from_secs(5),
        ..ClientConfig::default()
    };
    let console = Console::new(config).unwrap();

    Mock::given(method("GET"))
        .and(path("/api/account"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = console.account().load().await.unwrap_err();
    assert!(matches!(err, CoreError::AuthenticationFailed { .. }));
}

#[tokio::test]
async fn stores_are_independent_per_console() {
    // Two consoles, two stores: dispatches on one never leak to the other.
    let (server, left) = setup().await;
    let right = Console::new(ClientConfig {
        url: server.uri().parse().unwrap(),
        ..ClientConfig::default()
    })
    .unwrap();
    let mut right_journal = right.store().subscribe_dispatches();

    Mock::given(method("GET"))
        .and(path("/api/user-infos"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-total-count", "1")
                .set_body_json(json!([member_json(1, "ada")])),
        )
        .mount(&server)
        .await;

    left.members()
        .fetch_list(&left.default_query())
        .await
        .unwrap();

    assert_eq!(left.store().members_state().entities.len(), 1);
    assert!(right.store().members_state().entities.is_empty());
    assert!(drain(&mut right_journal).is_empty());
}

#[tokio::test]
async fn create_sends_the_draft_as_json() {
    let (server, console) = setup().await;

    let draft = UserInfo {
        login: "wire_check".into(),
        status: UserStatus::Active,
        ..UserInfo::default()
    };
    let expected_body = serde_json::to_string(&draft).unwrap();

    Mock::given(method("POST"))
        .and(path("/api/user-infos"))
        .and(body_json_string(expected_body))
        .respond_with(ResponseTemplate::new(201).set_body_json(member_json(5, "wire_check")))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/user-infos"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-total-count", "1")
                .set_body_json(json!([member_json(5, "wire_check")])),
        )
        .mount(&server)
        .await;

    console.members().create(draft).await.unwrap();
    assert_eq!(console.store().members_state().entity.unwrap().id, Some(5));
}

// AdminStore is constructible standalone for consumers that reduce
// their own actions (the TUI test harness does this).
#[test]
fn standalone_store_starts_at_rest() {
    let store = AdminStore::new();
    assert!(store.members_state().is_at_rest());
    assert!(store.records_state().is_at_rest());
    assert!(store.groups_state().is_at_rest());
    assert!(store.account_state().account.is_none());
}
