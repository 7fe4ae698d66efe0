mod common;

use axum::http::StatusCode;
use booking_service::store::{BusinessAccountStore, ServiceStore};
use common::{delete, get, json_request, TestApp};
use serde_json::json;

fn update_body(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": "Glow Studio Downtown",
        "businessType": "makeup",
        "location": "Porto",
        "links": { "instagram": "@glow" }
    })
}

#[tokio::test]
async fn create_makes_caller_the_owner() {
    let app = TestApp::new();
    let user = app.seed_user("owner@example.com").await;
    let token = app.token_for(&user.id);

    let (status, body) = app
        .send_json(json_request(
            "POST",
            "/api/business-account",
            Some(&token),
            json!({ "name": "Glow Studio", "businessType": "makeup", "location": "Lisbon" }),
        ))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_str().unwrap();
    assert!(app.store.is_owner(id, &user.id).await.unwrap());

    let (status, fetched) = app
        .send_json(get(&format!("/api/business-account/{id}"), Some(&token)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "Glow Studio");
    assert_eq!(fetched["businessType"], "makeup");
}

#[tokio::test]
async fn missing_fields_are_rejected() {
    let app = TestApp::new();
    let user = app.seed_user("owner@example.com").await;
    let token = app.token_for(&user.id);

    let (status, body) = app
        .send_json(json_request(
            "POST",
            "/api/business-account",
            Some(&token),
            json!({ "name": "Glow Studio" }),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["Code"], "INVALID_REQUEST");

    let (status, body) = app
        .send_json(json_request(
            "POST",
            "/api/business-account",
            Some(&token),
            json!({ "name": "", "businessType": "makeup", "location": "Lisbon" }),
        ))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["Code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn owner_can_update_but_others_cannot() {
    let app = TestApp::new();
    let alice = app.seed_user("alice@example.com").await;
    let bob = app.seed_user("bob@example.com").await;
    let account = app.seed_business_account(&bob.id).await;
    let uri = format!("/api/business-account/{}", account.id);

    let (status, body) = app
        .send_json(json_request(
            "PUT",
            &uri,
            Some(&app.token_for(&alice.id)),
            update_body(&account.id),
        ))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["Code"], "FORBIDDEN");
    let unchanged = app.store.get_business_account(&account.id).await.unwrap();
    assert_eq!(unchanged.name, "Glow Studio");

    let (status, body) = app
        .send_json(json_request(
            "PUT",
            &uri,
            Some(&app.token_for(&bob.id)),
            update_body(&account.id),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Glow Studio Downtown");
    assert_eq!(body["links"]["instagram"], "@glow");
}

#[tokio::test]
async fn non_owner_is_forbidden_before_body_checks() {
    let app = TestApp::new();
    let owner = app.seed_user("owner@example.com").await;
    let stranger = app.seed_user("stranger@example.com").await;
    let account = app.seed_business_account(&owner.id).await;

    let (status, body) = app
        .send_json(json_request(
            "PUT",
            &format!("/api/business-account/{}", account.id),
            Some(&app.token_for(&stranger.id)),
            json!({ "id": account.id, "name": "" }),
        ))
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["Code"], "FORBIDDEN");
}

#[tokio::test]
async fn body_id_must_match_path() {
    let app = TestApp::new();
    let owner = app.seed_user("owner@example.com").await;
    let account = app.seed_business_account(&owner.id).await;

    let (status, body) = app
        .send_json(json_request(
            "PUT",
            &format!("/api/business-account/{}", account.id),
            Some(&app.token_for(&owner.id)),
            update_body("some-other-id"),
        ))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["Code"], "INVALID_REQUEST");
    assert_eq!(body["Message"], "ID does not match business account ID");
}

#[tokio::test]
async fn owner_delete_cascades_to_services() {
    let app = TestApp::new();
    let owner = app.seed_user("owner@example.com").await;
    let other = app.seed_user("other@example.com").await;
    let account = app.seed_business_account(&owner.id).await;
    let service = app.seed_service(&account.id, "Bridal makeup").await;
    let uri = format!("/api/business-account/{}", account.id);

    let response = app.send(delete(&uri, Some(&app.token_for(&other.id)))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app.send(delete(&uri, Some(&app.token_for(&owner.id)))).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    assert!(app.store.get_business_account(&account.id).await.is_err());
    assert!(app.store.get_service(&service.id).await.is_err());
    assert!(!app.store.is_owner(&account.id, &owner.id).await.unwrap());
}

#[tokio::test]
async fn unknown_account_is_not_found() {
    let app = TestApp::new();
    let user = app.seed_user("owner@example.com").await;

    let (status, body) = app
        .send_json(get("/api/business-account/missing", Some(&app.token_for(&user.id))))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["Code"], "NOT_FOUND");
}

#[tokio::test]
async fn ownership_lookup_failure_is_internal() {
    let app = TestApp::new();
    let owner = app.seed_user("owner@example.com").await;
    let account = app.seed_business_account(&owner.id).await;
    let token = app.token_for(&owner.id);
    app.store.set_unavailable(true);

    let (status, body) = app
        .send_json(delete(&format!("/api/business-account/{}", account.id), Some(&token)))
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["Code"], "INTERNAL_ERROR");
    assert_eq!(body["Message"], "Failed to verify ownership");
}
