use booking_service::{
    config::GoogleOAuthConfig,
    services::{GoogleProvider, IdentityProvider, OAuthError},
};
use serde_json::json;
use wiremock::{
    matchers::{body_string_contains, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

fn provider(server: &MockServer) -> GoogleProvider {
    GoogleProvider::new(GoogleOAuthConfig {
        client_id: "client-123".to_string(),
        client_secret: "shh".to_string(),
        redirect_uri: "http://localhost:8080/api/google-callback".to_string(),
        auth_url: format!("{}/auth", server.uri()),
        token_url: format!("{}/token", server.uri()),
        userinfo_url: format!("{}/userinfo", server.uri()),
        static_state: None,
    })
    .unwrap()
}

#[tokio::test]
async fn exchanges_code_and_fetches_profile() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("code=good-code"))
        .and(body_string_contains("grant_type=authorization_code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "ya29.token",
            "token_type": "Bearer",
            "expires_in": 3599
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/userinfo"))
        .and(header("authorization", "Bearer ya29.token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "1234",
            "email": "jane@example.com",
            "verified_email": true,
            "name": "Jane Doe",
            "given_name": "Jane",
            "family_name": "Doe"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let profile = provider(&server)
        .exchange_and_fetch_profile("good-code")
        .await
        .unwrap();

    assert_eq!(profile.email, "jane@example.com");
    assert!(profile.verified_email);
    assert_eq!(profile.given_name.as_deref(), Some("Jane"));
}

#[tokio::test]
async fn rejected_code_is_an_exchange_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "error": "invalid_grant" })),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/userinfo"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = provider(&server)
        .exchange_and_fetch_profile("bad-code")
        .await
        .unwrap_err();

    assert!(matches!(err, OAuthError::ExchangeFailed(_)));
}

#[tokio::test]
async fn rejected_credential_is_a_profile_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "access_token": "ya29.token" })),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/userinfo"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = provider(&server)
        .exchange_and_fetch_profile("code")
        .await
        .unwrap_err();

    assert!(matches!(err, OAuthError::ProfileFetchFailed(_)));
}

#[tokio::test]
async fn authorization_url_carries_client_and_state() {
    let server = MockServer::start().await;
    let url = provider(&server).authorization_url("nonce-1");

    assert!(url.starts_with(&format!("{}/auth?", server.uri())));
    assert!(url.contains("client_id=client-123"));
    assert!(url.contains("state=nonce-1"));
    assert!(url.contains("response_type=code"));
}
