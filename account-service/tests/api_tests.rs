use auth::TokenCodec;
use chrono::Utc;

mod common;

use common::TestApp;

#[tokio::test]
async fn signup_returns_created_profile_without_secrets() {
    let app = TestApp::spawn().await;

    let response = app.signup("user123", "Password123!", "홍길동").await;
    assert_eq!(response.status(), 201);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["username"], "user123");
    assert_eq!(body["data"]["nickname"], "홍길동");
    assert_eq!(body["data"]["authorities"], serde_json::json!(["ROLE_USER"]));

    // Neither the password nor its hash leaves the server
    let raw = body.to_string();
    assert!(!raw.contains("Password123!"));
    assert!(!raw.contains("password"));
}

#[tokio::test]
async fn signup_rejects_duplicate_username() {
    let app = TestApp::spawn().await;

    assert_eq!(app.signup("user123", "Password123!", "홍길동").await.status(), 201);

    let response = app.signup("user123", "Other456!", "김철수").await;
    assert_eq!(response.status(), 409);
}

#[tokio::test]
async fn signup_rejects_weak_password() {
    let app = TestApp::spawn().await;

    // 6 chars, no symbol
    let response = app.signup("user123", "short1", "홍길동").await;
    assert_eq!(response.status(), 422);
}

#[tokio::test]
async fn signup_rejects_out_of_range_fields() {
    let app = TestApp::spawn().await;

    // Username below 4 chars
    assert_eq!(app.signup("abc", "Password123!", "홍길동").await.status(), 422);
    // Nickname below 2 chars
    assert_eq!(app.signup("user123", "Password123!", "홍").await.status(), 422);
}

#[tokio::test]
async fn login_issues_decodable_bearer_token() {
    let app = TestApp::spawn().await;
    app.signup("user123", "Password123!", "홍길동").await;

    let token = app.login_token("user123", "Password123!").await;
    assert!(token.starts_with("Bearer "));

    let bare = TokenCodec::strip_scheme(&token).unwrap();
    let claims = app.codec.verify(bare, Utc::now()).expect("Token should verify");
    assert_eq!(claims.username, "user123");
    assert_eq!(claims.nickname, "홍길동");
    assert_eq!(claims.exp - claims.iat, 60 * 60);
}

#[tokio::test]
async fn login_sets_each_token_cookie_exactly_once() {
    let app = TestApp::spawn().await;
    app.signup("user123", "Password123!", "홍길동").await;

    let response = app.login("user123", "Password123!").await;
    assert_eq!(response.status(), 200);

    let cookies: Vec<&str> = response
        .headers()
        .get_all("set-cookie")
        .iter()
        .map(|v| v.to_str().unwrap())
        .collect();
    assert_eq!(cookies.len(), 2);

    let access = cookies
        .iter()
        .find(|c| c.starts_with("Authorization="))
        .expect("Missing access token cookie");
    let refresh = cookies
        .iter()
        .find(|c| c.starts_with("refreshToken="))
        .expect("Missing refresh token cookie");

    for cookie in [access, refresh] {
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("SameSite=Strict"));
        assert!(cookie.contains("Path=/"));
    }

    // Max-age follows each token's own TTL
    assert!(access.contains("Max-Age=3600"));
    assert!(refresh.contains("Max-Age=86400"));
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let app = TestApp::spawn().await;
    app.signup("user123", "Password123!", "홍길동").await;

    let wrong_password = app.login("user123", "wrong").await;
    let unknown_user = app.login("nosuchuser", "Password123!").await;

    assert_eq!(wrong_password.status(), 401);
    assert_eq!(unknown_user.status(), 401);

    // Same body for both: no username enumeration
    let body_a: serde_json::Value = wrong_password.json().await.unwrap();
    let body_b: serde_json::Value = unknown_user.json().await.unwrap();
    assert_eq!(body_a, body_b);
    assert_eq!(body_a["data"]["message"], "Invalid credentials");
}

#[tokio::test]
async fn me_requires_a_registered_token() {
    let app = TestApp::spawn().await;
    app.signup("user123", "Password123!", "홍길동").await;

    // No header
    let response = app
        .api_client
        .get(format!("{}/api/users/me", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);

    // Missing scheme prefix
    let response = app.get_me("eyJhbGciOiJIUzI1NiJ9.x.y").await;
    assert_eq!(response.status(), 401);

    // Freshly issued token works
    let token = app.login_token("user123", "Password123!").await;
    let response = app.get_me(&token).await;
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["username"], "user123");
    assert_eq!(body["data"]["nickname"], "홍길동");
}

#[tokio::test]
async fn relogin_revokes_the_previous_access_token() {
    let app = TestApp::spawn().await;
    app.signup("user123", "Password123!", "홍길동").await;

    let first_token = app.login_token("user123", "Password123!").await;
    assert_eq!(app.get_me(&first_token).await.status(), 200);

    // Claims carry second-resolution timestamps; cross a second boundary
    // so the second login mints a distinct token
    tokio::time::sleep(std::time::Duration::from_millis(1100)).await;

    // Second login overwrites the registry slots
    let second_token = app.login_token("user123", "Password123!").await;

    // The old token still verifies cryptographically...
    let bare = TokenCodec::strip_scheme(&first_token).unwrap();
    assert!(app.codec.verify(bare, Utc::now()).is_ok());

    // ...but is no longer authorized, while the new one is
    assert_eq!(app.get_me(&first_token).await.status(), 401);
    assert_eq!(app.get_me(&second_token).await.status(), 200);
}

#[tokio::test]
async fn signup_then_login_roundtrip() {
    let app = TestApp::spawn().await;

    let response = app.signup("user123", "Password123!", "홍길동").await;
    assert_eq!(response.status(), 201);

    let token = app.login_token("user123", "Password123!").await;
    let claims = app
        .codec
        .verify(TokenCodec::strip_scheme(&token).unwrap(), Utc::now())
        .unwrap();

    assert_eq!(claims.username, "user123");
    assert_eq!(claims.nickname, "홍길동");
    assert_eq!(claims.user_role, auth::UserRole::User);
}
