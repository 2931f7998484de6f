mod common;

use anyhow::Result;
use axum::http::{header, Method, StatusCode};
use serde_json::json;

use common::{get, send_json, spawn, TestApp};
use museum_cms::auth::{verify, AccessClaims};
use museum_cms::database::models::Role;

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let app = TestApp::new()?;

    for router in [app.backend(), app.admin(), app.public()] {
        let res = get(&router, "/health", None).await?;
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.body["data"]["database"], "ok");
    }
    Ok(())
}

#[tokio::test]
async fn backend_login_issues_access_token() -> Result<()> {
    let app = TestApp::new()?;
    app.seed_user("curator", "s3cret", Role::Admin).await?;

    let res = send_json(
        &app.backend(),
        Method::POST,
        "/api/auth/login",
        None,
        json!({"username": "curator", "password": "s3cret"}),
    )
    .await?;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["user"]["username"], "curator");
    assert_eq!(res.body["data"]["user"]["role"], "admin");
    assert_eq!(res.body["data"]["user"]["organization"], "Museum Kota");

    let token = res.body["data"]["token"].as_str().unwrap_or_default();
    let claims: AccessClaims = verify(token, &app.state.config.security.jwt_secret)?;
    assert_eq!(claims.username, "curator");
    assert_eq!(claims.role, Role::Admin);
    Ok(())
}

#[tokio::test]
async fn wrong_password_and_unknown_user_look_the_same() -> Result<()> {
    let app = TestApp::new()?;
    app.seed_user("curator", "s3cret", Role::Admin).await?;
    let backend = app.backend();

    let wrong = send_json(
        &backend,
        Method::POST,
        "/api/auth/login",
        None,
        json!({"username": "curator", "password": "nope"}),
    )
    .await?;
    let unknown = send_json(
        &backend,
        Method::POST,
        "/api/auth/login",
        None,
        json!({"username": "ghost", "password": "nope"}),
    )
    .await?;

    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.body, unknown.body);
    Ok(())
}

#[tokio::test]
async fn login_requires_both_fields() -> Result<()> {
    let app = TestApp::new()?;

    let res = send_json(&app.backend(), Method::POST, "/api/auth/login", None, json!({"username": "curator"})).await?;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
    assert!(res.body["field_errors"]["password"].is_string());
    Ok(())
}

#[tokio::test]
async fn credentials_callback_opens_hydrated_session() -> Result<()> {
    let backend = TestApp::new()?;
    backend.seed_user("editor", "s3cret", Role::Staff).await?;
    let server = spawn(backend.backend()).await?;

    let mut config = common::test_config();
    config.backend.url = server.base_url.clone();
    let admin = TestApp::with_config(config)?;
    let router = admin.admin();

    let res = send_json(
        &router,
        Method::POST,
        "/api/auth/callback/credentials",
        None,
        json!({"username": "editor", "password": "s3cret"}),
    )
    .await?;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["user"]["role"], "staff");
    assert_eq!(res.body["data"]["user"]["organization"], "Museum Kota");
    assert!(!res.body["data"]["accessToken"].as_str().unwrap_or_default().is_empty());

    let set_cookie = res.headers[header::SET_COOKIE].to_str()?;
    assert!(set_cookie.starts_with("museum.session-token="));
    assert!(set_cookie.contains("HttpOnly"));
    let cookie = set_cookie.split(';').next().unwrap_or_default();

    let session = get(&router, "/api/auth/session", Some(cookie)).await?;
    assert_eq!(session.status, StatusCode::OK);
    assert_eq!(session.body["data"]["user"]["username"], "editor");
    assert_eq!(session.body["data"]["accessToken"], res.body["data"]["accessToken"]);

    // The access token inside the session is the backend's own
    let token = session.body["data"]["accessToken"].as_str().unwrap_or_default();
    let claims: AccessClaims = verify(token, &backend.state.config.security.jwt_secret)?;
    assert_eq!(claims.role, Role::Staff);
    Ok(())
}

#[tokio::test]
async fn credentials_callback_rejects_wrong_password() -> Result<()> {
    let backend = TestApp::new()?;
    backend.seed_user("editor", "s3cret", Role::Staff).await?;
    let server = spawn(backend.backend()).await?;

    let mut config = common::test_config();
    config.backend.url = server.base_url.clone();
    let admin = TestApp::with_config(config)?;

    let res = send_json(
        &admin.admin(),
        Method::POST,
        "/api/auth/callback/credentials",
        None,
        json!({"username": "editor", "password": "wrong"}),
    )
    .await?;

    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert!(res.headers.get(header::SET_COOKIE).is_none());
    Ok(())
}

#[tokio::test]
async fn credentials_callback_without_backend_is_unavailable() -> Result<()> {
    let app = TestApp::new()?;

    let res = send_json(
        &app.admin(),
        Method::POST,
        "/api/auth/callback/credentials",
        None,
        json!({"username": "editor", "password": "s3cret"}),
    )
    .await?;

    assert_eq!(res.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(res.body["code"], "SERVICE_UNAVAILABLE");
    Ok(())
}

#[tokio::test]
async fn signed_out_session_is_empty_object() -> Result<()> {
    let app = TestApp::new()?;
    let router = app.admin();

    let anonymous = get(&router, "/api/auth/session", None).await?;
    assert_eq!(anonymous.status, StatusCode::OK);
    assert_eq!(anonymous.body["data"], json!({}));

    let tampered = get(&router, "/api/auth/session", Some("museum.session-token=not-a-jwt")).await?;
    assert_eq!(tampered.body["data"], json!({}));
    Ok(())
}

#[tokio::test]
async fn signout_expires_cookie() -> Result<()> {
    let app = TestApp::new()?;
    let cookie = app.session_cookie(Role::Admin)?;

    let res = send_json(&app.admin(), Method::POST, "/api/auth/signout", Some(&cookie), json!({})).await?;

    assert_eq!(res.status, StatusCode::OK);
    let set_cookie = res.headers[header::SET_COOKIE].to_str()?;
    assert!(set_cookie.starts_with("museum.session-token=;"));
    assert!(set_cookie.contains("Max-Age=0"));
    Ok(())
}
