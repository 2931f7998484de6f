mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use chrono::{Datelike, Utc};
use reqwest::multipart::{Form, Part};
use serde_json::{json, Value};

use common::{get, id_of, request, send, send_json, spawn, TestApp, HOSTED_URL};
use museum_cms::database::models::Role;
use museum_cms::state::AppState;

#[tokio::test]
async fn book_defaults_are_applied_on_create() -> Result<()> {
    let app = TestApp::new()?;
    let cookie = app.session_cookie(Role::Staff)?;

    let res = send_json(&app.admin(), Method::POST, "/api/books", Some(&cookie), json!({"title": "Babad Tanah Jawi"})).await?;

    assert_eq!(res.status, StatusCode::CREATED);
    let book = &res.body["data"];
    assert_eq!(book["price"].as_f64(), Some(0.0));
    assert_eq!(book["year"].as_i64(), Some(i64::from(Utc::now().year())));
    assert_eq!(book["isAvailable"], true);
    assert_eq!(book["_id"].as_str().map(str::len), Some(32));
    assert!(book["createdAt"].is_string());
    Ok(())
}

#[tokio::test]
async fn null_book_numbers_take_defaults() -> Result<()> {
    let app = TestApp::new()?;
    let cookie = app.session_cookie(Role::Staff)?;

    let body = json!({"title": "Babad Tanah Jawi", "price": null, "year": null});
    let res = send_json(&app.admin(), Method::POST, "/api/books", Some(&cookie), body).await?;

    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["data"]["price"].as_f64(), Some(0.0));
    assert_eq!(res.body["data"]["year"].as_i64(), Some(i64::from(Utc::now().year())));
    Ok(())
}

#[tokio::test]
async fn invalid_payloads_are_bad_requests() -> Result<()> {
    let app = TestApp::new()?;
    let cookie = app.session_cookie(Role::Staff)?;
    let router = app.admin();

    let res = send_json(&router, Method::POST, "/api/books", Some(&cookie), json!({"title": "", "price": -5})).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
    assert!(res.body["field_errors"]["title"].is_string());
    assert!(res.body["field_errors"]["price"].is_string());

    let res = send_json(&router, Method::POST, "/api/party-literasi", Some(&cookie), json!({"title": "No date"})).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let mut raw = request(Method::POST, "/api/media-tbyt", Some(&cookie), None)?;
    *raw.body_mut() = axum::body::Body::from("{not json");
    raw.headers_mut()
        .insert(axum::http::header::CONTENT_TYPE, "application/json".parse()?);
    let res = send(&router, raw).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["code"], "INVALID_JSON");

    assert_eq!(app.counts().await?.iter().sum::<u64>(), 0);
    Ok(())
}

#[tokio::test]
async fn updating_missing_media_is_not_found() -> Result<()> {
    let app = TestApp::new()?;
    let cookie = app.session_cookie(Role::Staff)?;

    let res = send_json(
        &app.admin(),
        Method::PUT,
        "/api/media/0123456789abcdef0123456789abcdef",
        Some(&cookie),
        json!({"title": "Renamed"}),
    )
    .await?;

    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body["code"], "NOT_FOUND");
    assert_eq!(res.body["message"], "Media not found");
    Ok(())
}

#[tokio::test]
async fn deleting_missing_ui_media_is_not_found() -> Result<()> {
    let app = TestApp::new()?;
    let cookie = app.session_cookie(Role::Staff)?;

    let res = send(&app.admin(), request(Method::DELETE, "/api/ui-media/missing", Some(&cookie), None)?).await?;

    assert_eq!(res.status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn media_partial_update_keeps_other_fields() -> Result<()> {
    let app = TestApp::new()?;
    let cookie = app.session_cookie(Role::Staff)?;
    let router = app.admin();
    let saved = app
        .repo::<museum_cms::database::models::Media>()
        .create(json!({"title": "Keris", "url": "https://img/upload/k.jpg", "description": "Pusaka"}))
        .await?;
    let id = id_of(&Value::Object(saved));

    let res = send_json(
        &router,
        Method::PUT,
        &format!("/api/media/{}", id),
        Some(&cookie),
        json!({"isPublic": true, "_id": "ignored"}),
    )
    .await?;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["_id"], id.as_str());
    assert_eq!(res.body["data"]["isPublic"], true);
    assert_eq!(res.body["data"]["description"], "Pusaka");

    let res = send_json(&router, Method::PUT, &format!("/api/media/{}", id), Some(&cookie), json!({"type": "hologram"})).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn delete_confirms_and_removes() -> Result<()> {
    let app = TestApp::new()?;
    let cookie = app.session_cookie(Role::Admin)?;
    let router = app.admin();

    let created = send_json(&router, Method::POST, "/api/media-tbyt", Some(&cookie), json!({"caption": "Panggung"})).await?;
    assert_eq!(created.status, StatusCode::CREATED);
    let id = id_of(&created.body["data"]);

    let uri = format!("/api/media-tbyt/{}", id);
    let res = send(&router, request(Method::DELETE, &uri, Some(&cookie), None)?).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["id"], id.as_str());
    assert!(res.body["data"]["message"].is_string());

    let gone = get(&router, &uri, Some(&cookie)).await?;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn events_and_books_expand_references() -> Result<()> {
    let app = TestApp::new()?;
    let cookie = app.session_cookie(Role::Staff)?;
    let router = app.admin();

    let stage = send_json(&router, Method::POST, "/api/media-tbyt", Some(&cookie), json!({"caption": "Panggung"})).await?;
    let stage_id = id_of(&stage.body["data"]);

    let event = send_json(
        &router,
        Method::POST,
        "/api/party-literasi",
        Some(&cookie),
        json!({
            "title": "Dongeng Anak",
            "startDate": "2026-12-01T09:00:00Z",
            "media": [stage_id, "dangling"],
            "status": "scheduled"
        }),
    )
    .await?;
    assert_eq!(event.status, StatusCode::CREATED);
    assert_eq!(event.body["data"]["media"][0]["caption"], "Panggung");
    assert_eq!(event.body["data"]["media"].as_array().map(Vec::len), Some(1));
    let event_id = id_of(&event.body["data"]);

    let book = send_json(
        &router,
        Method::POST,
        "/api/books",
        Some(&cookie),
        json!({"title": "Antologi Dongeng", "relatedPrograms": [event_id]}),
    )
    .await?;
    let book_id = id_of(&book.body["data"]);

    let shown = get(&router, &format!("/api/books/{}", book_id), Some(&cookie)).await?;
    assert_eq!(shown.body["data"]["relatedPrograms"][0]["title"], "Dongeng Anak");

    let listed = get(&router, "/api/party-literasi", Some(&cookie)).await?;
    assert_eq!(listed.body["data"][0]["media"][0]["caption"], "Panggung");

    // Expanded documents can be sent back unchanged
    let mut edited = shown.body["data"].clone();
    edited["title"] = json!("Antologi Dongeng Nusantara");
    let res = send_json(&router, Method::PUT, &format!("/api/books/{}", book_id), Some(&cookie), edited).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["relatedPrograms"][0]["_id"], event_id.as_str());
    Ok(())
}

#[tokio::test]
async fn lists_are_newest_first() -> Result<()> {
    let app = TestApp::new()?;
    let cookie = app.session_cookie(Role::Staff)?;
    let router = app.admin();

    for title in ["first", "second", "third"] {
        send_json(&router, Method::POST, "/api/books", Some(&cookie), json!({"title": title})).await?;
    }

    let res = get(&router, "/api/books", Some(&cookie)).await?;
    let titles: Vec<_> = res.body["data"]
        .as_array()
        .map(|books| books.iter().filter_map(|b| b["title"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(titles, vec!["third", "second", "first"]);
    Ok(())
}

fn image_part() -> Result<Part> {
    Ok(Part::bytes(vec![0x89, b'P', b'N', b'G']).file_name("keris.png").mime_str("image/png")?)
}

#[tokio::test]
async fn upload_without_file_is_rejected_before_hosting() -> Result<()> {
    let app = TestApp::new()?;
    let server = spawn(app.admin()).await?;

    let res = reqwest::Client::new()
        .post(format!("{}/api/media", server.base_url))
        .header(reqwest::header::COOKIE, app.session_cookie(Role::Staff)?)
        .multipart(Form::new().text("title", "Keris"))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["code"], "BAD_REQUEST");
    assert_eq!(app.media_host.upload_count(), 0);
    assert_eq!(app.counts().await?.iter().sum::<u64>(), 0);
    Ok(())
}

#[tokio::test]
async fn invalid_upload_fields_are_rejected_before_hosting() -> Result<()> {
    let app = TestApp::new()?;
    let server = spawn(app.admin()).await?;
    let client = reqwest::Client::new();

    let bad_type = Form::new()
        .text("title", "Keris")
        .text("type", "hologram")
        .part("file", image_part()?);
    let res = client
        .post(format!("{}/api/media", server.base_url))
        .header(reqwest::header::COOKIE, app.session_cookie(Role::Staff)?)
        .multipart(bad_type)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let bad_index = Form::new()
        .text("title", "Hero")
        .text("locationIds", "home-hero")
        .text("index", "-1")
        .part("file", image_part()?);
    let res = client
        .post(format!("{}/api/ui-media", server.base_url))
        .header(reqwest::header::COOKIE, app.session_cookie(Role::Staff)?)
        .multipart(bad_index)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    assert_eq!(app.media_host.upload_count(), 0);
    assert_eq!(app.counts().await?.iter().sum::<u64>(), 0);
    Ok(())
}

#[tokio::test]
async fn media_upload_persists_hosted_urls() -> Result<()> {
    let app = TestApp::new()?;
    let server = spawn(app.admin()).await?;

    let form = Form::new()
        .text("title", "Keris")
        .text("description", "Pusaka")
        .text("isPublic", "true")
        .part("file", image_part()?);
    let res = reqwest::Client::new()
        .post(format!("{}/api/media", server.base_url))
        .header(reqwest::header::COOKIE, app.session_cookie(Role::Staff)?)
        .multipart(form)
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["url"], HOSTED_URL);
    assert!(body["data"]["thumbnailUrl"]
        .as_str()
        .unwrap_or_default()
        .contains("/upload/c_fill,w_300,h_300/"));
    assert_eq!(body["data"]["isPublic"], true);
    assert_eq!(body["data"]["type"], "image");
    assert_eq!(app.media_host.upload_count(), 1);
    Ok(())
}

#[tokio::test]
async fn ui_media_upload_splits_location_ids() -> Result<()> {
    let app = TestApp::new()?;
    let server = spawn(app.admin()).await?;

    let form = Form::new()
        .text("title", "Hero")
        .text("locationIds", "home-hero, about")
        .text("locationIds", "gallery")
        .text("index", "2")
        .part("file", image_part()?);
    let res = reqwest::Client::new()
        .post(format!("{}/api/ui-media", server.base_url))
        .header(reqwest::header::COOKIE, app.session_cookie(Role::Staff)?)
        .multipart(form)
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["locationIds"], json!(["home-hero", "about", "gallery"]));
    assert_eq!(body["data"]["index"], 2);
    assert_eq!(body["data"]["isPublic"], true);
    Ok(())
}

#[tokio::test]
async fn upload_without_host_credentials_is_unavailable() -> Result<()> {
    let state = AppState::build(common::test_config())?;
    let cookie = {
        let app = TestApp::new()?;
        app.session_cookie(Role::Staff)?
    };
    let server = spawn(museum_cms::app::admin_app(state)).await?;

    let form = Form::new().text("title", "Keris").part("file", image_part()?);
    let res = reqwest::Client::new()
        .post(format!("{}/api/media", server.base_url))
        .header(reqwest::header::COOKIE, cookie)
        .multipart(form)
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    Ok(())
}
