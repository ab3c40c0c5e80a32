//! Integration tests for the `/api/notes` endpoints.

mod common;

use axum::http::{Method, StatusCode, header};
use common::{body_json, build_test_app, create_note, get, ids, send};
use serde_json::json;

#[tokio::test]
async fn create_returns_location_and_matching_timestamps() {
    let app = build_test_app();

    let response = send(
        &app,
        Method::POST,
        "/api/notes",
        Some(json!({
            "id": 77,
            "title": "Groceries",
            "content": "<p>milk, eggs</p>",
            "category": "Personal",
            "tags": ["home"],
            "isFavorite": true
        })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response.headers()[header::LOCATION].to_str().unwrap().to_string();
    let created = body_json(response).await;

    assert_ne!(created["id"], 77);
    assert_eq!(location, format!("/api/notes/{}", created["id"]));
    assert_eq!(created["createdAt"], created["updatedAt"]);

    let fetched = body_json(get(&app, &location).await).await;
    assert_eq!(fetched["title"], "Groceries");
    assert_eq!(fetched["content"], "<p>milk, eggs</p>");
    assert_eq!(fetched["category"], "Personal");
    assert_eq!(fetched["tags"], json!(["home"]));
    assert_eq!(fetched["isFavorite"], true);
}

#[tokio::test]
async fn create_rejects_blank_title() {
    let app = build_test_app();

    let response = send(
        &app,
        Method::POST,
        "/api/notes",
        Some(json!({ "title": "", "content": "x", "category": "General" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["error"].is_string());
}

#[tokio::test]
async fn malformed_bodies_are_400_with_error_json() {
    let app = build_test_app();
    let created = create_note(&app, "a", "", "General", &[]).await;
    let id = created["id"].as_i64().unwrap();

    let bad_id = send(
        &app,
        Method::PUT,
        &format!("/api/notes/{id}"),
        Some(json!({ "id": "abc", "title": "b", "content": "", "category": "General" })),
    )
    .await;
    assert_eq!(bad_id.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        bad_id.headers()[header::CONTENT_TYPE],
        "application/json"
    );
    assert!(body_json(bad_id).await["error"].is_string());

    let no_title = send(&app, Method::POST, "/api/notes", Some(json!({ "content": "x" }))).await;
    assert_eq!(no_title.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(no_title).await["error"].is_string());

    let unchanged = body_json(get(&app, &format!("/api/notes/{id}")).await).await;
    assert_eq!(unchanged["title"], "a");
}

#[tokio::test]
async fn non_numeric_note_id_is_400() {
    let app = build_test_app();

    let response = get(&app, "/api/notes/abc").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["error"].is_string());
}

#[tokio::test]
async fn get_missing_note_is_404() {
    let app = build_test_app();

    assert_eq!(get(&app, "/api/notes/12345").await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_overwrites_fields_and_keeps_identity() {
    let app = build_test_app();
    let created = create_note(&app, "Draft", "", "Ideas", &[]).await;
    let id = created["id"].as_i64().unwrap();

    let response = send(
        &app,
        Method::PUT,
        &format!("/api/notes/{id}"),
        Some(json!({
            "id": id,
            "title": "Final",
            "content": "<b>done</b>",
            "category": "Work",
            "tags": ["q3", "report"],
            "isFavorite": true
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let updated = body_json(get(&app, &format!("/api/notes/{id}")).await).await;
    assert_eq!(updated["id"], id);
    assert_eq!(updated["createdAt"], created["createdAt"]);
    assert_eq!(updated["title"], "Final");
    assert_eq!(updated["tags"], json!(["q3", "report"]));
    assert_eq!(updated["isFavorite"], true);

    let before: chrono::DateTime<chrono::Utc> =
        serde_json::from_value(created["updatedAt"].clone()).unwrap();
    let after: chrono::DateTime<chrono::Utc> =
        serde_json::from_value(updated["updatedAt"].clone()).unwrap();
    assert!(after >= before);
}

#[tokio::test]
async fn update_with_mismatched_id_is_400_and_missing_is_404() {
    let app = build_test_app();
    let created = create_note(&app, "a", "", "General", &[]).await;
    let id = created["id"].as_i64().unwrap();

    let mismatch = send(
        &app,
        Method::PUT,
        &format!("/api/notes/{id}"),
        Some(json!({ "id": id + 1, "title": "b", "content": "", "category": "General" })),
    )
    .await;
    assert_eq!(mismatch.status(), StatusCode::BAD_REQUEST);

    let missing = send(
        &app,
        Method::PUT,
        "/api/notes/999",
        Some(json!({ "id": 999, "title": "b", "content": "", "category": "General" })),
    )
    .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_removes_note() {
    let app = build_test_app();
    let created = create_note(&app, "a", "", "General", &[]).await;
    let uri = format!("/api/notes/{}", created["id"]);

    assert_eq!(
        send(&app, Method::DELETE, &uri, None).await.status(),
        StatusCode::NO_CONTENT
    );
    assert_eq!(get(&app, &uri).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        send(&app, Method::DELETE, &uri, None).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn list_puts_recently_touched_first() {
    let app = build_test_app();
    let first = create_note(&app, "first", "", "General", &[]).await;
    let second = create_note(&app, "second", "", "General", &[]).await;
    let first_id = first["id"].as_i64().unwrap();

    send(
        &app,
        Method::PUT,
        &format!("/api/notes/{first_id}"),
        Some(json!({ "id": first_id, "title": "first, edited", "content": "", "category": "General" })),
    )
    .await;

    let notes = body_json(get(&app, "/api/notes").await).await;
    assert_eq!(ids(&notes), [first_id, second["id"].as_i64().unwrap()]);
}

#[tokio::test]
async fn search_finds_groceries_by_content() {
    let app = build_test_app();
    let groceries = create_note(&app, "Groceries", "milk, eggs", "Personal", &["home"]).await;
    create_note(&app, "Standup", "yesterday I fixed the build", "Work", &["daily"]).await;

    let found = body_json(get(&app, "/api/notes/search?query=egg").await).await;
    assert_eq!(ids(&found), [groceries["id"].as_i64().unwrap()]);

    let by_tag = body_json(get(&app, "/api/notes/search?query=DAILY").await).await;
    assert_eq!(by_tag.as_array().unwrap().len(), 1);
    assert_eq!(by_tag[0]["title"], "Standup");
}

#[tokio::test]
async fn blank_search_equals_list() {
    let app = build_test_app();
    for title in ["a", "b", "c"] {
        create_note(&app, title, "", "General", &[]).await;
    }

    let listed = body_json(get(&app, "/api/notes").await).await;
    let blank = body_json(get(&app, "/api/notes/search?query=").await).await;
    let missing = body_json(get(&app, "/api/notes/search").await).await;

    assert_eq!(ids(&listed), ids(&blank));
    assert_eq!(ids(&listed), ids(&missing));
}

#[tokio::test]
async fn search_treats_wildcards_literally() {
    let app = build_test_app();
    create_note(&app, "100% done", "", "General", &[]).await;
    create_note(&app, "halfway", "", "General", &[]).await;

    let found = body_json(get(&app, "/api/notes/search?query=%25").await).await;
    assert_eq!(found.as_array().unwrap().len(), 1);
    assert_eq!(found[0]["title"], "100% done");
}

#[tokio::test]
async fn notes_by_category_matches_exactly() {
    let app = build_test_app();
    create_note(&app, "a", "", "Work", &[]).await;
    create_note(&app, "b", "", "Work", &[]).await;
    create_note(&app, "c", "", "work", &[]).await;

    let work = body_json(get(&app, "/api/notes/category/Work").await).await;
    assert_eq!(work.as_array().unwrap().len(), 2);

    let none = body_json(get(&app, "/api/notes/category/Travel").await).await;
    assert!(none.as_array().unwrap().is_empty());
}
