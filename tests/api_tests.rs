//! Integration tests for the catalog endpoints.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use animecat::config::Config;
use http_body_util::BodyExt;
use std::path::{Path, PathBuf};
use tower::ServiceExt;

const BOUNDARY: &str = "animecat-test-boundary";
const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

struct TestApp {
    router: Router,
    uploads: PathBuf,
}

fn spawn_app() -> TestApp {
    let root = std::env::temp_dir().join(format!("animecat-api-test-{}", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", root.join("catalog.db").display());
    config.server.uploads_path = root.join("uploads").display().to_string();
    config.server.public_path = root.join("public").display().to_string();

    let state = animecat::api::create_app_state_from_config(config, None)
        .expect("Failed to create app state");

    TestApp {
        router: animecat::api::router(state),
        uploads: root.join("uploads"),
    }
}

struct Upload<'a> {
    filename: &'a str,
    content_type: &'a str,
    bytes: &'a [u8],
}

fn png(filename: &str) -> Upload<'_> {
    Upload {
        filename,
        content_type: "image/png",
        bytes: PNG_BYTES,
    }
}

fn form_request(
    method: &str,
    uri: &str,
    fields: &[(&str, &str)],
    file: Option<Upload<'_>>,
) -> Request<Body> {
    let mut body = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }

    if let Some(file) = file {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"title_image\"; filename=\"{}\"\r\n",
                file.filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", file.content_type).as_bytes());
        body.extend_from_slice(file.bytes);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(method)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

fn entry_fields<'a>(title: &'a str, stars: &'a str) -> Vec<(&'static str, &'a str)> {
    vec![
        ("anime_title", title),
        ("date", "2023-09-29"),
        ("rating", "TV-14"),
        ("style", "Fantasy"),
        ("stars", stars),
        ("show_summary", "..."),
        ("num_of_seasons", "1"),
        ("publisher_id", "1"),
    ]
}

async fn create(app: &Router, title: &str, stars: &str) {
    let (status, body) = send(
        app,
        form_request(
            "POST",
            "/animeForm",
            &entry_fields(title, stars),
            Some(png("cover.png")),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "create failed: {body}");
}

fn stored_files(dir: &Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default()
}

fn titles(body: &serde_json::Value) -> Vec<String> {
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["anime_title"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_entry_lifecycle() {
    let app = spawn_app();

    let (status, body) = send(
        &app.router,
        form_request(
            "POST",
            "/animeForm",
            &entry_fields("Frieren", "5"),
            Some(png("frieren.png")),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Form submitted and data saved successfully!");

    let files = stored_files(&app.uploads);
    assert_eq!(files.len(), 1);
    assert!(files[0].starts_with("frieren-"));
    assert!(files[0].ends_with(".png"));

    let (status, body) = send(&app.router, get("/animeForm?title=frier")).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["anime_title"], "Frieren");
    assert_eq!(rows[0]["rating"], "TV-14");
    assert_eq!(rows[0]["stars"], 5);
    assert_eq!(rows[0]["publisher_id"], 1);
    assert_eq!(rows[0]["publisher_name"], "Aniplex");
    assert_eq!(rows[0]["title_image"], files[0].as_str());
    let id = rows[0]["anime_id"].as_i64().unwrap();

    let (_, body) = send(&app.router, get("/animeForm?title=frier&stars=3")).await;
    assert!(body["data"].as_array().unwrap().is_empty());

    let (status, body) = send(&app.router, get(&format!("/animeForm/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["anime_title"], "Frieren");
    assert_eq!(body["data"]["country"], "Japan");

    let mut update = entry_fields("Sousou no Frieren", "4");
    update.retain(|(name, _)| *name != "publisher_id");
    update.push(("old_image", files[0].as_str()));

    let (status, body) = send(
        &app.router,
        form_request("PUT", &format!("/animeForm/{id}"), &update, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Anime entry updated successfully.");

    let (_, body) = send(&app.router, get(&format!("/animeForm/{id}"))).await;
    assert_eq!(body["data"]["anime_title"], "Sousou no Frieren");
    assert_eq!(body["data"]["stars"], 4);
    assert_eq!(body["data"]["title_image"], files[0].as_str());
    assert_eq!(body["data"]["publisher_id"], 1);

    let (status, body) = send(&app.router, delete(&format!("/animeForm/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Anime entry deleted successfully.");

    let (status, body) = send(&app.router, get(&format!("/animeForm/{id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Anime not found.");

    let (status, body) = send(&app.router, delete(&format!("/animeForm/{id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Anime entry not found.");
}

#[tokio::test]
async fn test_update_with_new_image_replaces_cover() {
    let app = spawn_app();
    create(&app.router, "Mushishi", "5").await;

    let (_, body) = send(&app.router, get("/animeForm")).await;
    let id = body["data"][0]["anime_id"].as_i64().unwrap();
    let old_image = body["data"][0]["title_image"].as_str().unwrap().to_string();

    let mut update = entry_fields("Mushishi", "5");
    update.push(("old_image", old_image.as_str()));

    let (status, _) = send(
        &app.router,
        form_request(
            "PUT",
            &format!("/animeForm/{id}"),
            &update,
            Some(png("ginko.png")),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app.router, get(&format!("/animeForm/{id}"))).await;
    let new_image = body["data"]["title_image"].as_str().unwrap();
    assert!(new_image.starts_with("ginko-"));
    assert_eq!(stored_files(&app.uploads).len(), 2);
}

#[tokio::test]
async fn test_create_with_empty_form_is_rejected() {
    let app = spawn_app();

    let (status, body) = send(
        &app.router,
        form_request("POST", "/animeForm", &[("anime_title", "")], None),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Request fields or files are invalid.");

    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors[0]["field"], "title_image");
    assert_eq!(errors[0]["message"], "Please upload an image file.");
    assert_eq!(errors[1]["field"], "anime_title");
    assert_eq!(errors[1]["message"], "Please enter a title");
    assert_eq!(errors.len(), 9);

    assert!(stored_files(&app.uploads).is_empty());
}

#[tokio::test]
async fn test_create_rejects_disallowed_image_type() {
    let app = spawn_app();

    let gif = Upload {
        filename: "cover.gif",
        content_type: "image/gif",
        bytes: b"GIF89a",
    };
    let (status, body) = send(
        &app.router,
        form_request("POST", "/animeForm", &entry_fields("Frieren", "5"), Some(gif)),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["errors"],
        serde_json::json!([{
            "field": "title_image",
            "message": "Only JPG, JPEG, and PNG files are allowed."
        }])
    );
    assert!(stored_files(&app.uploads).is_empty());
}

#[tokio::test]
async fn test_create_with_unknown_publisher_leaves_no_upload() {
    let app = spawn_app();

    let mut fields = entry_fields("Frieren", "5");
    fields.retain(|(name, _)| *name != "publisher_id");
    fields.push(("publisher_id", "999"));

    let (status, body) = send(
        &app.router,
        form_request("POST", "/animeForm/", &fields, Some(png("frieren.png"))),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "publisher_id");
    assert_eq!(body["errors"][0]["message"], "Please enter a valid publisher ID.");
    assert!(stored_files(&app.uploads).is_empty());
}

#[tokio::test]
async fn test_update_validation_and_missing_entry() {
    let app = spawn_app();

    let (status, body) = send(
        &app.router,
        form_request(
            "PUT",
            "/animeForm/1",
            &[("anime_title", "Frieren"), ("stars", "9")],
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(
        fields,
        vec!["date", "rating", "style", "stars", "show_summary", "num_of_seasons"]
    );

    let (status, body) = send(
        &app.router,
        form_request(
            "PUT",
            "/animeForm/999",
            &entry_fields("Frieren", "5"),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Anime entry not found.");
}

#[tokio::test]
async fn test_delete_with_non_numeric_id() {
    let app = spawn_app();

    let (status, body) = send(&app.router, delete("/animeForm/abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("abc"));

    let (status, _) = send(&app.router, get("/animeForm/abc")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_with_unmatchable_number_is_not_found() {
    let app = spawn_app();

    for uri in ["/animeForm/1.5", "/animeForm/99999999999"] {
        let (status, body) = send(&app.router, delete(uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body["message"], "Anime entry not found.");
    }
}

#[tokio::test]
async fn test_malformed_query_string_uses_json_envelope() {
    let app = spawn_app();

    for uri in ["/animeForm?title=a&title=b", "/publisher?name=a&name=b"] {
        let (status, body) = send(&app.router, get(uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(
            body["message"].as_str().unwrap().contains("duplicate field"),
            "{uri}: {body}"
        );
    }
}

#[tokio::test]
async fn test_list_filters_by_date_and_unicode_title() {
    let app = spawn_app();

    for (title, date) in [
        ("Frieren", "2023-09-29"),
        ("Pluto", "2023-10-26"),
        ("Élan Vital", "2022-09-01"),
    ] {
        let mut fields = entry_fields(title, "4");
        fields[1] = ("date", date);
        let (status, body) = send(
            &app.router,
            form_request("POST", "/animeForm", &fields, Some(png("cover.png"))),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "create failed: {body}");
    }

    let (_, body) = send(&app.router, get("/animeForm?date=2023-09")).await;
    assert_eq!(titles(&body), vec!["Frieren"]);

    let (_, body) = send(&app.router, get("/animeForm?date=-09-")).await;
    assert_eq!(titles(&body), vec!["Frieren", "Élan Vital"]);

    // "élan", percent-encoded
    let (_, body) = send(&app.router, get("/animeForm?title=%C3%A9lan")).await;
    assert_eq!(titles(&body), vec!["Élan Vital"]);

    // three uploads of cover.png, three distinct files
    assert_eq!(stored_files(&app.uploads).len(), 3);
}

#[tokio::test]
async fn test_list_sort_and_limit() {
    let app = spawn_app();
    create(&app.router, "Mushishi", "5").await;
    create(&app.router, "Bocchi the Rock", "3").await;
    create(&app.router, "Frieren", "4").await;

    let (_, body) = send(&app.router, get("/animeForm")).await;
    assert_eq!(titles(&body), vec!["Bocchi the Rock", "Frieren", "Mushishi"]);

    let (_, body) = send(&app.router, get("/animeForm?sortBy=bogus")).await;
    assert_eq!(titles(&body), vec!["Bocchi the Rock", "Frieren", "Mushishi"]);

    let (_, body) = send(&app.router, get("/animeForm?sortBy=stars")).await;
    assert_eq!(titles(&body), vec!["Bocchi the Rock", "Frieren", "Mushishi"]);

    let (_, body) = send(&app.router, get("/animeForm?sortBy=stars&limit=2")).await;
    assert_eq!(titles(&body), vec!["Bocchi the Rock", "Frieren"]);

    let (_, body) = send(&app.router, get("/animeForm?limit=-1")).await;
    assert_eq!(titles(&body).len(), 3);

    let (_, body) = send(&app.router, get("/animeForm?stars=abc")).await;
    assert_eq!(titles(&body).len(), 3);

    let (_, body) = send(&app.router, get("/animeForm?rating=TV-14&stars=4")).await;
    assert_eq!(titles(&body), vec!["Frieren"]);

    let (_, body) = send(&app.router, get("/animeForm?publisher_name=aniplex")).await;
    assert_eq!(titles(&body).len(), 3);
}

#[tokio::test]
async fn test_list_default_limit() {
    let app = spawn_app();
    for n in 0..11 {
        create(&app.router, &format!("Entry {n:02}"), "3").await;
    }

    let (_, body) = send(&app.router, get("/animeForm")).await;
    assert_eq!(titles(&body).len(), 10);

    let (_, body) = send(&app.router, get("/animeForm?limit=abc")).await;
    assert_eq!(titles(&body).len(), 10);

    let (_, body) = send(&app.router, get("/animeForm?limit=20")).await;
    assert_eq!(titles(&body).len(), 11);
}

#[tokio::test]
async fn test_publishers() {
    let app = spawn_app();

    let (status, body) = send(&app.router, get("/publisher")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 5);

    let (_, body) = send(&app.router, get("/publisher?name=ani")).await;
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Aniplex", "Toho Animation"]);

    let (_, body) = send(&app.router, get("/publisher?name=%20%20")).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 5);
}
