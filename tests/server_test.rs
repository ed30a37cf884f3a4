use anyhow::Result;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use routing_input_transformer::server::{router, AppState};
use routing_input_transformer::{TomlConfig, UploadedFile};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

const BODY_LIMIT: usize = 16 * 1024 * 1024;

fn app(dir: &TempDir) -> axum::Router {
    let mut config = TomlConfig::default();
    config.output.path = dir.path().to_string_lossy().to_string();
    router(Arc::new(AppState::new(config)))
}

fn submit_body(filename: &str, body: &[u8]) -> String {
    let upload = UploadedFile::from_bytes(filename, body);
    serde_json::json!({ "filename": upload.filename, "contents": upload.contents }).to_string()
}

async fn post_json(app: axum::Router, uri: &str, body: String) -> Result<(StatusCode, serde_json::Value)> {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))?,
        )
        .await?;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), BODY_LIMIT).await?;
    Ok((status, serde_json::from_slice(&bytes)?))
}

#[tokio::test]
async fn test_index_page_is_served() -> Result<()> {
    let dir = TempDir::new()?;
    let response = app(&dir)
        .oneshot(Request::builder().uri("/").body(Body::empty())?)
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), BODY_LIMIT).await?;
    let html = String::from_utf8(bytes.to_vec())?;
    assert!(html.contains("Routing Input Transformer"));
    assert!(html.contains("Download Transformed File"));
    // 未處理成功時清掉上一次的下載連結
    assert!(html.contains("link.setAttribute('href', '')"));
    Ok(())
}

#[tokio::test]
async fn test_health_check() -> Result<()> {
    let dir = TempDir::new()?;
    let response = app(&dir)
        .oneshot(Request::builder().uri("/api/health").body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn test_submit_then_download() -> Result<()> {
    let dir = TempDir::new()?;
    let app = app(&dir);

    let (status, json) = post_json(
        app.clone(),
        "/api/submit",
        submit_body("routes.csv", b"groupid_pickup,groupid_delivery,tags\nA,B,C\n"),
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "processed");
    assert_eq!(json["file_info"], "File name: routes.csv, Columns: 4, Rows: 1");
    assert_eq!(json["download_href"], "/download/data.xlsx");
    assert_eq!(json["table"]["columns"][3], "groupid");
    assert_eq!(json["table"]["rows"][0][3], "ABC");

    let response = app
        .oneshot(Request::builder().uri("/download/data.xlsx").body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"data.xlsx\""
    );
    let bytes = to_bytes(response.into_body(), BODY_LIMIT).await?;
    assert_eq!(bytes.as_ref(), std::fs::read(dir.path().join("data.xlsx"))?.as_slice());

    Ok(())
}

#[tokio::test]
async fn test_submit_without_contents_is_idle() -> Result<()> {
    let dir = TempDir::new()?;
    let (status, json) = post_json(app(&dir), "/api/submit", "{}".to_string()).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "idle");
    Ok(())
}

#[tokio::test]
async fn test_submit_unsupported_file_is_rejected_inline() -> Result<()> {
    let dir = TempDir::new()?;
    let (status, json) = post_json(
        app(&dir),
        "/api/submit",
        submit_body("routes.pdf", b"%PDF-1.4"),
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "rejected");
    assert_eq!(json["message"], "Unsupported file type");
    Ok(())
}

#[tokio::test]
async fn test_submit_missing_column_is_unprocessable() -> Result<()> {
    let dir = TempDir::new()?;
    let (status, json) = post_json(
        app(&dir),
        "/api/submit",
        submit_body("routes.csv", b"groupid_pickup,tags\nA,C\n"),
    )
    .await?;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["status"], 422);
    assert_eq!(
        json["error"],
        "The uploaded file has no 'groupid_delivery' column."
    );
    Ok(())
}

#[tokio::test]
async fn test_multipart_upload() -> Result<()> {
    let dir = TempDir::new()?;
    let boundary = "XBOUNDARYX";
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"routes.csv\"\r\nContent-Type: text/csv\r\n\r\ngroupid_pickup,groupid_delivery,tags\r\n1,2,3\r\n\r\n--{b}--\r\n",
        b = boundary
    );

    let response = app(&dir)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/upload")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={}", boundary),
                )
                .body(Body::from(body))?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), BODY_LIMIT).await?;
    let json: serde_json::Value = serde_json::from_slice(&bytes)?;
    assert_eq!(json["status"], "processed");
    assert_eq!(json["table"]["rows"][0][3], "123");
    Ok(())
}

#[tokio::test]
async fn test_download_before_submit_is_not_found() -> Result<()> {
    let dir = TempDir::new()?;
    let response = app(&dir)
        .oneshot(Request::builder().uri("/download/data.xlsx").body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn test_download_rejects_traversal() -> Result<()> {
    let dir = TempDir::new()?;
    let response = app(&dir)
        .oneshot(
            Request::builder()
                .uri("/download/..%2Fsecret.txt")
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn test_download_only_serves_output_workbook() -> Result<()> {
    let dir = TempDir::new()?;
    std::fs::write(dir.path().join("transformer.toml"), "[server]\nport = 8050\n")?;
    std::fs::write(dir.path().join("data.xlsx"), b"workbook")?;
    let app = app(&dir);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/download/transformer.toml")
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(Request::builder().uri("/download/data.xlsx").body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}
