use crate::core::responder::{respond, SubmitRequest, Submission};
use crate::core::{ConfigProvider, Storage, UploadedFile};
use crate::server::page::INDEX_HTML;
use crate::server::AppState;
use crate::utils::error::{Result, TransformError};
use crate::utils::validation::validate_file_name;
use axum::{
    extract::{Multipart, Path, State},
    http::header,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    version: String,
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// 頁面以 data URL 送出檔案內容
pub async fn submit(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SubmitRequest>,
) -> Result<Json<Submission>> {
    respond(&state.engine, request).await.map(Json)
}

/// multipart 上傳（`file` 欄位），方便用 curl 直接呼叫
pub async fn upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<Submission>> {
    let mut request = SubmitRequest::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| TransformError::MalformedUpload {
            message: format!("Failed to read multipart field: {}", e),
        })?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await.map_err(|e| TransformError::MalformedUpload {
            message: format!("Failed to read file data: {}", e),
        })?;
        tracing::debug!("Received multipart file '{}' ({} bytes)", filename, data.len());

        if !data.is_empty() {
            let upload = UploadedFile::from_bytes(filename, &data);
            request = SubmitRequest {
                filename: Some(upload.filename),
                contents: Some(upload.contents),
            };
        }
    }

    respond(&state.engine, request).await.map(Json)
}

pub async fn download(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
) -> Result<Response> {
    validate_file_name("path", &path)?;
    // 只提供轉換後的活頁簿，輸出目錄內的其他檔案一律視為不存在
    if path != state.engine.pipeline().config().output_file() {
        tracing::warn!("⚠️ Refusing to serve '{}'", path);
        return Err(TransformError::NotFound { path });
    }

    let data = state.engine.pipeline().storage().read_file(&path).await?;
    tracing::info!("📤 Serving {} ({} bytes)", path, data.len());

    let disposition = format!("attachment; filename=\"{}\"", path.replace('"', ""));
    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        data,
    )
        .into_response())
}
