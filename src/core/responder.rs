use crate::core::etl::EtlEngine;
use crate::core::render::{download_href, render_table_html, summary_line};
use crate::core::{Pipeline, Table, TransformReport, UploadedFile};
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};

/// 頁面送出的內容；兩個欄位都可能缺少（尚未選擇檔案）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmitRequest {
    pub filename: Option<String>,
    pub contents: Option<String>,
}

impl SubmitRequest {
    pub fn into_upload(self) -> Option<UploadedFile> {
        let contents = self.contents.filter(|c| !c.is_empty())?;
        Some(UploadedFile::new(self.filename.unwrap_or_default(), contents))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessedView {
    pub file_info: String,
    pub table_html: String,
    pub download_href: String,
    pub columns: usize,
    pub rows: usize,
    pub table: Table,
}

impl From<TransformReport> for ProcessedView {
    fn from(report: TransformReport) -> Self {
        Self {
            file_info: summary_line(&report.filename, &report.table),
            table_html: render_table_html(&report.table),
            download_href: download_href(&report.output_path),
            columns: report.table.column_count(),
            rows: report.table.row_count(),
            table: report.table,
        }
    }
}

/// 每次提交的結果，成功與失敗使用同一種形狀
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Submission {
    Idle,
    Rejected { message: String },
    Processed(ProcessedView),
}

/// 解碼失敗轉成 `Rejected`；缺欄位或輸出失敗則以錯誤往上傳
pub async fn respond<P: Pipeline>(engine: &EtlEngine<P>, request: SubmitRequest) -> Result<Submission> {
    let Some(upload) = request.into_upload() else {
        tracing::debug!("Submit without file contents, nothing to do");
        return Ok(Submission::Idle);
    };

    match engine.run(&upload).await {
        Ok(report) => {
            let view = ProcessedView::from(report);
            tracing::info!("✅ {}", view.file_info);
            Ok(Submission::Processed(view))
        }
        Err(e) if e.is_rejection() => {
            tracing::warn!("⚠️ Rejected upload '{}': {}", upload.filename, e);
            Ok(Submission::Rejected {
                message: e.user_friendly_message(),
            })
        }
        Err(e) => {
            tracing::error!(
                "❌ Processing '{}' failed: {} (Category: {:?}, Severity: {:?})",
                upload.filename,
                e,
                e.category(),
                e.severity()
            );
            Err(e)
        }
    }
}
