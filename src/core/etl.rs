use crate::core::{Pipeline, TransformReport, UploadedFile};
use crate::utils::error::Result;
use std::time::Instant;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    /// 同一個請求內依序執行 extract -> transform -> load
    pub async fn run(&self, upload: &UploadedFile) -> Result<TransformReport> {
        let started = Instant::now();
        tracing::info!("🚀 Processing upload '{}'", upload.filename);

        // Extract
        let table = self.pipeline.extract(upload).await?;
        tracing::info!(
            "📥 Decoded {} rows x {} columns",
            table.row_count(),
            table.column_count()
        );

        // Transform
        let table = self.pipeline.transform(table).await?;
        tracing::debug!("🔄 Transformed table now has {} columns", table.column_count());

        // Load
        let output_path = self.pipeline.load(&table).await?;
        tracing::info!(
            "💾 Output saved to: {} ({:?})",
            output_path,
            started.elapsed()
        );

        Ok(TransformReport {
            filename: upload.filename.clone(),
            table,
            output_path,
        })
    }
}
