use crate::core::{decoder, xlsx, ConfigProvider, Pipeline, Storage, Table, UploadedFile};
use crate::utils::error::Result;

/// 上傳檔 -> Table -> 加上衍生欄位 -> xlsx 寫入輸出目錄
pub struct TransformPipeline<S: Storage, C: ConfigProvider> {
    pub(crate) storage: S,
    pub(crate) config: C,
}

impl<S: Storage, C: ConfigProvider> TransformPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn config(&self) -> &C {
        &self.config
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for TransformPipeline<S, C> {
    async fn extract(&self, upload: &UploadedFile) -> Result<Table> {
        tracing::debug!("Decoding upload '{}'", upload.filename);
        decoder::decode_upload(upload)
    }

    async fn transform(&self, mut table: Table) -> Result<Table> {
        self.config.column_concat().apply(&mut table)?;
        Ok(table)
    }

    async fn load(&self, table: &Table) -> Result<String> {
        let bytes = xlsx::write_workbook(table, self.config.sheet_name())?;
        let file_name = self.config.output_file();

        tracing::debug!("Writing workbook ({} bytes) to storage as {}", bytes.len(), file_name);
        // 固定檔名，後一次提交直接覆蓋前一次
        self.storage.write_file(file_name, &bytes).await?;

        Ok(file_name.to_string())
    }
}
