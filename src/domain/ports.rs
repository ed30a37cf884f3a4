use crate::core::transformer::ColumnConcat;
use crate::domain::model::{Table, UploadedFile};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn output_path(&self) -> &str;
    fn output_file(&self) -> &str;
    fn sheet_name(&self) -> &str;
    fn column_concat(&self) -> ColumnConcat;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self, upload: &UploadedFile) -> Result<Table>;
    async fn transform(&self, table: Table) -> Result<Table>;
    async fn load(&self, table: &Table) -> Result<String>;
}
