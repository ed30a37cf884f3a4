pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

pub use config::{cli::LocalStorage, toml_config::TomlConfig, CliConfig};
pub use crate::core::{
    etl::EtlEngine,
    pipeline::TransformPipeline,
    responder::{respond, SubmitRequest, Submission},
    transformer::ColumnConcat,
};
pub use domain::model::{CellValue, Table, TransformReport, UploadedFile};
pub use utils::error::{Result, TransformError};
