pub mod decoder;
pub mod etl;
pub mod pipeline;
pub mod render;
pub mod responder;
pub mod transformer;
pub mod xlsx;

pub use crate::domain::model::{CellValue, Table, TransformReport, UploadedFile};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
