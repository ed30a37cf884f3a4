use crate::domain::model::{CellValue, Table};
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SOURCE_COLUMNS: [&str; 3] = ["groupid_pickup", "groupid_delivery", "tags"];
pub const DEFAULT_TARGET_COLUMN: &str = "groupid";

/// 將多個來源欄位的文字串接成一個新欄位
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnConcat {
    pub sources: Vec<String>,
    pub target: String,
    #[serde(default)]
    pub separator: String,
}

impl Default for ColumnConcat {
    fn default() -> Self {
        Self {
            sources: DEFAULT_SOURCE_COLUMNS.iter().map(|c| c.to_string()).collect(),
            target: DEFAULT_TARGET_COLUMN.to_string(),
            separator: String::new(),
        }
    }
}

impl ColumnConcat {
    pub fn new(sources: Vec<String>, target: impl Into<String>) -> Self {
        Self {
            sources,
            target: target.into(),
            separator: String::new(),
        }
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// 先確認所有來源欄位都存在，缺任何一欄就整個失敗，不會留下部分結果。
    /// 缺值 (Empty) 以空字串參與串接。
    pub fn apply(&self, table: &mut Table) -> Result<()> {
        let indices = self
            .sources
            .iter()
            .map(|name| table.require_column(name))
            .collect::<Result<Vec<_>>>()?;

        let values: Vec<CellValue> = table
            .rows()
            .iter()
            .map(|row| {
                let joined = indices
                    .iter()
                    .map(|&idx| row[idx].as_text())
                    .collect::<Vec<_>>()
                    .join(&self.separator);
                CellValue::String(joined)
            })
            .collect();

        tracing::debug!(
            "Derived '{}' from [{}] for {} rows",
            self.target,
            self.sources.join(", "),
            values.len()
        );

        table.set_column(&self.target, values)
    }
}
