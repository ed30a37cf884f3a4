use crate::utils::error::{Result, TransformError};
use base64::Engine;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::path::Path;

pub const DATETIME_TEXT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 單一儲存格的值
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
    Empty,
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// 文字化規則：Empty 轉為空字串，其餘使用各型別的預設文字表示
    pub fn as_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => f.write_str(s),
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::DateTime(dt) => write!(f, "{}", dt.format(DATETIME_TEXT_FORMAT)),
            CellValue::Empty => Ok(()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::String(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::String(value)
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            CellValue::String(s) => serializer.serialize_str(s),
            CellValue::Int(i) => serializer.serialize_i64(*i),
            CellValue::Float(v) if v.is_finite() => serializer.serialize_f64(*v),
            CellValue::Float(_) | CellValue::Empty => serializer.serialize_none(),
            CellValue::Bool(b) => serializer.serialize_bool(*b),
            CellValue::DateTime(_) => serializer.serialize_str(&self.to_string()),
        }
    }
}

/// 有序欄位 + 逐列儲存的表格。每一列的儲存格數量恆等於欄位數。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// 建立表格；欄位名稱會先去重，較短的列以 Empty 補齊。
    pub fn new(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Result<Self> {
        let columns = normalize_headers(headers);
        let width = columns.len();

        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(idx, mut row)| {
                if row.len() > width {
                    return Err(TransformError::ParseError {
                        message: format!(
                            "Expected {} fields in line {}, saw {}",
                            width,
                            idx + 2,
                            row.len()
                        ),
                    });
                }
                row.resize(width, CellValue::Empty);
                Ok(row)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| TransformError::MissingColumn {
                column: name.to_string(),
                available: self.columns.clone(),
            })
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&CellValue> {
        let idx = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(idx))
    }

    /// 已存在的欄位就地覆寫，否則附加在最後
    pub fn set_column(&mut self, name: &str, values: Vec<CellValue>) -> Result<()> {
        if values.len() != self.rows.len() {
            return Err(TransformError::ParseError {
                message: format!(
                    "Column '{}' has {} values but the table has {} rows",
                    name,
                    values.len(),
                    self.rows.len()
                ),
            });
        }

        match self.column_index(name) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[idx] = value;
                }
            }
            None => {
                self.columns.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
        Ok(())
    }
}

/// 空白標題改為 `Unnamed: i`，重複標題依序加上 `.1`、`.2`
fn normalize_headers(headers: Vec<String>) -> Vec<String> {
    let mut columns: Vec<String> = Vec::with_capacity(headers.len());

    for (idx, header) in headers.into_iter().enumerate() {
        let base = if header.trim().is_empty() {
            format!("Unnamed: {}", idx)
        } else {
            header
        };

        let mut candidate = base.clone();
        let mut suffix = 1;
        while columns.contains(&candidate) {
            candidate = format!("{}.{}", base, suffix);
            suffix += 1;
        }
        columns.push(candidate);
    }

    columns
}

/// 使用者上傳的檔案：檔名 + data URL (`data:<mime>;base64,<payload>`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedFile {
    pub filename: String,
    pub contents: String,
}

impl UploadedFile {
    pub fn new(filename: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            contents: contents.into(),
        }
    }

    /// 由原始位元組組出 data URL
    pub fn from_bytes(filename: impl Into<String>, bytes: &[u8]) -> Self {
        let filename = filename.into();
        let mime = mime_for(&filename);
        let payload = base64::engine::general_purpose::STANDARD.encode(bytes);
        Self {
            contents: format!("data:{};base64,{}", mime, payload),
            filename,
        }
    }
}

fn mime_for(filename: &str) -> &'static str {
    let extension = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("csv") => "text/csv",
        Some("xls") => "application/vnd.ms-excel",
        Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        _ => "application/octet-stream",
    }
}

/// 一次完整處理的結果：原始檔名、轉換後的表格與輸出檔路徑
#[derive(Debug, Clone)]
pub struct TransformReport {
    pub filename: String,
    pub table: Table,
    pub output_path: String,
}
