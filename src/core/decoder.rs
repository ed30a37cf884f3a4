use crate::domain::model::{CellValue, Table, UploadedFile};
use crate::utils::error::{Result, TransformError};
use base64::Engine;
use calamine::{open_workbook_auto_from_rs, Data, Reader, Sheets};
use std::io::Cursor;
use std::path::Path;

/// 視為缺值的字串（與常見表格工具的預設一致）
const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Csv,
    Spreadsheet,
}

impl FileKind {
    pub fn from_filename(filename: &str) -> Result<Self> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("csv") => Ok(FileKind::Csv),
            Some("xls" | "xlsx" | "xlsm" | "xlsb" | "ods") => Ok(FileKind::Spreadsheet),
            _ => Err(TransformError::UnsupportedFileType {
                filename: filename.to_string(),
            }),
        }
    }
}

/// 去掉 `data:<mime>;base64,` 前綴後解碼
pub fn decode_payload(contents: &str) -> Result<Vec<u8>> {
    let (_, payload) = contents
        .split_once(',')
        .ok_or_else(|| TransformError::MalformedUpload {
            message: "expected a data URL with a ',' separating header and payload".to_string(),
        })?;

    Ok(base64::engine::general_purpose::STANDARD.decode(payload.trim())?)
}

pub fn decode_upload(upload: &UploadedFile) -> Result<Table> {
    let kind = FileKind::from_filename(&upload.filename)?;
    let bytes = decode_payload(&upload.contents)?;
    tracing::debug!(
        "Decoded {} bytes from '{}' as {:?}",
        bytes.len(),
        upload.filename,
        kind
    );

    match kind {
        FileKind::Csv => decode_csv(&bytes),
        FileKind::Spreadsheet => decode_spreadsheet(&bytes),
    }
}

pub fn decode_table(filename: &str, bytes: &[u8]) -> Result<Table> {
    match FileKind::from_filename(filename)? {
        FileKind::Csv => decode_csv(bytes),
        FileKind::Spreadsheet => decode_spreadsheet(bytes),
    }
}

pub fn decode_csv(bytes: &[u8]) -> Result<Table> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut records = reader.records();
    let headers: Vec<String> = match records.next() {
        Some(header) => header?.iter().map(str::to_string).collect(),
        None => {
            return Err(TransformError::ParseError {
                message: "No columns to parse from file".to_string(),
            })
        }
    };

    let raw_rows = records
        .map(|record| record.map(|r| r.iter().map(str::to_string).collect::<Vec<_>>()))
        .collect::<std::result::Result<Vec<_>, csv::Error>>()?;

    let width = headers.len();
    let rows = type_columns(raw_rows, width);
    Table::new(headers, rows)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnType {
    Int,
    Float,
    Bool,
    Text,
}

fn is_na(raw: &str) -> bool {
    NA_VALUES.contains(&raw)
}

fn parse_bool(raw: &str) -> Option<bool> {
    if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// 依整欄內容推斷型別：只要有一格不是數字，整欄保留原始文字
fn infer_column_type<'a>(values: impl Iterator<Item = &'a str>) -> ColumnType {
    let mut column_type: Option<ColumnType> = None;

    for raw in values.filter(|v| !is_na(v)) {
        let cell_type = if raw.parse::<i64>().is_ok() {
            ColumnType::Int
        } else if raw.parse::<f64>().is_ok() {
            ColumnType::Float
        } else if parse_bool(raw).is_some() {
            ColumnType::Bool
        } else {
            return ColumnType::Text;
        };

        column_type = Some(match (column_type, cell_type) {
            (None, t) => t,
            (Some(a), b) if a == b => a,
            (Some(ColumnType::Int | ColumnType::Float), ColumnType::Int | ColumnType::Float) => {
                ColumnType::Float
            }
            _ => return ColumnType::Text,
        });
    }

    column_type.unwrap_or(ColumnType::Text)
}

fn type_cell(raw: String, column_type: ColumnType) -> CellValue {
    if is_na(&raw) {
        return CellValue::Empty;
    }

    match column_type {
        ColumnType::Int => raw.parse().map(CellValue::Int).unwrap_or(CellValue::String(raw)),
        ColumnType::Float => raw
            .parse()
            .map(CellValue::Float)
            .unwrap_or(CellValue::String(raw)),
        ColumnType::Bool => parse_bool(&raw)
            .map(CellValue::Bool)
            .unwrap_or(CellValue::String(raw)),
        ColumnType::Text => CellValue::String(raw),
    }
}

fn type_columns(raw_rows: Vec<Vec<String>>, width: usize) -> Vec<Vec<CellValue>> {
    let column_types: Vec<ColumnType> = (0..width)
        .map(|col| infer_column_type(raw_rows.iter().filter_map(|row| row.get(col).map(String::as_str))))
        .collect();

    raw_rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .enumerate()
                .map(|(col, raw)| {
                    // 超出標題寬度的欄位交給 Table::new 回報錯誤
                    let column_type = column_types.get(col).copied().unwrap_or(ColumnType::Text);
                    type_cell(raw, column_type)
                })
                .collect()
        })
        .collect()
}

/// 讀取活頁簿的第一個工作表，第一列為標題。
/// 左側空白欄保留為 `Unnamed: n`，列數以工作表宣告的使用範圍為準。
pub fn decode_spreadsheet(bytes: &[u8]) -> Result<Table> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| TransformError::ParseError {
            message: "Workbook has no worksheets".to_string(),
        })?;
    let range = workbook.worksheet_range(&sheet_name)?;

    let Some((start_row, start_col)) = range.start() else {
        return Table::new(Vec::new(), Vec::new());
    };
    let leading = start_col as usize;
    let pad = |cells: &mut Vec<CellValue>| {
        cells.splice(0..0, std::iter::repeat(CellValue::Empty).take(leading));
    };

    let mut rows = range.rows();
    let mut headers: Vec<CellValue> = match rows.next() {
        Some(header) => header.iter().map(convert_cell).collect(),
        None => return Table::new(Vec::new(), Vec::new()),
    };
    pad(&mut headers);
    let headers = headers.iter().map(CellValue::as_text).collect();

    let mut data: Vec<Vec<CellValue>> = rows
        .map(|row| {
            let mut cells: Vec<CellValue> = row.iter().map(convert_cell).collect();
            pad(&mut cells);
            cells
        })
        .collect();

    // 只有格式、沒有值的列不在 range 內，依宣告範圍補回空白列
    if let Some(declared_end) = declared_last_row(&mut workbook, &sheet_name) {
        let last_row = start_row as usize + data.len();
        if declared_end as usize > last_row {
            data.resize(data.len() + (declared_end as usize - last_row), Vec::new());
        }
    }

    Table::new(headers, data)
}

/// xlsx 的 `<dimension>` 宣告的最後一列（0 起算）
fn declared_last_row<RS>(workbook: &mut Sheets<RS>, sheet_name: &str) -> Option<u32>
where
    RS: std::io::Read + std::io::Seek,
{
    match workbook {
        Sheets::Xlsx(xlsx) => xlsx
            .worksheet_cells_reader(sheet_name)
            .ok()
            .map(|reader| reader.dimensions().end.0),
        _ => None,
    }
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Int(*i),
        // Excel 以浮點數儲存所有數字；整數值還原為 Int
        Data::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => CellValue::Int(*f as i64),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) => CellValue::String(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(CellValue::DateTime)
            .unwrap_or(CellValue::Float(dt.as_f64())),
        Data::DateTimeIso(s) => chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
            .map(CellValue::DateTime)
            .unwrap_or_else(|_| CellValue::String(s.clone())),
        Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(_) | Data::Empty => CellValue::Empty,
    }
}
