use crate::domain::model::{CellValue, Table};
use crate::utils::error::{Result, TransformError};
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, XlsxError};

pub const DEFAULT_SHEET_NAME: &str = "Sheet1";
const DATETIME_NUM_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

fn cast_row(idx: usize) -> Result<u32> {
    u32::try_from(idx).map_err(|_| TransformError::XlsxError(XlsxError::RowColumnLimitError))
}

fn cast_col(idx: usize) -> Result<u16> {
    u16::try_from(idx).map_err(|_| TransformError::XlsxError(XlsxError::RowColumnLimitError))
}

/// 將表格寫成單一工作表的 xlsx，回傳檔案內容。
/// 標題列粗體加框線，Empty 儲存格與空字串留白。
pub fn write_workbook(table: &Table, sheet_name: &str) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let fmt_header = Format::new()
        .set_bold()
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Center);
    let fmt_datetime = Format::new().set_num_format(DATETIME_NUM_FORMAT);
    let fmt_blank = Format::new().set_num_format("@");

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    for (col_idx, name) in table.columns().iter().enumerate() {
        worksheet.write_string_with_format(0, cast_col(col_idx)?, name, &fmt_header)?;
    }

    for (row_idx, row) in table.rows().iter().enumerate() {
        let row_num = cast_row(row_idx + 1)?;
        let mut written = false;
        for (col_idx, cell) in row.iter().enumerate() {
            let col_num = cast_col(col_idx)?;
            match cell {
                CellValue::String(s) if s.is_empty() => continue,
                CellValue::String(s) => {
                    worksheet.write_string(row_num, col_num, s)?;
                }
                CellValue::Int(i) => {
                    // xlsx 數字一律為 f64
                    worksheet.write_number(row_num, col_num, *i as f64)?;
                }
                CellValue::Float(v) if v.is_finite() => {
                    worksheet.write_number(row_num, col_num, *v)?;
                }
                CellValue::Float(_) | CellValue::Empty => continue,
                CellValue::Bool(b) => {
                    worksheet.write_boolean(row_num, col_num, *b)?;
                }
                CellValue::DateTime(dt) => {
                    worksheet.write_datetime_with_format(row_num, col_num, dt, &fmt_datetime)?;
                }
            }
            written = true;
        }

        // 整列皆空時寫入帶格式的空白格，讓列仍落在工作表範圍內
        if !written && table.column_count() > 0 {
            worksheet.write_blank(row_num, 0, &fmt_blank)?;
        }
    }

    tracing::debug!(
        "Serialized {} rows x {} columns into sheet '{}'",
        table.row_count(),
        table.column_count(),
        sheet_name
    );

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::decoder::decode_table;

    #[test]
    fn test_written_workbook_reads_back_with_same_shape() {
        let dt = chrono::NaiveDate::from_ymd_opt(2024, 5, 17)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let table = Table::new(
            vec![
                "groupid_pickup".to_string(),
                "groupid_delivery".to_string(),
                "tags".to_string(),
                "groupid".to_string(),
                "pickup_at".to_string(),
            ],
            vec![
                vec!["A".into(), "B".into(), "C".into(), "ABC".into(), CellValue::DateTime(dt)],
                vec!["12".into(), CellValue::Int(7), CellValue::Empty, "127".into()],
            ],
        )
        .unwrap();

        let bytes = write_workbook(&table, DEFAULT_SHEET_NAME).unwrap();
        let read_back = decode_table("data.xlsx", &bytes).unwrap();

        assert_eq!(read_back.columns(), table.columns());
        assert_eq!(read_back.row_count(), table.row_count());
        assert_eq!(read_back.cell(0, "groupid"), Some(&CellValue::from("ABC")));
        assert_eq!(read_back.cell(1, "groupid_delivery"), Some(&CellValue::Int(7)));
        assert_eq!(read_back.cell(1, "tags"), Some(&CellValue::Empty));
        assert_eq!(read_back.cell(0, "pickup_at"), Some(&CellValue::DateTime(dt)));
    }

    #[test]
    fn test_invalid_sheet_name_is_an_error() {
        let table = Table::new(vec!["a".to_string()], vec![]).unwrap();
        assert!(matches!(
            write_workbook(&table, "bad/name"),
            Err(TransformError::XlsxError(_))
        ));
    }

    #[test]
    fn test_blank_rows_survive_round_trip() {
        let table = Table::new(
            vec![
                "groupid_pickup".to_string(),
                "groupid_delivery".to_string(),
                "tags".to_string(),
                "weight".to_string(),
                "groupid".to_string(),
            ],
            vec![
                vec!["A".into(), "B".into(), "C".into(), CellValue::Float(1.5), "ABC".into()],
                vec!["D".into(), "E".into(), "F".into(), CellValue::Float(f64::NAN), "DEF".into()],
                vec![
                    CellValue::Empty,
                    CellValue::Empty,
                    CellValue::Empty,
                    CellValue::Float(f64::INFINITY),
                    "".into(),
                ],
            ],
        )
        .unwrap();

        let bytes = write_workbook(&table, DEFAULT_SHEET_NAME).unwrap();
        let read_back = decode_table("data.xlsx", &bytes).unwrap();

        assert_eq!(read_back.columns(), table.columns());
        assert_eq!(read_back.row_count(), 3);
        assert_eq!(read_back.cell(1, "weight"), Some(&CellValue::Empty));
        assert_eq!(read_back.cell(2, "groupid"), Some(&CellValue::Empty));
    }
}
