use crate::domain::model::Table;
use std::fmt::Write;

pub const DOWNLOAD_ROUTE_PREFIX: &str = "/download/";

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// 以 HTML 表格呈現：欄位順序與 Table 相同，所有文字都經過跳脫
pub fn render_table_html(table: &Table) -> String {
    let mut html = String::from("<table class=\"output-table\">\n<thead>\n<tr>");
    for column in table.columns() {
        // 寫入 String 不會失敗
        let _ = write!(html, "<th>{}</th>", escape_html(column));
    }
    html.push_str("</tr>\n</thead>\n<tbody>\n");

    for row in table.rows() {
        html.push_str("<tr>");
        for cell in row {
            let _ = write!(html, "<td>{}</td>", escape_html(&cell.as_text()));
        }
        html.push_str("</tr>\n");
    }

    html.push_str("</tbody>\n</table>");
    html
}

pub fn summary_line(filename: &str, table: &Table) -> String {
    format!(
        "File name: {}, Columns: {}, Rows: {}",
        filename,
        table.column_count(),
        table.row_count()
    )
}

pub fn download_href(path: &str) -> String {
    format!("{}{}", DOWNLOAD_ROUTE_PREFIX, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::CellValue;

    fn sample() -> Table {
        Table::new(
            vec!["groupid_pickup".to_string(), "notes".to_string()],
            vec![
                vec!["A".into(), "<b>fragile</b> & \"heavy\"".into()],
                vec!["B".into(), CellValue::Empty],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_render_escapes_and_keeps_order() {
        let html = render_table_html(&sample());
        assert!(html.contains("<tr><th>groupid_pickup</th><th>notes</th></tr>"));
        assert!(html.contains(
            "<td>&lt;b&gt;fragile&lt;/b&gt; &amp; &quot;heavy&quot;</td>"
        ));
        assert!(html.contains("<tr><td>B</td><td></td></tr>"));
        assert_eq!(html.matches("<tr>").count(), 3);
    }

    #[test]
    fn test_summary_line() {
        assert_eq!(
            summary_line("orders.csv", &sample()),
            "File name: orders.csv, Columns: 2, Rows: 2"
        );
    }

    #[test]
    fn test_download_href() {
        assert_eq!(download_href("data.xlsx"), "/download/data.xlsx");
    }
}
