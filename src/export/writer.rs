// ==========================================
// banho-projection - 结果导出
// ==========================================
// 支持: Excel (.xlsx，单个工作表、含表头、无索引列) / CSV / JSON / 终端文本
// ==========================================

use crate::domain::table::Cell;
use crate::engine::ProjectionReport;
use crate::export::output_table::OutputTable;
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use std::io::Write;
use std::path::Path;
use thiserror::Error;
use tracing::info;

pub const SHEET_NAME: &str = "Projecao_Banho";
pub const DEFAULT_FILE_NAME: &str = "projecao_banho_metais.xlsx";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Falha ao gerar Excel: {0}")]
    Xlsx(#[from] XlsxError),

    #[error("Falha ao gerar CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Falha ao gerar JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Falha ao gravar arquivo: {0}")]
    Io(#[from] std::io::Error),

    #[error("Formato de saída não suportado: {0} (use .xlsx, .csv ou .json)")]
    UnsupportedFormat(String),
}

// ==========================================
// Excel
// ==========================================

fn build_workbook(table: &OutputTable) -> Result<Workbook, ExportError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, name) in table.columns.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, name, &header_format)?;
    }

    for (row_idx, row) in table.rows.iter().enumerate() {
        let excel_row = (row_idx + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            match cell {
                Cell::Empty => {}
                Cell::Number(n) => {
                    sheet.write_number(excel_row, col as u16, *n)?;
                }
                Cell::Text(s) => {
                    sheet.write_string(excel_row, col as u16, s)?;
                }
            }
        }
    }

    sheet.set_column_width(0, 48)?;
    Ok(workbook)
}

/// 生成 .xlsx 字节（供下载场景使用）
pub fn to_xlsx_bytes(table: &OutputTable) -> Result<Vec<u8>, ExportError> {
    let mut workbook = build_workbook(table)?;
    Ok(workbook.save_to_buffer()?)
}

pub fn write_xlsx(table: &OutputTable, path: &Path) -> Result<(), ExportError> {
    let mut workbook = build_workbook(table)?;
    workbook.save(path)?;
    Ok(())
}

// ==========================================
// CSV
// ==========================================

pub fn write_csv<W: Write>(table: &OutputTable, writer: W) -> Result<(), ExportError> {
    let mut csv_writer = csv::WriterBuilder::new().delimiter(b';').from_writer(writer);
    csv_writer.write_record(&table.columns)?;
    for row in &table.rows {
        csv_writer.write_record(row.iter().map(|c| c.as_text().into_owned()))?;
    }
    csv_writer.flush()?;
    Ok(())
}

// ==========================================
// 按扩展名导出
// ==========================================

pub fn write_report(report: &ProjectionReport, path: &Path) -> Result<(), ExportError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "xlsx" => write_xlsx(&OutputTable::from_report(report), path)?,
        "csv" => write_csv(&OutputTable::from_report(report), std::fs::File::create(path)?)?,
        "json" => {
            let file = std::fs::File::create(path)?;
            serde_json::to_writer_pretty(file, report)?;
        }
        _ => return Err(ExportError::UnsupportedFormat(path.display().to_string())),
    }

    info!(path = %path.display(), rows = report.rows.len(), "resultado exportado");
    Ok(())
}

// ==========================================
// 终端文本
// ==========================================

/// 渲染为等宽文本表（数值列右对齐）
pub fn render_text(table: &OutputTable) -> String {
    let widths: Vec<usize> = table
        .columns
        .iter()
        .enumerate()
        .map(|(col, name)| {
            table
                .rows
                .iter()
                .map(|row| row.get(col).map(|c| c.as_text().chars().count()).unwrap_or(0))
                .chain(std::iter::once(name.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let pad = |text: &str, width: usize, right: bool| {
        let fill = " ".repeat(width.saturating_sub(text.chars().count()));
        if right {
            format!("{}{}", fill, text)
        } else {
            format!("{}{}", text, fill)
        }
    };

    let mut lines = Vec::with_capacity(table.rows.len() + 2);
    lines.push(
        table
            .columns
            .iter()
            .zip(&widths)
            .map(|(name, w)| pad(name, *w, false))
            .collect::<Vec<_>>()
            .join(" | "),
    );
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );

    for row in &table.rows {
        lines.push(
            row.iter()
                .zip(&widths)
                .map(|(cell, w)| pad(&cell.as_text(), *w, matches!(cell, Cell::Number(_))))
                .collect::<Vec<_>>()
                .join(" | "),
        );
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> OutputTable {
        OutputTable {
            columns: vec!["Ref / Produto".to_string(), "Enviar (30%)".to_string()],
            rows: vec![
                vec![Cell::Text("FO040 - Anel".to_string()), Cell::Number(13.0)],
                vec![Cell::Text("FO041".to_string()), Cell::Number(4.0)],
            ],
        }
    }

    #[test]
    fn test_write_csv_has_header_and_no_index() {
        let mut buffer = Vec::new();
        write_csv(&sample_table(), &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert_eq!(text, "Ref / Produto;Enviar (30%)\nFO040 - Anel;13\nFO041;4\n");
    }

    #[test]
    fn test_xlsx_round_trip_first_sheet() {
        use calamine::{Reader, Xlsx};

        let bytes = to_xlsx_bytes(&sample_table()).unwrap();
        let mut workbook: Xlsx<_> = Xlsx::new(std::io::Cursor::new(bytes)).unwrap();

        assert_eq!(workbook.sheet_names(), vec![SHEET_NAME.to_string()]);
        let range = workbook.worksheet_range(SHEET_NAME).unwrap();
        assert_eq!(range.get_size(), (3, 2));
    }

    #[test]
    fn test_render_text_aligns_numbers() {
        let text = render_text(&sample_table());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Ref / Produto"));
        assert!(lines[2].ends_with("          13"));
    }

    #[test]
    fn test_write_report_unsupported_extension() {
        let report = ProjectionReport {
            config: Default::default(),
            rows: vec![],
            summary: crate::engine::RunSummary {
                return_keys: 0,
                production_keys: 0,
                forecast_keys: 0,
                output_rows: 0,
                dropped_zero_rows: 0,
                total_to_send: 0,
            },
        };
        let result = write_report(&report, Path::new("saida.pdf"));
        assert!(matches!(result, Err(ExportError::UnsupportedFormat(_))));
    }
}
