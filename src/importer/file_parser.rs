// ==========================================
// banho-projection - 文件解析器实现
// ==========================================
// 支持: WM10 报表 (.xls，实为 HTML) / Excel (.xlsx) / CSV (.csv，分隔符未知)
// 输出: RawTable（首行提升为表头，完全空白的行跳过）
// ==========================================

use crate::domain::table::{Cell, RawTable};
use crate::domain::types::SourceRole;
use crate::importer::error::{ProjectionError, ProjectionResult};
use crate::importer::importer_trait::FileParser;
use calamine::{Data, Reader, Xlsx};
use csv::ReaderBuilder;
use scraper::{ElementRef, Html, Selector};
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, instrument};

// CSV 分隔符候选，顺序即平局时的优先级
const CSV_DELIMITERS: &[u8] = b";,\t|";

// ==========================================
// 文本解码
// ==========================================
// 优先 UTF-8（去 BOM），失败回退 Windows-1252（旧版 WM10 导出）
fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.trim_start_matches('\u{feff}').to_string(),
        Err(_) => {
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            decoded.into_owned()
        }
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 首行作表头，其余行作数据；跳过完全空白的行
fn promote_header(mut rows: Vec<Vec<Cell>>) -> Option<RawTable> {
    rows.retain(|row| !row.iter().all(Cell::is_empty));
    if rows.is_empty() {
        return None;
    }

    let header = rows.remove(0);
    let columns = header
        .iter()
        .map(|cell| cell.as_text().trim().to_string())
        .collect();

    Some(RawTable::new(columns, rows))
}

// ==========================================
// WM10 HTML 报表解析器
// ==========================================
pub struct HtmlReportParser;

impl HtmlReportParser {
    fn selector(css: &str, role: SourceRole) -> ProjectionResult<Selector> {
        Selector::parse(css).map_err(|e| ProjectionError::parse_failure(role, format!("{:?}", e)))
    }

    fn row_cells(row: ElementRef<'_>, cell_selector: &Selector) -> Vec<Cell> {
        row.select(cell_selector)
            .map(|cell| {
                let text: String = cell.text().collect();
                Cell::from_text(&collapse_whitespace(&text))
            })
            .collect()
    }
}

impl FileParser for HtmlReportParser {
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    fn parse_bytes(&self, bytes: &[u8], role: SourceRole) -> ProjectionResult<RawTable> {
        // 必须以 '<' 开头（忽略前导空白）
        let first_visible = bytes.iter().find(|b| !b.is_ascii_whitespace());
        if first_visible != Some(&b'<') {
            return Err(ProjectionError::NotHtmlReport(role));
        }

        let text = decode_text(bytes);
        let document = Html::parse_document(&text);

        let table_selector = Self::selector("table", role)?;
        let row_selector = Self::selector("tr", role)?;
        let cell_selector = Self::selector("th, td", role)?;

        // 只取第一张表
        let table = document
            .select(&table_selector)
            .next()
            .ok_or(ProjectionError::NoTableFound(role))?;

        let rows: Vec<Vec<Cell>> = table
            .select(&row_selector)
            .map(|row| Self::row_cells(row, &cell_selector))
            .collect();

        let raw = promote_header(rows).ok_or(ProjectionError::NoTableFound(role))?;
        debug!(columns = raw.columns.len(), rows = raw.row_count(), "relatório HTML lido");
        Ok(raw)
    }
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl CsvParser {
    /// 根据首个非空行推断分隔符（出现次数最多者，默认逗号）
    pub fn sniff_delimiter(text: &str) -> u8 {
        let first_line = text.lines().find(|l| !l.trim().is_empty()).unwrap_or("");

        let mut best = (b',', 0usize);
        for &candidate in CSV_DELIMITERS {
            let count = first_line.bytes().filter(|&b| b == candidate).count();
            if count > best.1 {
                best = (candidate, count);
            }
        }
        best.0
    }
}

impl FileParser for CsvParser {
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    fn parse_bytes(&self, bytes: &[u8], role: SourceRole) -> ProjectionResult<RawTable> {
        let text = decode_text(bytes);
        let delimiter = Self::sniff_delimiter(&text);
        debug!(delimiter = %(delimiter as char), "separador CSV detectado");

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .delimiter(delimiter)
            .flexible(true) // 允许行长度不一致
            .from_reader(text.as_bytes());

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| ProjectionError::parse_failure(role, e))?;
            rows.push(record.iter().map(Cell::from_text).collect());
        }

        promote_header(rows).ok_or_else(|| ProjectionError::parse_failure(role, "arquivo CSV vazio"))
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl ExcelParser {
    fn data_to_cell(data: &Data) -> Cell {
        match data {
            Data::Empty => Cell::Empty,
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Float(f) => Cell::Number(*f),
            Data::String(s) => Cell::from_text(s),
            other => Cell::from_text(&other.to_string()),
        }
    }
}

impl FileParser for ExcelParser {
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    fn parse_bytes(&self, bytes: &[u8], role: SourceRole) -> ProjectionResult<RawTable> {
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes.to_vec()))
            .map_err(|e| ProjectionError::parse_failure(role, e))?;

        // 读取第一个 sheet
        let sheet_names = workbook.sheet_names();
        let sheet_name = sheet_names
            .first()
            .cloned()
            .ok_or_else(|| ProjectionError::parse_failure(role, "arquivo Excel sem planilhas"))?;

        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| ProjectionError::parse_failure(role, e))?;

        let rows: Vec<Vec<Cell>> = range
            .rows()
            .map(|row| row.iter().map(Self::data_to_cell).collect())
            .collect();

        promote_header(rows).ok_or(ProjectionError::NoTableFound(role))
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
#[derive(Debug, Default)]
pub struct UniversalFileParser;

impl UniversalFileParser {
    /// 按文件名扩展名选择解析器
    pub fn parse(
        &self,
        file_name: &str,
        bytes: &[u8],
        role: SourceRole,
    ) -> ProjectionResult<RawTable> {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "xls" => HtmlReportParser.parse_bytes(bytes, role),
            "xlsx" => ExcelParser.parse_bytes(bytes, role),
            "csv" => CsvParser.parse_bytes(bytes, role),
            _ => Err(ProjectionError::UnsupportedFileFormat(file_name.to_string())),
        }
    }

    /// 读取磁盘文件并解析
    pub fn parse_path<P: AsRef<Path>>(&self, path: P, role: SourceRole) -> ProjectionResult<RawTable> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let bytes = std::fs::read(path).map_err(|e| {
            ProjectionError::parse_failure(role, format!("{}: {}", path.display(), e))
        })?;

        self.parse(&file_name, &bytes, role)
    }
}
