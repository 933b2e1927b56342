// ==========================================
// banho-projection - 导出层
// ==========================================
// 职责: 对账结果 → 输出表 → xlsx / csv / json / 终端文本
// ==========================================

pub mod output_table;
pub mod writer;

pub use output_table::OutputTable;
pub use writer::{
    render_text, to_xlsx_bytes, write_csv, write_report, write_xlsx, ExportError,
    DEFAULT_FILE_NAME, SHEET_NAME,
};
