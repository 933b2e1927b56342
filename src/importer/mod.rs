// ==========================================
// banho-projection - 导入层
// ==========================================
// 职责: 外部报表 → 通用表格 → 校验列 → 派生业务键
// 支持: WM10 (.xls/HTML), Excel (.xlsx), CSV
// ==========================================

// 模块声明
pub mod data_cleaner;
pub mod error;
pub mod file_parser;
pub mod importer_trait;
pub mod key_extractor;
pub mod table_normalizer;

// 重导出核心类型
pub use data_cleaner::DataCleaner;
pub use error::{ProjectionError, ProjectionResult};
pub use file_parser::{CsvParser, ExcelParser, HtmlReportParser, UniversalFileParser};
pub use key_extractor::{
    infer_plating_type, KeyExtractor as KeyExtractorImpl, PLATING_GOLD, PLATING_RHODIUM,
    PLATING_SILVER, PLATING_UNKNOWN,
};
pub use table_normalizer::{find_column_by_prefix, normalize, require_column_by_prefix};

// 重导出 Trait 接口
pub use importer_trait::{FileParser, KeyExtractor};
