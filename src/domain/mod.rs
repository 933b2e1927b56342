// ==========================================
// banho-projection - 领域模型层
// ==========================================
// 职责: 定义表格、关联键、汇总/预测/对账行
// 红线: 不含解析逻辑，不含计算逻辑
// ==========================================

pub mod projection;
pub mod table;
pub mod types;

// 重导出核心类型
pub use projection::{ForecastRow, MovementRow, ReconciledRow, RecordKey};
pub use table::{Cell, RawTable};
pub use types::{KeyMode, PlatingTypeSource, SourceRole};
