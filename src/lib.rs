// ==========================================
// 镀金属投影 (Projeção de Banho) - 核心库
// ==========================================
// 输入: 送镀未返回 (Retorno) / 生产中 (Produção) / WM10 销售预测 (Projeção)
// 输出: 每个参考号（可选: 每个镀种）还需送镀的数量
// 系统定位: 批处理计算，无状态、无持久化
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 表格与行模型
pub mod domain;

// 导入层 - 报表解析、列校验、业务键
pub mod importer;

// 引擎层 - 汇总、预测、对账
pub mod engine;

// 配置层 - 对账参数与预设
pub mod config;

// 导出层 - xlsx / csv / json
pub mod export;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

pub use config::{ConfigManager, ConfigOverrides, ReconcileConfig, StrategyProfile};

pub use domain::{
    Cell, ForecastRow, KeyMode, MovementRow, PlatingTypeSource, RawTable, ReconciledRow,
    RecordKey, SourceRole,
};

pub use engine::{
    MovementAggregator, ProjectionBuilder, ProjectionFiles, ProjectionInputs,
    ProjectionOrchestrator, ProjectionReport, Reconciler, RunSummary,
};

pub use importer::{ProjectionError, ProjectionResult, UniversalFileParser};

pub use export::OutputTable;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "Projeção de Metais para Banho";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
