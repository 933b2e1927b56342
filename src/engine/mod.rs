// ==========================================
// banho-projection - 引擎层
// ==========================================
// 职责: 汇总、预测构建、对账、编排
// 红线: 引擎不读文件、不渲染；同样输入 + 配置必得同样输出
// ==========================================

pub mod aggregator;
pub mod orchestrator;
pub mod projection;
pub mod reconciler;

// 重导出核心引擎
pub use aggregator::MovementAggregator;
pub use orchestrator::{
    ProjectionFiles, ProjectionInputs, ProjectionOrchestrator, ProjectionReport, RunSummary,
};
pub use projection::ProjectionBuilder;
pub use reconciler::{covered_quantity, quantity_to_send, ReconcileOutcome, Reconciler};
