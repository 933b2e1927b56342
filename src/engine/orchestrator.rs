// ==========================================
// banho-projection - 引擎编排器
// ==========================================
// 用途: 协调三条输入管线 + 对账
// 流程: 送镀汇总 → 生产汇总 → 预测构建 → 对账
// 红线: 任一管线失败即中止，不输出部分结果
// ==========================================

use crate::config::ReconcileConfig;
use crate::domain::projection::ReconciledRow;
use crate::domain::table::RawTable;
use crate::domain::types::SourceRole;
use crate::engine::{MovementAggregator, ProjectionBuilder, Reconciler};
use crate::importer::error::ProjectionResult;
use crate::importer::file_parser::UniversalFileParser;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, instrument};

// ==========================================
// 输入
// ==========================================

/// 三份已解析的报表
#[derive(Debug, Clone)]
pub struct ProjectionInputs {
    pub returns: RawTable,
    pub production: RawTable,
    pub forecast: RawTable,
}

/// 三份报表的文件路径
#[derive(Debug, Clone)]
pub struct ProjectionFiles {
    pub returns: PathBuf,
    pub production: PathBuf,
    pub forecast: PathBuf,
}

// ==========================================
// ProjectionReport - 运行结果
// ==========================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub return_keys: usize,
    pub production_keys: usize,
    pub forecast_keys: usize,
    pub output_rows: usize,
    pub dropped_zero_rows: usize,
    pub total_to_send: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionReport {
    pub config: ReconcileConfig,
    pub rows: Vec<ReconciledRow>,
    pub summary: RunSummary,
}

// ==========================================
// ProjectionOrchestrator - 引擎编排器
// ==========================================

#[derive(Default)]
pub struct ProjectionOrchestrator {
    parser: UniversalFileParser,
    aggregator: MovementAggregator,
    builder: ProjectionBuilder,
    reconciler: Reconciler,
}

impl ProjectionOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 对已解析的三份报表执行完整计算
    #[instrument(skip_all, fields(margin = config.margin, key_mode = %config.key_mode))]
    pub fn run(
        &self,
        inputs: ProjectionInputs,
        config: &ReconcileConfig,
    ) -> ProjectionResult<ProjectionReport> {
        config.validate()?;

        let returns = self
            .aggregator
            .aggregate(inputs.returns, SourceRole::Return, config)?;
        let production = self
            .aggregator
            .aggregate(inputs.production, SourceRole::Production, config)?;
        let forecast = self.builder.build(inputs.forecast, config)?;

        let outcome = self
            .reconciler
            .reconcile(forecast, &production, &returns, config)?;

        let summary = RunSummary {
            return_keys: returns.len(),
            production_keys: production.len(),
            forecast_keys: outcome.forecast_keys,
            output_rows: outcome.rows.len(),
            dropped_zero_rows: outcome.dropped_zero_rows,
            total_to_send: outcome.rows.iter().map(|r| r.to_send_qty).sum(),
        };

        info!(
            output_rows = summary.output_rows,
            dropped = summary.dropped_zero_rows,
            total_to_send = summary.total_to_send,
            "projeção de banho calculada"
        );

        Ok(ProjectionReport {
            config: config.clone(),
            rows: outcome.rows,
            summary,
        })
    }

    /// 读取三份文件并计算
    pub fn run_files(
        &self,
        files: &ProjectionFiles,
        config: &ReconcileConfig,
    ) -> ProjectionResult<ProjectionReport> {
        let inputs = ProjectionInputs {
            returns: self.parser.parse_path(&files.returns, SourceRole::Return)?,
            production: self.parser.parse_path(&files.production, SourceRole::Production)?,
            forecast: self.parser.parse_path(&files.forecast, SourceRole::Forecast)?,
        };

        info!(
            returns = inputs.returns.row_count(),
            production = inputs.production.row_count(),
            forecast = inputs.forecast.row_count(),
            "planilhas carregadas"
        );

        self.run(inputs, config)
    }
}
