// ==========================================
// banho-projection - 对账引擎
// ==========================================
// 职责: 预测 ⟕ 生产 ⟕ 送镀（左连接），计算覆盖量与送镀量
// 公式:
//   covered      = production + return (+ stock，若统计库存)
//   base_to_send = max(0, forecast - covered)
//   to_send      = ceil(base_to_send * (1 + margin))
// 红线: to_send >= 0；结果只由输入与配置决定（无隐藏状态）
// ==========================================

use crate::config::ReconcileConfig;
use crate::domain::projection::{ForecastRow, MovementRow, ReconciledRow, RecordKey};
use crate::importer::error::ProjectionResult;
use std::collections::{BTreeMap, HashMap};
use tracing::{instrument, warn};

// 浮点误差容忍: 距整数 1e-9 以内视为整数再取上整
const ROUNDING_TOLERANCE: f64 = 1e-9;

/// 覆盖量
pub fn covered_quantity(production: f64, returns: f64, stock: f64, track_stock: bool) -> f64 {
    let stock = if track_stock { stock } else { 0.0 };
    production + returns + stock
}

/// 送镀量（含余量，向上取整）
pub fn quantity_to_send(forecast: f64, covered: f64, margin: f64) -> i64 {
    let base = (forecast - covered).max(0.0);
    let inflated = base * (1.0 + margin);

    let nearest = inflated.round();
    let rounded = if (inflated - nearest).abs() < ROUNDING_TOLERANCE {
        nearest
    } else {
        inflated.ceil()
    };

    rounded.max(0.0) as i64
}

// ==========================================
// ReconcileOutcome - 对账输出
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileOutcome {
    /// 输出行（已按键排序，已按配置过滤）
    pub rows: Vec<ReconciledRow>,
    /// 合并后的预测键数量
    pub forecast_keys: usize,
    /// 因 to_send = 0 被过滤的行数
    pub dropped_zero_rows: usize,
}

// ==========================================
// Reconciler - 对账引擎
// ==========================================
#[derive(Debug, Default)]
pub struct Reconciler;

impl Reconciler {
    pub fn new() -> Self {
        Self
    }

    /// 执行对账
    ///
    /// 预测中重复的键先合并（预测、库存求和，保留第一个非空描述），
    /// 避免同一批生产/送镀数量被重复计入覆盖量。
    #[instrument(skip_all, fields(forecast = forecast.len(), production = production.len(), returns = returns.len()))]
    pub fn reconcile(
        &self,
        forecast: Vec<ForecastRow>,
        production: &[MovementRow],
        returns: &[MovementRow],
        config: &ReconcileConfig,
    ) -> ProjectionResult<ReconcileOutcome> {
        config.validate()?;

        let merged = merge_forecast(forecast);
        let production_by_key = index_movements(production);
        let returns_by_key = index_movements(returns);

        let forecast_keys = merged.len();
        let mut rows = Vec::with_capacity(forecast_keys);
        let mut dropped_zero_rows = 0usize;

        // BTreeMap 迭代顺序即输出顺序: (镀种, 参考号)
        for (key, row) in merged {
            let production_qty = production_by_key.get(&key).copied().unwrap_or(0.0);
            let return_qty = returns_by_key.get(&key).copied().unwrap_or(0.0);
            let stock_qty = if config.track_stock { row.stock_qty } else { 0.0 };

            let covered_qty =
                covered_quantity(production_qty, return_qty, stock_qty, config.track_stock);
            let to_send_qty = quantity_to_send(row.forecast_qty, covered_qty, config.margin);

            if config.filter_zero_to_send && to_send_qty == 0 {
                dropped_zero_rows += 1;
                continue;
            }

            rows.push(ReconciledRow {
                key,
                description: row.description,
                forecast_qty: row.forecast_qty,
                stock_qty,
                production_qty,
                return_qty,
                covered_qty,
                to_send_qty,
            });
        }

        Ok(ReconcileOutcome {
            rows,
            forecast_keys,
            dropped_zero_rows,
        })
    }
}

fn merge_forecast(forecast: Vec<ForecastRow>) -> BTreeMap<RecordKey, ForecastRow> {
    let mut merged: BTreeMap<RecordKey, ForecastRow> = BTreeMap::new();

    for row in forecast {
        match merged.get_mut(&row.key) {
            Some(existing) => {
                warn!(key = %row.key, "referência duplicada na projeção, quantidades somadas");
                existing.forecast_qty += row.forecast_qty;
                existing.stock_qty += row.stock_qty;
                if existing.description.is_none() {
                    existing.description = row.description;
                }
            }
            None => {
                merged.insert(row.key.clone(), row);
            }
        }
    }

    merged
}

fn index_movements(rows: &[MovementRow]) -> HashMap<RecordKey, f64> {
    let mut index: HashMap<RecordKey, f64> = HashMap::with_capacity(rows.len());
    for row in rows {
        *index.entry(row.key.clone()).or_insert(0.0) += row.quantity;
    }
    index
}
