// ==========================================
// banho-projection - 输出表
// ==========================================
// 职责: 对账结果 → 展示/导出用的有序列表格
// 列顺序: Ref / Produto, [Banho], Proj., [Estoque], Produção, Retorno, Coberta, Enviar
// ==========================================

use crate::config::ReconcileConfig;
use crate::domain::projection::ReconciledRow;
use crate::domain::table::Cell;
use crate::engine::ProjectionReport;
use serde::Serialize;

pub const COL_LABEL: &str = "Ref / Produto";
pub const COL_PLATING: &str = "Banho";
pub const COL_FORECAST: &str = "Proj.";
pub const COL_STOCK: &str = "Estoque";
pub const COL_PRODUCTION: &str = "Produção";
pub const COL_RETURN: &str = "Retorno";
pub const COL_COVERED: &str = "Coberta";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl OutputTable {
    pub fn from_report(report: &ProjectionReport) -> Self {
        Self::build(&report.rows, &report.config)
    }

    pub fn build(rows: &[ReconciledRow], config: &ReconcileConfig) -> Self {
        let with_plating = config.tracks_plating_type();
        let with_stock = config.track_stock;

        let mut columns = vec![COL_LABEL.to_string()];
        if with_plating {
            columns.push(COL_PLATING.to_string());
        }
        columns.push(COL_FORECAST.to_string());
        if with_stock {
            columns.push(COL_STOCK.to_string());
        }
        columns.extend(
            [COL_PRODUCTION, COL_RETURN, COL_COVERED]
                .iter()
                .map(|c| c.to_string()),
        );
        columns.push(config.send_column_label());

        let rows = rows
            .iter()
            .map(|row| {
                let mut cells = vec![Cell::Text(row.label())];
                if with_plating {
                    cells.push(match &row.key.plating_type {
                        Some(plating) => Cell::Text(plating.clone()),
                        None => Cell::Empty,
                    });
                }
                cells.push(Cell::Number(row.forecast_qty));
                if with_stock {
                    cells.push(Cell::Number(row.stock_qty));
                }
                cells.push(Cell::Number(row.production_qty));
                cells.push(Cell::Number(row.return_qty));
                cells.push(Cell::Number(row.covered_qty));
                cells.push(Cell::Number(row.to_send_qty as f64));
                cells
            })
            .collect();

        Self { columns, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
