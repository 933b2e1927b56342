// ==========================================
// banho-projection - 预测构建引擎 (WM10)
// ==========================================
// 职责: 清洗 WM10 预测表，生成 ForecastRow
// 规则:
//   - 预测列按前缀 "Previsão de Venda" 定位（列名带日期）
//   - 库存列按前缀 "Estoque Atual" 定位，缺失时库存为 0
//   - 剔除空参考号 / 重复表头 / 合计与页脚行
//   - 数量取单元格文本中的第一段数字（"28 UN" → 28）
// ==========================================

use crate::config::ReconcileConfig;
use crate::domain::projection::ForecastRow;
use crate::domain::table::RawTable;
use crate::domain::types::SourceRole;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ProjectionError, ProjectionResult};
use crate::importer::importer_trait::KeyExtractor as _;
use crate::importer::key_extractor::KeyExtractor;
use crate::importer::table_normalizer::{
    find_column_by_prefix, normalize, require_column, require_column_by_prefix,
};
use tracing::{debug, info, instrument};

pub const COL_REFERENCE: &str = "Referência";
pub const COL_DESCRIPTION: &str = "Produto";
/// 预测表中的镀种列（直接读取模式）
pub const COL_PLATING: &str = "Banho";

pub const FORECAST_PREFIX: &str = "Previsão de Venda";
pub const STOCK_PREFIX: &str = "Estoque Atual";

// 合计/页脚标记（小写比较）
const FOOTER_MARKERS: &[&str] = &["totais", "previs"];

/// 参考号是否为合计/页脚行
pub fn is_footer_reference(reference: &str) -> bool {
    let lower = reference.to_lowercase();
    FOOTER_MARKERS.iter().any(|m| lower.contains(m))
}

// ==========================================
// ProjectionBuilder - 预测构建引擎
// ==========================================
pub struct ProjectionBuilder {
    cleaner: DataCleaner,
    extractor: KeyExtractor,
}

impl Default for ProjectionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectionBuilder {
    pub fn new() -> Self {
        Self {
            cleaner: DataCleaner,
            extractor: KeyExtractor,
        }
    }

    pub fn required_columns(config: &ReconcileConfig) -> Vec<&'static str> {
        let mut columns = vec![COL_REFERENCE, COL_DESCRIPTION];
        if config.needs_category_column() {
            columns.push(COL_PLATING);
        }
        columns
    }

    /// 构建预测行（保持报表原顺序，重复键留给对账引擎合并）
    #[instrument(skip(self, table, config), fields(rows = table.row_count()))]
    pub fn build(
        &self,
        table: RawTable,
        config: &ReconcileConfig,
    ) -> ProjectionResult<Vec<ForecastRow>> {
        let role = SourceRole::Forecast;
        let table = normalize(table, &Self::required_columns(config), role)?;

        let reference_col = require_column(&table, COL_REFERENCE, role)?;
        let description_col = require_column(&table, COL_DESCRIPTION, role)?;
        let plating_col = table.column_index(COL_PLATING);

        let forecast_col = require_column_by_prefix(&table, FORECAST_PREFIX, role).map_err(|_| {
            ProjectionError::ForecastColumnNotFound {
                prefix: FORECAST_PREFIX.to_string(),
            }
        })?;

        let stock_col = find_column_by_prefix(&table.columns, STOCK_PREFIX);
        match stock_col {
            Some(col) => debug!(column = %table.columns[col], "coluna de estoque localizada"),
            None => info!("relatório sem coluna de estoque, estoque considerado 0"),
        }

        let mut rows = Vec::with_capacity(table.row_count());
        let mut dropped = 0usize;

        for row in 0..table.row_count() {
            let Some(reference) = table.cell(row, reference_col).as_trimmed() else {
                dropped += 1;
                continue;
            };

            // 重复表头 / 合计 / 页脚
            if reference == COL_REFERENCE || is_footer_reference(&reference) {
                debug!(%reference, "linha de cabeçalho/rodapé descartada");
                dropped += 1;
                continue;
            }

            let description = table.cell(row, description_col).as_trimmed();
            let forecast_qty = self.cleaner.extract_leading_number(table.cell(row, forecast_col));
            let stock_qty = stock_col
                .map(|col| self.cleaner.extract_leading_number(table.cell(row, col)))
                .unwrap_or(0.0);
            let category = plating_col.map(|col| table.cell(row, col).as_text().into_owned());

            let key = self.extractor.build_key(
                reference,
                category.as_deref(),
                description.as_deref().unwrap_or(""),
                config.key_mode,
                config.plating_type_source,
            );

            rows.push(ForecastRow {
                key,
                description,
                forecast_qty,
                stock_qty,
            });
        }

        info!(kept = rows.len(), dropped, "projeção preparada");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StrategyProfile;
    use crate::domain::projection::RecordKey;
    use crate::domain::table::Cell;

    fn forecast_table(columns: &[&str], rows: Vec<Vec<&str>>) -> RawTable {
        RawTable::new(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.into_iter()
                .map(|r| r.into_iter().map(Cell::from).collect())
                .collect(),
        )
    }

    #[test]
    fn test_build_extracts_numbers_and_stock() {
        let table = forecast_table(
            &["Referência", "Produto", "Previsão de Venda (01/01/2024)", "Estoque Atual 10/01"],
            vec![
                vec!["FO040", "Anel Solitário", "28 UN", "4 UN"],
                vec!["FO041", "Brinco", "UN", ""],
            ],
        );

        let rows = ProjectionBuilder::new()
            .build(table, &ReconcileConfig::default())
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].key, RecordKey::reference_only("FO040"));
        assert_eq!(rows[0].description.as_deref(), Some("Anel Solitário"));
        assert_eq!(rows[0].forecast_qty, 28.0);
        assert_eq!(rows[0].stock_qty, 4.0);
        assert_eq!(rows[1].forecast_qty, 0.0);
        assert_eq!(rows[1].stock_qty, 0.0);
    }

    #[test]
    fn test_build_without_stock_column() {
        let table = forecast_table(
            &["Referência", "Produto", "Previsão de Venda (02/02/2024)"],
            vec![vec!["FO040", "Anel", "10"]],
        );

        let rows = ProjectionBuilder::new()
            .build(table, &ReconcileConfig::default())
            .unwrap();

        assert_eq!(rows[0].forecast_qty, 10.0);
        assert_eq!(rows[0].stock_qty, 0.0);
    }

    #[test]
    fn test_build_drops_footer_and_header_rows() {
        let table = forecast_table(
            &["Referência", "Produto", "Previsão de Venda"],
            vec![
                vec!["Referência", "Produto", "Previsão de Venda"],
                vec!["FO040", "Anel", "5 UN"],
                vec!["", "sem referência", "9 UN"],
                vec!["Totais:", "", "5 UN"],
                vec!["PREVISÃO CALCULADA EM 01/01", "", ""],
            ],
        );

        let rows = ProjectionBuilder::new()
            .build(table, &ReconcileConfig::default())
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].key.reference, "FO040");
    }

    #[test]
    fn test_build_missing_forecast_column() {
        let table = forecast_table(&["Referência", "Produto", "Estoque Atual"], vec![]);
        let result = ProjectionBuilder::new().build(table, &ReconcileConfig::default());

        assert_eq!(
            result,
            Err(ProjectionError::ForecastColumnNotFound {
                prefix: FORECAST_PREFIX.to_string(),
            })
        );
    }

    #[test]
    fn test_build_missing_required_columns() {
        let table = forecast_table(&["Produto", "Previsão de Venda"], vec![]);
        let result = ProjectionBuilder::new().build(table, &ReconcileConfig::default());

        assert_eq!(
            result,
            Err(ProjectionError::MissingColumns {
                role: SourceRole::Forecast,
                columns: vec![COL_REFERENCE.to_string()],
            })
        );
    }

    #[test]
    fn test_build_infers_plating_type_from_description() {
        let table = forecast_table(
            &["Referência", "Produto", "Previsão de Venda"],
            vec![
                vec!["FO040", "Anel banho ouro e ródio", "5"],
                vec!["FO041", "Brinco", "5"],
            ],
        );

        let rows = ProjectionBuilder::new()
            .build(table, &StrategyProfile::Conferencia.config())
            .unwrap();

        assert_eq!(rows[0].key.plating_type.as_deref(), Some("Ouro"));
        assert_eq!(rows[1].key.plating_type.as_deref(), Some("Desconhecido"));
    }

    #[test]
    fn test_build_direct_plating_column_required() {
        let table = forecast_table(&["Referência", "Produto", "Previsão de Venda"], vec![]);
        let result = ProjectionBuilder::new().build(table, &StrategyProfile::MultiBanho.config());

        assert!(matches!(
            result,
            Err(ProjectionError::MissingColumns { ref columns, .. }) if columns == &vec![COL_PLATING.to_string()]
        ));
    }
}
