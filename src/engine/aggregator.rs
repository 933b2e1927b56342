// ==========================================
// banho-projection - 送镀/生产汇总引擎
// ==========================================
// 职责: 按关联键汇总 "A Produzir" 数量
// 输入: 规范化前的原始表（Produto / Categoria / A Produzir）
// 输出: 每个关联键一行 MovementRow（按键排序）
// 红线: 数量无法识别时按 0 计，不报错；缺列必须报错
// ==========================================

use crate::config::ReconcileConfig;
use crate::domain::projection::{MovementRow, RecordKey};
use crate::domain::table::RawTable;
use crate::domain::types::SourceRole;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::ProjectionResult;
use crate::importer::importer_trait::KeyExtractor as _;
use crate::importer::key_extractor::KeyExtractor;
use crate::importer::table_normalizer::{normalize, require_column};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, warn};

/// 复合产品列: "FO040 - Nome da peça"
pub const COL_PRODUCT: &str = "Produto";
/// 镀种列
pub const COL_CATEGORY: &str = "Categoria";
/// 数量列
pub const COL_QUANTITY: &str = "A Produzir";

// ==========================================
// MovementAggregator - 汇总引擎
// ==========================================
pub struct MovementAggregator {
    cleaner: DataCleaner,
    extractor: KeyExtractor,
}

impl Default for MovementAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl MovementAggregator {
    pub fn new() -> Self {
        Self {
            cleaner: DataCleaner,
            extractor: KeyExtractor,
        }
    }

    /// 必需列（直接读取镀种时需要 Categoria）
    pub fn required_columns(config: &ReconcileConfig) -> Vec<&'static str> {
        let mut columns = vec![COL_PRODUCT, COL_QUANTITY];
        if config.needs_category_column() {
            columns.push(COL_CATEGORY);
        }
        columns
    }

    /// 汇总送镀/生产表
    ///
    /// # 规则
    /// - Produto 为空的行跳过
    /// - 参考号取 " - " 前第一段
    /// - 数量宽容转换，负数按 0 计
    #[instrument(skip(self, table, config), fields(rows = table.row_count()))]
    pub fn aggregate(
        &self,
        table: RawTable,
        role: SourceRole,
        config: &ReconcileConfig,
    ) -> ProjectionResult<Vec<MovementRow>> {
        let table = normalize(table, &Self::required_columns(config), role)?;

        let product_col = require_column(&table, COL_PRODUCT, role)?;
        let quantity_col = require_column(&table, COL_QUANTITY, role)?;
        let category_col = table.column_index(COL_CATEGORY);

        let mut totals: BTreeMap<RecordKey, f64> = BTreeMap::new();
        let mut skipped = 0usize;

        for row in 0..table.row_count() {
            let Some(product) = table.cell(row, product_col).as_trimmed() else {
                skipped += 1;
                continue;
            };

            let reference = self.extractor.extract_reference(&product);
            let category = category_col.map(|col| table.cell(row, col).as_text().into_owned());
            let key = self.extractor.build_key(
                reference,
                category.as_deref(),
                &product,
                config.key_mode,
                config.plating_type_source,
            );

            let mut quantity = self.cleaner.to_quantity(table.cell(row, quantity_col));
            if quantity < 0.0 {
                warn!(%key, quantity, "quantidade negativa tratada como 0");
                quantity = 0.0;
            }

            *totals.entry(key).or_insert(0.0) += quantity;
        }

        if skipped > 0 {
            debug!(skipped, "linhas sem produto ignoradas");
        }

        let rows: Vec<MovementRow> = totals
            .into_iter()
            .map(|(key, quantity)| MovementRow { key, quantity })
            .collect();

        info!(
            %role,
            label = role.quantity_label(),
            keys = rows.len(),
            total = rows.iter().map(|r| r.quantity).sum::<f64>(),
            "base agregada"
        );
        Ok(rows)
    }
}
