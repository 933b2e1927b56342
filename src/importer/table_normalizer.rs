// ==========================================
// banho-projection - 表格规范化
// ==========================================
// 职责: 必需列校验 + 前缀列定位（共享给汇总与预测构建）
// 规则: 列名精确匹配（区分大小写）；前缀列按顺序第一个命中为准
// ==========================================

use crate::domain::table::RawTable;
use crate::domain::types::SourceRole;
use crate::importer::error::{ProjectionError, ProjectionResult};

/// 校验必需列，返回原表（已剔除完全空白的行）
///
/// 缺失列按名称排序后报告，便于用户对照。
pub fn normalize(
    mut table: RawTable,
    required_columns: &[&str],
    role: SourceRole,
) -> ProjectionResult<RawTable> {
    let mut missing: Vec<String> = required_columns
        .iter()
        .filter(|c| !table.has_column(c))
        .map(|c| c.to_string())
        .collect();

    if !missing.is_empty() {
        missing.sort();
        missing.dedup();
        return Err(ProjectionError::MissingColumns {
            role,
            columns: missing,
        });
    }

    table.rows.retain(|row| !row.iter().all(|c| c.is_empty()));
    Ok(table)
}

/// 按前缀定位列（容忍列名后缀，例如日期）
pub fn find_column_by_prefix(columns: &[String], prefix: &str) -> Option<usize> {
    columns.iter().position(|c| c.starts_with(prefix))
}

/// 按前缀定位必需列，找不到时报 ColumnNotFound
pub fn require_column_by_prefix(
    table: &RawTable,
    prefix: &str,
    role: SourceRole,
) -> ProjectionResult<usize> {
    find_column_by_prefix(&table.columns, prefix).ok_or_else(|| ProjectionError::ColumnNotFound {
        role,
        prefix: prefix.to_string(),
    })
}

/// 精确定位列（调用方须先经 normalize 校验）
pub fn require_column(table: &RawTable, name: &str, role: SourceRole) -> ProjectionResult<usize> {
    table
        .column_index(name)
        .ok_or_else(|| ProjectionError::MissingColumns {
            role,
            columns: vec![name.to_string()],
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::table::Cell;

    fn table(columns: &[&str]) -> RawTable {
        RawTable::new(
            columns.iter().map(|c| c.to_string()).collect(),
            vec![
                vec![Cell::from("a"); columns.len()],
                vec![Cell::Empty; columns.len()],
            ],
        )
    }

    #[test]
    fn test_normalize_reports_missing_columns_sorted() {
        let result = normalize(
            table(&["Produto"]),
            &["Produto", "Categoria", "A Produzir"],
            SourceRole::Return,
        );

        assert_eq!(
            result,
            Err(ProjectionError::MissingColumns {
                role: SourceRole::Return,
                columns: vec!["A Produzir".to_string(), "Categoria".to_string()],
            })
        );
    }

    #[test]
    fn test_normalize_is_case_sensitive() {
        let result = normalize(table(&["produto"]), &["Produto"], SourceRole::Return);
        assert!(result.is_err());
    }

    #[test]
    fn test_normalize_drops_blank_rows() {
        let normalized = normalize(table(&["Produto"]), &["Produto"], SourceRole::Return).unwrap();
        assert_eq!(normalized.row_count(), 1);
    }

    #[test]
    fn test_prefix_match_tolerates_date_suffix() {
        let a = vec!["Referência".to_string(), "Previsão de Venda (01/01/2024)".to_string()];
        let b = vec!["Referência".to_string(), "Previsão de Venda (02/02/2024)".to_string()];

        assert_eq!(find_column_by_prefix(&a, "Previsão de Venda"), Some(1));
        assert_eq!(find_column_by_prefix(&b, "Previsão de Venda"), Some(1));
    }

    #[test]
    fn test_prefix_match_first_wins() {
        let columns = vec![
            "Estoque Atual (loja)".to_string(),
            "Estoque Atual (fábrica)".to_string(),
        ];
        assert_eq!(find_column_by_prefix(&columns, "Estoque Atual"), Some(0));
    }

    #[test]
    fn test_require_column_by_prefix_not_found() {
        let result = require_column_by_prefix(&table(&["Produto"]), "Estoque Atual", SourceRole::Forecast);
        assert_eq!(
            result,
            Err(ProjectionError::ColumnNotFound {
                role: SourceRole::Forecast,
                prefix: "Estoque Atual".to_string(),
            })
        );
    }
}
