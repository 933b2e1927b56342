// ==========================================
// banho-projection - 导入/计算错误类型
// ==========================================
// 工具: thiserror 派生宏
// 红线: 结构性错误（缺列、格式不符）必须中止整次运行；
//       数值转换失败不在此列（静默按 0 处理）
// ==========================================

use crate::domain::types::SourceRole;
use thiserror::Error;

/// 投影计算错误类型（提示语面向业务用户）
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectionError {
    // ===== 文件相关错误 =====
    #[error("Formato não suportado: {0} (use .xls, .xlsx ou .csv)")]
    UnsupportedFileFormat(String),

    #[error(
        "{0}: o arquivo .xls não parece ser um relatório HTML do WM10. \
         Tente exportar novamente ou converter para .xlsx/.csv."
    )]
    NotHtmlReport(SourceRole),

    #[error("{0}: nenhuma tabela encontrada no relatório.")]
    NoTableFound(SourceRole),

    #[error("{role}: não foi possível ler o arquivo: {detail}")]
    ParseFailure { role: SourceRole, detail: String },

    // ===== 列校验错误 =====
    #[error(
        "{role}: a planilha não contém as colunas obrigatórias {}. \
         Confirme se exportou o relatório correto.",
        format_columns(.columns)
    )]
    MissingColumns { role: SourceRole, columns: Vec<String> },

    #[error("{role}: nenhuma coluna começa com '{prefix}'.")]
    ColumnNotFound { role: SourceRole, prefix: String },

    #[error("Não foi encontrada nenhuma coluna que comece com '{prefix}' na planilha do WM10.")]
    ForecastColumnNotFound { prefix: String },

    // ===== 配置错误 =====
    #[error("Configuração inválida: {0}")]
    InvalidConfig(String),
}

fn format_columns(columns: &[String]) -> String {
    let quoted: Vec<String> = columns.iter().map(|c| format!("'{}'", c)).collect();
    format!("{{{}}}", quoted.join(", "))
}

impl ProjectionError {
    pub fn parse_failure(role: SourceRole, detail: impl ToString) -> Self {
        ProjectionError::ParseFailure {
            role,
            detail: detail.to_string(),
        }
    }
}

/// Result 类型别名
pub type ProjectionResult<T> = Result<T, ProjectionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_message_names_file_and_columns() {
        let err = ProjectionError::MissingColumns {
            role: SourceRole::Production,
            columns: vec!["A Produzir".to_string(), "Categoria".to_string()],
        };
        let msg = err.to_string();

        assert!(msg.starts_with("Produção:"));
        assert!(msg.contains("{'A Produzir', 'Categoria'}"));
    }

    #[test]
    fn test_not_html_message() {
        let msg = ProjectionError::NotHtmlReport(SourceRole::Forecast).to_string();
        assert!(msg.contains("Projeção (WM10)"));
        assert!(msg.contains("HTML"));
    }
}
