// ==========================================
// banho-projection - 领域类型定义
// ==========================================
// 职责: 来源角色、键模式、镀种来源等枚举
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 来源角色 (Source Role)
// ==========================================
// 用于错误提示：指明是哪一份报表出了问题
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceRole {
    Return,     // 已送镀、未返回
    Production, // 已返回、生产中
    Forecast,   // WM10 销售预测
}

impl SourceRole {
    /// 汇总后数量列的内部名称
    pub fn quantity_label(&self) -> &'static str {
        match self {
            SourceRole::Return => "qtd_retorno",
            SourceRole::Production => "qtd_producao",
            SourceRole::Forecast => "qtd_projetada",
        }
    }
}

impl fmt::Display for SourceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceRole::Return => write!(f, "Retorno de banho"),
            SourceRole::Production => write!(f, "Produção"),
            SourceRole::Forecast => write!(f, "Projeção (WM10)"),
        }
    }
}

// ==========================================
// 关联键模式 (Key Mode)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyMode {
    ReferenceOnly,           // 单一镀种：仅按参考号
    ReferenceAndPlatingType, // 多镀种：参考号 + 镀种
}

impl fmt::Display for KeyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyMode::ReferenceOnly => write!(f, "reference_only"),
            KeyMode::ReferenceAndPlatingType => write!(f, "reference_and_plating_type"),
        }
    }
}

impl FromStr for KeyMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "reference_only" | "reference" => Ok(KeyMode::ReferenceOnly),
            "reference_and_plating_type" | "reference_plating" => {
                Ok(KeyMode::ReferenceAndPlatingType)
            }
            other => Err(format!("modo de chave desconhecido: {}", other)),
        }
    }
}

// ==========================================
// 镀种来源 (Plating Type Source)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatingTypeSource {
    DirectColumn,     // 直接读取 Categoria / Banho 列
    InferredFromText, // 从产品描述关键字推断
    None,             // 不区分镀种
}

impl fmt::Display for PlatingTypeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatingTypeSource::DirectColumn => write!(f, "direct_column"),
            PlatingTypeSource::InferredFromText => write!(f, "inferred_from_text"),
            PlatingTypeSource::None => write!(f, "none"),
        }
    }
}

impl FromStr for PlatingTypeSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "direct_column" | "direct" => Ok(PlatingTypeSource::DirectColumn),
            "inferred_from_text" | "inferred" => Ok(PlatingTypeSource::InferredFromText),
            "none" => Ok(PlatingTypeSource::None),
            other => Err(format!("origem de banho desconhecida: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mode_from_str() {
        assert_eq!("reference-only".parse::<KeyMode>(), Ok(KeyMode::ReferenceOnly));
        assert_eq!(
            "reference_and_plating_type".parse::<KeyMode>(),
            Ok(KeyMode::ReferenceAndPlatingType)
        );
        assert!("banho".parse::<KeyMode>().is_err());
    }

    #[test]
    fn test_plating_type_source_serde() {
        let json = serde_json::to_string(&PlatingTypeSource::InferredFromText).unwrap();
        assert_eq!(json, "\"inferred_from_text\"");
        assert_eq!("none".parse::<PlatingTypeSource>(), Ok(PlatingTypeSource::None));
    }
}
