// ==========================================
// banho-projection - 关联键提取实现
// ==========================================
// 职责: 参考号 / 镀种派生
// 规则: 参考号取 " - " 前第一段；镀种按关键字顺序命中即返回
// ==========================================

use crate::domain::types::PlatingTypeSource;
use crate::importer::importer_trait::KeyExtractor as KeyExtractorTrait;
use tracing::debug;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// 产品编码与描述之间的分隔符
pub const REFERENCE_SEPARATOR: &str = " - ";

pub const PLATING_GOLD: &str = "Ouro";
pub const PLATING_RHODIUM: &str = "Ródio";
pub const PLATING_SILVER: &str = "Prata";
pub const PLATING_UNKNOWN: &str = "Desconhecido";

// 顺序即优先级: 同时含 OURO 与 RODIO 的产品归为 Ouro
// 关键字不带重音，匹配前描述先去重音
const INFERENCE_RULES: &[(&str, &str)] = &[
    ("OURO", PLATING_GOLD),
    ("RODIO", PLATING_RHODIUM),
    ("PRATA", PLATING_SILVER),
];

pub struct KeyExtractor;

impl KeyExtractorTrait for KeyExtractor {
    fn extract_reference(&self, product_text: &str) -> String {
        match product_text.split_once(REFERENCE_SEPARATOR) {
            Some((head, _)) => head.trim().to_string(),
            None => {
                let whole = product_text.trim().to_string();
                debug!(product = %whole, "produto sem separador ' - ', usando texto inteiro como referência");
                whole
            }
        }
    }

    fn extract_plating_type(
        &self,
        category: Option<&str>,
        description: &str,
        source: PlatingTypeSource,
    ) -> Option<String> {
        match source {
            PlatingTypeSource::None => None,
            PlatingTypeSource::DirectColumn => {
                let value = category.map(str::trim).unwrap_or("");
                if value.is_empty() {
                    Some(PLATING_UNKNOWN.to_string())
                } else {
                    Some(value.to_string())
                }
            }
            PlatingTypeSource::InferredFromText => Some(infer_plating_type(description).to_string()),
        }
    }
}

/// 去重音并转大写: NFD 分解后丢弃组合附加符号（"Ro\u{301}dio" / "rôdio" → "RODIO"）
fn fold_accents_upper(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_uppercase()
}

/// 从产品描述推断镀种（去重音、大写后按规则顺序匹配）
pub fn infer_plating_type(description: &str) -> &'static str {
    let folded = fold_accents_upper(description);
    INFERENCE_RULES
        .iter()
        .find(|(keyword, _)| folded.contains(keyword))
        .map(|(_, plating)| *plating)
        .unwrap_or(PLATING_UNKNOWN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::KeyMode;

    #[test]
    fn test_extract_reference_with_separator() {
        let extractor = KeyExtractor;
        assert_eq!(extractor.extract_reference("FO040 - Anel Solitário"), "FO040");
        assert_eq!(extractor.extract_reference("  FO040  - Anel - Ouro"), "FO040");
    }

    #[test]
    fn test_extract_reference_without_separator() {
        let extractor = KeyExtractor;
        assert_eq!(extractor.extract_reference("FO040"), "FO040");
        assert_eq!(extractor.extract_reference("  FO040-X  "), "FO040-X");
        assert_eq!(extractor.extract_reference(""), "");
    }

    #[test]
    fn test_infer_plating_type_rules() {
        assert_eq!(infer_plating_type("Anel banhado a ouro"), PLATING_GOLD);
        assert_eq!(infer_plating_type("Brinco Ródio Negro"), PLATING_RHODIUM);
        assert_eq!(infer_plating_type("Brinco rodio"), PLATING_RHODIUM);
        assert_eq!(infer_plating_type("Colar prata 925"), PLATING_SILVER);
        assert_eq!(infer_plating_type("Pulseira aço"), PLATING_UNKNOWN);
    }

    #[test]
    fn test_infer_plating_type_ignores_accents() {
        // 分解形式（macOS / 部分 HTML 导出）
        assert_eq!(infer_plating_type("Brinco Ro\u{301}dio"), PLATING_RHODIUM);
        assert_eq!(infer_plating_type("Brinco RÒDIO"), PLATING_RHODIUM);
        assert_eq!(infer_plating_type("Brinco rôdio"), PLATING_RHODIUM);
        assert_eq!(infer_plating_type("Anel ÓURO"), PLATING_GOLD);
        assert_eq!(fold_accents_upper("Ródio Solitário"), "RODIO SOLITARIO");
    }

    #[test]
    fn test_infer_plating_type_first_rule_wins() {
        // 多金属产品: 按规则顺序，OURO 先命中
        assert_eq!(infer_plating_type("Anel OURO com detalhe RÓDIO"), PLATING_GOLD);
        assert_eq!(infer_plating_type("Anel prata e ródio"), PLATING_RHODIUM);
    }

    #[test]
    fn test_extract_plating_type_direct_column() {
        let extractor = KeyExtractor;
        assert_eq!(
            extractor.extract_plating_type(Some(" Ouro "), "", PlatingTypeSource::DirectColumn),
            Some("Ouro".to_string())
        );
        assert_eq!(
            extractor.extract_plating_type(None, "Anel Ouro", PlatingTypeSource::DirectColumn),
            Some(PLATING_UNKNOWN.to_string())
        );
        assert_eq!(
            extractor.extract_plating_type(Some("Ouro"), "Anel", PlatingTypeSource::None),
            None
        );
    }

    #[test]
    fn test_build_key_reference_only_ignores_plating() {
        let extractor = KeyExtractor;
        let key = extractor.build_key(
            "FO040".to_string(),
            Some("Ouro"),
            "Anel",
            KeyMode::ReferenceOnly,
            PlatingTypeSource::DirectColumn,
        );
        assert_eq!(key.plating_type, None);
        assert_eq!(key.reference, "FO040");
    }
}
