// ==========================================
// banho-projection - 数据清洗器
// ==========================================
// 职责: 宽容数值转换（数量列 / WM10 装饰文本）
// 红线: 本模块所有数值转换永不失败，无法识别的值一律按 0 处理；
//       结构性校验（缺列）不在这里做
// ==========================================

use crate::domain::table::Cell;
use once_cell::sync::Lazy;
use regex::Regex;

static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("valid digit regex"));

pub struct DataCleaner;

impl DataCleaner {
    /// 宽容数值转换（"A Produzir" 等纯数量列）
    ///
    /// - 原生数值 → 原值
    /// - 文本 → 整体按数字解析，失败为 0（"28 UN" 不在此处拆解）
    /// - 空值 / NaN / 无穷 → 0
    pub fn to_quantity(&self, cell: &Cell) -> f64 {
        let value = match cell {
            Cell::Empty => 0.0,
            Cell::Number(n) => *n,
            Cell::Text(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        };

        if value.is_finite() {
            value
        } else {
            0.0
        }
    }

    /// 从装饰文本中提取数量（WM10 预测/库存列）
    ///
    /// 取第一段连续数字；没有数字时为 0。
    /// 例: "28 UN" → 28，"UN" → 0
    pub fn extract_leading_number(&self, cell: &Cell) -> f64 {
        let text = cell.as_text();
        DIGIT_RUN
            .find(&text)
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_quantity_tolerant() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.to_quantity(&Cell::Number(12.0)), 12.0);
        assert_eq!(cleaner.to_quantity(&Cell::from(" 7 ")), 7.0);
        assert_eq!(cleaner.to_quantity(&Cell::from("2.5")), 2.5);
        assert_eq!(cleaner.to_quantity(&Cell::from("28 UN")), 0.0);
        assert_eq!(cleaner.to_quantity(&Cell::from("abc")), 0.0);
        assert_eq!(cleaner.to_quantity(&Cell::Empty), 0.0);
        assert_eq!(cleaner.to_quantity(&Cell::Number(f64::NAN)), 0.0);
        assert_eq!(cleaner.to_quantity(&Cell::from("inf")), 0.0);
    }

    #[test]
    fn test_extract_leading_number() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.extract_leading_number(&Cell::from("28 UN")), 28.0);
        assert_eq!(cleaner.extract_leading_number(&Cell::from("UN")), 0.0);
        assert_eq!(cleaner.extract_leading_number(&Cell::from("Qtd: 15 de 20")), 15.0);
        assert_eq!(cleaner.extract_leading_number(&Cell::Number(40.0)), 40.0);
        assert_eq!(cleaner.extract_leading_number(&Cell::Empty), 0.0);
    }
}
