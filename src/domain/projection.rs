// ==========================================
// banho-projection - 投影领域模型
// ==========================================
// 职责: 汇总行、预测行、对账结果行
// 红线: 每次运行重新生成，不持久化、不跨运行累积
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// RecordKey - 关联键
// ==========================================
// 字段顺序决定排序: 先镀种，后参考号（None 排在最前）
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordKey {
    pub plating_type: Option<String>,
    pub reference: String,
}

impl RecordKey {
    pub fn new(reference: impl Into<String>, plating_type: Option<String>) -> Self {
        Self {
            plating_type,
            reference: reference.into(),
        }
    }

    pub fn reference_only(reference: impl Into<String>) -> Self {
        Self::new(reference, None)
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.plating_type {
            Some(plating) => write!(f, "{} [{}]", self.reference, plating),
            None => write!(f, "{}", self.reference),
        }
    }
}

// ==========================================
// MovementRow - 送镀/生产汇总行
// ==========================================
// 每个关联键一行，quantity >= 0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementRow {
    pub key: RecordKey,
    pub quantity: f64,
}

// ==========================================
// ForecastRow - 预测行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRow {
    pub key: RecordKey,
    pub description: Option<String>, // 产品描述
    pub forecast_qty: f64,           // 预测销量
    pub stock_qty: f64,              // 当前库存（无库存列时为 0）
}

// ==========================================
// ReconciledRow - 对账结果行
// ==========================================
// covered_qty = production_qty + return_qty (+ stock_qty，若统计库存)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciledRow {
    pub key: RecordKey,
    pub description: Option<String>,
    pub forecast_qty: f64,
    pub stock_qty: f64,
    pub production_qty: f64,
    pub return_qty: f64,
    pub covered_qty: f64,
    pub to_send_qty: i64,
}

impl ReconciledRow {
    /// 展示用标签: "REF - 描述"；描述为空时只显示参考号
    pub fn label(&self) -> String {
        let reference = self.key.reference.trim();
        match self.description.as_deref().map(str::trim) {
            Some(desc) if !desc.is_empty() => format!("{} - {}", reference, desc),
            _ => reference.to_string(),
        }
    }
}
