// ==========================================
// banho-projection - 计算策略配置
// ==========================================
// 职责: 对账参数（余量、是否计库存、键模式、镀种来源、过滤）
//       以及三种部署预设
// ==========================================

use crate::domain::types::{KeyMode, PlatingTypeSource};
use crate::importer::error::{ProjectionError, ProjectionResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 默认安全余量（30%）
pub const DEFAULT_MARGIN: f64 = 0.3;

// ==========================================
// ReconcileConfig - 对账参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    /// 安全余量（>= 0），to_send = ceil(base * (1 + margin))
    pub margin: f64,

    /// 覆盖量是否计入当前库存
    pub track_stock: bool,

    /// 关联键模式
    pub key_mode: KeyMode,

    /// 镀种来源
    pub plating_type_source: PlatingTypeSource,

    /// 只保留需要送镀的行（to_send > 0）
    pub filter_zero_to_send: bool,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        StrategyProfile::Ouro.config()
    }
}

impl ReconcileConfig {
    /// 是否按镀种区分
    pub fn tracks_plating_type(&self) -> bool {
        self.key_mode == KeyMode::ReferenceAndPlatingType
    }

    /// 是否需要镀种列（Categoria / Banho）
    pub fn needs_category_column(&self) -> bool {
        self.tracks_plating_type() && self.plating_type_source == PlatingTypeSource::DirectColumn
    }

    /// 校验参数组合
    pub fn validate(&self) -> ProjectionResult<()> {
        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(ProjectionError::InvalidConfig(format!(
                "margem deve ser um número >= 0 (recebido {})",
                self.margin
            )));
        }

        if self.tracks_plating_type() && self.plating_type_source == PlatingTypeSource::None {
            return Err(ProjectionError::InvalidConfig(
                "chave por referência + banho exige uma origem de banho (direct_column ou inferred_from_text)"
                    .to_string(),
            ));
        }

        Ok(())
    }

    /// 送镀数量列的表头，例: "Enviar (30%)"
    pub fn send_column_label(&self) -> String {
        if self.margin > 0.0 {
            let pct = self.margin * 100.0;
            if (pct - pct.round()).abs() < 1e-9 {
                format!("Enviar ({}%)", pct.round() as i64)
            } else {
                format!("Enviar ({:.1}%)", pct)
            }
        } else {
            "Enviar".to_string()
        }
    }
}

// ==========================================
// StrategyProfile - 部署预设
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyProfile {
    /// 单一镀种（金）: 仅按参考号，余量 30%，计库存，过滤 0
    Ouro,
    /// 多镀种: 参考号 + 镀种列，余量 30%，不计库存，过滤 0
    MultiBanho,
    /// 核对视图: 参考号 + 推断镀种，无余量，不计库存，保留全部行
    Conferencia,
}

impl StrategyProfile {
    pub const ALL: [StrategyProfile; 3] = [
        StrategyProfile::Ouro,
        StrategyProfile::MultiBanho,
        StrategyProfile::Conferencia,
    ];

    pub fn config(&self) -> ReconcileConfig {
        match self {
            StrategyProfile::Ouro => ReconcileConfig {
                margin: DEFAULT_MARGIN,
                track_stock: true,
                key_mode: KeyMode::ReferenceOnly,
                plating_type_source: PlatingTypeSource::None,
                filter_zero_to_send: true,
            },
            StrategyProfile::MultiBanho => ReconcileConfig {
                margin: DEFAULT_MARGIN,
                track_stock: false,
                key_mode: KeyMode::ReferenceAndPlatingType,
                plating_type_source: PlatingTypeSource::DirectColumn,
                filter_zero_to_send: true,
            },
            StrategyProfile::Conferencia => ReconcileConfig {
                margin: 0.0,
                track_stock: false,
                key_mode: KeyMode::ReferenceAndPlatingType,
                plating_type_source: PlatingTypeSource::InferredFromText,
                filter_zero_to_send: false,
            },
        }
    }
}

impl fmt::Display for StrategyProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyProfile::Ouro => write!(f, "ouro"),
            StrategyProfile::MultiBanho => write!(f, "multi-banho"),
            StrategyProfile::Conferencia => write!(f, "conferencia"),
        }
    }
}

impl FromStr for StrategyProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        StrategyProfile::ALL
            .iter()
            .copied()
            .find(|p| p.to_string() == name)
            .ok_or_else(|| format!("perfil desconhecido: {} (use ouro, multi-banho ou conferencia)", s))
    }
}

// ==========================================
// ConfigOverrides - 部分覆写（配置文件 / 命令行）
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigOverrides {
    #[serde(default)]
    pub profile: Option<StrategyProfile>,

    #[serde(default)]
    pub margin: Option<f64>,

    #[serde(default)]
    pub track_stock: Option<bool>,

    #[serde(default)]
    pub key_mode: Option<KeyMode>,

    #[serde(default)]
    pub plating_type_source: Option<PlatingTypeSource>,

    #[serde(default)]
    pub filter_zero_to_send: Option<bool>,
}

impl ConfigOverrides {
    /// 在 base 之上应用覆写（profile 已由调用方处理）
    pub fn apply_to(&self, mut base: ReconcileConfig) -> ReconcileConfig {
        if let Some(margin) = self.margin {
            base.margin = margin;
        }
        if let Some(track_stock) = self.track_stock {
            base.track_stock = track_stock;
        }
        if let Some(key_mode) = self.key_mode {
            base.key_mode = key_mode;
        }
        if let Some(source) = self.plating_type_source {
            base.plating_type_source = source;
        }
        if let Some(filter) = self.filter_zero_to_send {
            base.filter_zero_to_send = filter;
        }
        base
    }
}
