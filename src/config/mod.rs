// ==========================================
// banho-projection - 配置层
// ==========================================
// 职责: 对账参数、部署预设、配置文件加载
// 存储: TOML 文件（可选）
// ==========================================

pub mod config_manager;
pub mod strategy_profile;

// 重导出核心配置类型
pub use config_manager::{default_config_path, ConfigError, ConfigManager, CONFIG_ENV_VAR};
pub use strategy_profile::{ConfigOverrides, ReconcileConfig, StrategyProfile, DEFAULT_MARGIN};
