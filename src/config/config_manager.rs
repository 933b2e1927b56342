// ==========================================
// banho-projection - 配置管理器
// ==========================================
// 职责: 配置文件定位、TOML 加载、多级覆写
// 优先级: 命令行 > 配置文件 > 预设（profile）> 内置默认
// ==========================================

use crate::config::strategy_profile::{ConfigOverrides, ReconcileConfig};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// 配置文件路径环境变量
pub const CONFIG_ENV_VAR: &str = "BANHO_CONFIG";

/// 用户配置目录下的子目录名
pub const CONFIG_DIR_NAME: &str = "banho-projection";

pub const CONFIG_FILE_NAME: &str = "config.toml";

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Arquivo de configuração não encontrado: {0}")]
    NotFound(PathBuf),

    #[error("Falha ao ler {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuração TOML inválida em {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error(transparent)]
    Invalid(#[from] crate::importer::error::ProjectionError),
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    file_overrides: ConfigOverrides,
    source_path: Option<PathBuf>,
}

impl ConfigManager {
    /// 不读取任何文件（仅内置默认 + 命令行）
    pub fn empty() -> Self {
        Self::default()
    }

    /// 按优先级定位配置文件并加载
    ///
    /// # 查找顺序
    /// 1. explicit（命令行 --config，必须存在）
    /// 2. 环境变量 BANHO_CONFIG（必须存在）
    /// 3. <用户配置目录>/banho-projection/config.toml（不存在则忽略）
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.trim().is_empty() {
                return Self::from_file(Path::new(&path));
            }
        }

        match default_config_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => {
                debug!("nenhum arquivo de configuração encontrado, usando padrões");
                Ok(Self::empty())
            }
        }
    }

    /// 读取指定 TOML 文件
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let manager = Self::from_toml_str(&content).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })?;

        info!(path = %path.display(), "configuração carregada");
        Ok(Self {
            source_path: Some(path.to_path_buf()),
            ..manager
        })
    }

    /// 解析 TOML 文本
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        let file_overrides: ConfigOverrides = toml::from_str(content)?;
        Ok(Self {
            file_overrides,
            source_path: None,
        })
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    /// 合成最终配置并校验
    ///
    /// profile 取命令行优先，其次配置文件；之后依次叠加文件字段与命令行字段。
    pub fn resolve(&self, cli: &ConfigOverrides) -> Result<ReconcileConfig, ConfigError> {
        let base = cli
            .profile
            .or(self.file_overrides.profile)
            .map(|p| p.config())
            .unwrap_or_default();

        let config = cli.apply_to(self.file_overrides.apply_to(base));
        config.validate()?;

        debug!(?config, "configuração resolvida");
        Ok(config)
    }
}

/// 默认配置文件路径
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::strategy_profile::StrategyProfile;
    use crate::domain::types::{KeyMode, PlatingTypeSource};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_resolve_defaults() {
        let config = ConfigManager::empty()
            .resolve(&ConfigOverrides::default())
            .unwrap();
        assert_eq!(config, ReconcileConfig::default());
    }

    #[test]
    fn test_file_profile_and_field_override() {
        let manager = ConfigManager::from_toml_str(
            r#"
            profile = "multi-banho"
            margin = 0.5
            "#,
        )
        .unwrap();

        let config = manager.resolve(&ConfigOverrides::default()).unwrap();
        assert_eq!(config.key_mode, KeyMode::ReferenceAndPlatingType);
        assert_eq!(config.plating_type_source, PlatingTypeSource::DirectColumn);
        assert_eq!(config.margin, 0.5);
    }

    #[test]
    fn test_cli_overrides_file() {
        let manager = ConfigManager::from_toml_str("margin = 0.5\ntrack_stock = false\n").unwrap();
        let cli = ConfigOverrides {
            profile: Some(StrategyProfile::Conferencia),
            margin: Some(0.1),
            ..ConfigOverrides::default()
        };

        let config = manager.resolve(&cli).unwrap();
        assert_eq!(config.margin, 0.1);
        assert!(!config.track_stock);
        assert!(!config.filter_zero_to_send);
        assert_eq!(config.plating_type_source, PlatingTypeSource::InferredFromText);
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(ConfigManager::from_toml_str("margem = 0.3").is_err());
    }

    #[test]
    fn test_invalid_combination_rejected() {
        let manager = ConfigManager::from_toml_str(
            "key_mode = \"reference_and_plating_type\"\nplating_type_source = \"none\"\n",
        )
        .unwrap();
        let result = manager.resolve(&ConfigOverrides::default());
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "profile = \"conferencia\"").unwrap();

        let manager = ConfigManager::load(Some(file.path())).unwrap();
        assert_eq!(manager.source_path(), Some(file.path()));
        let config = manager.resolve(&ConfigOverrides::default()).unwrap();
        assert_eq!(config.margin, 0.0);
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let result = ConfigManager::load(Some(Path::new("/nao/existe/config.toml")));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }
}
