// 配置管理系统
// 评分引擎的可调参数，TOML 文件读写与校验；默认值与内置常量一致

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::core::error::{Result, WineryError};
use crate::finance::valuation::ValuationConfig;
use crate::utils::logger::LogLevel;
use crate::vineyard::prestige::PrestigeConfig;
use crate::vineyard::quality::QualityConfig;
use crate::wine::characteristics::{validate_ranges, BalanceRanges, BASE_BALANCED_RANGES};

pub const DEFAULT_CONFIG_FILE: &str = "winemaker.toml";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub logging: LoggingConfig,
    pub balance: BalanceConfig,
    pub prestige: PrestigeConfig,
    pub quality: QualityConfig,
    pub valuation: ValuationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: LogLevel,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: LogLevel::Info }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceConfig {
    pub base_ranges: BalanceRanges,
    // 关闭后只按区间距离打分
    pub apply_rules: bool,
    pub apply_range_adjustments: bool,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            base_ranges: BASE_BALANCED_RANGES,
            apply_rules: true,
            apply_range_adjustments: true,
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<()> {
        validate_ranges(&self.balance.base_ranges)?;
        self.prestige.validate()?;
        self.quality.validate()?;
        self.valuation.validate()?;
        Ok(())
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ScoringConfig = toml::from_str(content)
            .map_err(|e| WineryError::ConfigError(format!("解析配置文件失败: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| WineryError::ConfigError(format!("序列化配置失败: {}", e)))
    }
}

pub struct ConfigManager {
    config: ScoringConfig,
    config_path: PathBuf,
}

impl ConfigManager {
    // 文件不存在时写入默认配置
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config_path = path.as_ref().to_path_buf();
        let config = Self::load_from_file(&config_path)?;
        Ok(Self { config, config_path })
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    // 修改后先校验再落盘；校验失败不改变当前配置
    pub fn update_config<F>(&mut self, updater: F) -> Result<()>
    where
        F: FnOnce(&mut ScoringConfig),
    {
        let mut updated = self.config.clone();
        updater(&mut updated);
        updated.validate()?;

        Self::save_config_to_file(&updated, &self.config_path)?;
        self.config = updated;
        info!("配置已更新并保存");
        Ok(())
    }

    pub fn reload(&mut self) -> Result<()> {
        self.config = Self::load_from_file(&self.config_path)?;
        Ok(())
    }

    pub fn load_from_file(path: &Path) -> Result<ScoringConfig> {
        if !path.exists() {
            info!("配置文件不存在，创建默认配置: {:?}", path);
            let default_config = ScoringConfig::default();
            Self::save_config_to_file(&default_config, path)?;
            return Ok(default_config);
        }

        let content = fs::read_to_string(path)?;
        let config = ScoringConfig::from_toml_str(&content)?;
        info!("成功加载配置文件: {:?}", path);
        Ok(config)
    }

    pub fn save_config_to_file(config: &ScoringConfig, path: &Path) -> Result<()> {
        let content = config.to_toml_string()?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        fs::write(path, content)?;
        debug!("配置已保存到: {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finance::valuation::DownsideCap;
    use crate::wine::characteristics::BalanceRange;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ScoringConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.prestige.divisor, 500.0);
        assert_eq!(config.quality.land_weight, 0.6);
        assert_eq!(config.valuation.downside, DownsideCap::Floor(-1.0));
    }

    #[test]
    fn test_config_serialization() {
        let config = ScoringConfig::default();
        let serialized = config.to_toml_string().unwrap();
        let deserialized = ScoringConfig::from_toml_str(&serialized).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config = ScoringConfig::from_toml_str("[prestige]\ndivisor = 250.0\nmax_factor = 0.9\n").unwrap();
        assert_eq!(config.prestige.divisor, 250.0);
        assert_eq!(config.quality, QualityConfig::default());
    }

    #[test]
    fn test_config_validation() {
        let mut config = ScoringConfig::default();
        config.balance.base_ranges.acidity = BalanceRange::new(0.7, 0.3);
        assert!(matches!(config.validate(), Err(WineryError::ConfigError(_))));

        let mut config = ScoringConfig::default();
        config.prestige.max_factor = 1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_file_operations() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("scoring.toml");

        // 不存在时创建默认文件
        let mut manager = ConfigManager::open(&config_path).unwrap();
        assert!(config_path.exists());
        assert_eq!(manager.config(), &ScoringConfig::default());

        manager.update_config(|c| c.valuation.anchor_strength = 3.0).unwrap();
        let reloaded = ConfigManager::load_from_file(&config_path).unwrap();
        assert_eq!(reloaded.valuation.anchor_strength, 3.0);

        // 无效修改被拒绝，内存与文件均不变
        assert!(manager.update_config(|c| c.quality.max_density = 0.0).is_err());
        assert_eq!(manager.config().quality.max_density, 15000.0);
        manager.reload().unwrap();
        assert_eq!(manager.config().valuation.anchor_strength, 3.0);
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("broken.toml");
        fs::write(&config_path, "[prestige]\ndivisor = \"abc\"\n").unwrap();
        assert!(matches!(ConfigManager::open(&config_path), Err(WineryError::ConfigError(_))));
    }
}
