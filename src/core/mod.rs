// 核心模块 - 评分引擎基础设施
// 错误处理、配置管理、数值曲线、游戏日历

pub mod error;
pub mod config;
pub mod math;
pub mod time;

// 重新导出核心类型
pub use error::{ErrorSeverity, Result, WineryError};
pub use config::{ConfigManager, ScoringConfig};
pub use math::{asymmetric_multiplier, clamp01, normalize, soft_capped_sqrt, squash_tail};
pub use time::{GameDate, Season};

// 校验内置数据表；配置错误属于构建期问题，这里尽早暴露
pub fn init() -> Result<()> {
    log::info!("初始化核心系统");

    crate::wine::characteristics::validate_ranges(&crate::wine::BASE_BALANCED_RANGES)?;
    crate::wine::validate_range_adjustments(&crate::wine::RANGE_ADJUSTMENTS)?;
    ScoringConfig::default().validate()?;
    log::debug!("内置规则 {} 条，产区 {} 个", crate::wine::RULES.len(), crate::vineyard::regions::all_regions().len());

    log::info!("核心系统初始化完成");
    Ok(())
}
