// 酒庄经营模拟评分引擎
// 原始模拟状态 → 归一化 0-1 分数：葡萄酒平衡、品质因子、葡萄园声望、股价、利率、工资
// 所有计算均为纯函数，静态数据表只读，可在多线程中并发调用

pub mod core;
pub mod utils;
pub mod wine;
pub mod vineyard;
pub mod finance;

// 重新导出核心类型
pub use crate::core::{ConfigManager, GameDate, Result, ScoringConfig, WineryError};
pub use utils::{init_logger, LogLevel};
pub use wine::{
    calculate_characteristic_breakdown, calculate_wine_balance, BalanceRange, Characteristic,
    WineBalanceResult, WineCharacteristics,
};
pub use vineyard::{
    bounded_vineyard_prestige_factor, get_vineyard_grape_quality_factors, get_vineyard_quality_factors,
    Vineyard,
};
pub use finance::{
    calculate_credit_rating_modifier, calculate_effective_interest_rate, calculate_seasonal_payment,
    calculate_wage, next_share_price,
};

// 版本信息
pub const VERSION: &str = "0.1.0";
pub const NAME: &str = "winemaker";

// 初始化日志并校验内置数据表
pub fn init(level: LogLevel) -> Result<()> {
    init_logger(level);
    crate::core::init()?;
    log::info!("评分引擎初始化完成 v{}", VERSION);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init() {
        init(LogLevel::Warn).unwrap();
        // 重复初始化安全
        init(LogLevel::Debug).unwrap();
    }

    #[test]
    fn test_scoring_functions_are_thread_safe() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<WineCharacteristics>();
        assert_send_sync::<Vineyard>();
        assert_send_sync::<ScoringConfig>();

        let handles: Vec<_> = (0..4)
            .map(|i| {
                std::thread::spawn(move || {
                    let characteristics = WineCharacteristics::uniform(0.2 * i as f64);
                    wine::calculate_wine_balance_default(&characteristics).score
                })
            })
            .collect();
        for handle in handles {
            let score = handle.join().unwrap();
            assert!((0.0..=1.0).contains(&score));
        }
    }

    #[test]
    fn test_version_info() {
        assert_eq!(VERSION, "0.1.0");
        assert_eq!(NAME, "winemaker");
    }
}
