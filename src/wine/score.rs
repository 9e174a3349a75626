// 葡萄酒综合评分与估价
// 在特性加成（外部协作者）之前的基线值

use std::fmt;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::core::error::{ensure_finite, Result, WineryError};
use crate::core::math::{asymmetric_multiplier, clamp01};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WineQualityTier {
    Undrinkable,
    Poor,
    Basic,
    Good,
    VeryGood,
    Excellent,
    Exceptional,
}

impl WineQualityTier {
    pub fn from_score(score: f64) -> Self {
        let score = clamp01(score);
        match score {
            s if s < 0.1 => WineQualityTier::Undrinkable,
            s if s < 0.3 => WineQualityTier::Poor,
            s if s < 0.5 => WineQualityTier::Basic,
            s if s < 0.7 => WineQualityTier::Good,
            s if s < 0.85 => WineQualityTier::VeryGood,
            s if s < 0.95 => WineQualityTier::Excellent,
            _ => WineQualityTier::Exceptional,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WineQualityTier::Undrinkable => "Undrinkable",
            WineQualityTier::Poor => "Poor",
            WineQualityTier::Basic => "Basic",
            WineQualityTier::Good => "Good",
            WineQualityTier::VeryGood => "Very Good",
            WineQualityTier::Excellent => "Excellent",
            WineQualityTier::Exceptional => "Exceptional",
        }
    }
}

impl fmt::Display for WineQualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// 品质与平衡等权
pub fn calculate_wine_score(quality: f64, balance: f64) -> f64 {
    (clamp01(quality) + clamp01(balance)) / 2.0
}

// 高分酒的价格超线性增长
pub fn calculate_estimated_price(wine_score: f64, base_price: f64) -> Result<f64> {
    let base_price = ensure_finite(base_price, "base_price")?;
    if base_price < 0.0 {
        return Err(WineryError::InvalidInput(format!("基础价格不能为负: {}", base_price)));
    }
    let multiplier = asymmetric_multiplier(wine_score);
    let price = base_price * multiplier;
    debug!("估价: 分数 {:.3} → 乘数 {:.3}, 价格 {:.2}", wine_score, multiplier, price);
    Ok(price)
}
