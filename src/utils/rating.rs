// 评级工具 - 原始值 + 参考区间 → 0-1 评级与显示分档
// 只用于着色与标签，不参与游戏状态计算

use serde::{Deserialize, Serialize};

use crate::core::math::{clamp01, constants::EPSILON};
use crate::wine::characteristics::distance_outside;
use crate::wine::engine::OUTSIDE_PENALTY_WEIGHT;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RatingStrategy {
    LowerBetter,
    HigherBetter,
    // 区间内为 1，区间外按区间外距离衰减
    Balanced { range_min: f64, range_max: f64 },
}

pub fn rating(value: f64, domain_min: f64, domain_max: f64, strategy: RatingStrategy) -> f64 {
    let span = domain_max - domain_min;
    if span.abs() < EPSILON {
        return 1.0;
    }
    match strategy {
        RatingStrategy::LowerBetter => 1.0 - clamp01((value - domain_min) / span),
        RatingStrategy::HigherBetter => clamp01((value - domain_min) / span),
        RatingStrategy::Balanced { range_min, range_max } => {
            let (lo, hi) = if range_min <= range_max { (range_min, range_max) } else { (range_max, range_min) };
            let penalty = OUTSIDE_PENALTY_WEIGHT * distance_outside(value, lo, hi);
            clamp01(1.0 - penalty / span.abs())
        }
    }
}

// 显示分档
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RatingCategory {
    Poor,
    BelowAverage,
    Average,
    Good,
    Excellent,
}

impl RatingCategory {
    pub fn from_rating(rating: f64) -> Self {
        let rating = clamp01(rating);
        if rating >= 0.9 {
            RatingCategory::Excellent
        } else if rating >= 0.7 {
            RatingCategory::Good
        } else if rating >= 0.5 {
            RatingCategory::Average
        } else if rating >= 0.3 {
            RatingCategory::BelowAverage
        } else {
            RatingCategory::Poor
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RatingCategory::Poor => "Poor",
            RatingCategory::BelowAverage => "Below Average",
            RatingCategory::Average => "Average",
            RatingCategory::Good => "Good",
            RatingCategory::Excellent => "Excellent",
        }
    }

    // 颜色名称
    pub fn color(&self) -> &'static str {
        match self {
            RatingCategory::Poor => "red",
            RatingCategory::BelowAverage => "orange",
            RatingCategory::Average => "yellow",
            RatingCategory::Good => "lime",
            RatingCategory::Excellent => "green",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingDisplay {
    pub rating: f64,
    pub category: RatingCategory,
}

pub fn rate_for_display(value: f64, domain_min: f64, domain_max: f64, strategy: RatingStrategy) -> RatingDisplay {
    let rating = rating(value, domain_min, domain_max, strategy);
    RatingDisplay { rating, category: RatingCategory::from_rating(rating) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lower_better() {
        assert_eq!(rating(0.0, 0.0, 1.0, RatingStrategy::LowerBetter), 1.0);
        assert_eq!(rating(1.0, 0.0, 1.0, RatingStrategy::LowerBetter), 0.0);
        assert!((rating(0.25, 0.0, 1.0, RatingStrategy::LowerBetter) - 0.75).abs() < 1e-12);
        // 越界被截断
        assert_eq!(rating(5.0, 0.0, 1.0, RatingStrategy::LowerBetter), 0.0);
    }

    #[test]
    fn test_balanced() {
        let strategy = RatingStrategy::Balanced { range_min: 0.4, range_max: 0.6 };
        assert_eq!(rating(0.5, 0.0, 1.0, strategy), 1.0);
        assert_eq!(rating(0.6, 0.0, 1.0, strategy), 1.0);
        // 区间外 0.1 → 罚 0.2
        assert!((rating(0.7, 0.0, 1.0, strategy) - 0.8).abs() < 1e-12);
        assert!((rating(0.3, 0.0, 1.0, strategy) - 0.8).abs() < 1e-12);
        assert_eq!(rating(1.0, 0.0, 1.0, RatingStrategy::Balanced { range_min: 0.0, range_max: 0.2 }), 0.0);
    }

    #[test]
    fn test_categories() {
        assert_eq!(RatingCategory::from_rating(0.95), RatingCategory::Excellent);
        assert_eq!(RatingCategory::from_rating(0.5), RatingCategory::Average);
        assert_eq!(RatingCategory::from_rating(0.1), RatingCategory::Poor);
        assert_eq!(RatingCategory::Good.color(), "lime");

        let display = rate_for_display(0.2, 0.0, 1.0, RatingStrategy::HigherBetter);
        assert_eq!(display.category, RatingCategory::Poor);
    }
}
