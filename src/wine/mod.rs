// 葡萄酒评分模块
// 特性向量 → 规则引擎 → 平衡分；品质与平衡合成综合分与估价

pub mod characteristics;
pub mod rules;
pub mod engine;
pub mod balance;
pub mod score;

pub use characteristics::{
    BalanceRange, BalanceRanges, Characteristic, CharacteristicMap, WineCharacteristics,
    BASE_BALANCED_RANGES,
};
pub use rules::{Condition, RangeAdjustment, Rule, RuleKind, RANGE_ADJUSTMENTS, RULES};
pub use engine::{
    calculate_rules, validate_range_adjustments, RuleEvaluation, RuleOptions, RulesOutcome,
    MAX_ADJUSTMENT_SLOPE,
};
pub use balance::{
    calculate_characteristic_breakdown, calculate_wine_balance, calculate_wine_balance_default,
    evaluate_balance, BalanceReport, CharacteristicBreakdown, WineBalanceResult,
};
pub use score::{calculate_estimated_price, calculate_wine_score, WineQualityTier};
