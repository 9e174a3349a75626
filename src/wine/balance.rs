// 葡萄酒平衡计算器
// 区间联动 → 规则引擎 → 距离公式 → 0-1 平衡分

use log::debug;
use serde::{Deserialize, Serialize};

use super::characteristics::{BalanceRanges, CharacteristicMap, WineCharacteristics, BASE_BALANCED_RANGES};
use super::engine::{
    apply_range_adjustments, calculate_rules, distance_components, RuleEvaluation, RuleOptions,
};
use super::rules::{RangeAdjustment, Rule, RANGE_ADJUSTMENTS, RULES};
use crate::core::math::clamp01;

// 平均距离到分数的放大系数：平均距离 0.5 时分数已为 0
pub const BALANCE_DISTANCE_WEIGHT: f64 = 2.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WineBalanceResult {
    pub score: f64,
    pub adjusted_ranges: BalanceRanges,
}

// 单个特性的诊断记录
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CharacteristicBreakdown {
    pub value: f64,
    pub distance_inside: f64,
    pub distance_outside: f64,
    pub penalty: f64,
    pub base_total_distance: f64,
    pub total_scaling_multiplier: f64,
    pub synergy_reduction: f64,
    pub final_total_distance: f64,
}

// 完整报告：分数 + 区间 + 每个特性 + 触发的规则
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceReport {
    pub score: f64,
    pub shifted_ranges: BalanceRanges,
    pub adjusted_ranges: BalanceRanges,
    pub characteristics: CharacteristicMap<CharacteristicBreakdown>,
    pub penalties: Vec<RuleEvaluation>,
    pub synergies: Vec<RuleEvaluation>,
}

pub fn evaluate_balance(
    characteristics: &WineCharacteristics,
    base_ranges: &BalanceRanges,
    range_adjustments: &[RangeAdjustment],
    rules: &[Rule],
) -> BalanceReport {
    let characteristics = characteristics.clamped();
    let shifted_ranges = apply_range_adjustments(&characteristics, base_ranges, range_adjustments);
    let outcome = calculate_rules(
        &characteristics,
        &shifted_ranges,
        rules,
        RuleOptions { dry_run: false, want_breakdown: true },
    );

    let breakdown = shifted_ranges.map(|c, range| {
        let value = characteristics[c];
        let distances = distance_components(value, range);
        let effect = outcome.effects[c];
        CharacteristicBreakdown {
            value,
            distance_inside: distances.distance_inside,
            distance_outside: distances.distance_outside,
            penalty: distances.penalty,
            base_total_distance: distances.base_total_distance,
            total_scaling_multiplier: effect.total_scaling_multiplier,
            synergy_reduction: effect.synergy_reduction,
            final_total_distance: distances.base_total_distance * effect.net_scale(),
        }
    });

    let total: f64 = breakdown.iter().map(|(_, b)| b.final_total_distance).sum();
    let average_distance = total / 6.0;
    let score = clamp01(1.0 - BALANCE_DISTANCE_WEIGHT * average_distance);

    debug!("平衡评估: 平均距离 {:.4}, 分数 {:.4}", average_distance, score);

    BalanceReport {
        score,
        shifted_ranges,
        adjusted_ranges: outcome.adjusted_ranges,
        characteristics: breakdown,
        penalties: outcome.detailed_breakdown.unwrap_or_default(),
        synergies: outcome.synergy_breakdown.unwrap_or_default(),
    }
}

pub fn calculate_wine_balance(
    characteristics: &WineCharacteristics,
    base_ranges: &BalanceRanges,
    range_adjustments: &[RangeAdjustment],
    rules: &[Rule],
) -> WineBalanceResult {
    let report = evaluate_balance(characteristics, base_ranges, range_adjustments, rules);
    WineBalanceResult {
        score: report.score,
        adjusted_ranges: report.adjusted_ranges,
    }
}

pub fn calculate_characteristic_breakdown(
    characteristics: &WineCharacteristics,
    base_ranges: &BalanceRanges,
    range_adjustments: &[RangeAdjustment],
    rules: &[Rule],
) -> CharacteristicMap<CharacteristicBreakdown> {
    evaluate_balance(characteristics, base_ranges, range_adjustments, rules).characteristics
}

// 使用内置区间表、联动表和规则表
pub fn calculate_wine_balance_default(characteristics: &WineCharacteristics) -> WineBalanceResult {
    calculate_wine_balance(characteristics, &BASE_BALANCED_RANGES, &RANGE_ADJUSTMENTS, &RULES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wine::characteristics::Characteristic;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_wine(rng: &mut StdRng) -> WineCharacteristics {
        WineCharacteristics::from_fn(|_| rng.gen_range(-0.2..1.2))
    }

    #[test]
    fn test_perfectly_centered_wine_scores_one() {
        let wine = BASE_BALANCED_RANGES.map(|_, r| r.midpoint());
        let result = calculate_wine_balance(&wine, &BASE_BALANCED_RANGES, &[], &RULES);
        assert!((result.score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_extreme_wine_scores_zero() {
        let wine = WineCharacteristics::new(1.0, 0.0, 0.0, 1.0, 1.0, 1.0);
        let result = calculate_wine_balance_default(&wine);
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn test_score_bounds_and_idempotence() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            let wine = random_wine(&mut rng);
            let first = calculate_wine_balance_default(&wine);
            let second = calculate_wine_balance_default(&wine);
            assert!((0.0..=1.0).contains(&first.score));
            assert_eq!(first, second);
            for (_, range) in first.adjusted_ranges.iter() {
                assert!(range.min <= range.max);
                assert!(range.min >= 0.0 && range.max <= 1.0);
            }
        }
    }

    #[test]
    fn test_centering_monotonicity_without_rules() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let wine = random_wine(&mut rng).clamped();
            for c in Characteristic::ALL {
                let mid = BASE_BALANCED_RANGES[c].midpoint();
                let closer = wine.with(c, wine[c] + (mid - wine[c]) * 0.5);
                let before = calculate_wine_balance(&wine, &BASE_BALANCED_RANGES, &[], &[]).score;
                let after = calculate_wine_balance(&closer, &BASE_BALANCED_RANGES, &[], &[]).score;
                assert!(after >= before - 1e-12, "{} moved closer but score dropped", c);
            }
        }
    }

    #[test]
    fn test_centering_monotonicity_with_range_adjustments() {
        // 酸度向自身调整后中点移动会拖动甜度区间，总分仍不能下降
        let wine = WineCharacteristics::uniform(0.5)
            .with(Characteristic::Acidity, 0.6)
            .with(Characteristic::Sweetness, 0.65);
        let closer = wine.with(Characteristic::Acidity, 0.55);
        let before = calculate_wine_balance(&wine, &BASE_BALANCED_RANGES, &RANGE_ADJUSTMENTS, &[]).score;
        let after = calculate_wine_balance(&closer, &BASE_BALANCED_RANGES, &RANGE_ADJUSTMENTS, &[]).score;
        assert!(after >= before - 1e-12);

        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let wine = random_wine(&mut rng).clamped();
            for c in Characteristic::ALL {
                // 自身区间只受其他特性影响，移动 c 时中点不变
                let report = evaluate_balance(&wine, &BASE_BALANCED_RANGES, &RANGE_ADJUSTMENTS, &[]);
                let mid = report.shifted_ranges[c].midpoint();
                let mut previous = report.score;
                for step in 1..=4 {
                    let moved = wine.with(c, wine[c] + (mid - wine[c]) * step as f64 / 4.0);
                    let score = calculate_wine_balance(&moved, &BASE_BALANCED_RANGES, &RANGE_ADJUSTMENTS, &[]).score;
                    assert!(score >= previous - 1e-12, "{} step {} dropped {} -> {}", c, step, previous, score);
                    previous = score;
                }
            }
        }
    }

    #[test]
    fn test_breakdown_matches_formula() {
        let wine = WineCharacteristics::uniform(0.5).with(Characteristic::Body, 0.9);
        let breakdown = calculate_characteristic_breakdown(&wine, &BASE_BALANCED_RANGES, &[], &[]);
        let body = breakdown.body;
        assert!((body.distance_inside - 0.3).abs() < 1e-9);
        assert!((body.distance_outside - 0.1).abs() < 1e-9);
        assert!((body.penalty - 0.2).abs() < 1e-9);
        assert!((body.base_total_distance - 0.5).abs() < 1e-9);
        assert_eq!(body.total_scaling_multiplier, 1.0);
        assert!((body.final_total_distance - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_score_is_mean_based() {
        // 只有酒体偏离：平均距离 = (0.5 + 0.1 + 0 + ...)/6
        let wine = WineCharacteristics::uniform(0.5).with(Characteristic::Body, 0.9);
        let result = calculate_wine_balance(&wine, &BASE_BALANCED_RANGES, &[], &[]);
        let breakdown = calculate_characteristic_breakdown(&wine, &BASE_BALANCED_RANGES, &[], &[]);
        let mean = breakdown.iter().map(|(_, b)| b.final_total_distance).sum::<f64>() / 6.0;
        assert!((result.score - (1.0 - 2.0 * mean)).abs() < 1e-12);
    }

    #[test]
    fn test_penalty_rule_lowers_score() {
        let wine = WineCharacteristics::uniform(0.5)
            .with(Characteristic::Sweetness, 0.75)
            .with(Characteristic::Acidity, 0.3);
        let with_rules = calculate_wine_balance(&wine, &BASE_BALANCED_RANGES, &[], &RULES).score;
        let without_rules = calculate_wine_balance(&wine, &BASE_BALANCED_RANGES, &[], &[]).score;
        assert!(with_rules < without_rules);
    }

    #[test]
    fn test_out_of_domain_values_are_clamped() {
        let wild = WineCharacteristics::new(3.0, -1.0, 0.5, 0.5, 0.5, 0.5);
        let tame = WineCharacteristics::new(1.0, 0.0, 0.5, 0.5, 0.5, 0.5);
        assert_eq!(calculate_wine_balance_default(&wild), calculate_wine_balance_default(&tame));
    }
}
