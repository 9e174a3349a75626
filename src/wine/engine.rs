// 平衡规则引擎
// 对六维特性向量求值惩罚/协同规则，得到每个特性的缩放乘数、协同折减与调整后区间
//
// 叠加顺序：
//   惩罚：同一目标上的多条规则按 (1 + effect) 连乘
//   协同：同一目标上的多条规则求和，每条各自受 cap 约束，总和不做全局截断；
//         最终距离使用 max(0, 1 - reduction)

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use super::characteristics::{
    BalanceRange, BalanceRanges, Characteristic, CharacteristicMap, WineCharacteristics,
};
use super::rules::{RangeAdjustment, Rule, RuleKind};
use crate::core::error::{Result, WineryError};
use crate::core::math::{clamp01, constants::EPSILON};

// 区间外偏移的加权系数
pub const OUTSIDE_PENALTY_WEIGHT: f64 = 2.0;

// 单个来源特性对所有目标区间的联动斜率之和上限
// 目标距离对区间平移的斜率至多 1 + OUTSIDE_PENALTY_WEIGHT，来源向中点靠近时自身距离斜率为 1，
// 斜率和不超过该值时向中点移动不会因联动而降低平衡分
pub const MAX_ADJUSTMENT_SLOPE: f64 = 1.0 / (1.0 + OUTSIDE_PENALTY_WEIGHT);

// 协同完全抵消距离时区间的最大放大倍数
const MAX_RANGE_EXPANSION: f64 = 1.0e6;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RuleOptions {
    // 只报告会触发的规则，返回未调整的区间
    pub dry_run: bool,
    pub want_breakdown: bool,
}

// 单条规则的求值记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleEvaluation {
    pub name: String,
    pub kind: RuleKind,
    pub sources: Vec<Characteristic>,
    pub targets: Vec<Characteristic>,
    pub avg_deviation: f64,
    pub raw_effect: f64,
    pub capped_effect: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RuleEffect {
    pub total_scaling_multiplier: f64,
    pub synergy_reduction: f64,
}

impl Default for RuleEffect {
    fn default() -> Self {
        Self { total_scaling_multiplier: 1.0, synergy_reduction: 0.0 }
    }
}

impl RuleEffect {
    // 距离的净缩放系数
    pub fn net_scale(&self) -> f64 {
        self.total_scaling_multiplier * (1.0 - self.synergy_reduction).max(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulesOutcome {
    pub adjusted_ranges: BalanceRanges,
    pub effects: CharacteristicMap<RuleEffect>,
    pub detailed_breakdown: Option<Vec<RuleEvaluation>>,
    pub synergy_breakdown: Option<Vec<RuleEvaluation>>,
}

// 距离分量
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceComponents {
    pub distance_inside: f64,
    pub distance_outside: f64,
    pub penalty: f64,
    pub base_total_distance: f64,
}

pub fn distance_components(value: f64, range: &BalanceRange) -> DistanceComponents {
    let value = clamp01(value);
    let distance_inside = range.distance_inside(value);
    let distance_outside = range.distance_outside(value);
    let penalty = OUTSIDE_PENALTY_WEIGHT * distance_outside;
    DistanceComponents {
        distance_inside,
        distance_outside,
        penalty,
        base_total_distance: distance_inside + penalty,
    }
}

// effect = min(cap, k · avg^p)；avg 为 0 时恒为 0
pub fn rule_effect(k: f64, p: f64, cap: f64, avg_deviation: f64) -> (f64, f64) {
    if avg_deviation.is_nan() || avg_deviation <= 0.0 {
        return (0.0, 0.0);
    }
    let raw = k * avg_deviation.powf(p);
    let raw = if raw.is_nan() { 0.0 } else { raw.max(0.0) };
    (raw, raw.min(cap.max(0.0)))
}

// 惩罚规则用来源特性的区间外距离，协同规则用距中点距离
fn average_deviation(rule: &Rule, characteristics: &WineCharacteristics, ranges: &BalanceRanges) -> f64 {
    if rule.sources.is_empty() {
        return 0.0;
    }
    let total: f64 = rule
        .sources
        .iter()
        .map(|&c| {
            let value = clamp01(characteristics[c]);
            match rule.kind {
                RuleKind::Penalty => ranges[c].distance_outside(value),
                RuleKind::Synergy => ranges[c].distance_inside(value),
            }
        })
        .sum();
    total / rule.sources.len() as f64
}

// 联动表属于配置，加载时校验
pub fn validate_range_adjustments(adjustments: &[RangeAdjustment]) -> Result<()> {
    let mut slopes = CharacteristicMap::<f64>::default();
    for adjustment in adjustments {
        if !(adjustment.k.is_finite() && adjustment.cap.is_finite()) || adjustment.cap < 0.0 {
            return Err(WineryError::ConfigError(format!(
                "联动 {} → {} 参数无效: k={}, cap={}",
                adjustment.source, adjustment.target, adjustment.k, adjustment.cap
            )));
        }
        if adjustment.source == adjustment.target {
            return Err(WineryError::ConfigError(format!("联动不能指向自身: {}", adjustment.source)));
        }
        slopes[adjustment.source] += adjustment.k.abs();
    }
    for (source, &slope) in slopes.iter() {
        if slope > MAX_ADJUSTMENT_SLOPE + EPSILON {
            return Err(WineryError::ConfigError(format!(
                "{} 的联动斜率和 {:.4} 超过上限 {:.4}", source, slope, MAX_ADJUSTMENT_SLOPE
            )));
        }
    }
    Ok(())
}

// 每个来源的斜率缩放系数；超出上限的表按比例压回
fn slope_scales(adjustments: &[RangeAdjustment]) -> CharacteristicMap<f64> {
    let mut slopes = CharacteristicMap::<f64>::default();
    for adjustment in adjustments.iter().filter(|a| a.source != a.target) {
        slopes[adjustment.source] += adjustment.k.abs();
    }
    slopes.map(|c, &slope| {
        if slope > MAX_ADJUSTMENT_SLOPE {
            debug!("{} 联动斜率和 {:.4} 超过上限，按比例缩放", c, slope);
            MAX_ADJUSTMENT_SLOPE / slope
        } else {
            1.0
        }
    })
}

// 区间联动：按来源特性相对基础中点的偏移平移目标区间
// 沿来源值到中点的方向移动来源特性时平衡分不降（不跨过中点）
pub fn apply_range_adjustments(
    characteristics: &WineCharacteristics,
    base_ranges: &BalanceRanges,
    adjustments: &[RangeAdjustment],
) -> BalanceRanges {
    let scales = slope_scales(adjustments);
    let mut shifts = CharacteristicMap::<f64>::default();
    for adjustment in adjustments {
        if adjustment.source == adjustment.target {
            continue;
        }
        let deviation = clamp01(characteristics[adjustment.source]) - base_ranges[adjustment.source].midpoint();
        let cap = adjustment.cap.abs();
        let k = adjustment.k * scales[adjustment.source];
        let shift = (k * deviation).clamp(-cap, cap);
        shifts[adjustment.target] += shift;
    }
    base_ranges.map(|c, range| {
        let shift = shifts[c];
        if shift.abs() > EPSILON {
            trace!("区间联动 {}: 平移 {:.4}", c, shift);
            range.shifted(shift)
        } else {
            *range
        }
    })
}

pub fn calculate_rules(
    characteristics: &WineCharacteristics,
    ranges: &BalanceRanges,
    rules: &[Rule],
    options: RuleOptions,
) -> RulesOutcome {
    let mut effects = CharacteristicMap::<RuleEffect>::default();
    let mut penalty_breakdown = Vec::new();
    let mut synergy_breakdown = Vec::new();

    for rule in rules {
        if !rule.condition.evaluate(characteristics, ranges) {
            continue;
        }

        let avg_deviation = average_deviation(rule, characteristics, ranges);
        let (raw_effect, capped_effect) = rule_effect(rule.k, rule.p, rule.cap, avg_deviation);

        debug!(
            "规则触发 {} ({:?}): 平均偏差 {:.4}, 原始效果 {:.4}, 截断后 {:.4}",
            rule.name, rule.kind, avg_deviation, raw_effect, capped_effect
        );

        if !options.dry_run {
            for &target in &rule.targets {
                let effect = &mut effects[target];
                match rule.kind {
                    RuleKind::Penalty => effect.total_scaling_multiplier *= 1.0 + capped_effect,
                    RuleKind::Synergy => effect.synergy_reduction += capped_effect,
                }
            }
        }

        if options.want_breakdown {
            let evaluation = RuleEvaluation {
                name: rule.name.clone(),
                kind: rule.kind,
                sources: rule.sources.clone(),
                targets: rule.targets.clone(),
                avg_deviation,
                raw_effect,
                capped_effect,
            };
            match rule.kind {
                RuleKind::Penalty => penalty_breakdown.push(evaluation),
                RuleKind::Synergy => synergy_breakdown.push(evaluation),
            }
        }
    }

    // 显示的区间与实际计分使用同一缩放
    let adjusted_ranges = if options.dry_run {
        *ranges
    } else {
        ranges.map(|c, range| {
            let scale = effects[c].net_scale();
            let factor = if scale > EPSILON { 1.0 / scale } else { MAX_RANGE_EXPANSION };
            range.scaled_around_midpoint(factor.min(MAX_RANGE_EXPANSION))
        })
    };

    RulesOutcome {
        adjusted_ranges,
        effects,
        detailed_breakdown: options.want_breakdown.then_some(penalty_breakdown),
        synergy_breakdown: options.want_breakdown.then_some(synergy_breakdown),
    }
}
