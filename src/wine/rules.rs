// 平衡规则数据
// 规则是声明式数据：来源/目标特性是类型化字段，条件是可求值的表达式树，
// 由 engine 中唯一的解释器执行

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use super::characteristics::{BalanceRanges, Characteristic, WineCharacteristics};
use crate::core::math::clamp01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleKind {
    Penalty,    // 惩罚：放大目标特性的距离
    Synergy,    // 协同：缩小目标特性的距离
}

// 规则触发条件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Condition {
    // 高于当前区间上限
    Above(Characteristic),
    // 低于当前区间下限
    Below(Characteristic),
    Within(Characteristic),
    AtLeast(Characteristic, f64),
    AtMost(Characteristic, f64),
    All(Vec<Condition>),
    Any(Vec<Condition>),
}

impl Condition {
    // 输入值先截断到 [0,1] 再参与判断
    pub fn evaluate(&self, characteristics: &WineCharacteristics, ranges: &BalanceRanges) -> bool {
        let value = |c: &Characteristic| clamp01(characteristics[*c]);
        match self {
            Condition::Above(c) => value(c) > ranges[*c].max,
            Condition::Below(c) => value(c) < ranges[*c].min,
            Condition::Within(c) => ranges[*c].contains(value(c)),
            Condition::AtLeast(c, threshold) => value(c) >= *threshold,
            Condition::AtMost(c, threshold) => value(c) <= *threshold,
            Condition::All(conditions) => conditions.iter().all(|cond| cond.evaluate(characteristics, ranges)),
            Condition::Any(conditions) => conditions.iter().any(|cond| cond.evaluate(characteristics, ranges)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub kind: RuleKind,
    pub name: String,
    pub description: String,
    // 面向玩家的文字说明，仅用于展示
    pub requirement: String,
    pub sources: Vec<Characteristic>,
    pub targets: Vec<Characteristic>,
    pub condition: Condition,
    pub k: f64,
    pub p: f64,
    pub cap: f64,
}

impl Rule {
    #[allow(clippy::too_many_arguments)]
    fn new(
        kind: RuleKind,
        name: &str,
        description: &str,
        requirement: &str,
        sources: &[Characteristic],
        targets: &[Characteristic],
        condition: Condition,
        (k, p, cap): (f64, f64, f64),
    ) -> Self {
        Self {
            kind,
            name: name.to_string(),
            description: description.to_string(),
            requirement: requirement.to_string(),
            sources: sources.to_vec(),
            targets: targets.to_vec(),
            condition,
            k,
            p,
            cap,
        }
    }
}

// 区间联动：来源特性偏离中点时平移目标特性的区间
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeAdjustment {
    pub source: Characteristic,
    pub target: Characteristic,
    pub k: f64,
    // 单条联动的最大平移量
    pub cap: f64,
}

impl RangeAdjustment {
    const fn new(source: Characteristic, target: Characteristic, k: f64, cap: f64) -> Self {
        Self { source, target, k, cap }
    }
}

use super::characteristics::Characteristic::*;

pub const RANGE_ADJUSTMENTS: [RangeAdjustment; 5] = [
    // 高酸度可以承载更高的甜度
    RangeAdjustment::new(Acidity, Sweetness, 0.3, 0.1),
    RangeAdjustment::new(Sweetness, Acidity, 0.25, 0.08),
    // 饱满酒体容纳更多单宁
    RangeAdjustment::new(Body, Tannins, 0.3, 0.1),
    RangeAdjustment::new(Tannins, Body, 0.25, 0.08),
    RangeAdjustment::new(Spice, Aroma, 0.25, 0.08),
];

lazy_static! {
    pub static ref RULES: Vec<Rule> = vec![
        // ---- 惩罚规则 ----
        Rule::new(
            RuleKind::Penalty,
            "Cloying Sweetness",
            "Sweetness without acidity to lift it tastes syrupy",
            "Sweetness above range while acidity is below range",
            &[Sweetness, Acidity],
            &[Sweetness, Acidity],
            Condition::All(vec![Condition::Above(Sweetness), Condition::Below(Acidity)]),
            (3.0, 1.0, 0.5),
        ),
        Rule::new(
            RuleKind::Penalty,
            "Harsh Tannins",
            "Heavy tannins on a thin frame feel astringent",
            "Tannins above range while body is below range",
            &[Tannins, Body],
            &[Tannins, Body],
            Condition::All(vec![Condition::Above(Tannins), Condition::Below(Body)]),
            (3.0, 1.0, 0.5),
        ),
        Rule::new(
            RuleKind::Penalty,
            "Overpowering Spice",
            "Excess spice masks the aromatic profile",
            "Spice above range",
            &[Spice],
            &[Aroma, Spice],
            Condition::Above(Spice),
            (2.5, 1.1, 0.4),
        ),
        Rule::new(
            RuleKind::Penalty,
            "Flabby Body",
            "A heavy wine without acidity feels dull",
            "Body above range while acidity is below range",
            &[Body, Acidity],
            &[Body],
            Condition::All(vec![Condition::Above(Body), Condition::Below(Acidity)]),
            (2.5, 1.0, 0.4),
        ),
        Rule::new(
            RuleKind::Penalty,
            "Astringent Structure",
            "Sharp acidity and grippy tannins amplify each other",
            "Acidity and tannins both above range",
            &[Acidity, Tannins],
            &[Acidity, Tannins],
            Condition::All(vec![Condition::Above(Acidity), Condition::Above(Tannins)]),
            (3.0, 1.2, 0.5),
        ),
        Rule::new(
            RuleKind::Penalty,
            "Muted Aroma",
            "A full body buries a weak nose",
            "Aroma below range with body at least 0.7",
            &[Aroma],
            &[Aroma, Body],
            Condition::All(vec![Condition::Below(Aroma), Condition::AtLeast(Body, 0.7)]),
            (2.0, 1.0, 0.3),
        ),
        // ---- 协同规则 ----
        Rule::new(
            RuleKind::Synergy,
            "Fresh Balance",
            "Acidity and sweetness in harmony",
            "Acidity and sweetness both within range",
            &[Acidity, Sweetness],
            &[Acidity, Sweetness],
            Condition::All(vec![Condition::Within(Acidity), Condition::Within(Sweetness)]),
            (2.0, 1.0, 0.25),
        ),
        Rule::new(
            RuleKind::Synergy,
            "Structured Red",
            "Generous body carries firm tannins",
            "Body at least 0.6, tannins at least 0.55, acidity within range",
            &[Body, Tannins],
            &[Body, Tannins],
            Condition::All(vec![
                Condition::AtLeast(Body, 0.6),
                Condition::AtLeast(Tannins, 0.55),
                Condition::Within(Acidity),
            ]),
            (2.5, 1.0, 0.3),
        ),
        Rule::new(
            RuleKind::Synergy,
            "Aromatic Spice",
            "Expressive aroma framed by measured spice",
            "Aroma and spice within range, aroma at least 0.55",
            &[Aroma, Spice],
            &[Aroma, Spice],
            Condition::All(vec![
                Condition::Within(Aroma),
                Condition::Within(Spice),
                Condition::AtLeast(Aroma, 0.55),
            ]),
            (2.0, 1.0, 0.25),
        ),
        Rule::new(
            RuleKind::Synergy,
            "Rich Dessert",
            "Sweetness balanced by acidity on a full body",
            "Sweetness and acidity at least 0.55, body at least 0.6",
            &[Sweetness, Acidity, Body],
            &[Sweetness, Body],
            Condition::All(vec![
                Condition::AtLeast(Sweetness, 0.55),
                Condition::AtLeast(Acidity, 0.55),
                Condition::AtLeast(Body, 0.6),
            ]),
            (2.0, 1.0, 0.2),
        ),
    ];
}

pub fn penalty_rules() -> impl Iterator<Item = &'static Rule> {
    RULES.iter().filter(|rule| rule.kind == RuleKind::Penalty)
}

pub fn synergy_rules() -> impl Iterator<Item = &'static Rule> {
    RULES.iter().filter(|rule| rule.kind == RuleKind::Synergy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wine::characteristics::BASE_BALANCED_RANGES;

    #[test]
    fn test_rule_table_shape() {
        assert_eq!(penalty_rules().count(), 6);
        assert_eq!(synergy_rules().count(), 4);
        for rule in RULES.iter() {
            assert!(!rule.sources.is_empty(), "{} has no sources", rule.name);
            assert!(!rule.targets.is_empty(), "{} has no targets", rule.name);
            assert!(rule.cap > 0.0 && rule.cap < 1.0);
        }
    }

    #[test]
    fn test_synergy_caps_cannot_exceed_full_reduction() {
        for c in Characteristic::ALL {
            let total: f64 = synergy_rules()
                .filter(|rule| rule.targets.contains(&c))
                .map(|rule| rule.cap)
                .sum();
            assert!(total < 1.0, "{} synergy caps sum to {}", c, total);
        }
    }

    #[test]
    fn test_condition_evaluation() {
        let wine = WineCharacteristics::uniform(0.5)
            .with(Sweetness, 0.8)
            .with(Acidity, 0.2);
        let cloying = &RULES[0];
        assert!(cloying.condition.evaluate(&wine, &BASE_BALANCED_RANGES));

        let balanced = WineCharacteristics::uniform(0.5);
        assert!(!cloying.condition.evaluate(&balanced, &BASE_BALANCED_RANGES));
    }

    #[test]
    fn test_condition_clamps_inputs() {
        let wine = WineCharacteristics::uniform(0.5).with(Spice, 7.0);
        assert!(Condition::AtMost(Spice, 1.0).evaluate(&wine, &BASE_BALANCED_RANGES));
        assert!(Condition::Any(vec![Condition::Below(Body), Condition::Above(Spice)])
            .evaluate(&wine, &BASE_BALANCED_RANGES));
    }
}
