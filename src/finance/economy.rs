// 经济周期与贷方类型表

use std::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EconomyPhase {
    Crash,
    Recession,
    Stable,
    Expansion,
    Boom,
}

impl EconomyPhase {
    pub const ALL: [EconomyPhase; 5] = [
        EconomyPhase::Crash,
        EconomyPhase::Recession,
        EconomyPhase::Stable,
        EconomyPhase::Expansion,
        EconomyPhase::Boom,
    ];

    // 财务指标期望值乘数，读自 ECONOMY_EXPECTATION_MULTIPLIERS
    pub fn expectation_multiplier(&self) -> f64 {
        ECONOMY_EXPECTATION_MULTIPLIERS[*self as usize].1
    }

    // 利率乘数，景气越差借贷越贵
    pub fn interest_multiplier(&self) -> f64 {
        match self {
            EconomyPhase::Crash => 1.5,
            EconomyPhase::Recession => 1.2,
            EconomyPhase::Stable => 1.0,
            EconomyPhase::Expansion => 0.9,
            EconomyPhase::Boom => 0.8,
        }
    }
}

impl fmt::Display for EconomyPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EconomyPhase::Crash => "Crash",
            EconomyPhase::Recession => "Recession",
            EconomyPhase::Stable => "Stable",
            EconomyPhase::Expansion => "Expansion",
            EconomyPhase::Boom => "Boom",
        };
        f.write_str(name)
    }
}

// 按 EconomyPhase::ALL 顺序
pub const ECONOMY_EXPECTATION_MULTIPLIERS: [(EconomyPhase, f64); 5] = [
    (EconomyPhase::Crash, 0.7),
    (EconomyPhase::Recession, 0.85),
    (EconomyPhase::Stable, 1.0),
    (EconomyPhase::Expansion, 1.15),
    (EconomyPhase::Boom, 1.3),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LenderType {
    Bank,
    InvestmentFund,
    PrivateLender,
}

impl LenderType {
    pub fn rate_multiplier(&self) -> f64 {
        match self {
            LenderType::Bank => 1.0,
            LenderType::InvestmentFund => 0.85,
            LenderType::PrivateLender => 1.3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expectation_multipliers_strictly_increase() {
        for pair in ECONOMY_EXPECTATION_MULTIPLIERS.windows(2) {
            assert!(pair[0].0 < pair[1].0);
            assert!(pair[0].1 < pair[1].1, "{} 应小于 {}", pair[0].0, pair[1].0);
        }
        for (index, (phase, multiplier)) in ECONOMY_EXPECTATION_MULTIPLIERS.into_iter().enumerate() {
            // 表顺序与枚举判别值一致
            assert_eq!(phase, EconomyPhase::ALL[index]);
            assert_eq!(phase.expectation_multiplier(), multiplier);
        }
    }

    #[test]
    fn test_interest_multipliers_decrease_with_growth() {
        for pair in EconomyPhase::ALL.windows(2) {
            assert!(pair[0].interest_multiplier() > pair[1].interest_multiplier());
        }
    }
}
