// 贷款计算 - 有效利率、季度还款、信用评级修正

use log::debug;

use super::economy::{EconomyPhase, LenderType};
use crate::core::error::{ensure_finite, Result, WineryError};
use crate::core::math::clamp01;

// 基准期限（季度），此时期限修正为 1
const BASE_DURATION_SEASONS: f64 = 4.0;
// 每多一个季度利率上浮比例
const DURATION_RATE_STEP: f64 = 0.01;
const MIN_DURATION_MODIFIER: f64 = 0.9;
const MAX_DURATION_MODIFIER: f64 = 1.5;

// 信用 0.5 为中性；越高越便宜
pub fn calculate_credit_rating_modifier(credit_rating: f64) -> f64 {
    1.5 - clamp01(credit_rating)
}

fn duration_modifier(duration_seasons: u32) -> f64 {
    let offset = duration_seasons as f64 - BASE_DURATION_SEASONS;
    (1.0 + offset * DURATION_RATE_STEP).clamp(MIN_DURATION_MODIFIER, MAX_DURATION_MODIFIER)
}

pub fn calculate_effective_interest_rate(
    base_rate: f64,
    phase: EconomyPhase,
    lender: LenderType,
    credit_rating: f64,
    duration_seasons: u32,
) -> f64 {
    let rate = base_rate
        * phase.interest_multiplier()
        * lender.rate_multiplier()
        * calculate_credit_rating_modifier(credit_rating)
        * duration_modifier(duration_seasons);
    debug!(
        "有效利率: 基准 {:.4} [{} / {:?} / 信用 {:.2} / {} 季] → {:.4}",
        base_rate, phase, lender, credit_rating, duration_seasons, rate
    );
    rate.max(0.0)
}

// 等额本息，季度利率 = 年利率 / 4
pub fn calculate_seasonal_payment(principal: f64, annual_rate: f64, seasons: u32) -> Result<f64> {
    let principal = ensure_finite(principal, "principal")?;
    let annual_rate = ensure_finite(annual_rate, "annual_rate")?;
    if seasons == 0 {
        return Err(WineryError::InvalidInput("贷款期数必须大于 0".to_string()));
    }

    let n = seasons as f64;
    let r = annual_rate / 4.0;
    if r.abs() < 1e-12 {
        return Ok(principal / n);
    }
    Ok(principal * r / (1.0 - (1.0 + r).powf(-n)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recession_costs_more_than_expansion() {
        let recession = calculate_effective_interest_rate(0.05, EconomyPhase::Recession, LenderType::Bank, 0.7, 4);
        let expansion = calculate_effective_interest_rate(0.05, EconomyPhase::Expansion, LenderType::Bank, 0.7, 4);
        assert!(recession > expansion);
    }

    #[test]
    fn test_neutral_terms_keep_base_rate() {
        let rate = calculate_effective_interest_rate(0.05, EconomyPhase::Stable, LenderType::Bank, 0.5, 4);
        assert!((rate - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_credit_modifier() {
        assert_eq!(calculate_credit_rating_modifier(0.5), 1.0);
        assert!(calculate_credit_rating_modifier(0.9) < calculate_credit_rating_modifier(0.1));
        assert_eq!(calculate_credit_rating_modifier(3.0), 0.5);
    }

    #[test]
    fn test_longer_loans_cost_more() {
        let short = calculate_effective_interest_rate(0.05, EconomyPhase::Stable, LenderType::Bank, 0.5, 4);
        let long = calculate_effective_interest_rate(0.05, EconomyPhase::Stable, LenderType::Bank, 0.5, 20);
        assert!(long > short);
    }

    #[test]
    fn test_seasonal_payment() {
        assert_eq!(calculate_seasonal_payment(1000.0, 0.0, 4).unwrap(), 250.0);

        let payment = calculate_seasonal_payment(10_000.0, 0.08, 8).unwrap();
        // 总还款大于本金
        assert!(payment * 8.0 > 10_000.0);
        assert!(payment > 1250.0 && payment < 1500.0);

        assert!(matches!(calculate_seasonal_payment(1000.0, 0.05, 0), Err(WineryError::InvalidInput(_))));
    }
}
