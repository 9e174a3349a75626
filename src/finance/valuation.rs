// 股价增量估值模型
// 财务指标相对经济调整后期望的偏差 → 价格增量，锚定价格阻尼 + 相对下限

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::economy::EconomyPhase;
use crate::core::error::{ensure_finite, Result, WineryError};
use crate::core::math::constants::EPSILON;

// 负向偏差的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum DownsideCap {
    Unbounded,
    // 偏差比率下限（负数）
    Floor(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    EarningsPerShare,
    RevenuePerShare,
    DividendPerShare,
    RevenueGrowth,
    ProfitMargin,
    CreditRating,
    FixedAssetRatio,
    Prestige,
}

impl Metric {
    pub const ALL: [Metric; 8] = [
        Metric::EarningsPerShare,
        Metric::RevenuePerShare,
        Metric::DividendPerShare,
        Metric::RevenueGrowth,
        Metric::ProfitMargin,
        Metric::CreditRating,
        Metric::FixedAssetRatio,
        Metric::Prestige,
    ];
}

// 八项指标；实际值、基准期望、单项调整额共用此结构
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FinancialMetrics {
    pub earnings_per_share: f64,
    pub revenue_per_share: f64,
    pub dividend_per_share: f64,
    pub revenue_growth: f64,
    pub profit_margin: f64,
    pub credit_rating: f64,
    pub fixed_asset_ratio: f64,
    pub prestige: f64,
}

impl FinancialMetrics {
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::EarningsPerShare => self.earnings_per_share,
            Metric::RevenuePerShare => self.revenue_per_share,
            Metric::DividendPerShare => self.dividend_per_share,
            Metric::RevenueGrowth => self.revenue_growth,
            Metric::ProfitMargin => self.profit_margin,
            Metric::CreditRating => self.credit_rating,
            Metric::FixedAssetRatio => self.fixed_asset_ratio,
            Metric::Prestige => self.prestige,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValuationConfig {
    // 正向偏差比率上限
    pub max_ratio: f64,
    pub downside: DownsideCap,
    // 每项指标满偏差时的价格调整额（货币单位）
    pub base_adjustments: FinancialMetrics,
    pub anchor_strength: f64,
    pub anchor_exponent: f64,
    pub min_price_ratio_to_anchor: f64,
    // 锚定价格每期向新价格靠拢的比例
    pub anchor_drift: f64,
    pub adjustment_increment: f64,
    pub min_adjustment: f64,
    pub max_adjustment: f64,
    pub base_market_cap: f64,
    // 市值每增加一个数量级，营收增长要求增加的幅度
    pub market_cap_rate_per_decade: f64,
    pub market_cap_max_rate: f64,
}

impl Default for ValuationConfig {
    fn default() -> Self {
        Self {
            max_ratio: 1.0,
            downside: DownsideCap::Floor(-1.0),
            base_adjustments: FinancialMetrics {
                earnings_per_share: 0.5,
                revenue_per_share: 0.3,
                dividend_per_share: 0.2,
                revenue_growth: 0.4,
                profit_margin: 0.3,
                credit_rating: 0.2,
                fixed_asset_ratio: 0.1,
                prestige: 0.3,
            },
            anchor_strength: 2.0,
            anchor_exponent: 1.5,
            min_price_ratio_to_anchor: 0.1,
            anchor_drift: 0.02,
            adjustment_increment: 0.01,
            min_adjustment: 0.3,
            max_adjustment: 0.5,
            base_market_cap: 1_000_000.0,
            market_cap_rate_per_decade: 0.02,
            market_cap_max_rate: 0.05,
        }
    }
}

impl ValuationConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.max_ratio > 0.0) {
            return Err(WineryError::ConfigError("max_ratio 必须为正".to_string()));
        }
        if let DownsideCap::Floor(floor) = self.downside {
            if !(floor < 0.0) {
                return Err(WineryError::ConfigError(format!("下行下限必须为负: {}", floor)));
            }
        }
        if !(self.anchor_strength > 0.0 && self.anchor_exponent > 0.0) {
            return Err(WineryError::ConfigError("锚定强度与指数必须为正".to_string()));
        }
        if !(0.0..1.0).contains(&self.min_price_ratio_to_anchor) || !(0.0..=1.0).contains(&self.anchor_drift) {
            return Err(WineryError::ConfigError("价格下限比例或锚定漂移超出范围".to_string()));
        }
        if !(0.0..1.0).contains(&self.min_adjustment) || self.max_adjustment < 0.0 {
            return Err(WineryError::ConfigError("增长趋势边界无效".to_string()));
        }
        if !(self.base_market_cap > 0.0) {
            return Err(WineryError::ConfigError("基准市值必须为正".to_string()));
        }
        Ok(())
    }

    pub fn trend_bounds(&self) -> (f64, f64) {
        (1.0 - self.min_adjustment, 1.0 + self.max_adjustment)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShareValuationState {
    pub current_price: f64,
    pub anchor_price: f64,
    pub growth_trend_multiplier: f64,
    pub shares_outstanding: f64,
}

impl ShareValuationState {
    pub fn new(initial_price: f64, shares_outstanding: f64) -> Self {
        Self {
            current_price: initial_price,
            anchor_price: initial_price,
            growth_trend_multiplier: 1.0,
            shares_outstanding,
        }
    }

    pub fn market_cap(&self) -> f64 {
        self.current_price * self.shares_outstanding
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricContribution {
    pub metric: Metric,
    pub actual: f64,
    pub expected: f64,
    pub delta_percent: f64,
    pub delta_ratio: f64,
    pub contribution: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareValuationBreakdown {
    pub contributions: Vec<MetricContribution>,
    pub revenue_growth_requirement: f64,
    pub total_contribution: f64,
    pub anchor_deviation: f64,
    pub anchor_factor: f64,
    pub adjustment: f64,
    pub new_price: f64,
    // 触发相对下限
    pub floored: bool,
    pub next_state: ShareValuationState,
}

// 1 / (1 + s·dev^e)，dev = |p − a| / a
pub fn anchor_factor(price: f64, anchor_price: f64, strength: f64, exponent: f64) -> f64 {
    if anchor_price <= 0.0 {
        return 1.0;
    }
    let deviation = (price - anchor_price).abs() / anchor_price;
    1.0 / (1.0 + strength * deviation.powf(exponent))
}

// 上行截断于 max_ratio；下行视配置
pub fn delta_ratio(actual: f64, expected: f64, max_ratio: f64, downside: DownsideCap) -> f64 {
    if expected.abs() < EPSILON {
        return 0.0;
    }
    let ratio = ((actual - expected) / expected.abs()).min(max_ratio);
    match downside {
        DownsideCap::Unbounded => ratio,
        DownsideCap::Floor(floor) => ratio.max(floor),
    }
}

// 市值越大，要求的营收增长越高
pub fn market_cap_requirement(market_cap: f64, config: &ValuationConfig) -> f64 {
    if !(market_cap > 0.0) {
        return 0.0;
    }
    let log_ratio = (market_cap / config.base_market_cap).log10();
    (log_ratio * config.market_cap_rate_per_decade)
        .clamp(-config.market_cap_max_rate, config.market_cap_max_rate)
}

pub fn evaluate_share_valuation(
    state: &ShareValuationState,
    actuals: &FinancialMetrics,
    expectations: &FinancialMetrics,
    phase: EconomyPhase,
    config: &ValuationConfig,
) -> Result<ShareValuationBreakdown> {
    let current_price = ensure_finite(state.current_price, "current_price")?;
    let anchor_price = ensure_finite(state.anchor_price, "anchor_price")?;
    if anchor_price <= 0.0 {
        return Err(WineryError::InvalidInput(format!("锚定价格必须为正: {}", anchor_price)));
    }

    let economy = phase.expectation_multiplier();
    let requirement = market_cap_requirement(state.market_cap(), config);

    let mut contributions = Vec::with_capacity(Metric::ALL.len());
    for metric in Metric::ALL {
        let actual = ensure_finite(actuals.get(metric), "actual metric")?;
        let mut expected = expectations.get(metric) * economy * state.growth_trend_multiplier;
        if metric == Metric::RevenueGrowth {
            expected += requirement;
        }
        if expected.abs() < EPSILON {
            warn!("指标 {:?} 期望值为 0，跳过", metric);
        }

        // 诊断用原始偏差，截断前
        let delta_percent =
            if expected.abs() < EPSILON { 0.0 } else { (actual - expected) / expected.abs() * 100.0 };
        let ratio = delta_ratio(actual, expected, config.max_ratio, config.downside);
        contributions.push(MetricContribution {
            metric,
            actual,
            expected,
            delta_percent,
            delta_ratio: ratio,
            contribution: ratio * config.base_adjustments.get(metric),
        });
    }

    let total_contribution: f64 = contributions.iter().map(|c| c.contribution).sum();
    let anchor_deviation = (current_price - anchor_price).abs() / anchor_price;
    let factor = anchor_factor(current_price, anchor_price, config.anchor_strength, config.anchor_exponent);
    let adjustment = total_contribution * factor;

    let floor = anchor_price * config.min_price_ratio_to_anchor;
    let candidate = current_price + adjustment;
    let floored = candidate < floor;
    let new_price = candidate.max(floor);

    let (trend_min, trend_max) = config.trend_bounds();
    let trend_step = if total_contribution > 0.0 {
        config.adjustment_increment
    } else if total_contribution < 0.0 {
        -config.adjustment_increment
    } else {
        0.0
    };
    let growth_trend_multiplier = (state.growth_trend_multiplier + trend_step).clamp(trend_min, trend_max);

    let next_state = ShareValuationState {
        current_price: new_price,
        anchor_price: anchor_price + (new_price - anchor_price) * config.anchor_drift,
        growth_trend_multiplier,
        shares_outstanding: state.shares_outstanding,
    };

    debug!(
        "股价: {:.2} → {:.2} (贡献 {:.4}, 锚定因子 {:.4}, 趋势 {:.2})",
        current_price, new_price, total_contribution, factor, growth_trend_multiplier
    );

    Ok(ShareValuationBreakdown {
        contributions,
        revenue_growth_requirement: requirement,
        total_contribution,
        anchor_deviation,
        anchor_factor: factor,
        adjustment,
        new_price,
        floored,
        next_state,
    })
}

pub fn next_share_price(
    state: &ShareValuationState,
    actuals: &FinancialMetrics,
    expectations: &FinancialMetrics,
    phase: EconomyPhase,
) -> Result<f64> {
    evaluate_share_valuation(state, actuals, expectations, phase, &ValuationConfig::default())
        .map(|breakdown| breakdown.new_price)
}
