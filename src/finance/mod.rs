// 财务模块 - 经济周期、贷款、工资、股价估值

pub mod economy;
pub mod loans;
pub mod wage;
pub mod valuation;

pub use economy::{EconomyPhase, LenderType, ECONOMY_EXPECTATION_MULTIPLIERS};
pub use loans::{calculate_credit_rating_modifier, calculate_effective_interest_rate, calculate_seasonal_payment};
pub use wage::{calculate_wage, StaffSkills};
pub use valuation::{
    anchor_factor, evaluate_share_valuation, next_share_price, DownsideCap, FinancialMetrics, Metric,
    ShareValuationBreakdown, ShareValuationState, ValuationConfig,
};
