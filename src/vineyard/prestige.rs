// 葡萄园声望计算
// 永久部分（树龄、土地、面积）+ 衰减部分（事件），合成有界声望因子

use std::collections::HashMap;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::regions::{grape_suitability, MAX_LAND_VALUE};
use super::types::Vineyard;
use crate::core::error::{ensure_finite, Result, WineryError};
use crate::core::math::{asymmetric_multiplier, clamp01, soft_capped_sqrt, squash_tail};

// 树龄因子上限，避免单靠树龄饱和
pub const MAX_AGE_FACTOR: f64 = 0.98;
// 树龄达到成熟的时间尺度（年）
const VINE_AGE_SCALE_YEARS: f64 = 15.0;
const VINE_AGE_CEILING: f64 = 0.95;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrestigeConfig {
    // 声望到因子的换算分母
    pub divisor: f64,
    // 因子上限，永远小于 1
    pub max_factor: f64,
}

impl Default for PrestigeConfig {
    fn default() -> Self {
        Self { divisor: 500.0, max_factor: 0.99 }
    }
}

impl PrestigeConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.divisor.is_finite() && self.divisor > 0.0) {
            return Err(WineryError::ConfigError(format!("声望分母必须为正: {}", self.divisor)));
        }
        if !(0.0..1.0).contains(&self.max_factor) {
            return Err(WineryError::ConfigError(format!(
                "声望因子上限必须在 [0, 1) 内: {}", self.max_factor
            )));
        }
        Ok(())
    }
}

// 树龄 → [0, 0.95)，单调递增
pub fn vine_age_modifier(age_years: f64) -> f64 {
    if !age_years.is_finite() || age_years <= 0.0 {
        return 0.0;
    }
    VINE_AGE_CEILING * (1.0 - (-age_years / VINE_AGE_SCALE_YEARS).exp())
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrestigeFactorBreakdown {
    pub age_scaled: f64,
    pub land_per_ha: f64,
    pub size_factor: f64,
    pub land_scaled: f64,
    pub permanent_raw: f64,
    pub decaying_component: f64,
    pub combined_raw: f64,
    pub bounded_factor: f64,
}

pub fn bounded_vineyard_prestige_factor(
    vineyard: &Vineyard,
    current_prestige: f64,
) -> Result<PrestigeFactorBreakdown> {
    bounded_vineyard_prestige_factor_with(vineyard, current_prestige, &PrestigeConfig::default())
}

pub fn bounded_vineyard_prestige_factor_with(
    vineyard: &Vineyard,
    current_prestige: f64,
    config: &PrestigeConfig,
) -> Result<PrestigeFactorBreakdown> {
    vineyard.validate()?;
    let current_prestige = ensure_finite(current_prestige, "current_prestige")?;

    // 未种植时土地按自身计，树龄为 0
    let suitability = match vineyard.grape {
        Some(grape) => grape_suitability(vineyard.country, &vineyard.region, grape)?,
        None => 1.0,
    };

    let age = vineyard.vine_age.unwrap_or(0.0);
    let age01 = (vine_age_modifier(age) * suitability).min(MAX_AGE_FACTOR);
    let age_scaled = asymmetric_multiplier(age01) - 1.0;

    let land01 = clamp01(vineyard.land_value / MAX_LAND_VALUE) * suitability;
    let land_per_ha = asymmetric_multiplier(squash_tail(land01)) - 1.0;

    let size_factor = soft_capped_sqrt(vineyard.hectares);
    let land_scaled = land_per_ha * size_factor;
    let permanent_raw = age_scaled + land_scaled;

    let decaying_component = (current_prestige - permanent_raw).max(0.0);
    let combined_raw = permanent_raw + decaying_component;
    let bounded_factor = (combined_raw / config.divisor).clamp(0.0, config.max_factor);

    debug!(
        "葡萄园 {} 声望: 永久 {:.3}, 衰减 {:.3}, 因子 {:.4}",
        vineyard.id, permanent_raw, decaying_component, bounded_factor
    );

    Ok(PrestigeFactorBreakdown {
        age_scaled,
        land_per_ha,
        size_factor,
        land_scaled,
        permanent_raw,
        decaying_component,
        combined_raw,
        bounded_factor,
    })
}

// 按 id 查找葡萄园与其声望；任一缺失都直接失败
pub fn prestige_factor_for(
    vineyard_id: &str,
    vineyards: &[Vineyard],
    breakdown: &PrestigeBreakdown,
    config: &PrestigeConfig,
) -> Result<PrestigeFactorBreakdown> {
    let vineyard = vineyards
        .iter()
        .find(|v| v.id == vineyard_id)
        .ok_or_else(|| WineryError::MissingData(format!("找不到葡萄园: {}", vineyard_id)))?;
    let current = breakdown
        .vineyards
        .get(vineyard_id)
        .copied()
        .ok_or_else(|| WineryError::MissingData(format!("葡萄园 {} 没有声望记录", vineyard_id)))?;
    bounded_vineyard_prestige_factor_with(vineyard, current, config)
}

// 用账本声望刷新每个葡萄园的声望因子，品质计算读取刷新后的字段
pub fn refresh_vineyard_prestige(
    vineyards: &mut [Vineyard],
    breakdown: &PrestigeBreakdown,
    config: &PrestigeConfig,
) -> Result<Vec<PrestigeFactorBreakdown>> {
    let snapshot: &[Vineyard] = vineyards;
    let factors = snapshot
        .iter()
        .map(|v| prestige_factor_for(&v.id, snapshot, breakdown, config))
        .collect::<Result<Vec<_>>>()?;
    for (vineyard, factor) in vineyards.iter_mut().zip(&factors) {
        vineyard.vineyard_prestige = factor.bounded_factor;
    }
    Ok(factors)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrestigeEventType {
    // 永久
    VineyardAge,
    VineyardLand,
    // 衰减
    Sale,
    Contract,
    Achievement,
    Penalty,
}

impl PrestigeEventType {
    pub fn is_permanent(&self) -> bool {
        matches!(self, PrestigeEventType::VineyardAge | PrestigeEventType::VineyardLand)
    }

    // 每周保留比例
    pub fn default_decay_rate(&self) -> f64 {
        match self {
            PrestigeEventType::VineyardAge | PrestigeEventType::VineyardLand => 1.0,
            PrestigeEventType::Sale => 0.95,
            PrestigeEventType::Contract => 0.97,
            PrestigeEventType::Achievement => 0.99,
            PrestigeEventType::Penalty => 0.9,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrestigeEvent {
    pub event_type: PrestigeEventType,
    pub amount: f64,
    pub original_amount: f64,
    pub current_amount: f64,
    pub decay_rate: f64,
    // 绝对周数
    pub timestamp: u32,
    // 葡萄园 id；None 表示公司级
    pub source_id: Option<String>,
}

impl PrestigeEvent {
    pub fn new(event_type: PrestigeEventType, amount: f64, timestamp: u32, source_id: Option<String>) -> Self {
        Self {
            event_type,
            amount,
            original_amount: amount,
            current_amount: amount,
            decay_rate: event_type.default_decay_rate(),
            timestamp,
            source_id,
        }
    }

    pub fn decayed_amount(&self, now: u32) -> f64 {
        if self.event_type.is_permanent() {
            return self.original_amount;
        }
        let weeks = now.saturating_sub(self.timestamp);
        let rate = self.decay_rate.clamp(0.0, 1.0);
        self.original_amount * rate.powi(weeks.min(i32::MAX as u32) as i32)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrestigeBreakdown {
    pub company: f64,
    pub vineyards: HashMap<String, f64>,
}

impl PrestigeBreakdown {
    pub fn total(&self) -> f64 {
        self.company + self.vineyards.values().sum::<f64>()
    }
}

// 只追加的声望事件日志，衰减在读取时计算
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrestigeLedger {
    events: Vec<PrestigeEvent>,
}

impl PrestigeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: PrestigeEvent) -> Result<()> {
        ensure_finite(event.original_amount, "prestige amount")?;
        if !(0.0..=1.0).contains(&event.decay_rate) {
            return Err(WineryError::InvalidInput(format!("衰减率超出 [0, 1]: {}", event.decay_rate)));
        }
        self.events.push(event);
        Ok(())
    }

    pub fn events(&self) -> &[PrestigeEvent] {
        &self.events
    }

    // 当前时刻的衰减快照，不修改日志
    pub fn snapshot(&self, now: u32) -> Vec<PrestigeEvent> {
        self.events
            .iter()
            .map(|event| PrestigeEvent { current_amount: event.decayed_amount(now), ..event.clone() })
            .collect()
    }

    // 每个已知葡萄园都有条目（无事件为 0）
    pub fn breakdown(&self, now: u32, vineyards: &[Vineyard]) -> PrestigeBreakdown {
        let mut result = PrestigeBreakdown {
            company: 0.0,
            vineyards: vineyards.iter().map(|v| (v.id.clone(), 0.0)).collect(),
        };

        for event in &self.events {
            let amount = event.decayed_amount(now);
            match &event.source_id {
                Some(id) => match result.vineyards.get_mut(id) {
                    Some(total) => *total += amount,
                    None => {
                        warn!("声望事件指向未知葡萄园 {}，计入公司声望", id);
                        result.company += amount;
                    }
                },
                None => result.company += amount,
            }
        }
        result
    }
}
