// 葡萄园品质因子
// 土地价值 + 葡萄园声望 (+ 产区/海拔/坡向/适宜度) 加权，再乘疏于管理与密植惩罚

use log::debug;
use serde::{Deserialize, Serialize};

use super::regions::{aspect_rating, region_data, MAX_LAND_VALUE};
use super::types::{Aspect, Country, Overgrowth, Vineyard};
use crate::core::error::{ensure_finite, Result, WineryError};
use crate::core::math::{clamp01, lerp, normalize};

// 杂草、杂物、拔除、补种每年的惩罚权重
const OVERGROWTH_WEIGHTS: [f64; 4] = [0.08, 0.05, 0.1, 0.06];
const MIN_OVERGROWTH_PENALTY: f64 = 0.3;

// 品种品质权重：土地、葡萄园声望、产区声望、海拔、坡向、适宜度
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrapeQualityWeights {
    pub land_value: f64,
    pub vineyard_prestige: f64,
    pub regional_prestige: f64,
    pub altitude: f64,
    pub aspect: f64,
    pub grape_suitability: f64,
}

impl Default for GrapeQualityWeights {
    fn default() -> Self {
        Self {
            land_value: 0.3,
            vineyard_prestige: 0.2,
            regional_prestige: 0.15,
            altitude: 0.1,
            aspect: 0.1,
            grape_suitability: 0.15,
        }
    }
}

impl GrapeQualityWeights {
    fn sum(&self) -> f64 {
        self.land_value
            + self.vineyard_prestige
            + self.regional_prestige
            + self.altitude
            + self.aspect
            + self.grape_suitability
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityConfig {
    pub land_weight: f64,
    pub prestige_weight: f64,
    // 每公顷株数：此前无惩罚，此后线性增加
    pub optimal_density: f64,
    pub max_density: f64,
    pub max_density_reduction: f64,
    pub grape_weights: GrapeQualityWeights,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            land_weight: 0.6,
            prestige_weight: 0.4,
            optimal_density: 1500.0,
            max_density: 15000.0,
            max_density_reduction: 0.5,
            grape_weights: GrapeQualityWeights::default(),
        }
    }
}

impl QualityConfig {
    pub fn validate(&self) -> Result<()> {
        if (self.land_weight + self.prestige_weight - 1.0).abs() > 1e-6 {
            return Err(WineryError::ConfigError("土地与声望权重之和必须为 1".to_string()));
        }
        if (self.grape_weights.sum() - 1.0).abs() > 1e-6 {
            return Err(WineryError::ConfigError("品种品质权重之和必须为 1".to_string()));
        }
        if self.optimal_density >= self.max_density {
            return Err(WineryError::ConfigError(format!(
                "种植密度区间无效: {} - {}", self.optimal_density, self.max_density
            )));
        }
        if !(0.0..1.0).contains(&self.max_density_reduction) {
            return Err(WineryError::ConfigError("密植最大惩罚必须在 [0, 1) 内".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityFactors {
    pub land_value: f64,
    pub vineyard_prestige: f64,
    pub regional_prestige: f64,
    pub altitude_rating: f64,
    pub aspect_rating: f64,
    pub grape_suitability: f64,
    pub overgrowth_penalty: f64,
    pub density_penalty: f64,
}

// 原始值，供显示
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityRawValues {
    pub land_value: f64,
    pub max_land_value: f64,
    pub vineyard_prestige: f64,
    pub regional_prestige: f64,
    pub altitude: f64,
    pub altitude_range: (f64, f64),
    pub aspect: Aspect,
    pub density: f64,
    pub overgrowth: Overgrowth,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VineyardQuality {
    pub factors: QualityFactors,
    pub raw_values: QualityRawValues,
    pub quality_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VineyardGrapeQuality {
    pub factors: QualityFactors,
    pub raw_values: QualityRawValues,
    pub grape_quality_score: f64,
}

pub fn density_penalty(density: f64) -> f64 {
    density_penalty_with(density, &QualityConfig::default())
}

fn density_penalty_with(density: f64, config: &QualityConfig) -> f64 {
    if !density.is_finite() || density <= config.optimal_density {
        return 1.0;
    }
    let t = normalize(density, config.optimal_density, config.max_density);
    1.0 - config.max_density_reduction * t
}

// 多年未清理的惩罚，(0, 1]
pub fn overgrowth_penalty(overgrowth: &Overgrowth) -> f64 {
    let years = [overgrowth.vegetation, overgrowth.debris, overgrowth.uproot, overgrowth.replant];
    let exposure: f64 = years
        .iter()
        .zip(OVERGROWTH_WEIGHTS.iter())
        .map(|(&y, &w)| y as f64 * w)
        .sum();
    (-exposure).exp().max(MIN_OVERGROWTH_PENALTY)
}

pub fn altitude_rating(country: Country, region: &str, altitude: f64) -> Result<f64> {
    let (min, max) = region_data(country, region)?.altitude_range;
    Ok(normalize(altitude, min, max))
}

// 按海拔与坡向在产区价格区间中插值（欧元/公顷）
pub fn calculate_land_value(country: Country, region: &str, altitude: f64, aspect: Aspect) -> Result<f64> {
    let data = region_data(country, region)?;
    let altitude = ensure_finite(altitude, "altitude")?;
    let altitude_aspect_rate =
        (normalize(altitude, data.altitude_range.0, data.altitude_range.1) + aspect_rating(country, aspect)) / 2.0;
    let (base, max) = data.price_range;
    Ok(lerp(base, max, altitude_aspect_rate))
}

fn collect_factors(vineyard: &Vineyard, config: &QualityConfig) -> Result<(QualityFactors, QualityRawValues)> {
    vineyard.validate()?;
    let region = region_data(vineyard.country, &vineyard.region)?;

    let grape_suitability = match vineyard.grape {
        Some(grape) => region.suitability(grape),
        None => {
            debug!("葡萄园 {} 未种植，适宜度按 0 计", vineyard.id);
            0.0
        }
    };

    let factors = QualityFactors {
        land_value: clamp01(vineyard.land_value / MAX_LAND_VALUE),
        vineyard_prestige: clamp01(vineyard.vineyard_prestige),
        regional_prestige: clamp01(region.prestige),
        altitude_rating: normalize(vineyard.altitude, region.altitude_range.0, region.altitude_range.1),
        aspect_rating: aspect_rating(vineyard.country, vineyard.aspect),
        grape_suitability,
        overgrowth_penalty: overgrowth_penalty(&vineyard.overgrowth),
        density_penalty: density_penalty_with(vineyard.density, config),
    };

    let raw_values = QualityRawValues {
        land_value: vineyard.land_value,
        max_land_value: MAX_LAND_VALUE,
        vineyard_prestige: vineyard.vineyard_prestige,
        regional_prestige: region.prestige,
        altitude: vineyard.altitude,
        altitude_range: region.altitude_range,
        aspect: vineyard.aspect,
        density: vineyard.density,
        overgrowth: vineyard.overgrowth,
    };

    Ok((factors, raw_values))
}

pub fn get_vineyard_quality_factors(vineyard: &Vineyard) -> Result<VineyardQuality> {
    get_vineyard_quality_factors_with(vineyard, &QualityConfig::default())
}

pub fn get_vineyard_quality_factors_with(vineyard: &Vineyard, config: &QualityConfig) -> Result<VineyardQuality> {
    let (factors, raw_values) = collect_factors(vineyard, config)?;
    let weighted = factors.land_value * config.land_weight + factors.vineyard_prestige * config.prestige_weight;
    let quality_score = clamp01(weighted * factors.overgrowth_penalty * factors.density_penalty);

    debug!("葡萄园 {} 品质分 {:.4}", vineyard.id, quality_score);
    Ok(VineyardQuality { factors, raw_values, quality_score })
}

pub fn get_vineyard_grape_quality_factors(vineyard: &Vineyard) -> Result<VineyardGrapeQuality> {
    get_vineyard_grape_quality_factors_with(vineyard, &QualityConfig::default())
}

pub fn get_vineyard_grape_quality_factors_with(
    vineyard: &Vineyard,
    config: &QualityConfig,
) -> Result<VineyardGrapeQuality> {
    let (factors, raw_values) = collect_factors(vineyard, config)?;
    let w = &config.grape_weights;
    let weighted = factors.land_value * w.land_value
        + factors.vineyard_prestige * w.vineyard_prestige
        + factors.regional_prestige * w.regional_prestige
        + factors.altitude_rating * w.altitude
        + factors.aspect_rating * w.aspect
        + factors.grape_suitability * w.grape_suitability;
    let grape_quality_score = clamp01(weighted * factors.overgrowth_penalty * factors.density_penalty);

    debug!("葡萄园 {} 品种品质分 {:.4}", vineyard.id, grape_quality_score);
    Ok(VineyardGrapeQuality { factors, raw_values, grape_quality_score })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vineyard::types::fixtures::sample_vineyard;

    #[test]
    fn test_quality_formula() {
        let vineyard = sample_vineyard();
        let result = get_vineyard_quality_factors(&vineyard).unwrap();
        // 400k / 5M = 0.08; 0.08*0.6 + 0.4*0.4 = 0.208，再乘 5000 株/公顷的密植惩罚
        let density = 1.0 - 0.5 * (5000.0 - 1500.0) / 13500.0;
        assert!((result.factors.land_value - 0.08).abs() < 1e-12);
        assert!((result.factors.density_penalty - density).abs() < 1e-12);
        assert!((result.quality_score - 0.208 * density).abs() < 1e-9);
    }

    #[test]
    fn test_quality_monotonic_in_land_and_prestige() {
        let mut vineyard = sample_vineyard();
        let mut last = 0.0;
        for step in 0..=20 {
            vineyard.land_value = step as f64 * 300_000.0;
            let score = get_vineyard_quality_factors(&vineyard).unwrap().quality_score;
            assert!(score >= last);
            last = score;
        }

        let mut vineyard = sample_vineyard();
        let mut last = 0.0;
        for step in 0..=10 {
            vineyard.vineyard_prestige = step as f64 / 10.0;
            let score = get_vineyard_quality_factors(&vineyard).unwrap().quality_score;
            assert!(score >= last);
            last = score;
        }
    }

    #[test]
    fn test_density_penalty() {
        assert_eq!(density_penalty(0.0), 1.0);
        assert_eq!(density_penalty(1500.0), 1.0);
        assert!((density_penalty(8250.0) - 0.75).abs() < 1e-12);
        assert!((density_penalty(15000.0) - 0.5).abs() < 1e-12);
        assert!((density_penalty(40000.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_overgrowth_penalty_range() {
        assert_eq!(overgrowth_penalty(&Overgrowth::default()), 1.0);
        let light = overgrowth_penalty(&Overgrowth { vegetation: 1, ..Default::default() });
        let heavy = overgrowth_penalty(&Overgrowth { vegetation: 5, debris: 5, uproot: 5, replant: 5 });
        assert!(light < 1.0 && light > heavy);
        assert!(heavy >= MIN_OVERGROWTH_PENALTY);
    }

    #[test]
    fn test_grape_quality_uses_suitability() {
        let mut vineyard = sample_vineyard();
        let pinot = get_vineyard_grape_quality_factors(&vineyard).unwrap();
        assert_eq!(pinot.factors.grape_suitability, 1.0);

        vineyard.grape = Some(crate::vineyard::types::GrapeVariety::Primitivo);
        let primitivo = get_vineyard_grape_quality_factors(&vineyard).unwrap();
        assert!(primitivo.grape_quality_score < pinot.grape_quality_score);
        assert!((0.0..=1.0).contains(&pinot.grape_quality_score));
    }

    #[test]
    fn test_unknown_region_is_hard_failure() {
        let mut vineyard = sample_vineyard();
        vineyard.region = "Unknown".to_string();
        assert!(matches!(get_vineyard_quality_factors(&vineyard), Err(WineryError::MissingData(_))));
    }

    #[test]
    fn test_calculate_land_value_within_region_range() {
        let low = calculate_land_value(Country::France, "Bourgogne", 200.0, Aspect::North).unwrap();
        let high = calculate_land_value(Country::France, "Bourgogne", 500.0, Aspect::South).unwrap();
        assert!(low < high);
        assert!(low >= 150_000.0 && high <= 5_000_000.0);
        // 海拔 1 + 坡向 1 → 区间上限
        assert!((high - 5_000_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_config_validation() {
        assert!(QualityConfig::default().validate().is_ok());
        let bad = QualityConfig { land_weight: 0.9, ..Default::default() };
        assert!(bad.validate().is_err());
    }
}
