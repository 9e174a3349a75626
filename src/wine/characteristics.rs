// 葡萄酒特性向量与理想区间
// 六个特性构成封闭集合，所有按特性索引的数据都走 CharacteristicMap

use std::fmt;
use std::ops::{Index, IndexMut};
use serde::{Deserialize, Serialize};

use crate::core::error::{Result, WineryError};
use crate::core::math::clamp01;

// 特性类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Characteristic {
    Acidity,    // 酸度
    Aroma,      // 香气
    Body,       // 酒体
    Spice,      // 辛香
    Sweetness,  // 甜度
    Tannins,    // 单宁
}

impl Characteristic {
    pub const ALL: [Characteristic; 6] = [
        Characteristic::Acidity,
        Characteristic::Aroma,
        Characteristic::Body,
        Characteristic::Spice,
        Characteristic::Sweetness,
        Characteristic::Tannins,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Characteristic::Acidity => "acidity",
            Characteristic::Aroma => "aroma",
            Characteristic::Body => "body",
            Characteristic::Spice => "spice",
            Characteristic::Sweetness => "sweetness",
            Characteristic::Tannins => "tannins",
        }
    }
}

impl fmt::Display for Characteristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// 按特性索引的记录
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CharacteristicMap<T> {
    pub acidity: T,
    pub aroma: T,
    pub body: T,
    pub spice: T,
    pub sweetness: T,
    pub tannins: T,
}

impl<T> CharacteristicMap<T> {
    pub fn from_fn<F: FnMut(Characteristic) -> T>(mut f: F) -> Self {
        Self {
            acidity: f(Characteristic::Acidity),
            aroma: f(Characteristic::Aroma),
            body: f(Characteristic::Body),
            spice: f(Characteristic::Spice),
            sweetness: f(Characteristic::Sweetness),
            tannins: f(Characteristic::Tannins),
        }
    }

    pub fn get(&self, characteristic: Characteristic) -> &T {
        match characteristic {
            Characteristic::Acidity => &self.acidity,
            Characteristic::Aroma => &self.aroma,
            Characteristic::Body => &self.body,
            Characteristic::Spice => &self.spice,
            Characteristic::Sweetness => &self.sweetness,
            Characteristic::Tannins => &self.tannins,
        }
    }

    pub fn get_mut(&mut self, characteristic: Characteristic) -> &mut T {
        match characteristic {
            Characteristic::Acidity => &mut self.acidity,
            Characteristic::Aroma => &mut self.aroma,
            Characteristic::Body => &mut self.body,
            Characteristic::Spice => &mut self.spice,
            Characteristic::Sweetness => &mut self.sweetness,
            Characteristic::Tannins => &mut self.tannins,
        }
    }

    pub fn map<U, F: FnMut(Characteristic, &T) -> U>(&self, mut f: F) -> CharacteristicMap<U> {
        CharacteristicMap::from_fn(|c| f(c, self.get(c)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Characteristic, &T)> + '_ {
        Characteristic::ALL.iter().map(move |&c| (c, self.get(c)))
    }
}

impl<T> Index<Characteristic> for CharacteristicMap<T> {
    type Output = T;

    fn index(&self, characteristic: Characteristic) -> &T {
        self.get(characteristic)
    }
}

impl<T> IndexMut<Characteristic> for CharacteristicMap<T> {
    fn index_mut(&mut self, characteristic: Characteristic) -> &mut T {
        self.get_mut(characteristic)
    }
}

// 感官特性向量，各分量 ∈ [0,1]
pub type WineCharacteristics = CharacteristicMap<f64>;

impl CharacteristicMap<f64> {
    pub fn new(acidity: f64, aroma: f64, body: f64, spice: f64, sweetness: f64, tannins: f64) -> Self {
        Self { acidity, aroma, body, spice, sweetness, tannins }
    }

    pub fn uniform(value: f64) -> Self {
        Self::from_fn(|_| value)
    }

    // 越界值在使用点被截断，而不是拒绝
    pub fn clamped(&self) -> Self {
        self.map(|_, &v| clamp01(v))
    }

    pub fn with(mut self, characteristic: Characteristic, value: f64) -> Self {
        self[characteristic] = value;
        self
    }
}

// 理想区间 [min, max]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BalanceRange {
    pub min: f64,
    pub max: f64,
}

impl BalanceRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    pub fn half_width(&self) -> f64 {
        (self.max - self.min) / 2.0
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    // 区间内距离为0
    pub fn distance_outside(&self, value: f64) -> f64 {
        distance_outside(value, self.min, self.max)
    }

    pub fn distance_inside(&self, value: f64) -> f64 {
        (value - self.midpoint()).abs()
    }

    // 整体平移，保持宽度并限制在 [0,1] 内
    pub fn shifted(&self, delta: f64) -> Self {
        let width = (self.max - self.min).clamp(0.0, 1.0);
        let min = (self.min + delta).clamp(0.0, 1.0 - width);
        Self { min, max: min + width }
    }

    // 围绕中点按比例缩放半宽，结果截断到 [0,1]
    pub fn scaled_around_midpoint(&self, factor: f64) -> Self {
        let mid = self.midpoint();
        let half = self.half_width() * factor.max(0.0);
        let min = clamp01(mid - half);
        let max = clamp01(mid + half);
        Self { min: min.min(max), max }
    }
}

// 区间外距离；评分与显示共用同一公式
pub fn distance_outside(value: f64, min: f64, max: f64) -> f64 {
    (min - value).max(value - max).max(0.0)
}

pub type BalanceRanges = CharacteristicMap<BalanceRange>;

// 基础平衡区间
pub const BASE_BALANCED_RANGES: BalanceRanges = CharacteristicMap {
    acidity: BalanceRange::new(0.4, 0.6),
    aroma: BalanceRange::new(0.3, 0.7),
    body: BalanceRange::new(0.4, 0.8),
    spice: BalanceRange::new(0.35, 0.65),
    sweetness: BalanceRange::new(0.4, 0.6),
    tannins: BalanceRange::new(0.35, 0.65),
};

// 范围表属于配置，加载时校验而不是每次调用时防御
pub fn validate_ranges(ranges: &BalanceRanges) -> Result<()> {
    for (characteristic, range) in ranges.iter() {
        if !(range.min.is_finite() && range.max.is_finite()) {
            return Err(WineryError::ConfigError(format!("{} 区间包含非有限值", characteristic)));
        }
        if range.min > range.max {
            return Err(WineryError::ConfigError(format!(
                "{} 区间 min > max: [{}, {}]", characteristic, range.min, range.max
            )));
        }
        if range.min < 0.0 || range.max > 1.0 {
            return Err(WineryError::ConfigError(format!(
                "{} 区间超出 [0,1]: [{}, {}]", characteristic, range.min, range.max
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_ranges_valid() {
        assert!(validate_ranges(&BASE_BALANCED_RANGES).is_ok());
    }

    #[test]
    fn test_invalid_range_rejected() {
        let mut ranges = BASE_BALANCED_RANGES;
        ranges.body = BalanceRange::new(0.8, 0.4);
        assert!(matches!(validate_ranges(&ranges), Err(WineryError::ConfigError(_))));
    }

    #[test]
    fn test_distance_helpers() {
        let range = BalanceRange::new(0.4, 0.6);
        assert_eq!(range.distance_outside(0.5), 0.0);
        assert!((range.distance_outside(0.7) - 0.1).abs() < 1e-12);
        assert!((range.distance_outside(0.1) - 0.3).abs() < 1e-12);
        assert!((range.distance_inside(0.45) - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_shifted_keeps_width_inside_unit_interval() {
        let range = BalanceRange::new(0.4, 0.8);
        let shifted = range.shifted(0.5);
        assert!((shifted.max - 1.0).abs() < 1e-12);
        assert!((shifted.max - shifted.min - 0.4).abs() < 1e-12);

        let shifted = range.shifted(-1.0);
        assert_eq!(shifted.min, 0.0);
    }

    #[test]
    fn test_scaled_around_midpoint() {
        let range = BalanceRange::new(0.4, 0.6);
        let narrow = range.scaled_around_midpoint(0.5);
        assert!((narrow.min - 0.45).abs() < 1e-12);
        assert!((narrow.max - 0.55).abs() < 1e-12);

        let wide = range.scaled_around_midpoint(100.0);
        assert_eq!(wide.min, 0.0);
        assert_eq!(wide.max, 1.0);
    }

    #[test]
    fn test_characteristic_map_indexing() {
        let mut wine = WineCharacteristics::uniform(0.5);
        wine[Characteristic::Spice] = 0.9;
        assert_eq!(wine.spice, 0.9);
        assert_eq!(wine.iter().count(), 6);

        let clamped = WineCharacteristics::new(-0.2, 1.4, 0.5, 0.5, 0.5, 0.5).clamped();
        assert_eq!(clamped.acidity, 0.0);
        assert_eq!(clamped.aroma, 1.0);
    }
}
