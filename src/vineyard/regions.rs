// 产区数据表
// 海拔范围、产区声望、土地价格区间、品种适宜度；启动时构建一次，运行期只读

use lazy_static::lazy_static;
use log::debug;
use serde::Serialize;

use super::types::{Aspect, Country, GrapeVariety};
use crate::core::error::{Result, WineryError};

// 全局最高土地价值（欧元/公顷），土地因子的归一化分母
pub const MAX_LAND_VALUE: f64 = 5_000_000.0;

#[derive(Debug, Clone, Serialize)]
pub struct RegionData {
    pub country: Country,
    pub name: &'static str,
    // 海拔范围（米）
    pub altitude_range: (f64, f64),
    pub prestige: f64,
    // 土地价格区间（欧元/公顷）
    pub price_range: (f64, f64),
    // 按 GrapeVariety::index 排列
    pub grape_suitability: [f64; 5],
}

impl RegionData {
    pub fn suitability(&self, grape: GrapeVariety) -> f64 {
        self.grape_suitability[grape.index()]
    }
}

fn region(
    country: Country,
    name: &'static str,
    altitude_range: (f64, f64),
    prestige: f64,
    price_range: (f64, f64),
    grape_suitability: [f64; 5],
) -> RegionData {
    RegionData { country, name, altitude_range, prestige, price_range, grape_suitability }
}

lazy_static! {
    // 适宜度列顺序：Barbera, Chardonnay, Pinot Noir, Primitivo, Sauvignon Blanc
    static ref REGIONS: Vec<RegionData> = {
        use Country::*;
        let table = vec![
            region(France, "Bordeaux", (0.0, 100.0), 1.0, (100_000.0, 2_500_000.0), [0.5, 0.6, 0.4, 0.3, 0.9]),
            region(France, "Bourgogne", (200.0, 500.0), 1.0, (150_000.0, 5_000_000.0), [0.3, 1.0, 1.0, 0.2, 0.6]),
            region(France, "Champagne", (100.0, 300.0), 0.98, (500_000.0, 1_500_000.0), [0.2, 0.9, 0.9, 0.1, 0.4]),
            region(France, "Loire Valley", (0.0, 200.0), 0.75, (20_000.0, 100_000.0), [0.3, 0.7, 0.7, 0.2, 1.0]),
            region(France, "Côtes du Rhône", (50.0, 400.0), 0.8, (25_000.0, 400_000.0), [0.6, 0.6, 0.5, 0.6, 0.5]),

            region(Italy, "Piedmont", (150.0, 600.0), 0.9, (50_000.0, 1_500_000.0), [1.0, 0.6, 0.5, 0.4, 0.5]),
            region(Italy, "Tuscany", (150.0, 600.0), 0.92, (80_000.0, 1_000_000.0), [0.8, 0.6, 0.5, 0.7, 0.5]),
            region(Italy, "Veneto", (0.0, 500.0), 0.72, (50_000.0, 400_000.0), [0.8, 0.7, 0.6, 0.6, 0.6]),
            region(Italy, "Sicily", (50.0, 900.0), 0.6, (15_000.0, 80_000.0), [0.6, 0.5, 0.3, 0.8, 0.4]),
            region(Italy, "Puglia", (0.0, 400.0), 0.55, (15_000.0, 60_000.0), [0.7, 0.4, 0.3, 1.0, 0.3]),

            region(Spain, "Rioja", (300.0, 700.0), 0.85, (30_000.0, 150_000.0), [0.6, 0.5, 0.4, 0.6, 0.4]),
            region(Spain, "Ribera del Duero", (750.0, 1000.0), 0.8, (30_000.0, 120_000.0), [0.5, 0.4, 0.4, 0.6, 0.3]),
            region(Spain, "Jumilla", (400.0, 800.0), 0.55, (10_000.0, 40_000.0), [0.5, 0.3, 0.2, 0.8, 0.3]),
            region(Spain, "La Mancha", (600.0, 800.0), 0.45, (8_000.0, 30_000.0), [0.5, 0.5, 0.3, 0.7, 0.5]),
            region(Spain, "Jerez", (0.0, 100.0), 0.7, (20_000.0, 60_000.0), [0.3, 0.3, 0.2, 0.5, 0.4]),

            region(UnitedStates, "Napa Valley", (0.0, 600.0), 0.95, (300_000.0, 1_000_000.0), [0.6, 0.9, 0.6, 0.7, 0.9]),
            region(UnitedStates, "Sonoma County", (0.0, 400.0), 0.85, (100_000.0, 500_000.0), [0.5, 0.9, 0.9, 0.6, 0.8]),
            region(UnitedStates, "Willamette Valley", (50.0, 300.0), 0.7, (50_000.0, 200_000.0), [0.3, 0.8, 1.0, 0.2, 0.6]),
            region(UnitedStates, "Finger Lakes", (100.0, 400.0), 0.55, (20_000.0, 60_000.0), [0.3, 0.7, 0.7, 0.2, 0.6]),
            region(UnitedStates, "Central Coast", (0.0, 500.0), 0.65, (50_000.0, 250_000.0), [0.6, 0.9, 0.8, 0.6, 0.7]),

            region(Germany, "Mosel", (100.0, 350.0), 0.85, (20_000.0, 100_000.0), [0.2, 0.6, 0.7, 0.1, 0.5]),
            region(Germany, "Rheingau", (80.0, 300.0), 0.82, (30_000.0, 150_000.0), [0.2, 0.6, 0.8, 0.1, 0.5]),
            region(Germany, "Rheinhessen", (80.0, 300.0), 0.65, (10_000.0, 50_000.0), [0.3, 0.7, 0.7, 0.2, 0.6]),
            region(Germany, "Pfalz", (100.0, 300.0), 0.7, (15_000.0, 60_000.0), [0.3, 0.8, 0.8, 0.2, 0.7]),
            region(Germany, "Ahr", (100.0, 300.0), 0.62, (15_000.0, 50_000.0), [0.2, 0.5, 0.9, 0.1, 0.4]),
        ];
        debug!("产区数据表初始化完成，共 {} 个产区", table.len());
        table
    };
}

// 坡向评分，按 Aspect::index 排列（N, NE, E, SE, S, SW, W, NW）
const FRANCE_ASPECTS: [f64; 8] = [0.2, 0.35, 0.6, 0.9, 1.0, 0.85, 0.6, 0.3];
const ITALY_ASPECTS: [f64; 8] = [0.25, 0.4, 0.65, 0.9, 1.0, 0.9, 0.7, 0.35];
// 炎热产区偏好东向
const SPAIN_ASPECTS: [f64; 8] = [0.45, 0.6, 0.8, 0.9, 0.85, 0.8, 0.65, 0.5];
const UNITED_STATES_ASPECTS: [f64; 8] = [0.3, 0.45, 0.65, 0.85, 0.95, 1.0, 0.75, 0.4];
const GERMANY_ASPECTS: [f64; 8] = [0.1, 0.25, 0.55, 0.9, 1.0, 0.85, 0.5, 0.2];

fn aspect_ratings(country: Country) -> &'static [f64; 8] {
    match country {
        Country::France => &FRANCE_ASPECTS,
        Country::Italy => &ITALY_ASPECTS,
        Country::Spain => &SPAIN_ASPECTS,
        Country::UnitedStates => &UNITED_STATES_ASPECTS,
        Country::Germany => &GERMANY_ASPECTS,
    }
}

pub fn region_data(country: Country, region: &str) -> Result<&'static RegionData> {
    REGIONS
        .iter()
        .find(|data| data.country == country && data.name == region)
        .ok_or_else(|| WineryError::MissingData(format!("未知产区: {} / {}", country, region)))
}

pub fn regions_of(country: Country) -> impl Iterator<Item = &'static RegionData> {
    REGIONS.iter().filter(move |data| data.country == country)
}

pub fn all_regions() -> &'static [RegionData] {
    &REGIONS
}

pub fn aspect_rating(country: Country, aspect: Aspect) -> f64 {
    aspect_ratings(country)[aspect.index()]
}

pub fn grape_suitability(country: Country, region: &str, grape: GrapeVariety) -> Result<f64> {
    Ok(region_data(country, region)?.suitability(grape))
}
