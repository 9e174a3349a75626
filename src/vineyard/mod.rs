// 葡萄园模块 - 数据契约、产区表、声望与品质因子

pub mod types;
pub mod regions;
pub mod prestige;
pub mod quality;

pub use types::{Aspect, Country, GrapeVariety, Overgrowth, Vineyard};
pub use regions::{aspect_rating, grape_suitability, region_data, RegionData, MAX_LAND_VALUE};
pub use prestige::{
    bounded_vineyard_prestige_factor, prestige_factor_for, refresh_vineyard_prestige, vine_age_modifier,
    PrestigeBreakdown,
    PrestigeConfig, PrestigeEvent, PrestigeEventType, PrestigeFactorBreakdown, PrestigeLedger,
};
pub use quality::{
    altitude_rating, calculate_land_value, density_penalty, get_vineyard_grape_quality_factors,
    get_vineyard_quality_factors, overgrowth_penalty, QualityConfig, QualityFactors,
    VineyardGrapeQuality, VineyardQuality,
};
