// 葡萄园数据契约
// 由持久化层提供，评分引擎每次调用只读取一个不可变快照

use std::fmt;
use serde::{Deserialize, Serialize};

use crate::core::error::{ensure_finite, Result, WineryError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Country {
    France,
    Italy,
    Spain,
    #[serde(rename = "United States")]
    UnitedStates,
    Germany,
}

impl Country {
    pub const ALL: [Country; 5] = [
        Country::France,
        Country::Italy,
        Country::Spain,
        Country::UnitedStates,
        Country::Germany,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Country::France => "France",
            Country::Italy => "Italy",
            Country::Spain => "Spain",
            Country::UnitedStates => "United States",
            Country::Germany => "Germany",
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// 坡向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Aspect {
    North,
    Northeast,
    East,
    Southeast,
    South,
    Southwest,
    West,
    Northwest,
}

impl Aspect {
    pub const ALL: [Aspect; 8] = [
        Aspect::North,
        Aspect::Northeast,
        Aspect::East,
        Aspect::Southeast,
        Aspect::South,
        Aspect::Southwest,
        Aspect::West,
        Aspect::Northwest,
    ];

    pub fn index(&self) -> usize {
        match self {
            Aspect::North => 0,
            Aspect::Northeast => 1,
            Aspect::East => 2,
            Aspect::Southeast => 3,
            Aspect::South => 4,
            Aspect::Southwest => 5,
            Aspect::West => 6,
            Aspect::Northwest => 7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GrapeVariety {
    Barbera,
    Chardonnay,
    #[serde(rename = "Pinot Noir")]
    PinotNoir,
    Primitivo,
    #[serde(rename = "Sauvignon Blanc")]
    SauvignonBlanc,
}

impl GrapeVariety {
    pub const ALL: [GrapeVariety; 5] = [
        GrapeVariety::Barbera,
        GrapeVariety::Chardonnay,
        GrapeVariety::PinotNoir,
        GrapeVariety::Primitivo,
        GrapeVariety::SauvignonBlanc,
    ];

    pub fn index(&self) -> usize {
        match self {
            GrapeVariety::Barbera => 0,
            GrapeVariety::Chardonnay => 1,
            GrapeVariety::PinotNoir => 2,
            GrapeVariety::Primitivo => 3,
            GrapeVariety::SauvignonBlanc => 4,
        }
    }
}

// 各类杂草/杂物累计未清理的年数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Overgrowth {
    pub vegetation: u32,
    pub debris: u32,
    pub uproot: u32,
    pub replant: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vineyard {
    pub id: String,
    pub name: String,
    pub country: Country,
    pub region: String,
    // 海拔（米）
    pub altitude: f64,
    pub aspect: Aspect,
    pub hectares: f64,
    // 每公顷株数，未种植为0
    pub density: f64,
    // 每公顷土地价值（欧元）
    pub land_value: f64,
    pub grape: Option<GrapeVariety>,
    // 树龄（年），未种植为 None
    pub vine_age: Option<f64>,
    // 已归一化的声望因子 [0, 0.99]，由声望账本刷新
    #[serde(default)]
    pub vineyard_prestige: f64,
    #[serde(default)]
    pub overgrowth: Overgrowth,
}

impl Vineyard {
    // 面积与数值字段校验；声望计算依赖面积为正
    pub fn validate(&self) -> Result<()> {
        let hectares = ensure_finite(self.hectares, "hectares")?;
        if hectares <= 0.0 {
            return Err(WineryError::InvalidInput(format!(
                "葡萄园 {} 面积必须为正: {}", self.id, hectares
            )));
        }
        ensure_finite(self.altitude, "altitude")?;
        ensure_finite(self.density, "density")?;
        ensure_finite(self.land_value, "land_value")?;
        ensure_finite(self.vineyard_prestige, "vineyard_prestige")?;
        if let Some(age) = self.vine_age {
            ensure_finite(age, "vine_age")?;
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::sample_vineyard;
    use super::*;

    #[test]
    fn test_validate_rejects_non_positive_hectares() {
        let mut vineyard = sample_vineyard();
        assert!(vineyard.validate().is_ok());

        vineyard.hectares = 0.0;
        assert!(matches!(vineyard.validate(), Err(WineryError::InvalidInput(_))));

        vineyard.hectares = f64::NAN;
        assert!(vineyard.validate().is_err());
    }

    #[test]
    fn test_vineyard_json_contract() {
        let json = r#"{
            "id": "v-9", "name": "Test", "country": "United States", "region": "Napa Valley",
            "altitude": 120.0, "aspect": "Southwest", "hectares": 1.5, "density": 4000.0,
            "landValue": 600000.0, "grape": "Pinot Noir", "vineAge": 8.0, "vineyardPrestige": 0.2
        }"#;
        let vineyard: Vineyard = serde_json::from_str(json).unwrap();
        assert_eq!(vineyard.country, Country::UnitedStates);
        assert_eq!(vineyard.grape, Some(GrapeVariety::PinotNoir));
        assert_eq!(vineyard.overgrowth, Overgrowth::default());
    }
}
