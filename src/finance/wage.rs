// 员工工资

use serde::{Deserialize, Serialize};

use crate::core::math::clamp01;

const BASE_WAGE: f64 = 500.0;
const SKILL_WAGE: f64 = 1000.0;
// 每项专长的工资乘数
pub const SPECIALIZATION_MULTIPLIER: f64 = 1.3;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StaffSkills {
    pub field: f64,
    pub winery: f64,
    pub administration: f64,
    pub sales: f64,
    pub maintenance: f64,
}

impl StaffSkills {
    pub fn average(&self) -> f64 {
        let skills = [self.field, self.winery, self.administration, self.sales, self.maintenance];
        skills.iter().map(|&s| clamp01(s)).sum::<f64>() / skills.len() as f64
    }
}

// 每周工资（欧元），未取整
pub fn calculate_wage(skills: &StaffSkills, specializations: &[String]) -> f64 {
    let base = BASE_WAGE + SKILL_WAGE * skills.average();
    base * SPECIALIZATION_MULTIPLIER.powi(specializations.len() as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn half_skills() -> StaffSkills {
        StaffSkills { field: 0.5, winery: 0.5, administration: 0.5, sales: 0.5, maintenance: 0.5 }
    }

    #[test]
    fn test_wage_without_specializations() {
        assert_eq!(calculate_wage(&half_skills(), &[]), 1000.0);
    }

    #[test]
    fn test_specialization_multiplier() {
        let one = calculate_wage(&half_skills(), &["field".to_string()]);
        assert!((one - 1300.0).abs() < 1e-9);
        let two = calculate_wage(&half_skills(), &["field".to_string(), "sales".to_string()]);
        assert!((two - 1690.0).abs() < 1e-9);
    }

    #[test]
    fn test_skills_are_clamped() {
        let skills = StaffSkills { field: 5.0, ..Default::default() };
        assert!((calculate_wage(&skills, &[]) - 700.0).abs() < 1e-9);
    }
}
