// 时间系统模块 - 游戏日历
// 每季12周，每年4季；声望衰减与树龄均按周数计算

use std::fmt;
use serde::{Deserialize, Serialize};

use crate::core::error::{Result, WineryError};

pub const WEEKS_PER_SEASON: u32 = 12;
pub const SEASONS_PER_YEAR: u32 = 4;
pub const WEEKS_PER_YEAR: u32 = WEEKS_PER_SEASON * SEASONS_PER_YEAR;

// 游戏起始年份
pub const GAME_START_YEAR: u32 = 2024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Fall, Season::Winter];

    pub fn index(&self) -> u32 {
        match self {
            Season::Spring => 0,
            Season::Summer => 1,
            Season::Fall => 2,
            Season::Winter => 3,
        }
    }

    pub fn from_index(index: u32) -> Season {
        Season::ALL[(index % SEASONS_PER_YEAR) as usize]
    }
}

// 游戏日期
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameDate {
    pub week: u32,      // 1-12
    pub season: Season,
    pub year: u32,
}

impl GameDate {
    pub fn new(week: u32, season: Season, year: u32) -> Result<Self> {
        if week == 0 || week > WEEKS_PER_SEASON {
            return Err(WineryError::InvalidInput(format!("周数必须在1-{}之间: {}", WEEKS_PER_SEASON, week)));
        }
        if year < GAME_START_YEAR {
            return Err(WineryError::InvalidInput(format!("年份早于游戏起始年份 {}: {}", GAME_START_YEAR, year)));
        }
        Ok(Self { week, season, year })
    }

    pub fn start() -> Self {
        Self { week: 1, season: Season::Spring, year: GAME_START_YEAR }
    }

    // 自游戏开始以来的绝对周数（从0开始）
    pub fn absolute_week(&self) -> u32 {
        (self.year - GAME_START_YEAR) * WEEKS_PER_YEAR
            + self.season.index() * WEEKS_PER_SEASON
            + (self.week - 1)
    }

    pub fn from_absolute_week(absolute: u32) -> Self {
        let year = GAME_START_YEAR + absolute / WEEKS_PER_YEAR;
        let within_year = absolute % WEEKS_PER_YEAR;
        Self {
            week: within_year % WEEKS_PER_SEASON + 1,
            season: Season::from_index(within_year / WEEKS_PER_SEASON),
            year,
        }
    }

    // 两个日期之间经过的周数；早于起点时为0
    pub fn weeks_since(&self, earlier: &GameDate) -> u32 {
        self.absolute_week().saturating_sub(earlier.absolute_week())
    }

    pub fn years_since(&self, earlier: &GameDate) -> f64 {
        self.weeks_since(earlier) as f64 / WEEKS_PER_YEAR as f64
    }

    pub fn advance_weeks(&self, weeks: u32) -> Self {
        Self::from_absolute_week(self.absolute_week() + weeks)
    }
}

impl fmt::Display for GameDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "第{}周 {:?} {}", self.week, self.season, self.year)
    }
}
