//! Weekly grid layout of a station's programs.

use serde::{Deserialize, Serialize};

use crate::models::{DayOfWeek, Program};

/// Programs of one day, sorted by start time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridDay {
    pub day: DayOfWeek,
    pub programs: Vec<Program>,
}

/// The seven days of the broadcast week, Monday first, every day present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyGrid {
    pub days: Vec<GridDay>,
}

impl WeeklyGrid {
    pub fn day(&self, day: DayOfWeek) -> &[Program] {
        self.days
            .iter()
            .find(|d| d.day == day)
            .map(|d| d.programs.as_slice())
            .unwrap_or(&[])
    }

    pub fn program_count(&self) -> usize {
        self.days.iter().map(|d| d.programs.len()).sum()
    }
}

/// Group programs by day and sort each day by start time, then name.
pub fn weekly_grid(programs: Vec<Program>) -> WeeklyGrid {
    let mut days: Vec<GridDay> = DayOfWeek::ALL
        .iter()
        .map(|&day| GridDay {
            day,
            programs: Vec::new(),
        })
        .collect();

    for program in programs {
        days[program.day.index() as usize].programs.push(program);
    }
    for day in &mut days {
        day.programs
            .sort_by(|a, b| a.start_time.cmp(&b.start_time).then_with(|| a.name.cmp(&b.name)));
    }

    WeeklyGrid { days }
}
