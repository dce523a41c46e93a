//! Programs of the weekly broadcast grid.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{ProgramId, TenantId};
use super::time::{DayOfWeek, TimeOfDay, TimeRange};
use super::validation::{is_blank, ValidationErrors};

/// Editorial category of a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgramCategory {
    News,
    Music,
    Talk,
    Sport,
    Culture,
    Entertainment,
    Religion,
}

impl ProgramCategory {
    pub const ALL: [ProgramCategory; 7] = [
        ProgramCategory::News,
        ProgramCategory::Music,
        ProgramCategory::Talk,
        ProgramCategory::Sport,
        ProgramCategory::Culture,
        ProgramCategory::Entertainment,
        ProgramCategory::Religion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProgramCategory::News => "news",
            ProgramCategory::Music => "music",
            ProgramCategory::Talk => "talk",
            ProgramCategory::Sport => "sport",
            ProgramCategory::Culture => "culture",
            ProgramCategory::Entertainment => "entertainment",
            ProgramCategory::Religion => "religion",
        }
    }
}

impl FromStr for ProgramCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        ProgramCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == needle)
            .ok_or_else(|| format!("Unknown program category: {}", s))
    }
}

impl fmt::Display for ProgramCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Broadcast status of a weekly slot relative to "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgramStatus {
    Upcoming,
    Ongoing,
    Finished,
}

impl ProgramStatus {
    /// Status of a slot within the current broadcast week (Monday first).
    pub fn at(day: DayOfWeek, range: &TimeRange, now: NaiveDateTime) -> Self {
        let today = DayOfWeek::of(&now.date());
        if day < today {
            return ProgramStatus::Finished;
        }
        if day > today {
            return ProgramStatus::Upcoming;
        }

        let current = TimeOfDay::from_naive(now.time());
        if current < range.start() {
            ProgramStatus::Upcoming
        } else if range.contains(current) {
            ProgramStatus::Ongoing
        } else {
            ProgramStatus::Finished
        }
    }
}

/// A persisted slot of the grid: one program on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub id: Option<ProgramId>,
    pub tenant: TenantId,
    pub name: String,
    /// Host names in display order; duplicates are allowed.
    pub hosts: Vec<String>,
    pub day: DayOfWeek,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub category: ProgramCategory,
    #[serde(default)]
    pub description: String,
    pub status: ProgramStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Program {
    /// The slot as a range; `None` for a corrupt record with `end <= start`.
    pub fn time_range(&self) -> Option<TimeRange> {
        TimeRange::new(self.start_time, self.end_time).ok()
    }

    /// Recompute `status` against a local wall-clock instant.
    pub fn refresh_status(&mut self, now: NaiveDateTime) {
        if let Some(range) = self.time_range() {
            self.status = ProgramStatus::at(self.day, &range, now);
        }
    }
}

/// Form payload for scheduling a program on one or more days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramCandidate {
    pub name: String,
    #[serde(default)]
    pub hosts: Vec<String>,
    pub days: Vec<DayOfWeek>,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub category: ProgramCategory,
    #[serde(default)]
    pub description: String,
}

impl ProgramCandidate {
    /// Check the form before anything is read or written.
    pub fn validate(&self) -> Result<TimeRange, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if is_blank(&self.name) {
            errors.push("name", "Program name is required");
        }
        if self.days.is_empty() {
            errors.push("days", "Select at least one day");
        }
        let range = TimeRange::new(self.start_time, self.end_time);
        if let Err(e) = &range {
            errors.push("end_time", e.to_string());
        }
        errors.into_result()?;
        range.map_err(|e| ValidationErrors::single("end_time", e.to_string()))
    }

    /// Selected days without repeats, in the order given.
    pub fn unique_days(&self) -> Vec<DayOfWeek> {
        let mut seen = Vec::with_capacity(self.days.len());
        for day in &self.days {
            if !seen.contains(day) {
                seen.push(*day);
            }
        }
        seen
    }

    /// The single day of an edit form.
    pub fn single_day(&self) -> Result<DayOfWeek, ValidationErrors> {
        match self.unique_days().as_slice() {
            [day] => Ok(*day),
            _ => Err(ValidationErrors::single(
                "days",
                "An existing program lives on exactly one day",
            )),
        }
    }

    /// Build the record to persist for one selected day.
    pub fn for_day(&self, tenant: &TenantId, day: DayOfWeek, now: DateTime<Utc>) -> Program {
        Program {
            id: None,
            tenant: tenant.clone(),
            name: self.name.trim().to_string(),
            hosts: self.hosts.clone(),
            day,
            start_time: self.start_time,
            end_time: self.end_time,
            category: self.category,
            description: self.description.clone(),
            status: ProgramStatus::Upcoming,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Existing programs overlapping a candidate slot on one day.
///
/// Derived on every submission, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramConflict {
    pub day: DayOfWeek,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub existing: Vec<Program>,
}
