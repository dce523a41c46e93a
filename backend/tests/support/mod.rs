#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use chrono::{NaiveDate, Utc};
use radio_grid::db::LocalRepository;
use radio_grid::models::{
    ActorContext, ConducteurElement, DayOfWeek, ElementField, ProgramCandidate, ProgramCategory,
    ProgramId, RunSheet, TenantId,
};
use radio_grid::services::ConducteurDraft;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// This is panic-safe (restores variables on unwind) and also serializes access to
/// process-global env vars to avoid flaky tests when Rust runs tests in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

// ==================== Domain fixtures ====================

pub const TENANT: &str = "dir-1";

pub fn director() -> ActorContext {
    ActorContext::director(TENANT)
}

pub fn host(user: &str) -> ActorContext {
    ActorContext::host(user, TENANT)
}

pub fn candidate(name: &str, days: &[DayOfWeek], start: &str, end: &str) -> ProgramCandidate {
    ProgramCandidate {
        name: name.to_string(),
        hosts: vec!["Awa".to_string(), "Karim".to_string()],
        days: days.to_vec(),
        start_time: start.parse().expect("valid start"),
        end_time: end.parse().expect("valid end"),
        category: ProgramCategory::Talk,
        description: String::new(),
    }
}

/// Insert one existing program directly into the store.
pub fn seed_program(
    repo: &LocalRepository,
    name: &str,
    day: DayOfWeek,
    start: &str,
    end: &str,
) -> ProgramId {
    let program = candidate(name, &[day], start, end).for_day(&TenantId::new(TENANT), day, Utc::now());
    repo.seed_programs(vec![program])[0]
}

pub fn segments(titles: &[&str]) -> Vec<ConducteurElement> {
    let mut sheet = RunSheet::new();
    for title in titles {
        let index = sheet.add_element();
        sheet
            .update_element(index, ElementField::Title(title.to_string()))
            .expect("index in range");
        sheet
            .update_element(index, ElementField::DurationMinutes(Some(10)))
            .expect("index in range");
    }
    sheet.into_elements()
}

pub fn draft(program_id: ProgramId, titles: &[&str]) -> ConducteurDraft {
    ConducteurDraft {
        program_id: Some(program_id),
        title: "Matinale du lundi".to_string(),
        broadcast_date: NaiveDate::from_ymd_opt(2026, 10, 19),
        start_time: Some("06:00".parse().expect("valid time")),
        end_time: Some("09:00".parse().expect("valid time")),
        elements: segments(titles),
    }
}
