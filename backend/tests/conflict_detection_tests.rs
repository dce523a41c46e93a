//! Conflict detection over the weekly grid, through the algorithm and the service.

mod support;

use radio_grid::algorithms::{conflicting_program_ids, detect_conflicts};
use radio_grid::db::LocalRepository;
use radio_grid::models::{DayOfWeek, TimeOfDay};
use radio_grid::services::{scheduling, ServiceError};

use support::{candidate, director, host, seed_program};

fn t(s: &str) -> TimeOfDay {
    s.parse().unwrap()
}

#[tokio::test]
async fn test_overlap_on_same_day_is_reported() {
    let repo = LocalRepository::new();
    let existing = seed_program(&repo, "Revue de presse", DayOfWeek::Tuesday, "09:00", "10:00");

    let conflicts = scheduling::detect_candidate_conflicts(
        &repo,
        &director(),
        &candidate("Invité du jour", &[DayOfWeek::Tuesday], "09:30", "10:30"),
    )
    .await
    .unwrap();

    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].day, DayOfWeek::Tuesday);
    assert_eq!(conflicts[0].start_time, t("09:30"));
    assert_eq!(conflicts[0].existing.len(), 1);
    assert_eq!(conflicts[0].existing[0].id, Some(existing));
}

#[tokio::test]
async fn test_back_to_back_slots_do_not_conflict() {
    let repo = LocalRepository::new();
    seed_program(&repo, "Revue de presse", DayOfWeek::Tuesday, "09:00", "10:00");

    for (start, end) in [("10:00", "11:00"), ("08:00", "09:00")] {
        let conflicts = scheduling::detect_candidate_conflicts(
            &repo,
            &director(),
            &candidate("Adjacent", &[DayOfWeek::Tuesday], start, end),
        )
        .await
        .unwrap();
        assert!(conflicts.is_empty(), "{}-{} should not conflict", start, end);
    }
}

#[tokio::test]
async fn test_other_days_are_ignored() {
    let repo = LocalRepository::new();
    seed_program(&repo, "Revue de presse", DayOfWeek::Tuesday, "09:00", "10:00");

    let conflicts = scheduling::detect_candidate_conflicts(
        &repo,
        &director(),
        &candidate("Mercredi", &[DayOfWeek::Wednesday], "09:00", "10:00"),
    )
    .await
    .unwrap();
    assert!(conflicts.is_empty());
}

#[tokio::test]
async fn test_one_conflict_entry_per_affected_day() {
    let repo = LocalRepository::new();
    let monday = seed_program(&repo, "Matinale", DayOfWeek::Monday, "06:00", "09:00");
    seed_program(&repo, "Chronique", DayOfWeek::Monday, "08:30", "08:45");
    let friday = seed_program(&repo, "Matinale", DayOfWeek::Friday, "06:00", "09:00");

    let conflicts = scheduling::detect_candidate_conflicts(
        &repo,
        &director(),
        &candidate(
            "Réveil",
            &[DayOfWeek::Monday, DayOfWeek::Wednesday, DayOfWeek::Friday, DayOfWeek::Monday],
            "07:00",
            "09:00",
        ),
    )
    .await
    .unwrap();

    let days: Vec<DayOfWeek> = conflicts.iter().map(|c| c.day).collect();
    assert_eq!(days, vec![DayOfWeek::Monday, DayOfWeek::Friday]);
    assert_eq!(conflicts[0].existing.len(), 2);

    let ids = conflicting_program_ids(&conflicts);
    assert_eq!(ids.len(), 3);
    assert_eq!(ids[0], monday);
    assert!(ids.contains(&friday));
}

#[test]
fn test_contained_and_containing_slots_conflict() {
    let repo_programs = vec![candidate("Long", &[DayOfWeek::Sunday], "10:00", "14:00")
        .for_day(&"dir-1".into(), DayOfWeek::Sunday, chrono::Utc::now())];

    let inside = detect_conflicts(&repo_programs, &[DayOfWeek::Sunday], t("11:00"), t("12:00"));
    assert_eq!(inside.len(), 1);

    let around = detect_conflicts(&repo_programs, &[DayOfWeek::Sunday], t("09:00"), t("15:00"));
    assert_eq!(around.len(), 1);
}

#[test]
fn test_empty_grid_has_no_conflicts() {
    assert!(detect_conflicts(&[], &DayOfWeek::ALL, t("00:00"), t("23:59")).is_empty());
}

#[tokio::test]
async fn test_invalid_candidate_is_rejected_before_reading() {
    let repo = LocalRepository::new();
    repo.set_healthy(false);

    let err = scheduling::detect_candidate_conflicts(
        &repo,
        &director(),
        &candidate("Inversé", &[DayOfWeek::Monday], "10:00", "09:00"),
    )
    .await
    .unwrap_err();

    match err {
        ServiceError::Validation(errors) => assert!(errors.has_field("end_time")),
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_hosts_cannot_manage_the_grid() {
    let repo = LocalRepository::new();
    let err = scheduling::detect_candidate_conflicts(
        &repo,
        &host("host-1"),
        &candidate("Pirate", &[DayOfWeek::Monday], "09:00", "10:00"),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));
}

#[tokio::test]
async fn test_tenants_do_not_see_each_other() {
    let repo = LocalRepository::new();
    seed_program(&repo, "Revue de presse", DayOfWeek::Tuesday, "09:00", "10:00");

    let other = radio_grid::models::ActorContext::director("dir-2");
    let conflicts = scheduling::detect_candidate_conflicts(
        &repo,
        &other,
        &candidate("Voisin", &[DayOfWeek::Tuesday], "09:00", "10:00"),
    )
    .await
    .unwrap();
    assert!(conflicts.is_empty());
}
