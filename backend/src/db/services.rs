//! Read-side service helpers.
//!
//! Repository-agnostic queries that every outer surface shares: the tenant's
//! weekly grid with its live broadcast status, and a user's notification inbox.
//! Writes with business rules live in [`crate::services`].

use chrono::NaiveDateTime;
use log::debug;

use super::repository::{FullRepository, RepositoryResult};
use crate::algorithms::{self, WeeklyGrid};
use crate::models::{Notification, Program, TenantId, UserId};

// ==================== Health & Connection ====================

/// Check if the store is healthy.
///
/// This is a simple pass-through to the repository's health check.
pub async fn health_check<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

// ==================== Program Grid ====================

/// Station wall-clock time used for live status.
pub fn station_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

/// List a tenant's programs with their status recomputed at `now`.
pub async fn list_programs_at<R: FullRepository + ?Sized>(
    repo: &R,
    tenant: &TenantId,
    now: NaiveDateTime,
) -> RepositoryResult<Vec<Program>> {
    let mut programs = repo.list_programs(tenant).await?;
    for program in &mut programs {
        program.refresh_status(now);
    }
    debug!("Listed {} programs for tenant {}", programs.len(), tenant);
    Ok(programs)
}

/// List a tenant's programs with their status as of now.
pub async fn list_programs<R: FullRepository + ?Sized>(
    repo: &R,
    tenant: &TenantId,
) -> RepositoryResult<Vec<Program>> {
    list_programs_at(repo, tenant, station_now()).await
}

/// The tenant's week, grouped by day, with status recomputed at `now`.
pub async fn weekly_grid_at<R: FullRepository + ?Sized>(
    repo: &R,
    tenant: &TenantId,
    now: NaiveDateTime,
) -> RepositoryResult<WeeklyGrid> {
    let programs = list_programs_at(repo, tenant, now).await?;
    Ok(algorithms::weekly_grid(programs))
}

/// The tenant's week as of now.
pub async fn weekly_grid<R: FullRepository + ?Sized>(
    repo: &R,
    tenant: &TenantId,
) -> RepositoryResult<WeeklyGrid> {
    weekly_grid_at(repo, tenant, station_now()).await
}

// ==================== Notifications ====================

/// A user's notifications, newest first.
pub async fn list_notifications<R: FullRepository + ?Sized>(
    repo: &R,
    recipient: &UserId,
) -> RepositoryResult<Vec<Notification>> {
    repo.list_notifications(recipient).await
}

/// Number of unread notifications for a user.
pub async fn unread_count<R: FullRepository + ?Sized>(
    repo: &R,
    recipient: &UserId,
) -> RepositoryResult<usize> {
    let notifications = repo.list_notifications(recipient).await?;
    Ok(notifications.iter().filter(|n| !n.read).count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use crate::db::repository::NotificationRepository;
    use crate::models::{
        DayOfWeek, NotificationType, ProgramCandidate, ProgramCategory, ProgramStatus,
    };
    use chrono::{NaiveDate, Utc};

    fn seed(repo: &LocalRepository, tenant: &TenantId) {
        let candidate = ProgramCandidate {
            name: "Matinale".to_string(),
            hosts: vec!["Awa".to_string()],
            days: vec![DayOfWeek::Monday, DayOfWeek::Wednesday],
            start_time: "06:00".parse().unwrap(),
            end_time: "09:00".parse().unwrap(),
            category: ProgramCategory::News,
            description: String::new(),
        };
        repo.seed_programs(
            candidate
                .unique_days()
                .into_iter()
                .map(|day| candidate.for_day(tenant, day, Utc::now()))
                .collect(),
        );
    }

    #[tokio::test]
    async fn test_grid_refreshes_status() {
        let repo = LocalRepository::new();
        let tenant = TenantId::new("dir-1");
        seed(&repo, &tenant);

        // 2026-10-19 is a Monday.
        let now = NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(7, 30, 0)
            .unwrap();
        let grid = weekly_grid_at(&repo, &tenant, now).await.unwrap();

        assert_eq!(grid.program_count(), 2);
        assert_eq!(grid.day(DayOfWeek::Monday)[0].status, ProgramStatus::Ongoing);
        assert_eq!(
            grid.day(DayOfWeek::Wednesday)[0].status,
            ProgramStatus::Upcoming
        );
    }

    #[tokio::test]
    async fn test_unread_count_ignores_read() {
        let repo = LocalRepository::new();
        let host = UserId::new("host-1");
        for title in ["a", "b"] {
            repo.create_notification(&Notification::new(
                host.clone(),
                NotificationType::ConducteurValidated,
                title,
                "",
                None,
            ))
            .await
            .unwrap();
        }
        let first = list_notifications(&repo, &host).await.unwrap()[0]
            .id
            .unwrap();
        repo.mark_read(first).await.unwrap();

        assert_eq!(unread_count(&repo, &host).await.unwrap(), 1);
        assert_eq!(unread_count(&repo, &UserId::new("other")).await.unwrap(), 0);
    }
}
