//! Notification store.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{Notification, NotificationId, UserId};

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Store a notification and return its id.
    async fn create_notification(&self, notification: &Notification)
        -> RepositoryResult<NotificationId>;

    /// Notifications addressed to a user, newest first.
    async fn list_notifications(&self, recipient: &UserId) -> RepositoryResult<Vec<Notification>>;

    /// Flip the read flag. Nothing else about a notification ever changes.
    async fn mark_read(&self, id: NotificationId) -> RepositoryResult<Notification>;
}
