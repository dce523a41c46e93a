//! A user's notification inbox.

use log::debug;

use super::error::{ServiceError, ServiceResult};
use crate::db::{self, FullRepository};
use crate::models::{ActorContext, Notification, NotificationId};

/// The caller's notifications, newest first.
pub async fn inbox<R: FullRepository + ?Sized>(
    repo: &R,
    actor: &ActorContext,
) -> ServiceResult<Vec<Notification>> {
    Ok(db::services::list_notifications(repo, &actor.user_id).await?)
}

pub async fn unread_count<R: FullRepository + ?Sized>(
    repo: &R,
    actor: &ActorContext,
) -> ServiceResult<usize> {
    Ok(db::services::unread_count(repo, &actor.user_id).await?)
}

/// Flip the read flag. Only the recipient may; anyone else sees not found.
pub async fn mark_read<R: FullRepository + ?Sized>(
    repo: &R,
    actor: &ActorContext,
    id: NotificationId,
) -> ServiceResult<Notification> {
    let owned = repo
        .list_notifications(&actor.user_id)
        .await?
        .iter()
        .any(|n| n.id == Some(id));
    if !owned {
        return Err(ServiceError::not_found(format!("Notification {}", id)));
    }
    let notification = repo.mark_read(id).await?;
    debug!("Notification {} read by {}", id, actor.user_id);
    Ok(notification)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use crate::db::NotificationRepository;
    use crate::models::{NotificationType, UserId};

    #[tokio::test]
    async fn test_only_recipient_marks_read() {
        let repo = LocalRepository::new();
        let id = repo
            .create_notification(&Notification::new(
                UserId::new("host-1"),
                NotificationType::ConducteurRejected,
                "Run-sheet rejected",
                "\"Matinale\" was rejected: trop long",
                None,
            ))
            .await
            .unwrap();

        let intruder = ActorContext::host("host-2", "dir-1");
        let err = mark_read(&repo, &intruder, id).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));

        let owner = ActorContext::host("host-1", "dir-1");
        assert_eq!(unread_count(&repo, &owner).await.unwrap(), 1);
        let read = mark_read(&repo, &owner, id).await.unwrap();
        assert!(read.read);
        assert_eq!(unread_count(&repo, &owner).await.unwrap(), 0);
        assert_eq!(inbox(&repo, &owner).await.unwrap().len(), 1);
    }
}
