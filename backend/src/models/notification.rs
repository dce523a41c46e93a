//! In-app notifications emitted by run-sheet workflow events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{ConducteurId, NotificationId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    ConducteurSubmitted,
    ConducteurValidated,
    ConducteurRejected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Option<NotificationId>,
    pub recipient: UserId,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub conducteur_id: Option<ConducteurId>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// An unread notification, not yet persisted.
    pub fn new(
        recipient: UserId,
        kind: NotificationType,
        title: impl Into<String>,
        message: impl Into<String>,
        conducteur_id: Option<ConducteurId>,
    ) -> Self {
        Self {
            id: None,
            recipient,
            kind,
            title: title.into(),
            message: message.into(),
            conducteur_id,
            read: false,
            created_at: Utc::now(),
        }
    }
}
