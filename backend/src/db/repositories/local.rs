//! In-memory local repository implementation.
//!
//! This module provides a local implementation of all repository traits
//! suitable for unit testing and local development. All data is stored in
//! memory using HashMaps, providing fast, deterministic, and isolated
//! execution. Failures of individual store calls can be injected to exercise
//! the partial-batch paths of the services.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use crate::db::repository::*;
use crate::models::{
    Conducteur, ConducteurElement, ConducteurId, ConducteurStatus, DayOfWeek, ElementId,
    Notification, NotificationId, Program, ProgramId, TenantId, UserId,
};

/// In-memory local repository.
///
/// # Example
/// ```
/// use radio_grid::db::repositories::LocalRepository;
///
/// let repo = LocalRepository::new();
/// assert_eq!(repo.program_count(), 0);
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    programs: HashMap<ProgramId, Program>,
    conducteurs: HashMap<ConducteurId, Conducteur>,
    elements: HashMap<ElementId, ConducteurElement>,
    notifications: HashMap<NotificationId, Notification>,

    // ID counters
    next_program_id: i64,
    next_conducteur_id: i64,
    next_element_id: i64,
    next_notification_id: i64,

    // Connection health
    is_healthy: bool,

    faults: Faults,
}

/// Store calls that should fail, for exercising partial batches.
#[derive(Default)]
struct Faults {
    program_create_days: HashSet<DayOfWeek>,
    program_deletes: HashSet<ProgramId>,
    notifications: bool,
    element_writes: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            programs: HashMap::new(),
            conducteurs: HashMap::new(),
            elements: HashMap::new(),
            notifications: HashMap::new(),
            next_program_id: 1,
            next_conducteur_id: 1,
            next_element_id: 1,
            next_notification_id: 1,
            is_healthy: true,
            faults: Faults::default(),
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Create a repository pre-populated with programs from a JSON array file.
    pub fn from_seed_file<P: AsRef<Path>>(path: P) -> RepositoryResult<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::configuration(format!(
                "Failed to read seed file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        let programs: Vec<Program> = serde_json::from_str(&content).map_err(|e| {
            RepositoryError::configuration(format!("Failed to parse seed file: {}", e))
        })?;

        let repo = Self::new();
        repo.seed_programs(programs);
        Ok(repo)
    }

    /// Insert programs directly, assigning fresh ids. Returns the ids in input order.
    pub fn seed_programs(&self, programs: Vec<Program>) -> Vec<ProgramId> {
        let mut data = self.data.write();
        programs
            .into_iter()
            .map(|mut program| {
                let id = ProgramId(data.next_program_id);
                data.next_program_id += 1;
                program.id = Some(id);
                data.programs.insert(id, program);
                id
            })
            .collect()
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Make program creation fail for a given day.
    pub fn fail_program_creates_on(&self, day: DayOfWeek) {
        self.data.write().faults.program_create_days.insert(day);
    }

    /// Make deletion of one program fail.
    pub fn fail_program_delete(&self, id: ProgramId) {
        self.data.write().faults.program_deletes.insert(id);
    }

    /// Make every notification write fail.
    pub fn fail_notifications(&self, fail: bool) {
        self.data.write().faults.notifications = fail;
    }

    /// Make every segment write fail.
    pub fn fail_element_writes(&self, fail: bool) {
        self.data.write().faults.element_writes = fail;
    }

    /// Clear all data and injected faults.
    pub fn clear(&self) {
        let mut data = self.data.write();
        let is_healthy = data.is_healthy;
        *data = LocalData {
            is_healthy,
            ..Default::default()
        };
    }

    pub fn program_count(&self) -> usize {
        self.data.read().programs.len()
    }

    pub fn notification_count(&self) -> usize {
        self.data.read().notifications.len()
    }

    /// Helper to check health and return error if unhealthy.
    fn check_health(&self, operation: &str) -> RepositoryResult<()> {
        if !self.data.read().is_healthy {
            return Err(RepositoryError::connection_with_context(
                "Store is not healthy",
                ErrorContext::new(operation),
            ));
        }
        Ok(())
    }

    fn injected(operation: &str, entity: &str, id: impl ToString) -> RepositoryError {
        RepositoryError::query_with_context(
            "Injected failure",
            ErrorContext::new(operation)
                .with_entity(entity)
                .with_entity_id(id),
        )
    }

    fn program_not_found(operation: &str, id: ProgramId) -> RepositoryError {
        RepositoryError::not_found_with_context(
            format!("Program {} not found", id),
            ErrorContext::new(operation)
                .with_entity("program")
                .with_entity_id(id),
        )
    }

    fn conducteur_not_found(operation: &str, id: ConducteurId) -> RepositoryError {
        RepositoryError::not_found_with_context(
            format!("Conducteur {} not found", id),
            ErrorContext::new(operation)
                .with_entity("conducteur")
                .with_entity_id(id),
        )
    }

    fn sorted_elements(data: &LocalData, id: ConducteurId) -> Vec<ConducteurElement> {
        let mut elements: Vec<ConducteurElement> = data
            .elements
            .values()
            .filter(|e| e.conducteur_id == Some(id))
            .cloned()
            .collect();
        elements.sort_by_key(|e| (e.order, e.id));
        elements
    }

    fn newest_first(mut conducteurs: Vec<Conducteur>) -> Vec<Conducteur> {
        conducteurs.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        conducteurs
    }

    fn list_conducteurs_where(&self, keep: impl Fn(&Conducteur) -> bool) -> Vec<Conducteur> {
        let data = self.data.read();
        Self::newest_first(data.conducteurs.values().filter(|c| keep(*c)).cloned().collect())
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProgramRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn list_programs(&self, tenant: &TenantId) -> RepositoryResult<Vec<Program>> {
        self.check_health("list_programs")?;
        let data = self.data.read();
        let mut programs: Vec<Program> = data
            .programs
            .values()
            .filter(|p| &p.tenant == tenant)
            .cloned()
            .collect();
        programs.sort_by_key(|p| p.id);
        Ok(programs)
    }

    async fn get_program(&self, id: ProgramId, tenant: &TenantId) -> RepositoryResult<Program> {
        self.check_health("get_program")?;
        self.data
            .read()
            .programs
            .get(&id)
            .filter(|p| &p.tenant == tenant)
            .cloned()
            .ok_or_else(|| Self::program_not_found("get_program", id))
    }

    async fn create_program(
        &self,
        program: &Program,
        tenant: &TenantId,
    ) -> RepositoryResult<ProgramId> {
        self.check_health("create_program")?;
        let mut data = self.data.write();
        if data.faults.program_create_days.contains(&program.day) {
            return Err(Self::injected("create_program", "program", &program.name));
        }

        let id = ProgramId(data.next_program_id);
        data.next_program_id += 1;

        let mut stored = program.clone();
        stored.id = Some(id);
        stored.tenant = tenant.clone();
        data.programs.insert(id, stored);
        Ok(id)
    }

    async fn update_program(&self, program: &Program, tenant: &TenantId) -> RepositoryResult<()> {
        self.check_health("update_program")?;
        let id = program.id.ok_or_else(|| {
            RepositoryError::validation("Cannot update a program without an id")
                .with_operation("update_program")
        })?;

        let mut data = self.data.write();
        match data.programs.get_mut(&id) {
            Some(existing) if &existing.tenant == tenant => {
                *existing = program.clone();
                existing.tenant = tenant.clone();
                Ok(())
            }
            _ => Err(Self::program_not_found("update_program", id)),
        }
    }

    async fn delete_program(&self, id: ProgramId, tenant: &TenantId) -> RepositoryResult<()> {
        self.check_health("delete_program")?;
        let mut data = self.data.write();
        if data.faults.program_deletes.contains(&id) {
            return Err(Self::injected("delete_program", "program", id));
        }
        let owned = data
            .programs
            .get(&id)
            .map(|p| &p.tenant == tenant)
            .unwrap_or(false);
        if !owned {
            return Err(Self::program_not_found("delete_program", id));
        }
        data.programs.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl ConducteurRepository for LocalRepository {
    async fn create_conducteur(&self, conducteur: &Conducteur) -> RepositoryResult<ConducteurId> {
        self.check_health("create_conducteur")?;
        let mut data = self.data.write();
        let id = ConducteurId(data.next_conducteur_id);
        data.next_conducteur_id += 1;

        let mut stored = conducteur.clone();
        stored.id = Some(id);
        stored.elements.clear();
        data.conducteurs.insert(id, stored);
        Ok(id)
    }

    async fn update_conducteur(&self, conducteur: &Conducteur) -> RepositoryResult<()> {
        self.check_health("update_conducteur")?;
        let id = conducteur.id.ok_or_else(|| {
            RepositoryError::validation("Cannot update a conducteur without an id")
                .with_operation("update_conducteur")
        })?;

        let mut data = self.data.write();
        let existing = data
            .conducteurs
            .get_mut(&id)
            .ok_or_else(|| Self::conducteur_not_found("update_conducteur", id))?;
        *existing = conducteur.clone();
        existing.elements.clear();
        Ok(())
    }

    async fn delete_conducteur(&self, id: ConducteurId) -> RepositoryResult<()> {
        self.check_health("delete_conducteur")?;
        let mut data = self.data.write();
        if data.conducteurs.remove(&id).is_none() {
            return Err(Self::conducteur_not_found("delete_conducteur", id));
        }
        data.elements.retain(|_, e| e.conducteur_id != Some(id));
        Ok(())
    }

    async fn get_with_elements(&self, id: ConducteurId) -> RepositoryResult<Conducteur> {
        self.check_health("get_with_elements")?;
        let data = self.data.read();
        let mut conducteur = data
            .conducteurs
            .get(&id)
            .cloned()
            .ok_or_else(|| Self::conducteur_not_found("get_with_elements", id))?;
        conducteur.elements = Self::sorted_elements(&data, id);
        Ok(conducteur)
    }

    async fn list_conducteurs(&self, tenant: &TenantId) -> RepositoryResult<Vec<Conducteur>> {
        self.check_health("list_conducteurs")?;
        Ok(self.list_conducteurs_where(|c| &c.tenant == tenant))
    }

    async fn list_by_status(
        &self,
        tenant: &TenantId,
        status: ConducteurStatus,
    ) -> RepositoryResult<Vec<Conducteur>> {
        self.check_health("list_by_status")?;
        Ok(self.list_conducteurs_where(|c| &c.tenant == tenant && c.status == status))
    }

    async fn list_by_host(&self, host: &UserId) -> RepositoryResult<Vec<Conducteur>> {
        self.check_health("list_by_host")?;
        Ok(self.list_conducteurs_where(|c| &c.host_id == host))
    }

    async fn update_status(
        &self,
        id: ConducteurId,
        status: ConducteurStatus,
        rejection_comment: Option<String>,
    ) -> RepositoryResult<()> {
        self.check_health("update_status")?;
        let mut data = self.data.write();
        let existing = data
            .conducteurs
            .get_mut(&id)
            .ok_or_else(|| Self::conducteur_not_found("update_status", id))?;
        existing.status = status;
        existing.rejection_comment = rejection_comment;
        existing.updated_at = chrono::Utc::now();
        Ok(())
    }
}

#[async_trait]
impl ElementRepository for LocalRepository {
    async fn create_element(
        &self,
        conducteur_id: ConducteurId,
        element: &ConducteurElement,
    ) -> RepositoryResult<ElementId> {
        self.check_health("create_element")?;
        let mut data = self.data.write();
        if data.faults.element_writes {
            return Err(Self::injected("create_element", "element", &element.title));
        }
        if !data.conducteurs.contains_key(&conducteur_id) {
            return Err(Self::conducteur_not_found("create_element", conducteur_id));
        }

        let id = ElementId(data.next_element_id);
        data.next_element_id += 1;

        let mut stored = element.clone();
        stored.id = Some(id);
        stored.conducteur_id = Some(conducteur_id);
        data.elements.insert(id, stored);
        Ok(id)
    }

    async fn update_element(&self, element: &ConducteurElement) -> RepositoryResult<()> {
        self.check_health("update_element")?;
        let id = element.id.ok_or_else(|| {
            RepositoryError::validation("Cannot update a segment without an id")
                .with_operation("update_element")
        })?;

        let mut data = self.data.write();
        if data.faults.element_writes {
            return Err(Self::injected("update_element", "element", id));
        }
        let existing = data.elements.get_mut(&id).ok_or_else(|| {
            RepositoryError::not_found(format!("Segment {} not found", id))
                .with_operation("update_element")
                .with_entity("element", id)
        })?;
        let conducteur_id = existing.conducteur_id;
        *existing = element.clone();
        existing.conducteur_id = conducteur_id;
        Ok(())
    }

    async fn delete_element(&self, id: ElementId) -> RepositoryResult<()> {
        self.check_health("delete_element")?;
        let mut data = self.data.write();
        if data.faults.element_writes {
            return Err(Self::injected("delete_element", "element", id));
        }
        data.elements.remove(&id).map(|_| ()).ok_or_else(|| {
            RepositoryError::not_found(format!("Segment {} not found", id))
                .with_operation("delete_element")
                .with_entity("element", id)
        })
    }

    async fn list_elements(
        &self,
        conducteur_id: ConducteurId,
    ) -> RepositoryResult<Vec<ConducteurElement>> {
        self.check_health("list_elements")?;
        Ok(Self::sorted_elements(&self.data.read(), conducteur_id))
    }
}

#[async_trait]
impl NotificationRepository for LocalRepository {
    async fn create_notification(
        &self,
        notification: &Notification,
    ) -> RepositoryResult<NotificationId> {
        self.check_health("create_notification")?;
        let mut data = self.data.write();
        if data.faults.notifications {
            return Err(Self::injected(
                "create_notification",
                "notification",
                &notification.recipient,
            ));
        }

        let id = NotificationId(data.next_notification_id);
        data.next_notification_id += 1;

        let mut stored = notification.clone();
        stored.id = Some(id);
        data.notifications.insert(id, stored);
        Ok(id)
    }

    async fn list_notifications(&self, recipient: &UserId) -> RepositoryResult<Vec<Notification>> {
        self.check_health("list_notifications")?;
        let data = self.data.read();
        let mut notifications: Vec<Notification> = data
            .notifications
            .values()
            .filter(|n| &n.recipient == recipient)
            .cloned()
            .collect();
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(notifications)
    }

    async fn mark_read(&self, id: NotificationId) -> RepositoryResult<Notification> {
        self.check_health("mark_read")?;
        let mut data = self.data.write();
        let notification = data.notifications.get_mut(&id).ok_or_else(|| {
            RepositoryError::not_found(format!("Notification {} not found", id))
                .with_operation("mark_read")
                .with_entity("notification", id)
        })?;
        notification.read = true;
        Ok(notification.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProgramCandidate, ProgramCategory};
    use chrono::Utc;

    fn program(tenant: &str, day: DayOfWeek) -> Program {
        ProgramCandidate {
            name: "Journal".to_string(),
            hosts: vec![],
            days: vec![day],
            start_time: "12:00".parse().unwrap(),
            end_time: "12:30".parse().unwrap(),
            category: ProgramCategory::News,
            description: String::new(),
        }
        .for_day(&TenantId::new(tenant), day, Utc::now())
    }

    #[tokio::test]
    async fn test_programs_are_tenant_scoped() {
        let repo = LocalRepository::new();
        let a = TenantId::new("a");
        let b = TenantId::new("b");
        let id = repo
            .create_program(&program("a", DayOfWeek::Monday), &a)
            .await
            .unwrap();

        assert_eq!(repo.list_programs(&a).await.unwrap().len(), 1);
        assert!(repo.list_programs(&b).await.unwrap().is_empty());
        assert!(repo.get_program(id, &b).await.unwrap_err().is_not_found());
        assert!(repo.delete_program(id, &b).await.is_err());
        repo.delete_program(id, &a).await.unwrap();
        assert_eq!(repo.program_count(), 0);
    }

    #[tokio::test]
    async fn test_unhealthy_store_rejects_calls() {
        let repo = LocalRepository::new();
        repo.set_healthy(false);
        assert!(!repo.health_check().await.unwrap());
        let err = repo.list_programs(&TenantId::new("a")).await.unwrap_err();
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_injected_create_failure_is_per_day() {
        let repo = LocalRepository::new();
        let tenant = TenantId::new("a");
        repo.fail_program_creates_on(DayOfWeek::Tuesday);
        assert!(repo
            .create_program(&program("a", DayOfWeek::Tuesday), &tenant)
            .await
            .is_err());
        assert!(repo
            .create_program(&program("a", DayOfWeek::Monday), &tenant)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_mark_read_flips_flag_only() {
        let repo = LocalRepository::new();
        let notification = Notification::new(
            UserId::new("host"),
            crate::models::NotificationType::ConducteurValidated,
            "Validated",
            "ok",
            None,
        );
        let id = repo.create_notification(&notification).await.unwrap();
        let read = repo.mark_read(id).await.unwrap();
        assert!(read.read);
        assert_eq!(read.title, "Validated");
        assert_eq!(read.created_at, notification.created_at);
    }
}
