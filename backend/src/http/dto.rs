//! Data Transfer Objects for the HTTP API.
//!
//! Domain types already derive Serialize/Deserialize and are used directly;
//! the types here wrap them where a request or response needs extra fields.

use serde::{Deserialize, Serialize};

use crate::algorithms::WeeklyGrid;
use crate::models::{
    Conducteur, ConducteurStatus, Notification, Program, ProgramCandidate, ProgramConflict,
    ProgramId,
};
use crate::services::{ConducteurDraft, Resolution};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub repository: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramListResponse {
    pub programs: Vec<Program>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridResponse {
    #[serde(flatten)]
    pub grid: WeeklyGrid,
    pub total: usize,
}

/// Conflicts of a candidate, with the deduplicated ids a Replace would delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictsResponse {
    pub conflicts: Vec<ProgramConflict>,
    pub conflicting_program_ids: Vec<ProgramId>,
}

/// Body of `POST /v1/programs/resolve`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveRequest {
    pub candidate: ProgramCandidate,
    pub resolution: Resolution,
}

/// Body of `PUT /v1/programs/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProgramRequest {
    #[serde(flatten)]
    pub program: ProgramCandidate,
    /// Save even if the new slot overlaps other programs
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConducteurListQuery {
    pub status: Option<ConducteurStatus>,
}

/// Body of `POST /v1/conducteurs` and `PUT /v1/conducteurs/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveConducteurRequest {
    #[serde(flatten)]
    pub draft: ConducteurDraft,
    /// Submit for validation instead of saving a draft
    #[serde(default)]
    pub submit: bool,
}

/// A run-sheet with its computed total duration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConducteurResponse {
    #[serde(flatten)]
    pub conducteur: Conducteur,
    pub total_duration: u32,
}

impl From<Conducteur> for ConducteurResponse {
    fn from(conducteur: Conducteur) -> Self {
        Self {
            total_duration: conducteur.total_duration(),
            conducteur,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConducteurListResponse {
    pub conducteurs: Vec<Conducteur>,
    pub total: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RejectRequest {
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationListResponse {
    pub notifications: Vec<Notification>,
    pub unread: usize,
}
