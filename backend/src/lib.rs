//! # Radio Grid
//!
//! Scheduling core of a radio station: the weekly program grid and the
//! editorial workflow of episode run-sheets ("conducteurs").
//!
//! ## Features
//!
//! - **Conflict detection**: half-open overlap checks of a candidate slot
//!   across every selected day
//! - **Conflict resolution**: replace, modify, delete-conflicting or
//!   continue-anyway, with per-item batch results and no silent rollback
//! - **Run-sheets**: ordered typed segments with contiguous renumbering,
//!   drag-reorder and total duration
//! - **Workflow**: draft → pending → validated / rejected, role-gated, with
//!   notifications on every transition
//! - **HTTP API**: RESTful endpoints over the service layer
//!
//! ## Architecture
//!
//! - [`models`]: value types (time slots, programs, run-sheets, notifications, actors)
//! - [`algorithms`]: pure conflict detection and grid layout
//! - [`db`]: repository traits, the in-memory store, configuration
//! - [`services`]: scheduling, workflow and notification orchestration
//! - [`http`]: Axum-based HTTP server and request handlers

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod algorithms;
pub mod db;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
