//! HTTP server module.
//!
//! This module provides an axum-based HTTP server that exposes the scheduling
//! core as a REST API. Handlers are thin: they extract the caller's identity,
//! call the service layer, and map outcomes to status codes.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                               │
//! │  - Identity headers -> ActorContext                       │
//! │  - JSON serialization/deserialization                     │
//! │  - CORS, compression, error handling                      │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Service Layer (services/)                                │
//! │  - Conflict resolution, run-sheet workflow                │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Repository Layer (db/)                                   │
//! │  - LocalRepository                                        │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod actor;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use actor::Actor;
pub use error::{ApiError, AppError};
pub use router::create_router;
pub use state::AppState;
