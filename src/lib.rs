// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod config;
pub mod credibility;
pub mod error;
pub mod export;
pub mod handle;
pub mod insights;
pub mod metrics;
pub mod model;
pub mod network;
pub mod orchestrator;
pub mod store;
pub mod verify;
pub mod viral;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::config::EngineConfig;
pub use crate::error::{AnalysisError, StoreError};
pub use crate::model::{Author, Connection, ConnectionKind, PostEvent, RiskLevel};
pub use crate::orchestrator::{NetworkAnalysisResult, NetworkAnalyzer};
