//! HTTP API for the Populace behavior simulation.
//!
//! Exposes the simulation service over a small JSON REST surface:
//! decision analysis, population generation and full simulation runs,
//! plus health and category listings. Handlers are generic over the
//! completion model so the router can be exercised in-process.

pub mod error;
pub mod handlers;
pub mod logging;
pub mod router;
pub mod server;
pub mod state;

// Re-export primary types for convenience.
pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::AppState;
