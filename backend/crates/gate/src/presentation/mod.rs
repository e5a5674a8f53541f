//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and middleware.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::GateAppState;
pub use middleware::route_gate;
pub use router::{gate_router, gate_state};
