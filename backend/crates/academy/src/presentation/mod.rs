//! Presentation Layer
//!
//! HTTP handlers, DTOs, and routers.

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::AcademyAppState;
pub use router::{academy_routers, courses_router, progress_router};
