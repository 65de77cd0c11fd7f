//! Academy (Course Portal) Backend Module
//!
//! Enrollment-gated content delivery for the course hierarchy
//! (courses -> modules -> lessons -> video parts), per-user progress
//! tracking over that hierarchy, and signed time-limited media URLs.
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, rollup math, repository traits
//! - `application/` - Use cases and media configuration
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, routers
//!
//! ## Access Model
//! - An enrollment with payment status `completed` or `free`, and an
//!   unexpired `expires_at`, is the sole gate to lessons and videos
//! - Only `ready` video parts are listed, playable, or counted in
//!   duration totals
//! - Completion is sticky: ordinary progress reports never regress a
//!   completed video; only an explicit reset clears it

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::MediaConfig;
pub use error::{AcademyError, AcademyResult};
pub use infra::postgres::PgAcademyRepository;
pub use presentation::router::academy_routers;

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod store {
    pub use crate::infra::postgres::PgAcademyRepository as AcademyStore;
}

pub mod router {
    pub use crate::presentation::router::*;
}

#[cfg(test)]
mod tests;
