//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and middleware.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::AuthAppState;
pub use middleware::{authenticate, authenticate_optional, extract_bearer_token};
pub use router::{auth_router, auth_router_generic};
