//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (random bytes, HMAC, Base64)
//! - Password hashing (Argon2id, with composition policy validation)
//! - Access-token issuing and verification (JWT)
//! - Media URL signing (CDN canned policy + pre-signed storage fallback)

pub mod crypto;
pub mod password;
pub mod signing;
pub mod token;
