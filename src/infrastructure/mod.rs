// src/infrastructure/mod.rs
//
// Infrastructure Layer
//
// Contains implementation details that support the domain
// but are not part of the domain itself.

pub mod password;

pub use password::{hash_password, verify_password};
