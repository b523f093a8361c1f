//! UrbanMatch - user profile store with interest-based matching
//!
//! This library holds the email validation and matching core, the record
//! stores, and the HTTP routes of the UrbanMatch service.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{find_matches, validate_email, ValidationResult};
pub use models::{MatchFilter, User, UserFields, UserId};
pub use services::{InMemoryUserStore, PostgresClient, ServiceError, UserService, UserStore};
