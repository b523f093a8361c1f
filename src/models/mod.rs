// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{MatchFilter, User, UserFields, UserId};
pub use requests::ListUsersQuery;
pub use responses::{EmailValidationResponse, ErrorResponse, HealthResponse};
