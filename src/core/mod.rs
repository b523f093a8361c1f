// Core algorithm exports
pub mod email;
pub mod filters;
pub mod matcher;

pub use email::{is_valid_syntax, validate_email, UserLookup, ValidationResult};
pub use filters::{matches_filter, shares_interest};
pub use matcher::find_matches;
