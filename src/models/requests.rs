use serde::{Deserialize, Serialize};

/// Offset/limit query for listing users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListUsersQuery {
    #[serde(default)]
    pub skip: u32,
    /// Falls back to `listing.default_limit` when absent
    #[serde(default)]
    pub limit: Option<u32>,
}
