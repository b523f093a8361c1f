// Service exports
pub mod memory;
pub mod postgres;
pub mod store;
pub mod users;

pub use memory::InMemoryUserStore;
pub use postgres::PostgresClient;
pub use store::{StoreError, UserStore};
pub use users::{ServiceError, UserService};
