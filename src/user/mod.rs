// Public API - what other modules can use
pub use handlers::{get_user, register_user};
pub use repository::{InMemoryUserRepository, PostgresUserRepository, UserRepository};

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
pub mod types;
