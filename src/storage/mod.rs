//! Storage implementations for different backends

pub mod connection;
pub mod in_memory;
pub mod mongodb;

pub use connection::{ConnectError, DatabaseConnection, RetryPolicy};
pub use in_memory::InMemoryRepository;
pub use self::mongodb::MongoRepository;
