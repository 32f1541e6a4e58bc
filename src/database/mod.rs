pub mod manager;
pub mod models;
pub mod query_builder;
pub mod repository;
pub mod seeder;

pub use manager::{DatabaseError, DatabaseManager};
pub use query_builder::{ChangeSet, QueryBuilder};
pub use repository::{Repository, Trashed};
