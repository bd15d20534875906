pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;

pub use config::Config;
pub use db::{init_db, init_memory_db, Repository};
pub use domain::{TodoInput, TodoItem};
pub use error::AppError;
