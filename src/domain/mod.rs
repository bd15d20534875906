//! Domain types.

pub mod todo;

pub use todo::{TodoInput, TodoItem};
