// Models module

pub mod todo;

// Re-export commonly used types
pub use todo::{Todo, TodoRequest, TodoResponse};
