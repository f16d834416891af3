mod repo;
pub mod engine;
pub mod project;
pub mod types;

pub use engine::TaskEngine;
pub use types::{
    Priority, PriorityFilter, SortBy, Status, StatusFilter, Task, TaskDraft, TaskFilters,
    TaskPatch, TaskStats,
};
