//! Task-tracker demo: one feature module exposing a generated CRUD
//! controller over an in-memory, snapshot-transactional task store.

pub mod models;
pub mod module;
pub mod service;
pub mod state;

pub use module::{EventsModule, TasksModule};
pub use state::AppState;
