//! # restkit-crud — generic CRUD controller factory
//!
//! Given a per-resource service implementing [`CrudService`] and a
//! [`CrudConfig`] carrying API-documentation metadata, [`crud_controller`]
//! produces a ready-to-mount controller: five REST handlers (list,
//! get-by-id, create, update, delete) delegating to the service, with
//! bearer-token auth on every route, garde validation on mutating payloads,
//! and begin/commit/rollback wrapped around every mutating operation.
//!
//! | Method | Path | Auth | Validation |
//! |--------|--------|------|-----------------|
//! | GET | `/` | yes | none |
//! | GET | `/{id}` | yes | none |
//! | POST | `/` | yes | create payload |
//! | PUT | `/{id}` | yes | update payload |
//! | DELETE | `/{id}` | yes | none |
//!
//! ```ignore
//! let controller = crud_controller::<TaskService, AppState>(
//!     "/tasks",
//!     CrudConfig::new("task").with_tag("tasks"),
//! );
//! controller.install(ctx);
//! ```

pub mod config;
pub mod docs;
pub mod entity;
pub mod error;
pub mod router;
pub mod service;

pub use config::{CrudConfig, OperationDoc, ResponseDoc};
pub use docs::describe_crud_routes;
pub use entity::{entity_binding, Entity};
pub use error::CrudError;
pub use router::{crud_controller, crud_router, CrudController, HasService};
pub use service::CrudService;

/// Re-exports of the most commonly used types.
pub mod prelude {
    pub use crate::{
        crud_controller, entity_binding, CrudConfig, CrudController, CrudError, CrudService,
        Entity, HasService,
    };
}
