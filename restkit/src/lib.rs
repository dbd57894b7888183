//! restkit — a modular REST application framework over axum.
//!
//! This facade crate re-exports the restkit sub-crates through a single
//! dependency. Import everything you need with:
//!
//! ```ignore
//! use restkit::prelude::*;
//! ```
//!
//! | Crate             | Concern                                          |
//! |-------------------|--------------------------------------------------|
//! | `restkit-core`    | Beans, feature modules, guards, validation, config |
//! | `restkit-crud`    | Generic CRUD controller factory                  |
//! | `restkit-openapi` | OpenAPI 3.1 document generation                  |

pub use restkit_core::*;

pub use restkit_crud as crud;
pub use restkit_openapi as openapi;

/// One-stop import for applications.
pub mod prelude {
    pub use restkit_core::prelude::*;
    pub use restkit_crud::prelude::*;
    pub use restkit_openapi::{build_openapi_spec, openapi_router, OpenApiConfig};
}
