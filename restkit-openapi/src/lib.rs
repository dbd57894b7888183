//! OpenAPI 3.1 document generation for restkit applications.
//!
//! Feature modules push [`RouteInfo`](restkit_core::RouteInfo) metadata
//! while registering their routes; [`build_openapi_spec`] assembles that
//! metadata into an OpenAPI 3.1.0 JSON document and [`openapi_router`]
//! serves it at `/openapi.json`.

mod builder;
pub mod schema;

pub use builder::{build_openapi_spec, openapi_router, OpenApiConfig};
pub use schema::{SchemaProvider, SchemaRegistry};
