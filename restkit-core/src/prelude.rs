//! restkit-core prelude: import the common surface with a single `use`.
//!
//! ```ignore
//! use restkit_core::prelude::*;
//! ```

pub use crate::assembly::{AppAssembly, AssembledApp};
pub use crate::beans::{AsyncBean, Bean, BeanContext, BeanError, BeanRegistry, BeanState, Scope};
pub use crate::config::{ConfigError, RestConfig};
pub use crate::error::HttpError;
pub use crate::events::EventBus;
pub use crate::guards::{
    AuthenticatedUser, HasVerifier, Identity, NoIdentity, StaticTokenVerifier, TokenVerifier,
};
pub use crate::layers::init_tracing;
pub use crate::meta::{EntityBinding, MetaRegistry, ParamInfo, ParamLocation, RouteInfo};
pub use crate::module::{FeatureModule, ModuleContext};
pub use crate::types::{ApiResult, JsonResult, StatusResult};
pub use crate::validation::{Validate, Validated};

// HTTP re-exports
pub use axum::extract::{Path, Query, State};
pub use axum::http::StatusCode;
pub use axum::response::{IntoResponse, Response};
pub use axum::{Json, Router};
