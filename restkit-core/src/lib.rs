pub mod assembly;
pub mod beans;
pub mod config;
pub mod error;
pub mod events;
pub mod guards;
pub mod layers;
pub mod meta;
pub mod module;
pub mod prelude;
pub mod types;
pub mod validation;

pub use assembly::{AppAssembly, AssembledApp};
pub use beans::{AsyncBean, Bean, BeanContext, BeanError, BeanRegistry, BeanState, Scope};
pub use config::{ConfigError, ConfigValue, FromConfigValue, RestConfig};
pub use error::{error_response, HttpError};
pub use events::EventBus;
pub use guards::{
    AuthenticatedUser, HasVerifier, Identity, NoIdentity, StaticTokenVerifier, TokenVerifier,
};
pub use layers::init_tracing;
pub use meta::{EntityBinding, MetaRegistry, ParamInfo, ParamLocation, RouteInfo};
pub use module::{FeatureModule, ModuleContext};
pub use types::{ApiResult, JsonResult, StatusResult};
pub use validation::{FieldError, Validated, ValidationErrorResponse};
