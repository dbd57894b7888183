use std::sync::Arc;

use restkit::crud::HasService;
use restkit::{BeanContext, BeanState, EventBus, HasVerifier, RestConfig, TokenVerifier};

use crate::service::TaskService;

#[derive(Clone)]
pub struct AppState {
    pub tasks: TaskService,
    pub verifier: Arc<dyn TokenVerifier>,
    pub events: EventBus,
    pub config: RestConfig,
}

impl BeanState for AppState {
    fn from_context(ctx: &BeanContext) -> Self {
        Self {
            tasks: ctx.get::<TaskService>(),
            verifier: ctx.get::<Arc<dyn TokenVerifier>>(),
            events: ctx.get::<EventBus>(),
            config: ctx.get::<RestConfig>(),
        }
    }
}

impl HasService<TaskService> for AppState {
    fn service(&self) -> &TaskService {
        &self.tasks
    }
}

impl HasVerifier for AppState {
    fn verifier(&self) -> &dyn TokenVerifier {
        self.verifier.as_ref()
    }
}
