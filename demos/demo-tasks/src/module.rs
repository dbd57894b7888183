use restkit::crud::{crud_controller, entity_binding, CrudConfig};
use restkit::{EventBus, FeatureModule, ModuleContext};
use tracing::info;

use crate::models::{Task, TaskCreatedEvent};
use crate::service::TaskService;
use crate::state::AppState;

/// Shared infrastructure module: exports the application event bus.
pub struct EventsModule;

impl<S> FeatureModule<S> for EventsModule
where
    S: Clone + Send + Sync + 'static,
{
    fn name(&self) -> &'static str {
        "events"
    }

    fn configure(&self, ctx: &mut ModuleContext<'_, S>) {
        ctx.provide(EventBus::new());
    }
}

/// The tasks feature: its service, entity binding, and CRUD controller,
/// declared in one place.
pub struct TasksModule;

impl FeatureModule<AppState> for TasksModule {
    fn name(&self) -> &'static str {
        "tasks"
    }

    fn configure(&self, ctx: &mut ModuleContext<'_, AppState>) {
        ctx.import(&EventsModule);
        ctx.register::<TaskService>();
        ctx.bind_entity(entity_binding::<Task>());

        crud_controller::<TaskService, AppState>(
            "/tasks",
            CrudConfig::new("task").with_tag("tasks"),
        )
        .install(ctx);
    }
}

/// Log every created task. Wired up by the binary at startup.
pub async fn log_created_tasks(events: &EventBus) {
    events
        .subscribe::<TaskCreatedEvent, _, _>(|event| async move {
            info!(id = event.id, title = %event.title, "task created");
        })
        .await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use restkit::{AppAssembly, EntityBinding, RouteInfo};
    use std::sync::Arc;

    use restkit::{RestConfig, StaticTokenVerifier, TokenVerifier};

    #[tokio::test]
    async fn module_declares_routes_and_bindings() {
        let verifier: Arc<dyn TokenVerifier> =
            Arc::new(StaticTokenVerifier::new().with_token("t", "u", &[]));
        let app = AppAssembly::<AppState>::new()
            .provide(RestConfig::empty())
            .provide(verifier)
            .install(&TasksModule)
            .assemble()
            .await
            .unwrap();

        let bindings = app.meta.get_or_empty::<EntityBinding>();
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings[0].name, "tasks");
        assert_eq!(bindings[0].columns, &["id", "title", "done"]);

        let routes = app.meta.get_or_empty::<RouteInfo>();
        assert_eq!(routes.len(), 5);
        assert!(routes.iter().all(|r| r.path.starts_with("/tasks")));
    }
}
