use std::collections::HashSet;

use axum::Router;

use crate::beans::{AsyncBean, Bean, BeanRegistry};
use crate::meta::{EntityBinding, MetaRegistry, RouteInfo};

/// A deployable feature unit: one resource family's entity binding,
/// controller routes, and provider services, declared in one place.
///
/// `configure` is purely declarative; nothing is constructed until the
/// assembly resolves the bean graph. Construction order is decided by the
/// registry, not by module order.
///
/// ```ignore
/// pub struct TasksModule;
///
/// impl FeatureModule<AppState> for TasksModule {
///     fn name(&self) -> &'static str {
///         "tasks"
///     }
///
///     fn configure(&self, ctx: &mut ModuleContext<'_, AppState>) {
///         ctx.import(&EventsModule);
///         ctx.register::<TaskService>();
///         ctx.bind_entity(entity_binding::<Task>());
///         // mount the generated CRUD controller...
///     }
/// }
/// ```
pub trait FeatureModule<S>: Send + Sync {
    /// Stable module name; used to deduplicate imports.
    fn name(&self) -> &'static str;

    /// Declare the module's providers, entity bindings, and routes.
    fn configure(&self, ctx: &mut ModuleContext<'_, S>);
}

/// Registration surface handed to [`FeatureModule::configure`].
pub struct ModuleContext<'a, S> {
    pub(crate) registry: &'a mut BeanRegistry,
    pub(crate) meta: &'a mut MetaRegistry,
    pub(crate) routers: &'a mut Vec<(String, Router<S>)>,
    pub(crate) installed: &'a mut HashSet<&'static str>,
}

impl<S> ModuleContext<'_, S> {
    /// Provide a pre-built instance to the bean graph.
    pub fn provide<T: Clone + Send + Sync + 'static>(&mut self, value: T) -> &mut Self {
        self.registry.provide(value);
        self
    }

    /// Register a singleton provider service.
    pub fn register<T: Bean>(&mut self) -> &mut Self {
        self.registry.register::<T>();
        self
    }

    /// Register a singleton provider with an async constructor.
    pub fn register_async<T: AsyncBean>(&mut self) -> &mut Self {
        self.registry.register_async::<T>();
        self
    }

    /// Register a per-request (prototype-scoped) provider.
    pub fn register_prototype<T: Bean>(&mut self) -> &mut Self {
        self.registry.register_prototype::<T>();
        self
    }

    /// Declare the persistence binding for one of this module's entities.
    pub fn bind_entity(&mut self, binding: EntityBinding) -> &mut Self {
        self.meta.push(binding);
        self
    }

    /// Mount a controller router under a base path.
    pub fn mount(&mut self, path: &str, router: Router<S>) -> &mut Self {
        self.routers.push((path.to_string(), router));
        self
    }

    /// Push API-documentation metadata for routes this module mounts.
    pub fn routes(&mut self, infos: Vec<RouteInfo>) -> &mut Self {
        self.meta.extend(infos);
        self
    }

    /// Install a sibling module this one depends on (e.g. the module
    /// exporting the event bus). Importing the same module twice is a no-op.
    pub fn import(&mut self, module: &dyn FeatureModule<S>) -> &mut Self {
        if self.installed.insert(module.name()) {
            module.configure(self);
        }
        self
    }
}
