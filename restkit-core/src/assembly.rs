use std::collections::HashSet;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::beans::{BeanContext, BeanError, BeanRegistry, BeanState};
use crate::meta::MetaRegistry;
use crate::module::{FeatureModule, ModuleContext};

/// Collects feature modules, resolves the bean graph, and produces the
/// application router plus its state.
///
/// ```ignore
/// let app = AppAssembly::<AppState>::new()
///     .provide(config)
///     .provide(verifier)
///     .install(&TasksModule)
///     .assemble()
///     .await?;
/// app.serve("0.0.0.0:3000").await?;
/// ```
pub struct AppAssembly<S> {
    registry: BeanRegistry,
    meta: MetaRegistry,
    routers: Vec<(String, Router<S>)>,
    installed: HashSet<&'static str>,
}

impl<S> AppAssembly<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            registry: BeanRegistry::new(),
            meta: MetaRegistry::new(),
            routers: Vec::new(),
            installed: HashSet::new(),
        }
    }

    /// Provide a pre-built instance to the bean graph (config, verifier,
    /// pools, anything modules should not own).
    pub fn provide<T: Clone + Send + Sync + 'static>(mut self, value: T) -> Self {
        self.registry.provide(value);
        self
    }

    /// Install a feature module (and, transitively, its imports).
    pub fn install(mut self, module: &dyn FeatureModule<S>) -> Self {
        let mut ctx = ModuleContext {
            registry: &mut self.registry,
            meta: &mut self.meta,
            routers: &mut self.routers,
            installed: &mut self.installed,
        };
        ctx.import(module);
        self
    }

    /// Resolve the bean graph, build the state, and nest every mounted
    /// controller router under its base path.
    pub async fn assemble(self) -> Result<AssembledApp<S>, BeanError>
    where
        S: BeanState,
    {
        let ctx = self.registry.resolve().await?;
        let state = S::from_context(&ctx);

        let mut router: Router<S> = Router::new();
        for (path, mounted) in self.routers {
            router = router.nest(&path, mounted);
        }
        let router = router
            .with_state(state.clone())
            .layer(TraceLayer::new_for_http());

        Ok(AssembledApp {
            router,
            state,
            meta: self.meta,
            beans: ctx,
        })
    }
}

impl<S> Default for AppAssembly<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

/// The result of [`AppAssembly::assemble`]: a ready router, the built state,
/// and the metadata modules declared (route docs, entity bindings).
#[derive(Debug)]
pub struct AssembledApp<S> {
    pub router: Router,
    pub state: S,
    pub meta: MetaRegistry,
    pub beans: BeanContext,
}

impl<S> AssembledApp<S> {
    /// Bind a TCP listener and serve the router until shutdown.
    pub async fn serve(self, addr: &str) -> std::io::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!(addr, "listening");
        axum::serve(listener, self.router).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beans::Bean;
    use crate::meta::EntityBinding;
    use axum::routing::get;
    use std::any::{type_name, TypeId};

    #[derive(Clone, Debug)]
    struct Greeting(String);

    #[derive(Clone, Debug)]
    struct GreetingService {
        greeting: Greeting,
    }

    impl Bean for GreetingService {
        fn dependencies() -> Vec<(TypeId, &'static str)> {
            vec![(TypeId::of::<Greeting>(), type_name::<Greeting>())]
        }
        fn build(ctx: &BeanContext) -> Self {
            Self {
                greeting: ctx.get::<Greeting>(),
            }
        }
    }

    #[derive(Clone, Debug)]
    struct State {
        service: GreetingService,
    }

    impl BeanState for State {
        fn from_context(ctx: &BeanContext) -> Self {
            Self {
                service: ctx.get::<GreetingService>(),
            }
        }
    }

    struct GreetingModule;

    impl FeatureModule<State> for GreetingModule {
        fn name(&self) -> &'static str {
            "greeting"
        }
        fn configure(&self, ctx: &mut ModuleContext<'_, State>) {
            ctx.register::<GreetingService>();
            ctx.bind_entity(EntityBinding::new("greetings", "id", &["id", "text"]));
            ctx.mount("/greetings", Router::new().route("/", get(|| async { "hi" })));
        }
    }

    /// A module that imports GreetingModule; the import must only install once.
    struct OuterModule;

    impl FeatureModule<State> for OuterModule {
        fn name(&self) -> &'static str {
            "outer"
        }
        fn configure(&self, ctx: &mut ModuleContext<'_, State>) {
            ctx.import(&GreetingModule);
            ctx.import(&GreetingModule);
        }
    }

    #[tokio::test]
    async fn assembles_modules_into_state_and_meta() {
        let app = AppAssembly::<State>::new()
            .provide(Greeting("hello".to_string()))
            .install(&OuterModule)
            .assemble()
            .await
            .unwrap();

        assert_eq!(app.state.service.greeting.0, "hello");
        let bindings = app.meta.get_or_empty::<EntityBinding>();
        assert_eq!(bindings.len(), 1, "duplicate import must be a no-op");
        assert_eq!(bindings[0].name, "greetings");
    }

    #[tokio::test]
    async fn missing_provider_surfaces_bean_error() {
        let err = AppAssembly::<State>::new()
            .install(&GreetingModule)
            .assemble()
            .await
            .unwrap_err();
        assert!(matches!(err, BeanError::MissingDependency { .. }));
    }
}
