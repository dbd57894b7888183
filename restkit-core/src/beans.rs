use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

// ── Traits ──────────────────────────────────────────────────────────────────

/// Marker trait for types that can be auto-constructed from a [`BeanContext`].
///
/// Implement this trait to declare a type as a bean that the
/// [`BeanRegistry`] can resolve automatically.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not registered as a Bean",
    label = "this type is not a bean",
    note = "implement the `Bean` trait for your type and register it with `.register::<T>()`"
)]
pub trait Bean: Clone + Send + Sync + 'static {
    /// Returns the [`TypeId`]s and type names of all dependencies needed
    /// to construct this bean.
    fn dependencies() -> Vec<(TypeId, &'static str)>;

    /// Construct the bean from a fully resolved context.
    fn build(ctx: &BeanContext) -> Self;
}

/// Trait for beans that require async initialization (e.g. pools, HTTP clients).
///
/// Register with `.register_async::<T>()`; the constructor is awaited during
/// resolution.
pub trait AsyncBean: Clone + Send + Sync + 'static {
    /// Returns the [`TypeId`]s and type names of all dependencies needed
    /// to construct this bean.
    fn dependencies() -> Vec<(TypeId, &'static str)>;

    /// Construct the bean asynchronously from a fully resolved context.
    fn build(ctx: &BeanContext) -> impl Future<Output = Self> + Send + '_;
}

/// Trait for state structs that can be assembled from a [`BeanContext`].
///
/// The app assembly calls this once after the graph resolves to produce the
/// axum state.
pub trait BeanState: Clone + Send + Sync + 'static {
    /// Construct the state struct by pulling every field from the context.
    fn from_context(ctx: &BeanContext) -> Self;
}

/// Lifetime of a registered bean.
///
/// Singletons are constructed once during [`BeanRegistry::resolve`], in
/// dependency order, and live for the whole application. Prototypes are
/// validated in the graph like any other bean but constructed fresh on each
/// [`BeanContext::create`] call (per-request wiring).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Singleton,
    Prototype,
}

// ── BeanContext ─────────────────────────────────────────────────────────────

/// Read-only container holding all resolved singleton instances, plus the
/// set of declared prototype beans.
///
/// Produced by [`BeanRegistry::resolve`]. Each entry is keyed by [`TypeId`].
pub struct BeanContext {
    entries: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
    prototypes: HashMap<TypeId, &'static str>,
}

impl fmt::Debug for BeanContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeanContext")
            .field("entry_count", &self.entries.len())
            .field("prototype_count", &self.prototypes.len())
            .finish()
    }
}

impl BeanContext {
    /// Retrieve a singleton bean by type, cloning it out of the context.
    ///
    /// # Panics
    ///
    /// Panics if the requested type was not registered or provided.
    pub fn get<T: Clone + 'static>(&self) -> T {
        self.entries
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref::<T>())
            .unwrap_or_else(|| panic!("Bean of type `{}` not found in context", type_name::<T>()))
            .clone()
    }

    /// Try to retrieve a singleton bean by type, returning `None` if absent.
    pub fn try_get<T: Clone + 'static>(&self) -> Option<T> {
        self.entries
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref::<T>())
            .cloned()
    }

    /// Construct a fresh instance of a prototype-scoped bean.
    ///
    /// # Panics
    ///
    /// Panics if `T` was not registered with
    /// [`BeanRegistry::register_prototype`].
    pub fn create<T: Bean>(&self) -> T {
        if !self.prototypes.contains_key(&TypeId::of::<T>()) {
            panic!(
                "Bean of type `{}` is not registered as a prototype",
                type_name::<T>()
            );
        }
        T::build(self)
    }
}

// ── BeanRegistry ────────────────────────────────────────────────────────────

/// Async factory: takes the context by value (to avoid lifetime issues with
/// async captures), returns it back along with the constructed bean.
type Factory = Box<
    dyn FnOnce(
            BeanContext,
        )
            -> Pin<Box<dyn Future<Output = (BeanContext, Box<dyn Any + Send + Sync>)> + Send>>
        + Send,
>;

struct Registration {
    type_id: TypeId,
    type_name: &'static str,
    /// (TypeId, human-readable name) for each dependency.
    dependencies: Vec<(TypeId, &'static str)>,
    scope: Scope,
    /// `None` for prototypes, which are never constructed at resolve time.
    factory: Option<Factory>,
}

/// Builder that collects bean registrations and provided instances,
/// resolves the dependency graph, and produces a [`BeanContext`].
pub struct BeanRegistry {
    beans: Vec<Registration>,
    provided: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

/// Errors that can occur during bean graph resolution.
#[derive(Debug)]
pub enum BeanError {
    /// A dependency cycle was detected.
    CyclicDependency { cycle: Vec<String> },
    /// A bean declares a dependency that is neither registered nor provided.
    MissingDependency { bean: String, dependency: String },
    /// The same type was registered more than once.
    DuplicateBean { type_name: String },
    /// A singleton declares a dependency on a prototype-scoped bean.
    ScopeMismatch { bean: String, dependency: String },
}

impl fmt::Display for BeanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BeanError::CyclicDependency { cycle } => {
                write!(f, "Circular dependency detected: {}", cycle.join(" -> "))
            }
            BeanError::MissingDependency { bean, dependency } => {
                write!(
                    f,
                    "Missing dependency for bean '{}': type '{}' is not registered. \
                     Use .provide(instance) or .register::<Type>()",
                    bean, dependency
                )
            }
            BeanError::DuplicateBean { type_name } => {
                write!(f, "Bean of type '{}' registered twice", type_name)
            }
            BeanError::ScopeMismatch { bean, dependency } => {
                write!(
                    f,
                    "Singleton '{}' depends on prototype-scoped '{}'; \
                     prototypes must be created via BeanContext::create",
                    bean, dependency
                )
            }
        }
    }
}

impl std::error::Error for BeanError {}

impl BeanRegistry {
    /// Create a new, empty registry.
    pub fn new() -> Self {
        Self {
            beans: Vec::new(),
            provided: HashMap::new(),
        }
    }

    /// Provide a pre-built instance (e.g. external types like a pool).
    ///
    /// The instance will be available to beans that depend on type `T`.
    pub fn provide<T: Clone + Send + Sync + 'static>(&mut self, value: T) -> &mut Self {
        self.provided.insert(TypeId::of::<T>(), Box::new(value));
        self
    }

    /// Register a singleton bean for automatic construction.
    ///
    /// The bean's dependencies will be resolved from other beans or provided
    /// instances during [`resolve`](Self::resolve).
    pub fn register<T: Bean>(&mut self) -> &mut Self {
        self.beans.push(Registration {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            dependencies: T::dependencies(),
            scope: Scope::Singleton,
            factory: Some(Box::new(|ctx| {
                Box::pin(async move {
                    let bean = T::build(&ctx);
                    (ctx, Box::new(bean) as Box<dyn Any + Send + Sync>)
                })
            })),
        });
        self
    }

    /// Register an async singleton bean; its constructor is awaited during
    /// resolution.
    pub fn register_async<T: AsyncBean>(&mut self) -> &mut Self {
        self.beans.push(Registration {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            dependencies: T::dependencies(),
            scope: Scope::Singleton,
            factory: Some(Box::new(|ctx| {
                Box::pin(async move {
                    let bean = T::build(&ctx).await;
                    (ctx, Box::new(bean) as Box<dyn Any + Send + Sync>)
                })
            })),
        });
        self
    }

    /// Register a prototype-scoped bean.
    ///
    /// Its dependency edges participate in graph validation, but instances
    /// are only built on demand through [`BeanContext::create`].
    pub fn register_prototype<T: Bean>(&mut self) -> &mut Self {
        self.beans.push(Registration {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            dependencies: T::dependencies(),
            scope: Scope::Prototype,
            factory: None,
        });
        self
    }

    /// Resolve the dependency graph and build all singleton beans.
    ///
    /// Uses Kahn's algorithm for topological sorting, making the
    /// construction order explicit. Returns a [`BeanContext`] with all
    /// instances, or a [`BeanError`] if the graph is invalid (cycles,
    /// missing deps, duplicates, or scope mismatches).
    pub async fn resolve(self) -> Result<BeanContext, BeanError> {
        let mut entries: HashMap<TypeId, Box<dyn Any + Send + Sync>> = HashMap::new();

        // Move provided instances into the resolved set.
        for (tid, value) in self.provided {
            entries.insert(tid, value);
        }

        let prototypes: HashMap<TypeId, &'static str> = self
            .beans
            .iter()
            .filter(|r| r.scope == Scope::Prototype)
            .map(|r| (r.type_id, r.type_name))
            .collect();

        if self.beans.is_empty() {
            return Ok(BeanContext {
                entries,
                prototypes,
            });
        }

        Self::check_for_duplicates(&self.beans, &entries)?;

        let id_to_idx = Self::build_type_index(&self.beans);
        Self::check_dependencies(&self.beans, &entries, &id_to_idx)?;

        let sorted_order = Self::topological_sort(&self.beans, &id_to_idx)?;

        // Construct singletons in topological order (async).
        let mut bean_data: Vec<Option<(TypeId, Option<Factory>)>> = self
            .beans
            .into_iter()
            .map(|r| Some((r.type_id, r.factory)))
            .collect();

        for idx in sorted_order {
            let (type_id, factory) = bean_data[idx].take().unwrap();
            let Some(factory) = factory else {
                // Prototype slot: nothing to construct now.
                continue;
            };
            let ctx = BeanContext {
                entries,
                prototypes: HashMap::new(),
            };
            let (returned_ctx, bean_value) = factory(ctx).await;
            entries = returned_ctx.entries;
            entries.insert(type_id, bean_value);
        }

        Ok(BeanContext {
            entries,
            prototypes,
        })
    }

    fn check_for_duplicates(
        beans: &[Registration],
        entries: &HashMap<TypeId, Box<dyn Any + Send + Sync>>,
    ) -> Result<(), BeanError> {
        let mut seen: HashMap<TypeId, &str> = HashMap::new();
        for reg in beans {
            if entries.contains_key(&reg.type_id) {
                return Err(BeanError::DuplicateBean {
                    type_name: reg.type_name.to_string(),
                });
            }
            if seen.insert(reg.type_id, reg.type_name).is_some() {
                return Err(BeanError::DuplicateBean {
                    type_name: reg.type_name.to_string(),
                });
            }
        }
        Ok(())
    }

    fn build_type_index(beans: &[Registration]) -> HashMap<TypeId, usize> {
        beans
            .iter()
            .enumerate()
            .map(|(i, r)| (r.type_id, i))
            .collect()
    }

    /// Check that all dependencies are available and scope-compatible.
    fn check_dependencies(
        beans: &[Registration],
        entries: &HashMap<TypeId, Box<dyn Any + Send + Sync>>,
        id_to_idx: &HashMap<TypeId, usize>,
    ) -> Result<(), BeanError> {
        for reg in beans {
            for (dep_id, dep_name) in &reg.dependencies {
                let registered = id_to_idx.get(dep_id);
                if !entries.contains_key(dep_id) && registered.is_none() {
                    return Err(BeanError::MissingDependency {
                        bean: reg.type_name.to_string(),
                        dependency: dep_name.to_string(),
                    });
                }
                if reg.scope == Scope::Singleton {
                    if let Some(&dep_idx) = registered {
                        if beans[dep_idx].scope == Scope::Prototype {
                            return Err(BeanError::ScopeMismatch {
                                bean: reg.type_name.to_string(),
                                dependency: dep_name.to_string(),
                            });
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Topological sort using Kahn's algorithm.
    fn topological_sort(
        beans: &[Registration],
        id_to_idx: &HashMap<TypeId, usize>,
    ) -> Result<Vec<usize>, BeanError> {
        let bean_count = beans.len();

        // in_degree = number of deps that are other registered beans (not provided).
        let mut in_degree: Vec<usize> = beans
            .iter()
            .map(|reg| {
                reg.dependencies
                    .iter()
                    .filter(|(d, _)| id_to_idx.contains_key(d))
                    .count()
            })
            .collect();

        // Dependents: for each bean index, which other bean indices depend on it.
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); bean_count];
        for (i, reg) in beans.iter().enumerate() {
            for (dep_id, _) in &reg.dependencies {
                if let Some(&dep_idx) = id_to_idx.get(dep_id) {
                    dependents[dep_idx].push(i);
                }
            }
        }

        let mut queue: Vec<usize> = (0..bean_count).filter(|&i| in_degree[i] == 0).collect();
        let mut sorted_order: Vec<usize> = Vec::with_capacity(bean_count);

        while let Some(idx) = queue.pop() {
            sorted_order.push(idx);
            for &dep_idx in &dependents[idx] {
                in_degree[dep_idx] -= 1;
                if in_degree[dep_idx] == 0 {
                    queue.push(dep_idx);
                }
            }
        }

        // If not all beans were sorted, there's a cycle.
        if sorted_order.len() != bean_count {
            let cycle: Vec<String> = (0..bean_count)
                .filter(|i| in_degree[*i] > 0)
                .map(|i| beans[i].type_name.to_string())
                .collect();
            return Err(BeanError::CyclicDependency { cycle });
        }

        Ok(sorted_order)
    }
}

impl Default for BeanRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    struct Dep {
        value: i32,
    }

    #[derive(Clone)]
    struct ServiceA {
        dep: Dep,
    }

    impl Bean for ServiceA {
        fn dependencies() -> Vec<(TypeId, &'static str)> {
            vec![(TypeId::of::<Dep>(), type_name::<Dep>())]
        }
        fn build(ctx: &BeanContext) -> Self {
            Self {
                dep: ctx.get::<Dep>(),
            }
        }
    }

    #[derive(Clone)]
    struct ServiceB {
        a: ServiceA,
        dep: Dep,
    }

    impl Bean for ServiceB {
        fn dependencies() -> Vec<(TypeId, &'static str)> {
            vec![
                (TypeId::of::<ServiceA>(), type_name::<ServiceA>()),
                (TypeId::of::<Dep>(), type_name::<Dep>()),
            ]
        }
        fn build(ctx: &BeanContext) -> Self {
            Self {
                a: ctx.get::<ServiceA>(),
                dep: ctx.get::<Dep>(),
            }
        }
    }

    #[tokio::test]
    async fn resolve_simple_graph() {
        let mut reg = BeanRegistry::new();
        reg.provide(Dep { value: 42 });
        reg.register::<ServiceA>();
        reg.register::<ServiceB>();
        let ctx = reg.resolve().await.unwrap();

        let b: ServiceB = ctx.get();
        assert_eq!(b.dep.value, 42);
        assert_eq!(b.a.dep.value, 42);
    }

    #[tokio::test]
    async fn missing_dependency() {
        let mut reg = BeanRegistry::new();
        reg.register::<ServiceA>();
        let err = reg.resolve().await.unwrap_err();
        match &err {
            BeanError::MissingDependency { dependency, .. } => {
                assert!(
                    dependency.contains("Dep"),
                    "error should name the missing type: {}",
                    err
                );
            }
            _ => panic!("expected MissingDependency, got {:?}", err),
        }
    }

    #[tokio::test]
    async fn duplicate_bean_registered_twice() {
        let mut reg = BeanRegistry::new();
        reg.provide(Dep { value: 1 });
        reg.register::<ServiceA>();
        reg.register::<ServiceA>();
        let err = reg.resolve().await.unwrap_err();
        assert!(matches!(err, BeanError::DuplicateBean { .. }));
    }

    #[tokio::test]
    async fn duplicate_provided_and_bean() {
        let mut reg = BeanRegistry::new();
        reg.provide(Dep { value: 1 });
        reg.provide(ServiceA {
            dep: Dep { value: 2 },
        });
        reg.register::<ServiceA>();
        let err = reg.resolve().await.unwrap_err();
        assert!(matches!(err, BeanError::DuplicateBean { .. }));
    }

    #[derive(Clone)]
    struct CycleA;
    #[derive(Clone)]
    struct CycleB;

    impl Bean for CycleA {
        fn dependencies() -> Vec<(TypeId, &'static str)> {
            vec![(TypeId::of::<CycleB>(), type_name::<CycleB>())]
        }
        fn build(ctx: &BeanContext) -> Self {
            let _ = ctx.get::<CycleB>();
            Self
        }
    }
    impl Bean for CycleB {
        fn dependencies() -> Vec<(TypeId, &'static str)> {
            vec![(TypeId::of::<CycleA>(), type_name::<CycleA>())]
        }
        fn build(ctx: &BeanContext) -> Self {
            let _ = ctx.get::<CycleA>();
            Self
        }
    }

    #[tokio::test]
    async fn cyclic_dependency() {
        let mut reg = BeanRegistry::new();
        reg.register::<CycleA>();
        reg.register::<CycleB>();
        let err = reg.resolve().await.unwrap_err();
        assert!(matches!(err, BeanError::CyclicDependency { .. }));
    }

    #[tokio::test]
    async fn provided_only() {
        let mut reg = BeanRegistry::new();
        reg.provide(Dep { value: 7 });
        let ctx = reg.resolve().await.unwrap();
        let d: Dep = ctx.get();
        assert_eq!(d.value, 7);
    }

    #[tokio::test]
    async fn try_get_none() {
        let reg = BeanRegistry::new();
        let ctx = reg.resolve().await.unwrap();
        assert!(ctx.try_get::<Dep>().is_none());
    }

    // ── Async bean tests ──────────────────────────────────────────────────

    #[derive(Clone)]
    struct AsyncService {
        dep: Dep,
    }

    impl AsyncBean for AsyncService {
        fn dependencies() -> Vec<(TypeId, &'static str)> {
            vec![(TypeId::of::<Dep>(), type_name::<Dep>())]
        }
        async fn build(ctx: &BeanContext) -> Self {
            tokio::task::yield_now().await;
            Self {
                dep: ctx.get::<Dep>(),
            }
        }
    }

    #[tokio::test]
    async fn async_bean_resolution() {
        let mut reg = BeanRegistry::new();
        reg.provide(Dep { value: 99 });
        reg.register_async::<AsyncService>();
        let ctx = reg.resolve().await.unwrap();

        let svc: AsyncService = ctx.get();
        assert_eq!(svc.dep.value, 99);
    }

    // ── Prototype scope tests ─────────────────────────────────────────────

    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[derive(Clone)]
    struct Counter(Arc<AtomicU32>);

    #[derive(Clone)]
    struct PerRequest {
        instance: u32,
    }

    impl Bean for PerRequest {
        fn dependencies() -> Vec<(TypeId, &'static str)> {
            vec![(TypeId::of::<Counter>(), type_name::<Counter>())]
        }
        fn build(ctx: &BeanContext) -> Self {
            let counter: Counter = ctx.get();
            Self {
                instance: counter.0.fetch_add(1, Ordering::SeqCst),
            }
        }
    }

    #[tokio::test]
    async fn prototype_builds_fresh_instances() {
        let mut reg = BeanRegistry::new();
        reg.provide(Counter(Arc::new(AtomicU32::new(0))));
        reg.register_prototype::<PerRequest>();
        let ctx = reg.resolve().await.unwrap();

        // Not constructed at resolve time.
        assert!(ctx.try_get::<PerRequest>().is_none());

        let first = ctx.create::<PerRequest>();
        let second = ctx.create::<PerRequest>();
        assert_eq!(first.instance, 0);
        assert_eq!(second.instance, 1);
    }

    #[derive(Clone)]
    struct WantsPrototype;

    impl Bean for WantsPrototype {
        fn dependencies() -> Vec<(TypeId, &'static str)> {
            vec![(TypeId::of::<PerRequest>(), type_name::<PerRequest>())]
        }
        fn build(_ctx: &BeanContext) -> Self {
            Self
        }
    }

    #[tokio::test]
    async fn singleton_depending_on_prototype_is_rejected() {
        let mut reg = BeanRegistry::new();
        reg.provide(Counter(Arc::new(AtomicU32::new(0))));
        reg.register_prototype::<PerRequest>();
        reg.register::<WantsPrototype>();
        let err = reg.resolve().await.unwrap_err();
        assert!(matches!(err, BeanError::ScopeMismatch { .. }));
    }
}
