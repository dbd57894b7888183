use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use restkit_core::guards::{AuthenticatedUser, HasVerifier};
use restkit_core::module::ModuleContext;
use restkit_core::validation::Validated;
use restkit_core::{HttpError, JsonResult, RouteInfo, StatusResult};

use crate::config::CrudConfig;
use crate::docs::describe_crud_routes;
use crate::error::CrudError;
use crate::service::CrudService;

/// Trait for application states that expose a CRUD service.
///
/// ```ignore
/// impl HasService<TaskService> for AppState {
///     fn service(&self) -> &TaskService {
///         &self.tasks
///     }
/// }
/// ```
pub trait HasService<Svc> {
    fn service(&self) -> &Svc;
}

/// A generated CRUD controller: the handler router plus the route
/// documentation derived from the config.
pub struct CrudController<S> {
    base_path: String,
    router: Router<S>,
    routes: Vec<RouteInfo>,
}

impl<S> CrudController<S> {
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn routes(&self) -> &[RouteInfo] {
        &self.routes
    }

    /// Register this controller with a feature module: mounts the router
    /// under the base path and pushes the route docs.
    pub fn install(self, ctx: &mut ModuleContext<'_, S>) {
        ctx.routes(self.routes);
        ctx.mount(&self.base_path, self.router);
    }

    /// Split into parts for manual wiring outside the module system.
    pub fn into_parts(self) -> (String, Router<S>, Vec<RouteInfo>) {
        (self.base_path, self.router, self.routes)
    }
}

/// The controller factory: produce a [`CrudController`] for one resource.
///
/// The config is consumed here, at registration time; it contributes
/// documentation metadata only and does not alter routing behavior.
pub fn crud_controller<Svc, S>(base_path: &str, config: CrudConfig) -> CrudController<S>
where
    Svc: CrudService,
    S: HasService<Svc> + HasVerifier + Clone + Send + Sync + 'static,
{
    CrudController {
        base_path: base_path.to_string(),
        router: crud_router::<Svc, S>(),
        routes: describe_crud_routes::<Svc>(base_path, &config),
    }
}

/// Build just the five-route router, without documentation metadata.
pub fn crud_router<Svc, S>() -> Router<S>
where
    Svc: CrudService,
    S: HasService<Svc> + HasVerifier + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(find::<Svc, S>).post(create::<Svc, S>))
        .route(
            "/{id}",
            get(find_by_id::<Svc, S>)
                .put(update::<Svc, S>)
                .delete(remove::<Svc, S>),
        )
}

// ── Handlers ────────────────────────────────────────────────────────────────
//
// The `AuthenticatedUser` parameter is the auth guard: it runs before the
// handler body and short-circuits with 401. `Validated` is the validation
// pipe and short-circuits with 400, so a mutating handler body only ever
// sees payloads that passed their rules.

async fn find<Svc, S>(
    State(state): State<S>,
    _user: AuthenticatedUser,
    Query(filter): Query<Svc::Filter>,
) -> JsonResult<Vec<Svc::Entity>>
where
    Svc: CrudService,
    S: HasService<Svc> + HasVerifier + Clone + Send + Sync + 'static,
{
    let items = state.service().find(filter).await?;
    Ok(Json(items))
}

async fn find_by_id<Svc, S>(
    State(state): State<S>,
    _user: AuthenticatedUser,
    Path(id): Path<Svc::Id>,
) -> JsonResult<Svc::Entity>
where
    Svc: CrudService,
    S: HasService<Svc> + HasVerifier + Clone + Send + Sync + 'static,
{
    match state.service().find_by_id(&id).await? {
        Some(entity) => Ok(Json(entity)),
        None => Err(HttpError::NotFound(format!("No resource with id {id}"))),
    }
}

async fn create<Svc, S>(
    State(state): State<S>,
    _user: AuthenticatedUser,
    Validated(params): Validated<Svc::Create>,
) -> Result<(StatusCode, Json<Svc::Entity>), HttpError>
where
    Svc: CrudService,
    S: HasService<Svc> + HasVerifier + Clone + Send + Sync + 'static,
{
    let svc = state.service();
    svc.begin().await?;
    let outcome = svc.create(params).await;
    let created = commit_or_rollback(svc, outcome).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update<Svc, S>(
    State(state): State<S>,
    _user: AuthenticatedUser,
    Path(id): Path<Svc::Id>,
    Validated(params): Validated<Svc::Update>,
) -> JsonResult<Svc::Entity>
where
    Svc: CrudService,
    S: HasService<Svc> + HasVerifier + Clone + Send + Sync + 'static,
{
    let svc = state.service();
    svc.begin().await?;
    let outcome = svc.update(&id, params).await;
    let updated = commit_or_rollback(svc, outcome).await?;
    Ok(Json(updated))
}

async fn remove<Svc, S>(
    State(state): State<S>,
    _user: AuthenticatedUser,
    Path(id): Path<Svc::Id>,
) -> StatusResult
where
    Svc: CrudService,
    S: HasService<Svc> + HasVerifier + Clone + Send + Sync + 'static,
{
    let svc = state.service();
    svc.begin().await?;
    // The delete is awaited before commit; both stay inside the unit of work.
    let outcome = svc.delete(&id).await;
    let deleted = commit_or_rollback(svc, outcome).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(HttpError::NotFound(format!("No resource with id {id}")))
    }
}

// ── Transaction discipline ──────────────────────────────────────────────────

/// Close the unit of work opened by a successful `begin`.
///
/// Exactly one terminal call follows: `commit` on an `Ok` outcome, and
/// `rollback` when either the operation or the commit failed. Errors are
/// surfaced to the caller, never swallowed; a failing rollback is logged and
/// the original error is the one returned.
async fn commit_or_rollback<Svc, T>(svc: &Svc, outcome: Result<T, CrudError>) -> Result<T, CrudError>
where
    Svc: CrudService,
{
    match outcome {
        Ok(value) => match svc.commit().await {
            Ok(()) => Ok(value),
            Err(commit_err) => {
                tracing::warn!(error = %commit_err, "commit failed, rolling back");
                roll_back(svc).await;
                Err(commit_err)
            }
        },
        Err(op_err) => {
            roll_back(svc).await;
            Err(op_err)
        }
    }
}

async fn roll_back<Svc: CrudService>(svc: &Svc) {
    if let Err(err) = svc.rollback().await {
        tracing::error!(error = %err, "rollback failed");
    }
}
