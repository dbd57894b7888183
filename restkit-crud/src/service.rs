use std::future::Future;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::CrudError;

/// The per-resource service contract the CRUD controller factory binds to.
///
/// Uses RPITIT (return-position `impl Trait` in traits), so no `async-trait`
/// is needed. The five operations carry the resource semantics; the three
/// transactional markers delimit the unit of work the controller wraps
/// around every mutating operation.
///
/// The associated payload types carry the per-resource validation and
/// documentation schemas: `Create` and `Update` declare their rules with
/// `garde` and their JSON shape with `schemars`.
///
/// Consistency of partially applied side effects inside `create`/`update`/
/// `delete` is the implementation's burden; the controller only guarantees
/// the begin/commit/rollback pairing.
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `CrudService`",
    label = "this type cannot back a CRUD controller",
    note = "implement `CrudService` for your service type, then mount it with `crud_controller`"
)]
pub trait CrudService: Send + Sync + 'static {
    type Entity: Serialize + schemars::JsonSchema + Send + Sync + 'static;
    type Id: DeserializeOwned + std::fmt::Display + Send + Sync + 'static;
    type Filter: DeserializeOwned + schemars::JsonSchema + Send + 'static;
    type Create: DeserializeOwned
        + garde::Validate<Context = ()>
        + schemars::JsonSchema
        + Send
        + 'static;
    type Update: DeserializeOwned
        + garde::Validate<Context = ()>
        + schemars::JsonSchema
        + Send
        + 'static;

    /// List entities matching the filter. The filter is passed through from
    /// the query string unmodified; pagination and sorting are the
    /// implementation's concern.
    fn find(
        &self,
        filter: Self::Filter,
    ) -> impl Future<Output = Result<Vec<Self::Entity>, CrudError>> + Send;

    /// Fetch a single entity; `None` becomes 404 at the HTTP surface.
    fn find_by_id(
        &self,
        id: &Self::Id,
    ) -> impl Future<Output = Result<Option<Self::Entity>, CrudError>> + Send;

    fn create(
        &self,
        params: Self::Create,
    ) -> impl Future<Output = Result<Self::Entity, CrudError>> + Send;

    fn update(
        &self,
        id: &Self::Id,
        params: Self::Update,
    ) -> impl Future<Output = Result<Self::Entity, CrudError>> + Send;

    /// Delete an entity; `false` means nothing matched and becomes 404.
    fn delete(&self, id: &Self::Id) -> impl Future<Output = Result<bool, CrudError>> + Send;

    /// Open a unit of work.
    fn begin(&self) -> impl Future<Output = Result<(), CrudError>> + Send;

    /// Commit the open unit of work.
    fn commit(&self) -> impl Future<Output = Result<(), CrudError>> + Send;

    /// Roll back the open unit of work.
    fn rollback(&self) -> impl Future<Output = Result<(), CrudError>> + Send;
}
