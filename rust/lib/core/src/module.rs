use axum::Router;

/// A business module that contributes HTTP routes.
///
/// `sale` and `timesheet` implement this trait; `openerpd` collects them and
/// nests each router under `/{name}`.
pub trait Module: Send + Sync {
    /// Module name, used for logging and route prefixes.
    fn name(&self) -> &str;

    /// Return the module's routes, to be nested under `/{name}`.
    fn routes(&self) -> Router;
}
