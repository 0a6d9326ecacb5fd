//! Contains all the routes that this application can handle.
//!
//! There is exactly one endpoint and it is path- and method-agnostic: every
//! request, whatever it hits, goes through the signup decision tree. That is
//! why the handler is mounted as the router fallback instead of a route, and
//! why there are no other routes (even a health-check path would leak past
//! the origin gate).

mod signup;

use axum::Router;

use crate::AppState;

/// All the routes of the server
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .fallback(signup::signup)
        .with_state(app_state)
}
