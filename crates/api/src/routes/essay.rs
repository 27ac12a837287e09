//! Route definitions for the `/essays` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::essay;
use crate::state::AppState;

/// Routes mounted at `/essays`.
///
/// ```text
/// GET    /                  -> list_published (by category)
/// POST   /                  -> create_essay
/// GET    /{slug}            -> get_published
/// PUT    /{slug}            -> edit_essay
/// GET    /{slug}/revisions  -> list_revisions
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(essay::list_published).post(essay::create_essay))
        .route(
            "/{slug}",
            get(essay::get_published).put(essay::edit_essay),
        )
        .route("/{slug}/revisions", get(essay::list_revisions))
}
