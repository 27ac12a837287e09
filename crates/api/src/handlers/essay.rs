//! Handlers for the `/essays` resource.
//!
//! Create, edit (the revision engine), detail, category listing, and
//! revision history endpoints. Readers only ever see live
//! (`is_published = true`) records; superseded revisions surface solely
//! through the history endpoint.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use quill_core::error::CoreError;
use quill_core::essay::{
    base_slug, default_title, validate_category, validate_slug, validate_title,
    CATEGORY_THOUGHTS,
};
use quill_core::format::format_paragraphs;
use quill_db::models::essay::{CreateEssay, EditEssay, Essay, EssayDetail};
use quill_db::repositories::EssayRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/* --------------------------------------------------------------------------
Query param types
-------------------------------------------------------------------------- */

#[derive(Debug, serde::Deserialize)]
pub struct ListEssaysParams {
    pub category: Option<String>,
}

/* --------------------------------------------------------------------------
Helpers
-------------------------------------------------------------------------- */

/// Fetch the live record at an exact slug or return 404.
async fn ensure_live_by_slug(pool: &sqlx::PgPool, slug: &str) -> AppResult<Essay> {
    validate_slug(slug).map_err(AppError::Core)?;
    EssayRepo::find_live_by_slug(pool, slug)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "essay",
                key: slug.to_string(),
            })
        })
}

/* --------------------------------------------------------------------------
Listing
-------------------------------------------------------------------------- */

/// GET /essays?category=thoughts
///
/// List live essays in a category, partitioned into finals and drafts.
pub async fn list_published(
    State(state): State<AppState>,
    Query(params): Query<ListEssaysParams>,
) -> AppResult<impl IntoResponse> {
    let category = params
        .category
        .unwrap_or_else(|| CATEGORY_THOUGHTS.to_string());
    validate_category(&category.to_lowercase()).map_err(AppError::Core)?;

    let listing = EssayRepo::list_published(&state.pool, &category).await?;
    Ok(Json(DataResponse { data: listing }))
}

/* --------------------------------------------------------------------------
Create
-------------------------------------------------------------------------- */

/// POST /essays
///
/// Create a new live essay. The slug is always generated; a missing or blank
/// title falls back to sequential `"Post #<n>"` numbering.
pub async fn create_essay(
    State(state): State<AppState>,
    Json(input): Json<CreateEssay>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref cat) = input.category {
        validate_category(cat).map_err(AppError::Core)?;
    }

    let title = match input.title.as_deref().map(str::trim) {
        Some(t) if !t.is_empty() => {
            validate_title(t).map_err(AppError::Core)?;
            t.to_string()
        }
        _ => default_title(EssayRepo::count_base_slugs(&state.pool).await?),
    };

    let slug = EssayRepo::generate_unique_slug(&state.pool)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Internal(
                "Slug space exhausted after maximum attempts".into(),
            ))
        })?;

    let essay = EssayRepo::create(&state.pool, &input, &slug, &title).await?;

    tracing::info!(
        essay_id = essay.id,
        slug = %essay.slug,
        is_draft = essay.is_draft,
        "Essay created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: essay })))
}

/* --------------------------------------------------------------------------
Detail
-------------------------------------------------------------------------- */

/// GET /essays/{slug}
///
/// Fetch the live record at a slug, with its content rendered into
/// paragraph markup for display.
pub async fn get_published(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let essay = ensure_live_by_slug(&state.pool, &slug).await?;
    let content_html = format_paragraphs(&essay.content);
    Ok(Json(DataResponse {
        data: EssayDetail {
            essay,
            content_html,
        },
    }))
}

/* --------------------------------------------------------------------------
Edit (revision engine)
-------------------------------------------------------------------------- */

/// PUT /essays/{slug}
///
/// Edit the live record at a slug. Material changes branch a new revision;
/// a bare draft-flag toggle (or no change at all) saves in place.
pub async fn edit_essay(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(input): Json<EditEssay>,
) -> AppResult<impl IntoResponse> {
    let old = ensure_live_by_slug(&state.pool, &slug).await?;

    if let Some(ref title) = input.title {
        validate_title(title).map_err(AppError::Core)?;
    }
    if let Some(ref cat) = input.category {
        validate_category(cat).map_err(AppError::Core)?;
    }

    let essay = EssayRepo::edit(&state.pool, &old, &input).await?;

    tracing::info!(
        old_id = old.id,
        essay_id = essay.id,
        slug = %essay.slug,
        branched = essay.id != old.id,
        "Essay edited"
    );

    Ok(Json(DataResponse { data: essay }))
}

/* --------------------------------------------------------------------------
Revision history
-------------------------------------------------------------------------- */

/// GET /essays/{slug}/revisions
///
/// Every revision of the logical essay at a slug (any state), newest first.
/// The slug may be given in base or suffixed form.
pub async fn list_revisions(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    validate_slug(&slug).map_err(AppError::Core)?;

    let revisions = EssayRepo::list_revisions(&state.pool, base_slug(&slug)).await?;
    if revisions.is_empty() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "essay",
            key: slug,
        }));
    }
    Ok(Json(DataResponse { data: revisions }))
}
