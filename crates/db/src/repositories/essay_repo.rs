//! Repository for the `essays` table.
//!
//! Executes the edit plans produced by `quill_core::revision` inside a
//! single transaction, so the multi-record visibility rewiring of a revision
//! is atomic. Rows being superseded are always unpublished before the new
//! revision is inserted; the partial unique index on live slugs must never
//! see two live rows with one slug, even transiently.

use sqlx::PgPool;

use quill_core::essay::{CATEGORY_THOUGHTS, DRAFT_SUFFIX};
use quill_core::revision::{plan_edit, BranchKind, BranchPlan, EditPlan};
use quill_core::slug::{attempt_length, random_slug, DEFAULT_SLUG_LENGTH, MAX_SLUG_ATTEMPTS};
use quill_core::types::DbId;

use crate::models::essay::{CreateEssay, EditEssay, Essay, EssayListing};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, title, slug, category, content, is_published, is_draft, created_at, updated_at";

/// Provides slug generation, CRUD, and revision operations for essays.
pub struct EssayRepo;

impl EssayRepo {
    // ── Slug generation ──────────────────────────────────────────────

    /// Whether any row, in any state, holds the exact slug.
    pub async fn slug_exists(pool: &PgPool, slug: &str) -> Result<bool, sqlx::Error> {
        let row: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM essays WHERE slug = $1)")
            .bind(slug)
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    /// Generate a slug no persisted row holds, growing the length after
    /// repeated collisions. Returns `None` once the attempt cap is
    /// exhausted, rather than retrying forever.
    pub async fn generate_unique_slug(pool: &PgPool) -> Result<Option<String>, sqlx::Error> {
        for attempt in 0..MAX_SLUG_ATTEMPTS {
            let candidate = random_slug(attempt_length(DEFAULT_SLUG_LENGTH, attempt));
            if !Self::slug_exists(pool, &candidate).await? {
                return Ok(Some(candidate));
            }
            tracing::debug!(attempt, slug = %candidate, "Slug collision, retrying");
        }
        Ok(None)
    }

    // ── Create ───────────────────────────────────────────────────────

    /// Insert a new live essay under the given slug and resolved title.
    pub async fn create(
        pool: &PgPool,
        input: &CreateEssay,
        slug: &str,
        title: &str,
    ) -> Result<Essay, sqlx::Error> {
        let query = format!(
            "INSERT INTO essays (title, slug, category, content, is_published, is_draft)
             VALUES ($1, $2, $3, $4, TRUE, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Essay>(&query)
            .bind(title)
            .bind(slug)
            .bind(input.category.as_deref().unwrap_or(CATEGORY_THOUGHTS))
            .bind(&input.content)
            .bind(input.is_draft.unwrap_or(false))
            .fetch_one(pool)
            .await
    }

    /// Count distinct slugs among rows carrying no draft suffix. Drives the
    /// `"Post #<n+1>"` default-title numbering; private in-progress drafts
    /// are excluded.
    pub async fn count_base_slugs(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let row: (i64,) =
            sqlx::query_as("SELECT COUNT(DISTINCT slug) FROM essays WHERE slug NOT LIKE $1")
                .bind(format!("%{DRAFT_SUFFIX}%"))
                .fetch_one(pool)
                .await?;
        Ok(row.0)
    }

    // ── Lookups ──────────────────────────────────────────────────────

    /// Find the live (publicly visible) row holding the exact slug.
    pub async fn find_live_by_slug(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<Essay>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM essays WHERE slug = $1 AND is_published");
        sqlx::query_as::<_, Essay>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// List live essays in a category, newest first, partitioned by draft
    /// state. Category matching is case-insensitive.
    pub async fn list_published(
        pool: &PgPool,
        category: &str,
    ) -> Result<EssayListing, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM essays
             WHERE is_published AND LOWER(category) = LOWER($1)
             ORDER BY created_at DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, Essay>(&query)
            .bind(category)
            .fetch_all(pool)
            .await?;
        let (drafts, finals): (Vec<Essay>, Vec<Essay>) =
            rows.into_iter().partition(|e| e.is_draft);
        Ok(EssayListing { finals, drafts })
    }

    /// Every revision sharing the base slug, any state, newest first.
    pub async fn list_revisions(pool: &PgPool, base: &str) -> Result<Vec<Essay>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM essays
             WHERE slug = $1 OR slug = $2
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Essay>(&query)
            .bind(base)
            .bind(format!("{base}{DRAFT_SUFFIX}"))
            .fetch_all(pool)
            .await
    }

    // ── Edit (revision engine) ───────────────────────────────────────

    /// Apply an edit to the live record `old`, executing the plan computed
    /// by `plan_edit`. Returns the record that is now the live result of
    /// the edit.
    pub async fn edit(pool: &PgPool, old: &Essay, input: &EditEssay) -> Result<Essay, sqlx::Error> {
        match plan_edit(&old.revision_source(), &input.edit_request()) {
            EditPlan::Touch => Self::touch(pool, old.id).await,
            EditPlan::FinalizeInPlace { base_slug } => {
                Self::finalize_in_place(pool, old.id, &base_slug).await
            }
            EditPlan::DraftInPlace => Self::draft_in_place(pool, old.id).await,
            EditPlan::Branch(plan) => Self::branch(pool, old.id, &plan).await,
        }
    }

    /// No-op write so the `updated_at` trigger fires.
    async fn touch(pool: &PgPool, id: DbId) -> Result<Essay, sqlx::Error> {
        let query = format!("UPDATE essays SET title = title WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Essay>(&query)
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Bare final -> draft toggle: the record keeps its slug and becomes the
    /// sole public draft.
    async fn draft_in_place(pool: &PgPool, id: DbId) -> Result<Essay, sqlx::Error> {
        let query = format!("UPDATE essays SET is_draft = TRUE WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Essay>(&query)
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Bare draft -> final toggle: supersede the previous live final under
    /// the base slug, then save the record in place with its suffix
    /// stripped.
    async fn finalize_in_place(pool: &PgPool, id: DbId, base: &str) -> Result<Essay, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            "UPDATE essays SET is_published = FALSE
             WHERE slug = $1 AND is_published AND is_draft = FALSE AND id <> $2",
        )
        .bind(base)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        let query = format!(
            "UPDATE essays SET is_draft = FALSE, slug = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        let essay = sqlx::query_as::<_, Essay>(&query)
            .bind(id)
            .bind(base)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(essay)
    }

    /// Insert the branched revision and rewire visibility per the plan.
    async fn branch(pool: &PgPool, old_id: DbId, plan: &BranchPlan) -> Result<Essay, sqlx::Error> {
        let mut tx = pool.begin().await?;

        match &plan.kind {
            BranchKind::DetachDraft => {
                // The old record stays live as the public final. An older
                // live draft already holding the suffixed slug is superseded
                // so the new copy becomes the one canonical public draft.
                sqlx::query(
                    "UPDATE essays SET is_published = FALSE WHERE slug = $1 AND is_published",
                )
                .bind(&plan.slug)
                .execute(&mut *tx)
                .await?;
            }
            BranchKind::ReplaceDraft { old_slug_stripped } => {
                sqlx::query("UPDATE essays SET is_published = FALSE, slug = $2 WHERE id = $1")
                    .bind(old_id)
                    .bind(old_slug_stripped)
                    .execute(&mut *tx)
                    .await?;
            }
            BranchKind::Finalize { base_slug } => {
                // Finalize check: supersede any other live final under the
                // base slug, then the record being edited.
                sqlx::query(
                    "UPDATE essays SET is_published = FALSE
                     WHERE slug = $1 AND is_published AND is_draft = FALSE",
                )
                .bind(base_slug)
                .execute(&mut *tx)
                .await?;
                sqlx::query("UPDATE essays SET is_published = FALSE WHERE id = $1")
                    .bind(old_id)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        let query = format!(
            "INSERT INTO essays (title, slug, category, content, is_published, is_draft)
             VALUES ($1, $2, $3, $4, TRUE, $5)
             RETURNING {COLUMNS}"
        );
        let essay = sqlx::query_as::<_, Essay>(&query)
            .bind(&plan.title)
            .bind(&plan.slug)
            .bind(&plan.category)
            .bind(&plan.content)
            .bind(plan.is_draft)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(essay)
    }
}
