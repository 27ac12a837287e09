//! Integration tests for the revision engine: the edit decision table
//! executed against a real database.
//!
//! Covers the no-op touch, bare draft-flag toggles, the three branch cases,
//! and the finalize check, including the partial unique index staying
//! satisfied throughout.

use sqlx::PgPool;

use quill_db::models::essay::{CreateEssay, EditEssay, Essay};
use quill_db::repositories::EssayRepo;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn create_final(pool: &PgPool, content: &str) -> Essay {
    let input = CreateEssay {
        title: Some("Subject".to_string()),
        category: None,
        content: content.to_string(),
        is_draft: None,
    };
    let slug = EssayRepo::generate_unique_slug(pool)
        .await
        .unwrap()
        .expect("slug space exhausted in test");
    EssayRepo::create(pool, &input, &slug, "Subject").await.unwrap()
}

async fn reload(pool: &PgPool, id: i64) -> Essay {
    sqlx::query_as::<_, Essay>(
        "SELECT id, title, slug, category, content, is_published, is_draft, \
         created_at, updated_at FROM essays WHERE id = $1",
    )
    .bind(id)
    .fetch_one(pool)
    .await
    .unwrap()
}

async fn rows_for_base(pool: &PgPool, base: &str) -> i64 {
    let row: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM essays WHERE slug = $1 OR slug = $2")
            .bind(base)
            .bind(format!("{base}--"))
            .fetch_one(pool)
            .await
            .unwrap();
    row.0
}

fn edit_content(content: &str) -> EditEssay {
    EditEssay {
        content: Some(content.to_string()),
        ..Default::default()
    }
}

fn toggle_draft(to: bool) -> EditEssay {
    EditEssay {
        is_draft: Some(to),
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Test: empty change set touches in place
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_noop_edit_updates_timestamp_only(pool: PgPool) {
    let old = create_final(&pool, "unchanged").await;

    let edited = EssayRepo::edit(&pool, &old, &EditEssay::default())
        .await
        .unwrap();

    assert_eq!(edited.id, old.id);
    assert_eq!(edited.content, old.content);
    assert!(edited.is_published);
    assert!(!edited.is_draft);
    assert!(edited.updated_at > old.updated_at);
    assert_eq!(rows_for_base(&pool, &old.slug).await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_resubmitting_stored_values_is_a_noop(pool: PgPool) {
    let old = create_final(&pool, "same").await;
    let edit = EditEssay {
        title: Some(old.title.clone()),
        category: Some(old.category.clone()),
        content: Some(old.content.clone()),
        is_draft: Some(old.is_draft),
    };

    let edited = EssayRepo::edit(&pool, &old, &edit).await.unwrap();

    assert_eq!(edited.id, old.id);
    assert_eq!(rows_for_base(&pool, &old.slug).await, 1);
}

// ---------------------------------------------------------------------------
// Test: content edit on a final branches a new final
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_content_edit_branches_and_supersedes_old_final(pool: PgPool) {
    let old = create_final(&pool, "first version").await;

    let new = EssayRepo::edit(&pool, &old, &edit_content("second version"))
        .await
        .unwrap();

    assert_ne!(new.id, old.id);
    assert_eq!(new.slug, old.slug);
    assert!(new.is_published);
    assert!(!new.is_draft);
    assert_eq!(new.content, "second version");

    let old = reload(&pool, old.id).await;
    assert!(!old.is_published);
    assert_eq!(old.content, "first version");

    assert_eq!(rows_for_base(&pool, &new.slug).await, 2);
}

// ---------------------------------------------------------------------------
// Test: content edit moving final -> draft detaches a suffixed copy
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_edit_to_draft_keeps_old_final_live(pool: PgPool) {
    let old = create_final(&pool, "published text").await;

    let edit = EditEssay {
        content: Some("work in progress".to_string()),
        is_draft: Some(true),
        ..Default::default()
    };
    let draft = EssayRepo::edit(&pool, &old, &edit).await.unwrap();

    assert_ne!(draft.id, old.id);
    assert_eq!(draft.slug, format!("{}--", old.slug));
    assert!(draft.is_published);
    assert!(draft.is_draft);

    // The old record stays live as the public final, untouched.
    let old = reload(&pool, old.id).await;
    assert!(old.is_published);
    assert!(!old.is_draft);
    assert_eq!(old.content, "published text");

    // Both are reachable by their exact slugs.
    let by_base = EssayRepo::find_live_by_slug(&pool, &old.slug)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_base.id, old.id);
    let by_suffixed = EssayRepo::find_live_by_slug(&pool, &draft.slug)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_suffixed.id, draft.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_detaching_a_second_draft_supersedes_the_first(pool: PgPool) {
    let fin = create_final(&pool, "v1").await;
    let edit = EditEssay {
        content: Some("draft a".to_string()),
        is_draft: Some(true),
        ..Default::default()
    };
    let first_draft = EssayRepo::edit(&pool, &fin, &edit).await.unwrap();

    // Editing the final into a draft again must supersede the older draft
    // instead of violating the live-slug unique index.
    let fin = reload(&pool, fin.id).await;
    let edit = EditEssay {
        content: Some("draft b".to_string()),
        is_draft: Some(true),
        ..Default::default()
    };
    let second_draft = EssayRepo::edit(&pool, &fin, &edit).await.unwrap();

    assert_eq!(second_draft.slug, first_draft.slug);
    let first_draft = reload(&pool, first_draft.id).await;
    assert!(!first_draft.is_published);
}

// ---------------------------------------------------------------------------
// Test: editing a draft replaces it
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_draft_edit_replaces_draft_and_strips_old_suffix(pool: PgPool) {
    let fin = create_final(&pool, "v1").await;
    let edit = EditEssay {
        content: Some("draft v1".to_string()),
        is_draft: Some(true),
        ..Default::default()
    };
    let draft = EssayRepo::edit(&pool, &fin, &edit).await.unwrap();

    let newer = EssayRepo::edit(&pool, &draft, &edit_content("draft v2"))
        .await
        .unwrap();

    assert_ne!(newer.id, draft.id);
    assert!(newer.is_published);
    assert!(newer.is_draft);
    assert_eq!(newer.slug, draft.slug);

    // The superseded draft loses its suffix along with its visibility.
    let draft = reload(&pool, draft.id).await;
    assert!(!draft.is_published);
    assert_eq!(draft.slug, fin.slug);
}

// ---------------------------------------------------------------------------
// Test: bare draft-flag toggles save in place
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_toggle_to_draft_saves_in_place(pool: PgPool) {
    let old = create_final(&pool, "text").await;

    let edited = EssayRepo::edit(&pool, &old, &toggle_draft(true)).await.unwrap();

    assert_eq!(edited.id, old.id);
    assert!(edited.is_draft);
    assert!(edited.is_published);
    assert_eq!(edited.slug, old.slug);
    assert_eq!(rows_for_base(&pool, &old.slug).await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_toggle_to_final_runs_finalize_check(pool: PgPool) {
    // Build the coexisting pair: live final + live suffixed draft.
    let fin = create_final(&pool, "published").await;
    let edit = EditEssay {
        content: Some("revised".to_string()),
        is_draft: Some(true),
        ..Default::default()
    };
    let draft = EssayRepo::edit(&pool, &fin, &edit).await.unwrap();

    // Publishing the draft supersedes the old final and strips the suffix.
    let published = EssayRepo::edit(&pool, &draft, &toggle_draft(false))
        .await
        .unwrap();

    assert_eq!(published.id, draft.id);
    assert!(!published.is_draft);
    assert!(published.is_published);
    assert_eq!(published.slug, fin.slug);

    let fin = reload(&pool, fin.id).await;
    assert!(!fin.is_published);

    // Exactly one live record remains under the base slug.
    let live = EssayRepo::find_live_by_slug(&pool, &published.slug)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(live.id, published.id);
    assert_eq!(live.content, "revised");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_first_finalization_with_no_prior_final(pool: PgPool) {
    // A draft created directly (never published as final before).
    let input = CreateEssay {
        title: Some("Fresh".to_string()),
        category: None,
        content: "draft only".to_string(),
        is_draft: Some(true),
    };
    let slug = EssayRepo::generate_unique_slug(&pool)
        .await
        .unwrap()
        .unwrap();
    let draft = EssayRepo::create(&pool, &input, &slug, "Fresh").await.unwrap();

    // Finalize check finds nothing to supersede; the toggle still succeeds.
    let published = EssayRepo::edit(&pool, &draft, &toggle_draft(false))
        .await
        .unwrap();

    assert_eq!(published.id, draft.id);
    assert!(!published.is_draft);
    assert!(published.is_published);
    assert_eq!(rows_for_base(&pool, &slug).await, 1);
}

// ---------------------------------------------------------------------------
// Test: full publishing cycle keeps visibility invariants
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_cycle_never_exceeds_one_live_record_per_exact_slug(pool: PgPool) {
    let fin = create_final(&pool, "v1").await;
    let base = fin.slug.clone();

    let edit = EditEssay {
        content: Some("v2 draft".to_string()),
        is_draft: Some(true),
        ..Default::default()
    };
    let draft = EssayRepo::edit(&pool, &fin, &edit).await.unwrap();
    let draft = EssayRepo::edit(&pool, &draft, &edit_content("v2 draft b"))
        .await
        .unwrap();
    let published = EssayRepo::edit(&pool, &draft, &toggle_draft(false))
        .await
        .unwrap();
    let _newest = EssayRepo::edit(&pool, &published, &edit_content("v3"))
        .await
        .unwrap();

    // History accumulated; exactly one row is live under the base slug and
    // none under the suffixed slug.
    let live: Vec<(String,)> = sqlx::query_as(
        "SELECT slug FROM essays WHERE is_published AND (slug = $1 OR slug = $2)",
    )
    .bind(&base)
    .bind(format!("{base}--"))
    .fetch_all(&pool)
    .await
    .unwrap();
    assert_eq!(live.len(), 1);
    assert_eq!(live[0].0, base);

    assert!(rows_for_base(&pool, &base).await >= 4);
}
