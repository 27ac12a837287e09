//! Essay entity model and DTOs.

use quill_core::revision::{EditRequest, RevisionSource};
use quill_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An essay revision row from the `essays` table.
///
/// A logical essay is the set of rows sharing a base slug; at most one row
/// per exact slug has `is_published = true` at any time.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Essay {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub category: String,
    pub content: String,
    pub is_published: bool,
    pub is_draft: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Essay {
    /// Snapshot of the fields revision planning reads.
    pub fn revision_source(&self) -> RevisionSource {
        RevisionSource {
            slug: self.slug.clone(),
            title: self.title.clone(),
            category: self.category.clone(),
            content: self.content.clone(),
            is_draft: self.is_draft,
        }
    }
}

/// DTO for creating a new essay.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEssay {
    /// Falls back to `"Post #<n>"` numbering if omitted or blank.
    pub title: Option<String>,
    /// Defaults to `thoughts` if omitted.
    pub category: Option<String>,
    pub content: String,
    /// Defaults to `false` if omitted.
    pub is_draft: Option<bool>,
}

/// DTO for editing a live essay. Omitted fields keep their stored values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EditEssay {
    pub title: Option<String>,
    pub category: Option<String>,
    pub content: Option<String>,
    pub is_draft: Option<bool>,
}

impl EditEssay {
    /// The submitted fields as the core planner's input type.
    pub fn edit_request(&self) -> EditRequest {
        EditRequest {
            title: self.title.clone(),
            category: self.category.clone(),
            content: self.content.clone(),
            is_draft: self.is_draft,
        }
    }
}

/// Live essays in one category, partitioned by draft state.
#[derive(Debug, Serialize)]
pub struct EssayListing {
    pub finals: Vec<Essay>,
    pub drafts: Vec<Essay>,
}

/// Detail payload for a single live essay: the record plus its content
/// rendered into paragraph markup.
#[derive(Debug, Serialize)]
pub struct EssayDetail {
    pub essay: Essay,
    pub content_html: String,
}
