//! Revision planning for essay edits.
//!
//! A live essay is never rewritten in place once it is the canonical public
//! revision: material edits branch a fresh record and rewire which records
//! are publicly visible. The only in-place writes are the no-change touch and
//! a bare draft-flag toggle. [`plan_edit`] compares the submitted fields
//! against the stored record and returns the write plan; the repository layer
//! executes the plan inside a single transaction.

use crate::essay::{base_slug, suffixed_slug};

/// Snapshot of the stored record an edit is planned against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionSource {
    pub slug: String,
    pub title: String,
    pub category: String,
    pub content: String,
    pub is_draft: bool,
}

/// Submitted edit fields. `None` means the field was not submitted and keeps
/// its stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditRequest {
    pub title: Option<String>,
    pub category: Option<String>,
    pub content: Option<String>,
    pub is_draft: Option<bool>,
}

/// The write plan produced by [`plan_edit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditPlan {
    /// Nothing changed: write the record back unchanged so `updated_at`
    /// advances. No new record.
    Touch,
    /// Only the draft flag flipped to final. Strip any draft suffix from the
    /// record's slug, supersede the previous live final under `base_slug`,
    /// and save in place. No new record.
    FinalizeInPlace { base_slug: String },
    /// Only the draft flag flipped to draft. Save in place; the record keeps
    /// its slug since it becomes the sole public draft.
    DraftInPlace,
    /// Material changes: insert a new revision record and rewire which
    /// records stay publicly visible.
    Branch(BranchPlan),
}

/// Field values and visibility rewiring for a branched revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchPlan {
    pub title: String,
    pub category: String,
    pub content: String,
    pub is_draft: bool,
    /// Slug assigned to the new record.
    pub slug: String,
    pub kind: BranchKind,
}

/// How the old record (and any same-slug sibling) is treated when branching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchKind {
    /// Final -> draft: the old record stays live as the public final; the new
    /// draft takes the suffixed slug. Any older live draft already holding
    /// that slug is superseded.
    DetachDraft,
    /// Draft -> draft: the old record is superseded and has its suffix
    /// stripped (it was an intermediate state); the new record becomes the
    /// live draft under the old slug.
    ReplaceDraft { old_slug_stripped: String },
    /// New revision is final: any other live final under `base_slug` is
    /// superseded (finalize check), and the old record is superseded.
    Finalize { base_slug: String },
}

/// Compute the write plan for editing the live record `old` with `edit`.
///
/// Implements the edit decision table: an empty change set touches the
/// record, a bare `is_draft` flip saves in place, and anything else branches
/// a new revision whose slug and visibility rewiring depend on the draft
/// transition.
pub fn plan_edit(old: &RevisionSource, edit: &EditRequest) -> EditPlan {
    let fields_changed = edit.title.as_ref().is_some_and(|t| t != &old.title)
        || edit.category.as_ref().is_some_and(|c| c != &old.category)
        || edit.content.as_ref().is_some_and(|c| c != &old.content);
    let draft_changed = edit.is_draft.is_some_and(|d| d != old.is_draft);

    if !fields_changed && !draft_changed {
        return EditPlan::Touch;
    }

    if !fields_changed {
        // Bare draft-flag toggle; draft_changed guarantees Some here.
        return match edit.is_draft {
            Some(false) => EditPlan::FinalizeInPlace {
                base_slug: base_slug(&old.slug).to_string(),
            },
            _ => EditPlan::DraftInPlace,
        };
    }

    // Material changes: branch. Submitted values win, the rest carry over.
    let is_draft = edit.is_draft.unwrap_or(old.is_draft);
    let (slug, kind) = if is_draft {
        if draft_changed {
            // Final moving to draft: the draft copy takes the suffixed slug
            // so the old record can stay live under the base slug.
            (suffixed_slug(base_slug(&old.slug)), BranchKind::DetachDraft)
        } else {
            (
                old.slug.clone(),
                BranchKind::ReplaceDraft {
                    old_slug_stripped: base_slug(&old.slug).to_string(),
                },
            )
        }
    } else {
        let base = base_slug(&old.slug).to_string();
        (base.clone(), BranchKind::Finalize { base_slug: base })
    };

    EditPlan::Branch(BranchPlan {
        title: edit.title.clone().unwrap_or_else(|| old.title.clone()),
        category: edit.category.clone().unwrap_or_else(|| old.category.clone()),
        content: edit.content.clone().unwrap_or_else(|| old.content.clone()),
        is_draft,
        slug,
        kind,
    })
}
