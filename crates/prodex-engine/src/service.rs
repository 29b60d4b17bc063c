//! Revision service: the sole mutation boundary of the revision engine.
//!
//! ## Write pipeline (in order):
//! 1. Validate the request (summary required for user-initiated edits)
//! 2. Acquire the per-product write lock
//! 3. Load current state inside a transaction
//! 4. Diff current vs. proposed; empty diff is a no-op
//! 5. Append revision + record field changes + update entity row, guarded by
//!    `WHERE current_revision_number = expected`
//! 6. Commit; a failed guard rolls everything back and retries once before
//!    surfacing `Conflict`
//!
//! Reads never lock: revisions are immutable once committed.

use std::sync::Mutex;

use chrono::Utc;
use rusqlite::Connection;

use prodex_core::diff::engine::compute_diff;
use prodex_core::diff::human_summary::change_count_summary;
use prodex_core::diff::model::{FieldChange, ProductDiff};
use prodex_core::errors::{PxError, PxErrorKind, Result};
use prodex_core::model::product::{Product, ProductSnapshot};
use prodex_core::model::revision::{Revision, RevisionSummary};
use prodex_core::model::new_id;
use prodex_store::repo::{field_changes, product_repo, revision_repo};

use crate::config::ServiceConfig;
use crate::lock::EntityLocks;

/// Hard maximum for the cross-product recent-edits feed, independent of the
/// caller-requested limit.
pub const RECENT_EDITS_HARD_CAP: u32 = 50;

/// Edit summary recorded on every baseline revision.
const INITIAL_REVISION_SUMMARY: &str = "Initial product version";

/// A product accepted into the system for the first time.
#[derive(Debug, Clone)]
pub struct NewProduct {
    /// Explicit id to use; None generates one
    pub id: Option<String>,
    /// Baseline state
    pub snapshot: ProductSnapshot,
}

/// The general-purpose write request.
#[derive(Debug, Clone)]
pub struct ApplyChangeRequest {
    pub product_id: String,
    /// Full proposed state; absent fields must already be normalized
    pub proposed: ProductSnapshot,
    /// None marks a system-originated change
    pub editor_id: Option<String>,
    /// Required when `editor_id` is present
    pub summary: Option<String>,
    /// Wiki-style minor-edit marker; recorded, does not affect numbering
    pub is_minor: bool,
}

/// Result of an apply or revert call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// A new revision was committed
    Applied {
        revision_number: u32,
        change_count: usize,
    },
    /// The proposed state equals the current state; nothing was written
    NoChange { revision_number: u32 },
}

/// One page of revision history, newest first.
#[derive(Debug, Clone)]
pub struct HistoryPage {
    pub entries: Vec<RevisionSummary>,
    /// Total revision count for UI paging
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

/// The revision service. Owns the database connection; all writes to the
/// entity store and revision log go through here.
pub struct RevisionService {
    conn: Mutex<Connection>,
    locks: EntityLocks,
    config: ServiceConfig,
}

impl RevisionService {
    /// Create a service over an already-migrated connection.
    pub fn new(conn: Connection, config: ServiceConfig) -> Self {
        Self {
            conn: Mutex::new(conn),
            locks: EntityLocks::new(),
            config,
        }
    }

    /// Accept an entity into the system: creates the product row and its
    /// baseline revision (number 1, no field changes) atomically.
    ///
    /// # Errors
    ///
    /// - `Conflict` — a baseline already exists for this product id
    /// - `Validation` — the baseline snapshot has an empty title
    /// - `Storage` — the underlying transaction failed
    pub fn create_initial_revision(
        &self,
        new_product: NewProduct,
        editor_id: Option<String>,
    ) -> Result<Product> {
        if new_product.snapshot.title.trim().is_empty() {
            return Err(PxError::new(PxErrorKind::Validation)
                .with_op("create_initial_revision")
                .with_message("product title must not be empty"));
        }

        let product_id = new_product.id.unwrap_or_else(new_id);
        let entity_lock = self.locks.handle(&product_id);
        let _entity_guard = entity_lock.lock().unwrap_or_else(|p| p.into_inner());

        let mut conn = self.lock_conn();
        let tx = conn.transaction().map_err(store_tx_error)?;

        if product_repo::product_exists(&tx, &product_id)?
            || revision_repo::baseline_exists(&tx, &product_id)?
        {
            return Err(PxError::new(PxErrorKind::Conflict)
                .with_op("create_initial_revision")
                .with_product_id(product_id)
                .with_revision(1)
                .with_message("baseline revision already exists"));
        }

        let product = Product::new(product_id, editor_id.clone(), new_product.snapshot);
        product_repo::insert_product_tx(&tx, &product)?;
        revision_repo::append_revision_tx(
            &tx,
            &product.id,
            1,
            editor_id.as_deref(),
            Some(INITIAL_REVISION_SUMMARY),
            &[],
            &product.snapshot,
            product.created_at.timestamp_millis(),
        )?;

        tx.commit().map_err(store_tx_error)?;

        tracing::info!(
            product_id = %product.id,
            editor_id = editor_id.as_deref().unwrap_or("<system>"),
            "Created baseline revision"
        );

        Ok(product)
    }

    /// Apply a proposed state as a new revision.
    ///
    /// A proposal identical to the current state is a no-op: no revision is
    /// created and `current_revision_number` does not move, which makes
    /// retries of this call safe.
    ///
    /// # Errors
    ///
    /// - `NotFound` — unknown product id
    /// - `Validation` — empty summary on a user-initiated call, or an empty
    ///   proposed title
    /// - `Conflict` — the optimistic guard failed twice (another writer won)
    /// - `Storage` — the underlying transaction failed
    pub fn apply_change(&self, req: ApplyChangeRequest) -> Result<ApplyOutcome> {
        if req.editor_id.is_some()
            && req.summary.as_deref().map_or(true, |s| s.trim().is_empty())
        {
            return Err(PxError::new(PxErrorKind::Validation)
                .with_op("apply_change")
                .with_product_id(req.product_id.clone())
                .with_message("edit summary is required for user-initiated edits"));
        }
        if req.proposed.title.trim().is_empty() {
            return Err(PxError::new(PxErrorKind::Validation)
                .with_op("apply_change")
                .with_product_id(req.product_id.clone())
                .with_message("product title must not be empty"));
        }

        let entity_lock = self.locks.handle(&req.product_id);
        let _entity_guard = entity_lock.lock().unwrap_or_else(|p| p.into_inner());

        // One internal retry on optimistic conflict before surfacing
        match self.try_apply(&req) {
            Err(e) if e.kind() == PxErrorKind::Conflict => {
                tracing::warn!(
                    product_id = %req.product_id,
                    "Optimistic conflict on apply, retrying once"
                );
                self.try_apply(&req)
            }
            other => other,
        }
    }

    fn try_apply(&self, req: &ApplyChangeRequest) -> Result<ApplyOutcome> {
        let mut conn = self.lock_conn();
        let tx = conn.transaction().map_err(store_tx_error)?;

        let current = product_repo::get_current(&tx, &req.product_id)?.ok_or_else(|| {
            PxError::new(PxErrorKind::NotFound)
                .with_op("apply_change")
                .with_product_id(req.product_id.clone())
                .with_message("product not found")
        })?;

        let changes = compute_diff(&current.snapshot, &req.proposed);
        if changes.is_empty() {
            return Ok(ApplyOutcome::NoChange {
                revision_number: current.current_revision_number,
            });
        }

        let expected = current.current_revision_number;
        let new_number = expected + 1;
        let now = Utc::now();

        let revision_id = revision_repo::append_revision_tx(
            &tx,
            &req.product_id,
            new_number,
            req.editor_id.as_deref(),
            req.summary.as_deref(),
            &changes,
            &req.proposed,
            now.timestamp_millis(),
        )?;
        field_changes::store_tx(&tx, &revision_id, &changes)?;

        let updated = product_repo::update_current_tx(
            &tx,
            &req.product_id,
            &req.proposed,
            new_number,
            req.editor_id.as_deref(),
            now.timestamp_millis(),
            expected,
        )?;
        if !updated {
            // Transaction drops here: the appended revision rolls back with it
            return Err(PxError::new(PxErrorKind::Conflict)
                .with_op("apply_change")
                .with_product_id(req.product_id.clone())
                .with_revision(new_number)
                .with_message("another writer advanced the revision pointer"));
        }

        tx.commit().map_err(store_tx_error)?;

        tracing::info!(
            product_id = %req.product_id,
            revision_number = new_number,
            change_count = changes.len(),
            is_minor = req.is_minor,
            "Applied change"
        );

        Ok(ApplyOutcome::Applied {
            revision_number: new_number,
            change_count: changes.len(),
        })
    }

    /// Revision history for a product, newest first, paginated.
    ///
    /// # Errors
    ///
    /// - `NotFound` — unknown product id
    pub fn get_history(&self, product_id: &str, page: u32, page_size: u32) -> Result<HistoryPage> {
        let conn = self.lock_conn();
        self.require_product(&conn, product_id, "get_history")?;

        let page = page.max(1);
        let page_size = if page_size == 0 {
            self.config.default_page_size
        } else {
            page_size
        };

        let (entries, total) = revision_repo::history_page(&conn, product_id, page, page_size)?;
        Ok(HistoryPage {
            entries,
            total,
            page,
            page_size,
        })
    }

    /// Fetch one full revision including its field changes.
    ///
    /// # Errors
    ///
    /// - `NotFound` — the (product, revision number) pair does not exist
    pub fn get_revision(&self, product_id: &str, revision_number: u32) -> Result<Revision> {
        let conn = self.lock_conn();
        let row = revision_repo::get_revision(&conn, product_id, revision_number)?
            .ok_or_else(|| revision_not_found(product_id, revision_number, "get_revision"))?;
        let changes = field_changes::load(&conn, &row.id)?;
        row.into_revision(changes)
    }

    /// Compare two revisions of a product, adjacent or not.
    ///
    /// The order of `from`/`to` is taken verbatim from the caller: comparing
    /// (5, 2) yields the inverse of comparing (2, 5).
    ///
    /// # Errors
    ///
    /// - `NotFound` — either revision does not exist
    pub fn compare(&self, product_id: &str, from: u32, to: u32) -> Result<ProductDiff> {
        let conn = self.lock_conn();
        let from_row = revision_repo::get_revision(&conn, product_id, from)?
            .ok_or_else(|| revision_not_found(product_id, from, "compare"))?;
        let to_row = revision_repo::get_revision(&conn, product_id, to)?
            .ok_or_else(|| revision_not_found(product_id, to, "compare"))?;

        let changes = compute_diff(&from_row.snapshot()?, &to_row.snapshot()?);
        Ok(ProductDiff {
            from_revision: from,
            to_revision: to,
            summary: change_count_summary(changes.len()),
            changes,
        })
    }

    /// Diff a proposed state against the current state without writing.
    ///
    /// Used by the moderation gate to synthesize summaries and by revert
    /// previews.
    ///
    /// # Errors
    ///
    /// - `NotFound` — unknown product id
    pub fn preview_changes(
        &self,
        product_id: &str,
        proposed: &ProductSnapshot,
    ) -> Result<Vec<FieldChange>> {
        let conn = self.lock_conn();
        let current = product_repo::get_current(&conn, product_id)?.ok_or_else(|| {
            PxError::new(PxErrorKind::NotFound)
                .with_op("preview_changes")
                .with_product_id(product_id)
                .with_message("product not found")
        })?;
        Ok(compute_diff(&current.snapshot, proposed))
    }

    /// Revert a product to a prior revision by creating a new forward
    /// revision whose content equals the target snapshot. History is never
    /// rewritten or truncated.
    ///
    /// # Errors
    ///
    /// - `NotFound` — the target revision does not exist
    /// - everything `apply_change` can return
    pub fn revert(
        &self,
        product_id: &str,
        target_revision_number: u32,
        editor_id: Option<String>,
        reason: &str,
    ) -> Result<ApplyOutcome> {
        let target_snapshot = {
            let conn = self.lock_conn();
            let row = revision_repo::get_revision(&conn, product_id, target_revision_number)?
                .ok_or_else(|| {
                    revision_not_found(product_id, target_revision_number, "revert")
                })?;
            row.snapshot()?
        };

        let summary = format!(
            "Reverted to revision {}: {}",
            target_revision_number, reason
        );

        self.apply_change(ApplyChangeRequest {
            product_id: product_id.to_string(),
            proposed: target_snapshot,
            editor_id,
            summary: Some(summary),
            is_minor: false,
        })
    }

    /// Most recent revisions across all products, newest first.
    ///
    /// The result is capped at [`RECENT_EDITS_HARD_CAP`] no matter what the
    /// caller requests; a limit of 0 also resolves to the cap.
    pub fn recent_edits(&self, limit: u32) -> Result<Vec<RevisionSummary>> {
        let effective = if limit == 0 {
            RECENT_EDITS_HARD_CAP
        } else {
            limit.min(RECENT_EDITS_HARD_CAP)
        };
        let conn = self.lock_conn();
        revision_repo::recent_edits(&conn, effective)
    }

    fn require_product(&self, conn: &Connection, product_id: &str, op: &str) -> Result<()> {
        if product_repo::product_exists(conn, product_id)? {
            Ok(())
        } else {
            Err(PxError::new(PxErrorKind::NotFound)
                .with_op(op)
                .with_product_id(product_id)
                .with_message("product not found"))
        }
    }

    fn lock_conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn store_tx_error(err: rusqlite::Error) -> PxError {
    PxError::new(PxErrorKind::Storage)
        .with_op("transaction")
        .with_message(err.to_string())
}

fn revision_not_found(product_id: &str, revision_number: u32, op: &str) -> PxError {
    PxError::new(PxErrorKind::NotFound)
        .with_op(op)
        .with_product_id(product_id)
        .with_revision(revision_number)
        .with_message("revision not found")
}
