//! Moderation gate boundary.
//!
//! The approval workflow itself (queueing, review UI, transport) lives
//! outside this core. What lives here is its inward-facing edge: once a
//! change has been accepted, the gate decodes the payload into a typed
//! [`ProposedChange`], consults the injected [`AuthorizationPolicy`], and
//! routes the result to the revision service. The service never evaluates
//! permissions itself.

use std::sync::Arc;

use prodex_core::errors::{PxError, PxErrorKind, Result};
use prodex_core::model::change::{ChangeKind, ProposedChange};
use prodex_core::model::product::Product;
use prodex_core::policy::AuthorizationPolicy;

use crate::service::{ApplyChangeRequest, ApplyOutcome, NewProduct, RevisionService};

/// What the gate did with an accepted change.
#[derive(Debug, Clone)]
pub enum GateOutcome {
    /// A new product entered the system at revision 1
    Created(Product),
    /// An existing product received (or no-op'd) a forward revision
    Applied(ApplyOutcome),
}

/// Inward-facing edge of the external approval workflow.
pub struct ModerationGate {
    policy: Arc<dyn AuthorizationPolicy>,
}

impl ModerationGate {
    pub fn new(policy: Arc<dyn AuthorizationPolicy>) -> Self {
        Self { policy }
    }

    /// Decode and apply an accepted raw change payload.
    ///
    /// # Errors
    ///
    /// - `Validation` — payload does not decode, or names an unsupported route
    /// - `Forbidden` — the policy denies this editor
    /// - everything the revision service can return
    pub fn apply_accepted_raw(
        &self,
        service: &RevisionService,
        raw_change: &str,
        editor_id: Option<String>,
        summary: Option<String>,
    ) -> Result<GateOutcome> {
        let change = ProposedChange::decode(raw_change)?;
        self.apply_accepted(service, change, editor_id, summary)
    }

    /// Apply an already-decoded accepted change.
    ///
    /// For updates without a caller-provided summary, one is synthesized from
    /// the changed field names (`"Updated title, short_desc"`).
    ///
    /// # Errors
    ///
    /// See [`ModerationGate::apply_accepted_raw`].
    pub fn apply_accepted(
        &self,
        service: &RevisionService,
        change: ProposedChange,
        editor_id: Option<String>,
        summary: Option<String>,
    ) -> Result<GateOutcome> {
        match change {
            ProposedChange::Product(payload) => match payload.change_kind {
                ChangeKind::Create => {
                    let product = service.create_initial_revision(
                        NewProduct {
                            id: payload.entity_id,
                            snapshot: payload.snapshot,
                        },
                        editor_id,
                    )?;
                    Ok(GateOutcome::Created(product))
                }
                ChangeKind::Update => {
                    let product_id = payload.entity_id.ok_or_else(|| {
                        PxError::new(PxErrorKind::Validation)
                            .with_op("apply_accepted")
                            .with_message("product update requires an entity_id")
                    })?;

                    if let Some(editor) = editor_id.as_deref() {
                        if !self.policy.can_edit(editor, &product_id) {
                            return Err(PxError::new(PxErrorKind::Forbidden)
                                .with_op("apply_accepted")
                                .with_product_id(product_id)
                                .with_message(format!(
                                    "editor {} may not edit this product",
                                    editor
                                )));
                        }
                    }

                    let summary = match summary {
                        Some(s) => Some(s),
                        None if editor_id.is_some() => {
                            Some(self.synthesize_summary(service, &product_id, &payload.snapshot)?)
                        }
                        None => None,
                    };

                    let outcome = service.apply_change(ApplyChangeRequest {
                        product_id,
                        proposed: payload.snapshot,
                        editor_id,
                        summary,
                        is_minor: false,
                    })?;
                    Ok(GateOutcome::Applied(outcome))
                }
            },
            ProposedChange::Category(_) => Err(PxError::new(PxErrorKind::Validation)
                .with_op("apply_accepted")
                .with_message("category changes are handled outside the revision core")),
        }
    }

    fn synthesize_summary(
        &self,
        service: &RevisionService,
        product_id: &str,
        proposed: &prodex_core::model::product::ProductSnapshot,
    ) -> Result<String> {
        let changes = service.preview_changes(product_id, proposed)?;
        if changes.is_empty() {
            // The apply below will no-op; keep the summary valid regardless
            return Ok("Product update".to_string());
        }
        let fields: Vec<&str> = changes.iter().map(|c| c.field_name.as_str()).collect();
        Ok(format!("Updated {}", fields.join(", ")))
    }
}
