//! Moderation gate boundary tests.
//!
//! ## Scenarios covered
//!
//! 1. Raw payloads decode once at the boundary and route to the service
//! 2. Gate-applied updates synthesize a summary from the changed fields
//! 3. A denying policy blocks the edit with a typed error and writes nothing
//! 4. Category payloads decode but are rejected as an unsupported route

mod common;

use std::sync::Arc;

use common::{seed_product, snapshot, test_service};
use prodex_core::errors::PxErrorKind;
use prodex_core::model::change::{ChangeKind, ProductChangePayload, ProposedChange};
use prodex_core::{AllowAllPolicy, DenyAllPolicy};
use prodex_engine::{ApplyOutcome, GateOutcome, ModerationGate};

#[test]
fn test_gate_creates_product_from_raw_payload() {
    let service = test_service();
    let gate = ModerationGate::new(Arc::new(AllowAllPolicy));

    let raw = r#"{
        "entity_type": "product",
        "change_kind": "create",
        "snapshot": {"title": "Gated Product", "short_desc": "via gate"}
    }"#;

    let outcome = gate
        .apply_accepted_raw(&service, raw, Some("submitter-1".to_string()), None)
        .unwrap();

    let product = match outcome {
        GateOutcome::Created(product) => product,
        other => panic!("expected creation, got {:?}", other),
    };
    assert_eq!(product.current_revision_number, 1);
    assert_eq!(product.snapshot.title, "Gated Product");

    let revision = service.get_revision(&product.id, 1).unwrap();
    assert!(revision.is_baseline());
    assert_eq!(revision.editor_id.as_deref(), Some("submitter-1"));
}

#[test]
fn test_gate_update_synthesizes_summary_from_changed_fields() {
    let service = test_service();
    let gate = ModerationGate::new(Arc::new(AllowAllPolicy));
    let id = seed_product(&service, "prod-1", "Before");

    let mut proposed = snapshot("After", 0.5);
    proposed.short_desc = "new description".to_string();

    let outcome = gate
        .apply_accepted(
            &service,
            ProposedChange::Product(ProductChangePayload {
                entity_id: Some(id.clone()),
                change_kind: ChangeKind::Update,
                snapshot: proposed,
            }),
            Some("editor-1".to_string()),
            None,
        )
        .unwrap();

    assert!(matches!(
        outcome,
        GateOutcome::Applied(ApplyOutcome::Applied {
            revision_number: 2,
            ..
        })
    ));

    let revision = service.get_revision(&id, 2).unwrap();
    // Changed fields in lexicographic order: short_desc, title
    assert_eq!(
        revision.edit_summary.as_deref(),
        Some("Updated short_desc, title")
    );
}

#[test]
fn test_gate_update_keeps_caller_summary() {
    let service = test_service();
    let gate = ModerationGate::new(Arc::new(AllowAllPolicy));
    let id = seed_product(&service, "prod-1", "Before");

    gate.apply_accepted(
        &service,
        ProposedChange::Product(ProductChangePayload {
            entity_id: Some(id.clone()),
            change_kind: ChangeKind::Update,
            snapshot: snapshot("After", 0.5),
        }),
        Some("editor-1".to_string()),
        Some("my own words".to_string()),
    )
    .unwrap();

    let revision = service.get_revision(&id, 2).unwrap();
    assert_eq!(revision.edit_summary.as_deref(), Some("my own words"));
}

#[test]
fn test_denied_editor_writes_nothing() {
    let service = test_service();
    let gate = ModerationGate::new(Arc::new(DenyAllPolicy));
    let id = seed_product(&service, "prod-1", "Guarded");

    let err = gate
        .apply_accepted(
            &service,
            ProposedChange::Product(ProductChangePayload {
                entity_id: Some(id.clone()),
                change_kind: ChangeKind::Update,
                snapshot: snapshot("Hacked", 0.5),
            }),
            Some("intruder".to_string()),
            Some("definitely legit".to_string()),
        )
        .unwrap_err();

    assert_eq!(err.kind(), PxErrorKind::Forbidden);
    let history = service.get_history(&id, 1, 10).unwrap();
    assert_eq!(history.total, 1);
    assert_eq!(
        service.get_revision(&id, 1).unwrap().snapshot.title,
        "Guarded"
    );
}

#[test]
fn test_update_without_entity_id_is_validation_error() {
    let service = test_service();
    let gate = ModerationGate::new(Arc::new(AllowAllPolicy));

    let err = gate
        .apply_accepted(
            &service,
            ProposedChange::Product(ProductChangePayload {
                entity_id: None,
                change_kind: ChangeKind::Update,
                snapshot: snapshot("Orphan", 0.5),
            }),
            Some("editor-1".to_string()),
            Some("summary".to_string()),
        )
        .unwrap_err();
    assert_eq!(err.kind(), PxErrorKind::Validation);
}

#[test]
fn test_category_route_is_rejected_with_typed_error() {
    let service = test_service();
    let gate = ModerationGate::new(Arc::new(AllowAllPolicy));

    let raw = r#"{
        "entity_type": "category",
        "change_kind": "create",
        "name": "DeFi"
    }"#;

    let err = gate
        .apply_accepted_raw(&service, raw, Some("editor-1".to_string()), None)
        .unwrap_err();
    assert_eq!(err.kind(), PxErrorKind::Validation);
}

#[test]
fn test_malformed_payload_is_validation_error() {
    let service = test_service();
    let gate = ModerationGate::new(Arc::new(AllowAllPolicy));

    let err = gate
        .apply_accepted_raw(&service, "{\"entity_type\": \"widget\"}", None, None)
        .unwrap_err();
    assert_eq!(err.kind(), PxErrorKind::Validation);
}
