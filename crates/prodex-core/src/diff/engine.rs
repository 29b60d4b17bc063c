//! Snapshot diff computation engine.
//!
//! The core entry point is [`compute_diff`], which compares two fully
//! populated [`ProductSnapshot`]s and produces an ordered list of
//! [`FieldChange`]s.

use crate::diff::model::{ChangeType, FieldChange};
use crate::model::product::ProductSnapshot;

/// Display precision for numeric fields in diffs.
///
/// Scores are compared through this formatting, so two values that render
/// identically at two decimals do not produce a change: diffs reflect
/// user-visible change, not raw floating-point bit difference.
fn score_repr(value: f64) -> Option<String> {
    Some(format!("{:.2}", value))
}

fn flag_repr(value: bool) -> Option<String> {
    Some(value.to_string())
}

/// Text fields: the empty string counts as absent for classification.
fn text_repr(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// List fields compare by serialized equality of the whole list; an empty
/// list counts as absent so introducing or clearing a list classifies the
/// same way text fields do.
fn list_repr(values: &[String]) -> Option<String> {
    if values.is_empty() {
        None
    } else {
        Some(serde_json::to_string(values).expect("string list serialization is infallible"))
    }
}

fn classify(old: &Option<String>, new: &Option<String>) -> ChangeType {
    match (old, new) {
        (None, Some(_)) => ChangeType::Added,
        (Some(_), None) => ChangeType::Removed,
        _ => ChangeType::Modified,
    }
}

fn push_if_changed(
    changes: &mut Vec<FieldChange>,
    field_name: &str,
    old: Option<String>,
    new: Option<String>,
) {
    if old != new {
        let change_type = classify(&old, &new);
        changes.push(FieldChange {
            field_name: field_name.to_string(),
            old_value: old,
            new_value: new,
            change_type,
        });
    }
}

/// Compute the field-level differences between two snapshots.
///
/// Pure: no side effects, no I/O. The result is ordered lexicographically by
/// field name so comparisons are reproducible. An identical pair of
/// snapshots yields an empty list, which the revision service treats as a
/// no-op.
pub fn compute_diff(from: &ProductSnapshot, to: &ProductSnapshot) -> Vec<FieldChange> {
    let mut changes = Vec::new();

    // Fields in lexicographic order
    push_if_changed(
        &mut changes,
        "analytics_list",
        list_repr(&from.analytics_list),
        list_repr(&to.analytics_list),
    );
    push_if_changed(
        &mut changes,
        "approved",
        flag_repr(from.approved),
        flag_repr(to.approved),
    );
    push_if_changed(
        &mut changes,
        "decent_score",
        score_repr(from.decent_score),
        score_repr(to.decent_score),
    );
    push_if_changed(
        &mut changes,
        "is_verified",
        flag_repr(from.is_verified),
        flag_repr(to.is_verified),
    );
    push_if_changed(
        &mut changes,
        "logo_url",
        text_repr(&from.logo_url),
        text_repr(&to.logo_url),
    );
    push_if_changed(
        &mut changes,
        "long_desc",
        text_repr(&from.long_desc),
        text_repr(&to.long_desc),
    );
    push_if_changed(
        &mut changes,
        "markdown_content",
        text_repr(&from.markdown_content),
        text_repr(&to.markdown_content),
    );
    push_if_changed(
        &mut changes,
        "security_score",
        score_repr(from.security_score),
        score_repr(to.security_score),
    );
    push_if_changed(
        &mut changes,
        "short_desc",
        text_repr(&from.short_desc),
        text_repr(&to.short_desc),
    );
    push_if_changed(
        &mut changes,
        "title",
        text_repr(&from.title),
        text_repr(&to.title),
    );
    push_if_changed(
        &mut changes,
        "ux_score",
        score_repr(from.ux_score),
        score_repr(to.ux_score),
    );
    push_if_changed(
        &mut changes,
        "vibes_score",
        score_repr(from.vibes_score),
        score_repr(to.vibes_score),
    );

    changes
}
