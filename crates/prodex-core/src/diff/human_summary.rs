//! Human-readable rendering for product diffs.

use crate::diff::model::{ChangeType, ProductDiff};

/// The count summary attached to every comparison result.
pub fn change_count_summary(count: usize) -> String {
    format!("{} field(s) changed", count)
}

/// Render a human-readable Markdown summary of a [`ProductDiff`].
///
/// Intended for review workflows and moderation displays. Informational
/// only; the structured diff is authoritative.
pub fn render_human_summary(diff: &ProductDiff) -> String {
    let mut out = String::new();

    out.push_str("## Product Diff\n\n");
    out.push_str(&format!(
        "**Revisions**: {} → {}  \n**Summary**: {}\n\n",
        diff.from_revision, diff.to_revision, diff.summary
    ));

    if diff.changes.is_empty() {
        out.push_str("_No changes detected._\n");
        return out;
    }

    out.push_str("### Changes\n\n");
    for change in &diff.changes {
        match change.change_type {
            ChangeType::Added => {
                out.push_str(&format!(
                    "- **{}** (added): `{}`\n",
                    change.field_name,
                    change.new_value.as_deref().unwrap_or_default()
                ));
            }
            ChangeType::Removed => {
                out.push_str(&format!(
                    "- **{}** (removed): was `{}`\n",
                    change.field_name,
                    change.old_value.as_deref().unwrap_or_default()
                ));
            }
            ChangeType::Modified => {
                out.push_str(&format!(
                    "- **{}**: `{}` → `{}`\n",
                    change.field_name,
                    change.old_value.as_deref().unwrap_or_default(),
                    change.new_value.as_deref().unwrap_or_default()
                ));
            }
        }
    }
    out.push('\n');

    out
}
