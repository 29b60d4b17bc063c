//! Authorization policy trait and implementations
//!
//! The policy is injected into the moderation gate; the revision service
//! itself never consults it. Editor identity stays opaque to the core.

/// Decide whether an editor may land changes on a product.
pub trait AuthorizationPolicy: Send + Sync {
    /// Check whether `editor_id` may edit `product_id`.
    fn can_edit(&self, editor_id: &str, product_id: &str) -> bool;
}

/// Always allows (default for CLI use and tests that don't exercise denial).
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAllPolicy;

impl AuthorizationPolicy for AllowAllPolicy {
    fn can_edit(&self, _editor_id: &str, _product_id: &str) -> bool {
        true
    }
}

/// Always denies (for tests that verify a denied edit writes nothing).
#[derive(Debug, Clone, Copy, Default)]
pub struct DenyAllPolicy;

impl AuthorizationPolicy for DenyAllPolicy {
    fn can_edit(&self, _editor_id: &str, _product_id: &str) -> bool {
        false
    }
}
