//! Shared serde helper functions used by the config sections.

/// Serde default function that returns `true`.
///
/// Used for switches that are on unless an operator turns them off.
pub fn default_true() -> bool {
    true
}
