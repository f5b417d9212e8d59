//! Shared serde helper functions used across multiple modules.

/// Serde default function that returns `true`.
///
/// Used for policy flags that are enabled unless configured otherwise.
pub fn default_true() -> bool {
    true
}
