//! Governing-policy selection
//!
//! Given a path, a method, and the active policy set, pick the single
//! policy that governs the request. Selection is deterministic: highest
//! priority wins, ties fall to the longest literal prefix, and equal
//! prefixes fall to the lowest policy id.

use super::types::Policy;

/// Select the governing policy for a request, if any
pub fn resolve<'a>(path: &str, method: &str, policies: &'a [Policy]) -> Option<&'a Policy> {
    policies
        .iter()
        .filter(|policy| policy.enabled)
        .filter(|policy| policy.methods.allows(method))
        .filter(|policy| policy.pattern.matches(path))
        .max_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then_with(|| {
                    a.pattern
                        .literal_prefix_len()
                        .cmp(&b.pattern.literal_prefix_len())
                })
                // Lowest id wins the final tie, so ordering never depends
                // on the iteration order of the input set.
                .then_with(|| b.id.cmp(&a.id))
        })
}
