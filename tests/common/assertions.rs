//! Custom test assertions
//!
//! Provides domain-specific assertions for testing gatehouse-rs components.

use gatehouse_rs::core::decision::{DecisionRecord, DenyReason, Outcome};

/// Assertions for DecisionRecord
pub trait DecisionRecordAssertions {
    /// Assert the request was allowed
    fn assert_allowed(&self);

    /// Assert the request was denied for the given reason
    fn assert_denied(&self, reason: DenyReason);
}

impl DecisionRecordAssertions for DecisionRecord {
    fn assert_allowed(&self) {
        assert_eq!(
            self.outcome,
            Outcome::Allow,
            "Expected allow for {} {}, got deny: {:?}",
            self.method,
            self.path,
            self.deny_reason
        );
    }

    fn assert_denied(&self, reason: DenyReason) {
        assert_eq!(
            self.outcome,
            Outcome::Deny,
            "Expected deny for {} {}, got allow via policy {:?}",
            self.method,
            self.path,
            self.policy_id
        );
        assert_eq!(
            self.deny_reason,
            Some(reason),
            "Denied for a different reason"
        );
    }
}

/// Assert a duration is within bounds
#[macro_export]
macro_rules! assert_duration_within {
    ($duration:expr, $max_ms:expr) => {
        let millis = $duration.as_millis();
        assert!(
            millis <= $max_ms,
            "Duration {} ms exceeded maximum {} ms",
            millis,
            $max_ms
        );
    };
}

/// Assert a collection contains an item matching a predicate
#[macro_export]
macro_rules! assert_contains {
    ($collection:expr, $predicate:expr) => {
        assert!(
            $collection.iter().any($predicate),
            "Collection does not contain expected item"
        );
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_duration_within_macro() {
        use std::time::Duration;
        assert_duration_within!(Duration::from_millis(50), 100);
    }

    #[test]
    fn test_contains_macro() {
        let items = [1, 2, 3, 4, 5];
        assert_contains!(items, |&x| x == 3);
    }
}
