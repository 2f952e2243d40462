// # Record Tracker
//
// In-memory map from validation record name to the provider record ID and
// the value that record carries.
//
// ## Purpose
//
// Remembers which record perform created (or found) so cleanup can delete it
// by ID without listing records again.
//
// ## Shared names
//
// Challenges for `example.com` and `*.example.com` share one validation name
// with different values. Only the latest record per name is kept, so lookups
// for deletion go through [`RecordTracker::record_for`], which also checks the
// value.
//
// ## Lifetime
//
// - Owned by exactly one authenticator, mutated through `&mut`
// - Never persisted; a fresh process starts empty and cleanup falls back
//   to a remote lookup

use std::collections::HashMap;

/// A record perform published
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedRecord {
    /// Provider-assigned record ID
    pub record_id: String,
    /// Validation value the record carries
    pub value: String,
}

/// Validation record name → tracked record
///
/// # Example
///
/// ```rust
/// use dns01_core::state::RecordTracker;
///
/// let mut tracker = RecordTracker::new();
/// tracker.put("_acme-challenge.example.com", "123456", "tok123");
/// assert_eq!(tracker.record("_acme-challenge.example.com"), Some("123456"));
/// assert_eq!(tracker.record_for("_acme-challenge.example.com", "tok123"), Some("123456"));
/// assert_eq!(tracker.record_for("_acme-challenge.example.com", "other"), None);
///
/// tracker.remove("_acme-challenge.example.com");
/// assert!(tracker.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordTracker {
    records: HashMap<String, TrackedRecord>,
}

impl RecordTracker {
    /// Create a new empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the record ID tracked for a validation name
    pub fn record(&self, name: &str) -> Option<&str> {
        self.records.get(name).map(|entry| entry.record_id.as_str())
    }

    /// Get the record ID tracked for a validation name, only if it carries `value`
    pub fn record_for(&self, name: &str, value: &str) -> Option<&str> {
        self.records
            .get(name)
            .filter(|entry| entry.value == value)
            .map(|entry| entry.record_id.as_str())
    }

    /// Get the full entry tracked for a validation name
    pub fn get(&self, name: &str) -> Option<&TrackedRecord> {
        self.records.get(name)
    }

    /// Track a record, replacing any previous entry for the name
    pub fn put(
        &mut self,
        name: impl Into<String>,
        record_id: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.records.insert(
            name.into(),
            TrackedRecord {
                record_id: record_id.into(),
                value: value.into(),
            },
        );
    }

    /// Stop tracking a name, returning the entry it mapped to
    pub fn remove(&mut self, name: &str) -> Option<TrackedRecord> {
        self.records.remove(name)
    }

    /// Get the number of tracked records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if nothing is tracked
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_basic() {
        let mut tracker = RecordTracker::new();

        // Initially empty
        assert!(tracker.is_empty());
        assert_eq!(tracker.record("_acme-challenge.example.com"), None);

        tracker.put("_acme-challenge.example.com", "1001", "tok123");
        assert_eq!(tracker.len(), 1);
        assert_eq!(tracker.record("_acme-challenge.example.com"), Some("1001"));

        assert_eq!(
            tracker.remove("_acme-challenge.example.com"),
            Some(TrackedRecord {
                record_id: "1001".to_string(),
                value: "tok123".to_string(),
            })
        );
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_tracker_put_replaces() {
        let mut tracker = RecordTracker::new();
        tracker.put("_acme-challenge.example.com", "1001", "tok-apex");
        tracker.put("_acme-challenge.example.com", "1002", "tok-wild");

        assert_eq!(tracker.len(), 1);
        assert_eq!(tracker.record("_acme-challenge.example.com"), Some("1002"));
        assert_eq!(tracker.get("_acme-challenge.example.com").map(|e| e.value.as_str()), Some("tok-wild"));
    }

    #[test]
    fn test_tracker_record_for_checks_value() {
        let mut tracker = RecordTracker::new();
        tracker.put("_acme-challenge.example.com", "1002", "tok-wild");

        assert_eq!(tracker.record_for("_acme-challenge.example.com", "tok-wild"), Some("1002"));
        assert_eq!(tracker.record_for("_acme-challenge.example.com", "tok-apex"), None);
        assert_eq!(tracker.record_for("_acme-challenge.other.com", "tok-wild"), None);
    }

    #[test]
    fn test_tracker_remove_missing() {
        let mut tracker = RecordTracker::new();
        tracker.put("_acme-challenge.a.com", "1", "tok");
        assert_eq!(tracker.remove("_acme-challenge.b.com"), None);
        assert_eq!(tracker.len(), 1);
    }
}
