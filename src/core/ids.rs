// JobBoard - core/ids.rs
//
// Timestamp-derived identifiers for users and alerts.
//
// Ids are milliseconds since the Unix epoch, bumped past the last issued
// value so two ids created within the same millisecond still differ and
// ids never go backwards when the wall clock does.

use chrono::{DateTime, Utc};

/// Issues strictly increasing ids derived from wall-clock time.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    /// Generator that will never reissue any id up to and including `floor`.
    ///
    /// Seed with the largest id already in storage when rehydrating.
    pub fn starting_after(floor: u64) -> Self {
        Self { last: floor }
    }

    /// Next id for an object created at `now`.
    pub fn next_at(&mut self, now: DateTime<Utc>) -> u64 {
        let millis = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        let id = millis.max(self.last.saturating_add(1));
        self.last = id;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_ids_follow_the_clock() {
        let mut ids = IdGenerator::default();
        let now = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(ids.next_at(now), 1_700_000_000_123);
    }

    #[test]
    fn test_same_millisecond_ids_are_distinct() {
        let mut ids = IdGenerator::default();
        let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let a = ids.next_at(now);
        let b = ids.next_at(now);
        let c = ids.next_at(now);
        assert!(a < b && b < c);
    }

    /// A clock stepping backwards must not produce an id already in storage.
    #[test]
    fn test_ids_never_go_backwards() {
        let mut ids = IdGenerator::starting_after(1_800_000_000_000);
        let earlier = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        assert_eq!(ids.next_at(earlier), 1_800_000_000_001);
        assert_eq!(ids.next_at(earlier), 1_800_000_000_002);
    }
}
