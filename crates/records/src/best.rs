//! Best (time, moves) record per grid size.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::store::KeyValueStore;
use crate::types::{BestRecord, GridSize};

/// Result of [`BestRecords::record_if_better`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Improvement {
    /// Candidate stored; `previous` is what it replaced.
    Improved { previous: Option<BestRecord> },
    /// Existing record kept.
    NotImproved { best: BestRecord },
}

impl Improvement {
    pub fn is_improved(&self) -> bool {
        matches!(self, Improvement::Improved { .. })
    }
}

/// On-disk value: seconds with one decimal plus the move count.
#[derive(Debug, Serialize, Deserialize)]
struct StoredRecord {
    time: f64,
    moves: u32,
}

impl StoredRecord {
    fn into_record(self) -> Option<BestRecord> {
        if !self.time.is_finite() || self.time < 0.0 {
            return None;
        }
        let tenths = (self.time * 10.0).round();
        if tenths > u32::MAX as f64 {
            return None;
        }
        Some(BestRecord::new(tenths as u32, self.moves))
    }
}

impl From<BestRecord> for StoredRecord {
    fn from(value: BestRecord) -> Self {
        Self {
            time: value.time_tenths as f64 / 10.0,
            moves: value.moves,
        }
    }
}

/// Storage key for a grid size.
pub fn record_key(size: GridSize) -> String {
    format!("memory_best_{}", size.n())
}

/// Best records over any key-value store.
#[derive(Debug, Clone, Default)]
pub struct BestRecords<S> {
    store: S,
}

impl<S: KeyValueStore> BestRecords<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Stored record for `size`. Missing or unreadable values count as none.
    pub fn get(&self, size: GridSize) -> Option<BestRecord> {
        let key = record_key(size);
        let raw = self.store.get(&key)?;

        match serde_json::from_str::<StoredRecord>(&raw) {
            Ok(stored) => {
                let record = stored.into_record();
                if record.is_none() {
                    warn!(key = %key, "ignoring out-of-range best record");
                }
                record
            }
            Err(err) => {
                warn!(key = %key, error = %err, "ignoring malformed best record");
                None
            }
        }
    }

    /// Store (`time_tenths`, `moves`) if there is no record yet or it is
    /// strictly better than the current one.
    ///
    /// A failed write is logged; the comparison result is still reported.
    pub fn record_if_better(&mut self, size: GridSize, time_tenths: u32, moves: u32) -> Improvement {
        let candidate = BestRecord::new(time_tenths, moves);
        let previous = self.get(size);

        if let Some(best) = previous {
            if !candidate.is_better_than(&best) {
                return Improvement::NotImproved { best };
            }
        }

        let key = record_key(size);
        match serde_json::to_string(&StoredRecord::from(candidate)) {
            Ok(value) => {
                if let Err(err) = self.store.set(&key, value) {
                    warn!(key = %key, error = %err, "failed to persist best record");
                }
            }
            Err(err) => warn!(key = %key, error = %err, "failed to encode best record"),
        }

        info!(
            size = size.n(),
            time = %candidate.time_display(),
            moves = candidate.moves,
            "new best record"
        );
        Improvement::Improved { previous }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn size(n: u8) -> GridSize {
        GridSize::try_from(n).unwrap()
    }

    #[test]
    fn get_without_record_is_none() {
        let records = BestRecords::new(MemoryStore::new());
        assert_eq!(records.get(size(4)), None);
    }

    #[test]
    fn first_completion_always_improves() {
        let mut records = BestRecords::new(MemoryStore::new());
        let result = records.record_if_better(size(4), 453, 20);
        assert_eq!(result, Improvement::Improved { previous: None });
        assert_eq!(records.get(size(4)), Some(BestRecord::new(453, 20)));
    }

    #[test]
    fn slower_run_never_overwrites() {
        let mut records = BestRecords::new(MemoryStore::new());
        records.record_if_better(size(4), 300, 12);

        for (time, moves) in [(301, 12), (301, 5), (400, 30), (300, 12), (300, 13)] {
            let result = records.record_if_better(size(4), time, moves);
            assert!(!result.is_improved(), "({time}, {moves}) should not win");
        }
        assert_eq!(records.get(size(4)), Some(BestRecord::new(300, 12)));
    }

    #[test]
    fn equal_time_fewer_moves_improves() {
        let mut records = BestRecords::new(MemoryStore::new());
        records.record_if_better(size(6), 300, 12);

        let result = records.record_if_better(size(6), 300, 11);
        assert_eq!(
            result,
            Improvement::Improved {
                previous: Some(BestRecord::new(300, 12))
            }
        );
    }

    #[test]
    fn records_are_keyed_by_size() {
        let mut records = BestRecords::new(MemoryStore::new());
        records.record_if_better(size(2), 20, 2);
        records.record_if_better(size(4), 200, 10);

        assert_eq!(records.get(size(2)), Some(BestRecord::new(20, 2)));
        assert_eq!(records.get(size(4)), Some(BestRecord::new(200, 10)));
        assert_eq!(records.get(size(6)), None);
        assert!(records.store().get("memory_best_2").is_some());
    }

    #[test]
    fn stored_value_uses_seconds() {
        let mut records = BestRecords::new(MemoryStore::new());
        records.record_if_better(size(4), 123, 9);

        let raw = records.store().get("memory_best_4").unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["time"], serde_json::json!(12.3));
        assert_eq!(value["moves"], serde_json::json!(9));
    }

    #[test]
    fn malformed_values_count_as_no_record() {
        let mut store = MemoryStore::new();
        store.set("memory_best_4", "null".to_string()).unwrap();
        store.set("memory_best_6", "{\"time\":-1,\"moves\":3}".to_string()).unwrap();
        store.set("memory_best_8", "garbage".to_string()).unwrap();
        let mut records = BestRecords::new(store);

        assert_eq!(records.get(size(4)), None);
        assert_eq!(records.get(size(6)), None);
        assert_eq!(records.get(size(8)), None);

        assert!(records.record_if_better(size(8), 999, 99).is_improved());
    }

    #[test]
    fn record_is_monotonic_over_any_sequence() {
        let mut records = BestRecords::new(MemoryStore::new());
        let candidates = [
            (500, 30),
            (420, 40),
            (420, 25),
            (610, 10),
            (419, 99),
            (419, 98),
            (700, 1),
        ];

        for &(time, moves) in &candidates {
            records.record_if_better(size(4), time, moves);
        }

        let best = records.get(size(4)).unwrap();
        for &(time, moves) in &candidates {
            assert!(best <= BestRecord::new(time, moves));
        }
        assert_eq!(best, BestRecord::new(419, 98));
    }
}
