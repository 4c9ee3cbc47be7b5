//! Timestamp Allocator - persisted changelog ordering.
//!
//! Hands out strictly increasing [`ChangelogTimestamp`]s and writes each one
//! back to the project configuration, so the next run (possibly another
//! process) picks up where this one stopped.
//!
//! ## Algorithm
//!
//! 1. Pick a candidate: an explicit per-call base, otherwise
//!    - normal mode: the wall clock;
//!    - reproducible mode: one second after the previous allocation of this
//!      run, or the creation timestamp for the first one.
//! 2. If the candidate is not later than the persisted
//!    `lastLiquibaseTimestamp`, use the persisted value plus one second.
//! 3. Persist the result, then return it.
//!
//! Reproducible mode is on when asked for, or when an explicit creation
//! timestamp is configured. Given the same persisted state and the same base,
//! two runs produce the same sequence.

use chrono::{DateTime, TimeZone, Utc};
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{Clock, ConfigStore},
    },
    domain::{ChangelogTimestamp, DomainError},
    error::{SchemerError, SchemerResult},
};

/// Configuration key holding the last allocated timestamp (epoch ms).
pub const LAST_LIQUIBASE_TIMESTAMP: &str = "lastLiquibaseTimestamp";

/// Configuration key holding the project's creation timestamp (epoch ms).
pub const CREATION_TIMESTAMP: &str = "creationTimestamp";

/// Construction-time settings, read once at generator start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllocatorOptions {
    /// Project-wide base date. Must not be in the future.
    pub creation_timestamp: Option<DateTime<Utc>>,
    /// Count up from the base instead of following the wall clock.
    pub reproducible: bool,
}

impl AllocatorOptions {
    pub fn reproducible() -> Self {
        Self {
            reproducible: true,
            ..Self::default()
        }
    }

    pub fn with_creation_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.creation_timestamp = Some(timestamp);
        self
    }
}

/// Allocates migration ordering keys for one generator run.
pub struct TimestampAllocator {
    store: Box<dyn ConfigStore>,
    clock: Box<dyn Clock>,
    base: Option<ChangelogTimestamp>,
    reproducible: bool,
    /// Persisted baseline; updated on every allocation.
    last: Option<ChangelogTimestamp>,
    /// Previous allocation of this run's reproducible batch.
    batch: Option<ChangelogTimestamp>,
}

impl TimestampAllocator {
    /// Load persisted state and validate the configured base.
    ///
    /// # Errors
    ///
    /// `FutureBaseTimestamp` when `options.creation_timestamp` is later than
    /// the clock's current time. Store failures are propagated.
    #[instrument(skip_all, fields(reproducible = options.reproducible))]
    pub fn new(
        store: Box<dyn ConfigStore>,
        clock: Box<dyn Clock>,
        options: AllocatorOptions,
    ) -> SchemerResult<Self> {
        let now = clock.now();

        let explicit = match options.creation_timestamp {
            Some(requested) if requested > now => {
                return Err(DomainError::FutureBaseTimestamp {
                    timestamp: requested.to_rfc3339(),
                    now: now.to_rfc3339(),
                }
                .into());
            }
            Some(requested) => Some(ChangelogTimestamp::from_datetime(requested)?),
            None => None,
        };

        let stored_base = read_timestamp(store.as_ref(), CREATION_TIMESTAMP)?;
        if let (Some(base), None) = (explicit, stored_base) {
            store.set_i64(CREATION_TIMESTAMP, base.as_millis())?;
            info!(creation = %base, "Creation timestamp recorded");
        }

        let last = read_timestamp(store.as_ref(), LAST_LIQUIBASE_TIMESTAMP)?;
        debug!(last = ?last.map(|ts| ts.to_string()), "Persisted changelog baseline loaded");

        Ok(Self {
            store,
            clock,
            base: explicit.or(stored_base),
            reproducible: options.reproducible || explicit.is_some(),
            last,
            batch: None,
        })
    }

    /// Allocate the next timestamp.
    pub fn allocate(&mut self) -> SchemerResult<ChangelogTimestamp> {
        self.allocate_with(None)
    }

    /// Allocate using `base` as the candidate instead of the clock or batch.
    ///
    /// A base at or before the persisted baseline still advances past it.
    pub fn allocate_from(&mut self, base: DateTime<Utc>) -> SchemerResult<ChangelogTimestamp> {
        self.allocate_with(Some(base))
    }

    /// Allocate `count` timestamps in a row.
    pub fn allocate_many(&mut self, count: usize) -> SchemerResult<Vec<ChangelogTimestamp>> {
        (0..count).map(|_| self.allocate()).collect()
    }

    /// The persisted baseline, i.e. the last timestamp handed out for this
    /// project.
    pub fn last_allocated(&self) -> Option<ChangelogTimestamp> {
        self.last
    }

    pub fn is_reproducible(&self) -> bool {
        self.reproducible
    }

    #[instrument(skip(self), fields(reproducible = self.reproducible))]
    fn allocate_with(
        &mut self,
        base_override: Option<DateTime<Utc>>,
    ) -> SchemerResult<ChangelogTimestamp> {
        let candidate = match base_override {
            Some(base) => ChangelogTimestamp::from_datetime(base)?,
            None => self.candidate()?,
        };

        let allocated = match self.last {
            Some(last) if candidate <= last => {
                debug!(%candidate, %last, "Candidate not after baseline, advancing");
                last.next_second()?
            }
            _ => candidate,
        };

        self.store
            .set_i64(LAST_LIQUIBASE_TIMESTAMP, allocated.as_millis())?;
        self.last = Some(allocated);
        if self.reproducible {
            self.batch = Some(allocated);
        }

        debug!(timestamp = %allocated, "Changelog timestamp allocated");
        Ok(allocated)
    }

    fn candidate(&self) -> SchemerResult<ChangelogTimestamp> {
        if !self.reproducible {
            return Ok(ChangelogTimestamp::from_datetime(self.clock.now())?);
        }
        match (self.batch, self.base) {
            (Some(previous), _) => Ok(previous.next_second()?),
            (None, Some(base)) => Ok(base),
            (None, None) => Ok(default_reproducible_base()?),
        }
    }
}

/// Base used by reproducible runs without a creation timestamp.
pub fn default_reproducible_base() -> Result<ChangelogTimestamp, DomainError> {
    let base = Utc
        .with_ymd_and_hms(2020, 1, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| DomainError::InvalidTimestamp {
            value: "2020-01-01".into(),
            reason: "not representable".into(),
        })?;
    ChangelogTimestamp::from_datetime(base)
}

/// Read a persisted epoch-millisecond value. Unusable values (not an
/// integer, or out of range) are logged and treated as absent; an unreadable
/// store is still an error.
fn read_timestamp(store: &dyn ConfigStore, key: &str) -> SchemerResult<Option<ChangelogTimestamp>> {
    let millis = match store.get_i64(key) {
        Ok(Some(millis)) => millis,
        Ok(None) => return Ok(None),
        Err(SchemerError::Application(ApplicationError::ConfigStore { reason, .. })) => {
            warn!(key, %reason, "Ignoring unusable persisted timestamp");
            return Ok(None);
        }
        Err(e) => return Err(e),
    };
    match ChangelogTimestamp::from_millis(millis) {
        Ok(ts) => Ok(Some(ts)),
        Err(e) => {
            warn!(key, millis, error = %e, "Ignoring unusable persisted timestamp");
            Ok(None)
        }
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::application::ports::output::{MockClock, MockConfigStore};

    #[derive(Clone, Default)]
    struct SharedStore(Arc<Mutex<HashMap<String, i64>>>);

    impl SharedStore {
        fn with(key: &str, value: i64) -> Self {
            let store = Self::default();
            store.0.lock().unwrap().insert(key.into(), value);
            store
        }

        fn value(&self, key: &str) -> Option<i64> {
            self.0.lock().unwrap().get(key).copied()
        }
    }

    impl ConfigStore for SharedStore {
        fn get_i64(&self, key: &str) -> SchemerResult<Option<i64>> {
            Ok(self.value(key))
        }

        fn set_i64(&self, key: &str, value: i64) -> SchemerResult<()> {
            self.0.lock().unwrap().insert(key.into(), value);
            Ok(())
        }
    }

    struct StoppedClock(DateTime<Utc>);

    impl Clock for StoppedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    fn now() -> DateTime<Utc> {
        utc(2026, 10, 16, 12, 0, 0)
    }

    fn allocator(store: &SharedStore, options: AllocatorOptions) -> TimestampAllocator {
        TimestampAllocator::new(
            Box::new(store.clone()),
            Box::new(StoppedClock(now())),
            options,
        )
        .unwrap()
    }

    fn strings(timestamps: &[ChangelogTimestamp]) -> Vec<String> {
        timestamps.iter().map(ToString::to_string).collect()
    }

    // ── normal mode ───────────────────────────────────────────────────────

    #[test]
    fn past_baseline_is_overtaken_by_wall_clock() {
        let persisted = utc(2000, 1, 1, 0, 0, 0).timestamp_millis();
        let store = SharedStore::with(LAST_LIQUIBASE_TIMESTAMP, persisted);

        let ts = allocator(&store, AllocatorOptions::default())
            .allocate()
            .unwrap();

        assert_eq!(ts.to_string(), "20261016120000");
        assert!(ts.as_millis() > persisted);
        assert_eq!(store.value(LAST_LIQUIBASE_TIMESTAMP), Some(ts.as_millis()));
    }

    #[test]
    fn same_second_allocations_stay_strictly_increasing() {
        let store = SharedStore::default();
        let mut alloc = allocator(&store, AllocatorOptions::default());

        let all = alloc.allocate_many(3).unwrap();
        assert_eq!(
            strings(&all),
            ["20261016120000", "20261016120001", "20261016120002"]
        );
    }

    #[test]
    fn future_baseline_is_continued_not_regressed() {
        let persisted = utc(2030, 1, 1, 0, 0, 0).timestamp_millis();
        let store = SharedStore::with(LAST_LIQUIBASE_TIMESTAMP, persisted);
        let mut alloc = allocator(&store, AllocatorOptions::default());

        assert_eq!(alloc.allocate().unwrap().to_string(), "20300101000001");
        assert_eq!(alloc.allocate().unwrap().to_string(), "20300101000002");
    }

    #[test]
    fn successive_instances_share_the_sequence() {
        let store = SharedStore::default();
        let first = allocator(&store, AllocatorOptions::default())
            .allocate_many(2)
            .unwrap();
        let second = allocator(&store, AllocatorOptions::default())
            .allocate_many(2)
            .unwrap();

        assert!(first[1] < second[0]);
        assert_eq!(second[1].to_string(), "20261016120003");
    }

    #[test]
    fn explicit_base_in_the_past_still_advances() {
        let store = SharedStore::default();
        let mut alloc = allocator(&store, AllocatorOptions::default());
        let first = alloc.allocate().unwrap();

        let backdated = alloc.allocate_from(utc(2019, 6, 1, 0, 0, 0)).unwrap();
        assert!(backdated > first);
        assert_eq!(backdated.to_string(), "20261016120001");
    }

    #[test]
    fn explicit_base_after_baseline_is_adopted() {
        let store = SharedStore::with(
            LAST_LIQUIBASE_TIMESTAMP,
            utc(2019, 1, 1, 0, 0, 0).timestamp_millis(),
        );
        let mut alloc = allocator(&store, AllocatorOptions::default());
        let ts = alloc.allocate_from(utc(2021, 3, 4, 5, 6, 7)).unwrap();
        assert_eq!(ts.to_string(), "20210304050607");
    }

    #[test]
    fn subsecond_baseline_still_yields_a_later_key() {
        let persisted = now().timestamp_millis() + 500;
        let store = SharedStore::with(LAST_LIQUIBASE_TIMESTAMP, persisted);
        let ts = allocator(&store, AllocatorOptions::default())
            .allocate()
            .unwrap();
        assert_eq!(ts.to_string(), "20261016120001");
    }

    #[test]
    fn unusable_persisted_value_is_ignored() {
        let store = SharedStore::with(LAST_LIQUIBASE_TIMESTAMP, i64::MAX);
        let alloc = allocator(&store, AllocatorOptions::default());
        assert_eq!(alloc.last_allocated(), None);
    }

    // ── construction ──────────────────────────────────────────────────────

    #[test]
    fn future_creation_timestamp_is_rejected() {
        let result = TimestampAllocator::new(
            Box::new(SharedStore::default()),
            Box::new(StoppedClock(now())),
            AllocatorOptions::default().with_creation_timestamp(utc(2030, 1, 1, 0, 0, 0)),
        );

        assert!(matches!(
            result,
            Err(SchemerError::Domain(DomainError::FutureBaseTimestamp { .. }))
        ));
    }

    #[test]
    fn creation_timestamp_is_recorded_once() {
        let store = SharedStore::default();
        let base = utc(2020, 1, 1, 0, 0, 0);
        allocator(&store, AllocatorOptions::default().with_creation_timestamp(base));
        assert_eq!(store.value(CREATION_TIMESTAMP), Some(base.timestamp_millis()));

        allocator(
            &store,
            AllocatorOptions::default().with_creation_timestamp(utc(2021, 1, 1, 0, 0, 0)),
        );
        assert_eq!(store.value(CREATION_TIMESTAMP), Some(base.timestamp_millis()));
    }

    // ── reproducible mode ─────────────────────────────────────────────────

    #[test]
    fn creation_timestamp_switches_on_reproducible_mode() {
        let store = SharedStore::default();
        let mut alloc = allocator(
            &store,
            AllocatorOptions::default().with_creation_timestamp(utc(2020, 1, 1, 0, 0, 0)),
        );
        assert!(alloc.is_reproducible());
        assert_eq!(
            strings(&alloc.allocate_many(3).unwrap()),
            ["20200101000000", "20200101000001", "20200101000002"]
        );
    }

    #[test]
    fn reproducible_runs_are_identical() {
        let options =
            AllocatorOptions::reproducible().with_creation_timestamp(utc(2022, 2, 2, 2, 2, 2));

        let run = || {
            let store = SharedStore::default();
            strings(&allocator(&store, options).allocate_many(4).unwrap())
        };

        assert_eq!(run(), run());
        assert_eq!(run()[3], "20220202020205");
    }

    #[test]
    fn reproducible_without_base_starts_at_default() {
        let store = SharedStore::default();
        let mut alloc = allocator(&store, AllocatorOptions::reproducible());
        assert_eq!(alloc.allocate().unwrap().to_string(), "20200101000000");
    }

    #[test]
    fn reproducible_uses_stored_creation_timestamp() {
        let store = SharedStore::with(
            CREATION_TIMESTAMP,
            utc(2021, 7, 1, 0, 0, 0).timestamp_millis(),
        );
        let mut alloc = allocator(&store, AllocatorOptions::reproducible());
        assert_eq!(alloc.allocate().unwrap().to_string(), "20210701000000");
    }

    #[test]
    fn reproducible_continues_from_future_baseline() {
        let store = SharedStore::with(
            LAST_LIQUIBASE_TIMESTAMP,
            utc(2030, 1, 1, 0, 0, 0).timestamp_millis(),
        );
        let mut alloc = allocator(&store, AllocatorOptions::reproducible());

        assert_eq!(alloc.allocate().unwrap().to_string(), "20300101000001");
        assert_eq!(alloc.allocate().unwrap().to_string(), "20300101000002");
        assert_eq!(
            store.value(LAST_LIQUIBASE_TIMESTAMP),
            Some(utc(2030, 1, 1, 0, 0, 2).timestamp_millis())
        );
    }

    // ── port interaction ──────────────────────────────────────────────────

    #[test]
    fn allocation_is_persisted_before_returning() {
        let expected = now().timestamp_millis();

        let mut store = MockConfigStore::new();
        store.expect_get_i64().returning(|_| Ok(None));
        store
            .expect_set_i64()
            .withf(move |key, value| key == LAST_LIQUIBASE_TIMESTAMP && *value == expected)
            .times(1)
            .returning(|_, _| Ok(()));

        let mut clock = MockClock::new();
        clock.expect_now().returning(now);

        let mut alloc =
            TimestampAllocator::new(Box::new(store), Box::new(clock), AllocatorOptions::default())
                .unwrap();
        assert_eq!(alloc.allocate().unwrap().as_millis(), expected);
    }

    #[test]
    fn non_integer_persisted_value_is_treated_as_absent() {
        let expected = now().timestamp_millis();

        let mut store = MockConfigStore::new();
        store.expect_get_i64().returning(|key| {
            Err(ApplicationError::ConfigStore {
                key: key.into(),
                reason: "expected an integer, found \"soon\"".into(),
            }
            .into())
        });
        store.expect_set_i64().returning(|_, _| Ok(()));

        let mut clock = MockClock::new();
        clock.expect_now().returning(now);

        let mut alloc =
            TimestampAllocator::new(Box::new(store), Box::new(clock), AllocatorOptions::default())
                .unwrap();
        assert_eq!(alloc.allocate().unwrap().as_millis(), expected);
    }

    #[test]
    fn unreadable_store_is_propagated() {
        let mut store = MockConfigStore::new();
        store.expect_get_i64().returning(|_| {
            Err(ApplicationError::Persistence {
                path: ".schemer-rc.json".into(),
                reason: "Failed to parse".into(),
            }
            .into())
        });

        let mut clock = MockClock::new();
        clock.expect_now().returning(now);

        let result =
            TimestampAllocator::new(Box::new(store), Box::new(clock), AllocatorOptions::default())
                .and_then(|mut alloc| alloc.allocate());
        assert!(matches!(
            result,
            Err(SchemerError::Application(ApplicationError::Persistence { .. }))
        ));
    }

    #[test]
    fn store_failure_is_propagated() {
        let mut store = MockConfigStore::new();
        store.expect_get_i64().returning(|_| Ok(None));
        store.expect_set_i64().returning(|key, _| {
            Err(ApplicationError::ConfigStore {
                key: key.into(),
                reason: "read-only".into(),
            }
            .into())
        });

        let mut clock = MockClock::new();
        clock.expect_now().returning(now);

        let mut alloc =
            TimestampAllocator::new(Box::new(store), Box::new(clock), AllocatorOptions::default())
                .unwrap();
        assert!(matches!(
            alloc.allocate(),
            Err(SchemerError::Application(ApplicationError::ConfigStore { .. }))
        ));
        assert_eq!(alloc.last_allocated(), None);
    }
}
