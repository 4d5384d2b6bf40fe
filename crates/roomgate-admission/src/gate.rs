//! The admission algorithm.

use std::sync::Arc;

use tracing::{debug, info, warn};

use roomgate_core::config::{AdmissionConfig, WriteMode};
use roomgate_core::error::AppError;
use roomgate_core::result::AppResult;
use roomgate_core::traits::RoomStore;
use roomgate_core::types::{RoomId, RoomRecord, SeatToken};

use crate::decision::{Admission, RejectReason, Verdict, classify};
use crate::path::room_id_from_path;

/// Decides admission for room requests against an injected store.
///
/// In [`WriteMode::Overwrite`] a granted seat is persisted with a plain
/// `set`: two callers racing for the last seat can both be forwarded while
/// only the later write survives. [`WriteMode::CompareAndSet`] re-runs the
/// decision whenever the record changed between read and write.
#[derive(Debug, Clone)]
pub struct AdmissionGate {
    store: Arc<dyn RoomStore>,
    write_mode: WriteMode,
    max_write_attempts: u32,
}

impl AdmissionGate {
    /// Creates a gate with the baseline overwrite strategy.
    pub fn new(store: Arc<dyn RoomStore>) -> Self {
        Self {
            store,
            write_mode: WriteMode::Overwrite,
            max_write_attempts: 1,
        }
    }

    /// Creates a gate configured from the admission settings.
    pub fn from_config(store: Arc<dyn RoomStore>, config: &AdmissionConfig) -> Self {
        Self {
            store,
            write_mode: config.write_mode,
            max_write_attempts: config.max_write_attempts.max(1),
        }
    }

    /// Decide admission for a request path and the caller's presented token.
    ///
    /// Expected rejections come back as [`Admission::Redirect`]. Store
    /// failures are returned as errors and never turned into a decision.
    pub async fn admit(&self, path: &str, presented: Option<&str>) -> AppResult<Admission> {
        let Some(room_id) = room_id_from_path(path) else {
            debug!(path = %path, "Path does not name a room");
            return Ok(Admission::Redirect { reason: None });
        };

        let admission = match self.write_mode {
            WriteMode::Overwrite => self.admit_overwrite(&room_id, presented).await?,
            WriteMode::CompareAndSet => self.admit_compare_and_set(&room_id, presented).await?,
        };

        info!(room_id = %room_id, outcome = admission.outcome(), "Admission decided");
        Ok(admission)
    }

    async fn admit_overwrite(
        &self,
        room_id: &RoomId,
        presented: Option<&str>,
    ) -> AppResult<Admission> {
        let record = self.store.get(room_id).await?;

        match Self::decide(record.as_ref(), presented) {
            Decided::Done(admission) => Ok(admission),
            Decided::Grant(record) => {
                let token = SeatToken::mint();
                self.store
                    .set(room_id, &record.with_seat(token.clone()))
                    .await?;
                Ok(Admission::Forward {
                    set_cookie: Some(token),
                })
            }
        }
    }

    async fn admit_compare_and_set(
        &self,
        room_id: &RoomId,
        presented: Option<&str>,
    ) -> AppResult<Admission> {
        for attempt in 1..=self.max_write_attempts {
            let record = self.store.get(room_id).await?;

            let record = match Self::decide(record.as_ref(), presented) {
                Decided::Done(admission) => return Ok(admission),
                Decided::Grant(record) => record,
            };

            let token = SeatToken::mint();
            let updated = record.with_seat(token.clone());
            if self.store.set_if_unchanged(room_id, record, &updated).await? {
                return Ok(Admission::Forward {
                    set_cookie: Some(token),
                });
            }

            warn!(room_id = %room_id, attempt, "Room changed during seat grant, retrying");
        }

        Err(AppError::conflict(format!(
            "Room '{room_id}' kept changing during seat grant ({} attempts)",
            self.max_write_attempts
        )))
    }

    fn decide<'a>(record: Option<&'a RoomRecord>, presented: Option<&str>) -> Decided<'a> {
        match (classify(record, presented), record) {
            (Verdict::Available, Some(record)) => Decided::Grant(record),
            (Verdict::Seated, _) => Decided::Done(Admission::Forward { set_cookie: None }),
            (Verdict::Full, _) => Decided::Done(Admission::Redirect {
                reason: Some(RejectReason::RoomFull),
            }),
            (Verdict::NotFound, _) | (Verdict::Available, None) => {
                Decided::Done(Admission::Redirect {
                    reason: Some(RejectReason::RoomNotFound),
                })
            }
        }
    }
}

/// Outcome of the read-only part of the algorithm.
enum Decided<'a> {
    Done(Admission),
    Grant(&'a RoomRecord),
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use roomgate_core::error::ErrorKind;

    /// Hash-map store with failure injection.
    #[derive(Debug, Default)]
    struct FakeStore {
        records: Mutex<HashMap<String, RoomRecord>>,
        fail_reads: bool,
        fail_writes: bool,
        /// Records written into the room just before each conditional write.
        interference: Mutex<Vec<RoomRecord>>,
        writes: AtomicUsize,
    }

    impl FakeStore {
        fn with_room(id: &str, record: RoomRecord) -> Self {
            let store = Self::default();
            store
                .records
                .lock()
                .unwrap()
                .insert(id.to_string(), record);
            store
        }

        fn record(&self, id: &str) -> Option<RoomRecord> {
            self.records.lock().unwrap().get(id).cloned()
        }
    }

    #[async_trait]
    impl RoomStore for FakeStore {
        async fn get(&self, room_id: &RoomId) -> AppResult<Option<RoomRecord>> {
            if self.fail_reads {
                return Err(AppError::store_unavailable("read refused"));
            }
            Ok(self.record(room_id.as_str()))
        }

        async fn set(&self, room_id: &RoomId, record: &RoomRecord) -> AppResult<()> {
            if self.fail_writes {
                return Err(AppError::store_unavailable("write refused"));
            }
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.records
                .lock()
                .unwrap()
                .insert(room_id.to_string(), record.clone());
            Ok(())
        }

        async fn set_if_unchanged(
            &self,
            room_id: &RoomId,
            expected: &RoomRecord,
            record: &RoomRecord,
        ) -> AppResult<bool> {
            let mut records = self.records.lock().unwrap();
            if let Some(sneaky) = self.interference.lock().unwrap().pop() {
                records.insert(room_id.to_string(), sneaky);
            }
            match records.get(room_id.as_str()) {
                Some(current) if current.connected == expected.connected => {
                    self.writes.fetch_add(1, Ordering::SeqCst);
                    records.insert(room_id.to_string(), record.clone());
                    Ok(true)
                }
                _ => Ok(false),
            }
        }

        async fn create(&self, room_id: &RoomId, record: &RoomRecord) -> AppResult<()> {
            self.set(room_id, record).await
        }

        async fn health_check(&self) -> AppResult<bool> {
            Ok(!self.fail_reads)
        }
    }

    const T: i64 = 1_766_765_519_639;

    fn room_with(tokens: &[&str]) -> RoomRecord {
        tokens.iter().fold(RoomRecord::new(T), |room, t| {
            room.with_seat(SeatToken::from_raw(*t))
        })
    }

    fn tokens(record: &RoomRecord) -> Vec<&str> {
        record.connected.iter().map(SeatToken::as_str).collect()
    }

    fn granted(admission: Admission) -> SeatToken {
        match admission {
            Admission::Forward {
                set_cookie: Some(token),
            } => token,
            other => panic!("expected a seat grant, got {other:?}"),
        }
    }

    fn cas_gate(store: Arc<FakeStore>) -> AdmissionGate {
        let config = AdmissionConfig {
            write_mode: WriteMode::CompareAndSet,
            max_write_attempts: 3,
            ..AdmissionConfig::default()
        };
        AdmissionGate::from_config(store, &config)
    }

    #[tokio::test]
    async fn test_first_caller_takes_a_seat() {
        let store = Arc::new(FakeStore::with_room("R1", room_with(&[])));
        let gate = AdmissionGate::new(store.clone());

        let t1 = granted(gate.admit("/room/R1", None).await.unwrap());

        let stored = store.record("R1").unwrap();
        assert_eq!(tokens(&stored), vec![t1.as_str()]);
        assert_eq!(stored.created_at, T);
    }

    #[tokio::test]
    async fn test_seated_caller_reenters_without_mutation() {
        let store = Arc::new(FakeStore::with_room("R1", room_with(&["t1"])));
        let gate = AdmissionGate::new(store.clone());

        let admission = gate.admit("/room/R1", Some("t1")).await.unwrap();

        assert_eq!(admission, Admission::Forward { set_cookie: None });
        assert_eq!(store.record("R1").unwrap(), room_with(&["t1"]));
        assert_eq!(store.writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_second_caller_takes_last_seat() {
        let store = Arc::new(FakeStore::with_room("R1", room_with(&["t1"])));
        let gate = AdmissionGate::new(store.clone());

        let t2 = granted(gate.admit("/room/R1", None).await.unwrap());

        let stored = store.record("R1").unwrap();
        assert_eq!(tokens(&stored), vec!["t1", t2.as_str()]);
        assert_eq!(stored.created_at, T);
    }

    #[tokio::test]
    async fn test_unknown_token_is_turned_away_from_full_room() {
        let store = Arc::new(FakeStore::with_room("R1", room_with(&["t1", "t2"])));
        let gate = AdmissionGate::new(store.clone());

        let admission = gate.admit("/room/R1", Some("t3")).await.unwrap();

        assert_eq!(
            admission,
            Admission::Redirect {
                reason: Some(RejectReason::RoomFull)
            }
        );
        assert_eq!(store.record("R1").unwrap(), room_with(&["t1", "t2"]));
    }

    #[tokio::test]
    async fn test_seated_caller_enters_full_room() {
        let store = Arc::new(FakeStore::with_room("R1", room_with(&["t1", "t2"])));
        let gate = AdmissionGate::new(store.clone());

        let admission = gate.admit("/room/R1", Some("t1")).await.unwrap();
        assert_eq!(admission, Admission::Forward { set_cookie: None });
    }

    #[tokio::test]
    async fn test_unknown_room_is_not_found() {
        let store = Arc::new(FakeStore::default());
        let gate = AdmissionGate::new(store.clone());

        let admission = gate.admit("/room/unknownRoom", None).await.unwrap();

        assert_eq!(
            admission,
            Admission::Redirect {
                reason: Some(RejectReason::RoomNotFound)
            }
        );
        assert!(store.records.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_path_redirects_without_reason() {
        let store = Arc::new(FakeStore {
            fail_reads: true,
            ..FakeStore::default()
        });
        let gate = AdmissionGate::new(store);

        for path in ["/room", "/room/", "/room/a/b"] {
            let admission = gate.admit(path, None).await.unwrap();
            assert_eq!(admission, Admission::Redirect { reason: None }, "{path}");
        }
    }

    #[tokio::test]
    async fn test_read_failure_is_an_error() {
        let store = Arc::new(FakeStore {
            fail_reads: true,
            ..FakeStore::default()
        });
        let gate = AdmissionGate::new(store);

        let err = gate.admit("/room/R1", None).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::StoreUnavailable);
    }

    #[tokio::test]
    async fn test_write_failure_is_an_error() {
        let mut store = FakeStore::with_room("R1", room_with(&[]));
        store.fail_writes = true;
        let gate = AdmissionGate::new(Arc::new(store));

        let err = gate.admit("/room/R1", None).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::StoreUnavailable);
    }

    #[tokio::test]
    async fn test_overwrite_mode_allows_lost_update() {
        // Two racers both read `[t1]` before either writes.
        let store = Arc::new(FakeStore::with_room("R1", room_with(&["t1"])));
        let gate = AdmissionGate::new(store.clone());

        let snapshot = store.get(&RoomId::parse("R1").unwrap()).await.unwrap();
        let a = granted(gate.admit("/room/R1", None).await.unwrap());
        store
            .set(&RoomId::parse("R1").unwrap(), snapshot.as_ref().unwrap())
            .await
            .unwrap();
        let b = granted(gate.admit("/room/R1", None).await.unwrap());

        let stored = store.record("R1").unwrap();
        assert_eq!(tokens(&stored), vec!["t1", b.as_str()]);
        assert!(!stored.is_seated(a.as_str()));
    }

    #[tokio::test]
    async fn test_compare_and_set_rereads_after_conflict() {
        let store = Arc::new(FakeStore::with_room("R1", room_with(&["t1"])));
        store
            .interference
            .lock()
            .unwrap()
            .push(room_with(&["t1", "rival"]));
        let gate = cas_gate(store.clone());

        let admission = gate.admit("/room/R1", None).await.unwrap();

        assert_eq!(
            admission,
            Admission::Redirect {
                reason: Some(RejectReason::RoomFull)
            }
        );
        assert_eq!(store.record("R1").unwrap(), room_with(&["t1", "rival"]));
    }

    #[tokio::test]
    async fn test_compare_and_set_grants_after_retry() {
        let store = Arc::new(FakeStore::with_room("R1", room_with(&[])));
        store.interference.lock().unwrap().push(room_with(&["rival"]));
        let gate = cas_gate(store.clone());

        let token = granted(gate.admit("/room/R1", None).await.unwrap());

        let stored = store.record("R1").unwrap();
        assert_eq!(tokens(&stored), vec!["rival", token.as_str()]);
    }

    #[tokio::test]
    async fn test_compare_and_set_gives_up() {
        let store = Arc::new(FakeStore::with_room("R1", room_with(&[])));
        {
            let mut interference = store.interference.lock().unwrap();
            // Each rival leaves a different single-seat room behind.
            interference.push(room_with(&["c"]));
            interference.push(room_with(&["b"]));
            interference.push(room_with(&["a"]));
        }
        let gate = cas_gate(store.clone());

        let err = gate.admit("/room/R1", None).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }
}
