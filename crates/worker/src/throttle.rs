//! Rate-limited [`AssignmentStore`] for batch runs.
//!
//! Every write takes a token from a shared [`TokenBucket`]; reads pass
//! straight through.

use std::time::Instant;

use async_trait::async_trait;
use talentops_core::daily_assignment::{AssignmentEntity, DailyRow, PeriodAssignment};
use talentops_core::error::CoreResult;
use talentops_core::reconciler::{AssignmentStore, ScheduleSnapshot};
use talentops_core::throttle::TokenBucket;
use talentops_core::types::{Date, DbId};
use tokio::sync::Mutex;

/// Wraps a store and paces its writes.
pub struct ThrottledStore<S> {
    inner: S,
    bucket: Mutex<TokenBucket>,
}

impl<S> ThrottledStore<S> {
    pub fn new(inner: S, bucket: TokenBucket) -> Self {
        Self {
            inner,
            bucket: Mutex::new(bucket),
        }
    }

    /// Wait until a write token is available and take it.
    async fn acquire(&self) {
        loop {
            let wait = {
                let mut bucket = self.bucket.lock().await;
                let now = Instant::now();
                if bucket.try_acquire(now) {
                    return;
                }
                bucket.wait_time(now)
            };
            tracing::debug!(wait_ms = wait.as_millis() as u64, "Batch limit reached, pausing");
            tokio::time::sleep(wait).await;
        }
    }
}

#[async_trait]
impl<S: AssignmentStore> AssignmentStore for ThrottledStore<S> {
    async fn period_assignments(&self, project_id: DbId) -> CoreResult<Vec<PeriodAssignment>> {
        self.inner.period_assignments(project_id).await
    }

    async fn list_days(
        &self,
        entity: AssignmentEntity,
        project_id: DbId,
    ) -> CoreResult<Vec<DailyRow>> {
        self.inner.list_days(entity, project_id).await
    }

    async fn upsert_day(&self, row: &DailyRow) -> CoreResult<()> {
        self.acquire().await;
        self.inner.upsert_day(row).await
    }

    async fn delete_day(&self, row: &DailyRow) -> CoreResult<bool> {
        self.acquire().await;
        self.inner.delete_day(row).await
    }

    async fn write_scheduled_dates(
        &self,
        entity: AssignmentEntity,
        project_id: DbId,
        dates: &[Date],
    ) -> CoreResult<()> {
        self.acquire().await;
        self.inner
            .write_scheduled_dates(entity, project_id, dates)
            .await
    }

    async fn delete_project_days(&self, project_id: DbId) -> CoreResult<u64> {
        self.inner.delete_project_days(project_id).await
    }

    async fn pending_snapshots(&self, project_id: DbId) -> CoreResult<Vec<ScheduleSnapshot>> {
        self.inner.pending_snapshots(project_id).await
    }

    async fn save_snapshots(
        &self,
        run_id: DbId,
        project_id: DbId,
        snapshots: &[ScheduleSnapshot],
    ) -> CoreResult<()> {
        self.inner.save_snapshots(run_id, project_id, snapshots).await
    }

    async fn mark_snapshots_restored(&self, project_id: DbId) -> CoreResult<u64> {
        self.inner.mark_snapshots_restored(project_id).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;
    use uuid::Uuid;

    /// Counts writes and stores nothing.
    #[derive(Default)]
    struct CountingStore {
        writes: AtomicUsize,
    }

    #[async_trait]
    impl AssignmentStore for CountingStore {
        async fn period_assignments(&self, _: DbId) -> CoreResult<Vec<PeriodAssignment>> {
            Ok(Vec::new())
        }
        async fn list_days(&self, _: AssignmentEntity, _: DbId) -> CoreResult<Vec<DailyRow>> {
            Ok(Vec::new())
        }
        async fn upsert_day(&self, _: &DailyRow) -> CoreResult<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
        async fn delete_day(&self, _: &DailyRow) -> CoreResult<bool> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(true)
        }
        async fn write_scheduled_dates(
            &self,
            _: AssignmentEntity,
            _: DbId,
            _: &[Date],
        ) -> CoreResult<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
        async fn delete_project_days(&self, _: DbId) -> CoreResult<u64> {
            Ok(0)
        }
        async fn pending_snapshots(&self, _: DbId) -> CoreResult<Vec<ScheduleSnapshot>> {
            Ok(Vec::new())
        }
        async fn save_snapshots(&self, _: DbId, _: DbId, _: &[ScheduleSnapshot]) -> CoreResult<()> {
            Ok(())
        }
        async fn mark_snapshots_restored(&self, _: DbId) -> CoreResult<u64> {
            Ok(0)
        }
    }

    fn row() -> DailyRow {
        DailyRow {
            entity: AssignmentEntity::Talent(Uuid::new_v4()),
            project_id: Uuid::new_v4(),
            assignment_date: Date::from_ymd_opt(2026, 3, 10).unwrap(),
            escort_id: Uuid::new_v4(),
        }
    }

    #[tokio::test]
    async fn writes_within_batch_do_not_wait() {
        let bucket = TokenBucket::for_batches(5, Duration::from_secs(60), Instant::now());
        let store = ThrottledStore::new(CountingStore::default(), bucket);

        let started = Instant::now();
        for _ in 0..5 {
            store.upsert_day(&row()).await.unwrap();
        }
        assert!(started.elapsed() < Duration::from_secs(1));
        assert_eq!(store.inner.writes.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn writes_past_batch_wait_for_refill() {
        let bucket = TokenBucket::for_batches(2, Duration::from_millis(100), Instant::now());
        let store = ThrottledStore::new(CountingStore::default(), bucket);

        let started = Instant::now();
        for _ in 0..3 {
            store.upsert_day(&row()).await.unwrap();
        }
        // Refill is 20 tokens/s, so the third write waits about 50ms.
        assert!(started.elapsed() >= Duration::from_millis(40));
        assert_eq!(store.inner.writes.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn reads_are_not_throttled() {
        let bucket = TokenBucket::new(1, 0.0, Instant::now());
        let store = ThrottledStore::new(CountingStore::default(), bucket);

        store.upsert_day(&row()).await.unwrap();
        // The bucket is now empty and never refills; reads still return.
        let listed = store
            .list_days(AssignmentEntity::Group(Uuid::new_v4()), Uuid::new_v4())
            .await
            .unwrap();
        assert!(listed.is_empty());
        assert!(store.pending_snapshots(Uuid::new_v4()).await.unwrap().is_empty());
    }
}
