use futures::lock::Mutex;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

/// One async mutex per student ID, so the duplicate/cooldown checks and the
/// insert that follows them run one at a time for a given student.
///
/// Entries expire after `idle` without use and are never evicted for size: a
/// size-based eviction could drop a mutex that is still held, and the next
/// request for that student would get a fresh one. Memory is bounded by the
/// number of distinct students seen within one `idle` window.
#[derive(Clone)]
pub struct StudentLocks {
    locks: Cache<String, Arc<Mutex<()>>>,
}

impl StudentLocks {
    pub fn new(idle: Duration) -> Self {
        Self {
            locks: Cache::builder().time_to_idle(idle).build(),
        }
    }

    /// The mutex guarding `student_id`. Callers hold `.lock().await` for the
    /// whole check-then-insert sequence.
    pub async fn handle(&self, student_id: &str) -> Arc<Mutex<()>> {
        self.locks
            .get_with(student_id.to_string(), async { Arc::new(Mutex::new(())) })
            .await
    }
}
