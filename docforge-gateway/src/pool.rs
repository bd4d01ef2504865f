//! Per-operation-type connection pooling for the model runtime.
//!
//! Generalizes `ravituringworks-generic-ai-agent`'s `OllamaConnectionPool` to
//! three independent semaphores, one per operation (`generate`, `vision`,
//! `embed`), so a burst of embedding calls can't starve text generation or
//! vice versa (spec §4.3: "up to N in-flight calls globally... per operation
//! type").

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{debug, warn};

/// Rate-limits concurrent calls of one operation type against the model runtime.
#[derive(Clone)]
pub struct ConnectionPool {
    semaphore: Arc<Semaphore>,
    max_connections: usize,
    label: &'static str,
}

impl ConnectionPool {
    /// Creates a pool admitting up to `max_connections` concurrent callers.
    #[must_use]
    pub fn new(label: &'static str, max_connections: usize) -> Self {
        debug!(label, max_connections, "creating model gateway connection pool");
        Self {
            semaphore: Arc::new(Semaphore::new(max_connections.max(1))),
            max_connections: max_connections.max(1),
            label,
        }
    }

    /// Acquires a permit, waiting if every connection is currently in use.
    pub async fn acquire(&self) -> ConnectionPermit {
        if self.semaphore.available_permits() == 0 {
            warn!(label = self.label, max = self.max_connections, "all connections in use, waiting for a slot");
        }
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .expect("semaphore is never closed");
        ConnectionPermit {
            _permit: permit,
            label: self.label,
            max_connections: self.max_connections,
            semaphore: self.semaphore.clone(),
        }
    }

    /// Currently-available permits, for diagnostics.
    #[must_use]
    pub fn available_permits(&self) -> usize {
        self.semaphore.available_permits()
    }
}

/// An active connection slot, released back to the pool on drop.
pub struct ConnectionPermit {
    _permit: tokio::sync::OwnedSemaphorePermit,
    label: &'static str,
    max_connections: usize,
    semaphore: Arc<Semaphore>,
}

impl Drop for ConnectionPermit {
    fn drop(&mut self) {
        debug!(
            label = self.label,
            in_use = self.max_connections - self.semaphore.available_permits(),
            max = self.max_connections,
            "released model gateway connection permit"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::sleep;

    #[tokio::test]
    async fn permits_are_returned_on_drop() {
        let pool = ConnectionPool::new("test", 2);
        let first = pool.acquire().await;
        assert_eq!(pool.available_permits(), 1);
        let second = pool.acquire().await;
        assert_eq!(pool.available_permits(), 0);
        drop(first);
        assert_eq!(pool.available_permits(), 1);
        drop(second);
        assert_eq!(pool.available_permits(), 2);
    }

    #[tokio::test]
    async fn acquire_blocks_until_a_permit_frees_up() {
        let pool = ConnectionPool::new("test", 1);
        let permit = pool.acquire().await;

        let pool_clone = pool.clone();
        let task = tokio::spawn(async move {
            let _permit = pool_clone.acquire().await;
            "acquired"
        });

        sleep(Duration::from_millis(10)).await;
        assert!(!task.is_finished());

        drop(permit);
        assert_eq!(task.await.unwrap(), "acquired");
    }
}
