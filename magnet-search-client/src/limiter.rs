use std::time::Duration;

use tokio::sync::{Mutex, MutexGuard};
use tokio::time::{sleep_until, Instant};

/// Gate serializing every upstream request and spacing consecutive ones by a
/// minimum interval. The upstream enforces a per-client request-rate ceiling
/// regardless of request type, so searches and token refreshes share one
/// gate.
pub(crate) struct RequestGate {
    interval: Duration,
    next_allowed: Mutex<Instant>,
}

impl RequestGate {
    pub(crate) fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_allowed: Mutex::new(Instant::now()),
        }
    }

    /// Blocks until the caller may talk to the upstream. The permit must be
    /// held for the whole request; dropping it schedules the next slot.
    pub(crate) async fn acquire(&self) -> RequestPermit<'_> {
        let slot = self.next_allowed.lock().await;
        sleep_until(*slot).await;
        RequestPermit {
            slot,
            interval: self.interval,
        }
    }
}

pub(crate) struct RequestPermit<'a> {
    slot: MutexGuard<'a, Instant>,
    interval: Duration,
}

impl Drop for RequestPermit<'_> {
    fn drop(&mut self) {
        *self.slot = Instant::now() + self.interval;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex as StdMutex};

    use super::*;

    #[tokio::test]
    async fn spaces_sequential_passages() {
        let gate = RequestGate::new(Duration::from_millis(50));
        let start = Instant::now();

        for _ in 0..3 {
            let permit = gate.acquire().await;
            drop(permit);
        }

        // The first passage is free; the next two wait out the interval.
        assert!(start.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test]
    async fn spaces_concurrent_acquirers() {
        let gate = Arc::new(RequestGate::new(Duration::from_millis(50)));
        let passages = Arc::new(StdMutex::new(Vec::new()));

        let tasks: Vec<_> = (0..3)
            .map(|_| {
                let gate = gate.clone();
                let passages = passages.clone();
                tokio::spawn(async move {
                    let permit = gate.acquire().await;
                    passages.lock().unwrap().push(Instant::now());
                    drop(permit);
                })
            })
            .collect();
        futures::future::join_all(tasks).await;

        let passages = passages.lock().unwrap();
        assert_eq!(passages.len(), 3);
        for pair in passages.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_millis(50));
        }
    }
}
