//! Rate-limited request scheduler.
//!
//! Every outbound API call goes through one scheduler instance, which
//! queues submissions FIFO and issues them one at a time, never starting
//! more than `max_per_window` requests within any trailing window.
//!
//! The queue is drained by a dedicated task; submissions talk to it over
//! an unbounded channel and receive their result through a oneshot reply.
//! Because the drain task owns all scheduling state, no lock is needed.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::error::SchedulerClosed;

/// Rate limit enforced by a [`RequestScheduler`].
#[derive(Debug, Clone, Copy)]
pub struct RateLimit {
    /// Maximum requests issued per window.
    pub max_per_window: u32,
    /// Window length.
    pub window: Duration,
}

impl RateLimit {
    pub fn new(max_per_window: u32, window: Duration) -> Self {
        Self {
            max_per_window,
            window,
        }
    }
}

impl Default for RateLimit {
    /// The upstream API's documented ceiling: 3 requests per second.
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}

/// Issue counter for the current window.
///
/// This is deliberately the conservative serial algorithm, not a token
/// bucket: requests are issued one at a time, and once `max_per_window`
/// issues land inside a window the drain loop pauses for the remainder
/// of that window. The counter and the window start are always reset
/// together, never independently.
#[derive(Debug)]
struct RateWindow {
    limit: RateLimit,
    window_start: Option<Instant>,
    issued: u32,
}

impl RateWindow {
    fn new(limit: RateLimit) -> Self {
        Self {
            limit,
            window_start: None,
            issued: 0,
        }
    }

    /// Wait until the next request may be issued.
    async fn acquire(&mut self) {
        let now = Instant::now();
        match self.window_start {
            Some(start) if now.duration_since(start) < self.limit.window => {
                self.issued += 1;
                if self.issued >= self.limit.max_per_window {
                    let wait = self.limit.window - now.duration_since(start);
                    debug!(
                        wait_ms = wait.as_millis() as u64,
                        issued = self.issued,
                        "Issue window full, pausing drain loop"
                    );
                    sleep(wait).await;
                    self.issued = 0;
                    self.window_start = Some(Instant::now());
                }
            }
            _ => {
                // Fresh or expired window
                self.issued = 1;
                self.window_start = Some(now);
            }
        }
    }
}

/// A queued unit of work: runs the caller's thunk and delivers the
/// result through its oneshot reply.
type Job = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Handle to the scheduler's drain task.
///
/// Cloning the handle shares the same queue and rate window. Must be
/// created inside a Tokio runtime.
#[derive(Debug, Clone)]
pub struct RequestScheduler {
    queue: mpsc::UnboundedSender<Job>,
}

impl RequestScheduler {
    /// Spawn a drain task enforcing `limit` and return a handle to it.
    pub fn new(limit: RateLimit) -> Self {
        let (queue, rx) = mpsc::unbounded_channel();
        tokio::spawn(drain(rx, RateWindow::new(limit)));
        Self { queue }
    }

    /// Enqueue `work` at the tail of the queue and wait for its result.
    ///
    /// The returned future settles with whatever `work` settles with,
    /// exactly once; a failing unit reports only to its own caller and
    /// does not disturb the queue. Submissions are serviced strictly in
    /// submission order with a single request in flight at a time.
    pub async fn submit<T, F, Fut>(&self, work: F) -> Result<T, SchedulerClosed>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let (reply, response) = oneshot::channel();
        let job: Job = Box::pin(async move {
            // The caller may have given up; its result is then discarded,
            // but the unit still counted against the rate window.
            let _ = reply.send(work().await);
        });
        self.queue.send(job).map_err(|_| SchedulerClosed)?;
        response.await.map_err(|_| SchedulerClosed)
    }
}

/// Drain loop: one job in flight at a time, gated by the rate window.
///
/// An empty queue parks the loop in `recv`; the next submission wakes it.
/// The loop exits once every handle is dropped and the queue is empty,
/// so already-accepted work is never dropped.
async fn drain(mut queue: mpsc::UnboundedReceiver<Job>, mut window: RateWindow) {
    while let Some(job) = queue.recv().await {
        window.acquire().await;
        job.await;
    }
    debug!("Request queue closed, drain task exiting");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_scheduler() -> RequestScheduler {
        RequestScheduler::new(RateLimit::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_of_five_respects_window() {
        let scheduler = test_scheduler();
        let epoch = Instant::now();

        let submit = |i: u32| {
            let scheduler = scheduler.clone();
            async move {
                scheduler
                    .submit(move || async move { (i, Instant::now()) })
                    .await
                    .unwrap()
            }
        };

        let results = tokio::join!(submit(0), submit(1), submit(2), submit(3), submit(4));
        let starts: Vec<(u32, Duration)> = [results.0, results.1, results.2, results.3, results.4]
            .iter()
            .map(|(i, t)| (*i, t.duration_since(epoch)))
            .collect();

        // Settled in submission order, exactly once each
        let order: Vec<u32> = starts.iter().map(|(i, _)| *i).collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4]);

        // First two issue immediately, the rest wait for the window
        assert!(starts[0].1 < Duration::from_millis(100));
        assert!(starts[1].1 < Duration::from_millis(100));
        for (_, at) in &starts[2..] {
            assert!(*at >= Duration::from_millis(1000), "started at {at:?}");
        }
        // Unit 4 (index 3) must not begin before ~1000ms
        assert!(starts[3].1 >= Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rolling_window_bound() {
        let scheduler = test_scheduler();
        let epoch = Instant::now();

        let mut starts = Vec::new();
        for _ in 0..7 {
            let at = scheduler
                .submit(move || async move { Instant::now() })
                .await
                .unwrap();
            starts.push(at.duration_since(epoch));
        }

        // At most 3 starts within any rolling window: every 4th start is
        // at least one full window after the one three places earlier.
        for pair in starts.windows(4) {
            assert!(
                pair[3] - pair[0] >= Duration::from_millis(1000),
                "window violated: {starts:?}"
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_does_not_disturb_siblings() {
        let scheduler = test_scheduler();

        let failing = scheduler.submit(|| async { Err::<u32, String>("boom".into()) });
        let succeeding = scheduler.submit(|| async { Ok::<u32, String>(7) });

        let (failed, succeeded) = tokio::join!(failing, succeeding);
        assert_eq!(failed.unwrap(), Err("boom".into()));
        assert_eq!(succeeded.unwrap(), Ok(7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fresh_window_after_idle() {
        let scheduler = test_scheduler();
        let epoch = Instant::now();

        scheduler.submit(|| async {}).await.unwrap();
        sleep(Duration::from_secs(5)).await;

        // The window has long expired; the next submission issues
        // immediately in a fresh window.
        let at = scheduler
            .submit(move || async move { Instant::now() })
            .await
            .unwrap();
        let elapsed = at.duration_since(epoch);
        assert!(elapsed >= Duration::from_secs(5));
        assert!(elapsed < Duration::from_millis(5100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_work_stays_serial() {
        let scheduler = test_scheduler();
        let epoch = Instant::now();

        let slow = |i: u32| {
            let scheduler = scheduler.clone();
            async move {
                scheduler
                    .submit(move || async move {
                        let started = Instant::now();
                        sleep(Duration::from_millis(300)).await;
                        (i, started)
                    })
                    .await
                    .unwrap()
            }
        };

        let (a, b) = tokio::join!(slow(0), slow(1));
        // The second unit cannot start before the first completes.
        assert_eq!((a.0, b.0), (0, 1));
        assert!(b.1.duration_since(epoch) >= a.1.duration_since(epoch) + Duration::from_millis(300));
    }
}
