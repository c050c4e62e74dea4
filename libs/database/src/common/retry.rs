use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, warn};

/// Fixed-interval probe schedule bounded by a total wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeSchedule {
    /// Delay between two failed probes
    pub interval: Duration,

    /// Total time allowed before giving up
    pub timeout: Duration,
}

impl ProbeSchedule {
    /// Defaults:
    /// - interval: 5s
    /// - timeout: 60s
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ProbeSchedule {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            timeout: Duration::from_secs(60),
        }
    }
}

/// Returned by [`retry_until_deadline`] when no attempt succeeded in time
#[derive(Debug)]
pub struct DeadlineExceeded<E> {
    pub attempts: u32,
    pub waited: Duration,
    /// Error of the last completed attempt; `None` if the first attempt itself ran past the deadline
    pub last_error: Option<E>,
}

/// Run `operation` until it succeeds or `schedule.timeout` elapses.
///
/// The first attempt runs immediately; later attempts follow `schedule.interval`.
/// An attempt still in flight at the deadline is abandoned.
///
/// # Example
/// ```ignore
/// use database::common::{ProbeSchedule, retry_until_deadline};
///
/// let ready = retry_until_deadline(|| check_health(&db), ProbeSchedule::default()).await;
/// ```
pub async fn retry_until_deadline<F, Fut, T, E>(
    mut operation: F,
    schedule: ProbeSchedule,
) -> Result<T, DeadlineExceeded<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let started = Instant::now();
    let deadline = started + schedule.timeout;
    let mut attempts = 0;
    let mut last_error = None;

    loop {
        attempts += 1;

        match tokio::time::timeout_at(deadline, operation()).await {
            Ok(Ok(value)) => {
                info!(attempt = attempts, elapsed = ?started.elapsed(), "Probe succeeded");
                return Ok(value);
            }
            Ok(Err(e)) => {
                warn!(attempt = attempts, error = %e, "Probe failed");
                last_error = Some(e);
            }
            Err(_) => {
                warn!(attempt = attempts, "Probe still pending at deadline");
                return Err(DeadlineExceeded {
                    attempts,
                    waited: started.elapsed(),
                    last_error,
                });
            }
        }

        let now = Instant::now();
        if now + schedule.interval > deadline {
            return Err(DeadlineExceeded {
                attempts,
                waited: started.elapsed(),
                last_error,
            });
        }

        tokio::time::sleep(schedule.interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast() -> ProbeSchedule {
        ProbeSchedule::new()
            .with_interval(Duration::from_millis(10))
            .with_timeout(Duration::from_millis(500))
    }

    #[test]
    fn test_schedule_defaults() {
        let schedule = ProbeSchedule::default();
        assert_eq!(schedule.interval, Duration::from_secs(5));
        assert_eq!(schedule.timeout, Duration::from_secs(60));
    }

    #[tokio::test]
    async fn test_success_first_attempt() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result = retry_until_deadline(
            || {
                let counter = counter_clone.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, String>("ready")
                }
            },
            fast(),
        )
        .await;

        assert_eq!(result.unwrap(), "ready");
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_success_after_failures() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result = retry_until_deadline(
            || {
                let counter = counter_clone.clone();
                async move {
                    let count = counter.fetch_add(1, Ordering::SeqCst);
                    if count < 2 {
                        Err(format!("refused {}", count + 1))
                    } else {
                        Ok("ready")
                    }
                }
            },
            fast(),
        )
        .await;

        assert_eq!(result.unwrap(), "ready");
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_at_deadline_with_last_error() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();
        let schedule = ProbeSchedule::new()
            .with_interval(Duration::from_millis(20))
            .with_timeout(Duration::from_millis(100));

        let err = retry_until_deadline(
            || {
                let counter = counter_clone.clone();
                async move {
                    let count = counter.fetch_add(1, Ordering::SeqCst);
                    Err::<(), _>(format!("refused {}", count + 1))
                }
            },
            schedule,
        )
        .await
        .unwrap_err();

        let attempts = counter.load(Ordering::SeqCst);
        assert_eq!(err.attempts, attempts);
        assert!(attempts >= 2);
        assert!(attempts <= 6);
        assert_eq!(err.last_error, Some(format!("refused {attempts}")));
        assert!(err.waited <= Duration::from_millis(400));
    }

    #[tokio::test]
    async fn test_abandons_hanging_attempt() {
        let schedule = ProbeSchedule::new()
            .with_interval(Duration::from_millis(10))
            .with_timeout(Duration::from_millis(50));

        let err = retry_until_deadline(
            || async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok::<(), String>(())
            },
            schedule,
        )
        .await
        .unwrap_err();

        assert_eq!(err.attempts, 1);
        assert!(err.last_error.is_none());
    }
}
