//! Resilient invocation of remote operations
//!
//! Executes a caller-supplied async operation with bounded retry. Transient
//! failures rotate the key pool before the next attempt, so a retry never
//! burns the same quota-exhausted key; terminal failures stop immediately.
//! When the budget is exhausted, a caller-supplied fallback value is
//! substituted, or the last error propagates.
//!
//! Attempts within one invocation are strictly sequential. Independent
//! invocations may interleave and may race on the pool cursor; that is
//! accepted, rotation is advisory load-spreading.

use super::classify::ErrorClass;
use super::policy::RetryPolicy;
use crate::pool::KeyPool;
use std::fmt::Display;
use std::future::Future;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

/// Execute `operation` with rotate-on-transient retry and optional fallback.
///
/// On success at any attempt the result is returned immediately, with no
/// rotation. See [`with_resilience_cancellable`] for the variant that can be
/// aborted mid-retry.
pub async fn with_resilience<T, E, F, Fut, C>(
    pool: &KeyPool,
    policy: &RetryPolicy,
    classify: C,
    operation: F,
    fallback: Option<T>,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    C: Fn(&E) -> ErrorClass,
    E: Display,
{
    let cancel = CancellationToken::new();
    with_resilience_cancellable(pool, policy, classify, operation, fallback, &cancel).await
}

/// Like [`with_resilience`], but stops scheduling further attempts as soon as
/// `cancel` fires. A backoff sleep in progress is interrupted; an already
/// dispatched network request is not torn down. Cancellation resolves like an
/// exhausted budget: fallback if supplied, otherwise the last error.
pub async fn with_resilience_cancellable<T, E, F, Fut, C>(
    pool: &KeyPool,
    policy: &RetryPolicy,
    classify: C,
    mut operation: F,
    fallback: Option<T>,
    cancel: &CancellationToken,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    C: Fn(&E) -> ErrorClass,
    E: Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    let last_err = loop {
        attempt += 1;

        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                let class = classify(&err);
                tracing::warn!(
                    attempt,
                    classification = ?class,
                    error = %err,
                    "remote operation failed"
                );

                if class == ErrorClass::Terminal {
                    break err;
                }

                // Rotate first so the next attempt runs on a different key.
                pool.rotate();

                if attempt >= max_attempts {
                    break err;
                }

                let delay = policy.delay_for(attempt - 1);
                tracing::debug!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "backing off before retry"
                );

                tokio::select! {
                    _ = cancel.cancelled() => break err,
                    _ = sleep(delay) => {}
                }
            }
        }
    };

    match fallback {
        Some(value) => {
            tracing::debug!(attempts = attempt, "substituting fallback value");
            Ok(value)
        }
        None => Err(last_err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoke::classify::classify_message;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::{Duration, Instant};

    fn fast_policy() -> RetryPolicy {
        RetryPolicy::new()
            .with_max_attempts(4)
            .with_initial_delay(Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_success_first_attempt_no_rotation() {
        let pool = KeyPool::fixed(vec!["a", "b", "c"]);
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();

        let result = with_resilience(
            &pool,
            &fast_policy(),
            classify_message,
            || {
                let calls = calls_clone.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, String>(42)
                }
            },
            None,
        )
        .await;

        assert_eq!(result, Ok(42));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(pool.cursor(), 0);
    }

    #[tokio::test]
    async fn test_transient_rotates_then_succeeds() {
        let pool = KeyPool::fixed(vec!["a", "b", "c"]);
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();

        let result = with_resilience(
            &pool,
            &fast_policy(),
            classify_message,
            || {
                let calls = calls_clone.clone();
                async move {
                    let n = calls.fetch_add(1, Ordering::SeqCst);
                    if n < 2 {
                        Err("429 Too Many Requests".to_string())
                    } else {
                        Ok(7)
                    }
                }
            },
            None,
        )
        .await;

        assert_eq!(result, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // Two transient failures, two rotations.
        assert_eq!(pool.cursor(), 2);
    }

    #[tokio::test]
    async fn test_each_attempt_uses_next_key() {
        // Pool "abc, def ,ghi": attempt 1 on abc, 2 on def, 3 on ghi.
        let pool = KeyPool::fixed(vec!["abc, def ,ghi"]);
        let keys_seen = Arc::new(Mutex::new(Vec::new()));
        let calls = Arc::new(AtomicU32::new(0));

        let result = {
            let keys_seen = keys_seen.clone();
            let calls = calls.clone();
            let pool_ref = &pool;
            with_resilience(
                pool_ref,
                &fast_policy(),
                classify_message,
                move || {
                    let keys_seen = keys_seen.clone();
                    let calls = calls.clone();
                    async move {
                        keys_seen
                            .lock()
                            .unwrap()
                            .push(pool_ref.active_key().unwrap());
                        let n = calls.fetch_add(1, Ordering::SeqCst);
                        if n < 2 {
                            Err("quota exceeded".to_string())
                        } else {
                            Ok("answer".to_string())
                        }
                    }
                },
                None,
            )
            .await
        };

        assert_eq!(result, Ok("answer".to_string()));
        assert_eq!(
            *keys_seen.lock().unwrap(),
            vec!["abc".to_string(), "def".to_string(), "ghi".to_string()]
        );
    }

    #[tokio::test]
    async fn test_terminal_stops_immediately() {
        let pool = KeyPool::fixed(vec!["a", "b"]);
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();

        let result: Result<i32, String> = with_resilience(
            &pool,
            &fast_policy(),
            classify_message,
            || {
                let calls = calls_clone.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err("Invalid request: missing contents".to_string())
                }
            },
            None,
        )
        .await;

        assert_eq!(result, Err("Invalid request: missing contents".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(pool.cursor(), 0);
    }

    #[tokio::test]
    async fn test_fallback_absorbs_exhausted_transients() {
        let pool = KeyPool::fixed(vec!["a", "b"]);
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();

        let result = with_resilience(
            &pool,
            &fast_policy(),
            classify_message,
            || {
                let calls = calls_clone.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err::<i32, _>("resource exhausted".to_string())
                }
            },
            Some(-1),
        )
        .await;

        assert_eq!(result, Ok(-1));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_fallback_absorbs_terminal() {
        let pool = KeyPool::fixed(vec!["a"]);
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();

        let result = with_resilience(
            &pool,
            &fast_policy(),
            classify_message,
            || {
                let calls = calls_clone.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err::<String, _>("bad request".to_string())
                }
            },
            Some("default reply".to_string()),
        )
        .await;

        assert_eq!(result, Ok("default reply".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cancellation_aborts_backoff() {
        let pool = KeyPool::fixed(vec!["a", "b"]);
        let policy = RetryPolicy::new()
            .with_max_attempts(4)
            .with_initial_delay(Duration::from_secs(10));
        let cancel = CancellationToken::new();
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();

        let canceller = cancel.clone();
        tokio::spawn(async move {
            sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        });

        let started = Instant::now();
        let result = with_resilience_cancellable(
            &pool,
            &policy,
            classify_message,
            || {
                let calls = calls_clone.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err::<i32, _>("503 unavailable".to_string())
                }
            },
            Some(0),
            &cancel,
        )
        .await;

        assert_eq!(result, Ok(0));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_backoff_delays_grow() {
        let pool = KeyPool::fixed(vec!["a", "b"]);
        let policy = RetryPolicy::new()
            .with_max_attempts(3)
            .with_initial_delay(Duration::from_millis(30))
            .with_multiplier(2.0);
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();

        let started = Instant::now();
        let _ = with_resilience(
            &pool,
            &policy,
            classify_message,
            || {
                let calls = calls_clone.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err::<i32, _>("quota".to_string())
                }
            },
            Some(0),
        )
        .await;

        // Two sleeps: 30ms then 60ms.
        assert!(started.elapsed() >= Duration::from_millis(90));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
