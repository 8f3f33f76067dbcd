use std::time::Duration;

use crate::errors::IngestError;

pub const DEFAULT_ATTEMPTS: u32 = 3;
pub const DEFAULT_DELAY: Duration = Duration::from_secs(2);

/// Fixed-delay, bounded-attempt retry. The delay never grows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_ATTEMPTS,
            delay: DEFAULT_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            delay,
        }
    }

    /// Run `op` until it succeeds, fails with a non-transient error, or attempts run out.
    /// The last error is returned unchanged.
    ///
    /// Only meant for reads. Catalog writes must never go through here: a write that
    /// failed after the server applied it would be duplicated.
    pub fn run<T, F>(&self, mut op: F) -> Result<T, IngestError>
    where
        F: FnMut() -> Result<T, IngestError>,
    {
        self.run_with_sleep(&mut op, std::thread::sleep)
    }

    pub(crate) fn run_with_sleep<T, F, S>(&self, op: &mut F, mut sleep: S) -> Result<T, IngestError>
    where
        F: FnMut() -> Result<T, IngestError>,
        S: FnMut(Duration),
    {
        let attempts = self.attempts.max(1);
        let mut attempt = 1;

        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() && attempt < attempts => {
                    log::info!(
                        "attempt {attempt}/{attempts} failed: {err}, retrying in {:?}",
                        self.delay
                    );
                    sleep(self.delay);
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn policy() -> RetryPolicy {
        RetryPolicy::new(3, Duration::from_millis(5))
    }

    #[test]
    fn test_first_success_short_circuits() {
        let calls = Cell::new(0);
        let sleeps = Cell::new(0);
        let result = policy().run_with_sleep(
            &mut || {
                calls.set(calls.get() + 1);
                Ok::<_, IngestError>(42)
            },
            |_| sleeps.set(sleeps.get() + 1),
        );
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.get(), 1);
        assert_eq!(sleeps.get(), 0);
    }

    #[test]
    fn test_recovers_after_transient_failures() {
        let calls = Cell::new(0);
        let mut slept = Vec::new();
        let result = policy().run_with_sleep(
            &mut || {
                calls.set(calls.get() + 1);
                if calls.get() < 3 {
                    Err(IngestError::Transient("timeout".into()))
                } else {
                    Ok("page")
                }
            },
            |d| slept.push(d),
        );
        assert_eq!(result.unwrap(), "page");
        assert_eq!(calls.get(), 3);
        // fixed delay, not growing
        assert_eq!(slept, vec![Duration::from_millis(5), Duration::from_millis(5)]);
    }

    #[test]
    fn test_exhausted_returns_last_error() {
        let calls = Cell::new(0);
        let result: Result<(), _> = policy().run_with_sleep(
            &mut || {
                calls.set(calls.get() + 1);
                Err(IngestError::Transient(format!("failure #{}", calls.get())))
            },
            |_| {},
        );
        assert_eq!(calls.get(), 3);
        match result {
            Err(IngestError::Transient(msg)) => assert_eq!(msg, "failure #3"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_terminal_error_is_not_retried() {
        let calls = Cell::new(0);
        let result: Result<(), _> = policy().run_with_sleep(
            &mut || {
                calls.set(calls.get() + 1);
                Err(IngestError::Extraction(
                    crate::metadata::ExtractionError::UnsupportedFormat,
                ))
            },
            |_| panic!("must not sleep"),
        );
        assert_eq!(calls.get(), 1);
        assert!(matches!(result, Err(IngestError::Extraction(_))));
    }
}
