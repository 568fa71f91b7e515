//! Per-lookup deadlines

use modscope_store::StoreError;
use std::future::Future;
use std::time::Duration;

/// Optional upper bound on a single collaborator read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LookupDeadline(Option<Duration>);

impl LookupDeadline {
    /// No deadline beyond what the store imposes
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self(None)
    }

    /// Fail reads that take longer than `limit`
    #[inline]
    #[must_use]
    pub fn after(limit: Duration) -> Self {
        Self(Some(limit))
    }

    /// Deadline from an optional millisecond setting
    #[inline]
    #[must_use]
    pub fn from_millis(millis: Option<u64>) -> Self {
        Self(millis.map(Duration::from_millis))
    }

    /// Configured limit
    #[inline]
    #[must_use]
    pub fn limit(&self) -> Option<Duration> {
        self.0
    }

    /// Await `lookup`, mapping expiry to `StoreError::Timeout`
    ///
    /// # Errors
    /// The lookup's own error, or `StoreError::Timeout` on expiry
    pub async fn run<T, F>(&self, operation: &'static str, lookup: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        match self.0 {
            None => lookup.await,
            Some(limit) => tokio::time::timeout(limit, lookup)
                .await
                .map_err(|_| StoreError::Timeout {
                    operation,
                    millis: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
                })?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unbounded_passes_through() {
        let out = LookupDeadline::none()
            .run("noop", async { Ok::<_, StoreError>(7) })
            .await;
        assert_eq!(out, Ok(7));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_lookup_times_out() {
        let out = LookupDeadline::after(Duration::from_millis(50))
            .run("slow", async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok::<_, StoreError>(())
            })
            .await;
        assert_eq!(
            out,
            Err(StoreError::Timeout {
                operation: "slow",
                millis: 50
            })
        );
    }
}
